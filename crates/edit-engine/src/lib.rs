//! MakeItMeme Edit Engine
//!
//! Owns the draft lifecycle:
//!
//! ```text
//!  Fresh ──set text──► Editing ──swap (budget-1)──► Editing ... ──► Locked
//!    ▲                                                               │
//!    └──────────────── commit: render, save, new asset ◄─────────────┘
//! ```
//!
//! [`EditSession`] is an immutable value with pure transitions;
//! [`MemeStudio`] wires it to the asset catalog, the composition pipeline
//! and the persistence sink, and guarantees that a failed commit leaves the
//! draft exactly as it was.

pub mod picker;
pub mod publish;
pub mod session;
pub mod studio;

pub use picker::*;
pub use publish::*;
pub use session::*;
pub use studio::*;
