//! MakeItMeme host capability contracts.
//!
//! The core never talks to a platform directly. Everything it needs from
//! the host (signing users in, persisting artifacts, reading the base
//! image catalog, talking to the shared log) is injected through the
//! traits in this crate, so engines can be driven by in-memory doubles.

pub mod assets;
pub mod auth;
pub mod persistence;
pub mod remote;

pub use assets::*;
pub use auth::*;
pub use persistence::*;
pub use remote::*;
