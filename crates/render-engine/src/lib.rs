//! MakeItMeme Render Engine
//!
//! Stateless composition pipeline that turns a base image and two captions
//! into encoded artifact bytes.
//!
//! # Pipeline Architecture
//!
//! ```text
//! asset bytes ──► Decode ──► Bound (longest edge ≤ max_edge)
//!                                      │
//! top / bottom text ──► Caption layout ┤
//!                                      ▼
//!                              Outline pass + fill pass
//!                                      │
//!                                      ▼
//!                                 Encode (PNG)
//!                                      │
//!                                      ▼
//!                                artifact bytes
//! ```
//!
//! The output is a pure function of `(asset bytes, top text, bottom text)`
//! and the pipeline configuration: no clock, randomness, or system font
//! lookup takes part, so repeated renders are byte-identical.

pub mod compositor;
pub mod pipeline;

pub use compositor::*;
pub use pipeline::*;
