//! MakeItMeme Common Utilities
//!
//! Shared infrastructure for all MakeItMeme crates:
//! - Error taxonomy and result alias
//! - Millisecond clocks for event timestamps and artifact names
//! - Tracing/logging initialization
//! - Configuration loading

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;
