//! MakeItMeme local host implementations
//!
//! Concrete capabilities for running the core outside a managed platform:
//! - **Filesystem sink:** Saves artifacts into a directory and appends them
//!   to a JSONL media index
//! - **Asset catalogs:** Directory-backed and in-memory base image catalogs
//! - **In-memory remote log:** A process-local shared log with full-snapshot
//!   fan-out, fault injection, and an offline switch
//! - **In-memory auth:** Email/password and token accounts for offline use

pub mod catalog;
pub mod fs_sink;
pub mod memory_auth;
pub mod memory_log;

pub use catalog::*;
pub use fs_sink::*;
pub use memory_auth::*;
pub use memory_log::*;
