//! MakeItMeme Feed Model
//!
//! Defines the core data contracts shared by the edit and feed engines:
//! - **Assets:** Opaque identifiers for base images in the fixed catalog
//! - **Events:** Chat messages, published memes, and reactions on a topic
//! - **Records:** The keyed JSON records a remote log stores them as
//! - **Views:** The deduplicated, ordered local view of a topic snapshot
//!
//! Ordering everywhere is ascending by `(created_at, id)`.

pub mod asset;
pub mod event;
pub mod identity;
pub mod record;
pub mod view;

pub use asset::*;
pub use event::*;
pub use identity::*;
pub use record::*;
pub use view::*;
