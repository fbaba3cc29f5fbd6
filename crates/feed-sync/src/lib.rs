//! MakeItMeme Feed Synchronizer
//!
//! Keeps a locally consistent, ordered view of remote append-only topics
//! and performs best-effort writes back to them.
//!
//! # Architecture
//!
//! ```text
//!  RemoteLog ──subscribe_topic──► SnapshotStream ──► pump task (1 per topic)
//!      ▲                                                   │
//!      │ push_record                         merge: dedup by id, sort by
//!      │                                     (created_at, id), replace view
//!  FeedSynchronizer::publish                               │
//!                                            ┌─────────────┼─────────────┐
//!                                            ▼             ▼             ▼
//!                                       Subscription  Subscription  Subscription
//! ```
//!
//! Writes are never applied to the local view optimistically: a published
//! event shows up only once a later snapshot from the log contains it.
//!
//! Memory per topic grows with the number of events the log has ever held
//! for it; views are replaced wholesale and never windowed or evicted.

pub mod subscription;
pub mod synchronizer;

pub use subscription::*;
pub use synchronizer::*;
