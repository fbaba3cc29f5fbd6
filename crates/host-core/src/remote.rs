//! Remote append-only log contract.
//!
//! A subscription yields full snapshots, never diffs. A fault is terminal:
//! after [`StreamItem::Fault`] the stream delivers nothing more and the
//! caller has to subscribe again.

use makeitmeme_common::error::MemeResult;
use makeitmeme_feed_model::{LogRecord, RawSnapshot};
use tokio::sync::mpsc;

/// One delivery on a topic subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamItem {
    /// Everything currently known for the topic.
    Snapshot(RawSnapshot),
    /// The stream faulted or was cancelled remotely.
    Fault(String),
}

/// Receiving end of a topic subscription. Dropping it ends the remote
/// subscription.
pub type SnapshotStream = mpsc::UnboundedReceiver<StreamItem>;

/// Acknowledgement of a pushed record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ack {
    /// Key the log assigned to the record.
    pub key: String,
}

/// Shared append-only log, organised by topic path.
#[async_trait::async_trait]
pub trait RemoteLog: Send + Sync {
    /// Open a snapshot stream for `path`. Fails with `Subscription`.
    async fn subscribe_topic(&self, path: &str) -> MemeResult<SnapshotStream>;

    /// Append a record under `path`. Fails with `Publish`.
    async fn push_record(&self, path: &str, record: &LogRecord) -> MemeResult<Ack>;
}
