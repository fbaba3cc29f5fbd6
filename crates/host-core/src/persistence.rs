//! Artifact persistence contract.

use makeitmeme_common::error::MemeResult;
use makeitmeme_feed_model::ArtifactRef;

/// Durable storage for committed memes.
#[async_trait::async_trait]
pub trait PersistenceSink: Send + Sync {
    /// Store encoded bytes. Fails with `Save`.
    async fn save(&self, bytes: &[u8], suggested_name: &str) -> MemeResult<ArtifactRef>;

    /// Make a saved artifact discoverable to the host's media index.
    /// Called once after every successful [`save`](Self::save).
    async fn notify_index(&self, artifact: &ArtifactRef) -> MemeResult<()>;
}
