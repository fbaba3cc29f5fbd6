//! Sharing a committed meme on the feed.

use makeitmeme_common::clock::Clock;
use makeitmeme_common::error::MemeResult;
use makeitmeme_feed_model::{ArtifactRef, Identity, LogRecord, Payload};
use makeitmeme_feed_sync::FeedSynchronizer;
use makeitmeme_host_core::Ack;

/// Publish a feed event referencing `artifact`, authored by `author`.
///
/// Like any publish, the event shows up in subscribed views only once the
/// log echoes it back in a snapshot.
pub async fn publish_after_commit(
    feed: &FeedSynchronizer,
    topic: &str,
    author: &Identity,
    artifact: &ArtifactRef,
) -> MemeResult<Ack> {
    let record = LogRecord::message(
        author.author_label(),
        Payload::Artifact(artifact.clone()),
        feed.clock().now_ms(),
    );
    feed.publish(topic, &record).await
}
