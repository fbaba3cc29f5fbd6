//! Observer-side handles.

use std::sync::Arc;

use makeitmeme_common::error::MemeError;
use makeitmeme_feed_model::TopicView;
use tokio::sync::mpsc;

/// Identifies one local observer of a topic.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle {
    pub(crate) id: u64,
    pub(crate) topic: String,
}

impl SubscriptionHandle {
    pub fn topic(&self) -> &str {
        &self.topic
    }
}

/// Terminal failure of a topic subscription.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("subscription to '{topic}' failed: {message}")]
pub struct SubscriptionError {
    pub topic: String,
    pub message: String,
}

impl From<SubscriptionError> for MemeError {
    fn from(err: SubscriptionError) -> Self {
        MemeError::subscription(err.topic, err.message)
    }
}

/// What an observer receives.
#[derive(Debug, Clone)]
pub enum FeedUpdate {
    /// The canonical view after a snapshot. Sent once per snapshot, even
    /// when nothing changed.
    Snapshot(Arc<TopicView>),
    /// The remote stream faulted. Nothing follows this update.
    Failed(SubscriptionError),
}

/// A local observer of one topic.
#[derive(Debug)]
pub struct Subscription {
    handle: SubscriptionHandle,
    updates: mpsc::UnboundedReceiver<FeedUpdate>,
}

impl Subscription {
    pub(crate) fn new(handle: SubscriptionHandle, updates: mpsc::UnboundedReceiver<FeedUpdate>) -> Self {
        Self { handle, updates }
    }

    pub fn handle(&self) -> &SubscriptionHandle {
        &self.handle
    }

    pub fn topic(&self) -> &str {
        &self.handle.topic
    }

    /// Next update, or `None` once the subscription has ended (after
    /// unsubscribe or after a [`FeedUpdate::Failed`]).
    pub async fn recv(&mut self) -> Option<FeedUpdate> {
        self.updates.recv().await
    }

    /// Non-blocking variant of [`recv`](Self::recv).
    pub fn try_recv(&mut self) -> Option<FeedUpdate> {
        self.updates.try_recv().ok()
    }
}
