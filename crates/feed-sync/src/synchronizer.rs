//! Snapshot reconciliation and publishing.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use makeitmeme_common::clock::Clock;
use makeitmeme_common::error::{MemeError, MemeResult};
use makeitmeme_feed_model::{Identity, LogRecord, Payload, RawSnapshot, TopicView};
use makeitmeme_host_core::{Ack, RemoteLog, SnapshotStream, StreamItem};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::subscription::{FeedUpdate, Subscription, SubscriptionError, SubscriptionHandle};

/// Local state of one remotely subscribed topic.
struct TopicState {
    /// Bumped every time the topic is (re)attached, so a stale pump can
    /// never touch a newer attachment.
    generation: u64,
    view: Arc<TopicView>,
    snapshots_applied: u64,
    observers: BTreeMap<u64, mpsc::UnboundedSender<FeedUpdate>>,
    pump: Option<JoinHandle<()>>,
}

#[derive(Default)]
struct Inner {
    topics: HashMap<String, TopicState>,
    next_observer: u64,
    next_generation: u64,
}

type Shared = Arc<Mutex<Inner>>;

fn lock(inner: &Mutex<Inner>) -> MutexGuard<'_, Inner> {
    inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Maintains ordered local views of remote topics.
///
/// All state changes happen under a short, non-async critical section, so
/// the synchronizer behaves like a single logical event loop regardless of
/// the runtime flavour.
pub struct FeedSynchronizer {
    remote: Arc<dyn RemoteLog>,
    clock: Arc<dyn Clock>,
    inner: Shared,
}

impl FeedSynchronizer {
    pub fn new(remote: Arc<dyn RemoteLog>, clock: Arc<dyn Clock>) -> Self {
        Self {
            remote,
            clock,
            inner: Arc::new(Mutex::new(Inner::default())),
        }
    }

    /// Register a local observer of `topic`.
    ///
    /// The first observer of a topic opens the remote subscription; later
    /// observers share it and immediately receive the current view if one
    /// has been applied already.
    pub async fn subscribe(&self, topic: &str) -> MemeResult<Subscription> {
        if let Some(subscription) = self.attach_observer(topic) {
            return Ok(subscription);
        }

        let stream = self.remote.subscribe_topic(topic).await.map_err(|e| match e {
            MemeError::Subscription { .. } => e,
            other => MemeError::subscription(topic, other.to_string()),
        })?;

        // Another caller may have attached the topic while we were waiting
        // on the remote; in that case our stream is simply dropped.
        if let Some(subscription) = self.attach_observer(topic) {
            tracing::debug!(%topic, "Topic attached concurrently, dropping extra stream");
            return Ok(subscription);
        }

        let mut inner = lock(&self.inner);
        inner.next_generation += 1;
        let generation = inner.next_generation;
        let pump = tokio::spawn(pump(
            Arc::clone(&self.inner),
            topic.to_string(),
            generation,
            stream,
        ));
        inner.topics.insert(
            topic.to_string(),
            TopicState {
                generation,
                view: Arc::new(TopicView::default()),
                snapshots_applied: 0,
                observers: BTreeMap::new(),
                pump: Some(pump),
            },
        );
        let subscription = add_observer(&mut inner, topic);

        tracing::info!(%topic, generation, "Subscribed to topic");
        Ok(subscription)
    }

    /// Attach to an already subscribed topic, if there is one.
    fn attach_observer(&self, topic: &str) -> Option<Subscription> {
        let mut inner = lock(&self.inner);
        if !inner.topics.contains_key(topic) {
            return None;
        }
        let subscription = add_observer(&mut inner, topic);
        tracing::debug!(%topic, "Observer joined existing topic subscription");
        Some(subscription)
    }

    /// Detach an observer. Idempotent. The last observer leaving closes the
    /// remote subscription; publishes already in flight are unaffected.
    pub fn unsubscribe(&self, handle: &SubscriptionHandle) {
        let mut inner = lock(&self.inner);
        let Some(state) = inner.topics.get_mut(&handle.topic) else {
            return;
        };
        if state.observers.remove(&handle.id).is_none() {
            return;
        }
        tracing::debug!(topic = %handle.topic, observer = handle.id, "Observer detached");

        if state.observers.is_empty() {
            if let Some(state) = inner.topics.remove(&handle.topic) {
                if let Some(pump) = state.pump {
                    pump.abort();
                }
            }
            tracing::info!(topic = %handle.topic, "Last observer left, topic detached");
        }
    }

    /// Merge a full snapshot into the topic's view and notify every observer
    /// exactly once. Returns `false` when nobody is subscribed to `topic`.
    ///
    /// This is what the topic's pump calls for every delivery; hosts that
    /// drive snapshots themselves may call it directly.
    pub fn on_snapshot(&self, topic: &str, raw: &RawSnapshot) -> bool {
        let generation = match lock(&self.inner).topics.get(topic) {
            Some(state) => state.generation,
            None => return false,
        };
        apply_snapshot(&self.inner, topic, generation, raw)
    }

    /// Current canonical view of `topic`, if it is subscribed.
    pub fn view(&self, topic: &str) -> Option<Arc<TopicView>> {
        lock(&self.inner)
            .topics
            .get(topic)
            .map(|state| Arc::clone(&state.view))
    }

    pub fn is_subscribed(&self, topic: &str) -> bool {
        lock(&self.inner).topics.contains_key(topic)
    }

    pub fn observer_count(&self, topic: &str) -> usize {
        lock(&self.inner)
            .topics
            .get(topic)
            .map(|state| state.observers.len())
            .unwrap_or(0)
    }

    /// Snapshots merged for the current attachment of `topic`.
    pub fn snapshots_applied(&self, topic: &str) -> u64 {
        lock(&self.inner)
            .topics
            .get(topic)
            .map(|state| state.snapshots_applied)
            .unwrap_or(0)
    }

    /// Submit a record to the remote log. The local view is not touched;
    /// the record becomes visible once a later snapshot includes it.
    pub async fn publish(&self, topic: &str, record: &LogRecord) -> MemeResult<Ack> {
        match self.remote.push_record(topic, record).await {
            Ok(ack) => {
                tracing::info!(%topic, key = %ack.key, "Record published");
                Ok(ack)
            }
            Err(e) => {
                tracing::warn!(%topic, error = %e, "Publish failed");
                Err(match e {
                    MemeError::Publish { .. } => e,
                    other => MemeError::publish(other.to_string()),
                })
            }
        }
    }

    /// Publish a chat message. Blank text is rejected before any remote call.
    pub async fn publish_message(
        &self,
        topic: &str,
        author: &Identity,
        text: &str,
    ) -> MemeResult<Ack> {
        if text.trim().is_empty() {
            return Err(MemeError::EmptyMessage);
        }
        let record = LogRecord::message(
            author.author_label(),
            Payload::Text(text.to_string()),
            self.clock.now_ms(),
        );
        self.publish(topic, &record).await
    }

    /// Publish a reaction to `target_ref` (a feed event id, typically).
    pub async fn publish_reaction(
        &self,
        topic: &str,
        user: &Identity,
        target_ref: Option<&str>,
    ) -> MemeResult<Ack> {
        let record = LogRecord::reaction(
            user.author_label(),
            target_ref.map(str::to_string),
            self.clock.now_ms(),
        );
        self.publish(topic, &record).await
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }
}

impl Drop for FeedSynchronizer {
    fn drop(&mut self) {
        let mut inner = lock(&self.inner);
        for (_, state) in inner.topics.drain() {
            if let Some(pump) = state.pump {
                pump.abort();
            }
        }
    }
}

fn add_observer(inner: &mut Inner, topic: &str) -> Subscription {
    inner.next_observer += 1;
    let id = inner.next_observer;
    let (tx, rx) = mpsc::unbounded_channel();

    if let Some(state) = inner.topics.get_mut(topic) {
        if state.snapshots_applied > 0 {
            let _ = tx.send(FeedUpdate::Snapshot(Arc::clone(&state.view)));
        }
        state.observers.insert(id, tx);
    }

    Subscription::new(
        SubscriptionHandle {
            id,
            topic: topic.to_string(),
        },
        rx,
    )
}

/// Replace the view and notify observers. Returns `false` when the
/// attachment is gone, which tells the pump to stop.
fn apply_snapshot(inner: &Mutex<Inner>, topic: &str, generation: u64, raw: &RawSnapshot) -> bool {
    let mut guard = lock(inner);
    let Some(state) = guard.topics.get_mut(topic) else {
        return false;
    };
    if state.generation != generation {
        return false;
    }

    let view = Arc::new(TopicView::from_snapshot(raw));
    state.view = Arc::clone(&view);
    state.snapshots_applied += 1;
    state
        .observers
        .retain(|_, tx| tx.send(FeedUpdate::Snapshot(Arc::clone(&view))).is_ok());

    tracing::debug!(
        %topic,
        records = raw.len(),
        events = view.events.len(),
        reactions = view.reactions.len(),
        observers = state.observers.len(),
        "Snapshot applied"
    );

    if state.observers.is_empty() {
        guard.topics.remove(topic);
        tracing::info!(%topic, "All observers gone, topic detached");
        return false;
    }
    true
}

/// Deliver a terminal failure to every observer once and detach the topic.
fn fail_topic(inner: &Mutex<Inner>, topic: &str, generation: u64, message: String) {
    let mut guard = lock(inner);
    let is_current = guard
        .topics
        .get(topic)
        .is_some_and(|state| state.generation == generation);
    if !is_current {
        return;
    }
    let Some(state) = guard.topics.remove(topic) else {
        return;
    };
    drop(guard);

    tracing::warn!(%topic, %message, observers = state.observers.len(), "Topic subscription failed");
    let error = SubscriptionError {
        topic: topic.to_string(),
        message,
    };
    for tx in state.observers.into_values() {
        let _ = tx.send(FeedUpdate::Failed(error.clone()));
    }
}

async fn pump(inner: Shared, topic: String, generation: u64, mut stream: SnapshotStream) {
    while let Some(item) = stream.recv().await {
        match item {
            StreamItem::Snapshot(raw) => {
                if !apply_snapshot(&inner, &topic, generation, &raw) {
                    return;
                }
            }
            StreamItem::Fault(message) => {
                fail_topic(&inner, &topic, generation, message);
                return;
            }
        }
    }
    fail_topic(&inner, &topic, generation, "remote stream closed".to_string());
}
