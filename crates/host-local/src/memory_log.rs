//! Process-local shared log.
//!
//! Behaves like a realtime database topic listener: every subscriber gets
//! the full current snapshot right away and again after every change. Keys
//! are assigned in push order and sort lexicographically in that order.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use makeitmeme_common::error::{MemeError, MemeResult};
use makeitmeme_feed_model::{LogRecord, RawRecord, RawSnapshot};
use makeitmeme_host_core::{Ack, RemoteLog, SnapshotStream, StreamItem};
use tokio::sync::mpsc;

#[derive(Default)]
struct Topic {
    records: Vec<RawRecord>,
    subscribers: Vec<mpsc::UnboundedSender<StreamItem>>,
}

impl Topic {
    fn snapshot(&self) -> RawSnapshot {
        RawSnapshot::new(self.records.clone())
    }

    /// Send `item` to every live subscriber, dropping closed ones.
    fn fan_out(&mut self, item: StreamItem) {
        self.subscribers.retain(|tx| tx.send(item.clone()).is_ok());
    }
}

#[derive(Default)]
struct State {
    topics: HashMap<String, Topic>,
    next_key: u64,
    offline: bool,
}

/// In-memory [`RemoteLog`].
#[derive(Default)]
pub struct InMemoryRemoteLog {
    state: Mutex<State>,
}

impl InMemoryRemoteLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// While offline, pushes and new subscriptions fail with a network-style
    /// error. Existing streams stay open.
    pub fn set_offline(&self, offline: bool) {
        self.lock().offline = offline;
    }

    /// Records currently stored under `path`, in push order.
    pub fn records(&self, path: &str) -> Vec<RawRecord> {
        self.lock()
            .topics
            .get(path)
            .map(|topic| topic.records.clone())
            .unwrap_or_default()
    }

    /// Number of open subscriber streams on `path`.
    pub fn subscriber_count(&self, path: &str) -> usize {
        let mut state = self.lock();
        match state.topics.get_mut(path) {
            Some(topic) => {
                topic.subscribers.retain(|tx| !tx.is_closed());
                topic.subscribers.len()
            }
            None => 0,
        }
    }

    /// Deliver an arbitrary snapshot to current subscribers without touching
    /// stored records. Used to replay duplicate or out-of-order deliveries.
    pub fn inject_snapshot(&self, path: &str, snapshot: RawSnapshot) {
        let mut state = self.lock();
        if let Some(topic) = state.topics.get_mut(path) {
            topic.fan_out(StreamItem::Snapshot(snapshot));
        }
    }

    /// Fault every subscription on `path`. The streams are closed afterwards.
    pub fn inject_fault(&self, path: &str, message: impl Into<String>) {
        let message = message.into();
        let mut state = self.lock();
        if let Some(topic) = state.topics.get_mut(path) {
            tracing::warn!(topic = %path, %message, "Faulting topic subscriptions");
            topic.fan_out(StreamItem::Fault(message));
            topic.subscribers.clear();
        }
    }
}

#[async_trait::async_trait]
impl RemoteLog for InMemoryRemoteLog {
    async fn subscribe_topic(&self, path: &str) -> MemeResult<SnapshotStream> {
        let mut state = self.lock();
        if state.offline {
            return Err(MemeError::subscription(path, "remote log unreachable"));
        }

        let (tx, rx) = mpsc::unbounded_channel();
        let topic = state.topics.entry(path.to_string()).or_default();
        // Receiver is still alive, so this cannot fail.
        let _ = tx.send(StreamItem::Snapshot(topic.snapshot()));
        topic.subscribers.push(tx);

        tracing::debug!(topic = %path, "Remote subscription opened");
        Ok(rx)
    }

    async fn push_record(&self, path: &str, record: &LogRecord) -> MemeResult<Ack> {
        let body = record
            .to_body()
            .map_err(|e| MemeError::publish(format!("Failed to encode record: {e}")))?;

        let mut state = self.lock();
        if state.offline {
            return Err(MemeError::publish("remote log unreachable"));
        }

        let key = format!("-{:016}", state.next_key);
        state.next_key += 1;

        let topic = state.topics.entry(path.to_string()).or_default();
        topic.records.push(RawRecord::new(key.clone(), body));
        let snapshot = topic.snapshot();
        topic.fan_out(StreamItem::Snapshot(snapshot));

        tracing::debug!(topic = %path, %key, "Record appended");
        Ok(Ack { key })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use makeitmeme_feed_model::Payload;

    fn message(text: &str, t: i64) -> LogRecord {
        LogRecord::message("ana@example.com", Payload::Text(text.into()), t)
    }

    #[tokio::test]
    async fn test_subscribe_delivers_current_snapshot_first() {
        let log = InMemoryRemoteLog::new();
        log.push_record("messages", &message("hi", 1)).await.unwrap();

        let mut stream = log.subscribe_topic("messages").await.unwrap();
        match stream.recv().await.unwrap() {
            StreamItem::Snapshot(snapshot) => assert_eq!(snapshot.len(), 1),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_push_fans_out_full_snapshots() {
        let log = InMemoryRemoteLog::new();
        let mut stream = log.subscribe_topic("messages").await.unwrap();
        let _initial = stream.recv().await.unwrap();

        log.push_record("messages", &message("a", 1)).await.unwrap();
        log.push_record("messages", &message("b", 2)).await.unwrap();

        let sizes: Vec<usize> = [stream.recv().await.unwrap(), stream.recv().await.unwrap()]
            .into_iter()
            .map(|item| match item {
                StreamItem::Snapshot(s) => s.len(),
                StreamItem::Fault(f) => panic!("fault {f}"),
            })
            .collect();
        assert_eq!(sizes, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_keys_sort_in_push_order() {
        let log = InMemoryRemoteLog::new();
        let a = log.push_record("t", &message("a", 1)).await.unwrap();
        let b = log.push_record("t", &message("b", 1)).await.unwrap();
        assert!(a.key < b.key);
    }

    #[tokio::test]
    async fn test_offline_rejects_push_and_subscribe() {
        let log = InMemoryRemoteLog::new();
        log.set_offline(true);
        assert!(matches!(
            log.push_record("t", &message("a", 1)).await,
            Err(MemeError::Publish { .. })
        ));
        assert!(matches!(
            log.subscribe_topic("t").await,
            Err(MemeError::Subscription { .. })
        ));
        assert!(log.records("t").is_empty());
    }

    #[tokio::test]
    async fn test_fault_closes_streams() {
        let log = InMemoryRemoteLog::new();
        let mut stream = log.subscribe_topic("t").await.unwrap();
        let _initial = stream.recv().await.unwrap();

        log.inject_fault("t", "permission denied");
        assert_eq!(
            stream.recv().await,
            Some(StreamItem::Fault("permission denied".into()))
        );
        assert_eq!(stream.recv().await, None);
        assert_eq!(log.subscriber_count("t"), 0);
    }
}
