//! Canonical local views of a topic.
//!
//! A snapshot is merged in two steps: deduplicate by id (keeping the
//! greatest entry under the entry's `Ord`, i.e. the latest `created_at`),
//! then sort ascending by `(created_at, id)`. The result replaces the
//! previous view wholesale; there is no incremental patching.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use crate::event::{FeedEntry, FeedEvent, ReactionEvent};
use crate::record::{decode_snapshot, RawSnapshot};

/// Deduplicate and order a multiset of entries.
pub fn merge_snapshot<T: FeedEntry>(raw: impl IntoIterator<Item = T>) -> Vec<T> {
    let mut by_id: BTreeMap<String, T> = BTreeMap::new();
    for entry in raw {
        match by_id.entry(entry.id().to_string()) {
            Entry::Vacant(slot) => {
                slot.insert(entry);
            }
            Entry::Occupied(mut slot) => {
                if entry > *slot.get() {
                    slot.insert(entry);
                }
            }
        }
    }

    let mut merged: Vec<T> = by_id.into_values().collect();
    merged.sort();
    merged
}

/// Ordered, duplicate-free sequence of entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFeedView<T> {
    entries: Vec<T>,
}

impl<T> Default for LocalFeedView<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T: FeedEntry> LocalFeedView<T> {
    /// Build the canonical view of a raw multiset.
    pub fn from_raw(raw: impl IntoIterator<Item = T>) -> Self {
        Self {
            entries: merge_snapshot(raw),
        }
    }

    pub fn entries(&self) -> &[T] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.entries.iter().find(|entry| entry.id() == id)
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Most recent entry.
    pub fn last(&self) -> Option<&T> {
        self.entries.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.entries.iter()
    }
}

impl<'a, T> IntoIterator for &'a LocalFeedView<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Everything a topic currently shows: feed events and, separately,
/// reactions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicView {
    pub events: LocalFeedView<FeedEvent>,
    pub reactions: LocalFeedView<ReactionEvent>,
}

impl TopicView {
    /// Decode and merge a raw snapshot.
    pub fn from_snapshot(snapshot: &RawSnapshot) -> Self {
        let decoded = decode_snapshot(snapshot);
        Self {
            events: LocalFeedView::from_raw(decoded.events),
            reactions: LocalFeedView::from_raw(decoded.reactions),
        }
    }

    /// Number of reactions pointing at `target_ref`.
    pub fn reaction_count(&self, target_ref: &str) -> usize {
        self.reactions
            .iter()
            .filter(|r| r.target_ref.as_deref() == Some(target_ref))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{LogRecord, RawRecord};

    fn ev(id: &str, t: i64) -> FeedEvent {
        FeedEvent::text(id, "ana@example.com", "hi", t)
    }

    #[test]
    fn test_duplicate_keeps_latest_created_at() {
        let view = LocalFeedView::from_raw(vec![ev("a", 10), ev("a", 7)]);
        assert_eq!(view.entries(), &[ev("a", 10)]);
    }

    #[test]
    fn test_sorted_ascending_by_created_at() {
        let view = LocalFeedView::from_raw(vec![ev("2", 5), ev("1", 10)]);
        assert_eq!(view.entries(), &[ev("2", 5), ev("1", 10)]);
    }

    #[test]
    fn test_created_at_tie_orders_by_id() {
        let view = LocalFeedView::from_raw(vec![ev("b", 5), ev("a", 5)]);
        let ids: Vec<&str> = view.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_exact_duplicate_with_different_bodies_is_deterministic() {
        let first = FeedEvent::text("a", "ana@example.com", "one", 5);
        let second = FeedEvent::text("a", "ana@example.com", "two", 5);
        let forward = LocalFeedView::from_raw(vec![first.clone(), second.clone()]);
        let backward = LocalFeedView::from_raw(vec![second.clone(), first]);
        assert_eq!(forward, backward);
        assert_eq!(forward.entries(), &[second]);
    }

    #[test]
    fn test_empty_snapshot_yields_empty_view() {
        let view: LocalFeedView<FeedEvent> = LocalFeedView::from_raw(Vec::new());
        assert!(view.is_empty());
        assert!(view.last().is_none());
    }

    #[test]
    fn test_topic_view_splits_reactions() {
        let snapshot = RawSnapshot::new(vec![
            RawRecord::encode(
                "m1",
                &LogRecord::message("ana@example.com", crate::Payload::Text("hi".into()), 1),
            )
            .unwrap(),
            RawRecord::encode("r1", &LogRecord::reaction("bob", Some("m1".into()), 2)).unwrap(),
            RawRecord::encode("r2", &LogRecord::reaction("cid", Some("m1".into()), 3)).unwrap(),
            RawRecord::encode("r2", &LogRecord::reaction("cid", Some("m1".into()), 3)).unwrap(),
        ]);

        let view = TopicView::from_snapshot(&snapshot);
        assert_eq!(view.events.len(), 1);
        assert_eq!(view.reactions.len(), 2);
        assert_eq!(view.reaction_count("m1"), 2);
        assert!(view.events.contains_id("m1"));
    }
}
