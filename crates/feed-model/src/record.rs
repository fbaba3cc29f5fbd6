//! Keyed records as stored by the remote log.
//!
//! The log assigns each record a key on push; the body is an opaque JSON
//! object tagged by `type`. This is the in-process record shape only, the
//! transport beneath a [`RawSnapshot`] is up to the remote log.

use serde::{Deserialize, Serialize};

use crate::event::{FeedEvent, Payload, ReactionEvent};

/// A record exactly as the remote log delivered it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Log-assigned key; becomes the event id.
    pub key: String,

    /// JSON-encoded [`LogRecord`].
    pub body: String,
}

/// Unordered restatement of every record currently known for a topic.
/// May contain repeated keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSnapshot {
    pub records: Vec<RawRecord>,
}

impl RawSnapshot {
    pub fn new(records: Vec<RawRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Record body, before the log has assigned it a key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LogRecord {
    Message {
        author: String,
        payload: Payload,
        created_at: i64,
    },
    Reaction {
        user: String,
        target_ref: Option<String>,
        timestamp: i64,
    },
}

/// A decoded record, routed to the matching view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedEntry {
    Feed(FeedEvent),
    Reaction(ReactionEvent),
}

/// Error decoding a single record.
#[derive(Debug, thiserror::Error)]
#[error("malformed record '{key}': {source}")]
pub struct RecordError {
    pub key: String,
    #[source]
    pub source: serde_json::Error,
}

impl LogRecord {
    pub fn message(author: impl Into<String>, payload: Payload, created_at: i64) -> Self {
        Self::Message {
            author: author.into(),
            payload,
            created_at,
        }
    }

    pub fn reaction(user: impl Into<String>, target_ref: Option<String>, timestamp: i64) -> Self {
        Self::Reaction {
            user: user.into(),
            target_ref,
            timestamp,
        }
    }

    /// Serialize the body for pushing.
    pub fn to_body(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Attach the log-assigned key.
    pub fn into_entry(self, key: impl Into<String>) -> DecodedEntry {
        let id = key.into();
        match self {
            LogRecord::Message {
                author,
                payload,
                created_at,
            } => DecodedEntry::Feed(FeedEvent {
                id,
                author,
                payload,
                created_at,
            }),
            LogRecord::Reaction {
                user,
                target_ref,
                timestamp,
            } => DecodedEntry::Reaction(ReactionEvent {
                id,
                user,
                target_ref,
                timestamp,
            }),
        }
    }
}

impl RawRecord {
    pub fn new(key: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            body: body.into(),
        }
    }

    /// Build a record from a body, as a log would after assigning `key`.
    pub fn encode(key: impl Into<String>, record: &LogRecord) -> Result<Self, serde_json::Error> {
        Ok(Self::new(key, record.to_body()?))
    }

    pub fn decode(&self) -> Result<DecodedEntry, RecordError> {
        serde_json::from_str::<LogRecord>(&self.body)
            .map(|record| record.into_entry(self.key.clone()))
            .map_err(|source| RecordError {
                key: self.key.clone(),
                source,
            })
    }
}

/// Decoded content of a snapshot, still unmerged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedSnapshot {
    pub events: Vec<FeedEvent>,
    pub reactions: Vec<ReactionEvent>,
    /// Records that failed to decode and were dropped.
    pub skipped: usize,
}

/// Decode every record of a snapshot. Malformed records are skipped with a
/// warning rather than failing the whole snapshot.
pub fn decode_snapshot(snapshot: &RawSnapshot) -> DecodedSnapshot {
    let mut decoded = DecodedSnapshot::default();
    for record in &snapshot.records {
        match record.decode() {
            Ok(DecodedEntry::Feed(event)) => decoded.events.push(event),
            Ok(DecodedEntry::Reaction(reaction)) => decoded.reactions.push(reaction),
            Err(e) => {
                tracing::warn!(key = %e.key, error = %e.source, "Skipping undecodable record");
                decoded.skipped += 1;
            }
        }
    }
    decoded
}
