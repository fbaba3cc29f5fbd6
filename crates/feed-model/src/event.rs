//! Feed event types.
//!
//! Events are immutable once observed. Their identity is the log-assigned
//! `id`; their position in a view is decided by `(created_at, id)`.

use std::cmp::Ordering;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::asset::ArtifactRef;
use crate::identity::Identity;

/// An entry that can live in a [`LocalFeedView`](crate::view::LocalFeedView).
///
/// The `Ord` implementation must compare `created_at` first and `id` second;
/// any remaining fields only break ties between same-id duplicates.
pub trait FeedEntry: Clone + Ord {
    /// Log-assigned identifier.
    fn id(&self) -> &str;

    /// Creation time in milliseconds since the Unix epoch.
    fn created_at(&self) -> i64;
}

/// What a feed event carries.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Payload {
    /// Freeform chat text.
    Text(String),
    /// A committed meme.
    Artifact(ArtifactRef),
}

impl Payload {
    /// Human-readable rendition for feed rows.
    pub fn summary(&self) -> String {
        match self {
            Payload::Text(text) => text.clone(),
            Payload::Artifact(artifact) => format!("Meme generated from {}", artifact.name),
        }
    }
}

/// A message or published meme on a topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedEvent {
    /// Log-assigned identifier.
    pub id: String,

    /// Author label (the publisher's email, or `"unknown"`).
    pub author: String,

    /// Message text or artifact reference.
    pub payload: Payload,

    /// Creation time in milliseconds since the Unix epoch.
    pub created_at: i64,
}

impl FeedEvent {
    pub fn text(
        id: impl Into<String>,
        author: impl Into<String>,
        text: impl Into<String>,
        created_at: i64,
    ) -> Self {
        Self {
            id: id.into(),
            author: author.into(),
            payload: Payload::Text(text.into()),
            created_at,
        }
    }

    pub fn artifact(
        id: impl Into<String>,
        author: impl Into<String>,
        artifact: ArtifactRef,
        created_at: i64,
    ) -> Self {
        Self {
            id: id.into(),
            author: author.into(),
            payload: Payload::Artifact(artifact),
            created_at,
        }
    }

    /// Whether `identity` wrote this event (own-message bubbles).
    pub fn is_authored_by(&self, identity: &Identity) -> bool {
        self.author == identity.author_label()
    }

    /// `HH:MM` in the given UTC offset.
    pub fn display_time(&self, offset: FixedOffset) -> String {
        format_hhmm(self.created_at, offset)
    }
}

impl Ord for FeedEvent {
    fn cmp(&self, other: &Self) -> Ordering {
        self.created_at
            .cmp(&other.created_at)
            .then_with(|| self.id.cmp(&other.id))
            .then_with(|| self.author.cmp(&other.author))
            .then_with(|| self.payload.cmp(&other.payload))
    }
}

impl PartialOrd for FeedEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl FeedEntry for FeedEvent {
    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> i64 {
        self.created_at
    }
}

/// A reaction ("like") to a feed item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionEvent {
    /// Log-assigned identifier.
    pub id: String,

    /// Reacting user.
    pub user: String,

    /// What was reacted to, when known.
    pub target_ref: Option<String>,

    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl Ord for ReactionEvent {
    fn cmp(&self, other: &Self) -> Ordering {
        self.timestamp
            .cmp(&other.timestamp)
            .then_with(|| self.id.cmp(&other.id))
            .then_with(|| self.user.cmp(&other.user))
            .then_with(|| self.target_ref.cmp(&other.target_ref))
    }
}

impl PartialOrd for ReactionEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl FeedEntry for ReactionEvent {
    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> i64 {
        self.timestamp
    }
}

fn format_hhmm(ms: i64, offset: FixedOffset) -> String {
    match DateTime::from_timestamp_millis(ms) {
        Some(utc) => utc.with_timezone(&offset).format("%H:%M").to_string(),
        None => "--:--".to_string(),
    }
}
