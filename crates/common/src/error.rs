//! Error types shared across MakeItMeme crates.

use std::path::PathBuf;

/// Top-level error type for MakeItMeme operations.
///
/// Every kind is recoverable; callers decide whether to retry, surface the
/// failure to the user, or abandon the operation.
#[derive(Debug, thiserror::Error)]
pub enum MemeError {
    #[error("Decode error: {message}")]
    Decode { message: String },

    #[error("Encode error: {message}")]
    Encode { message: String },

    #[error("Edit budget exhausted: commit the draft to reset it")]
    BudgetExhausted,

    #[error("No alternative asset available")]
    NoAlternative,

    #[error("Save error: {message}")]
    Save { message: String },

    #[error("Publish error: {message}")]
    Publish { message: String },

    #[error("Subscription error on '{topic}': {message}")]
    Subscription { topic: String, message: String },

    #[error("Message is empty")]
    EmptyMessage,

    #[error("Invalid credential: {message}")]
    InvalidCredential { message: String },

    #[error("User not found: {email}")]
    UserNotFound { email: String },

    #[error("Email already in use: {email}")]
    EmailInUse { email: String },

    #[error("Password too weak: {message}")]
    WeakPassword { message: String },

    #[error("Network error: {message}")]
    Network { message: String },

    #[error("Asset not found: {id}")]
    AssetNotFound { id: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using MemeError.
pub type MemeResult<T> = Result<T, MemeError>;

impl MemeError {
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode {
            message: msg.into(),
        }
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode {
            message: msg.into(),
        }
    }

    pub fn save(msg: impl Into<String>) -> Self {
        Self::Save {
            message: msg.into(),
        }
    }

    pub fn publish(msg: impl Into<String>) -> Self {
        Self::Publish {
            message: msg.into(),
        }
    }

    pub fn subscription(topic: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Subscription {
            topic: topic.into(),
            message: msg.into(),
        }
    }

    pub fn invalid_credential(msg: impl Into<String>) -> Self {
        Self::InvalidCredential {
            message: msg.into(),
        }
    }

    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Whether this error came from the edit budget rules rather than I/O.
    pub fn is_budget_rule(&self) -> bool {
        matches!(self, Self::BudgetExhausted | Self::NoAlternative)
    }
}
