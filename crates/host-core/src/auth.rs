//! Authentication contract.
//!
//! The core only needs the resolved [`Identity`] to stamp as the author of
//! published events; credential exchange is entirely the provider's job.

use makeitmeme_common::error::{MemeError, MemeResult};
use makeitmeme_feed_model::Identity;
use serde::{Deserialize, Serialize};

/// Shortest password a provider should accept on sign-up.
pub const MIN_PASSWORD_LEN: usize = 6;

/// What a user presents to sign in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Credential {
    EmailPassword { email: String, password: String },
    /// Token issued by an external identity provider.
    IdToken { token: String },
}

/// Sign-in and account management.
#[async_trait::async_trait]
pub trait AuthProvider: Send + Sync {
    /// Fails with `InvalidCredential` or `Network`.
    async fn sign_in(&self, credential: &Credential) -> MemeResult<Identity>;

    /// Fails with `EmailInUse`, `WeakPassword`, `InvalidCredential` or `Network`.
    async fn sign_up(&self, email: &str, password: &str) -> MemeResult<Identity>;

    /// Fails with `UserNotFound` or `Network`.
    async fn reset_password(&self, email: &str) -> MemeResult<()>;
}

/// Trim and lowercase an email; reject obviously malformed ones.
pub fn normalize_email(email: &str) -> MemeResult<String> {
    let email = email.trim().to_lowercase();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(email),
        _ => Err(MemeError::invalid_credential(format!(
            "'{email}' is not an email address"
        ))),
    }
}

/// Check a new password against the provider's minimum policy.
pub fn check_password_strength(password: &str) -> MemeResult<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(MemeError::WeakPassword {
            message: format!("must be at least {MIN_PASSWORD_LEN} characters"),
        });
    }
    Ok(())
}
