//! In-memory auth provider for offline use and tests.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use makeitmeme_common::error::{MemeError, MemeResult};
use makeitmeme_feed_model::Identity;
use makeitmeme_host_core::{check_password_strength, normalize_email, AuthProvider, Credential};

struct Account {
    identity: Identity,
    password: String,
}

#[derive(Default)]
struct State {
    accounts: HashMap<String, Account>,
    tokens: HashMap<String, Identity>,
    reset_requests: Vec<String>,
    next_uid: u64,
    offline: bool,
}

/// Accounts held in process memory. Nothing is persisted.
#[derive(Default)]
pub struct InMemoryAuthProvider {
    state: Mutex<State>,
}

impl InMemoryAuthProvider {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Accept `token` as an external identity token for `identity`.
    pub fn register_token(&self, token: impl Into<String>, identity: Identity) {
        self.lock().tokens.insert(token.into(), identity);
    }

    /// Every call fails with `Network` while offline.
    pub fn set_offline(&self, offline: bool) {
        self.lock().offline = offline;
    }

    /// Emails a password reset was requested for, in request order.
    pub fn reset_requests(&self) -> Vec<String> {
        self.lock().reset_requests.clone()
    }
}

fn ensure_online(state: &State) -> MemeResult<()> {
    if state.offline {
        return Err(MemeError::network("auth provider unreachable"));
    }
    Ok(())
}

#[async_trait::async_trait]
impl AuthProvider for InMemoryAuthProvider {
    async fn sign_in(&self, credential: &Credential) -> MemeResult<Identity> {
        let state = self.lock();
        ensure_online(&state)?;

        match credential {
            Credential::EmailPassword { email, password } => {
                let email = normalize_email(email)?;
                match state.accounts.get(&email) {
                    Some(account) if account.password == *password => {
                        tracing::info!(%email, "Signed in");
                        Ok(account.identity.clone())
                    }
                    _ => Err(MemeError::invalid_credential("wrong email or password")),
                }
            }
            Credential::IdToken { token } => state
                .tokens
                .get(token)
                .cloned()
                .ok_or_else(|| MemeError::invalid_credential("identity token rejected")),
        }
    }

    async fn sign_up(&self, email: &str, password: &str) -> MemeResult<Identity> {
        let mut state = self.lock();
        ensure_online(&state)?;

        let email = normalize_email(email)?;
        check_password_strength(password)?;
        if state.accounts.contains_key(&email) {
            return Err(MemeError::EmailInUse { email });
        }

        state.next_uid += 1;
        let identity = Identity {
            uid: format!("local-{}", state.next_uid),
            email: Some(email.clone()),
            display_name: None,
        };
        state.accounts.insert(
            email.clone(),
            Account {
                identity: identity.clone(),
                password: password.to_string(),
            },
        );

        tracing::info!(%email, "Account created");
        Ok(identity)
    }

    async fn reset_password(&self, email: &str) -> MemeResult<()> {
        let mut state = self.lock();
        ensure_online(&state)?;

        let email = normalize_email(email).map_err(|_| MemeError::UserNotFound {
            email: email.trim().to_string(),
        })?;
        if !state.accounts.contains_key(&email) {
            return Err(MemeError::UserNotFound { email });
        }
        state.reset_requests.push(email);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds(email: &str, password: &str) -> Credential {
        Credential::EmailPassword {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_sign_up_then_sign_in() {
        let auth = InMemoryAuthProvider::new();
        let created = auth.sign_up("Ana@Example.com", "secret").await.unwrap();
        let signed_in = auth.sign_in(&creds("ana@example.com", "secret")).await.unwrap();
        assert_eq!(created, signed_in);
        assert_eq!(signed_in.author_label(), "ana@example.com");
    }

    #[tokio::test]
    async fn test_sign_in_wrong_password() {
        let auth = InMemoryAuthProvider::new();
        auth.sign_up("ana@example.com", "secret").await.unwrap();
        assert!(matches!(
            auth.sign_in(&creds("ana@example.com", "nope")).await,
            Err(MemeError::InvalidCredential { .. })
        ));
    }

    #[tokio::test]
    async fn test_sign_up_collisions_and_weak_passwords() {
        let auth = InMemoryAuthProvider::new();
        auth.sign_up("ana@example.com", "secret").await.unwrap();
        assert!(matches!(
            auth.sign_up("ana@example.com", "another").await,
            Err(MemeError::EmailInUse { .. })
        ));
        assert!(matches!(
            auth.sign_up("bob@example.com", "123").await,
            Err(MemeError::WeakPassword { .. })
        ));
    }

    #[tokio::test]
    async fn test_token_sign_in() {
        let auth = InMemoryAuthProvider::new();
        let identity = Identity {
            uid: "g-1".into(),
            email: Some("cid@example.com".into()),
            display_name: Some("Cid".into()),
        };
        auth.register_token("tok", identity.clone());
        let token = Credential::IdToken {
            token: "tok".into(),
        };
        assert_eq!(auth.sign_in(&token).await.unwrap(), identity);
    }

    #[tokio::test]
    async fn test_reset_password() {
        let auth = InMemoryAuthProvider::new();
        auth.sign_up("ana@example.com", "secret").await.unwrap();
        auth.reset_password(" ana@example.com ").await.unwrap();
        assert_eq!(auth.reset_requests(), vec!["ana@example.com".to_string()]);
        assert!(matches!(
            auth.reset_password("ghost@example.com").await,
            Err(MemeError::UserNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_offline_is_network_error() {
        let auth = InMemoryAuthProvider::new();
        auth.set_offline(true);
        assert!(matches!(
            auth.sign_in(&creds("ana@example.com", "secret")).await,
            Err(MemeError::Network { .. })
        ));
    }
}
