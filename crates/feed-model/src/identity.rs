//! Resolved user identity, as returned by the auth provider.

use serde::{Deserialize, Serialize};

/// Author label used when an identity has no email.
pub const UNKNOWN_AUTHOR: &str = "unknown";

/// A signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Provider-assigned user id.
    pub uid: String,

    /// Email address, when the provider exposes one.
    pub email: Option<String>,

    /// Display name, when the provider exposes one.
    pub display_name: Option<String>,
}

impl Identity {
    /// String stamped into the `author` field of published events.
    pub fn author_label(&self) -> &str {
        self.email.as_deref().unwrap_or(UNKNOWN_AUTHOR)
    }

    /// Short greeting name: the local part of the email, else the display name.
    pub fn short_name(&self) -> &str {
        match self.email.as_deref() {
            Some(email) => email.split('@').next().unwrap_or(email),
            None => self.display_name.as_deref().unwrap_or(UNKNOWN_AUTHOR),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(email: Option<&str>, name: Option<&str>) -> Identity {
        Identity {
            uid: "u1".to_string(),
            email: email.map(str::to_string),
            display_name: name.map(str::to_string),
        }
    }

    #[test]
    fn test_author_label_falls_back_to_unknown() {
        assert_eq!(identity(Some("ana@example.com"), None).author_label(), "ana@example.com");
        assert_eq!(identity(None, Some("Ana")).author_label(), UNKNOWN_AUTHOR);
    }

    #[test]
    fn test_short_name() {
        assert_eq!(identity(Some("ana@example.com"), None).short_name(), "ana");
        assert_eq!(identity(None, Some("Ana")).short_name(), "Ana");
        assert_eq!(identity(None, None).short_name(), UNKNOWN_AUTHOR);
    }
}
