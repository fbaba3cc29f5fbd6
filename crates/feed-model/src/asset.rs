//! Base image identifiers and saved artifact references.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identifier of a base image in the fixed catalog.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(String);

impl AssetId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AssetId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Reference to an artifact persisted by the host.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ArtifactRef {
    /// File name the artifact was stored under (e.g. `meme_1700000000000.png`).
    pub name: String,

    /// Host-specific location (absolute path, URI, ...).
    pub location: String,
}

impl ArtifactRef {
    pub fn new(name: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
        }
    }
}

impl fmt::Display for ArtifactRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.location)
    }
}

/// Suggested file name for an artifact committed at `now_ms`.
pub fn suggested_artifact_name(now_ms: i64) -> String {
    format!("meme_{now_ms}.png")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_id_serializes_as_plain_string() {
        let id = AssetId::new("meme3");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"meme3\"");
    }

    #[test]
    fn test_suggested_artifact_name() {
        assert_eq!(suggested_artifact_name(1_700_000_000_123), "meme_1700000000123.png");
    }
}
