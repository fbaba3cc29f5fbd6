//! Filesystem persistence with an append-only media index.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use makeitmeme_common::clock::{format_rfc3339, Clock};
use makeitmeme_common::error::{MemeError, MemeResult};
use makeitmeme_feed_model::ArtifactRef;
use makeitmeme_host_core::PersistenceSink;
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;

/// File name of the media index inside the output directory.
pub const INDEX_FILE_NAME: &str = "index.jsonl";

/// One line of the media index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub name: String,
    pub location: String,
    pub mime: String,
    pub indexed_at: String,
}

/// Saves artifacts as files in one directory.
///
/// Files are written to a temporary name and renamed into place, so a
/// failed save never leaves a truncated artifact behind. Existing files are
/// never overwritten; a numeric suffix is added instead.
pub struct FsPersistenceSink {
    dir: PathBuf,
    clock: Arc<dyn Clock>,
}

impl FsPersistenceSink {
    pub fn new(dir: impl Into<PathBuf>, clock: Arc<dyn Clock>) -> Self {
        Self {
            dir: dir.into(),
            clock,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn index_path(&self) -> PathBuf {
        self.dir.join(INDEX_FILE_NAME)
    }

    /// Read back every index entry (for tooling and tests).
    pub async fn read_index(&self) -> MemeResult<Vec<IndexEntry>> {
        let content = match tokio::fs::read_to_string(self.index_path()).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| serde_json::from_str(line).map_err(MemeError::from))
            .collect()
    }

    async fn free_path(&self, suggested_name: &str) -> PathBuf {
        let candidate = self.dir.join(suggested_name);
        if !path_exists(&candidate).await {
            return candidate;
        }

        let (stem, ext) = split_name(suggested_name);
        let mut n = 1u32;
        loop {
            let name = match ext {
                Some(ext) => format!("{stem}_{n}.{ext}"),
                None => format!("{stem}_{n}"),
            };
            let candidate = self.dir.join(name);
            if !path_exists(&candidate).await {
                return candidate;
            }
            n += 1;
        }
    }
}

async fn path_exists(path: &Path) -> bool {
    tokio::fs::try_exists(path).await.unwrap_or(false)
}

fn split_name(name: &str) -> (&str, Option<&str>) {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
        _ => (name, None),
    }
}

fn sanitize_name(name: &str) -> MemeResult<&str> {
    let trimmed = name.trim();
    if trimmed.is_empty() || trimmed.contains(['/', '\\']) || trimmed.starts_with('.') {
        return Err(MemeError::save(format!("invalid artifact name '{name}'")));
    }
    Ok(trimmed)
}

#[async_trait::async_trait]
impl PersistenceSink for FsPersistenceSink {
    async fn save(&self, bytes: &[u8], suggested_name: &str) -> MemeResult<ArtifactRef> {
        let name = sanitize_name(suggested_name)?;

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| MemeError::save(format!("Failed to create {}: {e}", self.dir.display())))?;

        let path = self.free_path(name).await;
        let tmp = path.with_extension("partial");

        tokio::fs::write(&tmp, bytes)
            .await
            .map_err(|e| MemeError::save(format!("Failed to write {}: {e}", tmp.display())))?;
        if let Err(e) = tokio::fs::rename(&tmp, &path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(MemeError::save(format!(
                "Failed to move artifact into {}: {e}",
                path.display()
            )));
        }

        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(name)
            .to_string();

        tracing::info!(path = %path.display(), bytes = bytes.len(), "Artifact saved");
        Ok(ArtifactRef::new(file_name, path.display().to_string()))
    }

    async fn notify_index(&self, artifact: &ArtifactRef) -> MemeResult<()> {
        let entry = IndexEntry {
            name: artifact.name.clone(),
            location: artifact.location.clone(),
            mime: "image/png".to_string(),
            indexed_at: format_rfc3339(self.clock.now_ms()),
        };
        let mut line = serde_json::to_string(&entry)?;
        line.push('\n');

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.index_path())
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;

        tracing::debug!(name = %artifact.name, "Artifact indexed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use makeitmeme_common::clock::ManualClock;

    fn temp_sink(name: &str) -> (FsPersistenceSink, PathBuf) {
        let dir = std::env::temp_dir().join(name);
        let _ = std::fs::remove_dir_all(&dir);
        (
            FsPersistenceSink::new(&dir, Arc::new(ManualClock::new(0))),
            dir,
        )
    }

    #[tokio::test]
    async fn test_save_writes_bytes_and_returns_ref() {
        let (sink, dir) = temp_sink("makeitmeme_test_sink_save");
        let artifact = sink.save(b"png-bytes", "meme_1.png").await.unwrap();

        assert_eq!(artifact.name, "meme_1.png");
        assert_eq!(std::fs::read(dir.join("meme_1.png")).unwrap(), b"png-bytes");
        assert!(!dir.join("meme_1.partial").exists());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_save_never_overwrites() {
        let (sink, dir) = temp_sink("makeitmeme_test_sink_collision");
        let first = sink.save(b"one", "meme_1.png").await.unwrap();
        let second = sink.save(b"two", "meme_1.png").await.unwrap();

        assert_eq!(first.name, "meme_1.png");
        assert_eq!(second.name, "meme_1_1.png");
        assert_eq!(std::fs::read(dir.join("meme_1.png")).unwrap(), b"one");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_save_rejects_path_like_names() {
        let (sink, _dir) = temp_sink("makeitmeme_test_sink_names");
        assert!(matches!(
            sink.save(b"x", "../escape.png").await,
            Err(MemeError::Save { .. })
        ));
        assert!(matches!(sink.save(b"x", "  ").await, Err(MemeError::Save { .. })));
    }

    #[tokio::test]
    async fn test_notify_index_appends_entries() {
        let (sink, dir) = temp_sink("makeitmeme_test_sink_index");
        let a = sink.save(b"a", "meme_1.png").await.unwrap();
        let b = sink.save(b"b", "meme_2.png").await.unwrap();
        sink.notify_index(&a).await.unwrap();
        sink.notify_index(&b).await.unwrap();

        let index = sink.read_index().await.unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(index[0].name, "meme_1.png");
        assert_eq!(index[1].mime, "image/png");
        assert_eq!(index[1].indexed_at, "1970-01-01T00:00:00+00:00");

        let _ = std::fs::remove_dir_all(&dir);
    }
}
