//! Base image catalogs.

use std::path::{Path, PathBuf};

use makeitmeme_common::error::{MemeError, MemeResult};
use makeitmeme_feed_model::AssetId;
use makeitmeme_host_core::AssetSource;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp"];

/// Catalog backed by the image files of one directory. Ids are file stems,
/// ordered by file name.
#[derive(Debug, Clone)]
pub struct DirectoryCatalog {
    root: PathBuf,
    entries: Vec<(AssetId, PathBuf)>,
}

impl DirectoryCatalog {
    /// Scan `root` once; the catalog is fixed afterwards.
    pub fn open(root: impl AsRef<Path>) -> MemeResult<Self> {
        let root = root.as_ref().to_path_buf();
        if !root.is_dir() {
            return Err(MemeError::FileNotFound { path: root });
        }

        let mut paths: Vec<PathBuf> = std::fs::read_dir(&root)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file() && has_image_extension(path))
            .collect();
        paths.sort();

        let entries: Vec<(AssetId, PathBuf)> = paths
            .into_iter()
            .filter_map(|path| {
                let stem = path.file_stem()?.to_str()?.to_string();
                Some((AssetId::new(stem), path))
            })
            .collect();

        tracing::debug!(root = %root.display(), assets = entries.len(), "Opened asset catalog");
        Ok(Self { root, entries })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

impl AssetSource for DirectoryCatalog {
    fn ids(&self) -> Vec<AssetId> {
        self.entries.iter().map(|(id, _)| id.clone()).collect()
    }

    fn load(&self, id: &AssetId) -> MemeResult<Vec<u8>> {
        let (_, path) = self
            .entries
            .iter()
            .find(|(candidate, _)| candidate == id)
            .ok_or_else(|| MemeError::AssetNotFound { id: id.to_string() })?;
        Ok(std::fs::read(path)?)
    }
}

/// Catalog held in memory, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    entries: Vec<(AssetId, Vec<u8>)>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an asset.
    pub fn with_asset(mut self, id: impl Into<AssetId>, bytes: Vec<u8>) -> Self {
        let id = id.into();
        match self.entries.iter_mut().find(|(candidate, _)| *candidate == id) {
            Some(entry) => entry.1 = bytes,
            None => self.entries.push((id, bytes)),
        }
        self
    }
}

impl AssetSource for InMemoryCatalog {
    fn ids(&self) -> Vec<AssetId> {
        self.entries.iter().map(|(id, _)| id.clone()).collect()
    }

    fn load(&self, id: &AssetId) -> MemeResult<Vec<u8>> {
        self.entries
            .iter()
            .find(|(candidate, _)| candidate == id)
            .map(|(_, bytes)| bytes.clone())
            .ok_or_else(|| MemeError::AssetNotFound { id: id.to_string() })
    }
}
