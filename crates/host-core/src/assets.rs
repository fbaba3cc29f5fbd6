//! Base image catalog.

use makeitmeme_common::error::MemeResult;
use makeitmeme_feed_model::AssetId;

/// Fixed catalog of base images.
pub trait AssetSource: Send + Sync {
    /// Every asset in the catalog, in a stable order. This is the candidate
    /// pool offered to swaps.
    fn ids(&self) -> Vec<AssetId>;

    /// Raw (still encoded) bytes of an asset.
    fn load(&self, id: &AssetId) -> MemeResult<Vec<u8>>;

    fn contains(&self, id: &AssetId) -> bool {
        self.ids().iter().any(|candidate| candidate == id)
    }
}
