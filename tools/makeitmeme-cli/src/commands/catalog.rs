//! List the base image catalog.

use std::path::PathBuf;

use makeitmeme_common::config::AppConfig;
use makeitmeme_host_core::AssetSource;
use makeitmeme_host_local::DirectoryCatalog;

pub fn run(config: &AppConfig, assets: Option<PathBuf>) -> anyhow::Result<()> {
    let root = assets.unwrap_or_else(|| config.assets_dir.clone());
    let catalog = DirectoryCatalog::open(&root)?;

    println!("Catalog: {} ({} assets)", catalog.root().display(), catalog.len());
    for id in catalog.ids() {
        println!("  {id}");
    }
    Ok(())
}
