//! Run one draft against the local catalog and output directory.

use std::path::PathBuf;
use std::sync::Arc;

use makeitmeme_common::clock::SystemClock;
use makeitmeme_common::config::AppConfig;
use makeitmeme_edit_engine::{AssetPicker, MemeStudio, RandomPicker};
use makeitmeme_host_local::{DirectoryCatalog, FsPersistenceSink};
use makeitmeme_render_engine::{CompositionPipeline, PipelineConfig};

pub async fn run(
    config: &AppConfig,
    assets: Option<PathBuf>,
    output: Option<PathBuf>,
    swaps: u8,
    top: String,
    bottom: String,
    seed: Option<u64>,
) -> anyhow::Result<()> {
    let assets = assets.unwrap_or_else(|| config.assets_dir.clone());
    let output = output.unwrap_or_else(|| config.output_dir.clone());

    let catalog = Arc::new(DirectoryCatalog::open(&assets)?);
    let clock = Arc::new(SystemClock);
    let sink = Arc::new(FsPersistenceSink::new(&output, clock.clone()));
    let picker: Box<dyn AssetPicker> = match seed {
        Some(seed) => Box::new(RandomPicker::seeded(seed)),
        None => Box::new(RandomPicker::new()),
    };

    let mut studio = MemeStudio::with_picker(
        catalog,
        CompositionPipeline::new(PipelineConfig::from(&config.composition)),
        sink,
        clock,
        picker,
    )?;
    println!("Started on {}", studio.session().asset_id());

    for _ in 0..swaps {
        match studio.request_swap() {
            Ok(outcome) => println!(
                "  {outcome:?} ({} swaps left)",
                studio.session().edits_remaining()
            ),
            Err(e) => {
                println!("  Swap rejected: {e}");
                break;
            }
        }
    }

    studio.set_top_text(top);
    studio.set_bottom_text(bottom);

    let artifact = studio.commit().await?;
    println!("Saved {artifact}");
    println!("Next draft starts on {}", studio.session().asset_id());
    Ok(())
}
