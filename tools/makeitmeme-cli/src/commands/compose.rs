//! Caption a single image.

use std::path::PathBuf;

use makeitmeme_common::config::AppConfig;
use makeitmeme_render_engine::{CompositionPipeline, PipelineConfig};

pub fn run(
    config: &AppConfig,
    input: PathBuf,
    top: String,
    bottom: String,
    output: PathBuf,
    max_edge: Option<u32>,
) -> anyhow::Result<()> {
    let asset = std::fs::read(&input)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", input.display()))?;

    let mut pipeline_config = PipelineConfig::from(&config.composition);
    if let Some(max_edge) = max_edge {
        anyhow::ensure!(max_edge > 0, "--max-edge must be positive");
        pipeline_config.max_edge = max_edge;
    }
    let pipeline = CompositionPipeline::new(pipeline_config);

    let bytes = pipeline.render(&asset, &top, &bottom)?;
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&output, &bytes)?;

    println!("Wrote {} ({} bytes)", output.display(), bytes.len());
    Ok(())
}
