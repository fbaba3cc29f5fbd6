//! Composition pipeline: decode → bound → overlay → encode.

use std::io::Cursor;

use image::imageops::FilterType;
use image::{ImageFormat, Rgba, RgbaImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;

use makeitmeme_common::config::CompositionDefaults;
use makeitmeme_common::error::{MemeError, MemeResult};

use crate::compositor::{compute_captions, CaptionLayout, CaptionStyle};

/// Decoded image the pipeline operates on.
pub type Raster = RgbaImage;

/// Default bound on the longest edge.
pub const DEFAULT_MAX_EDGE: u32 = 1024;

const FILL: Rgba<u8> = Rgba([255, 255, 255, 255]);
const OUTLINE: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Pipeline parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    pub max_edge: u32,
    pub caption: CaptionStyle,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_edge: DEFAULT_MAX_EDGE,
            caption: CaptionStyle::default(),
        }
    }
}

impl From<&CompositionDefaults> for PipelineConfig {
    fn from(defaults: &CompositionDefaults) -> Self {
        Self {
            max_edge: defaults.max_edge.max(1),
            caption: CaptionStyle {
                glyph_scale: defaults.glyph_scale,
                top_baseline_px: defaults.top_baseline_px,
                bottom_margin_px: defaults.bottom_margin_px,
                outline_px: defaults.outline_px,
            },
        }
    }
}

/// Stateless composition pipeline.
#[derive(Debug, Clone, Default)]
pub struct CompositionPipeline {
    config: PipelineConfig,
}

impl CompositionPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Full pipeline on encoded asset bytes.
    pub fn render(&self, asset: &[u8], top_text: &str, bottom_text: &str) -> MemeResult<Vec<u8>> {
        let raster = decode(asset)?;
        let raster = bound(raster, self.config.max_edge);
        let raster = overlay(raster, top_text, bottom_text, &self.config.caption);
        let bytes = encode(&raster)?;

        tracing::debug!(
            width = raster.width(),
            height = raster.height(),
            bytes = bytes.len(),
            "Composition rendered"
        );
        Ok(bytes)
    }

    pub fn decode(&self, asset: &[u8]) -> MemeResult<Raster> {
        decode(asset)
    }

    pub fn bound(&self, raster: Raster) -> Raster {
        bound(raster, self.config.max_edge)
    }

    pub fn overlay(&self, raster: Raster, top_text: &str, bottom_text: &str) -> Raster {
        overlay(raster, top_text, bottom_text, &self.config.caption)
    }

    pub fn encode(&self, raster: &Raster) -> MemeResult<Vec<u8>> {
        encode(raster)
    }
}

/// Decode any supported image format into RGBA8.
pub fn decode(asset: &[u8]) -> MemeResult<Raster> {
    let image = image::load_from_memory(asset)
        .map_err(|e| MemeError::decode(format!("Failed to decode base image: {e}")))?;
    Ok(image.to_rgba8())
}

/// Uniformly scale so the longest edge equals `max_edge`. Rasters already
/// within the bound are returned untouched.
pub fn bound(raster: Raster, max_edge: u32) -> Raster {
    let (width, height) = raster.dimensions();
    let max_edge = max_edge.max(1);
    let longest = width.max(height);
    if longest <= max_edge {
        return raster;
    }

    let (new_width, new_height) = bounded_dimensions(width, height, max_edge);
    image::imageops::resize(&raster, new_width, new_height, FilterType::Triangle)
}

/// Target dimensions for [`bound`], never below 1x1.
pub fn bounded_dimensions(width: u32, height: u32, max_edge: u32) -> (u32, u32) {
    let longest = width.max(height).max(1) as u64;
    let scale = |edge: u32| ((edge as u64 * max_edge as u64) / longest).max(1) as u32;
    if width >= height {
        (max_edge, scale(height))
    } else {
        (scale(width), max_edge)
    }
}

/// Draw both captions: an outline pass under a fill pass. Text that does
/// not fit is clipped at the raster edges.
pub fn overlay(mut raster: Raster, top_text: &str, bottom_text: &str, style: &CaptionStyle) -> Raster {
    let captions = compute_captions(top_text, bottom_text, raster.width(), raster.height(), style);
    for caption in &captions {
        draw_caption(&mut raster, caption, style.outline_px);
    }
    raster
}

fn draw_caption(raster: &mut Raster, caption: &CaptionLayout, outline_px: u32) {
    let cell = caption.cell_px;
    let outline = outline_px as i32;
    let outlined = cell + 2 * outline_px;

    for &(x, y) in &caption.cells {
        draw_filled_rect_mut(
            raster,
            Rect::at(x.saturating_sub(outline), y.saturating_sub(outline)).of_size(outlined, outlined),
            OUTLINE,
        );
    }
    for &(x, y) in &caption.cells {
        draw_filled_rect_mut(raster, Rect::at(x, y).of_size(cell, cell), FILL);
    }
}

/// Lossless PNG encoding.
pub fn encode(raster: &Raster) -> MemeResult<Vec<u8>> {
    let mut bytes = Vec::new();
    raster
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| MemeError::encode(format!("Failed to encode PNG: {e}")))?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    const GRAY: Rgba<u8> = Rgba([128, 128, 128, 255]);

    fn solid(width: u32, height: u32) -> Raster {
        RgbaImage::from_pixel(width, height, GRAY)
    }

    fn png(raster: &Raster) -> Vec<u8> {
        encode(raster).unwrap()
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(decode(b"definitely not an image"), Err(MemeError::Decode { .. })));
        assert!(matches!(decode(&[]), Err(MemeError::Decode { .. })));
    }

    #[test]
    fn test_decode_encode_preserves_pixels() {
        let raster = solid(3, 2);
        let decoded = decode(&png(&raster)).unwrap();
        assert_eq!(decoded, raster);
    }

    #[test]
    fn test_bound_scales_longest_edge() {
        let bounded = bound(solid(2048, 1024), 1024);
        assert_eq!(bounded.dimensions(), (1024, 512));

        let bounded = bound(solid(1000, 3000), 1024);
        assert_eq!(bounded.dimensions(), (341, 1024));
    }

    #[test]
    fn test_bound_is_noop_within_limit() {
        let raster = solid(300, 600);
        let bounded = bound(raster.clone(), 1024);
        assert_eq!(bounded, raster);
    }

    #[test]
    fn test_bounded_dimensions_never_zero() {
        assert_eq!(bounded_dimensions(10_000, 1, 100), (100, 1));
    }

    #[test]
    fn test_overlay_empty_strings_render_nothing() {
        let raster = solid(200, 200);
        let out = overlay(raster.clone(), "", "", &CaptionStyle::default());
        assert_eq!(out, raster);
    }

    #[test]
    fn test_overlay_draws_fill_and_outline() {
        let out = overlay(solid(200, 200), "h", "", &CaptionStyle::default());

        // First column of 'H' occupies x 68..76, y 36..44.
        assert_eq!(*out.get_pixel(70, 40), FILL);
        // Gap between the strokes is covered by the outline.
        assert_eq!(*out.get_pixel(86, 40), OUTLINE);
        // Far from any caption nothing changed.
        assert_eq!(*out.get_pixel(5, 5), GRAY);
        assert_eq!(*out.get_pixel(100, 190), GRAY);
    }

    #[test]
    fn test_overlay_only_touches_caption_bands() {
        let style = CaptionStyle::default();
        let out = overlay(solid(240, 400), "top", "bottom", &style);
        // Between the two caption bands the raster is untouched.
        for y in 110..280 {
            for x in (0..240).step_by(7) {
                assert_eq!(*out.get_pixel(x, y), GRAY, "pixel ({x}, {y}) changed");
            }
        }
    }

    #[test]
    fn test_overlay_clips_overflow() {
        let out = overlay(
            solid(64, 160),
            "a caption much wider than the image",
            "and another one",
            &CaptionStyle::default(),
        );
        assert_eq!(out.dimensions(), (64, 160));
    }

    #[test]
    fn test_overlay_is_case_insensitive() {
        let style = CaptionStyle::default();
        let lower = overlay(solid(300, 300), "hi", "bye", &style);
        let upper = overlay(solid(300, 300), "HI", "BYE", &style);
        assert_eq!(lower, upper);
    }

    #[test]
    fn test_render_is_byte_identical_across_runs() {
        let pipeline = CompositionPipeline::default();
        let asset = png(&solid(1500, 900));
        let first = pipeline.render(&asset, "hi", "bye").unwrap();
        let second = pipeline.render(&asset, "hi", "bye").unwrap();
        assert_eq!(first, second);

        let decoded = decode(&first).unwrap();
        assert_eq!(decoded.dimensions(), (1024, 614));
    }

    #[test]
    fn test_pipeline_config_from_defaults() {
        let config = PipelineConfig::from(&CompositionDefaults::default());
        assert_eq!(config, PipelineConfig::default());
    }
}
