//! Caption layout: turns caption text into filled glyph cells.
//!
//! Captions use the public-domain 8x8 bitmap font scaled by an integer
//! factor, which keeps rendering independent of installed system fonts.

use font8x8::{UnicodeFonts, BASIC_FONTS, LATIN_FONTS};

/// Side of a font glyph, in font pixels.
pub const GLYPH_SIZE: u32 = 8;

/// Caption geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptionStyle {
    /// Output pixels per font pixel.
    pub glyph_scale: u32,

    /// Baseline of the top caption, from the top edge.
    pub top_baseline_px: u32,

    /// Baseline of the bottom caption, from the bottom edge.
    pub bottom_margin_px: u32,

    /// Outline thickness around every lit cell.
    pub outline_px: u32,
}

impl Default for CaptionStyle {
    fn default() -> Self {
        Self {
            glyph_scale: 8,
            top_baseline_px: 100,
            bottom_margin_px: 50,
            outline_px: 4,
        }
    }
}

impl CaptionStyle {
    /// Side of one lit cell in output pixels (never zero).
    pub fn cell_px(&self) -> u32 {
        self.glyph_scale.max(1)
    }

    /// Height of a rendered line in output pixels.
    pub fn line_height_px(&self) -> u32 {
        GLYPH_SIZE * self.cell_px()
    }
}

/// Which caption a layout belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptionSlot {
    Top,
    Bottom,
}

/// Placement of one caption on a raster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionLayout {
    pub slot: CaptionSlot,

    /// Upper-cased text that was laid out.
    pub text: String,

    /// Side of each cell in output pixels.
    pub cell_px: u32,

    /// Top-left corner of every lit cell, in output pixels. May lie
    /// partly or fully outside the raster; drawing clips.
    pub cells: Vec<(i32, i32)>,
}

/// Rows of the glyph for `c`; unknown characters render as blanks.
pub fn glyph_rows(c: char) -> [u8; 8] {
    BASIC_FONTS
        .get(c)
        .or_else(|| LATIN_FONTS.get(c))
        .unwrap_or([0; 8])
}

/// Lay out a caption centered horizontally on a `width` x `height` raster.
/// Returns `None` for empty text.
pub fn layout_caption(
    text: &str,
    slot: CaptionSlot,
    width: u32,
    height: u32,
    style: &CaptionStyle,
) -> Option<CaptionLayout> {
    if text.is_empty() {
        return None;
    }

    let text = text.to_uppercase();
    let cell = style.cell_px() as i64;
    let glyph_px = GLYPH_SIZE as i64 * cell;
    let chars: Vec<char> = text.chars().collect();

    // No wrapping: a line wider than the raster overhangs both sides evenly.
    let line_width = chars.len() as i64 * glyph_px;
    let origin_x = (width as i64 - line_width) / 2;
    let baseline = match slot {
        CaptionSlot::Top => style.top_baseline_px as i64,
        CaptionSlot::Bottom => height as i64 - style.bottom_margin_px as i64,
    };
    let origin_y = baseline - glyph_px;

    let mut cells = Vec::new();
    for (index, c) in chars.iter().enumerate() {
        let glyph_x = origin_x + index as i64 * glyph_px;
        for (row, bits) in glyph_rows(*c).into_iter().enumerate() {
            for col in 0..GLYPH_SIZE as i64 {
                if bits & (1u8 << col) == 0 {
                    continue;
                }
                let x = glyph_x + col * cell;
                let y = origin_y + row as i64 * cell;
                if let (Ok(x), Ok(y)) = (i32::try_from(x), i32::try_from(y)) {
                    cells.push((x, y));
                }
            }
        }
    }

    Some(CaptionLayout {
        slot,
        text,
        cell_px: style.cell_px(),
        cells,
    })
}

/// Layouts for both captions, top first. Empty captions are omitted.
pub fn compute_captions(
    top_text: &str,
    bottom_text: &str,
    width: u32,
    height: u32,
    style: &CaptionStyle,
) -> Vec<CaptionLayout> {
    [
        (top_text, CaptionSlot::Top),
        (bottom_text, CaptionSlot::Bottom),
    ]
    .into_iter()
    .filter_map(|(text, slot)| layout_caption(text, slot, width, height, style))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_has_no_layout() {
        let style = CaptionStyle::default();
        assert!(layout_caption("", CaptionSlot::Top, 500, 500, &style).is_none());
        assert!(compute_captions("", "", 500, 500, &style).is_empty());
    }

    #[test]
    fn test_text_is_upper_cased() {
        let layout =
            layout_caption("hi", CaptionSlot::Top, 500, 500, &CaptionStyle::default()).unwrap();
        assert_eq!(layout.text, "HI");
        let upper =
            layout_caption("HI", CaptionSlot::Top, 500, 500, &CaptionStyle::default()).unwrap();
        assert_eq!(layout.cells, upper.cells);
    }

    #[test]
    fn test_top_caption_sits_above_baseline() {
        let style = CaptionStyle::default();
        let layout = layout_caption("H", CaptionSlot::Top, 200, 200, &style).unwrap();
        let min_y = layout.cells.iter().map(|(_, y)| *y).min().unwrap();
        let max_y = layout.cells.iter().map(|(_, y)| *y).max().unwrap();
        assert_eq!(min_y, 100 - 64);
        assert!(max_y + style.cell_px() as i32 <= 100);
    }

    #[test]
    fn test_bottom_caption_is_offset_from_bottom_edge() {
        let style = CaptionStyle::default();
        let layout = layout_caption("H", CaptionSlot::Bottom, 200, 400, &style).unwrap();
        let min_y = layout.cells.iter().map(|(_, y)| *y).min().unwrap();
        assert_eq!(min_y, 400 - 50 - 64);
    }

    #[test]
    fn test_caption_is_centered() {
        let style = CaptionStyle::default();
        let layout = layout_caption("H", CaptionSlot::Top, 200, 200, &style).unwrap();
        let min_x = layout.cells.iter().map(|(x, _)| *x).min().unwrap();
        // One 64px glyph centered on 200px starts at 68.
        assert_eq!(min_x, 68);
    }

    #[test]
    fn test_overflowing_text_is_not_wrapped() {
        let style = CaptionStyle::default();
        let layout =
            layout_caption("THIS LINE IS FAR TOO LONG", CaptionSlot::Top, 100, 300, &style)
                .unwrap();
        let ys: std::collections::BTreeSet<i32> = layout.cells.iter().map(|(_, y)| *y).collect();
        // Every cell stays within one line height.
        assert!(ys.iter().all(|y| (36..100).contains(y)));
        assert!(layout.cells.iter().any(|(x, _)| *x < 0));
    }

    #[test]
    fn test_unknown_glyphs_render_blank() {
        assert_eq!(glyph_rows('\u{1F600}'), [0; 8]);
        assert_ne!(glyph_rows('A'), [0; 8]);
    }
}
