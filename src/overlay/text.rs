//! Bitmap text stamping for frame readouts.
//!
//! Uses the 8x8 legacy glyph set at an integer scale — output frames
//! are raster video frames, so a tiny bitmap font over a filled
//! background box is all the typography required.

use font8x8::legacy::BASIC_LEGACY;
use image::RgbImage;

use crate::foundation::core::{PixelIndex, Rgb8};
use crate::overlay::{fill_rect, put_px};

/// Glyph cell edge in pixels before scaling.
const GLYPH_SIZE: i64 = 8;

/// Text stamping style.
#[derive(Clone, Copy, Debug)]
pub struct TextStyle {
    /// Integer glyph magnification; glyphs are `8 * scale` pixels tall.
    pub scale: i64,
    /// Glyph color.
    pub color: Rgb8,
    /// Background box color, or `None` for no box.
    pub background: Option<Rgb8>,
    /// Background padding around the text, in pixels per axis.
    pub padding: (i64, i64),
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            scale: 2,
            color: [255, 255, 255],
            background: Some([0, 0, 0]),
            padding: (5, 5),
        }
    }
}

/// Rendered size of `text` in pixels, excluding padding.
pub fn text_size(text: &str, scale: i64) -> (i64, i64) {
    (
        text.chars().count() as i64 * GLYPH_SIZE * scale,
        GLYPH_SIZE * scale,
    )
}

fn glyph_for_char(ch: char) -> [u8; 8] {
    let index = ch as usize;
    if index < BASIC_LEGACY.len() {
        BASIC_LEGACY[index]
    } else {
        BASIC_LEGACY[b'?' as usize]
    }
}

/// Stamp `text` with its top-left corner at `pos`, over an optional
/// padded background box. Writes are clamped to the frame.
pub fn draw_text(frame: &mut RgbImage, text: &str, pos: PixelIndex, style: &TextStyle) {
    let scale = style.scale.max(1);
    let (text_w, text_h) = text_size(text, scale);

    if let Some(bg) = style.background {
        let (pad_x, pad_y) = style.padding;
        fill_rect(
            frame,
            pos.x - pad_x,
            pos.y - pad_y,
            pos.x + text_w + pad_x,
            pos.y + text_h + pad_y,
            bg,
        );
    }

    for (i, ch) in text.chars().enumerate() {
        let glyph = glyph_for_char(ch);
        let origin_x = pos.x + i as i64 * GLYPH_SIZE * scale;
        for (row, bits) in glyph.iter().enumerate() {
            for col in 0..GLYPH_SIZE {
                if bits & (1 << col) == 0 {
                    continue;
                }
                let px = origin_x + col * scale;
                let py = pos.y + row as i64 * scale;
                for dy in 0..scale {
                    for dx in 0..scale {
                        put_px(frame, px + dx, py + dy, style.color);
                    }
                }
            }
        }
    }
}
