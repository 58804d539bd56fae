//! The rectangular viewport ("box") rendered into output frames.

use image::RgbImage;

use crate::foundation::core::PixelIndex;

/// A rectangular sub-region of the canvas, defined by a center, a
/// height, and an aspect ratio.
///
/// Width and the corner positions are derived and re-derived on every
/// construction; they are never stored independently, so
/// `width / height` always equals the stored aspect ratio (up to
/// integer truncation). The corner pair describes a half-open extent:
/// `bot_right - top_left == (width, height)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewBox {
    /// Center pixel of the box.
    pub center: PixelIndex,
    /// Height in pixels.
    pub height: i64,
    /// Width-over-height aspect ratio.
    pub aspect_ratio: f64,
    /// Derived width in pixels.
    pub width: i64,
    /// Derived top-left corner (inclusive).
    pub top_left: PixelIndex,
    /// Derived bottom-right corner (exclusive).
    pub bot_right: PixelIndex,
}

impl ViewBox {
    /// Build a box from center, height, and aspect ratio.
    pub fn new(center: PixelIndex, height: i64, aspect_ratio: f64) -> Self {
        let width = (height as f64 * aspect_ratio) as i64;

        let top_left = PixelIndex::new(
            (center.x as f64 - width as f64 / 2.0) as i64,
            (center.y as f64 - height as f64 / 2.0) as i64,
        );
        let bot_right = PixelIndex::new(
            (center.x as f64 + width as f64 / 2.0) as i64,
            (center.y as f64 + height as f64 / 2.0) as i64,
        );

        Self {
            center,
            height,
            aspect_ratio,
            width,
            top_left,
            bot_right,
        }
    }

    /// Re-center the box so it lies inside a `(width, height)` bounding
    /// shape, without changing its size.
    ///
    /// An edge that falls outside the bound is shifted back to it, and
    /// the center is recomputed from the shifted edges. When the box is
    /// larger than the bound this degrades to best-effort positioning
    /// against the bound's edge — the box is never shrunk, and the
    /// opposite side may still hang outside (a documented limitation,
    /// not an error).
    pub fn crop_to_limits(mut self, shape: (i64, i64)) -> Self {
        let (bound_x, bound_y) = shape;

        let mut min_x = self.top_left.x;
        let mut max_x = self.bot_right.x;
        let mut min_y = self.top_left.y;
        let mut max_y = self.bot_right.y;

        if self.top_left.x < 0 {
            min_x = 0;
            max_x = self.width;
        } else if self.bot_right.x >= bound_x {
            max_x = bound_x - 1;
            min_x = bound_x - 1 - self.width;
        }

        if self.top_left.y < 0 {
            min_y = 0;
            max_y = self.height;
        } else if self.bot_right.y >= bound_y {
            max_y = bound_y - 1;
            min_y = bound_y - 1 - self.height;
        }

        self.center = PixelIndex::new((min_x + max_x) / 2, (min_y + max_y) / 2);
        self.top_left = PixelIndex::new(min_x, min_y);
        self.bot_right = PixelIndex::new(max_x, max_y);
        self
    }

    /// Copy the `[top_left, bot_right)` pixel region out of `image`.
    ///
    /// The region is clamped into the image first, so a box that still
    /// hangs outside after [`ViewBox::crop_to_limits`] yields the
    /// in-range part rather than failing.
    pub fn extract(&self, image: &RgbImage) -> RgbImage {
        let (img_w, img_h) = (image.width() as i64, image.height() as i64);

        let x0 = self.top_left.x.clamp(0, img_w - 1);
        let y0 = self.top_left.y.clamp(0, img_h - 1);
        let x1 = self.bot_right.x.clamp(x0 + 1, img_w);
        let y1 = self.bot_right.y.clamp(y0 + 1, img_h);

        image::imageops::crop_imm(
            image,
            x0 as u32,
            y0 as u32,
            (x1 - x0) as u32,
            (y1 - y0) as u32,
        )
        .to_image()
    }
}
