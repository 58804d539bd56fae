//! The mutable map canvas: base image, discovery source, viewport state,
//! and the accumulated output frame sequence.

use image::RgbImage;

use crate::foundation::core::{GeoPoint, PixelIndex, Rgb8};
use crate::foundation::error::{TrailreelError, TrailreelResult};
use crate::geo::footprint::{line, square};
use crate::geo::transform::{distance_geo, to_pixel, DistanceUnit};
use crate::route::Route;
use crate::viewport::ViewBox;

/// Owns the mutable base map image, the read-only discovery image, the
/// current viewport, and the emitted frame sequence.
///
/// A canvas lives for one orchestration run. All per-frame pixel
/// mutation goes through the bounds-checked [`Canvas::write_pixel`] and
/// [`Canvas::reveal`] primitives; frames are append-only and their
/// order is the final video order.
pub struct Canvas {
    pub(crate) base: RgbImage,
    pub(crate) discovery: RgbImage,
    top_left_geo: GeoPoint,
    bot_right_geo: GeoPoint,
    aspect_ratio: f64,
    full_box: ViewBox,
    pub(crate) viewport: ViewBox,
    pub(crate) frames: Vec<RgbImage>,
}

impl Canvas {
    /// Build a canvas from a base map image, a discovery image of the
    /// same dimensions, and the geographic corners of the mapped area.
    pub fn new(
        base: RgbImage,
        discovery: RgbImage,
        top_left_geo: GeoPoint,
        bot_right_geo: GeoPoint,
    ) -> TrailreelResult<Self> {
        if base.width() == 0 || base.height() == 0 {
            return Err(TrailreelError::validation(
                "canvas base image must be non-empty",
            ));
        }
        if base.dimensions() != discovery.dimensions() {
            return Err(TrailreelError::validation(format!(
                "discovery image dimensions {}x{} do not match base {}x{}",
                discovery.width(),
                discovery.height(),
                base.width(),
                base.height()
            )));
        }
        if top_left_geo.lat <= bot_right_geo.lat || top_left_geo.lon >= bot_right_geo.lon {
            return Err(TrailreelError::validation(
                "top-left geo corner must be north-west of bottom-right",
            ));
        }

        let (w, h) = (base.width() as i64, base.height() as i64);
        let aspect_ratio = w as f64 / h as f64;

        // Resting full-map view, inset slightly from the exact image edge.
        let full_box = ViewBox::new(PixelIndex::new(w / 2, h / 2), (h - 10).max(1), aspect_ratio);

        Ok(Self {
            base,
            discovery,
            top_left_geo,
            bot_right_geo,
            aspect_ratio,
            full_box,
            viewport: full_box,
            frames: Vec::new(),
        })
    }

    /// Canvas dimensions as `(width, height)`.
    pub fn shape(&self) -> (u32, u32) {
        self.base.dimensions()
    }

    /// Canvas width in pixels.
    pub fn width(&self) -> u32 {
        self.base.width()
    }

    /// Canvas height in pixels.
    pub fn height(&self) -> u32 {
        self.base.height()
    }

    /// Width-over-height aspect ratio of the canvas.
    pub fn aspect_ratio(&self) -> f64 {
        self.aspect_ratio
    }

    /// Geographic corner of the image origin.
    pub fn top_left_geo(&self) -> GeoPoint {
        self.top_left_geo
    }

    /// Geographic corner opposite the image origin.
    pub fn bot_right_geo(&self) -> GeoPoint {
        self.bot_right_geo
    }

    /// The resting full-map viewport.
    pub fn full_box(&self) -> ViewBox {
        self.full_box
    }

    /// The viewport currently rendered into output frames.
    pub fn viewport(&self) -> ViewBox {
        self.viewport
    }

    /// Borrow the base image.
    pub fn base(&self) -> &RgbImage {
        &self.base
    }

    /// Borrow the emitted frames, in output order.
    pub fn frames(&self) -> &[RgbImage] {
        &self.frames
    }

    /// Take ownership of the emitted frames, leaving the canvas empty.
    pub fn take_frames(&mut self) -> Vec<RgbImage> {
        std::mem::take(&mut self.frames)
    }

    /// Map a geographic coordinate to a pixel index on this canvas.
    pub fn index_of(&self, point: GeoPoint) -> PixelIndex {
        to_pixel(point, self.top_left_geo, self.bot_right_geo, self.shape())
    }

    /// Whether `index` lies inside the canvas.
    pub fn in_bounds(&self, index: PixelIndex) -> bool {
        index.x >= 0
            && index.x < self.base.width() as i64
            && index.y >= 0
            && index.y < self.base.height() as i64
    }

    /// Write one pixel, returning whether the index was in bounds.
    ///
    /// Out-of-bounds writes are silent no-ops; route geometry routinely
    /// grazes the image edges and that must never be fatal.
    pub fn write_pixel(&mut self, index: PixelIndex, color: Rgb8) -> bool {
        if !self.in_bounds(index) {
            return false;
        }
        self.base
            .put_pixel(index.x as u32, index.y as u32, image::Rgb(color));
        true
    }

    /// Copy the discovery-source pixel at `index` into the base image,
    /// returning whether the index was in bounds.
    pub fn reveal(&mut self, index: PixelIndex) -> bool {
        if !self.in_bounds(index) {
            return false;
        }
        let (x, y) = (index.x as u32, index.y as u32);
        let src = *self.discovery.get_pixel(x, y);
        self.base.put_pixel(x, y, src);
        true
    }

    /// Reveal every footprint pixel of `route` at once, without
    /// animation. Out-of-bounds pixels are skipped.
    pub fn reveal_route(&mut self, route: &Route) {
        for wp in &route.waypoints {
            for &p in &wp.footprint {
                self.reveal(p);
            }
        }
    }

    /// Draw a closed outline through `vertices` (geo coordinates) in
    /// `color`, `thickness` pixels wide.
    pub fn draw_outline(&mut self, vertices: &[GeoPoint], thickness: i64, color: Rgb8) {
        let indices: Vec<PixelIndex> = vertices.iter().map(|&v| self.index_of(v)).collect();

        let mut path = Vec::new();
        for pair in indices.windows(2) {
            path.extend(line(pair[0], pair[1]));
        }

        if thickness > 1 {
            for p in path {
                for q in square(p, thickness) {
                    self.write_pixel(q, color);
                }
            }
        } else {
            for p in path {
                self.write_pixel(p, color);
            }
        }
    }

    /// Average geographic distance covered by one pixel step, in `unit`.
    ///
    /// Computed as the mean of a one-pixel step along each axis from the
    /// top-left corner.
    pub fn distance_per_pixel(&self, unit: DistanceUnit) -> f64 {
        let x_delta = (self.bot_right_geo.lon - self.top_left_geo.lon) / f64::from(self.width());
        let y_delta = (self.bot_right_geo.lat - self.top_left_geo.lat) / f64::from(self.height());

        let per_x = distance_geo(
            self.top_left_geo,
            GeoPoint::new(self.top_left_geo.lat, self.top_left_geo.lon + x_delta),
            unit,
        );
        let per_y = distance_geo(
            self.top_left_geo,
            GeoPoint::new(self.top_left_geo.lat + y_delta, self.top_left_geo.lon),
            unit,
        );

        (per_x + per_y) / 2.0
    }

    /// Append one finished output frame.
    pub fn push_frame(&mut self, frame: RgbImage) {
        self.frames.push(frame);
    }
}
