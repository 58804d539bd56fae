//! The frame orchestrator ("snake-path discover").
//!
//! Walks each route in order: zoom the viewport into the route's bounds,
//! reveal discovery pixels waypoint by waypoint behind a moving marker,
//! capture overlaid frames at the configured stride, interleave photo
//! zoom-ins, dwell on the finished route, and finally zoom back out to
//! the full map. Strictly sequential — frame order is the final video's
//! temporal order, and marker clearing and distance accumulation depend
//! on the immediately preceding waypoint.

use std::collections::VecDeque;

use image::{imageops, RgbImage};

use crate::canvas::Canvas;
use crate::foundation::core::{PixelIndex, Rgb8};
use crate::foundation::error::{TrailreelError, TrailreelResult};
use crate::geo::transform::{distance_pixels, DistanceUnit};
use crate::overlay::distance::{draw_distance, DistanceOverlay};
use crate::overlay::elevation::{
    draw_elevation_bar, draw_elevation_profile, ElevationMode, ElevationOverlay,
};
use crate::route::{PhotoAttachment, Route};
use crate::viewport::ViewBox;

/// Photo zoom-in interlude parameters.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PhotoZoomParams {
    /// Photo height on the first growth frame, in canvas pixels.
    pub start_height: u32,
    /// Height added per growth frame.
    pub step: u32,
    /// Height at which growth stops; `None` grows to the canvas height.
    pub target_height: Option<u32>,
}

impl Default for PhotoZoomParams {
    fn default() -> Self {
        Self {
            start_height: 10,
            step: 50,
            target_height: None,
        }
    }
}

/// Orchestrator configuration, validated once before any frame is
/// produced.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DiscoverConfig {
    /// Color of the moving position marker.
    pub marker_color: Rgb8,
    /// Capture a frame every `skip_level` waypoints.
    pub skip_level: usize,
    /// Output frame height in pixels; width follows the canvas aspect.
    pub final_height: u32,
    /// Output frame rate.
    pub fps: u32,
    /// Number of identical frames held on a finished route (and on a
    /// fully grown photo).
    pub dwell_frames: usize,
    /// Erase the previous marker each step, producing a moving dot
    /// rather than a painted trail.
    pub clear_marker: bool,
    /// Steps in each zoom-and-pan viewport transition.
    pub transition_steps: usize,
    /// Photo interlude parameters.
    pub photo: PhotoZoomParams,
    /// Optional distance readout.
    pub distance: Option<DistanceOverlay>,
    /// Optional elevation readout (bar or profile).
    pub elevation: Option<ElevationOverlay>,
}

impl Default for DiscoverConfig {
    fn default() -> Self {
        Self {
            marker_color: [255, 0, 0],
            skip_level: 5,
            final_height: 500,
            fps: 30,
            dwell_frames: 50,
            clear_marker: true,
            transition_steps: 100,
            photo: PhotoZoomParams::default(),
            distance: None,
            elevation: None,
        }
    }
}

impl DiscoverConfig {
    /// Check numeric parameters and nested overlay records.
    pub fn validate(&self) -> TrailreelResult<()> {
        if self.skip_level < 1 {
            return Err(TrailreelError::validation("skip_level must be >= 1"));
        }
        if self.final_height < 1 {
            return Err(TrailreelError::validation("final_height must be >= 1"));
        }
        if self.fps < 1 {
            return Err(TrailreelError::validation("fps must be >= 1"));
        }
        if self.transition_steps < 2 {
            return Err(TrailreelError::validation("transition_steps must be >= 2"));
        }
        if self.photo.start_height < 1 || self.photo.step < 1 {
            return Err(TrailreelError::validation(
                "photo start_height and step must be >= 1",
            ));
        }
        if let Some(target) = self.photo.target_height {
            if target < 1 {
                return Err(TrailreelError::validation(
                    "photo target_height must be >= 1",
                ));
            }
        }
        if let Some(d) = &self.distance {
            d.validate()?;
        }
        if let Some(e) = &self.elevation {
            e.validate()?;
        }
        Ok(())
    }
}

/// Resize an extracted viewport region to the output frame size.
fn scale_to_output(img: &RgbImage, aspect: f64, final_height: u32) -> RgbImage {
    let final_width = ((f64::from(final_height) * aspect) as u32).max(1);
    imageops::resize(
        img,
        final_width,
        final_height,
        imageops::FilterType::Triangle,
    )
}

/// Interpolate the viewport from `start` to `end` over `steps` frames.
///
/// Centers and heights are linearly spaced, inclusive of both
/// endpoints; each intermediate box is built at the canvas aspect,
/// clamped, extracted, and resized to the output frame size. The canvas
/// viewport is left on the final (clamped) box. Interpolating a box
/// onto itself yields `steps` identical frames.
pub fn zoom_and_pan(
    canvas: &mut Canvas,
    start: &ViewBox,
    end: &ViewBox,
    steps: usize,
    final_height: u32,
) -> TrailreelResult<Vec<RgbImage>> {
    if steps < 2 {
        return Err(TrailreelError::validation("zoom_and_pan steps must be >= 2"));
    }

    let aspect = canvas.aspect_ratio();
    let (w, h) = canvas.shape();
    let bound = (w as i64, h as i64);

    let mut frames = Vec::with_capacity(steps);
    for i in 0..steps {
        let t = i as f64 / (steps - 1) as f64;
        let center = PixelIndex::new(
            (start.center.x as f64 + (end.center.x - start.center.x) as f64 * t) as i64,
            (start.center.y as f64 + (end.center.y - start.center.y) as f64 * t) as i64,
        );
        let height = (start.height as f64 + (end.height - start.height) as f64 * t) as i64;

        let step_box = ViewBox::new(center, height, aspect).crop_to_limits(bound);
        canvas.viewport = step_box;

        let sub = step_box.extract(&canvas.base);
        frames.push(scale_to_output(&sub, aspect, final_height));
    }

    Ok(frames)
}

/// Extract the current viewport, resize it to the output size, and draw
/// the configured overlays for waypoint `index`.
fn capture_frame(
    canvas: &Canvas,
    route: &Route,
    index: usize,
    total_distance: f64,
    elev_trace: &mut Vec<PixelIndex>,
    config: &DiscoverConfig,
) -> RgbImage {
    let sub = canvas.viewport.extract(&canvas.base);
    let mut frame = scale_to_output(&sub, canvas.aspect_ratio(), config.final_height);

    if let Some(d) = &config.distance {
        draw_distance(&mut frame, total_distance, d);
    }
    if let Some(e) = &config.elevation {
        match e.mode {
            ElevationMode::Bar => draw_elevation_bar(&mut frame, index, route, e),
            ElevationMode::Profile => {
                draw_elevation_profile(&mut frame, index, route, elev_trace, e)
            }
        }
    }

    frame
}

/// Grow a photo over a working copy of the canvas, capturing one frame
/// per growth step, then hold and shrink back out.
///
/// Growth that would write outside the canvas stops early; an interlude
/// whose first step is already out of bounds contributes no frames.
/// All frames are appended to the canvas sequence in order.
fn photo_zoom(canvas: &mut Canvas, photo: &PhotoAttachment, config: &DiscoverConfig) {
    let (canvas_w, canvas_h) = canvas.shape();
    let target = config.photo.target_height.unwrap_or(canvas_h);
    let aspect = canvas.aspect_ratio();

    let mut work = canvas.base.clone();
    let mut forward: Vec<RgbImage> = Vec::new();

    let mut height = config.photo.start_height;
    while height < target {
        let width = ((f64::from(height) * photo.aspect_ratio) as u32).max(1);
        let top_left = PixelIndex::new(
            (photo.index.x as f64 - f64::from(width) / 2.0) as i64,
            (photo.index.y as f64 - f64::from(height) / 2.0) as i64,
        );

        let outside = top_left.x < 0
            || top_left.y < 0
            || top_left.x + i64::from(width) > i64::from(canvas_w)
            || top_left.y + i64::from(height) > i64::from(canvas_h);
        if outside {
            tracing::warn!(height, "photo zoom reached the canvas edge; truncating growth");
            break;
        }

        let resized = imageops::resize(&photo.image, width, height, imageops::FilterType::Triangle);
        imageops::replace(&mut work, &resized, top_left.x, top_left.y);

        let sub = canvas.viewport.extract(&work);
        forward.push(scale_to_output(&sub, aspect, config.final_height));

        height += config.photo.step;
    }

    let Some(last) = forward.last().cloned() else {
        tracing::warn!("photo zoom produced no frames; skipping interlude");
        return;
    };

    canvas.frames.extend(forward.iter().cloned());
    for _ in 0..config.dwell_frames {
        canvas.frames.push(last.clone());
    }
    canvas.frames.extend(forward.into_iter().rev());
}

/// Walk `routes` in order, appending the complete animation to the
/// canvas frame sequence.
///
/// Per route: transition the viewport into the route's zoom box,
/// traverse the waypoints revealing footprints behind a moving marker,
/// capture a frame every `skip_level` waypoints (with overlays and any
/// due photo interludes), then hold on the finished route. Routes chain
/// without zooming out in between; after the last route the viewport
/// returns to the full-map box.
#[tracing::instrument(skip_all)]
pub fn snake_path_discover(
    canvas: &mut Canvas,
    routes: &[Route],
    config: &DiscoverConfig,
) -> TrailreelResult<()> {
    config.validate()?;
    if routes.is_empty() {
        return Err(TrailreelError::validation(
            "snake_path_discover requires at least one route",
        ));
    }

    let unit = config.distance.map(|d| d.unit).unwrap_or(DistanceUnit::Miles);
    let dist_per_pixel = canvas.distance_per_pixel(unit);

    let full_box = canvas.full_box();
    let mut current_box = full_box;

    for (route_no, route) in routes.iter().enumerate() {
        tracing::debug!(
            route = route_no,
            waypoints = route.len(),
            photos = route.photos.len(),
            "starting route"
        );

        let zoom_box = route.zoom;
        let transition = zoom_and_pan(
            canvas,
            &current_box,
            &zoom_box,
            config.transition_steps,
            config.final_height,
        )?;
        canvas.frames.extend(transition);
        canvas.viewport = zoom_box;
        current_box = zoom_box;

        let mut total_distance = 0.0;
        let mut elev_trace: Vec<PixelIndex> = Vec::new();
        let mut pending: VecDeque<&PhotoAttachment> = route.photos.iter().collect();

        for (a, wp) in route.waypoints.iter().enumerate() {
            let mut skip = false;

            if a > 0 {
                total_distance +=
                    distance_pixels(wp.index, route.waypoints[a - 1].index) * dist_per_pixel;
            }

            for &p in &wp.footprint {
                if !canvas.reveal(p) {
                    skip = true;
                }
            }
            for &m in &wp.marker {
                if !canvas.write_pixel(m, config.marker_color) {
                    skip = true;
                }
            }

            // Erase the previous marker so the dot moves instead of
            // painting a trail. Suppressed when the current waypoint
            // grazes out of bounds.
            if config.clear_marker && !skip && a > 0 {
                for &p in &route.waypoints[a - 1].marker {
                    canvas.reveal(p);
                }
            }

            let photo_due = pending
                .front()
                .is_some_and(|p| a > p.nearest_waypoint);

            if a % config.skip_level == 0 {
                let frame =
                    capture_frame(canvas, route, a, total_distance, &mut elev_trace, config);
                canvas.frames.push(frame);

                if photo_due {
                    if let Some(photo) = pending.pop_front() {
                        photo_zoom(canvas, photo, config);
                    }
                }
            }
        }

        // Closing frame: clear the last marker, capture once more, and
        // hold on the completed route.
        let last = route.len() - 1;
        if config.clear_marker {
            for &p in &route.waypoints[last].marker {
                canvas.reveal(p);
            }
        }
        let frame = capture_frame(canvas, route, last, total_distance, &mut elev_trace, config);
        canvas.frames.push(frame.clone());
        for _ in 0..config.dwell_frames {
            canvas.frames.push(frame.clone());
        }
    }

    let outro = zoom_and_pan(
        canvas,
        &current_box,
        &full_box,
        config.transition_steps,
        config.final_height,
    )?;
    canvas.frames.extend(outro);

    Ok(())
}
