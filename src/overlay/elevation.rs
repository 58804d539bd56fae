//! Elevation readouts: a scrolling profile trace or a fixed tracker bar.

use image::RgbImage;

use crate::foundation::core::{PixelIndex, Rgb8};
use crate::foundation::error::{TrailreelError, TrailreelResult};
use crate::geo::footprint::circle;
use crate::overlay::text::{draw_text, TextStyle};
use crate::overlay::{fill_rect, put_px};

/// Which elevation rendering to draw. The two modes are mutually
/// exclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElevationMode {
    /// Fixed vertical bar with a live tracker.
    Bar,
    /// Scrolling profile of the elevations seen so far.
    Profile,
}

/// Elevation overlay configuration, covering both modes.
///
/// In `Bar` mode, `background` colors the bar body and `marker_color`
/// the live tracker; the bar geometry itself is fixed relative to the
/// frame (a third of the frame tall, 1:10 aspect, 10 px off the left
/// edge).
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ElevationOverlay {
    /// Rendering mode.
    pub mode: ElevationMode,
    /// Vertical extent of the profile band, in pixels.
    pub y_span: i64,
    /// Horizontal margin as a fraction of frame width.
    pub x_buff: f64,
    /// Bottom edge of the profile band as a fraction of frame height.
    pub y_buff: f64,
    /// Radius of each profile trace dot.
    pub marker_radius: i64,
    /// Trace dot / bar tracker color.
    pub marker_color: Rgb8,
    /// Profile band / bar body color.
    pub background: Rgb8,
    /// Whether to stamp the current elevation as text.
    pub show_text: bool,
}

impl Default for ElevationOverlay {
    fn default() -> Self {
        Self {
            mode: ElevationMode::Profile,
            y_span: 50,
            x_buff: 0.05,
            y_buff: 0.9,
            marker_radius: 1,
            marker_color: [0, 255, 0],
            background: [0, 0, 0],
            show_text: true,
        }
    }
}

impl ElevationOverlay {
    /// Check numeric parameters.
    pub fn validate(&self) -> TrailreelResult<()> {
        if self.y_span < 1 {
            return Err(TrailreelError::validation(
                "elevation overlay y_span must be >= 1",
            ));
        }
        if self.marker_radius < 1 {
            return Err(TrailreelError::validation(
                "elevation overlay marker_radius must be >= 1",
            ));
        }
        for (name, v) in [("x_buff", self.x_buff), ("y_buff", self.y_buff)] {
            if !(0.0..1.0).contains(&v) {
                return Err(TrailreelError::validation(format!(
                    "elevation overlay {name} must be in [0, 1)"
                )));
            }
        }
        Ok(())
    }
}

fn elevation_text_style() -> TextStyle {
    TextStyle {
        scale: 1,
        ..TextStyle::default()
    }
}

/// Draw the historical elevation profile up to waypoint `index`.
///
/// `trace` is caller-owned state holding the dots drawn so far; reset
/// it at the start of each route. The current waypoint's dot is
/// appended before drawing, so the trace always ends at the live
/// position. A flat route pins the trace to the middle of the band.
pub fn draw_elevation_profile(
    frame: &mut RgbImage,
    index: usize,
    route: &crate::route::Route,
    trace: &mut Vec<PixelIndex>,
    cfg: &ElevationOverlay,
) {
    let w = f64::from(frame.width());
    let h = f64::from(frame.height());

    let x_span = (w - 2.0 * cfg.x_buff * w) as i64;
    let x_min = (w * cfg.x_buff) as i64;
    let x_max = x_min + x_span;
    let x_index =
        ((index as f64 / route.len() as f64) * x_span as f64) as i64 + (cfg.x_buff * w) as i64;

    let lo = route
        .elevations_ft
        .iter()
        .cloned()
        .fold(f64::INFINITY, f64::min);
    let hi = route
        .elevations_ft
        .iter()
        .cloned()
        .fold(f64::NEG_INFINITY, f64::max);
    let current = route.elevations_ft[index];

    let y_max = (h * cfg.y_buff) as i64;
    let y_min = y_max - cfg.y_span;

    let frac = if hi > lo { (current - lo) / (hi - lo) } else { 0.5 };
    let y_index = y_max - (frac * cfg.y_span as f64) as i64;

    trace.push(PixelIndex::new(x_index, y_index));

    fill_rect(frame, x_min, y_min, x_max, y_max, cfg.background);

    for p in trace.iter() {
        for q in circle(*p, cfg.marker_radius) {
            put_px(frame, q.x, q.y, cfg.marker_color);
        }
    }

    if cfg.show_text {
        draw_text(
            frame,
            &format!("{current:.1}'"),
            PixelIndex::new(x_index, y_index),
            &elevation_text_style(),
        );
    }
}

/// Draw the fixed elevation bar with its live tracker at waypoint
/// `index`.
pub fn draw_elevation_bar(
    frame: &mut RgbImage,
    index: usize,
    route: &crate::route::Route,
    cfg: &ElevationOverlay,
) {
    let frame_h = frame.height() as i64;

    const BAR_X_OFFSET: i64 = 10;
    const BAR_HEIGHT_PCT: f64 = 0.3;
    const BAR_ASPECT: f64 = 0.1;
    const TRACKER_HEIGHT_PCT: f64 = 0.15;

    let bar_h = (frame_h as f64 * BAR_HEIGHT_PCT) as i64;
    let bar_w = (BAR_ASPECT * bar_h as f64) as i64;
    let bar_top = (frame_h - bar_h) / 2;

    fill_rect(
        frame,
        BAR_X_OFFSET,
        bar_top,
        BAR_X_OFFSET + bar_w,
        bar_top + bar_h,
        cfg.background,
    );

    let tracker_h = ((TRACKER_HEIGHT_PCT * bar_w as f64) as i64).max(1);
    let scale = route.elev_scale[index];
    let tracker_bot = (bar_h as f64 * (1.0 - scale)) as i64 + bar_top;

    fill_rect(
        frame,
        BAR_X_OFFSET,
        tracker_bot - tracker_h,
        BAR_X_OFFSET + bar_w,
        tracker_bot,
        cfg.marker_color,
    );

    if cfg.show_text {
        draw_text(
            frame,
            &format!("{:.1}'", route.elevations_ft[index]),
            PixelIndex::new(BAR_X_OFFSET + bar_w + 10, tracker_bot - tracker_h / 2),
            &elevation_text_style(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Canvas;
    use crate::foundation::core::GeoPoint;
    use crate::route::{Route, RouteParams, TrackSample};
    use chrono::TimeZone as _;

    fn test_route(elevations_m: &[f64]) -> Route {
        let base = RgbImage::from_pixel(100, 100, image::Rgb([0, 0, 0]));
        let discovery = RgbImage::from_pixel(100, 100, image::Rgb([255, 255, 255]));
        let canvas = Canvas::new(
            base,
            discovery,
            GeoPoint::new(1.0, 0.0),
            GeoPoint::new(0.0, 1.0),
        )
        .unwrap();

        let samples: Vec<TrackSample> = elevations_m
            .iter()
            .enumerate()
            .map(|(i, &e)| TrackSample {
                time: chrono::Utc
                    .with_ymd_and_hms(2023, 1, 16, 15, i as u32, 0)
                    .unwrap(),
                lat: 0.5,
                lon: 0.1 + i as f64 * 0.1,
                elevation: e,
            })
            .collect();

        Route::build(&canvas, &samples, vec![], &RouteParams::default()).unwrap()
    }

    #[test]
    fn profile_trace_grows_per_call() {
        let route = test_route(&[10.0, 20.0, 30.0]);
        let mut frame = RgbImage::new(200, 100);
        let mut trace = Vec::new();
        let cfg = ElevationOverlay {
            mode: ElevationMode::Profile,
            show_text: false,
            ..ElevationOverlay::default()
        };

        draw_elevation_profile(&mut frame, 0, &route, &mut trace, &cfg);
        assert_eq!(trace.len(), 1);
        draw_elevation_profile(&mut frame, 1, &route, &mut trace, &cfg);
        assert_eq!(trace.len(), 2);
        // Higher elevation sits higher on screen (smaller y).
        assert!(trace[1].y < trace[0].y);
        assert!(trace[1].x > trace[0].x);
    }

    #[test]
    fn profile_handles_flat_route() {
        let route = test_route(&[15.0, 15.0, 15.0]);
        let mut frame = RgbImage::new(200, 100);
        let mut trace = Vec::new();
        let cfg = ElevationOverlay {
            mode: ElevationMode::Profile,
            show_text: false,
            ..ElevationOverlay::default()
        };
        draw_elevation_profile(&mut frame, 0, &route, &mut trace, &cfg);
        // Pinned mid-band instead of dividing by zero.
        assert_eq!(trace[0].y, 90 - 25);
    }

    #[test]
    fn bar_paints_body_and_tracker() {
        let route = test_route(&[100.0, 200.0]);
        let mut frame = RgbImage::new(200, 200);
        let cfg = ElevationOverlay {
            mode: ElevationMode::Bar,
            marker_color: [255, 0, 0],
            background: [255, 255, 255],
            show_text: false,
            ..ElevationOverlay::default()
        };
        draw_elevation_bar(&mut frame, 0, &route, &cfg);

        let body = frame.pixels().filter(|p| p.0 == [255, 255, 255]).count();
        let tracker = frame.pixels().filter(|p| p.0 == [255, 0, 0]).count();
        assert!(body > 0);
        assert!(tracker > 0);
    }

    #[test]
    fn validate_rejects_bad_span() {
        let cfg = ElevationOverlay {
            y_span: 0,
            ..ElevationOverlay::default()
        };
        assert!(cfg.validate().is_err());
        assert!(ElevationOverlay::default().validate().is_ok());
    }
}
