//! Route model: a time-ordered GPS track expanded into per-waypoint
//! pixel footprints, plus photo attachments matched to their nearest
//! waypoint.

use chrono::{DateTime, Utc};
use image::RgbImage;

use crate::canvas::Canvas;
use crate::foundation::core::{GeoPoint, PixelIndex, FEET_PER_METER};
use crate::foundation::error::{TrailreelError, TrailreelResult};
use crate::geo::footprint::{circle, square};
use crate::geo::transform::distance_pixels;
use crate::viewport::ViewBox;

/// Footprint shape drawn around each waypoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    /// Filled circle of the configured radius.
    Circle,
    /// Filled square of the configured side length.
    Square,
}

/// One time-ordered GPS track sample, as supplied by the track source.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
pub struct TrackSample {
    /// Sample timestamp.
    pub time: DateTime<Utc>,
    /// Latitude in decimal degrees.
    pub lat: f64,
    /// Longitude in decimal degrees.
    pub lon: f64,
    /// Elevation in meters.
    pub elevation: f64,
}

/// Route construction parameters, validated once by
/// [`RouteParams::validate`] before any waypoint is built.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RouteParams {
    /// Reveal footprint radius (circle) or side length (square).
    pub dim: i64,
    /// Marker footprint radius; smaller than `dim` in practice so the
    /// position dot stays visible inside the revealed terrain.
    pub marker_radius: i64,
    /// Footprint shape for both reveal area and marker.
    pub shape: Shape,
    /// Extra pixels added around the route bounds for the zoom box.
    pub buff: i64,
    /// Lower end of the elevation-bar scale, in feet.
    pub min_elev: f64,
    /// Upper end of the elevation-bar scale, in feet.
    pub max_elev: f64,
    /// Photos taken within this many hours of the route start are
    /// eligible for attachment.
    pub photo_window_hours: i64,
}

impl Default for RouteParams {
    fn default() -> Self {
        Self {
            dim: 1,
            marker_radius: 9,
            shape: Shape::Circle,
            buff: 0,
            min_elev: 0.0,
            max_elev: 1200.0,
            photo_window_hours: 3,
        }
    }
}

impl RouteParams {
    /// Check numeric parameters, rejecting anything the orchestrator
    /// must never see.
    pub fn validate(&self) -> TrailreelResult<()> {
        if self.dim < 1 {
            return Err(TrailreelError::validation("route dim must be >= 1"));
        }
        if self.marker_radius < 1 {
            return Err(TrailreelError::validation(
                "route marker_radius must be >= 1",
            ));
        }
        if self.buff < 0 {
            return Err(TrailreelError::validation("route buff must be >= 0"));
        }
        if self.min_elev >= self.max_elev {
            return Err(TrailreelError::validation(
                "route min_elev must be < max_elev",
            ));
        }
        if self.photo_window_hours < 0 {
            return Err(TrailreelError::validation(
                "route photo_window_hours must be >= 0",
            ));
        }
        Ok(())
    }
}

/// One track sample in canvas pixel space, with its precomputed reveal
/// and marker footprints. Immutable once the route is built.
#[derive(Clone, Debug)]
pub struct Waypoint {
    /// Center pixel of the sample.
    pub index: PixelIndex,
    /// Elevation in meters.
    pub elevation: f64,
    /// Pixels revealed when the route passes this waypoint.
    pub footprint: Vec<PixelIndex>,
    /// Pixels of the smaller position marker.
    pub marker: Vec<PixelIndex>,
}

/// A photo plus its pre-extracted geo metadata, as supplied by the
/// photo source.
#[derive(Clone, Debug)]
pub struct PhotoCandidate {
    /// Decoded photo pixels.
    pub image: RgbImage,
    /// Where the photo was taken.
    pub position: GeoPoint,
    /// When the photo was taken.
    pub taken_at: DateTime<Utc>,
}

/// A photo accepted onto a route, anchored at its map position and
/// matched to the nearest waypoint. Immutable once computed.
#[derive(Clone, Debug)]
pub struct PhotoAttachment {
    /// Decoded photo pixels.
    pub image: RgbImage,
    /// Geo-derived anchor pixel on the canvas.
    pub index: PixelIndex,
    /// When the photo was taken.
    pub taken_at: DateTime<Utc>,
    /// Index of the waypoint closest to the anchor (ties resolve to the
    /// lowest waypoint index).
    pub nearest_waypoint: usize,
    /// Width-over-height aspect ratio of the photo.
    pub aspect_ratio: f64,
}

/// An ordered walk: waypoints in chronological track order, the derived
/// zoom box, elevation series, and sorted photo attachments.
pub struct Route {
    /// Waypoints in track order; never reordered.
    pub waypoints: Vec<Waypoint>,
    /// Time of the first track sample.
    pub start_time: DateTime<Utc>,
    /// Per-waypoint elevation in feet, for the overlays.
    pub elevations_ft: Vec<f64>,
    /// Per-waypoint elevation normalized to the configured bar scale.
    pub elev_scale: Vec<f64>,
    /// Bounding box over all waypoint indices (min corner, max corner).
    pub bounds: (PixelIndex, PixelIndex),
    /// Buffered, aspect-corrected, canvas-clamped zoom viewport.
    pub zoom: ViewBox,
    /// Photo attachments, sorted ascending by nearest waypoint.
    pub photos: Vec<PhotoAttachment>,
}

impl Route {
    /// Build a route from a chronological track, matching `photos`
    /// whose capture time falls within the configured window of the
    /// route start.
    pub fn build(
        canvas: &Canvas,
        samples: &[TrackSample],
        photos: Vec<PhotoCandidate>,
        params: &RouteParams,
    ) -> TrailreelResult<Self> {
        params.validate()?;

        if samples.is_empty() {
            return Err(TrailreelError::validation("track must be non-empty"));
        }
        if samples.windows(2).any(|w| w[1].time < w[0].time) {
            return Err(TrailreelError::validation(
                "track samples must be in chronological order",
            ));
        }

        let fill = |center: PixelIndex, dim: i64| match params.shape {
            Shape::Circle => circle(center, dim),
            Shape::Square => square(center, dim),
        };

        let waypoints: Vec<Waypoint> = samples
            .iter()
            .map(|s| {
                let index = canvas.index_of(GeoPoint::new(s.lat, s.lon));
                Waypoint {
                    index,
                    elevation: s.elevation,
                    footprint: fill(index, params.dim),
                    marker: fill(index, params.marker_radius),
                }
            })
            .collect();

        let min = PixelIndex::new(
            waypoints.iter().map(|w| w.index.x).min().unwrap_or(0),
            waypoints.iter().map(|w| w.index.y).min().unwrap_or(0),
        );
        let max = PixelIndex::new(
            waypoints.iter().map(|w| w.index.x).max().unwrap_or(0),
            waypoints.iter().map(|w| w.index.y).max().unwrap_or(0),
        );

        let zoom = zoom_box(canvas, min, max, params.dim + params.buff);

        let elevations_ft: Vec<f64> = samples
            .iter()
            .map(|s| s.elevation * FEET_PER_METER)
            .collect();
        let span = params.max_elev - params.min_elev;
        let elev_scale: Vec<f64> = elevations_ft
            .iter()
            .map(|e| (e - params.min_elev) / span)
            .collect();

        let start_time = samples[0].time;

        let mut attachments = Vec::new();
        for photo in photos {
            let delta_secs = (photo.taken_at - start_time).num_seconds().abs();
            if delta_secs > params.photo_window_hours * 3600 {
                continue;
            }
            if photo.image.width() == 0 || photo.image.height() == 0 {
                return Err(TrailreelError::validation("photo image must be non-empty"));
            }

            let index = canvas.index_of(photo.position);
            let mut nearest = 0usize;
            let mut best = f64::INFINITY;
            for (n, wp) in waypoints.iter().enumerate() {
                let delta = distance_pixels(index, wp.index);
                if delta < best {
                    best = delta;
                    nearest = n;
                }
            }

            let aspect_ratio = f64::from(photo.image.width()) / f64::from(photo.image.height());
            attachments.push(PhotoAttachment {
                image: photo.image,
                index,
                taken_at: photo.taken_at,
                nearest_waypoint: nearest,
                aspect_ratio,
            });
        }
        attachments.sort_by_key(|a| a.nearest_waypoint);

        Ok(Self {
            waypoints,
            start_time,
            elevations_ft,
            elev_scale,
            bounds: (min, max),
            zoom,
            photos: attachments,
        })
    }

    /// Number of waypoints on the route.
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Whether the route has no waypoints (never true for a built
    /// route).
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }
}

/// Derive the zoom viewport for a route bounding box expanded by
/// `fringe` pixels on all sides.
///
/// The height follows the larger span: the vertical span directly, or
/// the horizontal span divided by the canvas aspect ratio, so the box
/// always matches the canvas aspect.
fn zoom_box(canvas: &Canvas, min: PixelIndex, max: PixelIndex, fringe: i64) -> ViewBox {
    let top_left = min.offset(-fringe, -fringe);
    let bot_right = max.offset(fringe, fringe);

    let d_x = bot_right.x - top_left.x;
    let d_y = bot_right.y - top_left.y;

    let center = PixelIndex::new(
        (top_left.x as f64 + d_x as f64 / 2.0) as i64,
        (top_left.y as f64 + d_y as f64 / 2.0) as i64,
    );

    let aspect = canvas.aspect_ratio();
    let height = if d_x > d_y {
        (d_x as f64 / aspect) as i64
    } else {
        d_y
    };

    let (w, h) = canvas.shape();
    ViewBox::new(center, height, aspect).crop_to_limits((w as i64, h as i64))
}
