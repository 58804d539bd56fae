//! Geographic-to-pixel transforms and distance helpers.
//!
//! The map is assumed to be an axis-aligned rectangle whose top-left and
//! bottom-right corners correspond to known geographic coordinates; the
//! mapping is a plain linear interpolation per axis, not a geodesic
//! projection.

use crate::foundation::core::{GeoPoint, PixelIndex, EARTH_RADIUS_M};

/// Unit used for geographic distance readouts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum DistanceUnit {
    /// Statute miles.
    #[serde(rename = "mi")]
    Miles,
    /// Kilometers.
    #[serde(rename = "km")]
    Kilometers,
    /// Meters.
    #[serde(rename = "m")]
    Meters,
}

impl DistanceUnit {
    /// Conversion factor from meters into this unit.
    pub fn per_meter(self) -> f64 {
        match self {
            Self::Miles => 0.000_621_371,
            Self::Kilometers => 0.001,
            Self::Meters => 1.0,
        }
    }
}

impl std::fmt::Display for DistanceUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Miles => "mi",
            Self::Kilometers => "km",
            Self::Meters => "m",
        };
        f.write_str(s)
    }
}

/// Map a geographic coordinate to a pixel index inside an image whose
/// top-left and bottom-right corners correspond to `top_left` and
/// `bot_right`.
///
/// `shape` is `(width, height)` in pixels. The horizontal axis scales
/// with the longitude span; the vertical axis scales with the latitude
/// span and is inverted (increasing latitude moves toward the top).
/// Indices are truncated, not rounded, and are NOT bounds checked —
/// out-of-range coordinates produce out-of-range indices that the
/// canvas rejects at write time.
pub fn to_pixel(
    point: GeoPoint,
    top_left: GeoPoint,
    bot_right: GeoPoint,
    shape: (u32, u32),
) -> PixelIndex {
    let (width, height) = shape;

    let span_w = bot_right.lon - top_left.lon;
    let span_h = top_left.lat - bot_right.lat;

    let hor_step = span_w / f64::from(width);
    let ver_step = span_h / f64::from(height);

    let hor = ((point.lon - top_left.lon) / hor_step) as i64;
    let ver = ((top_left.lat - point.lat) / ver_step) as i64;

    PixelIndex::new(hor, ver)
}

/// Euclidean distance between two pixel indices.
pub fn distance_pixels(a: PixelIndex, b: PixelIndex) -> f64 {
    let dx = (a.x - b.x) as f64;
    let dy = (a.y - b.y) as f64;
    (dx * dx + dy * dy).sqrt()
}

/// Haversine of an angular difference, both arguments in radians.
fn haversine(l_1: f64, l_2: f64) -> f64 {
    (1.0 - (l_2 - l_1).cos()) / 2.0
}

/// Great-circle distance between two geographic coordinates in `unit`.
pub fn distance_geo(a: GeoPoint, b: GeoPoint, unit: DistanceUnit) -> f64 {
    let lat_1 = a.lat.to_radians();
    let lat_2 = b.lat.to_radians();
    let lon_1 = a.lon.to_radians();
    let lon_2 = b.lon.to_radians();

    let h = haversine(lat_1, lat_2) + lat_1.cos() * lat_2.cos() * haversine(lon_1, lon_2);

    2.0 * EARTH_RADIUS_M * unit.per_meter() * h.sqrt().asin()
}
