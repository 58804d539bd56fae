/// Opaque 3-component color value.
///
/// Channel order is whatever the caller's image buffers use; the engine
/// only copies and compares these values.
pub type Rgb8 = [u8; 3];

/// Absolute 0-based frame index in output timeline order.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Integer pixel position inside a map image.
///
/// `x` grows rightward and `y` grows downward from the image origin.
/// Values may lie outside any particular image; validity is checked at
/// the point of use (see [`crate::Canvas::write_pixel`]), never assumed.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize, Default,
)]
pub struct PixelIndex {
    /// Horizontal index, measured rightward.
    pub x: i64,
    /// Vertical index, measured downward.
    pub y: i64,
}

impl PixelIndex {
    /// Create a pixel index.
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Translate by an offset.
    pub fn offset(self, dx: i64, dy: i64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// A geographic coordinate in decimal degrees.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GeoPoint {
    /// Latitude in decimal degrees (positive north).
    pub lat: f64,
    /// Longitude in decimal degrees (positive east).
    pub lon: f64,
}

impl GeoPoint {
    /// Create a geographic coordinate.
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Earth radius in meters at roughly 45 degrees latitude.
pub const EARTH_RADIUS_M: f64 = 6_367_303.0;

/// Feet per meter, for elevation readouts.
pub const FEET_PER_METER: f64 = 3.28084;
