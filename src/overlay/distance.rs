//! Live distance readout.

use image::RgbImage;

use crate::foundation::core::PixelIndex;
use crate::foundation::error::{TrailreelError, TrailreelResult};
use crate::geo::transform::DistanceUnit;
use crate::overlay::text::{draw_text, TextStyle};

/// Distance overlay configuration.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DistanceOverlay {
    /// Unit the accumulated distance is computed and labeled in.
    pub unit: DistanceUnit,
    /// Horizontal offset from the left edge, as a fraction of frame
    /// width.
    pub x_buff: f64,
    /// Vertical offset from the top edge, as a fraction of frame
    /// height.
    pub y_buff: f64,
}

impl Default for DistanceOverlay {
    fn default() -> Self {
        Self {
            unit: DistanceUnit::Miles,
            x_buff: 0.05,
            y_buff: 0.1,
        }
    }
}

impl DistanceOverlay {
    /// Check fractional offsets.
    pub fn validate(&self) -> TrailreelResult<()> {
        for (name, v) in [("x_buff", self.x_buff), ("y_buff", self.y_buff)] {
            if !(0.0..1.0).contains(&v) {
                return Err(TrailreelError::validation(format!(
                    "distance overlay {name} must be in [0, 1)"
                )));
            }
        }
        Ok(())
    }
}

/// Stamp the accumulated distance onto the frame.
pub fn draw_distance(frame: &mut RgbImage, distance: f64, cfg: &DistanceOverlay) {
    let pos = PixelIndex::new(
        (f64::from(frame.width()) * cfg.x_buff) as i64,
        (f64::from(frame.height()) * cfg.y_buff) as i64,
    );
    draw_text(
        frame,
        &format!("{distance:.3} {}", cfg.unit),
        pos,
        &TextStyle::default(),
    );
}
