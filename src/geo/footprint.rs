//! Pixel footprints: filled circles, filled squares, and thin line paths.
//!
//! These are plain index generators; nothing here touches an image.
//! Bounds checking happens at the canvas write site.

use crate::foundation::core::PixelIndex;

/// All pixels strictly inside a circle of `radius` around `center`.
///
/// Membership uses a strict comparison, so a point exactly on the
/// radius boundary is excluded. `radius` of 1 yields the center alone;
/// a non-positive radius yields nothing.
pub fn circle(center: PixelIndex, radius: i64) -> Vec<PixelIndex> {
    let mut out = Vec::new();
    for dx in -radius..=radius {
        for dy in -radius..=radius {
            let dist = ((dx * dx + dy * dy) as f64).sqrt();
            if dist < radius as f64 {
                out.push(center.offset(dx, dy));
            }
        }
    }
    out
}

/// The full `side` x `side` block centered on `center`.
///
/// `side` is forced odd (decremented when even) so the block has a
/// well-defined center pixel. A side of 1 or less yields the center
/// alone.
pub fn square(center: PixelIndex, side: i64) -> Vec<PixelIndex> {
    let side = if side % 2 == 0 { side - 1 } else { side };
    if side <= 1 {
        return vec![center];
    }

    let ends = (side - 1) / 2;
    let mut out = Vec::with_capacity((side * side) as usize);
    for dx in -ends..=ends {
        for dy in -ends..=ends {
            out.push(center.offset(dx, dy));
        }
    }
    out
}

/// Pixels of a straight single-pixel-wide path from `start` to `end`,
/// inclusive of both.
///
/// One pixel is emitted per unit step along the dominant axis (the axis
/// with the greater absolute delta); the minor-axis coordinate is
/// derived from the line angle. The path is gap-free along the dominant
/// axis but may skip minor-axis rows for near-diagonal segments, which
/// is acceptable for the thin overlay guides this feeds. A zero-length
/// segment yields an empty path.
pub fn line(start: PixelIndex, end: PixelIndex) -> Vec<PixelIndex> {
    let d_x = end.x - start.x;
    let d_y = end.y - start.y;

    let ang = if d_x != 0 {
        (d_y as f64 / d_x as f64).atan()
    } else {
        std::f64::consts::PI
    };

    let mut out = Vec::new();

    if d_x.abs() >= d_y.abs() {
        if d_x == 0 {
            return out;
        }
        let step = if d_x < 0 { -1 } else { 1 };
        let mut x = start.x;
        loop {
            let y = ((x - start.x) as f64 * ang.tan()) as i64 + start.y;
            out.push(PixelIndex::new(x, y));
            if x == end.x {
                break;
            }
            x += step;
        }
    } else {
        let step = if d_y < 0 { -1 } else { 1 };
        let mut y = start.y;
        loop {
            let x = if d_x == 0 {
                start.x
            } else {
                ((y - start.y) as f64 / ang.tan()) as i64 + start.x
            };
            out.push(PixelIndex::new(x, y));
            if y == end.y {
                break;
            }
            y += step;
        }
    }

    out
}
