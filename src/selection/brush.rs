//! Freehand brush editing of selection masks.
//!
//! A stroke is a sequence of circular stamps. Pointer samples that arrive far
//! apart are joined by linearly interpolated stamps so fast motion leaves no gaps.

use crate::buffer::Point;

use super::mask::SelectionMask;

/// Largest stamp radius; radii above it are clamped.
pub const MAX_BRUSH_RADIUS: u32 = 50;

/// Stamp radius for a brush of the given diameter.
pub fn brush_radius(brush_size: u32) -> u32 {
    (brush_size / 2).min(MAX_BRUSH_RADIUS)
}

/// Return a copy of `mask` with a disc of `radius` around `center` set to
/// `add`. Cells outside the mask are clipped and `radius` is clamped to
/// [`MAX_BRUSH_RADIUS`].
pub fn stamp(mask: &SelectionMask, center: Point, radius: u32, add: bool) -> SelectionMask {
    let mut out = mask.clone();
    stamp_in_place(&mut out, center, radius, add);
    out
}

/// Stamp into a mask the caller exclusively owns.
pub(crate) fn stamp_in_place(mask: &mut SelectionMask, center: Point, radius: u32, add: bool) {
    let (width, height) = (mask.width() as i64, mask.height() as i64);
    let r = radius.min(MAX_BRUSH_RADIUS) as i64;
    let r_sq = r * r;

    for dy in -r..=r {
        let y = center.y as i64 + dy;
        if y < 0 || y >= height {
            continue;
        }
        for dx in -r..=r {
            let x = center.x as i64 + dx;
            if x < 0 || x >= width {
                continue;
            }
            if dx * dx + dy * dy <= r_sq {
                mask.set(x as usize, y as usize, add);
            }
        }
    }
}

/// Stamp centers joining two consecutive pointer samples.
///
/// Samples are spaced `radius / 4` apart: `steps = max(1, round(distance / spacing))`
/// and the points at `t = i / steps` for `i` in `0..=steps` are returned, so
/// both endpoints are always included.
pub fn stroke_points(prev: Point, curr: Point, radius: u32) -> Vec<Point> {
    let dx = curr.x as f64 - prev.x as f64;
    let dy = curr.y as f64 - prev.y as f64;
    let distance = dx.hypot(dy);
    let spacing = radius.min(MAX_BRUSH_RADIUS) as f64 / 4.0;

    let steps = if spacing > 0.0 {
        ((distance / spacing).round() as usize).max(1)
    } else {
        // Zero radius: one stamp per whole pixel traversed.
        (distance.ceil() as usize).max(1)
    };

    (0..=steps)
        .map(|i| {
            let t = i as f64 / steps as f64;
            Point::new(
                round_half_up(prev.x as f64 * (1.0 - t) + curr.x as f64 * t),
                round_half_up(prev.y as f64 * (1.0 - t) + curr.y as f64 * t),
            )
        })
        .collect()
}

/// Stamp every interpolated point between `prev` and `curr`.
///
/// The segment is first clipped to the mask grown by `radius`, so pointer
/// samples far outside the image cost no more than ones at its edge.
pub fn stroke(mask: &SelectionMask, prev: Point, curr: Point, radius: u32, add: bool) -> SelectionMask {
    let mut out = mask.clone();
    let radius = radius.min(MAX_BRUSH_RADIUS);
    let r = radius as f64;
    let reach = (
        (-r - 1.0, -r - 1.0),
        (mask.width() as f64 + r, mask.height() as f64 + r),
    );
    let Some((from, to)) = clip_segment(prev, curr, reach) else {
        return out;
    };

    let mut last = None;
    for p in stroke_points(from, to, radius) {
        if last == Some(p) {
            continue;
        }
        stamp_in_place(&mut out, p, radius, add);
        last = Some(p);
    }
    out
}

/// Liang-Barsky clip of `a`-`b` to the rectangle `(min, max)`.
fn clip_segment(a: Point, b: Point, (min, max): ((f64, f64), (f64, f64))) -> Option<(Point, Point)> {
    let (ax, ay) = (a.x as f64, a.y as f64);
    let (dx, dy) = (b.x as f64 - ax, b.y as f64 - ay);
    let (mut t0, mut t1) = (0.0f64, 1.0f64);

    for (p, q) in [(-dx, ax - min.0), (dx, max.0 - ax), (-dy, ay - min.1), (dy, max.1 - ay)] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            if t > t1 {
                return None;
            }
            t0 = t0.max(t);
        } else {
            if t < t0 {
                return None;
            }
            t1 = t1.min(t);
        }
    }

    let at = |t: f64| Point::new(round_half_up(ax + t * dx), round_half_up(ay + t * dy));
    Some((at(t0), at(t1)))
}

#[inline]
fn round_half_up(v: f64) -> i32 {
    (v + 0.5).floor() as i32
}
