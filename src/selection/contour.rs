//! Contour extraction from cropped RGBA cutouts.
//!
//! Traces a single closed boundary around the opaque region of an image for
//! use as an SVG clip path. The walk moves between 4-connected opaque pixels,
//! always preferring a left turn, and stops when it returns to the start.
//!
//! Only the first boundary found in row-major order is traced. Holes and
//! disjoint regions are not part of the result.

use tracing::warn;

use crate::buffer::{PixelBuffer, Point};
use crate::error::{CutoutError, CutoutResult};

/// Alpha above which a pixel counts as opaque.
pub const OPACITY_THRESHOLD: u8 = 128;

/// Unit steps for up, right, down, left (direction codes 0-3).
const DIRECTIONS: [(i32, i32); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];

/// Closed boundary in integer pixel coordinates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContourPath {
    pub points: Vec<Point>,
}

impl ContourPath {
    /// SVG path data: `M x0,y0 L x1,y1 ... Z`.
    pub fn to_svg_path(&self) -> String {
        let mut path = String::with_capacity(self.points.len() * 10);
        for (i, p) in self.points.iter().enumerate() {
            if i > 0 {
                path.push(' ');
            }
            path.push_str(&format!("{} {},{}", if i == 0 { 'M' } else { 'L' }, p.x, p.y));
        }
        path.push_str(" Z");
        path
    }

    /// Shoelace area of the polygon through the points.
    pub fn area(&self) -> f64 {
        let n = self.points.len();
        if n < 3 {
            return 0.0;
        }
        let twice: i64 = (0..n)
            .map(|i| {
                let a = self.points[i];
                let b = self.points[(i + 1) % n];
                a.x as i64 * b.y as i64 - b.x as i64 * a.y as i64
            })
            .sum();
        twice.abs() as f64 / 2.0
    }

    /// Number of heading changes around the closed loop.
    pub fn direction_changes(&self) -> usize {
        let n = self.points.len();
        if n < 2 {
            return 0;
        }
        let headings: Vec<(i32, i32)> = (0..n)
            .map(|i| {
                let a = self.points[i];
                let b = self.points[(i + 1) % n];
                (b.x - a.x, b.y - a.y)
            })
            .collect();
        (0..n).filter(|&i| headings[i] != headings[(i + 1) % n]).count()
    }
}

/// Check if pixel is opaque (treating out-of-bounds as transparent).
#[inline]
fn is_opaque(image: &PixelBuffer, x: i32, y: i32) -> bool {
    image.contains(x as i64, y as i64) && image.alpha(x as usize, y as usize) > OPACITY_THRESHOLD
}

/// First opaque pixel in row-major order that sits in the top row or below a
/// non-opaque pixel.
fn find_start(image: &PixelBuffer) -> Option<Point> {
    for y in 0..image.height() as i32 {
        for x in 0..image.width() as i32 {
            if is_opaque(image, x, y) && (y == 0 || !is_opaque(image, x, y - 1)) {
                return Some(Point::new(x, y));
            }
        }
    }
    None
}

/// Trace the outer boundary of the first opaque region.
///
/// Fails with [`CutoutError::NoContour`] when the image has no opaque pixel or
/// the walk cannot get back to its start.
#[tracing::instrument(skip(image), fields(width = image.width(), height = image.height()))]
pub fn trace_contour(image: &PixelBuffer) -> CutoutResult<ContourPath> {
    let Some(start) = find_start(image) else {
        warn!("no opaque pixel to trace");
        return Err(CutoutError::NoContour);
    };

    // Each (pixel, direction) state can occur at most once before the walk repeats.
    let max_steps = image.width() * image.height() * 4 + 4;

    let mut points = Vec::new();
    let mut p = start;
    let mut dir = 0usize;

    loop {
        points.push(p);

        let next = (0..4).map(|i| (dir + 3 + i) % 4).find_map(|d| {
            let (dx, dy) = DIRECTIONS[d];
            let (nx, ny) = (p.x + dx, p.y + dy);
            is_opaque(image, nx, ny).then_some((d, Point::new(nx, ny)))
        });

        let Some((d, np)) = next else {
            warn!(?start, "trace ended without closing the contour");
            return Err(CutoutError::NoContour);
        };
        dir = d;
        p = np;

        if p == start {
            break;
        }
        if points.len() >= max_steps {
            warn!(?start, "trace did not return to its start");
            return Err(CutoutError::NoContour);
        }
    }

    tracing::debug!(points = points.len(), "contour traced");
    Ok(ContourPath { points })
}
