//! Magic wand selection using flood fill algorithm.
//!
//! Selects the 4-connected region of pixels whose RGB color lies within a
//! Euclidean distance of the seed pixel's own color. The reference color is
//! fixed at the seed; it is never a running average of the region.

use std::collections::VecDeque;

use crate::buffer::{PixelBuffer, Point};

use super::mask::SelectionMask;

/// Largest accepted tolerance.
pub const MAX_TOLERANCE: u8 = 100;

/// Magic wand selection result with metadata.
pub struct MagicWandResult {
    /// Selection mask (1 = selected, 0 = not selected)
    pub mask: SelectionMask,
    /// Number of selected pixels
    pub pixel_count: usize,
}

/// Perform magic wand selection using flood fill.
///
/// # Arguments
/// * `image` - Source RGBA buffer
/// * `seed` - Starting coordinate
/// * `tolerance` - Maximum RGB distance from the seed color (0-100)
///
/// # Returns
/// Selection mask with the dimensions of `image`. A seed outside the image
/// (or an empty image) yields an empty mask.
pub fn flood_select(image: &PixelBuffer, seed: Point, tolerance: u8) -> SelectionMask {
    flood_select_detailed(image, seed, tolerance).mask
}

/// Perform magic wand selection with detailed results.
#[tracing::instrument(skip(image), fields(width = image.width(), height = image.height()))]
pub fn flood_select_detailed(image: &PixelBuffer, seed: Point, tolerance: u8) -> MagicWandResult {
    let (width, height) = (image.width(), image.height());
    let mut mask = SelectionMask::empty(width, height);

    if image.is_empty() || !image.contains(seed.x as i64, seed.y as i64) {
        return MagicWandResult {
            mask,
            pixel_count: 0,
        };
    }

    let (start_x, start_y) = (seed.x as usize, seed.y as usize);
    let [ref_r, ref_g, ref_b, _] = image.pixel(start_x, start_y);
    let tol = tolerance.min(MAX_TOLERANCE) as u32;
    let tol_sq = tol * tol;

    let mut pixel_count = 0;
    let mut queue = VecDeque::with_capacity(width.max(height) * 4);
    let mut visited = vec![false; width * height];

    queue.push_back((start_x, start_y));
    visited[start_y * width + start_x] = true;

    while let Some((x, y)) = queue.pop_front() {
        let [r, g, b, _] = image.pixel(x, y);

        if rgb_distance_sq(r, g, b, ref_r, ref_g, ref_b) > tol_sq {
            continue;
        }

        mask.set(x, y, true);
        pixel_count += 1;

        for (dx, dy) in [(1i64, 0i64), (-1, 0), (0, 1), (0, -1)] {
            let nx = x as i64 + dx;
            let ny = y as i64 + dy;

            if nx >= 0 && nx < width as i64 && ny >= 0 && ny < height as i64 {
                let nx = nx as usize;
                let ny = ny as usize;
                let nidx = ny * width + nx;
                if !visited[nidx] {
                    visited[nidx] = true;
                    queue.push_back((nx, ny));
                }
            }
        }
    }

    tracing::debug!(pixel_count, "flood fill finished");

    MagicWandResult { mask, pixel_count }
}

/// Squared Euclidean distance over RGB, alpha ignored.
///
/// Comparing squared integers against `tolerance²` is exact and equivalent to
/// comparing `sqrt(d²)` against the tolerance.
#[inline]
fn rgb_distance_sq(r: u8, g: u8, b: u8, ref_r: u8, ref_g: u8, ref_b: u8) -> u32 {
    let dr = r as i32 - ref_r as i32;
    let dg = g as i32 - ref_g as i32;
    let db = b as i32 - ref_b as i32;

    (dr * dr + dg * dg + db * db) as u32
}

/// Euclidean RGB distance, range 0 to ~441.7.
pub fn rgb_distance(a: [u8; 4], b: [u8; 4]) -> f32 {
    (rgb_distance_sq(a[0], a[1], a[2], b[0], b[1], b[2]) as f32).sqrt()
}
