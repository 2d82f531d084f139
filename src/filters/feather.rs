//! Edge feathering for selection masks.
//!
//! Turns a binary mask into a 0-255 alpha ramp with a separable Gaussian blur
//! (horizontal pass, then vertical pass).
//!
//! ## Edge handling
//!
//! Taps that fall outside the image are dropped. With [`EdgeMode::Truncated`]
//! the remaining weights are *not* renormalized, so selected pixels near the
//! image border lose some of their value. [`EdgeMode::Renormalized`] divides by
//! the kernel mass actually used instead, which keeps a fully selected border
//! at 255.

use ndarray::Array2;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::core::gaussian_kernel_radius;
use crate::selection::SelectionMask;

/// Largest accepted feather radius.
pub const MAX_FEATHER_RADIUS: usize = 30;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeMode {
    /// Drop out-of-range taps without renormalizing.
    #[default]
    Truncated,
    /// Divide by the in-range kernel mass.
    Renormalized,
}

/// Per-pixel alpha (0-255) derived from a binary mask.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeatheredMask {
    alpha: Array2<u8>,
}

impl FeatheredMask {
    /// Wrap a (height, width) alpha array.
    pub fn from_array(alpha: Array2<u8>) -> Self {
        Self { alpha }
    }

    pub fn width(&self) -> usize {
        self.alpha.dim().1
    }

    pub fn height(&self) -> usize {
        self.alpha.dim().0
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.alpha[[y, x]]
    }

    pub fn as_array(&self) -> &Array2<u8> {
        &self.alpha
    }

    /// Row-major alpha bytes.
    pub fn to_raw(&self) -> Vec<u8> {
        self.alpha.iter().copied().collect()
    }
}

/// Feather a mask with the default truncated edge handling.
pub fn feather(mask: &SelectionMask, radius: usize) -> FeatheredMask {
    feather_with_mode(mask, radius, EdgeMode::Truncated)
}

/// Feather a mask.
///
/// # Arguments
/// * `mask` - Binary selection mask
/// * `radius` - Blur radius in pixels (0-30); the kernel has `2 * radius + 1` taps
/// * `mode` - How taps outside the image are accounted for
///
/// # Returns
/// Alpha ramp with the mask's dimensions. A zero radius maps {0, 1} to {0, 255}
/// exactly.
#[tracing::instrument(skip(mask), fields(width = mask.width(), height = mask.height()))]
pub fn feather_with_mode(mask: &SelectionMask, radius: usize, mode: EdgeMode) -> FeatheredMask {
    let (width, height) = mask.dims();
    let radius = radius.min(MAX_FEATHER_RADIUS);

    if radius == 0 || width == 0 || height == 0 {
        return FeatheredMask {
            alpha: mask.as_array().mapv(|v| if v != 0 { 255 } else { 0 }),
        };
    }

    let kernel = gaussian_kernel_radius(radius);
    let source: Vec<f64> = mask
        .as_array()
        .iter()
        .map(|&v| if v != 0 { 255.0 } else { 0.0 })
        .collect();

    // Sums in f64, intermediate rows stored as f32
    let mut temp = vec![0.0f32; width * height];
    let mut alpha = vec![0u8; width * height];

    // Horizontal pass
    temp.par_chunks_mut(width).enumerate().for_each(|(y, row)| {
        let src = &source[y * width..(y + 1) * width];
        for (x, out) in row.iter_mut().enumerate() {
            *out = convolve_tap(&kernel, radius, x, width, mode, |sx| src[sx]) as f32;
        }
    });

    // Vertical pass, clamped and rounded half to even
    alpha.par_chunks_mut(width).enumerate().for_each(|(y, row)| {
        for (x, out) in row.iter_mut().enumerate() {
            let v = convolve_tap(&kernel, radius, y, height, mode, |sy| temp[sy * width + x] as f64);
            *out = to_alpha(v);
        }
    });

    FeatheredMask {
        alpha: Array2::from_shape_vec((height, width), alpha)
            .unwrap_or_else(|_| Array2::<u8>::zeros((height, width))),
    }
}

#[inline]
fn to_alpha(v: f64) -> u8 {
    if v.is_nan() {
        return 0;
    }
    v.clamp(0.0, 255.0).round_ties_even() as u8
}

/// Sum the in-range taps of a 1D kernel centered at `pos`.
#[inline]
fn convolve_tap(
    kernel: &[f64],
    radius: usize,
    pos: usize,
    len: usize,
    mode: EdgeMode,
    sample: impl Fn(usize) -> f64,
) -> f64 {
    let mut sum = 0.0f64;
    let mut mass = 0.0f64;
    for (ki, &kv) in kernel.iter().enumerate() {
        let s = pos as isize + ki as isize - radius as isize;
        if s < 0 || s >= len as isize {
            continue;
        }
        sum += sample(s as usize) * kv;
        mass += kv;
    }
    match mode {
        EdgeMode::Truncated => sum,
        EdgeMode::Renormalized if mass > 0.0 => sum / mass,
        EdgeMode::Renormalized => 0.0,
    }
}
