//! Core utilities for image processing filters.
//!
//! This module provides shared functionality used by multiple filters:
//! - Gaussian kernel generation
//! - Color blending utilities
//! - Bilinear sampling

use crate::buffer::PixelBuffer;

/// Generate a normalized 1D Gaussian kernel of size `2 * radius + 1`.
///
/// # Arguments
/// * `radius` - Kernel half-width in pixels; `sigma = radius / 2`
///
/// # Returns
/// Kernel weights `exp(-0.5 * d² / sigma²)` normalized to sum to 1.
/// A zero radius yields the identity kernel `[1.0]`.
pub fn gaussian_kernel_radius(radius: usize) -> Vec<f64> {
    if radius == 0 {
        return vec![1.0];
    }

    let sigma = radius as f64 / 2.0;
    let sigma_sq = sigma * sigma;

    let mut kernel = Vec::with_capacity(2 * radius + 1);
    let mut sum = 0.0f64;
    for i in 0..=2 * radius {
        let d = i as f64 - radius as f64;
        let v = (-0.5 * (d * d) / sigma_sq).exp();
        kernel.push(v);
        sum += v;
    }

    // Normalize
    for v in kernel.iter_mut() {
        *v /= sum;
    }

    kernel
}

/// Blend color onto existing pixel using alpha.
///
/// Uses Porter-Duff "over" compositing.
#[inline]
pub fn blend_over_u8(dst: &mut [u8; 4], src_r: u8, src_g: u8, src_b: u8, src_a: u8) {
    if src_a == 0 {
        return;
    }
    if src_a == 255 {
        *dst = [src_r, src_g, src_b, 255];
        return;
    }

    let src_af = src_a as f32 / 255.0;
    let dst_af = dst[3] as f32 / 255.0;
    let out_a = src_af + dst_af * (1.0 - src_af);

    if out_a > 0.0 {
        let mix = |s: u8, d: u8| {
            ((s as f32 * src_af + d as f32 * dst_af * (1.0 - src_af)) / out_a)
                .round()
                .clamp(0.0, 255.0) as u8
        };
        dst[0] = mix(src_r, dst[0]);
        dst[1] = mix(src_g, dst[1]);
        dst[2] = mix(src_b, dst[2]);
        dst[3] = (out_a * 255.0).round() as u8;
    }
}

/// Blend `rgba` over the pixel at (x, y), ignoring coordinates outside the buffer.
#[inline]
pub fn blend_pixel(target: &mut PixelBuffer, x: i64, y: i64, rgba: [u8; 4]) {
    if !target.contains(x, y) {
        return;
    }
    let (x, y) = (x as usize, y as usize);
    let mut dst = target.pixel(x, y);
    blend_over_u8(&mut dst, rgba[0], rgba[1], rgba[2], rgba[3]);
    target.set_pixel(x, y, dst);
}

/// Scale an alpha value by an opacity in 0.0-1.0.
#[inline]
pub fn scale_alpha(alpha: u8, opacity: f32) -> u8 {
    (alpha as f32 * opacity.clamp(0.0, 1.0)).round() as u8
}

/// Bilinear sample with edge clamping. Returns RGBA as f32 in 0-255.
pub fn sample_bilinear(image: &PixelBuffer, x: f32, y: f32) -> [f32; 4] {
    let max_x = image.width() as isize - 1;
    let max_y = image.height() as isize - 1;

    let x0 = x.floor() as isize;
    let y0 = y.floor() as isize;
    let fx = x - x.floor();
    let fy = y - y.floor();

    let at = |px: isize, py: isize| image.pixel(px.clamp(0, max_x) as usize, py.clamp(0, max_y) as usize);

    let p00 = at(x0, y0);
    let p10 = at(x0 + 1, y0);
    let p01 = at(x0, y0 + 1);
    let p11 = at(x0 + 1, y0 + 1);

    let mut out = [0.0f32; 4];
    for c in 0..4 {
        out[c] = p00[c] as f32 * (1.0 - fx) * (1.0 - fy)
            + p10[c] as f32 * fx * (1.0 - fy)
            + p01[c] as f32 * (1.0 - fx) * fy
            + p11[c] as f32 * fx * fy;
    }
    out
}
