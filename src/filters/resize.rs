//! Bilinear resampling for previews.

use crate::buffer::PixelBuffer;

use super::core::sample_bilinear;

/// Scale an RGBA buffer by `scale` with bilinear interpolation.
///
/// Output dimensions are `round(width * scale)` x `round(height * scale)`,
/// at least 1x1 for a non-empty input. Samples are taken at pixel centers.
pub fn scale_bilinear(image: &PixelBuffer, scale: f32) -> PixelBuffer {
    if image.is_empty() || scale <= 0.0 {
        return PixelBuffer::new(0, 0);
    }

    let out_w = ((image.width() as f32 * scale).round() as usize).max(1);
    let out_h = ((image.height() as f32 * scale).round() as usize).max(1);
    let sx = image.width() as f32 / out_w as f32;
    let sy = image.height() as f32 / out_h as f32;

    let mut result = PixelBuffer::new(out_w, out_h);
    for y in 0..out_h {
        for x in 0..out_w {
            let src_x = (x as f32 + 0.5) * sx - 0.5;
            let src_y = (y as f32 + 0.5) * sy - 0.5;
            let s = sample_bilinear(image, src_x, src_y);
            result.set_pixel(x, y, s.map(|v| v.round().clamp(0.0, 255.0) as u8));
        }
    }

    result
}
