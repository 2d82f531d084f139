//! Cropping the source image against a feathered selection.

use rayon::prelude::*;

use crate::buffer::PixelBuffer;
use crate::filters::FeatheredMask;
use crate::selection::Bounds;

/// Cut `bounds` out of `source`, weighting alpha by the feathered mask.
///
/// Each destination pixel copies the source RGB and gets
/// `source alpha * feather / 255`. Pixels whose feather value is zero are left
/// fully transparent (all channels zero).
///
/// Panics if the feathered mask does not match the source dimensions or the
/// bounds reach outside the source.
pub fn crop(source: &PixelBuffer, feathered: &FeatheredMask, bounds: Bounds) -> PixelBuffer {
    assert_eq!(
        (feathered.width(), feathered.height()),
        (source.width(), source.height()),
        "feathered mask must match the source dimensions"
    );
    assert!(
        bounds.min_x + bounds.width <= source.width() && bounds.min_y + bounds.height <= source.height(),
        "crop bounds exceed the source image"
    );

    if bounds.width == 0 || bounds.height == 0 {
        return PixelBuffer::new(bounds.width, bounds.height);
    }

    let src = source.as_array();
    let alpha = feathered.as_array();
    let mut flat = vec![0u8; bounds.width * bounds.height * 4];

    flat.par_chunks_mut(bounds.width * 4).enumerate().for_each(|(y, row)| {
        let sy = bounds.min_y + y;
        for x in 0..bounds.width {
            let sx = bounds.min_x + x;
            let f = alpha[[sy, sx]];
            if f == 0 {
                continue;
            }
            let px = &mut row[x * 4..x * 4 + 4];
            px[0] = src[[sy, sx, 0]];
            px[1] = src[[sy, sx, 1]];
            px[2] = src[[sy, sx, 2]];
            px[3] = (src[[sy, sx, 3]] as f32 * (f as f32 / 255.0)).round() as u8;
        }
    });

    PixelBuffer::from_rgba(bounds.width, bounds.height, flat)
        .unwrap_or_else(|_| PixelBuffer::new(bounds.width, bounds.height))
}
