//! Pixel storage shared by every stage of the pipeline.
//!
//! ## Layout
//! A [`PixelBuffer`] is an RGBA u8 image stored as an `ndarray` of shape
//! (height, width, 4), the same layout the filters use everywhere else.
//! Coordinates are (x, y) with the origin at the top-left corner.

use ndarray::{Array3, ArrayView3};
use serde::{Deserialize, Serialize};

use crate::error::{CutoutError, CutoutResult};

/// Integer pixel coordinate. Signed so that pointer positions outside the
/// image can be represented and then clipped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset_by(&self, origin: Point) -> Point {
        Point::new(self.x - origin.x, self.y - origin.y)
    }
}

/// RGBA u8 image.
#[derive(Clone, Debug, PartialEq)]
pub struct PixelBuffer {
    data: Array3<u8>,
}

impl PixelBuffer {
    /// Create a fully transparent buffer.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            data: Array3::<u8>::zeros((height, width, 4)),
        }
    }

    /// Create a buffer filled with one color.
    pub fn filled(width: usize, height: usize, rgba: [u8; 4]) -> Self {
        let mut buffer = Self::new(width, height);
        buffer.fill(rgba);
        buffer
    }

    /// Wrap raw RGBA bytes (row-major, 4 bytes per pixel).
    pub fn from_rgba(width: usize, height: usize, bytes: Vec<u8>) -> CutoutResult<Self> {
        let expected = width * height * 4;
        if bytes.len() != expected {
            return Err(CutoutError::InvalidBuffer {
                expected,
                actual: bytes.len(),
            });
        }
        let data = Array3::from_shape_vec((height, width, 4), bytes).map_err(|_| {
            CutoutError::InvalidBuffer {
                expected,
                actual: expected,
            }
        })?;
        Ok(Self { data })
    }

    pub fn from_array(data: Array3<u8>) -> CutoutResult<Self> {
        let (height, width, channels) = data.dim();
        if channels != 4 {
            return Err(CutoutError::InvalidBuffer {
                expected: width * height * 4,
                actual: width * height * channels,
            });
        }
        Ok(Self {
            data: data.as_standard_layout().to_owned(),
        })
    }

    pub fn from_rgba_image(image: image::RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        let data = Array3::from_shape_vec((height as usize, width as usize, 4), image.into_raw())
            .unwrap_or_else(|_| Array3::<u8>::zeros((0, 0, 4)));
        Self { data }
    }

    pub fn to_rgba_image(&self) -> image::RgbaImage {
        image::RgbaImage::from_raw(self.width() as u32, self.height() as u32, self.to_raw())
            .unwrap_or_else(|| image::RgbaImage::new(0, 0))
    }

    pub fn width(&self) -> usize {
        self.data.dim().1
    }

    pub fn height(&self) -> usize {
        self.data.dim().0
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width() && (y as usize) < self.height()
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        [
            self.data[[y, x, 0]],
            self.data[[y, x, 1]],
            self.data[[y, x, 2]],
            self.data[[y, x, 3]],
        ]
    }

    #[inline]
    pub fn set_pixel(&mut self, x: usize, y: usize, rgba: [u8; 4]) {
        for (c, v) in rgba.into_iter().enumerate() {
            self.data[[y, x, c]] = v;
        }
    }

    #[inline]
    pub fn alpha(&self, x: usize, y: usize) -> u8 {
        self.data[[y, x, 3]]
    }

    pub fn fill(&mut self, rgba: [u8; 4]) {
        for mut px in self.data.rows_mut() {
            for (c, v) in rgba.into_iter().enumerate() {
                px[c] = v;
            }
        }
    }

    pub fn view(&self) -> ArrayView3<'_, u8> {
        self.data.view()
    }

    pub fn as_array(&self) -> &Array3<u8> {
        &self.data
    }

    /// Row-major RGBA bytes.
    pub fn to_raw(&self) -> Vec<u8> {
        self.data.iter().copied().collect()
    }

    pub fn into_raw(self) -> Vec<u8> {
        let (raw, _) = self.data.into_raw_vec_and_offset();
        raw
    }
}

/// Parse a CSS-style hex color: `#RGB`, `#RRGGBB` or `#RRGGBBAA`.
pub fn parse_hex_color(value: &str) -> CutoutResult<[u8; 4]> {
    let hex = value
        .strip_prefix('#')
        .ok_or_else(|| CutoutError::color(value))?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(CutoutError::color(value));
    }

    let byte = |s: &str| u8::from_str_radix(s, 16).map_err(|_| CutoutError::color(value));

    match hex.len() {
        3 => {
            let mut out = [0u8, 0, 0, 255];
            for (i, c) in hex.chars().enumerate() {
                let v = byte(&c.to_string())?;
                out[i] = v * 17;
            }
            Ok(out)
        }
        6 => Ok([byte(&hex[0..2])?, byte(&hex[2..4])?, byte(&hex[4..6])?, 255]),
        8 => Ok([
            byte(&hex[0..2])?,
            byte(&hex[2..4])?,
            byte(&hex[4..6])?,
            byte(&hex[6..8])?,
        ]),
        _ => Err(CutoutError::color(value)),
    }
}
