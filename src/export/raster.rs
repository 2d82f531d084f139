//! PNG encoding of finished cutouts.

use std::io::Cursor;

use base64::{engine::general_purpose, Engine};

use crate::buffer::PixelBuffer;
use crate::error::{CutoutError, CutoutResult};

/// Encode an RGBA buffer as PNG bytes.
pub fn encode_png(image: &PixelBuffer) -> CutoutResult<Vec<u8>> {
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(image.to_rgba_image())
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| CutoutError::encode(e.to_string()))?;
    Ok(buf)
}

/// `data:image/png;base64,...` URL for embedding in SVG.
pub fn png_data_url(image: &PixelBuffer) -> CutoutResult<String> {
    let png = encode_png(image)?;
    Ok(format!("data:image/png;base64,{}", general_purpose::STANDARD.encode(png)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_png_roundtrip_pixels() {
        let mut buffer = PixelBuffer::new(3, 2);
        buffer.set_pixel(2, 1, [10, 20, 30, 40]);
        let png = encode_png(&buffer).unwrap();
        assert_eq!(&png[1..4], b"PNG");

        let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
        assert_eq!(PixelBuffer::from_rgba_image(decoded), buffer);
    }

    #[test]
    fn test_data_url_prefix() {
        let url = png_data_url(&PixelBuffer::filled(1, 1, [1, 2, 3, 4])).unwrap();
        assert!(url.starts_with("data:image/png;base64,iVBORw0KGgo"));
    }
}
