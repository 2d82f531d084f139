//! Text overlay using the built-in 8x8 bitmap font.
//!
//! Glyphs are scaled so one character cell is `size` x `size` pixels and drawn
//! bold (double-struck) with the top edge of the cell at the placement point.

use font8x8::{UnicodeFonts, BASIC_FONTS, LATIN_FONTS};
use serde::{Deserialize, Serialize};

use crate::buffer::{parse_hex_color, PixelBuffer, Point};
use crate::error::CutoutResult;
use crate::filters::core::{blend_pixel, scale_alpha};

/// Smallest and largest accepted text size in pixels.
pub const MIN_TEXT_SIZE: u32 = 8;
pub const MAX_TEXT_SIZE: u32 = 200;

/// A piece of text committed to the image.
///
/// Serialized with the color as a hex string, e.g.
/// `{"text": "Hi", "color": "#FF8000", "size": 48, "pos": {"x": 10, "y": 20}}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedText {
    pub text: String,
    #[serde(with = "hex_color")]
    pub color: [u8; 4],
    pub size: u32,
    pub pos: Point,
}

impl AppliedText {
    /// Build from a hex color string (`#RGB`, `#RRGGBB` or `#RRGGBBAA`).
    pub fn new(text: impl Into<String>, color: &str, size: u32, pos: Point) -> CutoutResult<Self> {
        Ok(Self {
            text: text.into(),
            color: parse_hex_color(color)?,
            size: size.clamp(MIN_TEXT_SIZE, MAX_TEXT_SIZE),
            pos,
        })
    }

    /// `#RRGGBB`, or `#RRGGBBAA` when the color is not opaque.
    pub fn hex_color(&self) -> String {
        format_hex_color(self.color)
    }
}

fn format_hex_color([r, g, b, a]: [u8; 4]) -> String {
    if a == 255 {
        format!("#{r:02X}{g:02X}{b:02X}")
    } else {
        format!("#{r:02X}{g:02X}{b:02X}{a:02X}")
    }
}

mod hex_color {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(color: &[u8; 4], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_hex_color(*color))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<[u8; 4], D::Error> {
        let value = String::deserialize(deserializer)?;
        super::parse_hex_color(&value).map_err(D::Error::custom)
    }
}

fn glyph(ch: char) -> [u8; 8] {
    BASIC_FONTS
        .get(ch)
        .or_else(|| LATIN_FONTS.get(ch))
        .or_else(|| BASIC_FONTS.get('?'))
        .unwrap_or([0; 8])
}

/// Draw one string with its cell's top-left corner at `origin`.
pub fn draw_text(target: &mut PixelBuffer, text: &str, origin: Point, size: u32, color: [u8; 4]) {
    let size = size.max(1) as i64;
    let bold = (size / 16).max(1);
    let mut cursor_x = origin.x as i64;
    let top = origin.y as i64;

    for ch in text.chars() {
        let rows = glyph(ch);
        for dy in 0..size {
            let row_bits = rows[(dy * 8 / size) as usize];
            if row_bits == 0 {
                continue;
            }
            for dx in 0..size + bold {
                let covered = (0..=bold).any(|shift| {
                    let sx = dx - shift;
                    sx >= 0 && sx < size && (row_bits >> ((sx * 8 / size) as u32)) & 1 == 1
                });
                if covered {
                    blend_pixel(target, cursor_x + dx, top + dy, color);
                }
            }
        }
        cursor_x += size;
    }
}

/// Draw every text in order, translated by `origin` (the crop's top-left
/// corner in image coordinates). Later entries cover earlier ones.
pub fn draw_texts(target: &mut PixelBuffer, texts: &[AppliedText], origin: Point) {
    for t in texts {
        draw_text(target, &t.text, t.pos.offset_by(origin), t.size, t.color);
    }
}

/// Return a copy of `target` with the texts drawn on top.
pub fn overlay_text(target: &PixelBuffer, texts: &[AppliedText], origin: Point) -> PixelBuffer {
    let mut out = target.clone();
    draw_texts(&mut out, texts, origin);
    out
}

/// Draw texts at `scale` after translating by `origin`.
pub fn draw_texts_scaled(target: &mut PixelBuffer, texts: &[AppliedText], origin: Point, scale: f32) {
    for t in texts {
        let offset = t.pos.offset_by(origin);
        let pos = Point::new(
            (offset.x as f32 * scale).round() as i32,
            (offset.y as f32 * scale).round() as i32,
        );
        let size = ((t.size as f32 * scale).round() as u32).max(1);
        draw_text(target, &t.text, pos, size, t.color);
    }
}

/// Draw a text with its alpha scaled by `opacity`.
pub fn draw_text_faded(target: &mut PixelBuffer, text: &AppliedText, opacity: f32) {
    let [r, g, b, a] = text.color;
    draw_text(target, &text.text, text.pos, text.size, [r, g, b, scale_alpha(a, opacity)]);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opaque_pixels(image: &PixelBuffer) -> Vec<(usize, usize)> {
        let mut out = Vec::new();
        for y in 0..image.height() {
            for x in 0..image.width() {
                if image.alpha(x, y) > 0 {
                    out.push((x, y));
                }
            }
        }
        out
    }

    #[test]
    fn test_new_parses_color() {
        let t = AppliedText::new("Hi", "#ff8000", 48, Point::new(1, 2)).unwrap();
        assert_eq!(t.color, [255, 128, 0, 255]);
        assert_eq!(t.hex_color(), "#FF8000");
        assert!(AppliedText::new("Hi", "orange", 48, Point::new(1, 2)).is_err());
    }

    #[test]
    fn test_json_uses_hex_color() {
        let t = AppliedText::new("Hi", "#ff800080", 20, Point::new(3, 4)).unwrap();
        let json = serde_json::to_string(&t).unwrap();
        assert!(json.contains(r##""color":"#FF800080""##), "{json}");
        assert_eq!(serde_json::from_str::<AppliedText>(&json).unwrap(), t);

        let parsed: AppliedText =
            serde_json::from_str(r##"{"text":"x","color":"#fff","size":12,"pos":{"x":1,"y":2}}"##).unwrap();
        assert_eq!(parsed.color, [255, 255, 255, 255]);
        assert!(serde_json::from_str::<AppliedText>(r#"{"text":"x","color":"white","size":12,"pos":{"x":1,"y":2}}"#).is_err());
    }

    #[test]
    fn test_size_is_clamped() {
        let t = AppliedText::new("x", "#fff", 1, Point::default()).unwrap();
        assert_eq!(t.size, MIN_TEXT_SIZE);
    }

    #[test]
    fn test_top_edge_at_y() {
        let mut image = PixelBuffer::new(40, 40);
        // 'T' has ink in its first row.
        draw_text(&mut image, "T", Point::new(5, 10), 16, [255, 255, 255, 255]);
        let pixels = opaque_pixels(&image);
        assert!(!pixels.is_empty());
        let min_y = pixels.iter().map(|p| p.1).min().unwrap();
        let max_y = pixels.iter().map(|p| p.1).max().unwrap();
        assert_eq!(min_y, 10);
        assert!(max_y < 26);
        assert!(pixels.iter().all(|p| p.0 >= 5));
    }

    #[test]
    fn test_origin_offset_and_clipping() {
        let texts = vec![AppliedText::new("T", "#ffffff", 16, Point::new(12, 20)).unwrap()];
        let base = PixelBuffer::new(30, 30);
        let out = overlay_text(&base, &texts, Point::new(10, 10));
        let min_y = opaque_pixels(&out).iter().map(|p| p.1).min().unwrap();
        assert_eq!(min_y, 10);
        assert!(base.to_raw().iter().all(|&v| v == 0));

        // Entirely outside: nothing drawn, no panic.
        let outside = overlay_text(&base, &texts, Point::new(200, 200));
        assert!(opaque_pixels(&outside).is_empty());
    }

    #[test]
    fn test_later_text_layers_over_earlier() {
        let base = PixelBuffer::new(20, 20);
        let texts = vec![
            AppliedText::new("#", "#ff0000", 16, Point::new(0, 0)).unwrap(),
            AppliedText::new("#", "#0000ff", 16, Point::new(0, 0)).unwrap(),
        ];
        let out = overlay_text(&base, &texts, Point::default());
        for (x, y) in opaque_pixels(&out) {
            assert_eq!(out.pixel(x, y), [0, 0, 255, 255]);
        }
    }

    #[test]
    fn test_space_draws_nothing() {
        let mut image = PixelBuffer::new(20, 20);
        draw_text(&mut image, "  ", Point::new(0, 0), 8, [255, 255, 255, 255]);
        assert!(opaque_pixels(&image).is_empty());
    }
}
