//! Full-image preview composition.
//!
//! Layers are drawn strictly in this order:
//! 1. base image
//! 2. applied texts
//! 3. selection tint
//! 4. dashed selection bounds outline
//! 5. active tool preview
//!
//! The tint and outline never reach exported pixels.

use crate::buffer::PixelBuffer;
use crate::filters::core::{blend_pixel, scale_alpha};
use crate::selection::{Bounds, SelectionMask};

use super::text::{draw_text_faded, draw_texts, AppliedText};

/// Tint drawn over selected cells.
pub const SELECTION_TINT: [u8; 3] = [0, 255, 255];
/// Outline color, white at 90% alpha.
pub const OUTLINE_COLOR: [u8; 4] = [255, 255, 255, 230];
/// Dash and gap length of the outline, in pixels.
pub const OUTLINE_DASH: usize = 4;

/// What the active tool contributes on top of everything else.
#[derive(Clone, Debug, PartialEq)]
pub enum ToolPreview {
    /// Pending text. Drawn opaque once placed, at 60% while it follows the cursor.
    Text { text: AppliedText, placed: bool },
}

/// Inputs for one preview frame.
pub struct PreviewLayers<'a> {
    pub base: &'a PixelBuffer,
    pub texts: &'a [AppliedText],
    pub mask: Option<&'a SelectionMask>,
    pub bounds: Option<Bounds>,
    /// Tint opacity in percent (0-100).
    pub selection_opacity: u8,
    pub tool: Option<&'a ToolPreview>,
}

/// Compose a preview frame.
pub fn render_preview(layers: &PreviewLayers<'_>) -> PixelBuffer {
    let mut frame = layers.base.clone();

    draw_texts(&mut frame, layers.texts, Default::default());

    if let Some(mask) = layers.mask {
        draw_selection_tint(&mut frame, mask, layers.selection_opacity);
    }

    if let Some(bounds) = layers.bounds {
        draw_bounds_outline(&mut frame, bounds);
    }

    if let Some(ToolPreview::Text { text, placed }) = layers.tool {
        if !text.text.is_empty() {
            draw_text_faded(&mut frame, text, if *placed { 1.0 } else { 0.6 });
        }
    }

    frame
}

/// Blend the tint over every selected cell. Alpha is `round(opacity * 2.55)`.
pub fn draw_selection_tint(frame: &mut PixelBuffer, mask: &SelectionMask, opacity_percent: u8) {
    assert_eq!(
        mask.dims(),
        (frame.width(), frame.height()),
        "selection mask must match the preview dimensions"
    );
    let alpha = scale_alpha(255, opacity_percent.min(100) as f32 / 100.0);
    if alpha == 0 {
        return;
    }
    let [r, g, b] = SELECTION_TINT;
    for ((y, x), &v) in mask.as_array().indexed_iter() {
        if v != 0 {
            blend_pixel(frame, x as i64, y as i64, [r, g, b, alpha]);
        }
    }
}

/// Dashed 1px rectangle one pixel outside `bounds`, walked clockwise from the
/// top-left corner.
pub fn draw_bounds_outline(frame: &mut PixelBuffer, bounds: Bounds) {
    let left = bounds.min_x as i64 - 1;
    let top = bounds.min_y as i64 - 1;
    let right = (bounds.min_x + bounds.width) as i64;
    let bottom = (bounds.min_y + bounds.height) as i64;

    let mut perimeter = Vec::new();
    perimeter.extend((left..right).map(|x| (x, top)));
    perimeter.extend((top..bottom).map(|y| (right, y)));
    perimeter.extend((left + 1..=right).rev().map(|x| (x, bottom)));
    perimeter.extend((top + 1..=bottom).rev().map(|y| (left, y)));

    for (i, (x, y)) in perimeter.into_iter().enumerate() {
        if (i / OUTLINE_DASH) % 2 == 0 {
            blend_pixel(frame, x, y, OUTLINE_COLOR);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Point;
    use crate::selection::mask_bounds;

    #[test]
    fn test_tint_only_on_selection() {
        let base = PixelBuffer::filled(6, 6, [0, 0, 0, 255]);
        let mask = SelectionMask::from_fn(6, 6, |x, _| x < 3);
        let frame = render_preview(&PreviewLayers {
            base: &base,
            texts: &[],
            mask: Some(&mask),
            bounds: None,
            selection_opacity: 100,
            tool: None,
        });
        assert_eq!(frame.pixel(0, 0), [0, 255, 255, 255]);
        assert_eq!(frame.pixel(5, 5), [0, 0, 0, 255]);
    }

    #[test]
    fn test_zero_opacity_leaves_base() {
        let base = PixelBuffer::filled(4, 4, [9, 9, 9, 255]);
        let mask = SelectionMask::full(4, 4);
        let frame = render_preview(&PreviewLayers {
            base: &base,
            texts: &[],
            mask: Some(&mask),
            bounds: None,
            selection_opacity: 0,
            tool: None,
        });
        assert_eq!(frame, base);
    }

    #[test]
    fn test_outline_is_outside_bounds_and_dashed() {
        let base = PixelBuffer::filled(30, 30, [0, 0, 0, 255]);
        let mask = SelectionMask::from_fn(30, 30, |x, y| (5..25).contains(&x) && (5..15).contains(&y));
        let bounds = mask_bounds(&mask).unwrap();
        let frame = render_preview(&PreviewLayers {
            base: &base,
            texts: &[],
            mask: None,
            bounds: Some(bounds),
            selection_opacity: 0,
            tool: None,
        });
        // Top edge runs along y = 4 starting at x = 4: on, on, on, on, off x4, ...
        for i in 0..8 {
            let lit = frame.pixel(4 + i, 4)[0] > 0;
            assert_eq!(lit, i < 4, "x={}", 4 + i);
        }
        // Inside the bounds stays untouched.
        assert_eq!(frame.pixel(5, 5), [0, 0, 0, 255]);
    }

    #[test]
    fn test_outline_at_image_edge_is_clipped() {
        let base = PixelBuffer::filled(5, 5, [0, 0, 0, 255]);
        let bounds = mask_bounds(&SelectionMask::full(5, 5)).unwrap();
        let frame = render_preview(&PreviewLayers {
            base: &base,
            texts: &[],
            mask: None,
            bounds: Some(bounds),
            selection_opacity: 0,
            tool: None,
        });
        assert_eq!(frame, base);
    }

    #[test]
    fn test_layer_order_tool_preview_on_top() {
        let base = PixelBuffer::filled(40, 40, [0, 0, 0, 255]);
        let mask = SelectionMask::full(40, 40);
        let pending = AppliedText::new("#", "#ff0000", 16, Point::new(2, 2)).unwrap();
        let tool = ToolPreview::Text {
            text: pending,
            placed: true,
        };
        let frame = render_preview(&PreviewLayers {
            base: &base,
            texts: &[],
            mask: Some(&mask),
            bounds: None,
            selection_opacity: 50,
            tool: Some(&tool),
        });
        // Some pixel of the glyph is pure red, drawn after the tint.
        let red = (0..40).flat_map(|y| (0..40).map(move |x| (x, y))).any(|(x, y)| frame.pixel(x, y) == [255, 0, 0, 255]);
        assert!(red);
    }

    #[test]
    fn test_applied_text_under_tint() {
        let base = PixelBuffer::filled(40, 40, [0, 0, 0, 255]);
        let mask = SelectionMask::full(40, 40);
        let texts = vec![AppliedText::new("#", "#ff0000", 16, Point::new(2, 2)).unwrap()];
        let frame = render_preview(&PreviewLayers {
            base: &base,
            texts: &texts,
            mask: Some(&mask),
            bounds: None,
            selection_opacity: 50,
            tool: None,
        });
        let red = (0..40).flat_map(|y| (0..40).map(move |x| (x, y))).any(|(x, y)| frame.pixel(x, y) == [255, 0, 0, 255]);
        assert!(!red);
    }
}
