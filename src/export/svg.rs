//! SVG export of cutouts.
//!
//! The document clips the embedded raster with the traced contour and adds one
//! `<text>` element per applied text, positioned relative to the crop origin.

use crate::buffer::{PixelBuffer, Point};
use crate::composite::AppliedText;
use crate::error::CutoutResult;
use crate::selection::{trace_contour, ContourPath};

use super::raster::png_data_url;

/// Font family written into `<text>` elements.
pub const FONT_FAMILY: &str = "sans-serif";

/// Escape `& < > " '` for use in XML text and attribute values.
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

/// One `<text>` element, top-aligned at the position relative to `origin`.
pub fn text_element(text: &AppliedText, origin: Point) -> String {
    let pos = text.pos.offset_by(origin);
    format!(
        r#"<text x="{}" y="{}" font-family="{}" font-size="{}" font-weight="bold" fill="{}" dominant-baseline="hanging">{}</text>"#,
        pos.x,
        pos.y,
        FONT_FAMILY,
        text.size,
        text.hex_color(),
        escape_xml(&text.text)
    )
}

/// Assemble the SVG document.
///
/// # Arguments
/// * `width`, `height` - Cutout size in pixels
/// * `contour` - Clip path
/// * `image_href` - URL of the embedded raster (usually a PNG data URL)
/// * `texts` - Applied texts in image coordinates
/// * `origin` - Crop top-left corner in image coordinates
pub fn build_svg(
    width: usize,
    height: usize,
    contour: &ContourPath,
    image_href: &str,
    texts: &[AppliedText],
    origin: Point,
) -> String {
    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
        width, height, width, height
    );
    svg.push('\n');
    svg.push_str("  <defs>\n");
    svg.push_str("    <clipPath id=\"cutout-path\">\n");
    svg.push_str(&format!("      <path d=\"{}\" />\n", contour.to_svg_path()));
    svg.push_str("    </clipPath>\n");
    svg.push_str("  </defs>\n");
    svg.push_str(&format!(
        r#"  <image href="{}" width="{}" height="{}" clip-path="url(#cutout-path)" />"#,
        escape_xml(image_href),
        width,
        height
    ));
    svg.push('\n');

    for text in texts {
        svg.push_str("  ");
        svg.push_str(&text_element(text, origin));
        svg.push('\n');
    }

    svg.push_str("</svg>\n");
    svg
}

/// Trace the cutout and build its SVG with the raster embedded as PNG.
///
/// Fails with `NoContour` when the cutout has no closed opaque boundary; no
/// document is produced in that case.
pub fn export_svg(cutout: &PixelBuffer, texts: &[AppliedText], origin: Point) -> CutoutResult<String> {
    let contour = trace_contour(cutout)?;
    let href = png_data_url(cutout)?;
    Ok(build_svg(cutout.width(), cutout.height(), &contour, &href, texts, origin))
}
