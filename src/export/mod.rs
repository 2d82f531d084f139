//! Export artifacts for a finished cutout.
//!
//! - **Raster**: PNG bytes and PNG data URLs
//! - **SVG**: contour-clipped vector document with the raster embedded

pub mod raster;
pub mod svg;

pub use raster::{encode_png, png_data_url};
pub use svg::{build_svg, escape_xml, export_svg};
