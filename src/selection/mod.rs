//! Selection algorithms for cutout editing.
//!
//! This module provides the pixel-level selection tools:
//! - **Magic wand**: Flood fill based color/tolerance selection
//! - **Mask algebra**: Replace, union, difference and invert
//! - **Brush**: Circular stamps along a pointer path
//! - **Bounds**: Tight bounding box of the selected cells
//! - **Contour tracing**: Closed boundary path for vector export
//!
//! Every operation takes its input masks by reference and returns a fresh mask.

pub mod algebra;
pub mod bounds;
pub mod brush;
pub mod contour;
pub mod magic_wand;
pub mod mask;

pub use algebra::{combine, combine_with_current, invert};
pub use bounds::{mask_bounds, Bounds};
pub use brush::{brush_radius, stamp, stroke, stroke_points};
pub use contour::{trace_contour, ContourPath};
pub use magic_wand::flood_select;
pub use mask::{SelectionMask, SelectionMode};
