//! Compositing: cutting the selection out of the source and drawing on it.
//!
//! - **Crop**: RGBA cutout sized to the selection bounds, alpha-weighted by the feathered mask
//! - **Text**: bitmap text overlay, top-aligned, drawn in insertion order
//! - **Preview**: layered full-image preview with selection tint and bounds outline

pub mod crop;
pub mod preview;
pub mod text;

pub use crop::crop;
pub use preview::{render_preview, PreviewLayers, ToolPreview};
pub use text::{overlay_text, AppliedText};
