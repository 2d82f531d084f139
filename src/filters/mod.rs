//! Filter modules for mask and image processing.
//!
//! ## Supported Formats
//!
//! | Input | Storage | Description |
//! |-------|---------|-------------|
//! | Selection mask | `Array2<u8>` (H, W) | Binary 0/1 cells |
//! | Feathered mask | `Array2<u8>` (H, W) | Alpha ramp, 0-255 |
//! | RGBA8 | `Array3<u8>` (H, W, 4) | RGB + alpha, 0-255 |
//!
//! ## Filter Categories
//!
//! - **Feather**: separable Gaussian blur of a binary mask into an alpha ramp
//! - **Resize**: bilinear scaling used by the cropped preview
//! - **Core**: kernels, Porter-Duff blending and sampling shared by the above
//!
//! Row passes run on rayon; output does not depend on the thread count.

pub mod core;
pub mod feather;
pub mod resize;

pub use feather::{feather, feather_with_mode, EdgeMode, FeatheredMask};
pub use resize::scale_bilinear;
