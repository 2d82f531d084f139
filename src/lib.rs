//! Cutout Rust Core
//!
//! Selection, feathering, cropping and export for cutting a region out of an
//! RGBA image, with Python bindings via PyO3 and WASM bindings for JavaScript.
//!
//! ## Image Format
//! - **RGBA images**: (height, width, 4) `u8` arrays wrapped in [`PixelBuffer`]
//! - **Selection masks**: (height, width) `u8` arrays holding 0 or 1
//! - **Feathered masks**: (height, width) `u8` arrays holding 0-255 alpha
//!
//! ## Pipeline
//! 1. Build a [`SelectionMask`] with the magic wand and brush, combined through
//!    the selection mode (new, add, subtract) or inverted.
//! 2. Isolate: feather the mask, take its bounds and crop the source.
//! 3. Export the cutout as PNG or as an SVG clipped to its traced contour,
//!    with applied texts drawn on top.
//!
//! [`EditorSession`] drives the pipeline with the editor's state rules; every
//! step is also available as a pure function.

pub mod buffer;
pub mod composite;
pub mod config;
pub mod error;
pub mod export;
pub mod filters;
pub mod selection;
pub mod session;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use buffer::{parse_hex_color, PixelBuffer, Point};
pub use composite::{crop, overlay_text, render_preview, AppliedText, PreviewLayers, ToolPreview};
pub use config::{EditorSettings, TextStyle};
pub use error::{CutoutError, CutoutResult};
pub use export::{encode_png, export_svg, png_data_url};
pub use filters::{feather, feather_with_mode, EdgeMode, FeatheredMask};
pub use selection::{
    combine, flood_select, invert, mask_bounds, stamp, stroke, trace_contour, Bounds, ContourPath, SelectionMask,
    SelectionMode,
};
pub use session::{CroppedArtifact, EditorSession};

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use numpy::{IntoPyArray, PyArray2, PyArray3, PyReadonlyArray2, PyReadonlyArray3};
    use pyo3::exceptions::PyValueError;
    use pyo3::prelude::*;

    use crate::buffer::{PixelBuffer, Point};
    use crate::error::CutoutError;
    use crate::filters::{feather_with_mode, EdgeMode};
    use crate::selection::{self, SelectionMask, SelectionMode};

    fn py_err(err: CutoutError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }

    fn to_buffer(image: &PyReadonlyArray3<'_, u8>) -> PyResult<PixelBuffer> {
        PixelBuffer::from_array(image.as_array().to_owned()).map_err(py_err)
    }

    fn to_mask(mask: &PyReadonlyArray2<'_, u8>) -> SelectionMask {
        SelectionMask::from_array(mask.as_array().to_owned())
    }

    fn parse_mode(mode: &str) -> PyResult<SelectionMode> {
        match mode {
            "new" => Ok(SelectionMode::New),
            "add" => Ok(SelectionMode::Add),
            "subtract" => Ok(SelectionMode::Subtract),
            other => Err(PyValueError::new_err(format!("unknown selection mode: {other}"))),
        }
    }

    // ========================================================================
    // Selection
    // ========================================================================

    /// Flood-select the 4-connected region around (x, y) within `tolerance`.
    ///
    /// Returns a (height, width) mask of 0/1.
    #[pyfunction]
    #[pyo3(signature = (image, x, y, tolerance=20))]
    pub fn magic_wand_select<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        x: i32,
        y: i32,
        tolerance: u8,
    ) -> PyResult<Bound<'py, PyArray2<u8>>> {
        let buffer = to_buffer(&image)?;
        let mask = selection::flood_select(&buffer, Point::new(x, y), tolerance);
        Ok(mask.as_array().clone().into_pyarray(py))
    }

    /// Combine two masks with mode "new", "add" or "subtract".
    #[pyfunction]
    pub fn combine_masks<'py>(
        py: Python<'py>,
        existing: PyReadonlyArray2<'py, u8>,
        fresh: PyReadonlyArray2<'py, u8>,
        mode: &str,
    ) -> PyResult<Bound<'py, PyArray2<u8>>> {
        let (existing, fresh) = (to_mask(&existing), to_mask(&fresh));
        if existing.dims() != fresh.dims() {
            return Err(PyValueError::new_err("mask dimensions differ"));
        }
        let combined = selection::combine(&existing, &fresh, parse_mode(mode)?);
        Ok(combined.as_array().clone().into_pyarray(py))
    }

    /// Flip every cell of a mask.
    #[pyfunction]
    pub fn invert_mask<'py>(py: Python<'py>, mask: PyReadonlyArray2<'py, u8>) -> Bound<'py, PyArray2<u8>> {
        selection::invert(&to_mask(&mask)).as_array().clone().into_pyarray(py)
    }

    /// Brush stroke from (x0, y0) to (x1, y1). A single stamp when both points match.
    #[pyfunction]
    #[pyo3(signature = (mask, x0, y0, x1, y1, radius, add=true))]
    #[allow(clippy::too_many_arguments)]
    pub fn brush_stroke<'py>(
        py: Python<'py>,
        mask: PyReadonlyArray2<'py, u8>,
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        radius: u32,
        add: bool,
    ) -> Bound<'py, PyArray2<u8>> {
        let out = selection::stroke(&to_mask(&mask), Point::new(x0, y0), Point::new(x1, y1), radius, add);
        out.as_array().clone().into_pyarray(py)
    }

    /// Tight bounds as (min_x, min_y, width, height), or None for an empty mask.
    #[pyfunction]
    pub fn mask_bounds(mask: PyReadonlyArray2<'_, u8>) -> Option<(usize, usize, usize, usize)> {
        selection::mask_bounds(&to_mask(&mask)).map(|b| (b.min_x, b.min_y, b.width, b.height))
    }

    // ========================================================================
    // Feather and crop
    // ========================================================================

    /// Gaussian-feather a 0/1 mask into 0-255 alpha.
    #[pyfunction]
    #[pyo3(signature = (mask, radius, renormalize=false))]
    pub fn feather_mask<'py>(
        py: Python<'py>,
        mask: PyReadonlyArray2<'py, u8>,
        radius: usize,
        renormalize: bool,
    ) -> Bound<'py, PyArray2<u8>> {
        let mode = if renormalize { EdgeMode::Renormalized } else { EdgeMode::Truncated };
        feather_with_mode(&to_mask(&mask), radius, mode).as_array().clone().into_pyarray(py)
    }

    /// Feather the mask and crop the image to its bounds.
    #[pyfunction]
    #[pyo3(signature = (image, mask, radius=2))]
    pub fn crop_selection<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        mask: PyReadonlyArray2<'py, u8>,
        radius: usize,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let buffer = to_buffer(&image)?;
        let mask = to_mask(&mask);
        if mask.dims() != (buffer.width(), buffer.height()) {
            return Err(PyValueError::new_err("mask dimensions differ from the image"));
        }
        let bounds = selection::mask_bounds(&mask).ok_or_else(|| py_err(CutoutError::NoSelection))?;
        let feathered = feather_with_mode(&mask, radius, EdgeMode::Truncated);
        let cutout = crate::composite::crop(&buffer, &feathered, bounds);
        Ok(cutout.as_array().clone().into_pyarray(py))
    }

    // ========================================================================
    // Export
    // ========================================================================

    /// SVG path data around the first opaque region of an RGBA cutout.
    #[pyfunction]
    pub fn trace_contour(image: PyReadonlyArray3<'_, u8>) -> PyResult<String> {
        let buffer = to_buffer(&image)?;
        let contour = selection::trace_contour(&buffer).map_err(py_err)?;
        Ok(contour.to_svg_path())
    }

    /// Complete SVG document for an RGBA cutout (no texts).
    #[pyfunction]
    pub fn cutout_svg(image: PyReadonlyArray3<'_, u8>) -> PyResult<String> {
        let buffer = to_buffer(&image)?;
        crate::export::export_svg(&buffer, &[], Point::default()).map_err(py_err)
    }

    /// PNG bytes for an RGBA image.
    #[pyfunction]
    pub fn encode_png(image: PyReadonlyArray3<'_, u8>) -> PyResult<Vec<u8>> {
        let buffer = to_buffer(&image)?;
        crate::export::encode_png(&buffer).map_err(py_err)
    }

    /// Python module definition
    #[pymodule]
    pub fn cutout_rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
        // Selection
        m.add_function(wrap_pyfunction!(magic_wand_select, m)?)?;
        m.add_function(wrap_pyfunction!(combine_masks, m)?)?;
        m.add_function(wrap_pyfunction!(invert_mask, m)?)?;
        m.add_function(wrap_pyfunction!(brush_stroke, m)?)?;
        m.add_function(wrap_pyfunction!(mask_bounds, m)?)?;

        // Feather and crop
        m.add_function(wrap_pyfunction!(feather_mask, m)?)?;
        m.add_function(wrap_pyfunction!(crop_selection, m)?)?;

        // Export
        m.add_function(wrap_pyfunction!(trace_contour, m)?)?;
        m.add_function(wrap_pyfunction!(cutout_svg, m)?)?;
        m.add_function(wrap_pyfunction!(encode_png, m)?)?;

        Ok(())
    }
}

#[cfg(feature = "python")]
pub use python::cutout_rust;
