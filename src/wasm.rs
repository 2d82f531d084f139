//! WebAssembly exports for cutout editing.
//!
//! These functions are exposed to JavaScript via wasm-bindgen.
//!
//! Images cross the boundary as flat RGBA byte arrays (length =
//! width * height * 4, row-major) and masks as flat byte arrays of
//! width * height cells. Errors are raised as JavaScript exceptions.

use wasm_bindgen::prelude::*;

use crate::buffer::{PixelBuffer, Point};
use crate::composite::{crop, AppliedText};
use crate::error::CutoutError;
use crate::export::{encode_png, export_svg};
use crate::filters::{feather_with_mode, EdgeMode};
use crate::selection::{self, SelectionMask, SelectionMode};

fn js_err(err: CutoutError) -> JsError {
    JsError::new(&err.to_string())
}

fn to_buffer(data: &[u8], width: usize, height: usize) -> Result<PixelBuffer, JsError> {
    PixelBuffer::from_rgba(width, height, data.to_vec()).map_err(js_err)
}

fn to_mask(cells: &[u8], width: usize, height: usize) -> Result<SelectionMask, JsError> {
    if cells.len() != width * height {
        return Err(js_err(CutoutError::InvalidBuffer {
            expected: width * height,
            actual: cells.len(),
        }));
    }
    Ok(SelectionMask::from_fn(width, height, |x, y| cells[y * width + x] != 0))
}

fn parse_mode(mode: &str) -> Result<SelectionMode, JsError> {
    match mode {
        "new" => Ok(SelectionMode::New),
        "add" => Ok(SelectionMode::Add),
        "subtract" => Ok(SelectionMode::Subtract),
        other => Err(JsError::new(&format!("unknown selection mode: {other}"))),
    }
}

// ============================================================================
// Selection
// ============================================================================

/// Flood-select the 4-connected region around (x, y).
///
/// # Returns
/// Flat mask of 0/1 cells
#[wasm_bindgen]
pub fn magic_wand_wasm(data: &[u8], width: usize, height: usize, x: i32, y: i32, tolerance: u8) -> Result<Vec<u8>, JsError> {
    let buffer = to_buffer(data, width, height)?;
    Ok(selection::flood_select(&buffer, Point::new(x, y), tolerance).to_raw())
}

/// Combine two masks with mode "new", "add" or "subtract".
#[wasm_bindgen]
pub fn combine_masks_wasm(existing: &[u8], fresh: &[u8], width: usize, height: usize, mode: &str) -> Result<Vec<u8>, JsError> {
    let existing = to_mask(existing, width, height)?;
    let fresh = to_mask(fresh, width, height)?;
    Ok(selection::combine(&existing, &fresh, parse_mode(mode)?).to_raw())
}

#[wasm_bindgen]
pub fn invert_mask_wasm(mask: &[u8], width: usize, height: usize) -> Result<Vec<u8>, JsError> {
    Ok(selection::invert(&to_mask(mask, width, height)?).to_raw())
}

/// Brush stroke from (x0, y0) to (x1, y1) with stamps of `radius`.
#[wasm_bindgen]
#[allow(clippy::too_many_arguments)]
pub fn brush_stroke_wasm(
    mask: &[u8],
    width: usize,
    height: usize,
    x0: i32,
    y0: i32,
    x1: i32,
    y1: i32,
    radius: u32,
    add: bool,
) -> Result<Vec<u8>, JsError> {
    let mask = to_mask(mask, width, height)?;
    Ok(selection::stroke(&mask, Point::new(x0, y0), Point::new(x1, y1), radius, add).to_raw())
}

/// Bounds as `[min_x, min_y, width, height]`, empty for an empty mask.
#[wasm_bindgen]
pub fn mask_bounds_wasm(mask: &[u8], width: usize, height: usize) -> Result<Vec<u32>, JsError> {
    let mask = to_mask(mask, width, height)?;
    Ok(selection::mask_bounds(&mask)
        .map(|b| vec![b.min_x as u32, b.min_y as u32, b.width as u32, b.height as u32])
        .unwrap_or_default())
}

// ============================================================================
// Feather and crop
// ============================================================================

/// Feathered alpha (0-255) for a 0/1 mask.
#[wasm_bindgen]
pub fn feather_mask_wasm(mask: &[u8], width: usize, height: usize, radius: usize, renormalize: bool) -> Result<Vec<u8>, JsError> {
    let mode = if renormalize { EdgeMode::Renormalized } else { EdgeMode::Truncated };
    Ok(feather_with_mode(&to_mask(mask, width, height)?, radius, mode).to_raw())
}

/// Feather the mask and crop the image to the mask bounds.
///
/// # Returns
/// Flat RGBA bytes of the cutout; its size is given by `mask_bounds_wasm`.
#[wasm_bindgen]
pub fn crop_selection_wasm(data: &[u8], mask: &[u8], width: usize, height: usize, radius: usize) -> Result<Vec<u8>, JsError> {
    let buffer = to_buffer(data, width, height)?;
    let mask = to_mask(mask, width, height)?;
    let bounds = selection::mask_bounds(&mask).ok_or_else(|| js_err(CutoutError::NoSelection))?;
    let feathered = feather_with_mode(&mask, radius, EdgeMode::Truncated);
    Ok(crop(&buffer, &feathered, bounds).into_raw())
}

// ============================================================================
// Export
// ============================================================================

/// SVG path data around the first opaque region of a cutout.
#[wasm_bindgen]
pub fn trace_contour_wasm(data: &[u8], width: usize, height: usize) -> Result<String, JsError> {
    let buffer = to_buffer(data, width, height)?;
    selection::trace_contour(&buffer).map(|c| c.to_svg_path()).map_err(js_err)
}

/// SVG document for a cutout.
///
/// `texts_json` is a JSON array of applied texts in source coordinates, each
/// `{"text": "...", "color": "#RRGGBB", "size": 48, "pos": {"x": 0, "y": 0}}`
/// (color also accepts `#RGB` and `#RRGGBBAA`). `(origin_x, origin_y)` is the
/// crop's top-left corner in the source.
#[wasm_bindgen]
pub fn export_svg_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    texts_json: &str,
    origin_x: i32,
    origin_y: i32,
) -> Result<String, JsError> {
    let buffer = to_buffer(data, width, height)?;
    let texts: Vec<AppliedText> = if texts_json.trim().is_empty() {
        Vec::new()
    } else {
        serde_json::from_str(texts_json).map_err(|e| js_err(CutoutError::InvalidConfig(e.to_string())))?
    };
    export_svg(&buffer, &texts, Point::new(origin_x, origin_y)).map_err(js_err)
}

#[wasm_bindgen]
pub fn encode_png_wasm(data: &[u8], width: usize, height: usize) -> Result<Vec<u8>, JsError> {
    encode_png(&to_buffer(data, width, height)?).map_err(js_err)
}
