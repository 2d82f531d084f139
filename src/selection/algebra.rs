//! Boolean combination of selection masks.

use ndarray::Array2;
use rayon::prelude::*;

use super::mask::{SelectionMask, SelectionMode};

/// Combine the current mask with a freshly computed region.
///
/// - `New`: the fresh mask.
/// - `Add`: union.
/// - `Subtract`: `existing` minus `fresh`.
///
/// Always returns a new mask; neither input is modified.
pub fn combine(existing: &SelectionMask, fresh: &SelectionMask, mode: SelectionMode) -> SelectionMask {
    existing.assert_same_dims(fresh);

    let op: fn(u8, u8) -> u8 = match mode {
        SelectionMode::New => return fresh.clone(),
        SelectionMode::Add => |a: u8, b: u8| u8::from(a != 0 || b != 0),
        SelectionMode::Subtract => |a: u8, b: u8| u8::from(a != 0 && b == 0),
    };

    let (width, height) = existing.dims();
    if width == 0 || height == 0 {
        return fresh.clone();
    }

    let (a, b) = (existing.as_array(), fresh.as_array());
    let mut cells = vec![0u8; width * height];
    cells.par_chunks_mut(width).enumerate().for_each(|(y, row)| {
        for (x, out) in row.iter_mut().enumerate() {
            *out = op(a[[y, x]], b[[y, x]]);
        }
    });

    SelectionMask::from_array(
        Array2::from_shape_vec((height, width), cells).unwrap_or_else(|_| Array2::<u8>::zeros((height, width))),
    )
}

/// Combine against an optional current mask. Without a current selection every
/// mode yields the fresh region, as there is nothing to add to or subtract from.
pub fn combine_with_current(
    current: Option<&SelectionMask>,
    fresh: SelectionMask,
    mode: SelectionMode,
) -> SelectionMask {
    match current {
        Some(existing) => combine(existing, &fresh, mode),
        None => fresh,
    }
}

/// Flip every cell.
pub fn invert(mask: &SelectionMask) -> SelectionMask {
    SelectionMask::from_array(mask.as_array().mapv(|v| u8::from(v == 0)))
}
