//! Binary selection mask.
//!
//! A [`SelectionMask`] always has the dimensions of the source image it was
//! created against and only ever holds 0 or 1 per cell. Edits never mutate a
//! mask that someone else may hold: every operation takes a mask by reference
//! and returns a new one.

use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};

/// How a freshly computed region combines with the current mask.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    /// Replace the current selection.
    #[default]
    New,
    /// Union with the current selection.
    Add,
    /// Remove from the current selection.
    Subtract,
}

impl SelectionMode {
    /// Brush polarity: subtract erases, everything else paints.
    pub fn paints(self) -> bool {
        self != SelectionMode::Subtract
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectionMask {
    cells: Array2<u8>,
}

impl SelectionMask {
    /// All-zero mask.
    pub fn empty(width: usize, height: usize) -> Self {
        Self {
            cells: Array2::<u8>::zeros((height, width)),
        }
    }

    /// All-one mask.
    pub fn full(width: usize, height: usize) -> Self {
        Self {
            cells: Array2::<u8>::ones((height, width)),
        }
    }

    /// Build a mask from a predicate over (x, y).
    pub fn from_fn(width: usize, height: usize, f: impl Fn(usize, usize) -> bool) -> Self {
        Self {
            cells: Array2::from_shape_fn((height, width), |(y, x)| u8::from(f(x, y))),
        }
    }

    /// Wrap an existing (height, width) array. Any nonzero value counts as selected.
    pub fn from_array(cells: Array2<u8>) -> Self {
        Self {
            cells: cells.mapv(|v| u8::from(v != 0)),
        }
    }

    pub fn width(&self) -> usize {
        self.cells.dim().1
    }

    pub fn height(&self) -> usize {
        self.cells.dim().0
    }

    pub fn dims(&self) -> (usize, usize) {
        (self.width(), self.height())
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.cells[[y, x]] != 0
    }

    #[inline]
    pub(crate) fn set(&mut self, x: usize, y: usize, selected: bool) {
        self.cells[[y, x]] = u8::from(selected);
    }

    pub fn count(&self) -> usize {
        self.cells.iter().filter(|&&v| v != 0).count()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|&v| v == 0)
    }

    /// True when every selected cell of `self` is also selected in `other`.
    pub fn is_subset_of(&self, other: &SelectionMask) -> bool {
        self.assert_same_dims(other);
        self.cells
            .iter()
            .zip(other.cells.iter())
            .all(|(&a, &b)| a == 0 || b != 0)
    }

    pub fn view(&self) -> ArrayView2<'_, u8> {
        self.cells.view()
    }

    pub fn as_array(&self) -> &Array2<u8> {
        &self.cells
    }

    /// Row-major 0/1 bytes.
    pub fn to_raw(&self) -> Vec<u8> {
        self.cells.iter().copied().collect()
    }

    /// Panics if the two masks were not built against the same image size.
    pub(crate) fn assert_same_dims(&self, other: &SelectionMask) {
        assert_eq!(
            self.dims(),
            other.dims(),
            "selection masks must share the source image dimensions"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_array_binarizes() {
        let mask = SelectionMask::from_array(Array2::from_shape_vec((1, 3), vec![0, 255, 7]).unwrap());
        assert_eq!(mask.to_raw(), vec![0, 1, 1]);
    }

    #[test]
    fn test_from_fn_orientation() {
        let mask = SelectionMask::from_fn(4, 2, |x, y| x == 3 && y == 1);
        assert_eq!(mask.width(), 4);
        assert_eq!(mask.height(), 2);
        assert!(mask.get(3, 1));
        assert_eq!(mask.count(), 1);
    }

    #[test]
    fn test_subset() {
        let small = SelectionMask::from_fn(5, 5, |x, _| x < 2);
        let big = SelectionMask::from_fn(5, 5, |x, _| x < 4);
        assert!(small.is_subset_of(&big));
        assert!(!big.is_subset_of(&small));
    }

    #[test]
    #[should_panic]
    fn test_dimension_mismatch_panics() {
        let a = SelectionMask::empty(3, 3);
        let b = SelectionMask::empty(4, 3);
        a.is_subset_of(&b);
    }

    #[test]
    fn test_mode_serde_lowercase() {
        let json = serde_json::to_string(&SelectionMode::Subtract).unwrap();
        assert_eq!(json, "\"subtract\"");
        assert!(!SelectionMode::Subtract.paints());
        assert!(SelectionMode::Add.paints());
    }
}
