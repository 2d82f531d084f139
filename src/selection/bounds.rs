//! Tight bounding box of a selection mask.

use serde::{Deserialize, Serialize};

use crate::buffer::Point;

use super::mask::SelectionMask;

/// Minimal axis-aligned box enclosing every selected cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: usize,
    pub min_y: usize,
    pub width: usize,
    pub height: usize,
}

impl Bounds {
    pub fn max_x(&self) -> usize {
        self.min_x + self.width - 1
    }

    pub fn max_y(&self) -> usize {
        self.min_y + self.height - 1
    }

    pub fn contains(&self, x: usize, y: usize) -> bool {
        x >= self.min_x && x <= self.max_x() && y >= self.min_y && y <= self.max_y()
    }

    /// Top-left corner, used to translate image coordinates into crop coordinates.
    pub fn origin(&self) -> Point {
        Point::new(self.min_x as i32, self.min_y as i32)
    }
}

/// Single scan over the mask. `None` when nothing is selected.
pub fn mask_bounds(mask: &SelectionMask) -> Option<Bounds> {
    let (width, height) = mask.dims();
    let mut min_x = width;
    let mut min_y = height;
    let mut max_x = 0;
    let mut max_y = 0;
    let mut any = false;

    for ((y, x), &v) in mask.as_array().indexed_iter() {
        if v == 0 {
            continue;
        }
        any = true;
        min_x = min_x.min(x);
        min_y = min_y.min(y);
        max_x = max_x.max(x);
        max_y = max_y.max(y);
    }

    any.then(|| Bounds {
        min_x,
        min_y,
        width: max_x - min_x + 1,
        height: max_y - min_y + 1,
    })
}
