//! Screen rectangle in virtual-desktop coordinates, x growing right and y
//! growing down. Edges are inclusive for point containment.
#![allow(clippy::module_name_repetitions)]
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    #[must_use]
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    #[must_use]
    pub const fn width(&self) -> i32 {
        self.right - self.left
    }

    #[must_use]
    pub const fn height(&self) -> i32 {
        self.bottom - self.top
    }

    #[must_use]
    pub const fn center(&self) -> (i32, i32) {
        let x = self.left + (self.width() / 2);
        let y = self.top + (self.height() / 2);
        (x, y)
    }

    #[must_use]
    pub const fn contains_point(&self, x: i32, y: i32) -> bool {
        (self.left <= x && x <= self.right) && (self.top <= y && y <= self.bottom)
    }
}
