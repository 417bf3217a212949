//! Element bounds

use sift_core::geometry::{Point, Rect};

/// Computed absolute bounds of an element
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ElementBounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl ElementBounds {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Hit test. The right and bottom edges belong to the next element.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }

    /// Bottom edge
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Right edge
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Smallest bounds covering both
    pub fn union(&self, other: &ElementBounds) -> Self {
        Self::from_rect(self.to_rect().union(&other.to_rect()))
    }

    /// Convert to a sift_core Rect
    pub fn to_rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn from_rect(rect: Rect) -> Self {
        Self::new(rect.x(), rect.y(), rect.width(), rect.height())
    }

    /// Position of a point relative to these bounds
    pub fn local(&self, x: f32, y: f32) -> Point {
        Point::new(x - self.x, y - self.y)
    }
}
