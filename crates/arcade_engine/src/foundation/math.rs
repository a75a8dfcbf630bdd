//! Math utilities and types
//!
//! Provides the 2D math types used by the motion and collision code.
//! Screen convention: +X right, +Y down, angles in degrees.

pub use nalgebra::Vector2;

use serde::{Serialize, Deserialize};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// Tolerance applied to every edge comparison in overlap tests.
///
/// Rectangles that merely touch are not overlapping.
pub const ROUNDING_ERROR: f32 = 1.0e-4;

/// Axis-aligned rectangle described by its top-left corner and size
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Horizontal extent
    pub width: f32,
    /// Vertical extent
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Right edge
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Top-left corner
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Copy of this rectangle moved by `offset`
    pub fn translated(&self, offset: Vec2) -> Self {
        Self::new(self.x + offset.x, self.y + offset.y, self.width, self.height)
    }

    /// Whether either dimension is zero or negative
    pub fn is_degenerate(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Overlap test with [`ROUNDING_ERROR`] tolerance on every edge
    ///
    /// Degenerate rectangles never overlap anything.
    pub fn overlaps(&self, other: &Rect) -> bool {
        if self.is_degenerate() || other.is_degenerate() {
            return false;
        }
        !(self.right() < other.x + ROUNDING_ERROR
            || self.x + ROUNDING_ERROR > other.right()
            || self.bottom() < other.y + ROUNDING_ERROR
            || self.y + ROUNDING_ERROR > other.bottom())
    }

    /// Whether `point` lies inside this rectangle (edges inclusive)
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.bottom()
    }

    /// Whether this rectangle covers `other` completely
    pub fn covers(&self, other: &Rect) -> bool {
        other.x >= self.x && other.right() <= self.right() && other.y >= self.y && other.bottom() <= self.bottom()
    }
}

/// Unit direction for an angle given in degrees
pub fn direction_from_degrees(angle: f32) -> Vec2 {
    let radians = angle.to_radians();
    Vec2::new(radians.cos(), radians.sin())
}
