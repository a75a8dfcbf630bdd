//! Collision state component
//!
//! Every object carries two swept hulls: `hull_x` is used by the horizontal
//! resolution pass and `hull_y` by the vertical one. At the start of a motion
//! step both are reset to the object's rectangle; after the object moves they
//! are stretched along the frame's displacement so that fast objects cannot
//! skip over thin obstacles.

use crate::foundation::math::{Rect, Vec2};
use crate::physics::collision_sides::{Axis, CollideSides};

/// Component that holds an object's collision configuration and per-frame state
#[derive(Debug, Clone, PartialEq)]
pub struct ColliderComponent {
    /// Whether the object takes part in collision at all
    pub solid: bool,

    /// Whether collision resolution may move this object
    pub fixed: bool,

    /// Sides that accept contacts
    pub sides: CollideSides,

    /// Hull swept along X this frame
    pub hull_x: Rect,

    /// Hull swept along Y this frame
    pub hull_y: Rect,

    /// This frame's displacement
    pub collision_vector: Vec2,

    /// Translations applied to the hulls to form extra collision candidates
    pub offsets: Vec<Vec2>,

    /// Set by a bottom contact, cleared at the start of each motion step
    pub on_floor: bool,
}

impl ColliderComponent {
    /// Create a solid, movable collider
    pub fn new() -> Self {
        Self {
            solid: true,
            fixed: false,
            sides: CollideSides::ALL,
            hull_x: Rect::default(),
            hull_y: Rect::default(),
            collision_vector: Vec2::zeros(),
            offsets: vec![Vec2::zeros()],
            on_floor: false,
        }
    }

    /// Create a collider that never enters the collision index
    pub fn non_solid() -> Self {
        Self {
            solid: false,
            ..Self::new()
        }
    }

    /// Mark as immovable by collision resolution
    pub fn as_fixed(mut self) -> Self {
        self.fixed = true;
        self
    }

    /// Restrict the sides that accept contacts
    pub fn with_sides(mut self, sides: CollideSides) -> Self {
        self.sides = sides;
        self
    }

    /// Reset both hulls to `rect`
    pub fn refresh_hulls(&mut self, rect: &Rect) {
        self.hull_x = *rect;
        self.hull_y = *rect;
    }

    /// Stretch the hulls along `delta`
    ///
    /// `x` is the object's current left edge; the Y hull follows it so the
    /// vertical pass sees the horizontal movement already applied.
    pub fn sweep_hulls(&mut self, delta: Vec2, x: f32) {
        self.hull_x.width += delta.x.abs();
        if delta.x < 0.0 {
            self.hull_x.x += delta.x;
        }
        self.hull_y.x = x;
        self.hull_y.height += delta.y.abs();
        if delta.y < 0.0 {
            self.hull_y.y += delta.y;
        }
    }

    /// Stretch the hulls back over a move of `delta` that already happened
    ///
    /// Used when the hulls were taken at the end of the move.
    pub fn sweep_hulls_back(&mut self, delta: Vec2) {
        self.hull_x.width += delta.x.abs();
        if delta.x > 0.0 {
            self.hull_x.x -= delta.x;
        }
        self.hull_y.height += delta.y.abs();
        if delta.y > 0.0 {
            self.hull_y.y -= delta.y;
        }
    }

    /// Hull used by the pass along `axis`
    pub fn hull(&self, axis: Axis) -> Rect {
        match axis {
            Axis::X => self.hull_x,
            Axis::Y => self.hull_y,
        }
    }

    /// Collision vector component along `axis`
    pub fn displacement(&self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.collision_vector.x,
            Axis::Y => self.collision_vector.y,
        }
    }
}

impl Default for ColliderComponent {
    fn default() -> Self {
        Self::new()
    }
}
