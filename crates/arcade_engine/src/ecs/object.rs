//! Game objects and contact callbacks
//!
//! A [`GameObject`] is a positioned rectangle with motion and collision
//! state. What sets a group or a tile grid apart from a plain object is its
//! [`ObjectKind`]; everything else is shared.

use std::fmt;

use super::components::{ColliderComponent, GroupComponent, MovementComponent, TileGrid};
use super::{Entity, World};
use crate::foundation::math::{Rect, Vec2};
use crate::physics::collision_sides::HitSide;

/// What an object is, beyond its shared state
#[derive(Debug, Clone)]
pub enum ObjectKind {
    /// Plain object
    Object,
    /// Container that carries its members along when it moves
    Group(GroupComponent),
    /// Fixed grid of solid and empty cells
    TileGrid(TileGrid),
}

/// Reaction to contacts found by the resolver
///
/// `velocity` is the velocity the resolver suggests for this object on the
/// hit axis. The defaults take it unless the object is fixed; `hit_bottom`
/// also marks the object as standing on something.
pub trait CollisionHandler {
    /// Left edge struck by another object
    fn hit_left(&mut self, world: &mut World, this: Entity, _contact: Entity, velocity: f32) {
        if let Some(object) = world.get_mut(this) {
            if !object.collider.fixed {
                object.movement.velocity.x = velocity;
            }
        }
    }

    /// Right edge struck by `contact`
    fn hit_right(&mut self, world: &mut World, this: Entity, contact: Entity, velocity: f32) {
        self.hit_left(world, this, contact, velocity);
    }

    /// Top edge struck by another object
    fn hit_top(&mut self, world: &mut World, this: Entity, _contact: Entity, velocity: f32) {
        if let Some(object) = world.get_mut(this) {
            if !object.collider.fixed {
                object.movement.velocity.y = velocity;
            }
        }
    }

    /// Bottom edge struck by another object
    fn hit_bottom(&mut self, world: &mut World, this: Entity, _contact: Entity, velocity: f32) {
        if let Some(object) = world.get_mut(this) {
            object.collider.on_floor = true;
            if !object.collider.fixed {
                object.movement.velocity.y = velocity;
            }
        }
    }

    /// Route a hit on `side` to the matching method
    fn hit(&mut self, world: &mut World, this: Entity, side: HitSide, contact: Entity, velocity: f32) {
        match side {
            HitSide::Left => self.hit_left(world, this, contact, velocity),
            HitSide::Right => self.hit_right(world, this, contact, velocity),
            HitSide::Top => self.hit_top(world, this, contact, velocity),
            HitSide::Bottom => self.hit_bottom(world, this, contact, velocity),
        }
    }
}

/// Handler used by objects that have none of their own
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultHandler;

impl CollisionHandler for DefaultHandler {}

/// A positioned rectangle with physics and collision state
pub struct GameObject {
    /// Position and size
    pub rect: Rect,

    /// Linear and angular motion
    pub movement: MovementComponent,

    /// Collision flags, hulls and offsets
    pub collider: ColliderComponent,

    /// Dead objects are skipped by update and collision
    pub exists: bool,

    /// Inactive objects are skipped by update
    pub active: bool,

    /// Parallax factor, copied to members added with `share_scroll`
    pub scroll_factor: Vec2,

    kind: ObjectKind,
    handler: Option<Box<dyn CollisionHandler>>,
}

impl GameObject {
    /// Create a solid, movable object
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            movement: MovementComponent::new(),
            collider: ColliderComponent::new(),
            exists: true,
            active: true,
            scroll_factor: Vec2::new(1.0, 1.0),
            kind: ObjectKind::Object,
            handler: None,
        }
    }

    /// Create an empty group at `position`
    ///
    /// Groups are never solid and have no size.
    pub fn group(position: Vec2) -> Self {
        Self {
            collider: ColliderComponent::non_solid(),
            kind: ObjectKind::Group(GroupComponent::new()),
            ..Self::new(Rect::new(position.x, position.y, 0.0, 0.0))
        }
    }

    /// Create a tile grid whose top-left corner is `origin`
    pub fn tile_grid(origin: Vec2, grid: TileGrid) -> Self {
        let size = grid.pixel_size();
        let mut collider = ColliderComponent::new().as_fixed();
        collider.refresh_hulls(&grid.cell_rect());
        Self {
            movement: MovementComponent::stationary(),
            collider,
            kind: ObjectKind::TileGrid(grid),
            ..Self::new(Rect::new(origin.x, origin.y, size.x, size.y))
        }
    }

    /// Replace the movement component
    pub fn with_movement(mut self, movement: MovementComponent) -> Self {
        self.movement = movement;
        self
    }

    /// Replace the collider
    pub fn with_collider(mut self, collider: ColliderComponent) -> Self {
        self.collider = collider;
        self
    }

    /// Install a contact handler
    pub fn with_handler(mut self, handler: impl CollisionHandler + 'static) -> Self {
        self.handler = Some(Box::new(handler));
        self
    }

    /// Top-left corner
    pub fn position(&self) -> Vec2 {
        self.rect.position()
    }

    /// Object kind
    pub fn kind(&self) -> &ObjectKind {
        &self.kind
    }

    /// Whether this object is a group
    pub fn is_group(&self) -> bool {
        matches!(self.kind, ObjectKind::Group(_))
    }

    /// Group data, if this is a group
    pub fn as_group(&self) -> Option<&GroupComponent> {
        match &self.kind {
            ObjectKind::Group(group) => Some(group),
            _ => None,
        }
    }

    pub(crate) fn as_group_mut(&mut self) -> Option<&mut GroupComponent> {
        match &mut self.kind {
            ObjectKind::Group(group) => Some(group),
            _ => None,
        }
    }

    /// Grid data, if this is a tile grid
    pub fn as_tile_grid(&self) -> Option<&TileGrid> {
        match &self.kind {
            ObjectKind::TileGrid(grid) => Some(grid),
            _ => None,
        }
    }

    /// Whether the object takes part in collision right now
    pub fn is_collidable(&self) -> bool {
        self.exists && self.collider.solid
    }

    /// Move by `delta` without touching hulls
    pub fn translate(&mut self, delta: Vec2) {
        self.rect.x += delta.x;
        self.rect.y += delta.y;
    }

    /// Reset both hulls to where the object is now
    ///
    /// A tile grid's hulls stay one cell at the origin; its offsets place them.
    pub fn refresh_hulls(&mut self) {
        let hull = match &self.kind {
            ObjectKind::TileGrid(grid) => grid.cell_rect(),
            _ => self.rect,
        };
        self.collider.refresh_hulls(&hull);
    }

    /// Advance this object's own motion by `dt` seconds
    ///
    /// Returns the displacement applied.
    pub fn update_motion(&mut self, dt: f32) -> Vec2 {
        if !self.movement.moves {
            return Vec2::zeros();
        }
        if self.collider.solid {
            self.refresh_hulls();
        }
        self.collider.on_floor = false;

        let delta = self.movement.integrate(dt);
        self.translate(delta);

        if self.collider.solid {
            self.collider.collision_vector = delta;
            self.collider.sweep_hulls(delta, self.rect.x);
        }
        delta
    }

    /// Get ready to be resolved against `other`
    ///
    /// Tile grids list the solid cells near `other` as offsets. Other kinds
    /// keep their offsets.
    pub fn pre_collide(&mut self, other: &Rect) {
        let origin = self.rect.position();
        if let ObjectKind::TileGrid(grid) = &self.kind {
            self.collider.offsets = grid.collidable_offsets(origin, other);
        }
    }

    /// Whether `rect` touches this object
    ///
    /// For a tile grid only solid cells count.
    pub fn touches(&self, rect: &Rect) -> bool {
        match &self.kind {
            ObjectKind::TileGrid(grid) => grid
                .collidable_offsets(self.rect.position(), rect)
                .into_iter()
                .any(|offset| grid.cell_rect().translated(offset).overlaps(rect)),
            _ => self.rect.overlaps(rect),
        }
    }

    /// Mark this object dead
    pub fn kill(&mut self) {
        self.exists = false;
    }

    pub(crate) fn take_handler(&mut self) -> Option<Box<dyn CollisionHandler>> {
        self.handler.take()
    }

    pub(crate) fn restore_handler(&mut self, handler: Box<dyn CollisionHandler>) {
        if self.handler.is_none() {
            self.handler = Some(handler);
        }
    }
}

impl fmt::Debug for GameObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameObject")
            .field("rect", &self.rect)
            .field("movement", &self.movement)
            .field("collider", &self.collider)
            .field("exists", &self.exists)
            .field("active", &self.active)
            .field("scroll_factor", &self.scroll_factor)
            .field("kind", &self.kind)
            .field("has_handler", &self.handler.is_some())
            .finish()
    }
}
