//! Group component
//!
//! A group is an object whose position changes are passed on to its members.
//! Members are other objects (groups included), referenced by key, so groups
//! nest to any depth without owning each other.

use crate::ecs::Entity;
use crate::foundation::collections::{OrderedSlots, Removal};
use crate::foundation::math::Vec2;

/// Member list and movement bookkeeping for a group object
#[derive(Debug, Clone, Default)]
pub struct GroupComponent {
    members: OrderedSlots<Entity>,
    last_position: Vec2,
}

impl GroupComponent {
    /// Create an empty group
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a member; duplicates are ignored
    pub fn add(&mut self, member: Entity) -> bool {
        self.members.push_unique(member)
    }

    /// Remove a member
    pub fn remove(&mut self, member: Entity, removal: Removal) -> bool {
        self.members.remove(member, removal)
    }

    /// Swap `old` for `new` in place
    pub fn replace(&mut self, old: Entity, new: Entity) -> bool {
        self.members.replace(old, new)
    }

    /// Whether `member` belongs to this group
    pub fn contains(&self, member: Entity) -> bool {
        self.members.contains(member)
    }

    /// Members in insertion order, tombstones skipped
    pub fn members(&self) -> Vec<Entity> {
        self.members.to_vec()
    }

    /// Drop tombstoned slots
    pub fn compact(&mut self) {
        self.members.compact();
    }

    /// Position recorded before the last move
    pub fn last_position(&self) -> Vec2 {
        self.last_position
    }

    pub(crate) fn save_position(&mut self, position: Vec2) {
        self.last_position = position;
    }
}
