//! ECS World implementation
//!
//! The world owns every [`GameObject`] in a generational arena. Groups refer
//! to their members by [`Entity`] key, so nesting never creates ownership
//! cycles and a despawned member is simply skipped wherever its key remains.

use log::{debug, trace, warn};
use slotmap::{SecondaryMap, SlotMap};
use thiserror::Error;

use super::components::{GroupComponent, TileGrid};
use super::object::{CollisionHandler, DefaultHandler, GameObject};
use super::systems::motion_system;
use super::Entity;
use crate::core::config::{ConfigError, PhysicsConfig, WorldBounds};
use crate::foundation::collections::{OrderedSlots, Removal};
use crate::foundation::math::Vec2;
use crate::physics::collision_sides::HitSide;
use crate::physics::collision_system::{self, OverlapCallback};

/// Errors from world setup operations
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorldError {
    /// The key does not name a live object
    #[error("Unknown entity {0:?}")]
    UnknownEntity(Entity),

    /// A group operation was applied to something else
    #[error("Entity {0:?} is not a group")]
    NotAGroup(Entity),

    /// Adding the member would make a group contain itself
    #[error("Adding {member:?} to {group:?} would make the group contain itself")]
    Cycle {
        /// Receiving group
        group: Entity,
        /// Rejected member
        member: Entity,
    },
}

/// ECS World containing all game objects
pub struct World {
    objects: SlotMap<Entity, GameObject>,
    roots: OrderedSlots<Entity>,
    memberships: SecondaryMap<Entity, usize>,
    physics: PhysicsConfig,
}

impl World {
    /// Create an empty world
    pub fn new(physics: PhysicsConfig) -> Self {
        Self {
            objects: SlotMap::with_key(),
            roots: OrderedSlots::new(),
            memberships: SecondaryMap::new(),
            physics,
        }
    }

    /// Physics settings
    pub fn physics(&self) -> &PhysicsConfig {
        &self.physics
    }

    /// Region covered by the collision index
    pub fn world_bounds(&self) -> WorldBounds {
        self.physics.world_bounds
    }

    /// Replace the region covered by the collision index
    ///
    /// Bounds that fail validation are rejected and the old ones kept.
    pub fn set_world_bounds(&mut self, bounds: WorldBounds) -> Result<(), ConfigError> {
        if let Err(reason) = bounds.validate() {
            warn!("Rejected world bounds {:?}: {}", bounds, reason);
            return Err(ConfigError::Invalid(reason));
        }
        self.physics.world_bounds = bounds;
        Ok(())
    }

    /// Add an object at the top level
    ///
    /// Hulls start out matching the object's rectangle.
    pub fn spawn(&mut self, mut object: GameObject) -> Entity {
        object.refresh_hulls();
        let entity = self.objects.insert(object);
        self.roots.push_unique(entity);
        trace!("Spawned {:?}", entity);
        entity
    }

    /// Add an empty group at `position`
    pub fn spawn_group(&mut self, position: Vec2) -> Entity {
        self.spawn(GameObject::group(position))
    }

    /// Add a tile grid with its top-left corner at `origin`
    pub fn spawn_tile_grid(&mut self, origin: Vec2, grid: TileGrid) -> Entity {
        self.spawn(GameObject::tile_grid(origin, grid))
    }

    /// Remove an object from the world
    ///
    /// The key is dropped from every group that held it. Members of a
    /// despawned group that belong to no other group become top-level.
    pub fn despawn(&mut self, entity: Entity) -> Option<GameObject> {
        let object = self.objects.remove(entity)?;
        self.roots.remove(entity, Removal::Splice);
        self.memberships.remove(entity);

        let holders: Vec<Entity> = self
            .objects
            .iter()
            .filter(|(_, other)| other.as_group().is_some_and(|group| group.contains(entity)))
            .map(|(key, _)| key)
            .collect();
        for holder in holders {
            if let Some(group) = self.objects.get_mut(holder).and_then(GameObject::as_group_mut) {
                group.remove(entity, Removal::Splice);
            }
        }

        if let Some(group) = object.as_group() {
            for member in group.members() {
                self.release_member(member);
            }
        }
        debug!("Despawned {:?}", entity);
        Some(object)
    }

    /// Look up an object
    pub fn get(&self, entity: Entity) -> Option<&GameObject> {
        self.objects.get(entity)
    }

    /// Look up an object mutably
    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut GameObject> {
        self.objects.get_mut(entity)
    }

    /// Whether the key names a live object
    pub fn contains(&self, entity: Entity) -> bool {
        self.objects.contains_key(entity)
    }

    /// Number of objects, dead ones included
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the world holds no objects
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Top-level objects in spawn order
    pub fn roots(&self) -> Vec<Entity> {
        self.roots.to_vec()
    }

    /// Iterate all objects
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &GameObject)> {
        self.objects.iter()
    }

    /// Add `member` to `group`
    ///
    /// Returns `Ok(false)` when it was already a member. With `share_scroll`
    /// the member takes the group's scroll factor.
    pub fn add(&mut self, group: Entity, member: Entity, share_scroll: bool) -> Result<bool, WorldError> {
        let scroll_factor = self.group_ref(group)?.1;
        if !self.objects.contains_key(member) {
            return Err(WorldError::UnknownEntity(member));
        }
        if member == group || self.group_contains(member, group) {
            return Err(WorldError::Cycle { group, member });
        }

        let added = self.group_mut(group)?.add(member);
        if !added {
            return Ok(false);
        }
        self.claim_member(member);
        if share_scroll {
            if let Some(object) = self.objects.get_mut(member) {
                object.scroll_factor = scroll_factor;
            }
        }
        trace!("Added {:?} to group {:?}", member, group);
        Ok(true)
    }

    /// Remove `member` from `group`
    ///
    /// [`Removal::Tombstone`] leaves an empty slot so indices of later
    /// members stay stable. Returns `Ok(false)` when it was not a member.
    pub fn remove(&mut self, group: Entity, member: Entity, removal: Removal) -> Result<bool, WorldError> {
        let removed = self.group_mut(group)?.remove(member, removal);
        if removed {
            self.release_member(member);
        }
        Ok(removed)
    }

    /// Put `new` in the slot held by `old`
    pub fn replace(&mut self, group: Entity, old: Entity, new: Entity) -> Result<bool, WorldError> {
        self.group_ref(group)?;
        if !self.objects.contains_key(new) {
            return Err(WorldError::UnknownEntity(new));
        }
        if new == group || self.group_contains(new, group) {
            return Err(WorldError::Cycle { group, member: new });
        }
        if self.group_ref(group)?.0.contains(new) {
            return Ok(false);
        }

        let replaced = self.group_mut(group)?.replace(old, new);
        if replaced {
            self.release_member(old);
            self.claim_member(new);
        }
        Ok(replaced)
    }

    /// Live members of `group` in order
    pub fn members(&self, group: Entity) -> Result<Vec<Entity>, WorldError> {
        let (group, _) = self.group_ref(group)?;
        Ok(group
            .members()
            .into_iter()
            .filter(|member| self.objects.contains_key(*member))
            .collect())
    }

    /// Drop tombstoned slots from a group's member list
    pub fn compact(&mut self, group: Entity) -> Result<(), WorldError> {
        self.group_mut(group)?.compact();
        Ok(())
    }

    /// Move an object to `position` and revive it
    ///
    /// A group carries its members along by the same offset.
    pub fn reset(&mut self, entity: Entity, position: Vec2) -> bool {
        motion_system::reset_object(self, entity, position)
    }

    /// Kill an object; a group kills its members first
    pub fn kill(&mut self, entity: Entity) {
        let members = match self.objects.get(entity) {
            Some(object) => object.as_group().map(|group| group.members()).unwrap_or_default(),
            None => return,
        };
        for member in members {
            self.kill(member);
        }
        if let Some(object) = self.objects.get_mut(entity) {
            object.kill();
        }
    }

    /// Change whether an object takes part in collision
    ///
    /// Groups are never solid; asking for that is ignored with a warning.
    pub fn set_solid(&mut self, entity: Entity, solid: bool) -> bool {
        let Some(object) = self.objects.get_mut(entity) else {
            warn!("set_solid on unknown entity {:?}", entity);
            return false;
        };
        if solid && object.is_group() {
            warn!("Groups cannot be solid, ignoring set_solid on {:?}", entity);
            return false;
        }
        object.collider.solid = solid;
        true
    }

    /// Advance every live, active top-level object by `dt` seconds
    ///
    /// Groups advance their members.
    pub fn update(&mut self, dt: f32) {
        for entity in self.roots.to_vec() {
            let runnable = self.objects.get(entity).is_some_and(|object| object.exists && object.active);
            if runnable {
                motion_system::update_object(self, entity, dt);
            }
        }
    }

    /// Separate overlapping solid objects of `a` and `b`
    ///
    /// Pass the same key twice to collide a group with itself. Returns
    /// whether anything was resolved.
    pub fn collide(&mut self, a: Entity, b: Entity) -> bool {
        collision_system::collide(self, a, b)
    }

    /// Kill every overlapping pair between `a` and `b`
    pub fn overlap(&mut self, a: Entity, b: Entity) -> bool {
        collision_system::overlap(self, a, b, None)
    }

    /// Report every overlapping pair between `a` and `b` to `callback`
    ///
    /// Returns whether the callback returned `true` for any pair.
    pub fn overlap_with(&mut self, a: Entity, b: Entity, callback: &mut OverlapCallback<'_>) -> bool {
        collision_system::overlap(self, a, b, Some(callback))
    }

    /// Whether `point` lies on a live object
    ///
    /// Groups test their members; tile grids test only solid cells.
    pub fn overlaps_point(&self, entity: Entity, point: Vec2) -> bool {
        let Some(object) = self.objects.get(entity).filter(|object| object.exists) else {
            return false;
        };
        if let Some(group) = object.as_group() {
            return group.members().into_iter().any(|member| self.overlaps_point(member, point));
        }
        match object.as_tile_grid() {
            Some(grid) => grid.is_collidable_at(object.position(), point),
            None => object.rect.contains_point(point),
        }
    }

    /// Let `entity` prepare for resolution against `other`
    pub fn pre_collide(&mut self, entity: Entity, other: Entity) {
        let Some(other_rect) = self.objects.get(other).map(|object| object.rect) else {
            return;
        };
        if let Some(object) = self.objects.get_mut(entity) {
            object.pre_collide(&other_rect);
        }
    }

    /// Deliver a contact on `side` to `entity`'s handler
    pub fn dispatch_hit(&mut self, entity: Entity, side: HitSide, contact: Entity, velocity: f32) {
        let Some(object) = self.objects.get_mut(entity) else {
            return;
        };
        match object.take_handler() {
            Some(mut handler) => {
                handler.hit(self, entity, side, contact, velocity);
                if let Some(object) = self.objects.get_mut(entity) {
                    object.restore_handler(handler);
                }
            }
            None => DefaultHandler.hit(self, entity, side, contact, velocity),
        }
    }

    fn group_ref(&self, group: Entity) -> Result<(&GroupComponent, Vec2), WorldError> {
        let object = self.objects.get(group).ok_or(WorldError::UnknownEntity(group))?;
        let members = object.as_group().ok_or(WorldError::NotAGroup(group))?;
        Ok((members, object.scroll_factor))
    }

    fn group_mut(&mut self, group: Entity) -> Result<&mut GroupComponent, WorldError> {
        self.objects
            .get_mut(group)
            .ok_or(WorldError::UnknownEntity(group))?
            .as_group_mut()
            .ok_or(WorldError::NotAGroup(group))
    }

    /// Whether `needle` is `group` or sits anywhere below it
    fn group_contains(&self, group: Entity, needle: Entity) -> bool {
        if group == needle {
            return true;
        }
        self.objects
            .get(group)
            .and_then(GameObject::as_group)
            .is_some_and(|members| members.members().into_iter().any(|member| self.group_contains(member, needle)))
    }

    fn claim_member(&mut self, member: Entity) {
        let Some(count) = self.memberships.entry(member).map(|entry| entry.or_insert(0)) else {
            return;
        };
        *count += 1;
        self.roots.remove(member, Removal::Splice);
    }

    fn release_member(&mut self, member: Entity) {
        let Some(count) = self.memberships.get_mut(member) else {
            return;
        };
        *count = count.saturating_sub(1);
        if *count == 0 {
            self.memberships.remove(member);
            if self.objects.contains_key(member) {
                self.roots.push_unique(member);
            }
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(PhysicsConfig::default())
    }
}
