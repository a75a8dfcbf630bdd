//! Motion system
//!
//! Advances objects by one frame and moves groups rigidly. A group runs its
//! own motion step like any object and then carries its members by the same
//! offset, recursing into nested groups.

use log::trace;

use crate::ecs::{Entity, World};
use crate::foundation::math::Vec2;

/// Advance `entity` by `dt` seconds
///
/// Groups also advance their live members.
pub fn update_object(world: &mut World, entity: Entity, dt: f32) {
    let Some(object) = world.get_mut(entity) else {
        return;
    };
    if !object.is_group() {
        object.update_motion(dt);
        return;
    }

    let before = object.position();
    if let Some(group) = object.as_group_mut() {
        group.save_position(before);
    }
    object.update_motion(dt);
    let delta = object.position() - before;
    let members = object.as_group().map(|group| group.members()).unwrap_or_default();
    let moved = delta != Vec2::zeros();

    for member in members {
        if !world.get(member).is_some_and(|object| object.exists) {
            continue;
        }
        if moved {
            carry(world, member, delta);
        }
        if world.get(member).is_some_and(|object| object.active) {
            update_object(world, member, dt);
        }
        if moved {
            sweep(world, member, delta);
        }
    }
}

/// Move `entity` to `position`, revive it and carry group members along
///
/// A plain object is teleported: its hulls restart at the new position.
/// Returns `false` when the key is unknown.
pub fn reset_object(world: &mut World, entity: Entity, position: Vec2) -> bool {
    let Some(object) = world.get_mut(entity) else {
        return false;
    };
    let before = object.position();
    object.rect.x = position.x;
    object.rect.y = position.y;
    object.exists = true;

    let Some(group) = object.as_group_mut() else {
        object.refresh_hulls();
        object.collider.collision_vector = Vec2::zeros();
        return true;
    };
    group.save_position(before);
    let members = group.members();
    let delta = position - before;
    if delta == Vec2::zeros() {
        return true;
    }
    trace!("Reset group {:?} by ({}, {})", entity, delta.x, delta.y);

    for member in members {
        let Some(object) = world.get_mut(member).filter(|object| object.exists) else {
            continue;
        };
        if object.is_group() {
            let target = object.position() + delta;
            reset_object(world, member, target);
        } else {
            object.translate(delta);
            if object.collider.solid {
                let x = object.rect.x;
                object.collider.sweep_hulls(delta, x);
                object.collider.collision_vector += delta;
            }
        }
    }
    true
}

/// Shift a member by its group's displacement before the member updates
fn carry(world: &mut World, member: Entity, delta: Vec2) {
    let Some(object) = world.get_mut(member) else {
        return;
    };
    if object.is_group() {
        let target = object.position() + delta;
        reset_object(world, member, target);
        return;
    }
    object.translate(delta);
    // Members that never run their own step still need hulls from this frame.
    if object.collider.solid && !object.movement.moves {
        object.refresh_hulls();
        object.collider.collision_vector = Vec2::zeros();
    }
}

/// Widen a solid leaf's hulls back over its group's displacement
///
/// The member's hulls were taken after it was carried, so they are
/// stretched toward where the group started.
fn sweep(world: &mut World, member: Entity, delta: Vec2) {
    let Some(object) = world.get_mut(member) else {
        return;
    };
    if object.is_group() || !object.collider.solid {
        return;
    }
    object.collider.sweep_hulls_back(delta);
    object.collider.collision_vector += delta;
}
