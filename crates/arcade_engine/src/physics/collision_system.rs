//! Collision resolution
//!
//! Candidate pairs come from a [`QuadTree`] built for the call. Each pair is
//! then separated one axis at a time, X before Y, using the swept hulls that
//! the motion step left on the objects. An object made of several pieces
//! (a tile grid) shows up as one hull translated by each of its offsets.

use log::{debug, trace};

use super::collision_sides::Axis;
use crate::ecs::{Entity, GameObject, World};
use crate::foundation::math::{Rect, Vec2};
use crate::spatial::{QuadList, QuadTree};

pub use crate::spatial::OverlapCallback;

/// Largest share of a hull's extent that still counts as a contact
const MAX_OVERLAP_RATIO: f32 = 0.8;

/// Separate overlapping solid objects of `a` and `b`
///
/// Passing the same key twice tests the object (normally a group) against
/// itself. Returns `false` when either key is unknown or dead.
pub fn collide(world: &mut World, a: Entity, b: Entity) -> bool {
    let Some(tree) = build_tree(world, a, b) else {
        return false;
    };
    let both_lists = a != b;

    let hit_x = tree.overlap(world, both_lists, &mut solve_x);
    let hit_y = tree.overlap(world, both_lists, &mut solve_y);
    debug!("Collide {:?} / {:?}: x={} y={}", a, b, hit_x, hit_y);
    hit_x || hit_y
}

/// Report overlapping pairs of `a` and `b` without separating them
///
/// Without a callback both objects of every pair are killed. Pairs involving
/// a tile grid count only when a solid cell is touched.
pub fn overlap(world: &mut World, a: Entity, b: Entity, mut callback: Option<&mut OverlapCallback<'_>>) -> bool {
    let Some(tree) = build_tree(world, a, b) else {
        return false;
    };

    let mut confirmed = |world: &mut World, first: Entity, second: Entity| -> bool {
        if !touches_solid_cells(world, first, second) {
            return false;
        }
        match callback.as_mut() {
            Some(callback) => callback(world, first, second),
            None => {
                world.kill(first);
                world.kill(second);
                true
            }
        }
    };
    let hit = tree.overlap(world, a != b, &mut confirmed);
    debug!("Overlap {:?} / {:?}: {}", a, b, hit);
    hit
}

/// Resolve a pair along X
pub fn solve_x(world: &mut World, attacker: Entity, target: Entity) -> bool {
    solve_axis(world, attacker, target, Axis::X)
}

/// Resolve a pair along Y
pub fn solve_y(world: &mut World, attacker: Entity, target: Entity) -> bool {
    solve_axis(world, attacker, target, Axis::Y)
}

/// Whether the attacker approached the target from the negative side
///
/// `attacker` and `target` are this frame's displacements on the axis.
pub fn approaches_from_negative(attacker: f32, target: f32) -> bool {
    let attacker_stopped = attacker == 0.0;
    let attacker_negative = attacker < 0.0;
    let attacker_positive = attacker > 0.0;
    let target_stopped = target == 0.0;
    let target_negative = target < 0.0;
    let target_positive = target > 0.0;

    (attacker_stopped && target_negative)
        || (attacker_positive && target_stopped)
        || (attacker_positive && target_negative)
        // Both heading negative, the target catches up
        || (attacker_negative && target_negative && attacker.abs() < target.abs())
        // Both heading positive, the attacker catches up
        || (attacker_positive && target_positive && attacker.abs() > target.abs())
}

/// Whether each side may be pushed by resolution
///
/// When both are fixed, a side that moved this frame is pushed anyway.
fn movable(first: &GameObject, second: &GameObject) -> (bool, bool) {
    let fixed_first = first.collider.fixed;
    let fixed_second = second.collider.fixed;
    if fixed_first && fixed_second {
        return (
            first.collider.collision_vector != Vec2::zeros(),
            second.collider.collision_vector != Vec2::zeros(),
        );
    }
    (!fixed_first, !fixed_second)
}

fn solve_axis(world: &mut World, attacker: Entity, target: Entity, axis: Axis) -> bool {
    let (Some(first), Some(second)) = (world.get(attacker), world.get(target)) else {
        return false;
    };
    let displacement_first = first.collider.displacement(axis);
    let displacement_second = second.collider.displacement(axis);
    if displacement_first == displacement_second {
        return false;
    }

    world.pre_collide(attacker, target);
    world.pre_collide(target, attacker);

    let from_negative = approaches_from_negative(displacement_first, displacement_second);
    let (attacker_side, target_side) = if from_negative {
        (axis.far_side(), axis.near_side())
    } else {
        (axis.near_side(), axis.far_side())
    };

    let (Some(first), Some(second)) = (world.get(attacker), world.get(target)) else {
        return false;
    };
    if !first.collider.sides.contains(attacker_side.flag()) || !second.collider.sides.contains(target_side.flag()) {
        return false;
    }

    let (movable_first, movable_second) = movable(first, second);
    let mut hull_first = first.collider.hull(axis);
    let mut hull_second = second.collider.hull(axis);
    // The cross hull spans the object's own size on this axis, without the sweep.
    let size_first = span(&first.collider.hull(axis.cross()), axis).1;
    let size_second = span(&second.collider.hull(axis.cross()), axis).1;
    let first_negative = displacement_first < 0.0;
    let second_negative = displacement_second < 0.0;
    let offsets_first = first.collider.offsets.clone();
    let offsets_second = second.collider.offsets.clone();
    let mut cross_shift_first = 0.0;
    let mut cross_shift_second = 0.0;
    let mut hit = false;

    for offset_first in &offsets_first {
        for offset_second in &offsets_second {
            let placed_first = hull_first.translated(*offset_first);
            let placed_second = hull_second.translated(*offset_second);
            if !placed_first.overlaps(&placed_second) {
                continue;
            }

            let (near_first, extent_first) = span(&placed_first, axis);
            let (near_second, extent_second) = span(&placed_second, axis);
            let mut overlap = if from_negative {
                let reach_first = near_first + if first_negative { size_first } else { extent_first };
                let reach_second = if second_negative {
                    near_second
                } else {
                    near_second + extent_second - size_second
                };
                reach_first - reach_second
            } else {
                let reach_second = near_second + if second_negative { size_second } else { extent_second };
                let reach_first = if first_negative {
                    near_first
                } else {
                    near_first + extent_first - size_first
                };
                reach_first - reach_second
            };
            if overlap == 0.0
                || overlap.abs() > extent_first * MAX_OVERLAP_RATIO
                || overlap.abs() > extent_second * MAX_OVERLAP_RATIO
            {
                continue;
            }
            hit = true;
            trace!("{:?} overlap {} between {:?} and {:?}", axis, overlap, attacker, target);

            let mut velocity_first = velocity_on(world, target, axis);
            let mut velocity_second = velocity_on(world, attacker, axis);
            match (movable_first, movable_second) {
                (true, false) => push(world, attacker, axis, -overlap),
                (false, true) => push(world, target, axis, overlap),
                (true, true) => {
                    overlap /= 2.0;
                    push(world, attacker, axis, -overlap);
                    push(world, target, axis, overlap);
                    velocity_first /= 2.0;
                    velocity_second /= 2.0;
                }
                (false, false) => {}
            }

            world.dispatch_hit(attacker, attacker_side, target, velocity_first);
            world.dispatch_hit(target, target_side, attacker, velocity_second);

            if movable_first {
                let (near, extent) = span_mut(&mut hull_first, axis);
                if !from_negative {
                    *near -= overlap;
                    *extent += overlap;
                } else {
                    *extent -= overlap;
                }
                cross_shift_first -= overlap;
            }
            if movable_second {
                let (near, extent) = span_mut(&mut hull_second, axis);
                if from_negative {
                    *near += overlap;
                    *extent -= overlap;
                } else {
                    *extent += overlap;
                }
                cross_shift_second += overlap;
            }
        }
    }

    store_hulls(world, attacker, axis, hull_first, cross_shift_first);
    store_hulls(world, target, axis, hull_second, cross_shift_second);
    hit
}

/// Build the index for a `collide`/`overlap` call
fn build_tree(world: &World, a: Entity, b: Entity) -> Option<QuadTree> {
    let live = |entity| world.get(entity).is_some_and(|object: &GameObject| object.exists);
    if !live(a) || !live(b) {
        trace!("Skipping query for missing or dead {:?} / {:?}", a, b);
        return None;
    }

    let mut tree = QuadTree::new(&world.world_bounds());
    tree.insert(world, a, QuadList::A);
    if a != b {
        tree.insert(world, b, QuadList::B);
    }
    Some(tree)
}

/// Whether both objects touch each other's solid cells
///
/// Only tile grids are picky; other objects accept the index's rectangle test.
fn touches_solid_cells(world: &World, first: Entity, second: Entity) -> bool {
    let (Some(a), Some(b)) = (world.get(first), world.get(second)) else {
        return false;
    };
    let a_accepts = a.as_tile_grid().is_none() || a.touches(&b.rect);
    let b_accepts = b.as_tile_grid().is_none() || b.touches(&a.rect);
    a_accepts && b_accepts
}

fn span(rect: &Rect, axis: Axis) -> (f32, f32) {
    match axis {
        Axis::X => (rect.x, rect.width),
        Axis::Y => (rect.y, rect.height),
    }
}

fn span_mut(rect: &mut Rect, axis: Axis) -> (&mut f32, &mut f32) {
    match axis {
        Axis::X => (&mut rect.x, &mut rect.width),
        Axis::Y => (&mut rect.y, &mut rect.height),
    }
}

fn velocity_on(world: &World, entity: Entity, axis: Axis) -> f32 {
    world.get(entity).map_or(0.0, |object| match axis {
        Axis::X => object.movement.velocity.x,
        Axis::Y => object.movement.velocity.y,
    })
}

/// Move an object along `axis`; groups move through a reset
fn push(world: &mut World, entity: Entity, axis: Axis, amount: f32) {
    let delta = match axis {
        Axis::X => Vec2::new(amount, 0.0),
        Axis::Y => Vec2::new(0.0, amount),
    };
    let Some(object) = world.get_mut(entity) else {
        return;
    };
    if object.is_group() {
        let target = object.position() + delta;
        world.reset(entity, target);
    } else {
        object.translate(delta);
    }
}

/// Write the pass's hull back and shift the other pass's hull along `axis`
fn store_hulls(world: &mut World, entity: Entity, axis: Axis, hull: Rect, cross_shift: f32) {
    let Some(object) = world.get_mut(entity) else {
        return;
    };
    let collider = &mut object.collider;
    match axis {
        Axis::X => {
            collider.hull_x = hull;
            collider.hull_y.x += cross_shift;
        }
        Axis::Y => {
            collider.hull_y = hull;
            collider.hull_x.y += cross_shift;
        }
    }
}
