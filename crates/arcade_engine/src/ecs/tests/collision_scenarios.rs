//! Collision scenarios driven through the world
//!
//! Each test builds a small scene, advances it with `World::update` and
//! checks where `collide`/`overlap` leave the objects.

use crate::core::config::WorldBounds;
use crate::ecs::components::{ColliderComponent, MovementComponent, TileGrid};
use crate::ecs::{Entity, GameObject, World};
use crate::foundation::math::{Rect, Vec2};
use approx::assert_relative_eq;

fn moving_box(world: &mut World, x: f32, y: f32, velocity: Vec2) -> Entity {
    world.spawn(GameObject::new(Rect::new(x, y, 10.0, 10.0)).with_movement(MovementComponent::with_velocity(velocity)))
}

fn wall(world: &mut World, rect: Rect) -> Entity {
    world.spawn(GameObject::new(rect).with_collider(ColliderComponent::new().as_fixed()))
}

#[test]
fn test_head_on_split_evenly() {
    let mut world = World::default();
    let left = moving_box(&mut world, 0.0, 0.0, Vec2::new(10.0, 0.0));
    let right = moving_box(&mut world, 15.0, 0.0, Vec2::new(-10.0, 0.0));
    world.update(0.5);

    assert!(world.collide(left, right));

    let left = world.get(left).unwrap();
    let right = world.get(right).unwrap();
    assert_relative_eq!(left.rect.x, 2.5);
    assert_relative_eq!(right.rect.x, 12.5);
    assert_relative_eq!(left.rect.right(), right.rect.x);
    // Each side takes half of the other's velocity
    assert_relative_eq!(left.movement.velocity.x, -5.0);
    assert_relative_eq!(right.movement.velocity.x, 5.0);
}

#[test]
fn test_fixed_wall_only_moves_the_runner() {
    for runner_first in [true, false] {
        let mut world = World::default();
        let runner = moving_box(&mut world, 0.0, 0.0, Vec2::new(30.0, 0.0));
        let wall = wall(&mut world, Rect::new(20.0, 0.0, 10.0, 10.0));
        world.update(0.5);

        let hit = if runner_first {
            world.collide(runner, wall)
        } else {
            world.collide(wall, runner)
        };

        assert!(hit);
        assert_relative_eq!(world.get(runner).unwrap().rect.x, 10.0);
        assert_relative_eq!(world.get(wall).unwrap().rect.x, 20.0);
        assert_relative_eq!(world.get(runner).unwrap().movement.velocity.x, 0.0);
    }
}

#[test]
fn test_separated_objects_never_collide() {
    let mut world = World::default();
    let a = moving_box(&mut world, 0.0, 0.0, Vec2::new(5.0, 5.0));
    let b = moving_box(&mut world, 100.0, 100.0, Vec2::new(-5.0, -5.0));
    world.update(0.5);

    assert!(!world.collide(a, b));
    assert!(!world.collide(b, a));
    assert_eq!(world.get(a).unwrap().position(), Vec2::new(2.5, 2.5));
}

#[test]
fn test_objects_outside_world_bounds_are_not_indexed() {
    let mut world = World::default();
    world.set_world_bounds(WorldBounds::new(0.0, 0.0, 50.0, 50.0)).unwrap();
    let a = moving_box(&mut world, 200.0, 0.0, Vec2::new(10.0, 0.0));
    let b = moving_box(&mut world, 215.0, 0.0, Vec2::new(-10.0, 0.0));
    world.update(0.5);

    assert!(!world.collide(a, b));
}

#[test]
fn test_group_reset_is_rigid() {
    let mut world = World::default();
    let group = world.spawn_group(Vec2::new(50.0, 50.0));
    let members: Vec<Entity> = (0..3)
        .map(|index| moving_box(&mut world, 40.0 + index as f32 * 12.0, 60.0, Vec2::zeros()))
        .collect();
    for &member in &members {
        world.add(group, member, false).unwrap();
    }
    let before: Vec<Vec2> = members.iter().map(|&member| world.get(member).unwrap().position()).collect();

    assert!(world.reset(group, Vec2::new(-7.0, 130.0)));

    for (member, start) in members.iter().zip(before) {
        let moved = world.get(*member).unwrap().position() - start;
        assert_eq!(moved, Vec2::new(-57.0, 80.0));
    }
}

#[test]
fn test_group_members_collide_with_each_other() {
    let mut world = World::default();
    let group = world.spawn_group(Vec2::zeros());
    let left = moving_box(&mut world, 0.0, 0.0, Vec2::new(10.0, 0.0));
    let right = moving_box(&mut world, 15.0, 0.0, Vec2::new(-10.0, 0.0));
    world.add(group, left, false).unwrap();
    world.add(group, right, false).unwrap();
    world.update(0.5);

    assert!(world.collide(group, group));
    assert_relative_eq!(world.get(left).unwrap().rect.x, 2.5);
    assert_relative_eq!(world.get(right).unwrap().rect.x, 12.5);
}

#[test]
fn test_moving_group_pushes_into_wall() {
    let mut world = World::default();
    let convoy = world.spawn(
        GameObject::group(Vec2::zeros()).with_movement(MovementComponent::with_velocity(Vec2::new(30.0, 0.0))),
    );
    let cargo = world.spawn(GameObject::new(Rect::new(0.0, 0.0, 10.0, 10.0)));
    world.add(convoy, cargo, false).unwrap();
    let wall = wall(&mut world, Rect::new(20.0, 0.0, 10.0, 10.0));
    world.update(0.5);

    assert_relative_eq!(world.get(cargo).unwrap().rect.x, 15.0);
    assert!(world.collide(convoy, wall));
    assert_relative_eq!(world.get(cargo).unwrap().rect.right(), 20.0);
}

#[test]
fn test_land_on_tile_floor() {
    let mut world = World::default();
    let grid = TileGrid::from_csv("0,0,0\n0,0,0\n1,1,1", 16.0, 16.0, 1).unwrap();
    let level = world.spawn_tile_grid(Vec2::zeros(), grid);
    let player = world.spawn(
        GameObject::new(Rect::new(10.0, 20.0, 8.0, 8.0))
            .with_movement(MovementComponent::with_velocity(Vec2::new(0.0, 60.0))),
    );
    world.update(0.1);

    assert!(world.collide(player, level));

    let player = world.get(player).unwrap();
    assert_relative_eq!(player.rect.bottom(), 32.0, epsilon = 1.0e-4);
    assert!(player.collider.on_floor);
    assert_relative_eq!(player.movement.velocity.y, 0.0);
    assert_eq!(world.get(level).unwrap().position(), Vec2::zeros());
}

#[test]
fn test_tile_overlap_counts_solid_cells_only() {
    let mut world = World::default();
    let grid = TileGrid::new(2, 2, 16.0, 16.0, 1, vec![1, 0, 0, 0]).unwrap();
    let level = world.spawn_tile_grid(Vec2::zeros(), grid);
    let on_solid = world.spawn(GameObject::new(Rect::new(8.0, 8.0, 4.0, 4.0)));
    let on_empty = world.spawn(GameObject::new(Rect::new(20.0, 8.0, 4.0, 4.0)));

    let mut report = |_: &mut World, _: Entity, _: Entity| true;
    assert!(world.overlap_with(on_solid, level, &mut report));
    assert!(!world.overlap_with(on_empty, level, &mut report));

    assert!(!world.overlap(on_empty, level));
    assert!(world.get(on_empty).unwrap().exists);
    assert!(world.overlap(on_solid, level));
    assert!(!world.get(on_solid).unwrap().exists);
}

fn corner_scene() -> (World, Entity) {
    let mut world = World::default();
    let mover = moving_box(&mut world, 0.0, 0.0, Vec2::new(30.0, 30.0));
    let walls = world.spawn_group(Vec2::zeros());
    let right = wall(&mut world, Rect::new(22.0, -20.0, 10.0, 100.0));
    let floor = wall(&mut world, Rect::new(-20.0, 22.0, 100.0, 10.0));
    world.add(walls, right, false).unwrap();
    world.add(walls, floor, false).unwrap();

    for _ in 0..30 {
        world.update(1.0 / 30.0);
        world.collide(mover, walls);
    }
    (world, mover)
}

#[test]
fn test_diagonal_corner_is_deterministic() {
    let (first, first_mover) = corner_scene();
    let (second, second_mover) = corner_scene();

    let first = first.get(first_mover).unwrap();
    let second = second.get(second_mover).unwrap();
    assert_eq!(first.rect, second.rect);
    assert_eq!(first.movement.velocity, second.movement.velocity);

    assert_relative_eq!(first.rect.right(), 22.0, epsilon = 1.0e-3);
    assert_relative_eq!(first.rect.bottom(), 22.0, epsilon = 1.0e-3);
    assert!(first.collider.on_floor || first.movement.velocity.y == 0.0);
}
