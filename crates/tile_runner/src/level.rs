//! Level layout and actor spawning

use std::cell::Cell;
use std::rc::Rc;

use arcade_engine::prelude::*;
use log::debug;
use rand::Rng;

/// Cell size in world units
pub const TILE_SIZE: f32 = 16.0;

/// Level width in cells
pub const LEVEL_COLUMNS: usize = 40;

/// Level height in cells
pub const LEVEL_ROWS: usize = 15;

/// Downward acceleration applied to everything that falls
pub const GRAVITY: f32 = 400.0;

/// Ground, outer walls and two ledges, as comma separated rows
pub fn level_csv() -> String {
    let mut rows = Vec::with_capacity(LEVEL_ROWS);
    for row in 0..LEVEL_ROWS {
        let cells: Vec<&str> = (0..LEVEL_COLUMNS)
            .map(|column| {
                let ground = row >= LEVEL_ROWS - 2;
                let wall = column == 0 || column == LEVEL_COLUMNS - 1;
                let low_ledge = row == 10 && (8..14).contains(&column);
                let high_ledge = row == 7 && (18..25).contains(&column);
                if ground || wall || low_ledge || high_ledge {
                    "1"
                } else {
                    "0"
                }
            })
            .collect();
        rows.push(cells.join(","));
    }
    rows.join("\n")
}

/// Counts bottom contacts on the player
pub struct PlayerHandler {
    landings: Rc<Cell<u32>>,
}

impl PlayerHandler {
    /// Create a handler reporting into `landings`
    pub fn new(landings: Rc<Cell<u32>>) -> Self {
        Self { landings }
    }
}

impl CollisionHandler for PlayerHandler {
    fn hit_bottom(&mut self, world: &mut World, this: Entity, _contact: Entity, velocity: f32) {
        if let Some(player) = world.get_mut(this) {
            if !player.collider.on_floor {
                self.landings.set(self.landings.get() + 1);
            }
            player.collider.on_floor = true;
            player.movement.velocity.y = velocity;
        }
    }
}

/// Spawn the tile grid
pub fn spawn_level(world: &mut World) -> Result<Entity, TileGridError> {
    let grid = TileGrid::from_csv(&level_csv(), TILE_SIZE, TILE_SIZE, 1)?;
    let cell = grid.tile_size();
    debug!(
        "Level is {}x{} cells of {}x{}",
        grid.width_in_tiles(),
        grid.height_in_tiles(),
        cell.x,
        cell.y
    );
    Ok(world.spawn_tile_grid(Vec2::zeros(), grid))
}

/// Spawn the player above the left end of the ground
pub fn spawn_player(world: &mut World, landings: Rc<Cell<u32>>) -> Entity {
    let mut movement = MovementComponent::new();
    movement.acceleration = Vec2::new(0.0, GRAVITY);
    movement.drag = Vec2::new(300.0, 0.0);
    movement.max_velocity = Vec2::new(90.0, 240.0);
    world.spawn(
        GameObject::new(Rect::new(3.0 * TILE_SIZE, 8.0 * TILE_SIZE, 8.0, 12.0))
            .with_movement(movement)
            .with_handler(PlayerHandler::new(landings)),
    )
}

/// Spawn a stack of falling crates inside a group
pub fn spawn_crates(world: &mut World) -> Result<Entity, WorldError> {
    let group = world.spawn_group(Vec2::new(28.0 * TILE_SIZE, 2.0 * TILE_SIZE));
    for level in 0..3 {
        let mut movement = MovementComponent::new();
        movement.acceleration = Vec2::new(0.0, GRAVITY);
        movement.drag = Vec2::new(200.0, 0.0);
        let crate_box = world.spawn(GameObject::new(Rect::new(
            28.0 * TILE_SIZE,
            (2.0 + level as f32 * 1.5) * TILE_SIZE,
            TILE_SIZE,
            TILE_SIZE,
        ))
        .with_movement(movement));
        world.add(group, crate_box, false)?;
    }
    Ok(group)
}

/// Scatter still pickups over the open part of the level
pub fn spawn_pickups(world: &mut World, rng: &mut impl Rng, count: usize) -> Result<Entity, WorldError> {
    let group = world.spawn_group(Vec2::zeros());
    for _ in 0..count {
        let column = rng.gen_range(2..LEVEL_COLUMNS - 2);
        let height = rng.gen_range(1..4);
        let position = Vec2::new(
            column as f32 * TILE_SIZE + 4.0,
            (LEVEL_ROWS - 2 - height) as f32 * TILE_SIZE + 4.0,
        );
        let pickup = world.spawn(
            GameObject::new(Rect::new(position.x, position.y, 8.0, 8.0)).with_movement(MovementComponent::stationary()),
        );
        world.add(group, pickup, true)?;
    }
    Ok(group)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_dimensions() {
        let grid = TileGrid::from_csv(&level_csv(), TILE_SIZE, TILE_SIZE, 1).unwrap();
        assert_eq!(grid.width_in_tiles(), LEVEL_COLUMNS);
        assert_eq!(grid.height_in_tiles(), LEVEL_ROWS);
        assert!(grid.is_collidable(5, LEVEL_ROWS - 1));
        assert!(!grid.is_collidable(5, 5));
    }

    #[test]
    fn test_player_lands_on_ground() {
        let mut world = World::default();
        let level = spawn_level(&mut world).unwrap();
        let landings = Rc::new(Cell::new(0));
        let player = spawn_player(&mut world, Rc::clone(&landings));

        for _ in 0..120 {
            world.update(1.0 / 60.0);
            world.collide(player, level);
        }

        let player = world.get(player).unwrap();
        assert!((player.rect.bottom() - (LEVEL_ROWS - 2) as f32 * TILE_SIZE).abs() < 1.0e-2);
        assert!(landings.get() >= 1);
    }
}
