//! Tile Runner
//!
//! Headless platformer demo. A scripted player runs and jumps across a tile
//! level, a group of crates falls onto the ground and pickups scattered at
//! random are collected by overlap. Positions are logged as the frames run.
//!
//! Usage: `tile_runner [config.toml | config.ron]`

mod level;

use std::cell::Cell;
use std::rc::Rc;

use arcade_engine::foundation::logging;
use arcade_engine::prelude::*;
use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

const FRAME_COUNT: u32 = 600;
const RAW_FRAME_TIME: f32 = 1.0 / 60.0;
const PICKUP_COUNT: usize = 12;
const RUN_ACCELERATION: f32 = 240.0;
const JUMP_SPEED: f32 = 200.0;

fn load_config() -> Result<ApplicationConfig, ConfigError> {
    let config = match std::env::args().nth(1) {
        Some(path) => ApplicationConfig::load_from_file(&path)?,
        None => ApplicationConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

/// Turn around at the level edges and jump when standing
fn drive_player(world: &mut World, player: Entity, frame: u32) {
    let Some(object) = world.get_mut(player) else {
        return;
    };
    let right_edge = (level::LEVEL_COLUMNS as f32 - 3.0) * level::TILE_SIZE;
    if object.rect.right() > right_edge {
        object.movement.acceleration.x = -RUN_ACCELERATION;
    } else if object.rect.x < 3.0 * level::TILE_SIZE || object.movement.acceleration.x == 0.0 {
        object.movement.acceleration.x = RUN_ACCELERATION;
    }
    if object.collider.on_floor && frame % 45 == 0 {
        object.movement.velocity.y = -JUMP_SPEED;
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    logging::init_with_level(&config.engine.log_level);
    info!("Starting tile runner with bounds {:?}", config.physics.world_bounds);

    let mut frames = config.physics.frame_step();
    let mut world = World::new(config.physics);
    let mut rng = StdRng::seed_from_u64(7);

    let level = level::spawn_level(&mut world)?;
    let landings = Rc::new(Cell::new(0));
    let player = level::spawn_player(&mut world, Rc::clone(&landings));
    let crates = level::spawn_crates(&mut world)?;
    let pickups = level::spawn_pickups(&mut world, &mut rng, PICKUP_COUNT)?;

    let mut collected = 0;
    for frame in 0..FRAME_COUNT {
        let dt = frames.advance(RAW_FRAME_TIME);
        drive_player(&mut world, player, frame);
        world.update(dt);

        world.collide(crates, crates);
        world.collide(crates, level);
        world.collide(player, level);
        world.collide(player, crates);
        world.overlap_with(player, pickups, &mut |world: &mut World, _player: Entity, pickup: Entity| {
            world.kill(pickup);
            collected += 1;
            true
        });

        if frame % 60 == 0 {
            if let Some(object) = world.get(player) {
                info!(
                    "t={:.2}s player at ({:.1}, {:.1}) velocity ({:.1}, {:.1}) on_floor={}",
                    frames.total_time(),
                    object.rect.x,
                    object.rect.y,
                    object.movement.velocity.x,
                    object.movement.velocity.y,
                    object.collider.on_floor
                );
            }
        }
    }

    for crate_box in world.members(crates)? {
        if let Some(object) = world.get(crate_box) {
            info!("Crate {:?} rests at ({:.1}, {:.1})", crate_box, object.rect.x, object.rect.y);
        }
    }
    if collected < PICKUP_COUNT {
        warn!("Only {} of {} pickups collected", collected, PICKUP_COUNT);
    }
    info!(
        "Finished {} frames: {} pickups, {} floor contacts",
        frames.frame_count(),
        collected,
        landings.get()
    );
    Ok(())
}
