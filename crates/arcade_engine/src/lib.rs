//! # Arcade Engine
//!
//! The motion and collision core of a 2D arcade game engine.
//!
//! ## Features
//!
//! - **Arcade Motion**: Velocity, acceleration, drag, speed caps, rotation and thrust
//! - **Object Groups**: Nested containers that move their members rigidly
//! - **Tile Grids**: Fixed cell maps that collide cell by cell
//! - **Quad Tree Broad Phase**: Rebuilt per query with separate A/B lists
//! - **Swept Resolution**: Axis-separated pushes with directional hit callbacks
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use arcade_engine::prelude::*;
//!
//! let mut world = World::default();
//! let floor = world.spawn(
//!     GameObject::new(Rect::new(0.0, 100.0, 200.0, 16.0))
//!         .with_collider(ColliderComponent::new().as_fixed()),
//! );
//! let mut body = MovementComponent::new();
//! body.acceleration = Vec2::new(0.0, 400.0);
//! let player = world.spawn(GameObject::new(Rect::new(20.0, 60.0, 8.0, 8.0)).with_movement(body));
//!
//! let mut frames = world.physics().frame_step();
//! for _ in 0..60 {
//!     let dt = frames.advance(1.0 / 60.0);
//!     world.update(dt);
//!     world.collide(player, floor);
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

// Core engine modules
pub mod core;
pub mod config;

pub mod foundation;
pub mod ecs;
pub mod physics;
pub mod spatial;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        core::{ApplicationConfig, Config, ConfigError, EngineConfig, PhysicsConfig, WorldBounds},
        ecs::{
            components::{ColliderComponent, GroupComponent, MovementComponent, TileGrid, TileGridError},
            CollisionHandler, DefaultHandler, Entity, GameObject, ObjectKind, World, WorldError,
        },
        foundation::{
            collections::Removal,
            math::{Rect, Vec2},
            time::FrameStep,
        },
        physics::{Axis, CollideSides, HitSide, OverlapCallback, UNBOUNDED},
    };
}
