//! Components attached to every game object

pub mod movement;
pub mod collision;
pub mod group;
pub mod tilemap;

pub use movement::MovementComponent;
pub use collision::ColliderComponent;
pub use group::GroupComponent;
pub use tilemap::{TileGrid, TileGridError};
