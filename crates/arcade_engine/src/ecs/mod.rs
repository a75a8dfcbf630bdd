//! Entity-Component-System implementation
//!
//! Game objects live in a keyed arena owned by the [`World`]. Each object is
//! composed of a rectangle plus movement and collision components, and its
//! kind decides whether it also acts as a group or a tile grid.

pub mod world;
pub mod entity;
pub mod object;
pub mod components;
pub mod systems;

#[cfg(test)]
mod tests;

pub use world::{World, WorldError};
pub use entity::Entity;
pub use object::{CollisionHandler, DefaultHandler, GameObject, ObjectKind};
