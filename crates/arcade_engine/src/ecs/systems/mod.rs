//! ECS Systems module

pub mod motion_system;

pub use motion_system::{reset_object, update_object};
