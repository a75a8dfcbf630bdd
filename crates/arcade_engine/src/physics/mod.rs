//! Physics module for motion integration and collision response
//!
//! Provides the per-axis velocity integrator, directional collision filters
//! and the sweep-based resolver that separates overlapping objects.

pub mod velocity;
pub mod collision_sides;
pub mod collision_system;

pub use velocity::{compute_velocity, UNBOUNDED};
pub use collision_sides::{Axis, CollideSides, HitSide};
pub use collision_system::{collide, overlap, solve_x, solve_y, OverlapCallback};
