//! Per-axis velocity integration
//!
//! One pure function shared by linear and angular motion. Drag only applies
//! while there is no acceleration, and it never pushes a velocity past zero.

/// Cap value meaning "no speed limit"
pub const UNBOUNDED: f32 = 10_000.0;

/// Advance one velocity component by `dt` seconds
///
/// * `acceleration != 0`: the velocity changes by `acceleration * dt`.
/// * otherwise `drag != 0`: the velocity moves toward zero by `drag * dt`,
///   stopping at zero.
/// * otherwise the velocity is unchanged.
///
/// The result is clamped to `[-max, max]` unless `max` is [`UNBOUNDED`].
pub fn compute_velocity(velocity: f32, acceleration: f32, drag: f32, max: f32, dt: f32) -> f32 {
    let mut velocity = velocity;
    if acceleration != 0.0 {
        velocity += acceleration * dt;
    } else if drag != 0.0 {
        let d = drag * dt;
        velocity = if velocity - d > 0.0 {
            velocity - d
        } else if velocity + d < 0.0 {
            velocity + d
        } else {
            0.0
        };
    }

    if velocity != 0.0 && max != UNBOUNDED {
        velocity = velocity.clamp(-max, max);
    }
    velocity
}
