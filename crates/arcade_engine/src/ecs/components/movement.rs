//! Movement component for objects that move in the 2D plane
//!
//! Holds linear and angular motion state plus thrust. Integration is
//! midpoint style: the displacement for a frame uses the average of the
//! velocity before and after the frame's acceleration or drag, so a constant
//! velocity moves an object by exactly `velocity * dt`.

use crate::foundation::math::{Vec2, direction_from_degrees};
use crate::physics::velocity::{compute_velocity, UNBOUNDED};

/// Component for objects that can move
#[derive(Debug, Clone, PartialEq)]
pub struct MovementComponent {
    /// Linear velocity in units per second
    pub velocity: Vec2,

    /// Linear acceleration in units per second squared
    pub acceleration: Vec2,

    /// Deceleration applied per axis while that axis has no acceleration
    pub drag: Vec2,

    /// Per-axis speed cap, [`UNBOUNDED`] for none
    pub max_velocity: Vec2,

    /// Facing in degrees, 0 = +X, 90 = +Y (down)
    pub angle: f32,

    /// Angular velocity in degrees per second
    pub angular_velocity: f32,

    /// Angular acceleration in degrees per second squared
    pub angular_acceleration: f32,

    /// Angular deceleration while there is no angular acceleration
    pub angular_drag: f32,

    /// Angular speed cap, [`UNBOUNDED`] for none
    pub max_angular: f32,

    /// Acceleration along the facing direction
    pub thrust: f32,

    /// Speed cap along the facing direction while thrusting
    pub max_thrust: f32,

    /// Whether the motion step runs at all
    pub moves: bool,
}

impl MovementComponent {
    /// Create a movement component at rest
    pub fn new() -> Self {
        Self {
            velocity: Vec2::zeros(),
            acceleration: Vec2::zeros(),
            drag: Vec2::zeros(),
            max_velocity: Vec2::new(UNBOUNDED, UNBOUNDED),
            angle: 0.0,
            angular_velocity: 0.0,
            angular_acceleration: 0.0,
            angular_drag: 0.0,
            max_angular: UNBOUNDED,
            thrust: 0.0,
            max_thrust: 0.0,
            moves: true,
        }
    }

    /// Create a movement component with initial velocity
    pub fn with_velocity(velocity: Vec2) -> Self {
        Self {
            velocity,
            ..Self::new()
        }
    }

    /// Create a movement component that never moves
    pub fn stationary() -> Self {
        Self {
            moves: false,
            ..Self::new()
        }
    }

    /// Thrust acceleration for the current facing
    pub fn thrust_vector(&self) -> Vec2 {
        if self.thrust == 0.0 {
            return Vec2::zeros();
        }
        direction_from_degrees(self.angle) * self.thrust
    }

    /// Integrate angular and linear motion for one step
    ///
    /// Returns the displacement to apply to the object's position.
    pub fn integrate(&mut self, dt: f32) -> Vec2 {
        let half = (compute_velocity(
            self.angular_velocity,
            self.angular_acceleration,
            self.angular_drag,
            self.max_angular,
            dt,
        ) - self.angular_velocity)
            / 2.0;
        self.angular_velocity += half;
        self.angle += self.angular_velocity * dt;
        self.angular_velocity += half;

        let thrust = self.thrust_vector();
        if self.thrust != 0.0 {
            // While thrusting, both axes share the larger component of the thrust cap.
            let cap = direction_from_degrees(self.angle) * self.max_thrust;
            let max = cap.x.abs().max(cap.y.abs());
            self.max_velocity = Vec2::new(max, max);
        }

        let half_x = (compute_velocity(
            self.velocity.x,
            self.acceleration.x + thrust.x,
            self.drag.x,
            self.max_velocity.x,
            dt,
        ) - self.velocity.x)
            / 2.0;
        self.velocity.x += half_x;
        let dx = self.velocity.x * dt;
        self.velocity.x += half_x;

        let half_y = (compute_velocity(
            self.velocity.y,
            self.acceleration.y + thrust.y,
            self.drag.y,
            self.max_velocity.y,
            dt,
        ) - self.velocity.y)
            / 2.0;
        self.velocity.y += half_y;
        let dy = self.velocity.y * dt;
        self.velocity.y += half_y;

        Vec2::new(dx, dy)
    }
}

impl Default for MovementComponent {
    fn default() -> Self {
        Self::new()
    }
}
