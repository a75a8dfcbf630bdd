//! # Unified Configuration System
//!
//! Configuration structures for the simulation and the engine around it.
//! Every structure is serde-serializable so applications can keep it in a
//! TOML or RON file next to their level data.
//!
//! ## Configuration Categories
//!
//! - **Physics Config**: World bounds for the collision index, frame clamping, time scale
//! - **Engine Config**: Logging and debug features
//! - **Application Config**: Both of the above, loaded from one file

use serde::{Serialize, Deserialize};

use crate::foundation::math::Rect;
use crate::foundation::time::FrameStep;

pub use crate::config::{Config, ConfigError};

/// Default number of subdivisions used to size the smallest quad tree node
pub const DEFAULT_DIVISIONS: u32 = 3;

/// # World Bounds
///
/// The region covered by the root of every collision index. Objects entirely
/// outside it are never reported by `collide`/`overlap`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldBounds {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Horizontal extent
    pub width: f32,
    /// Vertical extent
    pub height: f32,
    /// Controls the smallest node size: `(width + height) / (2 * divisions)`
    #[serde(default = "default_divisions")]
    pub divisions: u32,
}

fn default_divisions() -> u32 {
    DEFAULT_DIVISIONS
}

impl WorldBounds {
    /// Create bounds with the default subdivision count
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height, divisions: DEFAULT_DIVISIONS }
    }

    /// Override the subdivision count
    pub fn with_divisions(mut self, divisions: u32) -> Self {
        self.divisions = divisions;
        self
    }

    /// Bounds as a rectangle
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Smallest node extent the quad tree will still split
    ///
    /// Bounds without a positive size give infinity, so the root never splits.
    pub fn min_node_size(&self) -> f32 {
        let size = (self.width + self.height) / (2.0 * self.divisions.max(1) as f32);
        if size.is_finite() && size > 0.0 {
            size
        } else {
            f32::INFINITY
        }
    }

    /// Validate the bounds
    pub fn validate(&self) -> Result<(), String> {
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(format!("World bounds must have a positive size, got {}x{}", self.width, self.height));
        }
        if self.divisions == 0 {
            return Err("World bounds divisions must be at least 1".to_string());
        }
        Ok(())
    }
}

impl Default for WorldBounds {
    /// A 640x480 screen with a 10 unit margin on every side
    fn default() -> Self {
        Self::new(-10.0, -10.0, 660.0, 500.0)
    }
}

/// # Physics Configuration
///
/// Settings consumed by the world and by the frame driver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhysicsConfig {
    /// Region indexed by `collide`/`overlap`
    pub world_bounds: WorldBounds,
    /// Longest frame step (seconds) handed to the simulation
    pub max_elapsed: f32,
    /// Multiplier applied to every frame step
    pub time_scale: f32,
}

impl PhysicsConfig {
    /// Create a physics configuration with the given bounds
    pub fn new(world_bounds: WorldBounds) -> Self {
        Self {
            world_bounds,
            max_elapsed: 1.0 / 30.0,
            time_scale: 1.0,
        }
    }

    /// Set the frame clamp
    pub fn with_max_elapsed(mut self, max_elapsed: f32) -> Self {
        self.max_elapsed = max_elapsed;
        self
    }

    /// Frame stepper matching this configuration
    pub fn frame_step(&self) -> FrameStep {
        FrameStep::new(self.max_elapsed, self.time_scale)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        self.world_bounds.validate()?;
        if self.max_elapsed <= 0.0 {
            return Err(format!("Max elapsed must be positive, got {}", self.max_elapsed));
        }
        if self.time_scale < 0.0 {
            return Err(format!("Time scale cannot be negative, got {}", self.time_scale));
        }
        Ok(())
    }
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self::new(WorldBounds::default())
    }
}

/// # Engine Configuration
///
/// Core engine behavior: logging and debug features.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Log level filter used when `RUST_LOG` is not set
    pub log_level: String,
    /// Whether to enable debug features
    pub debug_mode: bool,
}

impl EngineConfig {
    /// Create a new engine configuration
    pub fn new() -> Self {
        Self {
            log_level: "info".to_string(),
            debug_mode: cfg!(debug_assertions),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Complete Application Configuration
///
/// Top-level configuration that encompasses all engine subsystems.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Engine core configuration
    pub engine: EngineConfig,
    /// Physics and collision configuration
    pub physics: PhysicsConfig,
}

impl ApplicationConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.physics.validate().map_err(ConfigError::Invalid)
    }
}

impl Config for ApplicationConfig {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigFormat;

    #[test]
    fn test_min_node_size_from_root() {
        let bounds = WorldBounds::new(0.0, 0.0, 300.0, 300.0);
        assert_eq!(bounds.min_node_size(), 100.0);
        assert_eq!(bounds.with_divisions(6).min_node_size(), 50.0);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        assert!(PhysicsConfig::default().validate().is_ok());
        assert!(PhysicsConfig::new(WorldBounds::new(0.0, 0.0, 0.0, 10.0)).validate().is_err());
        assert!(PhysicsConfig::new(WorldBounds::default().with_divisions(0)).validate().is_err());
        assert!(PhysicsConfig::default().with_max_elapsed(0.0).validate().is_err());
    }

    #[test]
    fn test_negative_extent_never_splits() {
        assert_eq!(WorldBounds::new(0.0, 0.0, -900.0, 300.0).min_node_size(), f32::INFINITY);
        assert_eq!(WorldBounds::new(0.0, 0.0, f32::NAN, 300.0).min_node_size(), f32::INFINITY);
    }

    #[test]
    fn test_ron_round_trip_keeps_bounds() {
        let mut config = ApplicationConfig::default();
        config.physics.world_bounds = WorldBounds::new(0.0, 0.0, 1024.0, 768.0).with_divisions(4);

        let text = config.to_string_with_format(ConfigFormat::Ron).unwrap();
        let parsed = ApplicationConfig::from_str_with_format(&text, ConfigFormat::Ron).unwrap();

        assert_eq!(parsed.physics.world_bounds, config.physics.world_bounds);
    }

    #[test]
    fn test_toml_divisions_default() {
        let text = r#"
            [engine]
            log_level = "debug"
            debug_mode = false

            [physics]
            max_elapsed = 0.05
            time_scale = 1.0

            [physics.world_bounds]
            x = 0.0
            y = 0.0
            width = 320.0
            height = 240.0
        "#;
        let config = ApplicationConfig::from_str_with_format(text, ConfigFormat::Toml).unwrap();
        assert_eq!(config.physics.world_bounds.divisions, DEFAULT_DIVISIONS);
        assert_eq!(config.engine.log_level, "debug");
    }

    #[test]
    fn test_unsupported_extension() {
        let result = ApplicationConfig::load_from_file("settings.json");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }
}
