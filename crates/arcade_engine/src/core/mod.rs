//! # Core Engine Module
//!
//! Shared configuration used by the world and by applications driving it.
//!
//! ## Organization
//!
//! - **Config**: Physics, engine and application configuration

pub mod config;

// Re-export commonly used config types
pub use config::{
    ApplicationConfig,
    EngineConfig,
    PhysicsConfig,
    WorldBounds,
    Config,
    ConfigError,
};
