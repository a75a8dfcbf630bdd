//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the engine:
//! - Math types and operations
//! - Collections and handles
//! - Frame time stepping
//! - Logging utilities

pub mod math;
pub mod collections;
pub mod time;
pub mod logging;
