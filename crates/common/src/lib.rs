//! Shared types and tuning for the escape room workspace.
//!
//! # Invariants
//! - Types here carry no game rules; they are plain data.
//! - A validated [`GameConfig`] never needs to be re-checked downstream.

pub mod config;
pub mod types;

pub use config::{CameraConfig, ConfigError, GameConfig, InteractionConfig};
pub use types::{Rgb, Transform};
