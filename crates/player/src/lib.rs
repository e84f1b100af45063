//! Player embodiment: the first-person camera and its movement model.
//!
//! # Invariants
//! - `front`, `right` and `up` stay orthonormal after every orientation change.
//! - Pitch stays inside +/-89 degrees unless explicitly unconstrained.
//! - fov stays inside the configured range.
//! - A grounded player's eye is always at the fixed eye height.

mod camera;

pub use camera::{CameraMovement, FirstPersonCamera};
