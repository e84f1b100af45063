//! Rendering adapter: renderer-agnostic frame snapshots.
//!
//! # Invariants
//! - Renderers cannot mutate game state; they only see a [`FrameSnapshot`].
//! - Every visual cue (color, glow, lights) derives from entity state.

mod renderer;
mod snapshot;

pub use renderer::{DebugTextRenderer, Renderer};
pub use snapshot::{DrawItem, DrawKind, FrameSnapshot, PointLight};

pub fn crate_info() -> &'static str {
    "escape-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
