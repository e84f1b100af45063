//! wgpu render backend for the escape room.
//!
//! Draws every box in a [`escape_render::FrameSnapshot`] as a lit, instanced
//! cube with emissive glow and the colored point lights of activated entities.
//!
//! # Invariants
//! - The renderer only reads frame snapshots, never the session.
//! - All GPU resources are owned by [`WgpuRenderer`]; there is no global state.

mod gpu;
mod shaders;

pub use gpu::WgpuRenderer;
