//! Input: raw device events mapped to game actions and per-frame snapshots.
//!
//! # Invariants
//! - Edge detection keeps exactly one frame of history.
//! - History is latched only by `end_frame`, after the frame has been simulated.

pub mod action;
pub mod snapshot;

pub use action::{Action, Key};
pub use snapshot::{InputSnapshot, InputState, KeyLatch};
