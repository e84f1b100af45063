//! Game kernel: authoritative escape room state and per-frame stepping.
//!
//! # Invariants
//! - Buttons only go from unpressed to pressed; the door only from closed to open.
//! - The door opens if and only if every button is pressed.
//! - Winning is terminal.
//! - The interaction prompt is recomputed every frame, never carried over.

pub mod button;
pub mod door;
pub mod game;
pub mod room;
pub mod session;

pub use button::{Button, ButtonState, DEFAULT_INTERACTION_RADIUS};
pub use door::{Door, DoorState};
pub use game::{GameEvent, GameState};
pub use room::{FloorPlane, RoomLayout, WallPiece};
pub use session::Session;
