use escape_common::Rgb;
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::button::DEFAULT_INTERACTION_RADIUS;

const DEFAULT_WIDTH: f32 = 2.0;
const DEFAULT_HEIGHT: f32 = 3.0;

const COLOR_CLOSED: Rgb = Vec3::new(0.6, 0.3, 0.1);
const COLOR_OPEN: Rgb = Vec3::new(1.0, 0.5, 0.0);
const EMISSIVE_OPEN: Rgb = Vec3::new(1.0, 0.5, 0.0);
const EMISSIVE_STRENGTH_OPEN: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DoorState {
    #[default]
    Closed,
    Open,
}

/// The exit. Callers open it once every button is pressed; it never closes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Door {
    position: Vec3,
    width: f32,
    height: f32,
    state: DoorState,
}

impl Door {
    /// Closed door of the default size at `position`.
    pub fn new(position: Vec3) -> Self {
        Self::with_size(position, DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }

    /// Closed door with an explicit width and height.
    pub fn with_size(position: Vec3, width: f32, height: f32) -> Self {
        Self {
            position,
            width,
            height,
            state: DoorState::Closed,
        }
    }

    /// Center of the door.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Doorway width.
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Doorway height.
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Current open state.
    pub fn state(&self) -> DoorState {
        self.state
    }

    /// Whether the door has been unlocked.
    pub fn is_open(&self) -> bool {
        self.state == DoorState::Open
    }

    /// Open the door. Returns `true` only on the call that changed it.
    pub fn open(&mut self) -> bool {
        let was_closed = self.state == DoorState::Closed;
        self.state = DoorState::Open;
        was_closed
    }

    /// Strict distance test against an arbitrary radius.
    pub fn is_player_within(&self, player: Vec3, radius: f32) -> bool {
        self.position.distance(player) < radius
    }

    /// Distance test against the default interaction radius.
    pub fn is_player_near(&self, player: Vec3) -> bool {
        self.is_player_within(player, DEFAULT_INTERACTION_RADIUS)
    }

    /// Display color: brown while closed, orange once open.
    pub fn color(&self) -> Rgb {
        match self.state {
            DoorState::Closed => COLOR_CLOSED,
            DoorState::Open => COLOR_OPEN,
        }
    }

    /// Glow color, black while closed.
    pub fn emissive_color(&self) -> Rgb {
        match self.state {
            DoorState::Closed => Vec3::ZERO,
            DoorState::Open => EMISSIVE_OPEN,
        }
    }

    /// Glow strength, zero while closed.
    pub fn emissive_strength(&self) -> f32 {
        match self.state {
            DoorState::Closed => 0.0,
            DoorState::Open => EMISSIVE_STRENGTH_OPEN,
        }
    }

    /// An open door lights up the exit.
    pub fn light_active(&self) -> bool {
        self.is_open()
    }
}
