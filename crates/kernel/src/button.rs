use escape_common::Rgb;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Distance under which the player can use a button or the door.
pub const DEFAULT_INTERACTION_RADIUS: f32 = 2.0;

const DEFAULT_SIZE: f32 = 0.3;

const COLOR_UNPRESSED: Rgb = Vec3::new(1.0, 0.0, 0.0);
const COLOR_PRESSED: Rgb = Vec3::new(1.0, 0.5, 0.0);
const EMISSIVE_PRESSED: Rgb = Vec3::new(1.0, 0.5, 0.0);
const EMISSIVE_STRENGTH_PRESSED: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ButtonState {
    #[default]
    Unpressed,
    Pressed,
}

/// A pressure pad. Once pressed it stays pressed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Button {
    position: Vec3,
    size: f32,
    state: ButtonState,
}

impl Button {
    /// Unpressed button of the default size at `position`.
    pub fn new(position: Vec3) -> Self {
        Self::with_size(position, DEFAULT_SIZE)
    }

    /// Unpressed button with an explicit cube edge length.
    pub fn with_size(position: Vec3, size: f32) -> Self {
        Self {
            position,
            size,
            state: ButtonState::Unpressed,
        }
    }

    /// Center of the button cube.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Edge length of the button cube.
    pub fn size(&self) -> f32 {
        self.size
    }

    /// Current press state.
    pub fn state(&self) -> ButtonState {
        self.state
    }

    /// Whether the button has been pressed.
    pub fn is_pressed(&self) -> bool {
        self.state == ButtonState::Pressed
    }

    /// Press the button. Returns `true` only on the call that changed it.
    pub fn try_press(&mut self) -> bool {
        match self.state {
            ButtonState::Unpressed => {
                self.state = ButtonState::Pressed;
                true
            }
            ButtonState::Pressed => false,
        }
    }

    /// Strict distance test against an arbitrary radius.
    pub fn is_player_within(&self, player: Vec3, radius: f32) -> bool {
        self.position.distance(player) < radius
    }

    /// Distance test against the default interaction radius.
    pub fn is_player_near(&self, player: Vec3) -> bool {
        self.is_player_within(player, DEFAULT_INTERACTION_RADIUS)
    }

    /// Display color: red until pressed, orange after.
    pub fn color(&self) -> Rgb {
        match self.state {
            ButtonState::Unpressed => COLOR_UNPRESSED,
            ButtonState::Pressed => COLOR_PRESSED,
        }
    }

    /// Glow color, black until pressed.
    pub fn emissive_color(&self) -> Rgb {
        match self.state {
            ButtonState::Unpressed => Vec3::ZERO,
            ButtonState::Pressed => EMISSIVE_PRESSED,
        }
    }

    /// Glow strength, zero until pressed.
    pub fn emissive_strength(&self) -> f32 {
        match self.state {
            ButtonState::Unpressed => 0.0,
            ButtonState::Pressed => EMISSIVE_STRENGTH_PRESSED,
        }
    }

    /// A pressed button lights up its surroundings.
    pub fn light_active(&self) -> bool {
        self.is_pressed()
    }
}
