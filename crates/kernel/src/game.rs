use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::button::{Button, DEFAULT_INTERACTION_RADIUS};
use crate::door::Door;
use crate::room::RoomLayout;

const STATUS_PREFIX: &str = "Escape Room";
const ESCAPED_STATUS: &str = "Escape Room - You Escaped - Press ESC to close";
const PROMPT_ACTIVATE: &str = "Press E to Activate Button";
const PROMPT_ESCAPE: &str = "Press E to Escape";

/// A transition that happened during one [`GameState::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Button at this index in layout order was pressed.
    ButtonPressed { index: usize },
    DoorOpened,
    Escaped,
}

/// The escape room rules.
///
/// Persistent state (buttons, door, won flag) only ever moves forward. The
/// interaction prompt is transient and rebuilt from scratch every update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    buttons: Vec<Button>,
    door: Door,
    won: bool,
    prompt: Option<String>,
    radius: f32,
}

impl GameState {
    /// Fresh game over the given entities, using the default radius.
    pub fn new(buttons: Vec<Button>, door: Door) -> Self {
        Self {
            buttons,
            door,
            won: false,
            prompt: None,
            radius: DEFAULT_INTERACTION_RADIUS,
        }
    }

    /// Buttons and door placed as in `layout`.
    pub fn from_layout(layout: &RoomLayout) -> Self {
        let buttons = layout
            .button_positions()
            .iter()
            .map(|&p| Button::with_size(p, layout.button_size()))
            .collect();
        let (width, height) = layout.door_size();
        Self::new(
            buttons,
            Door::with_size(layout.door_position(), width, height),
        )
    }

    /// Override the interaction radius.
    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    /// Buttons in layout order.
    pub fn buttons(&self) -> &[Button] {
        &self.buttons
    }

    /// The exit door.
    pub fn door(&self) -> &Door {
        &self.door
    }

    /// Whether the player has escaped. Terminal once set.
    pub fn game_won(&self) -> bool {
        self.won
    }

    /// Distance under which buttons and the door react.
    pub fn interaction_radius(&self) -> f32 {
        self.radius
    }

    /// Whether the last update produced a prompt.
    pub fn show_interaction_prompt(&self) -> bool {
        self.prompt.is_some()
    }

    /// Current prompt, or `""` when none is shown.
    pub fn interaction_text(&self) -> &str {
        self.prompt.as_deref().unwrap_or("")
    }

    /// Number of buttons pressed so far.
    pub fn pressed_count(&self) -> usize {
        self.buttons.iter().filter(|b| b.is_pressed()).count()
    }

    /// Number of buttons in the room.
    pub fn total_buttons(&self) -> usize {
        self.buttons.len()
    }

    fn progress(&self) -> String {
        format!("Buttons: {}/{}", self.pressed_count(), self.total_buttons())
    }

    /// Run one frame of interaction. `interact` must be edge-triggered: true
    /// only on the frame the key went down.
    pub fn update(&mut self, player: Vec3, interact: bool) -> Vec<GameEvent> {
        let mut events = Vec::new();
        self.prompt = None;

        // Later buttons overwrite the prompt of earlier ones.
        for index in 0..self.buttons.len() {
            let button = &self.buttons[index];
            if button.is_pressed() || !button.is_player_within(player, self.radius) {
                continue;
            }
            self.prompt = Some(PROMPT_ACTIVATE.to_string());
            if interact && self.buttons[index].try_press() {
                events.push(GameEvent::ButtonPressed { index });
                self.open_door_if_solved(&mut events);
            }
        }
        self.open_door_if_solved(&mut events);

        if self.door.is_player_within(player, self.radius) {
            if !self.door.is_open() {
                self.prompt = Some(format!("Door Locked - {}", self.progress()));
            } else if !self.won {
                self.prompt = Some(PROMPT_ESCAPE.to_string());
                if interact {
                    self.won = true;
                    events.push(GameEvent::Escaped);
                }
            }
        }

        events
    }

    fn open_door_if_solved(&mut self, events: &mut Vec<GameEvent>) {
        if self.buttons.iter().all(Button::is_pressed) && self.door.open() {
            events.push(GameEvent::DoorOpened);
        }
    }

    /// One-line summary for the window title or HUD.
    pub fn status_text(&self) -> String {
        if self.won {
            ESCAPED_STATUS.to_string()
        } else if let Some(prompt) = &self.prompt {
            format!("{STATUS_PREFIX} - {prompt}")
        } else {
            format!("{STATUS_PREFIX} - {}", self.progress())
        }
    }
}
