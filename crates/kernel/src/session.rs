use escape_common::GameConfig;
use escape_input::InputSnapshot;
use escape_player::{CameraMovement, FirstPersonCamera};
use glam::Vec3;

use crate::game::{GameEvent, GameState};
use crate::room::RoomLayout;

/// One play-through: the player camera, the game rules and the static room.
///
/// The shell calls [`Session::update`] once per frame and then reads the
/// session immutably to render.
#[derive(Debug, Clone)]
pub struct Session {
    camera: FirstPersonCamera,
    game: GameState,
    layout: RoomLayout,
    frame: u64,
}

impl Session {
    /// Start a session in the standard room.
    pub fn new(config: &GameConfig) -> Self {
        Self::with_layout(config, RoomLayout::standard())
    }

    /// Start a session in a custom room.
    pub fn with_layout(config: &GameConfig, layout: RoomLayout) -> Self {
        let camera = FirstPersonCamera::from_config(layout.player_start(), Vec3::Y, config.camera);
        let game = GameState::from_layout(&layout).with_radius(config.interaction.radius);
        tracing::info!(
            buttons = game.total_buttons(),
            walls = layout.walls().len(),
            "session started"
        );
        Self {
            camera,
            game,
            layout,
            frame: 0,
        }
    }

    /// The player camera.
    pub fn camera(&self) -> &FirstPersonCamera {
        &self.camera
    }

    /// Mutable camera access, for teleports and tests.
    pub fn camera_mut(&mut self) -> &mut FirstPersonCamera {
        &mut self.camera
    }

    /// The game rules and entity states.
    pub fn game(&self) -> &GameState {
        &self.game
    }

    /// The static room geometry.
    pub fn layout(&self) -> &RoomLayout {
        &self.layout
    }

    /// Number of completed updates.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Title-bar status line for the current state.
    pub fn status_text(&self) -> String {
        self.game.status_text()
    }

    /// Advance one frame. Look and movement run before the game rules, so
    /// interaction sees the position this frame's input produced.
    pub fn update(&mut self, dt: f32, input: &InputSnapshot) -> Vec<GameEvent> {
        let cam = &mut self.camera;

        if input.focus_regained {
            cam.reset_look_baseline();
        }
        cam.process_look(input.cursor.x, input.cursor.y);
        if input.scroll != 0.0 {
            cam.process_zoom(input.scroll);
        }

        let held = [
            (input.forward, CameraMovement::Forward),
            (input.backward, CameraMovement::Backward),
            (input.left, CameraMovement::Left),
            (input.right, CameraMovement::Right),
        ];
        for (_, direction) in held.into_iter().filter(|(down, _)| *down) {
            cam.process_movement(direction, dt);
        }

        if input.jump_pressed {
            cam.start_jump();
        }
        cam.integrate_vertical(dt);

        let events = self.game.update(cam.position(), input.interact_pressed);
        for event in &events {
            match event {
                GameEvent::ButtonPressed { index } => tracing::info!(
                    index,
                    pressed = self.game.pressed_count(),
                    total = self.game.total_buttons(),
                    "button pressed"
                ),
                GameEvent::DoorOpened => tracing::info!("door unlocked"),
                GameEvent::Escaped => tracing::info!(frame = self.frame, "player escaped"),
            }
        }

        self.frame += 1;
        events
    }
}
