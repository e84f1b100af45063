use escape_common::{Rgb, Transform};
use escape_kernel::{FloorPlane, Session};
use glam::{Mat4, Vec3};
use serde::Serialize;

/// The door is drawn as a slab larger than its interaction footprint.
const DOOR_SCALE: Vec3 = Vec3::new(6.5, 4.2, 0.2);
const LIGHT_COLOR: Rgb = Vec3::new(1.0, 0.5, 0.0);
const BUTTON_LIGHT_INTENSITY: f32 = 1.0;
const DOOR_LIGHT_INTENSITY: f32 = 6.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DrawKind {
    Floor,
    Wall,
    Button,
    Door,
}

/// One box to draw.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DrawItem {
    pub kind: DrawKind,
    pub transform: Transform,
    pub color: Rgb,
    pub emissive_color: Rgb,
    pub emissive_strength: f32,
}

/// Colored point light emitted by an activated button or the open door.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PointLight {
    pub position: Vec3,
    pub color: Rgb,
    pub intensity: f32,
}

/// Immutable copy of everything a renderer needs for one frame.
///
/// Taken between the update and render passes; renderers never see the
/// live session.
#[derive(Debug, Clone, Serialize)]
pub struct FrameSnapshot {
    pub frame: u64,
    pub view: Mat4,
    pub projection: Mat4,
    pub camera_position: Vec3,
    pub fov_degrees: f32,
    pub items: Vec<DrawItem>,
    pub lights: Vec<PointLight>,
    pub status: String,
    pub prompt: Option<String>,
    pub pressed: usize,
    pub total: usize,
    pub game_won: bool,
}

impl FrameSnapshot {
    /// Capture `session` as seen through a viewport with the given aspect ratio.
    pub fn capture(session: &Session, aspect: f32) -> Self {
        let camera = session.camera();
        let game = session.game();
        let layout = session.layout();

        let mut items = Vec::with_capacity(layout.walls().len() + game.total_buttons() + 2);
        items.push(floor_item(layout.floor()));
        items.extend(layout.walls().iter().map(|w| DrawItem {
            kind: DrawKind::Wall,
            transform: w.transform,
            color: w.color,
            emissive_color: Vec3::ZERO,
            emissive_strength: 0.0,
        }));

        let mut lights = Vec::new();
        for button in game.buttons() {
            items.push(DrawItem {
                kind: DrawKind::Button,
                transform: Transform::from_position_scale(
                    button.position(),
                    Vec3::splat(button.size()),
                ),
                color: button.color(),
                emissive_color: button.emissive_color(),
                emissive_strength: button.emissive_strength(),
            });
            if button.light_active() {
                lights.push(PointLight {
                    position: button.position(),
                    color: LIGHT_COLOR,
                    intensity: BUTTON_LIGHT_INTENSITY,
                });
            }
        }

        let door = game.door();
        items.push(DrawItem {
            kind: DrawKind::Door,
            transform: Transform::from_position_scale(door.position(), DOOR_SCALE),
            color: door.color(),
            emissive_color: door.emissive_color(),
            emissive_strength: door.emissive_strength(),
        });
        if door.light_active() {
            lights.push(PointLight {
                position: door.position(),
                color: LIGHT_COLOR,
                intensity: DOOR_LIGHT_INTENSITY,
            });
        }

        tracing::trace!(
            frame = session.frame(),
            items = items.len(),
            lights = lights.len(),
            "captured frame"
        );

        Self {
            frame: session.frame(),
            view: camera.view_matrix(),
            projection: camera.projection_matrix(aspect),
            camera_position: camera.position(),
            fov_degrees: camera.fov(),
            items,
            lights,
            status: game.status_text(),
            prompt: game
                .show_interaction_prompt()
                .then(|| game.interaction_text().to_string()),
            pressed: game.pressed_count(),
            total: game.total_buttons(),
            game_won: game.game_won(),
        }
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }

    pub fn items_of(&self, kind: DrawKind) -> impl Iterator<Item = &DrawItem> {
        self.items.iter().filter(move |i| i.kind == kind)
    }
}

fn floor_item(floor: &FloorPlane) -> DrawItem {
    let side = floor.half_extent * 2.0;
    DrawItem {
        kind: DrawKind::Floor,
        transform: Transform::from_position_scale(
            Vec3::new(0.0, floor.y, 0.0),
            Vec3::new(side, 0.01, side),
        ),
        color: floor.color,
        emissive_color: Vec3::ZERO,
        emissive_strength: 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use escape_common::GameConfig;
    use escape_input::InputSnapshot;

    fn interact() -> InputSnapshot {
        InputSnapshot {
            interact_pressed: true,
            ..Default::default()
        }
    }

    #[test]
    fn fresh_session_has_no_lights() {
        let session = Session::new(&GameConfig::default());
        let frame = FrameSnapshot::capture(&session, 4.0 / 3.0);
        assert_eq!(frame.items_of(DrawKind::Wall).count(), 6);
        assert_eq!(frame.items_of(DrawKind::Button).count(), 3);
        assert_eq!(frame.items_of(DrawKind::Door).count(), 1);
        assert_eq!(frame.items_of(DrawKind::Floor).count(), 1);
        assert!(frame.lights.is_empty());
        assert_eq!(frame.prompt, None);
        assert_eq!(frame.status, "Escape Room - Buttons: 0/3");
    }

    #[test]
    fn pressed_button_emits_light() {
        let mut session = Session::new(&GameConfig::default());
        session
            .camera_mut()
            .set_position(Vec3::new(7.5, 1.6, 0.0));
        session.update(1.0 / 60.0, &interact());

        let frame = FrameSnapshot::capture(&session, 1.0);
        assert_eq!(frame.pressed, 1);
        assert_eq!(frame.lights.len(), 1);
        assert_eq!(frame.lights[0].intensity, 1.0);
        let lit: Vec<_> = frame
            .items_of(DrawKind::Button)
            .filter(|b| b.emissive_strength > 0.0)
            .collect();
        assert_eq!(lit.len(), 1);
        assert_eq!(lit[0].transform.position, Vec3::new(8.5, 1.5, 0.0));
    }

    #[test]
    fn open_door_is_brightest_light() {
        let mut session = Session::new(&GameConfig::default());
        for spot in [
            Vec3::new(-7.5, 1.6, 0.0),
            Vec3::new(7.5, 1.6, 0.0),
            Vec3::new(0.0, 1.6, -8.5),
        ] {
            session.camera_mut().set_position(spot);
            session.update(1.0 / 60.0, &interact());
        }
        let frame = FrameSnapshot::capture(&session, 1.0);
        assert_eq!(frame.lights.len(), 4);
        assert_eq!(frame.lights.last().map(|l| l.intensity), Some(6.0));
        let door = frame.items_of(DrawKind::Door).next().unwrap();
        assert_eq!(door.transform.scale, Vec3::new(6.5, 4.2, 0.2));
        assert_eq!(door.emissive_strength, 0.5);
    }

    #[test]
    fn prompt_is_carried() {
        let mut session = Session::new(&GameConfig::default());
        session
            .camera_mut()
            .set_position(Vec3::new(0.0, 1.6, 8.5));
        session.update(1.0 / 60.0, &InputSnapshot::default());
        let frame = FrameSnapshot::capture(&session, 1.0);
        assert_eq!(frame.prompt.as_deref(), Some("Door Locked - Buttons: 0/3"));
    }
}
