use escape_input::{InputState, Key};
use escape_kernel::Session;
use glam::Vec3;

/// Largest turn applied in one frame, in degrees.
const MAX_TURN_PER_FRAME: f32 = 12.0;
/// Heading error below which the pilot walks instead of turning.
const HEADING_TOLERANCE: f32 = 2.0;
/// Fraction of the interaction radius the pilot closes to before pressing E.
const REACH_MARGIN: f32 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Goal {
    Button(usize),
    Door,
}

/// Scripted player that walks to every button in layout order, then to the
/// door. It only talks to the session through [`InputState`], the same way
/// a window backend does.
#[derive(Debug)]
pub struct Autopilot {
    goal: Option<Goal>,
    interact_held: bool,
}

impl Autopilot {
    pub fn new() -> Self {
        Self {
            goal: Some(Goal::Button(0)),
            interact_held: false,
        }
    }

    pub fn goal(&self) -> Option<Goal> {
        self.goal
    }

    /// Feed this frame's keys and mouse motion into `input`.
    pub fn drive(&mut self, session: &Session, input: &mut InputState) {
        // Release E every other frame so each press is a fresh edge.
        if self.interact_held {
            input.key_event(Key::E, false);
            self.interact_held = false;
            return;
        }

        let game = session.game();
        self.goal = next_goal(session, self.goal);
        let target = match self.goal {
            Some(Goal::Button(i)) => game.buttons()[i].position(),
            Some(Goal::Door) => game.door().position(),
            None => {
                input.key_event(Key::W, false);
                return;
            }
        };

        let camera = session.camera();
        let position = camera.position();
        if position.distance(target) < game.interaction_radius() * REACH_MARGIN {
            input.key_event(Key::W, false);
            input.key_event(Key::E, true);
            self.interact_held = true;
            return;
        }

        let turn = heading_error(camera.yaw(), position, target);
        if turn.abs() > HEADING_TOLERANCE {
            input.key_event(Key::W, false);
            let step = turn.clamp(-MAX_TURN_PER_FRAME, MAX_TURN_PER_FRAME);
            input.mouse_motion(step / camera.tuning().mouse_sensitivity, 0.0);
        } else {
            input.key_event(Key::W, true);
        }
    }
}

impl Default for Autopilot {
    fn default() -> Self {
        Self::new()
    }
}

fn next_goal(session: &Session, current: Option<Goal>) -> Option<Goal> {
    let game = session.game();
    if game.game_won() {
        return None;
    }
    match current {
        Some(Goal::Button(i)) if i >= game.total_buttons() => Some(Goal::Door),
        Some(Goal::Button(i)) if game.buttons()[i].is_pressed() => {
            if i + 1 < game.total_buttons() {
                Some(Goal::Button(i + 1))
            } else {
                Some(Goal::Door)
            }
        }
        other => other,
    }
}

/// Signed yaw change in degrees that faces `from` towards `to` on the
/// ground plane.
pub fn heading_error(yaw: f32, from: Vec3, to: Vec3) -> f32 {
    let d = to - from;
    if d.x == 0.0 && d.z == 0.0 {
        return 0.0;
    }
    let desired = d.z.atan2(d.x).to_degrees();
    wrap_degrees(desired - yaw)
}

/// Map an angle into (-180, 180].
pub fn wrap_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    if wrapped > 180.0 { wrapped - 360.0 } else { wrapped }
}

#[cfg(test)]
mod tests {
    use super::*;
    use escape_common::GameConfig;
    use escape_kernel::GameEvent;

    #[test]
    fn wraps_into_half_turns() {
        assert_eq!(wrap_degrees(0.0), 0.0);
        assert_eq!(wrap_degrees(270.0), -90.0);
        assert_eq!(wrap_degrees(-270.0), 90.0);
        assert_eq!(wrap_degrees(540.0), 180.0);
    }

    #[test]
    fn heading_towards_negative_z_matches_default_yaw() {
        let err = heading_error(-90.0, Vec3::ZERO, Vec3::new(0.0, 5.0, -3.0));
        assert!(err.abs() < 1e-3);
    }

    #[test]
    fn heading_turns_the_short_way() {
        // Facing -Z, target on +X: a right turn of 90 degrees.
        let err = heading_error(-90.0, Vec3::ZERO, Vec3::X);
        assert!((err - 90.0).abs() < 1e-3);
    }

    #[test]
    fn escapes_the_standard_room() {
        let mut session = Session::new(&GameConfig::default());
        let mut input = InputState::new();
        let mut pilot = Autopilot::new();
        let mut events = Vec::new();

        for _ in 0..5000 {
            pilot.drive(&session, &mut input);
            let snapshot = input.snapshot();
            events.extend(session.update(1.0 / 60.0, &snapshot));
            input.end_frame();
            if session.game().game_won() {
                break;
            }
        }

        assert!(session.game().game_won());
        assert_eq!(pilot.goal(), Some(Goal::Door));
        assert_eq!(
            events,
            vec![
                GameEvent::ButtonPressed { index: 0 },
                GameEvent::ButtonPressed { index: 1 },
                GameEvent::ButtonPressed { index: 2 },
                GameEvent::DoorOpened,
                GameEvent::Escaped,
            ]
        );
    }
}
