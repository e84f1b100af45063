use glam::Vec2;
use std::collections::BTreeSet;

use crate::action::{Action, Key};

/// Everything the game needs from the input devices for one frame.
///
/// Built once per frame by [`InputState::snapshot`]; movement, look and
/// interaction all read the same snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InputSnapshot {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    /// Interact went from up to down this frame.
    pub interact_pressed: bool,
    /// Jump went from up to down this frame.
    pub jump_pressed: bool,
    pub quit: bool,
    /// Absolute cursor position in pixels.
    pub cursor: Vec2,
    /// Scroll accumulated since the previous frame, in lines.
    pub scroll: f32,
    /// The window regained input focus since the previous frame.
    pub focus_regained: bool,
}

/// One frame of held actions, kept so the next frame can detect edges.
#[derive(Debug, Clone, Default)]
pub struct KeyLatch {
    previous: BTreeSet<Action>,
}

impl KeyLatch {
    /// True if `action` is held now and was not held when last latched.
    pub fn pressed(&self, action: Action, held: &BTreeSet<Action>) -> bool {
        held.contains(&action) && !self.previous.contains(&action)
    }

    pub fn latch(&mut self, held: &BTreeSet<Action>) {
        self.previous.clone_from(held);
    }
}

/// Accumulates raw device events between frames.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    keys_down: BTreeSet<Key>,
    latch: KeyLatch,
    cursor: Vec2,
    scroll: f32,
    focus_regained: bool,
    focused: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            focused: true,
            ..Self::default()
        }
    }

    pub fn key_event(&mut self, key: Key, pressed: bool) {
        if pressed {
            self.keys_down.insert(key);
        } else {
            self.keys_down.remove(&key);
        }
    }

    /// Absolute cursor position, for backends that report one.
    pub fn cursor_moved(&mut self, x: f32, y: f32) {
        self.cursor = Vec2::new(x, y);
    }

    /// Relative motion, for grabbed cursors. Accumulates into a virtual
    /// cursor so consumers still see an absolute position.
    pub fn mouse_motion(&mut self, dx: f32, dy: f32) {
        self.cursor += Vec2::new(dx, dy);
    }

    pub fn scrolled(&mut self, lines: f32) {
        self.scroll += lines;
    }

    pub fn focus_changed(&mut self, focused: bool) {
        if focused && !self.focused {
            self.focus_regained = true;
            tracing::debug!("input focus regained");
        }
        if !focused {
            // Keys released while unfocused never reach us.
            self.keys_down.clear();
        }
        self.focused = focused;
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    fn held_actions(&self) -> BTreeSet<Action> {
        self.keys_down
            .iter()
            .filter_map(|&k| Action::from_key(k))
            .collect()
    }

    /// The current frame's view of input. Does not consume anything; call
    /// [`InputState::end_frame`] once the frame has been simulated.
    pub fn snapshot(&self) -> InputSnapshot {
        let held = self.held_actions();
        InputSnapshot {
            forward: held.contains(&Action::MoveForward),
            backward: held.contains(&Action::MoveBackward),
            left: held.contains(&Action::MoveLeft),
            right: held.contains(&Action::MoveRight),
            interact_pressed: self.latch.pressed(Action::Interact, &held),
            jump_pressed: self.latch.pressed(Action::Jump, &held),
            quit: held.contains(&Action::Quit),
            cursor: self.cursor,
            scroll: self.scroll,
            focus_regained: self.focus_regained,
        }
    }

    /// Latch held actions for next frame's edge detection and clear the
    /// per-frame accumulators.
    pub fn end_frame(&mut self) {
        let held = self.held_actions();
        self.latch.latch(&held);
        self.scroll = 0.0;
        self.focus_regained = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interact_fires_once_per_press() {
        let mut input = InputState::new();
        input.key_event(Key::E, true);
        assert!(input.snapshot().interact_pressed);
        input.end_frame();

        for _ in 0..10 {
            assert!(!input.snapshot().interact_pressed);
            input.end_frame();
        }

        input.key_event(Key::E, false);
        input.end_frame();
        input.key_event(Key::E, true);
        assert!(input.snapshot().interact_pressed);
    }

    #[test]
    fn snapshot_is_stable_within_a_frame() {
        let mut input = InputState::new();
        input.key_event(Key::Space, true);
        let a = input.snapshot();
        let b = input.snapshot();
        assert_eq!(a, b);
        assert!(a.jump_pressed);
    }

    #[test]
    fn held_movement_keys() {
        let mut input = InputState::new();
        input.key_event(Key::W, true);
        input.key_event(Key::D, true);
        let snap = input.snapshot();
        assert!(snap.forward && snap.right);
        assert!(!snap.backward && !snap.left);
    }

    #[test]
    fn alternate_binding_keeps_action_held() {
        let mut input = InputState::new();
        input.key_event(Key::W, true);
        input.key_event(Key::ArrowUp, true);
        input.key_event(Key::W, false);
        assert!(input.snapshot().forward);
    }

    #[test]
    fn mouse_motion_accumulates_virtual_cursor() {
        let mut input = InputState::new();
        input.mouse_motion(3.0, -2.0);
        input.mouse_motion(1.0, 1.0);
        assert_eq!(input.snapshot().cursor, Vec2::new(4.0, -1.0));
        input.cursor_moved(100.0, 50.0);
        assert_eq!(input.snapshot().cursor, Vec2::new(100.0, 50.0));
    }

    #[test]
    fn scroll_clears_each_frame() {
        let mut input = InputState::new();
        input.scrolled(1.0);
        input.scrolled(0.5);
        assert_eq!(input.snapshot().scroll, 1.5);
        input.end_frame();
        assert_eq!(input.snapshot().scroll, 0.0);
    }

    #[test]
    fn focus_regained_is_reported_for_one_frame() {
        let mut input = InputState::new();
        input.key_event(Key::W, true);
        input.focus_changed(false);
        assert!(!input.snapshot().forward);
        input.focus_changed(true);
        assert!(input.snapshot().focus_regained);
        input.end_frame();
        assert!(!input.snapshot().focus_regained);
    }

    #[test]
    fn focus_event_while_focused_is_ignored() {
        let mut input = InputState::new();
        input.focus_changed(true);
        assert!(!input.snapshot().focus_regained);
    }
}
