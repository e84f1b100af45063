/// Physical keys the game listens to, independent of the windowing backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    W,
    A,
    S,
    D,
    E,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Space,
    Escape,
    /// Anything the game has no binding for.
    Other,
}

/// A high-level action produced by the key bindings.
///
/// The game consumes actions, never raw keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Action {
    MoveForward,
    MoveBackward,
    MoveLeft,
    MoveRight,
    Jump,
    Interact,
    Quit,
}

impl Action {
    /// Default bindings: WASD or arrows to walk, Space to jump, E to interact.
    pub fn from_key(key: Key) -> Option<Self> {
        match key {
            Key::W | Key::ArrowUp => Some(Self::MoveForward),
            Key::S | Key::ArrowDown => Some(Self::MoveBackward),
            Key::A | Key::ArrowLeft => Some(Self::MoveLeft),
            Key::D | Key::ArrowRight => Some(Self::MoveRight),
            Key::Space => Some(Self::Jump),
            Key::E => Some(Self::Interact),
            Key::Escape => Some(Self::Quit),
            Key::Other => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wasd_and_arrows_share_actions() {
        assert_eq!(Action::from_key(Key::W), Action::from_key(Key::ArrowUp));
        assert_eq!(Action::from_key(Key::A), Some(Action::MoveLeft));
        assert_eq!(Action::from_key(Key::ArrowRight), Some(Action::MoveRight));
    }

    #[test]
    fn interact_and_jump() {
        assert_eq!(Action::from_key(Key::E), Some(Action::Interact));
        assert_eq!(Action::from_key(Key::Space), Some(Action::Jump));
    }

    #[test]
    fn unbound_key() {
        assert_eq!(Action::from_key(Key::Other), None);
    }
}
