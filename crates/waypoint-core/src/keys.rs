#![forbid(unsafe_code)]

//! Keyboard navigation mapping.
//!
//! DOM `KeyboardEvent.key` values are normalized to [`NavKey`] and then mapped
//! to a [`KeyCommand`]. `Enter`/`Space` advance the tour unless focus sits on
//! one of the tour's own control buttons; in that case the button's click
//! handler already advances and a second advance must not happen.

/// Keys the tour responds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavKey {
    Right,
    Down,
    Left,
    Up,
    Escape,
    Enter,
    Space,
}

impl NavKey {
    /// Normalize a DOM `key` value. Unrelated keys give `None`.
    pub fn from_dom_key(key: &str) -> Option<Self> {
        match key {
            "ArrowRight" | "Right" => Some(Self::Right),
            "ArrowDown" | "Down" => Some(Self::Down),
            "ArrowLeft" | "Left" => Some(Self::Left),
            "ArrowUp" | "Up" => Some(Self::Up),
            "Escape" | "Esc" => Some(Self::Escape),
            "Enter" => Some(Self::Enter),
            " " | "Spacebar" => Some(Self::Space),
            _ => None,
        }
    }
}

/// Where keyboard focus was when the key was pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusTarget {
    /// One of the tour's rendered control buttons.
    TourControl,
    #[default]
    Elsewhere,
}

/// Tour transition requested by a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    Next,
    Previous,
    Close,
}

/// Map a key press to a tour command.
pub fn command_for_key(key: NavKey, focus: FocusTarget) -> Option<KeyCommand> {
    match key {
        NavKey::Right | NavKey::Down => Some(KeyCommand::Next),
        NavKey::Left | NavKey::Up => Some(KeyCommand::Previous),
        NavKey::Escape => Some(KeyCommand::Close),
        NavKey::Enter | NavKey::Space => match focus {
            FocusTarget::TourControl => None,
            FocusTarget::Elsewhere => Some(KeyCommand::Next),
        },
    }
}
