//! Input normalization
//!
//! Keyboard and pointer/touch events from the host collapse into three logical
//! commands. Whether a command does anything is decided by the simulation
//! (only while `Playing`).

use serde::{Deserialize, Serialize};

/// Logical player command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Command {
    MoveLeft,
    MoveRight,
    ActivateBoost,
}

/// On-screen touch controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TouchButton {
    Left,
    Right,
    Boost,
}

/// A raw input event as delivered by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RawInput {
    /// Key-down with a DOM-style `key` value ("ArrowLeft", "a", " ", ...)
    KeyDown(String),
    /// Press on one of the on-screen buttons
    Button(TouchButton),
    /// Tap on the track surface at `x` within a surface `width` wide
    Tap { x: f32, width: f32 },
}

impl Command {
    /// Map a DOM-style key name to a command
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" | "Left" => Some(Command::MoveLeft),
            "ArrowRight" | "Right" => Some(Command::MoveRight),
            " " | "Spacebar" | "ArrowUp" | "Up" => Some(Command::ActivateBoost),
            _ => match key.to_lowercase().as_str() {
                "a" => Some(Command::MoveLeft),
                "d" => Some(Command::MoveRight),
                "w" | "space" => Some(Command::ActivateBoost),
                _ => None,
            },
        }
    }

    pub fn from_button(button: TouchButton) -> Self {
        match button {
            TouchButton::Left => Command::MoveLeft,
            TouchButton::Right => Command::MoveRight,
            TouchButton::Boost => Command::ActivateBoost,
        }
    }

    /// Taps on the left third steer left, right third steer right, middle boosts
    pub fn from_tap(x: f32, width: f32) -> Option<Self> {
        if width <= 0.0 || !(0.0..=width).contains(&x) {
            return None;
        }
        let third = width / 3.0;
        Some(if x < third {
            Command::MoveLeft
        } else if x >= width - third {
            Command::MoveRight
        } else {
            Command::ActivateBoost
        })
    }
}

impl RawInput {
    pub fn to_command(&self) -> Option<Command> {
        match self {
            RawInput::KeyDown(key) => Command::from_key(key),
            RawInput::Button(button) => Some(Command::from_button(*button)),
            RawInput::Tap { x, width } => Command::from_tap(*x, *width),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyboard_mapping() {
        assert_eq!(Command::from_key("ArrowLeft"), Some(Command::MoveLeft));
        assert_eq!(Command::from_key("D"), Some(Command::MoveRight));
        assert_eq!(Command::from_key(" "), Some(Command::ActivateBoost));
        assert_eq!(Command::from_key("Escape"), None);
    }

    #[test]
    fn test_tap_zones() {
        assert_eq!(Command::from_tap(10.0, 300.0), Some(Command::MoveLeft));
        assert_eq!(Command::from_tap(150.0, 300.0), Some(Command::ActivateBoost));
        assert_eq!(Command::from_tap(290.0, 300.0), Some(Command::MoveRight));
        assert_eq!(Command::from_tap(-1.0, 300.0), None);
        assert_eq!(Command::from_tap(10.0, 0.0), None);
        assert_eq!(Command::from_tap(0.0, 0.0), None);
        assert_eq!(Command::from_tap(0.0, -5.0), None);
        assert_eq!(Command::from_tap(1.0, f32::NAN), None);
        assert_eq!(Command::from_tap(f32::NAN, 300.0), None);
    }

    #[test]
    fn test_raw_input_sources_agree() {
        let sources = [
            RawInput::KeyDown("a".into()),
            RawInput::Button(TouchButton::Left),
            RawInput::Tap { x: 5.0, width: 90.0 },
        ];
        for source in &sources {
            assert_eq!(source.to_command(), Some(Command::MoveLeft));
        }
    }
}
