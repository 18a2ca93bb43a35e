//! Action specs: what a gesture does to the keyboard or mouse
//!
//! Config vocabulary:
//! - raw key names: `space`, `shift`, `left`, `z`, ...
//! - `{left|right|middle}_click` for mouse buttons
//! - `mouse_{up|down|left|right}` for relative cursor nudges

use std::str::FromStr;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use crate::error::ParseActionError;

lazy_static! {
    static ref RE_MOUSE_CLICK: Regex = Regex::new(r"^(left|right|middle)_click$").unwrap();
    static ref RE_MOUSE_NUDGE: Regex = Regex::new(r"^mouse_(up|down|left|right)$").unwrap();
}

/// Named keys the executor understands besides single characters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NamedKey {
    Left,
    Right,
    Up,
    Down,
    Space,
    Shift,
    Enter,
    Tab,
    Escape,
    Backspace,
    Ctrl,
    Alt,
}

impl NamedKey {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Up => "up",
            Self::Down => "down",
            Self::Space => "space",
            Self::Shift => "shift",
            Self::Enter => "enter",
            Self::Tab => "tab",
            Self::Escape => "esc",
            Self::Backspace => "backspace",
            Self::Ctrl => "ctrl",
            Self::Alt => "alt",
        }
    }

    fn parse(name: &str) -> Option<Self> {
        let key = match name {
            "left" => Self::Left,
            "right" => Self::Right,
            "up" => Self::Up,
            "down" => Self::Down,
            "space" => Self::Space,
            "shift" => Self::Shift,
            "enter" | "return" => Self::Enter,
            "tab" => Self::Tab,
            "esc" | "escape" => Self::Escape,
            "backspace" => Self::Backspace,
            "ctrl" | "control" => Self::Ctrl,
            "alt" => Self::Alt,
            _ => return None,
        };
        Some(key)
    }
}

/// A keyboard key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Named(NamedKey),
    Char(char),
}

impl std::fmt::Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Key::Named(k) => f.write_str(k.as_str()),
            Key::Char(c) => write!(f, "{}", c),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl MouseButton {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Middle => "middle",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NudgeDirection {
    Up,
    Down,
    Left,
    Right,
}

impl NudgeDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    /// Screen-space unit step (y grows downward)
    pub fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }
}

/// Resolved action bound to a gesture. Parsed once at config load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ActionSpec {
    Keyboard(Key),
    MouseClick(MouseButton),
    MouseNudge(NudgeDirection),
}

impl ActionSpec {
    /// Press/release pair semantics (nudges are one-shot)
    pub fn is_holdable(&self) -> bool {
        !matches!(self, ActionSpec::MouseNudge(_))
    }
}

impl FromStr for ActionSpec {
    type Err = ParseActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let lower = trimmed.to_lowercase();

        if let Some(caps) = RE_MOUSE_CLICK.captures(&lower) {
            let button = match &caps[1] {
                "left" => MouseButton::Left,
                "right" => MouseButton::Right,
                _ => MouseButton::Middle,
            };
            return Ok(ActionSpec::MouseClick(button));
        }

        if let Some(caps) = RE_MOUSE_NUDGE.captures(&lower) {
            let direction = match &caps[1] {
                "up" => NudgeDirection::Up,
                "down" => NudgeDirection::Down,
                "left" => NudgeDirection::Left,
                _ => NudgeDirection::Right,
            };
            return Ok(ActionSpec::MouseNudge(direction));
        }

        if let Some(named) = NamedKey::parse(&lower) {
            return Ok(ActionSpec::Keyboard(Key::Named(named)));
        }

        // Single characters keep their case
        let mut chars = trimmed.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if !c.is_whitespace() && !c.is_control() => {
                Ok(ActionSpec::Keyboard(Key::Char(c)))
            }
            _ => Err(ParseActionError(s.to_string())),
        }
    }
}

impl TryFrom<String> for ActionSpec {
    type Error = ParseActionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ActionSpec> for String {
    fn from(action: ActionSpec) -> Self {
        action.to_string()
    }
}

impl std::fmt::Display for ActionSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionSpec::Keyboard(key) => write!(f, "{}", key),
            ActionSpec::MouseClick(button) => write!(f, "{}_click", button.as_str()),
            ActionSpec::MouseNudge(dir) => write!(f, "mouse_{}", dir.as_str()),
        }
    }
}

/// Per-gesture binding: toggle plus action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionBinding {
    pub enabled: bool,
    pub action: ActionSpec,
}

impl ActionBinding {
    pub fn new(action: ActionSpec, enabled: bool) -> Self {
        Self { enabled, action }
    }
}
