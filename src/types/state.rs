//! Head-tilt tri-state and per-gesture runtime state

use std::time::{Duration, Instant};
use serde::{Deserialize, Serialize};

/// The three head-tilt positions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TiltState {
    Left,
    /// Neutral, also the fallback when the ears are not visible
    #[default]
    Center,
    Right,
}

impl TiltState {
    /// Terminal color for the overlay label
    pub fn color(&self) -> colored::Color {
        match self {
            TiltState::Left => colored::Color::Cyan,
            TiltState::Center => colored::Color::BrightBlack,
            TiltState::Right => colored::Color::Magenta,
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            TiltState::Left => "◀",
            TiltState::Center => "●",
            TiltState::Right => "▶",
        }
    }
}

impl std::fmt::Display for TiltState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TiltState::Left => "LEFT",
            TiltState::Center => "CENTER",
            TiltState::Right => "RIGHT",
        };
        write!(f, "{}", name)
    }
}

/// Edge-detection memory of one gesture
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GestureRuntimeState {
    /// Signal seen on the previous processed frame
    pub previous_signal: bool,
    /// When the last Begin/Pulse actually fired
    pub last_trigger_time: Option<Instant>,
}

impl GestureRuntimeState {
    /// True when never fired or at least `cooldown` has passed since the last fire
    pub fn cooldown_elapsed(&self, now: Instant, cooldown: Duration) -> bool {
        self.last_trigger_time
            .map_or(true, |last| now.saturating_duration_since(last) >= cooldown)
    }
}
