//! Output structures for terminal display and the status API

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use colored::Colorize;
use crate::types::{ActionSpec, DispatchOutcome, GestureId, TiltState};

/// Result of processing one frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameOutput {
    pub timestamp: DateTime<Utc>,
    /// 1-based frame counter
    pub frame: u64,
    /// Whether the frame carried a body
    pub body_present: bool,
    pub tilt: TiltState,
    pub active: Vec<GestureId>,
    pub outcomes: Vec<DispatchOutcome>,
}

impl FrameOutput {
    /// Outcomes that reached the executor successfully
    pub fn dispatched(&self) -> impl Iterator<Item = &DispatchOutcome> {
        self.outcomes.iter().filter(|o| o.is_dispatched())
    }

    fn outcome_line(outcome: &DispatchOutcome) -> String {
        match &outcome.event {
            Some(event) => format!(
                "{} {} → {} {}",
                outcome.gesture, outcome.phase, event.request, event.action
            ),
            None => format!("{} {} ({})", outcome.gesture, outcome.phase, outcome.reason.code()),
        }
    }

    /// Format for terminal display (with colors)
    pub fn to_terminal_string(&self) -> String {
        let tilt = format!("{} {}", self.tilt.arrow(), self.tilt).color(self.tilt.color());
        let mut lines = vec![format!(
            "#{:<6} tilt={} active=[{}]",
            self.frame,
            tilt,
            join_names(&self.active)
        )];
        for outcome in &self.outcomes {
            let line = Self::outcome_line(outcome);
            let line = if outcome.is_dispatched() {
                line.green().to_string()
            } else {
                line.bright_black().to_string()
            };
            lines.push(format!("  └─ {}", line));
        }
        lines.join("\n")
    }

    /// Format for parseable output (no colors)
    pub fn to_parseable_string(&self) -> String {
        let outcomes: Vec<String> = self.outcomes.iter().map(Self::outcome_line).collect();
        format!(
            "frame={} | body={} | tilt={} | active={} | events={}",
            self.frame,
            self.body_present,
            self.tilt,
            join_names(&self.active),
            outcomes.join("; ")
        )
    }
}

fn join_names(gestures: &[GestureId]) -> String {
    gestures.iter().map(|g| g.as_str()).collect::<Vec<_>>().join(",")
}

/// Held action as reported to the overlay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeldAction {
    pub gesture: GestureId,
    pub action: ActionSpec,
}

/// Read-only view of the controller, published after each frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ControllerStatus {
    pub frames: u64,
    pub tilt: TiltState,
    pub active: Vec<GestureId>,
    pub held: Vec<HeldAction>,
    /// Virtual cursor offset accumulated by nudges
    pub cursor: (i32, i32),
}
