//! Trigger events from the edge engine and action events from the dispatcher

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use crate::types::{ActionSpec, GestureId, ReasonCode};

/// Lifecycle phase of a trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    Begin,
    End,
    Pulse,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Phase::Begin => "BEGIN",
            Phase::End => "END",
            Phase::Pulse => "PULSE",
        };
        write!(f, "{}", name)
    }
}

/// Edge-engine output for one gesture on one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerEvent {
    pub gesture: GestureId,
    pub phase: Phase,
    pub reason: ReasonCode,
}

impl TriggerEvent {
    pub fn new(gesture: GestureId, phase: Phase, reason: ReasonCode) -> Self {
        Self { gesture, phase, reason }
    }
}

/// Request surface of the executor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    Press,
    Release,
    /// Press immediately followed by release
    Pulse,
}

impl std::fmt::Display for RequestKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RequestKind::Press => "press",
            RequestKind::Release => "release",
            RequestKind::Pulse => "pulse",
        };
        write!(f, "{}", name)
    }
}

/// One request as seen by the executor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRequest {
    pub kind: RequestKind,
    pub action: ActionSpec,
}

/// Resolved gesture action, emitted once and not retained
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionEvent {
    pub timestamp: DateTime<Utc>,
    pub gesture: GestureId,
    pub phase: Phase,
    pub action: ActionSpec,
    pub request: RequestKind,
}

impl ActionEvent {
    pub fn new(gesture: GestureId, phase: Phase, action: ActionSpec, request: RequestKind) -> Self {
        Self {
            timestamp: Utc::now(),
            gesture,
            phase,
            action,
            request,
        }
    }
}

/// What the dispatcher did with one trigger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchOutcome {
    pub gesture: GestureId,
    pub phase: Phase,
    /// Present when a request went to the executor (even if it failed)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<ActionEvent>,
    pub reason: ReasonCode,
}

impl DispatchOutcome {
    pub fn dropped(gesture: GestureId, phase: Phase, reason: ReasonCode) -> Self {
        Self { gesture, phase, event: None, reason }
    }

    pub fn sent(event: ActionEvent, reason: ReasonCode) -> Self {
        Self {
            gesture: event.gesture,
            phase: event.phase,
            event: Some(event),
            reason,
        }
    }

    /// Request reached the executor and succeeded
    pub fn is_dispatched(&self) -> bool {
        self.reason.reached_executor()
    }
}
