//! Reason codes for edge and dispatch decisions
//!
//! E-codes come from the edge engine, D-codes from the dispatcher.

use serde::{Deserialize, Serialize};

/// Why an event fired, was suppressed, or was dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(non_camel_case_types)]
pub enum ReasonCode {
    // =========================================================================
    // E00x: Edge engine
    // =========================================================================
    /// Rising edge with cooldown elapsed
    E001_BEGIN_FIRED,
    /// Rising edge inside the cooldown window
    E002_BEGIN_SUPPRESSED_COOLDOWN,
    /// Falling edge
    E003_END,
    /// Pulse gesture active with cooldown elapsed
    E004_PULSE_FIRED,
    /// Rising edge on a cooldown-bypass gesture
    E005_BEGIN_BYPASS,

    // =========================================================================
    // D00x: Dispatcher
    // =========================================================================
    /// Request handed to the executor
    D001_DISPATCHED,
    /// Gesture toggle is off
    D002_DISABLED,
    /// End on a nudge binding has nothing to release
    D003_NUDGE_NO_RELEASE,
    /// Executor rejected the request
    D004_EXECUTOR_FAILED,
    /// End without a matching held press
    D005_NOT_HELD,
    /// Held action released on toggle-off or shutdown
    D006_FORCED_RELEASE,
    /// End on a key that was tapped at Begin
    D007_TAPPED_NO_RELEASE,
}

impl ReasonCode {
    /// Get the code string (for logging)
    pub fn code(&self) -> &'static str {
        match self {
            Self::E001_BEGIN_FIRED => "E001_BEGIN_FIRED",
            Self::E002_BEGIN_SUPPRESSED_COOLDOWN => "E002_BEGIN_SUPPRESSED_COOLDOWN",
            Self::E003_END => "E003_END",
            Self::E004_PULSE_FIRED => "E004_PULSE_FIRED",
            Self::E005_BEGIN_BYPASS => "E005_BEGIN_BYPASS",
            Self::D001_DISPATCHED => "D001_DISPATCHED",
            Self::D002_DISABLED => "D002_DISABLED",
            Self::D003_NUDGE_NO_RELEASE => "D003_NUDGE_NO_RELEASE",
            Self::D004_EXECUTOR_FAILED => "D004_EXECUTOR_FAILED",
            Self::D005_NOT_HELD => "D005_NOT_HELD",
            Self::D006_FORCED_RELEASE => "D006_FORCED_RELEASE",
            Self::D007_TAPPED_NO_RELEASE => "D007_TAPPED_NO_RELEASE",
        }
    }

    /// Get human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::E001_BEGIN_FIRED => "Gesture started",
            Self::E002_BEGIN_SUPPRESSED_COOLDOWN => "Start suppressed by cooldown",
            Self::E003_END => "Gesture ended",
            Self::E004_PULSE_FIRED => "Gesture pulsed",
            Self::E005_BEGIN_BYPASS => "Gesture started (no cooldown)",
            Self::D001_DISPATCHED => "Action dispatched",
            Self::D002_DISABLED => "Gesture disabled",
            Self::D003_NUDGE_NO_RELEASE => "Nudge has no release",
            Self::D004_EXECUTOR_FAILED => "Executor failed, action dropped",
            Self::D005_NOT_HELD => "Nothing held to release",
            Self::D006_FORCED_RELEASE => "Held action force-released",
            Self::D007_TAPPED_NO_RELEASE => "Key was tapped, nothing to release",
        }
    }

    /// True for codes where the executor actually received a request
    pub fn reached_executor(&self) -> bool {
        matches!(self, Self::D001_DISPATCHED | Self::D006_FORCED_RELEASE)
    }
}

impl std::fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code(), self.description())
    }
}
