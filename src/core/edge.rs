//! Edge Engine: turns per-frame signals into Begin/End/Pulse triggers
//!
//! Per gesture:
//! - rising edge → Begin, if the cooldown elapsed or the gesture bypasses it
//! - falling edge → End, always
//! - Pulse gestures → Pulse on every active frame once the cooldown elapsed
//!
//! `previous_signal` is written on every call, fired or not.

use std::time::{Duration, Instant};
use tracing::trace;

use crate::types::{
    FrameSignals, GestureId, GestureRuntimeState, Phase, ReasonCode, TriggerEvent, TriggerMode,
    GESTURE_COUNT,
};

/// Runtime-state table for every gesture
#[derive(Debug, Clone)]
pub struct EdgeEngine {
    cooldown: Duration,
    states: [GestureRuntimeState; GESTURE_COUNT],
}

impl EdgeEngine {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            states: [GestureRuntimeState::default(); GESTURE_COUNT],
        }
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    pub fn state(&self, gesture: GestureId) -> &GestureRuntimeState {
        &self.states[gesture.index()]
    }

    /// Advance one gesture by one frame
    pub fn step(&mut self, gesture: GestureId, active: bool, now: Instant) -> Option<TriggerEvent> {
        let definition = gesture.definition();
        let cooldown = self.cooldown;
        let state = &mut self.states[gesture.index()];
        let was_active = state.previous_signal;
        state.previous_signal = active;

        match definition.trigger {
            TriggerMode::Pulse => {
                if active && state.cooldown_elapsed(now, cooldown) {
                    state.last_trigger_time = Some(now);
                    Some(TriggerEvent::new(gesture, Phase::Pulse, ReasonCode::E004_PULSE_FIRED))
                } else {
                    None
                }
            }
            TriggerMode::Edge => match (was_active, active) {
                (false, true) if definition.bypass_cooldown => {
                    state.last_trigger_time = Some(now);
                    Some(TriggerEvent::new(gesture, Phase::Begin, ReasonCode::E005_BEGIN_BYPASS))
                }
                (false, true) if state.cooldown_elapsed(now, cooldown) => {
                    state.last_trigger_time = Some(now);
                    Some(TriggerEvent::new(gesture, Phase::Begin, ReasonCode::E001_BEGIN_FIRED))
                }
                (false, true) => {
                    trace!(
                        gesture = %gesture,
                        reason = ReasonCode::E002_BEGIN_SUPPRESSED_COOLDOWN.code(),
                        "rising edge suppressed"
                    );
                    None
                }
                (true, false) => Some(TriggerEvent::new(gesture, Phase::End, ReasonCode::E003_END)),
                _ => None,
            },
        }
    }

    /// Advance every gesture by one frame, in gesture order
    pub fn update(&mut self, signals: &FrameSignals, now: Instant) -> Vec<TriggerEvent> {
        GestureId::ALL
            .iter()
            .filter_map(|g| self.step(*g, signals.is_active(*g), now))
            .collect()
    }

    /// Forget all edges and timestamps
    pub fn reset(&mut self) {
        *self = Self::new(self.cooldown);
    }
}

impl Default for EdgeEngine {
    fn default() -> Self {
        Self::new(Duration::from_millis(crate::COOLDOWN_MS))
    }
}

// =============================================================================
// TESTS
// =============================================================================
