//! Raw gesture signals for one frame

use serde::{Deserialize, Serialize};
use crate::types::{GestureId, TiltState, GESTURE_COUNT};

/// Evaluator output: one boolean per gesture plus the shared tilt tri-state
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FrameSignals {
    active: [bool; GESTURE_COUNT],
    pub tilt: TiltState,
    /// Left/right elbow angles in degrees, when measurable (debug)
    pub elbow_angles: [Option<f64>; 2],
    /// Ear-line angle relative to neutral, when measurable (debug)
    pub tilt_angle: Option<f64>,
}

impl FrameSignals {
    /// All gestures inactive, tilt centered
    pub fn inactive() -> Self {
        Self::default()
    }

    pub fn is_active(&self, gesture: GestureId) -> bool {
        self.active[gesture.index()]
    }

    pub fn set(&mut self, gesture: GestureId, active: bool) {
        self.active[gesture.index()] = active;
    }

    /// Active gestures in processing order
    pub fn active_gestures(&self) -> Vec<GestureId> {
        GestureId::ALL
            .iter()
            .copied()
            .filter(|g| self.is_active(*g))
            .collect()
    }
}
