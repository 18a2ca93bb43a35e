//! Gesture identifiers and their static definitions

use serde::{Deserialize, Serialize};

/// Closed set of supported gestures. Names are part of the config interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureId {
    LeftArmBend,
    RightArmBend,
    TiltLeft,
    TiltRight,
    Jump,
    LeftKneeRaise,
    KneeClap,
    ArmRaised,
    ArmLowered,
}

/// Number of gestures
pub const GESTURE_COUNT: usize = 9;

impl GestureId {
    /// All gestures in processing order
    pub const ALL: [GestureId; GESTURE_COUNT] = [
        GestureId::LeftArmBend,
        GestureId::RightArmBend,
        GestureId::TiltLeft,
        GestureId::TiltRight,
        GestureId::Jump,
        GestureId::LeftKneeRaise,
        GestureId::KneeClap,
        GestureId::ArmRaised,
        GestureId::ArmLowered,
    ];

    /// Stable position in `ALL`, used to index per-gesture tables
    pub fn index(self) -> usize {
        self as usize
    }

    /// Config / wire name
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LeftArmBend => "left_arm_bend",
            Self::RightArmBend => "right_arm_bend",
            Self::TiltLeft => "tilt_left",
            Self::TiltRight => "tilt_right",
            Self::Jump => "jump",
            Self::LeftKneeRaise => "left_knee_raise",
            Self::KneeClap => "knee_clap",
            Self::ArmRaised => "arm_raised",
            Self::ArmLowered => "arm_lowered",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|g| g.as_str() == name)
    }

    pub fn definition(self) -> GestureDefinition {
        let kind = match self {
            Self::TiltLeft | Self::TiltRight => SignalKind::TriState,
            _ => SignalKind::Binary,
        };
        let trigger = match self {
            Self::KneeClap => TriggerMode::Pulse,
            _ => TriggerMode::Edge,
        };
        GestureDefinition {
            id: self,
            kind,
            trigger,
            bypass_cooldown: self == Self::Jump,
            tap_key: self == Self::Jump,
        }
    }
}

impl std::fmt::Display for GestureId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shape of the raw signal a gesture is derived from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalKind {
    Binary,
    /// Derived from the shared head-tilt Left/Center/Right signal
    TriState,
}

/// How the edge engine turns the signal into events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerMode {
    /// Begin on rising edge, End on falling edge
    Edge,
    /// Repeating Pulse while active, paced by the cooldown
    Pulse,
}

/// Static descriptor of a gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GestureDefinition {
    pub id: GestureId,
    pub kind: SignalKind,
    pub trigger: TriggerMode,
    pub bypass_cooldown: bool,
    /// Begin taps a keyboard binding instead of holding it
    pub tap_key: bool,
}
