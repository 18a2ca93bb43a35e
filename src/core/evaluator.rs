//! Gesture evaluators: pure geometry from a landmark snapshot to raw signals
//!
//! Missing or low-confidence keypoints never fail an evaluation; the affected
//! gesture reports inactive (tilt reports Center).

use crate::core::config::EngineSettings;
use crate::types::{
    BodyLandmark, FrameSignals, GestureId, Landmark, LandmarkSnapshot, Side, TiltState,
};

/// Angle at vertex `b` between `b→a` and `b→c`, in degrees within [0, 180]
pub fn joint_angle(a: (f64, f64), b: (f64, f64), c: (f64, f64)) -> f64 {
    let radians = (c.1 - b.1).atan2(c.0 - b.0) - (a.1 - b.1).atan2(a.0 - b.0);
    let angle = radians.to_degrees().abs();
    if angle > 180.0 {
        360.0 - angle
    } else {
        angle
    }
}

/// Bucket a neutral-relative tilt angle; the threshold itself is still Center
pub fn classify_tilt(angle_deg: f64, threshold_deg: f64) -> TiltState {
    if angle_deg.abs() > threshold_deg {
        if angle_deg > 0.0 {
            TiltState::Left
        } else {
            TiltState::Right
        }
    } else {
        TiltState::Center
    }
}

/// Wrap an angle difference into (-180, 180]
fn wrap_degrees(angle: f64) -> f64 {
    let wrapped = (angle + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped == -180.0 {
        180.0
    } else {
        wrapped
    }
}

fn xy(p: Landmark) -> (f64, f64) {
    (p.x, p.y)
}

/// Evaluates every gesture rule against one snapshot
#[derive(Debug, Clone, Default)]
pub struct GestureEvaluator {
    settings: EngineSettings,
}

impl GestureEvaluator {
    pub fn new(settings: EngineSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    fn point(&self, snapshot: &LandmarkSnapshot, landmark: BodyLandmark) -> Option<Landmark> {
        snapshot.get_with(landmark, self.settings.min_visibility)
    }

    /// Elbow angle of one arm
    pub fn elbow_angle(&self, snapshot: &LandmarkSnapshot, side: Side) -> Option<f64> {
        let shoulder = self.point(snapshot, side.shoulder())?;
        let elbow = self.point(snapshot, side.elbow())?;
        let wrist = self.point(snapshot, side.wrist())?;
        Some(joint_angle(xy(shoulder), xy(elbow), xy(wrist)))
    }

    /// Bent below the threshold with the wrist lower on screen than the shoulder
    pub fn arm_bent(&self, snapshot: &LandmarkSnapshot, side: Side) -> bool {
        let (Some(angle), Some(shoulder), Some(wrist)) = (
            self.elbow_angle(snapshot, side),
            self.point(snapshot, side.shoulder()),
            self.point(snapshot, side.wrist()),
        ) else {
            return false;
        };
        angle < self.settings.arm_bend_max_deg && wrist.y > shoulder.y
    }

    /// Ear-line angle relative to the neutral baseline
    pub fn head_tilt_angle(&self, snapshot: &LandmarkSnapshot) -> Option<f64> {
        let left_ear = self.point(snapshot, BodyLandmark::LeftEar)?;
        let right_ear = self.point(snapshot, BodyLandmark::RightEar)?;
        let dy = left_ear.y - right_ear.y;
        let dx = left_ear.x - right_ear.x;
        let raw = dy.atan2(dx).to_degrees();
        Some(wrap_degrees(raw - self.settings.tilt_neutral_deg))
    }

    pub fn head_tilt(&self, snapshot: &LandmarkSnapshot) -> TiltState {
        self.head_tilt_angle(snapshot)
            .map(|angle| classify_tilt(angle, self.settings.head_tilt_threshold_deg))
            .unwrap_or_default()
    }

    /// Knee higher on screen than the hip of the same side
    pub fn knee_above_hip(&self, snapshot: &LandmarkSnapshot, side: Side) -> bool {
        match (self.point(snapshot, side.knee()), self.point(snapshot, side.hip())) {
            (Some(knee), Some(hip)) => knee.y < hip.y,
            _ => false,
        }
    }

    pub fn knee_clap(&self, snapshot: &LandmarkSnapshot) -> bool {
        match (
            self.point(snapshot, BodyLandmark::LeftKnee),
            self.point(snapshot, BodyLandmark::RightKnee),
        ) {
            (Some(left), Some(right)) => (left.x - right.x).abs() < self.settings.knee_clap_max_distance,
            _ => false,
        }
    }

    /// Wrist above shoulder for one side; None when either point is unusable
    pub fn wrist_above_shoulder(&self, snapshot: &LandmarkSnapshot, side: Side) -> Option<bool> {
        let shoulder = self.point(snapshot, side.shoulder())?;
        let wrist = self.point(snapshot, side.wrist())?;
        Some(wrist.y < shoulder.y)
    }

    /// Either wrist above its shoulder
    pub fn arm_raised(&self, snapshot: &LandmarkSnapshot) -> bool {
        [Side::Left, Side::Right]
            .iter()
            .any(|side| self.wrist_above_shoulder(snapshot, *side) == Some(true))
    }

    /// Either wrist not above its shoulder. Not the negation of `arm_raised`.
    pub fn arm_lowered(&self, snapshot: &LandmarkSnapshot) -> bool {
        [Side::Left, Side::Right]
            .iter()
            .any(|side| self.wrist_above_shoulder(snapshot, *side) == Some(false))
    }

    /// All signals for a frame; `None` (no body detected) is all-inactive
    pub fn evaluate(&self, snapshot: Option<&LandmarkSnapshot>) -> FrameSignals {
        let Some(snapshot) = snapshot else {
            return FrameSignals::inactive();
        };

        let mut signals = FrameSignals::inactive();
        signals.tilt_angle = self.head_tilt_angle(snapshot);
        signals.tilt = signals
            .tilt_angle
            .map(|angle| classify_tilt(angle, self.settings.head_tilt_threshold_deg))
            .unwrap_or_default();
        signals.elbow_angles = [
            self.elbow_angle(snapshot, Side::Left),
            self.elbow_angle(snapshot, Side::Right),
        ];

        signals.set(GestureId::LeftArmBend, self.arm_bent(snapshot, Side::Left));
        signals.set(GestureId::RightArmBend, self.arm_bent(snapshot, Side::Right));
        signals.set(GestureId::TiltLeft, signals.tilt == TiltState::Left);
        signals.set(GestureId::TiltRight, signals.tilt == TiltState::Right);
        signals.set(GestureId::Jump, self.knee_above_hip(snapshot, Side::Right));
        signals.set(GestureId::LeftKneeRaise, self.knee_above_hip(snapshot, Side::Left));
        signals.set(GestureId::KneeClap, self.knee_clap(snapshot));
        signals.set(GestureId::ArmRaised, self.arm_raised(snapshot));
        signals.set(GestureId::ArmLowered, self.arm_lowered(snapshot));
        signals
    }
}
