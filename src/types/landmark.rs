//! Landmark snapshot: one frame of body keypoints from pose estimation

use serde::{Deserialize, Serialize};
use crate::MIN_VISIBILITY;

/// Number of keypoints in a full MediaPipe Pose frame
pub const LANDMARK_COUNT: usize = 33;

/// A single keypoint in normalized image coordinates (origin top-left, y down)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    /// Detector confidence, when the detector reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<f32>,
}

impl Landmark {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, visibility: None }
    }

    pub fn with_visibility(mut self, visibility: f32) -> Self {
        self.visibility = Some(visibility);
        self
    }

    /// Finite coordinates and visibility at or above `min_visibility`
    pub fn is_usable(&self, min_visibility: f32) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.visibility.map_or(true, |v| v >= min_visibility)
    }
}

/// MediaPipe Pose landmark indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum BodyLandmark {
    Nose = 0,
    LeftEyeInner = 1,
    LeftEye = 2,
    LeftEyeOuter = 3,
    RightEyeInner = 4,
    RightEye = 5,
    RightEyeOuter = 6,
    LeftEar = 7,
    RightEar = 8,
    MouthLeft = 9,
    MouthRight = 10,
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftElbow = 13,
    RightElbow = 14,
    LeftWrist = 15,
    RightWrist = 16,
    LeftPinky = 17,
    RightPinky = 18,
    LeftIndex = 19,
    RightIndex = 20,
    LeftThumb = 21,
    RightThumb = 22,
    LeftHip = 23,
    RightHip = 24,
    LeftKnee = 25,
    RightKnee = 26,
    LeftAnkle = 27,
    RightAnkle = 28,
    LeftHeel = 29,
    RightHeel = 30,
    LeftFootIndex = 31,
    RightFootIndex = 32,
}

impl BodyLandmark {
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Body side, from the subject's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn shoulder(self) -> BodyLandmark {
        match self {
            Side::Left => BodyLandmark::LeftShoulder,
            Side::Right => BodyLandmark::RightShoulder,
        }
    }

    pub fn elbow(self) -> BodyLandmark {
        match self {
            Side::Left => BodyLandmark::LeftElbow,
            Side::Right => BodyLandmark::RightElbow,
        }
    }

    pub fn wrist(self) -> BodyLandmark {
        match self {
            Side::Left => BodyLandmark::LeftWrist,
            Side::Right => BodyLandmark::RightWrist,
        }
    }

    pub fn hip(self) -> BodyLandmark {
        match self {
            Side::Left => BodyLandmark::LeftHip,
            Side::Right => BodyLandmark::RightHip,
        }
    }

    pub fn knee(self) -> BodyLandmark {
        match self {
            Side::Left => BodyLandmark::LeftKnee,
            Side::Right => BodyLandmark::RightKnee,
        }
    }
}

/// Keypoints of one frame. Slots may be empty when the detector dropped a point.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LandmarkSnapshot {
    points: Vec<Option<Landmark>>,
}

impl LandmarkSnapshot {
    pub fn new(points: Vec<Option<Landmark>>) -> Self {
        Self { points }
    }

    /// Snapshot with every slot empty
    pub fn empty() -> Self {
        Self { points: vec![None; LANDMARK_COUNT] }
    }

    /// Set one keypoint, growing the slot list when needed
    pub fn set(&mut self, landmark: BodyLandmark, point: Landmark) -> &mut Self {
        let idx = landmark.index();
        if self.points.len() <= idx {
            self.points.resize(idx + 1, None);
        }
        self.points[idx] = Some(point);
        self
    }

    /// Usable keypoint at the default visibility floor
    pub fn get(&self, landmark: BodyLandmark) -> Option<Landmark> {
        self.get_with(landmark, MIN_VISIBILITY)
    }

    /// Usable keypoint, or None when absent, non-finite or low-confidence
    pub fn get_with(&self, landmark: BodyLandmark, min_visibility: f32) -> Option<Landmark> {
        self.points
            .get(landmark.index())
            .copied()
            .flatten()
            .filter(|p| p.is_usable(min_visibility))
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.iter().all(Option::is_none)
    }
}
