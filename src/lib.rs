//! posekeys: body-pose gestures to keyboard and mouse actions
//!
//! Snapshot → GestureEvaluator → EdgeEngine → Dispatcher → ActionExecutor

pub mod core;
pub mod error;
pub mod types;

pub use error::{Error, ExecutorError, Result};

// =============================================================================
// TIMING
// =============================================================================

/// Minimum time between fired Begin/Pulse events of one gesture (milliseconds)
pub const COOLDOWN_MS: u64 = 300;

// =============================================================================
// GEOMETRY THRESHOLDS
// =============================================================================

/// Elbow angle below which an arm counts as bent (degrees)
pub const ARM_BEND_MAX_DEG: f64 = 60.0;

/// Ear-line angle beyond which the head counts as tilted (degrees)
pub const HEAD_TILT_THRESHOLD_DEG: f64 = 30.0;

/// Horizontal knee distance below which the knees count as clapped
pub const KNEE_CLAP_MAX_DISTANCE: f64 = 0.05;

/// Landmarks reported with lower visibility are treated as missing
pub const MIN_VISIBILITY: f32 = 0.5;

// =============================================================================
// ACTIONS
// =============================================================================

/// Cursor displacement of one mouse nudge (pixels)
pub const NUDGE_PIXELS: i32 = 10;

// =============================================================================
// VERSION
// =============================================================================

pub const VERSION: &str = "1.0.0";
