//! Core types for posekeys

mod landmark;
mod gesture;
mod state;
mod signals;
mod action;
mod event;
mod reason;
mod output;

pub use landmark::{Landmark, LandmarkSnapshot, BodyLandmark, Side, LANDMARK_COUNT};
pub use gesture::{GestureId, GestureDefinition, SignalKind, TriggerMode, GESTURE_COUNT};
pub use state::{TiltState, GestureRuntimeState};
pub use signals::FrameSignals;
pub use action::{ActionSpec, ActionBinding, Key, NamedKey, MouseButton, NudgeDirection};
pub use event::{Phase, TriggerEvent, RequestKind, DeviceRequest, ActionEvent, DispatchOutcome};
pub use reason::ReasonCode;
pub use output::{FrameOutput, ControllerStatus, HeldAction};
