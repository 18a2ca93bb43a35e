//! Core modules for posekeys

pub mod config;
pub mod evaluator;
pub mod edge;
pub mod executor;
pub mod dispatcher;
pub mod controller;
pub mod frames;
pub mod session;
pub mod api;

pub use config::{BindingTable, EngineSettings, default_action};
pub use evaluator::{GestureEvaluator, joint_angle, classify_tilt};
pub use edge::EdgeEngine;
pub use executor::{ActionExecutor, DryRunExecutor};
pub use dispatcher::Dispatcher;
pub use controller::GestureController;
pub use frames::{FrameRecord, FrameClock, FeedEvent, LineFeed, parse_frame_line, read_line_lossy};
pub use session::{SessionEnd, SessionHooks, SessionSummary, run_session};
pub use api::{AppState, create_router, run_server};
