//! Action executor seam
//!
//! Real HID injection lives behind `ActionExecutor`. `DryRunExecutor` records
//! requests and tracks a virtual cursor instead of touching the OS.

use tracing::debug;

use crate::error::ExecutorError;
use crate::types::{ActionSpec, DeviceRequest, RequestKind};
use crate::NUDGE_PIXELS;

/// Narrow request surface toward the input device
pub trait ActionExecutor {
    /// Press and hold; for a nudge, move the cursor once
    fn press(&mut self, action: &ActionSpec) -> Result<(), ExecutorError>;

    /// Release a held press; a nudge has nothing to release
    fn release(&mut self, action: &ActionSpec) -> Result<(), ExecutorError>;

    /// Single tap: press immediately followed by release
    fn pulse(&mut self, action: &ActionSpec) -> Result<(), ExecutorError> {
        self.press(action)?;
        self.release(action)
    }
}

/// Executor that records requests without driving any device
#[derive(Debug, Clone)]
pub struct DryRunExecutor {
    requests: Vec<DeviceRequest>,
    cursor: (i32, i32),
    nudge_pixels: i32,
    available: bool,
}

impl Default for DryRunExecutor {
    fn default() -> Self {
        Self::new(NUDGE_PIXELS)
    }
}

impl DryRunExecutor {
    pub fn new(nudge_pixels: i32) -> Self {
        Self {
            requests: Vec::new(),
            cursor: (0, 0),
            nudge_pixels,
            available: true,
        }
    }

    /// Simulate the device going away (or coming back)
    pub fn set_available(&mut self, available: bool) {
        self.available = available;
    }

    pub fn requests(&self) -> &[DeviceRequest] {
        &self.requests
    }

    /// Take the recorded requests, leaving the log empty
    pub fn drain(&mut self) -> Vec<DeviceRequest> {
        std::mem::take(&mut self.requests)
    }

    /// Cursor offset accumulated by nudges
    pub fn cursor(&self) -> (i32, i32) {
        self.cursor
    }

    fn check(&self) -> Result<(), ExecutorError> {
        if self.available {
            Ok(())
        } else {
            Err(ExecutorError::Unavailable)
        }
    }

    fn record(&mut self, kind: RequestKind, action: &ActionSpec) {
        debug!(request = %kind, action = %action, "dry-run request");
        self.requests.push(DeviceRequest { kind, action: *action });
    }

    fn nudge(&mut self, action: &ActionSpec) {
        if let ActionSpec::MouseNudge(direction) = action {
            let (dx, dy) = direction.delta();
            self.cursor.0 += dx * self.nudge_pixels;
            self.cursor.1 += dy * self.nudge_pixels;
        }
    }
}

impl ActionExecutor for DryRunExecutor {
    fn press(&mut self, action: &ActionSpec) -> Result<(), ExecutorError> {
        self.check()?;
        self.nudge(action);
        self.record(RequestKind::Press, action);
        Ok(())
    }

    fn release(&mut self, action: &ActionSpec) -> Result<(), ExecutorError> {
        self.check()?;
        self.record(RequestKind::Release, action);
        Ok(())
    }

    /// Recorded as one request rather than a press/release pair
    fn pulse(&mut self, action: &ActionSpec) -> Result<(), ExecutorError> {
        self.check()?;
        self.nudge(action);
        self.record(RequestKind::Pulse, action);
        Ok(())
    }
}
