//! Frame session: drives a controller from a line feed
//!
//! Lines are frames, `!command` control lines, or `quit`/`exit`. The session
//! ends on end of input, a quit line, the stop flag, or a read failure, and
//! held actions are released on every one of those paths.

use std::sync::atomic::AtomicBool;
use std::time::Instant;
use tracing::{error, info};

use crate::core::controller::GestureController;
use crate::core::executor::ActionExecutor;
use crate::core::frames::{parse_frame_line, FeedEvent, FrameClock, LineFeed};
use crate::error::Error;
use crate::types::{DispatchOutcome, FrameOutput};

/// Callbacks from the session to its front end
pub trait SessionHooks<E: ActionExecutor + ?Sized> {
    /// After every processed frame
    fn on_frame(&mut self, output: &FrameOutput, controller: &GestureController, executor: &mut E);

    /// A `!`-prefixed control line, without the prefix
    fn on_command(&mut self, command: &str, controller: &mut GestureController, executor: &mut E);
}

/// Why the session stopped
#[derive(Debug)]
pub enum SessionEnd {
    Exhausted,
    Quit,
    Stopped,
    Failed(Error),
}

#[derive(Debug)]
pub struct SessionSummary {
    pub frames: u64,
    /// Actions released at shutdown
    pub released: Vec<DispatchOutcome>,
    pub end: SessionEnd,
}

/// Run until the feed ends or `stop` is raised, then shut the controller down
pub fn run_session<E, H>(
    controller: &mut GestureController,
    executor: &mut E,
    feed: &LineFeed,
    stop: &AtomicBool,
    hooks: &mut H,
) -> SessionSummary
where
    E: ActionExecutor + ?Sized,
    H: SessionHooks<E> + ?Sized,
{
    let mut clock = FrameClock::new(Instant::now());
    let mut line_no = 0usize;

    let end = loop {
        let line = match feed.next(stop) {
            FeedEvent::Line(line) => line,
            FeedEvent::Closed => break SessionEnd::Exhausted,
            FeedEvent::Stopped => break SessionEnd::Stopped,
            FeedEvent::Failed(e) => {
                error!(line = line_no + 1, error = %e, "frame input failed");
                break SessionEnd::Failed(Error::Input(e));
            }
        };
        line_no += 1;

        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
            break SessionEnd::Quit;
        }
        if let Some(command) = line.strip_prefix('!') {
            hooks.on_command(command.trim(), controller, executor);
            continue;
        }

        let record = parse_frame_line(line, line_no);
        let now = clock.at(record.t_ms);
        let output = controller.process_frame(record.landmarks.as_ref(), now, executor);
        hooks.on_frame(&output, controller, executor);
    };

    // Never leave keys stuck down
    let released = controller.shutdown(executor);
    info!(frames = controller.frame_count(), released = released.len(), end = ?end, "session ended");

    SessionSummary {
        frames: controller.frame_count(),
        released,
        end,
    }
}

// =============================================================================
// TESTS
// =============================================================================
