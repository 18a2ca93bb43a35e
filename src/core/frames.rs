//! NDJSON frame input from the pose-estimation side
//!
//! One object per line:
//! `{"t_ms": 1234, "landmarks": [{"x":0.5,"y":0.4,"visibility":0.9}, null, ...]}`
//! `landmarks` null or missing means no body in that frame.

use std::borrow::Cow;
use std::io::{self, BufRead};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::types::LandmarkSnapshot;

/// One decoded input line
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameRecord {
    /// Capture time relative to session start, for replay
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t_ms: Option<u64>,
    #[serde(default)]
    pub landmarks: Option<LandmarkSnapshot>,
}

/// Decode a line. Undecodable lines become an absent-body frame.
pub fn parse_frame_line(line: &str, line_no: usize) -> FrameRecord {
    match serde_json::from_str::<FrameRecord>(line) {
        Ok(record) => record,
        Err(e) => {
            warn!(line = line_no, error = %e, "malformed frame, treating as no body");
            FrameRecord::default()
        }
    }
}

/// Maps frame timestamps onto a monotonic clock
#[derive(Debug, Clone, Copy)]
pub struct FrameClock {
    origin: Instant,
    last: Instant,
}

impl FrameClock {
    pub fn new(origin: Instant) -> Self {
        Self { origin, last: origin }
    }

    /// Replay time when the frame carries one, wall monotonic time otherwise.
    /// Never goes backwards.
    pub fn at(&mut self, t_ms: Option<u64>) -> Instant {
        let candidate = match t_ms {
            Some(ms) => self.origin + Duration::from_millis(ms),
            None => Instant::now(),
        };
        self.last = self.last.max(candidate);
        self.last
    }
}

/// Read one `\n`-terminated line. Invalid UTF-8 is replaced rather than
/// rejected, so the line reaches the frame decoder as a malformed frame.
/// `None` at end of input.
pub fn read_line_lossy<R: BufRead>(reader: &mut R, buf: &mut Vec<u8>) -> io::Result<Option<String>> {
    buf.clear();
    if reader.read_until(b'\n', buf)? == 0 {
        return Ok(None);
    }
    let line = match String::from_utf8_lossy(buf) {
        Cow::Borrowed(text) => text.to_owned(),
        Cow::Owned(text) => {
            warn!(bytes = buf.len(), "frame line is not valid UTF-8");
            text
        }
    };
    Ok(Some(line))
}

/// What the frame loop gets from the feed
#[derive(Debug)]
pub enum FeedEvent {
    Line(String),
    /// Input ended
    Closed,
    /// Stop flag raised while waiting
    Stopped,
    /// Reading failed; no further lines follow
    Failed(io::Error),
}

/// Default wait between stop-flag checks
pub const FEED_POLL: Duration = Duration::from_millis(100);

/// Lines read on a dedicated thread, so a stalled source never blocks
/// the loop from noticing the stop flag
pub struct LineFeed {
    rx: Receiver<io::Result<String>>,
    poll: Duration,
}

impl LineFeed {
    pub fn spawn<R: BufRead + Send + 'static>(mut reader: R) -> io::Result<Self> {
        let (tx, rx) = mpsc::channel();
        thread::Builder::new()
            .name("frame-reader".to_string())
            .spawn(move || {
                let mut buf = Vec::new();
                loop {
                    match read_line_lossy(&mut reader, &mut buf) {
                        Ok(Some(line)) => {
                            if tx.send(Ok(line)).is_err() {
                                break;
                            }
                        }
                        Ok(None) => break,
                        Err(e) => {
                            let _ = tx.send(Err(e));
                            break;
                        }
                    }
                }
                debug!("frame reader finished");
            })?;
        Ok(Self { rx, poll: FEED_POLL })
    }

    pub fn with_poll(mut self, poll: Duration) -> Self {
        self.poll = poll;
        self
    }

    /// Next line, waiting in `poll` slices and checking `stop` between them
    pub fn next(&self, stop: &AtomicBool) -> FeedEvent {
        loop {
            if stop.load(Ordering::SeqCst) {
                return FeedEvent::Stopped;
            }
            match self.rx.recv_timeout(self.poll) {
                Ok(Ok(line)) => return FeedEvent::Line(line),
                Ok(Err(e)) => return FeedEvent::Failed(e),
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => return FeedEvent::Closed,
            }
        }
    }
}
