//! Gesture Controller: runs one frame through evaluators, edges and dispatch
//!
//! Owns the runtime-state table and the bindings. Within a frame every End is
//! dispatched before any Begin/Pulse, so a direct Left→Right tilt releases the
//! left binding before pressing the right one.

use std::time::Instant;
use chrono::Utc;
use tracing::{debug, info};

use crate::core::config::{BindingTable, EngineSettings};
use crate::core::dispatcher::Dispatcher;
use crate::core::edge::EdgeEngine;
use crate::core::evaluator::GestureEvaluator;
use crate::core::executor::ActionExecutor;
use crate::types::{
    ControllerStatus, DispatchOutcome, FrameOutput, FrameSignals, GestureId, LandmarkSnapshot,
    Phase, TiltState, TriggerEvent,
};

#[derive(Debug, Clone)]
pub struct GestureController {
    evaluator: GestureEvaluator,
    edges: EdgeEngine,
    dispatcher: Dispatcher,
    frames: u64,
    last_signals: FrameSignals,
}

impl Default for GestureController {
    fn default() -> Self {
        Self::new(EngineSettings::default(), BindingTable::default())
    }
}

impl GestureController {
    pub fn new(settings: EngineSettings, bindings: BindingTable) -> Self {
        let edges = EdgeEngine::new(settings.cooldown);
        Self {
            evaluator: GestureEvaluator::new(settings),
            edges,
            dispatcher: Dispatcher::new(bindings),
            frames: 0,
            last_signals: FrameSignals::inactive(),
        }
    }

    /// Process one frame. `None` means no body was detected.
    pub fn process_frame<E: ActionExecutor + ?Sized>(
        &mut self,
        snapshot: Option<&LandmarkSnapshot>,
        now: Instant,
        executor: &mut E,
    ) -> FrameOutput {
        self.frames += 1;
        let signals = self.evaluator.evaluate(snapshot);
        let triggers = self.edges.update(&signals, now);

        let (ends, starts): (Vec<TriggerEvent>, Vec<TriggerEvent>) =
            triggers.into_iter().partition(|t| t.phase == Phase::End);

        let outcomes: Vec<DispatchOutcome> = ends
            .into_iter()
            .chain(starts)
            .map(|trigger| self.dispatcher.dispatch(trigger, executor))
            .collect();

        if signals.tilt != self.last_signals.tilt {
            debug!(from = %self.last_signals.tilt, to = %signals.tilt, angle = ?signals.tilt_angle, "tilt changed");
        }
        self.last_signals = signals;

        FrameOutput {
            timestamp: Utc::now(),
            frame: self.frames,
            body_present: snapshot.is_some(),
            tilt: signals.tilt,
            active: signals.active_gestures(),
            outcomes,
        }
    }

    /// Toggle a gesture mid-session; disabling releases anything it holds
    pub fn set_enabled<E: ActionExecutor + ?Sized>(
        &mut self,
        gesture: GestureId,
        enabled: bool,
        executor: &mut E,
    ) -> Option<DispatchOutcome> {
        info!(gesture = %gesture, enabled, "toggle changed");
        self.dispatcher.set_enabled(gesture, enabled, executor)
    }

    /// Release every held action; call before exit
    pub fn shutdown<E: ActionExecutor + ?Sized>(&mut self, executor: &mut E) -> Vec<DispatchOutcome> {
        let released = self.dispatcher.release_all(executor);
        if !released.is_empty() {
            info!(count = released.len(), "released held actions on shutdown");
        }
        released
    }

    /// Current head-tilt label, for the overlay
    pub fn tilt(&self) -> TiltState {
        self.last_signals.tilt
    }

    pub fn last_signals(&self) -> &FrameSignals {
        &self.last_signals
    }

    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    pub fn edges(&self) -> &EdgeEngine {
        &self.edges
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn settings(&self) -> &EngineSettings {
        self.evaluator.settings()
    }

    /// Snapshot for the status API; `cursor` comes from the executor
    pub fn status(&self, cursor: (i32, i32)) -> ControllerStatus {
        ControllerStatus {
            frames: self.frames,
            tilt: self.last_signals.tilt,
            active: self.last_signals.active_gestures(),
            held: self.dispatcher.held(),
            cursor,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::executor::DryRunExecutor;
    use crate::types::{BodyLandmark, Landmark, ReasonCode, RequestKind};
    use std::time::Duration;

    fn ears_at(deg: f64) -> LandmarkSnapshot {
        let rad = deg.to_radians();
        let mut snapshot = LandmarkSnapshot::empty();
        snapshot.set(BodyLandmark::RightEar, Landmark::new(0.5, 0.3));
        snapshot.set(
            BodyLandmark::LeftEar,
            Landmark::new(0.5 + 0.1 * rad.cos(), 0.3 + 0.1 * rad.sin()),
        );
        snapshot
    }

    #[test]
    fn test_frame_counter_and_absence() {
        let mut controller = GestureController::default();
        let mut exec = DryRunExecutor::default();
        let output = controller.process_frame(None, Instant::now(), &mut exec);
        assert_eq!(output.frame, 1);
        assert!(!output.body_present);
        assert!(output.outcomes.is_empty());
        assert_eq!(controller.tilt(), TiltState::Center);
    }

    #[test]
    fn test_direct_left_to_right_releases_first() {
        let mut controller = GestureController::default();
        let mut exec = DryRunExecutor::default();
        let t0 = Instant::now();

        controller.process_frame(Some(&ears_at(-40.0)), t0, &mut exec);
        controller.process_frame(Some(&ears_at(40.0)), t0 + Duration::from_millis(500), &mut exec);
        exec.drain();

        // Left → Right in one frame
        let output = controller.process_frame(Some(&ears_at(-40.0)), t0 + Duration::from_millis(1000), &mut exec);
        let phases: Vec<_> = output.outcomes.iter().map(|o| (o.gesture, o.phase)).collect();
        assert_eq!(
            phases,
            vec![(GestureId::TiltLeft, Phase::End), (GestureId::TiltRight, Phase::Begin)]
        );
        let kinds: Vec<_> = exec.drain().into_iter().map(|r| (r.kind, r.action.to_string())).collect();
        assert_eq!(
            kinds,
            vec![(RequestKind::Release, "z".to_string()), (RequestKind::Press, "x".to_string())]
        );
        assert_eq!(controller.tilt(), TiltState::Right);
    }

    #[test]
    fn test_body_lost_ends_held_gestures() {
        let mut controller = GestureController::default();
        let mut exec = DryRunExecutor::default();
        let t0 = Instant::now();
        controller.process_frame(Some(&ears_at(45.0)), t0, &mut exec);
        assert_eq!(controller.dispatcher().held().len(), 1);

        let output = controller.process_frame(None, t0 + Duration::from_millis(33), &mut exec);
        assert_eq!(output.outcomes.len(), 1);
        assert_eq!(output.outcomes[0].phase, Phase::End);
        assert!(controller.dispatcher().held().is_empty());
    }

    #[test]
    fn test_shutdown_releases_held() {
        let mut controller = GestureController::default();
        let mut exec = DryRunExecutor::default();
        controller.process_frame(Some(&ears_at(45.0)), Instant::now(), &mut exec);
        let released = controller.shutdown(&mut exec);
        assert_eq!(released.len(), 1);
        assert_eq!(released[0].reason, ReasonCode::D006_FORCED_RELEASE);
        assert!(controller.shutdown(&mut exec).is_empty());
    }

    #[test]
    fn test_status_reports_held_and_tilt() {
        let mut controller = GestureController::default();
        let mut exec = DryRunExecutor::default();
        controller.process_frame(Some(&ears_at(45.0)), Instant::now(), &mut exec);
        let status = controller.status(exec.cursor());
        assert_eq!(status.frames, 1);
        assert_eq!(status.tilt, TiltState::Left);
        assert_eq!(status.active, vec![GestureId::TiltLeft]);
        assert_eq!(status.held.len(), 1);
        assert_eq!(status.held[0].gesture, GestureId::TiltLeft);
    }
}
