//! Integration tests for the frame pipeline
//!
//! Tests the full path: snapshot → evaluator → edge engine → dispatcher → executor

use posekeys::core::{BindingTable, DryRunExecutor, EngineSettings, GestureController};
use posekeys::types::{
    BodyLandmark, GestureId, Landmark, LandmarkSnapshot, Phase, ReasonCode, RequestKind, TiltState,
};
use pretty_assertions::assert_eq;
use std::time::{Duration, Instant};

const FRAME_MS: u64 = 33;

/// Neutral standing pose: arms down and straight, knees apart below hips, head level
fn standing() -> LandmarkSnapshot {
    let mut s = LandmarkSnapshot::empty();
    s.set(BodyLandmark::RightEar, Landmark::new(0.46, 0.20));
    s.set(BodyLandmark::LeftEar, Landmark::new(0.54, 0.20));
    s.set(BodyLandmark::RightShoulder, Landmark::new(0.40, 0.35));
    s.set(BodyLandmark::LeftShoulder, Landmark::new(0.60, 0.35));
    s.set(BodyLandmark::RightElbow, Landmark::new(0.38, 0.50));
    s.set(BodyLandmark::LeftElbow, Landmark::new(0.62, 0.50));
    s.set(BodyLandmark::RightWrist, Landmark::new(0.37, 0.65));
    s.set(BodyLandmark::LeftWrist, Landmark::new(0.63, 0.65));
    s.set(BodyLandmark::RightHip, Landmark::new(0.44, 0.60));
    s.set(BodyLandmark::LeftHip, Landmark::new(0.56, 0.60));
    s.set(BodyLandmark::RightKnee, Landmark::new(0.43, 0.78));
    s.set(BodyLandmark::LeftKnee, Landmark::new(0.57, 0.78));
    s
}

fn left_arm_bent() -> LandmarkSnapshot {
    let mut s = standing();
    // Forearm folded back up toward the shoulder, wrist still below it
    s.set(BodyLandmark::LeftElbow, Landmark::new(0.66, 0.55));
    s.set(BodyLandmark::LeftWrist, Landmark::new(0.62, 0.42));
    s
}

fn right_knee_up() -> LandmarkSnapshot {
    let mut s = standing();
    s.set(BodyLandmark::RightKnee, Landmark::new(0.43, 0.55));
    s
}

fn knees_together() -> LandmarkSnapshot {
    let mut s = standing();
    s.set(BodyLandmark::RightKnee, Landmark::new(0.49, 0.78));
    s.set(BodyLandmark::LeftKnee, Landmark::new(0.51, 0.78));
    s
}

fn both_arms_up() -> LandmarkSnapshot {
    let mut s = standing();
    s.set(BodyLandmark::RightElbow, Landmark::new(0.38, 0.25));
    s.set(BodyLandmark::LeftElbow, Landmark::new(0.62, 0.25));
    s.set(BodyLandmark::RightWrist, Landmark::new(0.37, 0.10));
    s.set(BodyLandmark::LeftWrist, Landmark::new(0.63, 0.10));
    s
}

/// Runs frames at a steady cadence and records every executor request
struct Session {
    controller: GestureController,
    executor: DryRunExecutor,
    t0: Instant,
    frame: u64,
}

impl Session {
    fn new(controller: GestureController) -> Self {
        Self {
            controller,
            executor: DryRunExecutor::default(),
            t0: Instant::now(),
            frame: 0,
        }
    }

    fn now(&self) -> Instant {
        self.t0 + Duration::from_millis(self.frame * FRAME_MS)
    }

    fn feed(&mut self, snapshot: Option<&LandmarkSnapshot>, frames: usize) -> Vec<(GestureId, Phase, ReasonCode)> {
        let mut seen = Vec::new();
        for _ in 0..frames {
            let now = self.now();
            let output = self.controller.process_frame(snapshot, now, &mut self.executor);
            seen.extend(output.outcomes.iter().map(|o| (o.gesture, o.phase, o.reason)));
            self.frame += 1;
        }
        seen
    }

    fn requests(&mut self) -> Vec<(RequestKind, String)> {
        self.executor
            .drain()
            .into_iter()
            .map(|r| (r.kind, r.action.to_string()))
            .collect()
    }
}

#[test]
fn test_standing_still_does_nothing_but_lowered_nudge() {
    let mut session = Session::new(GestureController::default());
    let seen = session.feed(Some(&standing()), 60);
    // Arms down: arm_lowered rises once, then stays held
    assert_eq!(seen, vec![(GestureId::ArmLowered, Phase::Begin, ReasonCode::D001_DISPATCHED)]);
    assert_eq!(session.requests(), vec![(RequestKind::Pulse, "mouse_down".to_string())]);
    assert_eq!(session.executor.cursor(), (0, 10));
}

#[test]
fn test_no_body_never_fires() {
    let mut session = Session::new(GestureController::default());
    let seen = session.feed(None, 100);
    assert!(seen.is_empty());
    assert!(session.requests().is_empty());
}

#[test]
fn test_arm_bend_holds_key_until_released() {
    let mut session = Session::new(GestureController::default());
    session.feed(Some(&standing()), 5);
    session.requests();

    let seen = session.feed(Some(&left_arm_bent()), 30);
    assert_eq!(seen, vec![(GestureId::LeftArmBend, Phase::Begin, ReasonCode::D001_DISPATCHED)]);
    assert!(session.controller.dispatcher().is_held(GestureId::LeftArmBend));

    let seen = session.feed(Some(&standing()), 5);
    assert_eq!(seen, vec![(GestureId::LeftArmBend, Phase::End, ReasonCode::D001_DISPATCHED)]);
    assert_eq!(
        session.requests(),
        vec![(RequestKind::Press, "left".to_string()), (RequestKind::Release, "left".to_string())]
    );
}

#[test]
fn test_quick_rebend_suppressed_by_cooldown() {
    let mut session = Session::new(GestureController::default());
    session.feed(Some(&standing()), 5);
    session.requests();

    // Bend, straighten, bend again within ~100 ms
    session.feed(Some(&left_arm_bent()), 1);
    session.feed(Some(&standing()), 1);
    let seen = session.feed(Some(&left_arm_bent()), 1);
    assert_eq!(seen, vec![]);
    let state = session.controller.edges().state(GestureId::LeftArmBend);
    assert_eq!(state.last_trigger_time, Some(session.t0 + Duration::from_millis(5 * FRAME_MS)));

    // The falling edge after a suppressed rise has nothing to release
    let seen = session.feed(Some(&standing()), 1);
    assert_eq!(seen, vec![(GestureId::LeftArmBend, Phase::End, ReasonCode::D005_NOT_HELD)]);
    assert_eq!(
        session.requests(),
        vec![(RequestKind::Press, "left".to_string()), (RequestKind::Release, "left".to_string())]
    );
}

#[test]
fn test_fast_double_jump_both_fire() {
    let mut session = Session::new(GestureController::default());
    session.feed(Some(&standing()), 3);
    session.requests();

    // Two hops 66 ms apart, well inside the cooldown
    session.feed(Some(&right_knee_up()), 1);
    session.feed(Some(&standing()), 1);
    session.feed(Some(&right_knee_up()), 1);
    session.feed(Some(&standing()), 1);

    // Each hop is one tap of the key; landing releases nothing
    assert_eq!(
        session.requests(),
        vec![
            (RequestKind::Pulse, "space".to_string()),
            (RequestKind::Pulse, "space".to_string()),
        ]
    );
    assert!(!session.controller.dispatcher().is_held(GestureId::Jump));
}

#[test]
fn test_jump_landing_reports_tap() {
    let mut session = Session::new(GestureController::default());
    session.feed(Some(&standing()), 2);
    session.requests();

    let seen = session.feed(Some(&right_knee_up()), 10);
    assert_eq!(seen, vec![(GestureId::Jump, Phase::Begin, ReasonCode::D001_DISPATCHED)]);
    let seen = session.feed(Some(&standing()), 1);
    assert_eq!(seen, vec![(GestureId::Jump, Phase::End, ReasonCode::D007_TAPPED_NO_RELEASE)]);
    assert_eq!(session.requests(), vec![(RequestKind::Pulse, "space".to_string())]);
}

#[test]
fn test_knee_clap_repeats_while_held() {
    let mut session = Session::new(GestureController::default());
    session.feed(Some(&standing()), 1);
    session.requests();

    // ~1 s of continuous clap at 30 fps
    let start = session.frame;
    let mut pulse_frames = Vec::new();
    for _ in 0..31 {
        let seen = session.feed(Some(&knees_together()), 1);
        if seen.iter().any(|(g, p, _)| *g == GestureId::KneeClap && *p == Phase::Pulse) {
            pulse_frames.push(session.frame - 1 - start);
        }
    }
    // 300 ms cooldown over 33 ms frames: every 10th frame
    assert_eq!(pulse_frames, vec![0, 10, 20, 30]);
    for pair in pulse_frames.windows(2) {
        assert!((pair[1] - pair[0]) * FRAME_MS >= 300);
    }
    assert!(session
        .requests()
        .iter()
        .all(|r| *r == (RequestKind::Pulse, "shift".to_string())));
}

#[test]
fn test_arms_up_raises_and_ends_lowered() {
    let mut session = Session::new(GestureController::default());
    session.feed(Some(&standing()), 20);
    session.requests();

    let seen = session.feed(Some(&both_arms_up()), 1);
    assert_eq!(
        seen,
        vec![
            (GestureId::ArmLowered, Phase::End, ReasonCode::D003_NUDGE_NO_RELEASE),
            (GestureId::ArmRaised, Phase::Begin, ReasonCode::D001_DISPATCHED),
        ]
    );
    assert_eq!(session.requests(), vec![(RequestKind::Pulse, "mouse_up".to_string())]);
}

#[test]
fn test_one_arm_up_keeps_raised_and_lowered_active() {
    let mut s = standing();
    s.set(BodyLandmark::LeftWrist, Landmark::new(0.63, 0.10));
    s.set(BodyLandmark::LeftElbow, Landmark::new(0.62, 0.25));

    let mut session = Session::new(GestureController::default());
    session.feed(Some(&s), 1);
    let active = session.controller.last_signals().active_gestures();
    assert!(active.contains(&GestureId::ArmRaised));
    assert!(active.contains(&GestureId::ArmLowered));
}

#[test]
fn test_disable_mid_session_discards_but_tracks_edges() {
    let mut session = Session::new(GestureController::default());
    session.feed(Some(&standing()), 5);
    session.requests();

    let released = session
        .controller
        .set_enabled(GestureId::Jump, false, &mut session.executor);
    assert!(released.is_none());

    let seen = session.feed(Some(&right_knee_up()), 3);
    assert_eq!(seen, vec![(GestureId::Jump, Phase::Begin, ReasonCode::D002_DISABLED)]);
    // Edge state still follows the signal
    assert!(session.controller.edges().state(GestureId::Jump).previous_signal);

    let seen = session.feed(Some(&standing()), 3);
    assert_eq!(seen, vec![(GestureId::Jump, Phase::End, ReasonCode::D002_DISABLED)]);
    assert!(session.requests().is_empty());
}

#[test]
fn test_disable_while_held_releases_immediately() {
    let mut session = Session::new(GestureController::default());
    session.feed(Some(&standing()), 2);
    session.feed(Some(&left_arm_bent()), 2);
    session.requests();

    let outcome = session
        .controller
        .set_enabled(GestureId::LeftArmBend, false, &mut session.executor)
        .expect("held key released");
    assert_eq!(outcome.reason, ReasonCode::D006_FORCED_RELEASE);
    assert_eq!(session.requests(), vec![(RequestKind::Release, "left".to_string())]);

    let seen = session.feed(Some(&standing()), 1);
    assert_eq!(seen, vec![(GestureId::LeftArmBend, Phase::End, ReasonCode::D002_DISABLED)]);
    assert!(session.requests().is_empty());
}

#[test]
fn test_executor_outage_self_heals() {
    let mut session = Session::new(GestureController::default());
    session.feed(Some(&standing()), 2);
    session.requests();

    session.executor.set_available(false);
    let seen = session.feed(Some(&right_knee_up()), 2);
    assert_eq!(seen, vec![(GestureId::Jump, Phase::Begin, ReasonCode::D004_EXECUTOR_FAILED)]);
    assert!(!session.controller.dispatcher().is_held(GestureId::Jump));

    session.executor.set_available(true);
    session.feed(Some(&standing()), 1);
    let seen = session.feed(Some(&right_knee_up()), 1);
    assert_eq!(seen, vec![(GestureId::Jump, Phase::Begin, ReasonCode::D001_DISPATCHED)]);
    assert_eq!(session.requests(), vec![(RequestKind::Pulse, "space".to_string())]);
}

#[test]
fn test_every_press_released_before_next_press() {
    let poses = [standing(), left_arm_bent(), right_knee_up(), knees_together(), both_arms_up()];
    let mut session = Session::new(GestureController::default());

    // Deterministic pseudo-random pose sequence
    let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
    for _ in 0..400 {
        seed ^= seed << 13;
        seed ^= seed >> 7;
        seed ^= seed << 17;
        let pose = &poses[(seed % poses.len() as u64) as usize];
        let body = seed % 11 != 0;
        session.feed(body.then_some(pose), 1 + (seed % 4) as usize);
    }
    session.controller.shutdown(&mut session.executor);

    let mut held: std::collections::HashSet<String> = Default::default();
    for (kind, action) in session.requests() {
        match kind {
            RequestKind::Press => assert!(held.insert(action.clone()), "double press of {}", action),
            RequestKind::Release => assert!(held.remove(&action), "release without press of {}", action),
            RequestKind::Pulse => {}
        }
    }
    assert!(held.is_empty(), "still held after shutdown: {:?}", held);
}

#[test]
fn test_custom_bindings_and_settings() {
    let mut bindings = BindingTable::default();
    bindings
        .apply_keybindings_json("inline", r#"{"tilt_left": "left_click", "tilt_right": "mouse_right"}"#)
        .unwrap();
    let settings = EngineSettings {
        head_tilt_threshold_deg: 10.0,
        ..EngineSettings::default()
    };
    let mut session = Session::new(GestureController::new(settings, bindings));

    // Left ear drops by ~15° relative to the right ear
    let mut tilted = LandmarkSnapshot::empty();
    tilted.set(BodyLandmark::RightEar, Landmark::new(0.46, 0.20));
    tilted.set(BodyLandmark::LeftEar, Landmark::new(0.537, 0.221));
    session.feed(Some(&tilted), 2);
    assert_eq!(session.controller.tilt(), TiltState::Left);

    let mut other = LandmarkSnapshot::empty();
    other.set(BodyLandmark::RightEar, Landmark::new(0.46, 0.221));
    other.set(BodyLandmark::LeftEar, Landmark::new(0.537, 0.20));
    session.feed(Some(&other), 10);
    assert_eq!(session.controller.tilt(), TiltState::Right);

    assert_eq!(
        session.requests(),
        vec![
            (RequestKind::Press, "left_click".to_string()),
            (RequestKind::Release, "left_click".to_string()),
            (RequestKind::Pulse, "mouse_right".to_string()),
        ]
    );
}

#[test]
fn test_json_output_valid() {
    let mut controller = GestureController::default();
    let mut executor = DryRunExecutor::default();
    let output = controller.process_frame(Some(&right_knee_up()), Instant::now(), &mut executor);

    let json = serde_json::to_string(&output).unwrap();
    assert!(json.contains("\"tilt\""));
    assert!(json.contains("\"outcomes\""));
    assert!(json.contains("\"jump\""));

    let _: posekeys::types::FrameOutput = serde_json::from_str(&json).unwrap();
}
