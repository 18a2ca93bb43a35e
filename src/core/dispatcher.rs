//! Action Dispatcher: trigger events → executor requests
//!
//! | binding       | Begin          | End              | Pulse  |
//! |---------------|----------------|------------------|--------|
//! | key / click   | press, hold    | release the held | tap    |
//! | jump on a key | tap            | no-op            | tap    |
//! | mouse nudge   | one nudge      | no-op            | nudge  |
//!
//! Disabled gestures are discarded. Executor failures are logged and dropped.

use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::core::config::BindingTable;
use crate::core::executor::ActionExecutor;
use crate::types::{
    ActionBinding, ActionEvent, ActionSpec, DispatchOutcome, GestureId, HeldAction, Phase,
    ReasonCode, RequestKind, TriggerEvent,
};

/// Resolves triggers against bindings and remembers what it holds pressed
#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    bindings: BindingTable,
    /// Exact action pressed per gesture, released on End even if rebound
    held: BTreeMap<GestureId, ActionSpec>,
}

impl Dispatcher {
    pub fn new(bindings: BindingTable) -> Self {
        Self { bindings, held: BTreeMap::new() }
    }

    pub fn binding(&self, gesture: GestureId) -> ActionBinding {
        self.bindings.get(gesture)
    }

    pub fn bindings(&self) -> &BindingTable {
        &self.bindings
    }

    pub fn is_held(&self, gesture: GestureId) -> bool {
        self.held.contains_key(&gesture)
    }

    pub fn held(&self) -> Vec<HeldAction> {
        self.held
            .iter()
            .map(|(gesture, action)| HeldAction { gesture: *gesture, action: *action })
            .collect()
    }

    /// Handle one trigger
    pub fn dispatch<E: ActionExecutor + ?Sized>(
        &mut self,
        trigger: TriggerEvent,
        executor: &mut E,
    ) -> DispatchOutcome {
        let gesture = trigger.gesture;
        let phase = trigger.phase;
        let binding = self.bindings.get(gesture);

        if !binding.enabled {
            debug!(gesture = %gesture, phase = %phase, "discarded: gesture disabled");
            return DispatchOutcome::dropped(gesture, phase, ReasonCode::D002_DISABLED);
        }

        let taps = gesture.definition().tap_key && matches!(binding.action, ActionSpec::Keyboard(_));

        match (phase, binding.action.is_holdable()) {
            (Phase::Begin, true) if taps => {
                self.send(gesture, phase, binding.action, RequestKind::Pulse, executor)
            }
            (Phase::Begin, true) => {
                let outcome = self.send(gesture, phase, binding.action, RequestKind::Press, executor);
                if outcome.is_dispatched() {
                    self.held.insert(gesture, binding.action);
                }
                outcome
            }
            (Phase::End, true) => match self.held.remove(&gesture) {
                Some(action) => self.send(gesture, phase, action, RequestKind::Release, executor),
                None if taps => {
                    DispatchOutcome::dropped(gesture, phase, ReasonCode::D007_TAPPED_NO_RELEASE)
                }
                None => DispatchOutcome::dropped(gesture, phase, ReasonCode::D005_NOT_HELD),
            },
            (Phase::End, false) => {
                DispatchOutcome::dropped(gesture, phase, ReasonCode::D003_NUDGE_NO_RELEASE)
            }
            (Phase::Pulse, _) | (Phase::Begin, false) => {
                self.send(gesture, phase, binding.action, RequestKind::Pulse, executor)
            }
        }
    }

    /// Toggle a gesture; turning it off releases whatever it holds
    pub fn set_enabled<E: ActionExecutor + ?Sized>(
        &mut self,
        gesture: GestureId,
        enabled: bool,
        executor: &mut E,
    ) -> Option<DispatchOutcome> {
        self.bindings.set_enabled(gesture, enabled);
        if enabled {
            return None;
        }
        self.force_release(gesture, executor)
    }

    /// Release every held action (shutdown)
    pub fn release_all<E: ActionExecutor + ?Sized>(&mut self, executor: &mut E) -> Vec<DispatchOutcome> {
        let gestures: Vec<GestureId> = self.held.keys().copied().collect();
        gestures
            .into_iter()
            .filter_map(|g| self.force_release(g, executor))
            .collect()
    }

    fn force_release<E: ActionExecutor + ?Sized>(
        &mut self,
        gesture: GestureId,
        executor: &mut E,
    ) -> Option<DispatchOutcome> {
        let action = self.held.remove(&gesture)?;
        let mut outcome = self.send(gesture, Phase::End, action, RequestKind::Release, executor);
        if outcome.is_dispatched() {
            outcome.reason = ReasonCode::D006_FORCED_RELEASE;
        }
        Some(outcome)
    }

    fn send<E: ActionExecutor + ?Sized>(
        &self,
        gesture: GestureId,
        phase: Phase,
        action: ActionSpec,
        request: RequestKind,
        executor: &mut E,
    ) -> DispatchOutcome {
        let result = match request {
            RequestKind::Press => executor.press(&action),
            RequestKind::Release => executor.release(&action),
            RequestKind::Pulse => executor.pulse(&action),
        };
        let event = ActionEvent::new(gesture, phase, action, request);
        match result {
            Ok(()) => {
                debug!(gesture = %gesture, phase = %phase, request = %request, action = %action, "dispatched");
                DispatchOutcome::sent(event, ReasonCode::D001_DISPATCHED)
            }
            Err(e) => {
                warn!(gesture = %gesture, request = %request, action = %action, error = %e, "action dropped");
                DispatchOutcome::sent(event, ReasonCode::D004_EXECUTOR_FAILED)
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
