//! Engine settings and binding/toggle configuration
//!
//! Bindings live in `keybindings.json` (gesture → action string) and toggles
//! in `toggles.json` (gesture → bool). A missing file or key falls back to the
//! built-in defaults; anything malformed is a fatal error.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::types::{ActionBinding, ActionSpec, GestureId, Key, NamedKey, NudgeDirection};
use crate::{
    ARM_BEND_MAX_DEG, COOLDOWN_MS, HEAD_TILT_THRESHOLD_DEG, KNEE_CLAP_MAX_DISTANCE,
    MIN_VISIBILITY, NUDGE_PIXELS,
};

/// Old name of `left_knee_raise`, still found in saved configs
const LEGACY_SQUAT_KEY: &str = "squat";

/// Tunable thresholds and timing
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    pub cooldown: Duration,
    pub arm_bend_max_deg: f64,
    pub head_tilt_threshold_deg: f64,
    /// Ear-line angle of the user's upright head
    pub tilt_neutral_deg: f64,
    pub knee_clap_max_distance: f64,
    pub min_visibility: f32,
    pub nudge_pixels: i32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            cooldown: Duration::from_millis(COOLDOWN_MS),
            arm_bend_max_deg: ARM_BEND_MAX_DEG,
            head_tilt_threshold_deg: HEAD_TILT_THRESHOLD_DEG,
            tilt_neutral_deg: 0.0,
            knee_clap_max_distance: KNEE_CLAP_MAX_DISTANCE,
            min_visibility: MIN_VISIBILITY,
            nudge_pixels: NUDGE_PIXELS,
        }
    }
}

impl EngineSettings {
    /// Reject values that would make gestures unreachable or always on
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=180.0).contains(&self.arm_bend_max_deg) {
            return Err(Error::InvalidSetting(format!(
                "arm bend angle {} outside 0..=180",
                self.arm_bend_max_deg
            )));
        }
        if !(0.0..180.0).contains(&self.head_tilt_threshold_deg) {
            return Err(Error::InvalidSetting(format!(
                "tilt threshold {} outside 0..180",
                self.head_tilt_threshold_deg
            )));
        }
        if !self.tilt_neutral_deg.is_finite() {
            return Err(Error::InvalidSetting("tilt neutral angle must be finite".into()));
        }
        if !(self.knee_clap_max_distance > 0.0 && self.knee_clap_max_distance <= 1.0) {
            return Err(Error::InvalidSetting(format!(
                "knee clap distance {} outside (0, 1]",
                self.knee_clap_max_distance
            )));
        }
        if self.nudge_pixels <= 0 {
            return Err(Error::InvalidSetting("nudge size must be positive".into()));
        }
        Ok(())
    }
}

/// Built-in action for a gesture
pub fn default_action(gesture: GestureId) -> ActionSpec {
    match gesture {
        GestureId::LeftArmBend => ActionSpec::Keyboard(Key::Named(NamedKey::Left)),
        GestureId::RightArmBend => ActionSpec::Keyboard(Key::Named(NamedKey::Right)),
        GestureId::TiltLeft => ActionSpec::Keyboard(Key::Char('z')),
        GestureId::TiltRight => ActionSpec::Keyboard(Key::Char('x')),
        GestureId::Jump => ActionSpec::Keyboard(Key::Named(NamedKey::Space)),
        GestureId::LeftKneeRaise => ActionSpec::Keyboard(Key::Named(NamedKey::Down)),
        GestureId::KneeClap => ActionSpec::Keyboard(Key::Named(NamedKey::Shift)),
        GestureId::ArmRaised => ActionSpec::MouseNudge(NudgeDirection::Up),
        GestureId::ArmLowered => ActionSpec::MouseNudge(NudgeDirection::Down),
    }
}

/// Binding for every gesture in the closed set
#[derive(Debug, Clone, PartialEq)]
pub struct BindingTable {
    bindings: BTreeMap<GestureId, ActionBinding>,
}

impl Default for BindingTable {
    fn default() -> Self {
        let bindings = GestureId::ALL
            .iter()
            .map(|g| (*g, ActionBinding::new(default_action(*g), true)))
            .collect();
        Self { bindings }
    }
}

impl BindingTable {
    /// Load both files; a missing file means all defaults for that half
    pub fn load(keybindings_path: impl AsRef<Path>, toggles_path: impl AsRef<Path>) -> Result<Self> {
        let keybindings = read_optional(keybindings_path.as_ref())?;
        let toggles = read_optional(toggles_path.as_ref())?;

        let mut table = Self::default();
        if let Some((path, json)) = keybindings {
            table.apply_keybindings_json(&path, &json)?;
        }
        if let Some((path, json)) = toggles {
            table.apply_toggles_json(&path, &json)?;
        }
        Ok(table)
    }

    /// Overlay action strings from a keybindings JSON document
    pub fn apply_keybindings_json(&mut self, source: &str, json: &str) -> Result<()> {
        let map = parse_object(source, json)?;
        let has_new_name = map.contains_key(GestureId::LeftKneeRaise.as_str());

        for (name, value) in &map {
            let gesture = match resolve_name(source, name, has_new_name)? {
                Some(g) => g,
                None => continue,
            };
            let text = value.as_str().ok_or_else(|| Error::InvalidAction {
                gesture: name.clone(),
                value: value.to_string(),
            })?;
            let action: ActionSpec = text.parse().map_err(|_| Error::InvalidAction {
                gesture: name.clone(),
                value: text.to_string(),
            })?;
            debug!(gesture = %gesture, action = %action, "binding loaded");
            self.entry(gesture).action = action;
        }
        Ok(())
    }

    /// Overlay enable flags from a toggles JSON document
    pub fn apply_toggles_json(&mut self, source: &str, json: &str) -> Result<()> {
        let map = parse_object(source, json)?;
        let has_new_name = map.contains_key(GestureId::LeftKneeRaise.as_str());

        for (name, value) in &map {
            let gesture = match resolve_name(source, name, has_new_name)? {
                Some(g) => g,
                None => continue,
            };
            let enabled = value.as_bool().ok_or_else(|| {
                Error::InvalidSetting(format!("toggle '{}' in {} must be true or false", name, source))
            })?;
            self.entry(gesture).enabled = enabled;
        }
        Ok(())
    }

    pub fn get(&self, gesture: GestureId) -> ActionBinding {
        self.bindings
            .get(&gesture)
            .copied()
            .unwrap_or_else(|| ActionBinding::new(default_action(gesture), true))
    }

    pub fn set_enabled(&mut self, gesture: GestureId, enabled: bool) {
        self.entry(gesture).enabled = enabled;
    }

    pub fn set_action(&mut self, gesture: GestureId, action: ActionSpec) {
        self.entry(gesture).action = action;
    }

    pub fn iter(&self) -> impl Iterator<Item = (GestureId, ActionBinding)> + '_ {
        self.bindings.iter().map(|(g, b)| (*g, *b))
    }

    fn entry(&mut self, gesture: GestureId) -> &mut ActionBinding {
        self.bindings
            .entry(gesture)
            .or_insert_with(|| ActionBinding::new(default_action(gesture), true))
    }
}

fn read_optional(path: &Path) -> Result<Option<(String, String)>> {
    let shown = path.display().to_string();
    match std::fs::read_to_string(path) {
        Ok(json) => Ok(Some((shown, json))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            info!(path = %shown, "config file not found, using defaults");
            Ok(None)
        }
        Err(source) => Err(Error::ConfigIo { path: shown, source }),
    }
}

fn parse_object(source: &str, json: &str) -> Result<Map<String, Value>> {
    match serde_json::from_str::<Value>(json) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(Error::InvalidSetting(format!(
            "{} must hold a JSON object, found {}",
            source, other
        ))),
        Err(e) => Err(Error::ConfigParse { path: source.to_string(), source: e }),
    }
}

/// Map a config key to a gesture; `squat` is skipped when the new name is present
fn resolve_name(source: &str, name: &str, has_new_name: bool) -> Result<Option<GestureId>> {
    if let Some(g) = GestureId::from_name(name) {
        return Ok(Some(g));
    }
    if name == LEGACY_SQUAT_KEY {
        return Ok((!has_new_name).then_some(GestureId::LeftKneeRaise));
    }
    Err(Error::UnknownGesture { path: source.to_string(), name: name.to_string() })
}
