use std::path::Path;

use crate::foundation::error::{LoopError, LoopResult};
use crate::stroke::model::Stroke;

pub const DEFAULT_DURATION_MS: f64 = 10_000.0;
pub const DEFAULT_PRESENCE: f64 = 0.8;

fn default_duration() -> f64 {
    DEFAULT_DURATION_MS
}

fn default_speed() -> f64 {
    1.0
}

fn default_presence() -> f64 {
    DEFAULT_PRESENCE
}

/// Persisted drawing: strokes plus the loop settings they were drawn with.
///
/// Camera and symmetry are viewing state and are never stored.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    #[serde(default)]
    pub strokes: Vec<Stroke>,
    #[serde(default = "default_duration")]
    pub duration: f64,
    #[serde(default = "default_speed")]
    pub speed: f64,
    #[serde(default)]
    pub ping_pong: bool,
    #[serde(default = "default_presence")]
    pub presence: f64,
    #[serde(default)]
    pub ghost: bool,
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self {
            strokes: Vec::new(),
            duration: DEFAULT_DURATION_MS,
            speed: 1.0,
            ping_pong: false,
            presence: DEFAULT_PRESENCE,
            ghost: false,
        }
    }
}

impl SessionSnapshot {
    pub fn from_json(s: &str) -> LoopResult<Self> {
        Ok(serde_json::from_str::<Self>(s)?.normalized())
    }

    pub fn from_path(path: impl AsRef<Path>) -> LoopResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            LoopError::validation(format!("open session JSON '{}': {e}", path.display()))
        })?;
        Self::from_json(&text)
    }

    pub fn to_json_pretty(&self) -> LoopResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Replace unusable numbers with the load defaults.
    ///
    /// A zero or negative duration counts as missing.
    pub fn normalized(mut self) -> Self {
        if !(self.duration.is_finite() && self.duration > 0.0) {
            self.duration = DEFAULT_DURATION_MS;
        }
        if !self.speed.is_finite() {
            self.speed = 1.0;
        }
        if !self.presence.is_finite() {
            self.presence = DEFAULT_PRESENCE;
        }
        self
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/snapshot.rs"]
mod tests;
