//! Engine and export configuration.
//!
//! Loaded from JSON (every field optional) and adjusted by `LOOPBRUSH_*` environment variables.
//! Out-of-range numbers are clamped by the engine when applied, not rejected here.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::foundation::error::{LoopError, LoopResult};
use crate::stroke::model::ToolKind;

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    pub duration_ms: f64,
    pub speed: f64,
    pub presence: f64,
    pub sensitivity: f64,
    /// Logical side of the square world canvas.
    pub world_size: f64,
    pub closure_threshold: f64,
    pub tool: ToolKind,
    pub color: String,
    pub size: f64,
    /// Seed of the stream new strokes draw their seeds and rotations from.
    pub seed: u32,
    pub export: ExportConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            duration_ms: 10_000.0,
            speed: 1.0,
            presence: 0.8,
            sensitivity: 0.5,
            world_size: 640.0,
            closure_threshold: 12.0,
            tool: ToolKind::Pencil,
            color: "#1e293b".to_owned(),
            size: 12.0,
            seed: 1,
            export: ExportConfig::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExportConfig {
    pub fps: u32,
    /// Output width and height in pixels.
    pub size: u32,
    pub background: String,
    pub disk: String,
    /// Gap between the disk edge and the frame edge, in output pixels.
    pub disk_inset: f64,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            fps: 30,
            size: 640,
            background: "#f1f5f9".to_owned(),
            disk: "#ffffff".to_owned(),
            disk_inset: 5.0,
        }
    }
}

impl EngineConfig {
    pub fn from_reader<R: std::io::Read>(r: R) -> LoopResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| LoopError::validation(format!("parse engine config JSON: {e}")))
    }

    pub fn from_path(path: impl AsRef<Path>) -> LoopResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            LoopError::validation(format!("open engine config '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Apply `LOOPBRUSH_*` overrides from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from `lookup`; unparseable values are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        fn parsed<T: std::str::FromStr>(
            lookup: &impl Fn(&str) -> Option<String>,
            key: &str,
        ) -> Option<T> {
            let raw = lookup(key)?;
            let value = raw.trim().parse::<T>().ok();
            if value.is_none() {
                tracing::warn!(key, %raw, "ignoring unparseable override");
            }
            value
        }

        if let Some(v) = parsed(&lookup, "LOOPBRUSH_DURATION_MS") {
            self.duration_ms = v;
        }
        if let Some(v) = parsed(&lookup, "LOOPBRUSH_SPEED") {
            self.speed = v;
        }
        if let Some(v) = parsed(&lookup, "LOOPBRUSH_PRESENCE") {
            self.presence = v;
        }
        if let Some(v) = parsed(&lookup, "LOOPBRUSH_SENSITIVITY") {
            self.sensitivity = v;
        }
        if let Some(v) = parsed::<u32>(&lookup, "LOOPBRUSH_EXPORT_FPS").filter(|&n| n > 0) {
            self.export.fps = v;
        }
        if let Some(v) = parsed::<u32>(&lookup, "LOOPBRUSH_EXPORT_SIZE").filter(|&n| n > 0) {
            self.export.size = v;
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
