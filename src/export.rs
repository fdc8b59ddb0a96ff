//! Offline loop export.
//!
//! Export samples the render pipeline at a fixed frame rate against simulated elapsed time, so
//! the output timing never depends on how fast frames actually render.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use kurbo::Shape as _;

use crate::audio::resonance::ResonanceSampler;
use crate::camera::CameraModel;
use crate::clock::loop_clock::{LoopClock, fold_loop_time};
use crate::config::ExportConfig;
use crate::encode::sink::{AudioInputConfig, FrameSink, SinkConfig};
use crate::engine::LoopEngine;
use crate::foundation::core::{Fps, FrameIndex, Rect, Rgba8};
use crate::foundation::error::{LoopError, LoopResult};
use crate::render::cpu::CpuSurface;
use crate::render::pipeline;
use crate::render::surface::Surface;
use crate::render::text::FontSource;

/// Upper bound on frames in one export, one hour at 30 fps.
pub const MAX_EXPORT_FRAMES: u64 = 108_000;

/// Frame schedule for one full loop cycle.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportPlan {
    pub duration_ms: f64,
    pub speed: f64,
    pub ping_pong: bool,
    pub fps: u32,
    /// Wall-clock length of one cycle: `duration * (ping_pong ? 2 : 1) / speed`.
    pub record_length_ms: f64,
    /// Frames including both cycle endpoints.
    pub frame_count: u64,
}

impl ExportPlan {
    pub fn new(duration_ms: f64, speed: f64, ping_pong: bool, fps: u32) -> LoopResult<Self> {
        if fps == 0 {
            return Err(LoopError::validation("export fps must be non-zero"));
        }
        if !(duration_ms.is_finite() && duration_ms > 0.0 && speed.is_finite() && speed > 0.0) {
            return Err(LoopError::validation(
                "export needs a positive loop duration and speed",
            ));
        }
        let cycles = if ping_pong { 2.0 } else { 1.0 };
        let record_length_ms = duration_ms * cycles / speed;
        let frames = (record_length_ms * f64::from(fps) / 1000.0).round();
        if !(frames < MAX_EXPORT_FRAMES as f64) {
            return Err(LoopError::validation(format!(
                "export of {record_length_ms} ms at {fps} fps exceeds {MAX_EXPORT_FRAMES} frames"
            )));
        }
        let frame_count = frames as u64 + 1;
        Ok(Self {
            duration_ms,
            speed,
            ping_pong,
            fps,
            record_length_ms,
            frame_count,
        })
    }

    pub fn from_clock(clock: &LoopClock, fps: u32) -> LoopResult<Self> {
        Self::new(clock.duration(), clock.speed(), clock.is_ping_pong(), fps)
    }

    /// Simulated wall-clock time of frame `i`.
    pub fn elapsed_ms(&self, i: u64) -> f64 {
        i as f64 * 1000.0 / f64::from(self.fps)
    }

    /// Loop time shown by frame `i`.
    pub fn loop_time(&self, i: u64) -> f64 {
        fold_loop_time(self.elapsed_ms(i) * self.speed, self.duration_ms, self.ping_pong).time
    }
}

/// Shared flag checked once per exported frame.
#[derive(Clone, Debug, Default)]
pub struct ExportCancel(Arc<AtomicBool>);

impl ExportCancel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[derive(Clone, Debug)]
pub struct ExportOptions {
    pub fps: u32,
    /// Output width and height in pixels.
    pub size: u32,
    pub background: Rgba8,
    pub disk: Rgba8,
    pub disk_inset: f64,
    pub font: Option<FontSource>,
    pub audio: Option<AudioInputConfig>,
    pub cancel: Option<ExportCancel>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        let cfg = ExportConfig::default();
        Self {
            fps: cfg.fps,
            size: cfg.size,
            background: Rgba8::parse_or_default(&cfg.background),
            disk: Rgba8::WHITE,
            disk_inset: cfg.disk_inset,
            font: None,
            audio: None,
            cancel: None,
        }
    }
}

impl ExportOptions {
    pub fn from_config(cfg: &ExportConfig) -> LoopResult<Self> {
        Ok(Self {
            fps: cfg.fps,
            size: cfg.size,
            background: Rgba8::parse_hex(&cfg.background)?,
            disk: Rgba8::parse_hex(&cfg.disk)?,
            disk_inset: cfg.disk_inset,
            ..Self::default()
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExportStats {
    pub frames: u64,
    pub record_length_ms: f64,
}

/// Calls [`FrameSink::abort`] unless disarmed after a successful `end`.
struct AbortGuard<'a> {
    sink: &'a mut dyn FrameSink,
    armed: bool,
}

impl Drop for AbortGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.sink.abort();
        }
    }
}

/// Render one loop cycle of `engine` into `sink`.
///
/// Fails with [`LoopError::EmptyInput`] before allocating anything when there is nothing drawn.
/// The sink is aborted on every error path, including cancellation.
#[tracing::instrument(level = "info", skip_all, fields(fps = opts.fps, size = opts.size))]
pub fn export_loop(
    engine: &LoopEngine,
    sink: &mut dyn FrameSink,
    opts: &ExportOptions,
) -> LoopResult<ExportStats> {
    if engine.strokes().is_empty() && engine.active_stroke().is_none() {
        return Err(LoopError::empty_input("add a stroke before exporting"));
    }
    let plan = ExportPlan::from_clock(engine.clock(), opts.fps)?;
    let mut surface = CpuSurface::new(opts.size, opts.size)?;
    if let Some(font) = &opts.font {
        surface = surface.with_font(font)?;
    }
    // Detached from the live source so playback and analyser smoothing stay untouched.
    let mut audio = ResonanceSampler::new(engine.sampler().sensitivity());
    if let Some(source) = engine.sampler().source().and_then(|s| s.fork()) {
        audio.set_source(source);
    }
    let home = CameraModel::new(engine.config().world_size).view_transform();

    let size = f64::from(opts.size);
    let radius = (size / 2.0 - opts.disk_inset).max(0.0);
    let background = Rect::new(0.0, 0.0, size, size).to_path(0.1);
    let disk = kurbo::Circle::new((size / 2.0, size / 2.0), radius).to_path(0.1);

    sink.begin(SinkConfig {
        width: opts.size,
        height: opts.size,
        fps: Fps::new(opts.fps, 1)?,
        audio: opts.audio.clone(),
    })?;
    let mut guard = AbortGuard { sink, armed: true };

    tracing::info!(
        frames = plan.frame_count,
        record_length_ms = plan.record_length_ms,
        "export started"
    );
    for i in 0..plan.frame_count {
        if opts.cancel.as_ref().is_some_and(ExportCancel::is_cancelled) {
            tracing::info!(frame = i, "export cancelled");
            return Err(LoopError::cancelled("export cancelled"));
        }
        let elapsed = plan.elapsed_ms(i);
        let time = plan.loop_time(i);
        if let Some(source) = audio.source_mut() {
            source.seek_ms(elapsed);
        }
        let resonance = audio.sample();

        surface.clear();
        surface.fill_path(&background, opts.background);
        surface.fill_path(&disk, opts.disk);
        surface.save();
        surface.clip(&disk);
        let input = engine.frame_input(time, resonance, false, home);
        pipeline::render_frame(&mut surface, &input);
        surface.restore();

        let frame = surface.finish()?;
        guard.sink.push_frame(FrameIndex(i), &frame)?;
    }

    guard.sink.end()?;
    guard.armed = false;
    tracing::info!(frames = plan.frame_count, "export finished");
    Ok(ExportStats {
        frames: plan.frame_count,
        record_length_ms: plan.record_length_ms,
    })
}

#[cfg(test)]
#[path = "../tests/unit/export.rs"]
mod tests;
