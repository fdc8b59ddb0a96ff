//! The drawing session context.
//!
//! [`LoopEngine`] owns every piece of mutable session state (clock, stroke history, capture,
//! camera, render and tool settings, audio sampler, seed stream) and is driven from a single
//! thread: pointer handlers and one [`LoopEngine::tick`] per display frame.

use crate::assets::stamps::StampImageStore;
use crate::audio::resonance::{Resonance, ResonanceSampler, SpectrumSource};
use crate::camera::{Camera, CameraModel};
use crate::clock::loop_clock::{LoopClock, LoopState};
use crate::clock::time_source::{MonotonicTime, TimeSource};
use crate::config::EngineConfig;
use crate::foundation::core::{Affine, Point, Rgba8, Vec2};
use crate::foundation::error::LoopResult;
use crate::foundation::math::{clamp_finite, distance};
use crate::foundation::random::SeededRandom;
use crate::render::pipeline::{self, FrameInput, MAX_SYMMETRY, RenderSettings};
use crate::render::surface::Surface;
use crate::session::snapshot::SessionSnapshot;
use crate::stroke::capture::{CaptureEvent, StrokeCapture, ToolSettings};
use crate::stroke::history::StrokeHistory;
use crate::stroke::model::{Stroke, StrokePoint, ToolKind};

/// Maximum absolute rotation given to a new stroke, in radians.
const MAX_STROKE_ROTATION: f64 = 0.2;

pub struct LoopEngine {
    config: EngineConfig,
    clock: LoopClock,
    history: StrokeHistory,
    capture: StrokeCapture,
    camera: CameraModel,
    settings: RenderSettings,
    free_navigation: bool,
    tools: ToolSettings,
    sampler: ResonanceSampler,
    resonance: Resonance,
    seeds: SeededRandom,
    images: StampImageStore,
}

impl std::fmt::Debug for LoopEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoopEngine")
            .field("clock", &self.clock)
            .field("strokes", &self.history.len())
            .field("drawing", &self.capture.is_drawing())
            .field("camera", &self.camera.camera())
            .field("settings", &self.settings)
            .field("free_navigation", &self.free_navigation)
            .field("tools", &self.tools)
            .finish_non_exhaustive()
    }
}

impl Default for LoopEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl LoopEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self::with_time_source(config, Box::new(MonotonicTime::new()))
    }

    /// Engine whose clock reads `time`; tests and offline drivers pass a manual source.
    pub fn with_time_source(config: EngineConfig, time: Box<dyn TimeSource>) -> Self {
        let mut clock = LoopClock::with_time_source(config.duration_ms, time);
        clock.set_speed(config.speed);

        let mut tools = ToolSettings::default();
        tools.select_tool(config.tool);
        tools.color = config.color.clone();
        tools.set_size(config.size);

        let settings = RenderSettings {
            presence: clamp_finite(config.presence, 0.0, 1.0).unwrap_or(0.8),
            ..RenderSettings::default()
        };

        Self {
            clock,
            history: StrokeHistory::new(),
            capture: StrokeCapture::new(config.closure_threshold),
            camera: CameraModel::new(config.world_size),
            settings,
            free_navigation: false,
            tools,
            sampler: ResonanceSampler::new(config.sensitivity),
            resonance: Resonance::SILENT,
            seeds: SeededRandom::new(config.seed),
            images: StampImageStore::new(),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn inside_canvas(&self, screen: Point) -> bool {
        let radius = self.camera.viewport() / 2.0;
        distance(screen, self.camera.center()) <= radius
    }

    /// Pointer pressed at a viewport position.
    ///
    /// Presses outside the circular canvas, or while a text stamp awaits confirmation, are
    /// ignored.
    pub fn pointer_down(&mut self, screen: Point) -> CaptureEvent {
        if !self.inside_canvas(screen) || self.capture.pending_text().is_some() {
            return CaptureEvent::Ignored;
        }
        let world = self.camera.screen_to_world(screen);
        let time = self.clock.loop_state().time;
        self.capture_stroke(world, time)
    }

    /// Pointer moved. Leaving the circular canvas ends the stroke in progress.
    pub fn pointer_move(&mut self, screen: Point) -> CaptureEvent {
        if !self.capture.is_drawing() {
            return CaptureEvent::Ignored;
        }
        if !self.inside_canvas(screen) {
            return self.finalize_stroke();
        }
        let world = self.camera.screen_to_world(screen);
        let time = self.clock.loop_state().time;
        self.capture_stroke(world, time)
    }

    pub fn pointer_up(&mut self) -> CaptureEvent {
        self.finalize_stroke()
    }

    /// Record a world-space point at `loop_time`: opens a stroke if none is in progress,
    /// otherwise extends (or splits, on a loop wrap) the current one.
    pub fn capture_stroke(&mut self, world: Point, loop_time: f64) -> CaptureEvent {
        let point = StrokePoint::at(world, loop_time);
        if self.capture.is_drawing() {
            return self.capture.capture_point(
                point,
                self.clock.is_ping_pong(),
                self.clock.duration(),
                &mut self.history,
            );
        }
        let rotation = self
            .seeds
            .pick_in_range(-MAX_STROKE_ROTATION, MAX_STROKE_ROTATION);
        let mut stroke = self
            .tools
            .start_stroke(point, rotation, self.capture.text_draft());
        stroke.ensure_seed(&mut self.seeds);
        self.capture.begin(stroke, &mut self.history)
    }

    pub fn finalize_stroke(&mut self) -> CaptureEvent {
        self.capture.end(&mut self.history)
    }

    pub fn confirm_text(&mut self, value: &str) -> CaptureEvent {
        self.capture.confirm_text(value, &mut self.history)
    }

    pub fn cancel_text(&mut self) -> CaptureEvent {
        self.capture.cancel_text()
    }

    pub fn is_drawing(&self) -> bool {
        self.capture.is_drawing()
    }

    pub fn active_stroke(&self) -> Option<&Stroke> {
        self.capture.current()
    }

    pub fn pending_text(&self) -> Option<&Stroke> {
        self.capture.pending_text()
    }

    pub fn strokes(&self) -> &[Stroke] {
        self.history.strokes()
    }

    pub fn undo(&mut self) -> bool {
        self.history.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.history.redo()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Drop every stroke, including the one in progress.
    pub fn clear(&mut self) {
        self.history.clear();
        self.capture.reset();
        tracing::debug!("session cleared");
    }

    /// Advance the clock, sample audio and render a full frame.
    pub fn tick(&mut self, surface: &mut dyn Surface) -> LoopState {
        let state = self.clock.loop_state();
        self.resonance = self.sampler.sample();
        self.render_frame(surface, state.time, self.resonance);
        state
    }

    /// Clear `surface` and render the scene at `time_limit` through the live camera.
    pub fn render_frame(&self, surface: &mut dyn Surface, time_limit: f64, resonance: Resonance) {
        let frame = self.frame_input(time_limit, resonance, true, self.camera.view_transform());
        pipeline::render_frame(surface, &frame);
    }

    /// Render only the stroke in progress, for a separate overlay surface.
    pub fn render_overlay(&self, surface: &mut dyn Surface) {
        surface.clear();
        let frame = self.frame_input(
            self.clock.current_time(),
            self.resonance,
            true,
            self.camera.view_transform(),
        );
        pipeline::render_overlay(surface, &frame);
    }

    pub(crate) fn frame_input(
        &self,
        time_limit: f64,
        resonance: Resonance,
        clear: bool,
        view: Affine,
    ) -> FrameInput<'_> {
        FrameInput {
            strokes: self.history.strokes(),
            active: self.capture.current(),
            time_limit,
            duration: self.clock.duration(),
            resonance,
            settings: self.render_settings(),
            view,
            world_size: self.config.world_size,
            clear,
            images: &self.images,
        }
    }

    /// Settings the next frame renders with; symmetry is off during free navigation.
    pub fn render_settings(&self) -> RenderSettings {
        RenderSettings {
            symmetry: if self.free_navigation {
                1
            } else {
                self.settings.symmetry
            },
            ..self.settings
        }
    }

    pub fn resonance(&self) -> Resonance {
        self.resonance
    }

    pub fn loop_state(&mut self) -> LoopState {
        self.clock.loop_state()
    }

    pub fn clock(&self) -> &LoopClock {
        &self.clock
    }

    /// Change the loop length; existing strokes keep their relative timing.
    pub fn set_duration(&mut self, duration_ms: f64) -> f64 {
        if let Some(change) = self.clock.set_duration(duration_ms) {
            let ratio = change.ratio();
            if ratio.is_finite() && ratio > 0.0 {
                self.history.rescale_time(ratio, change.next);
                self.capture.rescale_time(ratio, change.next);
            }
        }
        self.clock.duration()
    }

    pub fn set_speed(&mut self, speed: f64) -> f64 {
        self.clock.set_speed(speed)
    }

    pub fn set_pause(&mut self, paused: Option<bool>) -> bool {
        self.clock.set_paused(paused)
    }

    pub fn set_ping_pong(&mut self, ping_pong: Option<bool>) -> bool {
        self.clock.set_ping_pong(ping_pong)
    }

    pub fn seek(&mut self, ms: f64) {
        self.clock.seek(ms);
    }

    pub fn seek_progress(&mut self, progress: f64) {
        self.clock.seek_progress(progress);
    }

    pub fn step(&mut self, delta_ms: f64) {
        self.clock.step(delta_ms);
    }

    pub fn reset_clock(&mut self) {
        self.clock.reset();
    }

    /// Presence in `[0, 1]`; non-finite input is ignored.
    pub fn set_presence(&mut self, presence: f64) -> f64 {
        match clamp_finite(presence, 0.0, 1.0) {
            Some(p) => self.settings.presence = p,
            None => tracing::warn!(presence, "ignoring non-finite presence"),
        }
        self.settings.presence
    }

    /// Set or toggle (`None`) the ghost preview.
    pub fn set_ghost(&mut self, ghost: Option<bool>) -> bool {
        self.settings.ghost = ghost.unwrap_or(!self.settings.ghost);
        self.settings.ghost
    }

    /// Radial copies, clamped to `1..=MAX_SYMMETRY`.
    pub fn set_symmetry(&mut self, symmetry: u32) -> u32 {
        self.settings.symmetry = symmetry.clamp(1, MAX_SYMMETRY);
        self.settings.symmetry
    }

    pub fn set_sensitivity(&mut self, sensitivity: f64) -> f64 {
        self.sampler.set_sensitivity(sensitivity);
        self.sampler.sensitivity()
    }

    /// Set or toggle (`None`) free navigation.
    ///
    /// Entering it turns symmetry off; leaving it returns the camera home.
    pub fn set_free_navigation(&mut self, enabled: Option<bool>) -> bool {
        let enabled = enabled.unwrap_or(!self.free_navigation);
        if enabled {
            self.settings.symmetry = 1;
        } else {
            self.camera.reset();
        }
        self.free_navigation = enabled;
        enabled
    }

    pub fn is_free_navigation(&self) -> bool {
        self.free_navigation
    }

    pub fn camera(&self) -> Camera {
        self.camera.camera()
    }

    pub fn screen_to_world(&self, screen: Point) -> Point {
        self.camera.screen_to_world(screen)
    }

    /// Zoom around a viewport anchor; enables free navigation.
    pub fn set_camera_zoom(&mut self, zoom: f64, anchor: Point) -> bool {
        let changed = self.camera.set_zoom(zoom, anchor);
        if changed && !self.free_navigation {
            self.set_free_navigation(Some(true));
        }
        changed
    }

    /// Drag the view by a viewport delta; enables free navigation.
    pub fn pan_camera(&mut self, screen_delta: Vec2) -> bool {
        let changed = self.camera.pan_by(screen_delta);
        if changed && !self.free_navigation {
            self.set_free_navigation(Some(true));
        }
        changed
    }

    pub fn reset_camera(&mut self) {
        self.camera.reset();
    }

    pub fn tool_settings(&self) -> &ToolSettings {
        &self.tools
    }

    /// Select a tool; the brush size resets to the tool's default.
    pub fn set_tool(&mut self, tool: ToolKind) {
        self.tools.select_tool(tool);
    }

    /// Unparseable colours are ignored.
    pub fn set_color(&mut self, color: &str) -> bool {
        match Rgba8::parse_hex(color) {
            Ok(_) => {
                self.tools.color = color.trim().to_owned();
                true
            }
            Err(err) => {
                tracing::debug!(%err, "ignoring colour");
                false
            }
        }
    }

    pub fn set_stroke_size(&mut self, size: f64) {
        self.tools.set_size(size);
    }

    pub fn set_stroke_opacity(&mut self, opacity: f64) {
        self.tools.set_opacity(opacity);
    }

    /// Empty input keeps the current emoji.
    pub fn set_emoji(&mut self, emoji: &str) {
        if !emoji.is_empty() {
            self.tools.emoji = emoji.to_owned();
        }
    }

    pub fn set_text_draft(&mut self, text: &str) {
        self.capture.set_text_draft(text);
    }

    pub fn set_stamp_outline(&mut self, outline: bool) {
        self.tools.outline = outline;
    }

    /// Select the image new image stamps use, by store key.
    pub fn set_stamp_image(&mut self, key: Option<&str>) {
        self.tools.image = key.map(str::to_owned);
    }

    /// Decode and register a stamp image, selecting it for new stamps.
    pub fn load_stamp_image(&mut self, key: &str, bytes: &[u8]) -> LoopResult<()> {
        self.images.load_bytes(key, bytes)?;
        self.set_stamp_image(Some(key));
        Ok(())
    }

    pub fn images(&self) -> &StampImageStore {
        &self.images
    }

    pub fn images_mut(&mut self) -> &mut StampImageStore {
        &mut self.images
    }

    pub fn set_audio_source(&mut self, source: Box<dyn SpectrumSource>) {
        self.sampler.set_source(source);
    }

    pub fn clear_audio_source(&mut self) -> Option<Box<dyn SpectrumSource>> {
        self.resonance = Resonance::SILENT;
        self.sampler.clear_source()
    }

    pub(crate) fn sampler(&self) -> &ResonanceSampler {
        &self.sampler
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            strokes: self.history.strokes().to_vec(),
            duration: self.clock.duration(),
            speed: self.clock.speed(),
            ping_pong: self.clock.is_ping_pong(),
            presence: self.settings.presence,
            ghost: self.settings.ghost,
        }
    }

    /// Replace the drawing wholesale. Playback resumes from the loop start.
    ///
    /// Stroke times are taken as-is; they are not rescaled to the new duration.
    #[tracing::instrument(level = "debug", skip_all, fields(strokes = snapshot.strokes.len()))]
    pub fn load_snapshot(&mut self, snapshot: SessionSnapshot) {
        let snapshot = snapshot.normalized();
        self.capture.reset();
        self.history.replace(snapshot.strokes);
        self.set_presence(snapshot.presence);
        self.settings.ghost = snapshot.ghost;
        self.clock.set_duration(snapshot.duration);
        self.clock.set_speed(snapshot.speed);
        self.clock.set_ping_pong(Some(snapshot.ping_pong));
        self.clock.set_paused(Some(false));
        self.clock.reset();
    }
}

#[cfg(test)]
#[path = "../tests/unit/engine.rs"]
mod tests;
