//! Per-frame orchestration: camera, symmetry, ghost and live passes, in-progress stroke.

use std::f64::consts::TAU;

use crate::assets::stamps::StampImageStore;
use crate::audio::resonance::Resonance;
use crate::foundation::core::{Affine, Point};
use crate::render::surface::Surface;
use crate::render::tools::{ToolEnv, compute_alpha, renderer_for};
use crate::stroke::model::{Stroke, StrokePoint};

pub const MAX_SYMMETRY: u32 = 24;

/// Scene-wide render toggles.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RenderSettings {
    /// Radial copies of the scene around the canvas centre (1 = none).
    pub symmetry: u32,
    pub ghost: bool,
    pub presence: f64,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            symmetry: 1,
            ghost: false,
            presence: 0.8,
        }
    }
}

/// Everything one frame needs besides the target surface.
#[derive(Clone, Copy, Debug)]
pub struct FrameInput<'a> {
    pub strokes: &'a [Stroke],
    /// Stroke being drawn right now; rendered last and ungated.
    pub active: Option<&'a Stroke>,
    pub time_limit: f64,
    pub duration: f64,
    pub resonance: Resonance,
    pub settings: RenderSettings,
    /// World to logical-viewport transform (the camera).
    pub view: Affine,
    /// Logical side length of the world canvas.
    pub world_size: f64,
    /// `false` while exporting: the caller owns the background.
    pub clear: bool,
    pub images: &'a StampImageStore,
}

impl FrameInput<'_> {
    fn base_transform(&self, surface: &dyn Surface) -> Affine {
        let (w, h) = surface.size_px();
        let world = if self.world_size > 0.0 {
            self.world_size
        } else {
            f64::from(w.max(1))
        };
        Affine::scale_non_uniform(f64::from(w) / world, f64::from(h) / world) * self.view
    }

    fn center(&self) -> Point {
        Point::new(self.world_size / 2.0, self.world_size / 2.0)
    }

    fn env(&self, time_limit: f64) -> ToolEnv<'_> {
        ToolEnv {
            time_limit,
            resonance: self.resonance,
            alpha: 1.0,
            duration: self.duration,
            presence: self.settings.presence,
            images: self.images,
        }
    }
}

/// Full frame: optional clear, loop passes, then the in-progress stroke.
#[tracing::instrument(level = "trace", skip_all, fields(time = frame.time_limit))]
pub fn render_frame(surface: &mut dyn Surface, frame: &FrameInput<'_>) {
    if frame.clear {
        surface.clear();
    }
    render_loop(surface, frame);
    render_overlay(surface, frame);
}

/// Ghost pass (whole loop, faint) under the live, time-gated pass.
pub fn render_loop(surface: &mut dyn Surface, frame: &FrameInput<'_>) {
    let base = frame.base_transform(surface);
    surface.save();
    surface.transform(base);
    if frame.settings.ghost {
        for stroke in frame.strokes {
            let points = stroke.points_until(frame.duration);
            draw_stroke(surface, frame, stroke, &points, frame.duration, true);
        }
    }
    for stroke in frame.strokes {
        let points = stroke.points_until(frame.time_limit);
        draw_stroke(surface, frame, stroke, &points, frame.time_limit, false);
    }
    surface.restore();
}

/// The stroke in progress, with every captured point.
pub fn render_overlay(surface: &mut dyn Surface, frame: &FrameInput<'_>) {
    let Some(stroke) = frame.active else {
        return;
    };
    let base = frame.base_transform(surface);
    surface.save();
    surface.transform(base);
    draw_stroke(surface, frame, stroke, &stroke.points, frame.time_limit, false);
    surface.restore();
}

fn draw_stroke(
    surface: &mut dyn Surface,
    frame: &FrameInput<'_>,
    stroke: &Stroke,
    points: &[StrokePoint],
    time_limit: f64,
    is_ghost: bool,
) {
    if points.is_empty() {
        return;
    }
    let alpha = compute_alpha(is_ghost, frame.settings.presence, stroke.effective_opacity());
    let env = ToolEnv {
        alpha,
        ..frame.env(time_limit)
    };
    let render = renderer_for(stroke.tool);
    let copies = frame.settings.symmetry.clamp(1, MAX_SYMMETRY);
    let center = frame.center();

    for k in 0..copies {
        surface.save();
        if k > 0 {
            surface.transform(Affine::rotate_about(TAU / f64::from(copies) * f64::from(k), center));
        }
        surface.multiply_alpha(alpha as f32);
        render(surface, stroke, points, &env);
        surface.restore();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
