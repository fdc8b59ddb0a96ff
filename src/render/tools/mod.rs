//! Per-tool stroke renderers.
//!
//! A renderer draws the time-gated points of one stroke. Every stochastic choice comes from a
//! [`SeededRandom`](crate::SeededRandom) keyed by the stroke seed, so redrawing a stroke at the
//! same time limit yields the same pixels.

pub(crate) mod ink;
pub(crate) mod line;
pub(crate) mod particles;
pub(crate) mod stamps;
pub(crate) mod watercolor;

use crate::assets::stamps::StampImageStore;
use crate::audio::resonance::Resonance;
use crate::render::surface::Surface;
use crate::stroke::model::{Stroke, StrokePoint, ToolKind};

/// Frame context handed to every renderer.
#[derive(Clone, Copy, Debug)]
pub struct ToolEnv<'a> {
    /// Loop time (ms) points are gated by.
    pub time_limit: f64,
    pub resonance: Resonance,
    /// Alpha already applied to the surface for this pass.
    pub alpha: f64,
    /// Loop duration (ms).
    pub duration: f64,
    pub presence: f64,
    pub images: &'a StampImageStore,
}

pub type ToolRenderer = fn(&mut dyn Surface, &Stroke, &[StrokePoint], &ToolEnv<'_>);

pub fn renderer_for(tool: ToolKind) -> ToolRenderer {
    match tool {
        ToolKind::Pencil => line::render_pencil,
        ToolKind::Brush => line::render_brush,
        ToolKind::Watercolor => watercolor::render_watercolor,
        ToolKind::Ink => ink::render_ink,
        ToolKind::ParticleFill => particles::render_particle_fill,
        ToolKind::Eraser => line::render_eraser,
        ToolKind::SoftEraser => line::render_soft_eraser,
        ToolKind::EmojiStamp => stamps::render_emoji,
        ToolKind::Text => stamps::render_text,
        ToolKind::ImageStamp => stamps::render_image,
    }
}

/// Pass alpha for a stroke.
///
/// Live: `min(1, 0.2 + presence * 0.9) * opacity`. Ghost: `(0.04 + presence * 0.08) * opacity`.
pub fn compute_alpha(is_ghost: bool, presence: f64, opacity: f64) -> f64 {
    if is_ghost {
        (0.04 + presence * 0.08) * opacity
    } else {
        (0.2 + presence * 0.9).min(1.0) * opacity
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/render/tools.rs"]
mod tests;
