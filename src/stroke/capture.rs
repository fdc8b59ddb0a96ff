//! Pointer gestures to committed strokes.
//!
//! Points are stamped with loop time. When the loop wraps while a stroke is open, the stroke is
//! split so that no stroke ever runs backward in time.

use std::f64::consts::TAU;

use crate::foundation::core::Point;
use crate::foundation::geometry::{centroid, is_closed_shape};
use crate::foundation::random::SeededRandom;
use crate::stroke::history::StrokeHistory;
use crate::stroke::model::{Particle, Stroke, StrokePoint, ToolKind};

pub const MAX_TEXT_CHARS: usize = 120;
pub const DEFAULT_EMOJI: &str = "\u{2728}";
pub const MIN_OPACITY: f64 = 0.05;

/// Collapse CR/LF/TAB runs to one space, trim, and cap at [`MAX_TEXT_CHARS`].
pub fn sanitize_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_break = false;
    for c in raw.chars() {
        if matches!(c, '\r' | '\n' | '\t') {
            if !in_break {
                out.push(' ');
            }
            in_break = true;
        } else {
            out.push(c);
            in_break = false;
        }
    }
    out.trim().chars().take(MAX_TEXT_CHARS).collect()
}

/// Orbiting particle set for a closed region, drawn from a stream cloned off `seed`.
pub fn generate_particles(polygon: &[StrokePoint], size: f64, seed: u32) -> Vec<Particle> {
    let mut rand = SeededRandom::new(seed).clone_stream();
    let density = (size * 4.0).floor().clamp(12.0, 120.0) as usize;
    let pts: Vec<Point> = polygon.iter().map(|p| p.pos()).collect();
    let center = centroid(&pts);

    (0..density)
        .map(|_| Particle {
            cx: center.x + (rand.next_f64() - 0.5) * size * 2.0,
            cy: center.y + (rand.next_f64() - 0.5) * size * 2.0,
            orbit: rand.next_f64() * size * 3.0 + size,
            radius: (rand.next_f64() * (size * 0.4).max(3.0)).max(1.2),
            speed: rand.pick_in_range(0.3, 1.0),
            phase: rand.next_f64() * TAU,
            alpha: rand.pick_in_range(0.35, 0.75),
        })
        .collect()
}

/// Freeze the polygon and spawn particles when a particle-fill stroke closes on itself.
pub fn close_region(stroke: &mut Stroke, threshold: f64) -> bool {
    if stroke.tool != ToolKind::ParticleFill {
        return false;
    }
    let pts: Vec<Point> = stroke.points.iter().map(|p| p.pos()).collect();
    let Some(last) = stroke.last_point() else {
        return false;
    };
    if !is_closed_shape(&pts, threshold) {
        return false;
    }

    stroke.closed_at = Some(last.t);
    stroke.particles = Some(generate_particles(
        &stroke.points,
        stroke.size,
        stroke.seed_or(1),
    ));
    stroke.polygon = Some(stroke.points.clone());
    true
}

/// Brush settings copied into every new stroke.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ToolSettings {
    pub tool: ToolKind,
    pub color: String,
    pub size: f64,
    pub opacity: f64,
    pub emoji: String,
    pub image: Option<String>,
    pub outline: bool,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            tool: ToolKind::Pencil,
            color: crate::foundation::core::PALETTE[0].to_owned(),
            size: 12.0,
            opacity: 1.0,
            emoji: DEFAULT_EMOJI.to_owned(),
            image: None,
            outline: true,
        }
    }
}

impl ToolSettings {
    /// Switch tool and reset the size to the tool's default.
    pub fn select_tool(&mut self, tool: ToolKind) {
        self.tool = tool;
        self.size = tool.default_size();
    }

    /// Non-finite sizes fall back to the tool default; the result is at least 1.
    pub fn set_size(&mut self, size: f64) {
        let size = if size.is_finite() {
            size
        } else {
            self.tool.default_size()
        };
        self.size = size.max(1.0);
    }

    /// Opacity in `[0.05, 1]`; non-finite input is ignored.
    pub fn set_opacity(&mut self, opacity: f64) {
        if opacity.is_finite() {
            self.opacity = opacity.clamp(MIN_OPACITY, 1.0);
        }
    }

    /// Fresh stroke with a single point.
    pub fn start_stroke(&self, first: StrokePoint, rotation: f64, text_draft: &str) -> Stroke {
        let size = if self.size > 0.0 {
            self.size
        } else {
            self.tool.default_size()
        };
        let mut stroke = Stroke::new(self.tool, self.color.clone(), size);
        stroke.opacity = if self.opacity > 0.0 { self.opacity } else { 1.0 };
        stroke.points.push(first);
        stroke.rotation = rotation;
        stroke.emoji = Some(self.emoji.clone());
        stroke.text = (!text_draft.is_empty()).then(|| text_draft.to_owned());
        stroke.image = self.image.clone();
        stroke.outline = self.outline;
        stroke
    }
}

/// What a capture call did to the session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CaptureEvent {
    /// Nothing to do, e.g. a move without a stroke in progress.
    Ignored,
    Started,
    Extended,
    /// The loop wrapped: the previous part was committed and a continuation opened.
    Split,
    Committed,
    Discarded,
    /// A text stamp waits for [`StrokeCapture::confirm_text`] or [`StrokeCapture::cancel_text`].
    TextRequested { placeholder: String },
}

/// In-progress stroke state between pointer-down and pointer-up.
#[derive(Clone, Debug)]
pub struct StrokeCapture {
    current: Option<Stroke>,
    pending_text: Option<Stroke>,
    text_draft: String,
    closure_threshold: f64,
}

impl Default for StrokeCapture {
    fn default() -> Self {
        Self::new(crate::foundation::geometry::CLOSURE_THRESHOLD)
    }
}

impl StrokeCapture {
    pub fn new(closure_threshold: f64) -> Self {
        Self {
            current: None,
            pending_text: None,
            text_draft: String::new(),
            closure_threshold,
        }
    }

    pub fn current(&self) -> Option<&Stroke> {
        self.current.as_ref()
    }

    pub fn is_drawing(&self) -> bool {
        self.current.is_some()
    }

    pub fn pending_text(&self) -> Option<&Stroke> {
        self.pending_text.as_ref()
    }

    pub fn text_draft(&self) -> &str {
        &self.text_draft
    }

    pub fn set_text_draft(&mut self, text: &str) {
        self.text_draft = sanitize_text(text);
    }

    /// Open a stroke. Stamps are finalized immediately.
    pub fn begin(&mut self, stroke: Stroke, history: &mut StrokeHistory) -> CaptureEvent {
        if stroke.tool.is_stamp() {
            self.current = None;
            return self.finalize(stroke, history);
        }
        if self.current.is_some() {
            tracing::debug!("replacing unfinished stroke");
        }
        self.current = Some(stroke);
        CaptureEvent::Started
    }

    /// Append a point captured at loop time `point.t`.
    ///
    /// Without ping-pong a time that goes backward means the loop wrapped; the open stroke is
    /// then closed at `duration` and continued from `t = 0`.
    pub fn capture_point(
        &mut self,
        point: StrokePoint,
        ping_pong: bool,
        duration: f64,
        history: &mut StrokeHistory,
    ) -> CaptureEvent {
        let Some(stroke) = self.current.as_mut() else {
            return CaptureEvent::Ignored;
        };
        let Some(last) = stroke.last_point() else {
            stroke.points.push(point);
            return CaptureEvent::Extended;
        };

        if ping_pong || point.t >= last.t {
            stroke.points.push(point);
            return CaptureEvent::Extended;
        }

        let mut completed = stroke.clone();
        completed.points.push(StrokePoint { t: duration, ..last });
        history.commit(completed);

        stroke.points = vec![StrokePoint { t: 0.0, ..last }, point];
        tracing::debug!(duration, "loop wrapped mid-stroke, split");
        CaptureEvent::Split
    }

    /// Close the stroke in progress (pointer-up or pointer left the canvas).
    pub fn end(&mut self, history: &mut StrokeHistory) -> CaptureEvent {
        match self.current.take() {
            Some(stroke) => self.finalize(stroke, history),
            None => CaptureEvent::Ignored,
        }
    }

    fn finalize(&mut self, mut stroke: Stroke, history: &mut StrokeHistory) -> CaptureEvent {
        if stroke.points.is_empty() {
            return CaptureEvent::Discarded;
        }
        close_region(&mut stroke, self.closure_threshold);

        if stroke.tool == ToolKind::Text {
            self.pending_text = Some(stroke);
            return CaptureEvent::TextRequested {
                placeholder: self.text_draft.clone(),
            };
        }
        if history.commit(stroke) {
            CaptureEvent::Committed
        } else {
            CaptureEvent::Discarded
        }
    }

    /// Resolve a pending text stamp. Empty text after sanitizing discards it.
    pub fn confirm_text(&mut self, value: &str, history: &mut StrokeHistory) -> CaptureEvent {
        let Some(mut stroke) = self.pending_text.take() else {
            return CaptureEvent::Ignored;
        };
        let value = sanitize_text(value);
        if value.is_empty() {
            return CaptureEvent::Discarded;
        }
        stroke.text = Some(value.clone());
        self.text_draft = value;
        if history.commit(stroke) {
            CaptureEvent::Committed
        } else {
            CaptureEvent::Discarded
        }
    }

    pub fn cancel_text(&mut self) -> CaptureEvent {
        match self.pending_text.take() {
            Some(_) => CaptureEvent::Discarded,
            None => CaptureEvent::Ignored,
        }
    }

    /// Drop any unfinished work without committing it.
    pub fn reset(&mut self) {
        self.current = None;
        self.pending_text = None;
    }

    /// Rescale captured times of the open and pending strokes.
    pub fn rescale_time(&mut self, ratio: f64, duration: f64) {
        for s in self.current.iter_mut().chain(self.pending_text.iter_mut()) {
            s.rescale_time(ratio, duration);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stroke/capture.rs"]
mod tests;
