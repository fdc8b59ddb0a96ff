use crate::foundation::core::{Point, Rgba8};
use crate::foundation::random::SeededRandom;

/// Drawing tool that produced a stroke.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToolKind {
    #[default]
    Pencil,
    Brush,
    Watercolor,
    Ink,
    ParticleFill,
    Eraser,
    SoftEraser,
    EmojiStamp,
    Text,
    ImageStamp,
}

impl ToolKind {
    pub const ALL: [ToolKind; 10] = [
        Self::Pencil,
        Self::Brush,
        Self::Watercolor,
        Self::Ink,
        Self::ParticleFill,
        Self::Eraser,
        Self::SoftEraser,
        Self::EmojiStamp,
        Self::Text,
        Self::ImageStamp,
    ];

    /// Stamps are placed with a single pointer-down and never accumulate points.
    pub fn is_stamp(self) -> bool {
        matches!(self, Self::EmojiStamp | Self::Text | Self::ImageStamp)
    }

    pub fn is_eraser(self) -> bool {
        matches!(self, Self::Eraser | Self::SoftEraser)
    }

    pub fn default_size(self) -> f64 {
        match self {
            Self::Brush | Self::Watercolor => 14.0,
            Self::Ink => 9.0,
            Self::ParticleFill => 12.0,
            Self::EmojiStamp | Self::Text => 16.0,
            Self::ImageStamp => 22.0,
            Self::Eraser => 32.0,
            Self::SoftEraser => 28.0,
            Self::Pencil => 4.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pencil => "pencil",
            Self::Brush => "brush",
            Self::Watercolor => "watercolor",
            Self::Ink => "ink",
            Self::ParticleFill => "particle-fill",
            Self::Eraser => "eraser",
            Self::SoftEraser => "soft-eraser",
            Self::EmojiStamp => "emoji-stamp",
            Self::Text => "text",
            Self::ImageStamp => "image-stamp",
        }
    }
}

impl std::fmt::Display for ToolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// World-space position stamped with the loop time (ms) it was captured at.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StrokePoint {
    pub x: f64,
    pub y: f64,
    pub t: f64,
}

impl StrokePoint {
    pub fn new(x: f64, y: f64, t: f64) -> Self {
        Self { x, y, t }
    }

    pub fn at(pos: Point, t: f64) -> Self {
        Self::new(pos.x, pos.y, t)
    }

    pub fn pos(self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// One orbiting dot of a closed particle-fill region.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Particle {
    pub cx: f64,
    pub cy: f64,
    pub orbit: f64,
    pub radius: f64,
    pub speed: f64,
    pub phase: f64,
    pub alpha: f64,
}

fn default_opacity() -> f64 {
    1.0
}

/// A recorded gesture together with everything needed to replay it.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stroke {
    pub tool: ToolKind,
    pub color: String,
    pub size: f64,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    pub points: Vec<StrokePoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u32>,
    #[serde(default)]
    pub rotation: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Key into the stamp image store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub outline: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polygon: Option<Vec<StrokePoint>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub particles: Option<Vec<Particle>>,
}

impl Stroke {
    pub fn new(tool: ToolKind, color: impl Into<String>, size: f64) -> Self {
        Self {
            tool,
            color: color.into(),
            size,
            opacity: 1.0,
            points: Vec::new(),
            seed: None,
            rotation: 0.0,
            emoji: None,
            text: None,
            image: None,
            outline: false,
            closed_at: None,
            polygon: None,
            particles: None,
        }
    }

    pub fn with_points(mut self, points: impl IntoIterator<Item = StrokePoint>) -> Self {
        self.points.extend(points);
        self
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Assign a seed from `source` unless one is already set. Returns the stroke's seed.
    pub fn ensure_seed(&mut self, source: &mut SeededRandom) -> u32 {
        match self.seed.filter(|s| *s != 0) {
            Some(seed) => seed,
            None => {
                let seed = source.next_seed().max(1);
                self.seed = Some(seed);
                seed
            }
        }
    }

    /// Seed for procedural rendering, `fallback` for strokes that never received one.
    pub fn seed_or(&self, fallback: u32) -> u32 {
        self.seed.filter(|s| *s != 0).unwrap_or(fallback)
    }

    /// Non-stamp strokes need at least two points to be worth keeping.
    pub fn is_committable(&self) -> bool {
        !self.points.is_empty() && (self.points.len() > 1 || self.tool.is_stamp())
    }

    pub fn last_point(&self) -> Option<StrokePoint> {
        self.points.last().copied()
    }

    /// Points captured at or before `time_limit`.
    pub fn points_until(&self, time_limit: f64) -> Vec<StrokePoint> {
        self.points
            .iter()
            .copied()
            .filter(|p| p.t <= time_limit)
            .collect()
    }

    /// Stroke colour, falling back to the default ink when unparseable.
    pub fn paint(&self) -> Rgba8 {
        Rgba8::parse_or_default(&self.color)
    }

    /// Opacity clamped to `[0, 1]`; zero or invalid values count as fully opaque.
    pub fn effective_opacity(&self) -> f64 {
        if self.opacity.is_finite() && self.opacity > 0.0 {
            self.opacity.min(1.0)
        } else {
            1.0
        }
    }

    /// Scale every captured time by `ratio`, clamped to `duration`.
    pub fn rescale_time(&mut self, ratio: f64, duration: f64) {
        let scale = |t: f64| (t * ratio).clamp(0.0, duration);
        for p in &mut self.points {
            p.t = scale(p.t);
        }
        if let Some(polygon) = &mut self.polygon {
            for p in polygon {
                p.t = scale(p.t);
            }
        }
        if let Some(closed_at) = &mut self.closed_at {
            *closed_at = scale(*closed_at);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stroke/model.rs"]
mod tests;
