use crate::assets::stamps::StampImage;
use crate::foundation::core::{Affine, BezPath, Rect, Rgba8};

/// How new paint combines with what is already on the surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Composite {
    #[default]
    SourceOver,
    /// Removes destination coverage proportionally to the source alpha.
    DestinationOut,
}

/// Round-capped, round-joined stroke parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineStyle {
    pub width: f64,
}

impl LineStyle {
    pub fn new(width: f64) -> Self {
        Self { width }
    }
}

/// Immediate-mode 2D drawing target.
///
/// State (`transform`, alpha, composite mode, clip) behaves like a canvas context: `save` pushes
/// a copy, `restore` pops it and drops every clip pushed since the matching `save`.
/// `transform` post-multiplies the current transform.
pub trait Surface {
    /// Device size in pixels.
    fn size_px(&self) -> (u32, u32);

    /// Erase everything drawn so far and reset the state stack.
    fn clear(&mut self);

    fn save(&mut self);
    fn restore(&mut self);
    fn transform(&mut self, t: Affine);
    /// Multiply the global alpha applied to subsequent draws.
    fn multiply_alpha(&mut self, alpha: f32);
    fn set_composite(&mut self, composite: Composite);
    fn clip(&mut self, path: &BezPath);

    fn fill_path(&mut self, path: &BezPath, color: Rgba8);
    fn stroke_path(&mut self, path: &BezPath, style: &LineStyle, color: Rgba8);
    /// Draw `text` centred (horizontally and vertically) on the current origin.
    fn fill_text(&mut self, text: &str, font_px: f64, color: Rgba8);
    fn draw_image(&mut self, image: &StampImage, dest: Rect);
}

/// One recorded draw call with the state it was issued under.
#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceOp {
    Clear,
    Clip {
        transform: Affine,
    },
    Fill {
        transform: Affine,
        alpha: f32,
        composite: Composite,
        color: Rgba8,
        bounds: Rect,
    },
    Stroke {
        transform: Affine,
        alpha: f32,
        composite: Composite,
        color: Rgba8,
        width: f64,
        bounds: Rect,
    },
    Text {
        transform: Affine,
        alpha: f32,
        text: String,
        font_px: f64,
    },
    Image {
        transform: Affine,
        alpha: f32,
        dest: Rect,
    },
}

impl SurfaceOp {
    pub fn alpha(&self) -> Option<f32> {
        match self {
            Self::Fill { alpha, .. }
            | Self::Stroke { alpha, .. }
            | Self::Text { alpha, .. }
            | Self::Image { alpha, .. } => Some(*alpha),
            Self::Clear | Self::Clip { .. } => None,
        }
    }

    pub fn transform(&self) -> Option<Affine> {
        match self {
            Self::Clip { transform }
            | Self::Fill { transform, .. }
            | Self::Stroke { transform, .. }
            | Self::Text { transform, .. }
            | Self::Image { transform, .. } => Some(*transform),
            Self::Clear => None,
        }
    }

    pub fn composite(&self) -> Composite {
        match self {
            Self::Fill { composite, .. } | Self::Stroke { composite, .. } => *composite,
            _ => Composite::SourceOver,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct RecordState {
    transform: Affine,
    alpha: f32,
    composite: Composite,
}

impl Default for RecordState {
    fn default() -> Self {
        Self {
            transform: Affine::IDENTITY,
            alpha: 1.0,
            composite: Composite::SourceOver,
        }
    }
}

/// Surface that records draw calls instead of rasterizing them.
///
/// Lets hosts and tests inspect what a frame would draw without a raster backend.
#[derive(Clone, Debug)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    state: RecordState,
    saved: Vec<RecordState>,
    ops: Vec<SurfaceOp>,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            state: RecordState::default(),
            saved: Vec::new(),
            ops: Vec::new(),
        }
    }

    pub fn ops(&self) -> &[SurfaceOp] {
        &self.ops
    }

    /// Draw calls only, skipping clears and clips.
    pub fn draws(&self) -> impl Iterator<Item = &SurfaceOp> {
        self.ops
            .iter()
            .filter(|op| !matches!(op, SurfaceOp::Clear | SurfaceOp::Clip { .. }))
    }

    /// Current `save` nesting depth.
    pub fn depth(&self) -> usize {
        self.saved.len()
    }
}

impl Surface for RecordingSurface {
    fn size_px(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        self.ops.clear();
        self.ops.push(SurfaceOp::Clear);
        self.state = RecordState::default();
        self.saved.clear();
    }

    fn save(&mut self) {
        self.saved.push(self.state);
    }

    fn restore(&mut self) {
        if let Some(s) = self.saved.pop() {
            self.state = s;
        }
    }

    fn transform(&mut self, t: Affine) {
        self.state.transform *= t;
    }

    fn multiply_alpha(&mut self, alpha: f32) {
        self.state.alpha *= alpha;
    }

    fn set_composite(&mut self, composite: Composite) {
        self.state.composite = composite;
    }

    fn clip(&mut self, _path: &BezPath) {
        self.ops.push(SurfaceOp::Clip {
            transform: self.state.transform,
        });
    }

    fn fill_path(&mut self, path: &BezPath, color: Rgba8) {
        use kurbo::Shape as _;
        self.ops.push(SurfaceOp::Fill {
            transform: self.state.transform,
            alpha: self.state.alpha,
            composite: self.state.composite,
            color,
            bounds: path.bounding_box(),
        });
    }

    fn stroke_path(&mut self, path: &BezPath, style: &LineStyle, color: Rgba8) {
        use kurbo::Shape as _;
        self.ops.push(SurfaceOp::Stroke {
            transform: self.state.transform,
            alpha: self.state.alpha,
            composite: self.state.composite,
            color,
            width: style.width,
            bounds: path.bounding_box(),
        });
    }

    fn fill_text(&mut self, text: &str, font_px: f64, _color: Rgba8) {
        self.ops.push(SurfaceOp::Text {
            transform: self.state.transform,
            alpha: self.state.alpha,
            text: text.to_owned(),
            font_px,
        });
    }

    fn draw_image(&mut self, _image: &StampImage, dest: Rect) {
        self.ops.push(SurfaceOp::Image {
            transform: self.state.transform,
            alpha: self.state.alpha,
            dest,
        });
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
