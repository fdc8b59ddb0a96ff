use crate::assets::stamps::StampImage;
use crate::foundation::core::{Affine, BezPath, FrameRgba, Point, Rect, Rgba8};
use crate::foundation::error::{LoopError, LoopResult};
use crate::render::surface::{Composite, LineStyle, Surface};
use crate::render::text::{FontSource, TextBrush, TextShaper};

#[derive(Clone, Copy, Debug)]
struct DrawState {
    transform: Affine,
    alpha: f32,
    composite: Composite,
    /// Clip layers pushed since the matching `save`.
    layers: usize,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            transform: Affine::IDENTITY,
            alpha: 1.0,
            composite: Composite::SourceOver,
            layers: 0,
        }
    }
}

/// [`Surface`] rasterized on the CPU with `vello_cpu`.
///
/// Draw calls are recorded into a `vello_cpu::RenderContext` and rasterized by [`finish`].
///
/// [`finish`]: CpuSurface::finish
pub struct CpuSurface {
    width: u16,
    height: u16,
    ctx: vello_cpu::RenderContext,
    state: DrawState,
    saved: Vec<DrawState>,
    text: Option<TextShaper>,
}

impl std::fmt::Debug for CpuSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuSurface")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("depth", &self.saved.len())
            .field("text", &self.text)
            .finish_non_exhaustive()
    }
}

impl CpuSurface {
    pub fn new(width: u32, height: u32) -> LoopResult<Self> {
        let width_u16: u16 = width
            .try_into()
            .map_err(|_| LoopError::validation("surface width exceeds u16"))?;
        let height_u16: u16 = height
            .try_into()
            .map_err(|_| LoopError::validation("surface height exceeds u16"))?;
        if width_u16 == 0 || height_u16 == 0 {
            return Err(LoopError::validation("surface width/height must be non-zero"));
        }
        Ok(Self {
            width: width_u16,
            height: height_u16,
            ctx: vello_cpu::RenderContext::new(width_u16, height_u16),
            state: DrawState::default(),
            saved: Vec::new(),
            text: None,
        })
    }

    /// Enable text and emoji stamps using `font`.
    pub fn with_font(mut self, font: &FontSource) -> LoopResult<Self> {
        self.text = Some(TextShaper::new(font)?);
        Ok(self)
    }

    /// Rasterize everything drawn since the last [`Surface::clear`].
    ///
    /// Open `save` levels are closed first.
    pub fn finish(&mut self) -> LoopResult<FrameRgba> {
        while !self.saved.is_empty() {
            self.restore();
        }
        self.pop_layers();

        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut pixmap);
        Ok(FrameRgba {
            width: u32::from(self.width),
            height: u32::from(self.height),
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }

    fn pop_layers(&mut self) {
        for _ in 0..self.state.layers {
            self.ctx.pop_layer();
        }
        self.state.layers = 0;
    }

    fn begin_draw(&mut self, transform: Affine) {
        self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_transform(affine_to_cpu(transform));
        if self.state.composite == Composite::DestinationOut {
            self.ctx.push_blend_layer(destination_out());
        }
    }

    fn end_draw(&mut self) {
        if self.state.composite == Composite::DestinationOut {
            self.ctx.pop_layer();
        }
    }

    fn paint_color(&self, color: Rgba8) -> Option<vello_cpu::peniko::Color> {
        let c = color.with_alpha(self.state.alpha);
        (c.a > 0).then(|| vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a))
    }
}

impl Surface for CpuSurface {
    fn size_px(&self) -> (u32, u32) {
        (u32::from(self.width), u32::from(self.height))
    }

    fn clear(&mut self) {
        self.ctx.reset();
        self.state = DrawState::default();
        self.saved.clear();
    }

    fn save(&mut self) {
        self.saved.push(self.state);
        self.state.layers = 0;
    }

    fn restore(&mut self) {
        self.pop_layers();
        if let Some(s) = self.saved.pop() {
            self.state = s;
        }
    }

    fn transform(&mut self, t: Affine) {
        self.state.transform *= t;
    }

    fn multiply_alpha(&mut self, alpha: f32) {
        let alpha = if alpha.is_finite() { alpha.max(0.0) } else { 0.0 };
        self.state.alpha = (self.state.alpha * alpha).min(1.0);
    }

    fn set_composite(&mut self, composite: Composite) {
        self.state.composite = composite;
    }

    fn clip(&mut self, path: &BezPath) {
        self.ctx.set_transform(affine_to_cpu(self.state.transform));
        self.ctx.push_clip_layer(&bezpath_to_cpu(path));
        self.state.layers += 1;
    }

    fn fill_path(&mut self, path: &BezPath, color: Rgba8) {
        let Some(paint) = self.paint_color(color) else {
            return;
        };
        self.begin_draw(self.state.transform);
        self.ctx.set_paint(paint);
        self.ctx.fill_path(&bezpath_to_cpu(path));
        self.end_draw();
    }

    fn stroke_path(&mut self, path: &BezPath, style: &LineStyle, color: Rgba8) {
        let Some(paint) = self.paint_color(color) else {
            return;
        };
        if !(style.width.is_finite() && style.width > 0.0) {
            return;
        }
        self.begin_draw(self.state.transform);
        self.ctx.set_paint(paint);
        self.ctx.set_stroke(
            vello_cpu::kurbo::Stroke::new(style.width)
                .with_caps(vello_cpu::kurbo::Cap::Round)
                .with_join(vello_cpu::kurbo::Join::Round),
        );
        self.ctx.stroke_path(&bezpath_to_cpu(path));
        self.end_draw();
    }

    fn fill_text(&mut self, text: &str, font_px: f64, color: Rgba8) {
        let c = color.with_alpha(self.state.alpha);
        if c.a == 0 || text.is_empty() {
            return;
        }
        let Some(shaper) = self.text.as_mut() else {
            tracing::debug!("no font loaded, skipping text stamp");
            return;
        };
        let brush = TextBrush {
            r: c.r,
            g: c.g,
            b: c.b,
            a: c.a,
        };
        let layout = match shaper.layout_line(text, font_px as f32, brush) {
            Ok(layout) => layout,
            Err(err) => {
                tracing::debug!(%err, "text layout failed");
                return;
            }
        };
        let font = shaper.font().clone();

        let offset = Affine::translate((
            -f64::from(layout.width()) / 2.0,
            -f64::from(layout.height()) / 2.0,
        ));
        self.begin_draw(self.state.transform * offset);
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let brush = run.style().brush;
                self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));
                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                self.ctx
                    .glyph_run(&font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
        self.end_draw();
    }

    fn draw_image(&mut self, image: &StampImage, dest: Rect) {
        let (iw, ih) = (f64::from(image.width()), f64::from(image.height()));
        if self.state.alpha <= 0.0 || dest.width() <= 0.0 || dest.height() <= 0.0 {
            return;
        }
        let placement = Affine::translate(dest.origin().to_vec2())
            * Affine::scale_non_uniform(dest.width() / iw, dest.height() / ih);

        self.begin_draw(self.state.transform * placement);
        let opacity = self.state.alpha;
        if opacity < 1.0 {
            self.ctx.push_opacity_layer(opacity);
        }
        self.ctx.set_paint(image.paint());
        self.ctx
            .fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, iw, ih));
        if opacity < 1.0 {
            self.ctx.pop_layer();
        }
        self.end_draw();
    }
}

fn destination_out() -> vello_cpu::peniko::BlendMode {
    vello_cpu::peniko::BlendMode::new(
        vello_cpu::peniko::Mix::Normal,
        vello_cpu::peniko::Compose::DestOut,
    )
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
