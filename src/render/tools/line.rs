use crate::foundation::core::{BezPath, Point, Rgba8};
use crate::foundation::random::SeededRandom;
use crate::render::surface::{Composite, LineStyle, Surface};
use crate::render::tools::ToolEnv;
use crate::stroke::model::{Stroke, StrokePoint};

/// Glow underpasses, outermost first, as (width fraction of the glow radius, alpha).
const GLOW_PASSES: [(f64, f32); 3] = [(1.0, 0.06), (0.66, 0.08), (0.33, 0.1)];

#[derive(Clone, Copy, Debug)]
pub(crate) struct LineParams {
    pub(crate) color: Rgba8,
    pub(crate) size: f64,
    pub(crate) jitter: f64,
    pub(crate) glow: f64,
    pub(crate) composite: Composite,
    pub(crate) seed: u32,
}

/// Quadratic-midpoint path through `points`.
///
/// Segments longer than `8 * size` lift the pen. Each point is displaced by up to `jitter / 2`
/// on both axes; control points use the undisplaced previous point.
pub(crate) fn smoothed_path(
    points: &[StrokePoint],
    size: f64,
    jitter: f64,
    rand: &mut SeededRandom,
) -> BezPath {
    let mut path = BezPath::new();
    for (i, p) in points.iter().enumerate() {
        let (x, y) = if jitter != 0.0 {
            let jx = (rand.next_f64() - 0.5) * jitter;
            let jy = (rand.next_f64() - 0.5) * jitter;
            (p.x + jx, p.y + jy)
        } else {
            (p.x, p.y)
        };

        if i == 0 {
            path.move_to((x, y));
            continue;
        }
        let prev = points[i - 1];
        let d = (x - prev.x).hypot(y - prev.y);
        if d < size * 8.0 {
            path.quad_to(
                prev.pos(),
                Point::new((prev.x + x) * 0.5, (prev.y + y) * 0.5),
            );
        } else {
            path.move_to((x, y));
        }
    }
    path
}

pub(crate) fn draw_basic_stroke(surface: &mut dyn Surface, points: &[StrokePoint], p: LineParams) {
    if points.is_empty() {
        return;
    }
    let mut rand = SeededRandom::new(p.seed);
    let path = smoothed_path(points, p.size, p.jitter, &mut rand);

    surface.save();
    surface.set_composite(p.composite);
    if p.glow > 0.0 {
        for (fraction, alpha) in GLOW_PASSES {
            let width = p.size + p.glow * 2.0 * fraction;
            surface.stroke_path(&path, &LineStyle::new(width), p.color.with_alpha(alpha));
        }
    }
    surface.stroke_path(&path, &LineStyle::new(p.size), p.color);
    surface.restore();
}

pub(crate) fn render_pencil(
    surface: &mut dyn Surface,
    stroke: &Stroke,
    points: &[StrokePoint],
    env: &ToolEnv<'_>,
) {
    draw_basic_stroke(
        surface,
        points,
        LineParams {
            color: stroke.paint(),
            size: stroke.size,
            jitter: 1.0 + env.resonance.treble * 4.0,
            glow: 0.0,
            composite: Composite::SourceOver,
            seed: stroke.seed_or(1),
        },
    );
}

pub(crate) fn render_brush(
    surface: &mut dyn Surface,
    stroke: &Stroke,
    points: &[StrokePoint],
    env: &ToolEnv<'_>,
) {
    draw_basic_stroke(
        surface,
        points,
        LineParams {
            color: stroke.paint(),
            size: stroke.size + env.resonance.bass * 20.0,
            jitter: env.resonance.treble * 4.0,
            glow: stroke.size / 2.0 + env.resonance.treble * 25.0,
            composite: Composite::SourceOver,
            seed: stroke.seed_or(1),
        },
    );
}

pub(crate) fn render_eraser(
    surface: &mut dyn Surface,
    stroke: &Stroke,
    points: &[StrokePoint],
    _env: &ToolEnv<'_>,
) {
    draw_basic_stroke(
        surface,
        points,
        LineParams {
            color: Rgba8::BLACK,
            size: stroke.size,
            jitter: 0.0,
            glow: 0.0,
            composite: Composite::DestinationOut,
            seed: stroke.seed_or(1),
        },
    );
}

/// Partial erase with a wider, fainter feather around the core.
pub(crate) fn render_soft_eraser(
    surface: &mut dyn Surface,
    stroke: &Stroke,
    points: &[StrokePoint],
    _env: &ToolEnv<'_>,
) {
    let base = LineParams {
        color: Rgba8::BLACK,
        size: stroke.size,
        jitter: 0.0,
        glow: 0.0,
        composite: Composite::DestinationOut,
        seed: stroke.seed_or(1),
    };
    draw_basic_stroke(
        surface,
        points,
        LineParams {
            color: Rgba8::BLACK.with_alpha(0.25),
            size: stroke.size * 1.5,
            ..base
        },
    );
    draw_basic_stroke(
        surface,
        points,
        LineParams {
            color: Rgba8::BLACK.with_alpha(0.5),
            ..base
        },
    );
}
