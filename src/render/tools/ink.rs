use crate::foundation::core::BezPath;
use crate::foundation::random::SeededRandom;
use crate::render::surface::{LineStyle, Surface};
use crate::render::tools::ToolEnv;
use crate::stroke::model::{Stroke, StrokePoint};

const INK_ALPHA: f32 = 0.92;
/// Offset bleed passes: (width factor, alpha).
const BLEED_PASSES: [(f64, f32); 2] = [(1.35, 0.16), (1.7, 0.08)];

/// Pixels per millisecond between `points[index - 1]` and `points[index]`.
pub(crate) fn velocity_at(points: &[StrokePoint], index: usize) -> f64 {
    if index == 0 || index >= points.len() {
        return 0.0;
    }
    let a = points[index - 1];
    let b = points[index];
    let dt = (b.t - a.t).max(1.0);
    (b.x - a.x).hypot(b.y - a.y) / dt
}

/// Line thickness at `index`: base width modulated by velocity and a slow wobble.
pub(crate) fn ink_thickness(size: f64, points: &[StrokePoint], index: usize, time_limit: f64) -> f64 {
    let base = size * 1.05;
    let wobble = ((time_limit + index as f64 * 30.0) * 0.002).sin() * 0.08;
    (base * (0.9 + wobble + velocity_at(points, index) * 0.3)).max(1.0)
}

fn segment(a: StrokePoint, b: StrokePoint, dx: f64, dy: f64) -> BezPath {
    let mut path = BezPath::new();
    path.move_to((a.x + dx, a.y + dy));
    path.line_to((b.x + dx, b.y + dy));
    path
}

/// Velocity-sensitive line with faint offset bleed passes underneath.
pub(crate) fn render_ink(
    surface: &mut dyn Surface,
    stroke: &Stroke,
    points: &[StrokePoint],
    env: &ToolEnv<'_>,
) {
    if points.len() < 2 {
        return;
    }
    let mut rand = SeededRandom::new(stroke.seed_or(2));
    let color = stroke.paint();

    surface.save();
    for (factor, alpha) in BLEED_PASSES {
        let spread = stroke.size * 0.25;
        let dx = rand.jitter_around(0.0, spread);
        let dy = rand.jitter_around(0.0, spread);
        for i in 1..points.len() {
            let width = ink_thickness(stroke.size, points, i, env.time_limit) * factor;
            surface.stroke_path(
                &segment(points[i - 1], points[i], dx, dy),
                &LineStyle::new(width),
                color.with_alpha(alpha),
            );
        }
    }

    surface.multiply_alpha(INK_ALPHA);
    for i in 1..points.len() {
        let width = ink_thickness(stroke.size, points, i, env.time_limit);
        surface.stroke_path(
            &segment(points[i - 1], points[i], 0.0, 0.0),
            &LineStyle::new(width),
            color,
        );
    }
    surface.restore();
}
