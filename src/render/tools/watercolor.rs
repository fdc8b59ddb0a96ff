use std::f64::consts::{PI, TAU};

use kurbo::Shape as _;

use crate::foundation::random::SeededRandom;
use crate::render::surface::Surface;
use crate::render::tools::ToolEnv;
use crate::stroke::model::{Stroke, StrokePoint};

/// Translucent splat clusters around each point.
///
/// Splat layout is fixed by the seed. Jitter comes from a cloned stream scaled by the mid band,
/// and a drift term driven by `time_limit` keeps a static stroke slowly breathing.
pub(crate) fn render_watercolor(
    surface: &mut dyn Surface,
    stroke: &Stroke,
    points: &[StrokePoint],
    env: &ToolEnv<'_>,
) {
    let mut rand = SeededRandom::new(stroke.seed_or(1));
    let mut jitter = rand.clone_stream();
    let now = env.time_limit;
    let alpha_base = 0.06 + rand.next_f64() * 0.04;
    let jitter_amp = env.resonance.mid * 8.0 + 2.0;
    let color = stroke.paint();
    let size = stroke.size;

    for (idx, p) in points.iter().enumerate() {
        let splats = 6 + (rand.next_f64() * 8.0).floor() as usize;
        for i in 0..splats {
            let radius = rand.pick_in_range(size * 0.35, size * 1.25);
            let angle = rand.next_f64() * TAU;
            let drift = (now * 0.001 + idx as f64 * 0.35 + i as f64 * 0.45).sin() * (size * 0.2);

            let ox = angle.cos() * radius * 0.6 + drift;
            let oy = angle.sin() * radius * 0.6 + drift;
            let dx = p.x + ox + (jitter.next_f64() - 0.5) * jitter_amp;
            let dy = p.y + oy + (jitter.next_f64() - 0.5) * jitter_amp;

            let splat_alpha = alpha_base + rand.next_f64() * 0.05;
            let ry = radius * rand.pick_in_range(0.6, 1.4);
            let rotation = rand.next_f64() * PI;

            let ellipse = kurbo::Ellipse::new((dx, dy), (radius, ry), rotation);
            surface.save();
            surface.multiply_alpha(splat_alpha as f32);
            surface.fill_path(&ellipse.to_path(0.1), color);
            surface.restore();
        }
    }
}
