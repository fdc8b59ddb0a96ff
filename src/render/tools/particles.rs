use std::f64::consts::TAU;

use kurbo::Shape as _;

use crate::foundation::core::{BezPath, Point};
use crate::render::surface::Surface;
use crate::render::tools::ToolEnv;
use crate::render::tools::line::render_pencil;
use crate::stroke::model::{Particle, Stroke, StrokePoint};

const WASH_ALPHA: f32 = 0.12;

/// Position of a particle `elapsed` loops after its region closed.
pub(crate) fn particle_position(p: &Particle, elapsed_loops: f64) -> Point {
    let angle = p.phase + elapsed_loops * p.speed * TAU;
    Point::new(p.cx + angle.cos() * p.orbit, p.cy + angle.sin() * p.orbit)
}

fn polygon_path(polygon: &[StrokePoint]) -> BezPath {
    let mut path = BezPath::new();
    for (i, p) in polygon.iter().enumerate() {
        if i == 0 {
            path.move_to(p.pos());
        } else {
            path.line_to(p.pos());
        }
    }
    path.close_path();
    path
}

/// Outline while open; once closed, only the wash and orbiting particles inside the frozen
/// polygon are drawn.
pub(crate) fn render_particle_fill(
    surface: &mut dyn Surface,
    stroke: &Stroke,
    points: &[StrokePoint],
    env: &ToolEnv<'_>,
) {
    let (Some(closed_at), Some(polygon), Some(particles)) =
        (stroke.closed_at, &stroke.polygon, &stroke.particles)
    else {
        render_pencil(surface, stroke, points, env);
        return;
    };
    if env.time_limit < closed_at || polygon.len() < 3 {
        render_pencil(surface, stroke, points, env);
        return;
    }

    let elapsed = if env.duration > 0.0 {
        (env.time_limit - closed_at) / env.duration
    } else {
        0.0
    };
    let color = stroke.paint();
    let region = polygon_path(polygon);

    surface.save();
    surface.clip(&region);
    surface.fill_path(&region, color.with_alpha(WASH_ALPHA));
    for p in particles {
        let center = particle_position(p, elapsed);
        let dot = kurbo::Circle::new(center, p.radius).to_path(0.1);
        surface.fill_path(&dot, color.with_alpha(p.alpha as f32));
    }
    surface.restore();
}
