use super::*;
use crate::render::surface::{Composite, RecordingSurface, SurfaceOp};
use crate::stroke::model::Particle;

fn env(images: &StampImageStore, time_limit: f64) -> ToolEnv<'_> {
    ToolEnv {
        time_limit,
        resonance: Resonance::SILENT,
        alpha: 1.0,
        duration: 1000.0,
        presence: 1.0,
        images,
    }
}

fn zigzag(tool: ToolKind) -> Stroke {
    Stroke::new(tool, "#336699", 6.0)
        .with_points((0..12).map(|i| {
            let x = 10.0 + i as f64 * 5.0;
            let y = if i % 2 == 0 { 20.0 } else { 30.0 };
            StrokePoint::new(x, y, i as f64 * 50.0)
        }))
        .with_seed(77)
}

fn record(stroke: &Stroke, env: &ToolEnv<'_>) -> RecordingSurface {
    let mut s = RecordingSurface::new(100, 100);
    let points = stroke.points_until(env.time_limit);
    renderer_for(stroke.tool)(&mut s, stroke, &points, env);
    s
}

#[test]
fn compute_alpha_matches_pass_formulas() {
    assert!((compute_alpha(false, 0.0, 1.0) - 0.2).abs() < 1e-12);
    assert_eq!(compute_alpha(false, 1.0, 1.0), 1.0);
    assert!((compute_alpha(false, 0.5, 0.5) - 0.325).abs() < 1e-12);
    assert!((compute_alpha(true, 1.0, 1.0) - 0.12).abs() < 1e-12);
    assert!((compute_alpha(true, 0.0, 0.5) - 0.02).abs() < 1e-12);
}

#[test]
fn every_tool_is_deterministic_for_a_seed() {
    let images = StampImageStore::new();
    let e = env(&images, 1000.0);
    for tool in ToolKind::ALL {
        let mut stroke = zigzag(tool);
        stroke.text = Some("hi".into());
        let a = record(&stroke, &e);
        let b = record(&stroke, &e);
        assert_eq!(a.ops(), b.ops(), "{tool}");
        assert_eq!(a.depth(), 0, "{tool} left unbalanced save/restore");
    }
}

#[test]
fn seed_changes_jittered_output() {
    let images = StampImageStore::new();
    let e = env(&images, 1000.0);
    let a = record(&zigzag(ToolKind::Pencil), &e);
    let b = record(&zigzag(ToolKind::Pencil).with_seed(78), &e);
    assert_ne!(a.ops(), b.ops());
}

#[test]
fn erasers_draw_destination_out() {
    let images = StampImageStore::new();
    let e = env(&images, 1000.0);
    for tool in [ToolKind::Eraser, ToolKind::SoftEraser] {
        let s = record(&zigzag(tool), &e);
        assert!(s.draws().count() > 0);
        assert!(s.draws().all(|op| op.composite() == Composite::DestinationOut));
    }
    let soft = record(&zigzag(ToolKind::SoftEraser), &e);
    let widths: Vec<f64> = soft
        .draws()
        .filter_map(|op| match op {
            SurfaceOp::Stroke { width, .. } => Some(*width),
            _ => None,
        })
        .collect();
    assert_eq!(widths, vec![9.0, 6.0]);
}

#[test]
fn brush_glows_under_its_core() {
    let images = StampImageStore::new();
    let s = record(&zigzag(ToolKind::Brush), &env(&images, 1000.0));
    let strokes: Vec<&SurfaceOp> = s.draws().collect();
    assert_eq!(strokes.len(), 4);
    let SurfaceOp::Stroke { width, .. } = strokes[3] else {
        panic!("expected stroke op");
    };
    assert_eq!(*width, 6.0);
}

#[test]
fn nothing_drawn_before_first_point_time() {
    let images = StampImageStore::new();
    let mut stroke = zigzag(ToolKind::Pencil);
    for p in &mut stroke.points {
        p.t += 500.0;
    }
    let s = record(&stroke, &env(&images, 100.0));
    assert_eq!(s.draws().count(), 0);
}

#[test]
fn particle_fill_waits_for_closure_time() {
    let images = StampImageStore::new();
    let mut stroke = zigzag(ToolKind::ParticleFill);
    stroke.closed_at = Some(550.0);
    stroke.polygon = Some(vec![
        StrokePoint::new(0.0, 0.0, 0.0),
        StrokePoint::new(40.0, 0.0, 100.0),
        StrokePoint::new(40.0, 40.0, 200.0),
    ]);
    stroke.particles = Some(vec![Particle {
        cx: 20.0,
        cy: 10.0,
        orbit: 4.0,
        radius: 2.0,
        speed: 1.0,
        phase: 0.0,
        alpha: 0.5,
    }]);

    let before = record(&stroke, &env(&images, 500.0));
    assert!(!before.ops().iter().any(|op| matches!(op, SurfaceOp::Clip { .. })));
    assert!(before.draws().any(|op| matches!(op, SurfaceOp::Stroke { .. })));

    let after = record(&stroke, &env(&images, 600.0));
    assert!(after.ops().iter().any(|op| matches!(op, SurfaceOp::Clip { .. })));
    assert!(!after.draws().any(|op| matches!(op, SurfaceOp::Stroke { .. })));
    let fills = after
        .draws()
        .filter(|op| matches!(op, SurfaceOp::Fill { .. }))
        .count();
    assert_eq!(fills, 2);
}

#[test]
fn particles_orbit_once_per_loop_at_unit_speed() {
    let p = Particle {
        cx: 0.0,
        cy: 0.0,
        orbit: 5.0,
        radius: 1.0,
        speed: 1.0,
        phase: 0.0,
        alpha: 1.0,
    };
    let start = particles::particle_position(&p, 0.0);
    let half = particles::particle_position(&p, 0.5);
    let full = particles::particle_position(&p, 1.0);
    assert!((start.x - 5.0).abs() < 1e-9);
    assert!((half.x + 5.0).abs() < 1e-9);
    assert!((full - start).hypot() < 1e-9);
}

#[test]
fn stamps_place_one_glyph_per_point() {
    let images = StampImageStore::new();
    let mut stroke = Stroke::new(ToolKind::EmojiStamp, "#000000", 10.0)
        .with_points([StrokePoint::new(5.0, 5.0, 0.0), StrokePoint::new(50.0, 60.0, 10.0)]);
    stroke.emoji = Some("\u{1F338}".into());
    let s = record(&stroke, &env(&images, 1000.0));
    let texts: Vec<(&str, f64)> = s
        .draws()
        .filter_map(|op| match op {
            SurfaceOp::Text { text, font_px, .. } => Some((text.as_str(), *font_px)),
            _ => None,
        })
        .collect();
    assert_eq!(texts, vec![("\u{1F338}", 24.0), ("\u{1F338}", 24.0)]);
}

#[test]
fn empty_text_stamp_draws_nothing() {
    let images = StampImageStore::new();
    let stroke = Stroke::new(ToolKind::Text, "#000000", 10.0)
        .with_points([StrokePoint::new(5.0, 5.0, 0.0)]);
    assert_eq!(record(&stroke, &env(&images, 1000.0)).draws().count(), 0);
}

#[test]
fn missing_stamp_image_is_skipped() {
    let images = StampImageStore::new();
    let mut stroke = Stroke::new(ToolKind::ImageStamp, "#000000", 10.0)
        .with_points([StrokePoint::new(5.0, 5.0, 0.0)]);
    stroke.image = Some("missing.png".into());
    assert_eq!(record(&stroke, &env(&images, 1000.0)).draws().count(), 0);
}
