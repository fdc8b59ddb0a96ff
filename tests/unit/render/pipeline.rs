use super::*;
use crate::render::surface::{RecordingSurface, SurfaceOp};
use crate::stroke::model::ToolKind;

fn line(t0: f64) -> Stroke {
    Stroke::new(ToolKind::Pencil, "#000000", 4.0)
        .with_points((0..5).map(|i| StrokePoint::new(100.0 + i as f64 * 10.0, 200.0, t0 + i as f64 * 100.0)))
        .with_seed(9)
}

fn frame<'a>(
    strokes: &'a [Stroke],
    images: &'a StampImageStore,
    time_limit: f64,
    settings: RenderSettings,
) -> FrameInput<'a> {
    FrameInput {
        strokes,
        active: None,
        time_limit,
        duration: 1000.0,
        resonance: Resonance::SILENT,
        settings,
        view: Affine::IDENTITY,
        world_size: 640.0,
        clear: true,
        images,
    }
}

fn settings(symmetry: u32, ghost: bool) -> RenderSettings {
    RenderSettings {
        symmetry,
        ghost,
        presence: 1.0,
    }
}

fn alphas(s: &RecordingSurface) -> Vec<f32> {
    s.draws().filter_map(SurfaceOp::alpha).collect()
}

#[test]
fn clears_unless_exporting() {
    let strokes = [line(0.0)];
    let images = StampImageStore::new();
    let mut s = RecordingSurface::new(640, 640);
    render_frame(&mut s, &frame(&strokes, &images, 1000.0, settings(1, false)));
    assert_eq!(s.ops()[0], SurfaceOp::Clear);
    assert_eq!(s.depth(), 0);

    let mut s = RecordingSurface::new(640, 640);
    let f = FrameInput {
        clear: false,
        ..frame(&strokes, &images, 1000.0, settings(1, false))
    };
    render_frame(&mut s, &f);
    assert!(!s.ops().contains(&SurfaceOp::Clear));
}

#[test]
fn ghost_pass_renders_under_live_pass() {
    let strokes = [line(0.0)];
    let images = StampImageStore::new();
    let mut s = RecordingSurface::new(640, 640);
    render_frame(&mut s, &frame(&strokes, &images, 1000.0, settings(1, true)));
    let a = alphas(&s);
    assert_eq!(a.len(), 2);
    assert!((a[0] - 0.12).abs() < 1e-6);
    assert!((a[1] - 1.0).abs() < 1e-6);
}

#[test]
fn live_pass_is_time_gated_but_ghost_is_not() {
    let strokes = [line(500.0)];
    let images = StampImageStore::new();

    let mut s = RecordingSurface::new(640, 640);
    render_frame(&mut s, &frame(&strokes, &images, 100.0, settings(1, false)));
    assert_eq!(s.draws().count(), 0);

    let mut s = RecordingSurface::new(640, 640);
    render_frame(&mut s, &frame(&strokes, &images, 100.0, settings(1, true)));
    assert_eq!(alphas(&s).len(), 1);
}

#[test]
fn symmetry_rotates_copies_about_the_canvas_centre() {
    let strokes = [line(0.0)];
    let images = StampImageStore::new();
    let mut s = RecordingSurface::new(640, 640);
    render_frame(&mut s, &frame(&strokes, &images, 1000.0, settings(4, false)));
    let transforms: Vec<Affine> = s.draws().filter_map(SurfaceOp::transform).collect();
    assert_eq!(transforms.len(), 4);
    assert_eq!(transforms[0], Affine::IDENTITY);
    let center = Point::new(320.0, 320.0);
    for (k, t) in transforms.iter().enumerate() {
        let moved = *t * center;
        assert!((moved - center).hypot() < 1e-9, "copy {k} moved the centre");
    }
    let quarter = transforms[1] * Point::new(420.0, 320.0);
    assert!((quarter - Point::new(320.0, 420.0)).hypot() < 1e-9);
}

#[test]
fn symmetry_is_clamped() {
    let strokes = [line(0.0)];
    let images = StampImageStore::new();
    let mut s = RecordingSurface::new(640, 640);
    render_frame(&mut s, &frame(&strokes, &images, 1000.0, settings(100, false)));
    assert_eq!(s.draws().count(), MAX_SYMMETRY as usize);

    let mut s = RecordingSurface::new(640, 640);
    render_frame(&mut s, &frame(&strokes, &images, 1000.0, settings(0, false)));
    assert_eq!(s.draws().count(), 1);
}

#[test]
fn active_stroke_is_drawn_last_and_ungated() {
    let strokes = [line(0.0)];
    let active = Stroke::new(ToolKind::Pencil, "#ff0000", 4.0)
        .with_points([StrokePoint::new(0.0, 0.0, 900.0), StrokePoint::new(10.0, 10.0, 950.0)]);
    let images = StampImageStore::new();
    let mut s = RecordingSurface::new(640, 640);
    let f = FrameInput {
        active: Some(&active),
        ..frame(&strokes, &images, 450.0, settings(1, false))
    };
    render_frame(&mut s, &f);
    let draws: Vec<&SurfaceOp> = s.draws().collect();
    assert_eq!(draws.len(), 2);
    let SurfaceOp::Stroke { color, .. } = draws[1] else {
        panic!("expected stroke op");
    };
    assert_eq!(color.r, 255);
}

#[test]
fn world_is_scaled_to_the_surface() {
    let strokes = [line(0.0)];
    let images = StampImageStore::new();
    let mut s = RecordingSurface::new(320, 320);
    render_frame(&mut s, &frame(&strokes, &images, 1000.0, settings(1, false)));
    let t = s.draws().next().and_then(SurfaceOp::transform).unwrap();
    assert_eq!(t * Point::new(640.0, 640.0), Point::new(320.0, 320.0));
}

#[test]
fn opacity_scales_live_alpha() {
    let mut stroke = line(0.0);
    stroke.opacity = 0.5;
    let strokes = [stroke];
    let images = StampImageStore::new();
    let mut s = RecordingSurface::new(640, 640);
    let f = frame(
        &strokes,
        &images,
        1000.0,
        RenderSettings {
            presence: 0.0,
            ..settings(1, false)
        },
    );
    render_frame(&mut s, &f);
    assert!((alphas(&s)[0] - 0.1).abs() < 1e-6);
}
