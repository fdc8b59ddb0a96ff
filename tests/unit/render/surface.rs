use super::*;
use kurbo::Shape as _;

fn square() -> BezPath {
    Rect::new(0.0, 0.0, 10.0, 10.0).to_path(0.1)
}

#[test]
fn recording_tracks_state_through_save_restore() {
    let mut s = RecordingSurface::new(100, 100);
    s.save();
    s.transform(Affine::translate((5.0, 0.0)));
    s.multiply_alpha(0.5);
    s.set_composite(Composite::DestinationOut);
    s.fill_path(&square(), Rgba8::BLACK);
    s.restore();
    s.fill_path(&square(), Rgba8::BLACK);

    let draws: Vec<_> = s.draws().collect();
    assert_eq!(draws.len(), 2);
    assert_eq!(draws[0].alpha(), Some(0.5));
    assert_eq!(draws[0].composite(), Composite::DestinationOut);
    assert_eq!(draws[0].transform(), Some(Affine::translate((5.0, 0.0))));
    assert_eq!(draws[1].alpha(), Some(1.0));
    assert_eq!(draws[1].transform(), Some(Affine::IDENTITY));
    assert_eq!(s.depth(), 0);
}

#[test]
fn clear_resets_recording() {
    let mut s = RecordingSurface::new(10, 10);
    s.fill_path(&square(), Rgba8::BLACK);
    s.save();
    s.clear();
    assert_eq!(s.ops(), &[SurfaceOp::Clear]);
    assert_eq!(s.depth(), 0);
}

#[test]
fn stroke_records_width_and_bounds() {
    let mut s = RecordingSurface::new(10, 10);
    s.stroke_path(&square(), &LineStyle::new(3.0), Rgba8::BLACK);
    match &s.ops()[0] {
        SurfaceOp::Stroke { width, bounds, .. } => {
            assert_eq!(*width, 3.0);
            assert_eq!(*bounds, Rect::new(0.0, 0.0, 10.0, 10.0));
        }
        other => panic!("unexpected op {other:?}"),
    }
}
