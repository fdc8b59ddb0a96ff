use super::*;

fn close(a: Point, b: Point) -> bool {
    (a - b).hypot() < 1e-9
}

#[test]
fn home_camera_is_identity() {
    let cam = CameraModel::new(640.0);
    assert!(cam.is_home());
    let p = Point::new(123.0, 456.0);
    assert!(close(cam.screen_to_world(p), p));
    assert!(close(cam.world_to_screen(p), p));
}

#[test]
fn screen_and_world_are_inverse() {
    let mut cam = CameraModel::new(640.0);
    cam.set_zoom(2.5, Point::new(100.0, 500.0));
    cam.pan_by(Vec2::new(-30.0, 12.0));
    for p in [Point::new(0.0, 0.0), Point::new(320.0, 320.0), Point::new(601.0, 17.0)] {
        assert!(close(cam.world_to_screen(cam.screen_to_world(p)), p));
    }
}

#[test]
fn zoom_keeps_anchor_fixed() {
    let mut cam = CameraModel::new(640.0);
    let anchor = Point::new(480.0, 200.0);
    let before = cam.screen_to_world(anchor);
    for z in [2.0, 0.5, 5.9, 1.3] {
        cam.set_zoom(z, anchor);
        assert!(close(cam.screen_to_world(anchor), before));
    }
}

#[test]
fn zoom_is_clamped_and_non_finite_ignored() {
    let mut cam = CameraModel::new(640.0);
    cam.set_zoom(100.0, cam.center());
    assert_eq!(cam.camera().zoom, MAX_ZOOM);
    cam.set_zoom(0.0, cam.center());
    assert_eq!(cam.camera().zoom, MIN_ZOOM);
    assert!(!cam.set_zoom(f64::NAN, cam.center()));
    assert_eq!(cam.camera().zoom, MIN_ZOOM);
}

#[test]
fn pan_divides_by_zoom() {
    let mut cam = CameraModel::new(640.0);
    cam.set_zoom(2.0, cam.center());
    cam.pan_by(Vec2::new(20.0, -10.0));
    let c = cam.camera();
    assert_eq!((c.x, c.y), (310.0, 325.0));
    assert!(!cam.is_home());
    cam.reset();
    assert!(cam.is_home());
}
