use super::*;

#[test]
fn tool_kind_serde_uses_kebab_case() {
    let s = serde_json::to_string(&ToolKind::ParticleFill).unwrap();
    assert_eq!(s, "\"particle-fill\"");
    let t: ToolKind = serde_json::from_str("\"soft-eraser\"").unwrap();
    assert_eq!(t, ToolKind::SoftEraser);
    assert!(serde_json::from_str::<ToolKind>("\"spray\"").is_err());
    for tool in ToolKind::ALL {
        assert_eq!(
            serde_json::to_string(&tool).unwrap(),
            format!("\"{}\"", tool.as_str())
        );
    }
}

#[test]
fn stamp_and_size_tables() {
    let stamps: Vec<_> = ToolKind::ALL.into_iter().filter(|t| t.is_stamp()).collect();
    assert_eq!(
        stamps,
        vec![ToolKind::EmojiStamp, ToolKind::Text, ToolKind::ImageStamp]
    );
    assert_eq!(ToolKind::Brush.default_size(), 14.0);
    assert_eq!(ToolKind::Ink.default_size(), 9.0);
    assert_eq!(ToolKind::Eraser.default_size(), 32.0);
    assert_eq!(ToolKind::Pencil.default_size(), 4.0);
}

#[test]
fn stroke_json_is_camel_case_and_tolerant() {
    let json = r##"{
        "tool": "particle-fill",
        "color": "#ef4444",
        "size": 12,
        "points": [{"x": 1, "y": 2, "t": 3}],
        "closedAt": 3
    }"##;
    let s: Stroke = serde_json::from_str(json).unwrap();
    assert_eq!(s.opacity, 1.0);
    assert_eq!(s.closed_at, Some(3.0));
    assert_eq!(s.seed, None);
    let back = serde_json::to_value(&s).unwrap();
    assert!(back.get("closedAt").is_some());
    assert!(back.get("seed").is_none());
}

#[test]
fn ensure_seed_is_assigned_once() {
    let mut source = SeededRandom::new(5);
    let mut s = Stroke::new(ToolKind::Pencil, "#000", 4.0);
    let first = s.ensure_seed(&mut source);
    let second = s.ensure_seed(&mut source);
    assert_eq!(first, second);
    assert_ne!(first, 0);
    assert_eq!(s.seed_or(1), first);
    assert_eq!(Stroke::new(ToolKind::Ink, "#000", 4.0).seed_or(2), 2);
}

#[test]
fn committable_requires_two_points_unless_stamp() {
    let p = StrokePoint::new(0.0, 0.0, 0.0);
    assert!(!Stroke::new(ToolKind::Pencil, "#000", 4.0).is_committable());
    assert!(
        !Stroke::new(ToolKind::Pencil, "#000", 4.0)
            .with_points([p])
            .is_committable()
    );
    assert!(
        Stroke::new(ToolKind::Pencil, "#000", 4.0)
            .with_points([p, p])
            .is_committable()
    );
    assert!(
        Stroke::new(ToolKind::EmojiStamp, "#000", 4.0)
            .with_points([p])
            .is_committable()
    );
}

#[test]
fn points_until_gates_by_time() {
    let s = Stroke::new(ToolKind::Pencil, "#000", 4.0).with_points([
        StrokePoint::new(0.0, 0.0, 10.0),
        StrokePoint::new(1.0, 0.0, 20.0),
        StrokePoint::new(2.0, 0.0, 30.0),
    ]);
    assert_eq!(s.points_until(20.0).len(), 2);
    assert_eq!(s.points_until(5.0).len(), 0);
}

#[test]
fn paint_falls_back_to_default_ink() {
    let s = Stroke::new(ToolKind::Pencil, "not a colour", 4.0);
    assert_eq!(s.paint(), crate::foundation::core::DEFAULT_INK);
}

#[test]
fn rescale_time_clamps_to_duration() {
    let mut s = Stroke::new(ToolKind::ParticleFill, "#000", 4.0)
        .with_points([StrokePoint::new(0.0, 0.0, 400.0), StrokePoint::new(0.0, 0.0, 900.0)]);
    s.closed_at = Some(900.0);
    s.rescale_time(2.0, 1500.0);
    assert_eq!(s.points[0].t, 800.0);
    assert_eq!(s.points[1].t, 1500.0);
    assert_eq!(s.closed_at, Some(1500.0));
}
