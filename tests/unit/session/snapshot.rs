use super::*;
use crate::stroke::model::{StrokePoint, ToolKind};

#[test]
fn missing_fields_take_load_defaults() {
    let s = SessionSnapshot::from_json(r#"{"strokes": []}"#).unwrap();
    assert_eq!(s, SessionSnapshot::default());
}

#[test]
fn zero_duration_counts_as_missing() {
    let s = SessionSnapshot::from_json(r#"{"duration": 0, "speed": 2, "pingPong": true}"#).unwrap();
    assert_eq!(s.duration, DEFAULT_DURATION_MS);
    assert_eq!(s.speed, 2.0);
    assert!(s.ping_pong);
}

#[test]
fn json_keys_are_camel_case() {
    let snap = SessionSnapshot {
        strokes: vec![
            Stroke::new(ToolKind::ParticleFill, "#ff0000", 12.0)
                .with_points([StrokePoint::new(1.0, 2.0, 3.0), StrokePoint::new(4.0, 5.0, 6.0)])
                .with_seed(42),
        ],
        ping_pong: true,
        ..SessionSnapshot::default()
    };
    let json = snap.to_json_pretty().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["pingPong"], serde_json::json!(true));
    assert_eq!(value["strokes"][0]["tool"], serde_json::json!("particle-fill"));
    assert_eq!(SessionSnapshot::from_json(&json).unwrap(), snap);
}

#[test]
fn unknown_tool_is_a_serde_error() {
    let err = SessionSnapshot::from_json(
        r##"{"strokes": [{"tool": "laser", "color": "#000", "size": 2, "points": []}]}"##,
    )
    .unwrap_err();
    assert!(matches!(err, LoopError::Serde(_)));
}
