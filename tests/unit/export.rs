use super::*;
use crate::clock::time_source::ManualTime;
use crate::config::EngineConfig;
use crate::encode::sink::InMemorySink;
use crate::foundation::core::Point;

fn engine(duration_ms: f64) -> LoopEngine {
    let config = EngineConfig {
        duration_ms,
        ..EngineConfig::default()
    };
    LoopEngine::with_time_source(config, Box::new(ManualTime::new(0.0)))
}

fn with_stroke(mut e: LoopEngine) -> LoopEngine {
    e.capture_stroke(Point::new(100.0, 320.0), 0.0);
    e.capture_stroke(Point::new(540.0, 320.0), 50.0);
    e.finalize_stroke();
    e
}

fn small() -> ExportOptions {
    ExportOptions {
        size: 32,
        ..ExportOptions::default()
    }
}

#[test]
fn plan_covers_one_cycle_inclusive() {
    let plan = ExportPlan::new(1000.0, 1.0, false, 30).unwrap();
    assert_eq!(plan.record_length_ms, 1000.0);
    assert_eq!(plan.frame_count, 31);
    assert_eq!(plan.loop_time(0), 0.0);
    assert_eq!(plan.loop_time(15), 500.0);
    assert_eq!(plan.loop_time(plan.frame_count - 1), plan.loop_time(0));
}

#[test]
fn plan_doubles_for_ping_pong_and_divides_by_speed() {
    let plan = ExportPlan::new(1000.0, 2.0, true, 10).unwrap();
    assert_eq!(plan.record_length_ms, 1000.0);
    assert_eq!(plan.frame_count, 11);
    assert_eq!(plan.loop_time(5), 1000.0);
    assert_eq!(plan.loop_time(8), 400.0);
    assert!(plan.loop_time(10).abs() < 1e-9);
}

#[test]
fn plan_rejects_zero_fps() {
    assert!(matches!(
        ExportPlan::new(1000.0, 1.0, false, 0),
        Err(LoopError::Validation(_))
    ));
}

#[test]
fn plan_rejects_cycles_too_long_to_export() {
    let err = ExportPlan::new(1.0e12, 1.0, false, 30).unwrap_err();
    assert!(matches!(err, LoopError::Validation(_)));
    assert!(ExportPlan::new(f64::MAX, 0.5, true, 60).is_err());

    let hour = ExportPlan::new(3_599_000.0, 1.0, false, 30).unwrap();
    assert!(hour.frame_count <= MAX_EXPORT_FRAMES);
}

#[test]
fn huge_session_duration_fails_before_the_sink_starts() {
    let e = with_stroke(engine(1.0e12));
    let mut sink = InMemorySink::new();
    let err = export_loop(&e, &mut sink, &small()).unwrap_err();
    assert!(matches!(err, LoopError::Validation(_)));
    assert!(sink.config().is_none());
}

#[test]
fn empty_session_is_rejected_before_the_sink_starts() {
    let e = engine(100.0);
    let mut sink = InMemorySink::new();
    let err = export_loop(&e, &mut sink, &small()).unwrap_err();
    assert!(matches!(err, LoopError::EmptyInput(_)));
    assert!(sink.config().is_none());
    assert!(!sink.is_aborted());
}

#[test]
fn exports_every_planned_frame() {
    let e = with_stroke(engine(100.0));
    let mut sink = InMemorySink::new();
    let stats = export_loop(&e, &mut sink, &small()).unwrap();
    assert_eq!(stats.frames, 4);
    assert_eq!(sink.frames().len(), 4);
    assert!(sink.is_finished());
    assert!(!sink.is_aborted());

    let idx: Vec<u64> = sink.frames().iter().map(|(i, _)| i.0).collect();
    assert_eq!(idx, vec![0, 1, 2, 3]);
    let first = &sink.frames()[0].1;
    let last = &sink.frames()[3].1;
    assert_eq!(first.fingerprint(), last.fingerprint());
}

#[test]
fn frames_show_background_and_disk() {
    let e = with_stroke(engine(100.0));
    let mut sink = InMemorySink::new();
    export_loop(&e, &mut sink, &small()).unwrap();
    let f = &sink.frames()[0].1;
    let corner = &f.data[0..4];
    for (got, want) in corner.iter().zip([0xf1u8, 0xf5, 0xf9, 0xff]) {
        assert!(got.abs_diff(want) <= 1, "corner {corner:?}");
    }
    let i = ((8 * f.width + 16) * 4) as usize;
    assert!(f.data[i..i + 3].iter().all(|&c| c >= 254), "disk not white");
}

#[test]
fn cancellation_aborts_the_sink() {
    let e = with_stroke(engine(100.0));
    let mut sink = InMemorySink::new();
    let cancel = ExportCancel::new();
    cancel.cancel();
    let opts = ExportOptions {
        cancel: Some(cancel),
        ..small()
    };
    let err = export_loop(&e, &mut sink, &opts).unwrap_err();
    assert!(matches!(err, LoopError::Cancelled(_)));
    assert!(sink.is_aborted());
    assert!(!sink.is_finished());
}

#[test]
fn options_from_config_parse_colours() {
    let opts = ExportOptions::from_config(&ExportConfig::default()).unwrap();
    assert_eq!(opts.background, Rgba8::rgb(0xf1, 0xf5, 0xf9));
    let bad = ExportConfig {
        disk: "white".into(),
        ..ExportConfig::default()
    };
    assert!(ExportOptions::from_config(&bad).is_err());
}
