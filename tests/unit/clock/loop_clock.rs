use super::*;
use crate::clock::time_source::ManualTime;

fn manual_clock(duration: f64) -> (LoopClock, ManualTime) {
    let time = ManualTime::new(1_000.0);
    let clock = LoopClock::with_time_source(duration, Box::new(time.clone()));
    (clock, time)
}

#[test]
fn fold_without_ping_pong_wraps() {
    let f = fold_loop_time(2500.0, 1000.0, false);
    assert_eq!(f.time, 500.0);
    assert_eq!(f.direction, Direction::Forward);
}

#[test]
fn fold_with_ping_pong_plays_backward_in_second_half() {
    let f = fold_loop_time(1500.0, 1000.0, true);
    assert_eq!(f.time, 500.0);
    assert_eq!(f.direction, Direction::Backward);

    let edge = fold_loop_time(1000.0, 1000.0, true);
    assert_eq!(edge.time, 1000.0);
    assert_eq!(edge.direction, Direction::Forward);
}

#[test]
fn fold_handles_degenerate_inputs() {
    assert_eq!(fold_loop_time(-50.0, 1000.0, false).time, 0.0);
    assert_eq!(fold_loop_time(f64::NAN, 1000.0, false).time, 0.0);
    assert_eq!(fold_loop_time(500.0, 0.0, false).time, 0.0);
}

#[test]
fn fold_stays_in_range() {
    for i in 0..200 {
        let e = i as f64 * 137.3;
        for pp in [false, true] {
            let f = fold_loop_time(e, 1000.0, pp);
            assert!((0.0..=1000.0).contains(&f.time), "{e} {pp} -> {}", f.time);
        }
    }
}

#[test]
fn loop_state_advances_with_speed() {
    let (mut clock, time) = manual_clock(1000.0);
    clock.set_speed(2.0);
    time.advance(300.0);
    let s = clock.loop_state();
    assert_eq!(s.time, 600.0);
    assert!((s.progress - 0.6).abs() < 1e-12);
    assert_eq!(s.duration, 1000.0);
}

#[test]
fn paused_clock_does_not_advance() {
    let (mut clock, time) = manual_clock(1000.0);
    time.advance(100.0);
    clock.loop_state();
    assert!(clock.set_paused(Some(true)));
    time.advance(500.0);
    assert_eq!(clock.loop_state().time, 100.0);
    assert!(!clock.set_paused(None));
    time.advance(50.0);
    assert_eq!(clock.loop_state().time, 150.0);
}

#[test]
fn seek_clamps_and_resets_direction() {
    let (mut clock, _time) = manual_clock(1000.0);
    clock.seek(5000.0);
    assert_eq!(clock.loop_state().time, 1000.0);
    clock.seek(-10.0);
    assert_eq!(clock.loop_state().time, 0.0);
    clock.seek_progress(0.25);
    assert_eq!(clock.loop_state().time, 250.0);
}

#[test]
fn step_only_moves_while_paused() {
    let (mut clock, _time) = manual_clock(1000.0);
    clock.seek(400.0);
    clock.step(100.0);
    assert_eq!(clock.current_time(), 400.0);

    clock.set_paused(Some(true));
    clock.step(100.0);
    assert_eq!(clock.loop_state().time, 500.0);
    clock.step(-900.0);
    assert_eq!(clock.loop_state().time, 0.0);
}

#[test]
fn set_duration_rescales_accumulator() {
    let (mut clock, time) = manual_clock(1000.0);
    time.advance(500.0);
    clock.loop_state();
    assert_eq!(clock.accumulator(), 500.0);

    let change = clock.set_duration(2000.0).unwrap();
    assert_eq!(change.previous, 1000.0);
    assert_eq!(change.next, 2000.0);
    assert_eq!(clock.accumulator(), 1000.0);
    assert_eq!(clock.loop_state().time, 1000.0);
}

#[test]
fn set_duration_ignores_non_finite_and_clamps_small() {
    let (mut clock, _time) = manual_clock(1000.0);
    assert!(clock.set_duration(f64::NAN).is_none());
    assert_eq!(clock.duration(), 1000.0);
    clock.set_duration(0.0);
    assert_eq!(clock.duration(), 1.0);
}

#[test]
fn speed_is_clamped() {
    let (mut clock, _time) = manual_clock(1000.0);
    assert_eq!(clock.set_speed(10.0), MAX_SPEED);
    assert_eq!(clock.set_speed(0.0), MIN_SPEED);
    assert_eq!(clock.set_speed(f64::INFINITY), MIN_SPEED);
}

#[test]
fn toggling_ping_pong_keeps_visible_time() {
    let (mut clock, time) = manual_clock(1000.0);
    clock.set_ping_pong(Some(true));
    time.advance(1400.0);
    let before = clock.loop_state();
    assert_eq!(before.time, 600.0);
    assert_eq!(before.direction, Direction::Backward);

    clock.set_ping_pong(Some(false));
    assert_eq!(clock.accumulator(), 600.0);
    assert_eq!(clock.loop_state().time, 600.0);
}

#[test]
fn map_elapsed_applies_speed_without_touching_state() {
    let (mut clock, _time) = manual_clock(1000.0);
    clock.set_speed(2.0);
    assert_eq!(clock.map_elapsed_to_loop_time(700.0), 400.0);
    assert_eq!(clock.accumulator(), 0.0);
}

#[test]
fn reset_returns_to_zero() {
    let (mut clock, time) = manual_clock(1000.0);
    time.advance(700.0);
    clock.loop_state();
    clock.reset();
    assert_eq!(clock.accumulator(), 0.0);
    assert_eq!(clock.loop_state().time, 0.0);
}
