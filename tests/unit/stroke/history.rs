use super::*;
use crate::stroke::model::{StrokePoint, ToolKind};

fn line(id: f64) -> Stroke {
    Stroke::new(ToolKind::Pencil, "#000", 4.0).with_points([
        StrokePoint::new(id, 0.0, 0.0),
        StrokePoint::new(id, 1.0, 1.0),
    ])
}

#[test]
fn commit_rejects_single_point_lines() {
    let mut h = StrokeHistory::new();
    let single = Stroke::new(ToolKind::Brush, "#000", 4.0).with_points([StrokePoint::new(0.0, 0.0, 0.0)]);
    assert!(!h.commit(single));
    assert!(h.is_empty());
}

#[test]
fn undo_redo_round_trip() {
    let mut h = StrokeHistory::new();
    h.commit(line(1.0));
    h.commit(line(2.0));
    assert!(h.undo());
    assert_eq!(h.len(), 1);
    assert!(h.can_redo());
    assert!(h.redo());
    assert_eq!(h.strokes()[1].points[0].x, 2.0);
    assert!(!h.redo());
}

#[test]
fn commit_clears_redo_stack() {
    let mut h = StrokeHistory::new();
    h.commit(line(1.0));
    h.undo();
    h.commit(line(3.0));
    assert!(!h.can_redo());
    assert!(!StrokeHistory::new().undo());
}

#[test]
fn clear_and_replace_empty_both_stacks() {
    let mut h = StrokeHistory::new();
    h.commit(line(1.0));
    h.commit(line(2.0));
    h.undo();
    h.clear();
    assert!(h.is_empty() && !h.can_redo());

    h.commit(line(1.0));
    h.undo();
    h.replace(vec![line(5.0)]);
    assert_eq!(h.len(), 1);
    assert!(!h.can_redo());
}
