use kurbo::Point;

use crate::foundation::math::distance;

/// Default distance (world px) under which a stroke's ends count as touching.
pub const CLOSURE_THRESHOLD: f64 = 12.0;
/// Enclosed area below which a "closed" stroke is treated as a degenerate tap.
pub const MIN_CLOSED_AREA: f64 = 5.0;

pub fn is_point_near(a: Point, b: Point, threshold: f64) -> bool {
    distance(a, b) <= threshold
}

/// Absolute shoelace area of the polygon through `points` (implicitly closed).
pub fn polygon_area(points: &[Point]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut twice = 0.0;
    for (i, a) in points.iter().enumerate() {
        let b = points[(i + 1) % points.len()];
        twice += a.x * b.y - b.x * a.y;
    }
    (twice / 2.0).abs()
}

/// True when the path returns to its start and encloses a non-degenerate area.
pub fn is_closed_shape(points: &[Point], threshold: f64) -> bool {
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return false;
    };
    points.len() >= 3
        && is_point_near(*first, *last, threshold)
        && polygon_area(points) > MIN_CLOSED_AREA
}

pub fn centroid(points: &[Point]) -> Point {
    if points.is_empty() {
        return Point::ZERO;
    }
    let n = points.len() as f64;
    let (sx, sy) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    Point::new(sx / n, sy / n)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/geometry.rs"]
mod tests;
