//! Planar geometry over ordered vertex sequences.
//!
//! Every function here is pure and total over finite coordinates. Degenerate
//! input (collinear points, self-intersections, repeated vertices) is not
//! rejected; the shoelace area of a self-intersecting polygon is whatever the
//! signed sum produces.

use crate::calibration::Calibration;
use kurbo::Point;

/// Pixel tolerance for closing a polygon on its first vertex.
///
/// Vertex hit-testing for drags uses the same value so a vertex that can be
/// grabbed is exactly a vertex that would close the polygon.
pub const CLOSE_TOLERANCE: f64 = 10.0;

/// Unsigned shoelace area in square pixels. Fewer than three points give `0.0`.
pub fn pixel_area(points: &[Point]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let twice_signed: f64 = edges(points)
        .map(|(a, b)| a.x * b.y - b.x * a.y)
        .sum();
    (twice_signed / 2.0).abs()
}

/// Area in calibrated real-world square units.
pub fn compute_area(points: &[Point], calibration: &Calibration) -> f64 {
    pixel_area(points) * calibration.area_factor()
}

/// Arithmetic mean of the vertices, or `None` for an empty slice.
///
/// This is the vertex centroid used to anchor labels, not the area-weighted
/// centroid.
pub fn compute_centroid(points: &[Point]) -> Option<Point> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f64;
    let (sum_x, sum_y) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    Some(Point::new(sum_x / n, sum_y / n))
}

/// Euclidean distance in pixels.
pub fn pixel_distance(p1: Point, p2: Point) -> f64 {
    p1.distance(p2)
}

/// Euclidean distance in calibrated real-world units.
pub fn compute_distance(p1: Point, p2: Point, calibration: &Calibration) -> f64 {
    pixel_distance(p1, p2) * calibration.linear_factor()
}

pub fn compute_midpoint(p1: Point, p2: Point) -> Point {
    p1.midpoint(p2)
}

/// True when `candidate` lies strictly within `tolerance` pixels of `first`.
pub fn is_near_first_point(first: Point, candidate: Point, tolerance: f64) -> bool {
    pixel_distance(first, candidate) < tolerance
}

/// Consecutive vertex pairs, wrapping from the last vertex back to the first.
///
/// A single point yields one degenerate edge onto itself; an empty slice
/// yields nothing.
pub fn edges(points: &[Point]) -> impl Iterator<Item = (Point, Point)> + '_ {
    let n = points.len();
    (0..n).map(move |i| (points[i], points[(i + 1) % n]))
}
