//! Polygon model: the open draft being drawn and closed, completed polygons.

use crate::calibration::Calibration;
use crate::geometry;
use kurbo::{BezPath, Point};
use thiserror::Error;

/// Minimum number of vertices of a completed polygon.
pub const MIN_CLOSED_POINTS: usize = 3;

/// Polygon construction errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PolygonError {
    #[error("A completed polygon needs at least {MIN_CLOSED_POINTS} points, got {0}")]
    TooFewPoints(usize),
}

/// The polygon currently being drawn. May be empty; never completed itself.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DraftPolygon {
    points: Vec<Point>,
}

impl DraftPolygon {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_points(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn first(&self) -> Option<Point> {
        self.points.first().copied()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn push(&mut self, point: Point) {
        self.points.push(point);
    }

    /// Remove and return the last point, if any.
    pub fn pop(&mut self) -> Option<Point> {
        self.points.pop()
    }

    /// Whether a click at `candidate` closes this draft.
    ///
    /// Requires enough points to form a completed polygon and a click strictly
    /// within `tolerance` of the first vertex.
    pub fn closes_at(&self, candidate: Point, tolerance: f64) -> bool {
        match self.first() {
            Some(first) if self.points.len() >= MIN_CLOSED_POINTS => {
                geometry::is_near_first_point(first, candidate, tolerance)
            }
            _ => false,
        }
    }

    /// Close the draft, leaving it empty. Fails (and keeps the points) when
    /// there are too few vertices.
    pub fn close(&mut self) -> Result<ClosedPolygon, PolygonError> {
        if self.points.len() < MIN_CLOSED_POINTS {
            return Err(PolygonError::TooFewPoints(self.points.len()));
        }
        Ok(ClosedPolygon {
            points: std::mem::take(&mut self.points),
        })
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Open polyline through the draft points.
    pub fn to_path(&self) -> BezPath {
        polyline(&self.points, false)
    }
}

/// A completed polygon with at least three vertices.
#[derive(Debug, Clone, PartialEq)]
pub struct ClosedPolygon {
    points: Vec<Point>,
}

impl ClosedPolygon {
    pub fn from_points(points: Vec<Point>) -> Result<Self, PolygonError> {
        if points.len() < MIN_CLOSED_POINTS {
            return Err(PolygonError::TooFewPoints(points.len()));
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false; kept for API symmetry with [`DraftPolygon`].
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Replace one vertex in place.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn set_vertex(&mut self, index: usize, point: Point) {
        self.points[index] = point;
    }

    pub fn pixel_area(&self) -> f64 {
        geometry::pixel_area(&self.points)
    }

    pub fn area(&self, calibration: &Calibration) -> f64 {
        geometry::compute_area(&self.points, calibration)
    }

    pub fn centroid(&self) -> Point {
        // Non-empty by construction.
        geometry::compute_centroid(&self.points).unwrap_or(self.points[0])
    }

    pub fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        geometry::edges(&self.points)
    }

    /// Closed outline path.
    pub fn to_path(&self) -> BezPath {
        polyline(&self.points, true)
    }
}

/// Either kind of polygon, for code paths that handle both.
#[derive(Debug, Clone, PartialEq)]
pub enum Polygon {
    InProgress(DraftPolygon),
    Completed(ClosedPolygon),
}

/// Borrowed view of a polygon in scene order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PolygonView<'a> {
    InProgress(&'a DraftPolygon),
    Completed(&'a ClosedPolygon),
}

impl<'a> PolygonView<'a> {
    pub fn points(&self) -> &'a [Point] {
        match self {
            PolygonView::InProgress(draft) => draft.points(),
            PolygonView::Completed(closed) => closed.points(),
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, PolygonView::Completed(_))
    }
}

fn polyline(points: &[Point], closed: bool) -> BezPath {
    let mut path = BezPath::new();
    let mut iter = points.iter();
    if let Some(first) = iter.next() {
        path.move_to(*first);
        for p in iter {
            path.line_to(*p);
        }
        if closed {
            path.close_path();
        }
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Vec<Point> {
        vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(0.0, 10.0)]
    }

    #[test]
    fn test_closed_requires_three_points() {
        assert_eq!(
            ClosedPolygon::from_points(vec![Point::ZERO, Point::new(1.0, 1.0)]),
            Err(PolygonError::TooFewPoints(2))
        );
        assert!(ClosedPolygon::from_points(triangle()).is_ok());
    }

    #[test]
    fn test_draft_close_empties_draft() {
        let mut draft = DraftPolygon::from_points(triangle());
        let closed = draft.close().unwrap();
        assert!(draft.is_empty());
        assert_eq!(closed.points(), triangle().as_slice());
    }

    #[test]
    fn test_draft_close_too_few_keeps_points() {
        let mut draft = DraftPolygon::from_points(vec![Point::ZERO, Point::new(5.0, 5.0)]);
        assert!(draft.close().is_err());
        assert_eq!(draft.len(), 2);
    }

    #[test]
    fn test_closes_at() {
        let draft = DraftPolygon::from_points(triangle());
        assert!(draft.closes_at(Point::new(3.0, 3.0), 10.0));
        assert!(!draft.closes_at(Point::new(30.0, 3.0), 10.0));

        let short = DraftPolygon::from_points(vec![Point::ZERO, Point::new(50.0, 0.0)]);
        assert!(!short.closes_at(Point::ZERO, 10.0));
        assert!(!DraftPolygon::new().closes_at(Point::ZERO, 10.0));
    }

    #[test]
    fn test_set_vertex() {
        let mut closed = ClosedPolygon::from_points(triangle()).unwrap();
        closed.set_vertex(1, Point::new(20.0, 0.0));
        assert_eq!(closed.points()[1], Point::new(20.0, 0.0));
        assert_eq!(closed.points()[0], Point::ZERO);
        assert_eq!(closed.pixel_area(), 100.0);
    }

    #[test]
    #[should_panic]
    fn test_set_vertex_out_of_range_panics() {
        let mut closed = ClosedPolygon::from_points(triangle()).unwrap();
        closed.set_vertex(3, Point::ZERO);
    }

    #[test]
    fn test_paths() {
        let closed = ClosedPolygon::from_points(triangle()).unwrap();
        // move + 2 lines + close
        assert_eq!(closed.to_path().elements().len(), 4);
        let draft = DraftPolygon::from_points(triangle());
        assert_eq!(draft.to_path().elements().len(), 3);
        assert!(DraftPolygon::new().to_path().elements().is_empty());
    }

    #[test]
    fn test_polygon_view() {
        let closed = ClosedPolygon::from_points(triangle()).unwrap();
        let view = PolygonView::Completed(&closed);
        assert!(view.is_completed());
        assert_eq!(view.points().len(), 3);
        let draft = DraftPolygon::new();
        assert!(!PolygonView::InProgress(&draft).is_completed());
    }
}
