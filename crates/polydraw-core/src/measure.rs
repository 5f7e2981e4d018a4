//! Display measurements for completed polygons.

use crate::calibration::Calibration;
use crate::geometry;
use crate::polygon::ClosedPolygon;
use kurbo::Point;

/// Unit label for calibrated lengths.
pub const LENGTH_UNIT: &str = "ft";

/// Unit label for calibrated areas.
pub const AREA_UNIT: &str = "sq ft";

/// One side of a polygon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeMeasurement {
    pub start: Point,
    pub end: Point,
    /// Label anchor.
    pub midpoint: Point,
    /// Calibrated length.
    pub length: f64,
}

impl EdgeMeasurement {
    pub fn label(&self) -> String {
        format_length(self.length)
    }
}

/// Area and side lengths of a completed polygon.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonMeasurement {
    /// Calibrated area.
    pub area: f64,
    /// Vertex centroid, where the area label goes.
    pub centroid: Point,
    /// One entry per side, including the closing side.
    pub edges: Vec<EdgeMeasurement>,
}

impl PolygonMeasurement {
    pub fn area_label(&self) -> String {
        format_area(self.area)
    }
}

pub fn measure_polygon(polygon: &ClosedPolygon, calibration: &Calibration) -> PolygonMeasurement {
    let edges = polygon
        .edges()
        .map(|(start, end)| EdgeMeasurement {
            start,
            end,
            midpoint: geometry::compute_midpoint(start, end),
            length: geometry::compute_distance(start, end, calibration),
        })
        .collect();

    PolygonMeasurement {
        area: polygon.area(calibration),
        centroid: polygon.centroid(),
        edges,
    }
}

pub fn format_area(area: f64) -> String {
    format!("Area: {:.2} {}", area, AREA_UNIT)
}

pub fn format_length(length: f64) -> String {
    format!("{:.2} {}", length, LENGTH_UNIT)
}
