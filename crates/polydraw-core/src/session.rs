//! Drawing session: completed polygons, the draft, and calibration.

use crate::calibration::{Calibration, CalibrationError};
use crate::document::{self, DocumentContents, DocumentError, ImportFormat, SessionDocument};
use crate::geometry::{self, CLOSE_TOLERANCE};
use crate::measure::{self, PolygonMeasurement};
use crate::polygon::{ClosedPolygon, DraftPolygon, PolygonView};
use kurbo::Point;

/// Index of a completed polygon, in creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PolygonRef(pub usize);

/// A vertex of a completed polygon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexRef {
    pub polygon: PolygonRef,
    pub vertex: usize,
}

/// What [`Session::add_point`] did with the point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddPoint {
    /// The draft was empty; the point started a new draft.
    Started,
    /// The point was appended to the draft.
    Appended,
    /// The point landed on the draft's first vertex and closed it.
    Closed(PolygonRef),
}

/// The whole editable state of a drawing.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    completed: Vec<ClosedPolygon>,
    draft: DraftPolygon,
    calibration: Calibration,
    tolerance: f64,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Create an empty session with default calibration.
    pub fn new() -> Self {
        Self::with_calibration(Calibration::default())
    }

    pub fn with_calibration(calibration: Calibration) -> Self {
        Self {
            completed: Vec::new(),
            draft: DraftPolygon::new(),
            calibration,
            tolerance: CLOSE_TOLERANCE,
        }
    }

    pub fn completed(&self) -> &[ClosedPolygon] {
        &self.completed
    }

    pub fn draft(&self) -> &DraftPolygon {
        &self.draft
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    pub fn is_empty(&self) -> bool {
        self.completed.is_empty() && self.draft.is_empty()
    }

    /// All polygons in drawing order: completed ones first, then the draft if
    /// it has any points.
    pub fn polygons(&self) -> impl Iterator<Item = PolygonView<'_>> {
        let draft = (!self.draft.is_empty()).then_some(PolygonView::InProgress(&self.draft));
        self.completed
            .iter()
            .map(PolygonView::Completed)
            .chain(draft)
    }

    /// Place a point.
    ///
    /// Starts a draft when there is none, closes the draft when the point lands
    /// within tolerance of its first vertex (and it has at least three
    /// vertices), and appends otherwise.
    pub fn add_point(&mut self, point: Point) -> AddPoint {
        if self.draft.is_empty() {
            self.draft.push(point);
            log::debug!("Started polygon at ({:.1}, {:.1})", point.x, point.y);
            return AddPoint::Started;
        }

        if self.draft.closes_at(point, self.tolerance) {
            if let Ok(polygon) = self.draft.close() {
                self.completed.push(polygon);
                let index = self.completed.len() - 1;
                log::info!(
                    "Completed polygon {} with {} points",
                    index,
                    self.completed[index].len()
                );
                return AddPoint::Closed(PolygonRef(index));
            }
        }

        self.draft.push(point);
        log::debug!("Added point ({:.1}, {:.1})", point.x, point.y);
        AddPoint::Appended
    }

    /// Move one vertex of a completed polygon.
    ///
    /// # Panics
    ///
    /// Panics if `polygon` or `vertex` does not reference an existing vertex.
    pub fn move_vertex(&mut self, polygon: PolygonRef, vertex: usize, point: Point) {
        self.completed[polygon.0].set_vertex(vertex, point);
    }

    /// Remove the last point of the draft. No-op when the draft is empty.
    pub fn delete_last_point(&mut self) -> Option<Point> {
        let removed = self.draft.pop();
        if removed.is_some() {
            log::debug!("Deleted last point, {} remain", self.draft.len());
        }
        removed
    }

    /// Remove every polygon. Calibration is kept.
    pub fn clear(&mut self) {
        self.completed.clear();
        self.draft.clear();
        log::info!("Canvas cleared");
    }

    pub fn set_scale(&mut self, scale: f64) -> Result<(), CalibrationError> {
        self.calibration.set_scale(scale).inspect_err(|e| log::warn!("{}", e))
    }

    pub fn set_dpi(&mut self, dpi: f64) -> Result<(), CalibrationError> {
        self.calibration.set_dpi(dpi).inspect_err(|e| log::warn!("{}", e))
    }

    /// Nearest completed-polygon vertex strictly within tolerance of `pos`.
    pub fn hit_test_vertex(&self, pos: Point) -> Option<VertexRef> {
        let mut best: Option<(VertexRef, f64)> = None;
        for (pi, polygon) in self.completed.iter().enumerate() {
            for (vi, vertex) in polygon.points().iter().enumerate() {
                if !geometry::is_near_first_point(*vertex, pos, self.tolerance) {
                    continue;
                }
                let dist = geometry::pixel_distance(*vertex, pos);
                // Later polygons are drawn on top, so they win ties.
                if best.is_none_or(|(_, d)| dist <= d) {
                    best = Some((
                        VertexRef {
                            polygon: PolygonRef(pi),
                            vertex: vi,
                        },
                        dist,
                    ));
                }
            }
        }
        best.map(|(v, _)| v)
    }

    /// Measurements of every completed polygon, in creation order.
    pub fn measurements(&self) -> Vec<PolygonMeasurement> {
        self.completed
            .iter()
            .map(|p| measure::measure_polygon(p, &self.calibration))
            .collect()
    }

    /// Snapshot the session in the persisted document format.
    pub fn to_document(&self) -> SessionDocument {
        SessionDocument::from_parts(&self.completed, &self.draft, &self.calibration)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        self.to_document().to_json()
    }

    /// Replace the whole session from a document. On error nothing changes.
    pub fn load_document(&mut self, document: SessionDocument) -> Result<(), DocumentError> {
        let contents = document.into_contents()?;
        self.replace(contents);
        Ok(())
    }

    /// Replace the whole session from JSON in either supported format.
    /// On error nothing changes.
    pub fn import_json(&mut self, json: &str) -> Result<ImportFormat, DocumentError> {
        let (contents, format) = document::parse_any(json, self.calibration)?;
        self.replace(contents);
        log::info!(
            "Imported {:?} document with {} polygons",
            format,
            self.completed.len()
        );
        Ok(format)
    }

    fn replace(&mut self, contents: DocumentContents) {
        self.completed = contents.completed;
        self.draft = contents.draft;
        self.calibration = contents.calibration;
    }
}
