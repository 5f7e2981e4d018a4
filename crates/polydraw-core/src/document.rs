//! Persisted document formats.
//!
//! The session format is always written. The legacy single-polygon sketch
//! (a bare array of points) is accepted on read only.

use crate::calibration::{Calibration, CalibrationError};
use crate::polygon::{ClosedPolygon, DraftPolygon, Polygon, PolygonError, PolygonView};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Document decoding errors.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Polygon {index} is invalid: {source}")]
    InvalidPolygon {
        index: usize,
        #[source]
        source: PolygonError,
    },
    #[error("Invalid calibration: {0}")]
    InvalidCalibration(#[from] CalibrationError),
    #[error("Document contains more than one unfinished polygon")]
    MultipleDrafts,
    #[error("Unrecognized document: expected an object or an array of points")]
    UnknownFormat,
}

/// One polygon as stored on disk. Both fields are required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolygonRecord {
    pub points: Vec<Point>,
    #[serde(rename = "isCompleted")]
    pub is_completed: bool,
}

impl From<PolygonView<'_>> for PolygonRecord {
    fn from(view: PolygonView<'_>) -> Self {
        Self {
            points: view.points().to_vec(),
            is_completed: view.is_completed(),
        }
    }
}

impl TryFrom<PolygonRecord> for Polygon {
    type Error = PolygonError;

    fn try_from(record: PolygonRecord) -> Result<Self, Self::Error> {
        if record.is_completed {
            ClosedPolygon::from_points(record.points).map(Polygon::Completed)
        } else {
            Ok(Polygon::InProgress(DraftPolygon::from_points(record.points)))
        }
    }
}

/// Full session document: `{ polygons, scale, dpi }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionDocument {
    pub polygons: Vec<PolygonRecord>,
    pub scale: f64,
    pub dpi: f64,
}

/// Legacy sketch: a bare array of `{x, y}` points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LegacySketch(pub Vec<Point>);

/// Which format an import was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportFormat {
    Session,
    Legacy,
}

/// Validated document contents, ready to be swapped into a session.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentContents {
    pub completed: Vec<ClosedPolygon>,
    pub draft: DraftPolygon,
    pub calibration: Calibration,
}

impl SessionDocument {
    /// Build a document from session parts. A non-empty draft is stored as a
    /// trailing record with `isCompleted: false`.
    pub fn from_parts(
        completed: &[ClosedPolygon],
        draft: &DraftPolygon,
        calibration: &Calibration,
    ) -> Self {
        let draft = (!draft.is_empty()).then_some(PolygonView::InProgress(draft));
        let polygons = completed
            .iter()
            .map(PolygonView::Completed)
            .chain(draft)
            .map(PolygonRecord::from)
            .collect();
        Self {
            polygons,
            scale: calibration.scale(),
            dpi: calibration.dpi(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Validate the document and split it into session parts.
    pub fn into_contents(self) -> Result<DocumentContents, DocumentError> {
        let calibration = Calibration::new(self.scale, self.dpi)?;
        let mut completed = Vec::with_capacity(self.polygons.len());
        let mut draft: Option<DraftPolygon> = None;

        for (index, record) in self.polygons.into_iter().enumerate() {
            let polygon = Polygon::try_from(record)
                .map_err(|source| DocumentError::InvalidPolygon { index, source })?;
            match polygon {
                Polygon::Completed(closed) => completed.push(closed),
                Polygon::InProgress(_) if draft.is_some() => {
                    return Err(DocumentError::MultipleDrafts);
                }
                Polygon::InProgress(in_progress) => draft = Some(in_progress),
            }
        }

        Ok(DocumentContents {
            completed,
            draft: draft.unwrap_or_default(),
            calibration,
        })
    }
}

impl LegacySketch {
    /// Convert to session parts. Three or more points become one completed
    /// polygon, fewer become the draft. The caller's calibration is kept.
    pub fn into_contents(self, calibration: Calibration) -> DocumentContents {
        let mut draft = DraftPolygon::from_points(self.0);
        // A failed close leaves the points in the draft.
        let completed = draft.close().map(|p| vec![p]).unwrap_or_default();
        DocumentContents {
            completed,
            draft,
            calibration,
        }
    }
}

/// Parse either document format.
///
/// `calibration` is used for legacy sketches, which carry none.
pub fn parse_any(
    json: &str,
    calibration: Calibration,
) -> Result<(DocumentContents, ImportFormat), DocumentError> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    match value {
        serde_json::Value::Array(_) => {
            let sketch: LegacySketch = serde_json::from_value(value)?;
            Ok((sketch.into_contents(calibration), ImportFormat::Legacy))
        }
        serde_json::Value::Object(_) => {
            let document: SessionDocument = serde_json::from_value(value)?;
            Ok((document.into_contents()?, ImportFormat::Session))
        }
        _ => Err(DocumentError::UnknownFormat),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_expected_shape() {
        let closed = ClosedPolygon::from_points(vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(0.0, 10.0),
        ])
        .unwrap();
        let doc =
            SessionDocument::from_parts(&[closed], &DraftPolygon::new(), &Calibration::default());
        let value: serde_json::Value = serde_json::from_str(&doc.to_json().unwrap()).unwrap();

        assert_eq!(value["scale"], 1.0);
        assert_eq!(value["dpi"], 10.0);
        assert_eq!(value["polygons"][0]["isCompleted"], true);
        assert_eq!(value["polygons"][0]["points"][1]["x"], 10.0);
        assert_eq!(value["polygons"][0]["points"][1]["y"], 0.0);
        assert_eq!(value["polygons"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_reads_session_format() {
        let json = r#"{
            "polygons": [
                { "points": [{"x": 1, "y": 2}, {"x": 50, "y": 2}, {"x": 50, "y": 60}], "isCompleted": true }
            ],
            "scale": 2,
            "dpi": 96
        }"#;
        let (contents, format) = parse_any(json, Calibration::default()).unwrap();
        assert_eq!(format, ImportFormat::Session);
        assert_eq!(contents.completed.len(), 1);
        assert_eq!(contents.completed[0].points()[0], Point::new(1.0, 2.0));
        assert!(contents.draft.is_empty());
        assert_eq!(contents.calibration.scale(), 2.0);
        assert_eq!(contents.calibration.dpi(), 96.0);
    }

    #[test]
    fn test_draft_record_round_trips() {
        let draft = DraftPolygon::from_points(vec![Point::new(5.0, 5.0), Point::new(6.0, 7.0)]);
        let doc = SessionDocument::from_parts(&[], &draft, &Calibration::default());
        assert!(!doc.polygons[0].is_completed);

        let contents = SessionDocument::from_json(&doc.to_json().unwrap())
            .unwrap()
            .into_contents()
            .unwrap();
        assert_eq!(contents.draft, draft);
        assert!(contents.completed.is_empty());
    }

    #[test]
    fn test_rejects_short_completed_polygon() {
        let json = r#"{"polygons": [{"points": [{"x": 0, "y": 0}], "isCompleted": true}], "scale": 1, "dpi": 10}"#;
        let err = parse_any(json, Calibration::default()).unwrap_err();
        assert!(matches!(err, DocumentError::InvalidPolygon { index: 0, .. }));
    }

    #[test]
    fn test_rejects_bad_calibration() {
        let json = r#"{"polygons": [], "scale": 1, "dpi": 0}"#;
        let err = parse_any(json, Calibration::default()).unwrap_err();
        assert!(matches!(err, DocumentError::InvalidCalibration(CalibrationError::InvalidDpi(_))));
    }

    #[test]
    fn test_rejects_two_drafts() {
        let json = r#"{"polygons": [
            {"points": [{"x": 0, "y": 0}], "isCompleted": false},
            {"points": [{"x": 1, "y": 1}], "isCompleted": false}
        ], "scale": 1, "dpi": 10}"#;
        assert!(matches!(
            parse_any(json, Calibration::default()),
            Err(DocumentError::MultipleDrafts)
        ));
    }

    #[test]
    fn test_rejects_missing_fields_and_garbage() {
        assert!(matches!(
            parse_any(r#"{"polygons": []}"#, Calibration::default()),
            Err(DocumentError::Parse(_))
        ));
        let no_flag = r#"{"polygons": [
            {"points": [{"x": 0, "y": 0}, {"x": 9, "y": 0}, {"x": 0, "y": 9}]}
        ], "scale": 1, "dpi": 10}"#;
        assert!(matches!(
            parse_any(no_flag, Calibration::default()),
            Err(DocumentError::Parse(_))
        ));
        assert!(matches!(
            parse_any("not json", Calibration::default()),
            Err(DocumentError::Parse(_))
        ));
        assert!(matches!(
            parse_any("42", Calibration::default()),
            Err(DocumentError::UnknownFormat)
        ));
    }

    #[test]
    fn test_legacy_sketch() {
        let cal = Calibration::new(3.0, 30.0).unwrap();
        let json = r#"[{"x": 0, "y": 0}, {"x": 100, "y": 0}, {"x": 100, "y": 100}]"#;
        let (contents, format) = parse_any(json, cal).unwrap();
        assert_eq!(format, ImportFormat::Legacy);
        assert_eq!(contents.completed.len(), 1);
        assert_eq!(contents.calibration, cal);

        let (short, _) = parse_any(r#"[{"x": 4, "y": 2}]"#, cal).unwrap();
        assert!(short.completed.is_empty());
        assert_eq!(short.draft.points(), &[Point::new(4.0, 2.0)]);
    }
}
