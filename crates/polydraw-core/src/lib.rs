//! Polydraw Core Library
//!
//! Geometry, polygon model, drawing session and persistence for the
//! Polydraw polygon measuring tool.

pub mod calibration;
pub mod document;
pub mod export;
pub mod geometry;
pub mod input;
pub mod measure;
pub mod polygon;
pub mod session;
pub mod storage;

pub use calibration::{Calibration, CalibrationError};
pub use document::{DocumentError, ImportFormat, SessionDocument};
pub use geometry::CLOSE_TOLERANCE;
pub use input::{CanvasInput, InputOutcome, MouseButton, PointerEvent};
pub use measure::{EdgeMeasurement, PolygonMeasurement};
pub use polygon::{ClosedPolygon, DraftPolygon, Polygon, PolygonError, PolygonView};
pub use session::{AddPoint, PolygonRef, Session, VertexRef};
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError, SKETCH_KEY};
