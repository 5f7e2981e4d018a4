//! Renderer trait abstraction and scene traversal.

use kurbo::{BezPath, Point, Size};
use peniko::Color;
use polydraw_core::measure;
use polydraw_core::{PolygonView, Session, VertexRef};
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Initialization failed: {0}")]
    InitFailed(String),
    #[error("PNG encoding failed: {0}")]
    Encode(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Label text size in pixels, shared by every backend.
pub const LABEL_FONT_SIZE: f32 = 14.0;

/// Which kind of label is being drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelKind {
    /// Polygon area, anchored at the vertex centroid.
    Area,
    /// Side length, anchored at the side's midpoint.
    Edge,
}

/// Context for a single render frame.
pub struct RenderContext<'a> {
    /// The session to render.
    pub session: &'a Session,
    /// Viewport size in pixels.
    pub viewport_size: Size,
    pub background_color: Color,
    /// Interior of completed polygons.
    pub fill_color: Color,
    /// Outline of completed polygons.
    pub stroke_color: Color,
    /// Open polyline of the draft.
    pub draft_stroke_color: Color,
    /// Vertex handles of completed polygons.
    pub handle_color: Color,
    /// Vertex markers of the draft.
    pub draft_handle_color: Color,
    pub area_label_color: Color,
    pub edge_label_color: Color,
    pub stroke_width: f64,
    pub handle_radius: f64,
    /// Whether area and length labels are drawn.
    pub show_labels: bool,
    /// Vertex being dragged, drawn enlarged.
    pub active_vertex: Option<VertexRef>,
}

impl<'a> RenderContext<'a> {
    /// Create a new render context.
    pub fn new(session: &'a Session, viewport_size: Size) -> Self {
        Self {
            session,
            viewport_size,
            background_color: Color::from_rgba8(255, 255, 255, 255),
            fill_color: Color::from_rgba8(173, 216, 230, 255), // Light blue
            stroke_color: Color::from_rgba8(0, 0, 255, 255),
            draft_stroke_color: Color::from_rgba8(0, 0, 0, 255),
            handle_color: Color::from_rgba8(0, 123, 255, 255),
            draft_handle_color: Color::from_rgba8(255, 0, 0, 255),
            area_label_color: Color::from_rgba8(255, 0, 0, 255),
            edge_label_color: Color::from_rgba8(0, 0, 0, 255),
            stroke_width: 2.0,
            handle_radius: 5.0,
            show_labels: true,
            active_vertex: None,
        }
    }

    /// Set the background color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    /// Toggle measurement labels.
    pub fn with_labels(mut self, show: bool) -> Self {
        self.show_labels = show;
        self
    }

    /// Set the vertex being dragged.
    pub fn with_active_vertex(mut self, vertex: Option<VertexRef>) -> Self {
        self.active_vertex = vertex;
        self
    }
}

/// Trait for rendering backends.
///
/// Backends implement the drawing primitives; [`Renderer::build_scene`] walks
/// the session and calls them in paint order.
pub trait Renderer {
    /// Reset the target to a solid color.
    fn clear(&mut self, color: Color);

    fn fill_path(&mut self, path: &BezPath, color: Color);

    fn stroke_path(&mut self, path: &BezPath, width: f64, color: Color);

    fn draw_handle(&mut self, center: Point, radius: f64, color: Color);

    /// Draw a text label. Backends without text support may ignore it.
    fn draw_label(&mut self, anchor: Point, text: &str, kind: LabelKind, color: Color);

    /// Draw the whole session: completed polygons in creation order (fill,
    /// outline, handles, labels), then the draft on top.
    fn build_scene(&mut self, ctx: &RenderContext) {
        self.clear(ctx.background_color);

        let mut polygon_index = 0;
        for polygon in ctx.session.polygons() {
            match polygon {
                PolygonView::Completed(closed) => {
                    let path = closed.to_path();
                    self.fill_path(&path, ctx.fill_color);
                    self.stroke_path(&path, ctx.stroke_width, ctx.stroke_color);

                    for (vertex, point) in closed.points().iter().enumerate() {
                        let active = ctx.active_vertex.is_some_and(|v| {
                            v.polygon.0 == polygon_index && v.vertex == vertex
                        });
                        let radius = if active {
                            ctx.handle_radius * 1.5
                        } else {
                            ctx.handle_radius
                        };
                        self.draw_handle(*point, radius, ctx.handle_color);
                    }

                    if ctx.show_labels {
                        let m = measure::measure_polygon(closed, ctx.session.calibration());
                        self.draw_label(
                            m.centroid,
                            &m.area_label(),
                            LabelKind::Area,
                            ctx.area_label_color,
                        );
                        for edge in &m.edges {
                            self.draw_label(
                                edge.midpoint,
                                &edge.label(),
                                LabelKind::Edge,
                                ctx.edge_label_color,
                            );
                        }
                    }
                    polygon_index += 1;
                }
                PolygonView::InProgress(draft) => {
                    if draft.len() > 1 {
                        let path = draft.to_path();
                        self.stroke_path(&path, ctx.stroke_width, ctx.draft_stroke_color);
                    }
                    for point in draft.points() {
                        self.draw_handle(*point, ctx.handle_radius, ctx.draft_handle_color);
                    }
                }
            }
        }
    }
}
