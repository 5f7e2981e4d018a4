//! The drawing canvas: egui painter backend and pointer plumbing.

use egui::{Align2, Color32, FontId, Mesh, Painter, Pos2, Rect, Sense, Stroke, Vec2};
use kurbo::{BezPath, PathEl, Point, Size};
use peniko::Color;
use polydraw_core::{CanvasInput, MouseButton, PointerEvent, Session};
use polydraw_render::{LABEL_FONT_SIZE, LabelKind, RenderContext, Renderer};

fn to_color32(color: Color) -> Color32 {
    let c = color.to_rgba8();
    Color32::from_rgba_unmultiplied(c.r, c.g, c.b, c.a)
}

/// Triangulate a simple polygon outline into a filled mesh.
fn fill_mesh(points: &[Pos2], color: Color32) -> Option<Mesh> {
    let coords: Vec<f64> = points
        .iter()
        .flat_map(|p| [p.x as f64, p.y as f64])
        .collect();
    let indices = earcutr::earcut(&coords, &[], 2).ok()?;
    if indices.is_empty() {
        return None;
    }
    let mut mesh = Mesh::default();
    for p in points {
        mesh.colored_vertex(*p, color);
    }
    for tri in indices.chunks_exact(3) {
        mesh.add_triangle(tri[0] as u32, tri[1] as u32, tri[2] as u32);
    }
    Some(mesh)
}

/// Renderer drawing onto an egui painter. Canvas coordinates are offset by
/// the top-left corner of the canvas rect.
pub struct PainterRenderer<'p> {
    painter: &'p Painter,
    origin: Pos2,
}

impl<'p> PainterRenderer<'p> {
    pub fn new(painter: &'p Painter, origin: Pos2) -> Self {
        Self { painter, origin }
    }

    fn to_screen(&self, p: Point) -> Pos2 {
        self.origin + Vec2::new(p.x as f32, p.y as f32)
    }

    /// Flatten a polyline path into screen points and its closed flag.
    fn screen_points(&self, path: &BezPath) -> (Vec<Pos2>, bool) {
        let mut points = Vec::new();
        let mut closed = false;
        for el in path.elements() {
            match *el {
                PathEl::MoveTo(p) | PathEl::LineTo(p) => points.push(self.to_screen(p)),
                PathEl::QuadTo(_, p) => points.push(self.to_screen(p)),
                PathEl::CurveTo(_, _, p) => points.push(self.to_screen(p)),
                PathEl::ClosePath => closed = true,
            }
        }
        (points, closed)
    }
}

impl Renderer for PainterRenderer<'_> {
    fn clear(&mut self, color: Color) {
        self.painter
            .rect_filled(self.painter.clip_rect(), egui::CornerRadius::ZERO, to_color32(color));
    }

    fn fill_path(&mut self, path: &BezPath, color: Color) {
        let (points, _) = self.screen_points(path);
        if points.len() < 3 {
            return;
        }
        match fill_mesh(&points, to_color32(color)) {
            Some(mesh) => {
                self.painter.add(egui::Shape::mesh(mesh));
            }
            None => log::debug!("Skipping fill of degenerate outline"),
        }
    }

    fn stroke_path(&mut self, path: &BezPath, width: f64, color: Color) {
        let (points, closed) = self.screen_points(path);
        let stroke = Stroke::new(width as f32, to_color32(color));
        if closed {
            self.painter.add(egui::Shape::closed_line(points, stroke));
        } else {
            self.painter.add(egui::Shape::line(points, stroke));
        }
    }

    fn draw_handle(&mut self, center: Point, radius: f64, color: Color) {
        self.painter
            .circle_filled(self.to_screen(center), radius as f32, to_color32(color));
    }

    fn draw_label(&mut self, anchor: Point, text: &str, _kind: LabelKind, color: Color) {
        self.painter.text(
            self.to_screen(anchor),
            Align2::LEFT_TOP,
            text,
            FontId::proportional(LABEL_FONT_SIZE),
            to_color32(color),
        );
    }
}

/// Draw the canvas and feed this frame's pointer input to the session.
///
/// Returns the canvas size.
pub fn show_canvas(
    ui: &mut egui::Ui,
    session: &mut Session,
    input: &mut CanvasInput,
    background: Color,
    show_labels: bool,
) -> Size {
    let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::click_and_drag());
    let rect = response.rect;

    for event in pointer_events(ui, &response, rect) {
        if let Some(outcome) = input.handle_pointer_event(session, event) {
            log::debug!("Canvas input: {:?}", outcome);
        }
    }

    let size = Size::new(rect.width() as f64, rect.height() as f64);
    let ctx = RenderContext::new(session, size)
        .with_background(background)
        .with_labels(show_labels)
        .with_active_vertex(input.dragging());
    PainterRenderer::new(&painter, rect.min).build_scene(&ctx);

    if input.dragging().is_some() {
        ui.ctx().set_cursor_icon(egui::CursorIcon::Grabbing);
    } else if response.hovered() {
        let hovered_vertex = response
            .hover_pos()
            .and_then(|pos| session.hit_test_vertex(to_canvas(pos, rect)));
        if hovered_vertex.is_some() {
            ui.ctx().set_cursor_icon(egui::CursorIcon::Grab);
        } else {
            ui.ctx().set_cursor_icon(egui::CursorIcon::Crosshair);
        }
    }

    size
}

fn to_canvas(pos: Pos2, rect: Rect) -> Point {
    let local = pos - rect.min;
    Point::new(local.x as f64, local.y as f64)
}

/// Translate egui's pointer state into canvas pointer events.
///
/// Presses only count inside the canvas; moves and releases are forwarded
/// wherever they happen so drags that leave the canvas still finish.
fn pointer_events(ui: &egui::Ui, response: &egui::Response, rect: Rect) -> Vec<PointerEvent> {
    let mut events = Vec::new();
    ui.input(|i| {
        let Some(pos) = i.pointer.interact_pos() else {
            return;
        };
        let position = to_canvas(pos, rect);
        if i.pointer.primary_pressed() && response.hovered() {
            events.push(PointerEvent::Down { position, button: MouseButton::Left });
        }
        if i.pointer.delta() != Vec2::ZERO {
            events.push(PointerEvent::Move { position });
        }
        if i.pointer.primary_released() {
            events.push(PointerEvent::Up { position, button: MouseButton::Left });
        }
    });
    events
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_canvas() {
        let rect = Rect::from_min_size(Pos2::new(10.0, 20.0), Vec2::new(100.0, 100.0));
        assert_eq!(to_canvas(Pos2::new(15.0, 40.0), rect), Point::new(5.0, 20.0));
    }

    fn in_triangle(p: Pos2, a: Pos2, b: Pos2, c: Pos2) -> bool {
        let cross = |o: Pos2, u: Pos2, v: Pos2| (u - o).x * (v - o).y - (u - o).y * (v - o).x;
        let (d1, d2, d3) = (cross(a, b, p), cross(b, c, p), cross(c, a, p));
        let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
        let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
        !(has_neg && has_pos)
    }

    fn mesh_covers(mesh: &Mesh, p: Pos2) -> bool {
        mesh.indices.chunks_exact(3).any(|tri| {
            let v = |i: u32| mesh.vertices[i as usize].pos;
            in_triangle(p, v(tri[0]), v(tri[1]), v(tri[2]))
        })
    }

    #[test]
    fn test_concave_fill_stays_inside_outline() {
        let l_shape = [
            Pos2::new(0.0, 0.0),
            Pos2::new(200.0, 0.0),
            Pos2::new(200.0, 100.0),
            Pos2::new(100.0, 100.0),
            Pos2::new(100.0, 200.0),
            Pos2::new(0.0, 200.0),
        ];
        let mesh = fill_mesh(&l_shape, Color32::RED).unwrap();

        assert_eq!(mesh.vertices.len(), 6);
        assert_eq!(mesh.indices.len(), 12);
        assert!(mesh_covers(&mesh, Pos2::new(50.0, 50.0)));
        assert!(mesh_covers(&mesh, Pos2::new(150.0, 50.0)));
        assert!(mesh_covers(&mesh, Pos2::new(50.0, 150.0)));
        // The notch is outside the polygon.
        assert!(!mesh_covers(&mesh, Pos2::new(150.0, 150.0)));
    }

    #[test]
    fn test_fill_mesh_degenerate() {
        let line = [Pos2::new(0.0, 0.0), Pos2::new(10.0, 0.0), Pos2::new(20.0, 0.0)];
        assert!(fill_mesh(&line, Color32::RED).is_none());
    }

    #[test]
    fn test_to_color32() {
        let c = to_color32(Color::from_rgba8(1, 2, 3, 255));
        assert_eq!(c, Color32::from_rgb(1, 2, 3));
    }
}
