//! Pointer input translation: turns raw pointer events into session edits.

use crate::session::{AddPoint, Session, VertexRef};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Maximum pointer travel (pixels) between press and release for the gesture
/// to count as a click.
pub const CLICK_SLOP: f64 = 4.0;

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Pointer event in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down { position: Point, button: MouseButton },
    Up { position: Point, button: MouseButton },
    Move { position: Point },
}

/// What an event did to the session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputOutcome {
    /// A click placed a point.
    Point(AddPoint),
    /// A press on a vertex travelled past the click slop; the vertex now
    /// follows the pointer.
    DragStarted(VertexRef),
    /// A dragged vertex moved.
    VertexMoved(VertexRef),
    /// A vertex drag ended.
    DragEnded(VertexRef),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Gesture {
    Idle,
    /// Left button held; becomes a click on release unless the pointer
    /// travels too far. `vertex` is the completed-polygon vertex under the
    /// press, which starts dragging once the pointer leaves the slop.
    Pressed {
        origin: Point,
        moved: bool,
        vertex: Option<VertexRef>,
    },
    /// A completed-polygon vertex follows the pointer.
    Dragging(VertexRef),
}

/// Gesture state for the drawing canvas.
///
/// Pressing on a completed vertex and moving drags it. A press and release
/// without travel places a point, even on top of an existing vertex. Only
/// the left button interacts.
#[derive(Debug, Clone)]
pub struct CanvasInput {
    gesture: Gesture,
}

impl Default for CanvasInput {
    fn default() -> Self {
        Self {
            gesture: Gesture::Idle,
        }
    }
}

impl CanvasInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Vertex currently being dragged, if any.
    pub fn dragging(&self) -> Option<VertexRef> {
        match self.gesture {
            Gesture::Dragging(vertex) => Some(vertex),
            _ => None,
        }
    }

    /// Abandon the current gesture without applying it.
    pub fn cancel(&mut self) {
        self.gesture = Gesture::Idle;
    }

    /// Process one pointer event against the session.
    pub fn handle_pointer_event(
        &mut self,
        session: &mut Session,
        event: PointerEvent,
    ) -> Option<InputOutcome> {
        match event {
            PointerEvent::Down { position, button } => {
                if button != MouseButton::Left {
                    return None;
                }
                self.gesture = Gesture::Pressed {
                    origin: position,
                    moved: false,
                    vertex: session.hit_test_vertex(position),
                };
                None
            }
            PointerEvent::Move { position } => match &mut self.gesture {
                Gesture::Dragging(vertex) => {
                    let vertex = *vertex;
                    session.move_vertex(vertex.polygon, vertex.vertex, position);
                    Some(InputOutcome::VertexMoved(vertex))
                }
                Gesture::Pressed { origin, moved, vertex } => {
                    if origin.distance(position) <= CLICK_SLOP {
                        return None;
                    }
                    match *vertex {
                        Some(vertex) => {
                            self.gesture = Gesture::Dragging(vertex);
                            session.move_vertex(vertex.polygon, vertex.vertex, position);
                            Some(InputOutcome::DragStarted(vertex))
                        }
                        None => {
                            *moved = true;
                            None
                        }
                    }
                }
                Gesture::Idle => None,
            },
            PointerEvent::Up { position, button } => {
                if button != MouseButton::Left {
                    return None;
                }
                let gesture = std::mem::replace(&mut self.gesture, Gesture::Idle);
                match gesture {
                    Gesture::Dragging(vertex) => Some(InputOutcome::DragEnded(vertex)),
                    Gesture::Pressed { origin, moved, .. } => {
                        if moved || origin.distance(position) > CLICK_SLOP {
                            None
                        } else {
                            Some(InputOutcome::Point(session.add_point(origin)))
                        }
                    }
                    Gesture::Idle => None,
                }
            }
        }
    }
}
