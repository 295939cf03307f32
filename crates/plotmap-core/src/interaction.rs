//! Pointer/touch interaction state machine for panning and zooming.

use crate::viewport::{DragState, ViewportState, ZOOM_STEP};
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Input events that drive the viewport.
///
/// Positions are in screen pixels. Touch events carry every active touch
/// point; only single-finger gestures pan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ViewportEvent {
    PointerDown { position: Point },
    PointerMove { position: Point },
    PointerUp,
    PointerLeave,
    TouchStart { touches: Vec<Point> },
    TouchMove { touches: Vec<Point> },
    TouchEnd,
    ZoomIn,
    ZoomOut,
    Reset,
}

/// Owns the [`ViewportState`] and applies [`ViewportEvent`]s to it.
///
/// States are `Idle` and `Dragging`; zoom and reset are accepted in either.
#[derive(Debug, Clone, Default)]
pub struct InteractionStateMachine {
    state: ViewportState,
}

impl InteractionStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current viewport, read-only.
    pub fn viewport(&self) -> &ViewportState {
        &self.state
    }

    /// Apply one event. Returns true if the viewport changed in a way that
    /// requires a redraw.
    pub fn handle(&mut self, event: &ViewportEvent) -> bool {
        match event {
            ViewportEvent::PointerDown { position } => self.begin_drag(*position),
            ViewportEvent::PointerMove { position } => self.drag_to(*position),
            ViewportEvent::TouchStart { touches } => match touches.as_slice() {
                [single] => self.begin_drag(*single),
                _ => false,
            },
            ViewportEvent::TouchMove { touches } => match touches.as_slice() {
                [single] => self.drag_to(*single),
                _ => false,
            },
            ViewportEvent::PointerUp | ViewportEvent::PointerLeave | ViewportEvent::TouchEnd => {
                self.end_drag()
            }
            ViewportEvent::ZoomIn => self.zoom_by(ZOOM_STEP),
            ViewportEvent::ZoomOut => self.zoom_by(1.0 / ZOOM_STEP),
            ViewportEvent::Reset => self.reset(),
        }
    }

    /// Start dragging from `position`. Ignored while already dragging.
    pub fn begin_drag(&mut self, position: Point) -> bool {
        if self.state.is_dragging() {
            return false;
        }
        self.state.drag = DragState::Dragging {
            anchor: position.to_vec2() - self.state.offset,
        };
        // Entering the drag state does not move anything on screen.
        false
    }

    /// Move the drag to `position`. No effect while idle.
    pub fn drag_to(&mut self, position: Point) -> bool {
        let DragState::Dragging { anchor } = self.state.drag else {
            return false;
        };
        let offset = position.to_vec2() - anchor;
        if offset == self.state.offset {
            return false;
        }
        self.state.offset = offset;
        true
    }

    /// Finish any drag in progress. The offset is left where it is.
    pub fn end_drag(&mut self) -> bool {
        self.state.drag = DragState::Idle;
        false
    }

    /// Multiply the user zoom by `factor`.
    ///
    /// A step that would leave the scale non-finite or non-positive is
    /// ignored.
    pub fn zoom_by(&mut self, factor: f64) -> bool {
        let scale = self.state.scale * factor;
        if !scale.is_finite() || scale <= 0.0 {
            log::warn!("Ignoring zoom step to invalid scale {}", scale);
            return false;
        }
        self.state.scale = scale;
        true
    }

    pub fn zoom_in(&mut self) -> bool {
        self.zoom_by(ZOOM_STEP)
    }

    pub fn zoom_out(&mut self) -> bool {
        self.zoom_by(1.0 / ZOOM_STEP)
    }

    /// Back to `scale = 1`, zero offset, idle.
    pub fn reset(&mut self) -> bool {
        let changed = self.state.scale != 1.0 || self.state.offset != Vec2::ZERO;
        self.state = ViewportState::default();
        changed
    }
}
