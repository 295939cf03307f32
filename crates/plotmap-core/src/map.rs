//! Host-facing map session: boundary snapshot, viewport and redraw tracking.

use crate::boundary::PropertyBoundary;
use crate::interaction::{InteractionStateMachine, ViewportEvent};
use crate::measure::{MapMeasurements, aggregate};
use crate::validate::validate_boundaries;
use crate::viewport::{ViewportState, ViewportTransform};
use kurbo::Size;
use serde_json::Value;

/// Holds everything a host needs to show one boundary map.
///
/// Geometry is recomputed only when the input changes. Viewport changes and
/// resizes set a dirty flag; the host polls [`BoundaryMap::take_redraw`] once
/// per frame so a burst of events results in a single redraw.
#[derive(Debug, Clone)]
pub struct BoundaryMap {
    boundaries: Vec<PropertyBoundary>,
    measurements: MapMeasurements,
    interaction: InteractionStateMachine,
    canvas_size: Size,
    measure_mode: bool,
    needs_redraw: bool,
}

impl Default for BoundaryMap {
    fn default() -> Self {
        Self::new(Size::ZERO)
    }
}

impl BoundaryMap {
    /// Create an empty map for a canvas of the given size.
    pub fn new(canvas_size: Size) -> Self {
        Self {
            boundaries: Vec::new(),
            measurements: MapMeasurements::default(),
            interaction: InteractionStateMachine::new(),
            canvas_size,
            measure_mode: false,
            needs_redraw: true,
        }
    }

    /// Replace the boundary input. The viewport is kept.
    pub fn set_boundaries(&mut self, raw: &Value) {
        self.set_validated(validate_boundaries(raw));
    }

    /// Replace the boundaries with an already-validated set.
    pub fn set_validated(&mut self, boundaries: Vec<PropertyBoundary>) {
        self.measurements = aggregate(&boundaries);
        self.boundaries = boundaries;
        self.needs_redraw = true;
        log::debug!(
            "Boundary input changed: {} boundaries, {} edges",
            self.boundaries.len(),
            self.measurements.edges.len()
        );
    }

    pub fn boundaries(&self) -> &[PropertyBoundary] {
        &self.boundaries
    }

    pub fn measurements(&self) -> &MapMeasurements {
        &self.measurements
    }

    pub fn viewport(&self) -> &ViewportState {
        self.interaction.viewport()
    }

    pub fn canvas_size(&self) -> Size {
        self.canvas_size
    }

    pub fn measure_mode(&self) -> bool {
        self.measure_mode
    }

    /// Transform for the current boundary set and canvas size.
    pub fn transform(&self) -> ViewportTransform {
        ViewportTransform::new(&self.boundaries, self.canvas_size)
    }

    /// Forward an input event to the interaction state machine.
    pub fn handle_event(&mut self, event: &ViewportEvent) -> bool {
        let changed = self.interaction.handle(event);
        if changed {
            self.needs_redraw = true;
        }
        changed
    }

    /// Canvas size changed.
    pub fn resize(&mut self, size: Size) {
        if size != self.canvas_size {
            self.canvas_size = size;
            self.needs_redraw = true;
        }
    }

    /// Reset the viewport from the host side (e.g. when a property toggles).
    pub fn reset_view(&mut self) {
        self.handle_event(&ViewportEvent::Reset);
    }

    pub fn set_measure_mode(&mut self, enabled: bool) {
        if self.measure_mode != enabled {
            self.measure_mode = enabled;
            self.needs_redraw = true;
        }
    }

    pub fn toggle_measure_mode(&mut self) {
        self.set_measure_mode(!self.measure_mode);
    }

    /// Whether a redraw is pending, without clearing it.
    pub fn needs_redraw(&self) -> bool {
        self.needs_redraw
    }

    /// Returns true at most once per batch of changes and clears the flag.
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.needs_redraw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{Point, Vec2};
    use serde_json::json;

    fn square_map() -> BoundaryMap {
        let mut map = BoundaryMap::new(Size::new(800.0, 500.0));
        map.set_boundaries(&json!([[[0, 0], [0, 10], [10, 10], [10, 0]]]));
        map
    }

    #[test]
    fn test_set_boundaries_recomputes() {
        let mut map = square_map();
        assert_eq!(map.boundaries().len(), 1);
        assert!((map.measurements().boundary_area - 100.0).abs() < 1e-12);

        map.set_boundaries(&json!([]));
        assert!(map.boundaries().is_empty());
        assert_eq!(map.measurements(), &MapMeasurements::default());
    }

    #[test]
    fn test_viewport_survives_input_change() {
        let mut map = square_map();
        map.handle_event(&ViewportEvent::ZoomIn);
        map.set_boundaries(&json!([[[0, 0], [4, 0], [0, 3]]]));
        assert!((map.viewport().scale - 1.2).abs() < 1e-12);
    }

    #[test]
    fn test_redraw_batching() {
        let mut map = square_map();
        assert!(map.take_redraw());
        assert!(!map.take_redraw());

        map.resize(Size::new(640.0, 480.0));
        map.resize(Size::new(641.0, 480.0));
        map.handle_event(&ViewportEvent::ZoomIn);
        assert!(map.take_redraw());
        assert!(!map.take_redraw());

        // Same size and a drag start do not schedule a frame.
        map.resize(Size::new(641.0, 480.0));
        map.handle_event(&ViewportEvent::PointerDown {
            position: Point::new(1.0, 1.0),
        });
        assert!(!map.needs_redraw());

        map.handle_event(&ViewportEvent::PointerMove {
            position: Point::new(4.0, 5.0),
        });
        assert!(map.take_redraw());
        assert_eq!(map.viewport().offset, Vec2::new(3.0, 4.0));
    }

    #[test]
    fn test_measure_mode_toggle() {
        let mut map = square_map();
        map.take_redraw();
        assert!(!map.measure_mode());
        map.toggle_measure_mode();
        assert!(map.measure_mode());
        assert!(map.take_redraw());
        map.set_measure_mode(true);
        assert!(!map.needs_redraw());
    }

    #[test]
    fn test_reset_view() {
        let mut map = square_map();
        map.handle_event(&ViewportEvent::ZoomOut);
        map.reset_view();
        assert_eq!(map.viewport(), &ViewportState::default());
    }

    #[test]
    fn test_transform_tracks_canvas() {
        let mut map = square_map();
        assert!((map.transform().auto_scale() - 40.0).abs() < 1e-12);
        map.resize(Size::new(100.0, 100.0));
        assert!((map.transform().auto_scale() - 8.0).abs() < 1e-12);
    }
}
