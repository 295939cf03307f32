//! Viewport state and model-to-screen transforms.
//!
//! Model space is planar with +Y pointing north; screen space is pixels with
//! +Y pointing down. The transform centers the bounding box of all
//! boundaries, fits it into [`AUTO_FIT_RATIO`] of the canvas, then applies
//! the user zoom and pan offset.

use crate::boundary::{Coordinate, PropertyBoundary};
use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Fraction of the canvas the boundaries fill before user zoom.
pub const AUTO_FIT_RATIO: f64 = 0.8;

/// Multiplicative zoom step for the zoom in/out actions.
pub const ZOOM_STEP: f64 = 1.2;

/// Drag progress. The anchor only exists while a drag is in progress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum DragState {
    #[default]
    Idle,
    /// Dragging; `anchor` is the pointer position minus the offset at drag start.
    Dragging { anchor: Vec2 },
}

/// User-controlled view parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportState {
    /// User zoom on top of the auto-fit scale. Always positive.
    pub scale: f64,
    /// Pan offset in screen pixels.
    pub offset: Vec2,
    /// Current drag state.
    pub drag: DragState,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset: Vec2::ZERO,
            drag: DragState::Idle,
        }
    }
}

impl ViewportState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.drag, DragState::Dragging { .. })
    }
}

/// Axis-aligned bounding box over all boundary points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Bounds {
    /// Bounding box of every point of every boundary, or `None` when there
    /// are no boundaries.
    pub fn from_boundaries(boundaries: &[PropertyBoundary]) -> Option<Self> {
        let mut points = boundaries.iter().flat_map(|b| b.points().iter());
        let first = points.next()?;
        let init = Self {
            min_x: first.x,
            max_x: first.x,
            min_y: first.y,
            max_y: first.y,
        };
        Some(points.fold(init, |acc, p| Self {
            min_x: acc.min_x.min(p.x),
            max_x: acc.max_x.max(p.x),
            min_y: acc.min_y.min(p.y),
            max_y: acc.max_y.max(p.y),
        }))
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    pub fn range_x(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn range_y(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn to_rect(&self) -> Rect {
        Rect::new(self.min_x, self.min_y, self.max_x, self.max_y)
    }
}

/// Scale that fits `bounds` into [`AUTO_FIT_RATIO`] of the canvas.
///
/// An axis with zero range contributes a factor of 1.
pub fn auto_scale(bounds: &Bounds, canvas: Size) -> f64 {
    let axis_scale = |extent: f64, range: f64| {
        if range > 0.0 {
            extent * AUTO_FIT_RATIO / range
        } else {
            1.0
        }
    };
    let scale_x = axis_scale(canvas.width, bounds.range_x());
    let scale_y = axis_scale(canvas.height, bounds.range_y());
    scale_x.min(scale_y)
}

/// Project a single model point, recomputing the bounding box and auto-fit
/// scale from scratch. Prefer [`ViewportTransform`] when projecting many
/// points for one frame.
pub fn project(
    boundaries: &[PropertyBoundary],
    canvas: Size,
    viewport: &ViewportState,
    point: Coordinate,
) -> Point {
    ViewportTransform::new(boundaries, canvas).to_screen(point, viewport)
}

/// Model-to-screen transform cached for one frame (one boundary set and one
/// canvas size).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportTransform {
    center: Point,
    auto_scale: f64,
    canvas: Size,
}

impl ViewportTransform {
    /// Build the transform. With no boundaries the model origin maps to the
    /// canvas center at scale 1.
    pub fn new(boundaries: &[PropertyBoundary], canvas: Size) -> Self {
        match Bounds::from_boundaries(boundaries) {
            Some(bounds) => Self {
                center: bounds.center(),
                auto_scale: auto_scale(&bounds, canvas),
                canvas,
            },
            None => Self {
                center: Point::ZERO,
                auto_scale: 1.0,
                canvas,
            },
        }
    }

    pub fn auto_scale(&self) -> f64 {
        self.auto_scale
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn canvas(&self) -> Size {
        self.canvas
    }

    /// Pixels per model unit after user zoom.
    pub fn effective_scale(&self, viewport: &ViewportState) -> f64 {
        self.auto_scale * viewport.scale
    }

    /// Model point to screen pixel. Y is inverted so north is up.
    pub fn to_screen(&self, point: Coordinate, viewport: &ViewportState) -> Point {
        let k = self.effective_scale(viewport);
        Point::new(
            (point.x - self.center.x) * k + self.canvas.width / 2.0 + viewport.offset.x,
            (self.center.y - point.y) * k + self.canvas.height / 2.0 + viewport.offset.y,
        )
    }

    /// Screen pixel back to model space.
    pub fn to_model(&self, screen: Point, viewport: &ViewportState) -> Coordinate {
        let k = self.effective_scale(viewport);
        Point::new(
            (screen.x - self.canvas.width / 2.0 - viewport.offset.x) / k + self.center.x,
            self.center.y - (screen.y - self.canvas.height / 2.0 - viewport.offset.y) / k,
        )
    }

    /// Model distance covered by `pixels` screen pixels.
    pub fn scale_bar_distance(&self, viewport: &ViewportState, pixels: f64) -> f64 {
        pixels / self.effective_scale(viewport)
    }
}
