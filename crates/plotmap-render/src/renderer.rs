//! Renderer trait abstraction.

use kurbo::Size;
use peniko::Color;
use plotmap_core::map::BoundaryMap;
use plotmap_core::measure::MapMeasurements;
use plotmap_core::boundary::PropertyBoundary;
use plotmap_core::viewport::ViewportState;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Surface error: {0}")]
    Surface(String),
    #[error("Encode failed: {0}")]
    Encode(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Colors and sizes used to draw a boundary map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapStyle {
    /// Canvas clear color.
    pub background: Color,
    /// Polygon interior.
    pub boundary_fill: Color,
    /// Polygon outline.
    pub boundary_stroke: Color,
    pub boundary_stroke_width: f64,
    /// Vertex marker fill and vertex letter color.
    pub vertex_fill: Color,
    pub vertex_radius: f64,
    /// Outline around vertex markers, badges and the placeholder pin.
    pub halo: Color,
    /// Numbered edge badge fill.
    pub badge_fill: Color,
    pub badge_radius: f64,
    /// Edge length label text and plate border.
    pub label_color: Color,
    /// Edge length label plate fill.
    pub label_plate: Color,
    /// Distance from an edge midpoint to its length label, in pixels.
    pub label_offset: f64,
    /// Pixel size of one bitmap font cell.
    pub text_scale: u32,
    /// Scale bar lines and text.
    pub scale_bar: Color,
    /// Scale bar length in pixels.
    pub scale_bar_length: f64,
    /// Placeholder pin drawn when there are no boundaries.
    pub placeholder: Color,
}

impl Default for MapStyle {
    fn default() -> Self {
        Self {
            background: Color::from_rgba8(249, 250, 251, 255),
            boundary_fill: Color::from_rgba8(155, 135, 245, 77),
            boundary_stroke: Color::from_rgba8(110, 89, 165, 255),
            boundary_stroke_width: 3.0,
            vertex_fill: Color::from_rgba8(26, 31, 44, 255),
            vertex_radius: 4.0,
            halo: Color::from_rgba8(255, 255, 255, 255),
            badge_fill: Color::from_rgba8(110, 89, 165, 255),
            badge_radius: 9.0,
            label_color: Color::from_rgba8(110, 89, 165, 255),
            label_plate: Color::from_rgba8(255, 255, 255, 235),
            label_offset: 15.0,
            text_scale: 2,
            scale_bar: Color::from_rgba8(51, 51, 51, 255),
            scale_bar_length: 100.0,
            placeholder: Color::from_rgba8(155, 135, 245, 255),
        }
    }
}

/// Context for a single render frame.
pub struct RenderContext<'a> {
    /// Validated boundaries to draw.
    pub boundaries: &'a [PropertyBoundary],
    /// Measurements for the same boundaries (edge labels come from here).
    pub measurements: &'a MapMeasurements,
    /// Current zoom and pan.
    pub viewport: &'a ViewportState,
    /// Canvas size used for the model-to-screen transform.
    pub viewport_size: Size,
    /// Draw numbered edge badges and length labels.
    pub measure_mode: bool,
    /// Draw the north arrow in the top-right corner.
    pub north_indicator: bool,
    /// Colors and sizes.
    pub style: MapStyle,
}

impl<'a> RenderContext<'a> {
    /// Create a new render context.
    pub fn new(
        boundaries: &'a [PropertyBoundary],
        measurements: &'a MapMeasurements,
        viewport: &'a ViewportState,
        viewport_size: Size,
    ) -> Self {
        Self {
            boundaries,
            measurements,
            viewport,
            viewport_size,
            measure_mode: false,
            north_indicator: true,
            style: MapStyle::default(),
        }
    }

    /// Context reflecting the current state of a [`BoundaryMap`].
    pub fn from_map(map: &'a BoundaryMap) -> Self {
        Self::new(
            map.boundaries(),
            map.measurements(),
            map.viewport(),
            map.canvas_size(),
        )
        .with_measure_mode(map.measure_mode())
    }

    /// Show or hide the per-edge measurement overlay.
    pub fn with_measure_mode(mut self, measure_mode: bool) -> Self {
        self.measure_mode = measure_mode;
        self
    }

    /// Show or hide the north arrow.
    pub fn with_north_indicator(mut self, enabled: bool) -> Self {
        self.north_indicator = enabled;
        self
    }

    /// Set the style.
    pub fn with_style(mut self, style: MapStyle) -> Self {
        self.style = style;
        self
    }

    /// Set the background color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.style.background = color;
        self
    }
}

/// Trait for rendering backends.
///
/// A renderer owns its drawing surface. Without a surface (never resized, or
/// resized to zero) every render call is a no-op.
pub trait Renderer {
    /// Reallocate the surface for a new canvas size.
    fn resize(&mut self, width: u32, height: u32);

    /// Draw one frame. Returns false when there was no surface to draw on.
    ///
    /// Rendering is idempotent: the same context produces the same pixels.
    fn render(&mut self, ctx: &RenderContext) -> bool;

    /// Get the background color (for clearing).
    fn background_color(&self, ctx: &RenderContext) -> Color {
        ctx.style.background
    }
}
