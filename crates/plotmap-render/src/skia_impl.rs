//! tiny-skia based renderer drawing into an owned pixel surface.

use crate::glyphs::{GLYPH_HEIGHT, layout_text};
use crate::renderer::{MapStyle, RenderContext, RenderResult, Renderer, RendererError};
use kurbo::{BezPath, Circle, PathEl, Point, RoundedRect, Shape as KurboShape, Size, Vec2};
use peniko::Color;
use plotmap_core::format::{format_scale_label, vertex_label};
use plotmap_core::viewport::ViewportTransform;
use tiny_skia::{FillRule, LineCap, Paint, Pixmap, Stroke, Transform};

/// Tolerance for flattening kurbo curves into tiny-skia paths.
const PATH_TOLERANCE: f64 = 0.1;

/// Distance of the scale bar from the left and bottom canvas edges.
const SCALE_BAR_MARGIN: f64 = 20.0;
/// Half height of the scale bar end ticks.
const SCALE_BAR_TICK: f64 = 5.0;

/// Result of reading back a frame - contains the raw RGBA pixel data and dimensions.
#[derive(Debug)]
pub struct PngRenderResult {
    /// RGBA pixel data (4 bytes per pixel, not premultiplied).
    pub rgba_data: Vec<u8>,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
}

/// CPU renderer for boundary maps.
#[derive(Default)]
pub struct SkiaRenderer {
    /// The drawing surface. `None` until a non-empty size is set.
    surface: Option<Pixmap>,
}

fn skia_color(color: Color) -> tiny_skia::Color {
    let rgba = color.to_rgba8();
    tiny_skia::Color::from_rgba8(rgba.r, rgba.g, rgba.b, rgba.a)
}

fn paint(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(skia_color(color));
    paint.anti_alias = true;
    paint
}

fn stroke(width: f64) -> Stroke {
    Stroke {
        width: width as f32,
        line_cap: LineCap::Round,
        ..Default::default()
    }
}

/// Convert a kurbo path into a tiny-skia path. Returns `None` for empty or
/// non-finite paths (e.g. after extreme zoom).
fn to_skia_path(path: &BezPath) -> Option<tiny_skia::Path> {
    let mut pb = tiny_skia::PathBuilder::new();
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => pb.move_to(p.x as f32, p.y as f32),
            PathEl::LineTo(p) => pb.line_to(p.x as f32, p.y as f32),
            PathEl::QuadTo(p1, p2) => {
                pb.quad_to(p1.x as f32, p1.y as f32, p2.x as f32, p2.y as f32)
            }
            PathEl::CurveTo(p1, p2, p3) => pb.cubic_to(
                p1.x as f32,
                p1.y as f32,
                p2.x as f32,
                p2.y as f32,
                p3.x as f32,
                p3.y as f32,
            ),
            PathEl::ClosePath => pb.close(),
        }
    }
    pb.finish()
}

/// Closed polygon through `points`.
fn polygon_path(points: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    if let Some((first, rest)) = points.split_first() {
        path.move_to(*first);
        for p in rest {
            path.line_to(*p);
        }
        path.close_path();
    }
    path
}

/// Screen-space offset from an edge midpoint to its length label.
fn label_offset(start: Point, end: Point, distance: f64) -> Vec2 {
    let angle = (end.y - start.y).atan2(end.x - start.x);
    let perpendicular = angle + std::f64::consts::FRAC_PI_2;
    Vec2::new(perpendicular.cos() * distance, perpendicular.sin() * distance)
}

fn fill_and_stroke(
    pixmap: &mut Pixmap,
    path: &BezPath,
    fill: Color,
    outline: Option<(Color, f64)>,
) {
    let Some(path) = to_skia_path(path) else {
        return;
    };
    pixmap.fill_path(&path, &paint(fill), FillRule::Winding, Transform::identity(), None);
    if let Some((color, width)) = outline {
        pixmap.stroke_path(&path, &paint(color), &stroke(width), Transform::identity(), None);
    }
}

fn stroke_only(pixmap: &mut Pixmap, path: &BezPath, color: Color, width: f64) {
    if let Some(path) = to_skia_path(path) {
        pixmap.stroke_path(&path, &paint(color), &stroke(width), Transform::identity(), None);
    }
}

/// Draw bitmap text with its top-left corner at `origin`.
fn draw_text(pixmap: &mut Pixmap, text: &str, origin: Point, scale: u32, color: Color) {
    let layout = layout_text(text);
    let paint = Paint {
        anti_alias: false,
        ..paint(color)
    };
    // Snap to whole pixels so glyph cells stay crisp.
    let x0 = origin.x.round() as f32;
    let y0 = origin.y.round() as f32;
    let cell = scale as f32;
    for &(col, row) in &layout.cells {
        let Some(rect) =
            tiny_skia::Rect::from_xywh(x0 + col as f32 * cell, y0 + row as f32 * cell, cell, cell)
        else {
            continue;
        };
        pixmap.fill_rect(rect, &paint, Transform::identity(), None);
    }
}

/// Draw bitmap text centered on `center`.
fn draw_text_centered(pixmap: &mut Pixmap, text: &str, center: Point, scale: u32, color: Color) {
    let size = layout_text(text).size(scale);
    let origin = Point::new(center.x - size.width / 2.0, center.y - size.height / 2.0);
    draw_text(pixmap, text, origin, scale, color);
}

impl SkiaRenderer {
    /// Create a renderer without a surface.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a renderer with a surface of the given size.
    pub fn with_size(width: u32, height: u32) -> Self {
        let mut renderer = Self::new();
        renderer.resize(width, height);
        renderer
    }

    /// The current surface, if any.
    pub fn frame(&self) -> Option<&Pixmap> {
        self.surface.as_ref()
    }

    /// Surface size in pixels, if any.
    pub fn size(&self) -> Option<(u32, u32)> {
        self.surface.as_ref().map(|p| (p.width(), p.height()))
    }

    /// Read the surface back as straight (non-premultiplied) RGBA.
    pub fn to_rgba(&self) -> RenderResult<PngRenderResult> {
        let pixmap = self
            .surface
            .as_ref()
            .ok_or_else(|| RendererError::Surface("No surface to read back".to_string()))?;
        let mut rgba_data = Vec::with_capacity(pixmap.data().len());
        for pixel in pixmap.pixels() {
            let c = pixel.demultiply();
            rgba_data.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }
        Ok(PngRenderResult {
            rgba_data,
            width: pixmap.width(),
            height: pixmap.height(),
        })
    }

    fn draw_boundaries(pixmap: &mut Pixmap, ctx: &RenderContext, transform: &ViewportTransform) {
        let style = &ctx.style;
        for boundary in ctx.boundaries {
            let screen: Vec<Point> = boundary
                .points()
                .iter()
                .map(|p| transform.to_screen(*p, ctx.viewport))
                .collect();
            fill_and_stroke(
                pixmap,
                &polygon_path(&screen),
                style.boundary_fill,
                Some((style.boundary_stroke, style.boundary_stroke_width)),
            );
        }
    }

    fn draw_edge_annotations(
        pixmap: &mut Pixmap,
        ctx: &RenderContext,
        transform: &ViewportTransform,
    ) {
        let style = &ctx.style;
        for edge in &ctx.measurements.edges {
            let start = transform.to_screen(edge.start, ctx.viewport);
            let end = transform.to_screen(edge.end, ctx.viewport);
            let mid = transform.to_screen(edge.midpoint, ctx.viewport);

            // Length label plate, pushed off the edge along its perpendicular.
            let text = &edge.display_length;
            let text_size = layout_text(text).size(style.text_scale);
            let label_center = mid + label_offset(start, end, style.label_offset);
            let pad = Size::new(5.0, 3.0);
            let plate = RoundedRect::new(
                label_center.x - text_size.width / 2.0 - pad.width,
                label_center.y - text_size.height / 2.0 - pad.height,
                label_center.x + text_size.width / 2.0 + pad.width,
                label_center.y + text_size.height / 2.0 + pad.height,
                4.0,
            );
            fill_and_stroke(
                pixmap,
                &plate.to_path(PATH_TOLERANCE),
                style.label_plate,
                Some((style.label_color, 1.0)),
            );
            draw_text_centered(pixmap, text, label_center, style.text_scale, style.label_color);

            // Numbered badge on the midpoint, 1-based within each boundary.
            let badge = Circle::new(mid, style.badge_radius);
            fill_and_stroke(
                pixmap,
                &badge.to_path(PATH_TOLERANCE),
                style.badge_fill,
                Some((style.halo, 1.5)),
            );
            let number = (edge.edge_index + 1).to_string();
            draw_text_centered(pixmap, &number, mid, 1, style.halo);
        }
    }

    fn draw_vertices(pixmap: &mut Pixmap, ctx: &RenderContext, transform: &ViewportTransform) {
        let style = &ctx.style;
        let letter_height = (GLYPH_HEIGHT * style.text_scale) as f64;
        for boundary in ctx.boundaries {
            for (index, point) in boundary.points().iter().enumerate() {
                let screen = transform.to_screen(*point, ctx.viewport);
                let marker = Circle::new(screen, style.vertex_radius);
                fill_and_stroke(
                    pixmap,
                    &marker.to_path(PATH_TOLERANCE),
                    style.vertex_fill,
                    Some((style.halo, 1.0)),
                );
                let origin = Point::new(
                    screen.x + style.vertex_radius + 2.0,
                    screen.y - style.vertex_radius - 2.0 - letter_height,
                );
                draw_text(pixmap, &vertex_label(index), origin, style.text_scale, style.vertex_fill);
            }
        }
    }

    fn draw_placeholder(pixmap: &mut Pixmap, ctx: &RenderContext) {
        let style = &ctx.style;
        let marker = Point::new(
            ctx.viewport_size.width / 2.0 + ctx.viewport.offset.x,
            ctx.viewport_size.height / 2.0 + ctx.viewport.offset.y,
        );
        let head = Circle::new(Point::new(marker.x, marker.y - 15.0), 10.0);
        fill_and_stroke(
            pixmap,
            &head.to_path(PATH_TOLERANCE),
            style.placeholder,
            Some((style.halo, 2.0)),
        );
        let tip = polygon_path(&[
            Point::new(marker.x, marker.y - 5.0),
            Point::new(marker.x - 8.0, marker.y + 10.0),
            Point::new(marker.x + 8.0, marker.y + 10.0),
        ]);
        fill_and_stroke(pixmap, &tip, style.placeholder, Some((style.halo, 2.0)));
    }

    fn draw_scale_bar(
        pixmap: &mut Pixmap,
        ctx: &RenderContext,
        transform: &ViewportTransform,
    ) {
        let style = &ctx.style;
        let height = pixmap.height() as f64;
        let x0 = SCALE_BAR_MARGIN;
        let x1 = SCALE_BAR_MARGIN + style.scale_bar_length;
        let y = height - SCALE_BAR_MARGIN;

        let mut bar = BezPath::new();
        bar.move_to((x0, y));
        bar.line_to((x1, y));
        bar.move_to((x0, y + SCALE_BAR_TICK));
        bar.line_to((x0, y - SCALE_BAR_TICK));
        bar.move_to((x1, y + SCALE_BAR_TICK));
        bar.line_to((x1, y - SCALE_BAR_TICK));
        stroke_only(pixmap, &bar, style.scale_bar, 2.0);

        let distance = transform.scale_bar_distance(ctx.viewport, style.scale_bar_length);
        let label = format_scale_label(distance);
        let label_height = (GLYPH_HEIGHT * style.text_scale) as f64;
        let origin = Point::new(x0, y - 2.0 * SCALE_BAR_TICK - label_height);
        draw_text(pixmap, &label, origin, style.text_scale, style.scale_bar);
    }

    fn draw_north_indicator(pixmap: &mut Pixmap, style: &MapStyle) {
        let center = Point::new(pixmap.width() as f64 - 50.0, 70.0);
        let ink = style.vertex_fill;
        let dial = Circle::new(center, 15.0);
        fill_and_stroke(pixmap, &dial.to_path(PATH_TOLERANCE), style.halo, Some((ink, 2.0)));

        let mut shaft = BezPath::new();
        shaft.move_to((center.x, center.y + 10.0));
        shaft.line_to((center.x, center.y - 10.0));
        stroke_only(pixmap, &shaft, ink, 2.0);

        let head = polygon_path(&[
            Point::new(center.x, center.y - 10.0),
            Point::new(center.x - 5.0, center.y - 5.0),
            Point::new(center.x + 5.0, center.y - 5.0),
        ]);
        fill_and_stroke(pixmap, &head, ink, Some((ink, 1.0)));

        draw_text_centered(pixmap, "N", Point::new(center.x, center.y + 25.0), style.text_scale, ink);
    }
}

impl Renderer for SkiaRenderer {
    fn resize(&mut self, width: u32, height: u32) {
        if self.size() == Some((width, height)) {
            return;
        }
        self.surface = Pixmap::new(width, height);
        if self.surface.is_none() {
            log::warn!("No drawing surface for a {}x{} canvas", width, height);
        }
    }

    fn render(&mut self, ctx: &RenderContext) -> bool {
        let background = self.background_color(ctx);
        let Some(pixmap) = self.surface.as_mut() else {
            return false;
        };

        pixmap.fill(skia_color(background));

        let transform = ViewportTransform::new(ctx.boundaries, ctx.viewport_size);
        if ctx.boundaries.is_empty() {
            Self::draw_placeholder(pixmap, ctx);
        } else {
            Self::draw_boundaries(pixmap, ctx, &transform);
            if ctx.measure_mode {
                Self::draw_edge_annotations(pixmap, ctx, &transform);
            }
            Self::draw_vertices(pixmap, ctx, &transform);
        }
        Self::draw_scale_bar(pixmap, ctx, &transform);
        if ctx.north_indicator {
            Self::draw_north_indicator(pixmap, &ctx.style);
        }
        true
    }
}
