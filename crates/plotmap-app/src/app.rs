//! Headless map host: owns the map session and renderer, replays viewport
//! events and exports frames.

use kurbo::Size;
use peniko::Color;
use plotmap_core::format::{
    format_area, format_coordinates, format_hectares, format_kilometres, format_length,
};
use plotmap_core::{BoundaryMap, InputError, MapMeasurements, ViewportEvent};
use plotmap_render::{RenderContext, Renderer, RendererError, SkiaRenderer};
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Render(#[from] RendererError),
}

/// Result type for application operations.
pub type AppResult<T> = Result<T, AppError>;

fn read_file(path: &Path) -> AppResult<String> {
    fs::read_to_string(path).map_err(|source| AppError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse a CSS color string like "#ff0000".
fn parse_color(s: &str) -> Option<Color> {
    let s = s.trim();
    if s.starts_with('#') && s.len() == 7 {
        let r = u8::from_str_radix(&s[1..3], 16).ok()?;
        let g = u8::from_str_radix(&s[3..5], 16).ok()?;
        let b = u8::from_str_radix(&s[5..7], 16).ok()?;
        Some(Color::from_rgba8(r, g, b, 255))
    } else {
        None
    }
}

/// Application configuration.
///
/// Every field is optional in the JSON file; missing fields take the
/// defaults below.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
    /// Passed through to the summary, not interpreted.
    pub title: String,
    /// Passed through to the summary, not interpreted.
    pub description: String,
    pub width: u32,
    pub height: u32,
    /// Initial visibility of the per-edge measurement overlay.
    pub measure_mode: bool,
    pub north_indicator: bool,
    /// Canvas background as `#rrggbb`.
    pub background: String,
    /// Viewport events replayed before the first frame.
    pub events: Vec<ViewportEvent>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Property Boundary Viewer".to_string(),
            description: "View and measure property boundaries".to_string(),
            width: 800,
            height: 500,
            measure_mode: false,
            north_indicator: true,
            background: "#f9fafb".to_string(),
            events: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Load a config file.
    pub fn load(path: &Path) -> AppResult<Self> {
        let text = read_file(path)?;
        let config = serde_json::from_str(&text)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Background color, falling back to the default for unparseable values.
    pub fn background_color(&self) -> Color {
        parse_color(&self.background).unwrap_or_else(|| {
            log::warn!("Ignoring invalid background color {:?}", self.background);
            Color::from_rgba8(249, 250, 251, 255)
        })
    }

    fn canvas_size(&self) -> Size {
        Size::new(self.width as f64, self.height as f64)
    }
}

/// Main application struct.
pub struct App {
    config: AppConfig,
    map: BoundaryMap,
    renderer: SkiaRenderer,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        let mut map = BoundaryMap::new(config.canvas_size());
        map.set_measure_mode(config.measure_mode);
        Self {
            config,
            map,
            renderer: SkiaRenderer::new(),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn map(&self) -> &BoundaryMap {
        &self.map
    }

    pub fn measurements(&self) -> &MapMeasurements {
        self.map.measurements()
    }

    pub fn renderer(&self) -> &SkiaRenderer {
        &self.renderer
    }

    /// Replace the boundary input with untyped JSON.
    pub fn set_boundaries(&mut self, raw: &Value) {
        self.map.set_boundaries(raw);
    }

    /// Load boundary rings from a JSON file.
    pub fn load_boundaries(&mut self, path: &Path) -> AppResult<()> {
        let text = read_file(path)?;
        let boundaries = plotmap_core::parse_boundaries(&text)?;
        log::info!(
            "Loaded {} boundaries from {}",
            boundaries.len(),
            path.display()
        );
        self.map.set_validated(boundaries);
        Ok(())
    }

    /// Apply the events listed in the config.
    pub fn replay_config_events(&mut self) {
        let events = self.config.events.clone();
        for event in &events {
            self.handle_event(event);
        }
    }

    pub fn handle_event(&mut self, event: &ViewportEvent) -> bool {
        self.map.handle_event(event)
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.config.width = width;
        self.config.height = height;
        self.map.resize(self.config.canvas_size());
    }

    pub fn toggle_measure_mode(&mut self) {
        self.map.toggle_measure_mode();
    }

    /// Run one frame: redraw only if something changed since the last frame.
    /// Returns true if a frame was drawn.
    pub fn frame(&mut self) -> bool {
        if !self.map.take_redraw() {
            return false;
        }
        self.renderer.resize(self.config.width, self.config.height);
        let ctx = RenderContext::from_map(&self.map)
            .with_north_indicator(self.config.north_indicator)
            .with_background(self.config.background_color());
        self.renderer.render(&ctx)
    }

    /// Encode the current frame as PNG bytes, drawing it first if needed.
    pub fn render_png(&mut self) -> AppResult<Vec<u8>> {
        self.frame();
        let frame = self.renderer.to_rgba()?;
        encode_png(&frame.rgba_data, frame.width, frame.height)
    }

    /// Write the current frame to a PNG file.
    pub fn export_png(&mut self, path: &Path) -> AppResult<()> {
        let png = self.render_png()?;
        fs::write(path, png).map_err(|source| AppError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Exported PNG to: {:?}", path);
        Ok(())
    }

    /// Text for the "copy coordinates" action.
    pub fn copy_coordinates(&self) -> String {
        format_coordinates(self.map.boundaries())
    }

    /// Human-readable summary of the current measurements.
    pub fn summary(&self) -> String {
        let m = self.measurements();
        let mut lines = vec![self.config.title.clone(), self.config.description.clone()];
        lines.push(format!(
            "Boundary Length: {} ({})",
            format_length(m.boundary_length),
            format_kilometres(m.boundary_length)
        ));
        lines.push(format!(
            "Property Area: {} ({})",
            format_area(m.boundary_area),
            format_hectares(m.boundary_area)
        ));
        for boundary in &m.individual_boundaries {
            lines.push(format!(
                "  {}: {}, {}",
                boundary.name,
                format_length(boundary.length),
                format_area(boundary.area)
            ));
        }
        lines.join("\n")
    }
}

/// Encode RGBA pixel data to PNG bytes.
fn encode_png(rgba_data: &[u8], width: u32, height: u32) -> AppResult<Vec<u8>> {
    let mut png_data = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut png_data, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder
            .write_header()
            .map_err(|e| RendererError::Encode(format!("PNG header: {}", e)))?;
        writer
            .write_image_data(rgba_data)
            .map_err(|e| RendererError::Encode(format!("PNG data: {}", e)))?;
    }
    Ok(png_data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;
    use serde_json::json;
    use std::io::Write;

    fn square_app() -> App {
        let mut app = App::new(AppConfig {
            width: 200,
            height: 120,
            ..AppConfig::default()
        });
        app.set_boundaries(&json!([[[0, 0], [0, 10], [10, 10], [10, 0]]]));
        app
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!((config.width, config.height), (800, 500));
        assert!(!config.measure_mode);
        assert_eq!(
            config.background_color().to_rgba8(),
            Color::from_rgba8(249, 250, 251, 255).to_rgba8()
        );
    }

    #[test]
    fn test_config_partial_json() {
        let config: AppConfig = serde_json::from_str(
            r#"{"width": 320, "measureMode": true, "events": [{"type": "zoomIn"}]}"#,
        )
        .unwrap();
        assert_eq!(config.width, 320);
        assert_eq!(config.height, 500);
        assert!(config.measure_mode);
        assert_eq!(config.events, vec![ViewportEvent::ZoomIn]);
    }

    #[test]
    fn test_invalid_background_falls_back() {
        let config = AppConfig {
            background: "teal".to_string(),
            ..AppConfig::default()
        };
        assert_eq!(
            config.background_color().to_rgba8(),
            Color::from_rgba8(249, 250, 251, 255).to_rgba8()
        );
        assert!(parse_color("#102030").is_some());
        assert!(parse_color("#10203").is_none());
    }

    #[test]
    fn test_load_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"title": "Lot 7", "height": 240}}"#).unwrap();
        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.title, "Lot 7");
        assert_eq!(config.height, 240);
        assert_eq!(config.width, 800);
    }

    #[test]
    fn test_load_missing_file() {
        let err = AppConfig::load(Path::new("/nonexistent/plotmap.json")).unwrap_err();
        assert!(matches!(err, AppError::Read { .. }));
    }

    #[test]
    fn test_load_boundaries_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[[[0,0],[4,0],[0,3]], [[0,0],[\"x\",1]]]").unwrap();
        let mut app = App::new(AppConfig::default());
        app.load_boundaries(file.path()).unwrap();
        assert_eq!(app.measurements().individual_boundaries.len(), 1);
        assert!((app.measurements().boundary_area - 6.0).abs() < 1e-12);

        let mut bad = tempfile::NamedTempFile::new().unwrap();
        write!(bad, "not json").unwrap();
        assert!(matches!(
            app.load_boundaries(bad.path()),
            Err(AppError::Input(_))
        ));
    }

    #[test]
    fn test_frame_batching() {
        let mut app = square_app();
        assert!(app.frame());
        assert!(!app.frame());

        app.handle_event(&ViewportEvent::ZoomIn);
        app.handle_event(&ViewportEvent::ZoomIn);
        app.resize(220, 140);
        assert!(app.frame());
        assert_eq!(app.renderer().size(), Some((220, 140)));
        assert!(!app.frame());
    }

    #[test]
    fn test_replay_config_events() {
        let mut app = App::new(AppConfig {
            events: vec![
                ViewportEvent::PointerDown { position: Point::new(10.0, 10.0) },
                ViewportEvent::PointerMove { position: Point::new(30.0, 5.0) },
                ViewportEvent::PointerUp,
                ViewportEvent::ZoomOut,
            ],
            ..AppConfig::default()
        });
        app.replay_config_events();
        let viewport = app.map().viewport();
        assert_eq!(viewport.offset, kurbo::Vec2::new(20.0, -5.0));
        assert!((viewport.scale - 1.0 / 1.2).abs() < 1e-12);
        assert!(!viewport.is_dragging());
    }

    #[test]
    fn test_render_png_signature() {
        let mut app = square_app();
        let png = app.render_png().unwrap();
        assert_eq!(&png[..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
    }

    #[test]
    fn test_export_png_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.png");
        let mut app = square_app();
        app.export_png(&path).unwrap();
        let bytes = fs::read(&path).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");

        let missing = dir.path().join("no-such-dir").join("map.png");
        assert!(matches!(
            app.export_png(&missing),
            Err(AppError::Write { .. })
        ));
    }

    #[test]
    fn test_zero_size_canvas_has_no_frame() {
        let mut app = App::new(AppConfig {
            width: 0,
            height: 0,
            ..AppConfig::default()
        });
        assert!(!app.frame());
        assert!(matches!(app.render_png(), Err(AppError::Render(_))));
    }

    #[test]
    fn test_summary_and_coordinates() {
        let app = square_app();
        let summary = app.summary();
        assert!(summary.contains("Boundary Length: 40.00 m (0.04 km)"));
        assert!(summary.contains("Property Area: 100.00 m² (0.0100 ha)"));
        assert!(summary.contains("Boundary 1: 40.00 m, 100.00 m²"));
        assert!(app.copy_coordinates().starts_with("[\n  [0, 0],"));
    }
}
