//! Display formatting for measurements, labels and coordinate export.

use crate::boundary::PropertyBoundary;

/// Label text for an edge length, e.g. `"12.50m"`.
pub fn edge_display_length(length: f64) -> String {
    format!("{:.2}m", length)
}

/// Perimeter in meters, e.g. `"40.00 m"`.
pub fn format_length(meters: f64) -> String {
    format!("{:.2} m", meters)
}

/// Perimeter in kilometres, e.g. `"0.04 km"`.
pub fn format_kilometres(meters: f64) -> String {
    format!("{:.2} km", meters / 1000.0)
}

/// Area in square meters, e.g. `"100.00 m²"`.
pub fn format_area(square_meters: f64) -> String {
    format!("{:.2} m²", square_meters)
}

/// Area in hectares, e.g. `"0.0100 ha"`.
pub fn format_hectares(square_meters: f64) -> String {
    format!("{:.4} ha", square_meters / 10_000.0)
}

/// Scale-bar distance rounded to one decimal place.
pub fn round_scale_distance(distance: f64) -> f64 {
    (distance * 10.0).round() / 10.0
}

/// Scale-bar label, e.g. `"12.5 UNITS"`.
pub fn format_scale_label(distance: f64) -> String {
    format!("{:.1} UNITS", round_scale_distance(distance))
}

/// Alphabetic vertex label: `A`..`Z`, then `AA`, `AB`, ... (spreadsheet
/// column style).
pub fn vertex_label(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    letters.iter().rev().map(|&b| b as char).collect()
}

/// Text block used by the "copy coordinates" action.
///
/// Each ring is written as `[x, y]` pairs joined by `",\n  "`, rings are
/// separated by a blank line and the whole block is bracketed.
pub fn format_coordinates(boundaries: &[PropertyBoundary]) -> String {
    let rings: Vec<String> = boundaries
        .iter()
        .map(|boundary| {
            boundary
                .points()
                .iter()
                .map(|p| format!("[{}, {}]", p.x, p.y))
                .collect::<Vec<_>>()
                .join(",\n  ")
        })
        .collect();
    format!("[\n  {}\n]", rings.join("\n\n"))
}
