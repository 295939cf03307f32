//! Aggregated measurements across all boundaries.

use crate::boundary::{BoundaryEdge, PropertyBoundary};
use crate::geometry;
use crate::validate::validate_boundaries;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Per-boundary entry in the measurement breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundarySummary {
    pub name: String,
    pub length: f64,
    pub area: f64,
}

/// Measurement snapshot for a boundary set.
///
/// `boundary_length` and `boundary_area` are always the sums of the
/// `individual_boundaries` entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapMeasurements {
    pub boundary_length: f64,
    pub boundary_area: f64,
    pub individual_boundaries: Vec<BoundarySummary>,
    pub edges: Vec<BoundaryEdge>,
}

impl MapMeasurements {
    /// True when no boundary contributed to the result.
    pub fn is_empty(&self) -> bool {
        self.individual_boundaries.is_empty()
    }

    /// Edges belonging to one boundary, in ring order.
    pub fn edges_for(&self, boundary_index: usize) -> impl Iterator<Item = &BoundaryEdge> {
        self.edges
            .iter()
            .filter(move |edge| edge.boundary_index == boundary_index)
    }
}

/// Roll per-boundary geometry into totals and a named breakdown.
pub fn aggregate(boundaries: &[PropertyBoundary]) -> MapMeasurements {
    let mut result = MapMeasurements::default();

    for (index, boundary) in boundaries.iter().enumerate() {
        let metrics = geometry::measure(boundary.points());
        result.boundary_length += metrics.length;
        result.boundary_area += metrics.area;
        result.individual_boundaries.push(BoundarySummary {
            name: format!("Boundary {}", index + 1),
            length: metrics.length,
            area: metrics.area,
        });
        result
            .edges
            .extend(geometry::edges(boundary.points(), index));
    }

    result
}

/// Full pipeline: validate raw rings, measure them and aggregate.
pub fn measure_boundaries(raw: &Value) -> MapMeasurements {
    let boundaries = validate_boundaries(raw);
    let measurements = aggregate(&boundaries);
    log::info!(
        "Measured {} boundaries: length {:.2}, area {:.2}",
        measurements.individual_boundaries.len(),
        measurements.boundary_length,
        measurements.boundary_area
    );
    measurements
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::validate_rings;
    use serde_json::json;

    fn assert_sums(m: &MapMeasurements) {
        let length: f64 = m.individual_boundaries.iter().map(|b| b.length).sum();
        let area: f64 = m.individual_boundaries.iter().map(|b| b.area).sum();
        assert!((m.boundary_length - length).abs() < 1e-9);
        assert!((m.boundary_area - area).abs() < 1e-9);
    }

    fn square_at(offset: f64, size: f64) -> Vec<[f64; 2]> {
        vec![
            [offset, offset],
            [offset, offset + size],
            [offset + size, offset + size],
            [offset + size, offset],
        ]
    }

    #[test]
    fn test_zero_boundaries() {
        let m = aggregate(&[]);
        assert_eq!(m, MapMeasurements::default());
        assert!(m.is_empty());
        assert_sums(&m);
    }

    #[test]
    fn test_one_boundary() {
        let m = aggregate(&validate_rings(&[square_at(0.0, 2.0)]));
        assert_eq!(m.individual_boundaries.len(), 1);
        assert!((m.boundary_length - 8.0).abs() < 1e-12);
        assert!((m.boundary_area - 4.0).abs() < 1e-12);
        assert_sums(&m);
    }

    #[test]
    fn test_five_boundaries() {
        let rings: Vec<_> = (0..5).map(|i| square_at(i as f64 * 20.0, i as f64 + 1.0)).collect();
        let m = aggregate(&validate_rings(&rings));
        assert_eq!(m.individual_boundaries.len(), 5);
        assert_eq!(m.edges.len(), 20);
        assert_eq!(m.individual_boundaries[4].name, "Boundary 5");
        assert_eq!(m.edges_for(2).count(), 4);
        assert!(m.edges_for(2).all(|e| e.boundary_index == 2));
        // 1 + 4 + 9 + 16 + 25
        assert!((m.boundary_area - 55.0).abs() < 1e-9);
        assert_sums(&m);
    }

    #[test]
    fn test_end_to_end_square() {
        let m = measure_boundaries(&json!([[[0, 0], [0, 10], [10, 10], [10, 0]]]));
        assert!((m.boundary_area - 100.0).abs() < 1e-12);
        assert!((m.boundary_length - 40.0).abs() < 1e-12);
        assert_eq!(m.edges.len(), 4);
        assert!(m.edges.iter().all(|e| (e.length - 10.0).abs() < 1e-12));
    }

    #[test]
    fn test_end_to_end_malformed() {
        let m = measure_boundaries(&json!([[[0, 0], ["x", 1]]]));
        assert_eq!(m.boundary_length, 0.0);
        assert_eq!(m.boundary_area, 0.0);
        assert!(m.individual_boundaries.is_empty());
        assert!(m.edges.is_empty());
    }

    #[test]
    fn test_serializes_camel_case() {
        let m = measure_boundaries(&json!([[[0, 0], [4, 0], [0, 3]]]));
        let value = serde_json::to_value(&m).unwrap();
        assert_eq!(value["boundaryLength"], json!(12.0));
        assert_eq!(value["boundaryArea"], json!(6.0));
        assert_eq!(value["individualBoundaries"][0]["name"], json!("Boundary 1"));
        assert_eq!(value["edges"][0]["displayLength"], json!("4.00m"));
        assert_eq!(value["edges"][0]["boundaryIndex"], json!(0));
    }
}
