//! Planar polygon measurements.
//!
//! All functions treat a point slice as a closed ring: the last point
//! connects back to the first. Inputs with fewer than three points measure
//! as zero and produce no edges.

use crate::boundary::{BoundaryEdge, Coordinate};
use crate::format::edge_display_length;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Perimeter and area of a single ring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundaryMetrics {
    pub length: f64,
    pub area: f64,
}

/// Clamp a derived measurement so that NaN, infinities and negative values
/// surface as zero.
pub fn sanitize(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Euclidean distance between two points.
pub fn distance(a: Coordinate, b: Coordinate) -> f64 {
    ((b.x - a.x).powi(2) + (b.y - a.y).powi(2)).sqrt()
}

/// Midpoint of the segment `a`-`b`.
pub fn midpoint(a: Coordinate, b: Coordinate) -> Coordinate {
    Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
}

/// Compass bearing from `a` to `b` in degrees, normalized to `[0, 360)`.
///
/// 0 points along +Y (north), 90 along +X (east).
pub fn bearing(a: Coordinate, b: Coordinate) -> f64 {
    let degrees = (b.x - a.x).atan2(b.y - a.y).to_degrees();
    let normalized = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if normalized >= 360.0 { 0.0 } else { normalized }
}

/// Iterate the cyclic `(points[i], points[(i + 1) mod n])` pairs of a ring.
fn ring_segments(points: &[Coordinate]) -> impl Iterator<Item = (Coordinate, Coordinate)> + '_ {
    let n = points.len();
    (0..n).map(move |i| (points[i], points[(i + 1) % n]))
}

/// Closed-ring perimeter.
pub fn perimeter(points: &[Coordinate]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    sanitize(ring_segments(points).map(|(a, b)| distance(a, b)).sum())
}

/// Polygon area via the Shoelace formula.
///
/// The absolute value makes the result independent of winding direction.
pub fn area(points: &[Coordinate]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let twice_signed: f64 = ring_segments(points)
        .map(|(a, b)| a.x * b.y - b.x * a.y)
        .sum();
    sanitize(twice_signed.abs() / 2.0)
}

/// Perimeter and area in one call.
pub fn measure(points: &[Coordinate]) -> BoundaryMetrics {
    BoundaryMetrics {
        length: perimeter(points),
        area: area(points),
    }
}

/// Per-edge measurements for one ring.
pub fn edges(points: &[Coordinate], boundary_index: usize) -> Vec<BoundaryEdge> {
    if points.len() < 3 {
        return Vec::new();
    }
    ring_segments(points)
        .enumerate()
        .map(|(edge_index, (start, end))| {
            let length = sanitize(distance(start, end));
            BoundaryEdge {
                id: BoundaryEdge::make_id(boundary_index, edge_index),
                boundary_index,
                edge_index,
                start,
                end,
                midpoint: midpoint(start, end),
                length,
                display_length: edge_display_length(length),
                bearing: bearing(start, end),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(raw: &[(f64, f64)]) -> Vec<Coordinate> {
        raw.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    fn unit_square() -> Vec<Coordinate> {
        pts(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)])
    }

    #[test]
    fn test_unit_square() {
        let square = unit_square();
        assert!((perimeter(&square) - 4.0).abs() < 1e-12);
        assert!((area(&square) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_right_triangle() {
        let tri = pts(&[(0.0, 0.0), (4.0, 0.0), (0.0, 3.0)]);
        let metrics = measure(&tri);
        assert!((metrics.length - 12.0).abs() < 1e-12);
        assert!((metrics.area - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_winding_and_rotation_invariance() {
        let poly = pts(&[(0.0, 0.0), (6.0, 0.0), (7.0, 4.0), (3.0, 6.0), (-1.0, 3.0)]);
        let base = measure(&poly);
        assert!(base.area > 0.0);

        let mut reversed = poly.clone();
        reversed.reverse();
        let rev = measure(&reversed);
        assert!((rev.area - base.area).abs() < 1e-9);
        assert!((rev.length - base.length).abs() < 1e-9);

        for shift in 1..poly.len() {
            let mut rotated = poly.clone();
            rotated.rotate_left(shift);
            let rot = measure(&rotated);
            assert!((rot.area - base.area).abs() < 1e-9);
            assert!((rot.length - base.length).abs() < 1e-9);
        }
    }

    #[test]
    fn test_degenerate_input() {
        assert_eq!(measure(&[]), BoundaryMetrics::default());
        assert_eq!(measure(&pts(&[(0.0, 0.0), (1.0, 1.0)])), BoundaryMetrics::default());
        assert!(edges(&pts(&[(0.0, 0.0), (1.0, 1.0)]), 0).is_empty());
    }

    #[test]
    fn test_nan_coordinates_clamp_to_zero() {
        let nan = pts(&[(f64::NAN, f64::NAN), (f64::NAN, f64::NAN), (f64::NAN, f64::NAN)]);
        assert_eq!(measure(&nan), BoundaryMetrics::default());
    }

    #[test]
    fn test_collinear_ring_has_zero_area() {
        let line = pts(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]);
        assert_eq!(area(&line), 0.0);
        assert!((perimeter(&line) - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_edges_of_square() {
        let square = pts(&[(0.0, 0.0), (0.0, 10.0), (10.0, 10.0), (10.0, 0.0)]);
        let edges = edges(&square, 3);
        assert_eq!(edges.len(), 4);
        for (i, edge) in edges.iter().enumerate() {
            assert_eq!(edge.edge_index, i);
            assert_eq!(edge.boundary_index, 3);
            assert!((edge.length - 10.0).abs() < 1e-12);
            assert_eq!(edge.display_length, "10.00m");
        }
        // Closing edge wraps back to the first vertex.
        assert_eq!(edges[3].start, Point::new(10.0, 0.0));
        assert_eq!(edges[3].end, Point::new(0.0, 0.0));
        assert_eq!(edges[0].midpoint, Point::new(0.0, 5.0));
        assert_eq!(edges[0].id, "b3-e0");
    }

    #[test]
    fn test_bearing() {
        let origin = Point::ZERO;
        assert!((bearing(origin, Point::new(0.0, 1.0)) - 0.0).abs() < 1e-12);
        assert!((bearing(origin, Point::new(1.0, 0.0)) - 90.0).abs() < 1e-12);
        assert!((bearing(origin, Point::new(0.0, -1.0)) - 180.0).abs() < 1e-12);
        assert!((bearing(origin, Point::new(-1.0, 0.0)) - 270.0).abs() < 1e-12);
        assert!((bearing(origin, Point::new(1.0, 1.0)) - 45.0).abs() < 1e-12);
    }

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize(f64::NAN), 0.0);
        assert_eq!(sanitize(f64::INFINITY), 0.0);
        assert_eq!(sanitize(-3.0), 0.0);
        assert_eq!(sanitize(2.5), 2.5);
    }
}
