//! Boundary input validation.
//!
//! Raw rings come from the host untyped. Malformed rings are dropped with a
//! diagnostic log and never surface as errors; the only failure mode is text
//! that is not JSON at all.

use crate::boundary::{Coordinate, PropertyBoundary};
use kurbo::Point;
use serde_json::Value;
use thiserror::Error;

/// Errors reading boundary input text.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("Boundary input is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for input parsing.
pub type InputResult<T> = Result<T, InputError>;

fn boundary_name(accepted: usize) -> String {
    format!("Boundary {}", accepted + 1)
}

/// Read one `[x, y]` point, requiring exactly two finite numbers.
fn parse_point(value: &Value) -> Option<Coordinate> {
    let pair = value.as_array()?;
    if pair.len() != 2 {
        return None;
    }
    let x = pair[0].as_f64()?;
    let y = pair[1].as_f64()?;
    if !x.is_finite() || !y.is_finite() {
        return None;
    }
    Some(Point::new(x, y))
}

/// Read one ring, rejecting it entirely if any point is malformed.
fn parse_ring(ring_index: usize, value: &Value) -> Option<Vec<Coordinate>> {
    let Some(raw_points) = value.as_array() else {
        log::debug!("Dropping ring {}: not an array", ring_index);
        return None;
    };
    if raw_points.len() < PropertyBoundary::MIN_POINTS {
        log::debug!(
            "Dropping ring {}: {} points, need at least {}",
            ring_index,
            raw_points.len(),
            PropertyBoundary::MIN_POINTS
        );
        return None;
    }
    let mut points = Vec::with_capacity(raw_points.len());
    for (point_index, raw) in raw_points.iter().enumerate() {
        match parse_point(raw) {
            Some(point) => points.push(point),
            None => {
                log::debug!(
                    "Dropping ring {}: point {} is not a pair of finite numbers ({})",
                    ring_index,
                    point_index,
                    raw
                );
                return None;
            }
        }
    }
    Some(points)
}

/// Validate untyped boundary input into well-formed polygons.
///
/// The input must be an array of rings; each ring an array of at least three
/// `[x, y]` pairs of finite numbers. Anything else is skipped. Boundaries are
/// named by their position among the accepted rings.
pub fn validate_boundaries(raw: &Value) -> Vec<PropertyBoundary> {
    let Some(rings) = raw.as_array() else {
        if !raw.is_null() {
            log::warn!("Boundary input is not an array of rings; ignoring it");
        }
        return Vec::new();
    };

    let mut boundaries = Vec::with_capacity(rings.len());
    for (ring_index, ring) in rings.iter().enumerate() {
        let Some(points) = parse_ring(ring_index, ring) else {
            continue;
        };
        if let Some(boundary) = PropertyBoundary::new(boundary_name(boundaries.len()), points) {
            boundaries.push(boundary);
        }
    }

    if boundaries.len() < rings.len() {
        log::warn!(
            "Accepted {} of {} boundary rings",
            boundaries.len(),
            rings.len()
        );
    }
    boundaries
}

/// Validate typed rings. Non-finite coordinates and short rings are dropped.
pub fn validate_rings(rings: &[Vec<[f64; 2]>]) -> Vec<PropertyBoundary> {
    let mut boundaries = Vec::with_capacity(rings.len());
    for (ring_index, ring) in rings.iter().enumerate() {
        let points = ring.iter().map(|&[x, y]| Point::new(x, y)).collect();
        match PropertyBoundary::new(boundary_name(boundaries.len()), points) {
            Some(boundary) => boundaries.push(boundary),
            None => log::debug!("Dropping ring {}: too short or not finite", ring_index),
        }
    }
    boundaries
}

/// Parse boundary input text and validate it.
///
/// Fails only when `json` is not parseable; malformed rings inside valid JSON
/// are filtered as in [`validate_boundaries`].
pub fn parse_boundaries(json: &str) -> InputResult<Vec<PropertyBoundary>> {
    let value: Value = serde_json::from_str(json)?;
    Ok(validate_boundaries(&value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_accepts_well_formed_ring() {
        let boundaries = validate_boundaries(&json!([[[0, 0], [0, 10], [10, 10], [10, 0]]]));
        assert_eq!(boundaries.len(), 1);
        assert_eq!(boundaries[0].name, "Boundary 1");
        assert_eq!(boundaries[0].points()[2], Point::new(10.0, 10.0));
    }

    #[test]
    fn test_drops_short_and_non_numeric_rings() {
        let boundaries = validate_boundaries(&json!([[[0, 0], ["x", 1]]]));
        assert!(boundaries.is_empty());
    }

    #[test]
    fn test_drops_ring_with_bad_point() {
        let raw = json!([
            [[0, 0], [1, 0], [1, "one"]],
            [[0, 0], [1, 0], [1, 1, 1]],
            [[0, 0], [1, 0], null],
            [[0, 0], [4, 0], [0, 3]]
        ]);
        let boundaries = validate_boundaries(&raw);
        assert_eq!(boundaries.len(), 1);
        // Named by accepted position, not raw position.
        assert_eq!(boundaries[0].name, "Boundary 1");
        assert_eq!(boundaries[0].points()[1], Point::new(4.0, 0.0));
    }

    #[test]
    fn test_non_array_input_is_empty() {
        assert!(validate_boundaries(&json!(null)).is_empty());
        assert!(validate_boundaries(&json!({"rings": []})).is_empty());
        assert!(validate_boundaries(&json!([])).is_empty());
        assert!(validate_boundaries(&json!(["not a ring", 5])).is_empty());
    }

    #[test]
    fn test_typed_rings_reject_nan() {
        let rings = vec![
            vec![[0.0, 0.0], [f64::NAN, 1.0], [1.0, 1.0]],
            vec![[0.0, 0.0], [1.0, 0.0]],
            vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0]],
        ];
        let boundaries = validate_rings(&rings);
        assert_eq!(boundaries.len(), 1);
        assert_eq!(boundaries[0].name, "Boundary 1");
    }

    #[test]
    fn test_parse_boundaries() {
        let boundaries = parse_boundaries("[[[0,0],[0,1],[1,1]],[[2,2],[3,3]]]").unwrap();
        assert_eq!(boundaries.len(), 1);

        let err = parse_boundaries("[[[0,0],").unwrap_err();
        assert!(matches!(err, InputError::Json(_)));
    }
}
