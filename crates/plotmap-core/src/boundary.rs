//! Boundary data model.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// A planar point in model space.
///
/// Coordinates are treated as Cartesian units (meters), never as
/// latitude/longitude.
pub type Coordinate = Point;

/// A closed polygon ring describing one property boundary.
///
/// The first and last point are implicitly connected. A boundary always has
/// at least three points; only the validator constructs them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyBoundary {
    /// Display name ("Boundary 1", "Boundary 2", ...).
    pub name: String,
    points: Vec<Coordinate>,
}

impl PropertyBoundary {
    /// Minimum number of vertices in a ring.
    pub const MIN_POINTS: usize = 3;

    /// Build a boundary, returning `None` when the ring has fewer than
    /// [`Self::MIN_POINTS`] points or any coordinate is not finite.
    pub fn new(name: impl Into<String>, points: Vec<Coordinate>) -> Option<Self> {
        if points.len() < Self::MIN_POINTS {
            return None;
        }
        if points.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
            return None;
        }
        Some(Self {
            name: name.into(),
            points,
        })
    }

    /// The ring's vertices in order.
    pub fn points(&self) -> &[Coordinate] {
        &self.points
    }

    /// Number of vertices (and edges).
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false for a constructed boundary; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// One side of a boundary polygon, connecting point `edge_index` to point
/// `(edge_index + 1) mod n`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundaryEdge {
    /// Stable identifier, `b{boundary_index}-e{edge_index}`.
    pub id: String,
    pub boundary_index: usize,
    pub edge_index: usize,
    pub start: Coordinate,
    pub end: Coordinate,
    pub midpoint: Coordinate,
    /// Model-space length.
    pub length: f64,
    /// Length formatted for labels, e.g. `"10.00m"`.
    pub display_length: String,
    /// Compass bearing in degrees, `[0, 360)`, 0 = +Y (north), 90 = +X (east).
    pub bearing: f64,
}

impl BoundaryEdge {
    /// Build the edge identifier for a boundary/edge index pair.
    pub fn make_id(boundary_index: usize, edge_index: usize) -> String {
        format!("b{}-e{}", boundary_index, edge_index)
    }
}
