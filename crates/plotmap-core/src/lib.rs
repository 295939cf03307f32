//! PlotMap Core Library
//!
//! Platform-agnostic geometry, measurement and viewport logic for property
//! boundary maps. Nothing in this crate draws pixels; see `plotmap-render`.

pub mod boundary;
pub mod format;
pub mod geometry;
pub mod interaction;
pub mod map;
pub mod measure;
pub mod validate;
pub mod viewport;

pub use boundary::{BoundaryEdge, Coordinate, PropertyBoundary};
pub use geometry::BoundaryMetrics;
pub use interaction::{InteractionStateMachine, ViewportEvent};
pub use map::BoundaryMap;
pub use measure::{BoundarySummary, MapMeasurements, aggregate, measure_boundaries};
pub use validate::{InputError, InputResult, parse_boundaries, validate_boundaries, validate_rings};
pub use viewport::{Bounds, DragState, ViewportState, ViewportTransform, AUTO_FIT_RATIO, ZOOM_STEP};
