//! Focus-area derivation.
//!
//! A focus area is always built whole from either a polygon or a bounds
//! rectangle. Its `bounds` is the bounding box of its polygon, and the
//! polygon is always a closed ring of at least four points.

use foundation::{GeoBounds, LonLat, close_ring};
use serde::{Deserialize, Serialize};

use crate::camera::CameraDirective;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FocusArea {
    pub name: String,
    pub polygon: Vec<LonLat>,
    pub bounds: GeoBounds,
}

impl FocusArea {
    /// Ring-closes `vertices`. Needs at least three finite vertices.
    pub fn from_polygon(name: impl Into<String>, vertices: Vec<LonLat>) -> Option<Self> {
        if vertices.len() < 3 || !vertices.iter().all(LonLat::is_finite) {
            return None;
        }
        let polygon = close_ring(vertices);
        if polygon.len() < 4 {
            return None;
        }
        let bounds = GeoBounds::from_points(&polygon)?;
        Some(Self {
            name: name.into(),
            polygon,
            bounds,
        })
    }

    /// Rectangular area. Non-finite bounds are rejected.
    pub fn from_bounds(name: impl Into<String>, bounds: GeoBounds) -> Option<Self> {
        if !bounds.is_finite() {
            return None;
        }
        Some(Self {
            name: name.into(),
            polygon: bounds.to_ring(),
            bounds,
        })
    }
}

/// Result of resolving highlight geometry: the new focus area and, when
/// bounds were supplied, the camera framing for them.
#[derive(Debug, Clone, PartialEq)]
pub struct FocusResolution {
    pub area: FocusArea,
    pub frame: Option<CameraDirective>,
}

/// Polygon wins when it has at least three vertices; otherwise a finite
/// corner pair is turned into a rectangle. Valid corners are framed either
/// way. Neither usable → `None`.
pub fn resolve_highlight(
    name: &str,
    polygon: Option<&[LonLat]>,
    corners: Option<(LonLat, LonLat)>,
) -> Option<FocusResolution> {
    let bounds = corners
        .filter(|(a, b)| a.is_finite() && b.is_finite())
        .map(|(a, b)| GeoBounds::from_corners(a, b));

    let area = polygon
        .filter(|v| v.len() >= 3)
        .and_then(|v| FocusArea::from_polygon(name, v.to_vec()))
        .or_else(|| bounds.and_then(|b| FocusArea::from_bounds(name, b)))?;

    Some(FocusResolution {
        area,
        frame: bounds.map(CameraDirective::frame),
    })
}
