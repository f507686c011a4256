use earcutr::earcut;
use foundation::{LonLat, open_ring};

/// Triangulates a simple ring in the lon/lat plane.
///
/// Accepts open or closed rings. Degenerate or non-finite input yields no
/// triangles.
pub fn triangulate_ring(ring: &[LonLat]) -> Vec<[LonLat; 3]> {
    let ring = open_ring(ring);
    if ring.len() < 3 || !ring.iter().all(LonLat::is_finite) {
        return Vec::new();
    }

    let coords: Vec<f64> = ring.iter().flat_map(|p| [p.lon, p.lat]).collect();
    let indices = match earcut(&coords, &[], 2) {
        Ok(ix) => ix,
        Err(_) => return Vec::new(),
    };

    indices
        .chunks_exact(3)
        .filter_map(|tri| {
            Some([
                *ring.get(tri[0])?,
                *ring.get(tri[1])?,
                *ring.get(tri[2])?,
            ])
        })
        .collect()
}
