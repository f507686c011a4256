use serde::{Deserialize, Serialize};

/// Valid latitude range in degrees.
pub const LAT_RANGE: (f64, f64) = (-90.0, 90.0);
/// Valid longitude range in degrees.
pub const LON_RANGE: (f64, f64) = (-180.0, 180.0);

/// A geographic position in degrees.
///
/// Serialized as a `[lon, lat]` pair, matching GeoJSON coordinate order.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct LonLat {
    pub lon: f64,
    pub lat: f64,
}

impl LonLat {
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    pub fn is_finite(&self) -> bool {
        self.lon.is_finite() && self.lat.is_finite()
    }

    /// Finite and inside the geographic domain.
    pub fn is_geographic(&self) -> bool {
        is_valid_latitude(self.lat) && is_valid_longitude(self.lon)
    }
}

impl From<[f64; 2]> for LonLat {
    fn from(v: [f64; 2]) -> Self {
        LonLat::new(v[0], v[1])
    }
}

impl From<LonLat> for [f64; 2] {
    fn from(p: LonLat) -> Self {
        [p.lon, p.lat]
    }
}

pub fn is_valid_latitude(lat: f64) -> bool {
    lat.is_finite() && lat >= LAT_RANGE.0 && lat <= LAT_RANGE.1
}

pub fn is_valid_longitude(lon: f64) -> bool {
    lon.is_finite() && lon >= LON_RANGE.0 && lon <= LON_RANGE.1
}

/// Appends the first vertex when the ring is not already closed.
pub fn close_ring(mut ring: Vec<LonLat>) -> Vec<LonLat> {
    if let (Some(first), Some(last)) = (ring.first().copied(), ring.last().copied()) {
        if first != last {
            ring.push(first);
        }
    }
    ring
}

/// Open ring view: drops a closing duplicate vertex if present.
pub fn open_ring(ring: &[LonLat]) -> &[LonLat] {
    match ring {
        [first, .., last] if first == last => &ring[..ring.len() - 1],
        _ => ring,
    }
}
