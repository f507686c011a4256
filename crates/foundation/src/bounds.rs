use serde::{Deserialize, Serialize};

use crate::geo::LonLat;

/// Geographic axis-aligned bounds in degrees.
///
/// Longitudes are not wrapped: a box spanning the antimeridian is represented
/// by its raw corner values.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoBounds {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

impl GeoBounds {
    pub fn new(lon_min: f64, lat_min: f64, lon_max: f64, lat_max: f64) -> Self {
        Self {
            lat_min,
            lat_max,
            lon_min,
            lon_max,
        }
    }

    /// Bounds spanned by two opposite corners given in any order.
    pub fn from_corners(a: LonLat, b: LonLat) -> Self {
        Self {
            lat_min: a.lat.min(b.lat),
            lat_max: a.lat.max(b.lat),
            lon_min: a.lon.min(b.lon),
            lon_max: a.lon.max(b.lon),
        }
    }

    /// Bounding box of the finite points; `None` when there are none.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a LonLat>) -> Option<Self> {
        let mut out: Option<Self> = None;
        for p in points.into_iter().filter(|p| p.is_finite()) {
            out = Some(match out {
                None => Self::new(p.lon, p.lat, p.lon, p.lat),
                Some(b) => Self {
                    lat_min: b.lat_min.min(p.lat),
                    lat_max: b.lat_max.max(p.lat),
                    lon_min: b.lon_min.min(p.lon),
                    lon_max: b.lon_max.max(p.lon),
                },
            });
        }
        out
    }

    pub fn is_finite(&self) -> bool {
        self.lat_min.is_finite()
            && self.lat_max.is_finite()
            && self.lon_min.is_finite()
            && self.lon_max.is_finite()
    }

    /// Inclusive containment. Non-finite coordinates are never contained.
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        lon.is_finite()
            && lat.is_finite()
            && lat >= self.lat_min
            && lat <= self.lat_max
            && lon >= self.lon_min
            && lon <= self.lon_max
    }

    pub fn center(&self) -> LonLat {
        LonLat::new(
            (self.lon_min + self.lon_max) * 0.5,
            (self.lat_min + self.lat_max) * 0.5,
        )
    }

    /// Closed counter-clockwise rectangle starting at the south-west corner.
    pub fn to_ring(&self) -> Vec<LonLat> {
        vec![
            LonLat::new(self.lon_min, self.lat_min),
            LonLat::new(self.lon_max, self.lat_min),
            LonLat::new(self.lon_max, self.lat_max),
            LonLat::new(self.lon_min, self.lat_max),
            LonLat::new(self.lon_min, self.lat_min),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::GeoBounds;
    use crate::geo::LonLat;

    #[test]
    fn corners_are_order_independent() {
        let a = GeoBounds::from_corners(LonLat::new(-28.0, 5.0), LonLat::new(-55.0, -35.0));
        assert_eq!(a, GeoBounds::new(-55.0, -35.0, -28.0, 5.0));
    }

    #[test]
    fn contains_is_inclusive_and_rejects_nan() {
        let b = GeoBounds::new(-10.0, -5.0, 10.0, 5.0);
        assert!(b.contains(10.0, 5.0));
        assert!(b.contains(-10.0, -5.0));
        assert!(!b.contains(10.0001, 0.0));
        assert!(!b.contains(f64::NAN, 0.0));
    }

    #[test]
    fn from_points_skips_non_finite() {
        let pts = [
            LonLat::new(1.0, 2.0),
            LonLat::new(f64::NAN, 50.0),
            LonLat::new(-3.0, 4.0),
        ];
        let b = GeoBounds::from_points(&pts).unwrap();
        assert_eq!(b, GeoBounds::new(-3.0, 2.0, 1.0, 4.0));
        assert!(GeoBounds::from_points(&[]).is_none());
    }

    #[test]
    fn ring_is_closed() {
        let ring = GeoBounds::new(0.0, 0.0, 1.0, 1.0).to_ring();
        assert_eq!(ring.len(), 5);
        assert_eq!(ring.first(), ring.last());
    }
}
