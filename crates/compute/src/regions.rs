//! Named ocean regions, as used by the occurrence download pipeline.

use foundation::GeoBounds;

use crate::focus::FocusArea;

/// `(name, lon_min, lon_max, lat_min, lat_max)`
const REGIONS: &[(&str, f64, f64, f64, f64)] = &[
    ("americas", -120.0, -60.0, -30.0, 50.0),
    ("africa", -30.0, 60.0, -40.0, 35.0),
    ("europe", -30.0, 40.0, 35.0, 70.0),
    ("asia", 60.0, 180.0, -10.0, 60.0),
    ("oceania", 110.0, 180.0, -50.0, -10.0),
    ("antarctic", -180.0, 180.0, -90.0, -50.0),
];

pub fn region_names() -> impl Iterator<Item = &'static str> {
    REGIONS.iter().map(|r| r.0)
}

/// Case-insensitive lookup.
pub fn region_bounds(name: &str) -> Option<GeoBounds> {
    let name = name.trim();
    REGIONS
        .iter()
        .find(|r| r.0.eq_ignore_ascii_case(name))
        .map(|&(_, lon_min, lon_max, lat_min, lat_max)| {
            GeoBounds::new(lon_min, lat_min, lon_max, lat_max)
        })
}

pub fn named_area(name: &str) -> Option<FocusArea> {
    let bounds = region_bounds(name)?;
    FocusArea::from_bounds(name.trim().to_ascii_lowercase(), bounds)
}
