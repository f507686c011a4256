//! Raw row → canonical point record.
//!
//! Source files disagree on column names for the hex cell and the coordinate
//! pair, so the accepted names live in an [`AliasTable`]. Lookup order within
//! each list is significant: the first match wins.

use std::sync::Arc;

use tracing::debug;

use crate::hexgrid::HexGrid;
use crate::record::PointRecord;
use crate::value::{RawRow, Scalar};

pub const CELL_ALIASES: &[&str] = &["h3", "h3_index", "h3_cell", "h3_id", "h3Index", "h"];

pub const LATITUDE_ALIASES: &[&str] = &[
    "latitude",
    "centroid_lat",
    "lat",
    "Latitude",
    "LAT",
    "centroidLat",
    "decimalLatitude",
];

pub const LONGITUDE_ALIASES: &[&str] = &[
    "longitude",
    "centroid_lon",
    "lon",
    "lng",
    "Longitude",
    "LON",
    "centroidLon",
    "decimalLongitude",
];

#[derive(Debug, Clone, PartialEq)]
pub struct AliasTable {
    pub cell: Vec<String>,
    pub latitude: Vec<String>,
    pub longitude: Vec<String>,
}

fn owned(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

impl Default for AliasTable {
    fn default() -> Self {
        Self {
            cell: owned(CELL_ALIASES),
            latitude: owned(LATITUDE_ALIASES),
            longitude: owned(LONGITUDE_ALIASES),
        }
    }
}

impl AliasTable {
    /// First non-empty string among the cell aliases. Non-string values are
    /// skipped, not treated as a match.
    pub fn cell<'a>(&self, row: &'a RawRow) -> Option<&'a str> {
        self.cell
            .iter()
            .filter_map(|k| row.get(k).and_then(Scalar::as_str))
            .map(str::trim)
            .find(|s| !s.is_empty())
    }

    pub fn latitude<'a>(&self, row: &'a RawRow) -> Option<&'a Scalar> {
        first_present(row, &self.latitude)
    }

    pub fn longitude<'a>(&self, row: &'a RawRow) -> Option<&'a Scalar> {
        first_present(row, &self.longitude)
    }
}

fn first_present<'a>(row: &'a RawRow, names: &[String]) -> Option<&'a Scalar> {
    names
        .iter()
        .filter_map(|k| row.get(k))
        .find(|v| !v.is_null())
}

/// Stateless normalizer over a hex grid and an alias table.
#[derive(Clone)]
pub struct RowNormalizer {
    grid: Arc<dyn HexGrid>,
    aliases: AliasTable,
}

impl std::fmt::Debug for RowNormalizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RowNormalizer")
            .field("aliases", &self.aliases)
            .finish_non_exhaustive()
    }
}

impl RowNormalizer {
    pub fn new(grid: Arc<dyn HexGrid>) -> Self {
        Self {
            grid,
            aliases: AliasTable::default(),
        }
    }

    pub fn with_aliases(mut self, aliases: AliasTable) -> Self {
        self.aliases = aliases;
        self
    }

    pub fn grid(&self) -> &Arc<dyn HexGrid> {
        &self.grid
    }

    /// Normalizes one row, or `None` when it has no usable location.
    pub fn normalize_row(&self, row: RawRow) -> Option<PointRecord> {
        let spatial_cell = match self.aliases.cell(&row) {
            Some(id) if self.grid.is_valid_cell(id) => Some(id.to_string()),
            Some(id) => {
                debug!("discarding invalid cell id {id:?}");
                None
            }
            None => None,
        };

        let mut latitude = row.get("latitude").and_then(Scalar::as_finite);
        let mut longitude = row.get("longitude").and_then(Scalar::as_finite);

        if let Some(cell) = &spatial_cell {
            if latitude.is_none() || longitude.is_none() {
                if let Some(center) = self.grid.cell_center(cell) {
                    latitude = latitude.or(Some(center.lat));
                    longitude = longitude.or(Some(center.lon));
                }
            }
        }

        let alias_lat = self.aliases.latitude(&row).and_then(Scalar::as_finite);
        let alias_lon = self.aliases.longitude(&row).and_then(Scalar::as_finite);
        if let (Some(lat), Some(lon)) = (alias_lat, alias_lon) {
            latitude = Some(lat);
            longitude = Some(lon);
        }

        let mut fields = row;
        if !fields.contains_key("probability") {
            if let Some(p) = fields.get("prediction").and_then(Scalar::as_finite) {
                fields.insert("probability".to_string(), Scalar::Number(p));
            }
        }

        let record = PointRecord {
            fields,
            spatial_cell,
            latitude,
            longitude,
        };

        if record.spatial_cell.is_some() || record.coordinates().is_some() {
            Some(record)
        } else {
            debug!("dropping row without a usable location");
            None
        }
    }

    pub fn normalize_rows(&self, rows: impl IntoIterator<Item = RawRow>) -> Vec<PointRecord> {
        rows.into_iter()
            .filter_map(|r| self.normalize_row(r))
            .collect()
    }
}
