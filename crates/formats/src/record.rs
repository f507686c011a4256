use serde::{Deserialize, Serialize};

use foundation::LonLat;

use crate::value::{RawRow, Scalar};

/// Columns that may carry a species name, in precedence order.
pub const SPECIES_ALIASES: &[&str] = &["species", "scientificName", "scientific_name"];

/// A canonical point record.
///
/// `fields` keeps every original column. The derived location is either a
/// valid hex cell, a geographic coordinate pair, or both; rows with neither
/// never become records.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointRecord {
    pub fields: RawRow,
    pub spatial_cell: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl PointRecord {
    pub fn field(&self, name: &str) -> Option<&Scalar> {
        self.fields.get(name)
    }

    /// Finite numeric value of `name`.
    pub fn number(&self, name: &str) -> Option<f64> {
        self.field(name).and_then(Scalar::as_finite)
    }

    /// First finite number among `names`.
    pub fn first_number(&self, names: &[&str]) -> Option<f64> {
        names.iter().find_map(|n| self.number(n))
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.field(name).and_then(Scalar::as_str)
    }

    /// Geographic position, only when both coordinates are set and in range.
    pub fn coordinates(&self) -> Option<LonLat> {
        let p = LonLat::new(self.longitude?, self.latitude?);
        p.is_geographic().then_some(p)
    }

    pub fn species(&self) -> Option<&str> {
        SPECIES_ALIASES
            .iter()
            .filter_map(|k| self.text(k))
            .map(str::trim)
            .find(|s| !s.is_empty())
    }
}
