//! Hex-cell binning of raw point tables.
//!
//! Used by the offline tools to turn dense measurement or occurrence exports
//! into per-cell summaries the engine loads directly. Centroids are the cell
//! centers, not the mean of the binned points.

use std::collections::BTreeMap;

use foundation::LonLat;

use crate::hexgrid::HexGrid;
use crate::normalize::AliasTable;
use crate::record::SPECIES_ALIASES;
use crate::value::{RawRow, Scalar};

/// Summary statistics of one field within one cell.
#[derive(Debug, Clone, PartialEq)]
pub struct CellSummary {
    pub cell: String,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    /// Sample standard deviation; `None` for a single observation.
    pub std: Option<f64>,
    pub n: usize,
    pub centroid: LonLat,
}

/// Occurrence count of one species within one cell.
#[derive(Debug, Clone, PartialEq)]
pub struct OccurrenceCell {
    pub species: String,
    pub cell: String,
    pub n_obs: usize,
    pub centroid: LonLat,
}

fn row_position(aliases: &AliasTable, row: &RawRow) -> Option<LonLat> {
    let lat = aliases.latitude(row).and_then(Scalar::as_finite)?;
    let lon = aliases.longitude(row).and_then(Scalar::as_finite)?;
    let p = LonLat::new(lon, lat);
    p.is_geographic().then_some(p)
}

/// Bins finite values of `field` by the cell of each row's coordinates.
///
/// Output is sorted by cell id.
pub fn aggregate_values(
    rows: &[RawRow],
    field: &str,
    grid: &dyn HexGrid,
    resolution: u8,
) -> Vec<CellSummary> {
    let aliases = AliasTable::default();
    let mut bins: BTreeMap<String, Vec<f64>> = BTreeMap::new();

    for row in rows {
        let Some(value) = row.get(field).and_then(Scalar::as_finite) else {
            continue;
        };
        let Some(cell) = row_position(&aliases, row).and_then(|p| grid.cell_at(p, resolution))
        else {
            continue;
        };
        bins.entry(cell).or_default().push(value);
    }

    bins.into_iter()
        .filter_map(|(cell, values)| {
            let centroid = grid.cell_center(&cell)?;
            let n = values.len();
            let mean = values.iter().sum::<f64>() / n as f64;
            let min = values.iter().copied().fold(f64::INFINITY, f64::min);
            let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let std = (n > 1).then(|| {
                let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
                (ss / (n - 1) as f64).sqrt()
            });
            Some(CellSummary {
                cell,
                mean,
                min,
                max,
                std,
                n,
                centroid,
            })
        })
        .collect()
}

/// Counts occurrences per (cell, species). Rows without a species or a
/// geographic position are skipped. Output is sorted by cell then species.
pub fn aggregate_occurrences(
    rows: &[RawRow],
    grid: &dyn HexGrid,
    resolution: u8,
) -> Vec<OccurrenceCell> {
    let aliases = AliasTable::default();
    let mut bins: BTreeMap<(String, String), usize> = BTreeMap::new();

    for row in rows {
        let species = SPECIES_ALIASES
            .iter()
            .filter_map(|k| row.get(*k).and_then(Scalar::as_str))
            .map(str::trim)
            .find(|s| !s.is_empty());
        let Some(species) = species else {
            continue;
        };
        let Some(cell) = row_position(&aliases, row).and_then(|p| grid.cell_at(p, resolution))
        else {
            continue;
        };
        *bins.entry((cell, species.to_string())).or_default() += 1;
    }

    bins.into_iter()
        .filter_map(|((cell, species), n_obs)| {
            let centroid = grid.cell_center(&cell)?;
            Some(OccurrenceCell {
                species,
                cell,
                n_obs,
                centroid,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{aggregate_occurrences, aggregate_values};
    use crate::hexgrid::TableGrid;
    use crate::value::{Scalar, row};
    use foundation::LonLat;
    use pretty_assertions::assert_eq;

    fn grid() -> TableGrid {
        TableGrid::new(0.5)
            .with_cell("a", LonLat::new(0.0, 0.0))
            .with_cell("b", LonLat::new(10.0, 10.0))
    }

    #[test]
    fn values_are_binned_with_sample_std() {
        let rows = vec![
            row([("lat", 0.1), ("lon", 0.1), ("chlor_a", 1.0)]),
            row([("lat", -0.1), ("lon", 0.2), ("chlor_a", 3.0)]),
            row([("lat", 10.0), ("lon", 10.0), ("chlor_a", 5.0)]),
            row([("lat", 10.0), ("lon", 10.0), ("chlor_a", f64::NAN)]),
            row([("lat", 50.0), ("lon", 50.0), ("chlor_a", 7.0)]),
        ];
        let out = aggregate_values(&rows, "chlor_a", &grid(), 5);
        assert_eq!(out.len(), 2);

        assert_eq!(out[0].cell, "a");
        assert_eq!(out[0].n, 2);
        assert_eq!(out[0].mean, 2.0);
        assert_eq!((out[0].min, out[0].max), (1.0, 3.0));
        assert_eq!(out[0].std, Some(2.0_f64.sqrt()));

        assert_eq!(out[1].cell, "b");
        assert_eq!(out[1].n, 1);
        assert_eq!(out[1].std, None);
        assert_eq!(out[1].centroid, LonLat::new(10.0, 10.0));
    }

    #[test]
    fn occurrences_group_by_cell_and_species() {
        let rows = vec![
            row([
                ("scientificName", Scalar::from("Sphyrna")),
                ("decimalLatitude", 0.0.into()),
                ("decimalLongitude", 0.0.into()),
            ]),
            row([
                ("scientificName", Scalar::from("Sphyrna")),
                ("decimalLatitude", 0.2.into()),
                ("decimalLongitude", 0.1.into()),
            ]),
            row([
                ("species", Scalar::from("Carcharodon")),
                ("lat", 0.0.into()),
                ("lon", 0.0.into()),
            ]),
            row([
                ("species", Scalar::from("Prionace")),
                ("lat", 99.0.into()),
                ("lon", 0.0.into()),
            ]),
        ];
        let out = aggregate_occurrences(&rows, &grid(), 5);
        let summary: Vec<_> = out
            .iter()
            .map(|o| (o.cell.as_str(), o.species.as_str(), o.n_obs))
            .collect();
        assert_eq!(summary, vec![("a", "Carcharodon", 1), ("a", "Sphyrna", 2)]);
    }
}
