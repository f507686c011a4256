//! Hexagonal spatial index seam.
//!
//! The engine only needs four pure operations from the grid library: validity,
//! center, boundary and point-to-cell. `H3Grid` backs them with `h3o`;
//! `TableGrid` is a fixed lookup table used for deterministic scenarios.

use std::collections::BTreeMap;

use foundation::LonLat;
use h3o::{CellIndex, LatLng, Resolution};

/// Pure hex-grid functions. Implementations must be deterministic.
pub trait HexGrid: Send + Sync {
    fn is_valid_cell(&self, cell: &str) -> bool;

    /// Cell center, `None` for invalid ids.
    fn cell_center(&self, cell: &str) -> Option<LonLat>;

    /// Open boundary ring (no closing duplicate), `None` for invalid ids.
    fn cell_boundary(&self, cell: &str) -> Option<Vec<LonLat>>;

    /// Cell containing `point` at `resolution`.
    fn cell_at(&self, point: LonLat, resolution: u8) -> Option<String>;
}

/// H3 grid backed by the `h3o` crate.
#[derive(Debug, Default, Copy, Clone)]
pub struct H3Grid;

impl H3Grid {
    pub fn new() -> Self {
        Self
    }
}

fn parse_cell(cell: &str) -> Option<CellIndex> {
    cell.trim().parse::<CellIndex>().ok()
}

fn to_lon_lat(ll: LatLng) -> LonLat {
    LonLat::new(ll.lng(), ll.lat())
}

impl HexGrid for H3Grid {
    fn is_valid_cell(&self, cell: &str) -> bool {
        parse_cell(cell).is_some()
    }

    fn cell_center(&self, cell: &str) -> Option<LonLat> {
        parse_cell(cell).map(|c| to_lon_lat(LatLng::from(c)))
    }

    fn cell_boundary(&self, cell: &str) -> Option<Vec<LonLat>> {
        let c = parse_cell(cell)?;
        Some(c.boundary().iter().copied().map(to_lon_lat).collect())
    }

    fn cell_at(&self, point: LonLat, resolution: u8) -> Option<String> {
        let resolution = Resolution::try_from(resolution).ok()?;
        let ll = LatLng::new(point.lat, point.lon).ok()?;
        Some(ll.to_cell(resolution).to_string())
    }
}

/// Lookup-table grid: every known cell is a square of `half_size` degrees
/// around its center. Unknown ids are invalid.
#[derive(Debug, Clone, Default)]
pub struct TableGrid {
    cells: BTreeMap<String, LonLat>,
    half_size: f64,
}

impl TableGrid {
    pub fn new(half_size: f64) -> Self {
        Self {
            cells: BTreeMap::new(),
            half_size,
        }
    }

    pub fn with_cell(mut self, id: impl Into<String>, center: LonLat) -> Self {
        self.cells.insert(id.into(), center);
        self
    }
}

impl HexGrid for TableGrid {
    fn is_valid_cell(&self, cell: &str) -> bool {
        self.cells.contains_key(cell)
    }

    fn cell_center(&self, cell: &str) -> Option<LonLat> {
        self.cells.get(cell).copied()
    }

    fn cell_boundary(&self, cell: &str) -> Option<Vec<LonLat>> {
        let c = self.cells.get(cell)?;
        let h = self.half_size;
        Some(vec![
            LonLat::new(c.lon - h, c.lat - h),
            LonLat::new(c.lon + h, c.lat - h),
            LonLat::new(c.lon + h, c.lat + h),
            LonLat::new(c.lon - h, c.lat + h),
        ])
    }

    fn cell_at(&self, point: LonLat, _resolution: u8) -> Option<String> {
        let h = self.half_size;
        self.cells
            .iter()
            .find(|(_, c)| (point.lon - c.lon).abs() <= h && (point.lat - c.lat).abs() <= h)
            .map(|(id, _)| id.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::{H3Grid, HexGrid, TableGrid};
    use foundation::LonLat;

    const CELL: &str = "85560b2ffffffff";

    #[test]
    fn h3_validates_ids() {
        let grid = H3Grid::new();
        assert!(grid.is_valid_cell(CELL));
        assert!(!grid.is_valid_cell("not-a-cell"));
        assert!(!grid.is_valid_cell(""));
        assert!(grid.cell_center("zzz").is_none());
    }

    #[test]
    fn h3_center_round_trips_through_cell_at() {
        let grid = H3Grid::new();
        let center = grid.cell_center(CELL).expect("center");
        assert!(center.is_geographic());
        assert_eq!(grid.cell_at(center, 5).as_deref(), Some(CELL));
    }

    #[test]
    fn h3_boundary_has_hexagon_vertices() {
        let boundary = H3Grid::new().cell_boundary(CELL).expect("boundary");
        assert!(boundary.len() >= 5);
    }

    #[test]
    fn table_grid_answers_from_its_table() {
        let grid = TableGrid::new(0.5).with_cell("a", LonLat::new(10.0, 20.0));
        assert!(grid.is_valid_cell("a"));
        assert!(!grid.is_valid_cell("b"));
        assert_eq!(grid.cell_center("a"), Some(LonLat::new(10.0, 20.0)));
        assert_eq!(grid.cell_boundary("a").map(|b| b.len()), Some(4));
        assert_eq!(
            grid.cell_at(LonLat::new(10.2, 19.8), 5).as_deref(),
            Some("a")
        );
    }
}
