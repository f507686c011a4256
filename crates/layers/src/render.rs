//! Render-list building.
//!
//! The render list is the complete, serializable description of one frame
//! handed to the rendering collaborator. It is rebuilt from the view state
//! after every change; nothing here mutates state.

use compute::visible_records;
use formats::{DatasetId, HexGrid, PointRecord};
use foundation::LonLat;
use scene::{LayerConfig, ViewState};
use serde::Serialize;
use tracing::debug;

use crate::fill::triangulate_ring;
use crate::symbology::{
    EddyClass, Rgb, TEMPERATURE, ValueRange, elevation, gradient_color, parse_hex_color,
    probability_color, tint,
};

/// Resolution used when a choropleth record has coordinates but no cell.
pub const FALLBACK_RESOLUTION: u8 = 5;

pub const PLANKTON_FIELDS: &[&str] = &["chlor_a_mean", "chlor_a"];
pub const SST_FIELDS: &[&str] = &["sst_mean", "sst", "analysed_sst"];
pub const PROBABILITY_FIELDS: &[&str] = &["probability"];
pub const SSHA_FIELDS: &[&str] = &["ssha_karin_mean", "ssha_karin"];
pub const VORTICITY_FIELDS: &[&str] = &["vorticity_mean", "vorticity"];

pub const PLANKTON_ELEVATION: f64 = 50_000.0;
pub const SST_ELEVATION: f64 = 30_000.0;
pub const PREDICTION_ELEVATION: f64 = 80_000.0;

const POINT_RADIUS: f64 = 5.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellFeature {
    pub cell: String,
    pub boundary: Vec<LonLat>,
    pub color: Rgb,
    pub elevation: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointFeature {
    pub longitude: f64,
    pub latitude: f64,
    pub color: Rgb,
    pub radius: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum LayerGeometry {
    Choropleth { cells: Vec<CellFeature> },
    Points { points: Vec<PointFeature> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderLayer {
    pub id: String,
    pub opacity: f64,
    #[serde(flatten)]
    pub geometry: LayerGeometry,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FocusOutline {
    pub name: String,
    pub ring: Vec<LonLat>,
    pub triangles: Vec<[LonLat; 3]>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RenderList {
    pub layers: Vec<RenderLayer>,
    pub highlights: Vec<RenderLayer>,
    pub focus: Option<FocusOutline>,
}

impl RenderList {
    pub fn layer(&self, id: &str) -> Option<&RenderLayer> {
        self.layers.iter().find(|l| l.id == id)
    }
}

/// Builds the frame for the current state.
pub fn build_render_list(state: &ViewState, grid: &dyn HexGrid) -> RenderList {
    let layers = state
        .layers()
        .iter()
        .filter(|l| l.enabled)
        .map(|layer| RenderLayer {
            id: layer.id.clone(),
            opacity: layer.opacity(),
            geometry: layer_geometry(state, layer, grid),
        })
        .collect();

    let highlights = state
        .highlights()
        .iter()
        .map(|overlay| {
            let cells = overlay
                .cells
                .iter()
                .filter_map(|c| {
                    let boundary = grid.cell_boundary(&c.cell_id)?;
                    Some(CellFeature {
                        cell: c.cell_id.clone(),
                        boundary,
                        color: probability_color(c.weight.unwrap_or(1.0)),
                        elevation: 0.0,
                    })
                })
                .collect();
            RenderLayer {
                id: format!("highlight:{}", overlay.layer_id),
                opacity: 1.0,
                geometry: LayerGeometry::Choropleth { cells },
            }
        })
        .collect();

    let focus = state.focus().map(|area| FocusOutline {
        name: area.name.clone(),
        ring: area.polygon.clone(),
        triangles: triangulate_ring(&area.polygon),
    });

    RenderList {
        layers,
        highlights,
        focus,
    }
}

fn layer_geometry(state: &ViewState, layer: &LayerConfig, grid: &dyn HexGrid) -> LayerGeometry {
    let base = parse_hex_color(&layer.base_color);
    match &layer.dataset {
        DatasetId::Plankton => {
            let records = state.records(&DatasetId::Plankton);
            let range = value_range(records.iter(), PLANKTON_FIELDS);
            choropleth(records.iter(), grid, |r| {
                let v = r.first_number(PLANKTON_FIELDS)?;
                let t = range.normalize(v)?;
                Some((tint(base, t), elevation(v, range, PLANKTON_ELEVATION)))
            })
        }
        DatasetId::SeaSurfaceTemperature => {
            let records = state.records(&DatasetId::SeaSurfaceTemperature);
            let range = value_range(records.iter(), SST_FIELDS);
            choropleth(records.iter(), grid, |r| {
                let v = r.first_number(SST_FIELDS)?;
                Some((
                    gradient_color(v, range, &TEMPERATURE),
                    elevation(v, range, SST_ELEVATION),
                ))
            })
        }
        DatasetId::Eddies => points(state.records(&DatasetId::Eddies).iter(), |r| {
            Some(eddy_class(r).color())
        }),
        DatasetId::Occurrences => {
            let selection = state.shark_species();
            points(state.records(&DatasetId::Occurrences).iter(), |r| {
                if selection.is_empty() || r.species().is_some_and(|s| selection.contains(s)) {
                    Some(base)
                } else {
                    None
                }
            })
        }
        DatasetId::Predictions | DatasetId::SpeciesPrediction(_) => {
            let records = prediction_records(state);
            choropleth(records.into_iter(), grid, |r| {
                let p = r.first_number(PROBABILITY_FIELDS)?;
                Some((
                    probability_color(p),
                    elevation(p, ValueRange::UNIT, PREDICTION_ELEVATION),
                ))
            })
        }
    }
}

/// Prediction records in view: the union of resolved per-species datasets
/// for the selected species, or the general dataset when nothing is
/// selected. Always scoped to the focus area.
pub fn prediction_records(state: &ViewState) -> Vec<&PointRecord> {
    let focus = state.focus();
    let selection = state.prediction_species();
    if selection.is_empty() {
        return visible_records(
            &DatasetId::Predictions,
            state.records(&DatasetId::Predictions),
            focus,
        );
    }

    selection
        .iter()
        .filter_map(|species| {
            let records = state.species_records(species)?;
            let id = DatasetId::SpeciesPrediction(species.to_string());
            Some(visible_records(&id, records.as_slice(), focus))
        })
        .flatten()
        .collect()
}

/// Explicit `eddy_type`, else classified from anomaly and vorticity.
pub fn eddy_class(record: &PointRecord) -> EddyClass {
    if let Some(class) = record.text("eddy_type").and_then(EddyClass::parse) {
        return class;
    }
    let ssha = record.first_number(SSHA_FIELDS).unwrap_or(f64::NAN);
    let vorticity = record.first_number(VORTICITY_FIELDS).unwrap_or(f64::NAN);
    EddyClass::classify(ssha, vorticity)
}

fn value_range<'a>(records: impl Iterator<Item = &'a PointRecord>, fields: &[&str]) -> ValueRange {
    ValueRange::from_values(records.filter_map(|r| r.first_number(fields)))
        .unwrap_or(ValueRange::UNIT)
}

fn choropleth<'a>(
    records: impl Iterator<Item = &'a PointRecord>,
    grid: &dyn HexGrid,
    encode: impl Fn(&PointRecord) -> Option<(Rgb, f64)>,
) -> LayerGeometry {
    let mut cells = Vec::new();
    for record in records {
        let Some((color, elevation)) = encode(record) else {
            continue;
        };
        let cell = match &record.spatial_cell {
            Some(cell) => Some(cell.clone()),
            None => record
                .coordinates()
                .and_then(|p| grid.cell_at(p, FALLBACK_RESOLUTION)),
        };
        let Some(cell) = cell else {
            debug!("record without a cell skipped in choropleth");
            continue;
        };
        let Some(boundary) = grid.cell_boundary(&cell) else {
            continue;
        };
        cells.push(CellFeature {
            cell,
            boundary,
            color,
            elevation,
        });
    }
    LayerGeometry::Choropleth { cells }
}

fn points<'a>(
    records: impl Iterator<Item = &'a PointRecord>,
    color: impl Fn(&PointRecord) -> Option<Rgb>,
) -> LayerGeometry {
    let points = records
        .filter_map(|r| {
            let p = r.coordinates()?;
            Some(PointFeature {
                longitude: p.lon,
                latitude: p.lat,
                color: color(r)?,
                radius: POINT_RADIUS,
            })
        })
        .collect();
    LayerGeometry::Points { points }
}

#[cfg(test)]
mod tests {
    use super::{LayerGeometry, RenderList, build_render_list, eddy_class, prediction_records};
    use crate::symbology::{EddyClass, Rgb, probability_color};
    use compute::FocusArea;
    use formats::{DatasetId, PointRecord, Scalar, TableGrid, row};
    use foundation::{GeoBounds, LonLat};
    use pretty_assertions::assert_eq;
    use scene::{HighlightCell, HighlightOverlay, ViewState};

    fn grid() -> TableGrid {
        TableGrid::new(0.5)
            .with_cell("a", LonLat::new(0.0, 0.0))
            .with_cell("b", LonLat::new(20.0, 20.0))
    }

    fn cell_record(cell: &str, lon: f64, lat: f64, fields: &[(&str, Scalar)]) -> PointRecord {
        PointRecord {
            fields: row(fields.iter().cloned()),
            spatial_cell: Some(cell.to_string()),
            latitude: Some(lat),
            longitude: Some(lon),
        }
    }

    fn cells(list: &RenderList, id: &str) -> Vec<String> {
        match &list.layer(id).unwrap().geometry {
            LayerGeometry::Choropleth { cells } => cells.iter().map(|c| c.cell.clone()).collect(),
            LayerGeometry::Points { .. } => panic!("expected choropleth"),
        }
    }

    fn point_count(list: &RenderList, id: &str) -> usize {
        match &list.layer(id).unwrap().geometry {
            LayerGeometry::Points { points } => points.len(),
            LayerGeometry::Choropleth { .. } => panic!("expected points"),
        }
    }

    #[test]
    fn disabled_layers_are_not_rendered() {
        let mut s = ViewState::new();
        s.toggle_layer("sst", Some(false));
        let list = build_render_list(&s, &grid());
        assert!(list.layer("sst").is_none());
        assert!(list.layer("plankton").is_some());
    }

    #[test]
    fn plankton_elevation_tracks_the_value_range() {
        let mut s = ViewState::new();
        s.complete_load(
            DatasetId::Plankton,
            vec![
                cell_record("a", 0.0, 0.0, &[("chlor_a_mean", 1.0.into())]),
                cell_record("b", 20.0, 20.0, &[("chlor_a", 3.0.into())]),
            ],
        );
        let list = build_render_list(&s, &grid());
        let LayerGeometry::Choropleth { cells } = &list.layer("plankton").unwrap().geometry else {
            panic!("expected choropleth");
        };
        assert_eq!(cells[0].elevation, 0.0);
        assert_eq!(cells[1].elevation, 50_000.0);
        assert_eq!(cells[0].boundary.len(), 4);
    }

    #[test]
    fn predictions_are_focus_filtered_but_sharks_are_not() {
        let mut s = ViewState::new();
        s.complete_load(
            DatasetId::Predictions,
            vec![
                cell_record("a", 0.0, 0.0, &[("probability", 0.9.into())]),
                cell_record("b", 20.0, 20.0, &[("probability", 0.4.into())]),
            ],
        );
        s.complete_load(
            DatasetId::Occurrences,
            vec![
                cell_record("a", 0.0, 0.0, &[("species", "Sphyrna".into())]),
                cell_record("b", 20.0, 20.0, &[("species", "Sphyrna".into())]),
            ],
        );
        s.set_focus(FocusArea::from_bounds("f", GeoBounds::new(-1.0, -1.0, 1.0, 1.0)).unwrap());

        let list = build_render_list(&s, &grid());
        assert_eq!(cells(&list, "predictions"), vec!["a".to_string()]);
        assert_eq!(point_count(&list, "sharks"), 2);
        assert!(list.focus.as_ref().is_some_and(|f| f.triangles.len() == 2));
    }

    #[test]
    fn shark_selection_filters_points() {
        let mut s = ViewState::new();
        s.complete_load(
            DatasetId::Occurrences,
            vec![
                cell_record("a", 0.0, 0.0, &[("species", "Sphyrna".into())]),
                cell_record("b", 20.0, 20.0, &[("species", "Galeocerdo".into())]),
            ],
        );
        s.select_shark_species(["Galeocerdo"]);
        let list = build_render_list(&s, &grid());
        assert_eq!(point_count(&list, "sharks"), 1);
    }

    #[test]
    fn selected_species_use_their_own_datasets() {
        let mut s = ViewState::new();
        s.complete_load(
            DatasetId::Predictions,
            vec![cell_record(
                "a",
                0.0,
                0.0,
                &[
                    ("probability", 0.9.into()),
                    ("species", "Prionace glauca".into()),
                ],
            )],
        );
        s.select_prediction_species(["Prionace glauca"]);
        s.reconcile();
        assert!(prediction_records(&s).is_empty());

        s.complete_load(
            DatasetId::SpeciesPrediction("Prionace glauca".into()),
            vec![cell_record("b", 20.0, 20.0, &[("probability", 0.2.into())])],
        );
        let list = build_render_list(&s, &grid());
        assert_eq!(cells(&list, "predictions"), vec!["b".to_string()]);
    }

    #[test]
    fn highlights_default_to_full_weight() {
        let mut s = ViewState::new();
        s.highlights_mut().set(HighlightOverlay {
            layer_id: "predictions".into(),
            species: None,
            cells: vec![
                HighlightCell {
                    cell_id: "a".into(),
                    weight: None,
                },
                HighlightCell {
                    cell_id: "b".into(),
                    weight: Some(0.0),
                },
            ],
        });
        let list = build_render_list(&s, &grid());
        let LayerGeometry::Choropleth { cells } = &list.highlights[0].geometry else {
            panic!("expected choropleth");
        };
        assert_eq!(list.highlights[0].id, "highlight:predictions");
        assert_eq!(cells[0].color, probability_color(1.0));
        assert_eq!(cells[1].color, probability_color(0.0));
    }

    #[test]
    fn eddy_type_text_wins_over_classification() {
        let typed = PointRecord {
            fields: row([
                ("eddy_type", Scalar::from("Anticyclonic")),
                ("ssha_karin", (-1.0).into()),
                ("vorticity", (-1.0).into()),
            ]),
            ..Default::default()
        };
        assert_eq!(eddy_class(&typed), EddyClass::Anticyclonic);

        let raw = PointRecord {
            fields: row([("ssha_karin_mean", -0.2), ("vorticity", -3.0)]),
            ..Default::default()
        };
        assert_eq!(eddy_class(&raw), EddyClass::Cyclonic);
        assert_eq!(eddy_class(&PointRecord::default()), EddyClass::Undefined);
        assert_ne!(EddyClass::Cyclonic.color(), Rgb::WHITE);
    }

    #[test]
    fn render_list_serializes_with_kind_tags() {
        let mut s = ViewState::new();
        s.complete_load(
            DatasetId::Occurrences,
            vec![cell_record("a", 1.0, 2.0, &[("species", "Sphyrna".into())])],
        );
        let json = serde_json::to_value(build_render_list(&s, &grid())).unwrap();
        let sharks = json["layers"]
            .as_array()
            .unwrap()
            .iter()
            .find(|l| l["id"] == "sharks")
            .unwrap();
        assert_eq!(sharks["kind"], "Points");
        assert_eq!(sharks["points"][0]["longitude"], 1.0);
    }
}
