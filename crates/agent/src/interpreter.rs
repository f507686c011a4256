//! Applies typed commands to the view state.
//!
//! `apply` is total: every command either changes state in its documented
//! way or is a no-op. It never panics and never returns an error.

use compute::{CameraDirective, resolve_highlight};
use formats::HexGrid;
use foundation::GeoBounds;
use scene::{Effect, HighlightCell, HighlightOverlay, ViewState, species_fetches};
use tracing::debug;

use crate::command::Command;

/// Applies one command. Does not reconcile; see [`apply_batch`].
pub fn apply(state: &mut ViewState, command: Command, grid: &dyn HexGrid) -> Vec<Effect> {
    let mut effects = Vec::new();
    match command {
        Command::ToggleLayer { layer_id, enabled } => {
            state.toggle_layer(&layer_id, enabled);
        }
        Command::SetLayerOpacity { layer_id, opacity } => {
            state.set_layer_opacity(&layer_id, opacity);
        }
        Command::FilterSharkSpecies { species } => state.select_shark_species(species),
        Command::FilterPredictionSpecies { species } => state.select_prediction_species(species),
        Command::ClearSharkFilter => state.clear_shark_species(),
        Command::ClearPredictionFilter => state.clear_prediction_species(),
        Command::ClearPlot { layer_id: None } => state.highlights_mut().clear(),
        Command::ClearPlot {
            layer_id: Some(layer_id),
        } => {
            state.highlights_mut().clear_layer(&layer_id);
        }
        Command::PlotH3 {
            layer_id,
            species,
            cells,
        } => {
            let total = cells.len();
            let cells: Vec<HighlightCell> = cells
                .into_iter()
                .filter(|c| grid.is_valid_cell(&c.cell_id))
                .map(|c| HighlightCell {
                    cell_id: c.cell_id,
                    weight: c.weight,
                })
                .collect();
            if cells.is_empty() {
                debug!("plot-h3 for {layer_id}: none of {total} cells valid; keeping overlay");
            } else {
                state.highlights_mut().set(HighlightOverlay {
                    layer_id,
                    species,
                    cells,
                });
            }
        }
        Command::HighlightArea { clear: true, .. } => state.clear_focus(),
        Command::HighlightArea {
            clear: false,
            name,
            polygon,
            bounds,
        } => match resolve_highlight(&name, polygon.as_deref(), bounds) {
            Some(resolution) => {
                state.set_focus(resolution.area);
                effects.extend(resolution.frame.map(Effect::Frame));
            }
            None => debug!("highlight-area without usable geometry"),
        },
        Command::ClearHighlight => state.clear_focus(),
        Command::FocusBounds { bounds: (a, b) } => {
            if a.is_finite() && b.is_finite() {
                effects.push(Effect::Frame(CameraDirective::frame(
                    GeoBounds::from_corners(a, b),
                )));
            }
        }
    }
    effects
}

/// Applies commands in order, then reconciles once.
pub fn apply_batch(
    state: &mut ViewState,
    commands: Vec<Command>,
    grid: &dyn HexGrid,
) -> Vec<Effect> {
    if state.is_detached() {
        return Vec::new();
    }
    let mut effects: Vec<Effect> = commands
        .into_iter()
        .flat_map(|c| apply(state, c, grid))
        .collect();
    effects.extend(species_fetches(state.reconcile()));
    effects
}
