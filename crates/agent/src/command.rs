//! Typed agent commands.
//!
//! Commands arrive as loosely shaped JSON from an external agent. They are
//! parsed exactly once, here, into a closed enum; anything that does not fit
//! is dropped with a debug log and never reaches the interpreter.

use foundation::LonLat;
use serde_json::Value;
use tracing::debug;

/// Layer targeted by `plot-h3` when the agent omits `layerId`.
pub const DEFAULT_PLOT_LAYER: &str = "predictions";

/// Name given to focus areas created by `highlight-area` without a `name`.
pub const DEFAULT_AREA_NAME: &str = "highlight";

#[derive(Debug, Clone, PartialEq)]
pub struct PlotCell {
    pub cell_id: String,
    pub weight: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    ToggleLayer {
        layer_id: String,
        enabled: Option<bool>,
    },
    SetLayerOpacity {
        layer_id: String,
        opacity: f64,
    },
    FilterSharkSpecies {
        species: Vec<String>,
    },
    FilterPredictionSpecies {
        species: Vec<String>,
    },
    ClearSharkFilter,
    ClearPredictionFilter,
    /// Clears every highlight overlay, or only `layer_id`'s.
    ClearPlot {
        layer_id: Option<String>,
    },
    PlotH3 {
        layer_id: String,
        species: Option<String>,
        cells: Vec<PlotCell>,
    },
    HighlightArea {
        clear: bool,
        name: String,
        polygon: Option<Vec<LonLat>>,
        bounds: Option<(LonLat, LonLat)>,
    },
    ClearHighlight,
    FocusBounds {
        bounds: (LonLat, LonLat),
    },
}

impl Command {
    pub fn action(&self) -> &'static str {
        match self {
            Command::ToggleLayer { .. } => "toggle-layer",
            Command::SetLayerOpacity { .. } => "set-layer-opacity",
            Command::FilterSharkSpecies { .. } => "filter-shark-species",
            Command::FilterPredictionSpecies { .. } => "filter-prediction-species",
            Command::ClearSharkFilter => "clear-shark-filter",
            Command::ClearPredictionFilter => "clear-prediction-filter",
            Command::ClearPlot { .. } => "clear-plot",
            Command::PlotH3 { .. } => "plot-h3",
            Command::HighlightArea { .. } => "highlight-area",
            Command::ClearHighlight => "clear-highlight",
            Command::FocusBounds { .. } => "focus-bounds",
        }
    }

    /// Parses one command. Unknown actions and invalid payloads yield `None`.
    pub fn from_value(value: &Value) -> Option<Command> {
        let Some(action) = value.get("action").and_then(Value::as_str) else {
            debug!("command without action: {value}");
            return None;
        };

        let parsed = match action.trim() {
            "toggle-layer" => layer_id(value).map(|layer_id| Command::ToggleLayer {
                layer_id,
                enabled: value.get("enabled").and_then(Value::as_bool),
            }),
            "set-layer-opacity" => layer_id(value).and_then(|layer_id| {
                let opacity = value.get("opacity").and_then(number_like)?;
                Some(Command::SetLayerOpacity { layer_id, opacity })
            }),
            "filter-shark-species" => {
                species_list(value).map(|species| Command::FilterSharkSpecies { species })
            }
            "filter-prediction-species" => {
                species_list(value).map(|species| Command::FilterPredictionSpecies { species })
            }
            "clear-shark-filter" => Some(Command::ClearSharkFilter),
            "clear-prediction-filter" => Some(Command::ClearPredictionFilter),
            "clear-plot" => Some(Command::ClearPlot {
                layer_id: layer_id(value),
            }),
            "plot-h3" => value
                .get("cells")
                .and_then(Value::as_array)
                .map(|cells| Command::PlotH3 {
                    layer_id: layer_id(value).unwrap_or_else(|| DEFAULT_PLOT_LAYER.to_string()),
                    species: value
                        .get("species")
                        .and_then(Value::as_str)
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(str::to_string),
                    cells: cells.iter().filter_map(plot_cell).collect(),
                }),
            "highlight-area" => Some(Command::HighlightArea {
                clear: value.get("clear").and_then(Value::as_bool).unwrap_or(false),
                name: value
                    .get("name")
                    .and_then(Value::as_str)
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .unwrap_or(DEFAULT_AREA_NAME)
                    .to_string(),
                polygon: value.get("polygon").and_then(polygon),
                bounds: value.get("bounds").and_then(corner_pair),
            }),
            "clear-highlight" => Some(Command::ClearHighlight),
            "focus-bounds" => value
                .get("bounds")
                .and_then(corner_pair)
                .map(|bounds| Command::FocusBounds { bounds }),
            other => {
                debug!("unknown command action {other:?}");
                return None;
            }
        };

        if parsed.is_none() {
            debug!("invalid payload for {action}: {value}");
        }
        parsed
    }

    /// Parses a command list, dropping invalid entries.
    pub fn parse_all(values: &[Value]) -> Vec<Command> {
        values.iter().filter_map(Command::from_value).collect()
    }
}

fn layer_id(value: &Value) -> Option<String> {
    value
        .get("layerId")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Finite number, or a string that parses as one.
fn number_like(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// A string or an array of strings; non-strings and blanks are dropped.
/// An empty result is invalid.
fn species_list(value: &Value) -> Option<Vec<String>> {
    let species: Vec<String> = match value.get("species")? {
        Value::String(s) => vec![s.trim().to_string()],
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(|s| s.trim().to_string())
            .collect(),
        _ => return None,
    };
    let species: Vec<String> = species.into_iter().filter(|s| !s.is_empty()).collect();
    (!species.is_empty()).then_some(species)
}

fn plot_cell(value: &Value) -> Option<PlotCell> {
    if let Some(id) = value.as_str() {
        return Some(PlotCell {
            cell_id: id.trim().to_string(),
            weight: None,
        });
    }
    let cell_id = value.get("h3").and_then(Value::as_str)?.trim().to_string();
    let weight = value
        .get("weight")
        .and_then(number_like)
        .or_else(|| value.get("probability").and_then(number_like));
    Some(PlotCell { cell_id, weight })
}

fn point(value: &Value) -> Option<LonLat> {
    let pair = value.as_array()?;
    if pair.len() < 2 {
        return None;
    }
    let p = LonLat::new(pair[0].as_f64()?, pair[1].as_f64()?);
    p.is_finite().then_some(p)
}

fn polygon(value: &Value) -> Option<Vec<LonLat>> {
    value.as_array()?.iter().map(point).collect()
}

fn corner_pair(value: &Value) -> Option<(LonLat, LonLat)> {
    match value.as_array()?.as_slice() {
        [a, b] => Some((point(a)?, point(b)?)),
        _ => None,
    }
}
