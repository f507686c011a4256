//! Line-oriented input for the headless session.
//!
//! `:`-prefixed lines are session controls, lines starting with `{` or `[`
//! are raw agent commands, anything else is a chat message.

use formats::DatasetId;
use scene::{UserLocation, ViewPose};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Empty,
    Load(DatasetId),
    Area(String),
    Camera(ViewPose),
    Locate(UserLocation),
    Render,
    Snapshot,
    Commands(Vec<Value>),
    Chat(String),
    Quit,
}

pub const HELP: &str = "\
:load <dataset>                 request a dataset (plankton, sst, eddies, occurrences, predictions, species-prediction:<name>)
:area <name>                    focus a named region
:camera <lon> <lat> <zoom> [bearing] [pitch]
:locate <lat> <lon> [accuracy_m]
:render                         print the render list
:snapshot                       print the agent request payload
:quit
{...} or [...]                  apply agent command JSON
anything else                   chat with the agent";

fn numbers(args: &[&str]) -> Result<Vec<f64>, String> {
    args.iter()
        .map(|a| {
            a.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| format!("not a number: {a}"))
        })
        .collect()
}

pub fn parse_input(line: &str) -> Result<Input, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Input::Empty);
    }

    if line.starts_with('{') || line.starts_with('[') {
        let value: Value = serde_json::from_str(line).map_err(|e| format!("bad JSON: {e}"))?;
        return Ok(Input::Commands(match value {
            Value::Array(items) => items,
            other => vec![other],
        }));
    }

    let Some(control) = line.strip_prefix(':') else {
        return Ok(Input::Chat(line.to_string()));
    };

    let mut parts = control.split_whitespace();
    let verb = parts.next().unwrap_or_default();
    let rest: Vec<&str> = parts.collect();
    match verb {
        "load" => {
            let key = rest.join(" ");
            DatasetId::from_key(&key)
                .map(Input::Load)
                .ok_or_else(|| format!("unknown dataset {key:?}"))
        }
        "area" if !rest.is_empty() => Ok(Input::Area(rest.join(" "))),
        "camera" => match numbers(&rest)?.as_slice() {
            &[longitude, latitude, zoom, ref tail @ ..] if tail.len() <= 2 => {
                Ok(Input::Camera(ViewPose {
                    longitude,
                    latitude,
                    zoom,
                    bearing: tail.first().copied().unwrap_or(0.0),
                    pitch: tail.get(1).copied().unwrap_or(0.0),
                }))
            }
            _ => Err("usage: :camera <lon> <lat> <zoom> [bearing] [pitch]".to_string()),
        },
        "locate" => match numbers(&rest)?.as_slice() {
            &[latitude, longitude] => Ok(Input::Locate(UserLocation {
                latitude,
                longitude,
                accuracy_meters: None,
            })),
            &[latitude, longitude, accuracy] => Ok(Input::Locate(UserLocation {
                latitude,
                longitude,
                accuracy_meters: Some(accuracy),
            })),
            _ => Err("usage: :locate <lat> <lon> [accuracy_m]".to_string()),
        },
        "render" => Ok(Input::Render),
        "snapshot" => Ok(Input::Snapshot),
        "quit" | "q" => Ok(Input::Quit),
        _ => Err(format!("unknown control :{verb}\n{HELP}")),
    }
}
