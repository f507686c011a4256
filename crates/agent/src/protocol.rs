//! Wire shapes exchanged with the agent backend.

use compute::FocusArea;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use scene::{UserLocation, ViewState};

use crate::command::Command;

/// Reply used whenever the agent cannot be reached or answers garbage.
pub const FALLBACK_REPLY: &str = "Desculpe, não consegui processar sua solicitação agora.";

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentMode {
    #[default]
    Chat,
    Agent,
}

impl AgentMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chat" => Some(AgentMode::Chat),
            "agent" => Some(AgentMode::Agent),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerSnapshot {
    pub id: String,
    pub enabled: bool,
    pub opacity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateSnapshot {
    pub layers: Vec<LayerSnapshot>,
    pub selected_shark_species: Vec<String>,
    pub prediction_species: Option<String>,
    pub focus_area: Option<FocusArea>,
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct ViewCenter {
    pub longitude: f64,
    pub latitude: f64,
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct ViewSnapshot {
    pub center: ViewCenter,
    pub zoom: f64,
    pub bearing: f64,
    pub pitch: f64,
}

/// Outbound request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentRequest {
    pub mode: AgentMode,
    pub message: String,
    pub state: StateSnapshot,
    pub view: ViewSnapshot,
    pub user_location: Option<UserLocation>,
}

impl AgentRequest {
    /// Captures the parts of `state` the agent is allowed to see.
    pub fn from_state(mode: AgentMode, message: impl Into<String>, state: &ViewState) -> Self {
        let pose = state.pose();
        Self {
            mode,
            message: message.into(),
            state: StateSnapshot {
                layers: state
                    .layers()
                    .iter()
                    .map(|l| LayerSnapshot {
                        id: l.id.clone(),
                        enabled: l.enabled,
                        opacity: l.opacity(),
                    })
                    .collect(),
                selected_shark_species: state
                    .shark_species()
                    .iter()
                    .map(str::to_string)
                    .collect(),
                prediction_species: state.prediction_species().first().map(str::to_string),
                focus_area: state.focus().cloned(),
            },
            view: ViewSnapshot {
                center: ViewCenter {
                    longitude: pose.longitude,
                    latitude: pose.latitude,
                },
                zoom: pose.zoom,
                bearing: pose.bearing,
                pitch: pose.pitch,
            },
            user_location: state.user_location().copied(),
        }
    }
}

/// Inbound response body. Commands stay untyped until [`AgentReply`].
///
/// `mode` is echoed back as free text and not interpreted.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AgentResponse {
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub reply: Option<String>,
    #[serde(default)]
    pub commands: Vec<Value>,
}

/// A reply ready for the session: text plus the commands that parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentReply {
    pub reply: String,
    pub commands: Vec<Command>,
}

impl AgentReply {
    pub fn fallback() -> Self {
        Self {
            reply: FALLBACK_REPLY.to_string(),
            commands: Vec::new(),
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.reply == FALLBACK_REPLY && self.commands.is_empty()
    }
}

impl From<AgentResponse> for AgentReply {
    fn from(response: AgentResponse) -> Self {
        Self {
            reply: response
                .reply
                .unwrap_or_else(|| FALLBACK_REPLY.to_string()),
            commands: Command::parse_all(&response.commands),
        }
    }
}
