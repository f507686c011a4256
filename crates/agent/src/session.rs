//! One interactive exploration session.
//!
//! The session is the only thing that mutates its `ViewState`. Everything
//! else (loaders, the agent client, the camera) talks to it through events,
//! commands and replies, and gets effects back.

use std::sync::Arc;

use formats::HexGrid;
use layers::{RenderList, build_render_list};
use scene::{Effect, Event, ViewState, update};
use serde_json::Value;

use crate::command::Command;
use crate::interpreter::apply_batch;
use crate::protocol::{AgentMode, AgentReply, AgentRequest};

pub struct Session {
    state: ViewState,
    grid: Arc<dyn HexGrid>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl Session {
    pub fn new(grid: Arc<dyn HexGrid>) -> Self {
        Self::with_state(ViewState::new(), grid)
    }

    pub fn with_state(state: ViewState, grid: Arc<dyn HexGrid>) -> Self {
        Self { state, grid }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn grid(&self) -> &dyn HexGrid {
        self.grid.as_ref()
    }

    pub fn handle(&mut self, event: Event) -> Vec<Effect> {
        update(&mut self.state, event)
    }

    pub fn apply_commands(&mut self, commands: Vec<Command>) -> Vec<Effect> {
        apply_batch(&mut self.state, commands, self.grid.as_ref())
    }

    /// Parses and applies raw command objects; invalid ones are skipped.
    pub fn apply_json(&mut self, values: &[Value]) -> Vec<Effect> {
        self.apply_commands(Command::parse_all(values))
    }

    pub fn agent_request(&self, mode: AgentMode, message: impl Into<String>) -> AgentRequest {
        AgentRequest::from_state(mode, message, &self.state)
    }

    /// Applies a reply's commands and hands back its text.
    pub fn receive_reply(&mut self, reply: AgentReply) -> (String, Vec<Effect>) {
        let effects = self.apply_commands(reply.commands);
        (reply.reply, effects)
    }

    pub fn render(&self) -> RenderList {
        build_render_list(&self.state, self.grid.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::Session;
    use crate::protocol::{AgentMode, AgentReply};
    use formats::{DatasetId, PointRecord, Scalar, TableGrid, row};
    use foundation::LonLat;
    use pretty_assertions::assert_eq;
    use scene::{Effect, Event};
    use serde_json::json;
    use std::sync::Arc;

    fn session() -> Session {
        Session::new(Arc::new(
            TableGrid::new(0.5).with_cell("c1", LonLat::new(-30.0, -10.0)),
        ))
    }

    fn prediction(species: &str, p: f64) -> PointRecord {
        PointRecord {
            fields: row([
                ("species", Scalar::from(species)),
                ("probability", Scalar::from(p)),
            ]),
            spatial_cell: Some("c1".into()),
            ..Default::default()
        }
    }

    #[test]
    fn species_selection_loads_then_renders() {
        let mut s = session();
        let fx = s.apply_json(&[json!({
            "action": "filter-prediction-species",
            "species": "Prionace glauca"
        })]);
        let id = DatasetId::SpeciesPrediction("Prionace glauca".into());
        assert_eq!(fx, vec![Effect::Fetch(id.clone())]);
        assert!(s.state().is_loading(&id));

        s.handle(Event::LoadCompleted {
            dataset: id.clone(),
            records: vec![prediction("Prionace glauca", 0.7)],
        });
        assert!(!s.state().is_loading(&id));

        let render = s.render();
        let layer = render.layer("predictions").expect("predictions layer");
        let v = serde_json::to_value(layer).unwrap();
        assert_eq!(v["cells"][0]["cell"], "c1");
    }

    #[test]
    fn reply_commands_mutate_state() {
        let mut s = session();
        let reply = AgentReply {
            reply: "ok".into(),
            commands: crate::command::Command::parse_all(&[
                json!({"action": "toggle-layer", "layerId": "sst", "enabled": true}),
                json!({"action": "highlight-area", "bounds": [[-40, -20], [-20, 0]]}),
            ]),
        };
        let (text, fx) = s.receive_reply(reply);
        assert_eq!(text, "ok");
        assert_eq!(fx.len(), 1);
        assert!(s.state().layer("sst").unwrap().enabled);
        assert!(s.state().focus().is_some());

        let req = s.agent_request(AgentMode::Chat, "e agora?");
        assert_eq!(req.state.focus_area.as_ref().map(|f| f.name.as_str()), Some("highlight"));
    }

    #[test]
    fn fallback_reply_changes_nothing() {
        let mut s = session();
        let before = s.state().layers().to_vec();
        let (text, fx) = s.receive_reply(AgentReply::fallback());
        assert!(!text.is_empty());
        assert!(fx.is_empty());
        assert_eq!(s.state().layers(), before.as_slice());
    }

    #[test]
    fn detached_session_ignores_late_results() {
        let mut s = session();
        s.handle(Event::LoadRequested(DatasetId::Predictions));
        s.handle(Event::Detached);
        s.handle(Event::LoadCompleted {
            dataset: DatasetId::Predictions,
            records: vec![prediction("Prionace glauca", 0.2)],
        });
        assert!(s.state().records(&DatasetId::Predictions).is_empty());
        assert!(s.apply_json(&[json!({"action": "clear-plot"})]).is_empty());
    }
}
