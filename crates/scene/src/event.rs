use compute::{CameraDirective, named_area};
use formats::{DatasetId, PointRecord};
use tracing::debug;

use crate::state::ViewState;
use crate::view::{UserLocation, ViewPose};

/// Discrete inputs to the view state, other than agent commands.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Ask for a dataset; ignored while the same dataset is already loading.
    LoadRequested(DatasetId),
    /// A load finished (records may be empty).
    LoadCompleted {
        dataset: DatasetId,
        records: Vec<PointRecord>,
    },
    LayerToggled {
        layer_id: String,
        enabled: Option<bool>,
    },
    LayerOpacityChanged {
        layer_id: String,
        opacity: f64,
    },
    SharkSpeciesSelected(Vec<String>),
    PredictionSpeciesSelected(Vec<String>),
    CameraMoved(ViewPose),
    UserLocated(UserLocation),
    /// Focus one of the built-in named regions and frame it.
    FocusNamedArea(String),
    /// The owning view went away; later completions are dropped.
    Detached,
}

/// Work the owner must carry out on behalf of the state.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Fetch(DatasetId),
    Frame(CameraDirective),
}

/// Turns species whose loads were just begun into fetch effects.
pub fn species_fetches(species: Vec<String>) -> impl Iterator<Item = Effect> {
    species
        .into_iter()
        .map(|s| Effect::Fetch(DatasetId::SpeciesPrediction(s)))
}

/// Applies one event, reconciles, and returns the resulting effects.
pub fn update(state: &mut ViewState, event: Event) -> Vec<Effect> {
    if state.is_detached() {
        debug!("view detached; dropping {event:?}");
        return Vec::new();
    }

    let mut effects = Vec::new();
    match event {
        Event::LoadRequested(dataset) => {
            if state.begin_load(&dataset) {
                effects.push(Effect::Fetch(dataset));
            }
        }
        Event::LoadCompleted { dataset, records } => {
            state.complete_load(dataset, records);
        }
        Event::LayerToggled { layer_id, enabled } => {
            state.toggle_layer(&layer_id, enabled);
        }
        Event::LayerOpacityChanged { layer_id, opacity } => {
            state.set_layer_opacity(&layer_id, opacity);
        }
        Event::SharkSpeciesSelected(species) => state.select_shark_species(species),
        Event::PredictionSpeciesSelected(species) => state.select_prediction_species(species),
        Event::CameraMoved(pose) => state.set_pose(pose),
        Event::UserLocated(location) => state.set_user_location(location),
        Event::FocusNamedArea(name) => match named_area(&name) {
            Some(area) => {
                effects.push(Effect::Frame(CameraDirective::frame(area.bounds)));
                state.set_focus(area);
            }
            None => debug!("unknown named area {name:?}"),
        },
        Event::Detached => {
            state.detach();
            return Vec::new();
        }
    }

    effects.extend(species_fetches(state.reconcile()));
    effects
}

#[cfg(test)]
mod tests {
    use super::{Effect, Event, update};
    use crate::state::ViewState;
    use compute::CameraDirective;
    use formats::{DatasetId, PointRecord};
    use foundation::GeoBounds;
    use pretty_assertions::assert_eq;

    #[test]
    fn load_request_is_deduplicated_until_completion() {
        let mut s = ViewState::new();
        let first = update(&mut s, Event::LoadRequested(DatasetId::Eddies));
        assert_eq!(first, vec![Effect::Fetch(DatasetId::Eddies)]);
        assert!(update(&mut s, Event::LoadRequested(DatasetId::Eddies)).is_empty());

        update(
            &mut s,
            Event::LoadCompleted {
                dataset: DatasetId::Eddies,
                records: vec![PointRecord::default()],
            },
        );
        assert!(!s.is_loading(&DatasetId::Eddies));
        assert_eq!(s.records(&DatasetId::Eddies).len(), 1);
    }

    #[test]
    fn selecting_prediction_species_fetches_lazily_once() {
        let mut s = ViewState::new();
        let fx = update(
            &mut s,
            Event::PredictionSpeciesSelected(vec!["Carcharodon carcharias".into()]),
        );
        assert_eq!(
            fx,
            vec![Effect::Fetch(DatasetId::SpeciesPrediction(
                "Carcharodon carcharias".into()
            ))]
        );
        let again = update(
            &mut s,
            Event::PredictionSpeciesSelected(vec!["Carcharodon carcharias".into()]),
        );
        assert!(again.is_empty());
    }

    #[test]
    fn named_area_focuses_and_frames() {
        let mut s = ViewState::new();
        let fx = update(&mut s, Event::FocusNamedArea("Africa".into()));
        let bounds = GeoBounds::new(-30.0, -40.0, 60.0, 35.0);
        assert_eq!(fx, vec![Effect::Frame(CameraDirective::frame(bounds))]);
        assert_eq!(s.focus().unwrap().bounds, bounds);

        assert!(update(&mut s, Event::FocusNamedArea("mars".into())).is_empty());
        assert_eq!(s.focus().unwrap().name, "africa");
    }

    #[test]
    fn detached_state_ignores_completions() {
        let mut s = ViewState::new();
        update(&mut s, Event::LoadRequested(DatasetId::Plankton));
        update(&mut s, Event::Detached);
        update(
            &mut s,
            Event::LoadCompleted {
                dataset: DatasetId::Plankton,
                records: vec![PointRecord::default()],
            },
        );
        assert!(s.dataset(&DatasetId::Plankton).is_none());
    }
}
