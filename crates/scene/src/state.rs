//! The single owned view state.
//!
//! Everything the engine displays or reports is derived from a `ViewState`.
//! It is mutated only through its methods, from one task, in response to
//! discrete events and commands. Invariants kept here:
//! - layer opacity is clamped when written
//! - selections are pruned against a species vocabulary once it is known
//! - a per-species prediction load is issued at most once
//! - the focus area is replaced whole

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use compute::FocusArea;
use formats::{Dataset, DatasetId, PointRecord};
use streaming::{Residency, SpeciesCache};
use tracing::debug;

use crate::highlight::HighlightSet;
use crate::layer::{LayerConfig, default_layers};
use crate::selection::SpeciesSelection;
use crate::view::{UserLocation, ViewPose};

#[derive(Debug, Clone)]
pub struct ViewState {
    layers: Vec<LayerConfig>,
    datasets: BTreeMap<DatasetId, Dataset>,
    loading: BTreeSet<DatasetId>,
    shark_species: SpeciesSelection,
    prediction_species: SpeciesSelection,
    /// `None` until the occurrences dataset has completed a load.
    shark_vocabulary: Option<BTreeSet<String>>,
    /// `None` until the predictions dataset has completed a load.
    prediction_vocabulary: Option<BTreeSet<String>>,
    species_cache: SpeciesCache,
    focus: Option<FocusArea>,
    highlights: HighlightSet,
    pose: ViewPose,
    user_location: Option<UserLocation>,
    detached: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::with_layers(default_layers())
    }
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layers(layers: Vec<LayerConfig>) -> Self {
        Self {
            layers,
            datasets: BTreeMap::new(),
            loading: BTreeSet::new(),
            shark_species: SpeciesSelection::new(),
            prediction_species: SpeciesSelection::new(),
            shark_vocabulary: None,
            prediction_vocabulary: None,
            species_cache: SpeciesCache::new(),
            focus: None,
            highlights: HighlightSet::new(),
            pose: ViewPose::default(),
            user_location: None,
            detached: false,
        }
    }

    // Layers

    pub fn layers(&self) -> &[LayerConfig] {
        &self.layers
    }

    pub fn layer(&self, id: &str) -> Option<&LayerConfig> {
        self.layers.iter().find(|l| l.id == id)
    }

    /// Sets `enabled`, or flips it when `None`. Unknown ids are ignored.
    pub fn toggle_layer(&mut self, id: &str, enabled: Option<bool>) -> bool {
        let Some(layer) = self.layers.iter_mut().find(|l| l.id == id) else {
            debug!("toggle for unknown layer {id:?}");
            return false;
        };
        layer.enabled = enabled.unwrap_or(!layer.enabled);
        true
    }

    pub fn set_layer_opacity(&mut self, id: &str, opacity: f64) -> bool {
        match self.layers.iter_mut().find(|l| l.id == id) {
            Some(layer) => layer.set_opacity(opacity),
            None => {
                debug!("opacity for unknown layer {id:?}");
                false
            }
        }
    }

    // Datasets

    pub fn dataset(&self, id: &DatasetId) -> Option<&Dataset> {
        self.datasets.get(id)
    }

    /// Records of a fixed dataset; empty until loaded.
    pub fn records(&self, id: &DatasetId) -> &[PointRecord] {
        self.datasets
            .get(id)
            .map(|d| d.records.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_loading(&self, id: &DatasetId) -> bool {
        match id {
            DatasetId::SpeciesPrediction(species) => {
                self.species_cache.state(species).is_pending()
            }
            other => self.loading.contains(other),
        }
    }

    /// Marks a fixed dataset as loading. Returns `false` if it already was,
    /// in which case no new fetch should be issued.
    pub fn begin_load(&mut self, id: &DatasetId) -> bool {
        match id {
            DatasetId::SpeciesPrediction(species) => self.species_cache.begin(species),
            other => self.loading.insert(other.clone()),
        }
    }

    /// Stores a completed load and clears its loading flag.
    ///
    /// Fixed datasets are replaced wholesale; species predictions are cached
    /// only when a load for them is pending.
    pub fn complete_load(&mut self, id: DatasetId, records: Vec<PointRecord>) {
        match id {
            DatasetId::SpeciesPrediction(species) => {
                if !self.species_cache.resolve(&species, Arc::new(records)) {
                    debug!("ignoring unrequested prediction load for {species:?}");
                }
            }
            other => {
                self.loading.remove(&other);
                let dataset = Dataset::new(other.clone(), records);
                match other {
                    DatasetId::Occurrences => {
                        self.shark_vocabulary = Some(dataset.species_vocabulary());
                    }
                    DatasetId::Predictions => {
                        self.prediction_vocabulary = Some(dataset.species_vocabulary());
                    }
                    _ => {}
                }
                self.datasets.insert(other, dataset);
            }
        }
    }

    pub fn species_state(&self, species: &str) -> Residency {
        self.species_cache.state(species)
    }

    pub fn species_records(&self, species: &str) -> Option<&Arc<Vec<PointRecord>>> {
        self.species_cache.records(species)
    }

    pub fn pending_species(&self) -> Vec<String> {
        self.species_cache.pending_keys()
    }

    // Selections

    pub fn shark_species(&self) -> &SpeciesSelection {
        &self.shark_species
    }

    pub fn prediction_species(&self) -> &SpeciesSelection {
        &self.prediction_species
    }

    pub fn select_shark_species<I, S>(&mut self, species: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.shark_species.replace(species);
    }

    pub fn select_prediction_species<I, S>(&mut self, species: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.prediction_species.replace(species);
    }

    pub fn clear_shark_species(&mut self) {
        self.shark_species.clear();
    }

    pub fn clear_prediction_species(&mut self) {
        self.prediction_species.clear();
    }

    pub fn shark_vocabulary(&self) -> Option<&BTreeSet<String>> {
        self.shark_vocabulary.as_ref()
    }

    pub fn prediction_vocabulary(&self) -> Option<&BTreeSet<String>> {
        self.prediction_vocabulary.as_ref()
    }

    // Focus, highlights, camera

    pub fn focus(&self) -> Option<&FocusArea> {
        self.focus.as_ref()
    }

    pub fn set_focus(&mut self, area: FocusArea) {
        self.focus = Some(area);
    }

    pub fn clear_focus(&mut self) {
        self.focus = None;
    }

    pub fn highlights(&self) -> &HighlightSet {
        &self.highlights
    }

    pub fn highlights_mut(&mut self) -> &mut HighlightSet {
        &mut self.highlights
    }

    pub fn pose(&self) -> &ViewPose {
        &self.pose
    }

    pub fn set_pose(&mut self, pose: ViewPose) {
        if pose.is_finite() {
            self.pose = pose;
        }
    }

    pub fn user_location(&self) -> Option<&UserLocation> {
        self.user_location.as_ref()
    }

    pub fn set_user_location(&mut self, location: UserLocation) {
        self.user_location = Some(location);
    }

    // Liveness

    pub fn is_detached(&self) -> bool {
        self.detached
    }

    pub fn detach(&mut self) {
        self.detached = true;
    }

    /// Restores derived invariants after a batch of mutations.
    ///
    /// Prunes selections against known vocabularies, then starts loads for
    /// selected prediction species that were never requested. Returns the
    /// species whose loads were started.
    pub fn reconcile(&mut self) -> Vec<String> {
        if let Some(vocab) = &self.shark_vocabulary {
            if self.shark_species.prune(vocab) {
                debug!("pruned stale shark species selection");
            }
        }
        if let Some(vocab) = &self.prediction_vocabulary {
            if self.prediction_species.prune(vocab) {
                debug!("pruned stale prediction species selection");
            }
        }

        let wanted: Vec<String> = self.prediction_species.iter().map(str::to_string).collect();
        wanted
            .into_iter()
            .filter(|species| self.species_cache.begin(species))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::ViewState;
    use formats::{DatasetId, PointRecord, row};
    use pretty_assertions::assert_eq;
    use streaming::Residency;

    fn species(name: &str) -> PointRecord {
        PointRecord {
            fields: row([("species", name)]),
            latitude: Some(0.0),
            longitude: Some(0.0),
            ..Default::default()
        }
    }

    #[test]
    fn toggle_and_opacity_on_known_layers_only() {
        let mut s = ViewState::new();
        let before = s.layer("plankton").unwrap().enabled;
        assert!(s.toggle_layer("plankton", None));
        assert_eq!(s.layer("plankton").unwrap().enabled, !before);
        assert!(s.toggle_layer("plankton", Some(true)));
        assert!(s.layer("plankton").unwrap().enabled);

        assert!(!s.toggle_layer("nope", None));
        assert!(s.set_layer_opacity("sst", 3.0));
        assert_eq!(s.layer("sst").unwrap().opacity(), 1.0);
        assert!(!s.set_layer_opacity("nope", 0.5));
    }

    #[test]
    fn loading_flag_round_trips() {
        let mut s = ViewState::new();
        assert!(s.begin_load(&DatasetId::Plankton));
        assert!(!s.begin_load(&DatasetId::Plankton));
        assert!(s.is_loading(&DatasetId::Plankton));
        s.complete_load(DatasetId::Plankton, Vec::new());
        assert!(!s.is_loading(&DatasetId::Plankton));
        assert!(s.dataset(&DatasetId::Plankton).unwrap().is_empty());
    }

    #[test]
    fn selections_survive_until_vocabulary_is_known() {
        let mut s = ViewState::new();
        s.select_shark_species(["Sphyrna", "Galeocerdo"]);
        s.reconcile();
        assert_eq!(s.shark_species().len(), 2);

        s.complete_load(DatasetId::Occurrences, vec![species("Sphyrna")]);
        s.reconcile();
        assert_eq!(s.shark_species().iter().collect::<Vec<_>>(), vec!["Sphyrna"]);
    }

    #[test]
    fn empty_load_still_makes_vocabulary_known() {
        let mut s = ViewState::new();
        s.select_shark_species(["Sphyrna"]);
        s.complete_load(DatasetId::Occurrences, Vec::new());
        s.reconcile();
        assert!(s.shark_species().is_empty());
    }

    #[test]
    fn reconcile_begins_each_species_once() {
        let mut s = ViewState::new();
        s.select_prediction_species(["Prionace glauca"]);
        assert_eq!(s.reconcile(), vec!["Prionace glauca".to_string()]);
        assert_eq!(s.reconcile(), Vec::<String>::new());
        assert!(s.is_loading(&DatasetId::SpeciesPrediction("Prionace glauca".into())));

        s.complete_load(
            DatasetId::SpeciesPrediction("Prionace glauca".into()),
            Vec::new(),
        );
        assert!(matches!(s.species_state("Prionace glauca"), Residency::Resolved(_)));
        assert!(s.pending_species().is_empty());

        s.clear_prediction_species();
        s.select_prediction_species(["Prionace glauca"]);
        assert!(s.reconcile().is_empty());
    }
}
