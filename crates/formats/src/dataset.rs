use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::record::PointRecord;

/// Identity of a loadable dataset.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DatasetId {
    Plankton,
    SeaSurfaceTemperature,
    Eddies,
    Occurrences,
    Predictions,
    SpeciesPrediction(String),
}

impl DatasetId {
    /// Datasets with a fixed candidate list (everything but the per-species family).
    pub fn fixed() -> [DatasetId; 5] {
        [
            DatasetId::Plankton,
            DatasetId::SeaSurfaceTemperature,
            DatasetId::Eddies,
            DatasetId::Occurrences,
            DatasetId::Predictions,
        ]
    }

    pub fn key(&self) -> String {
        match self {
            DatasetId::Plankton => "plankton".to_string(),
            DatasetId::SeaSurfaceTemperature => "sea-surface-temperature".to_string(),
            DatasetId::Eddies => "eddies".to_string(),
            DatasetId::Occurrences => "occurrences".to_string(),
            DatasetId::Predictions => "predictions".to_string(),
            DatasetId::SpeciesPrediction(s) => format!("species-prediction:{s}"),
        }
    }

    pub fn from_key(key: &str) -> Option<DatasetId> {
        let key = key.trim();
        if let Some(species) = key.strip_prefix("species-prediction:") {
            let species = species.trim();
            return (!species.is_empty()).then(|| DatasetId::SpeciesPrediction(species.to_string()));
        }
        match key {
            "plankton" => Some(DatasetId::Plankton),
            "sea-surface-temperature" | "sst" => Some(DatasetId::SeaSurfaceTemperature),
            "eddies" => Some(DatasetId::Eddies),
            "occurrences" | "sharks" => Some(DatasetId::Occurrences),
            "predictions" => Some(DatasetId::Predictions),
            _ => None,
        }
    }

    /// General predictions plus every per-species prediction.
    pub fn is_prediction_family(&self) -> bool {
        matches!(
            self,
            DatasetId::Predictions | DatasetId::SpeciesPrediction(_)
        )
    }
}

impl fmt::Display for DatasetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

/// An immutable snapshot of one load. Replaced wholesale, never edited.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub id: DatasetId,
    pub records: Arc<Vec<PointRecord>>,
}

impl Dataset {
    pub fn new(id: DatasetId, records: Vec<PointRecord>) -> Self {
        Self {
            id,
            records: Arc::new(records),
        }
    }

    pub fn empty(id: DatasetId) -> Self {
        Self::new(id, Vec::new())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct species names present in the records.
    pub fn species_vocabulary(&self) -> BTreeSet<String> {
        self.records
            .iter()
            .filter_map(|r| r.species())
            .map(str::to_string)
            .collect()
    }
}
