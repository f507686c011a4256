use std::collections::BTreeMap;
use std::sync::Arc;

use formats::PointRecord;

/// Load status of one species-keyed dataset.
///
/// NotRequested → Pending → Resolved. There is no way back: resolved
/// results, empty ones included, are kept for the life of the session.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Residency {
    #[default]
    NotRequested,
    Pending,
    Resolved(Arc<Vec<PointRecord>>),
}

impl Residency {
    pub fn is_pending(&self) -> bool {
        matches!(self, Residency::Pending)
    }

    pub fn records(&self) -> Option<&Arc<Vec<PointRecord>>> {
        match self {
            Residency::Resolved(records) => Some(records),
            _ => None,
        }
    }
}

/// Per-species residency table. Keys are species names as selected.
#[derive(Debug, Clone, Default)]
pub struct SpeciesCache {
    entries: BTreeMap<String, Residency>,
}

impl SpeciesCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, species: &str) -> Residency {
        self.entries.get(species).cloned().unwrap_or_default()
    }

    /// Marks `species` pending. Returns `false` (and changes nothing) unless
    /// the species was never requested, so a load is issued at most once.
    pub fn begin(&mut self, species: &str) -> bool {
        if self.entries.contains_key(species) {
            return false;
        }
        self.entries.insert(species.to_string(), Residency::Pending);
        true
    }

    /// Stores a completed load. Completions for species that were never
    /// begun or are already resolved are ignored.
    pub fn resolve(&mut self, species: &str, records: Arc<Vec<PointRecord>>) -> bool {
        match self.entries.get_mut(species) {
            Some(slot) if slot.is_pending() => {
                *slot = Residency::Resolved(records);
                true
            }
            _ => false,
        }
    }

    pub fn records(&self, species: &str) -> Option<&Arc<Vec<PointRecord>>> {
        self.entries.get(species).and_then(Residency::records)
    }

    /// Species with a load in flight; these are the per-species loading flags.
    pub fn pending_keys(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|(_, r)| r.is_pending())
            .map(|(k, _)| k.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::{Residency, SpeciesCache};
    use formats::PointRecord;

    #[test]
    fn begin_only_from_not_requested() {
        let mut cache = SpeciesCache::new();
        assert_eq!(cache.state("Sphyrna"), Residency::NotRequested);
        assert!(cache.begin("Sphyrna"));
        assert!(!cache.begin("Sphyrna"));
        assert_eq!(cache.pending_keys(), vec!["Sphyrna".to_string()]);

        assert!(cache.resolve("Sphyrna", Arc::new(Vec::new())));
        assert!(!cache.begin("Sphyrna"));
        assert!(cache.pending_keys().is_empty());
        assert_eq!(cache.records("Sphyrna").map(|r| r.len()), Some(0));
    }

    #[test]
    fn resolve_requires_pending() {
        let mut cache = SpeciesCache::new();
        assert!(!cache.resolve("x", Arc::new(vec![PointRecord::default()])));
        assert_eq!(cache.state("x"), Residency::NotRequested);

        cache.begin("x");
        assert!(cache.resolve("x", Arc::new(vec![PointRecord::default()])));
        assert!(!cache.resolve("x", Arc::new(Vec::new())));
        assert_eq!(cache.records("x").map(|r| r.len()), Some(1));
    }
}
