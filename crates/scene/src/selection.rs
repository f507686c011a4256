use std::collections::BTreeSet;

/// A set of selected species names.
///
/// Iteration is sorted, so "the first selected species" is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpeciesSelection {
    selected: BTreeSet<String>,
}

impl SpeciesSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn contains(&self, species: &str) -> bool {
        self.selected.contains(species)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.selected.iter().map(String::as_str)
    }

    pub fn first(&self) -> Option<&str> {
        self.iter().next()
    }

    /// Replaces the selection. Blank names are dropped, the rest trimmed.
    pub fn replace<I, S>(&mut self, species: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.selected = species
            .into_iter()
            .map(|s| s.as_ref().trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Drops entries missing from `vocabulary`.
    ///
    /// Returns `true` if the set changed.
    pub fn prune(&mut self, vocabulary: &BTreeSet<String>) -> bool {
        let before = self.selected.len();
        self.selected.retain(|s| vocabulary.contains(s));
        self.selected.len() != before
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::SpeciesSelection;

    #[test]
    fn replace_normalizes_to_a_set() {
        let mut s = SpeciesSelection::new();
        s.replace(["Sphyrna ", "Carcharodon", "Sphyrna", "  "]);
        assert_eq!(s.iter().collect::<Vec<_>>(), vec!["Carcharodon", "Sphyrna"]);
        assert_eq!(s.first(), Some("Carcharodon"));
    }

    #[test]
    fn prune_reports_changes() {
        let mut s = SpeciesSelection::new();
        s.replace(["a", "b"]);
        let vocab: BTreeSet<String> = ["a".to_string()].into();
        assert!(s.prune(&vocab));
        assert!(!s.prune(&vocab));
        assert!(s.contains("a"));
        assert_eq!(s.len(), 1);
    }
}
