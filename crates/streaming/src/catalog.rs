use std::collections::BTreeMap;
use std::path::Path;

use formats::DatasetId;
use serde::{Deserialize, Serialize};

/// Placeholder substituted with the slugged species name.
pub const SPECIES_PLACEHOLDER: &str = "{species}";

#[derive(Debug)]
pub enum CatalogError {
    Io(std::io::Error),
    Json(serde_json::Error),
    MissingPlaceholder(String),
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::Io(e) => write!(f, "failed to read catalog: {e}"),
            CatalogError::Json(e) => write!(f, "invalid catalog JSON: {e}"),
            CatalogError::MissingPlaceholder(t) => {
                write!(f, "species template {t:?} lacks {SPECIES_PLACEHOLDER}")
            }
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogError::Io(e) => Some(e),
            CatalogError::Json(e) => Some(e),
            CatalogError::MissingPlaceholder(_) => None,
        }
    }
}

/// Ordered candidate locators per dataset.
///
/// JSON shape:
/// `{"datasets": {"plankton": ["a.csv", "b.csv"], ...}, "speciesPrediction": ["p/{species}.csv"]}`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceCatalog {
    #[serde(default)]
    pub datasets: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub species_prediction: Vec<String>,
}

/// Species name as used in file names: trimmed, whitespace runs → `_`.
pub fn species_slug(species: &str) -> String {
    species.split_whitespace().collect::<Vec<_>>().join("_")
}

impl SourceCatalog {
    /// Default layout of the offline pipeline's outputs under `root`
    /// (a directory or a URL prefix).
    pub fn rooted_at(root: &str) -> Self {
        let root = root.trim_end_matches('/');
        let at = |rel: &str| {
            if root.is_empty() {
                rel.to_string()
            } else {
                format!("{root}/{rel}")
            }
        };

        let mut datasets = BTreeMap::new();
        datasets.insert(
            DatasetId::Plankton.key(),
            vec![at("plankton/plankton.h3r5.csv"), at("plankton.csv")],
        );
        datasets.insert(
            DatasetId::SeaSurfaceTemperature.key(),
            vec![at("sst/sst.h3r5.csv"), at("sst.csv")],
        );
        datasets.insert(
            DatasetId::Eddies.key(),
            vec![at("swot/swot_shark_activity.csv"), at("eddies.csv")],
        );
        datasets.insert(
            DatasetId::Occurrences.key(),
            vec![at("sharks/sharks_h3r5.csv"), at("sharks.csv")],
        );
        datasets.insert(
            DatasetId::Predictions.key(),
            vec![at("predictions/predictions.csv"), at("predictions.csv")],
        );

        Self {
            datasets,
            species_prediction: vec![at("predictions/{species}.csv")],
        }
    }

    pub fn from_json(text: &str) -> Result<Self, CatalogError> {
        let catalog: Self = serde_json::from_str(text).map_err(CatalogError::Json)?;
        if let Some(t) = catalog
            .species_prediction
            .iter()
            .find(|t| !t.contains(SPECIES_PLACEHOLDER))
        {
            return Err(CatalogError::MissingPlaceholder(t.clone()));
        }
        Ok(catalog)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let text = std::fs::read_to_string(path).map_err(CatalogError::Io)?;
        Self::from_json(&text)
    }

    /// Candidates for `id` in attempt order; empty when none are configured.
    pub fn candidates(&self, id: &DatasetId) -> Vec<String> {
        match id {
            DatasetId::SpeciesPrediction(species) => {
                let slug = species_slug(species);
                if slug.is_empty() {
                    return Vec::new();
                }
                self.species_prediction
                    .iter()
                    .map(|t| t.replace(SPECIES_PLACEHOLDER, &slug))
                    .collect()
            }
            other => self.datasets.get(&other.key()).cloned().unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CatalogError, SourceCatalog, species_slug};
    use formats::DatasetId;
    use pretty_assertions::assert_eq;

    #[test]
    fn slugs_collapse_whitespace() {
        assert_eq!(species_slug("  Prionace   glauca "), "Prionace_glauca");
        assert_eq!(species_slug(""), "");
    }

    #[test]
    fn default_catalog_covers_every_fixed_dataset() {
        let c = SourceCatalog::rooted_at("/data/");
        for id in DatasetId::fixed() {
            assert!(!c.candidates(&id).is_empty(), "{id}");
        }
        assert_eq!(
            c.candidates(&DatasetId::Plankton)[0],
            "/data/plankton/plankton.h3r5.csv"
        );
        assert_eq!(
            c.candidates(&DatasetId::SpeciesPrediction("Galeocerdo cuvier".into())),
            vec!["/data/predictions/Galeocerdo_cuvier.csv".to_string()]
        );
    }

    #[test]
    fn parses_json_and_checks_templates() {
        let c = SourceCatalog::from_json(
            r#"{"datasets": {"eddies": ["https://h/e.csv", "e.csv"]},
                "speciesPrediction": ["https://h/{species}.csv"]}"#,
        )
        .unwrap();
        assert_eq!(
            c.candidates(&DatasetId::Eddies),
            vec!["https://h/e.csv".to_string(), "e.csv".to_string()]
        );
        assert!(c.candidates(&DatasetId::Plankton).is_empty());

        let err = SourceCatalog::from_json(r#"{"speciesPrediction": ["fixed.csv"]}"#);
        assert!(matches!(err, Err(CatalogError::MissingPlaceholder(_))));
    }
}
