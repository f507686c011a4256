use formats::DatasetId;
use serde::Serialize;

/// Per-layer display configuration.
///
/// `opacity` is clamped when written, so readers never need to clamp.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerConfig {
    pub id: String,
    pub display_name: String,
    pub base_color: String,
    pub enabled: bool,
    opacity: f64,
    pub dataset: DatasetId,
}

impl LayerConfig {
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        base_color: impl Into<String>,
        dataset: DatasetId,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            base_color: base_color.into(),
            enabled: true,
            opacity: 1.0,
            dataset,
        }
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.set_opacity(opacity);
        self
    }

    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    /// Clamps to [0, 1]. Non-finite input is ignored; returns whether it was stored.
    pub fn set_opacity(&mut self, opacity: f64) -> bool {
        if !opacity.is_finite() {
            return false;
        }
        self.opacity = opacity.clamp(0.0, 1.0);
        true
    }
}

pub const PLANKTON: &str = "plankton";
pub const SST: &str = "sst";
pub const EDDIES: &str = "eddies";
pub const SHARKS: &str = "sharks";
pub const PREDICTIONS: &str = "predictions";

/// The explorer's layer catalogue, in draw order.
pub fn default_layers() -> Vec<LayerConfig> {
    vec![
        LayerConfig::new(PLANKTON, "Phytoplankton (chlorophyll-a)", "#2ca25f", DatasetId::Plankton)
            .with_opacity(0.8),
        LayerConfig::new(
            SST,
            "Sea surface temperature",
            "#f46d43",
            DatasetId::SeaSurfaceTemperature,
        )
        .with_enabled(false)
        .with_opacity(0.7),
        LayerConfig::new(EDDIES, "Eddies (SWOT)", "#6a51a3", DatasetId::Eddies)
            .with_enabled(false),
        LayerConfig::new(SHARKS, "Shark occurrences", "#1f78b4", DatasetId::Occurrences),
        LayerConfig::new(PREDICTIONS, "Foraging probability", "#e31a1c", DatasetId::Predictions)
            .with_opacity(0.85),
    ]
}

#[cfg(test)]
mod tests {
    use super::{LayerConfig, default_layers};
    use formats::DatasetId;

    #[test]
    fn opacity_is_clamped_on_write() {
        let mut l = LayerConfig::new("x", "X", "#fff", DatasetId::Plankton);
        assert!(l.set_opacity(1.7));
        assert_eq!(l.opacity(), 1.0);
        assert!(l.set_opacity(-0.2));
        assert_eq!(l.opacity(), 0.0);
        assert!(!l.set_opacity(f64::NAN));
        assert_eq!(l.opacity(), 0.0);
    }

    #[test]
    fn default_catalogue_has_unique_ids() {
        let layers = default_layers();
        let mut ids: Vec<_> = layers.iter().map(|l| l.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), layers.len());
        assert!(layers.iter().all(|l| (0.0..=1.0).contains(&l.opacity())));
    }
}
