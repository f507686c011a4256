use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightCell {
    pub cell_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightOverlay {
    pub layer_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub species: Option<String>,
    pub cells: Vec<HighlightCell>,
}

/// Highlight overlays keyed by layer id; last write wins per layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HighlightSet {
    overlays: BTreeMap<String, HighlightOverlay>,
}

impl HighlightSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.overlays.is_empty()
    }

    pub fn len(&self) -> usize {
        self.overlays.len()
    }

    pub fn get(&self, layer_id: &str) -> Option<&HighlightOverlay> {
        self.overlays.get(layer_id)
    }

    /// Overlays in layer-id order.
    pub fn iter(&self) -> impl Iterator<Item = &HighlightOverlay> {
        self.overlays.values()
    }

    /// Replaces any overlay for the same layer.
    pub fn set(&mut self, overlay: HighlightOverlay) {
        self.overlays.insert(overlay.layer_id.clone(), overlay);
    }

    pub fn clear(&mut self) {
        self.overlays.clear();
    }

    pub fn clear_layer(&mut self, layer_id: &str) -> bool {
        self.overlays.remove(layer_id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::{HighlightCell, HighlightOverlay, HighlightSet};

    fn overlay(layer: &str, cell: &str) -> HighlightOverlay {
        HighlightOverlay {
            layer_id: layer.into(),
            species: None,
            cells: vec![HighlightCell {
                cell_id: cell.into(),
                weight: None,
            }],
        }
    }

    #[test]
    fn last_write_wins_per_layer() {
        let mut h = HighlightSet::new();
        h.set(overlay("predictions", "a"));
        h.set(overlay("sharks", "b"));
        h.set(overlay("predictions", "c"));
        assert_eq!(h.len(), 2);
        assert_eq!(h.get("predictions").unwrap().cells[0].cell_id, "c");

        assert!(h.clear_layer("sharks"));
        assert!(!h.clear_layer("sharks"));
        h.clear();
        assert!(h.is_empty());
    }
}
