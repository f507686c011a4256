//! In-view filtering against the active focus area.
//!
//! Only the prediction family is scoped to the focus area. Raw occurrence
//! records are always shown in full, regardless of focus.

use formats::{DatasetId, PointRecord};

use crate::focus::FocusArea;

/// Passes when the record's coordinates are finite and inside the focus
/// bounds (inclusive). Without a focus area everything passes.
pub fn in_focus(record: &PointRecord, focus: Option<&FocusArea>) -> bool {
    let Some(focus) = focus else {
        return true;
    };
    match (record.longitude, record.latitude) {
        (Some(lon), Some(lat)) => focus.bounds.contains(lon, lat),
        _ => false,
    }
}

/// Which datasets the focus filter applies to.
pub struct FocusScope;

impl FocusScope {
    pub fn applies_to(dataset: &DatasetId) -> bool {
        dataset.is_prediction_family()
    }
}

/// Records of `dataset` that are in view.
pub fn visible_records<'a>(
    dataset: &DatasetId,
    records: &'a [PointRecord],
    focus: Option<&FocusArea>,
) -> Vec<&'a PointRecord> {
    if !FocusScope::applies_to(dataset) {
        return records.iter().collect();
    }
    records.iter().filter(|r| in_focus(r, focus)).collect()
}
