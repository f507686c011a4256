use serde::{Deserialize, Serialize};

/// Camera pose reported by the rendering collaborator.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewPose {
    pub longitude: f64,
    pub latitude: f64,
    pub zoom: f64,
    pub bearing: f64,
    pub pitch: f64,
}

impl Default for ViewPose {
    /// South Atlantic overview.
    fn default() -> Self {
        Self {
            longitude: -35.0,
            latitude: -15.0,
            zoom: 3.0,
            bearing: 0.0,
            pitch: 0.0,
        }
    }
}

impl ViewPose {
    pub fn is_finite(&self) -> bool {
        self.longitude.is_finite()
            && self.latitude.is_finite()
            && self.zoom.is_finite()
            && self.bearing.is_finite()
            && self.pitch.is_finite()
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserLocation {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy_meters: Option<f64>,
}
