use foundation::GeoBounds;
use serde::{Deserialize, Serialize};

/// Padding applied on every side when framing bounds.
pub const FRAME_PADDING_PX: u32 = 48;
/// Eased transition length for framing.
pub const FRAME_DURATION_MS: u32 = 1200;

/// Instruction for the rendering collaborator's camera.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum CameraDirective {
    #[serde(rename_all = "camelCase")]
    FrameBounds {
        bounds: GeoBounds,
        padding_px: u32,
        duration_ms: u32,
    },
}

impl CameraDirective {
    /// Eased, padded framing of `bounds`.
    pub fn frame(bounds: GeoBounds) -> Self {
        CameraDirective::FrameBounds {
            bounds,
            padding_px: FRAME_PADDING_PX,
            duration_ms: FRAME_DURATION_MS,
        }
    }
}
