//! Parameter types configuring the detector stages.
//!
//! Every group deserializes with defaults, so a JSON config only needs the
//! knobs it changes. Defaults describe the forward camera (640×480,
//! 62°×46°) looking at a gate with 1.5 m poles.
//!
//! The depth ratio bands and the birdeye layout were tuned empirically for
//! that camera and gate; they are unlikely to transfer unchanged to other
//! geometries.

use crate::camera::CameraModel;
use crate::control::ControlParams;
use crate::crosses::CrossParams;
use crate::depth::DepthParams;
use crate::heatmap::BirdeyeParams;
use crate::segments::ClassifierParams;
use serde::{Deserialize, Serialize};

/// Detector-wide parameters controlling the per-frame pipeline.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct GateParams {
    /// Fixed pinhole camera (resolution and field of view).
    pub camera: CameraModel,
    /// Horizontal/vertical segment split.
    pub classifier: ClassifierParams,
    /// Corner matching between segment families.
    pub cross: CrossParams,
    /// Pole-length depth model.
    pub depth: DepthParams,
    /// Half side of the vote square placed around each hypothesis centre.
    pub vote_half_width_px: usize,
    /// Persistent world-space accumulation grid.
    pub birdeye: BirdeyeParams,
    /// Steering speeds and thresholds.
    pub control: ControlParams,
}

impl Default for GateParams {
    fn default() -> Self {
        Self {
            camera: CameraModel::default(),
            classifier: ClassifierParams::default(),
            cross: CrossParams::default(),
            depth: DepthParams::default(),
            vote_half_width_px: 10,
            birdeye: BirdeyeParams::default(),
            control: ControlParams::default(),
        }
    }
}

impl GateParams {
    /// Rejects parameter sets the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), String> {
        if !self.camera.is_valid() {
            return Err(format!("invalid camera model: {:?}", self.camera));
        }
        if self.birdeye.rows == 0 || self.birdeye.cols == 0 {
            return Err("birdeye grid must have at least one cell".to_string());
        }
        if !(self.birdeye.pixels_per_meter.is_finite() && self.birdeye.pixels_per_meter > 0.0) {
            return Err(format!(
                "birdeye resolution must be positive, got {}",
                self.birdeye.pixels_per_meter
            ));
        }
        if !(self.depth.pole_length_m.is_finite() && self.depth.pole_length_m > 0.0) {
            return Err(format!(
                "pole length must be positive, got {}",
                self.depth.pole_length_m
            ));
        }
        if self.depth.matched_ratio > self.depth.occluded_ratio {
            return Err(format!(
                "matched ratio {} exceeds occluded ratio {}",
                self.depth.matched_ratio, self.depth.occluded_ratio
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(GateParams::default().validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let json = r#"{"cross": {"max_corner_distance_px": 12.0}, "birdeye": {"rows": 80}}"#;
        let params: GateParams = serde_json::from_str(json).expect("params parse");
        assert_eq!(params.cross.max_corner_distance_px, 12.0);
        assert_eq!(params.birdeye.rows, 80);
        assert_eq!(params.birdeye.cols, 100);
        assert_eq!(params.vote_half_width_px, 10);
        assert_eq!(params.camera.width, 640);
    }

    #[test]
    fn inverted_ratio_bands_are_rejected() {
        let mut params = GateParams::default();
        params.depth.matched_ratio = 0.6;
        assert!(params.validate().is_err());
    }
}
