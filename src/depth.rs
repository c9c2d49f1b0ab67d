//! Range estimation from the apparent length of a gate pole.
//!
//! A detected corner is formed by a horizontal and a vertical edge. When both
//! edges belong to the same physical pole of known length, their pixel length
//! gives the apparent scale (pixels per metre) and the pinhole model turns it
//! into a distance:
//!
//! ```text
//! ppm   = l / pole_length
//! H     = image_height / ppm
//! depth = H / (2 tan(fov_v / 2))
//! ```
//!
//! The two edge lengths rarely agree exactly. Within `matched_ratio` of each
//! other they are averaged; within `occluded_ratio` the longer edge is trusted
//! (one side is partially hidden); beyond that the pair is rejected.

use crate::camera::CameraModel;
use serde::{Deserialize, Serialize};

/// Tunable constants of the pole-length depth model.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct DepthParams {
    /// Physical length of a gate pole in metres.
    pub pole_length_m: f32,
    /// Relative length difference below which both edges are averaged.
    pub matched_ratio: f32,
    /// Relative length difference below which the longer edge is used.
    pub occluded_ratio: f32,
}

impl Default for DepthParams {
    fn default() -> Self {
        Self {
            pole_length_m: 1.5,
            matched_ratio: 0.3,
            occluded_ratio: 0.5,
        }
    }
}

/// How the reference length was derived from the two edges.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PoleMatch {
    /// Both edges agree; their mean is used.
    Averaged,
    /// One edge looks occluded; the longer one is used.
    LongerEdge,
}

/// Successful depth estimate.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepthEstimate {
    pub depth_m: f32,
    pub reference_length_px: f32,
    pub pole_match: PoleMatch,
}

/// Reasons why a pair of edges does not describe a pole.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DepthRejection {
    /// A length was zero, negative or not finite.
    InvalidLength { l1: f32, l2: f32 },
    /// The relative length difference falls outside both acceptance bands.
    LengthMismatch { ratio: f32, limit: f32 },
}

impl std::fmt::Display for DepthRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DepthRejection::InvalidLength { l1, l2 } => {
                write!(f, "invalid edge lengths (l1={l1:.2}, l2={l2:.2})")
            }
            DepthRejection::LengthMismatch { ratio, limit } => write!(
                f,
                "edge lengths too different for a pole (ratio {ratio:.3} >= {limit:.3})"
            ),
        }
    }
}

impl std::error::Error for DepthRejection {}

/// Converts matched pole edges into metric range.
#[derive(Clone, Copy, Debug, Default)]
pub struct DepthEstimator {
    pub params: DepthParams,
    pub camera: CameraModel,
}

impl DepthEstimator {
    pub fn new(params: DepthParams, camera: CameraModel) -> Self {
        Self { params, camera }
    }

    /// Picks the reference pixel length for edges of length `l1` and `l2`.
    pub fn reference_length(&self, l1: f32, l2: f32) -> Result<(f32, PoleMatch), DepthRejection> {
        if !(l1.is_finite() && l2.is_finite()) || l1 <= 0.0 || l2 <= 0.0 {
            return Err(DepthRejection::InvalidLength { l1, l2 });
        }
        let ratio = (l2 - l1).abs() / l2;
        if ratio < self.params.matched_ratio {
            Ok(((l1 + l2) / 2.0, PoleMatch::Averaged))
        } else if ratio < self.params.occluded_ratio {
            Ok((l1.max(l2), PoleMatch::LongerEdge))
        } else {
            Err(DepthRejection::LengthMismatch {
                ratio,
                limit: self.params.occluded_ratio,
            })
        }
    }

    /// Estimates the distance to a pole whose edges measure `l1` and `l2` pixels.
    pub fn estimate(&self, l1: f32, l2: f32) -> Result<DepthEstimate, DepthRejection> {
        let (length, pole_match) = self.reference_length(l1, l2)?;
        let ppm = length / self.params.pole_length_m;
        let depth_m = self.camera.depth_for_pixels_per_meter(ppm);
        if !depth_m.is_finite() || depth_m <= 0.0 {
            return Err(DepthRejection::InvalidLength { l1, l2 });
        }
        Ok(DepthEstimate {
            depth_m,
            reference_length_px: length,
            pole_match,
        })
    }
}
