use serde::{Deserialize, Serialize};

/// Options for splitting raw segments into horizontal and vertical families.
///
/// - `angle_threshold_deg`: a segment whose inclination is below the threshold
///   is horizontal; one within the threshold of 90° is vertical. Anything in
///   between is ambiguous and dropped.
/// - `min_length_px`: segments shorter than this are treated as noise.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierParams {
    pub angle_threshold_deg: f32,
    pub min_length_px: f32,
}

impl Default for ClassifierParams {
    fn default() -> Self {
        Self {
            angle_threshold_deg: 30.0,
            min_length_px: 0.0,
        }
    }
}
