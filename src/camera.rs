//! Fixed pinhole camera model described by resolution and field of view.
//!
//! The gate camera is never calibrated at runtime; both the depth estimator
//! and the world projector derive focal lengths from the field of view.

use serde::{Deserialize, Serialize};

/// Pinhole camera given by image size (pixels) and field of view (degrees).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraModel {
    pub width: usize,
    pub height: usize,
    pub fov_horizontal_deg: f32,
    pub fov_vertical_deg: f32,
}

impl Default for CameraModel {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            fov_horizontal_deg: 62.0,
            fov_vertical_deg: 46.0,
        }
    }
}

impl CameraModel {
    pub fn fov_horizontal_rad(&self) -> f32 {
        self.fov_horizontal_deg.to_radians()
    }

    pub fn fov_vertical_rad(&self) -> f32 {
        self.fov_vertical_deg.to_radians()
    }

    /// Image centre in pixels, `(W/2, H/2)`.
    pub fn center(&self) -> [f32; 2] {
        [self.width as f32 / 2.0, self.height as f32 / 2.0]
    }

    /// Pixels per radian of viewing angle near the optical axis,
    /// `(W/2) / tan(fov_h/2)`. Also used for the vertical axis.
    pub fn pixel_distance_per_radian(&self) -> f32 {
        (self.width as f32 / 2.0) / (self.fov_horizontal_rad() / 2.0).tan()
    }

    /// Distance at which an object spanning `pixels_per_meter` image pixels
    /// per metre is seen, based on the vertical field of view.
    pub fn depth_for_pixels_per_meter(&self, pixels_per_meter: f32) -> f32 {
        let visible_height_m = self.height as f32 / pixels_per_meter;
        visible_height_m / (2.0 * (self.fov_vertical_rad() / 2.0).tan())
    }

    /// True when dimensions are non-zero and both fields of view lie in `(0, 180)`.
    pub fn is_valid(&self) -> bool {
        let fov_ok = |deg: f32| deg.is_finite() && deg > 0.0 && deg < 180.0;
        self.width > 0
            && self.height > 0
            && fov_ok(self.fov_horizontal_deg)
            && fov_ok(self.fov_vertical_deg)
    }
}
