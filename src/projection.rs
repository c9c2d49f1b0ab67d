//! Pixel peak + range + vehicle pose → world position of the gate.
//!
//! Two stateless steps, both taking the camera and pose explicitly:
//!
//! 1. [`camera_offset`]: the pixel offset from the image centre becomes a
//!    metric offset at the estimated range (`del = depth * px / pd` with
//!    `pd = (W/2) / tan(fov_h/2)`), rotated by roll to undo image tilt, with
//!    a `depth * tan(pitch)` term added to the vertical component.
//! 2. [`offset_to_world`]: the forward range and the lateral offset are
//!    rotated by yaw and added to the vehicle position; the vertical offset is
//!    added to its depth coordinate.
//!
//! Offsets are positive toward the left of the image and upward.

use crate::camera::CameraModel;
use crate::pose::Pose;
use nalgebra::{Rotation2, Vector2};
use serde::Serialize;

/// Gate position in the world frame (metres).
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct WorldPoint {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// Roll/pitch corrected offset of the gate relative to the optical axis.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraOffset {
    /// Sideways offset (metres, left positive).
    pub lateral_m: f32,
    /// Vertical offset (metres, up positive), including the pitch term.
    pub vertical_m: f32,
}

/// Metric offset of `pixel` at range `depth_m`, corrected for roll and pitch.
pub fn camera_offset(
    pixel: [f32; 2],
    depth_m: f32,
    camera: &CameraModel,
    pose: &Pose,
) -> CameraOffset {
    let pd = camera.pixel_distance_per_radian();
    let [cx, cy] = camera.center();
    let raw = Vector2::new(cx - pixel[0], cy - pixel[1]) * (depth_m / pd);
    let rolled = Rotation2::new(pose.roll) * raw;
    CameraOffset {
        lateral_m: rolled.x,
        vertical_m: rolled.y + depth_m * pose.pitch.tan(),
    }
}

/// Moves a camera-relative offset at range `depth_m` into the world frame.
pub fn offset_to_world(offset: &CameraOffset, depth_m: f32, pose: &Pose) -> WorldPoint {
    let planar = Rotation2::new(pose.yaw) * Vector2::new(depth_m, offset.lateral_m);
    WorldPoint {
        x: pose.x + planar.x,
        y: pose.y + planar.y,
        z: pose.z + offset.vertical_m,
    }
}

/// Full projection of a pixel at a known range into world coordinates.
pub fn project_to_world(
    pixel: [f32; 2],
    depth_m: f32,
    camera: &CameraModel,
    pose: &Pose,
) -> WorldPoint {
    let offset = camera_offset(pixel, depth_m, camera, pose);
    offset_to_world(&offset, depth_m, pose)
}

impl WorldPoint {
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn centred_peak_lies_straight_ahead() {
        let cam = CameraModel::default();
        let pose = Pose::new([1.0, 2.0, -1.0], 0.0, 0.0, 0.0);
        let p = project_to_world([320.0, 240.0], 4.0, &cam, &pose);
        assert!(approx_eq(p.x, 5.0) && approx_eq(p.y, 2.0) && approx_eq(p.z, -1.0), "{p:?}");
    }

    #[test]
    fn yaw_rotates_forward_range() {
        let cam = CameraModel::default();
        let pose = Pose::new([0.0, 0.0, 0.0], 0.0, 0.0, FRAC_PI_2);
        let p = project_to_world([320.0, 240.0], 3.0, &cam, &pose);
        assert!(approx_eq(p.x, 0.0) && approx_eq(p.y, 3.0), "{p:?}");
    }

    #[test]
    fn left_and_up_pixels_give_positive_offsets() {
        let cam = CameraModel::default();
        let pose = Pose::default();
        let off = camera_offset([220.0, 140.0], 2.0, &cam, &pose);
        let expected = 2.0 * 100.0 / cam.pixel_distance_per_radian();
        assert!(approx_eq(off.lateral_m, expected));
        assert!(approx_eq(off.vertical_m, expected));
    }

    #[test]
    fn roll_swaps_offset_axes() {
        let cam = CameraModel::default();
        let pose = Pose::new([0.0; 3], FRAC_PI_2, 0.0, 0.0);
        let off = camera_offset([220.0, 240.0], 2.0, &cam, &pose);
        let expected = 2.0 * 100.0 / cam.pixel_distance_per_radian();
        assert!(approx_eq(off.lateral_m, 0.0), "{off:?}");
        assert!(approx_eq(off.vertical_m, expected), "{off:?}");
    }

    #[test]
    fn pitch_adds_vertical_correction() {
        let cam = CameraModel::default();
        let pitch = 0.1f32;
        let pose = Pose::new([0.0; 3], 0.0, pitch, 0.0);
        let off = camera_offset([320.0, 240.0], 5.0, &cam, &pose);
        assert!(approx_eq(off.vertical_m, 5.0 * pitch.tan()));
    }
}
