//! Vehicle pose supplied by the external localization stage.
//!
//! Odometry arrives asynchronously and independently of camera frames. The
//! detector only needs the most recent value, so a [`PoseHandle`] is a shared
//! slot: the odometry side overwrites it, the frame side takes a snapshot.
//! No freshness check is performed.

use nalgebra::{Quaternion, UnitQuaternion, Vector3};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// 6-DOF vehicle pose: position in metres, roll/pitch/yaw in radians
/// (right-handed, yaw about world up).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub roll: f32,
    pub pitch: f32,
    pub yaw: f32,
}

impl Pose {
    pub fn new(position: [f32; 3], roll: f32, pitch: f32, yaw: f32) -> Self {
        Self {
            x: position[0],
            y: position[1],
            z: position[2],
            roll,
            pitch,
            yaw,
        }
    }

    /// Builds a pose from a position and an `(x, y, z, w)` orientation
    /// quaternion, the layout used by odometry messages.
    pub fn from_quaternion(position: [f32; 3], orientation_xyzw: [f32; 4]) -> Self {
        let [qx, qy, qz, qw] = orientation_xyzw;
        let q = UnitQuaternion::from_quaternion(Quaternion::new(qw, qx, qy, qz));
        let (roll, pitch, yaw) = q.euler_angles();
        Self::new(position, roll, pitch, yaw)
    }

    pub fn position(&self) -> Vector3<f32> {
        Vector3::new(self.x, self.y, self.z)
    }

    pub fn is_finite(&self) -> bool {
        [self.x, self.y, self.z, self.roll, self.pitch, self.yaw]
            .iter()
            .all(|v| v.is_finite())
    }
}

/// Pose update as it appears in frame logs: either Euler angles or a quaternion.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PoseUpdate {
    Euler(Pose),
    Quaternion {
        position: [f32; 3],
        orientation: [f32; 4],
    },
}

impl PoseUpdate {
    pub fn to_pose(&self) -> Pose {
        match *self {
            PoseUpdate::Euler(p) => p,
            PoseUpdate::Quaternion {
                position,
                orientation,
            } => Pose::from_quaternion(position, orientation),
        }
    }
}

/// Shared slot holding the latest pose; `None` until the first update.
#[derive(Clone, Debug, Default)]
pub struct PoseHandle {
    inner: Arc<RwLock<Option<Pose>>>,
}

impl PoseHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the stored pose. Non-finite poses are ignored.
    pub fn update(&self, pose: Pose) -> bool {
        if !pose.is_finite() {
            log::warn!("PoseHandle::update ignoring non-finite pose {pose:?}");
            return false;
        }
        *self.inner.write() = Some(pose);
        true
    }

    /// Latest pose, if one has been received.
    pub fn snapshot(&self) -> Option<Pose> {
        *self.inner.read()
    }
}
