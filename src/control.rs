//! Steering toward the frame peak.
//!
//! A priority-ordered decision table over the current frame's peak; the first
//! matching rule wins:
//!
//! | rule | condition                               | command             |
//! |------|-----------------------------------------|---------------------|
//! | 1    | no peak                                 | stop                |
//! | 2    | peak at pixel `(0, 0)`                  | yaw search          |
//! | 3    | `|y - H/2| / H > vertical_threshold`    | dive / climb        |
//! | 4    | `|x - W/2| / W < advance_threshold`     | advance             |
//! | 5    | otherwise                               | strafe              |
//!
//! The only state is the yaw-search counter: the search direction flips every
//! `yaw_toggle_frames` search frames so the vehicle sweeps back and forth
//! instead of spinning in one direction.

use crate::angle::offset_sign;
use crate::camera::CameraModel;
use crate::heatmap::FramePeak;
use serde::{Deserialize, Serialize};

/// Speeds and thresholds of the steering rules.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlParams {
    pub forward_speed: f32,
    pub side_speed: f32,
    pub dive_speed: f32,
    pub yaw_speed: f32,
    /// Fraction of the image height beyond which depth is corrected first.
    pub vertical_threshold: f32,
    /// Fraction of the image width within which the vehicle advances.
    pub advance_threshold: f32,
    /// Search frames between yaw direction flips.
    pub yaw_toggle_frames: u64,
}

impl Default for ControlParams {
    fn default() -> Self {
        Self {
            forward_speed: 1.5,
            side_speed: 1.5,
            dive_speed: 0.8,
            yaw_speed: 1.0,
            vertical_threshold: 0.2,
            advance_threshold: 0.1,
            yaw_toggle_frames: 10,
        }
    }
}

/// Which rule produced a command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SteeringMode {
    Stop,
    YawSearch,
    Vertical,
    Advance,
    Strafe,
}

/// Linear velocity (forward, lateral, vertical) plus yaw rate.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VelocityCommand {
    pub forward: f32,
    pub lateral: f32,
    pub vertical: f32,
    pub yaw_rate: f32,
    pub mode: SteeringMode,
}

impl VelocityCommand {
    pub fn stop() -> Self {
        Self {
            forward: 0.0,
            lateral: 0.0,
            vertical: 0.0,
            yaw_rate: 0.0,
            mode: SteeringMode::Stop,
        }
    }

    fn with_mode(mode: SteeringMode) -> Self {
        Self {
            mode,
            ..Self::stop()
        }
    }
}

/// Steering policy with its persistent yaw-search counter.
#[derive(Clone, Debug, Default)]
pub struct ControlPolicy {
    params: ControlParams,
    yaw_count: u64,
}

impl ControlPolicy {
    pub fn new(params: ControlParams) -> Self {
        Self {
            params,
            yaw_count: 0,
        }
    }

    pub fn params(&self) -> &ControlParams {
        &self.params
    }

    /// Number of yaw-search commands issued so far.
    pub fn yaw_count(&self) -> u64 {
        self.yaw_count
    }

    /// Decides the command for the current frame.
    pub fn decide(&mut self, peak: Option<&FramePeak>, camera: &CameraModel) -> VelocityCommand {
        let Some(peak) = peak else {
            return VelocityCommand::stop();
        };
        let p = &self.params;
        if peak.x == 0 && peak.y == 0 {
            let toggle = p.yaw_toggle_frames.max(1);
            let sign = if (self.yaw_count / toggle) % 2 == 0 {
                1.0
            } else {
                -1.0
            };
            self.yaw_count += 1;
            return VelocityCommand {
                yaw_rate: sign * p.yaw_speed,
                ..VelocityCommand::with_mode(SteeringMode::YawSearch)
            };
        }

        let width = camera.width as f32;
        let height = camera.height as f32;
        let [cx, cy] = camera.center();
        let dx = peak.x as f32 - cx;
        let dy = peak.y as f32 - cy;

        if dy.abs() / height > p.vertical_threshold {
            VelocityCommand {
                vertical: -offset_sign(dy) * p.dive_speed,
                ..VelocityCommand::with_mode(SteeringMode::Vertical)
            }
        } else if dx.abs() / width < p.advance_threshold {
            VelocityCommand {
                forward: p.forward_speed,
                ..VelocityCommand::with_mode(SteeringMode::Advance)
            }
        } else {
            VelocityCommand {
                lateral: -offset_sign(dx) * p.side_speed,
                ..VelocityCommand::with_mode(SteeringMode::Strafe)
            }
        }
    }
}
