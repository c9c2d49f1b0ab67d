#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod detector;
pub mod diagnostics;
pub mod image;
pub mod pose;

// Per-stage building blocks; public for tools and tests.
pub mod angle;
pub mod camera;
pub mod config;
pub mod control;
pub mod crosses;
pub mod depth;
pub mod heatmap;
pub mod projection;
pub mod segments;

// --- High-level re-exports -------------------------------------------------

// Main entry points: detector + results.
pub use crate::detector::{GateDetector, GateParams};
pub use crate::diagnostics::{FrameReport, ProjectionStatus};

// Outputs consumed by the vehicle side.
pub use crate::control::{SteeringMode, VelocityCommand};
pub use crate::heatmap::{FramePeak, GateEstimate, SharedBirdeye};
pub use crate::pose::{Pose, PoseHandle};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use gate_locator::prelude::*;
///
/// # fn main() {
/// let mut det = GateDetector::new(GateParams::default());
/// det.update_pose(Pose::default());
///
/// let segments = [
///     LineSegment::new([280.0, 202.0], [380.0, 202.0]),
///     LineSegment::new([282.0, 205.0], [282.0, 300.0]),
/// ];
/// let report = det.process(&segments);
/// println!("found={} mode={:?}", report.found(), report.command.mode);
/// # }
/// ```
pub mod prelude {
    pub use crate::segments::LineSegment;
    pub use crate::{FrameReport, GateDetector, GateParams, Pose, VelocityCommand};
}
