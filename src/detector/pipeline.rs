//! Detector pipeline orchestrating the per-frame gate search.
//!
//! Typical usage:
//! ```no_run
//! use gate_locator::{GateDetector, GateParams};
//! use gate_locator::pose::Pose;
//! use gate_locator::segments::LineSegment;
//!
//! # fn example(segments: Vec<LineSegment>) {
//! let mut detector = GateDetector::new(GateParams::default());
//! let odometry = detector.pose_handle();
//! odometry.update(Pose::new([0.0, 0.0, -1.0], 0.0, 0.0, 0.0));
//! let report = detector.process(&segments);
//! println!("command: {:?}", report.command);
//! # }
//! ```

// Stages
// - Classify: split raw segments into horizontal/vertical families.
// - Crosses: match family pairs into corner hypotheses with pole depth.
// - Heatmap: vote around hypothesis centres, take the peak.
// - Control: map the peak to a velocity command.
// - Projection: peak + depth + latest pose -> world point -> birdeye vote.

use super::params::GateParams;
use crate::control::ControlPolicy;
use crate::crosses::find_crosses;
use crate::depth::DepthEstimator;
use crate::diagnostics::{DiscardReason, FrameReport, ProjectionStatus, TimingBreakdown};
use crate::heatmap::{BirdeyeMap, FrameHeatmap, FramePeak, GateEstimate, SharedBirdeye};
use crate::pose::{Pose, PoseHandle};
use crate::projection::project_to_world;
use crate::segments::{classify_segments, LineSegment};
use log::debug;
use std::time::Instant;

/// Gate detector owning its per-frame state (heatmap, steering policy) and
/// handles to the pose slot and the birdeye map, which may be shared with
/// other detectors or threads.
pub struct GateDetector {
    params: GateParams,
    depth: DepthEstimator,
    heatmap: FrameHeatmap,
    birdeye: SharedBirdeye,
    policy: ControlPolicy,
    pose: PoseHandle,
    frame_index: u64,
}

impl GateDetector {
    /// Create a detector with the supplied parameters and an empty pose slot.
    pub fn new(params: GateParams) -> Self {
        Self::with_pose_handle(params, PoseHandle::new())
    }

    /// Create a detector reading poses from an existing shared slot.
    pub fn with_pose_handle(params: GateParams, pose: PoseHandle) -> Self {
        let birdeye = SharedBirdeye::new(params.birdeye);
        Self::with_shared_state(params, pose, birdeye)
    }

    /// Create a detector that reads poses from `pose` and votes into
    /// `birdeye`. The map keeps its own layout; `params.birdeye` is ignored.
    pub fn with_shared_state(
        params: GateParams,
        pose: PoseHandle,
        birdeye: SharedBirdeye,
    ) -> Self {
        let cam = params.camera;
        Self {
            depth: DepthEstimator::new(params.depth, cam),
            heatmap: FrameHeatmap::new(cam.width, cam.height, params.vote_half_width_px),
            birdeye,
            policy: ControlPolicy::new(params.control),
            pose,
            frame_index: 0,
            params,
        }
    }

    pub fn params(&self) -> &GateParams {
        &self.params
    }

    /// Handle for the odometry side; clones share the same slot.
    pub fn pose_handle(&self) -> PoseHandle {
        self.pose.clone()
    }

    /// Convenience for single-threaded callers.
    pub fn update_pose(&self, pose: Pose) -> bool {
        self.pose.update(pose)
    }

    /// Heatmap of the most recently processed frame.
    pub fn frame_heatmap(&self) -> &FrameHeatmap {
        &self.heatmap
    }

    /// Copy of the birdeye map as it stands now.
    pub fn birdeye(&self) -> BirdeyeMap {
        self.birdeye.snapshot()
    }

    /// Handle to the birdeye map; clones vote into the same grid.
    pub fn birdeye_handle(&self) -> SharedBirdeye {
        self.birdeye.clone()
    }

    /// Running best world estimate of the gate.
    pub fn gate_estimate(&self) -> Option<GateEstimate> {
        self.birdeye.peak()
    }

    /// Number of frames processed so far.
    pub fn frames_processed(&self) -> u64 {
        self.frame_index
    }

    /// Run the full pipeline on the raw segments of one frame.
    ///
    /// Never fails: malformed input degrades to "no detection" and a missing
    /// pose only skips the world projection.
    pub fn process(&mut self, segments: &[LineSegment]) -> FrameReport {
        let total_start = Instant::now();
        let frame_index = self.frame_index;
        self.frame_index += 1;
        let mut timings = TimingBreakdown::default();

        let t = Instant::now();
        let families = classify_segments(segments, &self.params.classifier);
        timings.push("classify", elapsed_ms(t));

        let t = Instant::now();
        let search = find_crosses(&families, &self.params.cross, &self.depth);
        timings.push("crosses", elapsed_ms(t));
        debug!(
            "GateDetector::process frame {} segments={} h={} v={} crosses={} \
             (far={} inverted={} not_pole={})",
            frame_index,
            segments.len(),
            families.horizontal.len(),
            families.vertical.len(),
            search.crosses.len(),
            search.stats.too_far,
            search.stats.inverted,
            search.stats.not_a_pole
        );

        let t = Instant::now();
        self.heatmap.reset();
        self.heatmap.accumulate(&search.crosses);
        let peak = self.heatmap.peak(&search.crosses);
        timings.push("heatmap", elapsed_ms(t));

        let command = self.policy.decide(peak.as_ref(), &self.params.camera);

        let t = Instant::now();
        let projection = self.project(frame_index, peak.as_ref());
        timings.push("projection", elapsed_ms(t));

        timings.total_ms = elapsed_ms(total_start);
        FrameReport {
            frame_index,
            input_segments: segments.len(),
            families,
            cross_stats: search.stats,
            crosses: search.crosses,
            peak,
            command,
            projection,
            gate_estimate: self.birdeye.peak(),
            timings,
        }
    }

    fn project(&mut self, frame_index: u64, peak: Option<&FramePeak>) -> ProjectionStatus {
        let Some(peak) = peak else {
            return ProjectionStatus::NoDetection;
        };
        let Some(pose) = self.pose.snapshot() else {
            debug!("GateDetector::process frame {frame_index}: no pose yet, skipping projection");
            return ProjectionStatus::PoseUnavailable;
        };
        let point = project_to_world(peak.pixel(), peak.depth_m, &self.params.camera, &pose);
        match self.birdeye.accumulate(&point) {
            Ok((row, col)) => ProjectionStatus::Projected { point, row, col },
            Err(err) => ProjectionStatus::Discarded {
                point,
                reason: DiscardReason::from(&err),
            },
        }
    }
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}
