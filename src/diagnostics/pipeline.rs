use crate::control::VelocityCommand;
use crate::crosses::{Cross, CrossStats};
use crate::diagnostics::TimingBreakdown;
use crate::heatmap::{BirdeyeError, FramePeak, GateEstimate};
use crate::projection::WorldPoint;
use crate::segments::SegmentFamilies;
use serde::Serialize;

/// Result produced by [`GateDetector::process`](crate::GateDetector::process)
/// for one frame.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameReport {
    pub frame_index: u64,
    pub input_segments: usize,
    pub families: SegmentFamilies,
    pub cross_stats: CrossStats,
    pub crosses: Vec<Cross>,
    pub peak: Option<FramePeak>,
    pub command: VelocityCommand,
    pub projection: ProjectionStatus,
    /// Running best estimate from the birdeye map after this frame.
    pub gate_estimate: Option<GateEstimate>,
    pub timings: TimingBreakdown,
}

impl FrameReport {
    pub fn found(&self) -> bool {
        self.peak.is_some()
    }

    /// World point recorded for this frame, if any.
    pub fn world_point(&self) -> Option<WorldPoint> {
        match self.projection {
            ProjectionStatus::Projected { point, .. } => Some(point),
            _ => None,
        }
    }
}

/// What happened to the world projection of this frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", tag = "status")]
pub enum ProjectionStatus {
    /// Projected and recorded in the birdeye map.
    Projected {
        point: WorldPoint,
        row: usize,
        col: usize,
    },
    /// No gate in this frame; nothing to project.
    NoDetection,
    /// No pose has been received yet.
    PoseUnavailable,
    /// Projected, but discarded by the birdeye map.
    Discarded { point: WorldPoint, reason: DiscardReason },
}

/// Why a projection did not make it into the birdeye map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DiscardReason {
    OutOfBounds,
    NonFinite,
}

impl From<&BirdeyeError> for DiscardReason {
    fn from(err: &BirdeyeError) -> Self {
        match err {
            BirdeyeError::OutOfBounds { .. } => DiscardReason::OutOfBounds,
            BirdeyeError::NonFinite { .. } => DiscardReason::NonFinite,
        }
    }
}
