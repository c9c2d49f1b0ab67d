//! Per-frame diagnostics returned by the detector and rendered by the tools.
//!
//! [`FrameReport`] is the main entry point: the command, the intermediate
//! results of every stage, and the projection outcome. The `render` module
//! turns a report and the two heatmaps into images for inspection; it is
//! never consulted by the decision path.

pub mod pipeline;
pub mod render;
pub mod timing;

pub use pipeline::{DiscardReason, FrameReport, ProjectionStatus};
pub use timing::{StageTiming, TimingBreakdown};
