//! Vote accumulation in image space (per frame) and world space (persistent).
//!
//! - [`FrameHeatmap`] collects one square of votes around the centre of every
//!   corner hypothesis of the current frame. Its peak is the frame's best
//!   estimate of the gate opening in pixels.
//! - [`BirdeyeMap`] collects one vote per frame at the projected world
//!   position of that peak and is never cleared. Noise spreads over many cells
//!   while the true gate keeps hitting the same one, so its argmax settles
//!   over time.
//!
//! Both grids break ties by taking the first maximum in row-major order, and
//! both report "nothing yet" as `None` rather than a default index.

mod birdeye;
mod frame;

pub use birdeye::{BirdeyeError, BirdeyeMap, BirdeyeParams, SharedBirdeye};
pub use frame::FrameHeatmap;

use serde::Serialize;

/// Height (metres) at which the gate marker is drawn for visualization.
pub const GATE_MARKER_HEIGHT_M: f32 = 0.75;

/// Strongest cell of a frame heatmap.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FramePeak {
    /// Column in pixels.
    pub x: usize,
    /// Row in pixels.
    pub y: usize,
    pub votes: u32,
    /// Depth of a hypothesis voting for this cell.
    pub depth_m: f32,
}

impl FramePeak {
    pub fn pixel(&self) -> [f32; 2] {
        [self.x as f32, self.y as f32]
    }
}

/// Running best world estimate read from the birdeye map.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GateEstimate {
    pub x: f32,
    pub y: f32,
    pub row: usize,
    pub col: usize,
    pub votes: u32,
}

impl GateEstimate {
    /// Marker position `(x, y, z)` for external visualization.
    pub fn marker_position(&self) -> [f32; 3] {
        [self.x, self.y, GATE_MARKER_HEIGHT_M]
    }
}
