//! Gate detector orchestrating the per-frame pipeline.
//!
//! Overview
//! - Splits the frame's raw line segments into horizontal and vertical
//!   families by inclination.
//! - Pairs the families into corner hypotheses whose endpoints nearly touch,
//!   each carrying the opening centre and a pole-length depth.
//! - Votes the hypothesis centres into a per-frame heatmap; its peak is the
//!   gate in pixels, or `None` when nothing was found.
//! - Steers toward the peak with a priority decision table.
//! - Projects the peak into the world using the latest pose and votes it
//!   into the persistent birdeye map, whose argmax is the running estimate.
//!
//! Modules
//! - [`params`] – configuration types used by the detector and the tools.
//! - `pipeline` – the [`GateDetector`] implementation.

pub mod params;
mod pipeline;

pub use params::GateParams;
pub use pipeline::GateDetector;
