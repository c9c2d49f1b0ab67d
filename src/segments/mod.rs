//! Raw line segments and their orientation families.
//!
//! Segments come from an external line detector (typically a probabilistic
//! Hough transform over a thresholded frame). This module only deals with
//! what happens afterwards:
//!
//! - `LineSegment`: two pixel endpoints with cheap geometric helpers.
//! - `classify_segments`: buckets segments by inclination into horizontal
//!   (`theta < threshold`) and vertical (`|theta - 90| < threshold`) families.
//!   Diagonal segments are dropped silently since they cannot describe the
//!   frame of a gate.
//!
//! Inclination is computed from the absolute run and rise, so the endpoint
//! order of a segment never affects its family.

mod classify;
mod options;
mod segment;

pub use classify::{classify_segment, classify_segments, SegmentClass, SegmentFamilies};
pub use options::ClassifierParams;
pub use segment::{point_distance, point_midpoint, LineSegment};
