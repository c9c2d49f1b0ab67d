use serde::{Deserialize, Serialize};

use crate::angle::inclination_deg;

/// Raw line segment delivered by the external line detector.
///
/// Serialized as `[x1, y1, x2, y2]`, the layout produced by probabilistic
/// Hough transforms.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 4]", into = "[f32; 4]")]
pub struct LineSegment {
    pub p0: [f32; 2],
    pub p1: [f32; 2],
}

impl LineSegment {
    pub fn new(p0: [f32; 2], p1: [f32; 2]) -> Self {
        Self { p0, p1 }
    }

    /// Builds a segment from integer pixel endpoints.
    pub fn from_pixels(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self::new([x1 as f32, y1 as f32], [x2 as f32, y2 as f32])
    }

    /// Same segment with its endpoints swapped.
    pub fn reversed(&self) -> Self {
        Self::new(self.p1, self.p0)
    }

    pub fn midpoint(&self) -> [f32; 2] {
        [
            (self.p0[0] + self.p1[0]) * 0.5,
            (self.p0[1] + self.p1[1]) * 0.5,
        ]
    }

    pub fn length(&self) -> f32 {
        let dx = self.p1[0] - self.p0[0];
        let dy = self.p1[1] - self.p0[1];
        (dx * dx + dy * dy).sqrt()
    }

    /// Unsigned inclination relative to the image horizontal, in `[0, 90]` degrees.
    pub fn inclination_deg(&self) -> f32 {
        inclination_deg(self.p1[0] - self.p0[0], self.p1[1] - self.p0[1])
    }

    /// True when both endpoints are finite and distinct.
    pub fn is_well_formed(&self) -> bool {
        let finite = self.p0.iter().chain(self.p1.iter()).all(|v| v.is_finite());
        finite && self.length() > 0.0
    }

    /// Endpoints as a fixed pair, in storage order.
    pub fn endpoints(&self) -> [[f32; 2]; 2] {
        [self.p0, self.p1]
    }
}

impl From<[f32; 4]> for LineSegment {
    fn from(v: [f32; 4]) -> Self {
        Self::new([v[0], v[1]], [v[2], v[3]])
    }
}

impl From<LineSegment> for [f32; 4] {
    fn from(s: LineSegment) -> Self {
        [s.p0[0], s.p0[1], s.p1[0], s.p1[1]]
    }
}

/// Euclidean distance between two pixel positions.
#[inline]
pub fn point_distance(a: [f32; 2], b: [f32; 2]) -> f32 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    (dx * dx + dy * dy).sqrt()
}

/// Midpoint of two pixel positions.
#[inline]
pub fn point_midpoint(a: [f32; 2], b: [f32; 2]) -> [f32; 2] {
    [(a[0] + b[0]) * 0.5, (a[1] + b[1]) * 0.5]
}
