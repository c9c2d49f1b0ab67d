//! Corner ("cross") hypotheses formed by horizontal/vertical segment pairs.
//!
//! A gate corner shows up as a horizontal and a vertical segment whose
//! endpoints nearly touch. For each pair the four endpoint pairings are
//! compared and the closest one decides the match:
//!
//! - `cross`: midpoint of the two nearest endpoints (the matched corner).
//! - `center`: midpoint of the two remaining endpoints, i.e. the corner of
//!   the gate opening diagonal to the matched one. This is where votes go.
//!
//! Image rows grow downward and the crossbar sits on top of the poles, so a
//! valid hypothesis always has its center below the cross. Each pair also
//! needs a plausible pole depth. Overlapping hypotheses from different pairs
//! are kept as-is; the frame heatmap absorbs the redundancy.

use crate::depth::{DepthEstimator, DepthRejection};
use crate::segments::{point_distance, point_midpoint, LineSegment, SegmentFamilies};
use serde::{Deserialize, Serialize};

/// Matching parameters for corner hypotheses.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct CrossParams {
    /// Maximum pixel distance between the nearest endpoints of a pair.
    pub max_corner_distance_px: f32,
}

impl Default for CrossParams {
    fn default() -> Self {
        Self {
            max_corner_distance_px: 20.0,
        }
    }
}

/// Accepted corner hypothesis.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cross {
    pub cross: [f32; 2],
    pub center: [f32; 2],
    pub depth_m: f32,
}

/// Outcome of testing one horizontal/vertical pair.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PairOutcome {
    Accepted(Cross),
    /// Nearest endpoints are not close enough to form a corner.
    TooFar { distance_px: f32 },
    /// The inferred opening lies above the corner.
    Inverted,
    /// The edge lengths do not describe a pole.
    NotAPole(DepthRejection),
}

/// Counters describing one cross search, for diagnostics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossStats {
    pub pairs_tested: usize,
    pub accepted: usize,
    pub too_far: usize,
    pub inverted: usize,
    pub not_a_pole: usize,
}

impl CrossStats {
    fn record(&mut self, outcome: &PairOutcome) {
        self.pairs_tested += 1;
        match outcome {
            PairOutcome::Accepted(_) => self.accepted += 1,
            PairOutcome::TooFar { .. } => self.too_far += 1,
            PairOutcome::Inverted => self.inverted += 1,
            PairOutcome::NotAPole(_) => self.not_a_pole += 1,
        }
    }
}

/// Result of matching all pairs of a frame.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossSearch {
    pub crosses: Vec<Cross>,
    pub stats: CrossStats,
}

// Pairings in test order: (h.p0, v.p0), (h.p1, v.p1), (h.p1, v.p0), (h.p0, v.p1).
// Each entry is (h near, v near); the far endpoints are the other two.
const PAIRINGS: [(usize, usize); 4] = [(0, 0), (1, 1), (1, 0), (0, 1)];

/// Tests a single horizontal/vertical pair.
pub fn match_pair(
    h: &LineSegment,
    v: &LineSegment,
    params: &CrossParams,
    depth: &DepthEstimator,
) -> PairOutcome {
    let he = h.endpoints();
    let ve = v.endpoints();

    let mut best = 0usize;
    let mut best_dist = f32::INFINITY;
    for (i, &(hi, vi)) in PAIRINGS.iter().enumerate() {
        let d = point_distance(he[hi], ve[vi]);
        if d < best_dist {
            best_dist = d;
            best = i;
        }
    }
    if !(best_dist < params.max_corner_distance_px) {
        return PairOutcome::TooFar {
            distance_px: best_dist,
        };
    }

    let (hi, vi) = PAIRINGS[best];
    let cross = point_midpoint(he[hi], ve[vi]);
    let center = point_midpoint(he[1 - hi], ve[1 - vi]);

    let depth_m = match depth.estimate(h.length(), v.length()) {
        Ok(est) => est.depth_m,
        Err(rejection) => return PairOutcome::NotAPole(rejection),
    };
    if center[1] <= cross[1] {
        return PairOutcome::Inverted;
    }
    PairOutcome::Accepted(Cross {
        cross,
        center,
        depth_m,
    })
}

fn match_row(
    h: &LineSegment,
    vertical: &[LineSegment],
    params: &CrossParams,
    depth: &DepthEstimator,
) -> Vec<PairOutcome> {
    vertical
        .iter()
        .map(|v| match_pair(h, v, params, depth))
        .collect()
}

/// Matches every horizontal segment against every vertical one.
///
/// Hypotheses are returned in horizontal-major order regardless of whether
/// the `parallel` feature is enabled.
pub fn find_crosses(
    families: &SegmentFamilies,
    params: &CrossParams,
    depth: &DepthEstimator,
) -> CrossSearch {
    let mut search = CrossSearch::default();
    if !families.can_form_corners() {
        return search;
    }

    #[cfg(feature = "parallel")]
    let rows: Vec<Vec<PairOutcome>> = {
        use rayon::prelude::*;
        families
            .horizontal
            .par_iter()
            .map(|h| match_row(h, &families.vertical, params, depth))
            .collect()
    };
    #[cfg(not(feature = "parallel"))]
    let rows: Vec<Vec<PairOutcome>> = families
        .horizontal
        .iter()
        .map(|h| match_row(h, &families.vertical, params, depth))
        .collect();

    for outcome in rows.iter().flatten() {
        search.stats.record(outcome);
        if let PairOutcome::Accepted(cross) = outcome {
            search.crosses.push(*cross);
        }
    }
    search
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segments::{classify_segments, ClassifierParams};

    fn depth() -> DepthEstimator {
        DepthEstimator::default()
    }

    /// Top-left corner of a gate: crossbar going right, pole going down.
    fn top_left_corner() -> (LineSegment, LineSegment) {
        let h = LineSegment::new([300.0, 200.0], [400.0, 200.0]);
        let v = LineSegment::new([302.0, 203.0], [302.0, 298.0]);
        (h, v)
    }

    #[test]
    fn touching_corner_is_accepted() {
        let (h, v) = top_left_corner();
        match match_pair(&h, &v, &CrossParams::default(), &depth()) {
            PairOutcome::Accepted(c) => {
                assert!((c.cross[0] - 301.0).abs() < 1e-4);
                assert!((c.cross[1] - 201.5).abs() < 1e-4);
                assert!((c.center[0] - 351.0).abs() < 1e-4);
                assert!((c.center[1] - 249.0).abs() < 1e-4);
                assert!(c.depth_m > 0.0);
            }
            other => panic!("expected accepted cross, got {other:?}"),
        }
    }

    #[test]
    fn endpoint_order_does_not_matter() {
        let (h, v) = top_left_corner();
        let params = CrossParams::default();
        let base = match_pair(&h, &v, &params, &depth());
        for (hh, vv) in [
            (h.reversed(), v),
            (h, v.reversed()),
            (h.reversed(), v.reversed()),
        ] {
            assert_eq!(match_pair(&hh, &vv, &params, &depth()), base);
        }
    }

    #[test]
    fn distant_endpoints_are_rejected() {
        let h = LineSegment::new([300.0, 200.0], [400.0, 200.0]);
        let v = LineSegment::new([300.0, 220.0], [300.0, 315.0]);
        let outcome = match_pair(&h, &v, &CrossParams::default(), &depth());
        assert!(
            matches!(outcome, PairOutcome::TooFar { distance_px } if distance_px >= 20.0),
            "got {outcome:?}"
        );
    }

    #[test]
    fn inverted_corner_is_rejected() {
        // Pole rising above the crossbar: the opening would be above the corner.
        let h = LineSegment::new([300.0, 300.0], [400.0, 300.0]);
        let v = LineSegment::new([300.0, 298.0], [300.0, 200.0]);
        let outcome = match_pair(&h, &v, &CrossParams::default(), &depth());
        assert_eq!(outcome, PairOutcome::Inverted);
    }

    #[test]
    fn mismatched_lengths_are_not_a_pole() {
        let h = LineSegment::new([300.0, 200.0], [500.0, 200.0]);
        let v = LineSegment::new([300.0, 200.0], [300.0, 260.0]);
        let outcome = match_pair(&h, &v, &CrossParams::default(), &depth());
        assert!(matches!(outcome, PairOutcome::NotAPole(_)), "got {outcome:?}");
    }

    #[test]
    fn accepted_crosses_respect_geometry_constraints() {
        let params = CrossParams::default();
        let mut segs = Vec::new();
        for i in 0..6 {
            let o = 40.0 * i as f32;
            segs.push(LineSegment::new([100.0 + o, 100.0 + o], [200.0 + o, 104.0 + o]));
            segs.push(LineSegment::new([103.0 + o, 98.0 + o], [101.0 + o, 190.0 + o]));
            segs.push(LineSegment::new([205.0 + o, 210.0 + o], [201.0 + o, 108.0 + o]));
        }
        let fam = classify_segments(&segs, &ClassifierParams::default());
        let search = find_crosses(&fam, &params, &depth());
        assert!(!search.crosses.is_empty());
        assert_eq!(search.stats.pairs_tested, fam.horizontal.len() * fam.vertical.len());
        for c in &search.crosses {
            assert!(c.center[1] > c.cross[1]);
            assert!(c.depth_m > 0.0);
        }
    }

    #[test]
    fn empty_family_skips_matching() {
        let fam = SegmentFamilies {
            horizontal: vec![LineSegment::new([0.0, 0.0], [10.0, 0.0])],
            ..Default::default()
        };
        let search = find_crosses(&fam, &CrossParams::default(), &depth());
        assert!(search.crosses.is_empty());
        assert_eq!(search.stats.pairs_tested, 0);
    }
}
