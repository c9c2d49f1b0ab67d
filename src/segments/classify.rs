use super::options::ClassifierParams;
use super::segment::LineSegment;
use crate::angle::inclination_difference_deg;
use serde::Serialize;

/// Orientation family assigned to a raw segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentClass {
    Horizontal,
    Vertical,
}

/// Segments of one frame split by orientation.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentFamilies {
    pub horizontal: Vec<LineSegment>,
    pub vertical: Vec<LineSegment>,
    /// Diagonal, degenerate or too-short segments that were discarded.
    pub dropped: usize,
}

impl SegmentFamilies {
    pub fn is_empty(&self) -> bool {
        self.horizontal.is_empty() && self.vertical.is_empty()
    }

    /// Both families must be populated before corners can be formed.
    pub fn can_form_corners(&self) -> bool {
        !self.horizontal.is_empty() && !self.vertical.is_empty()
    }
}

/// Classifies a single segment, or `None` when it falls in neither band.
pub fn classify_segment(segment: &LineSegment, params: &ClassifierParams) -> Option<SegmentClass> {
    if !segment.is_well_formed() || segment.length() < params.min_length_px {
        return None;
    }
    let theta = segment.inclination_deg();
    if theta < params.angle_threshold_deg {
        Some(SegmentClass::Horizontal)
    } else if inclination_difference_deg(theta, 90.0) < params.angle_threshold_deg {
        Some(SegmentClass::Vertical)
    } else {
        None
    }
}

/// Splits raw segments into horizontal and vertical families, keeping input order.
pub fn classify_segments(segments: &[LineSegment], params: &ClassifierParams) -> SegmentFamilies {
    let mut families = SegmentFamilies::default();
    for seg in segments {
        match classify_segment(seg, params) {
            Some(SegmentClass::Horizontal) => families.horizontal.push(*seg),
            Some(SegmentClass::Vertical) => families.vertical.push(*seg),
            None => families.dropped += 1,
        }
    }
    families
}
