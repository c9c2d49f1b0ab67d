use gate_locator::segments::LineSegment;

/// Segment starting at `start` with the given inclination (degrees, image
/// coordinates with y pointing down) and pixel length.
pub fn segment_at(start: [f32; 2], angle_deg: f32, length: f32) -> LineSegment {
    let (s, c) = angle_deg.to_radians().sin_cos();
    LineSegment::new(start, [start[0] + c * length, start[1] + s * length])
}

/// Top bar with both poles hanging from it, as seen head-on.
///
/// The bar spans `[left, left + width]` at row `top`; poles start a few
/// pixels inside the bar ends and are `pole_length` pixels long.
pub fn full_gate(left: f32, top: f32, width: f32, pole_length: f32) -> Vec<LineSegment> {
    let right = left + width;
    vec![
        LineSegment::new([left, top], [right, top]),
        LineSegment::new([left + 2.0, top + 3.0], [left + 2.0, top + 3.0 + pole_length]),
        LineSegment::new([right - 2.0, top + 3.0], [right - 2.0, top + 3.0 + pole_length]),
    ]
}

/// Segments at assorted diagonal inclinations that no classifier band accepts.
pub fn diagonal_clutter(count: usize) -> Vec<LineSegment> {
    (0..count)
        .map(|i| {
            let angle = 35.0 + (i % 5) as f32 * 4.0;
            segment_at([40.0 + 10.0 * i as f32, 60.0], angle, 80.0)
        })
        .collect()
}
