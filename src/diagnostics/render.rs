//! Diagnostic images: false-colour heatmaps and the annotated camera frame.
//!
//! Colours follow the operator display: horizontal segments red, vertical
//! segments green, corners blue, opening centres purple, and a steering arrow
//! from the image centre whose colour encodes the steering mode.

use crate::camera::CameraModel;
use crate::control::SteeringMode;
use crate::diagnostics::FrameReport;
use crate::heatmap::{BirdeyeMap, FrameHeatmap};
use crate::segments::LineSegment;
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_line_segment_mut, draw_polygon_mut};
use imageproc::point::Point;
use nalgebra::{Rotation2, Vector2};
use std::f32::consts::FRAC_PI_4;

const HORIZONTAL_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
const VERTICAL_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const CROSS_COLOR: Rgb<u8> = Rgb([0, 0, 255]);
const CENTER_COLOR: Rgb<u8> = Rgb([170, 0, 170]);
const VERTICAL_ARROW_COLOR: Rgb<u8> = Rgb([235, 230, 0]);
const ADVANCE_ARROW_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
const STRAFE_ARROW_COLOR: Rgb<u8> = Rgb([0, 0, 255]);

const SEGMENT_THICKNESS: i32 = 3;
const ARROW_THICKNESS: i32 = 5;
const CROSS_RADIUS: i32 = 10;
const CENTER_RADIUS: i32 = 20;

/// JET colormap: dark blue at 0, through cyan, yellow, to dark red at 255.
pub fn jet(value: u8) -> Rgb<u8> {
    let v = value as f32 / 255.0;
    let channel = |offset: f32| {
        let c = (1.5 - (4.0 * v - offset).abs()).clamp(0.0, 1.0);
        (c * 255.0).round() as u8
    };
    Rgb([channel(3.0), channel(2.0), channel(1.0)])
}

/// Scales counts by the integer factor `255 / max`, saturating at 255.
pub fn scale_counts(counts: &[u32]) -> Vec<u8> {
    let max = counts.iter().copied().max().unwrap_or(0);
    if max == 0 {
        return vec![0; counts.len()];
    }
    let factor = 255 / max;
    counts
        .iter()
        .map(|&c| c.saturating_mul(factor).min(255) as u8)
        .collect()
}

fn false_colour(width: usize, height: usize, counts: &[u32]) -> RgbImage {
    let scaled = scale_counts(counts);
    RgbImage::from_fn(width as u32, height as u32, |x, y| {
        jet(scaled[y as usize * width + x as usize])
    })
}

/// False-colour rendering of a frame heatmap.
pub fn frame_heatmap_image(heatmap: &FrameHeatmap) -> RgbImage {
    false_colour(heatmap.width(), heatmap.height(), heatmap.votes())
}

/// False-colour rendering of the birdeye map, one pixel per cell.
pub fn birdeye_image(map: &BirdeyeMap) -> RgbImage {
    let (rows, cols) = map.dimensions();
    false_colour(cols, rows, map.counts())
}

/// Blank frame of the camera's size, used when no camera image is available.
pub fn blank_frame(camera: &CameraModel) -> RgbImage {
    RgbImage::new(camera.width as u32, camera.height as u32)
}

/// Draws the detections and the steering arrow of `report` over `frame`.
pub fn annotate_frame(frame: &mut RgbImage, report: &FrameReport, camera: &CameraModel) {
    for seg in &report.families.horizontal {
        draw_segment(frame, seg, SEGMENT_THICKNESS, HORIZONTAL_COLOR);
    }
    for seg in &report.families.vertical {
        draw_segment(frame, seg, SEGMENT_THICKNESS, VERTICAL_COLOR);
    }
    for c in &report.crosses {
        fill_disc(frame, to_pixel(c.cross), CROSS_RADIUS, CROSS_COLOR);
        fill_disc(frame, to_pixel(c.center), CENTER_RADIUS, CENTER_COLOR);
    }
    if let Some((tip, color)) = steering_arrow(report, camera) {
        let [cx, cy] = camera.center();
        let origin = [cx as i32, cy as i32];
        draw_arrow(frame, origin, tip, ARROW_THICKNESS, color);
    }
}

/// Tip and colour of the steering arrow drawn from the image centre.
pub fn steering_arrow(report: &FrameReport, camera: &CameraModel) -> Option<([i32; 2], Rgb<u8>)> {
    let peak = report.peak?;
    let [cx, cy] = camera.center();
    let (cx, cy) = (cx as i32, cy as i32);
    let sign = |offset: f32| if offset < 0.0 { -1 } else { 1 };
    match report.command.mode {
        SteeringMode::Vertical => {
            let s = sign(peak.y as f32 - camera.center()[1]);
            Some(([cx, cy + s * 100], VERTICAL_ARROW_COLOR))
        }
        SteeringMode::Advance => Some(([cx, cy - 30], ADVANCE_ARROW_COLOR)),
        SteeringMode::Strafe => {
            let s = sign(peak.x as f32 - camera.center()[0]);
            Some(([cx + s * 100, cy], STRAFE_ARROW_COLOR))
        }
        SteeringMode::Stop | SteeringMode::YawSearch => None,
    }
}

// Far-away endpoints are pulled in so polygon scans stay bounded.
const DRAW_LIMIT: f32 = 1.0e5;

fn to_pixel(p: [f32; 2]) -> [i32; 2] {
    let c = |v: f32| v.round().clamp(-DRAW_LIMIT, DRAW_LIMIT) as i32;
    [c(p[0]), c(p[1])]
}

fn fill_disc(img: &mut RgbImage, c: [i32; 2], r: i32, color: Rgb<u8>) {
    draw_filled_circle_mut(img, (c[0], c[1]), r, color);
}

/// Line of the given thickness from `a` to `b`, drawn as a filled quad.
pub fn draw_thick_line(
    img: &mut RgbImage,
    a: [i32; 2],
    b: [i32; 2],
    thickness: i32,
    color: Rgb<u8>,
) {
    let (ax, ay) = (a[0] as f32, a[1] as f32);
    let (bx, by) = (b[0] as f32, b[1] as f32);
    draw_line_segment_mut(img, (ax, ay), (bx, by), color);

    let len = ((bx - ax).powi(2) + (by - ay).powi(2)).sqrt();
    let half = thickness as f32 / 2.0;
    if len < 1.0 || half < 1.0 {
        return;
    }
    let nx = (-(by - ay) / len * half).round() as i32;
    let ny = ((bx - ax) / len * half).round() as i32;
    if nx == 0 && ny == 0 {
        return;
    }
    let quad = [
        Point::new(a[0] + nx, a[1] + ny),
        Point::new(b[0] + nx, b[1] + ny),
        Point::new(b[0] - nx, b[1] - ny),
        Point::new(a[0] - nx, a[1] - ny),
    ];
    draw_polygon_mut(img, &quad, color);
}

fn draw_segment(img: &mut RgbImage, seg: &LineSegment, thickness: i32, color: Rgb<u8>) {
    if !seg.is_well_formed() {
        return;
    }
    draw_thick_line(img, to_pixel(seg.p0), to_pixel(seg.p1), thickness, color);
}

/// Arrow from `from` to `tip` with two head strokes of 10 % of its length.
pub fn draw_arrow(
    img: &mut RgbImage,
    from: [i32; 2],
    tip: [i32; 2],
    thickness: i32,
    color: Rgb<u8>,
) {
    draw_thick_line(img, from, tip, thickness, color);
    let back = Vector2::new((from[0] - tip[0]) as f32, (from[1] - tip[1]) as f32);
    let len = back.norm();
    if len < 1.0 {
        return;
    }
    let head = back * 0.1;
    for angle in [-FRAC_PI_4, FRAC_PI_4] {
        let stroke = Rotation2::new(angle) * head;
        let end = [
            tip[0] + stroke.x.round() as i32,
            tip[1] + stroke.y.round() as i32,
        ];
        draw_thick_line(img, tip, end, thickness, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jet_endpoints() {
        assert_eq!(jet(0), Rgb([0, 0, 128]));
        assert_eq!(jet(255), Rgb([128, 0, 0]));
        let mid = jet(128);
        assert!(mid[1] > 200, "middle of JET should be mostly green: {mid:?}");
    }

    #[test]
    fn scaling_uses_integer_factor() {
        assert_eq!(scale_counts(&[0, 1, 2, 3]), vec![0, 85, 170, 255]);
        assert_eq!(scale_counts(&[0, 0]), vec![0, 0]);
        // 255 / 200 = 1: counts are copied, saturating at 255.
        assert_eq!(scale_counts(&[200, 100]), vec![200, 100]);
    }

    #[test]
    fn heatmap_image_matches_grid_size() {
        let mut heat = FrameHeatmap::new(64, 48, 4);
        heat.vote([10.0, 10.0]);
        let img = frame_heatmap_image(&heat);
        assert_eq!((img.width(), img.height()), (64, 48));
        assert_eq!(*img.get_pixel(10, 10), jet(255));
        assert_eq!(*img.get_pixel(40, 40), jet(0));
    }

    #[test]
    fn drawing_is_clipped_to_image() {
        let mut img = RgbImage::new(20, 20);
        fill_disc(&mut img, [0, 0], 5, CROSS_COLOR);
        draw_thick_line(&mut img, [-10, 5], [30, 5], 3, HORIZONTAL_COLOR);
        draw_arrow(&mut img, [10, 10], [10, -5], 5, ADVANCE_ARROW_COLOR);
        assert_eq!(*img.get_pixel(15, 5), HORIZONTAL_COLOR);
        assert_eq!(*img.get_pixel(15, 6), HORIZONTAL_COLOR);
        assert_eq!(*img.get_pixel(15, 9), Rgb([0, 0, 0]));
    }

    #[test]
    fn far_away_segments_do_not_hang_or_panic() {
        let mut img = RgbImage::new(32, 32);
        let seg = LineSegment::new([-1e19, 4.0], [1e19, 4.0]);
        draw_segment(&mut img, &seg, SEGMENT_THICKNESS, HORIZONTAL_COLOR);
        assert_eq!(*img.get_pixel(16, 4), HORIZONTAL_COLOR);
    }

    #[test]
    fn overlay_marks_crosses_centres_and_steering() {
        use crate::control::VelocityCommand;
        use crate::crosses::{Cross, CrossStats};
        use crate::diagnostics::{ProjectionStatus, TimingBreakdown};
        use crate::heatmap::FramePeak;
        use crate::segments::SegmentFamilies;

        let camera = CameraModel::default();
        let report = FrameReport {
            frame_index: 0,
            input_segments: 2,
            families: SegmentFamilies::default(),
            cross_stats: CrossStats::default(),
            crosses: vec![Cross {
                cross: [100.0, 100.0],
                center: [200.0, 200.0],
                depth_m: 4.0,
            }],
            peak: Some(FramePeak {
                x: 330,
                y: 240,
                votes: 1,
                depth_m: 4.0,
            }),
            command: VelocityCommand {
                forward: 1.5,
                mode: SteeringMode::Advance,
                ..VelocityCommand::stop()
            },
            projection: ProjectionStatus::NoDetection,
            gate_estimate: None,
            timings: TimingBreakdown::default(),
        };
        let mut frame = blank_frame(&camera);
        annotate_frame(&mut frame, &report, &camera);
        assert_eq!(*frame.get_pixel(100, 100), CROSS_COLOR);
        assert_eq!(*frame.get_pixel(215, 200), CENTER_COLOR);
        assert_eq!(*frame.get_pixel(320, 225), ADVANCE_ARROW_COLOR);
    }
}
