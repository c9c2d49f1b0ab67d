use gate_locator::prelude::*;

fn main() {
    env_logger::init();

    // Demo stub: one synthetic top-left gate corner near the image center
    let mut det = GateDetector::new(GateParams::default());
    det.update_pose(Pose::new([0.0, 0.0, -1.0], 0.0, 0.0, 0.0));

    let segments = [
        LineSegment::new([280.0, 202.0], [380.0, 202.0]),
        LineSegment::new([282.0, 205.0], [282.0, 300.0]),
    ];
    let report = det.process(&segments);
    println!(
        "found={} mode={:?} crosses={} total_ms={:.3}",
        report.found(),
        report.command.mode,
        report.crosses.len(),
        report.timings.total_ms
    );
    if let Some(gate) = det.gate_estimate() {
        println!("gate x={:.2} y={:.2} votes={}", gate.x, gate.y, gate.votes);
    }
}
