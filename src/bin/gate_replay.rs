use gate_locator::config::replay::{self, FrameRecord, ReplayConfig};
use gate_locator::diagnostics::render::{
    annotate_frame, birdeye_image, blank_frame, frame_heatmap_image,
};
use gate_locator::image::io::{load_rgb_image, save_rgb_image, write_json_file};
use gate_locator::{FrameReport, GateDetector, GateEstimate};
use serde::Serialize;
use std::env;
use std::path::{Path, PathBuf};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReplayReport {
    frames: Vec<FrameReport>,
    gate_estimate: Option<GateEstimate>,
    /// Gate marker `(x, y, z)` for visualization, at the fixed marker height.
    gate_marker: Option<[f32; 3]>,
}

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let mut args = env::args();
    let program = args.next().unwrap_or_else(|| "gate_replay".to_string());
    let config_path = args
        .next()
        .map(PathBuf::from)
        .ok_or_else(|| format!("Usage: {program} <config.json>"))?;
    let config = replay::load_config(&config_path)?;
    let frames = replay::load_frame_log(&config.input)?;

    let mut detector = GateDetector::new(config.params.clone());
    let mut reports = Vec::with_capacity(frames.len());
    for frame in &frames {
        let report = replay_frame(&mut detector, frame, &config)?;
        print_frame_line(&report);
        reports.push(report);
    }

    let gate = detector.gate_estimate();
    print_summary(&reports, gate.as_ref());

    if let Some(path) = &config.output.report_json {
        let report = ReplayReport {
            frames: reports,
            gate_estimate: gate,
            gate_marker: gate.map(|g| g.marker_position()),
        };
        write_json_file(path, &report)?;
        println!("\nJSON report written to {}", path.display());
    }

    if let Some(dir) = &config.output.debug_dir {
        save_rgb_image(&birdeye_image(&detector.birdeye()), &dir.join("birdeye.png"))?;
        println!("Debug artifacts written to {}", dir.display());
    }

    Ok(())
}

fn replay_frame(
    detector: &mut GateDetector,
    frame: &FrameRecord,
    config: &ReplayConfig,
) -> Result<FrameReport, String> {
    if let Some(update) = &frame.pose {
        detector.update_pose(update.to_pose());
    }
    let report = detector.process(&frame.segments);
    if let Some(dir) = &config.output.debug_dir {
        save_frame_artifacts(dir, detector, frame.image.as_deref(), &report)?;
    }
    Ok(report)
}

fn save_frame_artifacts(
    dir: &Path,
    detector: &GateDetector,
    image: Option<&Path>,
    report: &FrameReport,
) -> Result<(), String> {
    let camera = &detector.params().camera;
    let index = report.frame_index;

    let heatmap = frame_heatmap_image(detector.frame_heatmap());
    save_rgb_image(&heatmap, &dir.join(format!("frame_{index:05}_heatmap.png")))?;

    let mut overlay = match image {
        Some(path) => load_rgb_image(path)?,
        None => blank_frame(camera),
    };
    annotate_frame(&mut overlay, report, camera);
    save_rgb_image(&overlay, &dir.join(format!("frame_{index:05}_overlay.png")))
}

fn print_frame_line(report: &FrameReport) {
    let cmd = &report.command;
    let peak = match &report.peak {
        Some(p) => format!(
            "peak=({}, {}) votes={} depth={:.2}m",
            p.x, p.y, p.votes, p.depth_m
        ),
        None => "no gate".to_string(),
    };
    println!(
        "frame {:>5}: segs={} h={} v={} crosses={} {} -> {:?} \
         [fwd={:.2} lat={:.2} vert={:.2} yaw={:.2}]",
        report.frame_index,
        report.input_segments,
        report.families.horizontal.len(),
        report.families.vertical.len(),
        report.crosses.len(),
        peak,
        cmd.mode,
        cmd.forward,
        cmd.lateral,
        cmd.vertical,
        cmd.yaw_rate,
    );
}

fn print_summary(reports: &[FrameReport], gate: Option<&GateEstimate>) {
    let detected = reports.iter().filter(|r| r.found()).count();
    let projected = reports.iter().filter(|r| r.world_point().is_some()).count();
    let total_ms: f64 = reports.iter().map(|r| r.timings.total_ms).sum();
    println!("\nReplay summary");
    println!("  frames: {}", reports.len());
    println!("  detected: {detected}");
    println!("  projected: {projected}");
    if !reports.is_empty() {
        println!("  mean_latency_ms: {:.3}", total_ms / reports.len() as f64);
    }
    match gate {
        Some(g) => {
            println!(
                "  gate: x={:.2} y={:.2} (cell {},{}; votes={})",
                g.x, g.y, g.row, g.col, g.votes
            );
            let [mx, my, mz] = g.marker_position();
            println!("  marker: [{mx:.2}, {my:.2}, {mz:.2}]");
        }
        None => println!("  gate: not yet localised"),
    }
}
