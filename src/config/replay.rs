use crate::image::io::read_json_file;
use crate::pose::PoseUpdate;
use crate::segments::LineSegment;
use crate::GateParams;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Per-frame reports plus the final gate estimate.
    pub report_json: Option<PathBuf>,
    /// Directory for heatmap, overlay and birdeye PNGs.
    pub debug_dir: Option<PathBuf>,
}

/// Runtime configuration of the replay tool.
#[derive(Clone, Debug, Deserialize)]
pub struct ReplayConfig {
    /// Frame log to replay.
    pub input: PathBuf,
    #[serde(default)]
    pub params: GateParams,
    #[serde(default)]
    pub output: OutputConfig,
}

/// One recorded frame: the line detector output, the pose received before
/// it (if any) and optionally the camera image for overlays.
#[derive(Clone, Debug, Deserialize)]
pub struct FrameRecord {
    #[serde(default)]
    pub segments: Vec<LineSegment>,
    #[serde(default)]
    pub pose: Option<PoseUpdate>,
    #[serde(default)]
    pub image: Option<PathBuf>,
}

pub fn load_config(path: &Path) -> Result<ReplayConfig, String> {
    let config: ReplayConfig = read_json_file(path)?;
    config
        .params
        .validate()
        .map_err(|e| format!("Invalid parameters in {}: {e}", path.display()))?;
    Ok(config)
}

/// Loads a frame log; relative image paths are resolved against the log's directory.
pub fn load_frame_log(path: &Path) -> Result<Vec<FrameRecord>, String> {
    let mut frames: Vec<FrameRecord> = read_json_file(path)?;
    let base = path.parent().unwrap_or_else(|| Path::new(""));
    for frame in &mut frames {
        if let Some(image) = frame.image.as_mut() {
            if image.is_relative() {
                *image = base.join(&*image);
            }
        }
    }
    Ok(frames)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_record_accepts_minimal_layout() {
        let frames: Vec<FrameRecord> = serde_json::from_str(
            r#"[
                {"segments": [[280, 202, 380, 202], [282, 205, 282, 300]],
                 "pose": {"position": [0, 0, -1], "orientation": [0, 0, 0, 1]}},
                {}
            ]"#,
        )
        .expect("frame log parses");
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].segments.len(), 2);
        assert!(frames[0].pose.is_some());
        assert!(frames[1].segments.is_empty());
        assert!(frames[1].pose.is_none());
    }

    #[test]
    fn replay_config_defaults_params_and_output() {
        let cfg: ReplayConfig =
            serde_json::from_str(r#"{"input": "frames.json"}"#).expect("config parses");
        assert_eq!(cfg.input, PathBuf::from("frames.json"));
        assert!(cfg.output.report_json.is_none());
        assert_eq!(cfg.params.camera.height, 480);
    }
}
