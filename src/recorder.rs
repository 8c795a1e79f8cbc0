//! Capture requests and the dataset layout
//!
//! Every frame lands at
//! `images/<gesture>/<referee>_<cloth>/<background>/<presence>/<angle>/frame_<n>.jpg`
//! relative to the recorder root. Pixel capture itself belongs to the
//! simulator's camera; recorders here only decide and prepare the path.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{DatagenError, Result};
use crate::sim::ObstacleFlag;

/// Top-level directory of the dataset
pub const IMAGE_DIR: &str = "images";

/// Head cameras on a NAO
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Camera {
    Top,
    Bottom,
}

impl Camera {
    pub const ALL: [Camera; 2] = [Camera::Top, Camera::Bottom];

    /// Device name on the robot
    pub fn device_name(&self) -> &'static str {
        match self {
            Camera::Top => "CameraTop",
            Camera::Bottom => "CameraBottom",
        }
    }
}

/// Label fields fixed at startup
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CaptureLabel {
    pub gesture: String,
    pub referee_model: String,
    pub cloth_name: String,
    pub background: String,
    pub camera_angle: String,
}

/// One frame to record
#[derive(Debug, Clone, Copy)]
pub struct CaptureRequest<'a> {
    pub camera: Camera,
    pub frame_index: u32,
    pub label: &'a CaptureLabel,
    pub obstacle: ObstacleFlag,
}

impl CaptureRequest<'_> {
    /// Directory for this frame, relative to the recorder root
    pub fn label_dir(&self) -> PathBuf {
        let label = self.label;
        let model = format!("{}_{}", label.referee_model, label.cloth_name);
        let parts: [&str; 6] = [
            IMAGE_DIR,
            &label.gesture,
            &model,
            &label.background,
            self.obstacle.presence_label(),
            &label.camera_angle,
        ];
        parts.iter().collect()
    }

    pub fn file_name(&self) -> String {
        format!("frame_{}.jpg", self.frame_index)
    }

    pub fn relative_path(&self) -> PathBuf {
        self.label_dir().join(self.file_name())
    }
}

/// Consumer of capture requests
pub trait FrameRecorder {
    /// Record one frame and return where it went
    fn record(&mut self, request: &CaptureRequest<'_>) -> Result<PathBuf>;
}

/// Writes the label directory tree under `root`
#[derive(Debug, Clone)]
pub struct DirectoryRecorder {
    root: PathBuf,
    dry_run: bool,
}

impl DirectoryRecorder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            dry_run: false,
        }
    }

    /// Skip directory creation; paths are still computed and logged
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

impl FrameRecorder for DirectoryRecorder {
    fn record(&mut self, request: &CaptureRequest<'_>) -> Result<PathBuf> {
        let dir = self.root.join(request.label_dir());
        if !self.dry_run {
            std::fs::create_dir_all(&dir).map_err(|source| DatagenError::CaptureDir {
                path: dir.clone(),
                source,
            })?;
        }
        let path = dir.join(request.file_name());
        log::info!("Saving image to: {}", path.display());
        Ok(path)
    }
}

/// A frame kept by [`MemoryRecorder`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedFrame {
    pub camera: Camera,
    pub frame_index: u32,
    pub obstacle: ObstacleFlag,
    pub path: PathBuf,
}

/// Keeps requests in memory (headless runs and tests)
#[derive(Debug, Clone, Default)]
pub struct MemoryRecorder {
    pub frames: Vec<RecordedFrame>,
}

impl MemoryRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl FrameRecorder for MemoryRecorder {
    fn record(&mut self, request: &CaptureRequest<'_>) -> Result<PathBuf> {
        let path = request.relative_path();
        self.frames.push(RecordedFrame {
            camera: request.camera,
            frame_index: request.frame_index,
            obstacle: request.obstacle,
            path: path.clone(),
        });
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label() -> CaptureLabel {
        CaptureLabel {
            gesture: "full_time".into(),
            referee_model: "refA".into(),
            cloth_name: "Cloth1".into(),
            background: "stadium".into(),
            camera_angle: "left".into(),
        }
    }

    #[test]
    fn test_device_names() {
        let names: Vec<&str> = Camera::ALL.iter().map(Camera::device_name).collect();
        assert_eq!(names, ["CameraTop", "CameraBottom"]);
    }

    #[test]
    fn test_layout() {
        let label = label();
        let req = CaptureRequest {
            camera: Camera::Top,
            frame_index: 7,
            label: &label,
            obstacle: ObstacleFlag::Present,
        };
        assert_eq!(
            req.relative_path(),
            PathBuf::from("images/full_time/refA_Cloth1/stadium/presence_robot/left/frame_7.jpg")
        );
    }

    #[test]
    fn test_presence_directories() {
        let label = label();
        let dir = |obstacle| {
            CaptureRequest {
                camera: Camera::Top,
                frame_index: 0,
                label: &label,
                obstacle,
            }
            .label_dir()
        };
        assert!(dir(ObstacleFlag::Absent).ends_with("presence_norobot/left"));
        assert!(dir(ObstacleFlag::Unknown).ends_with("presence_unknown/left"));
    }

    #[test]
    fn test_empty_gesture_still_nests() {
        let mut label = label();
        label.gesture.clear();
        let req = CaptureRequest {
            camera: Camera::Top,
            frame_index: 0,
            label: &label,
            obstacle: ObstacleFlag::Unknown,
        };
        assert_eq!(
            req.relative_path(),
            PathBuf::from("images/refA_Cloth1/stadium/presence_unknown/left/frame_0.jpg")
        );
    }

    #[test]
    fn test_directory_recorder_creates_tree() {
        let tmp = tempfile::tempdir().unwrap();
        let mut recorder = DirectoryRecorder::new(tmp.path());
        let label = label();
        let req = CaptureRequest {
            camera: Camera::Top,
            frame_index: 3,
            label: &label,
            obstacle: ObstacleFlag::Absent,
        };
        let path = recorder.record(&req).unwrap();
        assert!(path.parent().unwrap().is_dir());
        assert!(path.ends_with("frame_3.jpg"));
    }

    #[test]
    fn test_dry_run_touches_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let mut recorder = DirectoryRecorder::new(tmp.path()).dry_run(true);
        let label = label();
        let req = CaptureRequest {
            camera: Camera::Top,
            frame_index: 0,
            label: &label,
            obstacle: ObstacleFlag::Absent,
        };
        recorder.record(&req).unwrap();
        assert!(!tmp.path().join(IMAGE_DIR).exists());
    }
}
