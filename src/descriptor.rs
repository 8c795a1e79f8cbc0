//! World descriptor scanning
//!
//! The world name carries the referee model and background, and the world
//! file names the gesture clip that the referee performs.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DatagenError, Result};

const WORLD_EXTENSION: &str = ".wbt";
const GESTURE_MARKER: &str = "-f";
const MOTIONS_PREFIX: &str = "motions/";
const CLIP_SUFFIX: &str = ".bvh";

pub const UNKNOWN_REFEREE: &str = "unknownReferee";
pub const UNKNOWN_BACKGROUND: &str = "unknownBackground";

/// World name from a world path: last component, trailing `.wbt` dropped
pub fn world_name(world_path: &Path) -> String {
    let file = world_path
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| world_path.to_string_lossy().into_owned());
    match file.strip_suffix(WORLD_EXTENSION) {
        Some(stem) => stem.to_string(),
        None => file,
    }
}

/// Descriptor file for a world: `<worlds_dir>/<name>.wbt`
pub fn descriptor_path(worlds_dir: &Path, world_name: &str) -> PathBuf {
    worlds_dir.join(format!("{world_name}{WORLD_EXTENSION}"))
}

/// Gesture label from descriptor text.
///
/// Only the line right after the first line containing `-f` is looked at;
/// the label sits between `motions/` and `.bvh` on that line.
pub fn extract_gesture(text: &str) -> Option<String> {
    let mut lines = text.lines();
    lines.find(|line| line.contains(GESTURE_MARKER))?;
    let line = lines.next()?;
    let start = line.find(MOTIONS_PREFIX)? + MOTIONS_PREFIX.len();
    let rest = &line[start..];
    let end = rest.find(CLIP_SUFFIX)?;
    let label = &rest[..end];
    (!label.is_empty()).then(|| label.to_string())
}

/// Read a descriptor file and extract its gesture label.
///
/// World files are not guaranteed to be UTF-8; stray bytes elsewhere in the
/// file must not hide the gesture line.
pub fn read_gesture(path: &Path) -> Result<Option<String>> {
    let bytes = std::fs::read(path).map_err(|source| DatagenError::DescriptorUnreadable {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(extract_gesture(&String::from_utf8_lossy(&bytes)))
}

/// Label parts encoded in a world name as `<referee>_<background>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldLabels {
    pub referee_model: String,
    pub background: String,
}

impl WorldLabels {
    /// Split at the first underscore; without one both parts are unknown
    pub fn from_world_name(name: &str) -> Self {
        match name.split_once('_') {
            Some((referee, background)) => Self {
                referee_model: referee.to_string(),
                background: background.to_string(),
            },
            None => Self::default(),
        }
    }
}

impl Default for WorldLabels {
    fn default() -> Self {
        Self {
            referee_model: UNKNOWN_REFEREE.to_string(),
            background: UNKNOWN_BACKGROUND.to_string(),
        }
    }
}
