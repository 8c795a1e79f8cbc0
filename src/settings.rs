//! Runtime settings
//!
//! Read from an optional JSON file; every field falls back to its default
//! when missing.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Controller settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Inputs ===
    /// Directory holding the `.wbt` world descriptors
    pub worlds_dir: PathBuf,
    /// Directory holding the motion clips
    pub motions_dir: PathBuf,
    /// Clip started once at startup
    pub startup_motion: String,

    // === Output ===
    /// Root under which the `images/` tree is created
    pub output_root: PathBuf,
    /// Cloth label paired with the referee model
    pub cloth_name: String,
    /// Compute and log capture paths without touching the filesystem
    pub dry_run: bool,

    // === Timing ===
    /// Basic simulation step, also the camera sampling period
    pub time_step_ms: u32,
    /// Headless run length in simulated seconds (`None` runs until stopped)
    pub duration_secs: Option<f64>,

    // === Randomness ===
    /// Fixed base seed for reproducible runs; wall-clock seeded when unset
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            worlds_dir: PathBuf::from("../../worlds"),
            motions_dir: PathBuf::from("../../motions"),
            startup_motion: "static_image_collection".to_string(),

            output_root: PathBuf::from("."),
            cloth_name: "Cloth1".to_string(),
            dry_run: false,

            time_step_ms: 32,
            duration_secs: None,

            seed: None,
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load settings from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Settings from `path` if given, defaults otherwise. A bad file is
    /// reported and replaced by defaults.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        match path {
            Some(path) => Self::load(path).unwrap_or_else(|err| {
                log::warn!("Using default settings: {err}");
                Self::default()
            }),
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }
}
