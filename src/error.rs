//! Error types for scene access and controller startup

use std::path::PathBuf;

use thiserror::Error;

/// Failure to reach an actor or one of its fields through the scene graph.
///
/// Never fatal: the affected placement is skipped and retried next tick,
/// since actors are re-resolved on every call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolutionError {
    #[error("Could not find node with DEF {0}")]
    ActorNotFound(String),

    #[error("Could not get '{field}' field for {actor}")]
    FieldNotFound { actor: String, field: String },

    #[error("Field '{field}' of {actor} holds a {found}, expected a {expected}")]
    FieldType {
        actor: String,
        field: String,
        expected: &'static str,
        found: &'static str,
    },
}

#[derive(Error, Debug)]
pub enum DatagenError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Settings error: {0}")]
    Settings(#[from] serde_json::Error),

    #[error("Failed to get the world path")]
    WorldPathUnavailable,

    #[error("Failed to open world file: {path}")]
    DescriptorUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not open motion directory: {path}")]
    MotionDirUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Motion not found: {0}")]
    MotionNotFound(String),

    #[error("Could not create capture directory {path}")]
    CaptureDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Resolution(#[from] ResolutionError),
}

impl DatagenError {
    /// Only a missing world path ends the run; everything else degrades to defaults.
    pub fn is_fatal(&self) -> bool {
        matches!(self, DatagenError::WorldPathUnavailable)
    }
}

pub type Result<T> = std::result::Result<T, DatagenError>;
