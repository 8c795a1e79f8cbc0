//! Obstacle presence tracking
//!
//! The obstacle robot is driven by its own controller; everyone else infers
//! whether it is on the pitch from how far it stands from its parking spot.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::consts::{HIDDEN_OBSTACLE, HIDDEN_TOLERANCE, fields, nodes};
use crate::error::ResolutionError;
use crate::ground_distance;
use crate::scene::SceneGraph;

/// Whether the obstacle robot is in frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ObstacleFlag {
    /// Not observed yet
    #[default]
    Unknown,
    Absent,
    Present,
}

impl ObstacleFlag {
    /// Directory name used in the capture layout
    pub fn presence_label(&self) -> &'static str {
        match self {
            ObstacleFlag::Present => "presence_robot",
            ObstacleFlag::Absent => "presence_norobot",
            ObstacleFlag::Unknown => "presence_unknown",
        }
    }

    /// Classify an obstacle translation
    pub fn from_position(pos: DVec3) -> Self {
        if ground_distance(pos, HIDDEN_OBSTACLE) < HIDDEN_TOLERANCE {
            ObstacleFlag::Absent
        } else {
            ObstacleFlag::Present
        }
    }
}

/// Holds the last observed flag; sticky when the obstacle cannot be read
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObstacleTracker {
    flag: ObstacleFlag,
}

impl ObstacleTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn flag(&self) -> ObstacleFlag {
        self.flag
    }

    /// Re-read the obstacle and update the flag.
    ///
    /// On a resolution failure the previous flag is kept and the error is
    /// returned for logging.
    pub fn update(&mut self, scene: &dyn SceneGraph) -> Result<ObstacleFlag, ResolutionError> {
        let actor = scene.require(nodes::OBSTACLE)?;
        let pos = scene.get_vec3(actor, fields::TRANSLATION)?;
        self.flag = ObstacleFlag::from_position(pos);
        Ok(self.flag)
    }
}
