//! Controller session state
//!
//! One [`Session`] exists per controller instance. It owns everything that
//! changes during a run (obstacle flag, frame counter, randomization
//! schedule, RNG stream); the scene itself lives in the simulator.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::obstacle::{ObstacleFlag, ObstacleTracker};
use super::phase::{Phase, PhaseTiming};
use super::placement::PlayerRole;
use crate::consts::nodes;
use crate::recorder::CaptureLabel;

/// Robot name of the obstacle's own controller (its scene node is `OBSTACLE_ROBOT`)
pub const OBSTACLE_ROBOT_NAME: &str = "OBSTACLE ROBOT";

/// What a controller is responsible for, derived from its robot name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControllerRole {
    /// Camera-carrying player that moves itself
    Player(PlayerRole),
    /// Hides or places the obstacle robot
    Obstacle,
    /// Any other robot: reshuffles the ball only
    Passive,
}

impl ControllerRole {
    pub fn from_robot_name(name: &str) -> Self {
        match name {
            nodes::LEFT_PLAYER => ControllerRole::Player(PlayerRole::Left),
            nodes::MIDDLE_PLAYER => ControllerRole::Player(PlayerRole::Middle),
            nodes::RIGHT_PLAYER => ControllerRole::Player(PlayerRole::Right),
            OBSTACLE_ROBOT_NAME => ControllerRole::Obstacle,
            _ => ControllerRole::Passive,
        }
    }

    pub fn player(&self) -> Option<PlayerRole> {
        match self {
            ControllerRole::Player(role) => Some(*role),
            _ => None,
        }
    }

    pub fn has_camera(&self) -> bool {
        self.player().is_some()
    }

    /// The left player also drives the background light
    pub fn is_light_director(&self) -> bool {
        matches!(self, ControllerRole::Player(PlayerRole::Left))
    }

    pub fn drives_obstacle(&self) -> bool {
        matches!(self, ControllerRole::Obstacle)
    }

    /// Camera-angle label; empty for roles without a camera
    pub fn camera_angle(&self) -> &'static str {
        self.player().map(|p| p.as_str()).unwrap_or("")
    }
}

fn salt_hash(salt: &str) -> u64 {
    salt.bytes()
        .fold(0u64, |h, b| h.wrapping_mul(2654435761).wrapping_add(b as u64))
        .rotate_left(32)
}

/// Seed from wall-clock time, salted so controllers started in the same
/// instant still get distinct streams
pub fn wall_clock_seed(salt: &str) -> u64 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default();
    nanos ^ salt_hash(salt)
}

/// Reproducible per-controller seed from a shared base seed
pub fn instance_seed(base: u64, salt: &str) -> u64 {
    base ^ salt_hash(salt)
}

/// Per-controller run state
#[derive(Debug, Clone)]
pub struct Session {
    pub robot_name: String,
    pub role: ControllerRole,
    pub phase: Phase,
    pub timing: PhaseTiming,
    /// Simulated time when the run started
    pub start_time: f64,
    pub label: CaptureLabel,
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub(crate) tracker: ObstacleTracker,
    pub(crate) next_randomization: f64,
    pub(crate) randomized: bool,
    pub(crate) frame_index: u32,
    pub(crate) ticks: u64,
}

impl Session {
    /// Create a session. The phase comes from `label.gesture`.
    pub fn new(
        robot_name: impl Into<String>,
        label: CaptureLabel,
        start_time: f64,
        seed: u64,
    ) -> Self {
        let robot_name = robot_name.into();
        let role = ControllerRole::from_robot_name(&robot_name);
        let phase = Phase::from_gesture(&label.gesture);
        let timing = phase.timing();
        Self {
            robot_name,
            role,
            phase,
            timing,
            start_time,
            label,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tracker: ObstacleTracker::new(),
            next_randomization: start_time + timing.first_offset,
            randomized: false,
            frame_index: 0,
            ticks: 0,
        }
    }

    pub fn obstacle_flag(&self) -> ObstacleFlag {
        self.tracker.flag()
    }

    /// Index the next capture will use (also the number captured so far)
    pub fn frame_index(&self) -> u32 {
        self.frame_index
    }

    /// Simulated time of the next scheduled randomization
    pub fn next_randomization(&self) -> f64 {
        self.next_randomization
    }

    pub fn has_randomized(&self) -> bool {
        self.randomized
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Captures open once the first randomization time has passed and a
    /// randomization actually ran
    pub fn capture_open(&self, now: f64) -> bool {
        self.role.has_camera()
            && self.randomized
            && now >= self.start_time + self.timing.first_offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(gesture: &str) -> CaptureLabel {
        CaptureLabel {
            gesture: gesture.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_roles_from_robot_names() {
        assert_eq!(
            ControllerRole::from_robot_name("NAO RED 2"),
            ControllerRole::Player(PlayerRole::Left)
        );
        assert_eq!(
            ControllerRole::from_robot_name("NAO RED 3"),
            ControllerRole::Player(PlayerRole::Middle)
        );
        assert_eq!(
            ControllerRole::from_robot_name("NAO BLUE 4"),
            ControllerRole::Player(PlayerRole::Right)
        );
        assert_eq!(
            ControllerRole::from_robot_name("OBSTACLE ROBOT"),
            ControllerRole::Obstacle
        );
        // The scene node name is not the robot name
        assert_eq!(
            ControllerRole::from_robot_name("OBSTACLE_ROBOT"),
            ControllerRole::Passive
        );
    }

    #[test]
    fn test_only_left_player_directs_light() {
        assert!(ControllerRole::Player(PlayerRole::Left).is_light_director());
        assert!(!ControllerRole::Player(PlayerRole::Right).is_light_director());
        assert!(!ControllerRole::Obstacle.is_light_director());
        assert_eq!(ControllerRole::Obstacle.camera_angle(), "");
        assert_eq!(ControllerRole::Player(PlayerRole::Middle).camera_angle(), "middle");
    }

    #[test]
    fn test_new_session_schedule() {
        let s = Session::new("NAO RED 2", label("substitution"), 2.0, 1);
        assert_eq!(s.phase, Phase::PeriodicSubstitution);
        assert!((s.next_randomization() - 2.94).abs() < 1e-12);
        assert!(!s.has_randomized());
        assert_eq!(s.frame_index(), 0);
        assert_eq!(s.obstacle_flag(), ObstacleFlag::Unknown);
        assert!(!s.capture_open(10.0));
    }

    #[test]
    fn test_salted_seeds_differ() {
        // Same instant is not guaranteed, but salts alone must separate streams
        let a = wall_clock_seed("NAO RED 2");
        let b = wall_clock_seed("NAO RED 3");
        assert_ne!(a, b);
    }

    #[test]
    fn test_instance_seed_is_stable() {
        assert_eq!(instance_seed(42, "NAO RED 2"), instance_seed(42, "NAO RED 2"));
        assert_ne!(instance_seed(42, "NAO RED 2"), instance_seed(42, "NAO BLUE 4"));
    }
}
