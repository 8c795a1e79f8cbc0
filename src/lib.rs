//! NAO Datagen - scene randomization for synthetic soccer datasets
//!
//! Core modules:
//! - `sim`: Placement sampling, obstacle tracking, phase scheduling
//! - `controller`: Per-robot startup and tick loop
//! - `scene`: Scene-graph access (actors, fields, velocities)
//! - `platform`: Simulation engine abstraction + headless in-memory world
//! - `descriptor`: World file scanning (gesture, referee model, background)
//! - `motion`: Motion clip library (one active clip at a time)
//! - `recorder`: Capture requests and the on-disk label layout
//! - `settings`: Runtime configuration

pub mod controller;
pub mod descriptor;
pub mod error;
pub mod motion;
pub mod platform;
pub mod recorder;
pub mod scene;
pub mod settings;
pub mod sim;

pub use error::{DatagenError, ResolutionError};
pub use settings::Settings;

use glam::DVec2;

/// Pitch and actor constants
pub mod consts {
    use glam::{DVec2, DVec3};

    /// Every player faces this point on the ground plane
    pub const FACING_TARGET: DVec2 = DVec2::new(3.0, 0.0);

    /// Standing height of a NAO (players and the obstacle robot)
    pub const ROBOT_HEIGHT: f64 = 0.335;
    /// Resting height of the ball center
    pub const BALL_HEIGHT: f64 = 0.07;

    /// Off-stage parking spot for the obstacle robot
    pub const HIDDEN_OBSTACLE: DVec3 = DVec3::new(-3.0, -4.0, ROBOT_HEIGHT);
    /// Obstacle closer than this (ground plane) to its parking spot counts as absent
    pub const HIDDEN_TOLERANCE: f64 = 0.1;

    /// Minimum ground distance between the ball and any robot
    pub const BALL_CLEARANCE: f64 = 0.3;
    /// Ball spawn area (x)
    pub const FIELD_X: (f64, f64) = (-3.0, 3.0);
    /// Ball spawn area (y)
    pub const FIELD_Y: (f64, f64) = (-4.5, 4.5);

    /// Background light direction ranges
    pub const LIGHT_DIR_X: (f64, f64) = (-2.0, 2.0);
    pub const LIGHT_DIR_Y: (f64, f64) = (-7.0, -0.7);
    pub const LIGHT_DIR_Z: (f64, f64) = (-2.0, 2.0);
    /// Background light luminosity range
    pub const LIGHT_LUMINOSITY: (f64, f64) = (0.0, 3.0);

    /// Scene node names (DEF names in the world file)
    pub mod nodes {
        pub const LEFT_PLAYER: &str = "NAO RED 2";
        pub const MIDDLE_PLAYER: &str = "NAO RED 3";
        pub const RIGHT_PLAYER: &str = "NAO BLUE 4";
        pub const OBSTACLE: &str = "OBSTACLE_ROBOT";
        pub const BALL: &str = "SOCCER_BALL";
        pub const LIGHT: &str = "TEXTURED_BACKGROUND_LIGHT";
    }

    /// Scene field names
    pub mod fields {
        pub const TRANSLATION: &str = "translation";
        pub const ROTATION: &str = "rotation";
        pub const DIRECTION: &str = "direction";
        pub const LUMINOSITY: &str = "luminosity";
    }
}

/// Heading angle (radians) from `from` toward `to` on the ground plane
#[inline]
pub fn heading(from: DVec2, to: DVec2) -> f64 {
    let d = to - from;
    d.y.atan2(d.x)
}

/// Planar distance, ignoring height
#[inline]
pub fn ground_distance(a: glam::DVec3, b: glam::DVec3) -> f64 {
    a.truncate().distance(b.truncate())
}
