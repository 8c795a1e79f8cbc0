//! Simulation engine abstraction
//!
//! Covers what a controller needs from the simulator:
//! - Simulated clock and stepping
//! - Scene-graph access
//! - Camera devices
//! - Motion playback
//! - The world file the run was launched with

pub mod headless;

use std::path::PathBuf;

use crate::motion::MotionPlayer;
use crate::recorder::Camera;
use crate::scene::SceneGraph;

pub use headless::{HeadlessWorld, MotionEvent};

pub trait Engine: MotionPlayer {
    /// Current simulated time in seconds
    fn time(&self) -> f64;

    /// Advance by one basic time step. Returns `false` once the simulation
    /// has ended.
    fn step(&mut self) -> bool;

    fn scene(&mut self) -> &mut dyn SceneGraph;

    /// Start sampling a camera every `period_ms`
    fn enable_camera(&mut self, camera: Camera, period_ms: u32);

    /// Path of the loaded world file, if the simulator exposes one
    fn world_path(&self) -> Option<PathBuf>;
}
