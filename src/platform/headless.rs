//! In-memory engine
//!
//! Fixed-step clock over a [`MemoryScene`]. Several controllers share one
//! world and are ticked one after another inside each step, which is the
//! serialization the real simulator provides.

use std::path::{Path, PathBuf};

use super::Engine;
use crate::controller::Controller;
use crate::motion::MotionPlayer;
use crate::recorder::{Camera, FrameRecorder};
use crate::scene::{MemoryScene, SceneGraph};

/// Motion playback requests seen by the headless world
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MotionEvent {
    Play(PathBuf),
    Stop(PathBuf),
}

#[derive(Debug, Clone)]
pub struct HeadlessWorld {
    pub scene: MemoryScene,
    time_ms: u64,
    step_ms: u32,
    end_ms: Option<u64>,
    world_path: Option<PathBuf>,
    pub motion_events: Vec<MotionEvent>,
    pub cameras: Vec<(Camera, u32)>,
}

impl HeadlessWorld {
    pub fn new(scene: MemoryScene, step_ms: u32) -> Self {
        Self {
            scene,
            time_ms: 0,
            step_ms: step_ms.max(1),
            end_ms: None,
            world_path: None,
            motion_events: Vec::new(),
            cameras: Vec::new(),
        }
    }

    /// Standard pitch with every actor in its start pose
    pub fn soccer_pitch(step_ms: u32) -> Self {
        Self::new(MemoryScene::soccer_pitch(), step_ms)
    }

    /// End the simulation after `secs` of simulated time
    pub fn with_duration(mut self, secs: f64) -> Self {
        self.end_ms = Some((secs.max(0.0) * 1000.0).round() as u64);
        self
    }

    pub fn with_world(mut self, path: impl AsRef<Path>) -> Self {
        self.world_path = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn is_finished(&self) -> bool {
        self.end_ms.is_some_and(|end| self.time_ms >= end)
    }

    /// Tick every controller at the current time, then step, until the end.
    /// Returns the number of ticks each controller received.
    pub fn run_lockstep<R: FrameRecorder>(&mut self, controllers: &mut [Controller<R>]) -> u64 {
        let mut ticks = 0;
        loop {
            let now = Engine::time(self);
            for controller in controllers.iter_mut() {
                controller.tick(now, &mut self.scene);
            }
            ticks += 1;
            if !self.step() {
                break;
            }
        }
        log::debug!("Headless run ended at {:.3}s after {ticks} ticks", Engine::time(self));
        ticks
    }
}

impl MotionPlayer for HeadlessWorld {
    fn play(&mut self, clip: &Path) {
        self.motion_events.push(MotionEvent::Play(clip.to_path_buf()));
    }

    fn stop(&mut self, clip: &Path) {
        self.motion_events.push(MotionEvent::Stop(clip.to_path_buf()));
    }
}

impl Engine for HeadlessWorld {
    fn time(&self) -> f64 {
        self.time_ms as f64 / 1000.0
    }

    fn step(&mut self) -> bool {
        if self.is_finished() {
            return false;
        }
        self.time_ms += self.step_ms as u64;
        true
    }

    fn scene(&mut self) -> &mut dyn SceneGraph {
        &mut self.scene
    }

    fn enable_camera(&mut self, camera: Camera, period_ms: u32) {
        self.cameras.push((camera, period_ms));
    }

    fn world_path(&self) -> Option<PathBuf> {
        self.world_path.clone()
    }
}
