//! One controller instance per robot
//!
//! Startup derives everything that stays fixed for the run (labels, phase,
//! seed), brings up cameras and the startup motion, then hands each tick to
//! [`sim::tick`](crate::sim::tick).

use std::path::Path;

use crate::descriptor::{self, WorldLabels};
use crate::error::{DatagenError, Result};
use crate::motion::MotionLibrary;
use crate::platform::Engine;
use crate::recorder::{Camera, CaptureLabel, FrameRecorder};
use crate::scene::SceneGraph;
use crate::settings::Settings;
use crate::sim::{self, ControllerRole, Session, TickReport};

pub struct Controller<R: FrameRecorder> {
    pub session: Session,
    pub recorder: R,
    motions: MotionLibrary,
}

/// Gesture from the world descriptor; empty when it cannot be read or names
/// no clip, which selects the continuous phase
fn resolve_gesture(worlds_dir: &Path, world_name: &str) -> String {
    let path = descriptor::descriptor_path(worlds_dir, world_name);
    match descriptor::read_gesture(&path) {
        Ok(Some(gesture)) => {
            log::info!("Opened world file: {}", path.display());
            log::info!("Extracted gesture: {gesture}");
            gesture
        }
        Ok(None) => {
            log::warn!("Could not find a .bvh gesture name in {}", path.display());
            String::new()
        }
        Err(err) => {
            log::warn!("{err}");
            String::new()
        }
    }
}

impl<R: FrameRecorder> Controller<R> {
    /// Bring up the controller for `robot_name`.
    ///
    /// Only a missing world path is an error; unreadable inputs fall back
    /// to defaults and are logged.
    pub fn startup<E>(
        settings: &Settings,
        robot_name: &str,
        engine: &mut E,
        recorder: R,
    ) -> Result<Self>
    where
        E: Engine + ?Sized,
    {
        let world_path = engine.world_path().ok_or(DatagenError::WorldPathUnavailable)?;
        let world_name = descriptor::world_name(&world_path);
        log::info!("World name (derived): {world_name}");

        let gesture = resolve_gesture(&settings.worlds_dir, &world_name);
        let WorldLabels {
            referee_model,
            background,
        } = WorldLabels::from_world_name(&world_name);

        let mut motions = MotionLibrary::load_dir(&settings.motions_dir).unwrap_or_else(|err| {
            log::warn!("{err}");
            MotionLibrary::new()
        });

        let role = ControllerRole::from_robot_name(robot_name);
        if role.has_camera() {
            for camera in Camera::ALL {
                engine.enable_camera(camera, settings.time_step_ms);
                log::info!("{} enabled for {robot_name}", camera.device_name());
            }
        }

        if let Err(err) = motions.start(&settings.startup_motion, engine) {
            log::warn!("{err}");
        }

        let seed = match settings.seed {
            Some(base) => sim::instance_seed(base, robot_name),
            None => sim::wall_clock_seed(robot_name),
        };

        let label = CaptureLabel {
            gesture,
            referee_model,
            cloth_name: settings.cloth_name.clone(),
            background,
            camera_angle: role.camera_angle().to_string(),
        };
        let session = Session::new(robot_name, label, engine.time(), seed);
        log::info!(
            "{robot_name}: gesture '{}' runs as {} (seed {seed})",
            session.label.gesture,
            session.phase.as_str()
        );

        Ok(Self {
            session,
            recorder,
            motions,
        })
    }

    pub fn tick(&mut self, now: f64, scene: &mut dyn SceneGraph) -> TickReport {
        sim::tick(&mut self.session, now, scene, &mut self.recorder)
    }

    /// Drive this controller alone until the engine stops
    pub fn run<E: Engine + ?Sized>(&mut self, engine: &mut E) {
        loop {
            let now = engine.time();
            self.tick(now, engine.scene());
            if !engine.step() {
                break;
            }
        }
    }

    /// Stop any playing motion
    pub fn finish<E: Engine + ?Sized>(&mut self, engine: &mut E) {
        self.motions.stop_all(engine);
        log::info!(
            "{}: {} frames over {} ticks",
            self.session.robot_name,
            self.session.frame_index(),
            self.session.ticks()
        );
    }

    pub fn motions(&self) -> &MotionLibrary {
        &self.motions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::nodes;
    use crate::platform::{HeadlessWorld, MotionEvent};
    use crate::recorder::MemoryRecorder;
    use crate::sim::Phase;
    use std::path::PathBuf;

    struct Fixture {
        _tmp: tempfile::TempDir,
        settings: Settings,
        world: PathBuf,
    }

    fn fixture(world_name: &str, descriptor: Option<&str>) -> Fixture {
        let tmp = tempfile::tempdir().unwrap();
        let worlds = tmp.path().join("worlds");
        let motions = tmp.path().join("motions");
        std::fs::create_dir_all(&worlds).unwrap();
        std::fs::create_dir_all(&motions).unwrap();
        std::fs::write(motions.join("static_image_collection.motion"), "").unwrap();
        let world = worlds.join(format!("{world_name}.wbt"));
        if let Some(text) = descriptor {
            std::fs::write(&world, text).unwrap();
        }
        let settings = Settings {
            worlds_dir: worlds,
            motions_dir: motions,
            seed: Some(9),
            ..Settings::default()
        };
        Fixture {
            _tmp: tmp,
            settings,
            world,
        }
    }

    fn start(
        f: &Fixture,
        robot: &str,
        world: &mut HeadlessWorld,
    ) -> Result<Controller<MemoryRecorder>> {
        Controller::startup(&f.settings, robot, world, MemoryRecorder::new())
    }

    #[test]
    fn test_startup_labels_and_phase() {
        let f = fixture("refA_stadium", Some("\"-f\"\n\"motions/substitution.bvh\"\n"));
        let mut world = HeadlessWorld::soccer_pitch(32).with_world(&f.world);
        let c = start(&f, nodes::RIGHT_PLAYER, &mut world).unwrap();

        let label = &c.session.label;
        assert_eq!(label.gesture, "substitution");
        assert_eq!(label.referee_model, "refA");
        assert_eq!(label.background, "stadium");
        assert_eq!(label.cloth_name, "Cloth1");
        assert_eq!(label.camera_angle, "right");
        assert_eq!(c.session.phase, Phase::PeriodicSubstitution);
        assert_eq!(world.cameras, vec![(Camera::Top, 32), (Camera::Bottom, 32)]);
        assert_eq!(c.motions().playing().unwrap().name, "static_image_collection");
    }

    #[test]
    fn test_missing_world_path_is_fatal() {
        let f = fixture("refA_stadium", None);
        let mut world = HeadlessWorld::soccer_pitch(32);
        let err = start(&f, nodes::LEFT_PLAYER, &mut world).err().unwrap();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_unreadable_descriptor_runs_continuous() {
        let f = fixture("plain", None);
        let mut world = HeadlessWorld::soccer_pitch(32).with_world(&f.world);
        let c = start(&f, "OBSTACLE ROBOT", &mut world).unwrap();
        assert_eq!(c.session.phase, Phase::Continuous);
        assert_eq!(c.session.label.gesture, "");
        assert_eq!(c.session.label.referee_model, "unknownReferee");
        assert!(world.cameras.is_empty());
    }

    #[test]
    fn test_missing_startup_motion_is_not_fatal() {
        let mut f = fixture("refA_stadium", None);
        f.settings.startup_motion = "moonwalk".into();
        let mut world = HeadlessWorld::soccer_pitch(32).with_world(&f.world);
        let c = start(&f, nodes::MIDDLE_PLAYER, &mut world).unwrap();
        assert!(c.motions().playing().is_none());
        assert!(world.motion_events.is_empty());
    }

    #[test]
    fn test_run_until_engine_stops() {
        let f = fixture("refA_stadium", Some("-f\nmotions/full_time.bvh\n"));
        let mut world = HeadlessWorld::soccer_pitch(32).with_world(&f.world).with_duration(2.0);
        let mut c = start(&f, nodes::LEFT_PLAYER, &mut world).unwrap();
        c.run(&mut world);

        assert!(world.is_finished());
        assert!(c.session.has_randomized());
        assert!(!c.recorder.is_empty());
        let prefix = "images/full_time/refA_Cloth1";
        assert!(c.recorder.frames.iter().all(|f| f.path.starts_with(prefix)));

        c.finish(&mut world);
        assert!(matches!(world.motion_events.last(), Some(MotionEvent::Stop(_))));
    }

    #[test]
    fn test_fixed_seed_is_reproducible() {
        let f = fixture("refA_stadium", None);
        let run = || {
            let mut world = HeadlessWorld::soccer_pitch(32).with_world(&f.world).with_duration(3.2);
            let mut c = start(&f, nodes::LEFT_PLAYER, &mut world).unwrap();
            c.run(&mut world);
            world.scene.translation(nodes::LEFT_PLAYER)
        };
        assert_eq!(run(), run());
    }
}
