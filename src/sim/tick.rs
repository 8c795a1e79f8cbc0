//! Per-tick scheduling
//!
//! One body serves all three phases; they differ only in the
//! [`PhaseTiming`](super::phase::PhaseTiming) data held by the session.

use std::path::PathBuf;

use super::placement::{place_ball, place_obstacle, place_player, randomize_light};
use super::state::Session;
use crate::recorder::{Camera, CaptureRequest, FrameRecorder};
use crate::scene::SceneGraph;

/// What happened during one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub randomized: bool,
    /// Path of the frame recorded this tick, if any
    pub captured: Option<PathBuf>,
}

/// Advance one controller by one simulation step at simulated time `now`
pub fn tick<R>(
    session: &mut Session,
    now: f64,
    scene: &mut dyn SceneGraph,
    recorder: &mut R,
) -> TickReport
where
    R: FrameRecorder + ?Sized,
{
    session.ticks += 1;
    let mut report = TickReport::default();

    // Obstacle presence is refreshed every tick, whatever the cadence
    if let Err(err) = session.tracker.update(scene) {
        log::debug!("{}: obstacle flag kept ({err})", session.robot_name);
    }

    if now >= session.next_randomization {
        randomize_scene(session, scene);
        session.randomized = true;
        session.next_randomization = session.timing.cadence.advance(session.next_randomization);
        report.randomized = true;
    }

    if session.capture_open(now) {
        let request = CaptureRequest {
            camera: Camera::Top,
            frame_index: session.frame_index,
            label: &session.label,
            obstacle: session.tracker.flag(),
        };
        match recorder.record(&request) {
            Ok(path) => {
                session.frame_index += 1;
                report.captured = Some(path);
            }
            Err(err) => log::warn!("{}: capture failed: {err}", session.robot_name),
        }
    }

    report
}

/// Each controller only touches what its role owns; every controller
/// reshuffles the ball.
fn randomize_scene(session: &mut Session, scene: &mut dyn SceneGraph) {
    let role = session.role;
    let rng = &mut session.rng;

    if role.is_light_director() {
        if let Err(err) = randomize_light(scene, rng) {
            log::warn!("Warning: {err}");
        }
    }

    if role.drives_obstacle() {
        match place_obstacle(scene, rng) {
            Ok(pose) => log::debug!("Obstacle visible: {}", pose.is_visible()),
            Err(err) => log::warn!("Warning: {err}"),
        }
    }

    if let Some(player) = role.player() {
        if let Err(err) = place_player(scene, rng, player) {
            log::warn!("Warning: {err}");
        }
    }

    if let Err(err) = place_ball(scene, rng) {
        log::warn!("Warning: {err}");
    }
}
