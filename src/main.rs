//! NAO Datagen entry point
//!
//! Runs the dataset controllers of one world headlessly:
//! `nao-datagen [settings.json] [world.wbt]`

#[cfg(not(target_arch = "wasm32"))]
use std::path::PathBuf;
#[cfg(not(target_arch = "wasm32"))]
use std::process::ExitCode;

#[cfg(not(target_arch = "wasm32"))]
use clap::Parser;

#[cfg(not(target_arch = "wasm32"))]
use nao_datagen::{
    Settings,
    consts::nodes,
    controller::Controller,
    platform::HeadlessWorld,
    recorder::DirectoryRecorder,
    sim::OBSTACLE_ROBOT_NAME,
};

/// Robots that carry a dataset controller in the standard worlds
#[cfg(not(target_arch = "wasm32"))]
const ROBOTS: [&str; 4] = [
    nodes::LEFT_PLAYER,
    nodes::MIDDLE_PLAYER,
    nodes::RIGHT_PLAYER,
    OBSTACLE_ROBOT_NAME,
];

#[cfg(not(target_arch = "wasm32"))]
#[derive(Parser, Debug)]
#[command(name = "nao-datagen")]
#[command(about = "Randomize a NAO soccer scene and record labeled frames", long_about = None)]
struct Cli {
    /// Settings JSON file (defaults are used when omitted)
    settings: Option<PathBuf>,

    /// World file the run was launched with
    world: Option<PathBuf>,
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> ExitCode {
    env_logger::init();
    log::info!("NAO Datagen (native) starting...");

    let cli = Cli::parse();
    let settings = Settings::load_or_default(cli.settings.as_deref());

    let mut world = HeadlessWorld::soccer_pitch(settings.time_step_ms);
    if let Some(path) = cli.world {
        world = world.with_world(path);
    }
    match settings.duration_secs {
        Some(secs) => world = world.with_duration(secs),
        None => log::info!("No duration set, running until stopped"),
    }

    let mut controllers = Vec::with_capacity(ROBOTS.len());
    for robot in ROBOTS {
        let recorder = DirectoryRecorder::new(&settings.output_root).dry_run(settings.dry_run);
        match Controller::startup(&settings, robot, &mut world, recorder) {
            Ok(controller) => controllers.push(controller),
            Err(err) if err.is_fatal() => {
                log::error!("{robot}: {err}");
                for controller in controllers.iter_mut() {
                    controller.finish(&mut world);
                }
                return ExitCode::FAILURE;
            }
            Err(err) => log::warn!("{robot}: {err}"),
        }
    }

    let ticks = world.run_lockstep(&mut controllers);

    let mut frames = 0;
    for controller in controllers.iter_mut() {
        controller.finish(&mut world);
        frames += controller.session.frame_index();
    }
    log::info!("Done: {frames} frames in {ticks} ticks");
    ExitCode::SUCCESS
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No headless runner on the web target
}
