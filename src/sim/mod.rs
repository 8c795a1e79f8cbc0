//! Scene randomization core
//!
//! Everything that decides where actors go and when frames are taken lives
//! here. It has no IO of its own:
//! - Scene access only through [`SceneGraph`](crate::scene::SceneGraph)
//! - Time comes in as a parameter
//! - One seeded RNG stream per session

pub mod obstacle;
pub mod phase;
pub mod placement;
pub mod region;
pub mod state;
pub mod tick;

pub use obstacle::{ObstacleFlag, ObstacleTracker};
pub use phase::{Cadence, Phase, PhaseTiming};
pub use placement::{
    LightSetting, ObstaclePose, PlayerRole, facing_goal, place_ball, place_obstacle, place_player,
    randomize_light,
};
pub use region::{Bounds, Region, RegionRule, sample_in};
pub use state::{ControllerRole, OBSTACLE_ROBOT_NAME, Session, instance_seed, wall_clock_seed};
pub use tick::{TickReport, tick};
