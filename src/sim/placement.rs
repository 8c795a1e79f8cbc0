//! Actor placement
//!
//! Pure draws (`*_rule`, [`facing_goal`], [`draw_obstacle_pose`],
//! [`sample_ball`], [`LightSetting::draw`]) are kept separate from the
//! `place_*` functions that push the result into the scene graph. A `place_*`
//! call resolves every actor and field it needs before writing anything, so a
//! resolution failure leaves that actor untouched.

use std::f64::consts::PI;

use glam::{DVec2, DVec3};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::region::{Bounds, Region, RegionRule, sample_where};
use crate::consts::*;
use crate::error::ResolutionError;
use crate::heading;
use crate::scene::{AT_REST, FieldValue, Rotation, SceneGraph};

/// Field position of a camera-carrying player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerRole {
    Left,
    Middle,
    Right,
}

pub const LEFT_RULE: RegionRule = RegionRule {
    bounds: Bounds::new((-0.8, 3.0), (0.0, 2.0)),
    include: &[Region::C1],
    exclude: &[Region::C2, Region::C3],
};

pub const RIGHT_RULE: RegionRule = RegionRule {
    bounds: Bounds::new((-0.8, 3.0), (-2.0, 0.0)),
    include: &[Region::C1],
    exclude: &[Region::C2, Region::C3],
};

pub const MIDDLE_RULE: RegionRule = RegionRule {
    bounds: Bounds::new((-0.8, 0.8), (-0.8, 0.8)),
    include: &[Region::C3],
    exclude: &[],
};

/// Visible obstacle spawn area
pub const OBSTACLE_RULE: RegionRule = RegionRule {
    bounds: Bounds::new((0.8, 3.0), (-2.2, 2.2)),
    include: &[Region::C2],
    exclude: &[],
};

const BALL_BOUNDS: Bounds = Bounds::new(FIELD_X, FIELD_Y);

/// Actors the ball has to keep clear of
pub const BALL_OBSTRUCTIONS: [&str; 4] = [
    nodes::LEFT_PLAYER,
    nodes::MIDDLE_PLAYER,
    nodes::RIGHT_PLAYER,
    nodes::OBSTACLE,
];

impl PlayerRole {
    pub const ALL: [PlayerRole; 3] = [PlayerRole::Left, PlayerRole::Middle, PlayerRole::Right];

    /// Label used for the camera-angle directory
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerRole::Left => "left",
            PlayerRole::Middle => "middle",
            PlayerRole::Right => "right",
        }
    }

    /// Scene node this player's controller drives
    pub fn node_name(&self) -> &'static str {
        match self {
            PlayerRole::Left => nodes::LEFT_PLAYER,
            PlayerRole::Middle => nodes::MIDDLE_PLAYER,
            PlayerRole::Right => nodes::RIGHT_PLAYER,
        }
    }

    pub fn rule(&self) -> &'static RegionRule {
        match self {
            PlayerRole::Left => &LEFT_RULE,
            PlayerRole::Middle => &MIDDLE_RULE,
            PlayerRole::Right => &RIGHT_RULE,
        }
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> DVec2 {
        self.rule().sample(rng)
    }
}

/// Rotation that turns a player at `pos` toward [`FACING_TARGET`]
///
/// The heading magnitude is combined with an axis sign chosen from the side
/// of the pitch (y > 0 spins about -z), which is how the recorded datasets
/// were produced.
pub fn facing_goal(pos: DVec2) -> Rotation {
    let angle = heading(pos, FACING_TARGET).abs();
    let axis_z = if pos.y > 0.0 { -1.0 } else { 1.0 };
    Rotation::about_z(axis_z, angle)
}

/// Where the obstacle robot goes this round
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ObstaclePose {
    /// Parked off-stage at [`HIDDEN_OBSTACLE`]
    Hidden,
    /// On the pitch inside C2, spun about +z
    Visible { position: DVec2, angle: f64 },
}

impl ObstaclePose {
    pub fn translation(&self) -> DVec3 {
        match self {
            ObstaclePose::Hidden => HIDDEN_OBSTACLE,
            ObstaclePose::Visible { position, .. } => position.extend(ROBOT_HEIGHT),
        }
    }

    pub fn rotation(&self) -> Rotation {
        match self {
            ObstaclePose::Hidden => Rotation::IDENTITY,
            ObstaclePose::Visible { angle, .. } => Rotation::about_z(1.0, *angle),
        }
    }

    pub fn is_visible(&self) -> bool {
        matches!(self, ObstaclePose::Visible { .. })
    }
}

/// Fair coin between hiding the obstacle and dropping it somewhere in C2
pub fn draw_obstacle_pose<R: Rng + ?Sized>(rng: &mut R) -> ObstaclePose {
    if rng.random_bool(0.5) {
        ObstaclePose::Visible {
            position: OBSTACLE_RULE.sample(rng),
            angle: rng.random_range(-PI..=PI),
        }
    } else {
        ObstaclePose::Hidden
    }
}

/// Ball position at least [`BALL_CLEARANCE`] from every point in `others`
pub fn sample_ball<R: Rng + ?Sized>(rng: &mut R, others: &[DVec2]) -> DVec2 {
    sample_where(rng, &BALL_BOUNDS, |p| {
        others.iter().all(|o| p.distance(*o) >= BALL_CLEARANCE)
    })
}

/// Background light state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LightSetting {
    pub direction: DVec3,
    pub luminosity: f64,
}

impl LightSetting {
    pub fn draw<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut range = |(lo, hi): (f64, f64)| rng.random_range(lo..=hi);
        let direction = DVec3::new(
            range(LIGHT_DIR_X),
            range(LIGHT_DIR_Y),
            range(LIGHT_DIR_Z),
        );
        Self {
            direction,
            luminosity: range(LIGHT_LUMINOSITY),
        }
    }
}

/// Move a player to a fresh spot in its band and turn it toward the goal
pub fn place_player<R: Rng + ?Sized>(
    scene: &mut dyn SceneGraph,
    rng: &mut R,
    role: PlayerRole,
) -> Result<DVec2, ResolutionError> {
    let actor = scene.require(role.node_name())?;
    scene.require_field(actor, fields::TRANSLATION)?;
    scene.require_field(actor, fields::ROTATION)?;

    let pos = role.sample(rng);
    scene.set_field(
        actor,
        fields::TRANSLATION,
        FieldValue::Vec3(pos.extend(ROBOT_HEIGHT)),
    )?;
    scene.set_field(actor, fields::ROTATION, FieldValue::Rotation(facing_goal(pos)))?;
    Ok(pos)
}

/// Hide the obstacle robot or put it on the pitch
pub fn place_obstacle<R: Rng + ?Sized>(
    scene: &mut dyn SceneGraph,
    rng: &mut R,
) -> Result<ObstaclePose, ResolutionError> {
    let actor = scene.require(nodes::OBSTACLE)?;
    scene.require_field(actor, fields::TRANSLATION)?;
    scene.require_field(actor, fields::ROTATION)?;

    let pose = draw_obstacle_pose(rng);
    scene.set_field(actor, fields::TRANSLATION, FieldValue::Vec3(pose.translation()))?;
    scene.set_field(actor, fields::ROTATION, FieldValue::Rotation(pose.rotation()))?;
    Ok(pose)
}

/// Drop the ball clear of every robot that currently resolves, at rest
pub fn place_ball<R: Rng + ?Sized>(
    scene: &mut dyn SceneGraph,
    rng: &mut R,
) -> Result<DVec2, ResolutionError> {
    let ball = scene.require(nodes::BALL)?;
    scene.require_field(ball, fields::TRANSLATION)?;

    let others: Vec<DVec2> = BALL_OBSTRUCTIONS
        .iter()
        .filter_map(|name| scene.ground_position(name).ok())
        .collect();

    let pos = sample_ball(rng, &others);
    scene.set_field(
        ball,
        fields::TRANSLATION,
        FieldValue::Vec3(pos.extend(BALL_HEIGHT)),
    )?;
    scene.set_velocity(ball, AT_REST)?;
    Ok(pos)
}

/// New direction and luminosity for the background light, applied together
pub fn randomize_light<R: Rng + ?Sized>(
    scene: &mut dyn SceneGraph,
    rng: &mut R,
) -> Result<LightSetting, ResolutionError> {
    let light = scene.require(nodes::LIGHT)?;
    scene.require_field(light, fields::DIRECTION)?;
    scene.require_field(light, fields::LUMINOSITY)?;

    let setting = LightSetting::draw(rng);
    scene.set_field(light, fields::DIRECTION, FieldValue::Vec3(setting.direction))?;
    scene.set_field(light, fields::LUMINOSITY, FieldValue::Scalar(setting.luminosity))?;
    Ok(setting)
}
