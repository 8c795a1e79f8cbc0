//! Scene-graph access
//!
//! The simulator owns every actor; controllers only see them through
//! [`SceneGraph`]. Actors are looked up by name on every call, so a node that
//! disappears (or appears late) is handled naturally on the next tick.

use std::collections::BTreeMap;

use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};

use crate::consts::{fields, nodes};
use crate::error::ResolutionError;

/// Opaque reference to a resolved actor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorHandle(pub u32);

/// Axis-angle rotation (the simulator's SFRotation)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rotation {
    pub axis: DVec3,
    pub angle: f64,
}

impl Rotation {
    pub const IDENTITY: Rotation = Rotation::about_z(1.0, 0.0);

    /// Rotation about the vertical axis; `axis_z` is the signed z component
    pub const fn about_z(axis_z: f64, angle: f64) -> Self {
        Self {
            axis: DVec3::new(0.0, 0.0, axis_z),
            angle,
        }
    }
}

impl Default for Rotation {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Value held by a scene field
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    Vec3(DVec3),
    Rotation(Rotation),
    Scalar(f64),
}

impl FieldValue {
    pub fn kind(&self) -> &'static str {
        match self {
            FieldValue::Vec3(_) => "vector3",
            FieldValue::Rotation(_) => "rotation",
            FieldValue::Scalar(_) => "scalar",
        }
    }
}

/// Linear + angular velocity, as the simulator expects it
pub type Velocity = [f64; 6];

pub const AT_REST: Velocity = [0.0; 6];

/// Scene access needed by the controllers
pub trait SceneGraph {
    /// Look up an actor by its DEF name
    fn resolve(&self, name: &str) -> Option<ActorHandle>;

    /// Read a field; `None` if the actor has no such field
    fn get_field(&self, actor: ActorHandle, field: &str) -> Option<FieldValue>;

    /// Write a field; the field must already exist
    fn set_field(
        &mut self,
        actor: ActorHandle,
        field: &str,
        value: FieldValue,
    ) -> Result<(), ResolutionError>;

    fn set_velocity(&mut self, actor: ActorHandle, velocity: Velocity)
    -> Result<(), ResolutionError>;

    /// Display name used in log messages
    fn actor_name(&self, actor: ActorHandle) -> String;

    fn has_field(&self, actor: ActorHandle, field: &str) -> bool {
        self.get_field(actor, field).is_some()
    }

    fn require(&self, name: &str) -> Result<ActorHandle, ResolutionError> {
        self.resolve(name)
            .ok_or_else(|| ResolutionError::ActorNotFound(name.to_string()))
    }

    fn require_field(&self, actor: ActorHandle, field: &str) -> Result<(), ResolutionError> {
        if self.has_field(actor, field) {
            Ok(())
        } else {
            Err(ResolutionError::FieldNotFound {
                actor: self.actor_name(actor),
                field: field.to_string(),
            })
        }
    }

    /// Read a vector3 field
    fn get_vec3(&self, actor: ActorHandle, field: &str) -> Result<DVec3, ResolutionError> {
        match self.get_field(actor, field) {
            Some(FieldValue::Vec3(v)) => Ok(v),
            Some(other) => Err(ResolutionError::FieldType {
                actor: self.actor_name(actor),
                field: field.to_string(),
                expected: "vector3",
                found: other.kind(),
            }),
            None => Err(ResolutionError::FieldNotFound {
                actor: self.actor_name(actor),
                field: field.to_string(),
            }),
        }
    }

    /// Ground-plane position of a named actor
    fn ground_position(&self, name: &str) -> Result<DVec2, ResolutionError> {
        let actor = self.require(name)?;
        Ok(self.get_vec3(actor, fields::TRANSLATION)?.truncate())
    }
}

/// A single actor held by [`MemoryScene`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryActor {
    pub name: String,
    pub fields: BTreeMap<String, FieldValue>,
    pub velocity: Velocity,
}

impl MemoryActor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: BTreeMap::new(),
            velocity: AT_REST,
        }
    }

    pub fn with_field(mut self, field: &str, value: FieldValue) -> Self {
        self.fields.insert(field.to_string(), value);
        self
    }

    /// A robot or ball: translation + rotation
    pub fn body(name: impl Into<String>, translation: DVec3) -> Self {
        Self::new(name)
            .with_field(fields::TRANSLATION, FieldValue::Vec3(translation))
            .with_field(fields::ROTATION, FieldValue::Rotation(Rotation::IDENTITY))
    }
}

/// In-memory scene graph (headless runs and tests)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryScene {
    actors: Vec<MemoryActor>,
}

impl MemoryScene {
    pub fn new() -> Self {
        Self { actors: Vec::new() }
    }

    /// The pitch used for dataset collection: three players, the obstacle
    /// robot (parked off-stage), the ball and the background light
    pub fn soccer_pitch() -> Self {
        use crate::consts::{BALL_HEIGHT, HIDDEN_OBSTACLE, ROBOT_HEIGHT};

        let mut scene = Self::new();
        scene.insert(MemoryActor::body(
            nodes::LEFT_PLAYER,
            DVec3::new(0.0, 2.5, ROBOT_HEIGHT),
        ));
        scene.insert(MemoryActor::body(
            nodes::MIDDLE_PLAYER,
            DVec3::new(0.0, 0.0, ROBOT_HEIGHT),
        ));
        scene.insert(MemoryActor::body(
            nodes::RIGHT_PLAYER,
            DVec3::new(0.0, -2.5, ROBOT_HEIGHT),
        ));
        scene.insert(MemoryActor::body(nodes::OBSTACLE, HIDDEN_OBSTACLE));
        scene.insert(MemoryActor::body(
            nodes::BALL,
            DVec3::new(2.0, 0.0, BALL_HEIGHT),
        ));
        scene.insert(
            MemoryActor::new(nodes::LIGHT)
                .with_field(
                    fields::DIRECTION,
                    FieldValue::Vec3(DVec3::new(0.0, -1.0, 0.0)),
                )
                .with_field(fields::LUMINOSITY, FieldValue::Scalar(1.0)),
        );
        scene
    }

    /// Add an actor (replacing any actor with the same name)
    pub fn insert(&mut self, actor: MemoryActor) -> ActorHandle {
        if let Some(idx) = self.actors.iter().position(|a| a.name == actor.name) {
            self.actors[idx] = actor;
            return ActorHandle(idx as u32);
        }
        self.actors.push(actor);
        ActorHandle((self.actors.len() - 1) as u32)
    }

    /// Drop an actor; its handle slot stays reserved so other handles remain valid
    pub fn remove(&mut self, name: &str) {
        if let Some(actor) = self.actors.iter_mut().find(|a| a.name == name) {
            actor.name.clear();
            actor.fields.clear();
        }
    }

    pub fn actor(&self, name: &str) -> Option<&MemoryActor> {
        self.actors.iter().find(|a| !name.is_empty() && a.name == name)
    }

    pub fn actor_mut(&mut self, name: &str) -> Option<&mut MemoryActor> {
        self.actors
            .iter_mut()
            .find(|a| !name.is_empty() && a.name == name)
    }

    /// Convenience for setup and assertions
    pub fn translation(&self, name: &str) -> Option<DVec3> {
        match self.actor(name)?.fields.get(fields::TRANSLATION)? {
            FieldValue::Vec3(v) => Some(*v),
            _ => None,
        }
    }

    pub fn set_translation(&mut self, name: &str, pos: DVec3) {
        if let Some(actor) = self.actor_mut(name) {
            actor
                .fields
                .insert(fields::TRANSLATION.to_string(), FieldValue::Vec3(pos));
        }
    }

    fn slot(&self, actor: ActorHandle) -> Result<&MemoryActor, ResolutionError> {
        self.actors
            .get(actor.0 as usize)
            .filter(|a| !a.name.is_empty())
            .ok_or_else(|| ResolutionError::ActorNotFound(format!("#{}", actor.0)))
    }
}

impl SceneGraph for MemoryScene {
    fn resolve(&self, name: &str) -> Option<ActorHandle> {
        if name.is_empty() {
            return None;
        }
        self.actors
            .iter()
            .position(|a| a.name == name)
            .map(|idx| ActorHandle(idx as u32))
    }

    fn get_field(&self, actor: ActorHandle, field: &str) -> Option<FieldValue> {
        self.slot(actor).ok()?.fields.get(field).copied()
    }

    fn set_field(
        &mut self,
        actor: ActorHandle,
        field: &str,
        value: FieldValue,
    ) -> Result<(), ResolutionError> {
        let name = self.slot(actor)?.name.clone();
        let slot = self
            .actors
            .get_mut(actor.0 as usize)
            .and_then(|a| a.fields.get_mut(field))
            .ok_or_else(|| ResolutionError::FieldNotFound {
                actor: name.clone(),
                field: field.to_string(),
            })?;
        if std::mem::discriminant(slot) != std::mem::discriminant(&value) {
            return Err(ResolutionError::FieldType {
                actor: name,
                field: field.to_string(),
                expected: slot.kind(),
                found: value.kind(),
            });
        }
        *slot = value;
        Ok(())
    }

    fn set_velocity(
        &mut self,
        actor: ActorHandle,
        velocity: Velocity,
    ) -> Result<(), ResolutionError> {
        self.slot(actor)?;
        self.actors[actor.0 as usize].velocity = velocity;
        Ok(())
    }

    fn actor_name(&self, actor: ActorHandle) -> String {
        self.actors
            .get(actor.0 as usize)
            .map(|a| a.name.clone())
            .unwrap_or_else(|| format!("#{}", actor.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pitch_has_every_actor() {
        let scene = MemoryScene::soccer_pitch();
        for name in [
            nodes::LEFT_PLAYER,
            nodes::MIDDLE_PLAYER,
            nodes::RIGHT_PLAYER,
            nodes::OBSTACLE,
            nodes::BALL,
            nodes::LIGHT,
        ] {
            assert!(scene.resolve(name).is_some(), "missing {name}");
        }
    }

    #[test]
    fn test_set_field_rejects_unknown_field() {
        let mut scene = MemoryScene::soccer_pitch();
        let light = scene.resolve(nodes::LIGHT).unwrap();
        let err = scene
            .set_field(light, fields::TRANSLATION, FieldValue::Vec3(DVec3::ZERO))
            .unwrap_err();
        assert!(matches!(err, ResolutionError::FieldNotFound { .. }));
    }

    #[test]
    fn test_set_field_rejects_wrong_kind() {
        let mut scene = MemoryScene::soccer_pitch();
        let ball = scene.resolve(nodes::BALL).unwrap();
        let err = scene
            .set_field(ball, fields::TRANSLATION, FieldValue::Scalar(1.0))
            .unwrap_err();
        assert!(matches!(err, ResolutionError::FieldType { .. }));
    }

    #[test]
    fn test_removed_actor_no_longer_resolves() {
        let mut scene = MemoryScene::soccer_pitch();
        let ball = scene.resolve(nodes::BALL).unwrap();
        scene.remove(nodes::BALL);
        assert!(scene.resolve(nodes::BALL).is_none());
        assert!(scene.get_field(ball, fields::TRANSLATION).is_none());
        // Other handles are untouched
        assert!(scene.ground_position(nodes::OBSTACLE).is_ok());
    }
}
