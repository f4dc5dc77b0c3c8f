//! Common ECS components used across the engine.

use glam::{Quat, Vec3};

use crate::Transform;

/// Velocity component for moving entities.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Velocity {
    pub linear: Vec3,
    pub angular: Vec3,
}

impl Velocity {
    pub fn with_angular(linear: Vec3, angular: Vec3) -> Self {
        Self { linear, angular }
    }

    pub fn is_zero(&self) -> bool {
        self.linear == Vec3::ZERO && self.angular == Vec3::ZERO
    }
}

/// Snapshot of a craft's rigid-body state for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CraftState {
    pub position: Vec3,
    pub rotation: Quat,
    pub velocity: Velocity,
}

impl Default for CraftState {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            velocity: Velocity::default(),
        }
    }
}

impl CraftState {
    pub fn transform(&self) -> Transform {
        Transform::from_position_rotation(self.position, self.rotation)
    }
}

/// A body the craft can land on: centre and surface radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetBody {
    pub position: Vec3,
    pub radius: f32,
}

impl TargetBody {
    pub fn new(position: Vec3, radius: f32) -> Self {
        Self { position, radius }
    }

    /// A unit sphere scaled by `transform.scale.x` has radius `scale / 2`.
    pub fn from_transform(transform: &Transform) -> Self {
        Self {
            position: transform.position,
            radius: transform.scale.x * 0.5,
        }
    }

    /// Distance from `point` to the body's centre.
    pub fn distance_to_center(&self, point: Vec3) -> f32 {
        point.distance(self.position)
    }
}

/// Tag component for the player-controlled craft.
#[derive(Debug, Clone, Copy, Default)]
pub struct Craft;

/// Tag component for landable bodies.
#[derive(Debug, Clone, Copy, Default)]
pub struct Planet;
