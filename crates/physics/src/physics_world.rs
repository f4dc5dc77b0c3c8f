//! Physics world management with Rapier3D.

use crate::collision::CollisionGroup;
use engine_core::{CraftState, Quat, Vec3, Velocity};
use rapier3d::na::{Quaternion, UnitQuaternion};
use rapier3d::prelude::*;

/// Rigid-body tuning for the craft.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CraftBodySettings {
    pub mass: f32,
    pub linear_damping: f32,
    pub angular_damping: f32,
    /// Radius of the craft's collision sphere.
    pub radius: f32,
}

impl Default for CraftBodySettings {
    fn default() -> Self {
        Self {
            mass: 50.0,
            linear_damping: 1.0,
            angular_damping: 5.0,
            radius: 0.5,
        }
    }
}

pub fn to_vector(v: Vec3) -> Vector<Real> {
    vector![v.x, v.y, v.z]
}

pub fn from_vector(v: &Vector<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

pub fn to_rotation(q: Quat) -> Rotation<Real> {
    UnitQuaternion::from_quaternion(Quaternion::new(q.w, q.x, q.y, q.z))
}

pub fn from_rotation(r: &Rotation<Real>) -> Quat {
    Quat::from_xyzw(r.i, r.j, r.k, r.w)
}

/// Main physics world containing all simulation state.
pub struct PhysicsWorld {
    pub rigid_body_set: RigidBodySet,
    pub collider_set: ColliderSet,
    pub gravity: Vector<Real>,
    pub integration_parameters: IntegrationParameters,
    pub physics_pipeline: PhysicsPipeline,
    pub island_manager: IslandManager,
    pub broad_phase: DefaultBroadPhase,
    pub narrow_phase: NarrowPhase,
    pub impulse_joint_set: ImpulseJointSet,
    pub multibody_joint_set: MultibodyJointSet,
    pub ccd_solver: CCDSolver,
    pub query_pipeline: QueryPipeline,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsWorld {
    /// Create a new physics world without gravity (open space).
    pub fn new() -> Self {
        Self {
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            gravity: vector![0.0, 0.0, 0.0],
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
        }
    }

    /// Set the integration timestep in seconds.
    pub fn set_timestep(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;
    }

    /// Step the physics simulation.
    pub fn step(&mut self) {
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
    }

    /// Add the craft as a dynamic body with a sphere collider carrying its mass.
    pub fn add_craft_body(
        &mut self,
        position: Vec3,
        rotation: Quat,
        settings: CraftBodySettings,
    ) -> (RigidBodyHandle, ColliderHandle) {
        let mut rigid_body = RigidBodyBuilder::dynamic()
            .translation(to_vector(position))
            .linear_damping(settings.linear_damping)
            .angular_damping(settings.angular_damping)
            .ccd_enabled(true)
            .build();
        rigid_body.set_rotation(to_rotation(rotation), false);
        let handle = self.rigid_body_set.insert(rigid_body);

        let collider = ColliderBuilder::ball(settings.radius)
            .mass(settings.mass)
            .collision_groups(CollisionGroup::Craft.interaction_groups())
            .build();
        let collider =
            self.collider_set
                .insert_with_parent(collider, handle, &mut self.rigid_body_set);
        log::debug!(
            "Craft body added at {:?} (mass {}, damping {}/{})",
            position,
            settings.mass,
            settings.linear_damping,
            settings.angular_damping
        );
        (handle, collider)
    }

    /// Add a static sphere (planet) at `center`.
    pub fn add_static_sphere(&mut self, center: Vec3, radius: f32) -> ColliderHandle {
        let collider = ColliderBuilder::ball(radius)
            .translation(to_vector(center))
            .collision_groups(CollisionGroup::Environment.interaction_groups())
            .build();
        self.collider_set.insert(collider)
    }

    /// Mutable access to a body, if it still exists.
    pub fn body_mut(&mut self, handle: RigidBodyHandle) -> Option<&mut RigidBody> {
        self.rigid_body_set.get_mut(handle)
    }

    /// Read position, rotation and velocities of a body.
    pub fn body_state(&self, handle: RigidBodyHandle) -> Option<CraftState> {
        self.rigid_body_set.get(handle).map(|body| CraftState {
            position: from_vector(body.translation()),
            rotation: from_rotation(body.rotation()),
            velocity: Velocity::with_angular(from_vector(body.linvel()), from_vector(body.angvel())),
        })
    }

    /// Teleport a body, keeping its rotation.
    pub fn set_position(&mut self, handle: RigidBodyHandle, position: Vec3) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            body.set_translation(to_vector(position), true);
        }
    }

    pub fn set_linear_velocity(&mut self, handle: RigidBodyHandle, velocity: Vec3) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            body.set_linvel(to_vector(velocity), true);
        }
    }

    pub fn set_angular_velocity(&mut self, handle: RigidBodyHandle, velocity: Vec3) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            body.set_angvel(to_vector(velocity), true);
        }
    }

    /// Remove a rigid body and its colliders.
    pub fn remove_body(&mut self, handle: RigidBodyHandle) {
        self.rigid_body_set.remove(
            handle,
            &mut self.island_manager,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            true,
        );
    }
}
