//! The craft's rigid body as seen by the controller.
//!
//! The controller never owns physics state. It reads and writes it once per
//! tick through [`CraftBody`], which is implemented for a Rapier body in the
//! physics world and for a plain integrator used by tests and dry runs.

use engine_core::{CraftState, Quat, Transform, Vec3, Velocity};
use physics::{from_rotation, from_vector, to_rotation, to_vector, PhysicsWorld, RigidBody, RigidBodyHandle};

use crate::error::FlightError;

/// Accessor/mutator for the controlled rigid body.
pub trait CraftBody {
    fn position(&self) -> Vec3;
    fn rotation(&self) -> Quat;
    fn set_rotation(&mut self, rotation: Quat);
    fn linear_velocity(&self) -> Vec3;
    fn set_linear_velocity(&mut self, velocity: Vec3);
    fn angular_velocity(&self) -> Vec3;
    fn set_angular_velocity(&mut self, velocity: Vec3);
    fn apply_impulse(&mut self, impulse: Vec3);
    fn apply_torque_impulse(&mut self, impulse: Vec3);

    fn transform(&self) -> Transform {
        Transform::from_position_rotation(self.position(), self.rotation())
    }

    /// Zero both velocities.
    fn halt(&mut self) {
        self.set_linear_velocity(Vec3::ZERO);
        self.set_angular_velocity(Vec3::ZERO);
    }
}

/// Rigid body integrated by hand: no damping, no collisions.
///
/// Torque impulses treat the inertia tensor as `mass * I`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KinematicBody {
    pub state: CraftState,
    pub mass: f32,
}

impl KinematicBody {
    pub fn new(position: Vec3, mass: f32) -> Self {
        Self {
            state: CraftState {
                position,
                ..Default::default()
            },
            mass,
        }
    }

    /// Advance position and rotation by `dt` seconds.
    pub fn integrate(&mut self, dt: f32) {
        let v = self.state.velocity;
        self.state.position += v.linear * dt;
        let spin = Quat::from_scaled_axis(v.angular * dt);
        self.state.rotation = (spin * self.state.rotation).normalize();
    }
}

impl CraftBody for KinematicBody {
    fn position(&self) -> Vec3 {
        self.state.position
    }

    fn rotation(&self) -> Quat {
        self.state.rotation
    }

    fn set_rotation(&mut self, rotation: Quat) {
        self.state.rotation = rotation;
    }

    fn linear_velocity(&self) -> Vec3 {
        self.state.velocity.linear
    }

    fn set_linear_velocity(&mut self, velocity: Vec3) {
        self.state.velocity.linear = velocity;
    }

    fn angular_velocity(&self) -> Vec3 {
        self.state.velocity.angular
    }

    fn set_angular_velocity(&mut self, velocity: Vec3) {
        self.state.velocity.angular = velocity;
    }

    fn apply_impulse(&mut self, impulse: Vec3) {
        self.state.velocity.linear += impulse / self.mass;
    }

    fn apply_torque_impulse(&mut self, impulse: Vec3) {
        self.state.velocity.angular += impulse / self.mass;
    }
}

/// A craft body living in the Rapier world, borrowed for one tick.
pub struct RapierCraft<'a> {
    body: &'a mut RigidBody,
}

impl<'a> RapierCraft<'a> {
    /// Borrow the body, failing if it was removed from the world.
    pub fn new(world: &'a mut PhysicsWorld, handle: RigidBodyHandle) -> Result<Self, FlightError> {
        let body = world.body_mut(handle).ok_or(FlightError::MissingBody)?;
        Ok(Self { body })
    }

    pub fn velocity(&self) -> Velocity {
        Velocity::with_angular(self.linear_velocity(), self.angular_velocity())
    }
}

impl CraftBody for RapierCraft<'_> {
    fn position(&self) -> Vec3 {
        from_vector(self.body.translation())
    }

    fn rotation(&self) -> Quat {
        from_rotation(self.body.rotation())
    }

    fn set_rotation(&mut self, rotation: Quat) {
        self.body.set_rotation(to_rotation(rotation), true);
    }

    fn linear_velocity(&self) -> Vec3 {
        from_vector(self.body.linvel())
    }

    fn set_linear_velocity(&mut self, velocity: Vec3) {
        self.body.set_linvel(to_vector(velocity), true);
    }

    fn angular_velocity(&self) -> Vec3 {
        from_vector(self.body.angvel())
    }

    fn set_angular_velocity(&mut self, velocity: Vec3) {
        self.body.set_angvel(to_vector(velocity), true);
    }

    fn apply_impulse(&mut self, impulse: Vec3) {
        self.body.apply_impulse(to_vector(impulse), true);
    }

    fn apply_torque_impulse(&mut self, impulse: Vec3) {
        self.body.apply_torque_impulse(to_vector(impulse), true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use physics::CraftBodySettings;

    #[test]
    fn kinematic_integrates_velocity() {
        let mut body = KinematicBody::new(Vec3::ZERO, 1.0);
        body.set_linear_velocity(Vec3::new(0.0, 0.0, -10.0));
        body.integrate(0.5);
        assert_eq!(body.position(), Vec3::new(0.0, 0.0, -5.0));
    }

    #[test]
    fn kinematic_impulse_divides_by_mass() {
        let mut body = KinematicBody::new(Vec3::ZERO, 50.0);
        body.apply_impulse(Vec3::new(100.0, 0.0, 0.0));
        assert_eq!(body.linear_velocity(), Vec3::new(2.0, 0.0, 0.0));
        body.halt();
        assert!(body.state.velocity.is_zero());
    }

    #[test]
    fn rapier_craft_reads_and_writes_world() {
        let mut world = PhysicsWorld::new();
        let (handle, _) = world.add_craft_body(
            Vec3::new(1.0, 2.0, 3.0),
            Quat::IDENTITY,
            CraftBodySettings::default(),
        );
        let mut craft = RapierCraft::new(&mut world, handle).unwrap();
        assert!((craft.position() - Vec3::new(1.0, 2.0, 3.0)).length() < 1.0e-5);
        craft.set_linear_velocity(Vec3::X);
        craft.set_angular_velocity(Vec3::Y);
        assert!((craft.linear_velocity() - Vec3::X).length() < 1.0e-5);
        let rot = Quat::from_rotation_x(0.3);
        craft.set_rotation(rot);
        assert!(craft.rotation().angle_between(rot) < 1.0e-4);
        craft.halt();
        assert!(craft.velocity().is_zero());
        // Writes land in the world itself.
        let state = world.body_state(handle).unwrap();
        assert!(state.rotation.angle_between(rot) < 1.0e-4);
        assert!(state.velocity.is_zero());
    }

    #[test]
    fn rapier_craft_rejects_removed_body() {
        let mut world = PhysicsWorld::new();
        let (handle, _) =
            world.add_craft_body(Vec3::ZERO, Quat::IDENTITY, CraftBodySettings::default());
        world.remove_body(handle);
        assert!(matches!(
            RapierCraft::new(&mut world, handle),
            Err(FlightError::MissingBody)
        ));
    }
}
