//! Timed return to identity rotation and rest.

use glam::{Quat, Vec3};

use crate::body::CraftBody;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TweenStep {
    Running,
    Finished,
}

/// Blends the craft from its state at invocation to identity rotation and
/// zero velocity over `duration` seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResetTween {
    initial_rotation: Quat,
    initial_linear: Vec3,
    initial_angular: Vec3,
    elapsed: f32,
    duration: f32,
}

impl ResetTween {
    /// Capture the body's current rotation and velocities.
    pub fn begin(body: &impl CraftBody, duration: f32) -> Self {
        Self {
            initial_rotation: body.rotation(),
            initial_linear: body.linear_velocity(),
            initial_angular: body.angular_velocity(),
            elapsed: 0.0,
            duration,
        }
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Fraction of the duration covered so far, in [0, 1].
    pub fn progress(&self) -> f32 {
        (self.elapsed / self.duration).clamp(0.0, 1.0)
    }

    /// Rotation, linear and angular velocity at blend parameter `t`.
    pub fn sample(&self, t: f32) -> (Quat, Vec3, Vec3) {
        let t = t.clamp(0.0, 1.0);
        (
            self.initial_rotation.slerp(Quat::IDENTITY, t),
            self.initial_linear.lerp(Vec3::ZERO, t),
            self.initial_angular.lerp(Vec3::ZERO, t),
        )
    }

    /// Write the blended state for the current elapsed time, then advance it
    /// by `dt`. Once the duration has passed, snap to rest and finish.
    pub fn step(&mut self, body: &mut impl CraftBody, dt: f32) -> TweenStep {
        if self.elapsed >= self.duration {
            body.set_rotation(Quat::IDENTITY);
            body.halt();
            return TweenStep::Finished;
        }

        let (rotation, linear, angular) = self.sample(self.elapsed / self.duration);
        body.set_rotation(rotation);
        body.set_linear_velocity(linear);
        body.set_angular_velocity(angular);
        self.elapsed += dt;
        TweenStep::Running
    }
}
