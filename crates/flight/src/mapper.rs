//! Manual control mapping: sticks and triggers to thrust and torque impulses.

use glam::{FloatExt, Vec3};
use input::ControlInput;

use crate::body::CraftBody;
use crate::config::FlightConfig;

/// Damped response to a control target.
///
/// Recomputed from zero every tick, so this is a fixed fraction of the
/// target rather than a running average.
pub fn smooth(target: f32, smoothing: f32) -> f32 {
    0.0_f32.lerp(target, smoothing)
}

/// Impulses produced by one tick of manual input.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ManualCommand {
    pub impulse: Vec3,
    pub torque_impulse: Vec3,
}

impl ManualCommand {
    pub fn is_zero(&self) -> bool {
        self.impulse == Vec3::ZERO && self.torque_impulse == Vec3::ZERO
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ManualMapper {
    pub thrust: f32,
    pub rotation_speed: f32,
    pub pitch_speed: f32,
    pub large_acceleration: f32,
    pub smoothing: f32,
}

impl ManualMapper {
    pub fn from_config(config: &FlightConfig) -> Self {
        Self {
            thrust: config.thrust,
            rotation_speed: config.rotation_speed,
            pitch_speed: config.pitch_speed,
            large_acceleration: config.large_acceleration,
            smoothing: config.smoothing,
        }
    }

    /// Compute this tick's impulses in the frame of `body`.
    ///
    /// Right stick: y thrusts along forward, x yaws right. Left stick: y
    /// pitches the nose up, x rolls the right wing up. Right trigger accelerates and left
    /// trigger brakes along forward, on top of stick thrust. Features the
    /// device did not report contribute nothing.
    pub fn command(&self, input: &ControlInput, body: &impl CraftBody, dt: f32) -> ManualCommand {
        let axes = body.transform();
        let (forward, right, up) = (axes.forward(), axes.right(), axes.up());
        let mut force = Vec3::ZERO;
        let mut torque = Vec3::ZERO;

        if let Some(stick) = input.right_stick {
            force += forward * smooth(stick.y * self.thrust, self.smoothing);
            // Positive rotation about up turns the nose left.
            torque += up * -smooth(stick.x * self.rotation_speed, self.smoothing);
        }

        if let Some(stick) = input.left_stick {
            // Positive rotation about right lifts the nose.
            torque += right * smooth(stick.y * self.pitch_speed, self.smoothing);
            // Forward is -Z: positive rotation about it drops the right wing.
            torque += forward * -smooth(stick.x * self.rotation_speed, self.smoothing);
        }

        if let Some(trigger) = input.right_trigger {
            force += forward * smooth(trigger * self.large_acceleration, self.smoothing);
        }

        if let Some(trigger) = input.left_trigger {
            force += forward * smooth(-trigger * self.large_acceleration, self.smoothing);
        }

        ManualCommand {
            impulse: force * dt,
            torque_impulse: torque * dt,
        }
    }

    /// Compute and apply this tick's impulses.
    pub fn apply(&self, input: &ControlInput, body: &mut impl CraftBody, dt: f32) -> ManualCommand {
        let command = self.command(input, body, dt);
        if !command.is_zero() {
            log::trace!("manual impulse {:?} torque {:?}", command.impulse, command.torque_impulse);
            body.apply_impulse(command.impulse);
            body.apply_torque_impulse(command.torque_impulse);
        }
        command
    }
}
