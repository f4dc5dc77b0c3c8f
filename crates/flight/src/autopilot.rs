//! Approach-and-land autopilot.
//!
//! The sequence flies straight at a landing point hovering `surface_offset`
//! above the target's surface, hands over to a slower descent once within
//! `landing_threshold`, aligns the craft with the surface normal and stops.
//! Velocity is overridden directly; no forces are involved.

use engine_core::{look_rotation, TargetBody, Vec3};

use crate::body::CraftBody;
use crate::config::FlightConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AutopilotSettings {
    pub approach_speed: f32,
    pub landing_speed: f32,
    pub landing_threshold: f32,
    pub surface_offset: f32,
    pub rotation_speed: f32,
}

impl AutopilotSettings {
    pub fn from_config(config: &FlightConfig) -> Self {
        Self {
            approach_speed: config.approach_speed,
            landing_speed: config.landing_speed,
            landing_threshold: config.landing_threshold,
            surface_offset: config.surface_offset,
            rotation_speed: config.rotation_speed,
        }
    }
}

/// Result of one approach tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigateStep {
    Continue,
    /// Within the landing threshold; descent should begin.
    ReachedThreshold,
    /// Manual landing took over; velocity has been zeroed.
    Cancelled,
}

/// Result of one descent tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LandStep {
    Continue,
    Touchdown,
}

/// Landing point on the line from the target centre towards the craft, at
/// `radius + surface_offset` from the centre. `fallback` is used as the
/// outward direction when the craft sits exactly at the centre.
pub fn landing_point(craft: Vec3, target: &TargetBody, surface_offset: f32, fallback: Vec3) -> Vec3 {
    let outward = (craft - target.position).try_normalize().unwrap_or(fallback);
    target.position + outward * (target.radius + surface_offset)
}

/// Saved state of a running approach-and-land sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Approach {
    pub target: TargetBody,
    pub landing_point: Vec3,
    /// Last valid direction of travel, reused when the craft sits on the
    /// landing point.
    heading: Vec3,
}

impl Approach {
    pub fn begin(body: &impl CraftBody, target: &TargetBody, settings: &AutopilotSettings) -> Self {
        let forward = body.transform().forward();
        let landing_point = landing_point(body.position(), target, settings.surface_offset, -forward);
        let heading = (landing_point - body.position())
            .try_normalize()
            .unwrap_or(forward);
        log::debug!(
            "approach to {:?} (target centre {:?}, radius {})",
            landing_point,
            target.position,
            target.radius
        );
        Self {
            target: *target,
            landing_point,
            heading,
        }
    }

    pub fn distance(&self, body: &impl CraftBody) -> f32 {
        body.position().distance(self.landing_point)
    }

    fn heading_from(&mut self, position: Vec3) -> Vec3 {
        match (self.landing_point - position).try_normalize() {
            Some(dir) => {
                self.heading = dir;
                dir
            }
            None => self.heading,
        }
    }

    /// Fly towards the landing point, turning to face it.
    pub fn navigate_step(
        &mut self,
        body: &mut impl CraftBody,
        settings: &AutopilotSettings,
        dt: f32,
        manual_land: bool,
    ) -> NavigateStep {
        if self.distance(body) <= settings.landing_threshold {
            body.set_linear_velocity(Vec3::ZERO);
            return NavigateStep::ReachedThreshold;
        }

        let dir = self.heading_from(body.position());
        body.set_linear_velocity(dir * settings.approach_speed);

        let up = body.transform().up();
        if let Some(facing) = look_rotation(dir, up) {
            let t = (dt * settings.rotation_speed).min(1.0);
            body.set_rotation(body.rotation().slerp(facing, t));
        }

        if manual_land {
            body.set_linear_velocity(Vec3::ZERO);
            return NavigateStep::Cancelled;
        }
        NavigateStep::Continue
    }

    /// Descend onto the landing point, easing into alignment with the
    /// surface normal.
    pub fn land_step(&mut self, body: &mut impl CraftBody, settings: &AutopilotSettings, dt: f32) -> LandStep {
        let distance = self.distance(body);
        if distance <= settings.surface_offset {
            body.halt();
            return LandStep::Touchdown;
        }

        let position = body.position();
        let dir = self.heading_from(position);
        body.set_linear_velocity(dir * settings.landing_speed);

        let axes = body.transform();
        let normal = (position - self.target.position)
            .try_normalize()
            .unwrap_or(axes.up());
        // Tangent to the surface, perpendicular to the craft's right axis.
        let along_surface = normal.cross(axes.right());
        match look_rotation(along_surface, normal) {
            Some(aligned) => {
                let proximity = (distance / settings.surface_offset).clamp(0.0, 1.0);
                let t = (settings.rotation_speed * dt * proximity).min(1.0);
                body.set_rotation(body.rotation().slerp(aligned, t));
            }
            None => log::warn!("craft right axis is parallel to the surface normal; holding attitude"),
        }

        if self.distance(body) <= settings.surface_offset {
            body.halt();
        }
        LandStep::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::KinematicBody;

    fn settings() -> AutopilotSettings {
        AutopilotSettings::from_config(&FlightConfig::default())
    }

    fn planet() -> TargetBody {
        TargetBody::new(Vec3::ZERO, 10.0)
    }

    #[test]
    fn landing_point_example() {
        let p = landing_point(Vec3::new(0.0, 0.0, 100.0), &planet(), 1.5, -Vec3::Z);
        assert!((p - Vec3::new(0.0, 0.0, 11.5)).length() < 1.0e-5);
    }

    #[test]
    fn landing_point_distance_is_radius_plus_offset() {
        let target = TargetBody::new(Vec3::new(5.0, -3.0, 2.0), 7.0);
        for craft in [
            Vec3::new(100.0, 40.0, -20.0),
            Vec3::new(-3.0, 0.5, 60.0),
            Vec3::new(5.0, 200.0, 2.0),
        ] {
            let p = landing_point(craft, &target, 2.0, Vec3::X);
            assert!((p.distance(target.position) - 9.0).abs() < 1.0e-4);
            // On the segment between centre and craft.
            let along = (craft - target.position).normalize();
            assert!(((p - target.position).normalize() - along).length() < 1.0e-4);
        }
    }

    #[test]
    fn landing_point_at_centre_uses_fallback() {
        let p = landing_point(Vec3::ZERO, &planet(), 1.5, -Vec3::Z);
        assert!((p - Vec3::new(0.0, 0.0, -11.5)).length() < 1.0e-5);
    }

    #[test]
    fn navigate_sets_approach_velocity() {
        let body = KinematicBody::new(Vec3::new(0.0, 0.0, 100.0), 50.0);
        let s = settings();
        let mut approach = Approach::begin(&body, &planet(), &s);
        let mut body = body;
        assert_eq!(approach.navigate_step(&mut body, &s, 1.0 / 60.0, false), NavigateStep::Continue);
        assert!((body.linear_velocity() - Vec3::new(0.0, 0.0, -10.0)).length() < 1.0e-4);
    }

    #[test]
    fn navigate_turns_towards_landing_point() {
        let mut body = KinematicBody::new(Vec3::new(100.0, 0.0, 0.0), 50.0);
        let s = settings();
        let mut approach = Approach::begin(&body, &planet(), &s);
        for _ in 0..30 {
            approach.navigate_step(&mut body, &s, 1.0 / 60.0, false);
        }
        assert!((body.transform().forward() - -Vec3::X).length() < 1.0e-3);
    }

    #[test]
    fn manual_land_cancels_with_zero_velocity() {
        let mut body = KinematicBody::new(Vec3::new(0.0, 0.0, 100.0), 50.0);
        let s = settings();
        let mut approach = Approach::begin(&body, &planet(), &s);
        assert_eq!(approach.navigate_step(&mut body, &s, 1.0 / 60.0, true), NavigateStep::Cancelled);
        assert_eq!(body.linear_velocity(), Vec3::ZERO);
    }

    #[test]
    fn threshold_hands_over_with_zero_velocity() {
        let mut body = KinematicBody::new(Vec3::new(0.0, 0.0, 15.0), 50.0);
        body.set_linear_velocity(Vec3::new(0.0, 0.0, -10.0));
        let s = settings();
        let mut approach = Approach::begin(&body, &planet(), &s);
        // 3.5 from the landing point, inside the 5.0 threshold.
        assert_eq!(
            approach.navigate_step(&mut body, &s, 1.0 / 60.0, false),
            NavigateStep::ReachedThreshold
        );
        assert_eq!(body.linear_velocity(), Vec3::ZERO);
    }

    #[test]
    fn descent_moves_at_landing_speed_and_aligns() {
        let mut body = KinematicBody::new(Vec3::new(0.0, 4.0, 15.0), 50.0);
        let s = settings();
        let mut approach = Approach::begin(&body, &planet(), &s);
        let dt = 1.0 / 60.0;
        assert_eq!(approach.land_step(&mut body, &s, dt), LandStep::Continue);
        assert!((body.linear_velocity().length() - 5.0).abs() < 1.0e-4);

        let mut ticks = 0;
        loop {
            body.integrate(dt);
            if approach.land_step(&mut body, &s, dt) == LandStep::Touchdown {
                break;
            }
            ticks += 1;
            assert!(ticks < 1000, "descent never finished");
        }
        assert!(approach.distance(&body) <= s.surface_offset);
        assert!(body.state.velocity.is_zero());
        // Up axis follows the surface normal.
        let normal = body.position().normalize();
        assert!(body.transform().up().dot(normal) > 0.99);
    }
}
