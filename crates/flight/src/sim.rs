//! Headless host for the flight controller: entities, physics and the tick loop.

use engine_core::{Craft, CraftState, Entity, Planet, Quat, TargetBody, Time, Transform, Vec3, World};
use input::ControlInput;
use physics::{CraftBodySettings, PhysicsBody, PhysicsWorld, RigidBodyHandle};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::body::RapierCraft;
use crate::config::FlightConfig;
use crate::controller::FlightController;
use crate::error::FlightError;
use crate::events::{FlightEvent, ModeKind};
use crate::scene::{Region, SceneSettings, SceneTracker};

pub struct Simulation {
    world: World,
    physics: PhysicsWorld,
    time: Time,
    controller: FlightController,
    scene: SceneTracker,
    craft: Entity,
    planet: Entity,
}

impl Simulation {
    /// Build the world described by `config`: one craft, one planet.
    pub fn new(config: &FlightConfig) -> Result<Self, FlightError> {
        let controller = FlightController::new(config)?;
        let scenario = &config.scenario;

        let mut rng = StdRng::seed_from_u64(scenario.seed);
        let jitter = scenario.spawn_jitter;
        let offset = if jitter > 0.0 {
            Vec3::new(
                rng.gen_range(-jitter..=jitter),
                rng.gen_range(-jitter..=jitter),
                rng.gen_range(-jitter..=jitter),
            )
        } else {
            Vec3::ZERO
        };
        let start = Vec3::from_array(scenario.craft_start) + offset;

        let mut physics = PhysicsWorld::new();
        physics.set_timestep(config.tick_seconds());
        let settings = CraftBodySettings {
            mass: config.craft_mass,
            linear_damping: config.linear_damping,
            angular_damping: config.angular_damping,
            ..Default::default()
        };
        let (body, collider) = physics.add_craft_body(start, Quat::IDENTITY, settings);

        let planet_transform =
            Transform::from_position_scale(Vec3::from_array(scenario.planet_position), scenario.planet_scale);
        let target = TargetBody::from_transform(&planet_transform);
        physics.add_static_sphere(target.position, target.radius);

        let mut world = World::new();
        let craft = world.spawn((Craft, PhysicsBody::with_collider(body, collider)));
        let planet = world.spawn((Planet, planet_transform, target));
        log::info!(
            "Craft at {:?}, planet at {:?} (radius {})",
            start,
            target.position,
            target.radius
        );

        let mut time = Time::new();
        time.set_fixed_rate(config.tick_rate as f64);

        Ok(Self {
            world,
            physics,
            time,
            controller,
            scene: SceneTracker::new(SceneSettings::from_config(config)),
            craft,
            planet,
        })
    }

    fn craft_handle(&self) -> Result<RigidBodyHandle, FlightError> {
        self.world
            .get::<&PhysicsBody>(self.craft)
            .map(|body| body.rigid_body)
            .map_err(|_| FlightError::MissingBody)
    }

    /// The landing target, present only while in space.
    pub fn target(&self) -> Option<TargetBody> {
        if self.scene.region() != Region::Space {
            return None;
        }
        self.world.get::<&TargetBody>(self.planet).ok().map(|t| *t)
    }

    pub fn controller(&self) -> &FlightController {
        &self.controller
    }

    pub fn region(&self) -> Region {
        self.scene.region()
    }

    pub fn time(&self) -> &Time {
        &self.time
    }

    pub fn craft_state(&self) -> Option<CraftState> {
        self.physics.body_state(self.craft_handle().ok()?)
    }

    /// Run one fixed tick: controller, physics step, then region checks.
    pub fn tick(&mut self, input: &ControlInput) -> Result<Vec<FlightEvent>, FlightError> {
        let dt = self.time.fixed_timestep_seconds();
        let handle = self.craft_handle()?;
        let target = self.target();

        let mut events = {
            let mut body = RapierCraft::new(&mut self.physics, handle)?;
            self.controller.tick(input, dt, &mut body, target.as_ref())?
        };

        self.physics.set_timestep(dt);
        self.physics.step();
        self.time.advance_fixed();

        let Some(state) = self.physics.body_state(handle) else {
            return Err(FlightError::MissingBody);
        };
        log::trace!(
            "t={:.3} pos {:?} vel {:?}",
            self.time.elapsed_seconds(),
            state.position,
            state.velocity.linear
        );

        // Sequences own the craft until they finish.
        if self.controller.mode_kind() == ModeKind::Manual {
            if let Some(change) = self.scene.check(state.position, target.as_ref()) {
                self.physics.set_position(handle, change.spawn);
                self.physics.set_linear_velocity(handle, Vec3::ZERO);
                self.physics.set_angular_velocity(handle, Vec3::ZERO);
                events.push(FlightEvent::SceneChanged {
                    from: change.from,
                    to: change.to,
                });
            }
        }

        let position = self
            .physics
            .body_state(handle)
            .map_or(state.position, |s| s.position);
        if let Some(fade) = self.scene.atmosphere_fade(position) {
            events.push(FlightEvent::AtmosphereFade(fade));
        }
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::ViewMode;
    use input::Button;

    fn quiet_config() -> FlightConfig {
        let mut config = FlightConfig::default();
        config.scenario.spawn_jitter = 0.0;
        config
    }

    #[test]
    fn start_position_is_seeded() {
        let config = FlightConfig::default();
        let a = Simulation::new(&config).unwrap().craft_state().unwrap();
        let b = Simulation::new(&config).unwrap().craft_state().unwrap();
        assert_eq!(a.position, b.position);
        assert!(a.position.distance(Vec3::new(0.0, 0.0, 100.0)) <= 2.0 * 3.0_f32.sqrt() + 1.0e-4);
    }

    #[test]
    fn target_comes_from_planet_entity() {
        let sim = Simulation::new(&quiet_config()).unwrap();
        let target = sim.target().unwrap();
        assert_eq!(target.position, Vec3::ZERO);
        assert_eq!(target.radius, 10.0);
    }

    #[test]
    fn ticks_advance_time() {
        let mut sim = Simulation::new(&quiet_config()).unwrap();
        for _ in 0..60 {
            sim.tick(&ControlInput::neutral()).unwrap();
        }
        assert_eq!(sim.time().frame_count(), 60);
        assert!((sim.time().elapsed_seconds() - 1.0).abs() < 1.0e-3);
    }

    #[test]
    fn autopilot_lands_then_switches_to_surface() {
        let mut sim = Simulation::new(&quiet_config()).unwrap();
        let mut events = sim
            .tick(&ControlInput::neutral().with_pressed(Button::RightSecondary))
            .unwrap();
        assert_eq!(sim.controller().mode_kind(), ModeKind::Navigating);

        let mut ticks = 0;
        while sim.region() == Region::Space {
            events.extend(sim.tick(&ControlInput::neutral()).unwrap());
            ticks += 1;
            assert!(ticks < 60 * 60, "never reached the surface");
        }

        assert!(events.contains(&FlightEvent::ModeChanged {
            from: ModeKind::Landing,
            to: ModeKind::Manual
        }));
        assert!(events.contains(&FlightEvent::SceneChanged {
            from: Region::Space,
            to: Region::Surface
        }));
        assert!(events.contains(&FlightEvent::AtmosphereFade(0.0)));
        let state = sim.craft_state().unwrap();
        assert!(state.position.distance(Vec3::new(-1.0, 350.0, 0.0)) < 1.0e-3);
        assert!(sim.target().is_none());
    }

    #[test]
    fn approach_on_surface_still_steps_the_world() {
        let mut config = quiet_config();
        // Start right above the planet so the first tick lands on the surface.
        config.scenario.craft_start = [0.0, 0.0, 12.0];
        let mut sim = Simulation::new(&config).unwrap();
        sim.tick(&ControlInput::neutral()).unwrap();
        assert_eq!(sim.region(), Region::Surface);
        assert_eq!(sim.time().frame_count(), 1);

        let input = ControlInput::neutral()
            .with_pressed(Button::RightSecondary)
            .with_pressed(Button::LeftSecondary);
        let events = sim.tick(&input).unwrap();
        assert_eq!(sim.time().frame_count(), 2);
        assert_eq!(sim.controller().mode_kind(), ModeKind::Manual);
        assert_eq!(sim.controller().view_mode(), ViewMode::ThirdPerson);
        assert!(events.contains(&FlightEvent::ViewModeChanged(ViewMode::ThirdPerson)));
    }
}
