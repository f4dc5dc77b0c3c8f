//! Space/surface region tracking and the surface atmosphere fade.

use engine_core::{TargetBody, Vec3};

use crate::config::FlightConfig;

/// Fade changes smaller than this are not reported.
const FADE_EPSILON: f32 = 1.0e-3;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Region {
    /// Open space around the target body.
    #[default]
    Space,
    /// Local surface area of the target body.
    Surface,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneSettings {
    /// Entering space-to-surface: distance above the target's surface.
    pub entry_altitude: f32,
    pub surface_height_limit: f32,
    pub surface_spawn: Vec3,
    pub space_return: Vec3,
    pub atmosphere_reference_height: f32,
    pub atmosphere_fade_distance: f32,
}

impl SceneSettings {
    pub fn from_config(config: &FlightConfig) -> Self {
        Self {
            entry_altitude: config.landing_threshold,
            surface_height_limit: config.surface_height_limit,
            surface_spawn: Vec3::from_array(config.surface_spawn),
            space_return: Vec3::from_array(config.space_return),
            atmosphere_reference_height: config.atmosphere_reference_height,
            atmosphere_fade_distance: config.atmosphere_fade_distance,
        }
    }
}

/// A region switch; the craft should be moved to `spawn` and brought to rest.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneChange {
    pub from: Region,
    pub to: Region,
    pub spawn: Vec3,
}

/// Exterior atmosphere intensity: 0 at or below the reference height,
/// rising to 1 over `fade_distance` above it.
pub fn fade_amount(height: f32, reference: f32, fade_distance: f32) -> f32 {
    ((height - reference) / fade_distance).clamp(0.0, 1.0)
}

#[derive(Debug, Clone)]
pub struct SceneTracker {
    region: Region,
    settings: SceneSettings,
    last_fade: Option<f32>,
}

impl SceneTracker {
    pub fn new(settings: SceneSettings) -> Self {
        Self {
            region: Region::Space,
            settings,
            last_fade: None,
        }
    }

    pub fn region(&self) -> Region {
        self.region
    }

    /// Check the craft position against the current region's exit condition.
    pub fn check(&mut self, position: Vec3, target: Option<&TargetBody>) -> Option<SceneChange> {
        let change = match self.region {
            Region::Space => {
                let target = target?;
                let altitude = target.distance_to_center(position) - target.radius;
                log::trace!("altitude above target {:.2}", altitude);
                (altitude <= self.settings.entry_altitude).then_some(SceneChange {
                    from: Region::Space,
                    to: Region::Surface,
                    spawn: self.settings.surface_spawn,
                })
            }
            Region::Surface => (position.y >= self.settings.surface_height_limit).then_some(SceneChange {
                from: Region::Surface,
                to: Region::Space,
                spawn: self.settings.space_return,
            }),
        }?;

        log::info!("Switching region {:?} -> {:?}", change.from, change.to);
        self.region = change.to;
        self.last_fade = None;
        Some(change)
    }

    /// New atmosphere fade for `position`, if on the surface and it changed
    /// since the last report.
    pub fn atmosphere_fade(&mut self, position: Vec3) -> Option<f32> {
        if self.region != Region::Surface {
            return None;
        }
        let fade = fade_amount(
            position.y,
            self.settings.atmosphere_reference_height,
            self.settings.atmosphere_fade_distance,
        );
        match self.last_fade {
            Some(last) if (last - fade).abs() < FADE_EPSILON => None,
            _ => {
                self.last_fade = Some(fade);
                Some(fade)
            }
        }
    }
}
