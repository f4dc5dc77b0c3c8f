//! Flight tuning and simulator setup. Loaded from `starlander.ron` at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Controller tuning, craft rigid-body parameters and scene limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightConfig {
    /// Stick thrust along the forward axis.
    #[serde(default = "default_thrust")]
    pub thrust: f32,
    /// Yaw and roll torque per unit of stick, also the autopilot's slerp rate.
    #[serde(default = "default_rotation_speed")]
    pub rotation_speed: f32,
    #[serde(default = "default_pitch_speed")]
    pub pitch_speed: f32,
    /// Trigger acceleration (forward on the right trigger, braking on the left).
    #[serde(default = "default_large_acceleration")]
    pub large_acceleration: f32,
    /// Interpolation parameter for manual inputs, in [0, 1].
    #[serde(default = "default_smoothing")]
    pub smoothing: f32,
    /// Seconds the reset tween takes.
    #[serde(default = "default_reset_duration")]
    pub reset_duration: f32,

    #[serde(default = "default_landing_speed")]
    pub landing_speed: f32,
    #[serde(default = "default_approach_speed")]
    pub approach_speed: f32,
    /// Distance to the landing point at which approach hands over to descent.
    #[serde(default = "default_landing_threshold")]
    pub landing_threshold: f32,
    /// Clearance kept above the target's surface.
    #[serde(default = "default_surface_offset")]
    pub surface_offset: f32,

    #[serde(default = "default_craft_mass")]
    pub craft_mass: f32,
    #[serde(default = "default_linear_damping")]
    pub linear_damping: f32,
    #[serde(default = "default_angular_damping")]
    pub angular_damping: f32,

    /// Leaving the surface region above this height returns to space.
    #[serde(default = "default_surface_height_limit")]
    pub surface_height_limit: f32,
    /// Where the craft appears when entering the surface region.
    #[serde(default = "default_surface_spawn")]
    pub surface_spawn: [f32; 3],
    /// Where the craft appears when returning to space.
    #[serde(default = "default_space_return")]
    pub space_return: [f32; 3],
    #[serde(default = "default_atmosphere_reference_height")]
    pub atmosphere_reference_height: f32,
    #[serde(default = "default_atmosphere_fade_distance")]
    pub atmosphere_fade_distance: f32,

    /// Simulation ticks per second.
    #[serde(default = "default_tick_rate")]
    pub tick_rate: f32,

    #[serde(default)]
    pub scenario: ScenarioConfig,
}

/// Setup of the headless simulator run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub planet_position: [f32; 3],
    /// Uniform scale of the planet; its radius is half of this.
    #[serde(default = "default_planet_scale")]
    pub planet_scale: f32,
    #[serde(default = "default_craft_start")]
    pub craft_start: [f32; 3],
    /// Maximum per-axis random offset applied to the craft start.
    #[serde(default = "default_spawn_jitter")]
    pub spawn_jitter: f32,
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Hard stop for the run, in simulated seconds.
    #[serde(default = "default_max_seconds")]
    pub max_seconds: f32,
}

fn default_thrust() -> f32 {
    10.0
}
fn default_rotation_speed() -> f32 {
    50.0
}
fn default_pitch_speed() -> f32 {
    30.0
}
fn default_large_acceleration() -> f32 {
    15.0
}
fn default_smoothing() -> f32 {
    0.1
}
fn default_reset_duration() -> f32 {
    2.0
}
fn default_landing_speed() -> f32 {
    5.0
}
fn default_approach_speed() -> f32 {
    10.0
}
fn default_landing_threshold() -> f32 {
    5.0
}
fn default_surface_offset() -> f32 {
    1.5
}
fn default_craft_mass() -> f32 {
    50.0
}
fn default_linear_damping() -> f32 {
    1.0
}
fn default_angular_damping() -> f32 {
    5.0
}
fn default_surface_height_limit() -> f32 {
    400.0
}
fn default_surface_spawn() -> [f32; 3] {
    [-1.0, 350.0, 0.0]
}
fn default_space_return() -> [f32; 3] {
    [0.0, 0.0, 100.0]
}
fn default_atmosphere_reference_height() -> f32 {
    400.0
}
fn default_atmosphere_fade_distance() -> f32 {
    10.0
}
fn default_tick_rate() -> f32 {
    60.0
}
fn default_planet_scale() -> f32 {
    20.0
}
fn default_craft_start() -> [f32; 3] {
    [0.0, 0.0, 100.0]
}
fn default_spawn_jitter() -> f32 {
    2.0
}
fn default_seed() -> u64 {
    7
}
fn default_max_seconds() -> f32 {
    180.0
}

impl Default for FlightConfig {
    fn default() -> Self {
        Self {
            thrust: default_thrust(),
            rotation_speed: default_rotation_speed(),
            pitch_speed: default_pitch_speed(),
            large_acceleration: default_large_acceleration(),
            smoothing: default_smoothing(),
            reset_duration: default_reset_duration(),
            landing_speed: default_landing_speed(),
            approach_speed: default_approach_speed(),
            landing_threshold: default_landing_threshold(),
            surface_offset: default_surface_offset(),
            craft_mass: default_craft_mass(),
            linear_damping: default_linear_damping(),
            angular_damping: default_angular_damping(),
            surface_height_limit: default_surface_height_limit(),
            surface_spawn: default_surface_spawn(),
            space_return: default_space_return(),
            atmosphere_reference_height: default_atmosphere_reference_height(),
            atmosphere_fade_distance: default_atmosphere_fade_distance(),
            tick_rate: default_tick_rate(),
            scenario: ScenarioConfig::default(),
        }
    }
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            planet_position: [0.0; 3],
            planet_scale: default_planet_scale(),
            craft_start: default_craft_start(),
            spawn_jitter: default_spawn_jitter(),
            seed: default_seed(),
            max_seconds: default_max_seconds(),
        }
    }
}

fn require_positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("must be a positive number, got {}", value),
        })
    }
}

fn require_finite(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("must be a finite number, got {}", value),
        })
    }
}

fn require_finite_point(field: &'static str, point: [f32; 3]) -> Result<(), ConfigError> {
    if point.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("must have finite coordinates, got {:?}", point),
        })
    }
}

fn require_non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("must be zero or positive, got {}", value),
        })
    }
}

impl FlightConfig {
    /// Load config from `path`. A missing file yields the defaults; an
    /// unreadable, malformed or out-of-range file is an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let data = match std::fs::read_to_string(path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No config at {:?}, using defaults", path);
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        let config: Self = ron::from_str(&data).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        log::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Save current config to `path`. Logs on error.
    pub fn save(&self, path: &Path) {
        match ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default()) {
            Ok(s) => {
                if let Err(e) = std::fs::write(path, s) {
                    log::warn!("Could not write config to {:?}: {}", path, e);
                }
            }
            Err(e) => log::warn!("Could not serialize config: {}", e),
        }
    }

    /// Reject values the controller cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_negative("thrust", self.thrust)?;
        require_non_negative("rotation_speed", self.rotation_speed)?;
        require_non_negative("pitch_speed", self.pitch_speed)?;
        require_non_negative("large_acceleration", self.large_acceleration)?;
        if !(0.0..=1.0).contains(&self.smoothing) {
            return Err(ConfigError::Invalid {
                field: "smoothing",
                reason: format!("must be within [0, 1], got {}", self.smoothing),
            });
        }
        require_positive("reset_duration", self.reset_duration)?;
        require_positive("landing_speed", self.landing_speed)?;
        require_positive("approach_speed", self.approach_speed)?;
        require_positive("landing_threshold", self.landing_threshold)?;
        require_positive("surface_offset", self.surface_offset)?;
        require_positive("craft_mass", self.craft_mass)?;
        require_non_negative("linear_damping", self.linear_damping)?;
        require_non_negative("angular_damping", self.angular_damping)?;
        require_finite("surface_height_limit", self.surface_height_limit)?;
        require_finite_point("surface_spawn", self.surface_spawn)?;
        require_finite_point("space_return", self.space_return)?;
        require_finite("atmosphere_reference_height", self.atmosphere_reference_height)?;
        require_positive("atmosphere_fade_distance", self.atmosphere_fade_distance)?;
        require_positive("tick_rate", self.tick_rate)?;
        require_finite_point("scenario.planet_position", self.scenario.planet_position)?;
        require_positive("scenario.planet_scale", self.scenario.planet_scale)?;
        require_finite_point("scenario.craft_start", self.scenario.craft_start)?;
        require_non_negative("scenario.spawn_jitter", self.scenario.spawn_jitter)?;
        require_positive("scenario.max_seconds", self.scenario.max_seconds)?;
        Ok(())
    }

    /// Seconds per tick.
    pub fn tick_seconds(&self) -> f32 {
        1.0 / self.tick_rate
    }
}

/// `starlander.ron` in the current directory.
pub fn default_config_path() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join("starlander.ron")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("starlander-{}-{}.ron", name, std::process::id()))
    }

    #[test]
    fn defaults_are_valid() {
        assert!(FlightConfig::default().validate().is_ok());
    }

    #[test]
    fn missing_file_gives_defaults() {
        let path = temp_path("missing");
        let _ = std::fs::remove_file(&path);
        assert_eq!(FlightConfig::load(&path).unwrap(), FlightConfig::default());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let path = temp_path("partial");
        std::fs::write(&path, "(approach_speed: 20.0, scenario: (seed: 99))").unwrap();
        let config = FlightConfig::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(config.approach_speed, 20.0);
        assert_eq!(config.scenario.seed, 99);
        assert_eq!(config.landing_speed, 5.0);
        assert_eq!(config.scenario.planet_scale, 20.0);
    }

    #[test]
    fn saved_config_loads_back() {
        let path = temp_path("saved");
        let mut config = FlightConfig::default();
        config.surface_offset = 3.0;
        config.save(&path);
        let loaded = FlightConfig::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, config);
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let path = temp_path("malformed");
        std::fs::write(&path, "(thrust: \"lots\")").unwrap();
        let err = FlightConfig::load(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn smoothing_out_of_range_is_rejected() {
        let config = FlightConfig {
            smoothing: 1.5,
            ..FlightConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "smoothing", .. })
        ));
    }

    #[test]
    fn non_finite_positions_are_rejected() {
        let config = FlightConfig {
            surface_height_limit: f32::NAN,
            ..FlightConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "surface_height_limit", .. })
        ));

        let config = FlightConfig {
            space_return: [0.0, f32::INFINITY, 0.0],
            ..FlightConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "space_return", .. })
        ));

        let mut config = FlightConfig::default();
        config.scenario.craft_start = [f32::NAN, 0.0, 100.0];
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "scenario.craft_start", .. })
        ));
    }

    #[test]
    fn nan_in_file_is_rejected_on_load() {
        let path = temp_path("nan");
        std::fs::write(&path, "(atmosphere_reference_height: NaN)").unwrap();
        let err = FlightConfig::load(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(matches!(
            err,
            ConfigError::Invalid { field: "atmosphere_reference_height", .. }
        ));
    }

    #[test]
    fn zero_surface_offset_is_rejected() {
        let config = FlightConfig {
            surface_offset: 0.0,
            ..FlightConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "surface_offset", .. })
        ));
    }
}
