//! Flight control for Starlander: manual mapping, reset, autopilot approach
//! and landing, plus the headless simulation that hosts them.

pub mod autopilot;
pub mod body;
pub mod config;
pub mod controller;
pub mod error;
pub mod events;
pub mod mapper;
pub mod reset;
pub mod scenario;
pub mod scene;
pub mod sim;

pub use body::{CraftBody, KinematicBody, RapierCraft};
pub use config::{default_config_path, FlightConfig, ScenarioConfig};
pub use controller::{ControllerMode, FlightController};
pub use error::{ConfigError, FlightError};
pub use events::{FlightEvent, ModeKind, ViewMode};
pub use scene::Region;
pub use sim::Simulation;
