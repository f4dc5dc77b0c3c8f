//! Starlander - headless flight controller demo with a scripted pilot

use anyhow::Result;
use std::path::PathBuf;

use flight::scenario::{self, ScenarioPlayer};
use flight::{default_config_path, FlightConfig, ModeKind, Simulation};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("╔══════════════════════════════════════════════════════════╗");
    println!("║                       Starlander                         ║");
    println!("╠══════════════════════════════════════════════════════════╣");
    println!("║  CONTROLS (scripted):                                    ║");
    println!("║    W/S        - Thrust        │  A/D      - Yaw          ║");
    println!("║    Up/Down    - Pitch         │  Left/Right - Roll       ║");
    println!("║    Shift      - Boost         │  Ctrl     - Brake        ║");
    println!("║    R          - Reset         │  L        - Autopilot    ║");
    println!("║    M          - Land now      │  V        - Toggle view  ║");
    println!("╚══════════════════════════════════════════════════════════╝");

    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path);
    log::info!("Loading config from {}", path.display());
    let config = FlightConfig::load(&path)?;

    let mut sim = Simulation::new(&config)?;
    let mut pilot = ScenarioPlayer::new(scenario::demo());

    let dt = config.tick_seconds();
    let max_ticks = (config.scenario.max_seconds * config.tick_rate).ceil() as u64;

    for _ in 0..max_ticks {
        let input = pilot.next_input(dt);
        for event in sim.tick(&input)? {
            log::info!("{}", event);
        }

        if pilot.is_finished() && sim.controller().mode_kind() == ModeKind::Manual {
            break;
        }
    }

    if let Some(state) = sim.craft_state() {
        log::info!(
            "Finished after {:.2}s in {:?}: position {:?}, speed {:.2}",
            sim.time().elapsed_seconds(),
            sim.region(),
            state.position,
            state.velocity.linear.length()
        );
    }
    Ok(())
}
