//! Fixed-tick driver loop with a scripted demolition session.

use std::time::{Duration, Instant};

use rubble_core::commands::PlayerCommand;
use rubble_core::constants::TICK_RATE;
use rubble_core::enums::{AgentKind, CityKind, WeaponKind};
use rubble_core::state::WorldSnapshot;
use rubble_sim::{SimConfig, SimulationEngine};

/// Nominal duration of one tick.
const TICK_DURATION: Duration = Duration::from_nanos(1_000_000_000 / TICK_RATE as u64);

/// Demo script: a short tour of the arsenal against a waterfront city.
fn scripted_commands(tick: u64) -> Vec<PlayerCommand> {
    match tick {
        30 => vec![PlayerCommand::TriggerWeapon {
            kind: WeaponKind::Meteor,
            x: 400.0,
            y: 600.0,
        }],
        120 => vec![PlayerCommand::TriggerWeapon {
            kind: WeaponKind::Nuke,
            x: 1200.0,
            y: 600.0,
        }],
        240 => vec![PlayerCommand::TriggerWeapon {
            kind: WeaponKind::OrbitalLaser,
            x: 2000.0,
            y: 300.0,
        }],
        300 => vec![PlayerCommand::TriggerWeapon {
            kind: WeaponKind::Tornado,
            x: 600.0,
            y: 600.0,
        }],
        420 => vec![
            PlayerCommand::TriggerWeapon {
                kind: WeaponKind::StickyBomb,
                x: 2050.0,
                y: 560.0,
            },
            PlayerCommand::TriggerWeapon {
                kind: WeaponKind::StickyBomb,
                x: 2080.0,
                y: 540.0,
            },
        ],
        480 => vec![PlayerCommand::DetonateStickies],
        540 => vec![PlayerCommand::SelectAgent {
            kind: AgentKind::Ufo,
        }],
        _ => Vec::new(),
    }
}

/// Run the engine for `total_ticks` ticks, pacing to real time unless
/// `fast` is set. Returns the final snapshot.
pub fn run(seed: u64, city: CityKind, total_ticks: u64, fast: bool) -> WorldSnapshot {
    let mut engine = SimulationEngine::new(SimConfig {
        seed,
        city,
        ..Default::default()
    });

    let mut next_tick_time = Instant::now();
    let mut snapshot = WorldSnapshot::default();

    for tick in 0..total_ticks {
        engine.queue_commands(scripted_commands(tick));
        snapshot = engine.tick();

        if tick % (TICK_RATE as u64 * 2) == 0 {
            report_progress(&snapshot);
        }

        if !fast {
            next_tick_time += TICK_DURATION;
            let now = Instant::now();
            if next_tick_time > now {
                std::thread::sleep(next_tick_time - now);
            } else if now - next_tick_time > TICK_DURATION * 2 {
                // Too far behind — reset to avoid a catch-up spiral.
                next_tick_time = now;
            }
        }
    }

    snapshot
}

fn report_progress(snapshot: &WorldSnapshot) {
    let standing = snapshot
        .buildings
        .iter()
        .filter(|b| b.state == rubble_core::enums::BuildingState::Alive)
        .count();
    let debris: usize = snapshot
        .debris
        .iter()
        .map(|p| p.active + p.sleeping + p.hidden)
        .sum();
    tracing::info!(
        tick = snapshot.time.tick,
        standing,
        total = snapshot.buildings.len(),
        debris,
        effects = snapshot.effects.len(),
        "sim progress"
    );
}
