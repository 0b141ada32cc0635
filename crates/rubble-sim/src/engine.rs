//! Simulation engine — the core of the game.
//!
//! `SimulationEngine` owns the hecs ECS world and the composite side
//! state (bridge, debris pools, water), processes player commands, runs
//! all systems in a fixed order, and produces `WorldSnapshot`s.
//! Completely headless, enabling deterministic testing.

use std::collections::VecDeque;

use hecs::World;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use rubble_core::commands::{ControlState, PlayerCommand};
use rubble_core::components::UfoBody;
use rubble_core::config::Tunables;
use rubble_core::constants::GROUND_Y;
use rubble_core::enums::{AgentKind, CityKind, StaticStructureKind, UfoVariant};
use rubble_core::events::FxEvent;
use rubble_core::state::WorldSnapshot;
use rubble_core::types::SimTime;

use crate::bridge::BridgeState;
use crate::debris::DebrisState;
use crate::systems;
use crate::water::WaterState;
use crate::world_setup;

/// Configuration for starting a new simulation.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed + same commands = same run.
    pub seed: u64,
    /// City layout to generate first.
    pub city: CityKind,
    /// Tuning overrides.
    pub tunables: Tunables,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            city: CityKind::Downtown,
            tunables: Tunables::default(),
        }
    }
}

/// The simulation engine. Owns the ECS world and all sim state.
pub struct SimulationEngine {
    world: World,
    time: SimTime,
    rng: ChaCha8Rng,
    tunables: Tunables,
    city_kind: CityKind,
    static_structures: Vec<StaticStructureKind>,
    bridge: Option<BridgeState>,
    water: Option<WaterState>,
    debris: DebrisState,
    controls: ControlState,
    agent_kind: AgentKind,
    ufo_variant: UfoVariant,
    command_queue: VecDeque<PlayerCommand>,
    despawn_buffer: Vec<hecs::Entity>,
    fx_events: Vec<FxEvent>,
}

impl SimulationEngine {
    /// Create a new engine and build the initial city.
    pub fn new(config: SimConfig) -> Self {
        let cap_scale = config.tunables.debris_cap_scale;
        let mut engine = Self {
            world: World::new(),
            time: SimTime::default(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            tunables: config.tunables,
            city_kind: config.city,
            static_structures: Vec::new(),
            bridge: None,
            water: None,
            debris: DebrisState::new(cap_scale),
            controls: ControlState::default(),
            agent_kind: AgentKind::Robot,
            ufo_variant: UfoVariant::default(),
            command_queue: VecDeque::new(),
            despawn_buffer: Vec::new(),
            fx_events: Vec::new(),
        };
        engine.rebuild_city(config.city);
        engine
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the simulation by one tick and return the resulting snapshot.
    pub fn tick(&mut self) -> WorldSnapshot {
        self.process_commands();
        self.run_systems();
        self.time.advance();

        let events = std::mem::take(&mut self.fx_events);
        systems::snapshot::build_snapshot(
            &self.world,
            &self.time,
            self.city_kind,
            &self.static_structures,
            self.bridge.as_ref(),
            self.water.as_ref(),
            &self.debris,
            events,
        )
    }

    /// Get the current simulation time.
    pub fn time(&self) -> SimTime {
        self.time
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Get the active city kind.
    pub fn city_kind(&self) -> CityKind {
        self.city_kind
    }

    /// Get a read-only reference to the bridge, if this city has one.
    pub fn bridge(&self) -> Option<&BridgeState> {
        self.bridge.as_ref()
    }

    /// Get a read-only reference to the debris pools.
    pub fn debris(&self) -> &DebrisState {
        &self.debris
    }

    #[cfg(test)]
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    #[cfg(test)]
    pub fn debris_mut(&mut self) -> &mut DebrisState {
        &mut self.debris
    }

    #[cfg(test)]
    pub fn bridge_mut(&mut self) -> Option<&mut BridgeState> {
        self.bridge.as_mut()
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    /// Handle a single player command.
    fn handle_command(&mut self, command: PlayerCommand) {
        match command {
            PlayerCommand::SetControls { controls } => {
                self.controls = controls;
            }
            PlayerCommand::TriggerWeapon { kind, x, y } => {
                systems::weapons::trigger(
                    &mut self.world,
                    &mut self.rng,
                    self.time.tick,
                    kind,
                    x,
                    y,
                    &mut self.fx_events,
                );
            }
            PlayerCommand::SelectAgent { kind } => {
                self.clear_weapon_effects();
                self.despawn_agent();
                systems::agent::spawn_agent(&mut self.world, kind, self.ufo_variant, self.time.tick);
                self.agent_kind = kind;
                self.fx_events.push(FxEvent::AgentSelected { kind });
                tracing::info!(?kind, "agent selected");
            }
            PlayerCommand::SelectUfoVariant { variant } => {
                self.ufo_variant = variant;
                for (_entity, body) in self.world.query_mut::<&mut UfoBody>() {
                    body.variant = variant;
                }
            }
            PlayerCommand::ToggleInvisibility => {
                for (_entity, body) in self.world.query_mut::<&mut UfoBody>() {
                    body.invisible = !body.invisible;
                }
            }
            PlayerCommand::DetonateStickies => {
                systems::weapons::detonate_stickies(
                    &mut self.world,
                    self.bridge.as_mut(),
                    self.water.as_mut(),
                    self.time.tick,
                    &mut self.rng,
                    &mut self.debris,
                    &mut self.fx_events,
                    &self.tunables,
                );
            }
            PlayerCommand::ResetCity => {
                self.rebuild_city(self.city_kind);
            }
            PlayerCommand::RegenerateCity { kind } => {
                self.rebuild_city(kind);
            }
        }
    }

    /// Tear down every entity list and rebuild a fresh city. Debris pools
    /// are discarded, not decayed; the agent respawns with full resources.
    fn rebuild_city(&mut self, kind: CityKind) {
        tracing::info!(?kind, "rebuilding city");
        self.world.clear();
        self.debris.clear_all();
        self.fx_events.clear();
        self.despawn_buffer.clear();

        let plan = rubble_procgen::generate(kind, &mut self.rng);
        self.city_kind = kind;
        self.static_structures = plan.static_structures.clone();
        self.bridge = plan
            .bridge
            .as_ref()
            .map(|bridge_plan| BridgeState::from_plan(bridge_plan, &mut self.rng));
        self.water = plan
            .water
            .as_ref()
            .map(|w| WaterState::new(w.start_x, w.end_x, w.surface_y));
        world_setup::populate_city(&mut self.world, &plan);

        systems::agent::spawn_agent(
            &mut self.world,
            self.agent_kind,
            self.ufo_variant,
            self.time.tick,
        );
    }

    /// Despawn every transient weapon effect (mode switch / reset).
    fn clear_weapon_effects(&mut self) {
        let effects: Vec<hecs::Entity> = self
            .world
            .query_mut::<&rubble_core::components::WeaponEffect>()
            .into_iter()
            .map(|(entity, _)| entity)
            .collect();
        for entity in effects {
            let _ = self.world.despawn(entity);
        }
    }

    fn despawn_agent(&mut self) {
        let agents: Vec<hecs::Entity> = self
            .world
            .query_mut::<&rubble_core::components::PlayerAgent>()
            .into_iter()
            .map(|(entity, _)| entity)
            .collect();
        for entity in agents {
            let _ = self.world.despawn(entity);
        }
    }

    /// Run all systems in order.
    fn run_systems(&mut self) {
        let tick = self.time.tick;
        let controls = self.controls;
        let gravity = self.tunables.gravity;

        // 1. Agent: movement, resources, firing.
        systems::agent::run(
            &mut self.world,
            self.bridge.as_mut(),
            &controls,
            tick,
            &mut self.rng,
            &mut self.debris,
            &mut self.fx_events,
            &self.tunables,
        );
        // 2. Weapon effects: travel, contact, area damage.
        systems::weapons::run(
            &mut self.world,
            self.bridge.as_mut(),
            self.water.as_mut(),
            &controls,
            tick,
            &mut self.rng,
            &mut self.debris,
            &mut self.fx_events,
            &self.tunables,
            &mut self.despawn_buffer,
        );
        // 3. Structural: stage transitions, collapse progression.
        systems::structural::run(
            &mut self.world,
            tick,
            &mut self.rng,
            &mut self.debris,
            &mut self.fx_events,
        );
        // 4. Bridge: cascade schedule, joints, cables, sway.
        if let Some(bridge) = self.bridge.as_mut() {
            bridge.update(
                tick,
                gravity,
                &mut self.rng,
                &mut self.debris,
                self.water.as_mut(),
                &mut self.fx_events,
            );
        }
        // 5. Debris pools: integration, sleep, eviction.
        let bridge_ref = self.bridge.as_ref();
        let surface = move |x: f64, y: f64| -> f64 {
            match bridge_ref.and_then(|b| b.deck_surface_at(x)) {
                Some(deck_y) if y <= deck_y => deck_y,
                _ => GROUND_Y,
            }
        };
        self.debris.update_all(tick, gravity, &surface);
        // 6. Water chain.
        if let Some(water) = self.water.as_mut() {
            water.update();
        }
        // 7. Fire emitters.
        systems::fire::run(&mut self.world, tick, &mut self.rng, &mut self.debris);
        // 8. Cleanup: expired effects and strays.
        systems::cleanup::run(&mut self.world, tick, &mut self.despawn_buffer);
    }
}
