//! Destruction simulation engine.
//!
//! Owns the hecs ECS world plus the composite side-state (bridge, debris
//! pools, water chain), runs systems at a fixed tick rate, and produces
//! `WorldSnapshot`s for the render/HUD layer.

pub mod bridge;
pub mod damage;
pub mod debris;
pub mod engine;
pub mod falloff;
pub mod systems;
pub mod water;
pub mod world_setup;

pub use engine::{SimConfig, SimulationEngine};
pub use rubble_core as core;

#[cfg(test)]
mod tests;
