//! Headless driver for the destruction simulation.
//!
//! Stands in for a render/input host: runs the engine at the fixed tick
//! rate, feeds it a scripted demolition session, and reports summary
//! stats from the snapshots.

pub mod game_loop;

pub use rubble_core as core;
