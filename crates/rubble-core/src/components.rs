//! ECS components for hecs entities.
//!
//! Components are plain data structs with no methods.
//! Simulation logic lives in systems, not components.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::{Position, Rect};

// --- Buildings ---

/// Marks an entity as a destructible building. Carries the stable index
/// assigned at city generation (also the snapshot ordering).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Building {
    pub index: usize,
}

/// Immutable building geometry, fixed at city generation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Footprint {
    pub rect: Rect,
}

/// Structural health state for a building.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Structure {
    pub health: f64,
    pub max_health: f64,
    /// Multiplies incoming damage before falloff (0.7–1.3, fixed at creation).
    pub material_resistance: f64,
    /// Discrete damage tier 0–3, derived from health fraction.
    pub damage_stage: u8,
    /// Last stage for which crossing side effects already fired.
    pub previous_damage_stage: u8,
    pub state: BuildingState,
}

/// Collapse animation sub-state. Populated when a building enters
/// `Collapsing`; purely visual deformation, no collision effect.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollapseAnim {
    pub start_tick: u64,
    pub duration_ticks: u64,
    /// Elapsed/duration, clamped to [0, 1].
    pub progress: f64,
    pub tilt: f64,
    pub sink: f64,
    /// -1.0 or 1.0, rolled at collapse start.
    pub tilt_dir: f64,
    /// Interval between collapse debris bursts (rolled per building).
    pub burst_interval_ticks: u64,
    pub last_burst_tick: u64,
}

/// Grid cells removed from a building silhouette by the tractor beam.
/// Purely subtractive; cells are never re-added.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VoxelCutouts {
    pub cells: HashSet<(i16, i16)>,
}

// --- Weapon effects ---

/// Marks an entity as a transient weapon effect (cleared on reset and on
/// agent mode switch).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WeaponEffect;

/// Meteor in ballistic travel toward its impact point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meteor {
    pub origin: Position,
    pub target: Position,
    pub launch_tick: u64,
    pub travel_ticks: u64,
}

/// One falling bomb of a nuclear strike cluster. Explodes on ground or
/// building contact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NukeBomb;

/// Continuous vertical beam weapon.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrbitalLaser {
    pub x: f64,
    pub start_tick: u64,
    pub duration_ticks: u64,
    pub next_spark_tick: u64,
}

/// Mobile continuous-damage zone with lateral drift.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tornado {
    pub start_tick: u64,
    pub duration_ticks: u64,
    /// Drift direction, -1.0 or 1.0.
    pub drift_dir: f64,
    /// Phase accumulator for the wandering drift.
    pub wander_phase: f64,
    pub next_spark_tick: u64,
}

/// Agent-launched homing missile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuidedMissile {
    pub launch_tick: u64,
    pub lifetime_ticks: u64,
}

/// Fire left burning after a collapse; emits smoke puffs until it expires.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FireEmitter {
    pub start_tick: u64,
    pub lifetime_ticks: u64,
    pub next_puff_tick: u64,
}

// --- Agent ---

/// Marks the single player-controlled agent entity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PlayerAgent;

/// On-foot robot body state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RobotBody {
    pub on_ground: bool,
    /// Tick the robot last left the ground (thrust gates on airtime).
    pub airborne_since_tick: u64,
    pub thrusting: bool,
    pub fuel: f64,
    pub energy: f64,
    /// +1.0 facing right, -1.0 facing left.
    pub facing: f64,
    pub punch_ready_tick: u64,
    pub arm_laser_ready_ticks: [u64; 2],
    pub hand_laser_next_shot_tick: u64,
    pub missile_ready_tick: u64,
    /// Tick the missile pose windup started, if winding up.
    pub missile_windup_started: Option<u64>,
}

/// Flying UFO body state. Rotation-based tank movement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UfoBody {
    /// Heading in radians (0 = rightward, grows clockwise on screen).
    pub heading: f64,
    pub variant: UfoVariant,
    pub energy: f64,
    pub beam_next_shot_tick: u64,
    pub tractor_next_erosion_tick: u64,
    pub invisible: bool,
}
