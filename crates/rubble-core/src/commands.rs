//! Player commands queued by the input layer and processed at the next
//! tick boundary.

use serde::{Deserialize, Serialize};

use crate::enums::{AgentKind, CityKind, UfoVariant, WeaponKind};

/// Control flags sampled once per tick by the active agent.
///
/// Robot reads `move_left`/`move_right` as lateral input and `jump_held`
/// for jump + thrust; UFO reads `turn_left`/`turn_right` plus
/// `throttle_forward`/`throttle_reverse` for tank movement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ControlState {
    pub move_left: bool,
    pub move_right: bool,
    pub jump_held: bool,
    pub turn_left: bool,
    pub turn_right: bool,
    pub throttle_forward: bool,
    pub throttle_reverse: bool,
    /// Primary fire (hand laser / UFO beam).
    pub fire_held: bool,
    /// Secondary fire (tractor beam; forearm lasers for the robot).
    pub secondary_held: bool,
    /// Punch trigger (robot only, edge-triggered by the input layer).
    pub punch: bool,
    /// Missile launch trigger (robot only).
    pub launch_missile: bool,
    /// Pointer aim position in world coordinates.
    pub aim_x: f64,
    pub aim_y: f64,
}

/// Commands accepted by the simulation engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    /// Replace the control flags sampled by the agent this tick.
    SetControls { controls: ControlState },
    /// Trigger an area weapon at a world position.
    TriggerWeapon { kind: WeaponKind, x: f64, y: f64 },
    /// Swap the agent body. Clears in-flight effects and resets resources.
    SelectAgent { kind: AgentKind },
    /// Choose the UFO stat preset (applies to the current/next UFO).
    SelectUfoVariant { variant: UfoVariant },
    /// Toggle UFO invisibility (render alpha only; no gameplay effect).
    ToggleInvisibility,
    /// Detonate every placed sticky bomb in one batch.
    DetonateStickies,
    /// Tear down and rebuild the current city.
    ResetCity,
    /// Tear down and build a city of a different kind.
    RegenerateCity { kind: CityKind },
}
