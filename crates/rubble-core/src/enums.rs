//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

use crate::types::Rect;

/// Building facade material. Drives debris mix and visual treatment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Material {
    /// Curtain-wall glass: shatters into panel shards and micro-chips.
    Glass,
    /// Brick masonry: chunky fragments, occasional dust puffs.
    Brick,
    /// Poured concrete: heaviest fragments, most dust.
    Concrete,
}

/// Building size category; scales the max-health roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuildingCategory {
    LowRise,
    MidRise,
    Tower,
}

impl BuildingCategory {
    /// Max-health multiplier for the category.
    pub fn health_scale(self) -> f64 {
        match self {
            BuildingCategory::LowRise => 0.8,
            BuildingCategory::MidRise => 1.0,
            BuildingCategory::Tower => 1.3,
        }
    }
}

/// Building structural state. One-way progression, no state re-entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuildingState {
    #[default]
    Alive,
    Collapsing,
    Collapsed,
}

/// Bridge segment structural state. `Broken` is terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SegmentState {
    #[default]
    Intact,
    Damaged,
    Broken,
}

/// Player-triggered area weapon kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponKind {
    Meteor,
    Nuke,
    OrbitalLaser,
    Tornado,
    StickyBomb,
}

/// Controllable agent body kinds. Switching replaces the agent wholesale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgentKind {
    #[default]
    Robot,
    Ufo,
}

/// UFO stat-multiplier presets. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum UfoVariant {
    /// Fast but light armament.
    #[default]
    Scout,
    /// Combat-tuned: strongest laser, slowest.
    Vanguard,
    /// Strongest tractor beam, weakest laser.
    Salvager,
}

impl UfoVariant {
    /// (speed, laser DPS, tractor strength) multipliers.
    pub fn multipliers(self) -> (f64, f64, f64) {
        match self {
            UfoVariant::Scout => (1.3, 0.8, 0.9),
            UfoVariant::Vanguard => (0.9, 1.4, 0.8),
            UfoVariant::Salvager => (0.8, 0.7, 1.5),
        }
    }
}

/// Debris fragment kinds, one capped pool each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DebrisKind {
    /// Glass facade panels; high spin.
    Shard,
    /// Brick/concrete pieces.
    Chunk,
    /// Tiny glittering glass chips (lifetime-bounded).
    MicroChip,
    /// Dust puffs (lifetime-bounded, no ground interaction).
    Dust,
    /// Cells eroded out of a building by the tractor beam.
    VoxelBit,
    /// Deck fragments from bridge breaks.
    BridgeChunk,
}

/// City layout flavor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CityKind {
    /// Dense skyline, no water.
    #[default]
    Downtown,
    /// Sparser skyline with a suspension bridge over a water span.
    Waterfront,
}

/// Non-destructible static structures, matched exhaustively (no dynamic
/// type checks).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum StaticStructureKind {
    /// Rooftop or roadside billboard; content is cosmetic.
    Billboard { rect: Rect },
    /// Rooftop antenna mast.
    Antenna { base_x: f64, base_y: f64, height: f64 },
}

/// Active effect kinds reported in snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectKind {
    Meteor,
    NukeBomb,
    OrbitalLaser,
    Tornado,
    StickyBomb,
    GuidedMissile,
    Fire,
}
