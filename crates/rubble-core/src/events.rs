//! Events emitted by the simulation for renderer and audio feedback.

use serde::{Deserialize, Serialize};

use crate::enums::{AgentKind, WeaponKind};

/// Cosmetic/audio events drained into each snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FxEvent {
    /// An explosion resolved at a point.
    Explosion { x: f64, y: f64, radius: f64 },
    /// Rate-limited impact spark from a sustained effect.
    ImpactSpark { x: f64, y: f64 },
    /// A building crossed into a higher damage stage.
    StageCrossed { building_index: usize, stage: u8 },
    /// A building began collapsing.
    CollapseStarted { building_index: usize },
    /// A building finished collapsing.
    CollapseFinished { building_index: usize },
    /// A bridge segment broke and went dynamic.
    SegmentBroken { segment_index: usize },
    /// A suspension cable snapped.
    CableSnapped { cable_index: usize },
    /// A bridge tower was destroyed.
    TowerDestroyed { tower_index: usize },
    /// Water splash impulse applied.
    Splash { x: f64, impulse: f64 },
    /// Fire ignited at a point.
    FireIgnited { x: f64, y: f64 },
    /// Agent launched a guided missile.
    MissileAway,
    /// A weapon trigger was accepted.
    WeaponTriggered { kind: WeaponKind },
    /// The agent body was replaced.
    AgentSelected { kind: AgentKind },
    /// Tractor beam carved voxels out of a building.
    VoxelsCarved { building_index: usize, cells: usize },
}
