//! World snapshot — the complete visible state exposed to the renderer
//! and HUD each tick. Read-only, rebuilt every tick.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::FxEvent;
use crate::types::{Position, Rect, SimTime};

/// Complete per-tick state for the render/HUD layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub time: SimTime,
    pub city_kind: CityKind,
    pub buildings: Vec<BuildingView>,
    pub static_structures: Vec<StaticStructureKind>,
    pub bridge: Option<BridgeView>,
    pub agent: Option<AgentView>,
    pub effects: Vec<EffectView>,
    pub debris: Vec<DebrisPoolView>,
    pub water: Option<WaterView>,
    /// FX events accumulated since the previous snapshot.
    pub events: Vec<FxEvent>,
}

/// One destructible building.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildingView {
    pub rect: Rect,
    pub material: Option<Material>,
    /// health / max_health in [0, 1].
    pub health_fraction: f64,
    pub damage_stage: u8,
    pub state: BuildingState,
    pub collapse_progress: f64,
    /// Visual deformation only; collision is unaffected.
    pub tilt: f64,
    pub sink: f64,
    pub voxel_cutouts: usize,
}

/// Bridge deck and cable state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BridgeView {
    pub segments: Vec<SegmentView>,
    /// Vertical draw offset from the shared sway oscillator.
    pub sway_offset: f64,
    pub sway_active: bool,
    pub cables_intact: usize,
    pub cables_total: usize,
    /// Tower health fractions.
    pub towers: [f64; 2],
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SegmentView {
    pub x: f64,
    pub y: f64,
    pub rotation: f64,
    pub state: SegmentState,
}

/// The player agent, for HUD meters and rendering.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentView {
    pub kind: AgentKind,
    pub position: Position,
    /// Fuel fraction (robot thrust); 1.0 for the UFO.
    pub fuel_fraction: f64,
    /// Energy fraction (lasers).
    pub energy_fraction: f64,
    pub variant: Option<UfoVariant>,
    pub invisible: bool,
    /// Robot facing (+-1) or UFO heading (radians).
    pub orientation: f64,
}

/// One in-flight weapon effect or fire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectView {
    pub kind: EffectKind,
    pub position: Position,
    /// Elapsed/duration in [0, 1] for bounded effects, 0 otherwise.
    pub progress: f64,
}

/// Population counters for one debris pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebrisPoolView {
    pub kind: DebrisKind,
    /// Fragments integrated and rendered.
    pub active: usize,
    /// Physics-exempt but still rendered.
    pub sleeping: usize,
    /// Evicted from render, retained for reactivation.
    pub hidden: usize,
}

/// Water surface column heights for rendering.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WaterView {
    pub start_x: f64,
    pub column_spacing: f64,
    pub heights: Vec<f64>,
}
