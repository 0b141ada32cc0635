//! Area damage application — the one path weapon effects use to reach
//! buildings, bridge segments, and towers.

use hecs::World;
use rand_chacha::ChaCha8Rng;

use rubble_core::components::{Building, CollapseAnim, Footprint, Structure};
use rubble_core::config::Tunables;
use rubble_core::enums::Material;
use rubble_core::events::FxEvent;
use rubble_core::types::Position;

use crate::bridge::BridgeState;
use crate::debris::DebrisState;
use crate::falloff::{distance_to_rect, scaled_damage};
use crate::systems::structural;

/// One area damage application.
#[derive(Debug, Clone, Copy)]
pub struct AreaDamage {
    pub center: Position,
    pub radius: f64,
    pub base_damage: f64,
    pub exponent: f64,
    /// Per-application damage cap; overlapping effects cannot stack past it.
    pub cap: Option<f64>,
}

/// Apply falloff damage to every eligible structure within radius.
#[allow(clippy::too_many_arguments)]
pub fn apply_area_damage(
    world: &mut World,
    bridge: Option<&mut BridgeState>,
    damage: &AreaDamage,
    tick: u64,
    rng: &mut ChaCha8Rng,
    debris: &mut DebrisState,
    events: &mut Vec<FxEvent>,
    tunables: &Tunables,
) {
    let base = damage.base_damage * tunables.damage_scale;

    for (_entity, (building, footprint, structure, collapse, material)) in world.query_mut::<(
        &Building,
        &Footprint,
        &mut Structure,
        &mut CollapseAnim,
        &Material,
    )>() {
        let distance = distance_to_rect(&damage.center, &footprint.rect);
        if distance > damage.radius {
            continue;
        }
        let amount = scaled_damage(
            base,
            distance,
            damage.radius,
            damage.exponent,
            structure.material_resistance,
            damage.cap,
        );
        structural::apply_building_damage(
            building, footprint, structure, collapse, *material, amount, tick, rng, debris, events,
        );
    }

    if let Some(bridge) = bridge {
        apply_bridge_damage(bridge, damage, base, tick, rng, debris, events);
    }
}

/// Damage bridge segments and towers within radius.
fn apply_bridge_damage(
    bridge: &mut BridgeState,
    damage: &AreaDamage,
    base: f64,
    tick: u64,
    rng: &mut ChaCha8Rng,
    debris: &mut DebrisState,
    events: &mut Vec<FxEvent>,
) {
    for idx in 0..bridge.segments.len() {
        let seg_pos = Position::new(bridge.segments[idx].pos.x, bridge.segments[idx].pos.y);
        let distance = damage.center.distance_to(&seg_pos);
        if distance > damage.radius {
            continue;
        }
        let amount = scaled_damage(base, distance, damage.radius, damage.exponent, 1.0, damage.cap);
        if amount > 0.0 {
            bridge.damage_segment(idx, amount, tick, rng, debris, events);
        }
    }

    for idx in 0..bridge.towers.len() {
        let tower_pos = Position::new(bridge.towers[idx].x, bridge.deck_y - 60.0);
        let distance = damage.center.distance_to(&tower_pos);
        if distance > damage.radius {
            continue;
        }
        let amount = scaled_damage(base, distance, damage.radius, damage.exponent, 1.0, damage.cap);
        if amount > 0.0 {
            bridge.damage_tower(idx, amount, tick, rng, events);
        }
    }
}

/// Apply a pre-computed damage amount to one building entity, bypassing
/// falloff (sticky batches and tractor erosion compute their own totals).
pub fn apply_raw_building_damage(
    world: &mut World,
    entity: hecs::Entity,
    amount: f64,
    tick: u64,
    rng: &mut ChaCha8Rng,
    debris: &mut DebrisState,
    events: &mut Vec<FxEvent>,
) {
    if let Ok((building, footprint, structure, collapse, material)) = world.query_one_mut::<(
        &Building,
        &Footprint,
        &mut Structure,
        &mut CollapseAnim,
        &Material,
    )>(entity)
    {
        structural::apply_building_damage(
            building, footprint, structure, collapse, *material, amount, tick, rng, debris, events,
        );
    }
}
