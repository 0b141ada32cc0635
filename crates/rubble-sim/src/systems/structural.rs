//! Building structural state machine: damage stages, collapse animation,
//! and debris emission.
//!
//! States run one way: Alive → Collapsing → Collapsed. A collapsed
//! building is inert — it takes no damage and drops out of every query.

use hecs::World;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use rubble_core::components::{Building, CollapseAnim, FireEmitter, Footprint, Structure, WeaponEffect};
use rubble_core::constants::*;
use rubble_core::enums::{BuildingState, DebrisKind, Material};
use rubble_core::events::FxEvent;
use rubble_core::types::{secs_to_ticks, Position, Rect};

use crate::debris::DebrisState;

/// Damage stage from the health fraction: 0 above 75%, 1 in (50, 75],
/// 2 in (20, 50], 3 at or below 20% (and always 3 at zero health).
pub fn compute_stage(health: f64, max_health: f64) -> u8 {
    if health <= 0.0 || max_health <= 0.0 {
        return 3;
    }
    let fraction = health / max_health;
    if fraction > STAGE_1_FRACTION {
        0
    } else if fraction > STAGE_2_FRACTION {
        1
    } else if fraction > STAGE_3_FRACTION {
        2
    } else {
        3
    }
}

/// Apply post-falloff damage to one building's components. Emits stage
/// crossing bursts and starts the collapse when health is exhausted.
#[allow(clippy::too_many_arguments)]
pub fn apply_building_damage(
    building: &Building,
    footprint: &Footprint,
    structure: &mut Structure,
    collapse: &mut CollapseAnim,
    material: Material,
    amount: f64,
    tick: u64,
    rng: &mut ChaCha8Rng,
    debris: &mut DebrisState,
    events: &mut Vec<FxEvent>,
) {
    if structure.state == BuildingState::Collapsed || amount <= 0.0 {
        return;
    }

    structure.health = (structure.health - amount).max(0.0);

    let new_stage = compute_stage(structure.health, structure.max_health);
    if new_stage > structure.damage_stage {
        // Fire side effects exactly once per crossed stage.
        for stage in (structure.previous_damage_stage + 1)..=new_stage {
            emit_stage_burst(building, footprint, material, stage, tick, rng, debris, events);
        }
        structure.damage_stage = new_stage;
        structure.previous_damage_stage = new_stage;
    }

    if structure.health <= 0.0 && structure.state == BuildingState::Alive {
        structure.state = BuildingState::Collapsing;
        *collapse = CollapseAnim {
            start_tick: tick,
            duration_ticks: secs_to_ticks(
                rng.gen_range(COLLAPSE_DURATION_MIN_SECS..COLLAPSE_DURATION_MAX_SECS),
            ),
            progress: 0.0,
            tilt: 0.0,
            sink: 0.0,
            tilt_dir: if rng.gen_bool(0.5) { 1.0 } else { -1.0 },
            burst_interval_ticks: secs_to_ticks(
                rng.gen_range(COLLAPSE_BURST_INTERVAL_MIN_SECS..COLLAPSE_BURST_INTERVAL_MAX_SECS),
            ),
            last_burst_tick: tick,
        };
        events.push(FxEvent::CollapseStarted {
            building_index: building.index,
        });
        tracing::debug!(building = building.index, "building collapse started");
    }
}

/// Per-tick building update: collapse progression and loose break-offs.
pub fn run(
    world: &mut World,
    tick: u64,
    rng: &mut ChaCha8Rng,
    debris: &mut DebrisState,
    events: &mut Vec<FxEvent>,
) {
    // Fire emitters to spawn once the query borrow is released.
    let mut fires: Vec<Position> = Vec::new();

    for (_entity, (building, footprint, structure, collapse, material)) in world.query_mut::<(
        &Building,
        &Footprint,
        &mut Structure,
        &mut CollapseAnim,
        &Material,
    )>() {
        match structure.state {
            BuildingState::Alive => {
                // Damaged facades occasionally shed a loose fragment.
                if structure.damage_stage >= 2 && rng.gen_bool(BREAKOFF_PROBABILITY) {
                    let rect = footprint.rect;
                    let x = rng.gen_range(rect.x..rect.right());
                    let kind = match material {
                        Material::Glass => DebrisKind::Shard,
                        Material::Brick | Material::Concrete => DebrisKind::Chunk,
                    };
                    let y = rng.gen_range(rect.y..rect.bottom());
                    debris
                        .pool_mut(kind)
                        .spawn_scatter(rng, x, y, 1, 60.0, tick);
                }
            }
            BuildingState::Collapsing => {
                let elapsed = tick.saturating_sub(collapse.start_tick);
                collapse.progress = if collapse.duration_ticks == 0 {
                    1.0
                } else {
                    (elapsed as f64 / collapse.duration_ticks as f64).min(1.0)
                };
                collapse.tilt = collapse.progress * COLLAPSE_TILT_MAX * collapse.tilt_dir;
                collapse.sink = collapse.progress * footprint.rect.h * COLLAPSE_SINK_FRACTION;

                if tick.saturating_sub(collapse.last_burst_tick) >= collapse.burst_interval_ticks {
                    collapse.last_burst_tick = tick;
                    emit_collapse_burst(&footprint.rect, *material, tick, rng, debris);
                }

                if collapse.progress >= 1.0 {
                    structure.state = BuildingState::Collapsed;
                    structure.damage_stage = 3;
                    structure.previous_damage_stage = 3;
                    emit_final_burst(&footprint.rect, *material, tick, rng, debris);

                    let fire_count = rng.gen_range(COLLAPSE_FIRE_MIN..=COLLAPSE_FIRE_MAX);
                    for _ in 0..fire_count {
                        let rect = footprint.rect;
                        fires.push(Position::new(
                            rng.gen_range(rect.x..rect.right()),
                            GROUND_Y - rng.gen_range(4.0..20.0),
                        ));
                    }
                    events.push(FxEvent::CollapseFinished {
                        building_index: building.index,
                    });
                    tracing::info!(building = building.index, "building collapsed");
                }
            }
            BuildingState::Collapsed => {}
        }
    }

    for pos in fires {
        events.push(FxEvent::FireIgnited { x: pos.x, y: pos.y });
        world.spawn((
            WeaponEffect,
            pos,
            FireEmitter {
                start_tick: tick,
                lifetime_ticks: secs_to_ticks(FIRE_LIFETIME_SECS),
                next_puff_tick: tick,
            },
        ));
    }
}

/// Debris burst for one upward stage crossing: count scales with the new
/// stage; stage 2 and up also kicks out a dust puff.
#[allow(clippy::too_many_arguments)]
fn emit_stage_burst(
    building: &Building,
    footprint: &Footprint,
    material: Material,
    stage: u8,
    tick: u64,
    rng: &mut ChaCha8Rng,
    debris: &mut DebrisState,
    events: &mut Vec<FxEvent>,
) {
    let rect = footprint.rect;
    let x = rng.gen_range(rect.x..rect.right());
    let y = rng.gen_range(rect.y..rect.bottom());
    let count = stage as usize * STAGE_BURST_COUNT_PER_STAGE;

    spawn_material_mix(debris, rng, material, x, y, count, 140.0, tick);
    if stage >= 2 {
        debris
            .pool_mut(DebrisKind::Dust)
            .spawn_scatter(rng, x, y, 2, 30.0, tick);
    }
    events.push(FxEvent::StageCrossed {
        building_index: building.index,
        stage,
    });
}

/// Periodic burst while collapsing, sampled from the lower half of the
/// footprint.
fn emit_collapse_burst(
    rect: &Rect,
    material: Material,
    tick: u64,
    rng: &mut ChaCha8Rng,
    debris: &mut DebrisState,
) {
    let x = rng.gen_range(rect.x..rect.right());
    let y = rng.gen_range(rect.y + rect.h / 2.0..rect.bottom());
    match material {
        Material::Glass => {
            // Panel shards plus glittering chips, spinning hard.
            let shard_count = rng.gen_range(4..8);
            debris
                .pool_mut(DebrisKind::Shard)
                .spawn_scatter(rng, x, y, shard_count, 160.0, tick);
            let chip_count = rng.gen_range(3..7);
            debris
                .pool_mut(DebrisKind::MicroChip)
                .spawn_scatter(rng, x, y, chip_count, 190.0, tick);
        }
        Material::Brick | Material::Concrete => {
            let chunk_count = rng.gen_range(3..7);
            debris
                .pool_mut(DebrisKind::Chunk)
                .spawn_scatter(rng, x, y, chunk_count, 130.0, tick);
            if rng.gen_bool(0.3) {
                let dust_count = rng.gen_range(1..3);
                debris
                    .pool_mut(DebrisKind::Dust)
                    .spawn_scatter(rng, x, y, dust_count, 24.0, tick);
            }
        }
    }
}

/// One large burst when the collapse completes; count scales with the
/// footprint area, capped. Glass splits across shard and chunk pools.
fn emit_final_burst(
    rect: &Rect,
    material: Material,
    tick: u64,
    rng: &mut ChaCha8Rng,
    debris: &mut DebrisState,
) {
    let count = ((rect.area() / FINAL_BURST_AREA_PER_FRAGMENT) as usize)
        .clamp(8, FINAL_BURST_MAX_FRAGMENTS);
    let center = rect.center();
    let y = rect.bottom() - 10.0;

    match material {
        Material::Glass => {
            debris
                .pool_mut(DebrisKind::Shard)
                .spawn_scatter(rng, center.x, y, count * 3 / 5, 200.0, tick);
            debris
                .pool_mut(DebrisKind::Chunk)
                .spawn_scatter(rng, center.x, y, count * 2 / 5, 150.0, tick);
        }
        Material::Brick | Material::Concrete => {
            debris
                .pool_mut(DebrisKind::Chunk)
                .spawn_scatter(rng, center.x, y, count, 170.0, tick);
            debris
                .pool_mut(DebrisKind::Dust)
                .spawn_scatter(rng, center.x, y, 4, 40.0, tick);
        }
    }
}

/// Material-weighted spawn used by stage-crossing bursts.
fn spawn_material_mix(
    debris: &mut DebrisState,
    rng: &mut ChaCha8Rng,
    material: Material,
    x: f64,
    y: f64,
    count: usize,
    speed: f64,
    tick: u64,
) {
    match material {
        Material::Glass => {
            debris
                .pool_mut(DebrisKind::Shard)
                .spawn_scatter(rng, x, y, count.div_ceil(2), speed, tick);
            debris
                .pool_mut(DebrisKind::MicroChip)
                .spawn_scatter(rng, x, y, count / 2, speed * 1.2, tick);
        }
        Material::Brick | Material::Concrete => {
            debris
                .pool_mut(DebrisKind::Chunk)
                .spawn_scatter(rng, x, y, count, speed * 0.8, tick);
        }
    }
}
