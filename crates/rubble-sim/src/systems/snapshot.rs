//! Snapshot builder: world state → `WorldSnapshot` for the render/HUD
//! layer.

use hecs::World;

use rubble_core::components::*;
use rubble_core::constants::{ROBOT_ENERGY_MAX, ROBOT_FUEL_MAX, UFO_ENERGY_MAX};
use rubble_core::enums::{AgentKind, CityKind, EffectKind, Material, StaticStructureKind};
use rubble_core::events::FxEvent;
use rubble_core::state::*;
use rubble_core::types::{Position, SimTime};

use crate::bridge::BridgeState;
use crate::debris::DebrisState;
use crate::systems::weapons::StickyState;
use crate::water::WaterState;

/// Assemble the complete per-tick snapshot.
#[allow(clippy::too_many_arguments)]
pub fn build_snapshot(
    world: &World,
    time: &SimTime,
    city_kind: CityKind,
    static_structures: &[StaticStructureKind],
    bridge: Option<&BridgeState>,
    water: Option<&WaterState>,
    debris: &DebrisState,
    events: Vec<FxEvent>,
) -> WorldSnapshot {
    let mut buildings: Vec<(usize, BuildingView)> = Vec::new();
    {
        let mut query = world.query::<(
            &Building,
            &Footprint,
            &Structure,
            &CollapseAnim,
            &Material,
            &VoxelCutouts,
        )>();
        for (_entity, (building, footprint, structure, collapse, material, cutouts)) in query.iter()
        {
            buildings.push((
                building.index,
                BuildingView {
                    rect: footprint.rect,
                    material: Some(*material),
                    health_fraction: if structure.max_health > 0.0 {
                        structure.health / structure.max_health
                    } else {
                        0.0
                    },
                    damage_stage: structure.damage_stage,
                    state: structure.state,
                    collapse_progress: collapse.progress,
                    tilt: collapse.tilt,
                    sink: collapse.sink,
                    voxel_cutouts: cutouts.cells.len(),
                },
            ));
        }
    }
    buildings.sort_by_key(|(index, _)| *index);

    let agent = {
        let mut query = world.query::<(
            &PlayerAgent,
            &Position,
            Option<&RobotBody>,
            Option<&UfoBody>,
        )>();
        query.iter().next().map(|(_, (_, pos, robot, ufo))| {
            if let Some(body) = robot {
                AgentView {
                    kind: AgentKind::Robot,
                    position: *pos,
                    fuel_fraction: body.fuel / ROBOT_FUEL_MAX,
                    energy_fraction: body.energy / ROBOT_ENERGY_MAX,
                    variant: None,
                    invisible: false,
                    orientation: body.facing,
                }
            } else if let Some(body) = ufo {
                AgentView {
                    kind: AgentKind::Ufo,
                    position: *pos,
                    fuel_fraction: 1.0,
                    energy_fraction: body.energy / UFO_ENERGY_MAX,
                    variant: Some(body.variant),
                    invisible: body.invisible,
                    orientation: body.heading,
                }
            } else {
                AgentView {
                    position: *pos,
                    ..Default::default()
                }
            }
        })
    };

    let mut effects: Vec<EffectView> = Vec::new();
    collect_effects(world, &mut effects, time.tick);

    WorldSnapshot {
        time: *time,
        city_kind,
        buildings: buildings.into_iter().map(|(_, view)| view).collect(),
        static_structures: static_structures.to_vec(),
        bridge: bridge.map(|b| b.view()),
        agent,
        effects,
        debris: debris.views(),
        water: water.map(|w| w.view()),
        events,
    }
}

fn collect_effects(world: &World, effects: &mut Vec<EffectView>, tick: u64) {
    for (_e, (meteor, pos)) in world.query::<(&Meteor, &Position)>().iter() {
        effects.push(EffectView {
            kind: EffectKind::Meteor,
            position: *pos,
            progress: progress_of(tick, meteor.launch_tick, meteor.travel_ticks),
        });
    }
    for (_e, (_bomb, pos)) in world.query::<(&NukeBomb, &Position)>().iter() {
        effects.push(EffectView {
            kind: EffectKind::NukeBomb,
            position: *pos,
            progress: 0.0,
        });
    }
    for (_e, (laser, pos)) in world.query::<(&OrbitalLaser, &Position)>().iter() {
        effects.push(EffectView {
            kind: EffectKind::OrbitalLaser,
            position: *pos,
            progress: progress_of(tick, laser.start_tick, laser.duration_ticks),
        });
    }
    for (_e, (tornado, pos)) in world.query::<(&Tornado, &Position)>().iter() {
        effects.push(EffectView {
            kind: EffectKind::Tornado,
            position: *pos,
            progress: progress_of(tick, tornado.start_tick, tornado.duration_ticks),
        });
    }
    for (_e, (_sticky, pos)) in world.query::<(&StickyState, &Position)>().iter() {
        effects.push(EffectView {
            kind: EffectKind::StickyBomb,
            position: *pos,
            progress: 0.0,
        });
    }
    for (_e, (missile, pos)) in world.query::<(&GuidedMissile, &Position)>().iter() {
        effects.push(EffectView {
            kind: EffectKind::GuidedMissile,
            position: *pos,
            progress: progress_of(tick, missile.launch_tick, missile.lifetime_ticks),
        });
    }
    for (_e, (fire, pos)) in world.query::<(&FireEmitter, &Position)>().iter() {
        effects.push(EffectView {
            kind: EffectKind::Fire,
            position: *pos,
            progress: progress_of(tick, fire.start_tick, fire.lifetime_ticks),
        });
    }
}

fn progress_of(tick: u64, start: u64, duration: u64) -> f64 {
    if duration == 0 {
        return 1.0;
    }
    (tick.saturating_sub(start) as f64 / duration as f64).min(1.0)
}
