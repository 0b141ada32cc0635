//! Weapon effect systems.
//!
//! Every effect follows the same contract: created at a trigger point,
//! bounded update loop, damage through the shared falloff model, cosmetic
//! spawns rate-limited per instance, then despawned.

use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use rubble_core::commands::ControlState;
use rubble_core::components::*;
use rubble_core::config::Tunables;
use rubble_core::constants::*;
use rubble_core::enums::{BuildingState, DebrisKind, Material, WeaponKind};
use rubble_core::events::FxEvent;
use rubble_core::types::{secs_to_ticks, Position, Rect, Velocity};

use crate::bridge::BridgeState;
use crate::damage::{self, AreaDamage};
use crate::debris::DebrisState;
use crate::falloff::scaled_damage;
use crate::systems::structural;
use crate::water::WaterState;

/// Deferred-detonation bomb. Attached to a building via a generation-
/// checked entity handle, or free once detached.
#[derive(Debug, Clone)]
pub struct StickyState {
    pub attached_to: Option<Entity>,
    /// Offset from the target rect's top-left while attached.
    pub offset_x: f64,
    pub offset_y: f64,
    pub resting: bool,
}

/// Construct the effect for a weapon trigger at (x, y).
pub fn trigger(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    tick: u64,
    kind: WeaponKind,
    x: f64,
    y: f64,
    events: &mut Vec<FxEvent>,
) {
    match kind {
        WeaponKind::Meteor => {
            let target = Position::new(x, y.min(GROUND_Y));
            let origin = Position::new(
                x + rng.gen_range(-260.0..260.0),
                -140.0,
            );
            let travel_secs = METEOR_TRAVEL_MIN_SECS
                + (origin.distance_to(&target) / 1500.0).min(1.0)
                    * (METEOR_TRAVEL_MAX_SECS - METEOR_TRAVEL_MIN_SECS);
            world.spawn((
                WeaponEffect,
                origin,
                Meteor {
                    origin,
                    target,
                    launch_tick: tick,
                    travel_ticks: secs_to_ticks(travel_secs).max(1),
                },
            ));
        }
        WeaponKind::Nuke => {
            for _ in 0..NUKE_BOMB_COUNT {
                world.spawn((
                    WeaponEffect,
                    NukeBomb,
                    Position::new(
                        (x + rng.gen_range(-NUKE_SPREAD..NUKE_SPREAD))
                            .clamp(0.0, WORLD_WIDTH),
                        rng.gen_range(-160.0..-60.0),
                    ),
                    Velocity::new(0.0, NUKE_FALL_SPEED * rng.gen_range(0.9..1.1)),
                ));
            }
        }
        WeaponKind::OrbitalLaser => {
            world.spawn((
                WeaponEffect,
                Position::new(x, GROUND_Y / 2.0),
                OrbitalLaser {
                    x,
                    start_tick: tick,
                    duration_ticks: secs_to_ticks(LASER_DURATION_SECS),
                    next_spark_tick: tick,
                },
            ));
        }
        WeaponKind::Tornado => {
            let active = world.query_mut::<&Tornado>().into_iter().count();
            if active >= MAX_CONCURRENT_TORNADOES {
                return;
            }
            world.spawn((
                WeaponEffect,
                Position::new(x, GROUND_Y - 90.0),
                Tornado {
                    start_tick: tick,
                    duration_ticks: secs_to_ticks(
                        rng.gen_range(TORNADO_DURATION_MIN_SECS..TORNADO_DURATION_MAX_SECS),
                    ),
                    drift_dir: if rng.gen_bool(0.5) { 1.0 } else { -1.0 },
                    wander_phase: rng.gen_range(0.0..std::f64::consts::TAU),
                    next_spark_tick: tick,
                },
            ));
        }
        WeaponKind::StickyBomb => {
            place_sticky(world, x, y);
        }
    }
    events.push(FxEvent::WeaponTriggered { kind });
}

/// Attach a sticky bomb to the nearest living building surface within
/// range, or drop it free.
fn place_sticky(world: &mut World, x: f64, y: f64) {
    let point = Position::new(x, y);
    let mut best: Option<(Entity, f64, Rect)> = None;
    for (entity, (_building, footprint, structure)) in
        world.query_mut::<(&Building, &Footprint, &Structure)>()
    {
        if structure.state != BuildingState::Alive {
            continue;
        }
        let distance = footprint.rect.distance_to_point(&point);
        if distance <= STICKY_ATTACH_RANGE && best.map_or(true, |(_, d, _)| distance < d) {
            best = Some((entity, distance, footprint.rect));
        }
    }

    match best {
        Some((target, _, rect)) => {
            let surface = rect.closest_point(&point);
            world.spawn((
                WeaponEffect,
                surface,
                Velocity::default(),
                StickyState {
                    attached_to: Some(target),
                    offset_x: surface.x - rect.x,
                    offset_y: surface.y - rect.y,
                    resting: false,
                },
            ));
        }
        None => {
            let resting = y >= GROUND_Y - 1.0;
            world.spawn((
                WeaponEffect,
                Position::new(x, y.min(GROUND_Y)),
                Velocity::default(),
                StickyState {
                    attached_to: None,
                    offset_x: 0.0,
                    offset_y: 0.0,
                    resting,
                },
            ));
        }
    }
}

/// Advance every active weapon effect one tick.
#[allow(clippy::too_many_arguments)]
pub fn run(
    world: &mut World,
    mut bridge: Option<&mut BridgeState>,
    mut water: Option<&mut WaterState>,
    controls: &ControlState,
    tick: u64,
    rng: &mut ChaCha8Rng,
    debris: &mut DebrisState,
    events: &mut Vec<FxEvent>,
    tunables: &Tunables,
    despawn_buffer: &mut Vec<Entity>,
) {
    run_meteors(
        world, bridge.as_deref_mut(), water.as_deref_mut(), tick, rng, debris, events, tunables,
        despawn_buffer,
    );
    run_nuke_bombs(
        world, bridge.as_deref_mut(), water.as_deref_mut(), tick, rng, debris, events, tunables,
        despawn_buffer,
    );
    run_lasers(world, bridge.as_deref_mut(), tick, rng, debris, events, tunables, despawn_buffer);
    run_tornadoes(
        world, bridge.as_deref_mut(), tick, rng, debris, events, tunables, despawn_buffer,
    );
    run_missiles(
        world, bridge.as_deref_mut(), water.as_deref_mut(), controls, tick, rng, debris, events,
        tunables, despawn_buffer,
    );
    run_sticky_bombs(world, tick, tunables, despawn_buffer);
}

/// Resolve one explosion: event, area damage, water splash, dust.
#[allow(clippy::too_many_arguments)]
fn explode(
    world: &mut World,
    bridge: Option<&mut BridgeState>,
    water: Option<&mut WaterState>,
    center: Position,
    radius: f64,
    base_damage: f64,
    cap: f64,
    tick: u64,
    rng: &mut ChaCha8Rng,
    debris: &mut DebrisState,
    events: &mut Vec<FxEvent>,
    tunables: &Tunables,
) {
    events.push(FxEvent::Explosion {
        x: center.x,
        y: center.y,
        radius,
    });
    damage::apply_area_damage(
        world,
        bridge,
        &AreaDamage {
            center,
            radius,
            base_damage,
            exponent: EXPLOSIVE_FALLOFF_EXP,
            cap: Some(cap),
        },
        tick,
        rng,
        debris,
        events,
        tunables,
    );
    if let Some(w) = water {
        if w.in_splash_range(center.x, center.y) {
            let impulse = radius * 0.2;
            w.splash(center.x, impulse);
            events.push(FxEvent::Splash {
                x: center.x,
                impulse,
            });
        }
    }
    debris
        .pool_mut(DebrisKind::Dust)
        .spawn_scatter(rng, center.x, center.y, 3, 60.0, tick);
}

#[allow(clippy::too_many_arguments)]
fn run_meteors(
    world: &mut World,
    mut bridge: Option<&mut BridgeState>,
    mut water: Option<&mut WaterState>,
    tick: u64,
    rng: &mut ChaCha8Rng,
    debris: &mut DebrisState,
    events: &mut Vec<FxEvent>,
    tunables: &Tunables,
    despawn_buffer: &mut Vec<Entity>,
) {
    let meteors: Vec<(Entity, Meteor)> = world
        .query_mut::<&Meteor>()
        .into_iter()
        .map(|(e, m)| (e, m.clone()))
        .collect();

    for (entity, meteor) in meteors {
        let elapsed = tick.saturating_sub(meteor.launch_tick);
        if elapsed >= meteor.travel_ticks {
            explode(
                world,
                bridge.as_deref_mut(),
                water.as_deref_mut(),
                meteor.target,
                METEOR_RADIUS,
                METEOR_DAMAGE,
                METEOR_DAMAGE_CAP,
                tick,
                rng,
                debris,
                events,
                tunables,
            );
            despawn_buffer.push(entity);
        } else {
            let p = elapsed as f64 / meteor.travel_ticks as f64;
            if let Ok(mut pos) = world.get::<&mut Position>(entity) {
                pos.x = meteor.origin.x + (meteor.target.x - meteor.origin.x) * p;
                pos.y = meteor.origin.y + (meteor.target.y - meteor.origin.y) * p;
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn run_nuke_bombs(
    world: &mut World,
    mut bridge: Option<&mut BridgeState>,
    mut water: Option<&mut WaterState>,
    tick: u64,
    rng: &mut ChaCha8Rng,
    debris: &mut DebrisState,
    events: &mut Vec<FxEvent>,
    tunables: &Tunables,
    despawn_buffer: &mut Vec<Entity>,
) {
    let solid_rects: Vec<Rect> = collect_solid_rects(world);
    let bombs: Vec<(Entity, Position, Velocity)> = world
        .query_mut::<(&NukeBomb, &Position, &Velocity)>()
        .into_iter()
        .map(|(e, (_, p, v))| (e, *p, *v))
        .collect();

    for (entity, pos, vel) in bombs {
        let next = Position::new(pos.x, pos.y + vel.y * DT);
        let deck_contact = bridge
            .as_deref()
            .and_then(|b| b.deck_surface_at(next.x))
            .is_some_and(|deck_y| next.y >= deck_y);
        let contact = next.y >= GROUND_Y
            || deck_contact
            || solid_rects.iter().any(|r| r.contains(&next));

        if contact {
            explode(
                world,
                bridge.as_deref_mut(),
                water.as_deref_mut(),
                Position::new(next.x, next.y.min(GROUND_Y)),
                NUKE_RADIUS,
                NUKE_DAMAGE,
                NUKE_DAMAGE_CAP,
                tick,
                rng,
                debris,
                events,
                tunables,
            );
            despawn_buffer.push(entity);
        } else if let Ok(mut p) = world.get::<&mut Position>(entity) {
            *p = next;
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn run_lasers(
    world: &mut World,
    mut bridge: Option<&mut BridgeState>,
    tick: u64,
    rng: &mut ChaCha8Rng,
    debris: &mut DebrisState,
    events: &mut Vec<FxEvent>,
    tunables: &Tunables,
    despawn_buffer: &mut Vec<Entity>,
) {
    let lasers: Vec<(Entity, OrbitalLaser)> = world
        .query_mut::<&OrbitalLaser>()
        .into_iter()
        .map(|(e, l)| (e, l.clone()))
        .collect();

    for (entity, laser) in lasers {
        if tick.saturating_sub(laser.start_tick) >= laser.duration_ticks {
            despawn_buffer.push(entity);
            continue;
        }

        // Fixed per-tick damage along the beam's full vertical path,
        // falling off with horizontal distance from the beam line.
        let mut impact_y = GROUND_Y;
        for (_entity, (building, footprint, structure, collapse, material)) in world
            .query_mut::<(
                &Building,
                &Footprint,
                &mut Structure,
                &mut CollapseAnim,
                &Material,
            )>()
        {
            let rect = footprint.rect;
            let dx = if rect.spans_x(laser.x) {
                0.0
            } else {
                (laser.x - rect.x).abs().min((laser.x - rect.right()).abs())
            };
            if dx > LASER_HALF_WIDTH || structure.state == BuildingState::Collapsed {
                continue;
            }
            if rect.spans_x(laser.x) {
                impact_y = impact_y.min(rect.y);
            }
            let amount = scaled_damage(
                LASER_TICK_DAMAGE * tunables.damage_scale,
                dx,
                LASER_HALF_WIDTH,
                SUSTAINED_FALLOFF_EXP,
                structure.material_resistance,
                Some(LASER_DAMAGE_CAP),
            );
            structural::apply_building_damage(
                building, footprint, structure, collapse, *material, amount, tick, rng, debris,
                events,
            );
        }

        if let Some(b) = bridge.as_deref_mut() {
            if let Some(idx) = b.segment_index_at(laser.x) {
                b.damage_segment(
                    idx,
                    LASER_TICK_DAMAGE * tunables.damage_scale,
                    tick,
                    rng,
                    debris,
                    events,
                );
            }
        }

        if tick >= laser.next_spark_tick {
            events.push(FxEvent::ImpactSpark {
                x: laser.x,
                y: impact_y,
            });
            if let Ok(mut l) = world.get::<&mut OrbitalLaser>(entity) {
                l.next_spark_tick = tick + secs_to_ticks(SPARK_MIN_INTERVAL_SECS);
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn run_tornadoes(
    world: &mut World,
    mut bridge: Option<&mut BridgeState>,
    tick: u64,
    rng: &mut ChaCha8Rng,
    debris: &mut DebrisState,
    events: &mut Vec<FxEvent>,
    tunables: &Tunables,
    despawn_buffer: &mut Vec<Entity>,
) {
    let tornadoes: Vec<(Entity, Tornado, Position)> = world
        .query_mut::<(&Tornado, &Position)>()
        .into_iter()
        .map(|(e, (t, p))| (e, t.clone(), *p))
        .collect();

    for (entity, tornado, pos) in tornadoes {
        if tick.saturating_sub(tornado.start_tick) >= tornado.duration_ticks {
            despawn_buffer.push(entity);
            continue;
        }

        let phase = tornado.wander_phase + tick as f64 * DT;
        let new_x = (pos.x
            + (tornado.drift_dir * TORNADO_DRIFT_SPEED + (phase * 0.7).sin() * 30.0) * DT)
            .clamp(40.0, WORLD_WIDTH - 40.0);
        let center = Position::new(new_x, pos.y);

        if let Ok(mut p) = world.get::<&mut Position>(entity) {
            p.x = new_x;
        }

        damage::apply_area_damage(
            world,
            bridge.as_deref_mut(),
            &AreaDamage {
                center,
                radius: TORNADO_RADIUS,
                base_damage: TORNADO_TICK_DAMAGE,
                exponent: SUSTAINED_FALLOFF_EXP,
                cap: Some(TORNADO_DAMAGE_CAP),
            },
            tick,
            rng,
            debris,
            events,
            tunables,
        );

        // Inverse-distance shove on nearby debris, with lift.
        debris.push_from(
            center.x,
            GROUND_Y - 60.0,
            TORNADO_PUSH_RADIUS,
            TORNADO_PUSH_STRENGTH,
            DT,
        );

        if tick >= tornado.next_spark_tick {
            events.push(FxEvent::ImpactSpark {
                x: center.x,
                y: GROUND_Y - rng.gen_range(0.0..120.0),
            });
            if let Ok(mut t) = world.get::<&mut Tornado>(entity) {
                t.next_spark_tick = tick + secs_to_ticks(SPARK_MIN_INTERVAL_SECS);
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn run_missiles(
    world: &mut World,
    mut bridge: Option<&mut BridgeState>,
    mut water: Option<&mut WaterState>,
    controls: &ControlState,
    tick: u64,
    rng: &mut ChaCha8Rng,
    debris: &mut DebrisState,
    events: &mut Vec<FxEvent>,
    tunables: &Tunables,
    despawn_buffer: &mut Vec<Entity>,
) {
    let solid_rects: Vec<Rect> = collect_solid_rects(world);
    let missiles: Vec<(Entity, GuidedMissile, Position, Velocity)> = world
        .query_mut::<(&GuidedMissile, &Position, &Velocity)>()
        .into_iter()
        .map(|(e, (m, p, v))| (e, m.clone(), *p, *v))
        .collect();

    let aim = Position::new(controls.aim_x, controls.aim_y);

    for (entity, missile, pos, vel) in missiles {
        let expired =
            tick.saturating_sub(missile.launch_tick) >= missile.lifetime_ticks;

        // Home toward the aim pointer within the turn-rate limit.
        let current_angle = vel.y.atan2(vel.x);
        let desired_angle = (aim.y - pos.y).atan2(aim.x - pos.x);
        let mut diff = desired_angle - current_angle;
        while diff > std::f64::consts::PI {
            diff -= std::f64::consts::TAU;
        }
        while diff < -std::f64::consts::PI {
            diff += std::f64::consts::TAU;
        }
        let max_turn = MISSILE_TURN_RATE * DT;
        let new_angle = current_angle + diff.clamp(-max_turn, max_turn);
        let new_vel = Velocity::new(
            MISSILE_SPEED * new_angle.cos(),
            MISSILE_SPEED * new_angle.sin(),
        );
        let next = Position::new(pos.x + new_vel.x * DT, pos.y + new_vel.y * DT);

        let deck_contact = bridge
            .as_deref()
            .and_then(|b| b.deck_surface_at(next.x))
            .is_some_and(|deck_y| next.y >= deck_y);
        let contact = next.y >= GROUND_Y
            || deck_contact
            || solid_rects.iter().any(|r| r.contains(&next));

        if contact || expired {
            explode(
                world,
                bridge.as_deref_mut(),
                water.as_deref_mut(),
                Position::new(next.x, next.y.min(GROUND_Y)),
                MISSILE_RADIUS,
                MISSILE_DAMAGE,
                MISSILE_DAMAGE_CAP,
                tick,
                rng,
                debris,
                events,
                tunables,
            );
            despawn_buffer.push(entity);
            continue;
        }

        if let Ok(mut p) = world.get::<&mut Position>(entity) {
            *p = next;
        }
        if let Ok(mut v) = world.get::<&mut Velocity>(entity) {
            *v = new_vel;
        }
    }
}

/// Sticky bomb upkeep: dangling attachments detach (the target collapsed
/// or despawned) and free bombs fall to the ground.
fn run_sticky_bombs(world: &mut World, _tick: u64, tunables: &Tunables, _despawn: &mut Vec<Entity>) {
    let stickies: Vec<(Entity, StickyState, Position, Velocity)> = world
        .query_mut::<(&StickyState, &Position, &Velocity)>()
        .into_iter()
        .map(|(e, (s, p, v))| (e, s.clone(), *p, *v))
        .collect();

    for (entity, mut sticky, mut pos, mut vel) in stickies {
        if let Some(target) = sticky.attached_to {
            let attachment = world
                .get::<&Structure>(target)
                .ok()
                .map(|s| s.state == BuildingState::Alive)
                .unwrap_or(false);
            if attachment {
                // Follow the (immutable) footprint surface point.
                if let Ok(footprint) = world.get::<&Footprint>(target) {
                    pos.x = footprint.rect.x + sticky.offset_x;
                    pos.y = footprint.rect.y + sticky.offset_y;
                }
            } else {
                // Existence/state check failed: fall free.
                sticky.attached_to = None;
                sticky.resting = false;
                vel = Velocity::default();
            }
        }

        if sticky.attached_to.is_none() && !sticky.resting {
            vel.y += tunables.gravity * DT;
            pos.y += vel.y * DT;
            if pos.y >= GROUND_Y {
                pos.y = GROUND_Y;
                vel.y = 0.0;
                sticky.resting = true;
            }
        }

        if let Ok(mut s) = world.get::<&mut StickyState>(entity) {
            *s = sticky;
        }
        if let Ok(mut p) = world.get::<&mut Position>(entity) {
            *p = pos;
        }
        if let Ok(mut v) = world.get::<&mut Velocity>(entity) {
            *v = vel;
        }
    }
}

/// Detonate every placed sticky bomb in one batch. Damage is aggregated
/// per target and clamped to the batch cap so a cluster can never
/// instant-kill a building.
#[allow(clippy::too_many_arguments)]
pub fn detonate_stickies(
    world: &mut World,
    mut bridge: Option<&mut BridgeState>,
    mut water: Option<&mut WaterState>,
    tick: u64,
    rng: &mut ChaCha8Rng,
    debris: &mut DebrisState,
    events: &mut Vec<FxEvent>,
    tunables: &Tunables,
) {
    let bombs: Vec<(Entity, Position)> = world
        .query_mut::<(&StickyState, &Position)>()
        .into_iter()
        .map(|(e, (_, p))| (e, *p))
        .collect();
    if bombs.is_empty() {
        return;
    }

    for (_, pos) in &bombs {
        events.push(FxEvent::Explosion {
            x: pos.x,
            y: pos.y,
            radius: STICKY_RADIUS,
        });
        debris
            .pool_mut(DebrisKind::Dust)
            .spawn_scatter(rng, pos.x, pos.y, 2, 50.0, tick);
        if let Some(w) = water.as_deref_mut() {
            if w.in_splash_range(pos.x, pos.y) {
                w.splash(pos.x, STICKY_RADIUS * 0.15);
            }
        }
    }

    // Aggregate per building, then clamp to the batch cap.
    let buildings: Vec<(Entity, Rect, f64)> = world
        .query_mut::<(&Building, &Footprint, &Structure)>()
        .into_iter()
        .filter(|(_, (_, _, s))| s.state != BuildingState::Collapsed)
        .map(|(e, (_, f, s))| (e, f.rect, s.material_resistance))
        .collect();

    for (target, rect, resistance) in buildings {
        let mut total = 0.0;
        for (_, pos) in &bombs {
            let distance = rect.distance_to_point(pos);
            if distance <= STICKY_RADIUS {
                total += scaled_damage(
                    STICKY_DAMAGE * tunables.damage_scale,
                    distance,
                    STICKY_RADIUS,
                    EXPLOSIVE_FALLOFF_EXP,
                    resistance,
                    None,
                );
            }
        }
        if total > 0.0 {
            damage::apply_raw_building_damage(
                world,
                target,
                total.min(tunables.sticky_batch_cap),
                tick,
                rng,
                debris,
                events,
            );
        }
    }

    // Bridge segments aggregate under the same cap.
    if let Some(b) = bridge.as_deref_mut() {
        for idx in 0..b.segments.len() {
            let seg_pos = Position::new(b.segments[idx].pos.x, b.segments[idx].pos.y);
            let mut total = 0.0;
            for (_, pos) in &bombs {
                let distance = seg_pos.distance_to(pos);
                if distance <= STICKY_RADIUS {
                    total += scaled_damage(
                        STICKY_DAMAGE * tunables.damage_scale,
                        distance,
                        STICKY_RADIUS,
                        EXPLOSIVE_FALLOFF_EXP,
                        1.0,
                        None,
                    );
                }
            }
            if total > 0.0 {
                b.damage_segment(idx, total.min(tunables.sticky_batch_cap), tick, rng, debris, events);
            }
        }
    }

    for (entity, _) in bombs {
        let _ = world.despawn(entity);
    }
}

/// Footprints of buildings that still stop projectiles.
fn collect_solid_rects(world: &mut World) -> Vec<Rect> {
    world
        .query_mut::<(&Building, &Footprint, &Structure)>()
        .into_iter()
        .filter(|(_, (_, _, s))| s.state != BuildingState::Collapsed)
        .map(|(_, (_, f, _))| f.rect)
        .collect()
}
