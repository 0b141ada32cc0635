//! Player agent update: robot and UFO movement, resources, and weapon
//! firing.
//!
//! The body update runs inside one world query and records actions
//! (area hits, spawns, erosion) that need broader world access; actions
//! resolve after the borrow is released.

use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use rubble_core::commands::ControlState;
use rubble_core::components::*;
use rubble_core::config::Tunables;
use rubble_core::constants::*;
use rubble_core::enums::{AgentKind, BuildingState, DebrisKind, UfoVariant};
use rubble_core::events::FxEvent;
use rubble_core::types::{secs_to_ticks, Position, Velocity};

use crate::bridge::BridgeState;
use crate::damage::{self, AreaDamage};
use crate::debris::{DebrisState, Fragment};

/// Replace-wholesale spawn of the active agent body.
pub fn spawn_agent(world: &mut World, kind: AgentKind, variant: UfoVariant, tick: u64) -> Entity {
    match kind {
        AgentKind::Robot => world.spawn((
            PlayerAgent,
            Position::new(260.0, GROUND_Y),
            Velocity::default(),
            RobotBody {
                on_ground: true,
                airborne_since_tick: tick,
                thrusting: false,
                fuel: ROBOT_FUEL_MAX,
                energy: ROBOT_ENERGY_MAX,
                facing: 1.0,
                punch_ready_tick: 0,
                arm_laser_ready_ticks: [0, 0],
                hand_laser_next_shot_tick: 0,
                missile_ready_tick: 0,
                missile_windup_started: None,
            },
        )),
        AgentKind::Ufo => world.spawn((
            PlayerAgent,
            Position::new(320.0, 220.0),
            Velocity::default(),
            UfoBody {
                heading: 0.0,
                variant,
                energy: UFO_ENERGY_MAX,
                beam_next_shot_tick: 0,
                tractor_next_erosion_tick: 0,
                invisible: false,
            },
        )),
    }
}

/// Deferred work recorded during the body update.
enum AgentAction {
    AreaHit {
        center: Position,
        radius: f64,
        base: f64,
        exponent: f64,
        cap: Option<f64>,
    },
    ArmLaser {
        origin: Position,
        facing: f64,
    },
    SpawnMissile {
        pos: Position,
        vel: Velocity,
    },
    Erode {
        craft: Position,
        cells: usize,
    },
}

/// One agent tick.
#[allow(clippy::too_many_arguments)]
pub fn run(
    world: &mut World,
    mut bridge: Option<&mut BridgeState>,
    controls: &ControlState,
    tick: u64,
    rng: &mut ChaCha8Rng,
    debris: &mut DebrisState,
    events: &mut Vec<FxEvent>,
    tunables: &Tunables,
) {
    let mut actions: Vec<AgentAction> = Vec::new();

    for (_entity, (_agent, pos, vel, robot, ufo)) in world.query_mut::<(
        &PlayerAgent,
        &mut Position,
        &mut Velocity,
        Option<&mut RobotBody>,
        Option<&mut UfoBody>,
    )>() {
        if let Some(body) = robot {
            update_robot(pos, vel, body, controls, tick, rng, tunables, &mut actions, events);
        } else if let Some(body) = ufo {
            update_ufo(
                pos, vel, body, controls, tick, rng, debris, tunables, &mut actions, events,
            );
        }
    }

    for action in actions {
        resolve_action(
            world,
            bridge.as_deref_mut(),
            action,
            tick,
            rng,
            debris,
            events,
            tunables,
        );
    }
}

#[allow(clippy::too_many_arguments)]
fn update_robot(
    pos: &mut Position,
    vel: &mut Velocity,
    body: &mut RobotBody,
    controls: &ControlState,
    tick: u64,
    rng: &mut ChaCha8Rng,
    tunables: &Tunables,
    actions: &mut Vec<AgentAction>,
    events: &mut Vec<FxEvent>,
) {
    let dt = DT;

    // Lateral movement with ground friction.
    let input = controls.move_right as i8 - controls.move_left as i8;
    if input != 0 {
        vel.x += input as f64 * ROBOT_ACCEL * dt;
        body.facing = input as f64;
    } else if body.on_ground {
        vel.x *= (-ROBOT_FRICTION * dt).exp();
    }
    vel.x = vel.x.clamp(-ROBOT_MAX_SPEED, ROBOT_MAX_SPEED);

    // Jump, then delayed-onset thrust while the key is held.
    if controls.jump_held && body.on_ground {
        vel.y = -ROBOT_JUMP_IMPULSE;
        body.on_ground = false;
        body.airborne_since_tick = tick;
    }

    if !body.on_ground {
        vel.y += tunables.gravity * dt;

        let airtime_ok =
            tick.saturating_sub(body.airborne_since_tick) >= secs_to_ticks(ROBOT_THRUST_DELAY_SECS);
        if controls.jump_held && airtime_ok && body.fuel > 0.0 {
            body.thrusting = true;
            vel.y -= ROBOT_THRUST_ACCEL * dt;
            vel.y = vel.y.max(-ROBOT_MAX_ASCENT_SPEED);
            body.fuel -= ROBOT_FUEL_DRAIN_PER_SEC * dt;
        } else {
            body.thrusting = false;
        }
    } else {
        body.thrusting = false;
    }
    if !body.thrusting {
        body.fuel += ROBOT_FUEL_REGEN_PER_SEC * dt;
    }
    body.fuel = body.fuel.clamp(0.0, ROBOT_FUEL_MAX);

    pos.x = (pos.x + vel.x * dt).clamp(20.0, WORLD_WIDTH - 20.0);
    pos.y += vel.y * dt;
    if pos.y >= GROUND_Y {
        pos.y = GROUND_Y;
        vel.y = 0.0;
        body.on_ground = true;
    }

    // Pointer-aimed hand laser: energy-gated, fixed cadence.
    if controls.fire_held && body.energy > 0.0 {
        body.energy -= ROBOT_ENERGY_DRAIN_PER_SEC * dt;
        if tick >= body.hand_laser_next_shot_tick {
            body.hand_laser_next_shot_tick =
                tick + secs_to_ticks(1.0 / HAND_LASER_SHOTS_PER_SEC).max(1);
            actions.push(AgentAction::AreaHit {
                center: Position::new(controls.aim_x, controls.aim_y),
                radius: HAND_LASER_RADIUS,
                base: HAND_LASER_DAMAGE,
                exponent: SUSTAINED_FALLOFF_EXP,
                cap: None,
            });
            events.push(FxEvent::ImpactSpark {
                x: controls.aim_x,
                y: controls.aim_y,
            });
        }
    } else {
        body.energy += ROBOT_ENERGY_REGEN_PER_SEC * dt;
    }
    body.energy = body.energy.clamp(0.0, ROBOT_ENERGY_MAX);

    // Melee punch.
    if controls.punch && tick >= body.punch_ready_tick {
        body.punch_ready_tick = tick + secs_to_ticks(PUNCH_COOLDOWN_SECS);
        actions.push(AgentAction::AreaHit {
            center: Position::new(pos.x + body.facing * PUNCH_REACH, pos.y - 30.0),
            radius: PUNCH_RADIUS,
            base: PUNCH_DAMAGE,
            exponent: EXPLOSIVE_FALLOFF_EXP,
            cap: Some(PUNCH_DAMAGE_CAP),
        });
    }

    // Two independently cooldown-gated forearm lasers.
    if controls.secondary_held {
        for (arm, ready) in body.arm_laser_ready_ticks.iter_mut().enumerate() {
            if tick >= *ready {
                *ready = tick + secs_to_ticks(ARM_LASER_COOLDOWN_SECS);
                actions.push(AgentAction::ArmLaser {
                    origin: Position::new(pos.x, pos.y - 34.0 - arm as f64 * 10.0),
                    facing: body.facing,
                });
            }
        }
    }

    // Guided missile: pose windup, then launch.
    if controls.launch_missile
        && tick >= body.missile_ready_tick
        && body.missile_windup_started.is_none()
    {
        body.missile_windup_started = Some(tick);
    }
    if let Some(started) = body.missile_windup_started {
        if tick.saturating_sub(started) >= secs_to_ticks(MISSILE_WINDUP_SECS) {
            body.missile_windup_started = None;
            body.missile_ready_tick = tick + secs_to_ticks(MISSILE_COOLDOWN_SECS);

            let angle = (controls.aim_y - (pos.y - 40.0)).atan2(controls.aim_x - pos.x);
            // Slight launch scatter; homing corrects it.
            let angle = angle + rng.gen_range(-0.08..0.08);
            actions.push(AgentAction::SpawnMissile {
                pos: Position::new(pos.x, pos.y - 40.0),
                vel: Velocity::new(MISSILE_SPEED * angle.cos(), MISSILE_SPEED * angle.sin()),
            });
            events.push(FxEvent::MissileAway);
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn update_ufo(
    pos: &mut Position,
    vel: &mut Velocity,
    body: &mut UfoBody,
    controls: &ControlState,
    tick: u64,
    rng: &mut ChaCha8Rng,
    debris: &mut DebrisState,
    _tunables: &Tunables,
    actions: &mut Vec<AgentAction>,
    events: &mut Vec<FxEvent>,
) {
    let dt = DT;
    let (speed_mult, laser_mult, tractor_mult) = body.variant.multipliers();

    // Tank rotation plus thrust along the heading.
    let turn = controls.turn_right as i8 - controls.turn_left as i8;
    body.heading += turn as f64 * UFO_TURN_RATE * dt;

    if controls.throttle_forward {
        vel.x += body.heading.cos() * UFO_THRUST_ACCEL * speed_mult * dt;
        vel.y += body.heading.sin() * UFO_THRUST_ACCEL * speed_mult * dt;
    }
    if controls.throttle_reverse {
        vel.x -= body.heading.cos() * UFO_REVERSE_ACCEL * speed_mult * dt;
        vel.y -= body.heading.sin() * UFO_REVERSE_ACCEL * speed_mult * dt;
    }

    // Low drag; the craft coasts.
    let drag = (-UFO_FRICTION * dt).exp();
    vel.x *= drag;
    vel.y *= drag;
    let max_speed = UFO_MAX_SPEED * speed_mult;
    let speed = vel.speed();
    if speed > max_speed {
        let scale = max_speed / speed;
        vel.x *= scale;
        vel.y *= scale;
    }

    pos.x = (pos.x + vel.x * dt).clamp(20.0, WORLD_WIDTH - 20.0);
    pos.y = (pos.y + vel.y * dt).clamp(60.0, GROUND_Y - 40.0);

    // Pointer-aimed beam laser; DPS scales with the variant.
    if controls.fire_held && body.energy > 0.0 {
        body.energy -= UFO_BEAM_DRAIN_PER_SEC * dt;
        if tick >= body.beam_next_shot_tick {
            body.beam_next_shot_tick = tick + secs_to_ticks(1.0 / UFO_BEAM_SHOTS_PER_SEC).max(1);
            actions.push(AgentAction::AreaHit {
                center: Position::new(controls.aim_x, controls.aim_y),
                radius: UFO_BEAM_RADIUS,
                base: UFO_BEAM_DAMAGE * laser_mult,
                exponent: SUSTAINED_FALLOFF_EXP,
                cap: None,
            });
            events.push(FxEvent::ImpactSpark {
                x: controls.aim_x,
                y: controls.aim_y,
            });
        }
    } else {
        body.energy += UFO_ENERGY_REGEN_PER_SEC * dt;
    }
    body.energy = body.energy.clamp(0.0, UFO_ENERGY_MAX);

    // Tractor beam: wake and pull fragments toward a focus point below
    // the craft, and carve voxels out of buildings on a timer.
    if controls.secondary_held {
        let focus_x = pos.x;
        let focus_y = pos.y + TRACTOR_FOCUS_OFFSET;
        debris.wake_near(focus_x, focus_y, TRACTOR_RADIUS);
        debris.pull_toward(
            focus_x,
            focus_y,
            TRACTOR_RADIUS,
            TRACTOR_STRENGTH * tractor_mult,
            dt,
        );

        if tick >= body.tractor_next_erosion_tick {
            body.tractor_next_erosion_tick =
                tick + secs_to_ticks(TRACTOR_EROSION_INTERVAL_SECS).max(1);
            actions.push(AgentAction::Erode {
                craft: *pos,
                cells: rng.gen_range(TRACTOR_EROSION_CELLS_MIN..=TRACTOR_EROSION_CELLS_MAX),
            });
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn resolve_action(
    world: &mut World,
    bridge: Option<&mut BridgeState>,
    action: AgentAction,
    tick: u64,
    rng: &mut ChaCha8Rng,
    debris: &mut DebrisState,
    events: &mut Vec<FxEvent>,
    tunables: &Tunables,
) {
    match action {
        AgentAction::AreaHit {
            center,
            radius,
            base,
            exponent,
            cap,
        } => {
            damage::apply_area_damage(
                world,
                bridge,
                &AreaDamage {
                    center,
                    radius,
                    base_damage: base,
                    exponent,
                    cap,
                },
                tick,
                rng,
                debris,
                events,
                tunables,
            );
        }
        AgentAction::ArmLaser { origin, facing } => {
            resolve_arm_laser(world, bridge, origin, facing, tick, rng, debris, events, tunables);
        }
        AgentAction::SpawnMissile { pos, vel } => {
            world.spawn((
                WeaponEffect,
                pos,
                vel,
                GuidedMissile {
                    launch_tick: tick,
                    lifetime_ticks: secs_to_ticks(MISSILE_LIFETIME_SECS),
                },
            ));
        }
        AgentAction::Erode { craft, cells } => {
            resolve_erosion(world, craft, cells, tick, rng, debris, events);
        }
    }
}

/// Range-unbounded horizontal beam: hits the first standing building in
/// the facing direction at the beam height.
#[allow(clippy::too_many_arguments)]
fn resolve_arm_laser(
    world: &mut World,
    bridge: Option<&mut BridgeState>,
    origin: Position,
    facing: f64,
    tick: u64,
    rng: &mut ChaCha8Rng,
    debris: &mut DebrisState,
    events: &mut Vec<FxEvent>,
    tunables: &Tunables,
) {
    let mut hit: Option<Position> = None;
    let mut best_dx = f64::MAX;
    for (_entity, (_building, footprint, structure)) in
        world.query_mut::<(&Building, &Footprint, &Structure)>()
    {
        if structure.state == BuildingState::Collapsed {
            continue;
        }
        let rect = footprint.rect;
        if !rect.spans_y(origin.y) {
            continue;
        }
        let (edge, dx) = if facing > 0.0 && rect.x >= origin.x {
            (rect.x, rect.x - origin.x)
        } else if facing < 0.0 && rect.right() <= origin.x {
            (rect.right(), origin.x - rect.right())
        } else {
            continue;
        };
        if dx < best_dx {
            best_dx = dx;
            hit = Some(Position::new(edge, origin.y));
        }
    }

    if let Some(point) = hit {
        events.push(FxEvent::ImpactSpark {
            x: point.x,
            y: point.y,
        });
        damage::apply_area_damage(
            world,
            bridge,
            &AreaDamage {
                center: point,
                radius: ARM_LASER_RADIUS,
                base_damage: ARM_LASER_DAMAGE,
                exponent: SUSTAINED_FALLOFF_EXP,
                cap: None,
            },
            tick,
            rng,
            debris,
            events,
            tunables,
        );
    }
}

/// Carve a random cluster of voxel cells out of the nearest intact
/// building, spawn matching fragments, and apply a small health cost.
fn resolve_erosion(
    world: &mut World,
    craft: Position,
    cells: usize,
    tick: u64,
    rng: &mut ChaCha8Rng,
    debris: &mut DebrisState,
    events: &mut Vec<FxEvent>,
) {
    // Nearest living building within tractor reach.
    let mut target: Option<(Entity, f64)> = None;
    for (entity, (_building, footprint, structure)) in
        world.query_mut::<(&Building, &Footprint, &Structure)>()
    {
        if structure.state != BuildingState::Alive {
            continue;
        }
        let distance = footprint.rect.distance_to_point(&craft);
        if distance <= TRACTOR_EROSION_RANGE && target.map_or(true, |(_, d)| distance < d) {
            target = Some((entity, distance));
        }
    }
    let Some((entity, _)) = target else { return };

    let mut carved = 0usize;
    let mut building_index = 0usize;
    if let Ok((building, footprint, cutouts)) =
        world.query_one_mut::<(&Building, &Footprint, &mut VoxelCutouts)>(entity)
    {
        building_index = building.index;
        let rect = footprint.rect;
        let cols = (rect.w / VOXEL_CELL_SIZE) as i16;
        let rows = (rect.h / VOXEL_CELL_SIZE) as i16;
        if cols < 1 || rows < 1 {
            return;
        }

        let seed_point = rect.closest_point(&craft);
        let seed_col = (((seed_point.x - rect.x) / VOXEL_CELL_SIZE) as i16).clamp(0, cols - 1);
        let seed_row = (((seed_point.y - rect.y) / VOXEL_CELL_SIZE) as i16).clamp(0, rows - 1);

        for _ in 0..cells {
            let col = (seed_col + rng.gen_range(-2..=2)).clamp(0, cols - 1);
            let row = (seed_row + rng.gen_range(-2..=2)).clamp(0, rows - 1);
            if !cutouts.cells.insert((col, row)) {
                continue;
            }
            carved += 1;

            let cell_x = rect.x + (col as f64 + 0.5) * VOXEL_CELL_SIZE;
            let cell_y = rect.y + (row as f64 + 0.5) * VOXEL_CELL_SIZE;
            debris.pool_mut(DebrisKind::VoxelBit).spawn(Fragment {
                x: cell_x,
                y: cell_y,
                z: rng.gen_range(-20.0..20.0),
                vx: rng.gen_range(-60.0..60.0),
                vy: rng.gen_range(-160.0..-40.0),
                vz: rng.gen_range(-20.0..20.0),
                rotation: rng.gen_range(0.0..std::f64::consts::TAU),
                angular_vel: rng.gen_range(-6.0..6.0),
                size: VOXEL_CELL_SIZE * 0.8,
                color_index: rng.gen_range(0..4),
                spawn_tick: tick,
                on_ground: false,
                sleeping: false,
                do_not_draw: false,
                settled_tick: None,
            });
        }
    }

    if carved > 0 {
        events.push(FxEvent::VoxelsCarved {
            building_index,
            cells: carved,
        });
        damage::apply_raw_building_damage(
            world,
            entity,
            carved as f64 * TRACTOR_EROSION_DAMAGE_PER_CELL,
            tick,
            rng,
            debris,
            events,
        );
    }
}
