//! Cleanup system: despawns finished weapon effects, expired fires, and
//! strays that left the playfield.
//! Uses a pre-allocated buffer to avoid per-tick allocation.

use hecs::{Entity, World};

use rubble_core::components::{FireEmitter, WeaponEffect};
use rubble_core::constants::{GROUND_Y, WORLD_WIDTH};
use rubble_core::types::Position;

pub fn run(world: &mut World, tick: u64, despawn_buffer: &mut Vec<Entity>) {
    // Expired fire emitters.
    for (entity, fire) in world.query_mut::<&FireEmitter>() {
        if tick.saturating_sub(fire.start_tick) >= fire.lifetime_ticks {
            despawn_buffer.push(entity);
        }
    }

    // Effects that strayed far outside the playfield.
    for (entity, (_effect, pos)) in world.query_mut::<(&WeaponEffect, &Position)>() {
        if pos.x < -600.0 || pos.x > WORLD_WIDTH + 600.0 || pos.y > GROUND_Y + 600.0 {
            despawn_buffer.push(entity);
        }
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}
