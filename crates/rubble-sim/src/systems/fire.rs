//! Fire emitters left burning after collapses: periodic smoke puffs and
//! the occasional ember.

use hecs::World;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use rubble_core::components::FireEmitter;
use rubble_core::constants::FIRE_PUFF_INTERVAL_SECS;
use rubble_core::enums::DebrisKind;
use rubble_core::types::{secs_to_ticks, Position};

use crate::debris::DebrisState;

pub fn run(world: &mut World, tick: u64, rng: &mut ChaCha8Rng, debris: &mut DebrisState) {
    for (_entity, (fire, pos)) in world.query_mut::<(&mut FireEmitter, &Position)>() {
        if tick < fire.next_puff_tick {
            continue;
        }
        fire.next_puff_tick = tick + secs_to_ticks(FIRE_PUFF_INTERVAL_SECS).max(1);

        debris
            .pool_mut(DebrisKind::Dust)
            .spawn_scatter(rng, pos.x, pos.y - 6.0, 1, 26.0, tick);
        if rng.gen_bool(0.25) {
            debris
                .pool_mut(DebrisKind::MicroChip)
                .spawn_scatter(rng, pos.x, pos.y, 1, 90.0, tick);
        }
    }
}
