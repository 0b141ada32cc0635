//! Entity spawn factories for populating the simulation world from a
//! generated city plan.

use hecs::World;

use rubble_core::components::{Building, CollapseAnim, Footprint, Structure, VoxelCutouts};
use rubble_core::enums::{BuildingState, Material};
use rubble_core::types::Rect;
use rubble_procgen::CityPlan;

/// Spawn every building in the plan. Index order is the snapshot order.
pub fn populate_city(world: &mut World, plan: &CityPlan) {
    for (index, building) in plan.buildings.iter().enumerate() {
        spawn_building(
            world,
            index,
            building.rect,
            building.max_health,
            building.material_resistance,
            building.material,
        );
    }
}

/// Spawn a single building entity with full health.
pub fn spawn_building(
    world: &mut World,
    index: usize,
    rect: Rect,
    max_health: f64,
    material_resistance: f64,
    material: Material,
) -> hecs::Entity {
    world.spawn((
        Building { index },
        Footprint { rect },
        Structure {
            health: max_health,
            max_health,
            material_resistance,
            damage_stage: 0,
            previous_damage_stage: 0,
            state: BuildingState::Alive,
        },
        material,
        CollapseAnim::default(),
        VoxelCutouts::default(),
    ))
}
