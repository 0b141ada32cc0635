//! Skyline layout: building footprints, materials, health rolls, and the
//! waterfront bridge/water spans.

use rand::Rng;

use rubble_core::constants::*;
use rubble_core::enums::{BuildingCategory, CityKind, Material, StaticStructureKind};
use rubble_core::types::Rect;

/// Everything the engine needs to populate a fresh city.
#[derive(Debug, Clone)]
pub struct CityPlan {
    pub kind: CityKind,
    pub buildings: Vec<BuildingPlan>,
    pub static_structures: Vec<StaticStructureKind>,
    pub bridge: Option<BridgePlan>,
    pub water: Option<WaterPlan>,
}

/// One destructible building to spawn.
#[derive(Debug, Clone)]
pub struct BuildingPlan {
    pub rect: Rect,
    pub material: Material,
    pub category: BuildingCategory,
    pub max_health: f64,
    pub material_resistance: f64,
}

/// Suspension bridge spanning the water gap.
#[derive(Debug, Clone)]
pub struct BridgePlan {
    pub start_x: f64,
    pub end_x: f64,
    /// Deck surface y (y grows downward; deck sits above the water).
    pub deck_y: f64,
    pub segment_count: usize,
    /// Tower x positions, one per end quarter of the span.
    pub tower_xs: [f64; 2],
}

/// Water span beneath the bridge.
#[derive(Debug, Clone)]
pub struct WaterPlan {
    pub start_x: f64,
    pub end_x: f64,
    pub surface_y: f64,
}

/// Generate a city plan. Pure function of (kind, rng).
pub fn generate(kind: CityKind, rng: &mut impl Rng) -> CityPlan {
    match kind {
        CityKind::Downtown => generate_downtown(rng),
        CityKind::Waterfront => generate_waterfront(rng),
    }
}

fn generate_downtown(rng: &mut impl Rng) -> CityPlan {
    let mut buildings = Vec::new();
    let mut cursor = rng.gen_range(30.0..90.0);

    while cursor < WORLD_WIDTH - 200.0 && buildings.len() < 16 {
        let plan = roll_building(rng, cursor);
        cursor = plan.rect.right() + rng.gen_range(10.0..60.0);
        buildings.push(plan);
    }

    let static_structures = roll_static_structures(rng, &buildings);

    CityPlan {
        kind: CityKind::Downtown,
        buildings,
        static_structures,
        bridge: None,
        water: None,
    }
}

fn generate_waterfront(rng: &mut impl Rng) -> CityPlan {
    let water_start = WORLD_WIDTH * rng.gen_range(0.28..0.34);
    let water_end = WORLD_WIDTH * rng.gen_range(0.66..0.72);
    let surface_y = GROUND_Y - 24.0;

    // Buildings on the two shores.
    let mut buildings = Vec::new();
    let mut cursor = rng.gen_range(30.0..70.0);
    while cursor < water_start - 180.0 && buildings.len() < 5 {
        let plan = roll_building(rng, cursor);
        cursor = plan.rect.right() + rng.gen_range(14.0..50.0);
        buildings.push(plan);
    }
    cursor = water_end + rng.gen_range(40.0..90.0);
    while cursor < WORLD_WIDTH - 180.0 && buildings.len() < 10 {
        let plan = roll_building(rng, cursor);
        cursor = plan.rect.right() + rng.gen_range(14.0..50.0);
        buildings.push(plan);
    }

    // Bridge deck spans the water with a little overhang onto each shore.
    let start_x = water_start - 60.0;
    let end_x = water_end + 60.0;
    let span = end_x - start_x;
    let segment_count = ((span / 46.0) as usize).clamp(8, 30);
    let deck_y = surface_y - rng.gen_range(90.0..130.0);
    let tower_xs = [start_x + span * 0.22, start_x + span * 0.78];

    let static_structures = roll_static_structures(rng, &buildings);

    CityPlan {
        kind: CityKind::Waterfront,
        buildings,
        static_structures,
        bridge: Some(BridgePlan {
            start_x,
            end_x,
            deck_y,
            segment_count,
            tower_xs,
        }),
        water: Some(WaterPlan {
            start_x: water_start,
            end_x: water_end,
            surface_y,
        }),
    }
}

/// Roll one building standing on the ground at `x`.
fn roll_building(rng: &mut impl Rng, x: f64) -> BuildingPlan {
    let height = rng.gen_range(120.0..420.0);
    let category = if height < 200.0 {
        BuildingCategory::LowRise
    } else if height < 320.0 {
        BuildingCategory::MidRise
    } else {
        BuildingCategory::Tower
    };
    let width = match category {
        BuildingCategory::LowRise => rng.gen_range(110.0..180.0),
        BuildingCategory::MidRise => rng.gen_range(100.0..150.0),
        BuildingCategory::Tower => rng.gen_range(90.0..130.0),
    };

    let material = roll_material(rng, category);
    let max_health =
        rng.gen_range(BUILDING_HEALTH_MIN..BUILDING_HEALTH_MAX) * category.health_scale();
    let material_resistance =
        rng.gen_range(MATERIAL_RESISTANCE_MIN..MATERIAL_RESISTANCE_MAX);

    BuildingPlan {
        rect: Rect::new(x, GROUND_Y - height, width, height),
        material,
        category,
        max_health,
        material_resistance,
    }
}

/// Material mix: towers skew to glass curtain walls, low-rises to masonry.
fn roll_material(rng: &mut impl Rng, category: BuildingCategory) -> Material {
    let roll: f64 = rng.gen_range(0.0..1.0);
    match category {
        BuildingCategory::Tower => {
            if roll < 0.6 {
                Material::Glass
            } else {
                Material::Concrete
            }
        }
        BuildingCategory::MidRise => {
            if roll < 0.4 {
                Material::Glass
            } else if roll < 0.7 {
                Material::Brick
            } else {
                Material::Concrete
            }
        }
        BuildingCategory::LowRise => {
            if roll < 0.55 {
                Material::Brick
            } else {
                Material::Concrete
            }
        }
    }
}

/// Cosmetic rooftop structures on a few of the taller buildings.
fn roll_static_structures(
    rng: &mut impl Rng,
    buildings: &[BuildingPlan],
) -> Vec<StaticStructureKind> {
    let mut structures = Vec::new();
    for plan in buildings {
        if plan.category == BuildingCategory::LowRise {
            continue;
        }
        let roll: f64 = rng.gen_range(0.0..1.0);
        if roll < 0.3 {
            let w = plan.rect.w * 0.6;
            structures.push(StaticStructureKind::Billboard {
                rect: Rect::new(
                    plan.rect.x + (plan.rect.w - w) / 2.0,
                    plan.rect.y - 34.0,
                    w,
                    28.0,
                ),
            });
        } else if roll < 0.45 {
            structures.push(StaticStructureKind::Antenna {
                base_x: plan.rect.x + plan.rect.w / 2.0,
                base_y: plan.rect.y,
                height: rng.gen_range(20.0..50.0),
            });
        }
    }
    structures
}
