#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use rubble_core::constants::{GROUND_Y, WORLD_WIDTH};
    use rubble_core::enums::CityKind;

    use crate::generate;

    #[test]
    fn test_downtown_buildings_stand_on_ground() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let plan = generate(CityKind::Downtown, &mut rng);

        assert!(plan.buildings.len() >= 8, "downtown should be dense");
        assert!(plan.bridge.is_none());
        assert!(plan.water.is_none());

        for b in &plan.buildings {
            assert!((b.rect.bottom() - GROUND_Y).abs() < 1e-9);
            assert!(b.rect.x >= 0.0 && b.rect.right() <= WORLD_WIDTH);
            assert!(b.max_health > 0.0);
            assert!((0.7..=1.3 * 1.0001).contains(&b.material_resistance));
        }
    }

    #[test]
    fn test_downtown_buildings_do_not_overlap() {
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let plan = generate(CityKind::Downtown, &mut rng);
        for pair in plan.buildings.windows(2) {
            assert!(
                pair[0].rect.right() < pair[1].rect.x,
                "adjacent footprints must not overlap"
            );
        }
    }

    #[test]
    fn test_waterfront_has_bridge_over_water() {
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let plan = generate(CityKind::Waterfront, &mut rng);

        let bridge = plan.bridge.expect("waterfront should have a bridge");
        let water = plan.water.expect("waterfront should have water");

        assert!((8..=30).contains(&bridge.segment_count));
        assert!(bridge.start_x < water.start_x && bridge.end_x > water.end_x);
        assert!(bridge.deck_y < water.surface_y, "deck sits above the water");
        assert!(bridge.tower_xs[0] < bridge.tower_xs[1]);

        // No building footprint intrudes into the water span.
        for b in &plan.buildings {
            assert!(
                b.rect.right() < water.start_x || b.rect.x > water.end_x,
                "building at {} overlaps the water span",
                b.rect.x
            );
        }
    }

    #[test]
    fn test_generation_is_pure() {
        let plan_a = generate(CityKind::Downtown, &mut ChaCha8Rng::seed_from_u64(5));
        let plan_b = generate(CityKind::Downtown, &mut ChaCha8Rng::seed_from_u64(5));
        assert_eq!(plan_a.buildings.len(), plan_b.buildings.len());
        for (a, b) in plan_a.buildings.iter().zip(&plan_b.buildings) {
            assert_eq!(a.rect, b.rect);
            assert_eq!(a.material, b.material);
            assert_eq!(a.max_health, b.max_health);
        }
    }
}
