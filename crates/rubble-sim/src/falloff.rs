//! Radial damage falloff — the single model every weapon and the tractor
//! beam share.
//!
//! `falloff(0) = 1`, `falloff(max_distance) = 0`, monotone non-increasing
//! in distance. Exponent 3 concentrates damage near the center (explosive
//! weapons); exponent 2 spreads it (sustained effects).

use rubble_core::types::{Position, Rect};

/// Distance-based damage multiplier in [0, 1].
///
/// `max_distance <= 0` is treated as "no falloff" (full damage) rather
/// than dividing by zero.
pub fn falloff(distance: f64, max_distance: f64, exponent: f64) -> f64 {
    if max_distance <= 0.0 {
        return 1.0;
    }
    let t = 1.0 - (distance / max_distance).clamp(0.0, 1.0);
    t.powf(exponent)
}

/// Final damage for one application: base scaled by falloff and the
/// target's material resistance, clamped to an optional per-application
/// cap so overlapping effects cannot stack into an instant kill.
pub fn scaled_damage(
    base: f64,
    distance: f64,
    max_distance: f64,
    exponent: f64,
    resistance: f64,
    cap: Option<f64>,
) -> f64 {
    let damage = base * resistance * falloff(distance, max_distance, exponent);
    match cap {
        Some(c) => damage.min(c),
        None => damage,
    }
}

/// Distance from an effect center to a building footprint (closest-point;
/// zero when the center is inside the rect).
pub fn distance_to_rect(center: &Position, rect: &Rect) -> f64 {
    rect.distance_to_point(center)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_falloff_endpoints() {
        for exp in [2.0, 3.0] {
            assert!((falloff(0.0, 200.0, exp) - 1.0).abs() < 1e-12);
            assert!(falloff(200.0, 200.0, exp).abs() < 1e-12);
        }
    }

    #[test]
    fn test_falloff_beyond_max_is_zero() {
        assert_eq!(falloff(500.0, 200.0, 3.0), 0.0);
    }

    #[test]
    fn test_falloff_zero_max_distance_full_damage() {
        // Division guard: no falloff applied.
        assert_eq!(falloff(50.0, 0.0, 3.0), 1.0);
        assert_eq!(falloff(50.0, -1.0, 2.0), 1.0);
    }

    #[test]
    fn test_exponent_three_concentrates() {
        // At half distance, exponent 3 should pass less damage than 2.
        let half2 = falloff(100.0, 200.0, 2.0);
        let half3 = falloff(100.0, 200.0, 3.0);
        assert!(half3 < half2);
    }

    #[test]
    fn test_scaled_damage_cap() {
        // Point-blank with a heavy-resistance target: cap wins.
        let dmg = scaled_damage(120.0, 0.0, 200.0, 3.0, 1.3, Some(140.0));
        assert!((dmg - 140.0).abs() < 1e-12);

        // Uncapped passes through.
        let dmg = scaled_damage(120.0, 0.0, 200.0, 3.0, 1.3, None);
        assert!((dmg - 156.0).abs() < 1e-12);
    }

    #[test]
    fn test_distance_to_rect_inside_is_zero() {
        let rect = rubble_core::types::Rect::new(0.0, 0.0, 100.0, 300.0);
        let inside = Position::new(50.0, 150.0);
        assert_eq!(distance_to_rect(&inside, &rect), 0.0);
    }

    proptest! {
        /// Falloff stays within [0, 1] over the whole domain.
        #[test]
        fn prop_falloff_bounded(
            distance in 0.0f64..1000.0,
            max_distance in 1.0f64..500.0,
            exponent in prop::sample::select(vec![2.0f64, 3.0]),
        ) {
            let f = falloff(distance, max_distance, exponent);
            prop_assert!((0.0..=1.0).contains(&f));
        }

        /// Falloff is monotone non-increasing in distance.
        #[test]
        fn prop_falloff_monotone(
            d1 in 0.0f64..500.0,
            delta in 0.0f64..500.0,
            max_distance in 1.0f64..500.0,
            exponent in prop::sample::select(vec![2.0f64, 3.0]),
        ) {
            let near = falloff(d1, max_distance, exponent);
            let far = falloff(d1 + delta, max_distance, exponent);
            prop_assert!(far <= near + 1e-12);
        }
    }
}
