#[cfg(test)]
mod tests {
    use crate::commands::{ControlState, PlayerCommand};
    use crate::config::Tunables;
    use crate::enums::*;
    use crate::events::FxEvent;
    use crate::state::WorldSnapshot;
    use crate::types::{secs_to_ticks, Position, Rect, SimTime, Velocity};

    /// Verify enums round-trip through serde_json.
    #[test]
    fn test_material_serde() {
        let variants = vec![Material::Glass, Material::Brick, Material::Concrete];
        for v in variants {
            let json = serde_json::to_string(&v).unwrap();
            let back: Material = serde_json::from_str(&json).unwrap();
            assert_eq!(v, back);
        }
    }

    #[test]
    fn test_building_state_serde() {
        let variants = vec![
            BuildingState::Alive,
            BuildingState::Collapsing,
            BuildingState::Collapsed,
        ];
        for v in variants {
            let json = serde_json::to_string(&v).unwrap();
            let back: BuildingState = serde_json::from_str(&json).unwrap();
            assert_eq!(v, back);
        }
    }

    #[test]
    fn test_weapon_kind_serde() {
        let variants = vec![
            WeaponKind::Meteor,
            WeaponKind::Nuke,
            WeaponKind::OrbitalLaser,
            WeaponKind::Tornado,
            WeaponKind::StickyBomb,
        ];
        for v in variants {
            let json = serde_json::to_string(&v).unwrap();
            let back: WeaponKind = serde_json::from_str(&json).unwrap();
            assert_eq!(v, back);
        }
    }

    /// Verify PlayerCommand round-trips through serde (tagged union).
    #[test]
    fn test_player_command_serde() {
        let commands = vec![
            PlayerCommand::SetControls {
                controls: ControlState {
                    fire_held: true,
                    aim_x: 410.0,
                    aim_y: 200.0,
                    ..Default::default()
                },
            },
            PlayerCommand::TriggerWeapon {
                kind: WeaponKind::Nuke,
                x: 800.0,
                y: 620.0,
            },
            PlayerCommand::SelectAgent {
                kind: AgentKind::Ufo,
            },
            PlayerCommand::SelectUfoVariant {
                variant: UfoVariant::Salvager,
            },
            PlayerCommand::ToggleInvisibility,
            PlayerCommand::DetonateStickies,
            PlayerCommand::ResetCity,
            PlayerCommand::RegenerateCity {
                kind: CityKind::Waterfront,
            },
        ];
        for cmd in &commands {
            let json = serde_json::to_string(cmd).unwrap();
            let back: PlayerCommand = serde_json::from_str(&json).unwrap();
            assert_eq!(*cmd, back);
        }
    }

    /// Verify FxEvent round-trips through serde.
    #[test]
    fn test_fx_event_serde() {
        let events = vec![
            FxEvent::Explosion {
                x: 100.0,
                y: 600.0,
                radius: 200.0,
            },
            FxEvent::StageCrossed {
                building_index: 3,
                stage: 2,
            },
            FxEvent::SegmentBroken { segment_index: 7 },
            FxEvent::Splash {
                x: 1200.0,
                impulse: 35.0,
            },
        ];
        for event in &events {
            let json = serde_json::to_string(event).unwrap();
            let back: FxEvent = serde_json::from_str(&json).unwrap();
            assert_eq!(*event, back);
        }
    }

    /// Verify the empty snapshot serializes small.
    #[test]
    fn test_snapshot_serde() {
        let snapshot = WorldSnapshot::default();
        let json = serde_json::to_string(&snapshot).unwrap();
        let back: WorldSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(snapshot.time.tick, back.time.tick);
        assert!(
            json.len() < 1024,
            "Empty snapshot should be <1KB, was {} bytes",
            json.len()
        );
    }

    /// Verify geometry helpers.
    #[test]
    fn test_position_distance() {
        let a = Position::new(0.0, 0.0);
        let b = Position::new(3.0, 4.0);
        assert!((a.distance_to(&b) - 5.0).abs() < 1e-10);
        assert!((a.horizontal_distance_to(&b) - 3.0).abs() < 1e-10);
    }

    #[test]
    fn test_velocity_speed() {
        let v = Velocity::new(3.0, 4.0);
        assert!((v.speed() - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_rect_closest_point() {
        let r = Rect::new(100.0, 100.0, 50.0, 200.0);

        // Inside: distance zero.
        let inside = Position::new(120.0, 150.0);
        assert_eq!(r.distance_to_point(&inside), 0.0);

        // Left of the rect: clamps to the left edge.
        let left = Position::new(70.0, 150.0);
        assert!((r.distance_to_point(&left) - 30.0).abs() < 1e-10);

        // Diagonal corner.
        let corner = Position::new(97.0, 96.0);
        assert!((r.distance_to_point(&corner) - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_rect_spans() {
        let r = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert!(r.spans_x(25.0));
        assert!(!r.spans_x(41.0));
        assert!(r.spans_y(59.0));
        assert!(!r.spans_y(61.0));
        assert!((r.area() - 1200.0).abs() < 1e-10);
    }

    /// Verify SimTime advancement and tick conversion.
    #[test]
    fn test_sim_time_advance() {
        let mut time = SimTime::default();
        for _ in 0..60 {
            time.advance();
        }
        assert_eq!(time.tick, 60);
        // 60 ticks at 60Hz = 1 second
        assert!((time.elapsed_secs - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_secs_to_ticks() {
        assert_eq!(secs_to_ticks(1.0), 60);
        assert_eq!(secs_to_ticks(0.5), 30);
        assert_eq!(secs_to_ticks(0.0), 0);
        assert_eq!(secs_to_ticks(-1.0), 0);
    }

    /// Variant presets stay fixed trade-offs: faster never also stronger.
    #[test]
    fn test_ufo_variant_multipliers() {
        let (speed_s, laser_s, tractor_s) = UfoVariant::Scout.multipliers();
        let (speed_v, laser_v, _) = UfoVariant::Vanguard.multipliers();
        let (_, laser_h, tractor_h) = UfoVariant::Salvager.multipliers();

        assert!(speed_s > speed_v, "Scout should be the fastest");
        assert!(laser_v > laser_s, "Vanguard should out-damage Scout");
        assert!(tractor_h > tractor_s, "Salvager should out-pull Scout");
    }

    /// Tunables defaults are valid; bad values are rejected.
    #[test]
    fn test_tunables_validation() {
        assert!(Tunables::default().validate().is_ok());

        let bad = Tunables {
            gravity: -9.8,
            ..Default::default()
        };
        assert!(bad.validate().is_err());

        let parsed = Tunables::from_json_str(r#"{"damage_scale": 2.0}"#).unwrap();
        assert!((parsed.damage_scale - 2.0).abs() < 1e-10);
        assert!((parsed.gravity - crate::constants::GRAVITY).abs() < 1e-10);

        assert!(Tunables::from_json_str(r#"{"damage_scale": 0.0}"#).is_err());
        assert!(Tunables::from_json_str("not json").is_err());
    }
}
