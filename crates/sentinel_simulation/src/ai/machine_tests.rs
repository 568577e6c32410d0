//! Tests for the per-guard FSM tick.

#[cfg(test)]
mod tests {
    use bevy::prelude::*;

    use crate::ai::components::{BehaviorConfig, BehaviorState};
    use crate::ai::machine::{GuardFrame, GuardParts, PlayerHandle};
    use crate::collision::{Collider2d, CollisionWorld, LayerMask};
    use crate::components::{Facing, Guard};
    use crate::error::TickError;
    use crate::patrol::{PatrolRoute, Waypoint};
    use crate::vision::{VisionConfig, VisionSensor};

    const DELTA: f32 = 0.25;

    #[derive(Debug, Default)]
    struct PlayerRecorder {
        position: Vec2,
        spotted: u32,
        killed: u32,
    }

    impl PlayerHandle for PlayerRecorder {
        fn position(&self) -> Vec2 {
            self.position
        }

        fn notify_spotted(&mut self) {
            self.spotted += 1;
        }

        fn notify_killed(&mut self) {
            self.killed += 1;
        }
    }

    /// Владелец компонентов одного guard'а
    struct Rig {
        guard: Guard,
        state: BehaviorState,
        config: BehaviorConfig,
        facing: Facing,
        route: PatrolRoute,
        sensor: VisionSensor,
        position: Vec2,
        delta: f32,
        world: CollisionWorld,
    }

    impl Rig {
        fn new() -> Self {
            Self {
                guard: Guard::new(2.0).unwrap(),
                state: BehaviorState::Patrol,
                config: BehaviorConfig {
                    telegraph_delay: 1.0,
                    ..default()
                },
                facing: Facing::Right,
                route: PatrolRoute::default(),
                sensor: VisionSensor::fixed(
                    VisionConfig::new(5.0, 60.0, LayerMask::OBSTACLE, LayerMask::PLAYER).unwrap(),
                ),
                position: Vec2::ZERO,
                delta: DELTA,
                world: CollisionWorld::default(),
            }
        }

        /// Коллайдер игрока в CollisionWorld (как sync_collision_world)
        fn place_player(&mut self, player: &PlayerRecorder) {
            self.world.clear();
            self.world.insert(
                Entity::from_raw(7),
                player.position,
                Collider2d::circle(0.25, LayerMask::PLAYER),
            );
        }

        fn tick(&mut self, player: Option<&mut PlayerRecorder>) -> Result<f32, TickError> {
            let frame = GuardFrame {
                position: self.position,
                delta: self.delta,
                spatial: &self.world,
            };
            let mut parts = GuardParts {
                guard: &mut self.guard,
                state: &mut self.state,
                config: &self.config,
                facing: &mut self.facing,
                route: &mut self.route,
                sensor: &mut self.sensor,
            };
            parts.tick(&frame, player)
        }
    }

    #[test]
    fn test_sighting_enters_chase_exactly_once() {
        let mut rig = Rig::new();
        let mut player = PlayerRecorder {
            position: Vec2::new(3.0, 0.0),
            ..default()
        };
        rig.place_player(&player);

        let velocity = rig.tick(Some(&mut player)).unwrap();
        assert_eq!(velocity, 0.0);
        assert_eq!(rig.state, BehaviorState::Chase { elapsed: 0.0 });
        assert_eq!(player.spotted, 1);

        // Игрок всё ещё виден — таймер идёт, повторного onSpotted нет
        rig.tick(Some(&mut player)).unwrap();
        assert_eq!(rig.state.chase_timer(), Some(DELTA));
        assert_eq!(player.spotted, 1);
    }

    #[test]
    fn test_no_movement_during_telegraph() {
        let mut rig = Rig::new();
        let mut player = PlayerRecorder {
            position: Vec2::new(4.0, 0.0),
            ..default()
        };
        rig.place_player(&player);
        rig.tick(Some(&mut player)).unwrap();

        // elapsed 0.25, 0.5, 0.75 < 1.0
        for _ in 0..3 {
            assert_eq!(rig.tick(Some(&mut player)).unwrap(), 0.0);
        }

        // elapsed == 1.0 → погоня
        let velocity = rig.tick(Some(&mut player)).unwrap();
        assert_eq!(velocity, 2.0);
        assert_eq!(rig.facing, Facing::Right);
        assert_eq!(rig.state.chase_timer(), Some(1.0));
    }

    #[test]
    fn test_two_second_telegraph_is_120_ticks_at_60hz() {
        let mut rig = Rig::new();
        rig.delta = 1.0 / 60.0;
        rig.config.telegraph_delay = 2.0;
        let mut player = PlayerRecorder {
            position: Vec2::new(4.0, 0.0),
            ..default()
        };
        rig.place_player(&player);
        rig.tick(Some(&mut player)).unwrap();
        assert!(rig.state.chase_timer().is_some());

        for tick in 1..120 {
            assert_eq!(rig.tick(Some(&mut player)).unwrap(), 0.0, "moved early on tick {tick}");
        }
        assert_eq!(rig.tick(Some(&mut player)).unwrap(), 2.0);
    }

    #[test]
    fn test_pursuit_faces_target() {
        let mut rig = Rig::new();
        rig.facing = Facing::Left;
        rig.config.chase_speed_factor = 1.5;
        let mut player = PlayerRecorder {
            position: Vec2::new(-4.0, 0.0),
            ..default()
        };
        rig.place_player(&player);

        rig.tick(Some(&mut player)).unwrap();
        assert!(rig.state.chase_timer().is_some());

        let mut velocity = 0.0;
        for _ in 0..4 {
            velocity = rig.tick(Some(&mut player)).unwrap();
        }
        assert_eq!(velocity, -3.0);
        assert_eq!(rig.facing, Facing::Left);
    }

    #[test]
    fn test_strike_range_enters_attack_and_kills_once() {
        let mut rig = Rig::new();
        let mut player = PlayerRecorder {
            position: Vec2::new(1.0, 0.0),
            ..default()
        };
        rig.place_player(&player);

        for _ in 0..5 {
            rig.tick(Some(&mut player)).unwrap();
        }
        assert!(rig.state.is_attack());
        assert_eq!(player.killed, 1);

        for _ in 0..20 {
            assert_eq!(rig.tick(Some(&mut player)).unwrap(), 0.0);
        }
        assert!(rig.state.is_attack());
        assert_eq!(player.killed, 1);
    }

    #[test]
    fn test_detection_is_sticky() {
        let mut rig = Rig::new();
        let mut player = PlayerRecorder {
            position: Vec2::new(3.0, 0.0),
            ..default()
        };
        rig.place_player(&player);
        rig.tick(Some(&mut player)).unwrap();

        // Игрок ушёл за спину и далеко — Chase остаётся
        player.position = Vec2::new(-20.0, 0.0);
        rig.place_player(&player);
        for _ in 0..3 {
            rig.tick(Some(&mut player)).unwrap();
        }
        assert!(matches!(rig.state, BehaviorState::Chase { .. }));
    }

    #[test]
    fn test_occluded_player_is_not_chased() {
        let mut rig = Rig::new();
        let mut player = PlayerRecorder {
            position: Vec2::new(3.0, 0.0),
            ..default()
        };
        rig.place_player(&player);
        rig.world.insert(
            Entity::from_raw(9),
            Vec2::new(1.5, 0.0),
            Collider2d::rect(Vec2::new(0.2, 1.0), LayerMask::OBSTACLE),
        );

        for _ in 0..10 {
            rig.tick(Some(&mut player)).unwrap();
        }
        assert!(rig.state.is_patrol());
        assert_eq!(player.spotted, 0);
    }

    #[test]
    fn test_patrol_moves_and_updates_facing() {
        let mut rig = Rig::new();
        rig.route = PatrolRoute::looping(vec![
            Waypoint::new(Vec2::new(-3.0, 0.0), 0.0),
            Waypoint::new(Vec2::new(3.0, 0.0), 0.0),
        ])
        .unwrap();
        let mut player = PlayerRecorder {
            position: Vec2::new(10.0, 0.0),
            ..default()
        };
        rig.place_player(&player);

        let velocity = rig.tick(Some(&mut player)).unwrap();
        assert_eq!(velocity, -2.0);
        assert_eq!(rig.facing, Facing::Left);
        assert!(rig.state.is_patrol());
    }

    #[test]
    fn test_missing_target_keeps_patrolling() {
        let mut rig = Rig::new();
        rig.state = BehaviorState::Chase { elapsed: 0.5 };
        rig.route = PatrolRoute::looping(vec![
            Waypoint::new(Vec2::new(3.0, 0.0), 0.0),
            Waypoint::new(Vec2::new(-3.0, 0.0), 0.0),
        ])
        .unwrap();

        let velocity = rig.tick(None).unwrap();
        assert!(rig.state.is_patrol());
        assert!(rig.guard.target_missing);
        assert_eq!(velocity, 2.0);

        // Игрок появился — флаг снимается
        let mut player = PlayerRecorder {
            position: Vec2::new(-10.0, 0.0),
            ..default()
        };
        rig.tick(Some(&mut player)).unwrap();
        assert!(!rig.guard.target_missing);
    }

    #[test]
    fn test_non_finite_inputs_fail_the_tick() {
        let mut rig = Rig::new();
        let mut player = PlayerRecorder::default();

        rig.position = Vec2::new(f32::NAN, 0.0);
        assert!(matches!(
            rig.tick(Some(&mut player)),
            Err(TickError::NonFinitePosition(_))
        ));

        rig.position = Vec2::ZERO;
        player.position = Vec2::new(0.0, f32::INFINITY);
        assert!(matches!(
            rig.tick(Some(&mut player)),
            Err(TickError::NonFiniteTarget(_))
        ));
        assert!(rig.state.is_patrol());
    }
}
