//! Scenario — RON описание уровня (игрок, guard'ы, препятствия)
//!
//! Загрузка валидирует ВСЁ до спавна (fail fast): вырожденный vision config,
//! отрицательный dwell и т.п. отклоняются здесь, а не молча ломают рантайм.

use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::ai::{BehaviorConfig, BehaviorState};
use crate::backstab::BackstabZone;
use crate::collision::{Collider2d, ColliderShape, LayerMask};
use crate::components::{Facing, Guard, Inactive, Player};
use crate::error::{ConfigError, ScenarioError};
use crate::patrol::{PatrolRoute, RouteMode, Waypoint, DEFAULT_ARRIVAL_THRESHOLD};
use crate::player::PlayerConfig;
use crate::vision::{FacingStrategy, VisionConfig, VisionSensor};

/// Радиус коллайдера guard'а (слой Guard, в луч зрения не попадает)
const GUARD_COLLIDER_RADIUS: f32 = 0.3;

fn default_guard_speed() -> f32 {
    2.0
}

fn default_player_radius() -> f32 {
    0.25
}

fn default_arrival_threshold() -> f32 {
    DEFAULT_ARRIVAL_THRESHOLD
}

fn default_obstacle_layers() -> LayerMask {
    LayerMask::OBSTACLE
}

/// Уровень целиком
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// None → guard'ы патрулируют с MissingTarget
    #[serde(default)]
    pub player: Option<PlayerSpawn>,
    #[serde(default)]
    pub player_config: PlayerConfig,
    #[serde(default)]
    pub guards: Vec<GuardSpawn>,
    #[serde(default)]
    pub obstacles: Vec<ObstacleSpawn>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSpawn {
    pub position: Vec2,
    #[serde(default = "default_player_radius")]
    pub radius: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteConfig {
    #[serde(default)]
    pub waypoints: Vec<Waypoint>,
    #[serde(default)]
    pub mode: RouteMode,
    #[serde(default = "default_arrival_threshold")]
    pub arrival_threshold: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuardSpawn {
    pub position: Vec2,
    #[serde(default)]
    pub facing: Facing,
    #[serde(default = "default_guard_speed")]
    pub speed: f32,
    #[serde(default)]
    pub route: RouteConfig,
    #[serde(default)]
    pub vision: VisionConfig,
    #[serde(default)]
    pub strategy: FacingStrategy,
    #[serde(default)]
    pub behavior: BehaviorConfig,
    #[serde(default)]
    pub backstab: Option<BackstabZone>,
    /// Спавнится неактивным (без подписки на DeathBroadcast)
    #[serde(default)]
    pub inactive: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleSpawn {
    pub position: Vec2,
    pub shape: ColliderShape,
    #[serde(default = "default_obstacle_layers")]
    pub layers: LayerMask,
}

/// Проверенные компоненты guard'а, готовые к спавну
struct GuardBlueprint {
    guard: Guard,
    route: PatrolRoute,
    sensor: VisionSensor,
}

impl GuardSpawn {
    fn blueprint(&self) -> Result<GuardBlueprint, ConfigError> {
        if !self.position.is_finite() {
            return Err(ConfigError::NonFiniteSpawn);
        }
        let guard = Guard::new(self.speed)?;
        let route = PatrolRoute::new(
            self.route.waypoints.clone(),
            self.route.mode,
            self.route.arrival_threshold,
        )?;
        let sensor = VisionSensor::new(self.vision, self.strategy.clone())?;
        self.behavior.validate()?;
        if let Some(zone) = &self.backstab {
            zone.validate()?;
        }

        Ok(GuardBlueprint {
            guard,
            route,
            sensor,
        })
    }
}

/// Entity, созданные spawn()
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpawnedScenario {
    pub player: Option<Entity>,
    pub guards: Vec<Entity>,
    pub obstacles: Vec<Entity>,
}

impl Scenario {
    /// Проверка всех authoring данных
    pub fn validate(&self) -> Result<(), ScenarioError> {
        if let Some(player) = &self.player {
            if !(player.radius.is_finite() && player.radius > 0.0) {
                return Err(ScenarioError::Player(ConfigError::InvalidCollider {
                    field: "radius",
                }));
            }
        }

        let delay = self.player_config.death_delay;
        if !(delay.is_finite() && delay >= 0.0) {
            return Err(ScenarioError::Player(ConfigError::InvalidBehavior {
                field: "death_delay",
                bound: "non-negative",
                value: delay,
            }));
        }

        for (index, spawn) in self.guards.iter().enumerate() {
            spawn
                .blueprint()
                .map_err(|source| ScenarioError::Guard { index, source })?;
        }

        for (index, obstacle) in self.obstacles.iter().enumerate() {
            obstacle
                .shape
                .validate()
                .map_err(|source| ScenarioError::Obstacle { index, source })?;
        }

        Ok(())
    }

    /// Спавнит уровень в World (PlayerConfig → resource)
    pub fn spawn(&self, world: &mut World) -> Result<SpawnedScenario, ScenarioError> {
        self.validate()?;

        let mut spawned = SpawnedScenario::default();
        world.insert_resource(self.player_config);

        for obstacle in &self.obstacles {
            let entity = world
                .spawn((
                    Transform::from_translation(obstacle.position.extend(0.0)),
                    Collider2d {
                        shape: obstacle.shape,
                        layers: obstacle.layers,
                    },
                ))
                .id();
            crate::log(&format!(
                "Obstacle {:?} at {} on layer {}",
                entity,
                obstacle.position,
                obstacle.layers.name()
            ));
            spawned.obstacles.push(entity);
        }

        if let Some(player) = &self.player {
            let entity = world
                .spawn((
                    Player,
                    Transform::from_translation(player.position.extend(0.0)),
                    Collider2d::circle(player.radius, LayerMask::PLAYER),
                ))
                .id();
            spawned.player = Some(entity);
        }

        for (index, spawn) in self.guards.iter().enumerate() {
            let blueprint = spawn
                .blueprint()
                .map_err(|source| ScenarioError::Guard { index, source })?;

            let mut entity = world.spawn((
                blueprint.guard,
                Transform::from_translation(spawn.position.extend(0.0)),
                spawn.facing,
                BehaviorState::Patrol,
                spawn.behavior,
                blueprint.route,
                blueprint.sensor,
                Collider2d::circle(GUARD_COLLIDER_RADIUS, LayerMask::GUARD),
            ));
            if let Some(zone) = spawn.backstab {
                entity.insert(zone);
            }
            if spawn.inactive {
                entity.insert(Inactive);
            }
            spawned.guards.push(entity.id());
        }

        crate::log_info(&format!(
            "Scenario spawned: {} guard(s), {} obstacle(s), player: {}",
            spawned.guards.len(),
            spawned.obstacles.len(),
            if spawned.player.is_some() { "yes" } else { "missing" }
        ));

        Ok(spawned)
    }
}

/// Парсинг + валидация RON текста
pub fn load_scenario(source: &str) -> Result<Scenario, ScenarioError> {
    let scenario: Scenario = ron::from_str(source)?;
    scenario.validate()?;
    Ok(scenario)
}

pub fn load_scenario_file(path: impl AsRef<Path>) -> Result<Scenario, ScenarioError> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path).map_err(|source| ScenarioError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_scenario(&source)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"(
        player: Some((position: (4.0, 0.0))),
        guards: [
            (
                position: (0.0, 0.0),
                route: (waypoints: [
                    (position: (-3.0, 0.0), dwell: 1.0),
                    (position: (3.0, 0.0)),
                ]),
                vision: (range: 6.0, half_angle: 40.0),
            ),
        ],
        obstacles: [
            (position: (2.0, 0.0), shape: Rect(half_extents: (0.2, 1.0))),
        ],
    )"#;

    #[test]
    fn test_load_minimal_scenario() {
        let scenario = load_scenario(MINIMAL).unwrap();

        assert_eq!(scenario.guards.len(), 1);
        let guard = &scenario.guards[0];
        assert_eq!(guard.speed, 2.0);
        assert_eq!(guard.facing, Facing::Right);
        assert_eq!(guard.route.waypoints[1].dwell, 0.0);
        assert_eq!(guard.route.arrival_threshold, DEFAULT_ARRIVAL_THRESHOLD);
        assert_eq!(guard.strategy, FacingStrategy::Fixed);
        assert_eq!(scenario.obstacles[0].layers, LayerMask::OBSTACLE);
        assert_eq!(scenario.player_config.death_delay, 2.0);
    }

    #[test]
    fn test_degenerate_vision_fails_at_load() {
        let source = MINIMAL.replace("range: 6.0", "range: 0.0");
        assert!(matches!(load_scenario(&source), Err(ScenarioError::Parse(_))));
    }

    #[test]
    fn test_negative_dwell_reports_guard_index() {
        let source = MINIMAL.replace("dwell: 1.0", "dwell: -1.0");
        let err = load_scenario(&source).unwrap_err();
        assert!(matches!(
            err,
            ScenarioError::Guard {
                index: 0,
                source: ConfigError::InvalidDwell { index: 0, .. }
            }
        ));
    }

    #[test]
    fn test_death_delay_zero_is_allowed_negative_is_not() {
        let instant = MINIMAL.replacen("player:", "player_config: (death_delay: 0.0), player:", 1);
        assert_eq!(load_scenario(&instant).unwrap().player_config.death_delay, 0.0);

        let negative = instant.replace("death_delay: 0.0", "death_delay: -0.5");
        assert!(matches!(
            load_scenario(&negative),
            Err(ScenarioError::Player(ConfigError::InvalidBehavior {
                field: "death_delay",
                bound: "non-negative",
                ..
            }))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_scenario_file("definitely/not/here.ron").unwrap_err();
        assert!(matches!(err, ScenarioError::Io { .. }));
    }

    #[test]
    fn test_spawn_populates_world() {
        let scenario = load_scenario(MINIMAL).unwrap();
        let mut world = World::new();

        let spawned = scenario.spawn(&mut world).unwrap();

        assert!(spawned.player.is_some());
        assert_eq!(spawned.guards.len(), 1);
        assert_eq!(spawned.obstacles.len(), 1);

        let guard = spawned.guards[0];
        assert!(world.get::<Guard>(guard).is_some());
        assert_eq!(world.get::<PatrolRoute>(guard).map(|r| r.waypoints().len()), Some(2));
        assert!(world.get::<BehaviorState>(guard).is_some_and(|s| s.is_patrol()));
        assert!(world.get::<Inactive>(guard).is_none());
        assert!(world.contains_resource::<PlayerConfig>());
    }

    #[test]
    fn test_bundled_demo_is_valid() {
        let scenario = load_scenario(include_str!("../demos/watchtower.ron")).unwrap();
        assert!(scenario.player.is_some());
        assert!(scenario.guards.len() >= 2);
    }
}
