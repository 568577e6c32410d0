//! SENTINEL Simulation Core
//!
//! ECS-симуляция guard'ов стелс-платформера на Bevy 0.16:
//! патруль по маршруту, конус зрения с окклюзией, Patrol → Chase → Attack,
//! глобальный сброс через DeathBroadcast.
//!
//! Локомоция игрока, анимация, камера, рендер — внешние collaborators,
//! здесь только узкие интерфейсы (PlayerHandle, SpatialQuery, AnimationSignals).

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;

// Публичные модули
pub mod ai;
pub mod backstab;
pub mod broadcast;
pub mod collision;
pub mod components;
pub mod error;
pub mod geometry;
pub mod logger;
pub mod movement;
pub mod patrol;
pub mod player;
pub mod scenario;
pub mod timing;
pub mod vision;

// Re-export базовых типов для удобства
pub use ai::{
    AIPlugin, BehaviorChanged, BehaviorConfig, BehaviorState, PlayerHandle, PlayerKilled,
    PlayerSpotted,
};
pub use backstab::{BackstabPlugin, BackstabRequested, BackstabZone, GuardEliminated};
pub use broadcast::{BroadcastPlugin, DeathBroadcast, PlayerDied};
pub use collision::{
    Collider2d, ColliderShape, CollisionPlugin, CollisionWorld, LayerMask, RayHit, SpatialQuery,
};
pub use components::{
    AnimationSignals, DesiredVelocity, Facing, Guard, Inactive, Player, PlayerStatus,
};
pub use error::{ConfigError, ScenarioError, TickError};
pub use logger::{
    init_logger, log, log_error, log_info, log_warning, log_with_level, set_log_level,
    set_logger, set_logger_if_needed, ConsoleLogger, LogLevel, LogPrinter,
};
pub use movement::MovementPlugin;
pub use patrol::{PatrolRoute, RouteMode, Waypoint};
pub use player::{PlayerConfig, PlayerPlugin};
pub use scenario::{load_scenario, load_scenario_file, Scenario, SpawnedScenario};
pub use vision::{AimPoint, FacingStrategy, SweepPause, VisionConfig, VisionSensor};

/// Порядок фаз внутри одного fixed тика
///
/// FSM видит движение прошлого тика, presentation — согласованное post-tick состояние.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// Подписка/отписка DeathBroadcast по активности guard'ов
    Subscriptions,
    /// Доставка PlayerDied
    Broadcast,
    /// Пересборка CollisionWorld
    Collision,
    /// Тик FSM guard'ов
    Think,
    /// Реакция игрока (spotted, kill, backstab, death timer)
    Player,
    /// Интеграция DesiredVelocity
    Motion,
    /// AnimationSignals
    Presentation,
}

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep 60Hz для simulation tick
            .insert_resource(Time::<Fixed>::from_hz(60.0))
            .configure_sets(
                FixedUpdate,
                (
                    SimulationSet::Subscriptions,
                    SimulationSet::Broadcast,
                    SimulationSet::Collision,
                    SimulationSet::Think,
                    SimulationSet::Player,
                    SimulationSet::Motion,
                    SimulationSet::Presentation,
                )
                    .chain(), // Последовательное выполнение для детерминизма
            )
            .add_plugins((
                CollisionPlugin,
                BroadcastPlugin,
                AIPlugin,
                PlayerPlugin,
                BackstabPlugin,
                MovementPlugin,
            ));
    }
}

/// Создаёт minimal Bevy App для headless симуляции
pub fn create_headless_app() -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins((MinimalPlugins, SimulationPlugin));

    app
}

/// Headless App, где каждый `update()` = ровно один fixed тик
///
/// Время двигается вручную на 1/60 с, wall clock не влияет (тесты, headless binary).
/// Первый `update()` только инициализирует часы.
pub fn create_stepped_app() -> App {
    let mut app = create_headless_app();
    let timestep = Time::<Fixed>::from_hz(60.0).timestep();
    app.insert_resource(TimeUpdateStrategy::ManualDuration(timestep));

    app
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    // Сериализуем в байты через Debug
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
