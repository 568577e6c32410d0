//! Guard (NPC агент) и его базовые компоненты: Facing, DesiredVelocity, Inactive

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::ai::{BehaviorConfig, BehaviorState};
use crate::error::ConfigError;
use crate::patrol::PatrolRoute;
use crate::vision::VisionSensor;

/// Guard — NPC который патрулирует, смотрит и атакует игрока
///
/// Через Required Components тянет за собой всё, что нужно FSM:
/// state, config, route, vision, facing, velocity, animation snapshot.
/// State меняет только AI FSM (tick_guards + death broadcast reset).
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
#[require(
    Transform,
    Facing,
    DesiredVelocity,
    BehaviorState,
    BehaviorConfig,
    PatrolRoute,
    VisionSensor,
    AnimationSignals
)]
pub struct Guard {
    /// Скорость патруля (м/с); погоня = speed * chase_speed_factor
    pub speed: f32,
    /// Уже залогировали MissingTarget (сбрасывается когда игрок появился)
    pub(crate) target_missing: bool,
}

impl Default for Guard {
    fn default() -> Self {
        Self {
            speed: 2.0,
            target_missing: false,
        }
    }
}

impl Guard {
    pub fn new(speed: f32) -> Result<Self, ConfigError> {
        if !(speed.is_finite() && speed >= 0.0) {
            return Err(ConfigError::InvalidSpeed(speed));
        }
        Ok(Self {
            speed,
            target_missing: false,
        })
    }
}

/// Горизонтальная ориентация агента (±1)
///
/// Хранится отдельно от визуального transform; presentation читает её для flip'а спрайта.
#[derive(
    Component, Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Reflect, Serialize, Deserialize,
)]
#[reflect(Component)]
pub enum Facing {
    #[default]
    Right,
    Left,
}

impl Facing {
    /// x >= 0 → Right (ноль считаем вправо)
    pub fn from_direction_x(x: f32) -> Self {
        if x >= 0.0 {
            Facing::Right
        } else {
            Facing::Left
        }
    }

    pub fn sign(self) -> f32 {
        match self {
            Facing::Right => 1.0,
            Facing::Left => -1.0,
        }
    }

    /// +X или -X
    pub fn unit(self) -> Vec2 {
        Vec2::new(self.sign(), 0.0)
    }

    /// Угол взгляда в градусах (0 или 180)
    pub fn degrees(self) -> f32 {
        match self {
            Facing::Right => 0.0,
            Facing::Left => 180.0,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Facing::Right => Facing::Left,
            Facing::Left => Facing::Right,
        }
    }
}

/// Желаемая горизонтальная скорость (м/с), выход FSM для physics collaborator
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct DesiredVelocity(pub f32);

/// Маркер: guard деактивирован
///
/// Неактивный guard отписан от death broadcast и не тикает.
/// Снятие маркера подписывает обратно.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Inactive;

/// Snapshot для animation sink (write-only потребитель)
///
/// Обновляется после FSM тика, presentation видит согласованное post-tick состояние.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct AnimationSignals {
    /// Attack state
    pub attacking: bool,
    /// Погоня после telegraph
    pub run_to_player: bool,
    /// Telegraph (wind-up перед погоней)
    pub wind_up: bool,
    /// |velocity.x|
    pub speed: f32,
    pub facing: Facing,
}
