//! FSM AI components (behavior state, behavior config).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// AI FSM состояния guard'а
///
/// Patrol → Chase → Attack. Обратно в Patrol только через death broadcast
/// (detection sticky: потеря видимости не возвращает в Patrol).
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub enum BehaviorState {
    /// Patrol — ходим по маршруту и смотрим
    #[default]
    Patrol,

    /// Chase — игрок замечен
    Chase {
        /// ChaseTimer: сколько прошло с входа в Chase (секунды)
        elapsed: f32,
    },

    /// Attack — стоим, игрок убит
    Attack,
}

impl BehaviorState {
    pub fn is_patrol(&self) -> bool {
        matches!(self, BehaviorState::Patrol)
    }

    pub fn is_attack(&self) -> bool {
        matches!(self, BehaviorState::Attack)
    }

    /// ChaseTimer (существует только в Chase)
    pub fn chase_timer(&self) -> Option<f32> {
        match self {
            BehaviorState::Chase { elapsed } => Some(*elapsed),
            _ => None,
        }
    }

    /// Результат VisionSensor. Patrol + true → Chase с нулевым таймером.
    ///
    /// Возвращает true только на переходе; повторные true в Chase таймер не трогают.
    pub fn observe_target(&mut self, visible: bool) -> bool {
        if visible && self.is_patrol() {
            *self = BehaviorState::Chase { elapsed: 0.0 };
            return true;
        }
        false
    }

    /// Death reset. Возвращает true если состояние реально изменилось.
    pub fn reset_to_patrol(&mut self) -> bool {
        let changed = !self.is_patrol();
        *self = BehaviorState::Patrol;
        changed
    }

    pub fn label(&self) -> &'static str {
        match self {
            BehaviorState::Patrol => "Patrol",
            BehaviorState::Chase { .. } => "Chase",
            BehaviorState::Attack => "Attack",
        }
    }
}

/// Параметры поведения guard'а
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Telegraph: пауза между обнаружением и погоней (секунды)
    pub telegraph_delay: f32,
    /// Strike range: ближе этого Chase → Attack (м)
    pub strike_range: f32,
    /// Скорость погони = speed * factor
    pub chase_speed_factor: f32,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            telegraph_delay: 2.0,
            strike_range: 1.5,
            chase_speed_factor: 1.0,
        }
    }
}

impl BehaviorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks = [
            ("telegraph_delay", "non-negative", self.telegraph_delay, self.telegraph_delay >= 0.0),
            ("strike_range", "positive", self.strike_range, self.strike_range > 0.0),
            (
                "chase_speed_factor",
                "positive",
                self.chase_speed_factor,
                self.chase_speed_factor > 0.0,
            ),
        ];

        for (field, bound, value, in_range) in checks {
            if !(value.is_finite() && in_range) {
                return Err(ConfigError::InvalidBehavior {
                    field,
                    bound,
                    value,
                });
            }
        }
        Ok(())
    }
}
