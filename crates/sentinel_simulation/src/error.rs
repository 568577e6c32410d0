//! Ошибки конфигурации и тика
//!
//! - ConfigError: вырожденные параметры, отклоняются на этапе загрузки (fail fast)
//! - TickError: сбой одного guard'а за кадр, не выходит за границу тика
//! - ScenarioError: загрузка RON сценария

use std::path::PathBuf;

use bevy::prelude::*;
use thiserror::Error;

/// Невалидные authoring-параметры guard'а
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    /// Дальность зрения должна быть конечной и > 0
    #[error("vision range must be finite and positive, got {0}")]
    DegenerateVisionRange(f32),

    /// Полуугол конуса в (0°, 180°]
    #[error("vision half-angle must lie in (0, 180] degrees, got {0}")]
    DegenerateHalfAngle(f32),

    /// Без target слоёв луч никогда не попадёт в цель
    #[error("vision target layer set is empty")]
    EmptyTargetLayers,

    #[error("sweep {field} must be finite and non-negative, got {value}")]
    InvalidSweep { field: &'static str, value: f32 },

    #[error("sweep pause phases must both be finite and positive (active {active}, paused {paused})")]
    InvalidSweepPause { active: f32, paused: f32 },

    #[error("waypoint {index} has invalid dwell time {dwell}")]
    InvalidDwell { index: usize, dwell: f32 },

    #[error("waypoint {index} position is not finite")]
    NonFiniteWaypoint { index: usize },

    #[error("spawn position is not finite")]
    NonFiniteSpawn,

    #[error("arrival threshold must be finite and positive, got {0}")]
    InvalidArrivalThreshold(f32),

    #[error("movement speed must be finite and non-negative, got {0}")]
    InvalidSpeed(f32),

    #[error("behavior {field} must be finite and {bound}, got {value}")]
    InvalidBehavior {
        field: &'static str,
        bound: &'static str,
        value: f32,
    },

    #[error("backstab zone must have finite reach and positive radius (reach {reach}, radius {radius})")]
    InvalidBackstabZone { reach: f32, radius: f32 },

    #[error("collider {field} must be finite and positive")]
    InvalidCollider { field: &'static str },
}

/// Сбой одного guard'а на кадре
///
/// Ловится в системе tick_guards: логируем, гасим скорость, остальные guard'ы тикают дальше.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum TickError {
    #[error("guard position is not finite: {0:?}")]
    NonFinitePosition(Vec2),

    #[error("target position is not finite: {0:?}")]
    NonFiniteTarget(Vec2),
}

/// Ошибка загрузки сценария
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("failed to read scenario {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse scenario: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("guard #{index} is misconfigured: {source}")]
    Guard {
        index: usize,
        #[source]
        source: ConfigError,
    },

    #[error("obstacle #{index} is misconfigured: {source}")]
    Obstacle {
        index: usize,
        #[source]
        source: ConfigError,
    },

    #[error("player spawn is misconfigured: {0}")]
    Player(#[source] ConfigError),
}
