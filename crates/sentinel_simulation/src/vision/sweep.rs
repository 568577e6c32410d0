//! Стратегии направления взгляда
//!
//! - Fixed: смотрим туда же, куда повёрнут guard (+X / -X)
//! - Sweep: ping-pong вокруг base_angle, опционально с паузами
//! - Waypoints: поворот к прицельным точкам с постоянной угловой скоростью,
//!   dwell на каждой, обход bounce

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Дефолтная угловая скорость (°/с)
pub const DEFAULT_SWEEP_SPEED: f32 = 60.0;

/// Допуск "навелись на точку" (градусы)
pub const AIM_TOLERANCE_DEGREES: f32 = 1.0;

/// Чередование active/paused фаз sweep'а (секунды)
#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
pub struct SweepPause {
    pub active: f32,
    pub paused: f32,
}

/// Прицельная точка waypoint-sweep'а (мировая позиция)
#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
pub struct AimPoint {
    pub position: Vec2,
    #[serde(default)]
    pub dwell: f32,
}

impl AimPoint {
    pub fn new(position: Vec2, dwell: f32) -> Self {
        Self { position, dwell }
    }
}

/// Как VisionSensor выбирает направление взгляда
#[derive(Debug, Clone, Default, PartialEq, Reflect, Serialize, Deserialize)]
pub enum FacingStrategy {
    #[default]
    Fixed,

    /// aim = base + pingpong(clock * speed, 2 * max_offset) - max_offset
    Sweep {
        base_angle: f32,
        max_offset: f32,
        #[serde(default = "default_sweep_speed")]
        speed: f32,
        #[serde(default)]
        pause: Option<SweepPause>,
    },

    Waypoints {
        points: Vec<AimPoint>,
        /// Угловая скорость (°/с)
        #[serde(default = "default_sweep_speed")]
        rate: f32,
        /// Начальный угол прицела
        #[serde(default)]
        start_angle: f32,
    },
}

fn default_sweep_speed() -> f32 {
    DEFAULT_SWEEP_SPEED
}

impl FacingStrategy {
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            FacingStrategy::Fixed => Ok(()),
            FacingStrategy::Sweep {
                base_angle,
                max_offset,
                speed,
                pause,
            } => {
                if !base_angle.is_finite() {
                    return Err(ConfigError::InvalidSweep {
                        field: "base_angle",
                        value: *base_angle,
                    });
                }
                non_negative("max_offset", *max_offset)?;
                non_negative("speed", *speed)?;
                if let Some(pause) = pause {
                    let valid = |value: f32| value.is_finite() && value > 0.0;
                    if !(valid(pause.active) && valid(pause.paused)) {
                        return Err(ConfigError::InvalidSweepPause {
                            active: pause.active,
                            paused: pause.paused,
                        });
                    }
                }
                Ok(())
            }
            FacingStrategy::Waypoints {
                points,
                rate,
                start_angle,
            } => {
                if !(rate.is_finite() && *rate > 0.0) {
                    return Err(ConfigError::InvalidSweep {
                        field: "rate",
                        value: *rate,
                    });
                }
                if !start_angle.is_finite() {
                    return Err(ConfigError::InvalidSweep {
                        field: "start_angle",
                        value: *start_angle,
                    });
                }
                for (index, point) in points.iter().enumerate() {
                    if !point.position.is_finite() {
                        return Err(ConfigError::NonFiniteWaypoint { index });
                    }
                    if !(point.dwell.is_finite() && point.dwell >= 0.0) {
                        return Err(ConfigError::InvalidDwell {
                            index,
                            dwell: point.dwell,
                        });
                    }
                }
                Ok(())
            }
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FacingStrategy::Fixed => "fixed",
            FacingStrategy::Sweep { .. } => "sweep",
            FacingStrategy::Waypoints { .. } => "waypoints",
        }
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidSweep { field, value })
    }
}
