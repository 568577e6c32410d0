//! VisionConfig — неизменяемые параметры конуса зрения

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::collision::LayerMask;
use crate::error::ConfigError;

/// Параметры зрения guard'а
///
/// Валидируется при создании: вырожденный конфиг отклоняется сразу,
/// а не превращается в тихое "никогда не видит" в рантайме.
#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(try_from = "RawVisionConfig", into = "RawVisionConfig")]
pub struct VisionConfig {
    range: f32,
    half_angle: f32,
    occluder_layers: LayerMask,
    target_layers: LayerMask,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            range: 5.0,
            half_angle: 45.0,
            occluder_layers: LayerMask::OBSTACLE,
            target_layers: LayerMask::PLAYER,
        }
    }
}

impl VisionConfig {
    /// range > 0, half_angle ∈ (0°, 180°], target слои не пустые
    pub fn new(
        range: f32,
        half_angle: f32,
        occluder_layers: LayerMask,
        target_layers: LayerMask,
    ) -> Result<Self, ConfigError> {
        if !(range.is_finite() && range > 0.0) {
            return Err(ConfigError::DegenerateVisionRange(range));
        }
        if !(half_angle > 0.0 && half_angle <= 180.0) {
            return Err(ConfigError::DegenerateHalfAngle(half_angle));
        }
        if target_layers.is_empty() {
            return Err(ConfigError::EmptyTargetLayers);
        }

        Ok(Self {
            range,
            half_angle,
            occluder_layers,
            target_layers,
        })
    }

    pub fn range(&self) -> f32 {
        self.range
    }

    /// Полуугол конуса (градусы)
    pub fn half_angle(&self) -> f32 {
        self.half_angle
    }

    pub fn occluder_layers(&self) -> LayerMask {
        self.occluder_layers
    }

    pub fn target_layers(&self) -> LayerMask {
        self.target_layers
    }

    /// Маска луча: occluders | targets
    pub fn ray_mask(&self) -> LayerMask {
        self.occluder_layers | self.target_layers
    }
}

/// Сырые поля из RON (до валидации)
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct RawVisionConfig {
    range: f32,
    half_angle: f32,
    #[serde(default = "default_occluders")]
    occluder_layers: LayerMask,
    #[serde(default = "default_targets")]
    target_layers: LayerMask,
}

fn default_occluders() -> LayerMask {
    LayerMask::OBSTACLE
}

fn default_targets() -> LayerMask {
    LayerMask::PLAYER
}

impl TryFrom<RawVisionConfig> for VisionConfig {
    type Error = ConfigError;

    fn try_from(raw: RawVisionConfig) -> Result<Self, Self::Error> {
        VisionConfig::new(raw.range, raw.half_angle, raw.occluder_layers, raw.target_layers)
    }
}

impl From<VisionConfig> for RawVisionConfig {
    fn from(config: VisionConfig) -> Self {
        Self {
            range: config.range,
            half_angle: config.half_angle,
            occluder_layers: config.occluder_layers,
            target_layers: config.target_layers,
        }
    }
}
