//! VisionSensor — конус зрения guard'а
//!
//! Проверка видимости (порядок по возрастанию цены, short-circuit):
//! 1. distance >= range → не видим (граница исключена)
//! 2. angle(facing, to_target) >= half_angle → не видим
//! 3. raycast по `occluders | targets`: видим только если ПЕРВЫЙ hit на target слое

use bevy::prelude::*;

use super::config::VisionConfig;
use super::sweep::{FacingStrategy, AIM_TOLERANCE_DEGREES};
use crate::ai::PlayerHandle;
use crate::collision::SpatialQuery;
use crate::components::Facing;
use crate::error::ConfigError;
use crate::geometry::{
    angle_between_degrees, degrees_of, delta_degrees, direction_from_degrees,
    move_towards_degrees, normalize_degrees, pingpong,
};
use crate::patrol::{RouteMode, WaypointCursor};
use crate::timing::countdown_expired;

/// Видна ли цель из `origin` при взгляде `facing_direction`
///
/// Совпадающая с origin цель считается видимой (направление не определено).
pub fn is_target_visible(
    config: &VisionConfig,
    spatial: &impl SpatialQuery,
    origin: Vec2,
    target: Vec2,
    facing_direction: Vec2,
) -> bool {
    let to_target = target - origin;
    let distance = to_target.length();

    if distance >= config.range() {
        return false;
    }
    if distance <= f32::EPSILON {
        return true;
    }

    let direction = to_target / distance;
    if angle_between_degrees(facing_direction, direction) >= config.half_angle() {
        return false;
    }

    spatial
        .raycast_first_hit(origin, direction, config.range(), config.ray_mask())
        .is_some_and(|hit| hit.layers.intersects(config.target_layers()))
}

/// Компонент зрения: конфиг + стратегия + изменяемое состояние прицела
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub struct VisionSensor {
    config: VisionConfig,
    strategy: FacingStrategy,
    /// Текущий угол прицела (нормализован)
    aim: f32,
    /// Часы волны sweep'а (идут только в active фазе)
    sweep_clock: f32,
    paused: bool,
    phase_remaining: f32,
    cursor: WaypointCursor,
    /// Some = держим прицел на точке
    stop_wait: Option<f32>,
    /// Цель уже замечена в текущем эпизоде
    spotted: bool,
}

impl Default for VisionSensor {
    fn default() -> Self {
        Self::from_parts(VisionConfig::default(), FacingStrategy::Fixed)
    }
}

impl VisionSensor {
    pub fn new(config: VisionConfig, strategy: FacingStrategy) -> Result<Self, ConfigError> {
        strategy.validate()?;
        Ok(Self::from_parts(config, strategy))
    }

    /// Fixed стратегия (зеркалит Facing guard'а)
    pub fn fixed(config: VisionConfig) -> Self {
        Self::from_parts(config, FacingStrategy::Fixed)
    }

    fn from_parts(config: VisionConfig, strategy: FacingStrategy) -> Self {
        let (aim, phase_remaining) = match &strategy {
            FacingStrategy::Fixed => (0.0, 0.0),
            FacingStrategy::Sweep {
                base_angle,
                max_offset,
                pause,
                ..
            } => (
                normalize_degrees(base_angle - max_offset),
                pause.map_or(0.0, |pause| pause.active),
            ),
            FacingStrategy::Waypoints { start_angle, .. } => (normalize_degrees(*start_angle), 0.0),
        };

        Self {
            config,
            strategy,
            aim,
            sweep_clock: 0.0,
            paused: false,
            phase_remaining,
            cursor: WaypointCursor::default(),
            stop_wait: None,
            spotted: false,
        }
    }

    pub fn config(&self) -> &VisionConfig {
        &self.config
    }

    pub fn strategy(&self) -> &FacingStrategy {
        &self.strategy
    }

    /// Угол прицела (градусы, [-180, 180))
    pub fn aim(&self) -> f32 {
        self.aim
    }

    pub fn is_sweep_paused(&self) -> bool {
        self.paused
    }

    /// Индекс текущей прицельной точки (Waypoints)
    pub fn aim_point_index(&self) -> usize {
        self.cursor.index()
    }

    pub fn is_holding_aim(&self) -> bool {
        self.stop_wait.is_some()
    }

    pub fn has_spotted(&self) -> bool {
        self.spotted
    }

    /// Единичный вектор взгляда
    pub fn facing_direction(&self, facing: Facing) -> Vec2 {
        match self.strategy {
            FacingStrategy::Fixed => facing.unit(),
            _ => direction_from_degrees(self.aim),
        }
    }

    /// Продвигает прицел на один тик
    pub fn update_aim(&mut self, position: Vec2, facing: Facing, delta: f32) {
        match &self.strategy {
            FacingStrategy::Fixed => {
                self.aim = normalize_degrees(facing.degrees());
            }
            FacingStrategy::Sweep {
                base_angle,
                max_offset,
                speed,
                pause,
            } => {
                if !self.paused {
                    self.sweep_clock += delta;
                }

                if let Some(pause) = pause {
                    self.phase_remaining -= delta;
                    if countdown_expired(self.phase_remaining, delta) {
                        self.paused = !self.paused;
                        self.phase_remaining = if self.paused {
                            pause.paused
                        } else {
                            pause.active
                        };
                    }
                }

                let wave = pingpong(self.sweep_clock * speed, 2.0 * max_offset);
                self.aim = normalize_degrees(base_angle + wave - max_offset);
            }
            FacingStrategy::Waypoints { points, rate, .. } => {
                if points.is_empty() {
                    return;
                }

                if let Some(wait) = self.stop_wait {
                    let wait = wait - delta;
                    if countdown_expired(wait, delta) {
                        self.stop_wait = None;
                        self.cursor.advance(points.len(), RouteMode::Bounce);
                    } else {
                        self.stop_wait = Some(wait);
                    }
                    return;
                }

                let Some(point) = points.get(self.cursor.index()) else {
                    return;
                };
                let to_point = point.position - position;
                if to_point.length_squared() <= f32::EPSILON {
                    return;
                }

                let target = degrees_of(to_point);
                self.aim = move_towards_degrees(self.aim, target, rate * delta);

                if delta_degrees(self.aim, target).abs() < AIM_TOLERANCE_DEGREES {
                    if point.dwell > 0.0 {
                        self.stop_wait = Some(point.dwell);
                    } else {
                        self.cursor.advance(points.len(), RouteMode::Bounce);
                    }
                }
            }
        }
    }

    /// Проверка видимости игрока + onSpotted один раз за эпизод
    pub fn sense<P: PlayerHandle + ?Sized>(
        &mut self,
        position: Vec2,
        facing: Facing,
        spatial: &impl SpatialQuery,
        player: &mut P,
    ) -> bool {
        let visible = is_target_visible(
            &self.config,
            spatial,
            position,
            player.position(),
            self.facing_direction(facing),
        );

        if visible && !self.spotted {
            self.spotted = true;
            player.notify_spotted();
        } else if !visible {
            self.spotted = false;
        }

        visible
    }

    /// Сброс эпизода обнаружения (death reset)
    pub fn forget(&mut self) {
        self.spotted = false;
    }
}
