//! PatrolRoute — движение guard'а по авторскому списку waypoint'ов
//!
//! Алгоритм тика (advance):
//! 1. Route из 0/1 точки → hold position (нулевая скорость, без деления на ноль)
//! 2. Dwell активен (> 0) → стоим, уменьшаем таймер, индекс не двигаем
//! 3. Иначе едем к текущей точке; при `distance < arrival_threshold` запускаем
//!    dwell этой точки и сдвигаем индекс (wrap или bounce)

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::components::Facing;
use crate::error::ConfigError;
use crate::timing::countdown_expired;

/// Дефолтный радиус прибытия (м)
pub const DEFAULT_ARRIVAL_THRESHOLD: f32 = 0.1;

/// Точка маршрута
#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
pub struct Waypoint {
    pub position: Vec2,
    /// Пауза после прибытия (секунды)
    #[serde(default)]
    pub dwell: f32,
}

impl Waypoint {
    pub fn new(position: Vec2, dwell: f32) -> Self {
        Self { position, dwell }
    }
}

/// Как курсор проходит концы списка
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Reflect, Serialize, Deserialize)]
pub enum RouteMode {
    /// 0, 1, .., n-1, 0, 1, ..
    #[default]
    Wrap,
    /// 0, 1, .., n-1, n-2, .., 0, 1, .. (концы — точки разворота)
    Bounce,
}

/// Индекс + направление обхода
///
/// Инвариант: `index < len` для непустого списка. Используется и маршрутом,
/// и waypoint-sweep'ом зрения (там точки — прицелы, а не позиции).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub struct WaypointCursor {
    index: usize,
    forward: bool,
}

impl Default for WaypointCursor {
    fn default() -> Self {
        Self {
            index: 0,
            forward: true,
        }
    }
}

impl WaypointCursor {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_forward(&self) -> bool {
        self.forward
    }

    /// Следующая точка. Для `len <= 1` курсор стоит на 0.
    pub fn advance(&mut self, len: usize, mode: RouteMode) {
        if len <= 1 {
            *self = Self::default();
            return;
        }
        self.index = self.index.min(len - 1);

        match mode {
            RouteMode::Wrap => {
                self.index = (self.index + 1) % len;
                self.forward = true;
            }
            RouteMode::Bounce => {
                if self.forward {
                    if self.index + 1 >= len {
                        self.forward = false;
                        self.index = len - 2;
                    } else {
                        self.index += 1;
                    }
                } else if self.index == 0 {
                    self.forward = true;
                    self.index = 1;
                } else {
                    self.index -= 1;
                }
            }
        }
    }
}

/// Выход одного тика маршрута
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteStep {
    /// Желаемая горизонтальная скорость
    pub velocity_x: f32,
    /// Новая ориентация (None = не менять)
    pub facing: Option<Facing>,
}

impl RouteStep {
    pub const HOLD: Self = Self {
        velocity_x: 0.0,
        facing: None,
    };
}

/// Маршрут патруля (принадлежит одному guard'у)
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub struct PatrolRoute {
    waypoints: Vec<Waypoint>,
    mode: RouteMode,
    arrival_threshold: f32,
    cursor: WaypointCursor,
    dwell_remaining: f32,
}

impl Default for PatrolRoute {
    fn default() -> Self {
        Self {
            waypoints: Vec::new(),
            mode: RouteMode::Wrap,
            arrival_threshold: DEFAULT_ARRIVAL_THRESHOLD,
            cursor: WaypointCursor::default(),
            dwell_remaining: 0.0,
        }
    }
}

impl PatrolRoute {
    /// Валидирует authoring данные: конечные позиции, dwell >= 0, threshold > 0
    pub fn new(
        waypoints: Vec<Waypoint>,
        mode: RouteMode,
        arrival_threshold: f32,
    ) -> Result<Self, ConfigError> {
        if !(arrival_threshold.is_finite() && arrival_threshold > 0.0) {
            return Err(ConfigError::InvalidArrivalThreshold(arrival_threshold));
        }
        for (index, waypoint) in waypoints.iter().enumerate() {
            if !waypoint.position.is_finite() {
                return Err(ConfigError::NonFiniteWaypoint { index });
            }
            if !(waypoint.dwell.is_finite() && waypoint.dwell >= 0.0) {
                return Err(ConfigError::InvalidDwell {
                    index,
                    dwell: waypoint.dwell,
                });
            }
        }

        Ok(Self {
            waypoints,
            mode,
            arrival_threshold,
            cursor: WaypointCursor::default(),
            dwell_remaining: 0.0,
        })
    }

    /// Wrap маршрут с дефолтным threshold
    pub fn looping(waypoints: Vec<Waypoint>) -> Result<Self, ConfigError> {
        Self::new(waypoints, RouteMode::Wrap, DEFAULT_ARRIVAL_THRESHOLD)
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn mode(&self) -> RouteMode {
        self.mode
    }

    pub fn arrival_threshold(&self) -> f32 {
        self.arrival_threshold
    }

    pub fn current_index(&self) -> usize {
        self.cursor.index()
    }

    pub fn current_waypoint(&self) -> Option<&Waypoint> {
        self.waypoints.get(self.cursor.index())
    }

    pub fn dwell_remaining(&self) -> f32 {
        self.dwell_remaining
    }

    pub fn is_dwelling(&self) -> bool {
        self.dwell_remaining > 0.0
    }

    /// Один тик патруля
    pub fn advance(&mut self, position: Vec2, speed: f32, delta: f32) -> RouteStep {
        if self.waypoints.len() <= 1 {
            return RouteStep::HOLD;
        }

        if self.dwell_remaining > 0.0 {
            let remaining = self.dwell_remaining - delta;
            self.dwell_remaining = if countdown_expired(remaining, delta) {
                0.0
            } else {
                remaining
            };
            return RouteStep::HOLD;
        }

        let Some(&waypoint) = self.current_waypoint() else {
            return RouteStep::HOLD;
        };

        let direction = (waypoint.position - position).normalize_or_zero();
        let step = RouteStep {
            velocity_x: direction.x * speed,
            facing: Some(Facing::from_direction_x(direction.x)),
        };

        if position.distance(waypoint.position) < self.arrival_threshold {
            self.dwell_remaining = waypoint.dwell;
            self.cursor.advance(self.waypoints.len(), self.mode);
        }

        step
    }
}
