//! BehaviorStateMachine — один тик одного guard'а
//!
//! Чистая логика поверх компонентов (без Query), чтобы тестировать без App.
//! Система tick_guards собирает GuardParts из Query и вызывает tick().
//!
//! Порядок тика:
//! 1. Patrol → PatrolRoute; Chase → ChaseTimer + telegraph + pursuit; Attack → стоим
//! 2. Прицел VisionSensor'а
//! 3. Только в Patrol: VisionSensor → первый true переводит в Chase

use bevy::prelude::*;

use crate::ai::components::{BehaviorConfig, BehaviorState};
use crate::collision::SpatialQuery;
use crate::components::{Facing, Guard};
use crate::error::TickError;
use crate::patrol::PatrolRoute;
use crate::timing::deadline_reached;
use crate::vision::VisionSensor;

/// Capability игрока с точки зрения guard'а
///
/// Позиция read-only; notify_* — side effects, которые применяет сам игрок.
pub trait PlayerHandle {
    fn position(&self) -> Vec2;
    fn notify_spotted(&mut self);
    fn notify_killed(&mut self);
}

/// Внешние входы тика
pub struct GuardFrame<'a, S: SpatialQuery> {
    pub position: Vec2,
    pub delta: f32,
    pub spatial: &'a S,
}

/// Изменяемые компоненты одного guard'а
pub struct GuardParts<'a> {
    pub guard: &'a mut Guard,
    pub state: &'a mut BehaviorState,
    pub config: &'a BehaviorConfig,
    pub facing: &'a mut Facing,
    pub route: &'a mut PatrolRoute,
    pub sensor: &'a mut VisionSensor,
}

impl GuardParts<'_> {
    /// Один тик FSM → желаемая горизонтальная скорость
    ///
    /// `player == None` (MissingTarget): остаёмся в Patrol, vision/chase пропускаем.
    pub fn tick<S, P>(
        &mut self,
        frame: &GuardFrame<'_, S>,
        player: Option<&mut P>,
    ) -> Result<f32, TickError>
    where
        S: SpatialQuery,
        P: PlayerHandle + ?Sized,
    {
        let position = frame.position;
        if !position.is_finite() {
            return Err(TickError::NonFinitePosition(position));
        }

        let Some(player) = player else {
            self.guard.target_missing = true;
            self.state.reset_to_patrol();
            self.sensor.forget();
            return Ok(self.patrol(position, frame.delta));
        };
        self.guard.target_missing = false;

        let target = player.position();
        if !target.is_finite() {
            return Err(TickError::NonFiniteTarget(target));
        }

        let mut velocity = match *self.state {
            BehaviorState::Patrol => self.patrol(position, frame.delta),
            BehaviorState::Chase { elapsed } => {
                self.chase(position, target, elapsed + frame.delta, frame.delta, player)
            }
            BehaviorState::Attack => 0.0,
        };

        self.sensor.update_aim(position, *self.facing, frame.delta);

        if self.state.is_patrol() {
            let visible = self
                .sensor
                .sense(position, *self.facing, frame.spatial, player);
            if self.state.observe_target(visible) {
                // Wind-up начинается сразу
                velocity = 0.0;
            }
        }

        Ok(velocity)
    }

    fn patrol(&mut self, position: Vec2, delta: f32) -> f32 {
        let step = self.route.advance(position, self.guard.speed, delta);
        if let Some(facing) = step.facing {
            *self.facing = facing;
        }
        step.velocity_x
    }

    fn chase<P: PlayerHandle + ?Sized>(
        &mut self,
        position: Vec2,
        target: Vec2,
        elapsed: f32,
        delta: f32,
        player: &mut P,
    ) -> f32 {
        *self.state = BehaviorState::Chase { elapsed };

        // Telegraph: стоим
        if !deadline_reached(elapsed, self.config.telegraph_delay, delta) {
            return 0.0;
        }

        let direction = (target - position).normalize_or_zero();
        if direction.x != 0.0 {
            *self.facing = Facing::from_direction_x(direction.x);
        }

        if position.distance(target) < self.config.strike_range {
            *self.state = BehaviorState::Attack;
            player.notify_killed();
            return 0.0;
        }

        direction.x * self.guard.speed * self.config.chase_speed_factor
    }
}
