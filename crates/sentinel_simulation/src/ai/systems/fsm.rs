//! FSM AI systems (guard tick, transition logging).

use bevy::prelude::*;

use crate::ai::machine::{GuardFrame, GuardParts, PlayerHandle};
use crate::ai::{BehaviorChanged, BehaviorConfig, BehaviorState, PlayerKilled, PlayerSpotted};
use crate::collision::CollisionWorld;
use crate::components::{DesiredVelocity, Facing, Guard, Inactive, Player};
use crate::patrol::PatrolRoute;
use crate::vision::VisionSensor;

/// PlayerHandle поверх snapshot'а позиции
///
/// Уведомления копятся флагами, события пишутся после тика guard'а.
struct PlayerView {
    position: Vec2,
    spotted: bool,
    killed: bool,
}

impl PlayerHandle for PlayerView {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn notify_spotted(&mut self) {
        self.spotted = true;
    }

    fn notify_killed(&mut self) {
        self.killed = true;
    }
}

/// Система: тик BehaviorStateMachine всех активных guard'ов
///
/// Ошибка одного guard'а (TickError) логируется и гасит его скорость,
/// остальные guard'ы тикают дальше.
#[allow(clippy::type_complexity)]
pub fn tick_guards(
    mut guards: Query<
        (
            Entity,
            &Transform,
            &mut Guard,
            &mut BehaviorState,
            &BehaviorConfig,
            &mut Facing,
            &mut PatrolRoute,
            &mut VisionSensor,
            &mut DesiredVelocity,
        ),
        Without<Inactive>,
    >,
    players: Query<&Transform, With<Player>>,
    collision: Res<CollisionWorld>,
    time: Res<Time<Fixed>>,
    mut spotted_events: EventWriter<PlayerSpotted>,
    mut killed_events: EventWriter<PlayerKilled>,
    mut changed_events: EventWriter<BehaviorChanged>,
) {
    let delta = time.delta_secs();
    // Первый игрок — цель всех guard'ов
    let player_position = players
        .iter()
        .next()
        .map(|transform| transform.translation.truncate());

    for (
        entity,
        transform,
        mut guard,
        mut state,
        config,
        mut facing,
        mut route,
        mut sensor,
        mut velocity,
    ) in guards.iter_mut()
    {
        let previous = state.label();
        let was_missing = guard.target_missing;

        let frame = GuardFrame {
            position: transform.translation.truncate(),
            delta,
            spatial: &*collision,
        };
        let mut view = player_position.map(|position| PlayerView {
            position,
            spotted: false,
            killed: false,
        });

        let mut parts = GuardParts {
            guard: &mut *guard,
            state: &mut *state,
            config,
            facing: &mut *facing,
            route: &mut *route,
            sensor: &mut *sensor,
        };

        match parts.tick(&frame, view.as_mut()) {
            Ok(desired) => velocity.0 = desired,
            Err(error) => {
                crate::log_error(&format!("⚠️ Guard {:?} tick failed: {}", entity, error));
                velocity.0 = 0.0;
                continue;
            }
        }

        if guard.target_missing && !was_missing {
            crate::log_warning(&format!(
                "Guard {:?}: MissingTarget (no Player), holding Patrol",
                entity
            ));
        }

        if let Some(view) = view {
            if view.spotted {
                crate::log(&format!("👁️ Guard {:?} spotted the player", entity));
                spotted_events.write(PlayerSpotted { guard: entity });
            }
            if view.killed {
                crate::log(&format!("🗡️ Guard {:?} strikes the player", entity));
                killed_events.write(PlayerKilled { guard: entity });
            }
        }

        let current = state.label();
        if current != previous {
            crate::log(&format!("🔄 Guard {:?}: {} → {}", entity, previous, current));
            changed_events.write(BehaviorChanged {
                guard: entity,
                from: previous,
                to: current,
            });
        }
    }
}
