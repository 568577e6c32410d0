//! DeathBroadcast — глобальный сигнал "игрок умер"
//!
//! Publish/subscribe реестр (Resource), а не ambient static event:
//! - подписан каждый guard без Inactive (spawn, снятие Inactive)
//! - отписка при деактивации (Inactive) или despawn, сверка раз в тик
//! - повторная подписка / отписка без подписки — no-op
//!
//! Доставка синхронная: fire() вызывает handler для каждого подписчика до возврата.
//! Handler получает только Entity и не может менять набор подписчиков (fire берёт &self).

use std::collections::BTreeSet;

use bevy::prelude::*;

use crate::ai::{BehaviorChanged, BehaviorState};
use crate::components::{DesiredVelocity, Guard, Inactive};
use crate::vision::VisionSensor;
use crate::SimulationSet;

/// Игрок умер (после death animation) — триггер DeathBroadcast
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerDied {
    pub player: Entity,
}

/// Реестр подписчиков death broadcast
///
/// BTreeSet: детерминированный порядок доставки.
#[derive(Resource, Debug, Default)]
pub struct DeathBroadcast {
    subscribers: BTreeSet<Entity>,
}

impl DeathBroadcast {
    /// true если подписка новая
    pub fn subscribe(&mut self, agent: Entity) -> bool {
        self.subscribers.insert(agent)
    }

    /// true если подписка была
    pub fn unsubscribe(&mut self, agent: Entity) -> bool {
        self.subscribers.remove(&agent)
    }

    pub fn is_subscribed(&self, agent: Entity) -> bool {
        self.subscribers.contains(&agent)
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    pub fn subscribers(&self) -> impl Iterator<Item = Entity> + '_ {
        self.subscribers.iter().copied()
    }

    /// Синхронно уведомляет всех подписчиков, возвращает их число
    pub fn fire(&self, mut handler: impl FnMut(Entity)) -> usize {
        for &agent in &self.subscribers {
            handler(agent);
        }
        self.subscribers.len()
    }
}

/// Система: сверка подписчиков с активными guard'ами
///
/// Сверка с текущим состоянием каждый тик: removal события живут два update'а
/// и теряются, если между ними не было fixed тика.
pub fn track_guard_activation(
    mut broadcast: ResMut<DeathBroadcast>,
    active_guards: Query<Entity, (With<Guard>, Without<Inactive>)>,
) {
    let stale: Vec<Entity> = broadcast
        .subscribers()
        .filter(|&agent| !active_guards.contains(agent))
        .collect();
    for agent in stale {
        broadcast.unsubscribe(agent);
        crate::log(&format!("💤 Guard {:?} unsubscribed from DeathBroadcast", agent));
    }

    for agent in active_guards.iter() {
        if !broadcast.is_subscribed(agent) {
            broadcast.subscribe(agent);
            crate::log(&format!("⏰ Guard {:?} subscribed to DeathBroadcast", agent));
        }
    }
}

/// Система: доставка PlayerDied всем подписчикам
///
/// Каждый подписчик: Patrol, скорость 0, ChaseTimer сброшен (вместе с Chase),
/// эпизод обнаружения закрыт. Маршрут продолжается с текущего индекса.
pub fn deliver_player_death(
    mut deaths: EventReader<PlayerDied>,
    broadcast: Res<DeathBroadcast>,
    mut guards: Query<(&mut BehaviorState, &mut DesiredVelocity, &mut VisionSensor), With<Guard>>,
    mut changed_events: EventWriter<BehaviorChanged>,
) {
    for death in deaths.read() {
        let notified = broadcast.fire(|agent| {
            let Ok((mut state, mut velocity, mut sensor)) = guards.get_mut(agent) else {
                return;
            };

            let previous = state.label();
            if state.reset_to_patrol() {
                changed_events.write(BehaviorChanged {
                    guard: agent,
                    from: previous,
                    to: state.label(),
                });
            }
            velocity.0 = 0.0;
            sensor.forget();
        });

        crate::log(&format!(
            "☠️ Player {:?} died → DeathBroadcast reset {} guard(s) to Patrol",
            death.player, notified
        ));
    }
}

/// Broadcast Plugin
///
/// 1. track_guard_activation (SimulationSet::Subscriptions)
/// 2. deliver_player_death (SimulationSet::Broadcast) — до тика FSM
pub struct BroadcastPlugin;

impl Plugin for BroadcastPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DeathBroadcast>()
            .add_event::<PlayerDied>()
            .add_systems(
                FixedUpdate,
                (
                    track_guard_activation.in_set(SimulationSet::Subscriptions),
                    deliver_player_death.in_set(SimulationSet::Broadcast),
                ),
            );
    }
}
