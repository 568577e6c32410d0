//! Player collaborator (headless stand-in)
//!
//! Применяет уведомления guard'ов к игроку:
//! - PlayerSpotted → PlayerStatus.spotted (input заморожен, backstab недоступен)
//! - PlayerKilled → death animation (таймер), повторные kill'ы игнорируются
//! - таймер истёк → PlayerDied (DeathBroadcast) + despawn игрока
//!
//! Locomotion (ground/slope/jump) сюда не входит.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::ai::{PlayerKilled, PlayerSpotted};
use crate::broadcast::PlayerDied;
use crate::components::{Player, PlayerStatus};
use crate::timing::countdown_expired;
use crate::SimulationSet;

/// Параметры игрока
#[derive(Resource, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Длительность death animation до PlayerDied (секунды)
    pub death_delay: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self { death_delay: 2.0 }
    }
}

/// Система: PlayerSpotted → spotted
pub fn mark_player_spotted(
    mut events: EventReader<PlayerSpotted>,
    mut players: Query<(Entity, &mut PlayerStatus), With<Player>>,
) {
    for event in events.read() {
        for (entity, mut status) in players.iter_mut() {
            if !status.spotted {
                status.spotted = true;
                crate::log(&format!(
                    "🚨 Player {:?} spotted by guard {:?}",
                    entity, event.guard
                ));
            }
        }
    }
}

/// Система: PlayerKilled → старт death timer (идемпотентно)
pub fn begin_player_death(
    mut events: EventReader<PlayerKilled>,
    mut players: Query<(Entity, &mut PlayerStatus), With<Player>>,
    config: Res<PlayerConfig>,
) {
    for event in events.read() {
        for (entity, mut status) in players.iter_mut() {
            if status.is_dying() {
                continue;
            }
            status.dying = Some(config.death_delay);
            crate::log(&format!(
                "💀 Player {:?} killed by guard {:?} (death in {:.1}s)",
                entity, event.guard, config.death_delay
            ));
        }
    }
}

/// Система: death timer → PlayerDied + despawn
pub fn tick_player_death(
    mut commands: Commands,
    mut players: Query<(Entity, &mut PlayerStatus), With<Player>>,
    mut died_events: EventWriter<PlayerDied>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (entity, mut status) in players.iter_mut() {
        let Some(remaining) = status.dying else {
            continue;
        };

        let remaining = remaining - delta;
        if !countdown_expired(remaining, delta) {
            status.dying = Some(remaining);
            continue;
        }

        died_events.write(PlayerDied { player: entity });
        commands.entity(entity).despawn();
        crate::log(&format!("⚰️ Player {:?} died", entity));
    }
}

/// Player Plugin
///
/// Все системы в SimulationSet::Player (после тика guard'ов):
/// spotted → kill → death timer.
pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PlayerConfig>().add_systems(
            FixedUpdate,
            (mark_player_spotted, begin_player_death, tick_player_death)
                .chain()
                .in_set(SimulationSet::Player),
        );
    }
}
