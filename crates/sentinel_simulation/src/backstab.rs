//! Backstab — игрок устраняет guard'а со спины
//!
//! BackstabZone: круг позади guard'а (против Facing). Запрос срабатывает, только если
//! игрок не замечен и стоит в зоне. Устранённый guard despawn'ится
//! (RemovedComponents<Guard> → отписка от DeathBroadcast).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::components::{Facing, Guard, Player, PlayerStatus};
use crate::error::ConfigError;
use crate::SimulationSet;

/// Зона backstab'а относительно guard'а
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
pub struct BackstabZone {
    /// Смещение центра назад от guard'а (м)
    pub reach: f32,
    pub radius: f32,
}

impl Default for BackstabZone {
    fn default() -> Self {
        Self {
            reach: 0.75,
            radius: 0.5,
        }
    }
}

impl BackstabZone {
    pub fn new(reach: f32, radius: f32) -> Result<Self, ConfigError> {
        let zone = Self { reach, radius };
        zone.validate()?;
        Ok(zone)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.reach.is_finite() && self.radius.is_finite() && self.radius > 0.0) {
            return Err(ConfigError::InvalidBackstabZone {
                reach: self.reach,
                radius: self.radius,
            });
        }
        Ok(())
    }

    /// Центр зоны: позади guard'а
    pub fn center(&self, guard_position: Vec2, facing: Facing) -> Vec2 {
        guard_position + facing.flipped().unit() * self.reach
    }

    pub fn contains(&self, guard_position: Vec2, facing: Facing, point: Vec2) -> bool {
        self.center(guard_position, facing).distance(point) < self.radius
    }
}

/// Игрок пытается ударить в спину
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackstabRequested {
    pub player: Entity,
}

/// Guard устранён backstab'ом
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuardEliminated {
    pub guard: Entity,
}

/// Система: BackstabRequested → despawn ближайшего guard'а в зоне
pub fn resolve_backstab(
    mut commands: Commands,
    mut requests: EventReader<BackstabRequested>,
    players: Query<(&Transform, &PlayerStatus), With<Player>>,
    guards: Query<(Entity, &Transform, &Facing, &BackstabZone), With<Guard>>,
    mut eliminated: EventWriter<GuardEliminated>,
) {
    let mut taken: Vec<Entity> = Vec::new();

    for request in requests.read() {
        let Ok((player_transform, status)) = players.get(request.player) else {
            continue;
        };
        if status.spotted || status.is_dying() {
            let reason = if status.is_dying() {
                "player is dying"
            } else {
                "player already spotted"
            };
            crate::log(&format!(
                "Backstab by {:?} ignored: {}",
                request.player, reason
            ));
            continue;
        }

        let player_position = player_transform.translation.truncate();

        // Ближайший guard; при равенстве — меньший Entity (детерминизм)
        let victim = guards
            .iter()
            .filter(|(entity, ..)| !taken.contains(entity))
            .filter(|(_, transform, facing, zone)| {
                zone.contains(transform.translation.truncate(), **facing, player_position)
            })
            .map(|(entity, transform, ..)| {
                (entity, transform.translation.truncate().distance(player_position))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));

        let Some((guard, _)) = victim else {
            continue;
        };

        taken.push(guard);
        commands.entity(guard).despawn();
        eliminated.write(GuardEliminated { guard });
        crate::log(&format!("🔪 Player {:?} backstabbed guard {:?}", request.player, guard));
    }
}

/// Backstab Plugin (SimulationSet::Player, до обработки смерти)
pub struct BackstabPlugin;

impl Plugin for BackstabPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<BackstabRequested>()
            .add_event::<GuardEliminated>()
            .add_systems(
                FixedUpdate,
                resolve_backstab
                    .in_set(SimulationSet::Player)
                    .before(crate::player::mark_player_spotted),
            );
    }
}
