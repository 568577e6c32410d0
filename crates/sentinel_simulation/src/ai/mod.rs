//! AI decision-making module
//!
//! BehaviorStateMachine guard'ов: Patrol → Chase (telegraph) → Attack.
//! Reset в Patrol — только через DeathBroadcast (см. broadcast модуль).

use bevy::prelude::*;

use crate::SimulationSet;

pub mod components;
pub mod events;
pub mod machine;
pub mod systems;

#[cfg(test)]
mod machine_tests;

// Re-export основных типов
pub use components::{BehaviorConfig, BehaviorState};
pub use events::{BehaviorChanged, PlayerKilled, PlayerSpotted};
pub use machine::{GuardFrame, GuardParts, PlayerHandle};

/// AI Plugin
///
/// Регистрирует AI системы в FixedUpdate для детерминизма:
/// 1. tick_guards (SimulationSet::Think) — FSM + patrol + vision
/// 2. update_animation_signals (SimulationSet::Presentation) — snapshot для animation sink
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<PlayerSpotted>()
            .add_event::<PlayerKilled>()
            .add_event::<BehaviorChanged>()
            .add_systems(
                FixedUpdate,
                (
                    systems::tick_guards.in_set(SimulationSet::Think),
                    systems::update_animation_signals.in_set(SimulationSet::Presentation),
                ),
            );
    }
}
