//! Presentation snapshot: BehaviorState → AnimationSignals

use bevy::prelude::*;

use crate::ai::{BehaviorConfig, BehaviorState};
use crate::components::{AnimationSignals, DesiredVelocity, Facing, Guard};
use crate::timing::deadline_reached;

/// Система: снимок состояния для animation sink
///
/// Идёт последней в тике: sink видит согласованное post-tick состояние.
pub fn update_animation_signals(
    mut guards: Query<
        (
            &BehaviorState,
            &BehaviorConfig,
            &DesiredVelocity,
            &Facing,
            &mut AnimationSignals,
        ),
        With<Guard>,
    >,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (state, config, velocity, facing, mut signals) in guards.iter_mut() {
        let telegraph_done = state
            .chase_timer()
            .map(|elapsed| deadline_reached(elapsed, config.telegraph_delay, delta));

        let next = AnimationSignals {
            attacking: state.is_attack(),
            run_to_player: telegraph_done == Some(true),
            wind_up: telegraph_done == Some(false),
            speed: velocity.0.abs(),
            facing: *facing,
        };

        // Не дёргаем change detection без изменений
        if *signals != next {
            *signals = next;
        }
    }
}
