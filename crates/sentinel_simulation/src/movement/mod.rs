//! Movement domain — kinematic stand-in для physics collaborator
//!
//! FSM пишет DesiredVelocity, здесь она интегрируется в Transform по X.
//! Настоящая физика (гравитация, склоны, платформы) вне этого crate.

use bevy::prelude::*;

use crate::components::{DesiredVelocity, Inactive};
use crate::SimulationSet;

/// Система: Transform.x += velocity * dt
pub fn integrate_velocity(
    mut movers: Query<(&DesiredVelocity, &mut Transform), Without<Inactive>>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (velocity, mut transform) in movers.iter_mut() {
        if velocity.0 == 0.0 || !velocity.0.is_finite() {
            continue;
        }
        transform.translation.x += velocity.0 * delta;
    }
}

/// Movement Plugin (SimulationSet::Motion)
pub struct MovementPlugin;

impl Plugin for MovementPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            integrate_velocity.in_set(SimulationSet::Motion),
        );
    }
}
