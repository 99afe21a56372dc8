//! Seek steering system.
//!
//! For every entity with [`Seek`], [`MapPosition`] and [`RigidBody`], eases
//! each velocity axis toward the braking speed for the remaining distance on
//! that axis. Positions are not touched here; run
//! [`movement_system`](super::movement::movement_system) afterwards.

use bevy_ecs::prelude::*;

use crate::components::mapposition::MapPosition;
use crate::components::rigidbody::RigidBody;
use crate::components::seek::Seek;
use crate::resources::worldtime::WorldTime;

/// Write one easing step into each seeking entity's velocity.
///
/// Frozen bodies are skipped, and nothing happens on frames with a
/// non-positive delta (paused time).
pub fn seek_system(
    mut query: Query<(&MapPosition, &Seek, &mut RigidBody)>,
    time: Res<WorldTime>,
) {
    let dt = time.delta; // delta is already scaled
    if dt <= 0.0 {
        return;
    }
    for (position, seek, mut rigidbody) in query.iter_mut() {
        if rigidbody.frozen {
            continue;
        }
        let (vx, vy) = (rigidbody.velocity_x, rigidbody.velocity_y);
        rigidbody.velocity_x = seek.profile.step(position.x, seek.target_x, vx, dt);
        rigidbody.velocity_y = seek.profile.step(position.y, seek.target_y, vy, dt);
    }
}
