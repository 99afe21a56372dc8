//! Kinematic body storing a per-axis velocity.
//!
//! The [`RigidBody`] velocity is written by steering systems such as
//! [`seek_system`](crate::systems::seek::seek_system) and integrated into
//! [`MapPosition`](super::mapposition::MapPosition) by
//! [`movement_system`](crate::systems::movement::movement_system).
//!
//! The `frozen` flag makes both systems skip the entity, useful when its
//! position is driven from outside (e.g. an effect parked in its pool).

use bevy_ecs::prelude::Component;

/// Velocity of an entity in world units per second.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct RigidBody {
    pub velocity_x: f32,
    pub velocity_y: f32,
    /// When true, steering and movement systems leave this entity alone.
    pub frozen: bool,
}

impl RigidBody {
    /// Create a RigidBody at rest.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_velocity(velocity_x: f32, velocity_y: f32) -> Self {
        Self {
            velocity_x,
            velocity_y,
            frozen: false,
        }
    }

    /// Magnitude of the velocity.
    pub fn speed(&self) -> f32 {
        self.velocity_x.hypot(self.velocity_y)
    }

    /// Zero the velocity without touching `frozen`.
    pub fn stop(&mut self) {
        self.velocity_x = 0.0;
        self.velocity_y = 0.0;
    }

    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    pub fn unfreeze(&mut self) {
        self.frozen = false;
    }
}
