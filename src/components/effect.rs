//! Recyclable visual effect.
//!
//! Effect entities are spawned once by
//! [`spawn_effect_pool`](crate::resources::effectpool::spawn_effect_pool) and
//! never despawned. Firing one restarts its lifetime; when the lifetime runs
//! out the effect turns inactive and waits to be handed out again.

use bevy_ecs::prelude::Component;

#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct Effect {
    /// Seconds left before the effect turns inactive.
    pub remaining: f32,
    pub active: bool,
}

impl Effect {
    /// An inactive effect waiting in its pool.
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn restart(&mut self, duration: f32) {
        self.remaining = duration;
        self.active = duration > 0.0;
    }

    /// Fraction of the lifetime already consumed, from 0 to 1.
    pub fn age(&self, duration: f32) -> f32 {
        if duration <= 0.0 {
            return 1.0;
        }
        crate::math::clamp(1.0 - self.remaining / duration, 0.0, 1.0)
    }
}
