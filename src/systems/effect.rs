//! Effect lifetime system.
//!
//! Counts down every active [`Effect`] and turns it inactive when its time
//! runs out. Entities are never despawned; they go back to waiting in the
//! [`EffectPool`](crate::resources::effectpool::EffectPool).

use bevy_ecs::prelude::*;

use crate::components::effect::Effect;
use crate::resources::worldtime::WorldTime;

pub fn effect_system(mut query: Query<&mut Effect>, time: Res<WorldTime>) {
    let dt = time.delta;
    for mut effect in query.iter_mut() {
        if !effect.active {
            continue;
        }
        effect.remaining -= dt;
        if effect.remaining <= 0.0 {
            effect.remaining = 0.0;
            effect.active = false;
        }
    }
}
