//! Round-robin pool of pre-spawned effect entities.
//!
//! [`spawn_effect_pool`] spawns every effect entity up front and stores them
//! in an [`EffectPool`] resource. [`fire_effect`] hands out the next entity,
//! moves it and restarts its lifetime. When all effects are busy the oldest
//! one is simply reused.

use bevy_ecs::prelude::*;
use log::debug;

use crate::components::effect::Effect;
use crate::components::mapposition::MapPosition;
use crate::pool::Pool;

#[derive(Resource, Debug)]
pub struct EffectPool {
    pub entities: Pool<Entity>,
    /// Lifetime given to an effect each time it is fired, in seconds.
    pub duration: f32,
}

/// Spawn `size` idle effect entities and insert the [`EffectPool`] resource.
///
/// # Panics
///
/// Panics if `size == 0`.
pub fn spawn_effect_pool(world: &mut World, size: usize, duration: f32) {
    let entities = Pool::new(size, || {
        world
            .spawn((MapPosition::default(), Effect::idle()))
            .id()
    });
    debug!("Spawned {} pooled effects", size);
    world.insert_resource(EffectPool { entities, duration });
}

/// Recycle the next pooled effect at `(x, y)`.
///
/// Returns the entity used, or `None` if no [`EffectPool`] exists.
pub fn fire_effect(world: &mut World, x: f32, y: f32) -> Option<Entity> {
    let (entity, duration) = {
        let mut pool = world.get_resource_mut::<EffectPool>()?;
        let duration = pool.duration;
        (*pool.entities.next(), duration)
    };
    if let Some(mut position) = world.get_mut::<MapPosition>(entity) {
        position.x = x;
        position.y = y;
    }
    if let Some(mut effect) = world.get_mut::<Effect>(entity) {
        effect.restart(duration);
    }
    Some(entity)
}
