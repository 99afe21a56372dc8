//! Simulation clock updates.
//!
//! [`update_world_time`] advances [`WorldTime`] once per frame with the raw
//! frame delta; [`set_time_scale`] changes how fast simulated time flows for
//! every system reading `WorldTime::delta` (seek, movement, effects).
use bevy_ecs::prelude::*;

use crate::resources::worldtime::WorldTime;

/// Advance the clock by `dt` unscaled seconds.
///
/// Negative deltas are treated as zero so a clock hiccup never runs motion
/// backwards. The frame counter advances even when time is paused.
pub fn update_world_time(world: &mut World, dt: f32) {
    let mut wt = world.resource_mut::<WorldTime>();
    let scaled_dt = dt.max(0.0) * wt.time_scale;
    wt.elapsed += scaled_dt;
    wt.delta = scaled_dt;
    wt.frame_count += 1;
}

/// Set the time scale used from the next [`update_world_time`] on.
/// `0.0` pauses the simulation.
pub fn set_time_scale(world: &mut World, scale: f32) {
    world.resource_mut::<WorldTime>().time_scale = scale.max(0.0);
}
