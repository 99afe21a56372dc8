//! Aberred Kit library.
//!
//! Small runtime helpers for entities in a frame-stepped simulation loop:
//!
//! - [`math`] – `sign`, two-branch `clamp`, `randge`, anchored bounds
//! - [`motion`] – velocity easing (`acc_to`) and braking-distance arrival (`move_to`)
//! - [`pool`] – fixed-size round-robin [`Pool`](pool::Pool)
//! - [`eventbus`] – per-object `on`/`off`/`trigger`/`remove`
//!
//! The [`components`], [`resources`] and [`systems`] modules wire the motion
//! model and pools into a bevy_ecs world.

pub mod components;
pub mod eventbus;
pub mod math;
pub mod motion;
pub mod pool;
pub mod resources;
pub mod scenario;
pub mod systems;
