//! Toolkit systems.
//!
//! Submodules overview
//! - [`effect`] – count down pooled effect lifetimes
//! - [`movement`] – integrate positions from rigid body velocities and time
//! - [`seek`] – ease velocities toward [`Seek`](crate::components::seek::Seek) targets
//! - [`time`] – update simulation time and delta

pub mod effect;
pub mod movement;
pub mod seek;
pub mod time;
