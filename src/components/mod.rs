//! ECS components for entities.
//!
//! Submodules overview:
//! - [`effect`] – recyclable visual effect with a restartable lifetime
//! - [`mapposition`] – world-space position (pivot) for an entity
//! - [`rigidbody`] – simple kinematic body storing velocity
//! - [`seek`] – steering target eased toward with a motion profile

pub mod effect;
pub mod mapposition;
pub mod rigidbody;
pub mod seek;
