//! Steering toward a fixed point.
//!
//! An entity with [`Seek`], [`MapPosition`] and
//! [`RigidBody`](super::rigidbody::RigidBody) eases toward
//! `(target_x, target_y)`: each axis gets its own [`move_to`](crate::motion::move_to)
//! step, so the body brakes early and stops on the target instead of
//! overshooting it. See [`crate::systems::seek`] for the update system.

use bevy_ecs::prelude::Component;

use crate::components::mapposition::MapPosition;
use crate::motion::MotionProfile;

/// Distance under which [`Seek::is_near`] reports arrival by default.
pub const DEFAULT_ARRIVE_DISTANCE: f32 = 0.5;

#[derive(Component, Clone, Copy, Debug)]
pub struct Seek {
    pub target_x: f32,
    pub target_y: f32,
    /// Speed cap and acceleration/deceleration rates.
    pub profile: MotionProfile,
    /// Distance under which the target counts as reached.
    pub arrive_distance: f32,
}

impl Seek {
    pub fn new(target_x: f32, target_y: f32, profile: MotionProfile) -> Self {
        Seek {
            target_x,
            target_y,
            profile,
            arrive_distance: DEFAULT_ARRIVE_DISTANCE,
        }
    }

    pub fn with_arrive_distance(mut self, distance: f32) -> Self {
        self.arrive_distance = distance;
        self
    }

    /// Move the target; the current velocity is kept and eased from.
    pub fn retarget(&mut self, target_x: f32, target_y: f32) {
        self.target_x = target_x;
        self.target_y = target_y;
    }

    pub fn is_near(&self, position: &MapPosition) -> bool {
        position.distance_to(self.target_x, self.target_y) <= self.arrive_distance
    }
}
