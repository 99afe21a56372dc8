//! Velocity-based easing toward a target.
//!
//! [`acc_to`] advances a 1-D speed toward a target speed with separate
//! acceleration and deceleration rates. [`move_to`] derives that target speed
//! from the remaining distance so the body brakes early enough to stop on the
//! target. Both are stateless: the caller owns position and velocity, persists
//! the returned velocity and integrates it into position itself.
//!
//! Invalid parameters are not guarded. A negative deceleration makes the
//! braking-speed square root produce NaN, which then flows through the result.
//!
//! # Example
//! ```
//! use aberredkit::motion::move_to;
//!
//! let (mut pos, mut speed) = (0.0_f32, 0.0_f32);
//! for _ in 0..600 {
//!     speed = move_to(pos, 100.0, speed, 200.0, 400.0, 400.0, 1.0 / 60.0);
//!     pos += speed / 60.0;
//! }
//! assert!((pos - 100.0).abs() < 0.5);
//! ```

use crate::math::{clamp, sign};

/// One easing step of `speed` toward `target_speed`.
///
/// `acc` is used when starting from rest or speeding up in the direction the
/// body already moves; `dec` is used otherwise (slowing down or reversing).
/// The result never goes past `target_speed`.
pub fn acc_to(speed: f32, target_speed: f32, acc: f32, dec: f32, dt: f32) -> f32 {
    if speed == target_speed {
        return speed;
    }
    let rate = if speed == 0.0 || speed * target_speed > 0.0 {
        acc * dt
    } else {
        dec * dt
    };
    // Comparisons instead of f32::min/max so a NaN target propagates.
    if target_speed > 0.0 || (target_speed == 0.0 && speed < 0.0) {
        let next = speed + rate;
        if next < target_speed { next } else { target_speed }
    } else {
        // target_speed < 0, or target_speed == 0 with speed > 0
        let next = speed - rate;
        if next > target_speed { next } else { target_speed }
    }
}

/// Speed for one step toward `target` that arrives without overshooting.
///
/// The desired speed is the braking speed for the remaining distance,
/// `sign(d) * sqrt(|d| * dec)`, capped to `[-max_speed, max_speed]`, and the
/// body eases toward it through [`acc_to`]. `pos` is never modified.
pub fn move_to(
    pos: f32,
    target: f32,
    speed: f32,
    max_speed: f32,
    acc: f32,
    dec: f32,
    dt: f32,
) -> f32 {
    let dist = target - pos;
    let target_speed = clamp(sign(dist) * (dist.abs() * dec).sqrt(), -max_speed, max_speed);
    acc_to(speed, target_speed, acc, dec, dt)
}

/// Speed limits shared by every body that seeks with the same feel.
#[derive(Clone, Copy, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct MotionProfile {
    /// Speed cap in units per second.
    pub max_speed: f32,
    /// Rate used when speeding up, in units per second squared.
    pub acceleration: f32,
    /// Rate used when slowing down, in units per second squared.
    pub deceleration: f32,
}

impl Default for MotionProfile {
    fn default() -> Self {
        Self {
            max_speed: 200.0,
            acceleration: 400.0,
            deceleration: 400.0,
        }
    }
}

impl MotionProfile {
    pub fn new(max_speed: f32, acceleration: f32, deceleration: f32) -> Self {
        Self {
            max_speed,
            acceleration,
            deceleration,
        }
    }

    /// [`move_to`] with this profile's limits.
    #[inline]
    pub fn step(&self, pos: f32, target: f32, speed: f32, dt: f32) -> f32 {
        move_to(
            pos,
            target,
            speed,
            self.max_speed,
            self.acceleration,
            self.deceleration,
            dt,
        )
    }
}

/// Position and velocity of one axis.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Kinematic {
    pub position: f32,
    pub velocity: f32,
}

impl Kinematic {
    pub fn new(position: f32) -> Self {
        Self {
            position,
            velocity: 0.0,
        }
    }

    /// Ease toward `target` for `dt` seconds and integrate the new velocity.
    pub fn seek(&mut self, target: f32, profile: &MotionProfile, dt: f32) {
        self.velocity = profile.step(self.position, target, self.velocity, dt);
        self.position += self.velocity * dt;
    }

    /// Whether the body is within `distance` of `target` and slower than `speed`.
    pub fn settled(&self, target: f32, distance: f32, speed: f32) -> bool {
        (self.position - target).abs() <= distance && self.velocity.abs() <= speed
    }
}
