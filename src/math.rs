//! Scalar helpers shared by the motion model and hosts.
//!
//! - [`sign`] – three-valued sign where zero stays zero
//! - [`clamp`] – two-branch clamp (lower bound checked first)
//! - [`randge`] / [`randge_with`] – uniform sample in `[from, to)`
//! - [`anchored_bounds`] – top-left rectangle of an anchored sprite

use fastrand::Rng;

/// Sign of `a` as `-1.0`, `0.0` or `1.0`. Zero is not treated as positive.
#[inline]
pub fn sign(a: f32) -> f32 {
    if a == 0.0 {
        0.0
    } else if a > 0.0 {
        1.0
    } else {
        -1.0
    }
}

/// Bound `a` to `[min, max]`.
///
/// The lower bound is checked first, then the upper one. No check is made
/// that `min <= max`; with inverted bounds the result is whatever these two
/// comparisons yield. Unlike `f32::clamp`, inverted bounds never panic.
#[inline]
pub fn clamp(a: f32, min: f32, max: f32) -> f32 {
    if a < min {
        return min;
    }
    if a > max {
        return max;
    }
    a
}

/// Uniform value in `[from, to)` drawn from the thread-local generator.
#[inline]
pub fn randge(from: f32, to: f32) -> f32 {
    from + fastrand::f32() * (to - from)
}

/// Same as [`randge`] but over a caller-owned generator, for reproducible runs.
#[inline]
pub fn randge_with(rng: &mut Rng, from: f32, to: f32) -> f32 {
    from + rng.f32() * (to - from)
}

/// Normalized pivot of a sprite, `(0, 0)` being its top-left corner.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Anchor {
    pub x: f32,
    pub y: f32,
}

/// Axis-aligned rectangle whose `x`/`y` is the top-left corner.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Convert an anchored position into a top-left rectangle.
///
/// A missing anchor behaves like `(0, 0)`.
pub fn anchored_bounds(x: f32, y: f32, width: f32, height: f32, anchor: Option<Anchor>) -> Bounds {
    let anchor = anchor.unwrap_or_default();
    Bounds {
        x: x - width * anchor.x,
        y: y - height * anchor.y,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-6;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_sign_zero_is_zero() {
        assert_eq!(sign(0.0), 0.0);
        assert_eq!(sign(-0.0), 0.0);
    }

    #[test]
    fn test_sign_positive_and_negative() {
        for v in [f32::MIN_POSITIVE, 0.5, 1.0, 1234.0, f32::MAX] {
            assert_eq!(sign(v), 1.0, "sign({v})");
            assert_eq!(sign(-v), -1.0, "sign(-{v})");
        }
    }

    #[test]
    fn test_clamp_in_range_is_identity() {
        assert_eq!(clamp(0.5, 0.0, 1.0), 0.5);
        assert_eq!(clamp(0.0, 0.0, 1.0), 0.0);
        assert_eq!(clamp(1.0, 0.0, 1.0), 1.0);
    }

    #[test]
    fn test_clamp_bounds() {
        for a in [-100.0, -1.5, -1.0, 0.0, 2.0, 3.0, 99.0] {
            let r = clamp(a, -1.0, 2.0);
            assert!((-1.0..=2.0).contains(&r), "clamp({a}) = {r}");
        }
        assert_eq!(clamp(-3.0, -1.0, 2.0), -1.0);
        assert_eq!(clamp(5.0, -1.0, 2.0), 2.0);
    }

    #[test]
    fn test_clamp_inverted_bounds_checks_lower_first() {
        // min = 5, max = 1: anything below 5 returns 5, even though 5 > max.
        assert_eq!(clamp(3.0, 5.0, 1.0), 5.0);
        // 7 is not below 5 but is above 1.
        assert_eq!(clamp(7.0, 5.0, 1.0), 1.0);
    }

    #[test]
    fn test_randge_with_stays_in_range() {
        let mut rng = Rng::with_seed(7);
        for _ in 0..1000 {
            let v = randge_with(&mut rng, -2.0, 3.0);
            assert!((-2.0..3.0).contains(&v), "{v} out of range");
        }
    }

    #[test]
    fn test_randge_degenerate_range() {
        assert!(approx_eq(randge(4.0, 4.0), 4.0));
    }

    #[test]
    fn test_anchored_bounds_centered() {
        let b = anchored_bounds(100.0, 50.0, 20.0, 10.0, Some(Anchor { x: 0.5, y: 0.5 }));
        assert!(approx_eq(b.x, 90.0));
        assert!(approx_eq(b.y, 45.0));
        assert!(approx_eq(b.width, 20.0));
        assert!(approx_eq(b.height, 10.0));
    }

    #[test]
    fn test_anchored_bounds_without_anchor() {
        let b = anchored_bounds(3.0, 4.0, 8.0, 8.0, None);
        assert_eq!(b, Bounds { x: 3.0, y: 4.0, width: 8.0, height: 8.0 });
    }
}
