//! # Tween — Eased Interpolation Over Time
//!
//! [`Tween`] interpolates one scalar from a start value to an end value over
//! a fixed duration, shaped by an [`EaseFunction`]. The drag controller uses
//! it for the snap that settles the carousel on a slide after a release.
//!
//! Time is passed in explicitly (`now`), so a tween is a pure function of
//! the clock and can be sampled from any frame callback or test.

use std::time::Duration;

/// Easing curves.
///
/// Each variant maps `t` in \[0, 1\] to an eased value in \[0, 1\].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EaseFunction {
    /// `1 - (1 - t)^3`: fast start, gentle landing.
    CubicOut,
}

impl EaseFunction {
    /// Evaluate the easing function at `t` (clamped to \[0, 1\]).
    pub fn sample(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::CubicOut => 1.0 - (1.0 - t).powi(3),
        }
    }
}

/// A scalar interpolation started at a known instant.
#[derive(Debug, Clone, Copy)]
pub struct Tween {
    pub from: f32,
    pub to: f32,
    pub start: Duration,
    pub duration: Duration,
    pub ease: EaseFunction,
}

impl Tween {
    pub fn new(from: f32, to: f32, start: Duration, duration: Duration, ease: EaseFunction) -> Self {
        Self {
            from,
            to,
            start,
            duration,
            ease,
        }
    }

    /// Linear progress in \[0, 1\] at `now`.
    pub fn progress(&self, now: Duration) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_sub(self.start);
        (elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }

    pub fn is_done(&self, now: Duration) -> bool {
        self.progress(now) >= 1.0
    }

    /// Interpolated value at `now`. Exactly `to` once the tween is done.
    pub fn sample(&self, now: Duration) -> f32 {
        let t = self.progress(now);
        if t >= 1.0 {
            return self.to;
        }
        lerp(self.from, self.to, self.ease.sample(t))
    }
}

/// Linearly interpolate between `a` and `b` at factor `t`.
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ease_endpoints() {
        let ease = EaseFunction::CubicOut;
        assert!(ease.sample(0.0).abs() < 1e-6);
        assert!((ease.sample(1.0) - 1.0).abs() < 1e-6);
        // Clamped outside [0, 1].
        assert_eq!(ease.sample(-0.5), ease.sample(0.0));
        assert_eq!(ease.sample(1.5), ease.sample(1.0));
    }

    #[test]
    fn cubic_out_front_loads_motion() {
        // 1 - (1 - 0.5)^3
        assert!((EaseFunction::CubicOut.sample(0.5) - 0.875).abs() < 1e-6);
        assert!(EaseFunction::CubicOut.sample(0.2) > 0.2);
    }

    #[test]
    fn tween_samples_between_endpoints() {
        let tween = Tween::new(
            0.0,
            2.0,
            Duration::from_millis(100),
            Duration::from_millis(300),
            EaseFunction::CubicOut,
        );
        assert_eq!(tween.sample(Duration::from_millis(50)), 0.0);
        let mid = tween.sample(Duration::from_millis(250));
        assert!((mid - 1.75).abs() < 1e-4, "got {mid}");
        assert!(!tween.is_done(Duration::from_millis(399)));
        assert!(tween.is_done(Duration::from_millis(400)));
        assert_eq!(tween.sample(Duration::from_millis(400)), 2.0);
    }

    #[test]
    fn zero_duration_jumps_to_end() {
        let tween = Tween::new(1.0, -1.0, Duration::ZERO, Duration::ZERO, EaseFunction::CubicOut);
        assert!(tween.is_done(Duration::ZERO));
        assert_eq!(tween.sample(Duration::ZERO), -1.0);
    }
}
