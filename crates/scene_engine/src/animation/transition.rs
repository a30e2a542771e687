//! Camera pose transition state machine
//!
//! Replaces callback-driven tweening with an explicit state machine ticked
//! synchronously by the frame driver. Overriding an active transition is the
//! only cancellation mechanism: the current interpolated pose becomes the new
//! start, so the camera never visibly snaps.

use crate::camera::CameraPose;

/// Interpolation curve applied to the elapsed fraction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    /// Constant-speed interpolation
    #[default]
    Linear,
    /// Smoothstep: eases in and out, zero velocity at both ends
    Smoothstep,
}

impl Easing {
    fn apply(self, t: f32) -> f32 {
        match self {
            Self::Linear => t,
            Self::Smoothstep => t * t * (3.0 - 2.0 * t),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    Active,
    Complete,
}

/// A bounded-duration interpolation between two camera poses
///
/// States: `Idle -> Active -> Complete`. Elapsed time is monotonically
/// non-decreasing within one transition and clamped to the duration; a
/// completed transition is terminal and further ticks are no-ops until it is
/// replaced by a new `start`.
#[derive(Debug, Clone)]
pub struct Transition {
    state: State,
    from: CameraPose,
    to: CameraPose,
    elapsed: f32,
    duration: f32,
    easing: Easing,
    current: CameraPose,
}

impl Transition {
    /// Create an idle transition resting at `initial`
    pub fn new(initial: CameraPose) -> Self {
        Self {
            state: State::Idle,
            from: initial,
            to: initial,
            elapsed: 0.0,
            duration: 0.0,
            easing: Easing::default(),
            current: initial,
        }
    }

    /// Builder pattern: set the easing curve
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Begin a transition toward `to`
    ///
    /// If a transition is already active, the *current interpolated pose*
    /// becomes the new start regardless of the supplied `from` — an override
    /// discards the pending endpoint, not the visual continuity. A
    /// non-positive duration still enters `Active`, so the next tick reports
    /// the final pose exactly once before settling; callers that apply poses
    /// only while unsettled never miss the jump.
    pub fn start(&mut self, from: CameraPose, to: CameraPose, duration: f32) {
        self.from = if self.state == State::Active {
            self.current
        } else {
            from
        };
        self.to = to;
        self.elapsed = 0.0;
        self.duration = duration.max(0.0);
        self.state = State::Active;
        log::debug!(
            "Transition started: duration {:.3}s toward {:?}",
            self.duration,
            to.position
        );
    }

    /// Advance by `dt` seconds and return the interpolated pose
    ///
    /// Negative deltas are clamped to zero. Once elapsed reaches the
    /// duration the transition completes and subsequent ticks return the
    /// final pose unchanged.
    pub fn tick(&mut self, dt: f32) -> CameraPose {
        if self.state != State::Active {
            return self.current;
        }

        self.elapsed = (self.elapsed + dt.max(0.0)).min(self.duration);
        if self.elapsed >= self.duration {
            self.current = self.to;
            self.state = State::Complete;
        } else {
            let t = self.easing.apply(self.elapsed / self.duration);
            self.current = self.from.lerp(&self.to, t);
        }
        self.current
    }

    /// True in `Idle` or `Complete`: no interpolation pending
    pub fn is_settled(&self) -> bool {
        self.state != State::Active
    }

    /// The pose at the current fraction, without advancing time
    pub fn current_pose(&self) -> CameraPose {
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Point3;
    use approx::assert_relative_eq;

    fn pose(x: f32) -> CameraPose {
        CameraPose {
            position: Point3::new(x, 0.0, 0.0),
            look_at: Point3::origin(),
            near: 0.1,
            far: 100.0,
        }
    }

    #[test]
    fn test_idle_until_started() {
        let mut transition = Transition::new(pose(0.0));
        assert!(transition.is_settled());
        // Ticking while idle reports the resting pose unchanged.
        assert_eq!(transition.tick(1.0), pose(0.0));
    }

    #[test]
    fn test_linear_interpolation_and_completion() {
        let mut transition = Transition::new(pose(0.0));
        transition.start(pose(0.0), pose(10.0), 1.0);
        assert!(!transition.is_settled());

        let mid = transition.tick(0.5);
        assert_relative_eq!(mid.position.x, 5.0, epsilon = 1e-5);

        let done = transition.tick(0.5);
        assert_relative_eq!(done.position.x, 10.0, epsilon = 1e-5);
        assert!(transition.is_settled());
    }

    #[test]
    fn test_overshoot_clamps_to_target() {
        let mut transition = Transition::new(pose(0.0));
        transition.start(pose(0.0), pose(10.0), 0.5);
        let done = transition.tick(100.0);
        assert_eq!(done, pose(10.0));
        assert!(transition.is_settled());
    }

    #[test]
    fn test_settled_ticks_are_no_ops() {
        let mut transition = Transition::new(pose(0.0));
        transition.start(pose(0.0), pose(10.0), 1.0);
        let _ = transition.tick(2.0);

        for _ in 0..5 {
            assert_eq!(transition.tick(0.25), pose(10.0));
        }
    }

    #[test]
    fn test_override_starts_from_interpolated_pose() {
        let mut transition = Transition::new(pose(0.0));
        transition.start(pose(0.0), pose(10.0), 1.0);
        let halfway = transition.tick(0.5);
        assert_relative_eq!(halfway.position.x, 5.0, epsilon = 1e-5);

        // Supplied `from` is ignored while active: the halfway pose wins.
        transition.start(pose(-100.0), pose(20.0), 1.0);
        let immediately_after = transition.tick(0.0);
        assert_relative_eq!(immediately_after.position.x, 5.0, epsilon = 1e-5);

        // Interpolation proceeds from the halfway point toward the new goal.
        let quarter_in = transition.tick(0.25);
        assert_relative_eq!(quarter_in.position.x, 5.0 + 0.25 * 15.0, epsilon = 1e-4);
    }

    #[test]
    fn test_zero_duration_completes_on_first_tick() {
        let mut transition = Transition::new(pose(0.0));
        transition.start(pose(0.0), pose(7.0), 0.0);
        // Still unsettled so a tick-driven caller observes the jump.
        assert!(!transition.is_settled());
        assert_eq!(transition.tick(0.0), pose(7.0));
        assert!(transition.is_settled());
        assert_eq!(transition.current_pose(), pose(7.0));
    }

    #[test]
    fn test_negative_dt_does_not_rewind() {
        let mut transition = Transition::new(pose(0.0));
        transition.start(pose(0.0), pose(10.0), 1.0);
        let p1 = transition.tick(0.5);
        let p2 = transition.tick(-0.3);
        assert_relative_eq!(p2.position.x, p1.position.x, epsilon = 1e-6);
    }

    #[test]
    fn test_smoothstep_hits_endpoints() {
        let mut transition = Transition::new(pose(0.0)).with_easing(Easing::Smoothstep);
        transition.start(pose(0.0), pose(10.0), 1.0);

        // Slower than linear near the start.
        let early = transition.tick(0.1);
        assert!(early.position.x < 1.0);

        let done = transition.tick(0.9);
        assert_relative_eq!(done.position.x, 10.0, epsilon = 1e-5);
    }
}
