//! Time-driven value transitions (leaf sway, jump sweeps, night overlay, sun orbit).

use keyframe::{ease, functions};

/// Easing function type for transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EaseType {
    /// Constant speed interpolation
    #[default]
    Linear,
    /// Slow start and end, fast middle
    CubicInOut,
}

impl EaseType {
    /// Apply easing function to a normalized time value (0.0 to 1.0).
    pub fn apply(&self, t: f32) -> f32 {
        let t = (t as f64).clamp(0.0, 1.0);
        let result = match self {
            EaseType::Linear => ease(functions::Linear, 0.0, 1.0, t),
            EaseType::CubicInOut => ease(functions::EaseInOutCubic, 0.0, 1.0, t),
        };
        result as f32
    }
}

/// How a transition behaves once it reaches its end value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repeat {
    /// Play once and hold the end value
    Once,
    /// Ping-pong between start and end forever
    BackAndForth,
    /// Jump back to start and replay forever
    Loop,
}

/// A value interpolated between two endpoints over time.
#[derive(Debug, Clone)]
pub struct Transition {
    from: f32,
    to: f32,
    /// Duration of one pass from `from` to `to` (seconds)
    duration: f32,
    easing: EaseType,
    repeat: Repeat,
    /// Elapsed time since start (seconds)
    elapsed: f64,
}

impl Transition {
    pub fn new(from: f32, to: f32, duration: f32, easing: EaseType, repeat: Repeat) -> Self {
        assert!(
            duration > 0.0 && duration.is_finite(),
            "transition duration must be positive, got {duration}"
        );
        Self {
            from,
            to,
            duration,
            easing,
            repeat,
            elapsed: 0.0,
        }
    }

    pub fn once(from: f32, to: f32, duration: f32, easing: EaseType) -> Self {
        Self::new(from, to, duration, easing, Repeat::Once)
    }

    pub fn back_and_forth(from: f32, to: f32, duration: f32, easing: EaseType) -> Self {
        Self::new(from, to, duration, easing, Repeat::BackAndForth)
    }

    pub fn looping(from: f32, to: f32, duration: f32, easing: EaseType) -> Self {
        Self::new(from, to, duration, easing, Repeat::Loop)
    }

    /// Advance by `dt` seconds.
    ///
    /// Returns `true` while the transition is still running.
    pub fn update(&mut self, dt: f32) -> bool {
        self.elapsed += dt.max(0.0) as f64;
        !self.is_finished()
    }

    /// Normalized progress through the current pass (0.0 to 1.0), before easing
    pub fn progress(&self) -> f32 {
        Self::progress_at(self.repeat, self.duration, self.elapsed)
    }

    fn progress_at(repeat: Repeat, duration: f32, elapsed: f64) -> f32 {
        let duration = duration as f64;
        let progress = match repeat {
            Repeat::Once => (elapsed / duration).min(1.0),
            Repeat::Loop => elapsed.rem_euclid(duration) / duration,
            Repeat::BackAndForth => {
                let p = elapsed.rem_euclid(2.0 * duration) / duration;
                if p <= 1.0 { p } else { 2.0 - p }
            }
        };
        progress as f32
    }

    /// Current interpolated value
    pub fn value(&self) -> f32 {
        self.sample(self.elapsed)
    }

    /// Value this transition would have after `elapsed` seconds
    pub fn sample(&self, elapsed: f64) -> f32 {
        let t = self
            .easing
            .apply(Self::progress_at(self.repeat, self.duration, elapsed));
        self.from + (self.to - self.from) * t
    }

    /// Only `Once` transitions ever finish
    pub fn is_finished(&self) -> bool {
        self.repeat == Repeat::Once && self.elapsed >= self.duration as f64
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn repeat(&self) -> Repeat {
        self.repeat
    }
}
