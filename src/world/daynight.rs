//! Day/night cycle: sun orbit and night overlay driven by one shared clock

use glam::Vec2;

use crate::animation::{EaseType, Transition};

/// Peak opacity of the night overlay at midnight
pub const MIDNIGHT_OPACITY: f32 = 0.5;

/// Brightest light level at noon
pub const LIGHT_MAX: u8 = 15;

pub struct DayNightCycle {
    cycle_length: f32,
    /// Sun angle in degrees, one full turn per cycle
    sun: Transition,
    /// Overlay opacity, 0 → 0.5 → 0 over one cycle
    night: Transition,
}

impl DayNightCycle {
    pub fn new(cycle_length: f32) -> Self {
        assert!(
            cycle_length > 0.0 && cycle_length.is_finite(),
            "cycle length must be positive, got {cycle_length}"
        );
        Self {
            cycle_length,
            sun: Transition::looping(0.0, 360.0, cycle_length, EaseType::Linear),
            night: Transition::back_and_forth(
                0.0,
                MIDNIGHT_OPACITY,
                cycle_length / 2.0,
                EaseType::CubicInOut,
            ),
        }
    }

    pub fn advance(&mut self, dt: f32) {
        self.sun.update(dt);
        self.night.update(dt);
    }

    pub fn cycle_length(&self) -> f32 {
        self.cycle_length
    }

    /// Time since the start of the current cycle, in `[0, cycle_length)`
    pub fn phase(&self) -> f32 {
        (self.sun.elapsed() % self.cycle_length as f64) as f32
    }

    /// Fraction of the current cycle elapsed, in `[0, 1)`
    pub fn progress(&self) -> f32 {
        self.sun.progress()
    }

    /// Position within the half-length ping-pong used by the night overlay
    pub fn bounce_phase(&self) -> f32 {
        self.night.progress()
    }

    pub fn sun_angle(&self) -> f32 {
        self.sun.value()
    }

    /// Sun position for a `window`-sized view.
    ///
    /// The sun starts at (w/2, h/3) and rotates about (w/2, 2h/3).
    pub fn sun_center(&self, window: Vec2) -> Vec2 {
        let pivot = Vec2::new(window.x / 2.0, window.y * 2.0 / 3.0);
        let start = Vec2::new(window.x / 2.0, window.y / 3.0);
        let angle = self.sun_angle().to_radians();
        pivot + Vec2::from_angle(angle).rotate(start - pivot)
    }

    pub fn night_opacity(&self) -> f32 {
        self.night.value()
    }

    /// Sky light level, 0 at midnight and `LIGHT_MAX` at noon
    pub fn light_level(&self) -> u8 {
        let brightness = 1.0 - self.night_opacity() / MIDNIGHT_OPACITY;
        (brightness.clamp(0.0, 1.0) * LIGHT_MAX as f32).round() as u8
    }
}

impl std::fmt::Debug for DayNightCycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DayNightCycle")
            .field("cycle_length", &self.cycle_length)
            .field("phase", &self.phase())
            .field("night_opacity", &self.night_opacity())
            .finish()
    }
}
