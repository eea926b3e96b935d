use serde::{Deserialize, Serialize};

/// Saturating energy budget for the avatar.
///
/// Spending is all-or-nothing: an action costing more than what is left is
/// rejected and leaves the budget untouched. Gains are clamped at `max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Energy {
    current: f32,
    max: f32,
}

impl Energy {
    /// Create a full energy budget with the specified maximum
    pub fn new(max: f32) -> Self {
        assert!(max > 0.0, "max energy must be positive, got {max}");
        Energy { current: max, max }
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    /// Check whether `cost` could be paid right now
    pub fn can_afford(&self, cost: f32) -> bool {
        self.current >= cost
    }

    /// Pay `cost` if the budget covers it.
    /// Returns false (and changes nothing) otherwise.
    pub fn try_spend(&mut self, cost: f32) -> bool {
        if !self.can_afford(cost) {
            return false;
        }
        self.current = (self.current - cost).max(0.0);
        true
    }

    /// Add energy, saturating at the maximum
    pub fn increase(&mut self, amount: f32) {
        self.current = (self.current + amount).clamp(0.0, self.max);
    }

    /// Check if energy is at the maximum
    pub fn is_full(&self) -> bool {
        self.current >= self.max
    }

    /// Get energy as a percentage (0.0 - 1.0)
    pub fn percentage(&self) -> f32 {
        (self.current / self.max).clamp(0.0, 1.0)
    }

    /// Set current energy (clamped to 0..=max)
    pub fn set(&mut self, value: f32) {
        self.current = value.clamp(0.0, self.max);
    }
}

impl Default for Energy {
    fn default() -> Self {
        Self::new(100.0)
    }
}
