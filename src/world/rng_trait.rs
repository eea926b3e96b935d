//! RNG trait abstraction for world generation
//!
//! Every stochastic step (tree density, canopy density, stump heights, leaf
//! sway delays, color jitter) draws from an injected generator so a seeded
//! `Xoshiro256StarStar` reproduces the same world on every run.

/// Random number generator trait for world generation
pub trait WorldRng {
    /// Generate random f32 in [0.0, 1.0)
    fn gen_f32(&mut self) -> f32;

    /// Generate a uniform integer in `[low, high]` (inclusive)
    fn gen_range_inclusive(&mut self, low: i32, high: i32) -> i32;

    /// Generate a seed for a child generator owned by a world object
    fn gen_seed(&mut self) -> u64;

    /// Draw a fresh value and check it against a placement threshold.
    ///
    /// Inclusive: a threshold of 1.0 always passes, 0.0 passes only on an exact zero draw.
    fn passes_threshold(&mut self, threshold: f32) -> bool {
        self.gen_f32() <= threshold
    }

    /// Generate a signed jitter in `[-magnitude, magnitude)`
    fn gen_jitter(&mut self, magnitude: f32) -> f32 {
        (self.gen_f32() * 2.0 - 1.0) * magnitude
    }
}

// Blanket implementation for any type implementing rand::Rng
// (seeded Xoshiro in generation, rand::rng() in ad-hoc tooling)
impl<T: rand::Rng> WorldRng for T {
    fn gen_f32(&mut self) -> f32 {
        rand::Rng::random(self)
    }

    fn gen_range_inclusive(&mut self, low: i32, high: i32) -> i32 {
        if high <= low {
            return low;
        }
        rand::Rng::random_range(self, low..=high)
    }

    fn gen_seed(&mut self) -> u64 {
        rand::Rng::random(self)
    }
}
