use serde::{Deserialize, Serialize};

use super::rng_trait::WorldRng;

/// Default per-channel jitter for [`Rgb::approximate`]
pub const DEFAULT_COLOR_DELTA: f32 = 10.0;

/// Opaque RGB color carried by world objects for the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Randomly jitter every channel by up to `delta`, clamped to 0-255
    pub fn approximate<R: WorldRng + ?Sized>(&self, rng: &mut R, delta: f32) -> Self {
        let mut jitter = |channel: u8| -> u8 {
            (channel as f32 + rng.gen_jitter(delta)).round().clamp(0.0, 255.0) as u8
        };
        Self {
            r: jitter(self.r),
            g: jitter(self.g),
            b: jitter(self.b),
        }
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }
}
