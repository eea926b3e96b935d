//! Seeded 1D noise for terrain height variation

use noise::{Fbm, MultiFractal, NoiseFn, Perlin};

/// Number of fractal octaves summed per sample
const OCTAVES: usize = 4;

/// Deterministic, smooth pseudo-random offset along the horizontal axis.
///
/// Samples fractal Perlin noise along the line `y = 0`. The output always lies
/// in `[-amplitude, amplitude]`; `scale` only stretches the input domain.
/// Perlin noise vanishes on lattice points, so `noise(0.0, s) == 0.0` for every
/// seed and scale.
pub struct NoiseField {
    seed: u32,
    amplitude: f64,
    source: Fbm<Perlin>,
}

impl NoiseField {
    /// Create a noise field with the given seed and output amplitude
    pub fn new(seed: u32, amplitude: f32) -> Self {
        assert!(
            amplitude.is_finite() && amplitude >= 0.0,
            "noise amplitude must be finite and non-negative, got {amplitude}"
        );

        let source = Fbm::<Perlin>::new(seed)
            .set_octaves(OCTAVES)
            .set_frequency(1.0) // Scale is applied per call
            .set_lacunarity(2.0)
            .set_persistence(0.5);

        Self {
            seed,
            amplitude: amplitude as f64,
            source,
        }
    }

    /// Fold a 64-bit world seed into a noise seed.
    ///
    /// Both halves contribute, and the result leaves room for the per-octave
    /// seeds `seed..seed + OCTAVES` without overflowing.
    pub fn fold_seed(seed: u64) -> u32 {
        let folded = (seed ^ (seed >> 32)) as u32;
        folded % (u32::MAX - OCTAVES as u32 + 2)
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn amplitude(&self) -> f32 {
        self.amplitude as f32
    }

    /// Sample the field at `x`, with `scale` world units per noise period
    pub fn noise(&self, x: f32, scale: f32) -> f32 {
        debug_assert!(scale > 0.0, "noise scale must be positive");
        let sample = self.source.get([x as f64 / scale as f64, 0.0]);
        (sample.clamp(-1.0, 1.0) * self.amplitude) as f32
    }
}

impl std::fmt::Debug for NoiseField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoiseField")
            .field("seed", &self.seed)
            .field("amplitude", &self.amplitude)
            .finish()
    }
}
