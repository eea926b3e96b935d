//! Terrain height field and ground column generation

use glam::IVec2;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;

use super::block::{GroundUnit, GROUND_COLOR};
use super::color::{Rgb, DEFAULT_COLOR_DELTA};
use super::noise_field::NoiseField;
use crate::config::TerrainConfig;

/// Height field for the side-scrolling world.
///
/// Y grows downward (screen space), so a larger height means lower ground.
/// Read-only after construction; shared by reference with the flora placer and
/// the ground physics.
#[derive(Debug)]
pub struct HeightMap {
    seed: u64,
    baseline_height: f32,
    noise: NoiseField,
    noise_scale: f32,
    unit_size: i32,
    terrain_depth: u32,
}

impl HeightMap {
    /// Create a height map for a window of the given height
    pub fn new(seed: u64, window_height: f32, unit_size: i32, config: &TerrainConfig) -> Self {
        assert!(unit_size > 0, "unit size must be positive, got {unit_size}");
        assert!(
            window_height.is_finite() && window_height > 0.0,
            "window height must be positive, got {window_height}"
        );
        assert!(config.terrain_depth > 0, "terrain depth must be positive");
        assert!(
            config.noise_scale_units > 0.0,
            "noise scale must be positive, got {}",
            config.noise_scale_units
        );

        let baseline_height = config.baseline_factor * window_height;
        let amplitude = config.amplitude_factor * window_height;

        Self {
            seed,
            baseline_height,
            noise: NoiseField::new(NoiseField::fold_seed(seed), amplitude),
            noise_scale: config.noise_scale_units * unit_size as f32,
            unit_size,
            terrain_depth: config.terrain_depth,
        }
    }

    pub fn baseline_height(&self) -> f32 {
        self.baseline_height
    }

    pub fn unit_size(&self) -> i32 {
        self.unit_size
    }

    pub fn terrain_depth(&self) -> u32 {
        self.terrain_depth
    }

    pub fn noise(&self) -> &NoiseField {
        &self.noise
    }

    /// Ground surface height at horizontal coordinate `x`
    pub fn height_at(&self, x: f32) -> f32 {
        self.baseline_height + self.noise.noise(x, self.noise_scale)
    }

    /// Snap a coordinate down to the nearest grid multiple
    pub fn snap_down(&self, value: f32) -> i32 {
        (value / self.unit_size as f32).floor() as i32 * self.unit_size
    }

    /// Grid-snapped top of the column containing `x`
    pub fn column_top(&self, x: f32) -> i32 {
        let column_x = self.snap_down(x);
        self.snap_down(self.height_at(column_x as f32))
    }

    /// Soil color for the unit at `position`, stable across regenerations
    fn unit_color(&self, position: IVec2) -> Rgb {
        let cell = ((position.x as u32 as u64) << 32) | position.y as u32 as u64;
        let mut rng = Xoshiro256StarStar::seed_from_u64(self.seed ^ cell);
        GROUND_COLOR.approximate(&mut rng, DEFAULT_COLOR_DELTA)
    }

    /// Generate stacked ground columns covering `[min_x, max_x)`.
    ///
    /// Both bounds are snapped down to the grid. Each column emits
    /// `terrain_depth` units starting at the snapped surface and going down.
    /// Pure: overlapping calls regenerate identical units, deduplication is up
    /// to the caller.
    pub fn generate_columns(&self, min_x: f32, max_x: f32) -> Vec<GroundUnit> {
        let start_x = self.snap_down(min_x);
        let end_x = self.snap_down(max_x);
        if end_x <= start_x {
            return Vec::new();
        }

        let num_columns = ((end_x - start_x) / self.unit_size) as usize;
        let mut units = Vec::with_capacity(num_columns * self.terrain_depth as usize);

        for i in 0..num_columns {
            let cur_x = start_x + i as i32 * self.unit_size;
            let mut cur_y = self.snap_down(self.height_at(cur_x as f32));
            log::trace!("terrain column x={} top={}", cur_x, cur_y);

            for depth in 0..self.terrain_depth {
                let position = IVec2::new(cur_x, cur_y);
                units.push(GroundUnit::new(
                    position,
                    self.unit_size,
                    depth,
                    self.unit_color(position),
                ));
                cur_y += self.unit_size;
            }
        }

        units
    }
}
