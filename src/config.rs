//! World configuration with layered loading
//!
//! Configuration is loaded from multiple sources (lowest to highest priority):
//! 1. Compiled defaults
//! 2. `config.ron` file (if exists)
//! 3. Environment variables prefixed with `HILLSIDE_`
//!
//! Example environment variable: `HILLSIDE_FLORA__TREE_THRESHOLD=0.1`

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors reported by [`GameConfig::validate`]
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f64 },

    #[error("{field} must be a probability in [0, 1], got {value}")]
    NotProbability { field: &'static str, value: f32 },

    #[error("player.max_energy ({max}) must cover jump_cost ({jump}) and move_cost ({movement})")]
    EnergyBudget { max: f32, jump: f32, movement: f32 },

    #[error("failed to parse RON preset: {0}")]
    Ron(String),
}

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct GameConfig {
    #[serde(default)]
    pub world: WorldConfig,

    #[serde(default)]
    pub terrain: TerrainConfig,

    #[serde(default)]
    pub flora: FloraConfig,

    #[serde(default)]
    pub player: PlayerConfig,
}

/// World extents and timing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorldConfig {
    /// Seed for terrain noise and flora placement
    pub seed: u64,
    /// Visible window width; the initial range is `[start_x, window_width)`
    pub window_width: f32,
    /// Visible window height; baselines are fractions of this
    pub window_height: f32,
    /// Left edge of the initially generated range
    pub start_x: f32,
    /// Length of one day-night cycle in seconds (also the fruit regrowth delay)
    pub cycle_length: f32,
    /// Edge length of the placement grid
    pub unit_size: i32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            window_width: 1280.0,
            window_height: 720.0,
            start_x: 0.0,
            cycle_length: 30.0,
            unit_size: crate::world::BLOCK_SIZE,
        }
    }
}

/// Terrain height field parameters
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TerrainConfig {
    /// Baseline ground height as a fraction of the window height
    pub baseline_factor: f32,
    /// Noise amplitude as a fraction of the window height
    pub amplitude_factor: f32,
    /// Noise period in grid units
    pub noise_scale_units: f32,
    /// Blocks stacked below each column surface
    pub terrain_depth: u32,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            baseline_factor: 2.0 / 3.0,
            amplitude_factor: 0.1,
            noise_scale_units: 7.0,
            terrain_depth: 20,
        }
    }
}

/// Tree placement and canopy parameters
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FloraConfig {
    /// Per-column probability of rooting a tree
    pub tree_threshold: f32,
    /// Per-cell probability of a leaf
    pub leaf_threshold: f32,
    /// Per-cell probability of a fruit (drawn independently of the leaf)
    pub fruit_threshold: f32,
    /// Canopy half-width in cells; the canopy is `(2r+1)²` cells
    pub leaf_radius: u32,
    /// Smallest stump height in world units
    pub min_stump_height: i32,
    /// Energy granted by eating one fruit
    pub fruit_energy: f32,
}

impl Default for FloraConfig {
    fn default() -> Self {
        Self {
            tree_threshold: 0.06,
            leaf_threshold: 0.7,
            fruit_threshold: 0.05,
            leaf_radius: 3,
            min_stump_height: 120,
            fruit_energy: 10.0,
        }
    }
}

/// Avatar energy economy and movement
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlayerConfig {
    pub max_energy: f32,
    /// Energy per tick per held direction
    pub move_cost: f32,
    pub jump_cost: f32,
    /// Energy regained per fully stationary tick
    pub idle_gain: f32,
    /// Horizontal speed in units/sec
    pub move_speed: f32,
    /// Initial vertical velocity of a jump (negative = up)
    pub jump_velocity: f32,
    /// Downward acceleration in units/sec^2
    pub gravity: f32,
    pub width: f32,
    pub height: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            max_energy: 100.0,
            move_cost: 0.5,
            jump_cost: 10.0,
            idle_gain: 1.0,
            move_speed: 400.0,
            jump_velocity: -650.0,
            gravity: 350.0,
            width: 50.0,
            height: 78.0,
        }
    }
}

impl GameConfig {
    /// Load configuration with layered priority:
    /// 1. Compiled defaults (lowest priority)
    /// 2. `config.ron` file, or `path` when given (optional)
    /// 3. Environment variables prefixed with `HILLSIDE_` (highest priority)
    pub fn load(path: Option<&str>) -> Result<Self> {
        let defaults = Config::try_from(&GameConfig::default())
            .context("Failed to serialize default configuration")?;

        let builder = Config::builder()
            // Layer 1: Compiled defaults
            .add_source(defaults)
            // Layer 2: Config file (optional, won't error if missing)
            .add_source(
                File::with_name(path.unwrap_or("config"))
                    .format(FileFormat::Ron)
                    .required(path.is_some()),
            )
            // Layer 3: Environment variables (HILLSIDE_WORLD__SEED, etc.)
            .add_source(Environment::with_prefix("HILLSIDE").separator("__"));

        let config = builder.build().context("Failed to build configuration")?;

        let game_config: GameConfig = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        game_config
            .validate()
            .context("Invalid configuration")?;

        log::info!(
            "Loaded configuration (seed={}, window={}x{}, cycle={}s)",
            game_config.world.seed,
            game_config.world.window_width,
            game_config.world.window_height,
            game_config.world.cycle_length
        );
        Ok(game_config)
    }

    /// Parse a RON preset
    pub fn from_ron(source: &str) -> Result<Self, ConfigError> {
        let config: GameConfig =
            ron::from_str(source).map_err(|e| ConfigError::Ron(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to a pretty-printed RON preset
    pub fn to_ron(&self) -> Result<String, ConfigError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::Ron(e.to_string()))
    }

    /// Check every construction-time precondition
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
            if value > 0.0 && value.is_finite() {
                Ok(())
            } else {
                Err(ConfigError::NotPositive { field, value })
            }
        }

        fn probability(field: &'static str, value: f32) -> Result<(), ConfigError> {
            if (0.0..=1.0).contains(&value) {
                Ok(())
            } else {
                Err(ConfigError::NotProbability { field, value })
            }
        }

        positive("world.window_width", self.world.window_width as f64)?;
        positive("world.window_height", self.world.window_height as f64)?;
        positive("world.cycle_length", self.world.cycle_length as f64)?;
        positive("world.unit_size", self.world.unit_size as f64)?;
        positive("terrain.noise_scale_units", self.terrain.noise_scale_units as f64)?;
        positive("terrain.terrain_depth", self.terrain.terrain_depth as f64)?;
        positive("flora.min_stump_height", self.flora.min_stump_height as f64)?;

        probability("flora.tree_threshold", self.flora.tree_threshold)?;
        probability("flora.leaf_threshold", self.flora.leaf_threshold)?;
        probability("flora.fruit_threshold", self.flora.fruit_threshold)?;

        positive("player.max_energy", self.player.max_energy as f64)?;
        positive("player.gravity", self.player.gravity as f64)?;
        if self.player.jump_cost < 0.0
            || self.player.move_cost < 0.0
            || self.player.jump_cost > self.player.max_energy
            || self.player.move_cost > self.player.max_energy
        {
            return Err(ConfigError::EnergyBudget {
                max: self.player.max_energy,
                jump: self.player.jump_cost,
                movement: self.player.move_cost,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.world.cycle_length, 30.0);
        assert_eq!(config.world.unit_size, 30);
        assert_eq!(config.terrain.terrain_depth, 20);
        assert_eq!(config.flora.tree_threshold, 0.06);
        assert_eq!(config.player.jump_cost, 10.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_config_with_defaults() {
        // Should load defaults when no config file exists
        let config = GameConfig::load(None).expect("Failed to load config");
        assert_eq!(config.flora.leaf_radius, 3);
        assert_eq!(config.player.move_cost, 0.5);
    }

    #[test]
    fn test_ron_round_trip_preserves_overrides() {
        let mut config = GameConfig::default();
        config.world.seed = 7;
        config.flora.fruit_threshold = 0.2;

        let text = config.to_ron().expect("Failed to serialize");
        let parsed = GameConfig::from_ron(&text).expect("Failed to parse");
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_ron_uses_defaults() {
        let parsed = GameConfig::from_ron("(world: (seed: 9, cycle_length: 12.5))")
            .expect("Failed to parse");
        assert_eq!(parsed.world.seed, 9);
        assert_eq!(parsed.world.cycle_length, 12.5);
        assert_eq!(parsed.world.unit_size, 30);
        assert_eq!(parsed.flora, FloraConfig::default());
    }

    #[test]
    fn test_validate_rejects_negative_cycle() {
        let mut config = GameConfig::default();
        config.world.cycle_length = -1.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotPositive {
                field: "world.cycle_length",
                ..
            })
        ));
    }

    #[test]
    fn test_validate_rejects_zero_unit_size() {
        let mut config = GameConfig::default();
        config.world.unit_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_probability() {
        let mut config = GameConfig::default();
        config.flora.leaf_threshold = 1.5;
        assert_eq!(
            config.validate(),
            Err(ConfigError::NotProbability {
                field: "flora.leaf_threshold",
                value: 1.5
            })
        );
    }

    #[test]
    fn test_validate_rejects_unaffordable_jump() {
        let mut config = GameConfig::default();
        config.player.jump_cost = 150.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EnergyBudget { .. })
        ));
    }

    #[test]
    fn test_invalid_ron_reports_error() {
        assert!(matches!(
            GameConfig::from_ron("(world: (seed: \"nope\"))"),
            Err(ConfigError::Ron(_))
        ));
    }
}
