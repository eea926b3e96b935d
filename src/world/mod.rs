//! World - terrain, flora, clocks and the frame loop that ties them together

mod block;
mod color;
pub mod daynight;
pub mod flora;
mod noise_field;
pub mod physics;
pub mod rng_trait;
pub mod scheduler;
mod terrain;
#[allow(clippy::module_inception)]
mod world;

pub use block::{GroundUnit, BLOCK_SIZE, GROUND_COLOR};
pub use color::{Rgb, DEFAULT_COLOR_DELTA};
pub use daynight::DayNightCycle;
pub use flora::{CanopyMember, FloraPlacer, Fruit, FruitColor, FruitState, Leaf, Stump, Tree};
pub use noise_field::NoiseField;
pub use physics::{Bounds, GroundPhysics};
pub use rng_trait::WorldRng;
pub use scheduler::{TaskId, TaskScheduler};
pub use terrain::HeightMap;
pub use world::{TickReport, World, WorldStats};
