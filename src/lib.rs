//! # Hillside - procedural side-scrolling world
//!
//! Noise terrain, stochastic trees with fruit, a day-night cycle and an
//! avatar whose energy budget couples movement to what the world offers.

pub mod animation;
pub mod config;
pub mod entity;
pub mod ui;
pub mod world;

/// Common imports for internal use
pub mod prelude {
    pub use crate::config::GameConfig;
    pub use crate::entity::{Avatar, AvatarInput, JumpObserver};
    pub use crate::world::{HeightMap, World, WorldRng, BLOCK_SIZE};
    pub use glam::{IVec2, Vec2};
}
