use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::color::Rgb;
use crate::entity::ColliderTag;

/// Edge length of the world's placement grid, in world units
pub const BLOCK_SIZE: i32 = 30;

/// Base soil color, jittered per unit
pub const GROUND_COLOR: Rgb = Rgb::new(212, 123, 74);

/// An immovable, solid square of ground placed on the world grid.
///
/// Produced in column batches by [`HeightMap::generate_columns`](super::HeightMap::generate_columns)
/// and never mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroundUnit {
    /// Top-left corner, aligned to the unit grid
    position: IVec2,
    /// Edge length of the unit
    size: i32,
    /// Blocks below the column surface (0 = surface)
    depth_index: u32,
    color: Rgb,
}

impl GroundUnit {
    pub fn new(position: IVec2, size: i32, depth_index: u32, color: Rgb) -> Self {
        debug_assert!(size > 0);
        debug_assert!(
            position.x.rem_euclid(size) == 0 && position.y.rem_euclid(size) == 0,
            "ground unit at {:?} is not aligned to a {} grid",
            position,
            size
        );
        Self {
            position,
            size,
            depth_index,
            color,
        }
    }

    pub fn position(&self) -> IVec2 {
        self.position
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    pub fn depth_index(&self) -> u32 {
        self.depth_index
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    /// Whether this unit is the top block of its column
    pub fn is_surface(&self) -> bool {
        self.depth_index == 0
    }

    pub fn tag(&self) -> ColliderTag {
        ColliderTag::Ground
    }

    /// Axis-aligned bounds as (top-left, bottom-right)
    pub fn bounds(&self) -> (Vec2, Vec2) {
        let min = self.position.as_vec2();
        (min, min + Vec2::splat(self.size as f32))
    }
}
