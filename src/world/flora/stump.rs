use glam::{IVec2, Vec2};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;

use crate::entity::{ColliderTag, EntityId, JumpObserver};
use crate::world::color::{Rgb, DEFAULT_COLOR_DELTA};

/// Base bark color
pub const STUMP_COLOR: Rgb = Rgb::new(100, 50, 20);

/// Solid trunk of a tree, rooted on the ground surface
pub struct Stump {
    pub id: EntityId,
    /// Top-left corner
    position: IVec2,
    size: IVec2,
    color: Rgb,
    rng: Xoshiro256StarStar,
}

impl Stump {
    /// `seed` drives the recolor jitter on every jump
    pub fn new(position: IVec2, width: i32, height: i32, seed: u64) -> Self {
        Self {
            id: EntityId::new(),
            position,
            size: IVec2::new(width, height),
            color: STUMP_COLOR,
            rng: Xoshiro256StarStar::seed_from_u64(seed),
        }
    }

    pub fn position(&self) -> IVec2 {
        self.position
    }

    pub fn size(&self) -> IVec2 {
        self.size
    }

    pub fn height(&self) -> i32 {
        self.size.y
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    pub fn tag(&self) -> ColliderTag {
        ColliderTag::Stump
    }

    pub fn bounds(&self) -> (Vec2, Vec2) {
        let min = self.position.as_vec2();
        (min, min + self.size.as_vec2())
    }
}

impl JumpObserver for Stump {
    fn on_jump(&mut self) {
        self.color = STUMP_COLOR.approximate(&mut self.rng, DEFAULT_COLOR_DELTA);
    }
}

impl std::fmt::Debug for Stump {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stump")
            .field("id", &self.id)
            .field("position", &self.position)
            .field("size", &self.size)
            .field("color", &self.color)
            .finish()
    }
}
