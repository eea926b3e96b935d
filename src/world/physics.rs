//! Avatar integration against the ground columns and solid obstacles
//!
//! The ground is static and column-shaped, so ground collision reduces to
//! comparing the avatar's feet with the highest column top under its
//! footprint. Stumps are passed in as solid rectangles: the avatar cannot
//! walk into their sides but can stand on their tops.

use glam::Vec2;

use crate::entity::Avatar;

use super::terrain::HeightMap;

const EPSILON: f32 = 1e-3;

/// Axis-aligned rectangle as (top-left, bottom-right)
pub type Bounds = (Vec2, Vec2);

/// Gravity and ground resolution for the avatar
#[derive(Debug, Clone, Copy)]
pub struct GroundPhysics {
    /// Downward acceleration in units/sec^2
    gravity: f32,
    /// Tallest ledge the avatar walks up without jumping
    step_height: f32,
}

impl GroundPhysics {
    pub fn new(gravity: f32, step_height: f32) -> Self {
        Self {
            gravity,
            step_height,
        }
    }

    pub fn gravity(&self) -> f32 {
        self.gravity
    }

    /// Highest (smallest y) column top under `[left, left + width)`
    pub fn support_height(&self, terrain: &HeightMap, left: f32, width: f32) -> f32 {
        let unit = terrain.unit_size();
        let right = left + width;

        let mut x = terrain.snap_down(left);
        let mut support = f32::INFINITY;
        while (x as f32) < right {
            support = support.min(terrain.column_top(x as f32) as f32);
            x += unit;
        }
        support
    }

    /// Highest surface under `[left, left + width)`, counting ground columns
    /// and the tops of solids at or below `reach`.
    ///
    /// Pass `f32::NEG_INFINITY` as `reach` to accept every solid.
    pub fn surface_height(
        &self,
        terrain: &HeightMap,
        solids: &[Bounds],
        left: f32,
        width: f32,
        reach: f32,
    ) -> f32 {
        let right = left + width;
        solids
            .iter()
            .filter(|(min, max)| {
                min.x < right - EPSILON && max.x > left + EPSILON && min.y >= reach - EPSILON
            })
            .fold(self.support_height(terrain, left, width), |support, (min, _)| {
                support.min(min.y)
            })
    }

    /// Whether the avatar is standing still on the ground or on a solid
    pub fn is_grounded(&self, avatar: &Avatar, terrain: &HeightMap, solids: &[Bounds]) -> bool {
        let feet = avatar.bounds().1.y;
        let left = avatar.position().x;
        let support = self.surface_height(terrain, solids, left, avatar.size().x, feet);
        avatar.velocity().y == 0.0 && (feet - support).abs() <= EPSILON
    }

    /// Whether a solid would stop the avatar occupying `body`.
    ///
    /// A resting avatar may step onto solids whose top is within one step of
    /// its feet; an airborne one may not overlap any solid at all.
    fn blocked_by_solid(&self, solids: &[Bounds], body: Bounds, resting: bool) -> bool {
        let (top_left, bottom_right) = body;
        let feet = bottom_right.y;
        let step = if resting { self.step_height } else { 0.0 };
        solids.iter().any(|(min, max)| {
            let horizontal = min.x < bottom_right.x - EPSILON && max.x > top_left.x + EPSILON;
            let vertical = min.y < feet - EPSILON && max.y > top_left.y + EPSILON;
            horizontal && vertical && feet - min.y > step + EPSILON
        })
    }

    /// Advance the avatar by `dt` seconds.
    ///
    /// Horizontal motion is refused when the ground ahead rises more than one
    /// step above the feet or when it would push the avatar into a solid.
    /// Solid tops act as ground. A resting avatar keeps a vertical velocity of
    /// exactly zero, which is what allows the next jump.
    /// Returns true when the avatar ends the step on a surface.
    pub fn integrate(
        &self,
        avatar: &mut Avatar,
        terrain: &HeightMap,
        solids: &[Bounds],
        dt: f32,
    ) -> bool {
        let size = avatar.size();
        let mut position = avatar.position();
        let mut velocity = avatar.velocity();

        if velocity.x != 0.0 {
            let next_x = position.x + velocity.x * dt;
            let feet = position.y + size.y;
            let resting = velocity.y == 0.0;
            let ground = self.support_height(terrain, next_x, size.x);
            let body = (Vec2::new(next_x, position.y), Vec2::new(next_x + size.x, feet));
            if feet - ground <= self.step_height + EPSILON
                && !self.blocked_by_solid(solids, body, resting)
            {
                position.x = next_x;
                let reach = feet - self.step_height;
                let support = self.surface_height(terrain, solids, next_x, size.x, reach);
                if resting && support < feet {
                    position.y = support - size.y;
                }
            }
        }

        let feet = position.y + size.y;
        let support = self.surface_height(terrain, solids, position.x, size.x, feet);
        let grounded = if velocity.y == 0.0 && feet >= support - EPSILON {
            position.y = support - size.y;
            true
        } else {
            velocity.y += self.gravity * dt;
            position.y += velocity.y * dt;
            if velocity.y >= 0.0 && position.y + size.y >= support {
                position.y = support - size.y;
                velocity.y = 0.0;
                true
            } else {
                false
            }
        };

        avatar.set_position(position);
        avatar.set_velocity(velocity);
        grounded
    }
}
