use std::cell::RefCell;
use std::rc::Rc;

use glam::{IVec2, Vec2};

use crate::animation::{EaseType, Transition};
use crate::entity::{ColliderTag, EntityId, JumpObserver};
use crate::world::color::{Rgb, DEFAULT_COLOR_DELTA};
use crate::world::rng_trait::WorldRng;
use crate::world::scheduler::TaskScheduler;

pub const LEAF_COLOR: Rgb = Rgb::new(50, 200, 30);

/// Peak ambient sway angle in degrees (either side)
const SWAY_ANGLE: f32 = 8.0;
/// Ambient width oscillation either side of the unit size
const BREATHE_WIDTH: f32 = 2.0;
const AMBIENT_PERIOD: f32 = 1.0;
const SWEEP_ANGLE: f32 = 90.0;
const SWEEP_DURATION: f32 = 2.0;

/// A purely cosmetic canopy cell
pub struct Leaf {
    pub id: EntityId,
    position: IVec2,
    unit_size: i32,
    color: Rgb,
    /// Delay before the ambient sway starts, in `[0, 1)` seconds
    sway_delay: f32,
    sway: Option<Transition>,
    breathe: Option<Transition>,
    /// One-shot sweep triggered by a jump
    sweep: Option<Transition>,
}

impl Leaf {
    pub fn new<R: WorldRng + ?Sized>(position: IVec2, unit_size: i32, rng: &mut R) -> Self {
        let color = LEAF_COLOR.approximate(rng, DEFAULT_COLOR_DELTA);
        let sway_delay = rng.gen_f32();
        Self {
            id: EntityId::new(),
            position,
            unit_size,
            color,
            sway_delay,
            sway: None,
            breathe: None,
            sweep: None,
        }
    }

    /// Start the ambient sway once this leaf's delay has elapsed.
    ///
    /// The pending task holds a weak handle, so a leaf dropped before the
    /// delay expires never starts swaying.
    pub fn schedule_ambient(leaf: &Rc<RefCell<Leaf>>, scheduler: &mut TaskScheduler) {
        let delay = leaf.borrow().sway_delay;
        let handle = Rc::downgrade(leaf);
        scheduler.schedule_after(delay, move || {
            if let Some(leaf) = handle.upgrade() {
                leaf.borrow_mut().start_ambient();
            }
        });
    }

    fn start_ambient(&mut self) {
        let unit = self.unit_size as f32;
        self.sway = Some(Transition::back_and_forth(
            -SWAY_ANGLE,
            SWAY_ANGLE,
            AMBIENT_PERIOD,
            EaseType::CubicInOut,
        ));
        self.breathe = Some(Transition::back_and_forth(
            unit - BREATHE_WIDTH,
            unit + BREATHE_WIDTH,
            AMBIENT_PERIOD,
            EaseType::CubicInOut,
        ));
    }

    /// Advance every running transition by `dt` seconds
    pub fn update(&mut self, dt: f32) {
        if let Some(sway) = &mut self.sway {
            sway.update(dt);
        }
        if let Some(breathe) = &mut self.breathe {
            breathe.update(dt);
        }
        if let Some(sweep) = &mut self.sweep {
            if !sweep.update(dt) {
                self.sweep = None;
            }
        }
    }

    pub fn position(&self) -> IVec2 {
        self.position
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    pub fn sway_delay(&self) -> f32 {
        self.sway_delay
    }

    pub fn is_swaying(&self) -> bool {
        self.sway.is_some()
    }

    pub fn is_sweeping(&self) -> bool {
        self.sweep.is_some()
    }

    /// Rotation in degrees; a jump sweep takes over from the ambient sway
    pub fn angle(&self) -> f32 {
        match (&self.sweep, &self.sway) {
            (Some(sweep), _) => sweep.value(),
            (None, Some(sway)) => sway.value(),
            (None, None) => 0.0,
        }
    }

    pub fn width(&self) -> f32 {
        self.breathe
            .as_ref()
            .map_or(self.unit_size as f32, Transition::value)
    }

    pub fn tag(&self) -> ColliderTag {
        ColliderTag::Leaf
    }

    pub fn bounds(&self) -> (Vec2, Vec2) {
        let min = self.position.as_vec2();
        (min, min + Vec2::splat(self.unit_size as f32))
    }
}

impl JumpObserver for Leaf {
    fn on_jump(&mut self) {
        self.sweep = Some(Transition::once(
            0.0,
            SWEEP_ANGLE,
            SWEEP_DURATION,
            EaseType::Linear,
        ));
    }
}

impl std::fmt::Debug for Leaf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Leaf")
            .field("id", &self.id)
            .field("position", &self.position)
            .field("angle", &self.angle())
            .field("width", &self.width())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256StarStar;

    fn leaf() -> Leaf {
        let mut rng = Xoshiro256StarStar::seed_from_u64(3);
        Leaf::new(IVec2::new(90, 300), 30, &mut rng)
    }

    #[test]
    fn test_leaf_starts_still() {
        let leaf = leaf();
        assert!((0.0..1.0).contains(&leaf.sway_delay()));
        assert_eq!(leaf.angle(), 0.0);
        assert_eq!(leaf.width(), 30.0);
        assert!(!leaf.is_swaying());
    }

    #[test]
    fn test_ambient_starts_after_delay() {
        let leaf = Rc::new(RefCell::new(leaf()));
        let mut scheduler = TaskScheduler::new();
        Leaf::schedule_ambient(&leaf, &mut scheduler);

        scheduler.advance(1.0);
        assert!(leaf.borrow().is_swaying());

        for _ in 0..40 {
            leaf.borrow_mut().update(0.05);
            let l = leaf.borrow();
            assert!((-8.0..=8.0).contains(&l.angle()));
            assert!((28.0..=32.0).contains(&l.width()));
        }
    }

    #[test]
    fn test_dropped_leaf_task_is_noop() {
        let leaf = Rc::new(RefCell::new(leaf()));
        let mut scheduler = TaskScheduler::new();
        Leaf::schedule_ambient(&leaf, &mut scheduler);
        drop(leaf);

        assert_eq!(scheduler.advance(1.0), 1);
    }

    #[test]
    fn test_jump_sweep_overrides_then_ends() {
        let mut leaf = leaf();
        leaf.start_ambient();
        leaf.on_jump();
        assert!(leaf.is_sweeping());

        leaf.update(1.0);
        assert!((leaf.angle() - 45.0).abs() < 0.01);

        leaf.update(1.0);
        assert!(!leaf.is_sweeping());
        assert!((-8.0..=8.0).contains(&leaf.angle()));
    }
}
