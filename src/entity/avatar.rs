use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::{energy::Energy, input::AvatarInput, ColliderTag, EntityId};
use crate::config::PlayerConfig;

/// Anything that reacts when the avatar jumps
pub trait JumpObserver {
    fn on_jump(&mut self);
}

/// Shared callback that credits energy to the avatar (fruit rewards)
pub type EnergySink = Rc<dyn Fn(f32)>;

/// Which animation clip the renderer should play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AvatarAnimation {
    Idle,
    Run,
    Jump,
}

/// The player-controlled avatar
pub struct Avatar {
    pub id: EntityId,
    position: Vec2,
    velocity: Vec2,
    size: Vec2,
    energy: Rc<Cell<Energy>>,
    config: PlayerConfig,
    facing_left: bool,
    animation: AvatarAnimation,
    jump_observers: Vec<Weak<RefCell<dyn JumpObserver>>>,
    jumps: u64,
}

impl Avatar {
    /// Create a new avatar with full energy at the specified top-left position
    pub fn new(position: Vec2, config: &PlayerConfig) -> Self {
        Avatar {
            id: EntityId::new(),
            position,
            velocity: Vec2::ZERO,
            size: Vec2::new(config.width, config.height),
            energy: Rc::new(Cell::new(Energy::new(config.max_energy))),
            config: config.clone(),
            facing_left: false,
            animation: AvatarAnimation::Idle,
            jump_observers: Vec::new(),
            jumps: 0,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// Axis-aligned bounds as (top-left, bottom-right)
    pub fn bounds(&self) -> (Vec2, Vec2) {
        (self.position, self.position + self.size)
    }

    pub fn tag(&self) -> ColliderTag {
        ColliderTag::Avatar
    }

    pub fn facing_left(&self) -> bool {
        self.facing_left
    }

    pub fn animation(&self) -> AvatarAnimation {
        self.animation
    }

    /// Number of successful jumps so far
    pub fn jumps(&self) -> u64 {
        self.jumps
    }

    pub fn energy(&self) -> f32 {
        self.energy.get().current()
    }

    pub fn max_energy(&self) -> f32 {
        self.energy.get().max()
    }

    /// Add energy, saturating at the maximum
    pub fn increase_energy(&mut self, amount: f32) {
        credit(&self.energy, amount);
    }

    /// A sink crediting this avatar's energy, for objects that reward the player
    pub fn energy_sink(&self) -> EnergySink {
        let energy = Rc::clone(&self.energy);
        Rc::new(move |amount: f32| credit(&energy, amount))
    }

    /// Register an observer notified on every successful jump.
    ///
    /// The avatar only keeps a weak handle; observers dropped by the world are
    /// skipped.
    pub fn add_jump_observer(&mut self, observer: Rc<RefCell<dyn JumpObserver>>) {
        self.prune_observers();
        self.jump_observers.push(Rc::downgrade(&observer));
    }

    /// Number of observers that are still alive
    pub fn jump_observer_count(&self) -> usize {
        self.jump_observers
            .iter()
            .filter(|observer| observer.strong_count() > 0)
            .count()
    }

    fn prune_observers(&mut self) {
        self.jump_observers.retain(|observer| observer.strong_count() > 0);
    }

    /// Evaluate one frame of input.
    ///
    /// Order: left move, right move, jump (grounded only), idle regeneration.
    /// Every cost is paid in full or the action does not happen.
    /// Returns true if the avatar jumped this frame.
    pub fn update(&mut self, input: &AvatarInput) -> bool {
        let mut x_velocity = 0.0;

        if input.left_pressed && self.try_spend(self.config.move_cost) {
            x_velocity -= self.config.move_speed;
            self.animation = AvatarAnimation::Run;
            self.facing_left = true;
        }
        if input.right_pressed && self.try_spend(self.config.move_cost) {
            x_velocity += self.config.move_speed;
            self.animation = AvatarAnimation::Run;
            self.facing_left = false;
        }
        self.velocity.x = x_velocity;

        let mut jumped = false;
        if input.jump_pressed && self.velocity.y == 0.0 && self.try_spend(self.config.jump_cost) {
            self.velocity.y = self.config.jump_velocity;
            self.animation = AvatarAnimation::Jump;
            self.jumps += 1;
            jumped = true;
            self.notify_jump();
        }

        if self.velocity == Vec2::ZERO {
            self.increase_energy(self.config.idle_gain);
            self.animation = AvatarAnimation::Idle;
        }

        jumped
    }

    fn try_spend(&mut self, cost: f32) -> bool {
        let mut energy = self.energy.get();
        let paid = energy.try_spend(cost);
        self.energy.set(energy);
        paid
    }

    fn notify_jump(&mut self) {
        self.prune_observers();
        log::debug!(
            "{} jumped, notifying {} observers (energy {:.1})",
            self.id,
            self.jump_observers.len(),
            self.energy()
        );
        for observer in &self.jump_observers {
            if let Some(observer) = observer.upgrade() {
                observer.borrow_mut().on_jump();
            }
        }
    }
}

impl std::fmt::Debug for Avatar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Avatar")
            .field("id", &self.id)
            .field("position", &self.position)
            .field("velocity", &self.velocity)
            .field("energy", &self.energy.get())
            .field("animation", &self.animation)
            .field("observers", &self.jump_observers.len())
            .finish()
    }
}

fn credit(energy: &Cell<Energy>, amount: f32) {
    let mut current = energy.get();
    current.increase(amount);
    energy.set(current);
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Recorder {
        index: usize,
        log: Rc<RefCell<Vec<usize>>>,
    }

    impl JumpObserver for Recorder {
        fn on_jump(&mut self) {
            self.log.borrow_mut().push(self.index);
        }
    }

    fn avatar() -> Avatar {
        Avatar::new(Vec2::ZERO, &PlayerConfig::default())
    }

    #[test]
    fn test_avatar_creation() {
        let avatar = avatar();
        assert_eq!(avatar.energy(), 100.0);
        assert_eq!(avatar.velocity(), Vec2::ZERO);
        assert_eq!(avatar.size(), Vec2::new(50.0, 78.0));
        assert_eq!(avatar.tag(), ColliderTag::Avatar);
        assert_eq!(avatar.animation(), AvatarAnimation::Idle);
    }

    #[test]
    fn test_move_costs_energy() {
        let mut avatar = avatar();
        avatar.update(&AvatarInput::right());
        assert_eq!(avatar.energy(), 99.5);
        assert_eq!(avatar.velocity().x, 400.0);
        assert_eq!(avatar.animation(), AvatarAnimation::Run);
        assert!(!avatar.facing_left());

        avatar.update(&AvatarInput::left());
        assert_eq!(avatar.energy(), 99.0);
        assert_eq!(avatar.velocity().x, -400.0);
        assert!(avatar.facing_left());
    }

    #[test]
    fn test_both_directions_cancel_but_both_cost() {
        let mut avatar = avatar();
        let input = AvatarInput {
            left_pressed: true,
            right_pressed: true,
            jump_pressed: false,
        };
        avatar.update(&input);
        assert_eq!(avatar.velocity().x, 0.0);
        // Stationary this tick: both moves were paid, then idle regeneration applies
        assert_eq!(avatar.energy(), 100.0);
    }

    #[test]
    fn test_move_rejected_when_insufficient() {
        let mut avatar = avatar();
        let mut energy = avatar.energy.get();
        energy.set(0.4);
        avatar.energy.set(energy);

        // Airborne so idle regeneration does not kick in
        avatar.set_velocity(Vec2::new(0.0, 10.0));
        avatar.update(&AvatarInput::right());
        assert_eq!(avatar.energy(), 0.4);
        assert_eq!(avatar.velocity().x, 0.0);
    }

    #[test]
    fn test_jump_requires_grounded() {
        let mut avatar = avatar();
        avatar.set_velocity(Vec2::new(0.0, 5.0));
        assert!(!avatar.update(&AvatarInput::jump()));
        assert_eq!(avatar.energy(), 100.0);
        assert_eq!(avatar.jumps(), 0);
    }

    #[test]
    fn test_jump_costs_and_launches() {
        let mut avatar = avatar();
        assert!(avatar.update(&AvatarInput::jump()));
        assert_eq!(avatar.energy(), 90.0);
        assert_eq!(avatar.velocity().y, -650.0);
        assert_eq!(avatar.animation(), AvatarAnimation::Jump);

        // Still airborne next frame: no second jump
        assert!(!avatar.update(&AvatarInput::jump()));
        assert_eq!(avatar.energy(), 90.0);
    }

    #[test]
    fn test_jump_rejected_when_insufficient() {
        let mut avatar = avatar();
        let mut energy = avatar.energy.get();
        energy.set(9.5);
        avatar.energy.set(energy);

        assert!(!avatar.update(&AvatarInput::jump()));
        assert_eq!(avatar.velocity().y, 0.0);
        // Rejected jump leaves the avatar stationary, so it regenerates
        assert_eq!(avatar.energy(), 10.5);
    }

    #[test]
    fn test_idle_regeneration_clamped() {
        let mut avatar = avatar();
        avatar.update(&AvatarInput::jump());
        avatar.set_velocity(Vec2::ZERO);

        for _ in 0..50 {
            avatar.update(&AvatarInput::new());
            assert!(avatar.energy() <= 100.0);
        }
        assert_eq!(avatar.energy(), 100.0);
        assert_eq!(avatar.animation(), AvatarAnimation::Idle);
    }

    #[test]
    fn test_observers_notified_in_order() {
        let mut avatar = avatar();
        let log = Rc::new(RefCell::new(Vec::new()));

        let observers: Vec<Rc<RefCell<Recorder>>> = (0..5)
            .map(|index| {
                Rc::new(RefCell::new(Recorder {
                    index,
                    log: log.clone(),
                }))
            })
            .collect();
        for observer in &observers {
            avatar.add_jump_observer(observer.clone());
        }
        assert_eq!(avatar.jump_observer_count(), 5);

        avatar.update(&AvatarInput::jump());
        assert_eq!(*log.borrow(), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_dropped_observer_skipped() {
        let mut avatar = avatar();
        let log = Rc::new(RefCell::new(Vec::new()));

        let kept = Rc::new(RefCell::new(Recorder {
            index: 1,
            log: log.clone(),
        }));
        let dropped = Rc::new(RefCell::new(Recorder {
            index: 0,
            log: log.clone(),
        }));
        avatar.add_jump_observer(dropped.clone());
        avatar.add_jump_observer(kept.clone());
        drop(dropped);

        assert_eq!(avatar.jump_observer_count(), 1);
        avatar.update(&AvatarInput::jump());
        assert_eq!(*log.borrow(), vec![1]);
        assert_eq!(avatar.jump_observers.len(), 1);
    }

    #[test]
    fn test_dead_observers_pruned_on_register() {
        let mut avatar = avatar();
        let log = Rc::new(RefCell::new(Vec::new()));

        for round in 0..10 {
            let batch: Vec<_> = (0..4)
                .map(|index| {
                    Rc::new(RefCell::new(Recorder {
                        index: round * 4 + index,
                        log: log.clone(),
                    }))
                })
                .collect();
            for observer in &batch {
                avatar.add_jump_observer(observer.clone());
            }
            assert_eq!(avatar.jump_observer_count(), 4);
        }
        assert_eq!(avatar.jump_observers.len(), 4);
    }

    #[test]
    fn test_energy_sink_credits_avatar() {
        let mut avatar = avatar();
        avatar.update(&AvatarInput::jump()); // 90

        let sink = avatar.energy_sink();
        sink(5.0);
        assert_eq!(avatar.energy(), 95.0);
        sink(50.0);
        assert_eq!(avatar.energy(), 100.0);
    }
}
