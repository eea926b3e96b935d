use std::cell::RefCell;
use std::rc::{Rc, Weak};

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use crate::entity::{ColliderTag, EnergySink, EntityId, JumpObserver};
use crate::world::scheduler::TaskScheduler;

/// Whether a fruit can currently be eaten
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FruitState {
    Available,
    Consumed,
}

/// Cosmetic fruit color, toggled on every jump
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FruitColor {
    Red,
    Yellow,
}

impl FruitColor {
    pub fn toggled(self) -> Self {
        match self {
            FruitColor::Red => FruitColor::Yellow,
            FruitColor::Yellow => FruitColor::Red,
        }
    }
}

/// Edible canopy cell that rewards the avatar and regrows after a delay
pub struct Fruit {
    pub id: EntityId,
    position: IVec2,
    unit_size: i32,
    state: FruitState,
    color: FruitColor,
    energy_value: f32,
    regrowth_delay: f32,
    sink: EnergySink,
    times_eaten: u32,
    /// Handle to this fruit's own cell, captured by regrowth timers
    me: Weak<RefCell<Fruit>>,
}

impl Fruit {
    pub fn new_shared(
        position: IVec2,
        unit_size: i32,
        energy_value: f32,
        regrowth_delay: f32,
        sink: EnergySink,
    ) -> Rc<RefCell<Fruit>> {
        Rc::new_cyclic(|me| {
            RefCell::new(Fruit {
                id: EntityId::new(),
                position,
                unit_size,
                state: FruitState::Available,
                color: FruitColor::Red,
                energy_value,
                regrowth_delay,
                sink,
                times_eaten: 0,
                me: me.clone(),
            })
        })
    }

    /// React to the start of a collision with `other`.
    ///
    /// Only the avatar can eat an available fruit. Eating credits the sink
    /// once and schedules regrowth after the configured delay. Returns true
    /// if the fruit was eaten.
    pub fn on_collision_enter(&mut self, other: ColliderTag, scheduler: &mut TaskScheduler) -> bool {
        if other != ColliderTag::Avatar || self.state == FruitState::Consumed {
            return false;
        }

        self.state = FruitState::Consumed;
        self.times_eaten += 1;
        (self.sink)(self.energy_value);

        let handle = self.me.clone();
        scheduler.schedule_after(self.regrowth_delay, move || {
            if let Some(fruit) = handle.upgrade() {
                fruit.borrow_mut().regrow();
            }
        });

        log::debug!(
            "{} eaten at {:?} (+{} energy), regrows in {}s",
            self.id,
            self.position,
            self.energy_value,
            self.regrowth_delay
        );
        true
    }

    fn regrow(&mut self) {
        self.state = FruitState::Available;
        log::debug!("{} regrew at {:?}", self.id, self.position);
    }

    pub fn state(&self) -> FruitState {
        self.state
    }

    pub fn is_available(&self) -> bool {
        self.state == FruitState::Available
    }

    pub fn color(&self) -> FruitColor {
        self.color
    }

    pub fn energy_value(&self) -> f32 {
        self.energy_value
    }

    pub fn regrowth_delay(&self) -> f32 {
        self.regrowth_delay
    }

    pub fn times_eaten(&self) -> u32 {
        self.times_eaten
    }

    pub fn position(&self) -> IVec2 {
        self.position
    }

    pub fn tag(&self) -> ColliderTag {
        ColliderTag::Fruit
    }

    pub fn bounds(&self) -> (Vec2, Vec2) {
        let min = self.position.as_vec2();
        (min, min + Vec2::splat(self.unit_size as f32))
    }
}

impl JumpObserver for Fruit {
    fn on_jump(&mut self) {
        self.color = self.color.toggled();
    }
}

impl std::fmt::Debug for Fruit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fruit")
            .field("id", &self.id)
            .field("position", &self.position)
            .field("state", &self.state)
            .field("color", &self.color)
            .finish()
    }
}
