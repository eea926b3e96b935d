use std::cell::RefCell;
use std::rc::Rc;

use crate::entity::JumpObserver;

use super::{Fruit, Leaf, Stump};

/// One cell of a tree's canopy
#[derive(Debug, Clone)]
pub enum CanopyMember {
    Leaf(Rc<RefCell<Leaf>>),
    Fruit(Rc<RefCell<Fruit>>),
}

impl CanopyMember {
    fn as_observer(&self) -> Rc<RefCell<dyn JumpObserver>> {
        match self {
            CanopyMember::Leaf(leaf) => leaf.clone(),
            CanopyMember::Fruit(fruit) => fruit.clone(),
        }
    }
}

/// A stump plus the leaves and fruit generated around its top
#[derive(Debug)]
pub struct Tree {
    pub stump: Rc<RefCell<Stump>>,
    pub canopy: Vec<CanopyMember>,
}

impl Tree {
    pub fn new(stump: Stump, canopy: Vec<CanopyMember>) -> Self {
        Self {
            stump: Rc::new(RefCell::new(stump)),
            canopy,
        }
    }

    /// Every object in this tree that reacts to a jump, stump first
    pub fn jump_observers(&self) -> Vec<Rc<RefCell<dyn JumpObserver>>> {
        let stump: Rc<RefCell<dyn JumpObserver>> = self.stump.clone();
        std::iter::once(stump)
            .chain(self.canopy.iter().map(CanopyMember::as_observer))
            .collect()
    }

    pub fn leaves(&self) -> impl Iterator<Item = &Rc<RefCell<Leaf>>> {
        self.canopy.iter().filter_map(|member| match member {
            CanopyMember::Leaf(leaf) => Some(leaf),
            CanopyMember::Fruit(_) => None,
        })
    }

    pub fn fruits(&self) -> impl Iterator<Item = &Rc<RefCell<Fruit>>> {
        self.canopy.iter().filter_map(|member| match member {
            CanopyMember::Fruit(fruit) => Some(fruit),
            CanopyMember::Leaf(_) => None,
        })
    }

    /// Horizontal position of the stump
    pub fn x(&self) -> i32 {
        self.stump.borrow().position().x
    }
}
