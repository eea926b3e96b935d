//! Trees: stumps, leaves and fruit, plus the placer that scatters them

mod fruit;
mod leaf;
mod placer;
mod stump;
mod tree;

pub use fruit::{Fruit, FruitColor, FruitState};
pub use leaf::{Leaf, LEAF_COLOR};
pub use placer::FloraPlacer;
pub use stump::{Stump, STUMP_COLOR};
pub use tree::{CanopyMember, Tree};
