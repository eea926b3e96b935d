use std::cell::RefCell;
use std::rc::Rc;

use glam::IVec2;

use crate::config::FloraConfig;
use crate::entity::EnergySink;
use crate::world::rng_trait::WorldRng;

use super::{CanopyMember, Fruit, Leaf, Stump, Tree};

/// Stump height is capped at this fraction of the ground height below it
const STUMP_HEIGHT_FACTOR: f32 = 0.5;

/// Scatters trees along the ground surface.
///
/// Holds the ground height function, the avatar's energy sink (handed to every
/// fruit) and the day-night cycle length (fruit regrowth delay). All
/// randomness comes from the caller's generator.
pub struct FloraPlacer<F: Fn(f32) -> f32> {
    height_at: F,
    energy_sink: EnergySink,
    cycle_length: f32,
    unit_size: i32,
    config: FloraConfig,
}

impl<F: Fn(f32) -> f32> FloraPlacer<F> {
    pub fn new(
        height_at: F,
        energy_sink: EnergySink,
        cycle_length: f32,
        unit_size: i32,
        config: &FloraConfig,
    ) -> Self {
        assert!(unit_size > 0, "unit size must be positive, got {unit_size}");
        assert!(
            cycle_length > 0.0,
            "cycle length must be positive, got {cycle_length}"
        );
        for (name, value) in [
            ("tree_threshold", config.tree_threshold),
            ("leaf_threshold", config.leaf_threshold),
            ("fruit_threshold", config.fruit_threshold),
        ] {
            assert!(
                (0.0..=1.0).contains(&value),
                "{name} must be within [0, 1], got {value}"
            );
        }

        Self {
            height_at,
            energy_sink,
            cycle_length,
            unit_size,
            config: config.clone(),
        }
    }

    /// Root a tree on every grid column in `[min_x, max_x)` that passes the
    /// tree density draw.
    ///
    /// Columns start at the first grid multiple at or after `min_x`, so an
    /// unaligned `min_x` still yields grid-aligned trees: with 30-unit cells,
    /// `min_x = 45` puts the first candidate column at 60.
    pub fn place_trees<R: WorldRng + ?Sized>(&self, min_x: f32, max_x: f32, rng: &mut R) -> Vec<Tree> {
        let unit = self.unit_size as f32;
        let mut trees = Vec::new();

        let mut x = (min_x / unit).ceil() * unit;
        while x < max_x {
            if rng.passes_threshold(self.config.tree_threshold) {
                let root_y = (self.height_at)(x);
                trees.push(self.grow_tree(x as i32, root_y, rng));
            }
            x += unit;
        }

        log::debug!(
            "placed {} trees in [{}, {})",
            trees.len(),
            min_x,
            max_x
        );
        trees
    }

    /// Uniform stump height in `[min_stump_height, floor(root_y / 2)]`.
    ///
    /// When ground is too shallow for the minimum, the cap itself is used.
    fn stump_height<R: WorldRng + ?Sized>(&self, root_y: f32, rng: &mut R) -> i32 {
        let cap = (root_y * STUMP_HEIGHT_FACTOR).floor() as i32;
        if cap < self.config.min_stump_height {
            return cap.max(1);
        }
        rng.gen_range_inclusive(self.config.min_stump_height, cap)
    }

    fn grow_tree<R: WorldRng + ?Sized>(&self, x: i32, root_y: f32, rng: &mut R) -> Tree {
        let unit = self.unit_size;
        let height = self.stump_height(root_y, rng);
        let top = root_y.floor() as i32 - height;
        let stump = Stump::new(IVec2::new(x, top), unit, height, rng.gen_seed());

        // Cells are laid out on a grid centered on the middle of the stump top
        let radius = self.config.leaf_radius as i32;
        let mut canopy = Vec::new();
        for i in -radius..=radius {
            for j in -radius..=radius {
                let cell = IVec2::new(x + i * unit, top - unit / 2 + j * unit);

                if rng.passes_threshold(self.config.leaf_threshold) {
                    let leaf = Leaf::new(cell, unit, rng);
                    canopy.push(CanopyMember::Leaf(Rc::new(RefCell::new(leaf))));
                }
                if rng.passes_threshold(self.config.fruit_threshold) {
                    canopy.push(CanopyMember::Fruit(Fruit::new_shared(
                        cell,
                        unit,
                        self.config.fruit_energy,
                        self.cycle_length,
                        self.energy_sink.clone(),
                    )));
                }
            }
        }

        log::trace!(
            "tree at x={} height={} canopy={}",
            x,
            height,
            canopy.len()
        );
        Tree::new(stump, canopy)
    }

    pub fn cycle_length(&self) -> f32 {
        self.cycle_length
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256StarStar;
    use std::cell::Cell;

    fn sink() -> EnergySink {
        Rc::new(|_: f32| {})
    }

    fn flat(y: f32) -> impl Fn(f32) -> f32 {
        move |_| y
    }

    #[test]
    fn test_same_seed_same_forest() {
        let placer = FloraPlacer::new(flat(600.0), sink(), 30.0, 30, &FloraConfig::default());

        let mut a = Xoshiro256StarStar::seed_from_u64(42);
        let mut b = Xoshiro256StarStar::seed_from_u64(42);
        let first = placer.place_trees(0.0, 6000.0, &mut a);
        let second = placer.place_trees(0.0, 6000.0, &mut b);

        assert_eq!(first.len(), second.len());
        for (t1, t2) in first.iter().zip(&second) {
            assert_eq!(t1.x(), t2.x());
            assert_eq!(t1.stump.borrow().height(), t2.stump.borrow().height());
            assert_eq!(t1.canopy.len(), t2.canopy.len());
        }
    }

    #[test]
    fn test_threshold_one_roots_every_column() {
        let config = FloraConfig {
            tree_threshold: 1.0,
            ..FloraConfig::default()
        };
        let placer = FloraPlacer::new(flat(600.0), sink(), 30.0, 30, &config);
        let mut rng = Xoshiro256StarStar::seed_from_u64(1);

        // First column is the first grid multiple >= min_x
        let trees = placer.place_trees(10.0, 160.0, &mut rng);
        let xs: Vec<i32> = trees.iter().map(Tree::x).collect();
        assert_eq!(xs, vec![30, 60, 90, 120, 150]);
    }

    #[test]
    fn test_threshold_zero_never_roots() {
        let config = FloraConfig {
            tree_threshold: 0.0,
            ..FloraConfig::default()
        };
        let placer = FloraPlacer::new(flat(600.0), sink(), 30.0, 30, &config);
        let mut rng = Xoshiro256StarStar::seed_from_u64(1);
        assert!(placer.place_trees(0.0, 30_000.0, &mut rng).len() <= 1);
    }

    #[test]
    fn test_stump_height_range() {
        let config = FloraConfig {
            tree_threshold: 1.0,
            ..FloraConfig::default()
        };
        let placer = FloraPlacer::new(flat(600.0), sink(), 30.0, 30, &config);
        let mut rng = Xoshiro256StarStar::seed_from_u64(8);

        for tree in placer.place_trees(0.0, 3000.0, &mut rng) {
            let stump = tree.stump.borrow();
            assert!((120..=300).contains(&stump.height()));
            // Stump bottom rests on the root height
            assert_eq!(stump.position().y + stump.height(), 600);
        }
    }

    #[test]
    fn test_shallow_ground_caps_stump() {
        let config = FloraConfig {
            tree_threshold: 1.0,
            ..FloraConfig::default()
        };
        let placer = FloraPlacer::new(flat(100.0), sink(), 30.0, 30, &config);
        let mut rng = Xoshiro256StarStar::seed_from_u64(8);

        for tree in placer.place_trees(0.0, 300.0, &mut rng) {
            assert_eq!(tree.stump.borrow().height(), 50);
        }
    }

    #[test]
    fn test_canopy_within_square() {
        let config = FloraConfig {
            tree_threshold: 1.0,
            leaf_threshold: 1.0,
            fruit_threshold: 1.0,
            ..FloraConfig::default()
        };
        let placer = FloraPlacer::new(flat(600.0), sink(), 30.0, 30, &config);
        let mut rng = Xoshiro256StarStar::seed_from_u64(4);
        let trees = placer.place_trees(0.0, 30.0, &mut rng);
        assert_eq!(trees.len(), 1);

        let tree = &trees[0];
        // Every cell of the 7x7 grid holds both a leaf and a fruit
        assert_eq!(tree.leaves().count(), 49);
        assert_eq!(tree.fruits().count(), 49);
        assert_eq!(tree.jump_observers().len(), 1 + 98);

        let top = tree.stump.borrow().position().y;
        for leaf in tree.leaves() {
            let p = leaf.borrow().position();
            assert!((-90..=90).contains(&p.x));
            assert!(p.y >= top - 15 - 90 && p.y <= top - 15 + 90);
        }
    }

    #[test]
    fn test_fruit_uses_sink_and_cycle() {
        let total = Rc::new(Cell::new(0.0));
        let credited = total.clone();
        let sink: EnergySink = Rc::new(move |amount: f32| credited.set(credited.get() + amount));

        let config = FloraConfig {
            tree_threshold: 1.0,
            fruit_threshold: 1.0,
            ..FloraConfig::default()
        };
        let placer = FloraPlacer::new(flat(600.0), sink, 12.0, 30, &config);
        let mut rng = Xoshiro256StarStar::seed_from_u64(4);
        let trees = placer.place_trees(0.0, 30.0, &mut rng);

        let fruit = trees[0].fruits().next().cloned().expect("fruit");
        assert_eq!(fruit.borrow().regrowth_delay(), 12.0);

        let mut scheduler = crate::world::scheduler::TaskScheduler::new();
        fruit
            .borrow_mut()
            .on_collision_enter(crate::entity::ColliderTag::Avatar, &mut scheduler);
        assert_eq!(total.get(), 10.0);
    }

    #[test]
    #[should_panic(expected = "leaf_threshold")]
    fn test_rejects_bad_threshold() {
        let config = FloraConfig {
            leaf_threshold: 1.5,
            ..FloraConfig::default()
        };
        FloraPlacer::new(flat(600.0), sink(), 30.0, 30, &config);
    }
}
