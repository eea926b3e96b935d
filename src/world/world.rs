//! World - owns the terrain, trees, avatar and clocks, and steps them per frame

use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;
use std::rc::Rc;

use glam::{IVec2, Vec2};

use super::block::GroundUnit;
use super::daynight::DayNightCycle;
use super::flora::{FloraPlacer, FruitState, Leaf, Tree};
use super::physics::{Bounds, GroundPhysics};
use super::rng_trait::WorldRng;
use super::scheduler::TaskScheduler;
use super::terrain::HeightMap;
use crate::config::GameConfig;
use crate::entity::{Avatar, AvatarInput, EntityId};

type HeightFn = Box<dyn Fn(f32) -> f32>;

/// What happened during one [`World::tick`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub jumped: bool,
    pub fruit_eaten: u32,
    pub timers_fired: usize,
    pub grounded: bool,
}

/// Point-in-time summary of the world
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldStats {
    pub time: f64,
    pub trees: usize,
    pub leaves: usize,
    pub fruit_available: usize,
    pub fruit_consumed: usize,
    pub ground_units: usize,
    pub energy: f32,
    pub jumps: u64,
    pub phase: f32,
}

impl fmt::Display for WorldStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "t={:.2}s trees={} leaves={} fruit={}/{} ground={} energy={:.1} jumps={} phase={:.2}",
            self.time,
            self.trees,
            self.leaves,
            self.fruit_available,
            self.fruit_available + self.fruit_consumed,
            self.ground_units,
            self.energy,
            self.jumps,
            self.phase
        )
    }
}

/// The side-scrolling world
pub struct World {
    config: GameConfig,
    terrain: Rc<HeightMap>,
    placer: FloraPlacer<HeightFn>,
    physics: GroundPhysics,

    /// Ground units keyed by grid position, so overlapping ranges stay unique
    ground: HashMap<IVec2, GroundUnit>,
    trees: Vec<Tree>,
    avatar: Avatar,

    scheduler: TaskScheduler,
    cycle: DayNightCycle,

    /// Fruit currently overlapping the avatar
    touching: HashSet<EntityId>,

    /// Grid-snapped x of every generated column
    columns: BTreeSet<i32>,
}

impl World {
    /// Build the initial world for `[start_x, window_width)`.
    ///
    /// Panics if `config` fails validation.
    pub fn build<R: WorldRng + ?Sized>(config: GameConfig, rng: &mut R) -> Self {
        if let Err(err) = config.validate() {
            panic!("invalid world configuration: {err}");
        }

        let world_config = &config.world;
        let unit = world_config.unit_size;
        let terrain = Rc::new(HeightMap::new(
            world_config.seed,
            world_config.window_height,
            unit,
            &config.terrain,
        ));
        let physics = GroundPhysics::new(config.player.gravity, unit as f32);

        let spawn_x = world_config.start_x + world_config.window_width / 2.0;
        let spawn_support = physics.support_height(&terrain, spawn_x, config.player.width);
        let avatar = Avatar::new(
            Vec2::new(spawn_x, spawn_support - config.player.height),
            &config.player,
        );

        let height_at: HeightFn = {
            let terrain = Rc::clone(&terrain);
            Box::new(move |x| terrain.height_at(x))
        };
        let placer = FloraPlacer::new(
            height_at,
            avatar.energy_sink(),
            world_config.cycle_length,
            unit,
            &config.flora,
        );
        let cycle = DayNightCycle::new(world_config.cycle_length);

        let (min_x, max_x) = (world_config.start_x, world_config.window_width);

        let mut world = World {
            config,
            terrain,
            placer,
            physics,
            ground: HashMap::new(),
            trees: Vec::new(),
            avatar,
            scheduler: TaskScheduler::new(),
            cycle,
            touching: HashSet::new(),
            columns: BTreeSet::new(),
        };
        world.extend(min_x, max_x, rng);
        world.settle_avatar();

        log::info!("Built world: {}", world.stats());
        world
    }

    /// Drop the avatar onto the highest surface under it, stumps included
    fn settle_avatar(&mut self) {
        let solids = self.solids();
        let position = self.avatar.position();
        let size = self.avatar.size();
        let support = self.physics.surface_height(
            &self.terrain,
            &solids,
            position.x,
            size.x,
            f32::NEG_INFINITY,
        );
        self.avatar.set_position(Vec2::new(position.x, support - size.y));
    }

    /// Bounds of every solid obstacle (the tree stumps)
    pub fn solids(&self) -> Vec<Bounds> {
        self.trees
            .iter()
            .map(|tree| tree.stump.borrow().bounds())
            .collect()
    }

    /// Generate ground and trees for `[min_x, max_x)`.
    ///
    /// Only columns that are not already generated get new trees, so calling
    /// this again for an overlapping range is safe.
    pub fn extend<R: WorldRng + ?Sized>(&mut self, min_x: f32, max_x: f32, rng: &mut R) {
        let unit = self.terrain.unit_size();
        let start = self.terrain.snap_down(min_x);
        let end = self.terrain.snap_down(max_x);

        // Contiguous runs of missing columns
        let mut runs: Vec<(i32, i32)> = Vec::new();
        let mut x = start;
        while x < end {
            if !self.columns.contains(&x) {
                match runs.last_mut() {
                    Some((_, run_end)) if *run_end == x => *run_end = x + unit,
                    _ => runs.push((x, x + unit)),
                }
            }
            x += unit;
        }

        for (from, to) in runs {
            self.generate(from as f32, to as f32, rng);
            self.columns.extend((from..to).step_by(unit as usize));
        }
    }

    fn generate<R: WorldRng + ?Sized>(&mut self, min_x: f32, max_x: f32, rng: &mut R) {
        for unit in self.terrain.generate_columns(min_x, max_x) {
            self.ground.insert(unit.position(), unit);
        }

        let trees = self.placer.place_trees(min_x, max_x, rng);
        for tree in &trees {
            for observer in tree.jump_observers() {
                self.avatar.add_jump_observer(observer);
            }
            for leaf in tree.leaves() {
                Leaf::schedule_ambient(leaf, &mut self.scheduler);
            }
        }

        log::debug!(
            "generated [{}, {}): {} trees, {} ground units total",
            min_x,
            max_x,
            trees.len(),
            self.ground.len()
        );
        self.trees.extend(trees);
    }

    /// Drop every ground unit and tree whose column lies in `[min_x, max_x)`.
    ///
    /// Pending timers of dropped objects become no-ops.
    pub fn discard_range(&mut self, min_x: f32, max_x: f32) {
        let start = self.terrain.snap_down(min_x);
        let end = self.terrain.snap_down(max_x);
        let in_range = |x: i32| x >= start && x < end;

        let ground_before = self.ground.len();
        self.ground.retain(|position, _| !in_range(position.x));

        let trees_before = self.trees.len();
        let touching = &mut self.touching;
        self.trees.retain(|tree| {
            let keep = !in_range(tree.x());
            if !keep {
                for fruit in tree.fruits() {
                    touching.remove(&fruit.borrow().id);
                }
            }
            keep
        });

        self.columns.retain(|&x| !in_range(x));

        log::debug!(
            "discarded [{}, {}): {} ground units, {} trees",
            min_x,
            max_x,
            ground_before - self.ground.len(),
            trees_before - self.trees.len()
        );
    }

    /// Advance the world by `dt` seconds with this frame's input.
    ///
    /// Order: clock and due timers, avatar intent (including the jump
    /// broadcast), physics, fruit collisions, leaf transitions, day-night.
    pub fn tick(&mut self, dt: f32, input: &AvatarInput) -> TickReport {
        let timers_fired = self.scheduler.advance(dt);
        let jumped = self.avatar.update(input);
        let solids = self.solids();
        let grounded = self
            .physics
            .integrate(&mut self.avatar, &self.terrain, &solids, dt);
        let fruit_eaten = self.resolve_fruit_collisions();

        for tree in &self.trees {
            for leaf in tree.leaves() {
                leaf.borrow_mut().update(dt);
            }
        }
        self.cycle.advance(dt);

        TickReport {
            jumped,
            fruit_eaten,
            timers_fired,
            grounded,
        }
    }

    /// Fire collision-enter for fruit the avatar started overlapping this tick
    fn resolve_fruit_collisions(&mut self) -> u32 {
        let (avatar_min, avatar_max) = self.avatar.bounds();
        let tag = self.avatar.tag();
        let mut eaten = 0;

        for tree in &self.trees {
            for fruit in tree.fruits() {
                let mut fruit = fruit.borrow_mut();
                let (min, max) = fruit.bounds();
                let overlapping = avatar_min.x < max.x
                    && min.x < avatar_max.x
                    && avatar_min.y < max.y
                    && min.y < avatar_max.y;

                if !overlapping {
                    self.touching.remove(&fruit.id);
                } else if self.touching.insert(fruit.id)
                    && fruit.on_collision_enter(tag, &mut self.scheduler)
                {
                    eaten += 1;
                }
            }
        }
        eaten
    }

    pub fn stats(&self) -> WorldStats {
        let mut stats = WorldStats {
            time: self.scheduler.now(),
            trees: self.trees.len(),
            leaves: 0,
            fruit_available: 0,
            fruit_consumed: 0,
            ground_units: self.ground.len(),
            energy: self.avatar.energy(),
            jumps: self.avatar.jumps(),
            phase: self.cycle.phase(),
        };
        for tree in &self.trees {
            stats.leaves += tree.leaves().count();
            for fruit in tree.fruits() {
                match fruit.borrow().state() {
                    FruitState::Available => stats.fruit_available += 1,
                    FruitState::Consumed => stats.fruit_consumed += 1,
                }
            }
        }
        stats
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn terrain(&self) -> &Rc<HeightMap> {
        &self.terrain
    }

    pub fn avatar(&self) -> &Avatar {
        &self.avatar
    }

    pub fn avatar_mut(&mut self) -> &mut Avatar {
        &mut self.avatar
    }

    pub fn trees(&self) -> &[Tree] {
        &self.trees
    }

    pub fn ground_units(&self) -> impl Iterator<Item = &GroundUnit> {
        self.ground.values()
    }

    pub fn ground_unit_at(&self, position: IVec2) -> Option<&GroundUnit> {
        self.ground.get(&position)
    }

    pub fn cycle(&self) -> &DayNightCycle {
        &self.cycle
    }

    pub fn scheduler(&self) -> &TaskScheduler {
        &self.scheduler
    }

    pub fn physics(&self) -> &GroundPhysics {
        &self.physics
    }

    /// Elapsed world time in seconds
    pub fn time(&self) -> f64 {
        self.scheduler.now()
    }

    /// Grid-snapped `[min, max)` hull of the generated columns
    pub fn extent(&self) -> Option<(i32, i32)> {
        let first = self.columns.first()?;
        let last = self.columns.last()?;
        Some((*first, last + self.terrain.unit_size()))
    }

    pub fn is_generated(&self, x: f32) -> bool {
        self.columns.contains(&self.terrain.snap_down(x))
    }
}

impl fmt::Debug for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("World")
            .field("stats", &self.stats())
            .field("extent", &self.extent())
            .field("avatar", &self.avatar)
            .finish()
    }
}
