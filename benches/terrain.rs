//! Criterion benchmarks for terrain and flora generation.
//!
//! Run with: cargo bench --bench terrain

use std::hint::black_box;
use std::rc::Rc;

use criterion::{criterion_group, criterion_main, Criterion};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;

use hillside::config::{FloraConfig, TerrainConfig};
use hillside::entity::EnergySink;
use hillside::world::{FloraPlacer, HeightMap, NoiseField, BLOCK_SIZE};

fn bench_noise(c: &mut Criterion) {
    let mut group = c.benchmark_group("noise_field");
    let field = NoiseField::new(42, 100.0);

    group.bench_function("single_sample", |b| {
        b.iter(|| black_box(field.noise(black_box(1234.5), black_box(210.0))));
    });

    group.finish();
}

fn bench_generate_columns(c: &mut Criterion) {
    let mut group = c.benchmark_group("height_map");
    let map = HeightMap::new(42, 720.0, BLOCK_SIZE, &TerrainConfig::default());

    // One 1280px window: 42 columns x 20 units
    group.bench_function("generate_columns_window", |b| {
        b.iter(|| black_box(map.generate_columns(black_box(0.0), black_box(1280.0))));
    });

    group.finish();
}

fn bench_place_trees(c: &mut Criterion) {
    let mut group = c.benchmark_group("flora");
    let map = Rc::new(HeightMap::new(42, 720.0, BLOCK_SIZE, &TerrainConfig::default()));
    let sink: EnergySink = Rc::new(|_: f32| {});
    let height_map = map.clone();
    let placer = FloraPlacer::new(
        move |x| height_map.height_at(x),
        sink,
        30.0,
        BLOCK_SIZE,
        &FloraConfig::default(),
    );

    group.bench_function("place_trees_window", |b| {
        let mut rng = Xoshiro256StarStar::seed_from_u64(7);
        b.iter(|| black_box(placer.place_trees(0.0, 1280.0, &mut rng)));
    });

    group.finish();
}

criterion_group!(benches, bench_noise, bench_generate_columns, bench_place_trees);
criterion_main!(benches);
