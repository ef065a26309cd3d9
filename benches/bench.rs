use criterion::{criterion_group, criterion_main, Bencher, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};
use rb_order_map::OrderedMap;
use std::hint::black_box;

struct KeyGenerator {
    rng: StdRng,
    limit: u32,
}
impl KeyGenerator {
    fn new() -> Self {
        const LIMIT: u32 = 1_000_000;
        Self {
            rng: StdRng::from_seed([0; 32]),
            limit: LIMIT,
        }
    }

    fn next(&mut self) -> u32 {
        self.rng.gen_range(0..self.limit)
    }
}

// insert helper fn
fn ordered_map_insert(count: usize, bench: &mut Bencher) {
    let mut gen = KeyGenerator::new();
    let keys: Vec<_> = std::iter::repeat_with(|| gen.next()).take(count).collect();
    bench.iter(|| {
        let mut map = OrderedMap::new();
        for k in keys.iter().copied() {
            black_box(map.insert(k, ()));
        }
    });
}

// insert and remove helper fn
fn ordered_map_insert_remove(count: usize, bench: &mut Bencher) {
    let mut gen = KeyGenerator::new();
    let keys: Vec<_> = std::iter::repeat_with(|| gen.next()).take(count).collect();
    bench.iter(|| {
        let mut map = OrderedMap::new();
        for k in keys.iter().copied() {
            black_box(map.insert(k, ()));
        }
        for k in &keys {
            black_box(map.remove(k));
        }
    });
}

// seek helper fn
fn ordered_map_find_ge(count: usize, bench: &mut Bencher) {
    let mut gen = KeyGenerator::new();
    let keys: Vec<_> = std::iter::repeat_with(|| gen.next()).take(count).collect();
    let mut map = OrderedMap::new();
    for k in keys.iter().copied() {
        map.insert(k, ());
    }
    bench.iter(|| {
        for k in &keys {
            black_box(map.find_ge(k));
        }
    });
}

// full cursor scan helper fn
fn ordered_map_cursor_scan(count: usize, bench: &mut Bencher) {
    let mut gen = KeyGenerator::new();
    let mut map = OrderedMap::new();
    for _ in 0..count {
        map.insert(gen.next(), ());
    }
    bench.iter(|| {
        let mut cursor = map.min();
        while !cursor.is_limit() {
            black_box(cursor.key());
            cursor = cursor.next();
        }
    });
}

fn bench_ordered_map_insert(c: &mut Criterion) {
    c.bench_function("bench_ordered_map_insert_100", |b| {
        ordered_map_insert(100, b)
    });
    c.bench_function("bench_ordered_map_insert_1000", |b| {
        ordered_map_insert(1000, b)
    });
    c.bench_function("bench_ordered_map_insert_10,000", |b| {
        ordered_map_insert(10_000, b)
    });
    c.bench_function("bench_ordered_map_insert_100,000", |b| {
        ordered_map_insert(100_000, b)
    });
}

fn bench_ordered_map_insert_remove(c: &mut Criterion) {
    c.bench_function("bench_ordered_map_insert_remove_100", |b| {
        ordered_map_insert_remove(100, b)
    });
    c.bench_function("bench_ordered_map_insert_remove_1000", |b| {
        ordered_map_insert_remove(1000, b)
    });
    c.bench_function("bench_ordered_map_insert_remove_10,000", |b| {
        ordered_map_insert_remove(10_000, b)
    });
    c.bench_function("bench_ordered_map_insert_remove_100,000", |b| {
        ordered_map_insert_remove(100_000, b)
    });
}

fn bench_ordered_map_find_ge(c: &mut Criterion) {
    c.bench_function("bench_ordered_map_find_ge_100", |b| {
        ordered_map_find_ge(100, b)
    });
    c.bench_function("bench_ordered_map_find_ge_1000", |b| {
        ordered_map_find_ge(1000, b)
    });
}

fn bench_ordered_map_cursor_scan(c: &mut Criterion) {
    c.bench_function("bench_ordered_map_cursor_scan_100", |b| {
        ordered_map_cursor_scan(100, b)
    });
    c.bench_function("bench_ordered_map_cursor_scan_1000", |b| {
        ordered_map_cursor_scan(1000, b)
    });
}

fn criterion_config() -> Criterion {
    Criterion::default().configure_from_args().without_plots()
}

criterion_group! {
    name = benches_basic_op;
    config = criterion_config();
    targets = bench_ordered_map_insert, bench_ordered_map_insert_remove,
}

criterion_group! {
    name = benches_cursor;
    config = criterion_config();
    targets = bench_ordered_map_find_ge, bench_ordered_map_cursor_scan
}

criterion_main!(benches_basic_op, benches_cursor);
