use criterion::{Bencher, Criterion, black_box};
use rand::Rng;
use skiparena::{NodeId, SkipArena};

fn filled(size: usize) -> (SkipArena<u32>, NodeId) {
    let mut arena = SkipArena::with_capacity(0.5, 16, size + 1).expect("valid parameters");
    let head = arena.new_head();
    let mut rng = rand::rng();
    for _ in 0..size {
        let node = arena.new_node(rng.random());
        arena.insert(node, head).expect("fresh node");
    }
    (arena, head)
}

fn bench_insert(b: &mut Bencher, base: usize, inserts: usize) {
    let (mut arena, head) = filled(base);
    let mut rng = rand::rng();

    b.iter(|| {
        for _ in 0..inserts {
            let node = arena.new_node(rng.random());
            arena.insert(node, head).expect("fresh node");
        }
    });
}

fn bench_search(b: &mut Bencher, size: usize) {
    let (arena, head) = filled(size);
    let mut rng = rand::rng();

    b.iter(|| {
        let found = arena.search(head, &rng.random());
        black_box(arena.key(found));
    });
}

fn bench_insert_erase(b: &mut Bencher, size: usize) {
    let (mut arena, head) = filled(size);
    let mut rng = rand::rng();

    b.iter(|| {
        let node = arena.new_node(rng.random());
        arena.insert(node, head).expect("fresh node");
        arena.erase(node, head).expect("node was just linked");
    });
}

fn bench_iter(b: &mut Bencher, size: usize) {
    let (arena, head) = filled(size);

    b.iter(|| {
        for key in arena.iter(head) {
            black_box(key);
        }
    });
}

pub fn benchmark(c: &mut Criterion) {
    c.bench_function("SkipArena insert 1000 (empty)", |b| {
        bench_insert(b, 0, 1_000);
    });
    c.bench_function("SkipArena insert 1000 (filled)", |b| {
        bench_insert(b, 100_000, 1_000);
    });

    c.bench_function("SkipArena search 1000", |b| {
        bench_search(b, 1_000);
    });
    c.bench_function("SkipArena search 100000", |b| {
        bench_search(b, 100_000);
    });

    c.bench_function("SkipArena insert+erase 1000", |b| {
        bench_insert_erase(b, 1_000);
    });
    c.bench_function("SkipArena insert+erase 100000", |b| {
        bench_insert_erase(b, 100_000);
    });

    c.bench_function("SkipArena iter 10000", |b| {
        bench_iter(b, 10_000);
    });
}
