use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use mazes::{
    generators,
    maze::Maze,
    units::{ColumnsCount, RowsCount},
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn blank_maze(rows: usize, columns: usize) -> Maze {
    Maze::new(RowsCount(rows), ColumnsCount(columns)).unwrap()
}

fn bench_binary_maze_32(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(32);
    c.bench_function("binary_maze_32", move |b| {
        b.iter_batched(|| blank_maze(32, 32),
                       |mut m| generators::binary_tree(&mut m, &mut rng),
                       BatchSize::SmallInput)
    });
}

fn bench_binary_maze_350(c: &mut Criterion) {
    c.bench_function("binary_maze_350", |b| {
        b.iter_batched(|| blank_maze(350, 350),
                       |mut m| generators::binary_tree_seeded(&mut m, 350),
                       BatchSize::LargeInput)
    });
}

criterion_group!(benches, bench_binary_maze_32, bench_binary_maze_350);
criterion_main!(benches);
