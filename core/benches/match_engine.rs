use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use tilematch_core::*;

/// 12x8 board with a three-level pyramid in the middle, 144 tiles.
fn pyramid() -> LevelLayout {
    let mut cells = Vec::new();
    for column in 0..12u8 {
        for row in 0..8u8 {
            let height = match (column, row) {
                (4..=7, 2..=5) => 3,
                (2..=9, 1..=6) => 2,
                _ => 1,
            };
            cells.push((column, row, height));
        }
    }
    // trim to a full tile set
    let mut layout = LevelLayout {
        name: "pyramid".into(),
        kind: GridKind::Stacked,
        columns: 12,
        rows: 8,
        cells,
        faces: None,
    };
    while layout.tile_count() > 144 {
        layout.cells.pop();
    }
    if layout.tile_count() % 2 != 0 {
        layout.cells.pop();
    }
    layout
}

fn engine(seed: u64) -> MatchEngine {
    MatchEngine::deal(
        &pyramid(),
        RandomDealer::new(seed),
        &TileSet::mahjong(),
        TileSet::mahjong_rule(),
    )
    .expect("pyramid is a valid layout")
}

fn bench_exposed(c: &mut Criterion) {
    let engine = engine(1);
    c.bench_function("exposed_tiles", |b| {
        b.iter(|| black_box(engine.grid().exposed_tiles()))
    });
}

fn bench_available_matches(c: &mut Criterion) {
    let engine = engine(1);
    c.bench_function("available_matches", |b| {
        b.iter(|| black_box(engine.grid().available_matches()))
    });
}

fn bench_play_out(c: &mut Criterion) {
    c.bench_function("greedy_play_out", |b| {
        b.iter(|| {
            let mut engine = engine(black_box(3));
            while let Some(&(a, b)) = engine.grid().available_matches().first() {
                engine.select(a).unwrap();
                engine.select(b).unwrap();
                if engine.is_finished() {
                    break;
                }
            }
            black_box(engine.remaining())
        })
    });
}

criterion_group!(
    benches,
    bench_exposed,
    bench_available_matches,
    bench_play_out
);
criterion_main!(benches);
