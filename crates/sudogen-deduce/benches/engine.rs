//! Benchmarks for stage closures and grounding.
//!
//! # Running
//!
//! ```sh
//! cargo bench --bench engine
//! ```

use std::hint;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use sudogen_core::{Clues, Grid};
use sudogen_deduce::{DerivationEngine, FactStore, PuzzleView, Stage, rule};

const PUZZLES_9X9: [(&str, &str); 2] = [
    (
        "easy",
        "53..7.... 6..195... .98....6. 8...6...3 4..8.3..1 7...2...6 .6....28. ...419..5 ....8..79",
    ),
    (
        "empty",
        "......... ......... ......... ......... ......... ......... ......... ......... .........",
    ),
];

fn bench_close(c: &mut Criterion) {
    let grid = Grid::regular(9).unwrap();
    let stages = [
        ("singles", Stage::new("singles", rule::singles_rules()).unwrap()),
        ("all", Stage::new("all", rule::all_rules()).unwrap()),
    ];

    for (stage_name, stage) in &stages {
        for (puzzle_name, puzzle) in PUZZLES_9X9 {
            let clues: Clues = puzzle.parse().unwrap();
            c.bench_with_input(
                BenchmarkId::new(format!("close_{stage_name}"), puzzle_name),
                &clues,
                |b, clues| {
                    let engine = DerivationEngine::new(&grid);
                    let view = PuzzleView::new(clues);
                    b.iter(|| {
                        let report = engine
                            .close(stage, &view, &FactStore::new(9))
                            .unwrap();
                        hint::black_box(report)
                    });
                },
            );
        }
    }
}

fn bench_ground(c: &mut Criterion) {
    let grids = [
        ("4x4", Grid::regular(4).unwrap()),
        ("6x6", Grid::with_blocks(3, 2).unwrap()),
        ("9x9", Grid::regular(9).unwrap()),
    ];
    let stage = Stage::new("singles", rule::singles_rules()).unwrap();

    for (name, grid) in &grids {
        c.bench_with_input(BenchmarkId::new("ground_singles", name), grid, |b, grid| {
            let scope = stage.scope(grid);
            b.iter(|| hint::black_box(stage.ground(&scope)));
        });
    }
}

criterion_group!(benches, bench_close, bench_ground);
criterion_main!(benches);
