// engine/benches/engine_core_bench.rs
#![forbid(unsafe_code)]

/**
 * Core engine micro-benchmarks.
 *
 * Focus:
 * - Board simulation (`Board::place` + `clear_lines`, `PuyoBoard::resolve_chains`)
 * - Search decision latency on fixed, non-trivial board states
 */
use chetris_engine::engine::{
    Action, Board, Kind, Pair, PairColors, Piece, PuyoBoard, PuyoGame, TetrisGame, COLS, ROWS,
};
use chetris_engine::policy::{
    build_move_queue, build_pair_move_queue, HeuristicPolicy, PairSearch,
};
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};

fn build_nontrivial_tetris(seed: u64) -> TetrisGame {
    let mut g = TetrisGame::new(seed);
    let mut ai = HeuristicPolicy::with_seed(seed);
    for _ in 0usize..24 {
        let Some(&piece) = g.current() else { break };
        let queue = match ai.find_best_move(g.board(), &piece) {
            Some(m) => build_move_queue(&piece, &m),
            None => vec![Action::Drop],
        };
        for a in queue {
            if g.apply(a).is_some() {
                break;
            }
        }
    }
    g
}

fn build_nontrivial_puyo(seed: u64) -> PuyoGame {
    let mut g = PuyoGame::new(seed);
    let mut ai = PairSearch::with_seed(seed);
    for _ in 0usize..12 {
        let Some(&pair) = g.current() else { break };
        let next = g.next();
        let queue = match ai.find_best_move(g.board(), &pair, Some(&next)) {
            Some(m) => build_pair_move_queue(&pair, &m),
            None => vec![Action::Drop],
        };
        for a in queue {
            if g.apply(a).is_some() {
                break;
            }
        }
    }
    g
}

fn bench_board_simulation(c: &mut Criterion) {
    c.bench_function("engine.board.place_and_clear", |b| {
        b.iter_batched(
            || {
                let mut board = Board::new();
                for r in (ROWS - 4)..ROWS {
                    for col in 0..(COLS - 1) {
                        board.set(r, col, 1);
                    }
                }
                board
            },
            |mut board| {
                let cells = Piece::new(Kind::I, 1, 7, 16).cells();
                board.place(&cells, 1);
                black_box(board.clear_lines());
            },
            BatchSize::SmallInput,
        );
    });

    c.bench_function("engine.puyo.resolve_chains", |b| {
        b.iter_batched(
            || {
                let mut board = PuyoBoard::new();
                for (r, col, color) in [
                    (12, 0, 2),
                    (11, 0, 2),
                    (10, 0, 2),
                    (9, 0, 1),
                    (8, 0, 1),
                    (7, 0, 1),
                    (6, 0, 1),
                    (5, 0, 2),
                ] {
                    board.place(r, col, color);
                }
                board
            },
            |mut board| {
                black_box(board.resolve_chains());
            },
            BatchSize::SmallInput,
        );
    });
}

fn bench_search(c: &mut Criterion) {
    c.bench_function("policy.heuristic.find_best_move", |b| {
        b.iter_batched(
            || (build_nontrivial_tetris(1234), HeuristicPolicy::with_seed(1234)),
            |(g, mut p)| {
                if let Some(piece) = g.current() {
                    black_box(p.find_best_move(g.board(), piece));
                }
            },
            BatchSize::SmallInput,
        );
    });

    c.bench_function("policy.pair_search.find_best_move", |b| {
        b.iter_batched(
            || (build_nontrivial_puyo(5678), PairSearch::with_seed(5678)),
            |(g, mut p)| {
                let pair = g
                    .current()
                    .copied()
                    .unwrap_or_else(|| Pair::new(1, 2, 0, PairColors::new(1, 2)));
                let next = g.next();
                black_box(p.find_best_move(g.board(), &pair, Some(&next)));
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(engine_core_benches, bench_board_simulation, bench_search);
criterion_main!(engine_core_benches);
