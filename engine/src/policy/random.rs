// engine/src/policy/random.rs
#![forbid(unsafe_code)]

use rand::prelude::*;

use crate::engine::{cells_at, ghost_y, origin_x_range, Board, Pair, PairColors, Piece, PuyoBoard};

use super::base::{PairPolicy, Policy};
use super::heuristic::TetrisMove;
use super::pair_search::PairMove;

/// Uniform baseline over every legal hard-drop placement (both variants).
pub struct RandomPolicy {
    rng: StdRng,
}

impl RandomPolicy {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Policy for RandomPolicy {
    fn choose_move(&mut self, board: &Board, piece: &Piece) -> Option<TetrisMove> {
        let kind = piece.kind;
        let mut legal = Vec::new();
        for rot in 0..kind.num_rots() as u8 {
            for x in origin_x_range(kind, rot) {
                if !board.is_valid(&cells_at(kind, rot, x, 0)) {
                    continue;
                }
                let drop_y = ghost_y(board, &Piece::new(kind, rot, x, 0));
                legal.push(TetrisMove {
                    rotation: rot,
                    x,
                    drop_y,
                    score: 0.0,
                });
            }
        }
        legal.choose(&mut self.rng).copied()
    }
}

impl PairPolicy for RandomPolicy {
    fn choose_move(
        &mut self,
        board: &PuyoBoard,
        _pair: &Pair,
        _next: Option<&PairColors>,
    ) -> Option<PairMove> {
        let cols = board.cols() as i32;
        let mut legal = Vec::new();
        for rotation in 0..4u8 {
            let (dr, dc) = Pair::sub_offset(rotation);
            let fits = |row: i32, col: i32| {
                board.is_valid(row, col) && board.is_valid(row + dr, col + dc)
            };
            for col in 0..cols {
                let mut row = (-dr).max(0);
                if !fits(row, col) {
                    continue;
                }
                while fits(row + 1, col) {
                    row += 1;
                }
                legal.push(PairMove {
                    row,
                    col,
                    rotation,
                    score: 0.0,
                });
            }
        }
        legal.choose(&mut self.rng).copied()
    }
}
