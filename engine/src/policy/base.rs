// engine/src/policy/base.rs
#![forbid(unsafe_code)]

use crate::engine::{Board, Pair, PairColors, Piece, PuyoBoard};

use super::heuristic::TetrisMove;
use super::pair_search::PairMove;

/// Chooses a final placement for the active tetromino.
///
/// Returns `None` if no placement fits. Object-safe so the runner can hold `Box<dyn Policy>`.
pub trait Policy {
    fn choose_move(&mut self, board: &Board, piece: &Piece) -> Option<TetrisMove>;
}

/// Chooses a final placement for the falling pair, optionally knowing the next pair's colors.
pub trait PairPolicy {
    fn choose_move(
        &mut self,
        board: &PuyoBoard,
        pair: &Pair,
        next: Option<&PairColors>,
    ) -> Option<PairMove>;
}
