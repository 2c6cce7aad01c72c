// engine/src/policy/move_queue.rs
#![forbid(unsafe_code)]

use crate::engine::{Action, Pair, Piece, PUYO_ROWS, ROWS};

use super::heuristic::TetrisMove;
use super::pair_search::PairMove;

/// Position a queue starts from or aims for. `row` is only used by `VerticalSteps::FromRows`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct QueuePlacement {
    pub rotation: u8,
    pub column: i32,
    pub row: Option<i32>,
}

impl From<&Piece> for QueuePlacement {
    fn from(p: &Piece) -> Self {
        Self {
            rotation: p.rotation,
            column: p.x,
            row: Some(p.y),
        }
    }
}

impl From<&TetrisMove> for QueuePlacement {
    fn from(m: &TetrisMove) -> Self {
        Self {
            rotation: m.rotation,
            column: m.x,
            row: Some(m.drop_y),
        }
    }
}

impl From<&Pair> for QueuePlacement {
    fn from(p: &Pair) -> Self {
        Self {
            rotation: p.rotation,
            column: p.col,
            row: Some(p.row),
        }
    }
}

impl From<&PairMove> for QueuePlacement {
    fn from(m: &PairMove) -> Self {
        Self {
            rotation: m.rotation,
            column: m.col,
            row: Some(m.row),
        }
    }
}

/// How many trailing `Down` steps to emit.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum VerticalSteps {
    /// Always exactly `n` downs (extra downs are harmless: a blocked down locks).
    Fixed(usize),
    /// `max(1, target - current + 1)` if both rows are known,
    /// `max(1, target + 1)` if only the target row is, `fallback` otherwise.
    FromRows { fallback: usize },
}

/// Rotation first (one CCW when the clockwise distance is 3, else that many CW),
/// then `|dx|` horizontal steps, then the vertical steps.
pub fn build_queue(
    current: QueuePlacement,
    target: QueuePlacement,
    vertical: VerticalSteps,
) -> Vec<Action> {
    let mut q = Vec::new();

    let cw = (target.rotation as i32 - current.rotation as i32).rem_euclid(4);
    if cw == 3 {
        q.push(Action::RotateCcw);
    } else {
        q.extend(std::iter::repeat(Action::RotateCw).take(cw as usize));
    }

    let dx = target.column - current.column;
    let step = if dx < 0 { Action::Left } else { Action::Right };
    q.extend(std::iter::repeat(step).take(dx.unsigned_abs() as usize));

    let downs = match vertical {
        VerticalSteps::Fixed(n) => n,
        VerticalSteps::FromRows { fallback } => match (current.row, target.row) {
            (Some(cur), Some(tgt)) => (tgt - cur + 1).max(1) as usize,
            (None, Some(tgt)) => (tgt + 1).max(1) as usize,
            _ => fallback,
        },
    };
    q.extend(std::iter::repeat(Action::Down).take(downs));

    q
}

/// Tetris queue: always `ROWS` downs, so the piece reaches its landing row and locks.
pub fn build_move_queue(current: &Piece, target: &TetrisMove) -> Vec<Action> {
    build_queue(current.into(), target.into(), VerticalSteps::Fixed(ROWS))
}

/// Puyo queue: downs derived from the current and target main-cell rows.
pub fn build_pair_move_queue(current: &Pair, target: &PairMove) -> Vec<Action> {
    build_queue(
        current.into(),
        target.into(),
        VerticalSteps::FromRows {
            fallback: PUYO_ROWS,
        },
    )
}
