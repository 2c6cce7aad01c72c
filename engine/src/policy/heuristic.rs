// engine/src/policy/heuristic.rs
#![forbid(unsafe_code)]

use rand::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::{check_finite, ConfigError};
use crate::engine::{
    cells_at, compute_grid_features, origin_x_range, Board, GridFeatures, Kind, Piece,
};
use crate::policy::base::Policy;

/// Scores within this distance of the best are treated as ties.
pub const TIE_EPS: f64 = 1e-4;

/// Linear weights over post-clear board features.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeuristicWeights {
    /// Aggregate column height.
    pub height: f64,
    /// Lines cleared by the placement.
    pub lines: f64,
    pub holes: f64,
    pub bumpiness: f64,
    pub max_height: f64,
    /// Per cleared line, for T placements the 3-corner rule accepts.
    pub tspin_bonus: f64,
}

impl Default for HeuristicWeights {
    fn default() -> Self {
        Self {
            height: -0.51,
            lines: 3.6,
            holes: -0.36,
            bumpiness: -0.18,
            max_height: -0.1,
            tspin_bonus: 2.0,
        }
    }
}

impl HeuristicWeights {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_finite("tetris.height", self.height)?;
        check_finite("tetris.lines", self.lines)?;
        check_finite("tetris.holes", self.holes)?;
        check_finite("tetris.bumpiness", self.bumpiness)?;
        check_finite("tetris.max_height", self.max_height)?;
        check_finite("tetris.tspin_bonus", self.tspin_bonus)
    }

    pub fn score_features(&self, f: &GridFeatures, lines: u32) -> f64 {
        self.height * f.agg_h as f64
            + self.lines * lines as f64
            + self.holes * f.holes as f64
            + self.bumpiness * f.bump as f64
            + self.max_height * f.max_h as f64
    }
}

/// Final placement chosen for a tetromino.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TetrisMove {
    pub rotation: u8,
    /// Shape origin column.
    pub x: i32,
    /// Shape origin row after the hard drop.
    pub drop_y: i32,
    pub score: f64,
}

/// One-piece exhaustive search over every rotation/column hard drop.
///
/// Ties are broken uniformly with a seeded RNG, so a fixed seed replays the same choices.
pub struct HeuristicPolicy {
    weights: HeuristicWeights,
    rng: StdRng,
}

impl HeuristicPolicy {
    pub fn new(weights: HeuristicWeights, seed: u64) -> Result<Self, ConfigError> {
        weights.validate()?;
        Ok(Self {
            weights,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    /// Tuned default weights.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            weights: HeuristicWeights::default(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn weights(&self) -> &HeuristicWeights {
        &self.weights
    }

    /// Scores one placement on a copy of `board`. None if the piece does not fit at `y = 0`.
    pub fn evaluate_placement(
        &self,
        board: &Board,
        kind: Kind,
        rot: u8,
        x: i32,
    ) -> Option<TetrisMove> {
        if !board.is_valid(&cells_at(kind, rot, x, 0)) {
            return None;
        }

        let mut drop_y = 0;
        while board.is_valid(&cells_at(kind, rot, x, drop_y + 1)) {
            drop_y += 1;
        }

        let mut sim = board.clone();
        sim.place(&cells_at(kind, rot, x, drop_y), kind.idx());
        let lines = sim.clear_lines().count;

        let features = compute_grid_features(sim.grid());
        let mut score = self.weights.score_features(&features, lines);

        // T-spin credit is judged on the board before the piece lands.
        if kind == Kind::T && lines > 0 && board.check_tspin(&Piece::new(kind, rot, x, drop_y)) {
            score += self.weights.tspin_bonus * lines as f64;
        }

        trace!(?kind, rot, x, drop_y, lines, score, "candidate");
        Some(TetrisMove {
            rotation: rot,
            x,
            drop_y,
            score,
        })
    }

    /// Best hard-drop placement for `piece` on `board`, or None if nothing fits.
    /// Only `piece.kind` matters; the board is not modified.
    pub fn find_best_move(&mut self, board: &Board, piece: &Piece) -> Option<TetrisMove> {
        let kind = piece.kind;
        let mut best_score = f64::NEG_INFINITY;
        let mut best: Vec<TetrisMove> = Vec::new();
        let mut evaluated = 0usize;

        for rot in 0..kind.num_rots() as u8 {
            for x in origin_x_range(kind, rot) {
                let Some(m) = self.evaluate_placement(board, kind, rot, x) else {
                    continue;
                };
                evaluated += 1;

                if m.score > best_score + TIE_EPS {
                    best_score = m.score;
                    best.clear();
                    best.push(m);
                } else if (m.score - best_score).abs() <= TIE_EPS {
                    best.push(m);
                }
            }
        }

        let chosen = best.choose(&mut self.rng).copied();
        debug!(
            ?kind,
            evaluated,
            ties = best.len(),
            best_score,
            "tetris search done"
        );
        chosen
    }
}

impl Policy for HeuristicPolicy {
    fn choose_move(&mut self, board: &Board, piece: &Piece) -> Option<TetrisMove> {
        self.find_best_move(board, piece)
    }
}
