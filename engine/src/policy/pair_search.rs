// engine/src/policy/pair_search.rs
#![forbid(unsafe_code)]

use rand::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::{check_finite, ConfigError};
use crate::engine::{ChainLink, Pair, PairColors, PuyoBoard, DEATH_COL, DEATH_ROW};
use crate::policy::base::PairPolicy;
use crate::policy::beam::{sort_desc_stable, BeamConfig};

/// Scores within this distance of the best are treated as ties.
pub const PAIR_TIE_EPS: f64 = 1e-6;

/// Blend of first-ply and best second-ply score for expanded candidates.
const FIRST_PLY_SHARE: f64 = 0.4;
const SECOND_PLY_SHARE: f64 = 0.6;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PairWeights {
    pub chain_potential: f64,
    pub height: f64,
    pub flatness: f64,
    pub color_grouping: f64,
    pub dead_zone: f64,
    pub edge_penalty: f64,
    /// Multiplies `links^2` of the placement's own chain.
    pub chain_count_sq: f64,
    /// Multiplies the placement's own chain score.
    pub chain_score: f64,
}

impl Default for PairWeights {
    fn default() -> Self {
        Self {
            chain_potential: 4.0,
            height: -0.8,
            flatness: 0.3,
            color_grouping: 2.5,
            dead_zone: -12.0,
            edge_penalty: -0.5,
            chain_count_sq: 2.0,
            chain_score: 0.01,
        }
    }
}

impl PairWeights {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_finite("puyo.chain_potential", self.chain_potential)?;
        check_finite("puyo.height", self.height)?;
        check_finite("puyo.flatness", self.flatness)?;
        check_finite("puyo.color_grouping", self.color_grouping)?;
        check_finite("puyo.dead_zone", self.dead_zone)?;
        check_finite("puyo.edge_penalty", self.edge_penalty)?;
        check_finite("puyo.chain_count_sq", self.chain_count_sq)?;
        check_finite("puyo.chain_score", self.chain_score)
    }
}

/// Raw evaluation terms of a resolved board.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PairFeatures {
    pub total_height: u32,
    pub bumpiness: u32,
    pub dead_zone: u32,
    /// 0.5 per 2-cell group, 1.0 per 3-cell group.
    pub chain_potential: f64,
    /// Same-color down/right neighbour pairs.
    pub color_grouping: u32,
    pub edge_cells: u32,
    pub chain_count: u32,
    pub chain_score: u64,
}

impl PairFeatures {
    pub fn extract(board: &PuyoBoard, links: &[ChainLink]) -> Self {
        let heights = board.column_heights();
        let total_height = heights.iter().sum();
        let bumpiness = heights.windows(2).map(|w| w[0].abs_diff(w[1])).sum();

        let rows = board.rows();
        let cols = board.cols();

        let mut dead_zone = 0u32;
        if rows > 0 && cols > 0 {
            let top = (rows - 1).min(DEATH_ROW + 1);
            let c0 = DEATH_COL.saturating_sub(1);
            let c1 = (cols - 1).min(DEATH_COL + 1);
            for r in 0..=top {
                for c in c0..=c1 {
                    if board.cell(r, c) != 0 {
                        dead_zone += 1;
                    }
                }
            }
        }

        let chain_potential = board
            .connected_groups()
            .iter()
            .map(|g| match g.len() {
                2 => 0.5,
                3 => 1.0,
                _ => 0.0,
            })
            .sum();

        let mut color_grouping = 0u32;
        let mut edge_cells = 0u32;
        for r in 0..rows {
            for c in 0..cols {
                let v = board.cell(r, c);
                if v == 0 {
                    continue;
                }
                if r + 1 < rows && board.cell(r + 1, c) == v {
                    color_grouping += 1;
                }
                if c + 1 < cols && board.cell(r, c + 1) == v {
                    color_grouping += 1;
                }
                if c == 0 || c == cols - 1 {
                    edge_cells += 1;
                }
            }
        }

        Self {
            total_height,
            bumpiness,
            dead_zone,
            chain_potential,
            color_grouping,
            edge_cells,
            chain_count: links.len() as u32,
            chain_score: links.iter().map(|l| l.score).sum(),
        }
    }

    pub fn score(&self, w: &PairWeights) -> f64 {
        let chains = self.chain_count as f64;
        w.chain_potential * self.chain_potential
            + w.height * self.total_height as f64
            + w.flatness * -(self.bumpiness as f64)
            + w.color_grouping * self.color_grouping as f64
            + w.dead_zone * self.dead_zone as f64
            + w.edge_penalty * self.edge_cells as f64
            + w.chain_count_sq * chains * chains
            + w.chain_score * self.chain_score as f64
    }
}

/// Final placement chosen for a pair (main-cell position).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PairMove {
    pub row: i32,
    pub col: i32,
    pub rotation: u8,
    pub score: f64,
}

struct Candidate {
    row: i32,
    col: i32,
    rotation: u8,
    first: f64,
    score: f64,
    sim: PuyoBoard,
}

/// Two-ply pair search: exhaustive first ply, top-K second ply with the known next pair.
pub struct PairSearch {
    weights: PairWeights,
    beam: BeamConfig,
    rng: StdRng,
}

impl PairSearch {
    pub fn new(weights: PairWeights, beam: BeamConfig, seed: u64) -> Result<Self, ConfigError> {
        weights.validate()?;
        Ok(Self {
            weights,
            beam,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            weights: PairWeights::default(),
            beam: BeamConfig::default(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn weights(&self) -> &PairWeights {
        &self.weights
    }

    pub fn evaluate(&self, board: &PuyoBoard, links: &[ChainLink]) -> f64 {
        PairFeatures::extract(board, links).score(&self.weights)
    }

    /// Every reachable hard-drop placement of `colors`, resolved and scored.
    fn placements(&self, board: &PuyoBoard, colors: PairColors) -> Vec<Candidate> {
        let cols = board.cols() as i32;
        let mut out = Vec::new();

        for rotation in 0..4u8 {
            let (dr, dc) = Pair::sub_offset(rotation);
            let min_col = (-dc).max(0);
            let max_col = (cols - 1).min(cols - 1 - dc);
            let start_row = (-dr).max(0);

            for col in min_col..=max_col {
                let fits = |row: i32| {
                    board.is_valid(row, col) && board.is_valid(row + dr, col + dc)
                };
                if !fits(start_row) {
                    continue;
                }
                let mut row = start_row;
                while fits(row + 1) {
                    row += 1;
                }

                let mut sim = board.clone();
                if !sim.place_pair(&Pair::new(row, col, rotation, colors)) {
                    continue;
                }
                let links = sim.resolve_chains();
                let first = self.evaluate(&sim, &links);
                trace!(rotation, col, row, chains = links.len(), first, "pair candidate");

                out.push(Candidate {
                    row,
                    col,
                    rotation,
                    first,
                    score: first,
                    sim,
                });
            }
        }

        out
    }

    /// Best placement for `pair`, refined by `next` when given. None if nothing fits.
    /// The board is not modified.
    pub fn find_best_move(
        &mut self,
        board: &PuyoBoard,
        pair: &Pair,
        next: Option<&PairColors>,
    ) -> Option<PairMove> {
        let mut cands = self.placements(board, pair.colors);
        if cands.is_empty() {
            debug!("pair search: no placement");
            return None;
        }

        let mut expanded = 0usize;
        if let Some(&next) = next {
            let max_h = board.column_heights().into_iter().max().unwrap_or(0);
            let k = self.beam.breadth(max_h, cands.len());

            sort_desc_stable(&mut cands, |c| c.first);
            for c in cands.iter_mut().take(k) {
                let best2 = self
                    .placements(&c.sim, next)
                    .iter()
                    .map(|c2| c2.first)
                    .fold(f64::NEG_INFINITY, f64::max);
                if best2 > f64::NEG_INFINITY {
                    c.score = FIRST_PLY_SHARE * c.first + SECOND_PLY_SHARE * best2;
                }
            }
            expanded = k;
        }

        // Reservoir tie-break: the i-th tie replaces the pick with probability 1/i.
        let mut best: Option<PairMove> = None;
        let mut best_score = f64::NEG_INFINITY;
        let mut ties = 0u32;
        for c in &cands {
            let m = PairMove {
                row: c.row,
                col: c.col,
                rotation: c.rotation,
                score: c.score,
            };
            if c.score > best_score {
                best_score = c.score;
                best = Some(m);
                ties = 1;
            } else if (c.score - best_score).abs() <= PAIR_TIE_EPS {
                ties += 1;
                if self.rng.gen::<f64>() < 1.0 / ties as f64 {
                    best = Some(m);
                }
            }
        }

        debug!(
            candidates = cands.len(),
            expanded,
            ties,
            best_score,
            "pair search done"
        );
        best
    }
}

impl PairPolicy for PairSearch {
    fn choose_move(
        &mut self,
        board: &PuyoBoard,
        pair: &Pair,
        next: Option<&PairColors>,
    ) -> Option<PairMove> {
        self.find_best_move(board, pair, next)
    }
}
