// engine/src/engine/puyo_game.rs
#![forbid(unsafe_code)]

use tracing::{debug, info};

use crate::engine::action::Action;
use crate::engine::constants::{PUYO_SPAWN_COL, PUYO_SPAWN_ROW};
use crate::engine::pair_rule::PairGenerator;
use crate::engine::puyo_board::{ChainLink, Pair, PairColors, PuyoBoard};

/// Result of settling the falling pair.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SettleOutcome {
    pub links: Vec<ChainLink>,
    /// Sum of link scores.
    pub points: u64,
    pub game_over: bool,
}

impl SettleOutcome {
    #[inline]
    pub fn chain_count(&self) -> u32 {
        self.links.len() as u32
    }
}

/// Headless Puyo session: chain board, two-ahead pair stream and counters.
#[derive(Clone, Debug)]
pub struct PuyoGame {
    board: PuyoBoard,
    generator: PairGenerator,
    seed: u64,
    episode: u64,

    current: Option<Pair>,

    pub score: u64,
    /// Links produced by the most recent settle.
    pub chain_count: u32,
    pub max_chain: u32,
    pub pairs: u64,
    pub game_over: bool,
}

impl PuyoGame {
    pub fn new(seed: u64) -> Self {
        Self::new_episode(seed, 0)
    }

    /// Session starting from a prepared board (puzzles, fixtures).
    pub fn with_board(seed: u64, board: PuyoBoard) -> Self {
        let mut g = Self::new_episode(seed, 0);
        g.board = board;
        g.game_over = false;
        g.respawn();
        g
    }

    fn new_episode(seed: u64, episode: u64) -> Self {
        let mut g = Self {
            board: PuyoBoard::new(),
            generator: PairGenerator::new(seed.wrapping_add(episode)),
            seed,
            episode,
            current: None,
            score: 0,
            chain_count: 0,
            max_chain: 0,
            pairs: 0,
            game_over: false,
        };
        g.spawn();
        g
    }

    pub fn restart(&mut self) {
        let episode = self.episode + 1;
        *self = Self::new_episode(self.seed, episode);
        info!(episode, "puyo session restarted");
    }

    #[inline]
    pub fn episode(&self) -> u64 {
        self.episode
    }

    #[inline]
    pub fn board(&self) -> &PuyoBoard {
        &self.board
    }

    #[inline]
    pub fn current(&self) -> Option<&Pair> {
        self.current.as_ref()
    }

    /// Colors of the pair after the current one.
    #[inline]
    pub fn next(&self) -> PairColors {
        self.generator.peek()
    }

    /// Applies one primitive action. Returns `Some` iff the pair settled.
    pub fn apply(&mut self, action: Action) -> Option<SettleOutcome> {
        if self.game_over {
            return None;
        }

        match action {
            Action::RotateCw => {
                self.try_rotate(1);
                None
            }
            Action::RotateCcw => {
                self.try_rotate(3);
                None
            }
            Action::Left => {
                self.try_shift(0, -1);
                None
            }
            Action::Right => {
                self.try_shift(0, 1);
                None
            }
            Action::Down => {
                if self.try_shift(1, 0) {
                    None
                } else {
                    Some(self.settle())
                }
            }
            Action::Drop => {
                while self.try_shift(1, 0) {}
                Some(self.settle())
            }
        }
    }

    fn fits(&self, pair: &Pair) -> bool {
        let (sr, sc) = pair.sub_pos();
        self.board.is_valid(pair.row, pair.col) && self.board.is_valid(sr, sc)
    }

    fn try_shift(&mut self, dr: i32, dc: i32) -> bool {
        let Some(p) = self.current else {
            return false;
        };
        let moved = Pair { row: p.row + dr, col: p.col + dc, ..p };
        if !self.fits(&moved) {
            return false;
        }
        self.current = Some(moved);
        true
    }

    /// The main cell stays put; only the new sub cell has to be free.
    fn try_rotate(&mut self, steps: u8) -> bool {
        let Some(p) = self.current else {
            return false;
        };
        let rotated = Pair {
            rotation: (p.rotation + steps) % 4,
            ..p
        };
        let (sr, sc) = rotated.sub_pos();
        if !self.board.is_valid(sr, sc) {
            return false;
        }
        self.current = Some(rotated);
        true
    }

    fn settle(&mut self) -> SettleOutcome {
        let Some(pair) = self.current.take() else {
            return SettleOutcome::default();
        };

        if !self.board.place_pair(&pair) {
            self.finish("pair could not be placed");
            return SettleOutcome {
                game_over: true,
                ..SettleOutcome::default()
            };
        }
        self.pairs += 1;

        let links = self.board.resolve_chains();
        let points: u64 = links.iter().map(|l| l.score).sum();
        self.score += points;
        self.chain_count = links.len() as u32;
        self.max_chain = self.max_chain.max(self.chain_count);
        if !links.is_empty() {
            debug!(chain = self.chain_count, points, "chain resolved");
        }

        if self.board.is_game_over() {
            self.finish("death cell occupied");
        } else {
            self.spawn();
        }

        SettleOutcome {
            links,
            points,
            game_over: self.game_over,
        }
    }

    /// Re-checks the current pair's colors at the spawn point against the board.
    fn respawn(&mut self) {
        let Some(colors) = self.current.map(|p| p.colors) else {
            return;
        };
        let pair = Pair::new(PUYO_SPAWN_ROW, PUYO_SPAWN_COL, 0, colors);
        if self.board.is_game_over() || !self.fits(&pair) {
            self.finish("spawn blocked");
        } else {
            self.current = Some(pair);
        }
    }

    fn spawn(&mut self) {
        let pair = Pair::new(PUYO_SPAWN_ROW, PUYO_SPAWN_COL, 0, self.generator.draw());
        if self.board.is_game_over() || !self.fits(&pair) {
            self.current = None;
            self.finish("spawn blocked");
        } else {
            self.current = Some(pair);
        }
    }

    fn finish(&mut self, reason: &'static str) {
        self.game_over = true;
        self.current = None;
        info!(
            reason,
            score = self.score,
            max_chain = self.max_chain,
            pairs = self.pairs,
            "puyo game over"
        );
    }
}
