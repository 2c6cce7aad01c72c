// engine/src/engine/piece_rule.rs
#![forbid(unsafe_code)]

use rand::prelude::*;

use crate::engine::pieces::Kind;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum PieceRuleKind {
    /// Independent uniform draws.
    Uniform,
    /// 7-bag: every kind exactly once per shuffled bag.
    #[default]
    Bag7,
}

impl PieceRuleKind {
    pub fn from_cli(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "uniform" | "iid" | "random" => PieceRuleKind::Uniform,
            _ => PieceRuleKind::Bag7,
        }
    }
}

/// Spawn stream: owns its RNG and (for Bag7) the current bag.
#[derive(Clone, Debug)]
pub struct PieceRule {
    kind: PieceRuleKind,

    rng: StdRng,

    // 7-bag state (only used if kind == Bag7)
    bag: [Kind; 7],
    bag_idx: usize,
}

const FRESH_BAG: [Kind; 7] = [Kind::I, Kind::O, Kind::T, Kind::S, Kind::Z, Kind::J, Kind::L];

impl PieceRule {
    pub fn new(seed: u64, kind: PieceRuleKind) -> Self {
        Self {
            kind,
            rng: StdRng::seed_from_u64(seed),
            bag: FRESH_BAG,
            bag_idx: 7, // force refill on first Bag7 draw
        }
    }

    pub fn kind(&self) -> PieceRuleKind {
        self.kind
    }

    /// Kinds still waiting in the current bag (empty for Uniform).
    pub fn remaining(&self) -> &[Kind] {
        match self.kind {
            PieceRuleKind::Uniform => &[],
            PieceRuleKind::Bag7 => &self.bag[self.bag_idx.min(7)..],
        }
    }

    fn refill_bag7(&mut self) {
        self.bag = FRESH_BAG;
        self.bag.shuffle(&mut self.rng);
        self.bag_idx = 0;
    }

    pub fn draw(&mut self) -> Kind {
        match self.kind {
            PieceRuleKind::Uniform => {
                let all = Kind::all();
                all[self.rng.gen_range(0..all.len())]
            }
            PieceRuleKind::Bag7 => {
                if self.bag_idx >= 7 {
                    self.refill_bag7();
                }
                let k = self.bag[self.bag_idx];
                self.bag_idx += 1;
                k
            }
        }
    }
}
