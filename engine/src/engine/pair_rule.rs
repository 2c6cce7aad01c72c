// engine/src/engine/pair_rule.rs
#![forbid(unsafe_code)]

use rand::prelude::*;

use crate::engine::constants::PUYO_COLORS;
use crate::engine::puyo_board::PairColors;

/// Two-ahead pair stream: `draw()` hands out the announced `next` and rolls a new one.
#[derive(Clone, Debug)]
pub struct PairGenerator {
    rng: StdRng,
    next: PairColors,
}

impl PairGenerator {
    pub fn new(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let next = roll(&mut rng);
        Self { rng, next }
    }

    /// Colors the following `draw()` will return.
    #[inline]
    pub fn peek(&self) -> PairColors {
        self.next
    }

    pub fn draw(&mut self) -> PairColors {
        let out = self.next;
        self.next = roll(&mut self.rng);
        out
    }
}

fn roll(rng: &mut StdRng) -> PairColors {
    PairColors {
        main: rng.gen_range(1..=PUYO_COLORS),
        sub: rng.gen_range(1..=PUYO_COLORS),
    }
}
