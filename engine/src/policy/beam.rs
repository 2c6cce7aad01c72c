// engine/src/policy/beam.rs
#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

/**
 * Adaptive lookahead breadth for the pair search.
 *
 * The second ply is only expanded for the top-K first-ply candidates, where K
 * shrinks as the stack grows:
 * - max height < `full_below`  => every candidate
 * - max height < `wide_below`  => `wide`
 * - otherwise                  => `narrow`
 */
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BeamConfig {
    pub full_below: u32,
    pub wide_below: u32,
    pub wide: usize,
    pub narrow: usize,
}

impl Default for BeamConfig {
    fn default() -> Self {
        Self {
            full_below: 5,
            wide_below: 8,
            wide: 5,
            narrow: 3,
        }
    }
}

impl BeamConfig {
    /// Number of candidates (out of `n`) that get the second ply.
    pub fn breadth(&self, max_height: u32, n: usize) -> usize {
        let k = if max_height < self.full_below {
            n
        } else if max_height < self.wide_below {
            self.wide
        } else {
            self.narrow
        };
        k.min(n)
    }
}

/// Stable descending sort by score; equal scores keep generation order.
pub(crate) fn sort_desc_stable<T>(xs: &mut [T], score: impl Fn(&T) -> f64) {
    xs.sort_by(|a, b| score(b).total_cmp(&score(a)));
}
