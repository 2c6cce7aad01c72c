// engine/src/policy/mod.rs
#![forbid(unsafe_code)]

mod base;
mod beam;
mod heuristic;
mod move_queue;
mod pair_search;
mod random;

/**
 * Curated policy public API.
 *
 * Internal implementation modules remain private; only stable policy entrypoints are re-exported.
 */
pub use base::{PairPolicy, Policy};
pub use beam::BeamConfig;
pub use heuristic::{HeuristicPolicy, HeuristicWeights, TetrisMove, TIE_EPS};
pub use move_queue::{
    build_move_queue, build_pair_move_queue, build_queue, QueuePlacement, VerticalSteps,
};
pub use pair_search::{PairFeatures, PairMove, PairSearch, PairWeights, PAIR_TIE_EPS};
pub use random::RandomPolicy;
