// engine/src/lib.rs
#![forbid(unsafe_code)]

pub mod config;
pub mod engine;
pub mod policy;

pub use config::{ConfigError, WeightsConfig};
pub use engine::{Action, Board, Pair, PairColors, Piece, PuyoBoard, PuyoGame, TetrisGame};
pub use policy::{HeuristicPolicy, PairSearch};
