// engine/src/engine/mod.rs
#![forbid(unsafe_code)]

mod action;
mod constants;
mod features;
mod geometry;
mod grid;
mod pair_rule;
mod piece;
mod piece_rule;
mod pieces;
mod puyo_board;
mod puyo_game;
mod tetris_game;

/**
 * Curated engine public API.
 *
 * Internal implementation modules remain private; only stable items are re-exported here.
 */
pub use action::Action;
pub use constants::{
    table_lookup, CHAIN_POWER, COLOR_BONUS, COLS, COMBO_BONUS, DEATH_COL, DEATH_ROW, GROUP_BONUS,
    LINES_PER_LEVEL, LINE_SCORES, LINE_SCORE_FALLBACK, MAX_ROTS, PAIR_OFFSETS, POP_SIZE,
    PUYO_COLORS, PUYO_COLS, PUYO_HIDDEN_ROWS, PUYO_ROWS, PUYO_SPAWN_COL, PUYO_SPAWN_ROW,
    PUYO_VISIBLE_ROWS, ROWS, TSPIN_SCORES, TSPIN_SCORE_FALLBACK,
};
pub use features::{bumpiness, column_heights, compute_grid_features, count_holes, GridFeatures};
pub use geometry::{cells_at, col_bounds, origin_x_range};
pub use grid::{ghost_y, piece_cells, Board, Grid, LineClear};
pub use pair_rule::PairGenerator;
pub use piece::{LastAction, Piece};
pub use piece_rule::{PieceRule, PieceRuleKind};
pub use pieces::{kicks, preview_mask_4x4, shape, Kind};
pub use puyo_board::{
    chain_score, ChainLink, MatchGroup, Pair, PairColors, PuyoBoard, Puyo, Removal,
};
pub use puyo_game::{PuyoGame, SettleOutcome};
pub use tetris_game::{LockOutcome, TetrisGame};
