// engine/src/engine/constants.rs
#![forbid(unsafe_code)]

// ---------------- Tetris (grid board) ----------------

pub const ROWS: usize = 20;
pub const COLS: usize = 10;

pub const MAX_ROTS: usize = 4;

/// Base points per simultaneous clear, indexed by line count.
pub const LINE_SCORES: [u64; 5] = [0, 100, 300, 500, 800];
/// Used when a clear count falls outside `LINE_SCORES`.
pub const LINE_SCORE_FALLBACK: u64 = 800;

/// T-spin points per simultaneous clear, indexed by line count.
pub const TSPIN_SCORES: [u64; 4] = [0, 800, 1200, 1600];
pub const TSPIN_SCORE_FALLBACK: u64 = 1600;

/// Added once per consecutive clearing lock (`combo * COMBO_BONUS`).
pub const COMBO_BONUS: u64 = 50;

pub const LINES_PER_LEVEL: u64 = 10;

// ---------------- Puyo (chain board) ----------------

pub const PUYO_COLS: usize = 6;
pub const PUYO_VISIBLE_ROWS: usize = 12;
/// Spawn space above the visible field.
pub const PUYO_HIDDEN_ROWS: usize = 1;
pub const PUYO_ROWS: usize = PUYO_VISIBLE_ROWS + PUYO_HIDDEN_ROWS;

/// Colors are `1..=PUYO_COLORS`; 0 is empty.
pub const PUYO_COLORS: u8 = 4;

/// Minimum connected size that pops.
pub const POP_SIZE: usize = 4;

/// Sub-cell offset `(dr, dc)` relative to the main cell, by rotation:
/// 0 = up, 1 = right, 2 = down, 3 = left.
pub const PAIR_OFFSETS: [(i32, i32); 4] = [(-1, 0), (0, 1), (1, 0), (0, -1)];

/// Main-cell spawn position. Row 1 keeps an upward sub cell in the hidden row.
pub const PUYO_SPAWN_ROW: i32 = 1;
pub const PUYO_SPAWN_COL: i32 = 2;

pub const DEATH_ROW: usize = 0;
pub const DEATH_COL: usize = 2;

pub const CHAIN_POWER: [u64; 20] = [
    0, 0, 8, 16, 32, 64, 96, 128, 160, 192, 224, 256, 288, 320, 352, 384, 416, 448, 480, 512,
];
/// Indexed by group size (4 => 0, 5 => 2, ...).
pub const GROUP_BONUS: [u64; 12] = [0, 0, 0, 0, 0, 2, 3, 4, 5, 6, 7, 10];
/// Indexed by distinct color count in one chain link.
pub const COLOR_BONUS: [u64; 6] = [0, 0, 3, 6, 12, 24];

/// Clamped table lookup: indices past the end read the last entry.
#[inline]
pub fn table_lookup(table: &[u64], idx: usize) -> u64 {
    match table.last() {
        None => 0,
        Some(&last) => table.get(idx).copied().unwrap_or(last),
    }
}
