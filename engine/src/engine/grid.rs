// engine/src/engine/grid.rs
#![forbid(unsafe_code)]

use crate::engine::constants::{COLS, ROWS};
use crate::engine::features::{bumpiness, column_heights, count_holes};
use crate::engine::geometry::cells_at;
use crate::engine::piece::Piece;
use crate::engine::pieces::Kind;

pub type Grid = [[u8; COLS]; ROWS];

/// Rows removed by one `clear_lines` call.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct LineClear {
    pub count: u32,
    /// Cleared row indices in bottom-to-top scan order (pre-compaction indices).
    pub rows: Vec<usize>,
}

/// Tetris playfield: `ROWS x COLS` cells, 0 = empty, anything else is an opaque color.
///
/// Rows above the board (`row < 0`) are a spawn buffer: they are always considered free
/// and are never stored.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Board {
    grid: Grid,
    version: u64,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    pub fn new() -> Self {
        Self {
            grid: [[0u8; COLS]; ROWS],
            version: 0,
        }
    }

    pub fn from_grid(grid: Grid) -> Self {
        Self { grid, version: 0 }
    }

    #[inline]
    pub fn rows(&self) -> usize {
        ROWS
    }

    #[inline]
    pub fn cols(&self) -> usize {
        COLS
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Caller must stay in bounds.
    #[inline]
    pub fn cell(&self, row: usize, col: usize) -> u8 {
        self.grid[row][col]
    }

    /// Direct write for fixtures and drivers. Does not bump the version.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, v: u8) {
        self.grid[row][col] = v;
    }

    /// Monotonic change counter for render caches.
    #[inline]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// True iff every cell is inside the columns, above the floor, and unoccupied.
    /// Rows above the board (`row < 0`) are allowed.
    pub fn is_valid(&self, cells: &[(i32, i32)]) -> bool {
        for &(r, c) in cells {
            if c < 0 || c >= COLS as i32 || r >= ROWS as i32 {
                return false;
            }
            if r < 0 {
                continue;
            }
            if self.grid[r as usize][c as usize] != 0 {
                return false;
            }
        }
        true
    }

    /// Write `color` into every in-bounds cell; cells above the board are skipped.
    pub fn place(&mut self, cells: &[(i32, i32)], color: u8) {
        for &(r, c) in cells {
            if (0..ROWS as i32).contains(&r) && (0..COLS as i32).contains(&c) {
                self.grid[r as usize][c as usize] = color;
            }
        }
        self.version += 1;
    }

    /// Remove every full row at once, compact the rest downward and pad the top
    /// with empty rows.
    pub fn clear_lines(&mut self) -> LineClear {
        let mut rows = Vec::new();
        for r in (0..ROWS).rev() {
            if self.grid[r].iter().all(|&c| c != 0) {
                rows.push(r);
            }
        }
        if rows.is_empty() {
            return LineClear::default();
        }

        let mut write_row: i32 = (ROWS as i32) - 1;
        for r in (0..ROWS).rev() {
            if self.grid[r].iter().all(|&c| c != 0) {
                continue;
            }
            if write_row != r as i32 {
                self.grid[write_row as usize] = self.grid[r];
            }
            write_row -= 1;
        }
        while write_row >= 0 {
            self.grid[write_row as usize] = [0u8; COLS];
            write_row -= 1;
        }

        self.version += 1;
        LineClear {
            count: rows.len() as u32,
            rows,
        }
    }

    /// 3-corner T-spin heuristic: at least 3 of the 4 diagonal neighbours of the
    /// T's center (`y + 1, x + 1`) are out of bounds or occupied.
    ///
    /// Does not distinguish T-spin Mini; scoring and search bonuses assume exactly this rule.
    pub fn check_tspin(&self, piece: &Piece) -> bool {
        if piece.kind != Kind::T {
            return false;
        }
        let cr = piece.y + 1;
        let cc = piece.x + 1;
        let mut corners = 0;
        for (dr, dc) in [(-1, -1), (-1, 1), (1, -1), (1, 1)] {
            let nr = cr + dr;
            let nc = cc + dc;
            let blocked = nr < 0
                || nr >= ROWS as i32
                || nc < 0
                || nc >= COLS as i32
                || self.grid[nr as usize][nc as usize] != 0;
            if blocked {
                corners += 1;
            }
        }
        corners >= 3
    }

    // -------------------------------------------------------------------------
    // Aux stats (same definitions the search uses)
    // -------------------------------------------------------------------------

    pub fn column_heights(&self) -> [u32; COLS] {
        column_heights(&self.grid)
    }

    /// Aggregate height.
    pub fn height(&self) -> u32 {
        self.column_heights().iter().sum()
    }

    pub fn holes(&self) -> u32 {
        count_holes(&self.grid, &self.column_heights())
    }

    pub fn bumpiness(&self) -> u32 {
        bumpiness(&self.column_heights())
    }

    pub fn render_ascii(&self) -> String {
        let mut s = String::with_capacity((COLS + 3) * (ROWS + 2));
        s.push('+');
        s.push_str(&"-".repeat(COLS));
        s.push_str("+\n");
        for row in &self.grid {
            s.push('|');
            for &v in row {
                s.push(match Kind::from_idx(v) {
                    Some(k) => k.glyph(),
                    None if v == 0 => ' ',
                    None => '#',
                });
            }
            s.push_str("|\n");
        }
        s.push('+');
        s.push_str(&"-".repeat(COLS));
        s.push_str("+\n");
        s
    }
}

/// Absolute cells of a piece.
#[inline]
pub fn piece_cells(piece: &Piece) -> [(i32, i32); 4] {
    piece.cells()
}

/// Lowest `y` the piece reaches by falling one row at a time from its current `y`.
pub fn ghost_y(board: &Board, piece: &Piece) -> i32 {
    let mut y = piece.y;
    while board.is_valid(&cells_at(piece.kind, piece.rotation, piece.x, y + 1)) {
        y += 1;
    }
    y
}
