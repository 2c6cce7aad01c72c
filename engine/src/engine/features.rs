// engine/src/engine/features.rs
#![forbid(unsafe_code)]

use super::constants::{COLS, ROWS};
use super::grid::Grid;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct GridFeatures {
    pub max_h: u32,
    pub agg_h: u32,
    pub holes: u32,
    pub bump: u32,
}

/// Compute classic Tetris grid features on a locked grid.
/// Complexity: O(ROWS*COLS), no allocations.
pub fn compute_grid_features(grid: &Grid) -> GridFeatures {
    let heights = column_heights(grid);

    let mut max_h = 0u32;
    let mut agg_h = 0u32;
    for &h in &heights {
        max_h = max_h.max(h);
        agg_h += h;
    }

    GridFeatures {
        max_h,
        agg_h,
        holes: count_holes(grid, &heights),
        bump: bumpiness(&heights),
    }
}

/// Column height: number of rows from the topmost filled cell to the floor (0 if empty).
pub fn column_heights(grid: &Grid) -> [u32; COLS] {
    let mut h = [0u32; COLS];
    for c in 0..COLS {
        for r in 0..ROWS {
            if grid[r][c] != 0 {
                h[c] = (ROWS - r) as u32;
                break;
            }
        }
    }
    h
}

/// Empty cells strictly below each column's topmost filled cell.
pub fn count_holes(grid: &Grid, heights: &[u32; COLS]) -> u32 {
    let mut holes = 0u32;
    for c in 0..COLS {
        if heights[c] == 0 {
            continue;
        }
        let top_r = ROWS - heights[c] as usize;
        for row in grid.iter().skip(top_r + 1) {
            if row[c] == 0 {
                holes += 1;
            }
        }
    }
    holes
}

/// Sum of adjacent height differences. Two empty neighbours contribute nothing.
pub fn bumpiness(heights: &[u32; COLS]) -> u32 {
    let mut b = 0u32;
    for i in 0..(COLS - 1) {
        let a = heights[i];
        let c = heights[i + 1];
        if a == 0 && c == 0 {
            continue;
        }
        b += a.abs_diff(c);
    }
    b
}
