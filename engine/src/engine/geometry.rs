// engine/src/engine/geometry.rs
#![forbid(unsafe_code)]

use crate::engine::constants::COLS;
use crate::engine::pieces::{shape, Kind};

/// Return (min_dc, max_dc) across the 4 blocks of the rotated piece.
#[inline]
pub fn col_bounds(kind: Kind, rot: u8) -> (i32, i32) {
    let mut mn = i32::MAX;
    let mut mx = i32::MIN;
    for &(_dr, dc) in shape(kind, rot) {
        mn = mn.min(dc);
        mx = mx.max(dc);
    }
    (mn, mx)
}

/// Origin columns `x` for which every block of the rotated piece stays in `[0, COLS)`.
#[inline]
pub fn origin_x_range(kind: Kind, rot: u8) -> std::ops::Range<i32> {
    let (min_dc, max_dc) = col_bounds(kind, rot);
    -min_dc..(COLS as i32 - max_dc)
}

/// Absolute `(row, col)` cells of a shape whose origin sits at `(y, x)`.
#[inline]
pub fn cells_at(kind: Kind, rot: u8, x: i32, y: i32) -> [(i32, i32); 4] {
    let s = shape(kind, rot);
    [
        (s[0].0 + y, s[0].1 + x),
        (s[1].0 + y, s[1].1 + x),
        (s[2].0 + y, s[2].1 + x),
        (s[3].0 + y, s[3].1 + x),
    ]
}
