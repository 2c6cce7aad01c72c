// engine/tests/grid_board_contracts.rs
#![forbid(unsafe_code)]

/**
 * Grid board (Tetris) contract tests.
 *
 * Covered:
 * - validity rules (walls, floor, occupied cells, free spawn buffer above row 0)
 * - simultaneous line clears with downward compaction
 * - version counter, T-spin 3-corner rule, ghost row
 * - aux stats agree with the feature extraction the search uses
 * - generated-grid invariants for `clear_lines`
 */
use chetris_engine::engine::{
    compute_grid_features, ghost_y, piece_cells, Board, Kind, Piece, COLS, ROWS,
};
use proptest::prelude::*;

fn fill_row(b: &mut Board, r: usize, except: &[usize]) {
    for c in 0..COLS {
        if !except.contains(&c) {
            b.set(r, c, 1);
        }
    }
}

fn occupied(b: &Board) -> usize {
    b.grid().iter().flatten().filter(|&&v| v != 0).count()
}

#[test]
fn new_board_is_empty_20_by_10() {
    let b = Board::new();
    assert_eq!((b.rows(), b.cols()), (20, 10));
    assert_eq!(occupied(&b), 0);
    assert_eq!(b.version(), 0);
}

#[test]
fn validity_respects_walls_floor_and_occupancy() {
    let mut b = Board::new();
    assert!(b.is_valid(&[(0, 0), (19, 9)]));
    assert!(!b.is_valid(&[(0, -1)]));
    assert!(!b.is_valid(&[(0, 10)]));
    assert!(!b.is_valid(&[(20, 0)]));
    // Above the board is a free spawn buffer.
    assert!(b.is_valid(&[(-1, 0), (-3, 5)]));
    // ...but columns are still enforced there.
    assert!(!b.is_valid(&[(-1, -1)]));

    b.set(10, 4, 3);
    assert!(!b.is_valid(&[(10, 4)]));
    assert!(b.is_valid(&[(10, 5)]));
}

#[test]
fn place_writes_color_and_skips_cells_above_board() {
    let mut b = Board::new();
    b.place(&[(-1, 0), (0, 0), (1, 0)], 6);
    assert_eq!(b.cell(0, 0), 6);
    assert_eq!(b.cell(1, 0), 6);
    assert_eq!(occupied(&b), 2);
    assert_eq!(b.version(), 1);
}

#[test]
fn single_full_row_clears_and_rows_above_fall() {
    let mut b = Board::new();
    fill_row(&mut b, ROWS - 1, &[]);
    b.set(ROWS - 2, 0, 5);

    let lc = b.clear_lines();
    assert_eq!(lc.count, 1);
    assert_eq!(lc.rows, vec![ROWS - 1]);
    assert_eq!(b.cell(ROWS - 1, 0), 5);
    assert_eq!(occupied(&b), 1);
}

#[test]
fn non_adjacent_full_rows_clear_simultaneously() {
    let mut b = Board::new();
    fill_row(&mut b, 19, &[]);
    fill_row(&mut b, 18, &[4]);
    fill_row(&mut b, 17, &[]);
    b.set(16, 9, 2);

    let lc = b.clear_lines();
    assert_eq!(lc.count, 2);
    assert_eq!(lc.rows, vec![19, 17]);

    // Row 18 (with its gap) compacts to the floor, the lone cell lands right above it.
    for c in 0..COLS {
        assert_eq!(b.cell(19, c) != 0, c != 4);
    }
    assert_eq!(b.cell(18, 9), 2);
    assert_eq!(occupied(&b), 9 + 1);
}

#[test]
fn incomplete_rows_are_not_cleared_and_version_is_stable() {
    let mut b = Board::new();
    fill_row(&mut b, 19, &[7]);
    let before = b.version();
    let lc = b.clear_lines();
    assert_eq!(lc.count, 0);
    assert!(lc.rows.is_empty());
    assert_eq!(b.version(), before);
}

#[test]
fn version_bumps_on_place_and_on_effective_clear() {
    let mut b = Board::new();
    let cells: Vec<(i32, i32)> = (0..COLS as i32).map(|c| (19, c)).collect();
    b.place(&cells, 1);
    assert_eq!(b.version(), 1);
    assert_eq!(b.clear_lines().count, 1);
    assert_eq!(b.version(), 2);
}

#[test]
fn clone_is_independent() {
    let mut a = Board::new();
    a.set(19, 0, 1);
    let mut b = a.clone();
    b.set(19, 1, 1);
    assert_eq!(a.cell(19, 1), 0);
    assert_eq!(b.cell(19, 0), 1);
}

#[test]
fn tspin_needs_three_blocked_corners() {
    let mut b = Board::new();
    let t = Piece::new(Kind::T, 0, 4, 5);
    // Center is (6, 5); corners (5,4) (5,6) (7,4) (7,6).
    b.set(7, 4, 1);
    b.set(7, 6, 1);
    assert!(!b.check_tspin(&t));
    b.set(5, 4, 1);
    assert!(b.check_tspin(&t));

    let not_t = Piece::new(Kind::L, 0, 4, 5);
    assert!(!b.check_tspin(&not_t));
}

#[test]
fn tspin_counts_out_of_bounds_corners_as_blocked() {
    let b = Board::new();
    // Center on the floor row: both lower corners are outside the board.
    let t = Piece::new(Kind::T, 0, 0, ROWS as i32 - 2);
    assert!(!b.check_tspin(&t));

    // Center in column 0 against the floor: three corners outside.
    let t = Piece::new(Kind::T, 0, -1, ROWS as i32 - 2);
    assert!(b.check_tspin(&t));
}

#[test]
fn piece_cells_are_shape_plus_origin() {
    let p = Piece::new(Kind::O, 0, 4, 2);
    assert_eq!(piece_cells(&p), [(2, 4), (2, 5), (3, 4), (3, 5)]);
}

#[test]
fn ghost_row_falls_to_floor_or_stack() {
    let mut b = Board::new();
    let t = Piece::new(Kind::T, 0, 3, 0);
    assert_eq!(ghost_y(&b, &t), 18);

    b.set(19, 4, 1);
    assert_eq!(ghost_y(&b, &t), 17);
}

#[test]
fn aux_stats_match_feature_extraction() {
    let mut b = Board::new();
    fill_row(&mut b, 19, &[3]);
    fill_row(&mut b, 18, &[6]);
    for c in [0usize, 2, 7, 9] {
        b.set(17, c, 1);
    }
    b.set(12, 5, 1);

    let f = compute_grid_features(b.grid());
    assert_eq!(b.height(), f.agg_h);
    assert_eq!(b.holes(), f.holes);
    assert_eq!(b.bumpiness(), f.bump);
    assert_eq!(b.column_heights().iter().copied().max(), Some(f.max_h));

    // Column 5 tops out at row 12 (height 8) with rows 13..=17 empty underneath.
    assert_eq!(b.column_heights()[5], 8);
    assert!(b.holes() >= 5);
}

#[test]
fn bumpiness_skips_pairs_of_empty_columns() {
    let mut b = Board::new();
    b.set(19, 0, 1);
    // Heights [1, 0, 0, ...]: only the first pair contributes.
    assert_eq!(b.bumpiness(), 1);
}

fn weighted_grid() -> impl Strategy<Value = Vec<Vec<bool>>> {
    prop::collection::vec(prop::collection::vec(prop::bool::weighted(0.85), COLS), ROWS)
}

proptest! {
    #[test]
    fn clear_lines_removes_exactly_the_full_rows(cells in weighted_grid()) {
        let mut b = Board::new();
        for (r, row) in cells.iter().enumerate() {
            for (c, &on) in row.iter().enumerate() {
                if on {
                    b.set(r, c, 1);
                }
            }
        }

        let full_before = (0..ROWS)
            .filter(|&r| b.grid()[r].iter().all(|&v| v != 0))
            .count();
        let partial_before: Vec<[u8; COLS]> = b
            .grid()
            .iter()
            .filter(|row| !row.iter().all(|&v| v != 0))
            .copied()
            .collect();
        let occ_before = occupied(&b);

        let lc = b.clear_lines();

        prop_assert_eq!(lc.count as usize, full_before);
        prop_assert_eq!(lc.rows.len(), full_before);
        prop_assert_eq!(occupied(&b), occ_before - full_before * COLS);

        // No full rows remain; surviving rows keep their order at the bottom.
        for row in b.grid() {
            prop_assert!(!row.iter().all(|&v| v != 0));
        }
        let offset = ROWS - partial_before.len();
        for (i, row) in partial_before.iter().enumerate() {
            prop_assert_eq!(&b.grid()[offset + i], row);
        }
        for r in 0..offset {
            prop_assert!(b.grid()[r].iter().all(|&v| v == 0));
        }
    }

    #[test]
    fn ghost_row_is_the_last_valid_row(kind_idx in 1u8..=7, rot in 0u8..4, seed_row in 10usize..ROWS) {
        let kind = Kind::from_idx(kind_idx).unwrap();
        let mut b = Board::new();
        fill_row(&mut b, seed_row, &[0, 1]);

        for x in chetris_engine::engine::origin_x_range(kind, rot) {
            let p = Piece::new(kind, rot, x, 0);
            if !b.is_valid(&p.cells()) {
                continue;
            }
            let gy = ghost_y(&b, &p);
            let landed = Piece::new(kind, rot, x, gy);
            let below = Piece::new(kind, rot, x, gy + 1);
            prop_assert!(b.is_valid(&landed.cells()));
            prop_assert!(!b.is_valid(&below.cells()));
        }
    }
}
