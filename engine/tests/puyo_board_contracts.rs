// engine/tests/puyo_board_contracts.rs
#![forbid(unsafe_code)]

/**
 * Chain board (Puyo) contract tests.
 *
 * Covered:
 * - bounds/color validation and atomic pair placement
 * - gravity, 4-connected matching, removal summaries
 * - chain resolution (single link, cascaded link) and the score formula
 * - death cell, column heights
 * - generated-board invariant: resolution always reaches a stable fixpoint
 */
use chetris_engine::engine::{
    chain_score, MatchGroup, Pair, PairColors, Puyo, PuyoBoard, PUYO_COLORS, PUYO_COLS,
    PUYO_ROWS,
};
use proptest::prelude::*;

fn board_with(cells: &[(i32, i32, u8)]) -> PuyoBoard {
    let mut b = PuyoBoard::new();
    for &(r, c, color) in cells {
        assert!(b.place(r, c, color));
    }
    b
}

fn group(color: u8, n: usize) -> MatchGroup {
    MatchGroup {
        color,
        cells: (0..n).map(|i| (PUYO_ROWS - 1, i % PUYO_COLS)).collect(),
    }
}

#[test]
fn default_board_is_6_by_13_and_empty() {
    let b = PuyoBoard::new();
    assert_eq!((b.cols(), b.rows()), (6, 13));
    assert_eq!(b.occupied(), 0);

    let small = PuyoBoard::with_size(4, 5);
    assert_eq!((small.cols(), small.rows()), (4, 5));
}

#[test]
fn validity_checks_bounds_and_occupancy() {
    let mut b = PuyoBoard::new();
    assert!(b.is_valid(0, 0));
    assert!(!b.is_valid(-1, 0));
    assert!(!b.is_valid(13, 0));
    assert!(!b.is_valid(0, -1));
    assert!(!b.is_valid(0, 6));
    assert!(b.place(5, 5, 1));
    assert!(!b.is_valid(5, 5));
}

#[test]
fn place_rejects_bad_colors_and_out_of_bounds() {
    let mut b = PuyoBoard::new();
    assert!(b.place(12, 0, 1));
    assert!(b.place(12, 1, PUYO_COLORS));
    assert!(!b.place(12, 2, 0));
    assert!(!b.place(12, 2, PUYO_COLORS + 1));
    assert!(!b.place(-1, 0, 1));
    assert!(!b.place(13, 0, 1));
    assert!(!b.place(0, -1, 1));
    assert_eq!(b.occupied(), 2);
}

#[test]
fn place_pair_uses_rotation_offset() {
    let colors = PairColors::new(1, 2);
    let mut b = PuyoBoard::new();
    assert!(b.place_pair(&Pair::new(5, 2, 0, colors)));
    assert_eq!(b.cell(5, 2), 1);
    assert_eq!(b.cell(4, 2), 2);

    let mut b = PuyoBoard::new();
    assert!(b.place_pair(&Pair::new(5, 2, 1, colors)));
    assert_eq!(b.cell(5, 3), 2);

    let mut b = PuyoBoard::new();
    assert!(b.place_pair(&Pair::new(5, 2, 3, colors)));
    assert_eq!(b.cell(5, 1), 2);
}

#[test]
fn place_pair_is_atomic() {
    let mut b = board_with(&[(4, 2, 3)]);
    let before = b.clone();
    // Sub cell (4, 2) is taken: nothing may be written.
    assert!(!b.place_pair(&Pair::new(5, 2, 0, PairColors::new(1, 2))));
    assert_eq!(b, before);

    // Sub cell off the board.
    assert!(!b.place_pair(&Pair::new(0, 2, 0, PairColors::new(1, 2))));
    assert_eq!(b, before);
}

#[test]
fn place_cells_rejects_overlap_and_bad_color() {
    let mut b = PuyoBoard::new();
    let a = Puyo { row: 12, col: 0, color: 1 };
    assert!(!b.place_cells(a, Puyo { row: 12, col: 0, color: 2 }));
    assert!(!b.place_cells(a, Puyo { row: 12, col: 1, color: 0 }));
    assert_eq!(b.occupied(), 0);
    assert!(b.place_cells(a, Puyo { row: 11, col: 0, color: 2 }));
    assert_eq!(b.occupied(), 2);
}

#[test]
fn gravity_drops_cells_and_reports_movement() {
    let mut b = PuyoBoard::new();
    assert!(!b.apply_gravity());

    let mut b = board_with(&[(0, 0, 1), (5, 0, 2), (12, 3, 4), (2, 5, 3)]);
    assert!(b.apply_gravity());
    assert_eq!(b.cell(12, 0), 2);
    assert_eq!(b.cell(11, 0), 1);
    assert_eq!(b.cell(12, 3), 4);
    assert_eq!(b.cell(12, 5), 3);
    assert_eq!(b.occupied(), 4);
    assert!(!b.apply_gravity());
}

#[test]
fn four_in_a_column_or_row_match() {
    let b = board_with(&[(9, 0, 1), (10, 0, 1), (11, 0, 1), (12, 0, 1)]);
    let m = b.find_matches();
    assert_eq!(m.len(), 1);
    assert_eq!(m[0].color, 1);
    assert_eq!(m[0].len(), 4);

    let b = board_with(&[(12, 1, 2), (12, 2, 2), (12, 3, 2), (12, 4, 2)]);
    assert_eq!(b.find_matches().len(), 1);
}

#[test]
fn three_connected_or_mixed_colors_do_not_match() {
    let b = board_with(&[(12, 0, 1), (12, 1, 1), (12, 2, 1)]);
    assert!(b.find_matches().is_empty());

    let b = board_with(&[(12, 0, 1), (12, 1, 1), (12, 2, 2), (12, 3, 2)]);
    assert!(b.find_matches().is_empty());
}

#[test]
fn l_shape_and_five_cell_groups_are_single_components() {
    let b = board_with(&[(10, 0, 3), (11, 0, 3), (12, 0, 3), (12, 1, 3)]);
    let m = b.find_matches();
    assert_eq!(m.len(), 1);
    assert_eq!(m[0].len(), 4);

    let b = board_with(&[(12, 0, 1), (12, 1, 1), (12, 2, 1), (12, 3, 1), (12, 4, 1)]);
    let m = b.find_matches();
    assert_eq!(m.len(), 1);
    assert_eq!(m[0].len(), 5);
}

#[test]
fn remove_matches_clears_cells_and_summarizes() {
    let mut b = board_with(&[
        (9, 0, 1),
        (10, 0, 1),
        (11, 0, 1),
        (12, 0, 1),
        (12, 2, 2),
        (12, 3, 2),
        (12, 4, 2),
        (12, 5, 2),
    ]);
    let groups = b.find_matches();
    assert_eq!(groups.len(), 2);

    let r = b.remove_matches(&groups);
    assert_eq!(r.removed, 8);
    assert_eq!(r.colors, vec![1, 2]);
    assert_eq!(r.group_sizes, vec![4, 4]);
    assert_eq!(b.occupied(), 0);
}

#[test]
fn single_link_chain_scores_forty() {
    let mut b = board_with(&[(9, 0, 1), (10, 0, 1), (11, 0, 1), (12, 0, 1)]);
    let links = b.resolve_chains();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].chain, 1);
    assert_eq!(links[0].score, 40);
    assert_eq!(b.occupied(), 0);
}

#[test]
fn cascaded_second_link_uses_chain_power() {
    // Four reds on top of three greens, one green on top: reds pop, the last green
    // falls onto the others and pops as link 2.
    let mut b = board_with(&[
        (12, 0, 2),
        (11, 0, 2),
        (10, 0, 2),
        (9, 0, 1),
        (8, 0, 1),
        (7, 0, 1),
        (6, 0, 1),
        (5, 0, 2),
    ]);
    let links = b.resolve_chains();
    assert_eq!(links.len(), 2);
    assert_eq!((links[0].chain, links[0].score), (1, 40));
    assert_eq!((links[1].chain, links[1].score), (2, 320));
    assert_eq!(b.occupied(), 0);
}

#[test]
fn resolve_on_stable_board_is_empty() {
    let mut b = PuyoBoard::new();
    assert!(b.resolve_chains().is_empty());

    let mut b = board_with(&[(12, 0, 1), (12, 1, 2)]);
    assert!(b.resolve_chains().is_empty());
    assert_eq!(b.occupied(), 2);
}

#[test]
fn chain_score_formula_applies_all_bonuses() {
    // 10 * 4 * max(1, 0)
    assert_eq!(chain_score(1, &[group(1, 4)]), 40);
    // group bonus for 5 cells: 10 * 5 * 2
    assert_eq!(chain_score(1, &[group(1, 5)]), 100);
    // two colors: 10 * 8 * 3
    assert_eq!(chain_score(1, &[group(1, 4), group(2, 4)]), 240);
    // same color twice: no color bonus, multiplier clamps to 1
    assert_eq!(chain_score(1, &[group(1, 4), group(1, 4)]), 80);
    // chain power grows with the link index
    assert!(chain_score(3, &[group(1, 4)]) > chain_score(2, &[group(1, 4)]));
}

#[test]
fn chain_score_tables_clamp_to_last_entry() {
    assert_eq!(chain_score(50, &[group(1, 4)]), 10 * 4 * 512);
    assert_eq!(chain_score(1, &[group(1, 30)]), 10 * 30 * 10);

    let b = PuyoBoard::new();
    assert_eq!(b.calc_chain_score(50, &[group(1, 4)]), 10 * 4 * 512);
}

#[test]
fn death_cell_decides_game_over() {
    assert!(!PuyoBoard::new().is_game_over());
    assert!(board_with(&[(0, 2, 1)]).is_game_over());
    assert!(!board_with(&[(0, 1, 1), (0, 3, 1)]).is_game_over());
}

#[test]
fn column_heights_use_topmost_cell() {
    let b = board_with(&[(12, 0, 1), (12, 3, 1), (5, 3, 2)]);
    assert_eq!(b.column_heights(), vec![1, 0, 0, 8, 0, 0]);
}

#[test]
fn clone_is_independent() {
    let a = board_with(&[(12, 0, 1)]);
    let mut b = a.clone();
    assert!(b.place(12, 1, 2));
    assert_eq!(a.cell(12, 1), 0);
    assert_eq!((a.cols(), a.rows()), (b.cols(), b.rows()));
}

proptest! {
    #[test]
    fn resolve_chains_reaches_stable_fixpoint(
        cells in prop::collection::vec(0u8..=PUYO_COLORS, PUYO_COLS * PUYO_ROWS),
    ) {
        let mut b = PuyoBoard::new();
        for (i, &color) in cells.iter().enumerate() {
            let r = (i / PUYO_COLS) as i32;
            let c = (i % PUYO_COLS) as i32;
            if color != 0 {
                b.place(r, c, color);
            }
        }
        let before = b.occupied();

        let links = b.resolve_chains();

        prop_assert!(b.find_matches().is_empty());
        prop_assert!(!b.apply_gravity());

        let removed: usize = links
            .iter()
            .flat_map(|l| l.groups.iter())
            .map(|g| g.len())
            .sum();
        prop_assert_eq!(b.occupied(), before - removed);

        for (i, l) in links.iter().enumerate() {
            prop_assert_eq!(l.chain as usize, i + 1);
            prop_assert!(l.score >= 40);
            prop_assert!(l.groups.iter().all(|g| g.len() >= 4));
        }
    }
}
