// engine/src/engine/puyo_board.rs
#![forbid(unsafe_code)]

use crate::engine::constants::{
    table_lookup, CHAIN_POWER, COLOR_BONUS, DEATH_COL, DEATH_ROW, GROUP_BONUS, PAIR_OFFSETS,
    POP_SIZE, PUYO_COLORS, PUYO_COLS, PUYO_ROWS,
};

/// Colors of a pair: `main` pivots, `sub` orbits it.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PairColors {
    pub main: u8,
    pub sub: u8,
}

impl PairColors {
    pub fn new(main: u8, sub: u8) -> Self {
        Self { main, sub }
    }
}

/// Falling two-cell piece. `row`/`col` locate the main cell; `rotation` picks the sub offset.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Pair {
    pub row: i32,
    pub col: i32,
    pub rotation: u8,
    pub colors: PairColors,
}

impl Pair {
    pub fn new(row: i32, col: i32, rotation: u8, colors: PairColors) -> Self {
        Self {
            row,
            col,
            rotation: rotation % 4,
            colors,
        }
    }

    #[inline]
    pub fn sub_offset(rotation: u8) -> (i32, i32) {
        PAIR_OFFSETS[(rotation % 4) as usize]
    }

    #[inline]
    pub fn sub_pos(&self) -> (i32, i32) {
        let (dr, dc) = Self::sub_offset(self.rotation);
        (self.row + dr, self.col + dc)
    }
}

/// One explicit cell write.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Puyo {
    pub row: i32,
    pub col: i32,
    pub color: u8,
}

/// Maximal 4-connected same-color component.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MatchGroup {
    pub color: u8,
    pub cells: Vec<(usize, usize)>,
}

impl MatchGroup {
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Summary of one `remove_matches` call (feeds scoring and effects).
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Removal {
    pub removed: u32,
    /// Distinct colors, first-seen order.
    pub colors: Vec<u8>,
    pub group_sizes: Vec<usize>,
}

/// One round of a chain resolution.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ChainLink {
    /// 1-based link index.
    pub chain: u32,
    pub groups: Vec<MatchGroup>,
    pub score: u64,
}

const DIRS: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Puyo playfield: `rows x cols`, row 0 at the top (hidden spawn row), 0 = empty.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PuyoBoard {
    cols: usize,
    rows: usize,
    cells: Vec<u8>,
}

impl Default for PuyoBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl PuyoBoard {
    /// Standard 6 x (12 + 1 hidden) board.
    pub fn new() -> Self {
        Self::with_size(PUYO_COLS, PUYO_ROWS)
    }

    pub fn with_size(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            rows,
            cells: vec![0u8; cols * rows],
        }
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    fn at(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    #[inline]
    fn in_bounds(&self, row: i32, col: i32) -> bool {
        row >= 0 && (row as usize) < self.rows && col >= 0 && (col as usize) < self.cols
    }

    /// Caller must stay in bounds.
    #[inline]
    pub fn cell(&self, row: usize, col: usize) -> u8 {
        self.cells[self.at(row, col)]
    }

    pub fn row(&self, row: usize) -> &[u8] {
        let start = self.at(row, 0);
        &self.cells[start..start + self.cols]
    }

    pub fn is_valid(&self, row: i32, col: i32) -> bool {
        self.in_bounds(row, col) && self.cells[self.at(row as usize, col as usize)] == 0
    }

    /// Writes `color` iff the cell is in bounds and `color` is in `1..=PUYO_COLORS`.
    /// Overwrites occupied cells; use `is_valid` first when that matters.
    pub fn place(&mut self, row: i32, col: i32, color: u8) -> bool {
        if !self.in_bounds(row, col) || !(1..=PUYO_COLORS).contains(&color) {
            return false;
        }
        let i = self.at(row as usize, col as usize);
        self.cells[i] = color;
        true
    }

    /// Places both cells of `pair` (sub located by rotation offset), or neither.
    pub fn place_pair(&mut self, pair: &Pair) -> bool {
        let (sub_row, sub_col) = pair.sub_pos();
        self.place_cells(
            Puyo {
                row: pair.row,
                col: pair.col,
                color: pair.colors.main,
            },
            Puyo {
                row: sub_row,
                col: sub_col,
                color: pair.colors.sub,
            },
        )
    }

    /// Places two explicitly located cells, or neither.
    pub fn place_cells(&mut self, main: Puyo, sub: Puyo) -> bool {
        let color_ok = |c: u8| (1..=PUYO_COLORS).contains(&c);
        if (main.row, main.col) == (sub.row, sub.col)
            || !self.is_valid(main.row, main.col)
            || !self.is_valid(sub.row, sub.col)
            || !color_ok(main.color)
            || !color_ok(sub.color)
        {
            return false;
        }
        self.place(main.row, main.col, main.color);
        self.place(sub.row, sub.col, sub.color);
        true
    }

    /// Per column, drop every occupied cell to the floor keeping its order.
    /// Returns whether anything moved.
    pub fn apply_gravity(&mut self) -> bool {
        let mut moved = false;
        for c in 0..self.cols {
            let mut write = self.rows;
            for r in (0..self.rows).rev() {
                let v = self.cells[self.at(r, c)];
                if v == 0 {
                    continue;
                }
                write -= 1;
                if r != write {
                    let dst = self.at(write, c);
                    let src = self.at(r, c);
                    self.cells[dst] = v;
                    self.cells[src] = 0;
                    moved = true;
                }
            }
        }
        moved
    }

    /// Every 4-connected same-color component, any size, in row-major discovery order.
    pub fn connected_groups(&self) -> Vec<MatchGroup> {
        let mut groups = Vec::new();
        let mut visited = vec![false; self.cells.len()];
        let mut queue: Vec<(usize, usize)> = Vec::new();

        for r in 0..self.rows {
            for c in 0..self.cols {
                let color = self.cell(r, c);
                if color == 0 || visited[self.at(r, c)] {
                    continue;
                }

                queue.clear();
                queue.push((r, c));
                visited[self.at(r, c)] = true;

                let mut head = 0;
                while head < queue.len() {
                    let (cr, cc) = queue[head];
                    head += 1;
                    for (dr, dc) in DIRS {
                        let nr = cr as i32 + dr;
                        let nc = cc as i32 + dc;
                        if !self.in_bounds(nr, nc) {
                            continue;
                        }
                        let (nr, nc) = (nr as usize, nc as usize);
                        let ni = self.at(nr, nc);
                        if visited[ni] || self.cells[ni] != color {
                            continue;
                        }
                        visited[ni] = true;
                        queue.push((nr, nc));
                    }
                }

                groups.push(MatchGroup {
                    color,
                    cells: queue.clone(),
                });
            }
        }

        groups
    }

    /// Components of at least `POP_SIZE` cells.
    pub fn find_matches(&self) -> Vec<MatchGroup> {
        self.connected_groups()
            .into_iter()
            .filter(|g| g.len() >= POP_SIZE)
            .collect()
    }

    pub fn remove_matches(&mut self, groups: &[MatchGroup]) -> Removal {
        let mut out = Removal::default();
        for g in groups {
            if !out.colors.contains(&g.color) {
                out.colors.push(g.color);
            }
            out.group_sizes.push(g.len());
            for &(r, c) in &g.cells {
                if r >= self.rows || c >= self.cols {
                    continue;
                }
                let i = self.at(r, c);
                if self.cells[i] != 0 {
                    self.cells[i] = 0;
                    out.removed += 1;
                }
            }
        }
        out
    }

    /// Gravity, match, score, remove; repeated until nothing matches.
    /// On a board with no pending matches this returns an empty list (after gravity).
    pub fn resolve_chains(&mut self) -> Vec<ChainLink> {
        let mut links = Vec::new();
        let mut chain = 0u32;

        loop {
            self.apply_gravity();
            let groups = self.find_matches();
            if groups.is_empty() {
                break;
            }

            chain += 1;
            let score = chain_score(chain, &groups);
            self.remove_matches(&groups);
            links.push(ChainLink {
                chain,
                groups,
                score,
            });
        }

        links
    }

    pub fn calc_chain_score(&self, chain: u32, groups: &[MatchGroup]) -> u64 {
        chain_score(chain, groups)
    }

    /// True iff the death cell is occupied.
    pub fn is_game_over(&self) -> bool {
        DEATH_ROW < self.rows && DEATH_COL < self.cols && self.cell(DEATH_ROW, DEATH_COL) != 0
    }

    /// Per column, `rows - r` of the topmost occupied cell (0 if empty).
    pub fn column_heights(&self) -> Vec<u32> {
        (0..self.cols)
            .map(|c| {
                (0..self.rows)
                    .find(|&r| self.cell(r, c) != 0)
                    .map_or(0, |r| (self.rows - r) as u32)
            })
            .collect()
    }

    pub fn occupied(&self) -> usize {
        self.cells.iter().filter(|&&v| v != 0).count()
    }

    pub fn render_ascii(&self) -> String {
        let mut s = String::new();
        s.push('+');
        s.push_str(&"-".repeat(self.cols));
        s.push_str("+\n");
        for r in 0..self.rows {
            s.push('|');
            for &v in self.row(r) {
                s.push(match v {
                    0 => ' ',
                    1 => 'R',
                    2 => 'G',
                    3 => 'B',
                    4 => 'Y',
                    _ => '#',
                });
            }
            s.push_str("|\n");
        }
        s.push('+');
        s.push_str(&"-".repeat(self.cols));
        s.push_str("+\n");
        s
    }
}

/// `10 * removed * max(1, chain_power + group_bonus + color_bonus)`, tables clamped.
pub fn chain_score(chain: u32, groups: &[MatchGroup]) -> u64 {
    let mut total_removed = 0u64;
    let mut group_bonus = 0u64;
    let mut colors: Vec<u8> = Vec::new();

    for g in groups {
        total_removed += g.len() as u64;
        group_bonus += table_lookup(&GROUP_BONUS, g.len());
        if !colors.contains(&g.color) {
            colors.push(g.color);
        }
    }

    let chain_power = table_lookup(&CHAIN_POWER, chain as usize);
    let color_bonus = table_lookup(&COLOR_BONUS, colors.len());

    let multiplier = (chain_power + group_bonus + color_bonus).max(1);
    10 * total_removed * multiplier
}
