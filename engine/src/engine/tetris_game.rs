// engine/src/engine/tetris_game.rs
#![forbid(unsafe_code)]

use tracing::{debug, info};

use crate::engine::action::Action;
use crate::engine::constants::{
    COMBO_BONUS, LINES_PER_LEVEL, LINE_SCORES, LINE_SCORE_FALLBACK, TSPIN_SCORES,
    TSPIN_SCORE_FALLBACK,
};
use crate::engine::geometry::cells_at;
use crate::engine::grid::{ghost_y, Board};
use crate::engine::piece::{LastAction, Piece};
use crate::engine::piece_rule::{PieceRule, PieceRuleKind};
use crate::engine::pieces::{kicks, Kind};

/// Result of locking the active piece.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct LockOutcome {
    pub cleared_lines: u32,
    /// Pre-compaction indices of the cleared rows.
    pub cleared_rows: Vec<usize>,
    pub tspin: bool,
    /// Points this lock added (0 without a clear).
    pub points: u64,
    /// True iff this lock (or the spawn after it) ended the game.
    pub game_over: bool,
}

/// Headless Tetris session: board, spawn stream, active/next piece and counters.
#[derive(Clone, Debug)]
pub struct TetrisGame {
    board: Board,
    piece_rule: PieceRule,
    seed: u64,
    episode: u64,

    current: Option<Piece>,
    next: Kind,

    pub score: u64,
    pub lines: u64,
    pub combo: u64,
    pub level: u64,
    pub pieces: u64,
    pub game_over: bool,
}

impl TetrisGame {
    /// Default: 7-bag stream.
    pub fn new(seed: u64) -> Self {
        Self::new_with_rule(seed, PieceRuleKind::Bag7)
    }

    pub fn new_with_rule(seed: u64, rule_kind: PieceRuleKind) -> Self {
        Self::new_episode(seed, 0, rule_kind)
    }

    /// Session starting from a prepared board (garbage setups, fixtures).
    /// The stream is the same one `new_with_rule(seed, rule_kind)` would produce.
    pub fn with_board(seed: u64, rule_kind: PieceRuleKind, board: Board) -> Self {
        let mut g = Self::new_episode(seed, 0, rule_kind);
        let kind = g.current.map_or(g.next, |p| p.kind);
        g.board = board;
        g.game_over = false;
        g.spawn(kind);
        g
    }

    fn new_episode(seed: u64, episode: u64, rule_kind: PieceRuleKind) -> Self {
        let mut piece_rule = PieceRule::new(seed.wrapping_add(episode), rule_kind);
        let first = piece_rule.draw();
        let next = piece_rule.draw();

        let mut g = Self {
            board: Board::new(),
            piece_rule,
            seed,
            episode,
            current: None,
            next,
            score: 0,
            lines: 0,
            combo: 0,
            level: 1,
            pieces: 0,
            game_over: false,
        };
        g.spawn(first);
        g
    }

    /// Fresh board, counters and bag. The stream is reseeded with `seed + episode`
    /// so consecutive episodes differ but stay reproducible.
    pub fn restart(&mut self) {
        let episode = self.episode + 1;
        *self = Self::new_episode(self.seed, episode, self.piece_rule.kind());
        info!(episode, "tetris session restarted");
    }

    #[inline]
    pub fn episode(&self) -> u64 {
        self.episode
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Active piece; None once the game is over.
    #[inline]
    pub fn current(&self) -> Option<&Piece> {
        self.current.as_ref()
    }

    #[inline]
    pub fn next(&self) -> Kind {
        self.next
    }

    pub fn piece_rule_kind(&self) -> PieceRuleKind {
        self.piece_rule.kind()
    }

    /// Landing row of the active piece for ghost rendering.
    pub fn ghost_y(&self) -> Option<i32> {
        self.current.as_ref().map(|p| ghost_y(&self.board, p))
    }

    /// Applies one primitive action. Returns `Some` iff the action locked the piece.
    /// After game over every action is a no-op returning None.
    pub fn apply(&mut self, action: Action) -> Option<LockOutcome> {
        if self.game_over {
            return None;
        }

        match action {
            Action::RotateCw => {
                self.try_rotate(1);
                None
            }
            Action::RotateCcw => {
                self.try_rotate(3);
                None
            }
            Action::Left => {
                self.try_shift(-1, 0);
                None
            }
            Action::Right => {
                self.try_shift(1, 0);
                None
            }
            Action::Down => {
                if self.try_shift(0, 1) {
                    None
                } else {
                    Some(self.lock())
                }
            }
            Action::Drop => {
                let p = self.current.as_mut()?;
                p.y = ghost_y(&self.board, p);
                Some(self.lock())
            }
        }
    }

    fn try_shift(&mut self, dx: i32, dy: i32) -> bool {
        let Some(p) = self.current.as_mut() else {
            return false;
        };
        let mut moved = *p;
        moved.x += dx;
        moved.y += dy;
        if !self.board.is_valid(&moved.cells()) {
            return false;
        }
        moved.last_action = Some(LastAction::Move);
        *p = moved;
        true
    }

    /// `steps` quarter turns clockwise (1 = CW, 3 = CCW). First valid kick wins.
    fn try_rotate(&mut self, steps: u8) -> bool {
        let Some(p) = self.current.as_mut() else {
            return false;
        };
        let from = p.rotation;
        let to = (from + steps) % 4;
        let Some(table) = kicks(p.kind, from, to) else {
            return false;
        };

        for &(dx, dy) in table {
            let x = p.x + dx;
            let y = p.y - dy;
            if self.board.is_valid(&cells_at(p.kind, to, x, y)) {
                p.rotation = to;
                p.x = x;
                p.y = y;
                p.last_action = Some(LastAction::Rotate);
                return true;
            }
        }
        false
    }

    fn lock(&mut self) -> LockOutcome {
        let Some(piece) = self.current.take() else {
            return LockOutcome::default();
        };
        let cells = piece.cells();

        if cells.iter().any(|&(r, _)| r < 0) {
            self.finish("locked above the board");
            return LockOutcome {
                game_over: true,
                ..LockOutcome::default()
            };
        }

        let tspin = piece.last_action == Some(LastAction::Rotate) && self.board.check_tspin(&piece);

        self.board.place(&cells, piece.kind.idx());
        let clear = self.board.clear_lines();
        self.pieces += 1;

        let mut points = 0u64;
        if clear.count > 0 {
            let n = clear.count as usize;
            let base = if tspin {
                TSPIN_SCORES.get(n).copied().unwrap_or(TSPIN_SCORE_FALLBACK)
            } else {
                LINE_SCORES.get(n).copied().unwrap_or(LINE_SCORE_FALLBACK)
            };
            self.combo += 1;
            points = (base + self.combo * COMBO_BONUS) * self.level;
            self.score += points;
            self.lines += clear.count as u64;
            self.level = self.lines / LINES_PER_LEVEL + 1;
            debug!(
                lines = clear.count,
                tspin,
                combo = self.combo,
                points,
                "lines cleared"
            );
        } else {
            self.combo = 0;
        }

        let next = self.next;
        self.next = self.piece_rule.draw();
        self.spawn(next);

        LockOutcome {
            cleared_lines: clear.count,
            cleared_rows: clear.rows,
            tspin,
            points,
            game_over: self.game_over,
        }
    }

    fn spawn(&mut self, kind: Kind) {
        let piece = Piece::spawn(kind);
        if self.board.is_valid(&piece.cells()) {
            self.current = Some(piece);
        } else {
            self.current = None;
            self.finish("spawn blocked");
        }
    }

    fn finish(&mut self, reason: &'static str) {
        self.game_over = true;
        self.current = None;
        info!(
            reason,
            score = self.score,
            lines = self.lines,
            pieces = self.pieces,
            "tetris game over"
        );
    }
}
