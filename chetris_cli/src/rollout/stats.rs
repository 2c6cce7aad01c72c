// chetris_cli/src/rollout/stats.rs
#![forbid(unsafe_code)]

use std::time::Instant;

use chetris_engine::engine::{compute_grid_features, Board, PuyoBoard};

/// Board shape sampled once per placement.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct BoardSample {
    pub max_h: u32,
    pub agg_h: u32,
    pub holes: u32,
    pub bump: u32,
}

impl BoardSample {
    pub fn from_tetris(board: &Board) -> Self {
        let f = compute_grid_features(board.grid());
        Self {
            max_h: f.max_h,
            agg_h: f.agg_h,
            holes: f.holes,
            bump: f.bump,
        }
    }

    /// Puyo columns never hold holes after gravity.
    pub fn from_puyo(board: &PuyoBoard) -> Self {
        let heights = board.column_heights();
        let bump = heights
            .windows(2)
            .map(|w| w[0].abs_diff(w[1]))
            .sum();
        Self {
            max_h: heights.iter().copied().max().unwrap_or(0),
            agg_h: heights.iter().sum(),
            holes: 0,
            bump,
        }
    }
}

#[derive(Clone, Debug)]
pub struct RolloutStats {
    pub episodes_finished: u64,
    pub ep_len: u64,
    pub episode_len_sum: u64,
    pub episode_len_max: u64,

    pub steps_done: u64,

    pub sum_max_h: f64,
    pub max_h_worst: u32,
    pub sum_agg_h: f64,
    pub sum_holes: f64,
    pub sum_bump: f64,

    /// Sum of per-step height change within an episode.
    pub sum_d_max_h: f64,

    /// Longest chain seen in a single settle (puyo only).
    pub best_chain: u32,
    /// Most lines cleared by a single lock (tetris only).
    pub best_clear: u32,
    /// Locks that cleared lines as a T-spin.
    pub tspins: u64,

    prev: Option<BoardSample>,
    t0: Instant,
}

impl Default for RolloutStats {
    fn default() -> Self {
        Self::new()
    }
}

impl RolloutStats {
    pub fn new() -> Self {
        Self {
            episodes_finished: 0,
            ep_len: 0,
            episode_len_sum: 0,
            episode_len_max: 0,
            steps_done: 0,
            sum_max_h: 0.0,
            max_h_worst: 0,
            sum_agg_h: 0.0,
            sum_holes: 0.0,
            sum_bump: 0.0,
            sum_d_max_h: 0.0,
            best_chain: 0,
            best_clear: 0,
            tspins: 0,
            prev: None,
            t0: Instant::now(),
        }
    }

    /// Call once per placement.
    pub fn on_step(&mut self, cur: BoardSample) {
        self.steps_done += 1;
        self.ep_len += 1;

        self.sum_max_h += cur.max_h as f64;
        self.max_h_worst = self.max_h_worst.max(cur.max_h);
        self.sum_agg_h += cur.agg_h as f64;
        self.sum_holes += cur.holes as f64;
        self.sum_bump += cur.bump as f64;

        if let Some(p) = self.prev {
            self.sum_d_max_h += cur.max_h as f64 - p.max_h as f64;
        }
        self.prev = Some(cur);
    }

    pub fn on_chain(&mut self, chain: u32) {
        self.best_chain = self.best_chain.max(chain);
    }

    pub fn on_lock(&mut self, cleared_lines: u32, tspin: bool) {
        self.best_clear = self.best_clear.max(cleared_lines);
        if tspin && cleared_lines > 0 {
            self.tspins += 1;
        }
    }

    /// Call when an episode terminates, before restarting the session.
    pub fn on_episode_end(&mut self) {
        self.episodes_finished += 1;
        self.episode_len_sum += self.ep_len;
        self.episode_len_max = self.episode_len_max.max(self.ep_len);

        self.ep_len = 0;
        self.prev = None;
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.t0.elapsed().as_secs_f64()
    }

    pub fn steps_per_sec(&self) -> f64 {
        let dt = self.elapsed_secs();
        if dt > 0.0 {
            self.steps_done as f64 / dt
        } else {
            0.0
        }
    }

    pub fn avg_ep_len(&self) -> f64 {
        if self.episodes_finished > 0 {
            self.episode_len_sum as f64 / self.episodes_finished as f64
        } else {
            0.0
        }
    }

    fn per_step(&self, total: f64) -> f64 {
        if self.steps_done > 0 {
            total / self.steps_done as f64
        } else {
            0.0
        }
    }

    pub fn avg_max_h(&self) -> f64 {
        self.per_step(self.sum_max_h)
    }

    pub fn avg_agg_h(&self) -> f64 {
        self.per_step(self.sum_agg_h)
    }

    pub fn avg_holes(&self) -> f64 {
        self.per_step(self.sum_holes)
    }

    pub fn avg_bump(&self) -> f64 {
        self.per_step(self.sum_bump)
    }

    pub fn avg_d_max_h(&self) -> f64 {
        self.per_step(self.sum_d_max_h)
    }

    pub fn clears_per_step(&self, live_total_clears: u64) -> f64 {
        self.per_step(live_total_clears as f64)
    }

    pub fn score_per_step(&self, live_total_score: u64) -> f64 {
        self.per_step(live_total_score as f64)
    }

    pub fn live_msg(&self, mode: &str, cps: f64, spscore: f64) -> String {
        format!(
            "mode={} sps={:.1} eps={} avg_ep={:.1} max_ep={} clears/step={:.3} score/step={:.2} maxH={} avgAgg={:.1} avgHol={:.2} avgBum={:.2} chain={}",
            mode,
            self.steps_per_sec(),
            self.episodes_finished,
            self.avg_ep_len(),
            self.episode_len_max,
            cps,
            spscore,
            self.max_h_worst,
            self.avg_agg_h(),
            self.avg_holes(),
            self.avg_bump(),
            self.best_chain,
        )
    }

    pub fn final_report(&self, header: ReportHeader, totals: Totals) -> FinalReport {
        FinalReport {
            header,
            steps_done: self.steps_done,
            elapsed_s: self.elapsed_secs(),
            steps_per_s: self.steps_per_sec(),
            episodes_finished: self.episodes_finished,
            avg_ep_len: self.avg_ep_len(),
            max_ep_len: self.episode_len_max,
            clears_per_step: self.clears_per_step(totals.clears),
            score_per_step: self.score_per_step(totals.score),
            max_h_worst: self.max_h_worst,
            avg_max_h: self.avg_max_h(),
            avg_holes: self.avg_holes(),
            avg_bump: self.avg_bump(),
            avg_d_max_h: self.avg_d_max_h(),
            best_chain: self.best_chain,
            best_clear: self.best_clear,
            tspins: self.tspins,
            total_score: totals.score,
            total_clears: totals.clears,
            last_ep_len: self.ep_len,
            last_game_over: totals.last_game_over,
        }
    }
}

/// Run identity carried into the final summary.
#[derive(Clone, Debug)]
pub struct ReportHeader {
    pub mode: String,
    pub policy: String,
    pub piece_rule: String,
}

/// Totals across finished episodes plus the one in progress.
#[derive(Clone, Copy, Debug, Default)]
pub struct Totals {
    pub score: u64,
    /// Lines for tetris, popped groups for puyo.
    pub clears: u64,
    pub last_game_over: bool,
}

#[derive(Clone, Debug)]
pub struct FinalReport {
    pub header: ReportHeader,

    pub steps_done: u64,
    pub elapsed_s: f64,
    pub steps_per_s: f64,

    pub episodes_finished: u64,
    pub avg_ep_len: f64,
    pub max_ep_len: u64,

    pub clears_per_step: f64,
    pub score_per_step: f64,

    pub max_h_worst: u32,
    pub avg_max_h: f64,
    pub avg_holes: f64,
    pub avg_bump: f64,
    pub avg_d_max_h: f64,

    pub best_chain: u32,
    pub best_clear: u32,
    pub tspins: u64,

    pub total_score: u64,
    pub total_clears: u64,

    pub last_ep_len: u64,
    pub last_game_over: bool,
}

impl FinalReport {
    /// One line, grep-friendly.
    pub fn summary_line(&self) -> String {
        format!(
            "DONE: mode={} policy={} piece_rule={} steps_done={} elapsed={:.3}s steps/s={:.1} episodes_finished={} avg_ep_len={:.2} max_ep_len={} clears/step={:.3} score/step={:.2} max_h_worst={} avg_max_h={:.2} avg_holes={:.2} avg_bump={:.2} avg_d_max_h={:.3} best_chain={} best_clear={} tspins={} total_score={} total_clears={} (last_ep_len={} last_game_over={})",
            self.header.mode,
            self.header.policy,
            self.header.piece_rule,
            self.steps_done,
            self.elapsed_s,
            self.steps_per_s,
            self.episodes_finished,
            self.avg_ep_len,
            self.max_ep_len,
            self.clears_per_step,
            self.score_per_step,
            self.max_h_worst,
            self.avg_max_h,
            self.avg_holes,
            self.avg_bump,
            self.avg_d_max_h,
            self.best_chain,
            self.best_clear,
            self.tspins,
            self.total_score,
            self.total_clears,
            self.last_ep_len,
            self.last_game_over,
        )
    }
}
