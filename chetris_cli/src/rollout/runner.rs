// chetris_cli/src/rollout/runner.rs
#![forbid(unsafe_code)]

use std::time::Duration;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, trace};

use chetris_engine::engine::{
    piece_cells, preview_mask_4x4, Action, PieceRuleKind, PuyoGame, SettleOutcome, TetrisGame,
};
use chetris_engine::policy::{build_move_queue, build_pair_move_queue, PairPolicy, Policy};

use super::stats::{BoardSample, FinalReport, ReportHeader, RolloutStats, Totals};

/// Fixed internal cadence for progress-bar live message updates.
const LIVE_EVERY: u64 = 200;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Mode {
    Tetris,
    Puyo,
}

impl Mode {
    pub fn name(self) -> &'static str {
        match self {
            Mode::Tetris => "tetris",
            Mode::Puyo => "puyo",
        }
    }
}

#[derive(Clone, Debug)]
pub struct RunnerConfig {
    // ---------------- core rollout ----------------
    pub mode: Mode,
    /// Total placements (pieces or pairs) across episodes.
    pub steps: u64,
    /// Session seed; restarts reseed with seed + episode.
    pub base_seed: u64,
    /// Tetris spawn stream; ignored for puyo.
    pub rule_kind: PieceRuleKind,

    /// Used only for the final report string.
    pub policy_name: String,

    // ---------------- output ----------------
    /// 0 = final summary only
    /// 1 = progress bar
    /// 2 = progress bar + periodic report line
    pub verbosity: u8,

    /// Print a report line every N steps (verbosity 2 only). 0 disables it.
    pub report_every: u64,

    // ---------------- rendering ----------------
    /// If Some(ms): render after every placement and sleep ms (0 = no sleep).
    pub render_ms: Option<u64>,
}

impl RunnerConfig {
    fn header(&self) -> ReportHeader {
        ReportHeader {
            mode: self.mode.name().to_string(),
            policy: self.policy_name.clone(),
            piece_rule: match self.mode {
                Mode::Tetris => format!("{:?}", self.rule_kind),
                Mode::Puyo => "pairs".to_string(),
            },
        }
    }
}

pub struct Runner {
    cfg: RunnerConfig,
}

/// Applies queued actions until the piece locks or the pair settles.
/// A queue that runs dry without landing is finished by a hard drop.
fn drive<O>(queue: Vec<Action>, mut apply: impl FnMut(Action) -> Option<O>) -> Option<O> {
    for a in queue {
        trace!(action = a.name(), "apply");
        if let Some(out) = apply(a) {
            return Some(out);
        }
    }
    apply(Action::Drop)
}

fn rotate_pair(game: &mut PuyoGame, action: Action) -> bool {
    let before = game.current().map(|p| p.rotation);
    game.apply(action);
    game.current().map(|p| p.rotation) != before
}

/// Pair variant of `drive`. A quarter turn blocked at the spawn column is
/// deferred and retried after every later step, so the pair can turn once it
/// has shifted next to a tall column.
pub(crate) fn drive_pair(game: &mut PuyoGame, queue: Vec<Action>) -> Option<SettleOutcome> {
    let mut deferred: Vec<Action> = Vec::new();
    for a in queue {
        trace!(action = a.name(), deferred = deferred.len(), "apply");
        match a {
            Action::RotateCw | Action::RotateCcw => {
                if !deferred.is_empty() || !rotate_pair(game, a) {
                    deferred.push(a);
                }
            }
            _ => {
                while let Some(&turn) = deferred.first() {
                    if !rotate_pair(game, turn) {
                        break;
                    }
                    deferred.remove(0);
                }
                if let Some(out) = game.apply(a) {
                    return Some(out);
                }
            }
        }
    }
    game.apply(Action::Drop)
}

pub fn render_tetris(game: &TetrisGame) -> String {
    let mut board = game.board().clone();
    if let Some(p) = game.current() {
        board.place(&piece_cells(p), p.kind.idx());
    }

    let next = game.next();
    let mut s = board.render_ascii();
    if let Some(gy) = game.ghost_y() {
        s.push_str(&format!("ghost_y={gy}\n"));
    }
    s.push_str("next:\n");
    for row in preview_mask_4x4(next, 0, 1) {
        s.push(' ');
        for v in row {
            s.push(if v != 0 { next.glyph() } else { '.' });
        }
        s.push('\n');
    }
    s.push_str(&format!(
        "score={} lines={} level={} combo={} pieces={}\n",
        game.score, game.lines, game.level, game.combo, game.pieces
    ));
    s
}

pub fn render_puyo(game: &PuyoGame) -> String {
    let mut board = game.board().clone();
    if let Some(pair) = game.current() {
        board.place_pair(pair);
    }

    let next = game.next();
    let mut s = board.render_ascii();
    s.push_str(&format!(
        "next=({}, {}) score={} chain={} max_chain={} pairs={}\n",
        next.main, next.sub, game.score, game.chain_count, game.max_chain, game.pairs
    ));
    s
}

fn progress_bar(cfg: &RunnerConfig) -> Result<Option<ProgressBar>> {
    if cfg.verbosity == 0 {
        return Ok(None);
    }
    let pb = ProgressBar::new(cfg.steps);
    pb.set_style(
        ProgressStyle::with_template(
            "{bar:40.cyan/blue} {pos:>9}/{len:<9}  {percent:>3}%  {elapsed_precise}  {msg}",
        )?
        .progress_chars("=>-"),
    );
    Ok(Some(pb))
}

impl Runner {
    pub fn new(cfg: RunnerConfig) -> Self {
        Self { cfg }
    }

    /// Per-step reporting shared by both modes.
    fn after_step(
        &self,
        stats: &RolloutStats,
        pb: Option<&ProgressBar>,
        live: Totals,
        frame: impl FnOnce() -> String,
    ) {
        let cfg = &self.cfg;

        if let Some(pb) = pb {
            pb.inc(1);
        }

        if let Some(ms) = cfg.render_ms {
            println!("step={} score={}", stats.steps_done, live.score);
            print!("{}", frame());
            if ms > 0 {
                std::thread::sleep(Duration::from_millis(ms));
            }
        }

        if cfg.verbosity == 2 && cfg.report_every > 0 && stats.steps_done % cfg.report_every == 0
        {
            let line = format!(
                "{:>9}/{:<9} sps={:>9.1} eps={:>5} avg_ep={:>8.2} max_ep={:>6} c/step={:.3} s/step={:.2} maxH={:>2} avgMaxH={:.2} avgHol={:.2} avgBum={:.2} dMaxH={:+.3} chain={}",
                stats.steps_done,
                cfg.steps,
                stats.steps_per_sec(),
                stats.episodes_finished,
                stats.avg_ep_len(),
                stats.episode_len_max,
                stats.clears_per_step(live.clears),
                stats.score_per_step(live.score),
                stats.max_h_worst,
                stats.avg_max_h(),
                stats.avg_holes(),
                stats.avg_bump(),
                stats.avg_d_max_h(),
                stats.best_chain,
            );
            match pb {
                Some(pb) => pb.println(line),
                None => println!("{line}"),
            }
        }

        if stats.steps_done % LIVE_EVERY == 0 {
            if let Some(pb) = pb {
                let msg = stats.live_msg(
                    cfg.mode.name(),
                    stats.clears_per_step(live.clears),
                    stats.score_per_step(live.score),
                );
                pb.set_message(msg);
            }
        }
    }

    pub fn run_tetris(&self, policy: &mut dyn Policy) -> Result<FinalReport> {
        let cfg = &self.cfg;
        let pb = progress_bar(cfg)?;
        let mut stats = RolloutStats::new();

        let mut game = TetrisGame::new_with_rule(cfg.base_seed, cfg.rule_kind);
        let mut finished = Totals::default();
        info!(
            seed = cfg.base_seed,
            rule = ?game.piece_rule_kind(),
            steps = cfg.steps,
            "tetris rollout started"
        );

        if cfg.render_ms.is_some() {
            print!("{}", render_tetris(&game));
        }

        while stats.steps_done < cfg.steps {
            if game.game_over {
                stats.on_episode_end();
                finished.score += game.score;
                finished.clears += game.lines;
                debug!(
                    episode = game.episode(),
                    score = game.score,
                    lines = game.lines,
                    pieces = game.pieces,
                    "episode finished"
                );

                game.restart();
                if cfg.render_ms.is_some() {
                    println!(
                        "=== reset: episodes_finished={} avg_ep_len={:.2} max_ep_len={} ===",
                        stats.episodes_finished,
                        stats.avg_ep_len(),
                        stats.episode_len_max
                    );
                    print!("{}", render_tetris(&game));
                }
                continue;
            }

            let piece = match game.current().copied() {
                Some(p) => p,
                None => {
                    game.game_over = true;
                    continue;
                }
            };

            let queue = match policy.choose_move(game.board(), &piece) {
                Some(m) => build_move_queue(&piece, &m),
                None => vec![Action::Drop],
            };
            if let Some(out) = drive(queue, |a| game.apply(a)) {
                stats.on_lock(out.cleared_lines, out.tspin);
            }

            stats.on_step(BoardSample::from_tetris(game.board()));

            let live = Totals {
                score: finished.score + game.score,
                clears: finished.clears + game.lines,
                last_game_over: game.game_over,
            };
            self.after_step(&stats, pb.as_ref(), live, || render_tetris(&game));
        }

        if let Some(pb) = pb {
            pb.finish_with_message("done");
        }

        let totals = Totals {
            score: finished.score + game.score,
            clears: finished.clears + game.lines,
            last_game_over: game.game_over,
        };
        Ok(stats.final_report(cfg.header(), totals))
    }

    pub fn run_puyo(&self, policy: &mut dyn PairPolicy) -> Result<FinalReport> {
        let cfg = &self.cfg;
        let pb = progress_bar(cfg)?;
        let mut stats = RolloutStats::new();

        let mut game = PuyoGame::new(cfg.base_seed);
        let mut finished = Totals::default();
        // Popped groups in the running episode.
        let mut ep_groups: u64 = 0;
        info!(seed = cfg.base_seed, steps = cfg.steps, "puyo rollout started");

        if cfg.render_ms.is_some() {
            print!("{}", render_puyo(&game));
        }

        while stats.steps_done < cfg.steps {
            if game.game_over {
                stats.on_episode_end();
                finished.score += game.score;
                finished.clears += ep_groups;
                debug!(
                    episode = game.episode(),
                    score = game.score,
                    max_chain = game.max_chain,
                    pairs = game.pairs,
                    "episode finished"
                );

                ep_groups = 0;
                game.restart();
                if cfg.render_ms.is_some() {
                    println!(
                        "=== reset: episodes_finished={} avg_ep_len={:.2} max_ep_len={} ===",
                        stats.episodes_finished,
                        stats.avg_ep_len(),
                        stats.episode_len_max
                    );
                    print!("{}", render_puyo(&game));
                }
                continue;
            }

            let pair = match game.current().copied() {
                Some(p) => p,
                None => {
                    game.game_over = true;
                    continue;
                }
            };
            let next = game.next();

            let queue = match policy.choose_move(game.board(), &pair, Some(&next)) {
                Some(m) => build_pair_move_queue(&pair, &m),
                None => vec![Action::Drop],
            };
            if let Some(out) = drive_pair(&mut game, queue) {
                stats.on_chain(out.chain_count());
                ep_groups += out.links.iter().map(|l| l.groups.len() as u64).sum::<u64>();
            }

            stats.on_step(BoardSample::from_puyo(game.board()));

            let live = Totals {
                score: finished.score + game.score,
                clears: finished.clears + ep_groups,
                last_game_over: game.game_over,
            };
            self.after_step(&stats, pb.as_ref(), live, || render_puyo(&game));
        }

        if let Some(pb) = pb {
            pb.finish_with_message("done");
        }

        let totals = Totals {
            score: finished.score + game.score,
            clears: finished.clears + ep_groups,
            last_game_over: game.game_over,
        };
        Ok(stats.final_report(cfg.header(), totals))
    }
}
