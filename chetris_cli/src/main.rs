// chetris_cli/src/main.rs
#![forbid(unsafe_code)]

mod rollout;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::prelude::*;

use crate::rollout::{Mode, Runner, RunnerConfig};
use chetris_engine::engine::PieceRuleKind;
use chetris_engine::policy::{HeuristicPolicy, PairPolicy, PairSearch, Policy, RandomPolicy};
use chetris_engine::WeightsConfig;

#[derive(Parser, Debug)]
#[command(name = "chetris_cli", about = "Headless autoplay for the tetris and puyo engines")]
struct Args {
    // ---------------- rollout sizing ----------------
    /// Game variant: tetris | puyo
    #[arg(long, default_value = "tetris")]
    mode: String,

    /// Total placements to execute across episodes.
    #[arg(long, default_value_t = 200)]
    steps: u64,

    /// Session seed (restarts use seed + episode). If omitted, a fixed default is used.
    #[arg(long)]
    seed: Option<u64>,

    /// Policy: heuristic | random
    #[arg(long, default_value = "heuristic")]
    policy: String,

    /// Piece rule for tetris: bag7 | uniform
    #[arg(long, default_value = "bag7")]
    piece_rule: String,

    /// JSON file with search weights; missing sections keep the tuned defaults.
    #[arg(long, value_name = "json")]
    weights: Option<PathBuf>,

    // ---------------- visualization ----------------
    /**
     * Render board as ASCII every step; value is sleep in ms (e.g. 30). Omit to disable rendering.
     * Examples:
     *   --render 0    (render as fast as possible)
     *   --render 30   (sleep 30ms between frames)
     */
    #[arg(long, value_name = "ms")]
    render: Option<u64>,

    // ---------------- output / reporting ----------------
    /// Verbosity: 0=silent (final summary only), 1=progress bar, 2=progress bar + periodic report.
    #[arg(long, default_value_t = 1)]
    verbosity: u8,

    /// Print a report line every N steps (only used with --verbosity 2).
    #[arg(long, default_value_t = 2000)]
    report_every: u64,

    /// Log level: -v = INFO, -vv = DEBUG, -vvv = TRACE (default WARN).
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,
}

fn parse_mode(s: &str) -> Result<Mode> {
    match s.to_lowercase().as_str() {
        "tetris" => Ok(Mode::Tetris),
        "puyo" => Ok(Mode::Puyo),
        other => bail!("unknown --mode {other:?} (expected tetris | puyo)"),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(tracing_subscriber::filter::LevelFilter::from_level(level))
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mode = parse_mode(&args.mode)?;
    let base_seed = args.seed.unwrap_or(12345);
    let rule_kind = PieceRuleKind::from_cli(&args.piece_rule);
    // Search tie-breaks draw from their own stream.
    let policy_seed = base_seed.wrapping_add(999);

    let weights = match &args.weights {
        Some(path) => {
            let cfg = WeightsConfig::from_path(path)
                .with_context(|| format!("loading weights from {}", path.display()))?;
            info!(path = %path.display(), "weights loaded");
            cfg
        }
        None => WeightsConfig::default(),
    };

    let cfg = RunnerConfig {
        mode,
        steps: args.steps,
        base_seed,
        rule_kind,
        policy_name: args.policy.clone(),
        verbosity: args.verbosity,
        report_every: args.report_every,
        render_ms: args.render,
    };
    let runner = Runner::new(cfg);

    let report = match mode {
        Mode::Tetris => {
            let mut policy: Box<dyn Policy> = match args.policy.as_str() {
                "heuristic" => Box::new(HeuristicPolicy::new(weights.tetris, policy_seed)?),
                "random" => Box::new(RandomPolicy::new(policy_seed)),
                other => bail!("unknown --policy {other:?} (expected heuristic | random)"),
            };
            runner.run_tetris(&mut *policy)?
        }
        Mode::Puyo => {
            let mut policy: Box<dyn PairPolicy> = match args.policy.as_str() {
                "heuristic" => Box::new(PairSearch::new(
                    weights.puyo,
                    weights.lookahead,
                    policy_seed,
                )?),
                "random" => Box::new(RandomPolicy::new(policy_seed)),
                other => bail!("unknown --policy {other:?} (expected heuristic | random)"),
            };
            runner.run_puyo(&mut *policy)?
        }
    };

    println!("{}", report.summary_line());
    Ok(())
}
