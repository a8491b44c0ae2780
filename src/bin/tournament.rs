use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::ThreadPoolBuilder;
use tactix::env::EnvConfig;
use tactix::play::{play_games, TournamentResults};
use tactix::search::{AgentKind, DEFAULT_DEPTH};

#[derive(Debug, Parser)]
#[command(name = "tournament", about = "Run many TacTix games between two agents in parallel")]
struct Args {
    /// Number of games to play
    #[arg(long, default_value_t = 100)]
    games: usize,

    /// Board side length (1..=8)
    #[arg(long, default_value_t = tactix::engine::DEFAULT_SIZE)]
    size: usize,

    /// Last mover loses
    #[arg(long)]
    misere: bool,

    /// Agent moving first in every game
    #[arg(long, value_enum, default_value_t = AgentKind::Minimax)]
    agent1: AgentKind,

    /// Agent moving second in every game
    #[arg(long, value_enum, default_value_t = AgentKind::Random)]
    agent2: AgentKind,

    /// Search depth for agent 1
    #[arg(long, default_value_t = DEFAULT_DEPTH)]
    depth1: u32,

    /// Search depth for agent 2
    #[arg(long, default_value_t = DEFAULT_DEPTH)]
    depth2: u32,

    /// Base seed; random agents use `seed + game index`
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Worker threads (defaults to rayon's choice)
    #[arg(long)]
    threads: Option<usize>,

    /// Write one postcard record per game into this directory
    #[arg(long)]
    out: Option<PathBuf>,

    /// Suppress the progress bar
    #[arg(long)]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    if let Some(n) = args.threads {
        ThreadPoolBuilder::new().num_threads(n).build_global()?;
    }
    let config = EnvConfig { board_size: args.size, misere: args.misere, render: false };

    let pb = if args.quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new(args.games as u64);
        pb.set_style(
            ProgressStyle::with_template("{spinner} {elapsed_precise} [{bar:40}] {pos}/{len} games | {msg}")?
                .progress_chars("=> "),
        );
        pb.enable_steady_tick(Duration::from_millis(120));
        pb
    };
    let tally = Mutex::new(TournamentResults::default());

    let (seed, depth1, depth2) = (args.seed, args.depth1, args.depth2);
    let records = play_games(
        config,
        args.games,
        |g| args.agent1.build(depth1, seed.wrapping_add(g as u64)),
        |g| args.agent2.build(depth2, seed.wrapping_add(g as u64).wrapping_add(1 << 32)),
        |record| {
            let mut t = tally.lock().unwrap_or_else(|e| e.into_inner());
            t.record(record.winner);
            pb.set_message(format!("agent1 {} / agent2 {}", t.agent1_wins, t.agent2_wins));
            pb.inc(1);
        },
    )?;
    pb.finish_and_clear();

    let results = TournamentResults::from_records(&records);
    println!(
        "{:?} (agent 1) vs {:?} (agent 2) on {}x{} ({}): {} - {}",
        args.agent1,
        args.agent2,
        args.size,
        args.size,
        if args.misere { "misère" } else { "normal" },
        results.agent1_wins,
        results.agent2_wins
    );

    if let Some(dir) = args.out {
        fs::create_dir_all(&dir)?;
        for (i, record) in records.iter().enumerate() {
            record.write_to_path(dir.join(format!("game-{:05}.tactix", i)))?;
        }
        eprintln!("Wrote {} records to {}", records.len(), dir.display());
    }
    Ok(())
}
