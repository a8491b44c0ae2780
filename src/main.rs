use clap::Parser;
use tactix::env::{EnvConfig, TacTixEnv};
use tactix::play::play_game_with;
use tactix::search::{AgentKind, DEFAULT_DEPTH};

#[derive(Debug, Parser)]
#[command(name = "tactix", about = "Play one TacTix game between two agents")]
struct Args {
    /// Board side length (1..=8)
    #[arg(long, default_value_t = tactix::engine::DEFAULT_SIZE)]
    size: usize,

    /// Last mover loses
    #[arg(long)]
    misere: bool,

    /// Print the board after every move
    #[arg(long)]
    render: bool,

    /// Agent moving first
    #[arg(long, value_enum, default_value_t = AgentKind::Minimax)]
    agent1: AgentKind,

    /// Agent moving second
    #[arg(long, value_enum, default_value_t = AgentKind::Expectimax)]
    agent2: AgentKind,

    /// Search depth for agent 1
    #[arg(long, default_value_t = DEFAULT_DEPTH)]
    depth1: u32,

    /// Search depth for agent 2
    #[arg(long, default_value_t = DEFAULT_DEPTH)]
    depth2: u32,

    /// Seed for random agents
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let config = EnvConfig { board_size: args.size, misere: args.misere, render: args.render };
    let mut env = TacTixEnv::new(config)?;
    let mut agent1 = args.agent1.build(args.depth1, args.seed)?;
    let mut agent2 = args.agent2.build(args.depth2, args.seed.wrapping_add(1))?;

    if config.render {
        println!("{}", env.board());
    }
    let record = play_game_with(&mut env, agent1.as_mut(), agent2.as_mut(), |mv, step| {
        if config.render {
            println!("{:?} played {}\n{}", step.observation.current_player.other(), mv, step.observation.board);
        }
    })?;

    let rules = if config.misere { "misère" } else { "normal" };
    println!(
        "{:?} ({}) wins after {} moves ({} rules, {:.3}s)",
        record.winner,
        if record.winner.index() == 0 { &record.meta.agent1 } else { &record.meta.agent2 },
        record.moves.len(),
        rules,
        record.meta.elapsed_s
    );
    Ok(())
}
