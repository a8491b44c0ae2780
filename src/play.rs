//! Turn loop and tournaments between two agents.
//!
//! Agent 1 always moves first as [`Player::P1`]. Independent games share no
//! state, so [`play_games`] runs them on the rayon pool.

use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::engine::Move;
use crate::env::{EnvConfig, EnvError, Player, Step, TacTixEnv};
use crate::record::{now_unix_seconds, GameRecord, Meta};
use crate::search::{Agent, AgentError};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PlayError {
    #[error("agent failed: {0}")]
    Agent(#[from] AgentError),
    #[error("environment rejected a move: {0}")]
    Env(#[from] EnvError),
}

/// Win tallies for a series of games.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentResults {
    pub agent1_wins: u32,
    pub agent2_wins: u32,
}

impl TournamentResults {
    pub fn record(&mut self, winner: Player) {
        match winner {
            Player::P1 => self.agent1_wins += 1,
            Player::P2 => self.agent2_wins += 1,
        }
    }

    pub fn from_records(records: &[GameRecord]) -> Self {
        records.iter().fold(Self::default(), |mut acc, r| {
            acc.record(r.winner);
            acc
        })
    }

    #[inline]
    pub fn games(&self) -> u32 { self.agent1_wins + self.agent2_wins }
}

/// Play one game from a reset board to the end.
pub fn play_game(env: &mut TacTixEnv, agent1: &mut dyn Agent, agent2: &mut dyn Agent) -> Result<GameRecord, PlayError> {
    play_game_with(env, agent1, agent2, |_, _| {})
}

/// Like [`play_game`], calling `on_step` after every applied move.
pub fn play_game_with<F>(
    env: &mut TacTixEnv,
    agent1: &mut dyn Agent,
    agent2: &mut dyn Agent,
    mut on_step: F,
) -> Result<GameRecord, PlayError>
where
    F: FnMut(Move, &Step),
{
    let start = Instant::now();
    let start_unix_s = now_unix_seconds();
    let (mut obs, _) = env.reset();
    let mut moves = Vec::new();
    loop {
        let agent: &mut dyn Agent = match obs.current_player {
            Player::P1 => &mut *agent1,
            Player::P2 => &mut *agent2,
        };
        let mv = agent.act(&obs)?;
        let step = env.step(mv)?;
        moves.push(mv);
        on_step(mv, &step);
        if step.done {
            break;
        }
        obs = step.observation;
    }
    // The loop only exits on a terminal step.
    let winner = env.winner().ok_or(EnvError::GameOver)?;
    let config = env.config();
    let meta = Meta {
        board_size: config.board_size,
        misere: config.misere,
        agent1: agent1.name().to_string(),
        agent2: agent2.name().to_string(),
        start_unix_s,
        elapsed_s: start.elapsed().as_secs_f32(),
    };
    Ok(GameRecord { meta, moves, winner })
}

/// Play `games` independent games in parallel, returning records in game order.
///
/// The factories receive the game index, which seeded agents can use to vary
/// their stream per game. `on_game` is called as each game finishes, in any order.
pub fn play_games<F1, F2, G>(
    config: EnvConfig,
    games: usize,
    make_agent1: F1,
    make_agent2: F2,
    on_game: G,
) -> Result<Vec<GameRecord>, PlayError>
where
    F1: Fn(usize) -> Result<Box<dyn Agent + Send>, AgentError> + Sync,
    F2: Fn(usize) -> Result<Box<dyn Agent + Send>, AgentError> + Sync,
    G: Fn(&GameRecord) + Sync,
{
    (0..games)
        .into_par_iter()
        .map(|game| -> Result<GameRecord, PlayError> {
            let mut env = TacTixEnv::new(config)?;
            let mut agent1 = make_agent1(game)?;
            let mut agent2 = make_agent2(game)?;
            let record = play_game(&mut env, agent1.as_mut(), agent2.as_mut())?;
            on_game(&record);
            Ok(record)
        })
        .collect()
}

/// Play `games` games and tally the winners.
pub fn run_multiple_games<F1, F2>(
    config: EnvConfig,
    games: usize,
    make_agent1: F1,
    make_agent2: F2,
) -> Result<TournamentResults, PlayError>
where
    F1: Fn(usize) -> Result<Box<dyn Agent + Send>, AgentError> + Sync,
    F2: Fn(usize) -> Result<Box<dyn Agent + Send>, AgentError> + Sync,
{
    log::info!("starting {} games on a {}x{} board (misere={})", games, config.board_size, config.board_size, config.misere);
    let records = play_games(config, games, make_agent1, make_agent2, |_| {})?;
    let results = TournamentResults::from_records(&records);
    log::info!("agent 1 won {}, agent 2 won {}", results.agent1_wins, results.agent2_wins);
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::{AgentKind, Minimax, RandomAgent};

    fn cfg(size: usize, misere: bool) -> EnvConfig { EnvConfig { board_size: size, misere, render: false } }

    #[test]
    fn game_runs_to_completion_and_replays() {
        let mut env = TacTixEnv::new(cfg(4, false)).unwrap();
        let mut a1 = Minimax::new(2).unwrap();
        let mut a2 = RandomAgent::seeded(3);
        let record = play_game(&mut env, &mut a1, &mut a2).unwrap();
        assert!(env.board().is_terminal());
        assert_eq!(record.meta.agent1, "minimax");
        assert_eq!(record.meta.agent2, "random");
        assert_eq!(record.replay().unwrap(), record.winner);
    }

    #[test]
    fn on_step_sees_every_move() {
        let mut env = TacTixEnv::new(cfg(3, true)).unwrap();
        let mut a1 = RandomAgent::seeded(1);
        let mut a2 = RandomAgent::seeded(2);
        let mut seen = Vec::new();
        let record = play_game_with(&mut env, &mut a1, &mut a2, |mv, step| seen.push((mv, step.done))).unwrap();
        assert_eq!(seen.len(), record.moves.len());
        assert!(seen.last().unwrap().1);
        assert!(seen[..seen.len() - 1].iter().all(|&(_, done)| !done));
    }

    #[test]
    fn winner_follows_move_parity() {
        for misere in [false, true] {
            let mut env = TacTixEnv::new(cfg(3, misere)).unwrap();
            let mut a1 = RandomAgent::seeded(10);
            let mut a2 = RandomAgent::seeded(11);
            let record = play_game(&mut env, &mut a1, &mut a2).unwrap();
            let last_mover = if record.moves.len() % 2 == 1 { Player::P1 } else { Player::P2 };
            let expected = if misere { last_mover.other() } else { last_mover };
            assert_eq!(record.winner, expected);
        }
    }

    #[test]
    fn tournament_tallies_every_game() {
        let results = run_multiple_games(
            cfg(3, false),
            16,
            |g| AgentKind::Random.build(1, g as u64),
            |g| AgentKind::Random.build(1, 1000 + g as u64),
        )
        .unwrap();
        assert_eq!(results.games(), 16);
    }

    #[test]
    fn tournament_is_reproducible() {
        let run = || {
            play_games(
                cfg(4, true),
                8,
                |_| AgentKind::Minimax.build(2, 0),
                |g| AgentKind::Random.build(1, g as u64),
                |_| {},
            )
            .unwrap()
            .into_iter()
            .map(|r| (r.moves, r.winner))
            .collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn factory_errors_propagate() {
        let err = run_multiple_games(cfg(3, false), 2, |_| AgentKind::Minimax.build(0, 0), |g| AgentKind::Random.build(1, g as u64))
            .unwrap_err();
        assert_eq!(err, PlayError::Agent(AgentError::InvalidDepth(0)));
    }

    #[test]
    fn results_from_records() {
        let mut r = TournamentResults::default();
        r.record(Player::P1);
        r.record(Player::P2);
        r.record(Player::P1);
        assert_eq!(r, TournamentResults { agent1_wins: 2, agent2_wins: 1 });
    }
}
