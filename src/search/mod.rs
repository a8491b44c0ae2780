//! Depth-limited adversarial search agents for TacTix.
//!
//! Three agents implement [`Agent`]:
//! - [`Minimax`]: alpha-beta minimax, leaves scored with [`heuristic::h1`].
//! - [`Expectimax`]: opponent modeled as uniformly random over its legal moves,
//!   leaves scored with [`heuristic::combined`].
//! - [`RandomAgent`]: uniform choice over legal moves.
//!
//! The two search agents share the root loop: every legal move is simulated in
//! generator order and the strictly best child value wins, so ties go to the
//! first move generated.
//!
//! Quick start
//! ```
//! use tactix::engine::Board;
//! use tactix::env::{Observation, Player};
//! use tactix::search::{Agent, Minimax};
//!
//! let obs = Observation { board: Board::full(4).unwrap(), current_player: Player::P1 };
//! let mut agent = Minimax::new(2).unwrap();
//! let mv = agent.act(&obs).unwrap();
//! assert!(obs.board.apply(mv).is_ok());
//! ```

use crate::engine::{Board, Move};
use crate::env::Observation;

pub mod heuristic;
mod expectimax;
mod minimax;
mod random;

pub use expectimax::{expectimax, Expectimax};
pub use minimax::{minimax, Minimax};
pub use random::RandomAgent;

/// Search value of a position.
pub type Value = f64;

/// Search depth used when none is configured.
pub const DEFAULT_DEPTH: u32 = 4;

/// Something that picks a move for the player to act.
pub trait Agent {
    fn name(&self) -> &str;

    /// Choose a move for `observation.board`.
    ///
    /// Fails with [`AgentError::NoLegalMoves`] on a terminal board.
    fn act(&mut self, observation: &Observation) -> Result<Move, AgentError>;
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AgentError {
    #[error("no legal moves: the board is already empty")]
    NoLegalMoves,
    #[error("search depth must be at least 1, got {0}")]
    InvalidDepth(u32),
}

/// Configuration shared by the search agents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    /// Plies searched from the root, counting the root move itself.
    pub depth: u32,
}

impl Default for SearchConfig {
    fn default() -> Self { Self { depth: DEFAULT_DEPTH } }
}

impl SearchConfig {
    pub fn validate(&self) -> Result<(), AgentError> {
        if self.depth == 0 { Err(AgentError::InvalidDepth(self.depth)) } else { Ok(()) }
    }
}

/// Basic search stats for a single decision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub nodes: u64,
}

/// A root move together with its search value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    pub mv: Move,
    pub value: Value,
    pub stats: SearchStats,
}

/// Agent selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum AgentKind {
    Minimax,
    Expectimax,
    Random,
}

impl AgentKind {
    /// Build a boxed agent. `seed` only affects [`AgentKind::Random`].
    pub fn build(self, depth: u32, seed: u64) -> Result<Box<dyn Agent + Send>, AgentError> {
        let cfg = SearchConfig { depth };
        Ok(match self {
            AgentKind::Minimax => Box::new(Minimax::with_config(cfg)?),
            AgentKind::Expectimax => Box::new(Expectimax::with_config(cfg)?),
            AgentKind::Random => Box::new(RandomAgent::seeded(seed)),
        })
    }
}

/// Root loop shared by both search agents.
///
/// `child_value` scores the board reached by each root move; the first strictly
/// greatest value wins.
fn select_root<F>(board: Board, mut child_value: F) -> Result<(Move, Value), AgentError>
where
    F: FnMut(Board) -> Value,
{
    let mut best: Option<(Move, Value)> = None;
    for mv in board.moves() {
        let value = child_value(board.play(mv));
        if best.map_or(true, |(_, best_value)| value > best_value) {
            best = Some((mv, value));
        }
    }
    best.ok_or(AgentError::NoLegalMoves)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::Player;

    fn obs(board: Board) -> Observation { Observation { board, current_player: Player::P1 } }

    #[test]
    fn zero_depth_is_rejected() {
        assert_eq!(Minimax::new(0).err(), Some(AgentError::InvalidDepth(0)));
        assert_eq!(Expectimax::new(0).err(), Some(AgentError::InvalidDepth(0)));
        assert!(AgentKind::Minimax.build(0, 0).is_err());
        assert!(AgentKind::Random.build(0, 0).is_ok());
    }

    #[test]
    fn root_ties_go_to_first_generated_move() {
        let b = Board::full(3).unwrap();
        let (mv, value) = select_root(b, |_| 0.0).unwrap();
        assert_eq!(mv, b.moves()[0]);
        assert_eq!(value, 0.0);
    }

    #[test]
    fn root_on_terminal_board_fails() {
        let b = Board::empty(3).unwrap();
        assert_eq!(select_root(b, |_| 0.0), Err(AgentError::NoLegalMoves));
    }

    #[test]
    fn every_kind_acts_legally() {
        let b = Board::from_rows(&[[1, 1, 0], [0, 1, 1], [1, 0, 1]]).unwrap();
        for kind in [AgentKind::Minimax, AgentKind::Expectimax, AgentKind::Random] {
            let mut agent = kind.build(3, 5).unwrap();
            let mv = agent.act(&obs(b)).unwrap();
            assert!(b.moves().contains(&mv), "{} picked {mv}", agent.name());
        }
    }

    #[test]
    fn every_kind_refuses_terminal_board() {
        let b = Board::empty(4).unwrap();
        for kind in [AgentKind::Minimax, AgentKind::Expectimax, AgentKind::Random] {
            let mut agent = kind.build(2, 0).unwrap();
            assert_eq!(agent.act(&obs(b)), Err(AgentError::NoLegalMoves));
        }
    }
}
