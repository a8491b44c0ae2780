use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::engine::Move;
use crate::env::Observation;

use super::{Agent, AgentError};

/// Picks uniformly among the legal moves of the current board.
///
/// ```
/// use tactix::engine::Board;
/// use tactix::env::{Observation, Player};
/// use tactix::search::{Agent, RandomAgent};
/// let obs = Observation { board: Board::full(3).unwrap(), current_player: Player::P2 };
/// let mut agent = RandomAgent::seeded(42);
/// assert!(obs.board.apply(agent.act(&obs).unwrap()).is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct RandomAgent<R: Rng = StdRng> {
    rng: R,
}

impl RandomAgent<StdRng> {
    /// Deterministic agent from a seed.
    pub fn seeded(seed: u64) -> Self { Self::with_rng(StdRng::seed_from_u64(seed)) }

    pub fn from_entropy() -> Self { Self::with_rng(StdRng::from_entropy()) }
}

impl<R: Rng> RandomAgent<R> {
    pub fn with_rng(rng: R) -> Self { Self { rng } }
}

impl<R: Rng> Agent for RandomAgent<R> {
    fn name(&self) -> &str { "random" }

    fn act(&mut self, observation: &Observation) -> Result<Move, AgentError> {
        let moves = observation.board.moves();
        moves.choose(&mut self.rng).copied().ok_or(AgentError::NoLegalMoves)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Board;
    use crate::env::Player;

    #[test]
    fn same_seed_same_choices() {
        let obs = Observation { board: Board::full(6).unwrap(), current_player: Player::P1 };
        let mut a = RandomAgent::seeded(9);
        let mut b = RandomAgent::seeded(9);
        for _ in 0..20 {
            assert_eq!(a.act(&obs), b.act(&obs));
        }
    }

    #[test]
    fn covers_every_legal_move() {
        let obs = Observation { board: Board::full(3).unwrap(), current_player: Player::P1 };
        let mut agent = RandomAgent::seeded(1);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..500 {
            seen.insert(agent.act(&obs).unwrap());
        }
        assert_eq!(seen.len(), obs.board.moves().len());
    }
}
