use crate::engine::{Board, Move};
use crate::env::Observation;

use super::heuristic::h1;
use super::{select_root, Agent, AgentError, Decision, SearchConfig, SearchStats, Value};

/// Alpha-beta minimax with the parity heuristic at the leaves.
#[derive(Debug, Clone)]
pub struct Minimax {
    cfg: SearchConfig,
}

impl Minimax {
    pub fn new(depth: u32) -> Result<Self, AgentError> { Self::with_config(SearchConfig { depth }) }

    pub fn with_config(cfg: SearchConfig) -> Result<Self, AgentError> {
        cfg.validate()?;
        Ok(Self { cfg })
    }

    #[inline]
    pub fn depth(&self) -> u32 { self.cfg.depth }

    /// Search every root move and return the best one with its value.
    ///
    /// Each root child is searched as a minimizing node with a fresh
    /// `(-inf, +inf)` window.
    pub fn decide(&self, board: Board) -> Result<Decision, AgentError> {
        let mut nodes = 0u64;
        let (mv, value) = select_root(board, |child| {
            search(child, self.cfg.depth - 1, false, Value::NEG_INFINITY, Value::INFINITY, &mut nodes)
        })?;
        Ok(Decision { mv, value, stats: SearchStats { nodes } })
    }
}

impl Agent for Minimax {
    fn name(&self) -> &str { "minimax" }

    fn act(&mut self, observation: &Observation) -> Result<Move, AgentError> {
        let decision = self.decide(observation.board)?;
        log::debug!(
            "minimax(depth={}) picked {} value={} nodes={}",
            self.cfg.depth, decision.mv, decision.value, decision.stats.nodes
        );
        Ok(decision.mv)
    }
}

/// Depth-limited minimax value of `board` with alpha-beta pruning.
///
/// ```
/// use tactix::engine::Board;
/// use tactix::search::{heuristic::h1, minimax};
/// let b = Board::full(3).unwrap();
/// assert_eq!(minimax(b, 0, true, f64::NEG_INFINITY, f64::INFINITY), h1(b));
/// ```
pub fn minimax(board: Board, depth: u32, maximizing: bool, alpha: Value, beta: Value) -> Value {
    let mut nodes = 0u64;
    search(board, depth, maximizing, alpha, beta, &mut nodes)
}

fn search(board: Board, depth: u32, maximizing: bool, mut alpha: Value, mut beta: Value, nodes: &mut u64) -> Value {
    *nodes += 1;
    if depth == 0 || board.is_terminal() {
        return h1(board);
    }
    if maximizing {
        let mut best = Value::NEG_INFINITY;
        for mv in board.moves() {
            let value = search(board.play(mv), depth - 1, false, alpha, beta, nodes);
            best = best.max(value);
            alpha = alpha.max(value);
            if beta <= alpha {
                break;
            }
        }
        best
    } else {
        let mut best = Value::INFINITY;
        for mv in board.moves() {
            let value = search(board.play(mv), depth - 1, true, alpha, beta, nodes);
            best = best.min(value);
            beta = beta.min(value);
            if beta <= alpha {
                break;
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::Player;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    const INF: Value = Value::INFINITY;

    fn plain_minimax(board: Board, depth: u32, maximizing: bool) -> Value {
        if depth == 0 || board.is_terminal() {
            return h1(board);
        }
        let values = board.moves().into_iter().map(|mv| plain_minimax(board.play(mv), depth - 1, !maximizing));
        if maximizing { values.fold(-INF, Value::max) } else { values.fold(INF, Value::min) }
    }

    fn random_board(rng: &mut StdRng, size: usize) -> Board {
        let rows: Vec<Vec<u8>> = (0..size)
            .map(|_| (0..size).map(|_| rng.gen_range(0..2)).collect())
            .collect();
        Board::from_rows(&rows).unwrap()
    }

    #[test]
    fn depth_zero_returns_parity() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..100 {
            let b = random_board(&mut rng, 5);
            assert_eq!(minimax(b, 0, true, -INF, INF), h1(b));
            assert_eq!(minimax(b, 0, false, -INF, INF), h1(b));
        }
    }

    #[test]
    fn terminal_board_short_circuits() {
        let b = Board::empty(4).unwrap();
        assert_eq!(minimax(b, 5, true, -INF, INF), -1.0);
        assert_eq!(minimax(b, 5, false, -INF, INF), -1.0);
    }

    #[test]
    fn pruning_preserves_value() {
        let mut rng = StdRng::seed_from_u64(11);
        for size in 3..=4 {
            for _ in 0..60 {
                let b = random_board(&mut rng, size);
                for depth in 0..=3 {
                    for maximizing in [true, false] {
                        assert_eq!(
                            minimax(b, depth, maximizing, -INF, INF),
                            plain_minimax(b, depth, maximizing),
                            "board {b:?} depth {depth}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn chosen_move_value_matches_unpruned_search() {
        for size in 3..=4 {
            let b = Board::full(size).unwrap();
            let agent = Minimax::new(3).unwrap();
            let decision = agent.decide(b).unwrap();
            let best = b
                .moves()
                .into_iter()
                .map(|mv| plain_minimax(b.play(mv), 2, false))
                .fold(-INF, Value::max);
            assert_eq!(decision.value, best);
            assert_eq!(plain_minimax(b.play(decision.mv), 2, false), best);
        }
    }

    #[test]
    fn pruning_visits_fewer_nodes() {
        let b = Board::full(4).unwrap();
        let mut pruned = 0u64;
        search(b, 4, true, -INF, INF, &mut pruned);
        fn count(board: Board, depth: u32) -> u64 {
            if depth == 0 || board.is_terminal() {
                return 1;
            }
            1 + board.moves().into_iter().map(|mv| count(board.play(mv), depth - 1)).sum::<u64>()
        }
        assert!(pruned < count(b, 4));
    }

    #[test]
    fn depth_one_scores_children_by_parity() {
        // Every move from a lone 3-cell row leaves an even count, so all children
        // score -1 and the first generated move wins.
        let b = Board::from_rows(&[[0, 0, 0], [1, 1, 1], [0, 0, 0]]).unwrap();
        let decision = Minimax::new(1).unwrap().decide(b).unwrap();
        assert_eq!(decision.mv, Move::column(0, 1, 1));
        assert_eq!(decision.value, -1.0);
    }

    #[test]
    fn self_play_is_deterministic() {
        let play = || {
            let mut board = Board::full(4).unwrap();
            let mut agents = [Minimax::new(3).unwrap(), Minimax::new(3).unwrap()];
            let mut player = Player::P1;
            let mut moves = Vec::new();
            while !board.is_terminal() {
                let obs = Observation { board, current_player: player };
                let mv = agents[player.index()].act(&obs).unwrap();
                board = board.apply(mv).unwrap();
                moves.push(mv);
                player = player.other();
            }
            moves
        };
        assert_eq!(play(), play());
    }

    #[test]
    fn decision_counts_nodes() {
        let b = Board::full(3).unwrap();
        let d = Minimax::new(1).unwrap().decide(b).unwrap();
        // One leaf per root move.
        assert_eq!(d.stats.nodes, b.moves().len() as u64);
    }
}
