use crate::engine::{Board, Move};
use crate::env::Observation;

use super::heuristic::combined;
use super::{select_root, Agent, AgentError, Decision, SearchConfig, SearchStats, Value};

enum Node { Max, Chance }

/// Expectimax against a uniformly random opponent.
///
/// Leaves are scored with `h1 + 2 * h2`. The root choice is deterministic;
/// randomness only exists in how the opponent is modeled.
#[derive(Debug, Clone)]
pub struct Expectimax {
    cfg: SearchConfig,
}

impl Expectimax {
    pub fn new(depth: u32) -> Result<Self, AgentError> { Self::with_config(SearchConfig { depth }) }

    pub fn with_config(cfg: SearchConfig) -> Result<Self, AgentError> {
        cfg.validate()?;
        Ok(Self { cfg })
    }

    #[inline]
    pub fn depth(&self) -> u32 { self.cfg.depth }

    /// Search every root move, scoring each child as a chance node.
    pub fn decide(&self, board: Board) -> Result<Decision, AgentError> {
        let mut nodes = 0u64;
        let (mv, value) = select_root(board, |child| search(child, Node::Chance, self.cfg.depth - 1, &mut nodes))?;
        Ok(Decision { mv, value, stats: SearchStats { nodes } })
    }
}

impl Agent for Expectimax {
    fn name(&self) -> &str { "expectimax" }

    fn act(&mut self, observation: &Observation) -> Result<Move, AgentError> {
        let decision = self.decide(observation.board)?;
        log::debug!(
            "expectimax(depth={}) picked {} value={:.3} nodes={}",
            self.cfg.depth, decision.mv, decision.value, decision.stats.nodes
        );
        Ok(decision.mv)
    }
}

/// Depth-limited expectimax value of `board`.
///
/// `maximizing == false` makes `board` a chance node whose value is the mean
/// over its legal moves.
pub fn expectimax(board: Board, depth: u32, maximizing: bool) -> Value {
    let node = if maximizing { Node::Max } else { Node::Chance };
    let mut nodes = 0u64;
    search(board, node, depth, &mut nodes)
}

fn search(board: Board, node: Node, depth: u32, nodes: &mut u64) -> Value {
    *nodes += 1;
    if depth == 0 || board.is_terminal() {
        return combined(board);
    }
    match node {
        Node::Max => evaluate_max(board, depth, nodes),
        Node::Chance => evaluate_chance(board, depth, nodes),
    }
}

fn evaluate_max(board: Board, depth: u32, nodes: &mut u64) -> Value {
    let mut best = Value::NEG_INFINITY;
    for mv in board.moves() {
        best = best.max(search(board.play(mv), Node::Chance, depth - 1, nodes));
    }
    best
}

// Each legal move of this board has probability 1/k.
fn evaluate_chance(board: Board, depth: u32, nodes: &mut u64) -> Value {
    let moves = board.moves();
    let prob = 1.0 / moves.len() as Value;
    let mut expected = 0.0;
    for mv in moves {
        expected += prob * search(board.play(mv), Node::Max, depth - 1, nodes);
    }
    expected
}
