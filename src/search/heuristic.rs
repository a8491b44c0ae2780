use crate::engine::Board;

use super::Value;

/// Weight of the segment score in [`combined`].
const SEGMENT_WEIGHT: Value = 2.0;

/// +1 when an odd number of cells remain, -1 otherwise.
#[inline]
pub fn parity_sign(board: Board) -> Value {
    if board.count_present() % 2 == 1 { 1.0 } else { -1.0 }
}

/// Parity heuristic, the only evaluation used by minimax.
///
/// ```
/// use tactix::engine::Board;
/// use tactix::search::heuristic::h1;
/// assert_eq!(h1(Board::full(2).unwrap()), -1.0);
/// ```
#[inline]
pub fn h1(board: Board) -> Value { parity_sign(board) }

/// Tiered score of a single segment.
#[inline]
pub fn segment_score(len: usize) -> Value {
    match len {
        1 => 1.0,
        2 => 3.0,
        3 => 5.0,
        _ => 7.0,
    }
}

/// Sum of segment scores over both orientations, signed by parity.
pub fn h2(board: Board) -> Value {
    let score: Value = board.segments().map(|s| segment_score(s.len())).sum();
    score * parity_sign(board)
}

/// `h1 + 2 * h2`, the leaf evaluation of expectimax.
#[inline]
pub fn combined(board: Board) -> Value { h1(board) + SEGMENT_WEIGHT * h2(board) }
