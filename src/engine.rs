use std::fmt;

use serde::{Deserialize, Serialize};

/// Largest supported side length; one row fits in a byte of the packed board.
pub const MAX_SIZE: usize = 8;
/// Side length used when none is configured.
pub const DEFAULT_SIZE: usize = 6;

// Bit `row * STRIDE + col` holds cell (row, col), independent of the board size.
const STRIDE: usize = 8;
const BYTE: u64 = 0xff;

type BoardRaw = u64;
type Line = u8;

/// State of a single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Removed,
    Present,
}

/// Which kind of line a move or segment lies on.
///
/// Declaration order is the generator order: every column is scanned before any row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Orientation {
    Column,
    Row,
}

impl Orientation {
    pub const ALL: [Orientation; 2] = [Orientation::Column, Orientation::Row];

    #[inline]
    pub fn is_row(self) -> bool { matches!(self, Orientation::Row) }
}

/// Removes cells `start..=end` of one row or column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub line: usize,
    pub start: usize,
    pub end: usize,
    pub orientation: Orientation,
}

impl Move {
    pub fn new(line: usize, start: usize, end: usize, orientation: Orientation) -> Self {
        Move { line, start, end, orientation }
    }

    pub fn row(line: usize, start: usize, end: usize) -> Self { Self::new(line, start, end, Orientation::Row) }

    pub fn column(line: usize, start: usize, end: usize) -> Self { Self::new(line, start, end, Orientation::Column) }

    /// Number of cells the move removes (0 for an inverted range).
    #[inline]
    pub fn len(&self) -> usize { (self.end + 1).saturating_sub(self.start) }

    #[inline]
    pub fn is_empty(&self) -> bool { self.len() == 0 }

    /// The `(line, start, end, is_row)` form used by external drivers.
    pub fn as_tuple(self) -> (usize, usize, usize, bool) {
        (self.line, self.start, self.end, self.orientation.is_row())
    }
}

impl From<(usize, usize, usize, bool)> for Move {
    fn from((line, start, end, is_row): (usize, usize, usize, bool)) -> Self {
        let orientation = if is_row { Orientation::Row } else { Orientation::Column };
        Move::new(line, start, end, orientation)
    }
}

impl From<Segment> for Move {
    fn from(s: Segment) -> Self { Move::new(s.line, s.start, s.end, s.orientation) }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.orientation {
            Orientation::Row => "row",
            Orientation::Column => "col",
        };
        write!(f, "{} {} [{}..={}]", kind, self.line, self.start, self.end)
    }
}

/// A maximal run of present cells along one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Segment {
    pub line: usize,
    pub start: usize,
    pub end: usize,
    pub orientation: Orientation,
}

impl Segment {
    #[inline]
    pub fn len(&self) -> usize { self.end - self.start + 1 }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("board size {0} outside supported range 1..={max}", max = MAX_SIZE)]
    InvalidSize(usize),
    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow { row: usize, expected: usize, found: usize },
    #[error("cell ({row}, {col}) holds {value}, expected 0 or 1")]
    InvalidCell { row: usize, col: usize, value: u8 },
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MoveError {
    #[error("line {line} out of range for a board of size {size}")]
    LineOutOfRange { line: usize, size: usize },
    #[error("range {start}..={end} is not valid on a board of size {size}")]
    BadRange { start: usize, end: usize, size: usize },
    #[error("cell {pos} of {orientation:?} {line} was already removed")]
    CellRemoved { line: usize, pos: usize, orientation: Orientation },
}

/// Packed square TacTix board.
///
/// Cells live in a `u64` bitmask, so a `Board` is `Copy` and every simulated move
/// produces an independent value. Bits outside the `size × size` grid are always zero.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    bits: BoardRaw,
    size: u8,
}

impl Board {
    /// A board of side `size` with every cell present.
    ///
    /// ```
    /// use tactix::engine::Board;
    /// let b = Board::full(4).unwrap();
    /// assert_eq!(b.count_present(), 16);
    /// ```
    pub fn full(size: usize) -> Result<Self, BoardError> {
        check_size(size)?;
        Ok(Board { bits: grid_mask(size), size: size as u8 })
    }

    /// A board of side `size` with every cell removed.
    pub fn empty(size: usize) -> Result<Self, BoardError> {
        check_size(size)?;
        Ok(Board { bits: 0, size: size as u8 })
    }

    /// Build from rows of 0/1 values (1 = present).
    ///
    /// ```
    /// use tactix::engine::Board;
    /// let b = Board::from_rows(&[[1, 0], [1, 1]]).unwrap();
    /// assert_eq!(b.count_present(), 3);
    /// ```
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> Result<Self, BoardError> {
        let size = rows.len();
        check_size(size)?;
        let mut bits = 0;
        for (row, cells) in rows.iter().enumerate() {
            let cells = cells.as_ref();
            if cells.len() != size {
                return Err(BoardError::RaggedRow { row, expected: size, found: cells.len() });
            }
            for (col, &value) in cells.iter().enumerate() {
                match value {
                    0 => {}
                    1 => bits |= bit(row, col),
                    _ => return Err(BoardError::InvalidCell { row, col, value }),
                }
            }
        }
        Ok(Board { bits, size: size as u8 })
    }

    /// Construct from the packed representation; bits outside the grid are dropped.
    pub fn from_raw(bits: BoardRaw, size: usize) -> Result<Self, BoardError> {
        check_size(size)?;
        Ok(Board { bits: bits & grid_mask(size), size: size as u8 })
    }

    #[inline]
    pub fn raw(&self) -> BoardRaw { self.bits }

    #[inline]
    pub fn size(&self) -> usize { self.size as usize }

    /// Cell at (row, col); anything off the grid reads as removed.
    #[inline]
    pub fn cell(&self, row: usize, col: usize) -> Cell {
        if row < self.size() && col < self.size() && self.bits & bit(row, col) != 0 {
            Cell::Present
        } else {
            Cell::Removed
        }
    }

    #[inline]
    pub fn is_present(&self, row: usize, col: usize) -> bool { self.cell(row, col) == Cell::Present }

    #[inline]
    pub fn count_present(&self) -> u32 { self.bits.count_ones() }

    /// True once every cell has been removed; no move is legal from here.
    #[inline]
    pub fn is_terminal(&self) -> bool { self.bits == 0 }

    /// Cells of one line as a bitmask, bit `i` = position `i` along the line.
    pub fn line(&self, orientation: Orientation, idx: usize) -> Line {
        debug_assert!(idx < self.size());
        match orientation {
            Orientation::Row => ((self.bits >> (idx * STRIDE)) & BYTE) as Line,
            Orientation::Column => (0..self.size()).fold(0, |acc, pos| {
                if self.bits & bit(pos, idx) != 0 { acc | (1 << pos) } else { acc }
            }),
        }
    }

    /// Every maximal segment, columns first, then by line index, then by position.
    pub fn segments(self) -> impl Iterator<Item = Segment> {
        let size = self.size();
        Orientation::ALL.into_iter().flat_map(move |orientation| {
            (0..size).flat_map(move |line| {
                Runs::new(self.line(orientation, line), size)
                    .map(move |(start, end)| Segment { line, start, end, orientation })
            })
        })
    }

    /// All legal moves: exactly one per maximal segment, in [`Board::segments`] order.
    ///
    /// ```
    /// use tactix::engine::{Board, Move};
    /// let b = Board::from_rows(&[[1, 1], [0, 1]]).unwrap();
    /// assert_eq!(
    ///     b.moves(),
    ///     vec![Move::column(0, 0, 0), Move::column(1, 0, 1), Move::row(0, 0, 1), Move::row(1, 1, 1)]
    /// );
    /// ```
    pub fn moves(self) -> Vec<Move> { self.segments().map(Move::from).collect() }

    /// Validate `mv` against this board and return the board after it.
    pub fn apply(self, mv: Move) -> Result<Board, MoveError> {
        self.check_move(mv)?;
        Ok(self.play(mv))
    }

    /// Apply a move already known to be legal, e.g. one produced by [`Board::moves`].
    #[inline]
    pub fn play(self, mv: Move) -> Board {
        debug_assert!(self.check_move(mv).is_ok(), "illegal move {} on {:?}", mv, self);
        Board { bits: self.bits & !move_mask(mv), size: self.size }
    }

    pub fn check_move(&self, mv: Move) -> Result<(), MoveError> {
        let size = self.size();
        if mv.line >= size {
            return Err(MoveError::LineOutOfRange { line: mv.line, size });
        }
        if mv.start > mv.end || mv.end >= size {
            return Err(MoveError::BadRange { start: mv.start, end: mv.end, size });
        }
        let line = self.line(mv.orientation, mv.line);
        match (mv.start..=mv.end).find(|&pos| line & (1 << pos) == 0) {
            Some(pos) => Err(MoveError::CellRemoved { line: mv.line, pos, orientation: mv.orientation }),
            None => Ok(()),
        }
    }

    /// Rows of 0/1 values, the inverse of [`Board::from_rows`].
    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        (0..self.size())
            .map(|row| (0..self.size()).map(|col| self.is_present(row, col) as u8).collect())
            .collect()
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board({}, {:#018x})", self.size, self.bits)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.size() {
            let line: Vec<&str> = (0..self.size())
                .map(|col| if self.is_present(row, col) { "O" } else { "." })
                .collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}

/// Scanner over the maximal runs of set bits in one line, yielding `(start, end)`.
struct Runs {
    line: Line,
    size: usize,
    pos: usize,
}

impl Runs {
    fn new(line: Line, size: usize) -> Self { Runs { line, size, pos: 0 } }

    #[inline]
    fn set(&self, pos: usize) -> bool { self.line & (1 << pos) != 0 }
}

impl Iterator for Runs {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<Self::Item> {
        while self.pos < self.size && !self.set(self.pos) {
            self.pos += 1;
        }
        if self.pos >= self.size {
            return None;
        }
        let start = self.pos;
        while self.pos < self.size && self.set(self.pos) {
            self.pos += 1;
        }
        Some((start, self.pos - 1))
    }
}

fn check_size(size: usize) -> Result<(), BoardError> {
    if (1..=MAX_SIZE).contains(&size) { Ok(()) } else { Err(BoardError::InvalidSize(size)) }
}

#[inline(always)]
fn bit(row: usize, col: usize) -> BoardRaw { 1 << (row * STRIDE + col) }

fn grid_mask(size: usize) -> BoardRaw {
    let row = span(0, size - 1) as BoardRaw;
    (0..size).fold(0, |acc, r| acc | (row << (r * STRIDE)))
}

// Bits start..=end of a line.
#[inline]
fn span(start: usize, end: usize) -> Line {
    let upper = (1u16 << (end + 1)) - 1;
    let lower = (1u16 << start) - 1;
    (upper & !lower) as Line
}

fn move_mask(mv: Move) -> BoardRaw {
    match mv.orientation {
        Orientation::Row => (span(mv.start, mv.end) as BoardRaw) << (mv.line * STRIDE),
        Orientation::Column => (mv.start..=mv.end).fold(0, |acc, pos| acc | bit(pos, mv.line)),
    }
}
