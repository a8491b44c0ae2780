//! Turn-based TacTix environment: owns the live board and whose turn it is.

use serde::{Deserialize, Serialize};

use crate::engine::{Board, BoardError, Move, MoveError, DEFAULT_SIZE};

/// Per-step reward from the perspective of the player who just moved.
pub type Reward = f64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    P1,
    P2,
}

impl Player {
    /// 0 for the first player, 1 for the second.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Player::P1 => 0,
            Player::P2 => 1,
        }
    }

    #[inline]
    pub fn other(self) -> Player {
        match self {
            Player::P1 => Player::P2,
            Player::P2 => Player::P1,
        }
    }
}

/// Winner of a finished game: the player who emptied the board wins under
/// normal rules and loses under misère.
#[inline]
pub fn winner(last_mover: Player, misere: bool) -> Player {
    if misere { last_mover.other() } else { last_mover }
}

/// What an agent sees before choosing a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Observation {
    pub board: Board,
    pub current_player: Player,
}

/// Extra per-step information; `winner` is set on the terminal step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Info {
    pub winner: Option<Player>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    pub observation: Observation,
    pub reward: Reward,
    pub done: bool,
    /// Never set; games always end by emptying the board.
    pub truncated: bool,
    pub info: Info,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvConfig {
    pub board_size: usize,
    /// Last mover loses instead of winning.
    pub misere: bool,
    /// Presentation hint for drivers; has no effect on the game.
    pub render: bool,
}

impl Default for EnvConfig {
    fn default() -> Self { Self { board_size: DEFAULT_SIZE, misere: false, render: false } }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EnvError {
    #[error(transparent)]
    Board(#[from] BoardError),
    #[error("invalid move {mv}: {source}")]
    InvalidMove { mv: Move, source: MoveError },
    #[error("the game is already over")]
    GameOver,
}

#[derive(Debug, Clone)]
pub struct TacTixEnv {
    config: EnvConfig,
    initial: Board,
    board: Board,
    current_player: Player,
    done: bool,
}

impl TacTixEnv {
    /// A fresh environment, already reset.
    pub fn new(config: EnvConfig) -> Result<Self, EnvError> {
        let initial = Board::full(config.board_size)?;
        Ok(Self { config, initial, board: initial, current_player: Player::P1, done: false })
    }

    #[inline]
    pub fn config(&self) -> &EnvConfig { &self.config }

    #[inline]
    pub fn board(&self) -> Board { self.board }

    #[inline]
    pub fn current_player(&self) -> Player { self.current_player }

    #[inline]
    pub fn is_done(&self) -> bool { self.done }

    pub fn observation(&self) -> Observation {
        Observation { board: self.board, current_player: self.current_player }
    }

    /// Refill the board and hand the first move to [`Player::P1`].
    pub fn reset(&mut self) -> (Observation, Info) {
        self.board = self.initial;
        self.current_player = Player::P1;
        self.done = false;
        (self.observation(), Info::default())
    }

    /// Apply `mv` for the current player and pass the turn.
    pub fn step(&mut self, mv: Move) -> Result<Step, EnvError> {
        if self.done {
            return Err(EnvError::GameOver);
        }
        self.board = self.board.apply(mv).map_err(|source| EnvError::InvalidMove { mv, source })?;
        let mover = self.current_player;
        let mut info = Info::default();
        let reward = if self.board.is_terminal() {
            self.done = true;
            info.winner = Some(winner(mover, self.config.misere));
            if self.config.misere { -1.0 } else { 1.0 }
        } else {
            0.0
        };
        self.current_player = mover.other();
        log::trace!("{:?} played {} (remaining={}, done={})", mover, mv, self.board.count_present(), self.done);
        Ok(Step { observation: self.observation(), reward, done: self.done, truncated: false, info })
    }

    /// Winner under the configured rule, once the game is over.
    ///
    /// After the terminal move `current_player` is the player who did not move last.
    pub fn winner(&self) -> Option<Player> {
        self.done.then(|| winner(self.current_player.other(), self.config.misere))
    }
}
