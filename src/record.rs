//! Persistent game records.
//!
//! A [`GameRecord`] stores the rules a game was played under, who played it and
//! the full move list. Records are postcard-encoded and can be replayed through
//! [`TacTixEnv`] to check that the stored winner is consistent with the moves.

use std::fs;
use std::io;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::engine::Move;
use crate::env::{EnvConfig, EnvError, Player, TacTixEnv};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    pub board_size: usize,
    pub misere: bool,
    /// Agent playing as [`Player::P1`].
    pub agent1: String,
    /// Agent playing as [`Player::P2`].
    pub agent2: String,
    pub start_unix_s: u64,
    pub elapsed_s: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub meta: Meta,
    /// Moves in play order, starting with [`Player::P1`].
    pub moves: Vec<Move>,
    pub winner: Player,
}

#[derive(thiserror::Error, Debug)]
pub enum RecordError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("postcard error: {0}")]
    Postcard(#[from] postcard::Error),
    #[error(transparent)]
    Env(#[from] EnvError),
    #[error("replay failed at move {index}: {source}")]
    Replay { index: usize, source: EnvError },
    #[error("replay ended before the board was empty")]
    Incomplete,
    #[error("recorded winner {recorded:?} but replay gives {replayed:?}")]
    WinnerMismatch { recorded: Player, replayed: Player },
}

impl GameRecord {
    pub fn env_config(&self) -> EnvConfig {
        EnvConfig { board_size: self.meta.board_size, misere: self.meta.misere, render: false }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, RecordError> { Ok(postcard::to_allocvec(self)?) }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, RecordError> { Ok(postcard::from_bytes(bytes)?) }

    pub fn write_to_path<P: AsRef<Path>>(&self, path: P) -> Result<(), RecordError> {
        fs::write(path, self.to_bytes()?)?;
        Ok(())
    }

    pub fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Self, RecordError> {
        let bytes = fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    /// Re-apply every move on a fresh environment and return the winner.
    ///
    /// Fails if a move is illegal, the moves do not empty the board, or the
    /// outcome disagrees with [`GameRecord::winner`].
    pub fn replay(&self) -> Result<Player, RecordError> {
        let mut env = TacTixEnv::new(self.env_config())?;
        for (index, &mv) in self.moves.iter().enumerate() {
            env.step(mv).map_err(|source| RecordError::Replay { index, source })?;
        }
        let replayed = env.winner().ok_or(RecordError::Incomplete)?;
        if replayed != self.winner {
            return Err(RecordError::WinnerMismatch { recorded: self.winner, replayed });
        }
        Ok(replayed)
    }
}

pub fn now_unix_seconds() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs()
}
