//! tactix: a TacTix game engine with minimax and expectimax agents
//!
//! This crate provides:
//! - A packed `Board` type with move generation and validated move application (`engine`)
//! - Search agents: alpha-beta minimax, expectimax against a random opponent, and a
//!   random baseline (`search`)
//! - A turn-based environment with normal and misère rules (`env`)
//! - A game driver and parallel tournaments (`play`)
//! - Postcard-encoded game records with replay checking (`record`)
//!
//! Quick start:
//! ```
//! use tactix::env::{EnvConfig, TacTixEnv};
//! use tactix::play::play_game;
//! use tactix::search::{Expectimax, Minimax};
//!
//! let mut env = TacTixEnv::new(EnvConfig { board_size: 4, ..Default::default() }).unwrap();
//! let mut first = Minimax::new(2).unwrap();
//! let mut second = Expectimax::new(2).unwrap();
//! let record = play_game(&mut env, &mut first, &mut second).unwrap();
//! assert_eq!(record.replay().unwrap(), record.winner);
//! ```
//!
pub mod engine;
pub mod env;
pub mod play;
pub mod record;
pub mod search;
