//! Keystone rules engine
//!
//! Rules engine for a two-player connection game on a 17x17 board:
//! - Players place conductor stones
//! - Three conductors with exactly two orthogonally adjacent pairs (a bent
//!   triple) let their owner convert one of them into a keystone
//! - A 2x2 square of one player's stones (a core) triggers resonance: the
//!   chosen focal stone and the first own conductor along each of four rays
//!   become keystones
//! - Exactly five keystones in a line wins; six or more do not
//!
//! # Architecture
//!
//! - [`board`]: Board representation with bitboards
//! - [`rules`]: Pattern detection, resonance, win condition
//! - [`engine`]: Turn state machine, undo/redo history, event log
//! - [`ui`]: egui front end
//!
//! # Quick Start
//!
//! ```
//! use keystone::{Engine, GameStatus, Pos};
//!
//! let mut engine = Engine::new();
//! engine.place_stone(Pos::new(8, 8)).unwrap();
//! engine.place_stone(Pos::new(0, 0)).unwrap();
//!
//! assert_eq!(engine.status(), GameStatus::Playing);
//! engine.undo().unwrap();
//! assert!(engine.history().in_history_mode());
//! ```

pub mod board;
pub mod engine;
pub mod error;
pub mod rules;
pub mod ui;

// Re-export commonly used types for convenience
pub use board::{Board, Cell, Player, Pos, StoneKind, BOARD_SIZE};
pub use engine::{CellMarks, Engine, GameEvent, GameStatus, Move, MoveDetail, MoveKind, Phase};
pub use error::{Result, RulesError};
pub use rules::{BentTriple, Core, Direction, ResonancePath};
