//! Error types for the Keystone rules engine
//!
//! Every engine command either succeeds or returns one of these without
//! touching the game state.

use thiserror::Error;

use crate::board::Pos;

/// Rejection reasons for queries and commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RulesError {
    #[error("position ({row}, {col}) is out of bounds (must be 0-16)")]
    OutOfBounds { row: u8, col: u8 },

    #[error("cell {0} is already occupied")]
    Occupied(Pos),

    #[error("'{action}' is not allowed while {phase}")]
    InvalidPhaseAction {
        action: &'static str,
        phase: &'static str,
    },

    #[error("game already over")]
    GameOver,

    #[error("core is not among the cores awaiting selection")]
    NotAnOfferedCore,

    #[error("focal position {0} is not part of the selected core")]
    FocusOutsideCore(Pos),

    #[error("stones do not form a bent triple of conductors for the active player")]
    NotABentTriple,

    #[error("triple index {0} is out of range (must be 0-2)")]
    TripleIndex(usize),

    #[error("no earlier move to undo")]
    EmptyHistoryUndo,

    #[error("no later move to redo")]
    HistoryBoundsRedo,

    #[error("not browsing history")]
    NotInHistoryMode,
}

/// Convenience type alias for Results using the crate's error type
pub type Result<T> = std::result::Result<T, RulesError>;
