//! Notifications emitted by the engine
//!
//! The log only grows. Consumers remember how far they have read and ask
//! for [`EventLog::since`] on each change.

use crate::board::{Player, Pos};
use crate::rules::{BentTriple, Core, ResonancePath};

/// Semantic occurrence, carrying enough detail to render without re-deriving rules
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    TurnStarted {
        player: Player,
        /// 1-based number of the move about to be made
        move_number: usize,
    },
    StonePlaced {
        player: Player,
        pos: Pos,
    },
    /// `player` has bent triples available for conversion
    BentTripleConvertible {
        player: Player,
        triples: Vec<BentTriple>,
    },
    /// A placement completed one or more cores, awaiting selection
    CoreFormed {
        player: Player,
        cores: Vec<Core>,
    },
    ResonanceActivated {
        player: Player,
        core: Core,
        focal: Pos,
        paths: [ResonancePath; 4],
    },
    /// Conductor turned keystone, by triple conversion or resonance
    StoneConverted {
        player: Player,
        pos: Pos,
    },
    GameWon {
        player: Player,
        line: Option<[Pos; 5]>,
    },
    /// History browsing moved; `applied` moves are now on the board
    HistoryNavigated {
        applied: usize,
    },
    /// Moves after the cursor were discarded
    HistoryTruncated {
        discarded: usize,
    },
    GameReset,
}

/// Append-only event list
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<GameEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn all(&self) -> &[GameEvent] {
        &self.events
    }

    /// Events appended after the first `seen`
    pub fn since(&self, seen: usize) -> &[GameEvent] {
        self.events.get(seen..).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
