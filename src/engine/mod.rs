//! Turn engine: the state machine driving a Keystone game
//!
//! The engine owns the current board, the active player, the turn phase, the
//! move history and the event log. Every command validates first, builds the
//! next board on a clone, and only then swaps it in, so a rejected command
//! leaves the state exactly as it was.
//!
//! # Turn flow
//!
//! ```text
//! Placing ──place──▶ (no new core) ──▶ finalize ──▶ Placing (other player)
//!    │
//!    └──place──▶ Resonating ──select_core──▶ SelectingFocus ──select_focus──▶ finalize
//! ```
//!
//! `convert_bent_triple` finalizes from any phase. In a sub-phase it keeps
//! the pending placement and drops the core selection.
//!
//! A winning move leaves the phase where the turn ended. Only history
//! navigation and `reset` are accepted afterwards; undo returns to `Placing`.
//!
//! # Example
//!
//! ```
//! use keystone::{Engine, Phase, Pos};
//!
//! let mut engine = Engine::new();
//! engine.place_stone(Pos::new(8, 8)).unwrap();
//! assert_eq!(engine.phase(), Phase::Placing);
//! assert_eq!(engine.history().len(), 1);
//! ```

pub mod events;
pub mod history;

use std::fmt;

use tracing::{debug, info, instrument};

use crate::board::{Board, Cell, Player, Pos, BOARD_SIZE};
use crate::error::{Result, RulesError};
use crate::rules::{
    activate_resonance, convertible_positions, detect_bent_triples, detect_cores_touching,
    find_winning_line, is_bent_triple, BentTriple, Core,
};

pub use events::{EventLog, GameEvent};
pub use history::{History, Move, MoveDetail, MoveKind};

/// Phase of the current turn, without its data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Awaiting a placement
    Placing,
    /// A placement completed cores; awaiting core selection
    Resonating,
    /// A core is chosen; awaiting the focal cell
    SelectingFocus,
}

impl Phase {
    pub fn name(self) -> &'static str {
        match self {
            Phase::Placing => "placing",
            Phase::Resonating => "resonating",
            Phase::SelectingFocus => "selecting focus",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Overall game status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameStatus {
    Playing,
    Won(Player),
}

/// Derived per-cell display flags. Rules never read these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellMarks {
    /// Member of an offered or selected core
    pub highlighted: bool,
    /// Stone of the active player that can be converted via a bent triple
    pub convertible: bool,
    /// Touched by the most recent resonance
    pub resonating: bool,
}

/// Placement waiting on core resolution
#[derive(Debug, Clone)]
struct PendingPlacement {
    /// Board before the stone was placed
    before: Board,
    pos: Pos,
}

/// Phase together with its transient selection state
#[derive(Debug, Clone)]
enum TurnState {
    Placing,
    Resonating {
        pending: PendingPlacement,
        cores: Vec<Core>,
    },
    SelectingFocus {
        pending: PendingPlacement,
        cores: Vec<Core>,
        core: Core,
    },
}

impl TurnState {
    fn phase(&self) -> Phase {
        match self {
            TurnState::Placing => Phase::Placing,
            TurnState::Resonating { .. } => Phase::Resonating,
            TurnState::SelectingFocus { .. } => Phase::SelectingFocus,
        }
    }

    fn pending(&self) -> Option<&PendingPlacement> {
        match self {
            TurnState::Placing => None,
            TurnState::Resonating { pending, .. } | TurnState::SelectingFocus { pending, .. } => {
                Some(pending)
            }
        }
    }
}

/// The rules engine for one local game
#[derive(Debug, Clone)]
pub struct Engine {
    board: Board,
    active: Player,
    status: GameStatus,
    turn: TurnState,
    history: History,
    events: EventLog,
    winning_line: Option<[Pos; 5]>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// New game, Black to move
    pub fn new() -> Self {
        let mut engine = Self {
            board: Board::new(),
            active: Player::Black,
            status: GameStatus::Playing,
            turn: TurnState::Placing,
            history: History::new(),
            events: EventLog::new(),
            winning_line: None,
        };
        engine.start_turn();
        engine
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.turn.phase()
    }

    #[inline]
    pub fn active_player(&self) -> Player {
        self.active
    }

    #[inline]
    pub fn status(&self) -> GameStatus {
        self.status
    }

    #[inline]
    pub fn is_over(&self) -> bool {
        self.status != GameStatus::Playing
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// The exact five that won the game, if any
    pub fn winning_line(&self) -> Option<[Pos; 5]> {
        self.winning_line
    }

    /// Last move reflected on the board (respects the history cursor)
    pub fn last_move(&self) -> Option<&Move> {
        self.history
            .applied()
            .checked_sub(1)
            .map(|i| &self.history.moves()[i])
    }

    /// Cells where a stone may be placed right now
    pub fn legal_placements(&self) -> Vec<Pos> {
        if self.is_over() || self.phase() != Phase::Placing {
            return Vec::new();
        }
        self.board.empty_positions()
    }

    /// Bent triples the active player may convert from
    pub fn bent_triples(&self) -> Vec<BentTriple> {
        if self.is_over() {
            return Vec::new();
        }
        detect_bent_triples(&self.board, self.active)
    }

    /// Stones of the active player eligible for conversion
    pub fn convertible_positions(&self) -> Vec<Pos> {
        if self.is_over() {
            return Vec::new();
        }
        convertible_positions(&self.board, self.active)
    }

    /// First triple containing `pos` and the index of `pos` within it
    pub fn conversion_at(&self, pos: Pos) -> Option<(BentTriple, usize)> {
        self.bent_triples().into_iter().find_map(|triple| {
            let index = triple.stones.iter().position(|&p| p == pos)?;
            Some((triple, index))
        })
    }

    /// Cores offered for selection
    pub fn pending_cores(&self) -> &[Core] {
        match &self.turn {
            TurnState::Placing => &[],
            TurnState::Resonating { cores, .. } | TurnState::SelectingFocus { cores, .. } => cores,
        }
    }

    pub fn selected_core(&self) -> Option<Core> {
        match &self.turn {
            TurnState::SelectingFocus { core, .. } => Some(*core),
            _ => None,
        }
    }

    /// Stone placed this turn whose cores are still unresolved
    pub fn pending_placement(&self) -> Option<Pos> {
        self.turn.pending().map(|p| p.pos)
    }

    /// Display flags for every cell, indexed `[row][col]`
    pub fn cell_marks(&self) -> [[CellMarks; BOARD_SIZE]; BOARD_SIZE] {
        let mut marks = [[CellMarks::default(); BOARD_SIZE]; BOARD_SIZE];
        let mut mark = |pos: Pos, f: fn(&mut CellMarks)| {
            f(&mut marks[pos.row as usize][pos.col as usize]);
        };

        let cores: Vec<Core> = match self.selected_core() {
            Some(core) => vec![core],
            None => self.pending_cores().to_vec(),
        };
        for pos in cores.iter().flat_map(Core::positions) {
            mark(pos, |m| m.highlighted = true);
        }

        for pos in self.convertible_positions() {
            mark(pos, |m| m.convertible = true);
        }

        if let Some(MoveDetail::Resonate { focal, paths, .. }) = self.last_move().map(|m| &m.detail) {
            mark(*focal, |m| m.resonating = true);
            for &pos in paths.iter().flat_map(|p| &p.steps) {
                mark(pos, |m| m.resonating = true);
            }
        }

        marks
    }

    // ------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------

    /// Place a conductor for the active player
    #[instrument(level = "debug", skip(self), fields(player = %self.active), err(level = "debug"))]
    pub fn place_stone(&mut self, pos: Pos) -> Result<()> {
        self.ensure_playing()?;
        self.ensure_phase(Phase::Placing, "place stone")?;
        if !self.board.cell(pos)?.is_empty() {
            return Err(RulesError::Occupied(pos));
        }

        let player = self.active;
        let before = self.board.clone();
        let mut after = before.clone();
        after.set(pos, Cell::Conductor(player))?;
        self.events.push(GameEvent::StonePlaced { player, pos });

        let cores = detect_cores_touching(&after, player, pos);
        if cores.is_empty() {
            self.finalize(player, MoveKind::Place, pos, before, after, MoveDetail::Place);
            return Ok(());
        }

        debug!(count = cores.len(), "placement completed cores");
        self.events.push(GameEvent::CoreFormed {
            player,
            cores: cores.clone(),
        });
        self.board = after;
        self.turn = TurnState::Resonating {
            pending: PendingPlacement { before, pos },
            cores,
        };
        Ok(())
    }

    /// Choose which of the offered cores resonates
    #[instrument(level = "debug", skip(self), err(level = "debug"))]
    pub fn select_core(&mut self, core: Core) -> Result<()> {
        self.ensure_playing()?;
        let (pending, cores) = match &self.turn {
            TurnState::Resonating { pending, cores }
            | TurnState::SelectingFocus { pending, cores, .. } => (pending, cores),
            TurnState::Placing => return Err(self.phase_error("select core")),
        };
        if !cores.contains(&core) {
            return Err(RulesError::NotAnOfferedCore);
        }

        self.turn = TurnState::SelectingFocus {
            pending: pending.clone(),
            cores: cores.clone(),
            core,
        };
        Ok(())
    }

    /// Choose the focal cell of the selected core and resolve resonance
    #[instrument(level = "debug", skip(self), err(level = "debug"))]
    pub fn select_focus(&mut self, pos: Pos) -> Result<()> {
        self.ensure_playing()?;
        let TurnState::SelectingFocus { pending, core, .. } = &self.turn else {
            return Err(self.phase_error("select focus"));
        };
        let (core, before, placed) = (*core, pending.before.clone(), pending.pos);

        let resonance = activate_resonance(&self.board, &core, pos)?;
        let converted = resonance.converted(pos);
        let player = core.owner;

        self.events.push(GameEvent::ResonanceActivated {
            player,
            core,
            focal: pos,
            paths: resonance.paths.clone(),
        });
        for &converted_pos in &converted {
            self.events.push(GameEvent::StoneConverted {
                player,
                pos: converted_pos,
            });
        }
        debug!(converted = converted.len(), "resonance resolved");

        let detail = MoveDetail::Resonate {
            placed,
            core,
            focal: pos,
            paths: resonance.paths,
            converted,
        };
        self.finalize(player, MoveKind::Resonate, pos, before, resonance.board, detail);
        Ok(())
    }

    /// Convert stone `index` of a bent triple to a keystone, ending the turn.
    ///
    /// Accepted in every phase. During core resolution the pending placement
    /// is kept and the core selection is abandoned.
    #[instrument(level = "debug", skip(self), err(level = "debug"))]
    pub fn convert_bent_triple(&mut self, triple: BentTriple, index: usize) -> Result<()> {
        self.ensure_playing()?;
        if index >= triple.stones.len() {
            return Err(RulesError::TripleIndex(index));
        }
        if triple.owner != self.active || !is_bent_triple(&self.board, &triple) {
            return Err(RulesError::NotABentTriple);
        }

        let player = self.active;
        let target = triple.stones[index];
        let mut after = self.board.clone();
        after.promote(target, player);

        let (before, placed) = match self.turn.pending() {
            Some(pending) => (pending.before.clone(), Some(pending.pos)),
            None => (self.board.clone(), None),
        };

        self.events.push(GameEvent::StoneConverted { player, pos: target });
        let detail = MoveDetail::Convert {
            triple,
            index,
            placed,
        };
        self.finalize(player, MoveKind::Convert, target, before, after, detail);
        Ok(())
    }

    /// Step back one move. The first undo enters history mode.
    #[instrument(level = "debug", skip(self), err(level = "debug"))]
    pub fn undo(&mut self) -> Result<()> {
        self.ensure_navigable("undo")?;
        let mv = self.history.undo()?;

        self.board = mv.before.clone();
        self.turn = TurnState::Placing;
        self.active = mv.player;
        self.status = GameStatus::Playing;
        self.winning_line = None;

        let applied = self.history.applied();
        self.events.push(GameEvent::HistoryNavigated { applied });
        Ok(())
    }

    /// Step forward one move while browsing history
    #[instrument(level = "debug", skip(self), err(level = "debug"))]
    pub fn redo(&mut self) -> Result<()> {
        self.ensure_navigable("redo")?;
        let mv = self.history.redo()?;

        self.board = mv.after.clone();
        if mv.won {
            self.status = GameStatus::Won(mv.player);
            self.active = mv.player;
            self.winning_line = find_winning_line(&self.board, mv.player);
        } else {
            self.status = GameStatus::Playing;
            self.active = mv.player.opponent();
            self.winning_line = None;
        }

        let applied = self.history.applied();
        self.events.push(GameEvent::HistoryNavigated { applied });
        Ok(())
    }

    /// Leave history mode, discarding every move after the cursor
    #[instrument(level = "debug", skip(self), err(level = "debug"))]
    pub fn confirm_undo(&mut self) -> Result<()> {
        self.ensure_navigable("confirm undo")?;
        let discarded = self.history.confirm()?;
        info!(discarded, "history truncated");
        self.events.push(GameEvent::HistoryTruncated { discarded });
        Ok(())
    }

    /// Start a new game. The event log is kept and continues.
    pub fn reset(&mut self) {
        info!("game reset");
        self.board = Board::new();
        self.active = Player::Black;
        self.status = GameStatus::Playing;
        self.turn = TurnState::Placing;
        self.history = History::new();
        self.winning_line = None;
        self.events.push(GameEvent::GameReset);
        self.start_turn();
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn ensure_playing(&self) -> Result<()> {
        match self.status {
            GameStatus::Playing => Ok(()),
            GameStatus::Won(_) => Err(RulesError::GameOver),
        }
    }

    fn ensure_phase(&self, phase: Phase, action: &'static str) -> Result<()> {
        if self.phase() == phase {
            Ok(())
        } else {
            Err(self.phase_error(action))
        }
    }

    /// History commands run between turns, or once the game is over
    fn ensure_navigable(&self, action: &'static str) -> Result<()> {
        if self.is_over() {
            Ok(())
        } else {
            self.ensure_phase(Phase::Placing, action)
        }
    }

    fn phase_error(&self, action: &'static str) -> RulesError {
        RulesError::InvalidPhaseAction {
            action,
            phase: self.phase().name(),
        }
    }

    /// Record a completed turn, check for a win, and hand over the turn
    fn finalize(
        &mut self,
        player: Player,
        kind: MoveKind,
        pos: Pos,
        before: Board,
        after: Board,
        detail: MoveDetail,
    ) {
        let line = find_winning_line(&after, player);

        if self.history.in_history_mode() {
            let discarded = self.history.len() - self.history.applied();
            if discarded > 0 {
                self.events.push(GameEvent::HistoryTruncated { discarded });
            }
        }
        self.history.record(Move {
            number: self.history.next_number(),
            player,
            kind,
            pos,
            before,
            after: after.clone(),
            detail,
            won: line.is_some(),
        });

        self.board = after;

        // A win freezes the turn where it ended
        if let Some(line) = line {
            info!(%player, moves = self.history.len(), "game won");
            self.status = GameStatus::Won(player);
            self.winning_line = Some(line);
            self.events.push(GameEvent::GameWon {
                player,
                line: Some(line),
            });
        } else {
            self.turn = TurnState::Placing;
            self.active = player.opponent();
            self.start_turn();
        }
    }

    fn start_turn(&mut self) {
        let player = self.active;
        self.events.push(GameEvent::TurnStarted {
            player,
            move_number: self.history.next_number(),
        });
        let triples = detect_bent_triples(&self.board, player);
        if !triples.is_empty() {
            self.events
                .push(GameEvent::BentTripleConvertible { player, triples });
        }
    }
}
