//! Move records and the undo/redo history
//!
//! Each move stores full board snapshots from before and after it, so undo
//! and redo are plain restores and never replay rules.

use crate::board::{Board, Player, Pos};
use crate::error::{Result, RulesError};
use crate::rules::{BentTriple, Core, ResonancePath};

/// What a completed turn did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKind {
    /// Plain conductor placement
    Place,
    /// Bent-triple stone converted to a keystone
    Convert,
    /// Placement that completed a core, followed by resonance
    Resonate,
}

/// Kind-specific details of a move
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveDetail {
    Place,
    Convert {
        triple: BentTriple,
        index: usize,
        /// Conductor placed earlier in the same turn, if the conversion
        /// was made instead of resolving a core
        placed: Option<Pos>,
    },
    Resonate {
        /// The stone whose placement completed the core
        placed: Pos,
        core: Core,
        focal: Pos,
        paths: [ResonancePath; 4],
        converted: Vec<Pos>,
    },
}

/// One completed turn. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Move {
    /// 1-based sequence number
    pub number: usize,
    pub player: Player,
    pub kind: MoveKind,
    /// Placed stone for `Place`, converted stone for `Convert`, focal for `Resonate`
    pub pos: Pos,
    pub before: Board,
    pub after: Board,
    pub detail: MoveDetail,
    /// Whether this move won the game for `player`
    pub won: bool,
}

/// Recorded moves plus a browsing cursor.
///
/// Outside history mode the board reflects every move. In history mode the
/// cursor is the number of moves applied: at cursor `k` the board is
/// `moves[k].before`, and move `k + 1` (1-based) is the next redo.
/// Confirming at cursor `k` therefore keeps exactly `k` moves, the ones
/// already on the board.
#[derive(Debug, Clone, Default)]
pub struct History {
    moves: Vec<Move>,
    cursor: Option<usize>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Cursor while browsing, `None` when live
    #[inline]
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    #[inline]
    pub fn in_history_mode(&self) -> bool {
        self.cursor.is_some()
    }

    /// Number of moves reflected by the current board
    pub fn applied(&self) -> usize {
        self.cursor.unwrap_or(self.moves.len())
    }

    pub fn last(&self) -> Option<&Move> {
        self.moves.last()
    }

    /// Sequence number the next recorded move will get
    pub fn next_number(&self) -> usize {
        self.applied() + 1
    }

    /// Append a move at the cursor, discarding any redo branch
    pub fn record(&mut self, mv: Move) {
        self.truncate_to_cursor();
        debug_assert_eq!(mv.number, self.moves.len() + 1);
        self.moves.push(mv);
    }

    /// Step back one move and return it; its `before` is the board to show
    pub fn undo(&mut self) -> Result<&Move> {
        let target = match self.cursor {
            None if self.moves.is_empty() => return Err(RulesError::EmptyHistoryUndo),
            None => self.moves.len() - 1,
            Some(0) => return Err(RulesError::EmptyHistoryUndo),
            Some(k) => k - 1,
        };
        self.cursor = Some(target);
        Ok(&self.moves[target])
    }

    /// Step forward one move and return it; its `after` is the board to show.
    ///
    /// Redoing the last move leaves history mode.
    pub fn redo(&mut self) -> Result<&Move> {
        let k = self.cursor.ok_or(RulesError::HistoryBoundsRedo)?;
        let next = k + 1;
        self.cursor = (next < self.moves.len()).then_some(next);
        Ok(&self.moves[k])
    }

    /// Leave history mode, keeping the `cursor` applied moves and dropping
    /// the rest.
    ///
    /// Returns how many moves were discarded.
    pub fn confirm(&mut self) -> Result<usize> {
        if self.cursor.is_none() {
            return Err(RulesError::NotInHistoryMode);
        }
        let before = self.moves.len();
        self.truncate_to_cursor();
        Ok(before - self.moves.len())
    }

    fn truncate_to_cursor(&mut self) {
        if let Some(k) = self.cursor.take() {
            self.moves.truncate(k);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Cell;

    fn mv(number: usize, before: &Board, pos: Pos) -> (Move, Board) {
        let mut after = before.clone();
        after.set(pos, Cell::Conductor(Player::Black)).unwrap();
        let m = Move {
            number,
            player: Player::Black,
            kind: MoveKind::Place,
            pos,
            before: before.clone(),
            after: after.clone(),
            detail: MoveDetail::Place,
            won: false,
        };
        (m, after)
    }

    fn three_moves() -> History {
        let mut history = History::new();
        let mut board = Board::new();
        for i in 0..3 {
            let (m, after) = mv(i + 1, &board, Pos::new(0, i as u8));
            history.record(m);
            board = after;
        }
        history
    }

    #[test]
    fn test_undo_empty() {
        let mut history = History::new();
        assert_eq!(history.undo().unwrap_err(), RulesError::EmptyHistoryUndo);
        assert_eq!(history.redo().unwrap_err(), RulesError::HistoryBoundsRedo);
        assert!(!history.in_history_mode());
    }

    #[test]
    fn test_undo_walks_back_to_start() {
        let mut history = three_moves();
        assert_eq!(history.undo().unwrap().number, 3);
        assert_eq!(history.cursor(), Some(2));
        assert_eq!(history.undo().unwrap().number, 2);
        assert_eq!(history.undo().unwrap().number, 1);
        assert_eq!(history.applied(), 0);
        assert_eq!(history.undo().unwrap_err(), RulesError::EmptyHistoryUndo);
        assert_eq!(history.len(), 3, "undo never deletes");
    }

    #[test]
    fn test_redo_leaves_history_mode_at_end() {
        let mut history = three_moves();
        history.undo().unwrap();
        history.undo().unwrap();
        assert_eq!(history.redo().unwrap().number, 2);
        assert_eq!(history.redo().unwrap().number, 3);
        assert!(!history.in_history_mode());
        assert_eq!(history.redo().unwrap_err(), RulesError::HistoryBoundsRedo);
    }

    #[test]
    fn test_confirm_truncates() {
        let mut history = three_moves();
        history.undo().unwrap();
        history.undo().unwrap();
        assert_eq!(history.confirm(), Ok(2));
        assert_eq!(history.len(), 1);
        assert!(!history.in_history_mode());
        assert_eq!(history.confirm(), Err(RulesError::NotInHistoryMode));
    }

    #[test]
    fn test_record_in_history_mode_branches() {
        let mut history = three_moves();
        history.undo().unwrap();
        history.undo().unwrap();
        let board = history.moves()[1].before.clone();
        let (m, _) = mv(history.next_number(), &board, Pos::new(5, 5));
        history.record(m);
        assert_eq!(history.len(), 2);
        assert_eq!(history.last().unwrap().pos, Pos::new(5, 5));
        assert!(!history.in_history_mode());
    }
}
