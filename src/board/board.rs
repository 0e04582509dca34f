//! Board structure holding one bitboard plane per owner and stone kind

use super::bitboard::Bitboard;
use super::{Cell, Player, Pos, StoneKind, BOARD_SIZE};
use crate::error::{Result, RulesError};

/// Game board.
///
/// Cloning copies four bitboards; the engine clones before every mutation
/// so earlier snapshots held by history stay valid.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Board {
    /// Conductor stones, indexed by `Player::index`
    conductors: [Bitboard; 2],
    /// Keystone stones, indexed by `Player::index`
    keystones: [Bitboard; 2],
}

impl Board {
    /// Empty board
    pub fn new() -> Self {
        Self {
            conductors: [Bitboard::new(); 2],
            keystones: [Bitboard::new(); 2],
        }
    }

    /// Checked cell lookup
    pub fn cell(&self, pos: Pos) -> Result<Cell> {
        if !pos.on_board() {
            return Err(RulesError::OutOfBounds {
                row: pos.row,
                col: pos.col,
            });
        }
        Ok(self.get(pos))
    }

    /// Get cell at position. `pos` must be on the board.
    #[inline]
    pub fn get(&self, pos: Pos) -> Cell {
        for player in [Player::Black, Player::White] {
            let i = player.index();
            if self.conductors[i].get(pos) {
                return Cell::Conductor(player);
            }
            if self.keystones[i].get(pos) {
                return Cell::Keystone(player);
            }
        }
        Cell::Empty
    }

    #[inline]
    pub fn is_empty(&self, pos: Pos) -> bool {
        self.get(pos).is_empty()
    }

    /// Checked write. Clears every other plane at `pos` so the cell holds
    /// exactly one state.
    pub fn set(&mut self, pos: Pos, cell: Cell) -> Result<()> {
        if !pos.on_board() {
            return Err(RulesError::OutOfBounds {
                row: pos.row,
                col: pos.col,
            });
        }
        for plane in self.conductors.iter_mut().chain(self.keystones.iter_mut()) {
            plane.clear(pos);
        }
        match cell {
            Cell::Empty => {}
            Cell::Conductor(p) => self.conductors[p.index()].set(pos),
            Cell::Keystone(p) => self.keystones[p.index()].set(pos),
        }
        Ok(())
    }

    /// Turn `owner`'s conductor at `pos` into a keystone.
    ///
    /// Returns whether a conversion happened; any other cell is left alone.
    pub fn promote(&mut self, pos: Pos, owner: Player) -> bool {
        if self.get(pos) != Cell::Conductor(owner) {
            return false;
        }
        self.conductors[owner.index()].clear(pos);
        self.keystones[owner.index()].set(pos);
        true
    }

    /// Bitboard plane for an owner and kind
    #[inline]
    pub fn stones(&self, owner: Player, kind: StoneKind) -> &Bitboard {
        match kind {
            StoneKind::Conductor => &self.conductors[owner.index()],
            StoneKind::Keystone => &self.keystones[owner.index()],
        }
    }

    /// All positions holding `owner`'s stones of `kind`, row-major
    pub fn positions(&self, owner: Player, kind: StoneKind) -> Vec<Pos> {
        self.stones(owner, kind).iter_ones().collect()
    }

    /// All empty cells, row-major
    pub fn empty_positions(&self) -> Vec<Pos> {
        (0..BOARD_SIZE * BOARD_SIZE)
            .map(Pos::from_index)
            .filter(|&pos| self.is_empty(pos))
            .collect()
    }

    #[inline]
    pub fn count(&self, owner: Player, kind: StoneKind) -> u32 {
        self.stones(owner, kind).count()
    }

    /// Total stones on board
    pub fn stone_count(&self) -> u32 {
        self.conductors
            .iter()
            .chain(self.keystones.iter())
            .map(Bitboard::count)
            .sum()
    }

    /// Check if board is empty
    pub fn is_board_empty(&self) -> bool {
        self.stone_count() == 0
    }
}
