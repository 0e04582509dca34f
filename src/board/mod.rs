//! Board representation for Keystone

pub mod bitboard;
pub mod board;


// Re-exports
pub use bitboard::Bitboard;
pub use board::Board;

use std::fmt;

/// Board size (17x17)
pub const BOARD_SIZE: usize = 17;
pub const TOTAL_CELLS: usize = BOARD_SIZE * BOARD_SIZE; // 289

/// The two sides of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Player {
    Black,
    White,
}

impl Player {
    /// Get opponent
    #[inline]
    pub fn opponent(self) -> Player {
        match self {
            Player::Black => Player::White,
            Player::White => Player::Black,
        }
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        match self {
            Player::Black => 0,
            Player::White => 1,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::Black => write!(f, "Black"),
            Player::White => write!(f, "White"),
        }
    }
}

/// Stone types. Conductors are placed; keystones only appear through conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoneKind {
    Conductor,
    Keystone,
}

/// Contents of a single cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Empty,
    Conductor(Player),
    Keystone(Player),
}

impl Cell {
    /// Owner of the stone, `None` for empty cells
    #[inline]
    pub fn owner(self) -> Option<Player> {
        match self {
            Cell::Empty => None,
            Cell::Conductor(p) | Cell::Keystone(p) => Some(p),
        }
    }

    #[inline]
    pub fn kind(self) -> Option<StoneKind> {
        match self {
            Cell::Empty => None,
            Cell::Conductor(_) => Some(StoneKind::Conductor),
            Cell::Keystone(_) => Some(StoneKind::Keystone),
        }
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }
}

/// Position on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pos {
    pub row: u8,
    pub col: u8,
}

impl Pos {
    /// Unchecked constructor. Off-board positions are representable; the
    /// board and engine reject them with `OutOfBounds`.
    #[inline]
    pub fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// Checked constructor from signed coordinates
    #[inline]
    pub fn try_new(row: i32, col: i32) -> Option<Self> {
        if Self::is_valid(row, col) {
            Some(Self {
                row: row as u8,
                col: col as u8,
            })
        } else {
            None
        }
    }

    #[inline]
    pub fn to_index(self) -> usize {
        self.row as usize * BOARD_SIZE + self.col as usize
    }

    #[inline]
    pub fn from_index(idx: usize) -> Self {
        Self {
            row: (idx / BOARD_SIZE) as u8,
            col: (idx % BOARD_SIZE) as u8,
        }
    }

    #[inline]
    pub fn is_valid(row: i32, col: i32) -> bool {
        row >= 0 && row < BOARD_SIZE as i32 && col >= 0 && col < BOARD_SIZE as i32
    }

    /// Whether this position lies on the board
    #[inline]
    pub fn on_board(self) -> bool {
        (self.row as usize) < BOARD_SIZE && (self.col as usize) < BOARD_SIZE
    }

    /// Step by a direction vector, `None` when leaving the board
    #[inline]
    pub fn offset(self, dr: i32, dc: i32) -> Option<Pos> {
        Pos::try_new(self.row as i32 + dr, self.col as i32 + dc)
    }

    /// Orthogonal adjacency (Manhattan distance exactly 1)
    #[inline]
    pub fn is_adjacent(self, other: Pos) -> bool {
        let dr = (self.row as i32 - other.row as i32).abs();
        let dc = (self.col as i32 - other.col as i32).abs();
        dr + dc == 1
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl PartialOrd for Pos {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pos {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.to_index().cmp(&other.to_index())
    }
}
