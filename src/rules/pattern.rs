//! Pattern detection: bent triples and 2x2 cores
//!
//! Bent triple: three conductors of one owner where exactly two of the three
//! pairs are orthogonally adjacent. Any of the three may be converted.
//!
//! Core: a 2x2 square whose four cells all hold stones of one owner,
//! conductors or keystones alike.
//!
//! All detection here is a pure function of the board.

use itertools::Itertools;

use crate::board::{Board, Cell, Player, Pos, StoneKind, BOARD_SIZE};

/// Three same-owner conductor positions forming a bent (or straight) chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BentTriple {
    pub owner: Player,
    /// Sorted row-major
    pub stones: [Pos; 3],
}

impl BentTriple {
    /// Build a triple if the three positions qualify geometrically.
    ///
    /// Ownership is not checked here; see [`is_bent_triple`].
    pub fn from_positions(owner: Player, a: Pos, b: Pos, c: Pos) -> Option<Self> {
        let adjacent_pairs = [a.is_adjacent(b), b.is_adjacent(c), a.is_adjacent(c)]
            .iter()
            .filter(|&&adj| adj)
            .count();
        if adjacent_pairs != 2 {
            return None;
        }
        let mut stones = [a, b, c];
        stones.sort();
        Some(Self { owner, stones })
    }

    pub fn contains(&self, pos: Pos) -> bool {
        self.stones.contains(&pos)
    }
}

/// A 2x2 square of one owner's stones, identified by its top-left anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Core {
    pub owner: Player,
    pub anchor: Pos,
}

impl Core {
    /// The four member cells: anchor, right, below, below-right
    pub fn positions(&self) -> [Pos; 4] {
        let Pos { row, col } = self.anchor;
        [
            Pos::new(row, col),
            Pos::new(row, col + 1),
            Pos::new(row + 1, col),
            Pos::new(row + 1, col + 1),
        ]
    }

    #[inline]
    pub fn contains(&self, pos: Pos) -> bool {
        pos.row >= self.anchor.row
            && pos.row <= self.anchor.row + 1
            && pos.col >= self.anchor.col
            && pos.col <= self.anchor.col + 1
    }
}

/// All bent triples among `owner`'s conductors.
///
/// Enumerates every 3-combination of conductors: O(n³) in the conductor
/// count. Keystones never take part.
pub fn detect_bent_triples(board: &Board, owner: Player) -> Vec<BentTriple> {
    board
        .positions(owner, StoneKind::Conductor)
        .into_iter()
        .tuple_combinations()
        .filter_map(|(a, b, c)| BentTriple::from_positions(owner, a, b, c))
        .collect()
}

/// Whether `triple` is currently a valid bent triple on `board`
pub fn is_bent_triple(board: &Board, triple: &BentTriple) -> bool {
    let [a, b, c] = triple.stones;
    let all_conductors = triple.stones.iter().all(|&pos| {
        pos.on_board() && board.get(pos) == Cell::Conductor(triple.owner)
    });
    all_conductors && BentTriple::from_positions(triple.owner, a, b, c).is_some()
}

/// Every stone of `owner` that belongs to at least one bent triple
pub fn convertible_positions(board: &Board, owner: Player) -> Vec<Pos> {
    detect_bent_triples(board, owner)
        .iter()
        .flat_map(|t| t.stones)
        .sorted()
        .dedup()
        .collect()
}

/// Core anchored at `anchor` if all four cells belong to `owner`
fn core_at(board: &Board, owner: Player, anchor: Pos) -> Option<Core> {
    let core = Core { owner, anchor };
    core.positions()
        .iter()
        .all(|&pos| board.get(pos).owner() == Some(owner))
        .then_some(core)
}

/// All cores of `owner`, scanning every 16x16 top-left anchor
pub fn detect_cores(board: &Board, owner: Player) -> Vec<Core> {
    let last = BOARD_SIZE as u8 - 1;
    (0..last)
        .cartesian_product(0..last)
        .filter_map(|(row, col)| core_at(board, owner, Pos::new(row, col)))
        .collect()
}

/// Cores of `owner` that include `pos`.
///
/// Only the (at most four) anchors whose square covers `pos` are examined,
/// so this is the subset of [`detect_cores`] containing `pos`.
pub fn detect_cores_touching(board: &Board, owner: Player, pos: Pos) -> Vec<Core> {
    let last = BOARD_SIZE as i32 - 1;
    let mut cores = Vec::with_capacity(4);
    for dr in [-1, 0] {
        for dc in [-1, 0] {
            let row = pos.row as i32 + dr;
            let col = pos.col as i32 + dc;
            if row < 0 || col < 0 || row >= last || col >= last {
                continue;
            }
            if let Some(core) = core_at(board, owner, Pos::new(row as u8, col as u8)) {
                cores.push(core);
            }
        }
    }
    cores
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(board: &mut Board, cells: &[(u8, u8)], cell: Cell) {
        for &(r, c) in cells {
            board.set(Pos::new(r, c), cell).unwrap();
        }
    }

    #[test]
    fn test_empty_board_has_no_patterns() {
        let board = Board::new();
        for player in [Player::Black, Player::White] {
            assert!(detect_bent_triples(&board, player).is_empty());
            assert!(detect_cores(&board, player).is_empty());
        }
    }

    #[test]
    fn test_two_stones_no_patterns() {
        let mut board = Board::new();
        place(&mut board, &[(5, 5), (5, 6)], Cell::Conductor(Player::Black));
        assert!(detect_bent_triples(&board, Player::Black).is_empty());
        assert!(detect_cores_touching(&board, Player::Black, Pos::new(5, 6)).is_empty());
    }

    #[test]
    fn test_l_shape_is_bent_triple() {
        let mut board = Board::new();
        place(&mut board, &[(5, 5), (5, 6), (6, 5)], Cell::Conductor(Player::Black));
        let triples = detect_bent_triples(&board, Player::Black);
        assert_eq!(triples.len(), 1);
        assert_eq!(triples[0].stones, [Pos::new(5, 5), Pos::new(5, 6), Pos::new(6, 5)]);
        assert!(detect_bent_triples(&board, Player::White).is_empty());
    }

    #[test]
    fn test_straight_line_counts_as_triple() {
        let mut board = Board::new();
        place(&mut board, &[(3, 3), (3, 4), (3, 5)], Cell::Conductor(Player::White));
        let triples = detect_bent_triples(&board, Player::White);
        assert_eq!(triples.len(), 1);
        assert_eq!(triples[0].stones, [Pos::new(3, 3), Pos::new(3, 4), Pos::new(3, 5)]);
    }

    #[test]
    fn test_diagonal_neighbors_do_not_form_triple() {
        let mut board = Board::new();
        place(&mut board, &[(3, 3), (4, 4), (5, 5)], Cell::Conductor(Player::Black));
        assert!(detect_bent_triples(&board, Player::Black).is_empty());

        // One adjacent pair only
        let mut board = Board::new();
        place(&mut board, &[(3, 3), (3, 4), (5, 5)], Cell::Conductor(Player::Black));
        assert!(detect_bent_triples(&board, Player::Black).is_empty());
    }

    #[test]
    fn test_keystones_excluded_from_triples() {
        let mut board = Board::new();
        place(&mut board, &[(5, 5), (5, 6)], Cell::Conductor(Player::Black));
        place(&mut board, &[(6, 5)], Cell::Keystone(Player::Black));
        assert!(detect_bent_triples(&board, Player::Black).is_empty());
    }

    #[test]
    fn test_is_bent_triple_revalidates_ownership() {
        let mut board = Board::new();
        place(&mut board, &[(5, 5), (5, 6), (6, 5)], Cell::Conductor(Player::Black));
        let triple = detect_bent_triples(&board, Player::Black)[0];
        assert!(is_bent_triple(&board, &triple));

        board.promote(Pos::new(5, 6), Player::Black);
        assert!(!is_bent_triple(&board, &triple));
    }

    #[test]
    fn test_convertible_positions_dedup() {
        let mut board = Board::new();
        // T shape: four triples share the stem
        place(
            &mut board,
            &[(5, 4), (5, 5), (5, 6), (6, 5)],
            Cell::Conductor(Player::Black),
        );
        let convertible = convertible_positions(&board, Player::Black);
        assert_eq!(
            convertible,
            vec![Pos::new(5, 4), Pos::new(5, 5), Pos::new(5, 6), Pos::new(6, 5)]
        );
    }

    #[test]
    fn test_core_with_mixed_kinds() {
        let mut board = Board::new();
        place(&mut board, &[(7, 7), (7, 8), (8, 7)], Cell::Conductor(Player::White));
        place(&mut board, &[(8, 8)], Cell::Keystone(Player::White));
        let cores = detect_cores(&board, Player::White);
        assert_eq!(cores, vec![Core { owner: Player::White, anchor: Pos::new(7, 7) }]);
        assert!(detect_cores(&board, Player::Black).is_empty());
    }

    #[test]
    fn test_mixed_owner_square_is_not_core() {
        let mut board = Board::new();
        place(&mut board, &[(7, 7), (7, 8), (8, 7)], Cell::Conductor(Player::White));
        place(&mut board, &[(8, 8)], Cell::Conductor(Player::Black));
        assert!(detect_cores(&board, Player::White).is_empty());
    }

    #[test]
    fn test_cores_touching_completing_stone() {
        let mut board = Board::new();
        place(
            &mut board,
            &[(0, 0), (0, 1), (1, 0), (1, 1), (10, 10), (10, 11), (11, 10), (11, 11)],
            Cell::Conductor(Player::Black),
        );
        let touching = detect_cores_touching(&board, Player::Black, Pos::new(1, 1));
        assert_eq!(touching, vec![Core { owner: Player::Black, anchor: Pos::new(0, 0) }]);

        let all = detect_cores(&board, Player::Black);
        assert_eq!(all.len(), 2);
        for core in &touching {
            assert!(all.contains(core));
        }
    }

    #[test]
    fn test_cores_touching_matches_full_scan() {
        let mut board = Board::new();
        // 3x3 block: four overlapping cores, all containing the center
        for r in 4..7 {
            for c in 4..7 {
                board.set(Pos::new(r, c), Cell::Conductor(Player::Black)).unwrap();
            }
        }
        for r in 3..8 {
            for c in 3..8 {
                let pos = Pos::new(r, c);
                let expected: Vec<Core> = detect_cores(&board, Player::Black)
                    .into_iter()
                    .filter(|core| core.contains(pos))
                    .collect();
                let mut touching = detect_cores_touching(&board, Player::Black, pos);
                touching.sort_by_key(|core| core.anchor);
                assert_eq!(touching, expected, "mismatch at {pos}");
            }
        }
        assert_eq!(detect_cores_touching(&board, Player::Black, Pos::new(5, 5)).len(), 4);
    }

    #[test]
    fn test_cores_touching_at_board_corner() {
        let mut board = Board::new();
        place(
            &mut board,
            &[(15, 15), (15, 16), (16, 15), (16, 16)],
            Cell::Keystone(Player::White),
        );
        let cores = detect_cores_touching(&board, Player::White, Pos::new(16, 16));
        assert_eq!(cores.len(), 1);
        assert_eq!(cores[0].anchor, Pos::new(15, 15));
    }

    #[test]
    fn test_core_contains() {
        let core = Core { owner: Player::Black, anchor: Pos::new(3, 3) };
        for pos in core.positions() {
            assert!(core.contains(pos));
        }
        assert!(!core.contains(Pos::new(2, 3)));
        assert!(!core.contains(Pos::new(5, 4)));
    }
}
