//! Win condition checking
//!
//! A player wins with a run of exactly five keystones in a row, column or
//! diagonal. Conductors never count. A run of six or more is void, even
//! though it contains five consecutive keystones.

use crate::board::{Board, Cell, Player, Pos, StoneKind};

/// Direction vectors for line checking (4 orientations)
const DIRECTIONS: [(i32, i32); 4] = [
    (0, 1),  // Horizontal
    (1, 0),  // Vertical
    (1, 1),  // Diagonal SE
    (1, -1), // Anti-diagonal SW
];

/// Length of a winning run
pub const WIN_LENGTH: usize = 5;

/// Check whether `player` has an exact run of five keystones
pub fn check_win(board: &Board, player: Player) -> bool {
    find_winning_line(board, player).is_some()
}

/// Find an exact five-keystone run for `player`.
///
/// Only maximal runs are measured: each run is walked once from its first
/// stone, so a six-run is seen as length six and rejected.
pub fn find_winning_line(board: &Board, player: Player) -> Option<[Pos; WIN_LENGTH]> {
    let keystones = board.stones(player, StoneKind::Keystone);
    if (keystones.count() as usize) < WIN_LENGTH {
        return None;
    }
    let is_own = |pos: Pos| board.get(pos) == Cell::Keystone(player);

    for start in keystones.iter_ones() {
        for &(dr, dc) in &DIRECTIONS {
            // Not the first stone of its run
            if start.offset(-dr, -dc).is_some_and(is_own) {
                continue;
            }

            let mut line = vec![start];
            let mut current = start;
            while let Some(next) = current.offset(dr, dc).filter(|&p| is_own(p)) {
                line.push(next);
                current = next;
            }

            if line.len() == WIN_LENGTH {
                return Some([line[0], line[1], line[2], line[3], line[4]]);
            }
        }
    }
    None
}

/// Length of the longest keystone run for `player` in any orientation
pub fn longest_run(board: &Board, player: Player) -> usize {
    let is_own = |pos: Pos| board.get(pos) == Cell::Keystone(player);
    board
        .stones(player, StoneKind::Keystone)
        .iter_ones()
        .flat_map(|start| {
            DIRECTIONS.iter().map(move |&(dr, dc)| {
                let mut len = 1;
                let mut current = start;
                while let Some(next) = current.offset(dr, dc).filter(|&p| is_own(p)) {
                    len += 1;
                    current = next;
                }
                len
            })
        })
        .max()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keystones(cells: impl IntoIterator<Item = (u8, u8)>, player: Player) -> Board {
        let mut board = Board::new();
        for (r, c) in cells {
            board.set(Pos::new(r, c), Cell::Keystone(player)).unwrap();
        }
        board
    }

    #[test]
    fn test_five_in_row_horizontal() {
        let board = keystones((3..8).map(|c| (9, c)), Player::Black);
        assert!(check_win(&board, Player::Black));
        assert!(!check_win(&board, Player::White));
        assert_eq!(
            find_winning_line(&board, Player::Black),
            Some([Pos::new(9, 3), Pos::new(9, 4), Pos::new(9, 5), Pos::new(9, 6), Pos::new(9, 7)])
        );
    }

    #[test]
    fn test_five_in_row_vertical() {
        let board = keystones((0..5).map(|r| (r, 9)), Player::White);
        assert!(check_win(&board, Player::White));
    }

    #[test]
    fn test_five_in_row_diagonal() {
        let board = keystones((0..5).map(|i| (i, i)), Player::White);
        assert!(check_win(&board, Player::White));
    }

    #[test]
    fn test_anti_diagonal_five() {
        let board = keystones((0..5).map(|i| (4 + i, 8 - i)), Player::Black);
        assert!(check_win(&board, Player::Black));
    }

    #[test]
    fn test_four_in_row_not_win() {
        let board = keystones((0..4).map(|c| (9, c)), Player::Black);
        assert!(!check_win(&board, Player::Black));
    }

    #[test]
    fn test_six_in_row_is_void() {
        let board = keystones((3..9).map(|c| (9, c)), Player::Black);
        assert_eq!(longest_run(&board, Player::Black), 6);
        assert!(!check_win(&board, Player::Black));
    }

    #[test]
    fn test_overline_does_not_mask_other_five() {
        let mut board = keystones((0..7).map(|c| (2, c)), Player::Black);
        for r in 10..15 {
            board.set(Pos::new(r, 12), Cell::Keystone(Player::Black)).unwrap();
        }
        assert!(check_win(&board, Player::Black));
    }

    #[test]
    fn test_gap_breaks_run() {
        let board = keystones([(9, 0), (9, 1), (9, 2), (9, 4), (9, 5), (9, 6)], Player::Black);
        assert!(!check_win(&board, Player::Black));
    }

    #[test]
    fn test_conductors_do_not_count() {
        let mut board = keystones((0..4).map(|c| (9, c)), Player::Black);
        board.set(Pos::new(9, 4), Cell::Conductor(Player::Black)).unwrap();
        assert!(!check_win(&board, Player::Black));
    }

    #[test]
    fn test_five_at_board_edge() {
        let board = keystones((12..17).map(|c| (16, c)), Player::White);
        assert!(check_win(&board, Player::White));
    }

    #[test]
    fn test_five_keystones_not_collinear() {
        let board = keystones([(0, 0), (0, 1), (0, 2), (0, 3), (1, 4)], Player::Black);
        assert!(!check_win(&board, Player::Black));
    }

    #[test]
    fn test_empty_board() {
        let board = Board::new();
        assert!(!check_win(&board, Player::Black));
        assert_eq!(longest_run(&board, Player::White), 0);
    }
}
