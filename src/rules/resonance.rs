//! Resonance: converting outward from a focal cell of a completed core
//!
//! The focal stone becomes a keystone, then four rays (up, down, left,
//! right) walk up to [`MAX_RESONANCE_STEPS`] cells each:
//! - leaving the board ends the ray
//! - cells of the core itself are passed through, never recorded or converted
//! - the first conductor of the core's owner is recorded, converted, and ends the ray
//! - any other stone ends the ray without being recorded
//! - empty cells are recorded and the ray continues

use tracing::trace;

use crate::board::{Board, Cell, Pos};
use crate::error::{Result, RulesError};

use super::pattern::Core;

/// Maximum number of cells a single ray may step
pub const MAX_RESONANCE_STEPS: usize = 5;

/// Ray directions, in the order paths are reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// (row, col) step vector
    #[inline]
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }
}

/// Cells visited by one ray, in travel order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResonancePath {
    pub direction: Direction,
    /// Recorded cells; if `converted` is set it is the last entry
    pub steps: Vec<Pos>,
    /// Conductor converted at the end of this ray, if any
    pub converted: Option<Pos>,
}

impl ResonancePath {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Outcome of one activation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resonance {
    pub board: Board,
    /// Up, down, left, right
    pub paths: [ResonancePath; 4],
    /// Whether the focal stone itself was converted (false if it already was a keystone)
    pub focal_converted: bool,
}

impl Resonance {
    /// Every stone converted by this activation, focal first
    pub fn converted(&self, focal: Pos) -> Vec<Pos> {
        self.focal_converted
            .then_some(focal)
            .into_iter()
            .chain(self.paths.iter().filter_map(|p| p.converted))
            .collect()
    }
}

/// Activate resonance from `focal` within `core`.
///
/// Works on a clone; `board` is left untouched. Fails with
/// [`RulesError::FocusOutsideCore`] if `focal` is not one of the core's cells.
pub fn activate_resonance(board: &Board, core: &Core, focal: Pos) -> Result<Resonance> {
    if !core.contains(focal) {
        return Err(RulesError::FocusOutsideCore(focal));
    }

    let owner = core.owner;
    let mut next = board.clone();
    let focal_converted = next.promote(focal, owner);

    let paths = Direction::ALL.map(|direction| cast_ray(&mut next, core, focal, direction));

    Ok(Resonance {
        board: next,
        paths,
        focal_converted,
    })
}

/// Walk one ray from `focal`, converting at most one conductor
fn cast_ray(board: &mut Board, core: &Core, focal: Pos, direction: Direction) -> ResonancePath {
    let (dr, dc) = direction.delta();
    let mut path = ResonancePath {
        direction,
        steps: Vec::new(),
        converted: None,
    };

    let mut current = focal;
    for _ in 0..MAX_RESONANCE_STEPS {
        let Some(pos) = current.offset(dr, dc) else {
            break;
        };
        current = pos;

        if core.contains(pos) {
            continue;
        }

        match board.get(pos) {
            Cell::Conductor(p) if p == core.owner => {
                board.promote(pos, p);
                path.steps.push(pos);
                path.converted = Some(pos);
                trace!(?direction, %pos, "resonance converted conductor");
                break;
            }
            Cell::Empty => path.steps.push(pos),
            _ => break,
        }
    }

    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Player;
    use crate::rules::pattern::detect_cores;

    /// Board with a black core anchored at (row, col)
    fn board_with_core(row: u8, col: u8) -> (Board, Core) {
        let mut board = Board::new();
        for (r, c) in [(row, col), (row, col + 1), (row + 1, col), (row + 1, col + 1)] {
            board.set(Pos::new(r, c), Cell::Conductor(Player::Black)).unwrap();
        }
        let core = detect_cores(&board, Player::Black)[0];
        (board, core)
    }

    fn path(res: &Resonance, direction: Direction) -> &ResonancePath {
        res.paths.iter().find(|p| p.direction == direction).unwrap()
    }

    #[test]
    fn test_focal_converted_and_empty_rays() {
        let (board, core) = board_with_core(8, 8);
        let focal = Pos::new(8, 8);
        let res = activate_resonance(&board, &core, focal).unwrap();

        assert_eq!(res.board.get(focal), Cell::Keystone(Player::Black));
        assert!(res.focal_converted);
        // Input board untouched
        assert_eq!(board.get(focal), Cell::Conductor(Player::Black));

        // Up from (8,8): five empty cells
        let up = path(&res, Direction::Up);
        assert_eq!(
            up.steps,
            vec![Pos::new(7, 8), Pos::new(6, 8), Pos::new(5, 8), Pos::new(4, 8), Pos::new(3, 8)]
        );
        assert_eq!(up.converted, None);
    }

    #[test]
    fn test_paths_in_direction_order() {
        let (board, core) = board_with_core(8, 8);
        let res = activate_resonance(&board, &core, Pos::new(8, 8)).unwrap();
        let order: Vec<Direction> = res.paths.iter().map(|p| p.direction).collect();
        assert_eq!(order, Direction::ALL.to_vec());
    }

    #[test]
    fn test_core_cells_are_transparent() {
        let (board, core) = board_with_core(8, 8);
        let res = activate_resonance(&board, &core, Pos::new(8, 8)).unwrap();

        // Down passes (9,8), right passes (8,9): neither recorded nor converted
        let down = path(&res, Direction::Down);
        assert_eq!(down.steps.first(), Some(&Pos::new(10, 8)));
        assert_eq!(down.steps.len(), 4, "one of five steps spent inside the core");
        let right = path(&res, Direction::Right);
        assert!(!right.steps.contains(&Pos::new(8, 9)));

        for pos in [Pos::new(8, 9), Pos::new(9, 8), Pos::new(9, 9)] {
            assert_eq!(res.board.get(pos), Cell::Conductor(Player::Black));
            assert!(res.paths.iter().all(|p| !p.steps.contains(&pos)));
        }
    }

    #[test]
    fn test_adjacent_opponent_blocks_ray() {
        let (mut board, core) = board_with_core(8, 8);
        board.set(Pos::new(7, 8), Cell::Conductor(Player::White)).unwrap();
        let res = activate_resonance(&board, &core, Pos::new(8, 8)).unwrap();
        let up = path(&res, Direction::Up);
        assert!(up.is_empty());
        assert_eq!(res.board.get(Pos::new(7, 8)), Cell::Conductor(Player::White));
    }

    #[test]
    fn test_own_keystone_blocks_ray() {
        let (mut board, core) = board_with_core(8, 8);
        board.set(Pos::new(8, 5), Cell::Keystone(Player::Black)).unwrap();
        board.set(Pos::new(8, 4), Cell::Conductor(Player::Black)).unwrap();
        let res = activate_resonance(&board, &core, Pos::new(8, 8)).unwrap();
        let left = path(&res, Direction::Left);
        assert_eq!(left.steps, vec![Pos::new(8, 7), Pos::new(8, 6)]);
        assert_eq!(left.converted, None);
        assert_eq!(res.board.get(Pos::new(8, 4)), Cell::Conductor(Player::Black));
    }

    #[test]
    fn test_first_own_conductor_converted_and_stops() {
        let (mut board, core) = board_with_core(8, 8);
        board.set(Pos::new(8, 12), Cell::Conductor(Player::Black)).unwrap();
        board.set(Pos::new(8, 13), Cell::Conductor(Player::Black)).unwrap();
        let res = activate_resonance(&board, &core, Pos::new(8, 8)).unwrap();

        let right = path(&res, Direction::Right);
        assert_eq!(
            right.steps,
            vec![Pos::new(8, 10), Pos::new(8, 11), Pos::new(8, 12)]
        );
        assert_eq!(right.converted, Some(Pos::new(8, 12)));
        assert_eq!(res.board.get(Pos::new(8, 12)), Cell::Keystone(Player::Black));
        assert_eq!(res.board.get(Pos::new(8, 13)), Cell::Conductor(Player::Black));
        assert_eq!(
            res.converted(Pos::new(8, 8)),
            vec![Pos::new(8, 8), Pos::new(8, 12)]
        );
    }

    #[test]
    fn test_conductor_beyond_reach_untouched() {
        let (mut board, core) = board_with_core(8, 8);
        // Up from (8,8) reaches (3,8) at most
        board.set(Pos::new(2, 8), Cell::Conductor(Player::Black)).unwrap();
        let res = activate_resonance(&board, &core, Pos::new(8, 8)).unwrap();
        assert_eq!(path(&res, Direction::Up).converted, None);
        assert_eq!(res.board.get(Pos::new(2, 8)), Cell::Conductor(Player::Black));
    }

    #[test]
    fn test_board_edge_ends_ray() {
        let (board, core) = board_with_core(0, 0);
        let res = activate_resonance(&board, &core, Pos::new(0, 0)).unwrap();
        assert!(path(&res, Direction::Up).is_empty());
        assert!(path(&res, Direction::Left).is_empty());
    }

    #[test]
    fn test_keystone_focal_is_idempotent() {
        let (mut board, core) = board_with_core(8, 8);
        board.set(Pos::new(9, 9), Cell::Keystone(Player::Black)).unwrap();
        let res = activate_resonance(&board, &core, Pos::new(9, 9)).unwrap();
        assert!(!res.focal_converted);
        assert_eq!(res.board.get(Pos::new(9, 9)), Cell::Keystone(Player::Black));
        assert!(res.converted(Pos::new(9, 9)).is_empty());
    }

    #[test]
    fn test_focus_outside_core_rejected() {
        let (board, core) = board_with_core(8, 8);
        assert_eq!(
            activate_resonance(&board, &core, Pos::new(7, 7)),
            Err(RulesError::FocusOutsideCore(Pos::new(7, 7)))
        );
    }

    #[test]
    fn test_at_most_one_conversion_per_direction() {
        let (mut board, core) = board_with_core(8, 8);
        for c in 0..8 {
            board.set(Pos::new(8, c), Cell::Conductor(Player::Black)).unwrap();
        }
        let res = activate_resonance(&board, &core, Pos::new(8, 9)).unwrap();
        let left = path(&res, Direction::Left);
        // (8,8) is core, so the first conductor met is (8,7)
        assert_eq!(left.steps, vec![Pos::new(8, 7)]);
        assert_eq!(res.board.get(Pos::new(8, 6)), Cell::Conductor(Player::Black));
    }
}
