//! Attack geometry.
//!
//! All sliding walks of the rules engine go through [`walk()`], and every
//! "does this piece threaten that square" question is answered by
//! [`threatens()`]: check detection, king step filtering, castling
//! transit squares and pin detection.
//!
//! # Examples
//!
//! ```
//! use rochade::{attacks, Bitboard, Color, Piece, Role, Square};
//!
//! let rook = Piece::new(Square::A1, Color::Dark, Role::Rook);
//! let occupied = Bitboard::EMPTY.with(Square::E1).with(Square::E5);
//!
//! assert!(attacks::threatens(rook, Square::E8, Square::E5, occupied, None));
//! assert!(!attacks::threatens(rook, Square::E8, Square::E1, occupied, None));
//! assert!(!attacks::threatens(rook, Square::E8, Square::E5, occupied, Some(Square::E6)));
//! ```

use std::iter::FusedIterator;

use crate::{bitboard::Bitboard, role::Role, square::Square, types::Piece};

/// `(file, rank)` steps along ranks and files.
pub const ROOK_DIRECTIONS: [(i8, i8); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];

/// `(file, rank)` steps along diagonals.
pub const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, -1), (-1, 1)];

/// All eight line directions.
pub const QUEEN_DIRECTIONS: [(i8, i8); 8] = [
    (0, 1),
    (1, 0),
    (0, -1),
    (-1, 0),
    (1, 1),
    (1, -1),
    (-1, -1),
    (-1, 1),
];

/// The eight king steps.
pub const KING_OFFSETS: [(i8, i8); 8] = QUEEN_DIRECTIONS;

/// The eight knight jumps.
pub const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

/// Kind of line connecting two squares.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum Line {
    /// Along a rank or a file.
    Straight,
    /// Along a diagonal.
    Diagonal,
}

impl Line {
    /// Kind of line a unit step moves along.
    pub const fn of_step((file, rank): (i8, i8)) -> Line {
        if file == 0 || rank == 0 {
            Line::Straight
        } else {
            Line::Diagonal
        }
    }

    /// Whether a slider of the given role moves along this kind of line.
    pub const fn is_slider_line(self, role: Role) -> bool {
        match role {
            Role::Queen => true,
            Role::Rook => matches!(self, Line::Straight),
            Role::Bishop => matches!(self, Line::Diagonal),
            Role::King | Role::Knight | Role::Pawn => false,
        }
    }
}

/// Unit step leading from `from` towards `to`, if both are distinct
/// on-board squares sharing a rank, file or diagonal.
pub fn direction(from: Square, to: Square) -> Option<(i8, i8)> {
    if !from.is_in_bounds() || !to.is_in_bounds() {
        return None;
    }

    let file_delta = to.file() - from.file();
    let rank_delta = to.rank() - from.rank();

    if (file_delta, rank_delta) == (0, 0) {
        None
    } else if file_delta == 0 || rank_delta == 0 || file_delta.abs() == rank_delta.abs() {
        Some((file_delta.signum(), rank_delta.signum()))
    } else {
        None
    }
}

/// Squares reached by sliding from `from` (exclusive) in the direction of
/// `step`.
///
/// The walk ends at the edge of the board, or after yielding the first
/// occupied square, or after yielding `stop`, whichever comes first.
pub fn walk(from: Square, step: (i8, i8), occupied: Bitboard, stop: Option<Square>) -> Walk {
    Walk {
        current: from,
        step,
        occupied,
        stop,
        done: false,
    }
}

/// Iterator returned by [`walk()`].
#[derive(Debug, Clone)]
pub struct Walk {
    current: Square,
    step: (i8, i8),
    occupied: Bitboard,
    stop: Option<Square>,
    done: bool,
}

impl Iterator for Walk {
    type Item = Square;

    fn next(&mut self) -> Option<Square> {
        if self.done {
            return None;
        }

        let Some(next) = self.current.checked_offset(self.step.0, self.step.1) else {
            self.done = true;
            return None;
        };

        self.current = next;
        if self.occupied.contains(next) || self.stop == Some(next) {
            self.done = true;
        }
        Some(next)
    }
}

impl FusedIterator for Walk {}

/// Squares strictly between `a` and `b`, or the empty set if they are not
/// aligned.
pub fn between(a: Square, b: Square) -> Bitboard {
    match direction(a, b) {
        Some(step) => walk(a, step, Bitboard::from_square(b), None)
            .take_while(|&sq| sq != b)
            .collect(),
        None => Bitboard::EMPTY,
    }
}

/// Tests if `c` is on the rank, file or diagonal through `a` and `b`.
pub fn aligned(a: Square, b: Square, c: Square) -> bool {
    match direction(a, b) {
        Some(step) => {
            c == a || direction(a, c).map_or(false, |s| s == step || s == (-step.0, -step.1))
        }
        None => false,
    }
}

/// Tests if `attacker`, standing on `from`, threatens `target`.
///
/// Sliders are blocked by squares in `occupied` strictly between `from`
/// and `target`. `stop` acts as one more blocker, so that a caller can
/// ask "would this line still be open if a piece landed on `stop`".
/// Pawns threaten diagonally forward, kings and knights by their steps.
/// Nothing threatens its own square.
pub fn threatens(
    attacker: Piece,
    from: Square,
    target: Square,
    occupied: Bitboard,
    stop: Option<Square>,
) -> bool {
    if from == target || !from.is_in_bounds() || !target.is_in_bounds() {
        return false;
    }

    let file_delta = target.file() - from.file();
    let rank_delta = target.rank() - from.rank();

    match attacker.role {
        Role::Pawn => {
            file_delta.abs() == 1 && rank_delta == attacker.color.pawn_step()
        }
        Role::Knight => (file_delta * rank_delta).abs() == 2,
        Role::King => from.distance(target) == 1,
        Role::Queen | Role::Rook | Role::Bishop => {
            let Some(step) = direction(from, target) else {
                return false;
            };
            Line::of_step(step).is_slider_line(attacker.role)
                && walk(from, step, occupied, stop).any(|sq| sq == target)
        }
    }
}

/// Squares `piece` on `from` could move to or capture on if every square
/// in `occupied` held an enemy, ignoring pawn pushes, en passant and
/// castling.
pub fn attacks(piece: Piece, from: Square, occupied: Bitboard) -> Bitboard {
    match piece.role {
        Role::Pawn => [-1, 1]
            .into_iter()
            .filter_map(|file_delta| from.checked_offset(file_delta, piece.color.pawn_step()))
            .collect(),
        Role::Knight => steps(from, &KNIGHT_OFFSETS),
        Role::King => steps(from, &KING_OFFSETS),
        Role::Bishop => slides(from, &BISHOP_DIRECTIONS, occupied),
        Role::Rook => slides(from, &ROOK_DIRECTIONS, occupied),
        Role::Queen => slides(from, &QUEEN_DIRECTIONS, occupied),
    }
}

fn steps(from: Square, offsets: &[(i8, i8)]) -> Bitboard {
    offsets
        .iter()
        .filter_map(|&(file_delta, rank_delta)| from.checked_offset(file_delta, rank_delta))
        .collect()
}

fn slides(from: Square, directions: &[(i8, i8)], occupied: Bitboard) -> Bitboard {
    directions
        .iter()
        .flat_map(|&step| walk(from, step, occupied, None))
        .collect()
}
