//! Starting pieces.

use arrayvec::ArrayVec;

use crate::{color::Color, role::Role, square::Square, types::Piece};

const BACKRANK: [Role; 8] = [
    Role::Rook,
    Role::Knight,
    Role::Bishop,
    Role::Queen,
    Role::King,
    Role::Bishop,
    Role::Knight,
    Role::Rook,
];

/// The 32 pieces of the standard starting position, each with its starting
/// square as `initial`.
///
/// # Examples
///
/// ```
/// use rochade::{setup, Color, Role};
///
/// let pieces = setup::standard_pieces();
/// assert_eq!(pieces.len(), 32);
/// assert_eq!(
///     pieces
///         .iter()
///         .filter(|p| p.color == Color::Dark && p.role == Role::Pawn)
///         .count(),
///     8
/// );
/// ```
pub fn standard_pieces() -> ArrayVec<Piece, 32> {
    let mut pieces = ArrayVec::new();
    for color in Color::ALL {
        for (file, role) in (0..).zip(BACKRANK) {
            pieces.push(Piece::new(Square::new(file, color.backrank()), color, role));
        }
        for file in 0..8 {
            pieces.push(Piece::new(
                Square::new(file, color.pawn_rank()),
                color,
                Role::Pawn,
            ));
        }
    }
    pieces
}
