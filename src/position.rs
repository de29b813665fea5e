use std::fmt::{self, Write as _};

use tracing::warn;

use crate::{
    bitboard::Bitboard,
    color::Color,
    role::Role,
    square::Square,
    store::PlayError,
    types::Piece,
    update::Update,
};

/// One snapshot of piece placement, mapping squares to pieces.
///
/// Positions are values. Playing an [`Update`] produces a new position
/// (see [`Position::after()`]) and never changes the old one.
///
/// # Examples
///
/// ```
/// use rochade::{setup, Color, Position, Role, Square};
///
/// let pos = Position::from_pieces(setup::standard_pieces());
/// assert_eq!(pos.king_of(Color::Dark), Some(Square::E8));
/// assert_eq!(pos.piece_at(Square::G1).map(|p| p.role), Some(Role::Knight));
/// assert_eq!(pos.occupied().count(), 32);
/// ```
#[derive(Clone)]
pub struct Position {
    squares: [Option<Piece>; 64],
    occupied: Bitboard,
    light: Bitboard,
    dark: Bitboard,
}

impl Position {
    /// A board without any pieces.
    pub const fn empty() -> Position {
        Position {
            squares: [None; 64],
            occupied: Bitboard::EMPTY,
            light: Bitboard::EMPTY,
            dark: Bitboard::EMPTY,
        }
    }

    /// Places each piece on its `initial` square.
    ///
    /// Pieces with an off-board initial square are skipped. When two
    /// pieces share an initial square, the later one wins.
    pub fn from_pieces<I>(pieces: I) -> Position
    where
        I: IntoIterator<Item = Piece>,
    {
        let mut pos = Position::empty();
        for piece in pieces {
            if !piece.initial.is_in_bounds() {
                warn!(square = %piece.initial, "skipping piece with off-board initial square");
                continue;
            }
            if let Some(replaced) = pos.set_piece_at(piece.initial, piece) {
                warn!(square = %piece.initial, %replaced, "duplicate initial square in seed");
            }
        }
        pos
    }

    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        sq.index().and_then(|index| self.squares[index])
    }

    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.occupied
    }

    #[inline]
    pub fn by_color(&self, color: Color) -> Bitboard {
        color.fold(self.light, self.dark)
    }

    /// Squares of pieces with the given color and role.
    pub fn by_piece(&self, color: Color, role: Role) -> Bitboard {
        self.by_color(color)
            .into_iter()
            .filter(|&sq| self.piece_at(sq).is_some_and(|piece| piece.role == role))
            .collect()
    }

    /// The square of the king of `color`, if there is one.
    ///
    /// With more than one king of that color, the one on the lowest
    /// square index is returned.
    pub fn king_of(&self, color: Color) -> Option<Square> {
        self.by_piece(color, Role::King).first()
    }

    /// The current square of `piece`, looked up by identity.
    pub fn square_of(&self, piece: &Piece) -> Option<Square> {
        self.occupied
            .into_iter()
            .find(|&sq| self.piece_at(sq).as_ref() == Some(piece))
    }

    /// All pieces with their current squares, in square index order.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.occupied
            .into_iter()
            .filter_map(|sq| self.piece_at(sq).map(|piece| (sq, piece)))
    }

    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.by_color(color)
            .into_iter()
            .filter_map(|sq| self.piece_at(sq).map(|piece| (sq, piece)))
    }

    /// Places `piece` on `sq`, returning the piece it replaced.
    pub(crate) fn set_piece_at(&mut self, sq: Square, piece: Piece) -> Option<Piece> {
        let index = sq.index()?;
        let replaced = self.remove_piece_at(sq);
        self.squares[index] = Some(piece);
        self.occupied.add(sq);
        match piece.color {
            Color::Light => self.light.add(sq),
            Color::Dark => self.dark.add(sq),
        }
        replaced
    }

    pub(crate) fn remove_piece_at(&mut self, sq: Square) -> Option<Piece> {
        let piece = self.squares[sq.index()?].take()?;
        self.occupied.remove(sq);
        self.light.remove(sq);
        self.dark.remove(sq);
        Some(piece)
    }

    /// Computes the successor position.
    ///
    /// Removes the captured piece from its square, moves the piece, applies
    /// the promotion and relocates the castling rook.
    ///
    /// # Errors
    ///
    /// Returns [`PlayError`] if a square of the update is off the board, the
    /// origin square is empty, a capture or castling rook recorded in the
    /// update is not on the board, or the moving piece or rook would land on
    /// a piece that is not captured.
    pub fn after(&self, update: &Update) -> Result<Position, PlayError> {
        let squares = [
            Some(update.from),
            Some(update.to),
            update.capture.map(|capture| capture.square),
            update.castle.map(|castle| castle.rook_from),
            update.castle.map(|castle| castle.rook_to),
        ];
        if let Some(square) = squares.into_iter().flatten().find(|sq| !sq.is_in_bounds()) {
            return Err(PlayError::OffBoard { square });
        }

        let mut next = self.clone();

        let mut piece = next
            .remove_piece_at(update.from)
            .ok_or(PlayError::EmptyOrigin {
                square: update.from,
            })?;

        if let Some(capture) = update.capture {
            next.remove_piece_at(capture.square)
                .ok_or(PlayError::MissingCapture {
                    square: capture.square,
                })?;
        }

        if let Some(role) = update.promotion {
            piece.role = role;
        }
        next.place(update.to, piece)?;

        if let Some(castle) = update.castle {
            let rook = next
                .remove_piece_at(castle.rook_from)
                .ok_or(PlayError::MissingCastlingRook {
                    square: castle.rook_from,
                })?;
            next.place(castle.rook_to, rook)?;
        }

        Ok(next)
    }

    /// Puts `piece` on an empty square.
    fn place(&mut self, sq: Square, piece: Piece) -> Result<(), PlayError> {
        if self.piece_at(sq).is_some() {
            return Err(PlayError::Occupied { square: sq });
        }
        self.set_piece_at(sq, piece);
        Ok(())
    }

    fn write_diagram(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8).rev() {
            for file in 0..8 {
                f.write_char(
                    self.piece_at(Square::new(file, rank))
                        .map_or('.', |piece| piece.char()),
                )?;
                f.write_char(if file < 7 { ' ' } else { '\n' })?;
            }
        }
        Ok(())
    }
}

impl Default for Position {
    fn default() -> Position {
        Position::empty()
    }
}

impl PartialEq for Position {
    fn eq(&self, other: &Position) -> bool {
        self.squares
            .iter()
            .zip(other.squares.iter())
            .all(|pair| match pair {
                (Some(a), Some(b)) => a.is_identical(b),
                (None, None) => true,
                _ => false,
            })
    }
}

impl Eq for Position {}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_diagram(f)
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Position(\n")?;
        self.write_diagram(f)?;
        f.write_char(')')
    }
}
