//! Append-only game history.

use std::{error::Error, fmt};

use tracing::debug;

use crate::{
    color::Color,
    position::Position,
    role::Role,
    square::Square,
    types::Piece,
    update::Update,
};

/// Error when an [`Update`] does not fit the position it is applied to.
///
/// Updates built by the rules engine always fit. Seeing this error means
/// the caller and the history disagree about the current position.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PlayError {
    /// A square of the update is off the board.
    OffBoard { square: Square },
    /// No piece on the origin square.
    EmptyOrigin { square: Square },
    /// The recorded captured piece is not on its square.
    MissingCapture { square: Square },
    /// The recorded castling rook is not on its square.
    MissingCastlingRook { square: Square },
    /// A piece stands on a square the update moves to without capturing
    /// it.
    Occupied { square: Square },
    /// The move is not legal in the current position.
    IllegalMove { from: Square, to: Square },
}

impl fmt::Display for PlayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            PlayError::OffBoard { square } => write!(f, "square {square} is off the board"),
            PlayError::EmptyOrigin { square } => write!(f, "no piece on origin square {square}"),
            PlayError::MissingCapture { square } => {
                write!(f, "no piece to capture on {square}")
            }
            PlayError::MissingCastlingRook { square } => {
                write!(f, "no castling rook on {square}")
            }
            PlayError::Occupied { square } => {
                write!(f, "square {square} is occupied and not captured")
            }
            PlayError::IllegalMove { from, to } => write!(f, "illegal move {from}-{to}"),
        }
    }
}

impl Error for PlayError {}

/// Positions of a game together with the updates between them.
///
/// There is always at least one position. `positions()[i + 1]` is
/// `positions()[i]` with `updates()[i]` applied.
///
/// # Examples
///
/// ```
/// use rochade::{setup, PositionStore, Square, Update};
///
/// let mut store = PositionStore::new(setup::standard_pieces());
/// store.apply(Update::new(Square::E2, Square::E4))?;
///
/// assert_eq!(store.ply(), 1);
/// assert!(store.position_at(0).unwrap().piece_at(Square::E2).is_some());
/// assert!(store.current_position().piece_at(Square::E4).is_some());
/// # Ok::<_, rochade::PlayError>(())
/// ```
#[derive(Clone, Debug)]
pub struct PositionStore {
    positions: Vec<Position>,
    updates: Vec<Update>,
}

impl PositionStore {
    /// A history starting from the given pieces, each placed on its
    /// `initial` square.
    pub fn new<I>(pieces: I) -> PositionStore
    where
        I: IntoIterator<Item = Piece>,
    {
        PositionStore::from_position(Position::from_pieces(pieces))
    }

    pub fn from_position(pos: Position) -> PositionStore {
        PositionStore {
            positions: vec![pos],
            updates: Vec::new(),
        }
    }

    /// Clears the history and seeds a new first position.
    pub fn reset<I>(&mut self, pieces: I)
    where
        I: IntoIterator<Item = Piece>,
    {
        let pos = Position::from_pieces(pieces);
        debug!(pieces = pos.occupied().count(), "reset position store");
        self.positions.clear();
        self.updates.clear();
        self.positions.push(pos);
    }

    #[inline]
    pub fn current_position(&self) -> &Position {
        &self.positions[self.positions.len() - 1]
    }

    /// The side to move in the position with the given index: light for
    /// even indexes, dark for odd ones.
    #[inline]
    pub const fn turn_color_at(index: usize) -> Color {
        Color::from_light(index % 2 == 0)
    }

    /// The side to move in the current position.
    #[inline]
    pub fn turn(&self) -> Color {
        PositionStore::turn_color_at(self.positions.len() - 1)
    }

    #[inline]
    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    #[inline]
    pub fn updates(&self) -> &[Update] {
        &self.updates
    }

    pub fn position_at(&self, index: usize) -> Option<&Position> {
        self.positions.get(index)
    }

    pub fn update_at(&self, index: usize) -> Option<&Update> {
        self.updates.get(index)
    }

    pub fn last_update(&self) -> Option<&Update> {
        self.updates.last()
    }

    /// Number of updates made.
    #[inline]
    pub fn ply(&self) -> usize {
        self.updates.len()
    }

    /// Appends the successor of the current position.
    ///
    /// # Errors
    ///
    /// Returns [`PlayError`] if the update does not fit the current
    /// position. The history is unchanged in this case.
    pub fn apply(&mut self, update: Update) -> Result<(), PlayError> {
        let next = self.current_position().after(&update)?;
        debug!(ply = self.ply(), %update, "apply update");
        self.positions.push(next);
        self.updates.push(update);
        Ok(())
    }

    /// Changes the role of the piece that the last update moved to
    /// `square`, recording the promotion in the last update.
    ///
    /// Returns `false` if the last update did not end on `square` or
    /// `square` is empty.
    pub(crate) fn promote_last(&mut self, square: Square, role: Role) -> bool {
        let Some(update) = self.updates.last_mut() else {
            return false;
        };
        if update.to != square {
            return false;
        }
        let Some(pos) = self.positions.last_mut() else {
            return false;
        };
        let Some(piece) = pos.piece_at(square) else {
            return false;
        };
        pos.set_piece_at(square, Piece { role, ..piece });
        update.promotion = Some(role);
        true
    }

    pub(crate) fn last_update_mut(&mut self) -> Option<&mut Update> {
        self.updates.last_mut()
    }
}

impl Default for PositionStore {
    /// An empty board.
    fn default() -> PositionStore {
        PositionStore::from_position(Position::empty())
    }
}
