use std::fmt::{self, Write as _};

use crate::{
    castling_side::CastlingSide,
    role::Role,
    square::Square,
    types::{KingStatus, Piece},
};

/// A piece taken by an [`Update`].
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Capture {
    pub piece: Piece,
    /// Where the captured piece stood. Differs from the destination of the
    /// move exactly for en passant.
    pub square: Square,
}

/// The rook part of a castling move.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Castle {
    pub rook_from: Square,
    pub rook_to: Square,
}

/// The transition from one position to the next.
///
/// An update carries everything needed to replay it without consulting the
/// rules: the captured piece and its square, the rook movement of a castling
/// move, the promotion role, and the [`KingStatus`] of the side to move
/// after it. With the `serde` feature it can be sent to a peer verbatim.
///
/// # Examples
///
/// ```
/// use rochade::{Game, Square};
///
/// let mut game = Game::standard();
/// let update = game.play(Square::E2, Square::E4)?;
/// assert_eq!(update.to_string(), "e2-e4");
/// assert!(update.capture.is_none());
/// # Ok::<_, rochade::PlayError>(())
/// ```
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Update {
    pub from: Square,
    pub to: Square,
    pub capture: Option<Capture>,
    pub castle: Option<Castle>,
    pub promotion: Option<Role>,
    /// Status of the king of the side to move after this update.
    pub king_status: KingStatus,
}

impl Update {
    /// A plain move without side effects.
    pub const fn new(from: Square, to: Square) -> Update {
        Update {
            from,
            to,
            capture: None,
            castle: None,
            promotion: None,
            king_status: KingStatus::Normal,
        }
    }

    #[inline]
    pub const fn is_capture(&self) -> bool {
        self.capture.is_some()
    }

    /// A capture where the captured piece did not stand on the destination.
    pub fn is_en_passant(&self) -> bool {
        self.capture.is_some_and(|capture| capture.square != self.to)
    }

    pub fn castling_side(&self) -> Option<CastlingSide> {
        self.castle.map(|castle| {
            CastlingSide::from_king_side(castle.rook_from.file() > self.from.file())
        })
    }

    #[inline]
    pub const fn is_castle(&self) -> bool {
        self.castle.is_some()
    }

    #[inline]
    pub const fn is_promotion(&self) -> bool {
        self.promotion.is_some()
    }
}

impl fmt::Display for Update {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.castling_side() {
            Some(CastlingSide::KingSide) => f.write_str("O-O")?,
            Some(CastlingSide::QueenSide) => f.write_str("O-O-O")?,
            None => {
                write!(f, "{}", self.from)?;
                f.write_char(if self.is_capture() { 'x' } else { '-' })?;
                write!(f, "{}", self.to)?;
                if let Some(role) = self.promotion {
                    write!(f, "={}", role.upper_char())?;
                }
            }
        }

        match self.king_status {
            KingStatus::Checked => f.write_char('+'),
            KingStatus::Checkmated => f.write_char('#'),
            KingStatus::Normal | KingStatus::Stalemated => Ok(()),
        }
    }
}
