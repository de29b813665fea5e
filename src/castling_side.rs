use bitflags::bitflags;

use crate::{color::Color, square::Square};

/// `KingSide` (O-O) or `QueenSide` (O-O-O).
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum CastlingSide {
    KingSide,
    QueenSide,
}

impl CastlingSide {
    #[inline]
    pub const fn is_queen_side(self) -> bool {
        matches!(self, CastlingSide::QueenSide)
    }

    #[inline]
    pub const fn is_king_side(self) -> bool {
        matches!(self, CastlingSide::KingSide)
    }

    #[inline]
    pub const fn from_king_side(king_side: bool) -> CastlingSide {
        if king_side {
            CastlingSide::KingSide
        } else {
            CastlingSide::QueenSide
        }
    }

    /// File delta of each step the king takes towards the rook.
    #[inline]
    pub const fn direction(self) -> i8 {
        match self {
            CastlingSide::KingSide => 1,
            CastlingSide::QueenSide => -1,
        }
    }

    /// File of the corner rook on this side.
    #[inline]
    pub const fn rook_file(self) -> i8 {
        match self {
            CastlingSide::KingSide => 7,
            CastlingSide::QueenSide => 0,
        }
    }

    /// The corner square the castling rook starts on.
    pub const fn rook_from(self, color: Color) -> Square {
        Square::new(self.rook_file(), color.backrank())
    }

    /// Gets the castling side of a king move, if it is one.
    pub fn from_king_move(from: Square, to: Square) -> Option<CastlingSide> {
        if from.rank() == to.rank() && to.file().abs_diff(from.file()) == 2 {
            Some(CastlingSide::from_king_side(to.file() > from.file()))
        } else {
            None
        }
    }

    #[inline]
    pub const fn flag(self) -> CastlingRights {
        match self {
            CastlingSide::KingSide => CastlingRights::KING_SIDE,
            CastlingSide::QueenSide => CastlingRights::QUEEN_SIDE,
        }
    }

    /// `KingSide` and `QueenSide`, in this order.
    pub const ALL: [CastlingSide; 2] = [CastlingSide::KingSide, CastlingSide::QueenSide];
}

bitflags! {
    /// Sides on which a color may still castle, as far as the history
    /// goes: the king and the corner rook of that side have never moved.
    ///
    /// Whether castling is playable right now additionally depends on
    /// empty and unattacked squares.
    #[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
    pub struct CastlingRights: u8 {
        const KING_SIDE = 1;
        const QUEEN_SIDE = 2;
    }
}

impl CastlingRights {
    #[inline]
    pub fn has(self, side: CastlingSide) -> bool {
        self.contains(side.flag())
    }
}
