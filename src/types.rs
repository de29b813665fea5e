use std::{
    fmt,
    hash::{Hash, Hasher},
};

use crate::{color::Color, role::Role, square::Square};

/// A piece with [`Color`] and [`Role`], remembering the square it started
/// the game on.
///
/// Two pieces are the same piece iff they started on the same square:
/// equality and hashing only look at `initial`. The role is not part of
/// the identity, so a pawn stays the same piece after promotion.
///
/// # Examples
///
/// ```
/// use rochade::{Color, Piece, Role, Square};
///
/// let pawn = Piece::new(Square::E2, Color::Light, Role::Pawn);
/// let promoted = Piece { role: Role::Queen, ..pawn };
/// assert_eq!(pawn, promoted);
/// assert!(!pawn.is_identical(&promoted));
/// ```
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Piece {
    pub initial: Square,
    pub color: Color,
    pub role: Role,
}

impl Piece {
    pub const fn new(initial: Square, color: Color, role: Role) -> Piece {
        Piece {
            initial,
            color,
            role,
        }
    }

    /// Uppercase letter for light pieces, lowercase for dark pieces.
    pub const fn char(self) -> char {
        match self.color {
            Color::Light => self.role.upper_char(),
            Color::Dark => self.role.char(),
        }
    }

    /// Compares all fields, not just the identity.
    pub fn is_identical(&self, other: &Piece) -> bool {
        self.initial == other.initial && self.color == other.color && self.role == other.role
    }
}

impl PartialEq for Piece {
    fn eq(&self, other: &Piece) -> bool {
        self.initial == other.initial
    }
}

impl Eq for Piece {}

impl Hash for Piece {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.initial.hash(state);
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} from {}", self.color, self.role, self.initial)
    }
}

/// Status of the king of the side to move.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum KingStatus {
    /// Not in check, with at least one legal move.
    #[default]
    Normal,
    /// In check, with at least one legal move.
    Checked,
    /// In check, without any legal move.
    Checkmated,
    /// Not in check, without any legal move.
    Stalemated,
}

impl KingStatus {
    pub const fn is_check(self) -> bool {
        matches!(self, KingStatus::Checked | KingStatus::Checkmated)
    }

    /// Checkmate or stalemate.
    pub const fn is_game_over(self) -> bool {
        matches!(self, KingStatus::Checkmated | KingStatus::Stalemated)
    }
}

impl fmt::Display for KingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            KingStatus::Normal => "normal",
            KingStatus::Checked => "checked",
            KingStatus::Checkmated => "checkmated",
            KingStatus::Stalemated => "stalemated",
        })
    }
}

/// Outcome of a finished game.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum Outcome {
    /// Checkmate.
    Decisive { winner: Color },
    /// Stalemate.
    Draw,
}

impl Outcome {
    pub const fn winner(self) -> Option<Color> {
        match self {
            Outcome::Decisive { winner } => Some(winner),
            Outcome::Draw => None,
        }
    }

    /// Outcome of a position where `turn` is to move with the given king
    /// status, or `None` if the game goes on.
    pub const fn from_king_status(turn: Color, status: KingStatus) -> Option<Outcome> {
        match status {
            KingStatus::Checkmated => Some(Outcome::Decisive {
                winner: turn.other(),
            }),
            KingStatus::Stalemated => Some(Outcome::Draw),
            KingStatus::Normal | KingStatus::Checked => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Outcome::Decisive { winner } => write!(f, "{winner} wins by checkmate"),
            Outcome::Draw => f.write_str("draw by stalemate"),
        }
    }
}
