use std::{error::Error, fmt, str::FromStr};

/// Piece types: `King`, `Queen`, `Rook`, `Bishop`, `Knight`, `Pawn`.
///
/// # Examples
///
/// ```
/// use rochade::Role;
///
/// assert_eq!(Role::from_char('N'), Some(Role::Knight));
/// assert_eq!(Role::Queen.upper_char(), 'Q');
/// ```
#[allow(missing_docs)]
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Role {
    King,
    Queen,
    Rook,
    Bishop,
    Knight,
    Pawn,
}

impl Role {
    /// Gets the piece type from its English letter.
    pub const fn from_char(ch: char) -> Option<Role> {
        match ch {
            'K' | 'k' => Some(Role::King),
            'Q' | 'q' => Some(Role::Queen),
            'R' | 'r' => Some(Role::Rook),
            'B' | 'b' => Some(Role::Bishop),
            'N' | 'n' => Some(Role::Knight),
            'P' | 'p' => Some(Role::Pawn),
            _ => None,
        }
    }

    /// Gets the lowercase English letter for the piece type.
    pub const fn char(self) -> char {
        match self {
            Role::King => 'k',
            Role::Queen => 'q',
            Role::Rook => 'r',
            Role::Bishop => 'b',
            Role::Knight => 'n',
            Role::Pawn => 'p',
        }
    }

    /// Gets the uppercase English letter for the piece type.
    pub const fn upper_char(self) -> char {
        match self {
            Role::King => 'K',
            Role::Queen => 'Q',
            Role::Rook => 'R',
            Role::Bishop => 'B',
            Role::Knight => 'N',
            Role::Pawn => 'P',
        }
    }

    /// Queens, rooks and bishops.
    #[inline]
    pub const fn is_slider(self) -> bool {
        matches!(self, Role::Queen | Role::Rook | Role::Bishop)
    }

    /// Whether a pawn may promote to this role.
    #[inline]
    pub const fn is_promotion(self) -> bool {
        matches!(self, Role::Queen | Role::Rook | Role::Bishop | Role::Knight)
    }

    /// `King`, `Queen`, `Rook`, `Bishop`, `Knight` and `Pawn`, in this order.
    pub const ALL: [Role; 6] = [
        Role::King,
        Role::Queen,
        Role::Rook,
        Role::Bishop,
        Role::Knight,
        Role::Pawn,
    ];

    /// The roles a pawn can promote to, strongest first.
    pub const PROMOTIONS: [Role; 4] = [Role::Queen, Role::Rook, Role::Bishop, Role::Knight];
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Role::King => "king",
            Role::Queen => "queen",
            Role::Rook => "rook",
            Role::Bishop => "bishop",
            Role::Knight => "knight",
            Role::Pawn => "pawn",
        })
    }
}

/// Error when parsing an invalid piece type name.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParseRoleError;

impl fmt::Display for ParseRoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid piece type")
    }
}

impl Error for ParseRoleError {}

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Role, ParseRoleError> {
        Role::ALL
            .into_iter()
            .find(|role| role.to_string() == s)
            .ok_or(ParseRoleError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chars() {
        for role in Role::ALL {
            assert_eq!(Role::from_char(role.char()), Some(role));
            assert_eq!(Role::from_char(role.upper_char()), Some(role));
        }
        assert_eq!(Role::from_char('x'), None);
    }

    #[test]
    fn test_promotions() {
        assert!(Role::PROMOTIONS.iter().all(|role| role.is_promotion()));
        assert!(!Role::King.is_promotion());
        assert!(!Role::Pawn.is_promotion());
    }

    #[test]
    fn test_parse() {
        assert_eq!("knight".parse(), Ok(Role::Knight));
        assert_eq!("horse".parse::<Role>(), Err(ParseRoleError));
    }
}
