use std::{error::Error, fmt, ops, str::FromStr};

/// `Light` or `Dark`.
///
/// Light moves first.
#[allow(missing_docs)]
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Color {
    Light,
    Dark,
}

impl Color {
    #[inline]
    pub const fn from_light(light: bool) -> Color {
        if light {
            Color::Light
        } else {
            Color::Dark
        }
    }

    #[inline]
    pub fn fold<T>(self, light: T, dark: T) -> T {
        match self {
            Color::Light => light,
            Color::Dark => dark,
        }
    }

    #[inline]
    pub const fn is_light(self) -> bool {
        matches!(self, Color::Light)
    }

    #[inline]
    pub const fn is_dark(self) -> bool {
        matches!(self, Color::Dark)
    }

    #[inline]
    pub const fn other(self) -> Color {
        match self {
            Color::Light => Color::Dark,
            Color::Dark => Color::Light,
        }
    }

    /// The rank the pieces of this color start on.
    #[inline]
    pub const fn backrank(self) -> i8 {
        match self {
            Color::Light => 0,
            Color::Dark => 7,
        }
    }

    /// Rank delta of a single pawn step.
    #[inline]
    pub const fn pawn_step(self) -> i8 {
        match self {
            Color::Light => 1,
            Color::Dark => -1,
        }
    }

    /// The rank pawns start on and may advance two squares from.
    #[inline]
    pub const fn pawn_rank(self) -> i8 {
        match self {
            Color::Light => 1,
            Color::Dark => 6,
        }
    }

    /// The rank a pawn must stand on to capture en passant.
    #[inline]
    pub const fn en_passant_rank(self) -> i8 {
        match self {
            Color::Light => 4,
            Color::Dark => 3,
        }
    }

    /// The rank on which pawns promote.
    #[inline]
    pub const fn promotion_rank(self) -> i8 {
        self.other().backrank()
    }

    pub const fn char(self) -> char {
        match self {
            Color::Light => 'l',
            Color::Dark => 'd',
        }
    }

    /// `Light` and `Dark`, in this order.
    pub const ALL: [Color; 2] = [Color::Light, Color::Dark];
}

impl ops::Not for Color {
    type Output = Color;

    #[inline]
    fn not(self) -> Color {
        self.other()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.fold("light", "dark"))
    }
}

/// Error when parsing an invalid color name.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParseColorError;

impl fmt::Display for ParseColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid color")
    }
}

impl Error for ParseColorError {}

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Color, ParseColorError> {
        Ok(match s {
            "light" => Color::Light,
            "dark" => Color::Dark,
            _ => return Err(ParseColorError),
        })
    }
}
