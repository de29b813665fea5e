use std::{cmp::max, error::Error, fmt, str::FromStr};

/// A square, given by file and rank, both counted from `0`.
///
/// Squares off the board are representable, so that offsets can be
/// computed freely. Every consumer rejects them with
/// [`Square::is_in_bounds()`].
///
/// # Examples
///
/// ```
/// use rochade::Square;
///
/// let sq: Square = "e4".parse()?;
/// assert_eq!(sq, Square::new(4, 3));
/// assert_eq!(sq.offset(0, 5), Square::new(4, 8));
/// assert!(!sq.offset(0, 5).is_in_bounds());
/// # Ok::<_, rochade::ParseSquareError>(())
/// ```
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Square {
    file: i8,
    rank: i8,
}

impl Square {
    #[inline]
    pub const fn new(file: i8, rank: i8) -> Square {
        Square { file, rank }
    }

    /// Gets the square with the given index `file + 8 * rank`.
    ///
    /// Returns `None` if `index >= 64`.
    #[inline]
    pub const fn from_index(index: u8) -> Option<Square> {
        if index < 64 {
            Some(Square::new((index & 7) as i8, (index >> 3) as i8))
        } else {
            None
        }
    }

    #[inline]
    pub const fn file(self) -> i8 {
        self.file
    }

    #[inline]
    pub const fn rank(self) -> i8 {
        self.rank
    }

    #[inline]
    pub const fn is_in_bounds(self) -> bool {
        0 <= self.file && self.file < 8 && 0 <= self.rank && self.rank < 8
    }

    /// Index `file + 8 * rank` of an on-board square.
    #[inline]
    pub const fn index(self) -> Option<usize> {
        if self.is_in_bounds() {
            Some((self.file + 8 * self.rank) as usize)
        } else {
            None
        }
    }

    /// Moves by the given deltas. The result may be off the board.
    #[must_use]
    #[inline]
    pub const fn offset(self, file_delta: i8, rank_delta: i8) -> Square {
        Square::new(
            self.file.saturating_add(file_delta),
            self.rank.saturating_add(rank_delta),
        )
    }

    /// Moves by the given deltas, or `None` if that leaves the board.
    #[inline]
    pub const fn checked_offset(self, file_delta: i8, rank_delta: i8) -> Option<Square> {
        let sq = self.offset(file_delta, rank_delta);
        if sq.is_in_bounds() {
            Some(sq)
        } else {
            None
        }
    }

    /// Chebyshev (king move) distance.
    pub fn distance(self, other: Square) -> u8 {
        max(
            self.file.abs_diff(other.file),
            self.rank.abs_diff(other.rank),
        )
    }

    pub const A1: Square = Square::new(0, 0);
    pub const B1: Square = Square::new(1, 0);
    pub const C1: Square = Square::new(2, 0);
    pub const D1: Square = Square::new(3, 0);
    pub const E1: Square = Square::new(4, 0);
    pub const F1: Square = Square::new(5, 0);
    pub const G1: Square = Square::new(6, 0);
    pub const H1: Square = Square::new(7, 0);
    pub const A2: Square = Square::new(0, 1);
    pub const B2: Square = Square::new(1, 1);
    pub const C2: Square = Square::new(2, 1);
    pub const D2: Square = Square::new(3, 1);
    pub const E2: Square = Square::new(4, 1);
    pub const F2: Square = Square::new(5, 1);
    pub const G2: Square = Square::new(6, 1);
    pub const H2: Square = Square::new(7, 1);
    pub const A3: Square = Square::new(0, 2);
    pub const B3: Square = Square::new(1, 2);
    pub const C3: Square = Square::new(2, 2);
    pub const D3: Square = Square::new(3, 2);
    pub const E3: Square = Square::new(4, 2);
    pub const F3: Square = Square::new(5, 2);
    pub const G3: Square = Square::new(6, 2);
    pub const H3: Square = Square::new(7, 2);
    pub const A4: Square = Square::new(0, 3);
    pub const B4: Square = Square::new(1, 3);
    pub const C4: Square = Square::new(2, 3);
    pub const D4: Square = Square::new(3, 3);
    pub const E4: Square = Square::new(4, 3);
    pub const F4: Square = Square::new(5, 3);
    pub const G4: Square = Square::new(6, 3);
    pub const H4: Square = Square::new(7, 3);
    pub const A5: Square = Square::new(0, 4);
    pub const B5: Square = Square::new(1, 4);
    pub const C5: Square = Square::new(2, 4);
    pub const D5: Square = Square::new(3, 4);
    pub const E5: Square = Square::new(4, 4);
    pub const F5: Square = Square::new(5, 4);
    pub const G5: Square = Square::new(6, 4);
    pub const H5: Square = Square::new(7, 4);
    pub const A6: Square = Square::new(0, 5);
    pub const B6: Square = Square::new(1, 5);
    pub const C6: Square = Square::new(2, 5);
    pub const D6: Square = Square::new(3, 5);
    pub const E6: Square = Square::new(4, 5);
    pub const F6: Square = Square::new(5, 5);
    pub const G6: Square = Square::new(6, 5);
    pub const H6: Square = Square::new(7, 5);
    pub const A7: Square = Square::new(0, 6);
    pub const B7: Square = Square::new(1, 6);
    pub const C7: Square = Square::new(2, 6);
    pub const D7: Square = Square::new(3, 6);
    pub const E7: Square = Square::new(4, 6);
    pub const F7: Square = Square::new(5, 6);
    pub const G7: Square = Square::new(6, 6);
    pub const H7: Square = Square::new(7, 6);
    pub const A8: Square = Square::new(0, 7);
    pub const B8: Square = Square::new(1, 7);
    pub const C8: Square = Square::new(2, 7);
    pub const D8: Square = Square::new(3, 7);
    pub const E8: Square = Square::new(4, 7);
    pub const F8: Square = Square::new(5, 7);
    pub const G8: Square = Square::new(6, 7);
    pub const H8: Square = Square::new(7, 7);
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_in_bounds() {
            write!(
                f,
                "{}{}",
                char::from(b'a' + self.file as u8),
                char::from(b'1' + self.rank as u8)
            )
        } else {
            write!(f, "({}, {})", self.file, self.rank)
        }
    }
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_in_bounds() {
            write!(f, "{}", self.to_string().to_uppercase())
        } else {
            write!(f, "Square({}, {})", self.file, self.rank)
        }
    }
}

/// Error when parsing an invalid square name.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParseSquareError;

impl fmt::Display for ParseSquareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid square name")
    }
}

impl Error for ParseSquareError {}

impl FromStr for Square {
    type Err = ParseSquareError;

    fn from_str(s: &str) -> Result<Square, ParseSquareError> {
        match *s.as_bytes() {
            [file @ b'a'..=b'h', rank @ b'1'..=b'8'] => {
                Ok(Square::new((file - b'a') as i8, (rank - b'1') as i8))
            }
            _ => Err(ParseSquareError),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square() {
        for file in 0..8 {
            for rank in 0..8 {
                let square = Square::new(file, rank);
                assert_eq!(square.file(), file);
                assert_eq!(square.rank(), rank);
                assert_eq!(
                    Square::from_index(square.index().unwrap() as u8),
                    Some(square)
                );
            }
        }
    }

    #[test]
    fn test_distance() {
        assert_eq!(Square::D2.distance(Square::G3), 3);
        assert_eq!(Square::E4.distance(Square::E4), 0);
        assert_eq!(Square::new(-100, 0).distance(Square::new(100, 0)), 200);
        assert_eq!(Square::new(-128, 0).distance(Square::new(127, 0)), 255);
    }

    #[test]
    fn test_off_board() {
        assert!(!Square::new(8, 0).is_in_bounds());
        assert!(!Square::new(0, -1).is_in_bounds());
        assert_eq!(Square::new(-1, 3).index(), None);
        assert_eq!(Square::H8.checked_offset(1, 0), None);
        assert_eq!(Square::from_index(64), None);
    }

    #[test]
    fn test_parse() {
        assert_eq!("a1".parse::<Square>(), Ok(Square::A1));
        assert_eq!("h8".parse::<Square>(), Ok(Square::H8));
        assert_eq!("i1".parse::<Square>(), Err(ParseSquareError));
        assert_eq!("a9".parse::<Square>(), Err(ParseSquareError));
        assert_eq!("e".parse::<Square>(), Err(ParseSquareError));
        assert_eq!(Square::G7.to_string(), "g7");
        assert_eq!(format!("{:?}", Square::G7), "G7");
    }
}
