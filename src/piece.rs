//! Piece and color encoding. 13 values total: empty plus six piece kinds for
//! each color, matching the original C `enum piece`.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Color {
    White = 0,
    Black = 1,
}

impl Color {
    #[inline(always)]
    pub const fn opposite(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

impl std::ops::Not for Color {
    type Output = Self;

    #[inline(always)]
    fn not(self) -> Self::Output {
        self.opposite()
    }
}

/// One of 13 values: empty, or a color/kind pair. The discriminant doubles
/// as the mailbox cell's raw byte, so `Piece::Empty as i8 == 0` and every
/// off-board sentinel cell (`-1`) is disjoint from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i8)]
pub enum Piece {
    Empty = 0,
    WhiteKing = 1,
    WhiteQueen = 2,
    WhiteRook = 3,
    WhiteBishop = 4,
    WhiteKnight = 5,
    WhitePawn = 6,
    BlackKing = 7,
    BlackQueen = 8,
    BlackRook = 9,
    BlackBishop = 10,
    BlackKnight = 11,
    BlackPawn = 12,
}

/// The piece kind, independent of color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    King,
    Queen,
    Rook,
    Bishop,
    Knight,
    Pawn,
}

impl Piece {
    #[inline(always)]
    pub const fn from_raw(raw: i8) -> Option<Piece> {
        Some(match raw {
            0 => Piece::Empty,
            1 => Piece::WhiteKing,
            2 => Piece::WhiteQueen,
            3 => Piece::WhiteRook,
            4 => Piece::WhiteBishop,
            5 => Piece::WhiteKnight,
            6 => Piece::WhitePawn,
            7 => Piece::BlackKing,
            8 => Piece::BlackQueen,
            9 => Piece::BlackRook,
            10 => Piece::BlackBishop,
            11 => Piece::BlackKnight,
            12 => Piece::BlackPawn,
            _ => return None,
        })
    }

    #[inline(always)]
    pub const fn raw(self) -> i8 {
        self as i8
    }

    #[inline(always)]
    pub const fn make(color: Color, kind: Kind) -> Piece {
        let base = match kind {
            Kind::King => 1,
            Kind::Queen => 2,
            Kind::Rook => 3,
            Kind::Bishop => 4,
            Kind::Knight => 5,
            Kind::Pawn => 6,
        };
        let raw = base + 6 * (color as i8);
        match Piece::from_raw(raw) {
            Some(p) => p,
            None => unreachable!(),
        }
    }

    #[inline(always)]
    pub const fn is_empty(self) -> bool {
        matches!(self, Piece::Empty)
    }

    /// Color of a non-empty piece. Calling this on `Empty` is a contract
    /// violation; empty squares carry no color.
    #[inline(always)]
    pub const fn color(self) -> Color {
        debug_assert!(!self.is_empty());
        if (self.raw()) <= 6 { Color::White } else { Color::Black }
    }

    #[inline(always)]
    pub const fn kind(self) -> Kind {
        let base = if self.raw() <= 6 { self.raw() } else { self.raw() - 6 };
        match base {
            1 => Kind::King,
            2 => Kind::Queen,
            3 => Kind::Rook,
            4 => Kind::Bishop,
            5 => Kind::Knight,
            6 => Kind::Pawn,
            _ => unreachable!(),
        }
    }

    #[inline(always)]
    pub const fn color_and_kind(self) -> Option<(Color, Kind)> {
        if self.is_empty() {
            None
        } else {
            Some((self.color(), self.kind()))
        }
    }

    pub fn to_san_letter(self) -> char {
        match self.kind() {
            Kind::King => 'K',
            Kind::Queen => 'Q',
            Kind::Rook => 'R',
            Kind::Bishop => 'B',
            Kind::Knight => 'N',
            Kind::Pawn => 'P',
        }
    }

    /// FEN letter: uppercase for white, lowercase for black.
    pub fn to_fen_char(self) -> char {
        let c = self.to_san_letter();
        match self.color_and_kind() {
            Some((Color::White, _)) => c,
            Some((Color::Black, _)) => c.to_ascii_lowercase(),
            None => ' ',
        }
    }

    pub fn from_fen_char(c: char) -> Option<Piece> {
        let color = if c.is_ascii_uppercase() { Color::White } else { Color::Black };
        let kind = match c.to_ascii_uppercase() {
            'K' => Kind::King,
            'Q' => Kind::Queen,
            'R' => Kind::Rook,
            'B' => Kind::Bishop,
            'N' => Kind::Knight,
            'P' => Kind::Pawn,
            _ => return None,
        };
        Some(Piece::make(color, kind))
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_fen_char())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn make_and_decode_roundtrip() {
        for &color in &[Color::White, Color::Black] {
            for &kind in &[Kind::King, Kind::Queen, Kind::Rook, Kind::Bishop, Kind::Knight, Kind::Pawn] {
                let p = Piece::make(color, kind);
                assert_eq!(p.color(), color);
                assert_eq!(p.kind(), kind);
            }
        }
    }

    #[test]
    fn fen_char_roundtrip() {
        for raw in 1..=12i8 {
            let p = Piece::from_raw(raw).unwrap();
            let c = p.to_fen_char();
            assert_eq!(Piece::from_fen_char(c), Some(p));
        }
    }

    #[test]
    fn empty_is_zero() {
        assert_eq!(Piece::Empty.raw(), 0);
    }
}
