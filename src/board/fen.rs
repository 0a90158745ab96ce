//! FEN parsing and emission, including the trailing `eloDiff` extension the
//! original engine tacks onto the standard six fields.

use std::error::Error;
use std::fmt;

use tracing::warn;

use super::Board;
use crate::castle::{CASTLE_ALL, CASTLE_BK, CASTLE_BQ, CASTLE_WK, CASTLE_WQ};
use crate::piece::Piece;
use crate::square::Square;

pub const START_POS: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    /// FEN text failed to parse. `reason` names the field; `text` is the
    /// offending input. The board is left unmodified.
    Syntax { reason: &'static str, text: String },
}

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoardError::Syntax { reason, text } => write!(f, "malformed FEN ({reason}): `{text}`"),
        }
    }
}

impl Error for BoardError {}

fn syntax(reason: &'static str, text: &str) -> BoardError {
    BoardError::Syntax { reason, text: text.to_string() }
}

impl Board {
    /// Parse `fen` into this board, replacing its entire state. On failure
    /// the board is left exactly as it was before the call. Returns the
    /// number of whitespace-separated fields consumed (6 or 7).
    pub fn set_up(&mut self, fen: &str) -> Result<usize, BoardError> {
        let parsed = ParsedFen::parse(fen).inspect_err(|e| warn!(%e, "fen parse failed"))?;
        parsed.install(self);
        Ok(parsed.field_count)
    }

    /// Emit the canonical FEN for the current position, including the
    /// `eloDiff` suffix only when it is nonzero.
    pub fn to_fen(&self) -> String {
        let mut ranks = Vec::with_capacity(8);
        for rank in (0..8u8).rev() {
            let mut s = String::new();
            let mut empty_run = 0u32;
            for file in 0..8u8 {
                let piece = self.piece_at(Square::from_file_rank(file, rank));
                if piece.is_empty() {
                    empty_run += 1;
                } else {
                    if empty_run > 0 {
                        s.push_str(&empty_run.to_string());
                        empty_run = 0;
                    }
                    s.push(piece.to_fen_char());
                }
            }
            if empty_run > 0 {
                s.push_str(&empty_run.to_string());
            }
            ranks.push(s);
        }
        let board_field = ranks.join("/");

        let side = if self.side_to_move() == crate::piece::Color::White { "w" } else { "b" };

        let mut castle = String::new();
        if self.castle_flags & CASTLE_WK != 0 {
            castle.push('K');
        }
        if self.castle_flags & CASTLE_WQ != 0 {
            castle.push('Q');
        }
        if self.castle_flags & CASTLE_BK != 0 {
            castle.push('k');
        }
        if self.castle_flags & CASTLE_BQ != 0 {
            castle.push('q');
        }
        if castle.is_empty() {
            castle.push('-');
        }

        let ep = match crate::zobrist::ep_file_to_hash(self) {
            Some(file) => {
                let rank = match self.side_to_move() {
                    crate::piece::Color::White => 5,
                    crate::piece::Color::Black => 2,
                };
                Square::from_file_rank(file, rank).to_string()
            }
            None => "-".to_string(),
        };

        let mut out = format!(
            "{board_field} {side} {castle} {ep} {} {}",
            self.halfmove_clock,
            self.fullmove_number()
        );
        if self.elo_diff != 0 {
            out.push(' ');
            out.push_str(&self.elo_diff.to_string());
        }
        out
    }
}

/// A fully-parsed, not-yet-installed FEN, so `set_up` never mutates `self`
/// on a parse failure partway through.
struct ParsedFen {
    squares: [Piece; 64],
    white_to_move: bool,
    castle_flags: u8,
    en_passant_pawn: Option<Square>,
    halfmove_clock: u32,
    fullmove_number: u32,
    elo_diff: i32,
    field_count: usize,
}

impl ParsedFen {
    fn parse(fen: &str) -> Result<Self, BoardError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() < 4 {
            return Err(syntax("too few fields", fen));
        }

        let squares = parse_board_field(fields[0], fen)?;

        let white_to_move = match fields[1] {
            "w" => true,
            "b" => false,
            _ => return Err(syntax("side to move", fen)),
        };

        let castle_flags = parse_castle_field(fields[2], fen)?;

        let en_passant_pawn = parse_ep_field(fields[3], white_to_move, fen)?;

        let halfmove_clock = if fields.len() > 4 {
            fields[4].parse::<u32>().map_err(|_| syntax("halfmove clock", fen))?
        } else {
            0
        };

        let fullmove_number = if fields.len() > 5 {
            fields[5].parse::<u32>().map_err(|_| syntax("fullmove number", fen))?.max(1)
        } else {
            1
        };

        let elo_diff = if fields.len() > 6 {
            fields[6].parse::<i32>().map_err(|_| syntax("elo diff", fen))?
        } else {
            0
        };

        Ok(ParsedFen {
            squares,
            white_to_move,
            castle_flags,
            en_passant_pawn,
            halfmove_clock,
            fullmove_number,
            elo_diff,
            field_count: fields.len().min(7),
        })
    }

    fn install(&self, board: &mut Board) {
        *board = Board::new_empty();
        for i in 0..64u8 {
            board.set_piece(Square::new(i), self.squares[i as usize]);
        }
        board.castle_flags = self.castle_flags;
        board.en_passant_pawn = self.en_passant_pawn;
        board.halfmove_clock = self.halfmove_clock;
        board.ply_number = (self.fullmove_number.saturating_sub(1)) * 2 + if self.white_to_move { 0 } else { 1 };
        board.elo_diff = self.elo_diff;
        board.update_side_info();
        board.normalize_en_passant_status();
        board.zobrist_hash = crate::zobrist::hash64(board);
    }
}

fn parse_board_field(field: &str, whole: &str) -> Result<[Piece; 64], BoardError> {
    let mut squares = [Piece::Empty; 64];
    let ranks: Vec<&str> = field.split('/').collect();
    if ranks.len() != 8 {
        return Err(syntax("board must have 8 ranks", whole));
    }
    for (rank_from_top, rank_str) in ranks.iter().enumerate() {
        let rank = 7 - rank_from_top as u8;
        let mut file = 0u8;
        for c in rank_str.chars() {
            if let Some(skip) = c.to_digit(10) {
                file += skip as u8;
            } else {
                let piece = Piece::from_fen_char(c).ok_or_else(|| syntax("unknown piece letter", whole))?;
                if file >= 8 {
                    return Err(syntax("rank overflows 8 files", whole));
                }
                squares[(rank * 8 + file) as usize] = piece;
                file += 1;
            }
        }
        if file != 8 {
            return Err(syntax("rank does not sum to 8 files", whole));
        }
    }
    Ok(squares)
}

fn parse_castle_field(field: &str, whole: &str) -> Result<u8, BoardError> {
    if field == "-" {
        return Ok(0);
    }
    let mut flags = 0u8;
    for c in field.chars() {
        flags |= match c {
            'K' => CASTLE_WK,
            'Q' => CASTLE_WQ,
            'k' => CASTLE_BK,
            'q' => CASTLE_BQ,
            _ => return Err(syntax("castling rights", whole)),
        };
    }
    if flags & !CASTLE_ALL != 0 {
        return Err(syntax("castling rights", whole));
    }
    Ok(flags)
}

fn parse_ep_field(field: &str, white_to_move: bool, whole: &str) -> Result<Option<Square>, BoardError> {
    if field == "-" {
        return Ok(None);
    }
    let ep_square: Square = field.parse().map_err(|_| syntax("en passant square", whole))?;
    // Stored as the square of the pawn that can be captured, not the
    // passed-over square FEN names.
    let pawn_rank = if white_to_move { ep_square.rank() - 1 } else { ep_square.rank() + 1 };
    Ok(Some(Square::from_file_rank(ep_square.file(), pawn_rank)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startpos_round_trips() {
        let b: Board = START_POS.parse().unwrap();
        assert_eq!(b.to_fen(), START_POS);
    }

    #[test]
    fn rejects_short_rank() {
        let bad = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBN w KQkq - 0 1";
        assert!(bad.parse::<Board>().is_err());
    }

    #[test]
    fn parses_ep_square_and_halfmove_clock() {
        let fen = "rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3";
        let b: Board = fen.parse().unwrap();
        assert_eq!(b.en_passant_pawn, Some(Square::from_file_rank(3, 4)));
        assert_eq!(b.halfmove_clock, 0);
        assert_eq!(b.fullmove_number(), 3);
    }

    #[test]
    fn preserves_elo_diff_suffix() {
        let fen = format!("{START_POS} 42");
        let b: Board = fen.parse().unwrap();
        assert_eq!(b.elo_diff, 42);
        assert!(b.to_fen().ends_with("42"));
    }
}
