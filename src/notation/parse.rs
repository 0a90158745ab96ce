use crate::board::Board;
use crate::r#move::Move;

use super::{ParseMoveError, legal_moves, move_to_lan, move_to_san, move_to_uci};

/// Parse `text` as a move in the current position, accepting SAN, long
/// algebraic, or UCI, in whichever of those the input happens to be.
/// `board` is the position the move is played from.
pub fn parse_move(board: &Board, text: &str) -> Result<Move, ParseMoveError> {
    let normalized = normalize(text.trim());
    if normalized.is_empty() || !looks_like_move_syntax(&normalized) {
        return Err(ParseMoveError::Syntax(text.to_string()));
    }

    let mut matches = Vec::new();
    for mv in legal_moves(board) {
        let uci = move_to_uci(mv).to_lowercase();
        let lan = normalize(&move_to_lan(board, mv));
        let san = normalize(&move_to_san(board, mv));
        if normalized == uci || normalized == lan || normalized == san {
            matches.push(mv);
        }
    }

    match matches.len() {
        0 => Err(ParseMoveError::Illegal(text.to_string())),
        1 => Ok(matches[0]),
        _ => Err(ParseMoveError::Ambiguous(text.to_string())),
    }
}

/// Strips check/mate/annotation suffixes and folds castling's `0-0`
/// shorthand and case, so `"Nf3+"`, `"nf3"`, and `"Nf3"` all compare equal.
fn normalize(s: &str) -> String {
    s.trim_end_matches(['+', '#', '!', '?'])
        .replace('0', "O")
        .to_lowercase()
}

fn looks_like_move_syntax(s: &str) -> bool {
    s.len() >= 2 && s.len() <= 9 && s.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '='))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;

    #[test]
    fn parses_uci_and_san_for_same_move() {
        let mut b = Board::new();
        b.update_side_info();
        let via_uci = parse_move(&b, "e2e4").unwrap();
        let via_san = parse_move(&b, "e4").unwrap();
        assert_eq!(via_uci, via_san);
    }

    #[test]
    fn rejects_illegal_move() {
        let mut b = Board::new();
        b.update_side_info();
        assert!(matches!(parse_move(&b, "e2e5"), Err(ParseMoveError::Illegal(_))));
    }

    #[test]
    fn rejects_garbage_as_syntax_error() {
        let mut b = Board::new();
        b.update_side_info();
        assert!(matches!(parse_move(&b, "???"), Err(ParseMoveError::Syntax(_))));
    }

    #[test]
    fn parses_castling_both_notations() {
        let mut b: Board = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1".parse().unwrap();
        b.update_side_info();
        let via_o = parse_move(&b, "O-O").unwrap();
        let via_zero = parse_move(&b, "0-0").unwrap();
        assert_eq!(via_o, via_zero);
    }
}
