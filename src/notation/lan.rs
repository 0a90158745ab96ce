use crate::board::Board;
use crate::piece::Kind;
use crate::r#move::Move;

/// Long algebraic: piece letter (pawns omit it), `-` for a quiet move or
/// `x` for a capture, then the destination, then `=X` for a promotion.
/// `board` must be the position *before* the move.
pub fn move_to_lan(board: &Board, mv: Move) -> String {
    let piece = board.piece_at(mv.from());
    let kind = piece.color_and_kind().expect("move starts on an occupied square").1;

    let is_capture = !board.piece_at(mv.to()).is_empty() || is_en_passant(board, mv);

    let mut s = String::new();
    if kind != Kind::Pawn {
        s.push(piece.to_san_letter());
    }
    s.push_str(&mv.from().to_string());
    s.push(if is_capture { 'x' } else { '-' });
    s.push_str(&mv.to().to_string());
    if let Some(promo) = mv.promotion() {
        s.push('=');
        s.push(promo.san_letter());
    }
    s
}

fn is_en_passant(board: &Board, mv: Move) -> bool {
    board
        .piece_at(mv.from())
        .color_and_kind()
        .is_some_and(|(_, k)| k == Kind::Pawn)
        && mv.from().file() != mv.to().file()
        && board.piece_at(mv.to()).is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::square::Square;

    #[test]
    fn pawn_push_has_no_piece_letter() {
        let b = Board::new();
        let mv = Move::new(Square::from_file_rank(4, 1), Square::from_file_rank(4, 3));
        assert_eq!(move_to_lan(&b, mv), "e2-e4");
    }
}
