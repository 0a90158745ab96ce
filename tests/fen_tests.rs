#[cfg(test)]
mod tests {
    use chesscore::Board;

    #[test]
    fn kiwipete_round_trips() {
        let fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
        let board: Board = fen.parse().unwrap();
        assert_eq!(board.to_fen(), fen);
    }

    #[test]
    fn en_passant_square_clears_when_not_actually_capturable() {
        // d6 is nominally an ep target, but no white pawn sits on c5 or e5
        // to capture onto it, so a conformant parser should drop it.
        let fen = "rnbqkbnr/ppp1pppp/8/3p4/8/8/PPPPPPPP/RNBQKBNR w KQkq d6 0 2";
        let board: Board = fen.parse().unwrap();
        assert_eq!(board.en_passant_pawn, None);
        assert!(board.to_fen().contains(" - "));
    }

    #[test]
    fn capturable_en_passant_square_round_trips() {
        // e5 sits next to d5, the actual ep target, so the field must survive
        // the parse/emit round trip instead of collapsing to "-".
        let fen = "rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3";
        let board: Board = fen.parse().unwrap();
        assert_eq!(board.to_fen(), fen);
    }

    #[test]
    fn malformed_fen_leaves_board_untouched() {
        let mut board = Board::new();
        let before = board.clone();
        let result = board.set_up("not a fen at all");
        assert!(result.is_err());
        assert_eq!(board, before);
    }
}
