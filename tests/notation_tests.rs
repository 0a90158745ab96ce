#[cfg(test)]
mod tests {
    use chesscore::notation::{get_check_mark, move_to_san, parse_move};
    use chesscore::square::Square;
    use chesscore::{Board, Move};

    #[test]
    fn san_round_trips_through_parse_move() {
        let mut board = Board::new();
        board.update_side_info();

        let e2 = Square::from_file_rank(4, 1);
        let e4 = Square::from_file_rank(4, 3);
        let mv = Move::new(e2, e4);

        let san = move_to_san(&board, mv);
        let parsed = parse_move(&board, &san).expect("san round trips");
        assert_eq!(parsed, mv);
    }

    #[test]
    fn check_mark_reflects_position_after_the_move() {
        // Fool's mate: after 1.f3 e5 2.g4 Qh4#, black's queen delivers mate.
        let mut board: Board = "rnbqkbnr/pppp1ppp/8/4p3/6P1/5P2/PPPPP2P/RNBQKBNR b KQkq - 0 2"
            .parse()
            .unwrap();
        board.update_side_info();
        let h4 = Square::from_file_rank(7, 3);
        let d8 = Square::from_file_rank(3, 7);
        let mv = Move::new(d8, h4);

        assert_eq!(move_to_san(&board, mv), "Qh4#");

        board.make_move(mv);
        board.update_side_info();
        assert_eq!(get_check_mark(&board), "#");
    }

    #[test]
    fn parse_move_accepts_uci_lan_and_san_for_the_same_move() {
        let mut board = Board::new();
        board.update_side_info();
        let e2 = Square::from_file_rank(4, 1);
        let e4 = Square::from_file_rank(4, 3);
        let mv = Move::new(e2, e4);

        assert_eq!(parse_move(&board, "e2e4").unwrap(), mv);
        assert_eq!(parse_move(&board, "e2-e4").unwrap(), mv);
        assert_eq!(parse_move(&board, "e4").unwrap(), mv);
    }
}
