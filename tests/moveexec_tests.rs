use std::str::FromStr;

use outpost::board::{Board, CASTLE_BK, CASTLE_BQ, CASTLE_WK, CASTLE_WQ};
use outpost::moves::types::{Move, MoveFlag};
use outpost::piece::{Color, Piece, PieceKind};
use outpost::square::Square;

fn mv(uci: &str) -> Move {
    Move::from_uci(uci).expect("valid uci")
}

fn flagged(uci: &str, flag: MoveFlag) -> Move {
    let base = mv(uci);
    Move::with_flag(base.start(), base.target(), flag)
}

// Full-equality round trips use the search protocol (`in_search = true`):
// game-mode unmakes cannot resurrect the repetition history an
// irreversible move cleared, and the searcher is what depends on exact
// restoration.

#[test]
fn roundtrip_simple_move() {
    let mut board = Board::new();
    let before = board.clone();

    board.make_move(mv("g1f3"), true);
    board.unmake_move(mv("g1f3"), true);

    assert_eq!(board, before);
}

#[test]
fn roundtrip_capture_sequence() {
    let mut board = Board::new();
    let original = board.clone();

    let e4 = flagged("e2e4", MoveFlag::PawnTwoUp);
    let d5 = flagged("d7d5", MoveFlag::PawnTwoUp);
    let exd5 = mv("e4d5");

    board.make_move(e4, true);
    board.make_move(d5, true);
    board.make_move(exd5, true);

    let d5_sq = Square::from_str("d5").unwrap();
    assert_eq!(board.piece_at(d5_sq), Piece::new(PieceKind::Pawn, Color::White));
    assert_eq!(board.fifty_move_counter, 0);

    board.unmake_move(exd5, true);
    board.unmake_move(d5, true);
    board.unmake_move(e4, true);

    assert_eq!(board, original);
}

#[test]
fn roundtrip_white_kingside_castle() {
    let fen = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1";
    let mut board = Board::from_fen(fen).unwrap();
    let original = board.clone();
    let original_key = board.zobrist();

    board.make_move(flagged("e1g1", MoveFlag::Castle), false);

    assert_eq!(board.to_fen(), "r3k2r/8/8/8/8/8/8/R4RK1 b kq - 1 1");
    assert_eq!(board.king_square(Color::White).index(), 6);
    assert_eq!(
        board.piece_at(Square::from_str("f1").unwrap()).kind(),
        PieceKind::Rook
    );

    board.unmake_move(flagged("e1g1", MoveFlag::Castle), false);
    assert_eq!(board.to_fen(), fen);
    assert_eq!(board.zobrist(), original_key);
    assert_eq!(board, original);
}

#[test]
fn roundtrip_black_queenside_castle() {
    let fen = "r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1";
    let mut board = Board::from_fen(fen).unwrap();
    let original = board.clone();

    board.make_move(flagged("e8c8", MoveFlag::Castle), false);

    assert_eq!(board.king_square(Color::Black).index(), 58);
    assert_eq!(
        board.piece_at(Square::from_str("d8").unwrap()).kind(),
        PieceKind::Rook
    );
    assert_eq!(board.castling_rights, CASTLE_WK | CASTLE_WQ);

    board.unmake_move(flagged("e8c8", MoveFlag::Castle), false);
    assert_eq!(board, original);
}

#[test]
fn roundtrip_en_passant() {
    // 1. e4 d5 2. e5 f5 leaves the f5 pawn capturable in passing.
    let mut board = Board::new();
    board.make_move(flagged("e2e4", MoveFlag::PawnTwoUp), false);
    board.make_move(flagged("d7d5", MoveFlag::PawnTwoUp), false);
    board.make_move(mv("e4e5"), false);
    board.make_move(flagged("f7f5", MoveFlag::PawnTwoUp), false);

    assert_eq!(board.en_passant_file, 6);
    let before_capture = board.clone();

    let ep = flagged("e5f6", MoveFlag::EnPassant);
    board.make_move(ep, true);

    let f5 = Square::from_str("f5").unwrap();
    let f6 = Square::from_str("f6").unwrap();
    assert!(board.piece_at(f5).is_empty(), "captured pawn removed");
    assert_eq!(board.piece_at(f6), Piece::new(PieceKind::Pawn, Color::White));

    board.unmake_move(ep, true);
    assert_eq!(board, before_capture);
}

#[test]
fn roundtrip_promotion() {
    let fen = "8/P7/8/8/8/8/8/k6K w - - 0 1";
    let mut board = Board::from_fen(fen).unwrap();
    let original = board.clone();

    let promote = mv("a7a8q");
    assert_eq!(promote.flag(), MoveFlag::PromoteQueen);
    board.make_move(promote, true);

    let a8 = Square::from_str("a8").unwrap();
    assert_eq!(board.piece_at(a8), Piece::new(PieceKind::Queen, Color::White));

    board.unmake_move(promote, true);
    assert_eq!(board, original);
}

#[test]
fn roundtrip_underpromotion_capture() {
    let fen = "1n6/P7/8/8/8/8/8/k6K w - - 0 1";
    let mut board = Board::from_fen(fen).unwrap();
    let original = board.clone();

    let capture_promote = mv("a7b8n");
    board.make_move(capture_promote, true);

    let b8 = Square::from_str("b8").unwrap();
    assert_eq!(board.piece_at(b8), Piece::new(PieceKind::Knight, Color::White));

    board.unmake_move(capture_promote, true);
    assert_eq!(board, original);
}

#[test]
fn capturing_a_rook_clears_its_castling_right() {
    // White rook takes the h8 rook while Black still holds both rights.
    let fen = "r3k2r/8/8/8/8/8/8/4K2R w Kkq - 0 1";
    let mut board = Board::from_fen(fen).unwrap();
    let original = board.clone();

    board.make_move(mv("h1h8"), true);
    assert_eq!(board.castling_rights & CASTLE_BK, 0, "kingside right gone");
    assert_ne!(board.castling_rights & CASTLE_BQ, 0, "queenside right kept");
    // White's own rook left h1 as well.
    assert_eq!(board.castling_rights & CASTLE_WK, 0);

    board.unmake_move(mv("h1h8"), true);
    assert_eq!(board, original);
}

#[test]
fn fifty_move_counter_tracks_reversible_moves() {
    let mut board = Board::new();
    board.make_move(mv("g1f3"), false);
    assert_eq!(board.fifty_move_counter, 1);
    board.make_move(mv("g8f6"), false);
    assert_eq!(board.fifty_move_counter, 2);
    board.make_move(flagged("e2e4", MoveFlag::PawnTwoUp), false);
    assert_eq!(board.fifty_move_counter, 0, "pawn move resets the clock");
}
