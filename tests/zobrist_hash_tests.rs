use outpost::board::Board;
use outpost::hash::zobrist;
use outpost::moves::types::{Move, MoveFlag};

fn mv(uci: &str) -> Move {
    Move::from_uci(uci).expect("valid uci")
}

fn flagged(uci: &str, flag: MoveFlag) -> Move {
    let base = mv(uci);
    Move::with_flag(base.start(), base.target(), flag)
}

#[test]
fn incremental_matches_full_recompute() {
    let mut board = Board::new();
    let line = [
        flagged("e2e4", MoveFlag::PawnTwoUp),
        mv("b8c6"),
        mv("g1f3"),
        flagged("d7d5", MoveFlag::PawnTwoUp),
        mv("e4d5"),
        mv("d8d5"),
        mv("b1c3"),
    ];

    for m in line {
        board.make_move(m, false);
        assert_eq!(
            board.zobrist(),
            zobrist::calculate(&board),
            "incremental key diverged after {}",
            m
        );
    }
}

#[test]
fn incremental_matches_after_special_moves() {
    let mut board = Board::from_fen("r3k2r/p6p/8/8/8/8/P6P/R3K2R w KQkq - 0 1").unwrap();

    for m in [
        flagged("e1g1", MoveFlag::Castle),
        flagged("e8c8", MoveFlag::Castle),
        flagged("a2a4", MoveFlag::PawnTwoUp),
        flagged("h7h5", MoveFlag::PawnTwoUp),
    ] {
        board.make_move(m, false);
        assert_eq!(board.zobrist(), zobrist::calculate(&board));
    }
}

#[test]
fn different_positions_hash_differently() {
    let start = Board::new();
    let after_e4 =
        Board::from_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1").unwrap();
    assert_ne!(start.zobrist(), after_e4.zobrist());
}

#[test]
fn side_to_move_changes_the_key() {
    let white = Board::from_fen("k7/8/8/8/8/8/8/K7 w - - 0 1").unwrap();
    let black = Board::from_fen("k7/8/8/8/8/8/8/K7 b - - 0 1").unwrap();
    assert_ne!(white.zobrist(), black.zobrist());
}

#[test]
fn castling_rights_change_the_key() {
    let all = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
    let none = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w - - 0 1").unwrap();
    assert_ne!(all.zobrist(), none.zobrist());
}

#[test]
fn knight_dance_returns_to_the_starting_key() {
    let mut board = Board::new();
    let start_key = board.zobrist();

    for m in [mv("g1f3"), mv("g8f6"), mv("f3g1"), mv("f6g8")] {
        board.make_move(m, false);
    }

    assert_eq!(board.zobrist(), start_key);
    // Same position via a different move order transposes to the key too.
    assert_eq!(board.zobrist(), zobrist::calculate(&board));
}

#[test]
fn fen_load_agrees_with_played_moves() {
    let mut played = Board::new();
    played.make_move(flagged("e2e4", MoveFlag::PawnTwoUp), false);

    let loaded =
        Board::from_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1").unwrap();

    assert_eq!(played.zobrist(), loaded.zobrist());
}
