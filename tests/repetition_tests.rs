use outpost::board::Board;
use outpost::moves::types::Move;
use outpost::search::repetition::RepetitionTable;
use outpost::status;

fn mv(uci: &str) -> Move {
    Move::from_uci(uci).unwrap()
}

#[test]
fn knight_dance_is_reported_as_a_repeat() {
    let mut board = Board::new();
    let start_key = board.zobrist();

    let mut table = RepetitionTable::new();
    table.init(&board.repetition_history);

    for m in [mv("g1f3"), mv("g8f6"), mv("f3g1"), mv("f6g8")] {
        board.make_move(m, true);
        table.push(board.zobrist(), false);
    }

    assert_eq!(board.zobrist(), start_key);
    // The table must see the starting position among the ancestors.
    assert!(table.contains(start_key));
}

#[test]
fn game_history_grows_and_resets() {
    let mut board = Board::new();
    assert_eq!(board.repetition_history.len(), 1);

    board.make_move(mv("g1f3"), false);
    board.make_move(mv("g8f6"), false);
    assert_eq!(board.repetition_history.len(), 3);

    // A pawn push is irreversible: history restarts from that position.
    board.make_move(mv("e2e4"), false);
    assert_eq!(board.repetition_history.len(), 1);
}

#[test]
fn threefold_after_two_knight_dances() {
    let mut board = Board::new();
    let dance = [mv("g1f3"), mv("g8f6"), mv("f3g1"), mv("f6g8")];

    for m in dance {
        board.make_move(m, false);
    }
    assert_eq!(status::repetition_count(&board), 2);
    assert!(!status::is_draw_by_threefold(&board));

    for m in dance {
        board.make_move(m, false);
    }
    assert_eq!(status::repetition_count(&board), 3);
    assert!(status::is_draw_by_threefold(&board));
}

#[test]
fn search_moves_leave_the_game_history_alone() {
    let mut board = Board::new();
    let before = board.repetition_history.clone();

    board.make_move(mv("g1f3"), true);
    board.make_move(mv("b8c6"), true);
    assert_eq!(board.repetition_history, before);

    board.unmake_move(mv("b8c6"), true);
    board.unmake_move(mv("g1f3"), true);
    assert_eq!(board.repetition_history, before);
}
