use crate::board::Board;
use crate::moves::types::{Move, MoveFlag};
use crate::search::context::SearchContext;

/// The hash move outranks everything else.
const HASH_MOVE_SCORE: i32 = 1_000_000;
const KILLER_ONE_SCORE: i32 = 900;
const KILLER_TWO_SCORE: i32 = 800;

/// Most-valuable-victim / least-valuable-attacker capture score; zero for
/// quiet moves.
pub fn mvv_lva_score(board: &Board, mv: Move) -> i32 {
    let victim = board.piece_at(mv.target());
    if !victim.is_empty() {
        let attacker = board.piece_at(mv.start());
        return 10 * victim.kind().value() - attacker.kind().value();
    }
    if mv.flag() == MoveFlag::EnPassant {
        // Pawn takes pawn; the victim square is empty.
        return 10 * 100 - 100;
    }
    0
}

/// Rank `moves` best-first: hash move, then captures by MVV-LVA, killers,
/// and the history counters. One integer score per move, one sort.
pub fn order_moves(
    moves: &mut [Move],
    board: &Board,
    ctx: &SearchContext,
    hash_move: Option<Move>,
    ply_from_root: usize,
) {
    let color = board.side_to_move;
    let killers = ctx
        .killer_moves
        .get(ply_from_root)
        .copied()
        .unwrap_or([None; 2]);

    moves.sort_by_cached_key(|&mv| {
        if hash_move == Some(mv) {
            return -HASH_MOVE_SCORE;
        }

        let mut score = mvv_lva_score(board, mv);

        if killers[0] == Some(mv) {
            score += KILLER_ONE_SCORE;
        } else if killers[1] == Some(mv) {
            score += KILLER_TWO_SCORE;
        }

        score += ctx.history_score(color, mv);

        -score
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mv(uci: &str) -> Move {
        Move::from_uci(uci).unwrap()
    }

    #[test]
    fn hash_move_sorts_first() {
        let board = Board::new();
        let ctx = SearchContext::new();
        let mut moves = vec![mv("a2a3"), mv("e2e4"), mv("g1f3")];
        order_moves(&mut moves, &board, &ctx, Some(mv("g1f3")), 0);
        assert_eq!(moves[0], mv("g1f3"));
    }

    #[test]
    fn capture_outranks_quiet() {
        // White pawn e4 can take d5 or push.
        let board =
            Board::from_fen("k7/8/8/3p4/4P3/8/8/K7 w - - 0 1").unwrap();
        let ctx = SearchContext::new();
        let mut moves = vec![mv("e4e5"), mv("e4d5")];
        order_moves(&mut moves, &board, &ctx, None, 0);
        assert_eq!(moves[0], mv("e4d5"));
    }

    #[test]
    fn killer_outranks_plain_quiet() {
        let board = Board::new();
        let mut ctx = SearchContext::new();
        ctx.add_killer(2, mv("b1c3"));
        let mut moves = vec![mv("a2a3"), mv("b1c3"), mv("h2h3")];
        order_moves(&mut moves, &board, &ctx, None, 2);
        assert_eq!(moves[0], mv("b1c3"));
    }
}
