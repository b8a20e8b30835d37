use arrayvec::ArrayVec;

use crate::board::Board;
use crate::moves::movegen::MoveGenerator;
use crate::moves::types::Move;
use crate::piece::{Color, PieceKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    InPlay,
    Checkmate,
    Stalemate,
    DrawFiftyMove,
    DrawThreefold,
    DrawDeadPosition,
}

/// Occurrences of the current position in the game history, the current
/// one included.
pub fn repetition_count(board: &Board) -> u32 {
    let current = board.zobrist();
    board
        .repetition_history
        .iter()
        .filter(|&&key| key == current)
        .count() as u32
}

pub fn is_draw_by_threefold(board: &Board) -> bool {
    repetition_count(board) >= 3
}

pub fn is_draw_by_fifty_move(board: &Board) -> bool {
    board.fifty_move_counter >= 100
}

/// Neither side can ever deliver mate: bare kings, a lone minor, or one
/// minor each.
pub fn is_insufficient_material(board: &Board) -> bool {
    let mut minors = [0u32; 2];

    for piece in board.square.iter() {
        match piece.kind() {
            PieceKind::None | PieceKind::King => {}
            PieceKind::Knight | PieceKind::Bishop => {
                minors[piece.color() as usize] += 1;
            }
            // Any pawn, rook or queen means mating material exists.
            PieceKind::Pawn | PieceKind::Rook | PieceKind::Queen => return false,
        }
    }

    let white = minors[Color::White as usize];
    let black = minors[Color::Black as usize];
    match white + black {
        0 | 1 => true,
        2 => white == 1 && black == 1,
        _ => false,
    }
}

/// Game status of the current position.
///
/// Priority: dead position, then claimable draws (threefold, fifty-move),
/// then checkmate / stalemate / in-play.
pub fn position_status(board: &mut Board, generator: &MoveGenerator) -> GameStatus {
    if is_insufficient_material(board) {
        return GameStatus::DrawDeadPosition;
    }
    if is_draw_by_threefold(board) {
        return GameStatus::DrawThreefold;
    }
    if is_draw_by_fifty_move(board) {
        return GameStatus::DrawFiftyMove;
    }

    let mut moves: ArrayVec<Move, 256> = ArrayVec::new();
    generator.generate_moves(board, &mut moves, false);
    if moves.is_empty() {
        if generator.is_in_check(board) {
            GameStatus::Checkmate
        } else {
            GameStatus::Stalemate
        }
    } else {
        GameStatus::InPlay
    }
}
