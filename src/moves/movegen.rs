use arrayvec::ArrayVec;

use crate::board::{Board, CASTLE_BK, CASTLE_BQ, CASTLE_WK, CASTLE_WQ};
use crate::moves::square_control::{
    self, DIRECTION_OFFSETS, EdgeDistances, KNIGHT_OFFSETS, compute_edge_distances,
};
use crate::moves::types::{Move, MoveBuffer, MoveFlag};
use crate::piece::PieceKind;
use crate::square::Square;

const PROMOTION_FLAGS: [MoveFlag; 4] = [
    MoveFlag::PromoteQueen,
    MoveFlag::PromoteKnight,
    MoveFlag::PromoteRook,
    MoveFlag::PromoteBishop,
];

/// Legal move generator over the mailbox board. Edge distances are
/// precomputed once per instance; everything else is stateless.
pub struct MoveGenerator {
    edges: EdgeDistances,
}

impl Default for MoveGenerator {
    fn default() -> Self {
        MoveGenerator::new()
    }
}

impl MoveGenerator {
    pub fn new() -> Self {
        MoveGenerator {
            edges: compute_edge_distances(),
        }
    }

    /// Fill `moves` with the legal moves for the side to move. With
    /// `captures_only` quiet moves are suppressed (quiescence mode).
    /// Needs `&mut Board` because legality is probed by make/unmake.
    pub fn generate_moves(
        &self,
        board: &mut Board,
        moves: &mut impl MoveBuffer,
        captures_only: bool,
    ) {
        let mut pseudo: ArrayVec<Move, 256> = ArrayVec::new();
        self.generate_pseudo_legal(board, &mut pseudo, captures_only);

        moves.clear();
        let mover = board.side_to_move;
        for &mv in pseudo.iter() {
            board.make_move(mv, true);
            let leaves_king_exposed = square_control::in_check(board, &self.edges, mover);
            board.unmake_move(mv, true);
            if !leaves_king_exposed {
                moves.push(mv);
            }
        }
    }

    pub fn is_square_attacked(&self, board: &Board, sq: Square, by_white: bool) -> bool {
        square_control::is_square_attacked(board, &self.edges, sq, by_white)
    }

    pub fn is_in_check(&self, board: &Board) -> bool {
        square_control::in_check(board, &self.edges, board.side_to_move)
    }

    fn generate_pseudo_legal(
        &self,
        board: &Board,
        moves: &mut impl MoveBuffer,
        captures_only: bool,
    ) {
        let us = board.side_to_move;

        for sq in 0..64usize {
            let piece = board.square[sq];
            if !piece.is_color(us) {
                continue;
            }

            match piece.kind() {
                PieceKind::Pawn => self.pawn_moves(board, sq, moves, captures_only),
                PieceKind::Knight => self.knight_moves(board, sq, moves, captures_only),
                PieceKind::Bishop => self.sliding_moves(board, sq, 4..8, moves, captures_only),
                PieceKind::Rook => self.sliding_moves(board, sq, 0..4, moves, captures_only),
                PieceKind::Queen => self.sliding_moves(board, sq, 0..8, moves, captures_only),
                PieceKind::King => self.king_moves(board, sq, moves, captures_only),
                PieceKind::None => {}
            }
        }
    }

    fn pawn_moves(
        &self,
        board: &Board,
        sq: usize,
        moves: &mut impl MoveBuffer,
        captures_only: bool,
    ) {
        let white = board.white_to_move();
        let push = if white { 8i32 } else { -8 };
        let start_rank = if white { 1 } else { 6 };
        let promo_rank = if white { 7 } else { 0 };
        let rank = (sq / 8) as i32;
        let file = (sq % 8) as i32;
        let from = Square::from_index(sq as u8);

        if !captures_only {
            let target = sq as i32 + push;
            if (0..64).contains(&target) && board.square[target as usize].is_empty() {
                let to = Square::from_index(target as u8);
                if target / 8 == promo_rank {
                    for flag in PROMOTION_FLAGS {
                        moves.push(Move::with_flag(from, to, flag));
                    }
                } else {
                    moves.push(Move::new(from, to));

                    if rank == start_rank {
                        let two_up = sq as i32 + push * 2;
                        if board.square[two_up as usize].is_empty() {
                            moves.push(Move::with_flag(
                                from,
                                Square::from_index(two_up as u8),
                                MoveFlag::PawnTwoUp,
                            ));
                        }
                    }
                }
            }
        }

        // En-passant target square, if any: behind the opposing double push.
        let ep_target = if board.en_passant_file > 0 {
            let ep_rank = if white { 5 } else { 2 };
            Some(ep_rank * 8 + (board.en_passant_file as i32 - 1))
        } else {
            None
        };

        for offset in [push - 1, push + 1] {
            let target = sq as i32 + offset;
            if !(0..64).contains(&target) {
                continue;
            }
            // File delta of exactly 1 rejects a/h-file wraparound.
            if (file - target % 8).abs() != 1 {
                continue;
            }

            let occupant = board.square[target as usize];
            let to = Square::from_index(target as u8);

            if occupant.is_color(!board.side_to_move) {
                if target / 8 == promo_rank {
                    for flag in PROMOTION_FLAGS {
                        moves.push(Move::with_flag(from, to, flag));
                    }
                } else {
                    moves.push(Move::new(from, to));
                }
            } else if Some(target) == ep_target {
                moves.push(Move::with_flag(from, to, MoveFlag::EnPassant));
            }
        }
    }

    fn knight_moves(
        &self,
        board: &Board,
        sq: usize,
        moves: &mut impl MoveBuffer,
        captures_only: bool,
    ) {
        let file = (sq % 8) as i32;
        let rank = (sq / 8) as i32;
        let from = Square::from_index(sq as u8);

        for offset in KNIGHT_OFFSETS {
            let target = sq as i32 + offset;
            if !(0..64).contains(&target) {
                continue;
            }
            if (file - target % 8).abs() > 2 || (rank - target / 8).abs() > 2 {
                continue;
            }

            let occupant = board.square[target as usize];
            if occupant.is_color(board.side_to_move) {
                continue;
            }
            if captures_only && occupant.is_empty() {
                continue;
            }
            moves.push(Move::new(from, Square::from_index(target as u8)));
        }
    }

    fn sliding_moves(
        &self,
        board: &Board,
        sq: usize,
        directions: std::ops::Range<usize>,
        moves: &mut impl MoveBuffer,
        captures_only: bool,
    ) {
        let from = Square::from_index(sq as u8);

        for dir in directions {
            let offset = DIRECTION_OFFSETS[dir];
            for dist in 1..=self.edges[sq][dir] as i32 {
                let target = (sq as i32 + offset * dist) as usize;
                let occupant = board.square[target];

                if occupant.is_empty() {
                    if !captures_only {
                        moves.push(Move::new(from, Square::from_index(target as u8)));
                    }
                    continue;
                }
                if occupant.color() != board.side_to_move {
                    moves.push(Move::new(from, Square::from_index(target as u8)));
                }
                break;
            }
        }
    }

    fn king_moves(
        &self,
        board: &Board,
        sq: usize,
        moves: &mut impl MoveBuffer,
        captures_only: bool,
    ) {
        let from = Square::from_index(sq as u8);

        for (dir, offset) in DIRECTION_OFFSETS.iter().enumerate() {
            if self.edges[sq][dir] == 0 {
                continue;
            }
            let target = (sq as i32 + offset) as usize;
            let occupant = board.square[target];
            if occupant.is_color(board.side_to_move) {
                continue;
            }
            if captures_only && occupant.is_empty() {
                continue;
            }
            moves.push(Move::new(from, Square::from_index(target as u8)));
        }

        if !captures_only {
            self.castle_moves(board, sq, moves);
        }
    }

    fn castle_moves(&self, board: &Board, sq: usize, moves: &mut impl MoveBuffer) {
        let white = board.white_to_move();
        let home = if white { 4 } else { 60 };
        if sq != home {
            return;
        }

        let (kingside_right, queenside_right) = if white {
            (CASTLE_WK, CASTLE_WQ)
        } else {
            (CASTLE_BK, CASTLE_BQ)
        };
        let by_enemy = !white;

        let attacked =
            |idx: usize| self.is_square_attacked(board, Square::from_index(idx as u8), by_enemy);

        if attacked(home) {
            return;
        }

        let from = Square::from_index(home as u8);

        if board.castling_rights & kingside_right != 0
            && board.square[home + 1].is_empty()
            && board.square[home + 2].is_empty()
            && !attacked(home + 1)
            && !attacked(home + 2)
        {
            moves.push(Move::with_flag(
                from,
                Square::from_index((home + 2) as u8),
                MoveFlag::Castle,
            ));
        }

        // The b-file square must be empty but may be attacked.
        if board.castling_rights & queenside_right != 0
            && board.square[home - 1].is_empty()
            && board.square[home - 2].is_empty()
            && board.square[home - 3].is_empty()
            && !attacked(home - 1)
            && !attacked(home - 2)
        {
            moves.push(Move::with_flag(
                from,
                Square::from_index((home - 2) as u8),
                MoveFlag::Castle,
            ));
        }
    }
}
