//! FEN parsing and serialization for the mailbox board.

use super::{Board, CASTLE_BK, CASTLE_BQ, CASTLE_WK, CASTLE_WQ};
use crate::error::FenError;
use crate::piece::{Color, Piece, PieceKind};
use crate::square::Square;

/// Parse `fen` into `board`'s raw fields. The caller finishes construction
/// (Zobrist, state stack); on error the board must be discarded.
pub(super) fn load_into(board: &mut Board, fen: &str) -> Result<(), FenError> {
    let parts: Vec<&str> = fen.split_whitespace().collect();
    if parts.len() < 4 {
        return Err(FenError::MissingFields(parts.len()));
    }

    parse_placement(board, parts[0])?;

    board.side_to_move = match parts[1] {
        "w" => Color::White,
        "b" => Color::Black,
        other => return Err(FenError::BadSideToMove(other.to_string())),
    };

    board.castling_rights = parse_castling(parts[2])?;
    board.en_passant_file = parse_en_passant(parts[3])?;

    // Missing trailing counters default to 0 and 1.
    board.fifty_move_counter = match parts.get(4) {
        Some(s) => s
            .parse()
            .map_err(|_| FenError::BadCounter(s.to_string()))?,
        None => 0,
    };
    board.move_count = match parts.get(5) {
        Some(s) => s
            .parse()
            .map_err(|_| FenError::BadCounter(s.to_string()))?,
        None => 1,
    };

    let full_moves = board.move_count.max(1);
    board.ply_count =
        (full_moves - 1) * 2 + if board.white_to_move() { 0 } else { 1 };

    Ok(())
}

fn parse_placement(board: &mut Board, placement: &str) -> Result<(), FenError> {
    let ranks: Vec<&str> = placement.split('/').collect();
    if ranks.len() != 8 {
        return Err(FenError::BadPlacement(format!(
            "expected 8 ranks, found {}",
            ranks.len()
        )));
    }

    let mut seen_kings = [0u32; 2];

    for (row, rank_str) in ranks.iter().enumerate() {
        let rank = 7 - row as u8;
        let mut file = 0u8;

        for c in rank_str.chars() {
            if let Some(skip) = c.to_digit(10) {
                file += skip as u8;
                continue;
            }
            let piece = Piece::from_symbol(c)
                .ok_or_else(|| FenError::BadPlacement(format!("bad glyph {:?}", c)))?;
            if file > 7 {
                return Err(FenError::BadPlacement(format!(
                    "rank {} overflows 8 files",
                    rank + 1
                )));
            }
            let sq = Square::from_file_rank(file, rank);
            board.square[sq.index() as usize] = piece;
            if piece.kind() == PieceKind::King {
                board.set_king_square(piece.color(), sq);
                seen_kings[piece.color() as usize] += 1;
            }
            file += 1;
        }

        if file != 8 {
            return Err(FenError::BadPlacement(format!(
                "rank {} covers {} files",
                rank + 1,
                file
            )));
        }
    }

    if seen_kings[Color::White as usize] != 1 {
        return Err(FenError::MissingKing("white"));
    }
    if seen_kings[Color::Black as usize] != 1 {
        return Err(FenError::MissingKing("black"));
    }
    Ok(())
}

fn parse_castling(field: &str) -> Result<u8, FenError> {
    if field == "-" {
        return Ok(0);
    }
    let mut rights = 0u8;
    for c in field.chars() {
        rights |= match c {
            'K' => CASTLE_WK,
            'Q' => CASTLE_WQ,
            'k' => CASTLE_BK,
            'q' => CASTLE_BQ,
            _ => return Err(FenError::BadCastling(field.to_string())),
        };
    }
    Ok(rights)
}

fn parse_en_passant(field: &str) -> Result<u8, FenError> {
    if field == "-" {
        return Ok(0);
    }
    let sq: Square = field
        .parse()
        .map_err(|_| FenError::BadEnPassant(field.to_string()))?;
    if sq.rank() != 2 && sq.rank() != 5 {
        return Err(FenError::BadEnPassant(field.to_string()));
    }
    Ok(sq.file() + 1)
}

pub(super) fn serialize(board: &Board) -> String {
    let mut fen = String::with_capacity(90);

    for rank in (0..8).rev() {
        let mut empty = 0;
        for file in 0..8 {
            let piece = board.square[(rank * 8 + file) as usize];
            if piece.is_empty() {
                empty += 1;
            } else {
                if empty > 0 {
                    fen.push(char::from_digit(empty, 10).unwrap_or('0'));
                    empty = 0;
                }
                fen.push(piece.symbol());
            }
        }
        if empty > 0 {
            fen.push(char::from_digit(empty, 10).unwrap_or('0'));
        }
        if rank > 0 {
            fen.push('/');
        }
    }

    fen.push(' ');
    fen.push(if board.white_to_move() { 'w' } else { 'b' });

    fen.push(' ');
    if board.castling_rights == 0 {
        fen.push('-');
    } else {
        // Canonical KQkq order regardless of the input's ordering.
        if board.castling_rights & CASTLE_WK != 0 {
            fen.push('K');
        }
        if board.castling_rights & CASTLE_WQ != 0 {
            fen.push('Q');
        }
        if board.castling_rights & CASTLE_BK != 0 {
            fen.push('k');
        }
        if board.castling_rights & CASTLE_BQ != 0 {
            fen.push('q');
        }
    }

    fen.push(' ');
    if board.en_passant_file > 0 {
        fen.push((b'a' + board.en_passant_file - 1) as char);
        // The EP target is behind the pawn that just double-pushed.
        fen.push(if board.white_to_move() { '6' } else { '3' });
    } else {
        fen.push('-');
    }

    fen.push_str(&format!(
        " {} {}",
        board.fifty_move_counter, board.move_count
    ));

    fen
}
