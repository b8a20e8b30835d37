use once_cell::sync::OnceCell;
use rand::{RngCore, SeedableRng, rngs::StdRng};

use crate::board::Board;
use crate::piece::Color;

/// Fixed seed so every process hashes positions identically.
const ZOBRIST_SEED: u64 = 29_426_028;

pub struct ZobristKeys {
    /// [packed piece value][square]; rows 0, 7 and 8 are never indexed.
    pub pieces: [[u64; 64]; 15],
    /// One key per 4-bit castling-rights mask.
    pub castling: [u64; 16],
    /// [0] = no en-passant file and hashes to zero; [1..8] = files a..h.
    pub en_passant_file: [u64; 9],
    /// XORed in when Black is to move.
    pub side_to_move: u64,
}

/// Process-wide keys, generated once on first use.
pub fn zobrist_keys() -> &'static ZobristKeys {
    static KEYS: OnceCell<ZobristKeys> = OnceCell::new();
    KEYS.get_or_init(|| generate_keys(StdRng::seed_from_u64(ZOBRIST_SEED)))
}

fn generate_keys(mut rng: StdRng) -> ZobristKeys {
    let mut keys = ZobristKeys {
        pieces: [[0u64; 64]; 15],
        castling: [0u64; 16],
        en_passant_file: [0u64; 9],
        side_to_move: 0,
    };

    for row in keys.pieces.iter_mut() {
        for key in row.iter_mut() {
            *key = rng.next_u64();
        }
    }
    for key in keys.castling.iter_mut() {
        *key = rng.next_u64();
    }
    // en_passant_file[0] stays zero: "no file" must not perturb the hash.
    for key in keys.en_passant_file[1..].iter_mut() {
        *key = rng.next_u64();
    }
    keys.side_to_move = rng.next_u64();

    keys
}

/// Full recompute from the board state. Slow; the board maintains the same
/// value incrementally and this must agree with it at all times.
pub fn calculate(board: &Board) -> u64 {
    let keys = zobrist_keys();
    let mut key = 0u64;

    for square in 0..64 {
        let piece = board.square[square];
        if !piece.is_empty() {
            key ^= keys.pieces[piece.table_index()][square];
        }
    }

    key ^= keys.en_passant_file[board.en_passant_file as usize];

    if board.side_to_move == Color::Black {
        key ^= keys.side_to_move;
    }

    key ^= keys.castling[board.castling_rights as usize];

    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_deterministic() {
        let a = generate_keys(StdRng::seed_from_u64(ZOBRIST_SEED));
        let b = generate_keys(StdRng::seed_from_u64(ZOBRIST_SEED));
        assert_eq!(a.pieces[1][0], b.pieces[1][0]);
        assert_eq!(a.side_to_move, b.side_to_move);
        assert_eq!(a.castling, b.castling);
    }

    #[test]
    fn no_ep_file_hashes_to_zero() {
        assert_eq!(zobrist_keys().en_passant_file[0], 0);
    }
}
