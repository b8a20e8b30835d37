mod loader;

use std::path::Path;

use rand::Rng;
use tracing::debug;

use crate::board::Board;
use crate::error::BookError;

use loader::BookPositions;

/// Plies from the game start during which the book is consulted.
pub const DEFAULT_MAX_BOOK_PLY: u32 = 16;

/// Weighted opening book keyed by simplified FEN (placement, side,
/// castling and en-passant fields only; the move clocks are dropped so
/// transpositions with different clocks still hit).
pub struct OpeningBook {
    positions: BookPositions,
    /// Sampling exponent in [0, 1]: 0 plays uniformly at random, 1 plays
    /// proportionally to the recorded counts.
    weight_pow: f64,
    max_ply: u32,
}

/// A handful of mainline openings, in the book text format.
const DEFAULT_BOOK: &str = "\
pos rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -
e2e4 100
d2d4 80
c2c4 50
g1f3 60

pos rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3
e7e5 100
c7c5 80
e7e6 60
c7c6 50
d7d6 40
g8f6 50

pos rnbqkbnr/pppp1ppp/8/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R b KQkq -
b8c6 100
g8f6 80
d7d6 40

pos rnbqkbnr/pppppppp/8/8/3P4/8/PPP1PPPP/RNBQKBNR b KQkq d3
d7d5 100
g8f6 90
e7e6 60
c7c5 50

pos rnbqkbnr/ppp1pppp/8/3p4/2PP4/8/PP2PPPP/RNBQKBNR b KQkq c3
e7e6 100
c7c6 80
d5c4 60
g8f6 70

pos rnbqkbnr/pp1ppppp/8/2p5/4P3/5N2/PPPP1PPP/RNBQKB1R b KQkq -
d7d6 100
b8c6 90
e7e6 80
g7g6 50
";

impl Default for OpeningBook {
    /// The built-in starter book.
    fn default() -> Self {
        OpeningBook::from_text(DEFAULT_BOOK)
    }
}

impl OpeningBook {
    pub fn from_text(text: &str) -> Self {
        OpeningBook {
            positions: loader::parse_book(text),
            weight_pow: 0.5,
            max_ply: DEFAULT_MAX_BOOK_PLY,
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, BookError> {
        let text = std::fs::read_to_string(path)?;
        Ok(OpeningBook::from_text(&text))
    }

    /// 0 = uniform, 1 = proportional to play counts.
    pub fn set_weight_pow(&mut self, weight_pow: f64) {
        self.weight_pow = weight_pow.clamp(0.0, 1.0);
    }

    pub fn set_max_ply(&mut self, max_ply: u32) {
        self.max_ply = max_ply;
    }

    #[inline]
    pub fn max_ply(&self) -> u32 {
        self.max_ply
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn has_position(&self, board: &Board) -> bool {
        self.positions.contains_key(&simplify_fen(&board.to_fen()))
    }

    /// Weighted random book move for the position, as a UCI string.
    pub fn try_get_move(&self, board: &Board) -> Option<&str> {
        let key = simplify_fen(&board.to_fen());
        let entries = self.positions.get(&key)?;
        if entries.is_empty() {
            return None;
        }

        let weights: Vec<f64> = entries
            .iter()
            .map(|(_, count)| (*count as f64).powf(self.weight_pow))
            .collect();
        let total: f64 = weights.iter().sum();

        if total <= 0.0 {
            return Some(entries[0].0.as_str());
        }

        let mut pick = rand::rng().random_range(0.0..total);
        for ((uci, _), weight) in entries.iter().zip(weights.iter()) {
            if pick < *weight {
                debug!(%key, %uci, "book hit");
                return Some(uci.as_str());
            }
            pick -= weight;
        }

        // Floating-point slack: the draw landed on the tail.
        entries.last().map(|(uci, _)| uci.as_str())
    }
}

/// First four FEN fields, space-joined.
fn simplify_fen(fen: &str) -> String {
    fen.split_whitespace()
        .take(4)
        .collect::<Vec<_>>()
        .join(" ")
}
