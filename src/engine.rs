use arrayvec::ArrayVec;
use tracing::debug;

use crate::board::Board;
use crate::book::OpeningBook;
use crate::error::EngineError;
use crate::moves::movegen::MoveGenerator;
use crate::moves::types::Move;
use crate::search::searcher::Searcher;
use crate::status::{self, GameStatus};

/// Result of one `search` call.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub move_uci: String,
    pub evaluation: i32,
    pub nodes: u64,
}

/// Host-facing façade wiring the board, searcher and optional opening
/// book together. Callers must serialize access per instance; the engine
/// is single-threaded by design.
pub struct Engine {
    board: Board,
    searcher: Searcher,
    generator: MoveGenerator,
    book: Option<OpeningBook>,
    /// Optional upper clamp for `choose_think_time`, in milliseconds.
    pub max_think_time_ms: Option<u64>,
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new()
    }
}

impl Engine {
    pub fn new() -> Self {
        Engine {
            board: Board::new(),
            searcher: Searcher::new(),
            generator: MoveGenerator::new(),
            book: None,
            max_think_time_ms: None,
        }
    }

    pub fn with_book(book: OpeningBook) -> Self {
        let mut engine = Engine::new();
        engine.book = Some(book);
        engine
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Forget the previous game's search state (TT, killers, history).
    pub fn new_game(&mut self) {
        self.searcher.clear_for_new_position();
    }

    /// Replace the position. On error the current position is untouched.
    pub fn set_position(&mut self, fen: &str) -> Result<(), EngineError> {
        let board = Board::from_fen(fen)?;
        self.board = board;
        Ok(())
    }

    pub fn current_fen(&self) -> String {
        self.board.to_fen()
    }

    /// Play `uci` on the internal board. The move is resolved against the
    /// legal move set, which fills in castle / en-passant / double-push
    /// flags the bare notation cannot carry.
    pub fn play_move(&mut self, uci: &str) -> Result<(), EngineError> {
        let mv = self
            .resolve_uci(uci)
            .ok_or_else(|| EngineError::IllegalMove(uci.to_string()))?;
        self.board.make_move(mv, false);
        Ok(())
    }

    /// Legal moves of the current position in UCI notation.
    pub fn legal_moves(&mut self) -> Vec<String> {
        let mut moves: ArrayVec<Move, 256> = ArrayVec::new();
        self.generator.generate_moves(&mut self.board, &mut moves, false);
        moves.iter().map(|mv| mv.to_uci()).collect()
    }

    pub fn status(&mut self) -> GameStatus {
        status::position_status(&mut self.board, &self.generator)
    }

    /// Pick a move within `time_ms` milliseconds: an opening-book reply
    /// while still in book, otherwise a full search.
    pub fn search(&mut self, time_ms: u64) -> Result<SearchOutcome, EngineError> {
        let mut legal: ArrayVec<Move, 256> = ArrayVec::new();
        self.generator.generate_moves(&mut self.board, &mut legal, false);
        if legal.is_empty() {
            return Err(EngineError::NoLegalMoves);
        }

        if let Some(book) = &self.book
            && self.board.ply_count < book.max_ply()
            && let Some(book_uci) = book.try_get_move(&self.board)
        {
            // A stale book entry must not produce an illegal move; fall
            // through to search if it no longer matches.
            if let Some(mv) = Move::from_uci(book_uci)
                && legal
                    .iter()
                    .any(|legal_mv| moves_match(*legal_mv, mv))
            {
                debug!(uci = book_uci, "playing book move");
                return Ok(SearchOutcome {
                    move_uci: book_uci.to_string(),
                    evaluation: 0,
                    nodes: 0,
                });
            }
        }

        let report = self.searcher.start_search(&mut self.board, time_ms);
        let best = report.best_move.ok_or(EngineError::NoLegalMoves)?;

        debug!(
            best = %best,
            eval = report.evaluation,
            nodes = report.nodes,
            depth = report.depth,
            "search finished"
        );

        Ok(SearchOutcome {
            move_uci: best.to_uci(),
            evaluation: report.evaluation,
            nodes: report.nodes,
        })
    }

    /// Think-time budget from the game clock: a fortieth of the remaining
    /// time plus most of the increment, floored so the engine always
    /// thinks a little, optionally clamped from above.
    pub fn choose_think_time(&self, remaining_ms: u64, increment_ms: u64) -> u64 {
        let mut think = remaining_ms as f64 / 40.0;

        if let Some(cap) = self.max_think_time_ms {
            think = think.min(cap as f64);
        }

        if remaining_ms > increment_ms * 2 {
            think += increment_ms as f64 * 0.8;
        }

        let floor = (remaining_ms as f64 * 0.25).min(50.0);
        think.max(floor) as u64
    }

    fn resolve_uci(&mut self, uci: &str) -> Option<Move> {
        let wanted = Move::from_uci(uci)?;
        let mut legal: ArrayVec<Move, 256> = ArrayVec::new();
        self.generator.generate_moves(&mut self.board, &mut legal, false);
        legal.iter().copied().find(|&mv| moves_match(mv, wanted))
    }
}

/// Same squares and same promotion piece; generated flags win over the
/// bare parsed move.
fn moves_match(generated: Move, parsed: Move) -> bool {
    generated.start() == parsed.start()
        && generated.target() == parsed.target()
        && generated.promotion_kind() == parsed.promotion_kind()
}
