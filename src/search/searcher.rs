use std::time::{Duration, Instant};

use arrayvec::ArrayVec;
use tracing::debug;

use crate::board::Board;
use crate::moves::movegen::MoveGenerator;
use crate::moves::types::Move;
use crate::piece::PieceKind;
use crate::search::context::SearchContext;
use crate::search::eval;
use crate::search::ordering;
use crate::search::repetition::RepetitionTable;
use crate::search::tt::{NodeType, TranspositionTable};
use crate::search::{
    IMMEDIATE_MATE_SCORE, NEGATIVE_INFINITY, POSITIVE_INFINITY, is_mate_score, ply_to_mate,
};

const MAX_SEARCH_DEPTH: u32 = 256;
const MAX_EXTENSIONS: u32 = 16;
const DEFAULT_TT_SIZE_MB: usize = 64;

/// Monotonic search clock. Wall-clock adjustments cannot shrink or grow
/// the budget.
pub struct TimeManager {
    start: Instant,
    budget: Duration,
}

impl TimeManager {
    pub fn new(budget_ms: u64) -> Self {
        TimeManager {
            start: Instant::now(),
            budget: Duration::from_millis(budget_ms),
        }
    }

    #[inline(always)]
    pub fn expired(&self) -> bool {
        self.start.elapsed() >= self.budget
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

/// Outcome of one `start_search` call.
#[derive(Debug, Clone, Copy)]
pub struct SearchReport {
    pub best_move: Option<Move>,
    pub evaluation: i32,
    pub nodes: u64,
    /// Deepest fully completed iteration.
    pub depth: u32,
}

/// Iterative-deepening negamax alpha-beta searcher with transposition
/// table, killer/history ordering, late move reductions, check and
/// passed-pawn extensions, quiescence and draw detection.
///
/// Owns all mutable search state; single-threaded by design.
pub struct Searcher {
    move_generator: MoveGenerator,
    tt: TranspositionTable,
    ctx: SearchContext,
    repetition: RepetitionTable,
    timer: TimeManager,
    cancelled: bool,

    best_move: Option<Move>,
    best_eval: i32,
    best_move_this_iteration: Option<Move>,
    best_eval_this_iteration: i32,
    has_searched_one_move: bool,
    completed_depth: u32,

    nodes: u64,
    cutoffs: u64,
}

impl Default for Searcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Searcher {
    pub fn new() -> Self {
        Searcher::with_tt_size(DEFAULT_TT_SIZE_MB)
    }

    pub fn with_tt_size(size_mb: usize) -> Self {
        Searcher {
            move_generator: MoveGenerator::new(),
            tt: TranspositionTable::new(size_mb),
            ctx: SearchContext::new(),
            repetition: RepetitionTable::new(),
            timer: TimeManager::new(0),
            cancelled: false,
            best_move: None,
            best_eval: 0,
            best_move_this_iteration: None,
            best_eval_this_iteration: 0,
            has_searched_one_move: false,
            completed_depth: 0,
            nodes: 0,
            cutoffs: 0,
        }
    }

    /// Drop knowledge tied to the previous game.
    pub fn clear_for_new_position(&mut self) {
        self.tt.clear();
        self.ctx.clear();
    }

    /// Search the position for up to `time_ms` milliseconds and return the
    /// best move found, its evaluation and the node count. Falls back to
    /// the first legal move under extreme time pressure.
    pub fn start_search(&mut self, board: &mut Board, time_ms: u64) -> SearchReport {
        self.best_eval = 0;
        self.best_move = None;
        self.best_eval_this_iteration = 0;
        self.best_move_this_iteration = None;
        self.has_searched_one_move = false;
        self.cancelled = false;
        self.completed_depth = 0;
        self.nodes = 0;
        self.cutoffs = 0;
        self.timer = TimeManager::new(time_ms);

        self.repetition.init(&board.repetition_history);

        self.run_iterative_deepening(board);

        if self.best_move.is_none() {
            // Never leave the caller without a move if one exists.
            let mut moves: ArrayVec<Move, 256> = ArrayVec::new();
            self.move_generator.generate_moves(board, &mut moves, false);
            self.best_move = moves.first().copied();
        }

        SearchReport {
            best_move: self.best_move,
            evaluation: self.best_eval,
            nodes: self.nodes,
            depth: self.completed_depth,
        }
    }

    fn run_iterative_deepening(&mut self, board: &mut Board) {
        for depth in 1..=MAX_SEARCH_DEPTH {
            self.has_searched_one_move = false;

            if self.should_stop() {
                break;
            }

            self.search(
                board,
                depth,
                0,
                NEGATIVE_INFINITY,
                POSITIVE_INFINITY,
                0,
                None,
                false,
            );

            if self.cancelled {
                // A partially searched iteration is still usable once a
                // full root move has been evaluated.
                if self.has_searched_one_move {
                    self.best_move = self.best_move_this_iteration;
                    self.best_eval = self.best_eval_this_iteration;
                }
                break;
            }

            self.completed_depth = depth;
            self.best_move = self.best_move_this_iteration;
            self.best_eval = self.best_eval_this_iteration;

            debug!(
                depth,
                eval = self.best_eval,
                nodes = self.nodes,
                cutoffs = self.cutoffs,
                elapsed_ms = self.timer.elapsed().as_millis() as u64,
                best = %self.best_move.unwrap_or(Move::NULL),
                "iteration complete"
            );

            self.best_eval_this_iteration = NEGATIVE_INFINITY;
            self.best_move_this_iteration = None;

            // A forced mate within the horizon cannot improve.
            if is_mate_score(self.best_eval) && ply_to_mate(self.best_eval) <= depth as i32 {
                break;
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn search(
        &mut self,
        board: &mut Board,
        ply_remaining: u32,
        ply_from_root: i32,
        mut alpha: i32,
        mut beta: i32,
        num_extensions: u32,
        prev_move: Option<Move>,
        prev_was_capture: bool,
    ) -> i32 {
        if self.should_stop() {
            self.cancelled = true;
            return 0;
        }

        if ply_from_root > 0 {
            if board.fifty_move_counter >= 100 {
                return 0;
            }
            if self.repetition.contains(board.zobrist()) {
                return 0;
            }

            // Mate-distance pruning: no line from here can beat a mate
            // already found closer to the root.
            alpha = alpha.max(-IMMEDIATE_MATE_SCORE + ply_from_root);
            beta = beta.min(IMMEDIATE_MATE_SCORE - ply_from_root);
            if alpha >= beta {
                return alpha;
            }
        }

        let key = board.zobrist();

        if let Some(tt_value) = self.tt.lookup(key, ply_remaining, ply_from_root, alpha, beta) {
            if ply_from_root == 0
                && let Some(stored) = self.tt.probe_move(key)
            {
                self.best_move_this_iteration = Some(stored);
                self.best_eval_this_iteration = tt_value;
            }
            return tt_value;
        }

        if ply_remaining == 0 {
            return self.quiescence(board, alpha, beta);
        }

        let mut moves: ArrayVec<Move, 256> = ArrayVec::new();
        self.move_generator.generate_moves(board, &mut moves, false);
        let hash_move = self.tt.probe_move(key);
        ordering::order_moves(&mut moves, board, &self.ctx, hash_move, ply_from_root as usize);

        if moves.is_empty() {
            if self.move_generator.is_in_check(board) {
                // Closer mates score higher.
                return -(IMMEDIATE_MATE_SCORE - ply_from_root);
            }
            return 0;
        }

        let mut pushed = false;
        if ply_from_root > 0
            && let Some(prev) = prev_move
        {
            let prev_was_pawn = board.piece_at(prev.target()).kind() == PieceKind::Pawn;
            self.repetition.push(key, prev_was_capture || prev_was_pawn);
            pushed = true;
        }

        let mut bound = NodeType::UpperBound;
        let mut best_move_in_position: Option<Move> = None;

        for (i, &mv) in moves.iter().enumerate() {
            let is_capture = !board.piece_at(mv.target()).is_empty();
            board.make_move(mv, true);

            // Extend checks always; extend pawns reaching the second or
            // seventh rank (about to promote).
            let mut extension = 0u32;
            if num_extensions < MAX_EXTENSIONS {
                if self.move_generator.is_in_check(board) {
                    extension = 1;
                } else if board.piece_at(mv.target()).kind() == PieceKind::Pawn {
                    let target_rank = mv.target().rank();
                    if target_rank == 1 || target_rank == 6 {
                        extension = 1;
                    }
                }
            }

            let mut needs_full_search = true;
            let mut value = 0;

            // Late move reduction: probe late quiet moves with a reduced
            // zero-window search, re-search only on an alpha raise.
            if extension == 0 && ply_remaining >= 3 && i >= 3 && !is_capture {
                value = -self.search(
                    board,
                    ply_remaining - 2,
                    ply_from_root + 1,
                    -alpha - 1,
                    -alpha,
                    num_extensions,
                    Some(mv),
                    is_capture,
                );
                needs_full_search = value > alpha;
            }

            if needs_full_search {
                value = -self.search(
                    board,
                    ply_remaining - 1 + extension,
                    ply_from_root + 1,
                    -beta,
                    -alpha,
                    num_extensions + extension,
                    Some(mv),
                    is_capture,
                );
            }

            board.unmake_move(mv, true);

            if self.cancelled {
                if pushed {
                    self.repetition.pop();
                }
                return 0;
            }

            if value >= beta {
                self.tt
                    .store(key, ply_remaining, ply_from_root, beta, NodeType::LowerBound, Some(mv));

                if !is_capture {
                    self.ctx.add_killer(ply_from_root as usize, mv);
                    self.ctx.update_history(board.side_to_move, mv, ply_remaining);
                }

                if pushed {
                    self.repetition.pop();
                }
                self.cutoffs += 1;
                return beta;
            }

            if value > alpha {
                bound = NodeType::Exact;
                best_move_in_position = Some(mv);
                alpha = value;

                if ply_from_root == 0 {
                    self.best_move_this_iteration = Some(mv);
                    self.best_eval_this_iteration = value;
                    self.has_searched_one_move = true;
                }
            }
        }

        if pushed {
            self.repetition.pop();
        }

        self.tt
            .store(key, ply_remaining, ply_from_root, alpha, bound, best_move_in_position);

        alpha
    }

    /// Search captures until the position is quiet, with the static
    /// evaluation as a stand-pat lower bound.
    fn quiescence(&mut self, board: &mut Board, mut alpha: i32, beta: i32) -> i32 {
        if self.should_stop() {
            self.cancelled = true;
            return 0;
        }

        let stand_pat = eval::evaluate(board);
        self.nodes += 1;

        if stand_pat >= beta {
            self.cutoffs += 1;
            return beta;
        }
        if stand_pat > alpha {
            alpha = stand_pat;
        }

        let mut captures: ArrayVec<Move, 256> = ArrayVec::new();
        self.move_generator.generate_moves(board, &mut captures, true);
        captures.sort_by_cached_key(|&mv| -ordering::mvv_lva_score(board, mv));

        for &mv in captures.iter() {
            board.make_move(mv, true);
            let value = -self.quiescence(board, -beta, -alpha);
            board.unmake_move(mv, true);

            if self.cancelled {
                return 0;
            }

            if value >= beta {
                self.cutoffs += 1;
                return beta;
            }
            if value > alpha {
                alpha = value;
            }
        }

        alpha
    }

    #[inline(always)]
    fn should_stop(&self) -> bool {
        self.cancelled || self.timer.expired()
    }
}
