use tracing::{debug, instrument};

use crate::board::Board;
use crate::moves::movegen::MoveGenerator;
use crate::moves::types::Move;

const MAX_PERFT_DEPTH: usize = 16;

fn create_move_buffers() -> [Vec<Move>; MAX_PERFT_DEPTH] {
    std::array::from_fn(|_| Vec::with_capacity(64))
}

fn perft_recursive(
    board: &mut Board,
    generator: &MoveGenerator,
    depth: u32,
    ply: usize,
    buffers: &mut [Vec<Move>],
) -> u64 {
    if depth == 0 {
        return 1;
    }

    {
        let moves = &mut buffers[ply];
        generator.generate_moves(board, moves, false);
    }

    if depth == 1 {
        return buffers[ply].len() as u64;
    }

    let move_count = buffers[ply].len();
    let mut nodes = 0;

    for i in 0..move_count {
        let mv = buffers[ply][i];
        board.make_move(mv, true);
        nodes += perft_recursive(board, generator, depth - 1, ply + 1, buffers);
        board.unmake_move(mv, true);
    }

    nodes
}

/// Leaf-node count after enumerating every legal move to `depth`.
#[instrument(skip(board, generator), fields(depth))]
pub fn perft(board: &mut Board, generator: &MoveGenerator, depth: u32) -> u64 {
    assert!(
        depth as usize <= MAX_PERFT_DEPTH,
        "depth {} exceeds MAX_PERFT_DEPTH {}",
        depth,
        MAX_PERFT_DEPTH
    );

    let mut buffers = create_move_buffers();
    perft_recursive(board, generator, depth, 0, &mut buffers)
}

/// Per-root-move node counts, returned for the caller to print or check.
#[instrument(skip(board, generator), fields(depth))]
pub fn perft_divide(
    board: &mut Board,
    generator: &MoveGenerator,
    depth: u32,
) -> Vec<(Move, u64)> {
    assert!(
        depth >= 1 && depth as usize <= MAX_PERFT_DEPTH,
        "bad perft depth {}",
        depth
    );

    let mut buffers = create_move_buffers();
    {
        let moves = &mut buffers[0];
        generator.generate_moves(board, moves, false);
        debug!(depth, moves = moves.len(), "divide: root legal moves");
    }

    let move_count = buffers[0].len();
    let mut out = Vec::with_capacity(move_count);

    for i in 0..move_count {
        let mv = buffers[0][i];
        board.make_move(mv, true);
        let nodes = perft_recursive(board, generator, depth - 1, 1, &mut buffers);
        board.unmake_move(mv, true);

        debug!(%mv, nodes, "divide: root child total");
        out.push((mv, nodes));
    }

    let total: u64 = out.iter().map(|(_, n)| n).sum();
    debug!(depth, total, "divide: total");
    out
}
