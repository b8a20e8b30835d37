use crate::moves::types::Move;
use crate::search::{IMMEDIATE_MATE_SCORE, MAX_MATE_DEPTH};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum NodeType {
    /// Searched every move with an open window.
    Exact = 0,
    /// Beta cutoff; the true value may be higher.
    LowerBound = 1,
    /// All moves failed low; the true value may be lower.
    UpperBound = 2,
}

#[derive(Clone, Copy, Debug)]
struct Entry {
    key: u64,
    value: i32,
    depth: u32,
    node_type: NodeType,
    best_move: Option<Move>,
}

const EMPTY_ENTRY: Entry = Entry {
    key: 0,
    value: 0,
    depth: 0,
    node_type: NodeType::Exact,
    best_move: None,
};

/// Fixed-size, always-replace transposition table indexed by
/// `key mod count`. Mate scores are stored relative to the probed node so
/// they survive being reached at a different distance from the root.
pub struct TranspositionTable {
    entries: Vec<Entry>,
}

impl TranspositionTable {
    pub fn new(size_mb: usize) -> Self {
        let entry_size = std::mem::size_of::<Entry>();
        let count = (size_mb * 1024 * 1024 / entry_size).max(1);
        TranspositionTable {
            entries: vec![EMPTY_ENTRY; count],
        }
    }

    pub fn clear(&mut self) {
        self.entries.fill(EMPTY_ENTRY);
    }

    #[inline(always)]
    fn index(&self, key: u64) -> usize {
        (key % self.entries.len() as u64) as usize
    }

    /// Stored move for ordering, regardless of entry depth or bound.
    pub fn probe_move(&self, key: u64) -> Option<Move> {
        let entry = &self.entries[self.index(key)];
        if entry.key == key { entry.best_move } else { None }
    }

    /// Usable evaluation for this node, or `None` when the entry is
    /// missing, too shallow, or its bound cannot settle `(alpha, beta)`.
    pub fn lookup(
        &self,
        key: u64,
        depth: u32,
        ply_from_root: i32,
        alpha: i32,
        beta: i32,
    ) -> Option<i32> {
        let entry = &self.entries[self.index(key)];
        if entry.key != key || entry.depth < depth {
            return None;
        }

        let score = retrieve_mate_score(entry.value, ply_from_root);
        match entry.node_type {
            NodeType::Exact => Some(score),
            NodeType::UpperBound if score <= alpha => Some(score),
            NodeType::LowerBound if score >= beta => Some(score),
            _ => None,
        }
    }

    pub fn store(
        &mut self,
        key: u64,
        depth: u32,
        ply_from_root: i32,
        value: i32,
        node_type: NodeType,
        best_move: Option<Move>,
    ) {
        let index = self.index(key);
        self.entries[index] = Entry {
            key,
            value: store_mate_score(value, ply_from_root),
            depth,
            node_type,
            best_move,
        };
    }
}

#[inline]
fn is_mate_score(score: i32) -> bool {
    score.abs() > IMMEDIATE_MATE_SCORE - MAX_MATE_DEPTH
}

/// Convert a root-relative mate score to a node-relative one for storage.
#[inline]
fn store_mate_score(score: i32, ply_from_root: i32) -> i32 {
    if is_mate_score(score) {
        score.signum() * (score.abs() + ply_from_root)
    } else {
        score
    }
}

/// Inverse of `store_mate_score` at retrieval time.
#[inline]
fn retrieve_mate_score(score: i32, ply_from_root: i32) -> i32 {
    if is_mate_score(score) {
        score.signum() * (score.abs() - ply_from_root)
    } else {
        score
    }
}
