/// Deepest stack the table stores; pushes beyond it are counted but
/// dropped, and lookups only see the stored window.
const MAX_ENTRIES: usize = 256;

/// Stack of position keys walked during search, with a per-level start
/// index so repetition checks never cross an irreversible move.
pub struct RepetitionTable {
    hashes: [u64; MAX_ENTRIES],
    start_indices: [usize; MAX_ENTRIES + 1],
    count: usize,
}

impl Default for RepetitionTable {
    fn default() -> Self {
        Self::new()
    }
}

impl RepetitionTable {
    pub fn new() -> Self {
        RepetitionTable {
            hashes: [0; MAX_ENTRIES],
            start_indices: [0; MAX_ENTRIES + 1],
            count: 0,
        }
    }

    /// Reset from the game's position history, oldest first. The history
    /// is treated as one reversible run; `Board` already truncates it on
    /// irreversible moves.
    pub fn init(&mut self, position_history: &[u64]) {
        self.count = position_history.len().min(MAX_ENTRIES);
        self.hashes[..self.count].copy_from_slice(&position_history[..self.count]);
        self.start_indices[..=self.count].fill(0);
    }

    /// Push the key of a newly reached position. `reset` marks the move
    /// that produced it as irreversible (pawn move or capture), fencing
    /// off everything earlier.
    pub fn push(&mut self, key: u64, reset: bool) {
        if self.count < MAX_ENTRIES {
            self.hashes[self.count] = key;
            self.start_indices[self.count + 1] = if reset {
                self.count
            } else {
                self.start_indices[self.count]
            };
        }
        self.count += 1;
    }

    pub fn pop(&mut self) {
        if self.count > 0 {
            self.count -= 1;
        }
    }

    /// Has `key` occurred before the current position, on this side of
    /// the last irreversible move? The topmost entry (the current
    /// position itself) is never compared.
    pub fn contains(&self, key: u64) -> bool {
        let top = self.count.min(MAX_ENTRIES);
        let start = self.start_indices[top];
        let end = self.count.saturating_sub(1).min(MAX_ENTRIES);
        self.hashes[start..end].contains(&key)
    }
}
