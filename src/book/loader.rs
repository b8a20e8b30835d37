//! Line-oriented book format:
//!
//! ```text
//! pos <simplified-fen>
//! <uci> <count>
//! <uci> <count>
//! ```
//!
//! Blank lines are allowed anywhere; malformed entry lines are skipped
//! silently so a damaged book degrades instead of failing.

use std::collections::HashMap;

pub(super) type BookPositions = HashMap<String, Vec<(String, u32)>>;

pub(super) fn parse_book(text: &str) -> BookPositions {
    let mut positions: BookPositions = HashMap::new();
    let mut current: Option<String> = None;

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(fen) = line.strip_prefix("pos ") {
            let fen = fen.trim().to_string();
            positions.entry(fen.clone()).or_default();
            current = Some(fen);
            continue;
        }

        let Some(fen) = &current else {
            continue;
        };

        let mut parts = line.split_whitespace();
        let (Some(uci), Some(count_str), None) = (parts.next(), parts.next(), parts.next()) else {
            continue;
        };
        let Ok(count) = count_str.parse::<u32>() else {
            continue;
        };

        if let Some(entries) = positions.get_mut(fen) {
            entries.push((uci.to_string(), count));
        }
    }

    positions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_positions_and_entries() {
        let text = "\
pos rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -
e2e4 100
d2d4 80

pos rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3
e7e5 90
";
        let book = parse_book(text);
        assert_eq!(book.len(), 2);
        let start = &book["rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -"];
        assert_eq!(start.len(), 2);
        assert_eq!(start[0], ("e2e4".to_string(), 100));
    }

    #[test]
    fn skips_malformed_lines() {
        let text = "\
junk before any header
pos 8/8/8/8/8/8/8/8 w - -
e2e4 not-a-number
e2e4
e2e4 50 extra
d2d4 10
";
        let book = parse_book(text);
        let entries = &book["8/8/8/8/8/8/8/8 w - -"];
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0], ("d2d4".to_string(), 10));
    }
}
