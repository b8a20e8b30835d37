use std::io::{self, BufRead};

use indicatif::{ProgressBar, ProgressStyle};

use outpost::board::Board;
use outpost::book::OpeningBook;
use outpost::engine::Engine;
use outpost::logger::init_logging;
use outpost::moves::movegen::MoveGenerator;
use outpost::moves::perft::perft;
use outpost::moves::types::Move;

fn main() {
    init_logging("logs/outpost.log", "outpost=debug");

    let mut engine = Engine::with_book(OpeningBook::default());
    let generator = MoveGenerator::new();

    println!("outpost {} (type 'help' for commands)", env!("CARGO_PKG_VERSION"));

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l.trim().to_string(),
            Err(_) => break,
        };
        if line.is_empty() {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        match parts[0] {
            "help" => print_help(),
            "startpos" => {
                engine = Engine::with_book(OpeningBook::default());
                println!("{}", engine.current_fen());
            }
            "fen" => {
                let fen = parts[1..].join(" ");
                match engine.set_position(&fen) {
                    Ok(()) => println!("{}", engine.current_fen()),
                    Err(err) => println!("error: {}", err),
                }
            }
            "move" => {
                if parts.len() < 2 {
                    println!("usage: move <uci>");
                    continue;
                }
                match engine.play_move(parts[1]) {
                    Ok(()) => println!("{}", engine.current_fen()),
                    Err(err) => println!("error: {}", err),
                }
            }
            "moves" => {
                println!("{}", engine.legal_moves().join(" "));
            }
            "go" => {
                let time_ms = parts
                    .get(1)
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(1000u64);
                match engine.search(time_ms) {
                    Ok(outcome) => println!(
                        "bestmove {} eval {} nodes {}",
                        outcome.move_uci, outcome.evaluation, outcome.nodes
                    ),
                    Err(err) => println!("error: {}", err),
                }
            }
            "perft" => {
                let depth = parts
                    .get(1)
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(4u32);
                run_perft(&engine.current_fen(), &generator, depth);
            }
            "d" | "display" => {
                print_board(engine.board());
            }
            "status" => {
                println!("{:?}", engine.status());
            }
            "book" => {
                if parts.len() < 2 {
                    println!("usage: book <path>");
                    continue;
                }
                match OpeningBook::from_file(parts[1]) {
                    Ok(book) => {
                        println!("loaded book with {} positions", book.len());
                        let fen = engine.current_fen();
                        engine = Engine::with_book(book);
                        let _ = engine.set_position(&fen);
                    }
                    Err(err) => println!("book disabled: {}", err),
                }
            }
            "quit" | "exit" => break,
            other => println!("unknown command: {}", other),
        }
    }
}

fn print_help() {
    println!("commands:");
    println!("  startpos            reset to the starting position");
    println!("  fen <fen>           set position from FEN");
    println!("  move <uci>          play a move (e2e4, e7e8q, e1g1)");
    println!("  moves               list legal moves");
    println!("  go [ms]             search (default 1000 ms)");
    println!("  perft [depth]       node count per root move");
    println!("  d                   display the board");
    println!("  status              game status");
    println!("  book <path>         load an opening book file");
    println!("  quit                exit");
}

fn run_perft(fen: &str, generator: &MoveGenerator, depth: u32) {
    let mut board = match Board::from_fen(fen) {
        Ok(board) => board,
        Err(err) => {
            println!("error: {}", err);
            return;
        }
    };

    let mut roots: Vec<Move> = Vec::new();
    generator.generate_moves(&mut board, &mut roots, false);

    let bar = ProgressBar::new(roots.len() as u64);
    if let Ok(style) = ProgressStyle::with_template("{bar:30} {pos}/{len} {msg}") {
        bar.set_style(style);
    }

    let start = std::time::Instant::now();
    let mut total = 0u64;

    for mv in roots {
        bar.set_message(mv.to_uci());
        board.make_move(mv, true);
        let nodes = if depth > 1 {
            perft(&mut board, generator, depth - 1)
        } else {
            1
        };
        board.unmake_move(mv, true);

        bar.println(format!("{}: {}", mv, nodes));
        bar.inc(1);
        total += nodes;
    }

    bar.finish_and_clear();
    let secs = start.elapsed().as_secs_f64().max(1e-9);
    println!(
        "total {} nodes in {:.3}s ({:.0} nps)",
        total,
        secs,
        total as f64 / secs
    );
}

fn print_board(board: &Board) {
    for rank in (0..8u8).rev() {
        print!("{} ", rank + 1);
        for file in 0..8u8 {
            let piece = board.square[(rank * 8 + file) as usize];
            if piece.is_empty() {
                print!(". ");
            } else {
                print!("{} ", piece.symbol());
            }
        }
        println!();
    }
    println!("  a b c d e f g h");
    println!("{}", board.to_fen());
}
