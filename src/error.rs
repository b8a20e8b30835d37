use thiserror::Error;

/// Errors surfaced at the engine façade. Internal search code never
/// unwinds through these; it uses option sentinels and a cancel flag.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid FEN: {0}")]
    InvalidFen(#[from] FenError),
    #[error("illegal move: {0}")]
    IllegalMove(String),
    #[error("no legal moves in this position")]
    NoLegalMoves,
    #[error("opening book unavailable: {0}")]
    BookLoad(#[from] BookError),
}

#[derive(Debug, Error)]
pub enum FenError {
    #[error("expected at least 4 fields, found {0}")]
    MissingFields(usize),
    #[error("bad piece placement: {0}")]
    BadPlacement(String),
    #[error("missing {0} king")]
    MissingKing(&'static str),
    #[error("bad side to move: {0:?}")]
    BadSideToMove(String),
    #[error("bad castling field: {0:?}")]
    BadCastling(String),
    #[error("bad en passant field: {0:?}")]
    BadEnPassant(String),
    #[error("bad move counter: {0:?}")]
    BadCounter(String),
}

#[derive(Debug, Error)]
pub enum BookError {
    #[error("could not read book file: {0}")]
    Io(#[from] std::io::Error),
}
