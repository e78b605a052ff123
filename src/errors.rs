//! Crate-wide error type.
//!
//! Only parsing (FEN, square names, coordinate moves) and the worker channel
//! can fail. Rules operations such as move generation and apply/undo are
//! infallible by contract and return plain values.

use thiserror::Error;

pub type ChessResult<T> = Result<T, ChessError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChessError {
    /// A FEN string was structurally wrong; the payload names the field.
    #[error("invalid FEN: {0}")]
    InvalidFen(String),

    /// Square text outside `a1..h8`.
    #[error("invalid square: {0}")]
    InvalidSquare(String),

    /// Coordinate move text that is not of the form `e2e4` / `e7e8q`.
    #[error("invalid move text: {0}")]
    InvalidMoveText(String),

    /// Well-formed move text that matches no legal move in the position.
    #[error("illegal move: {0}")]
    IllegalMove(String),

    /// The operating system refused to start the search worker thread.
    #[error("failed to spawn search worker: {0}")]
    WorkerSpawn(String),

    /// The search worker thread is gone.
    #[error("search worker disconnected")]
    WorkerDisconnected,
}
