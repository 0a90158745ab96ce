pub mod board;
pub mod castle;
#[cfg(feature = "cli")]
pub mod logger;
pub mod r#move;
pub mod movegen;
pub mod notation;
pub mod piece;
pub mod square;
pub mod tt;
pub mod zobrist;

pub use board::{Board, BoardError, Side};
pub use castle::{CASTLE_BK, CASTLE_BQ, CASTLE_WK, CASTLE_WQ, CastleFlags};
pub use notation::ParseMoveError;
pub use piece::{Color, Piece};
pub use r#move::{Move, MoveList, MoveSink, Promotion};
pub use square::Square;
pub use tt::TranspositionTable;
pub use zobrist::hash64;

/// Cooperative-cancellation contract for a search driver built on top of
/// this crate: polled between iterations, returning `true` requests an
/// abort at the next convenient point. Nothing in this crate calls it —
/// it exists only so a caller's polling closure and this crate's types
/// agree on a shape.
pub trait SearchInfo {
    fn should_abort(&self) -> bool;
}
