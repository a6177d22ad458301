//! Chess rules engine with a fixed-depth alpha-beta bot.
//!
//! The [`board`] module owns position representation, move generation and
//! terminal detection; the [`search`] module drives the adversarial search
//! over disposable board clones.

pub mod board;
pub mod search;
mod zobrist;

pub use board::{Board, Color, Move, MoveList, Piece, Square};
pub use search::{choose_move, choose_random_move, find_mate_in_one, search, SearchOutcome};
