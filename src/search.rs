//! Fixed-depth alpha-beta move search.
//!
//! Plain adversarial minimax with alpha-beta pruning over disposable board
//! clones: every explored branch owns an independent copy of the position
//! and is discarded once scored. No move ordering, transposition table,
//! iterative deepening or quiescence. Pruning only skips branches that
//! cannot change the result, so the returned score always equals the
//! full-width minimax value.

use log::debug;
use rand::Rng;

use crate::board::{Board, Color, Move, Piece};

/// Score bound no real evaluation can reach.
pub const INFINITY: i32 = 1_000_000;

/// Score of a checkmated side, from the engine's perspective.
const MATE_SCORE: i32 = Piece::King.value();

/// Result of a search: the minimax score of the root position and the move
/// that achieves it.
#[derive(Debug, Clone, Copy)]
pub struct SearchOutcome {
    /// Score from the engine's perspective.
    pub score: i32,
    /// The best root move, or `None` when the side to move has no legal moves
    /// (or `depth` was 0).
    pub best_move: Option<Move>,
}

/// Search `depth` plies ahead and pick a move for `engine_color`.
///
/// Returns `None` when the side to move has no legal moves.
pub fn choose_move(board: &Board, engine_color: Color, depth: u32) -> Option<Move> {
    let outcome = search(board, engine_color, depth);
    debug!(
        "search for {} at depth {}: best {:?}, score {}",
        engine_color, depth, outcome.best_move, outcome.score
    );
    outcome.best_move
}

/// Run the full search and return both the score and the chosen move.
pub fn search(board: &Board, engine_color: Color, depth: u32) -> SearchOutcome {
    let mut root = board.clone();
    let (score, best_move) = alpha_beta(&mut root, depth, -INFINITY, INFINITY, engine_color);
    SearchOutcome { score, best_move }
}

fn alpha_beta(
    board: &mut Board,
    depth: u32,
    mut alpha: i32,
    mut beta: i32,
    engine_color: Color,
) -> (i32, Option<Move>) {
    if depth == 0 {
        return (evaluate(board, engine_color), None);
    }

    let moves = board.legal_moves();
    if moves.is_empty() {
        return (evaluate(board, engine_color), None);
    }

    // Full adversarial search: whether a node maximizes depends only on
    // whose turn it is, never on depth parity.
    let maximizing = board.side_to_move() == engine_color;
    let mut best_move = None;

    if maximizing {
        let mut best_score = -INFINITY;
        for m in moves.iter() {
            let mut child = board.clone();
            child.apply_move(m.from, m.to);
            let (score, _) = alpha_beta(&mut child, depth - 1, alpha, beta, engine_color);
            // Strict improvement keeps the first move at a tied score, so
            // ties break deterministically by generation order.
            if score > best_score {
                best_score = score;
                best_move = Some(*m);
            }
            alpha = alpha.max(best_score);
            if beta <= alpha {
                break;
            }
        }
        (best_score, best_move)
    } else {
        let mut best_score = INFINITY;
        for m in moves.iter() {
            let mut child = board.clone();
            child.apply_move(m.from, m.to);
            let (score, _) = alpha_beta(&mut child, depth - 1, alpha, beta, engine_color);
            if score < best_score {
                best_score = score;
                best_move = Some(*m);
            }
            beta = beta.min(best_score);
            if beta <= alpha {
                break;
            }
        }
        (best_score, best_move)
    }
}

/// Static evaluation from `engine_color`'s perspective.
///
/// A side to move with no legal moves is terminal: checkmate counts a full
/// king (negative when the mated side is the engine's own), stalemate is 0.
/// Otherwise the score is the plain material balance.
pub fn evaluate(board: &mut Board, engine_color: Color) -> i32 {
    let side = board.side_to_move();
    if !board.has_any_legal_moves(side) {
        if board.is_in_check(side) {
            return if side == engine_color {
                -MATE_SCORE
            } else {
                MATE_SCORE
            };
        }
        return 0;
    }

    let material = board.material_balance();
    if engine_color == Color::White {
        material
    } else {
        -material
    }
}

/// Pick a uniformly random legal move for `color`.
///
/// Returns `None` when it is not `color`'s turn or no legal move exists.
pub fn choose_random_move<R: Rng>(board: &Board, color: Color, rng: &mut R) -> Option<Move> {
    if board.side_to_move() != color {
        return None;
    }
    let mut scratch = board.clone();
    let moves = scratch.legal_moves();
    if moves.is_empty() {
        return None;
    }
    Some(moves.as_slice()[rng.gen_range(0..moves.len())])
}

/// Scan for a move that checkmates the opponent immediately.
///
/// Returns the first mating move in generation order, or `None`.
pub fn find_mate_in_one(board: &Board, color: Color) -> Option<Move> {
    if board.side_to_move() != color {
        return None;
    }
    let mut scratch = board.clone();
    let moves = scratch.legal_moves();
    let opponent = color.opponent();
    for m in moves.iter() {
        let mut child = scratch.clone();
        child.apply_move(m.from, m.to);
        if child.is_in_check(opponent) && !child.has_any_legal_moves(opponent) {
            return Some(*m);
        }
    }
    None
}
