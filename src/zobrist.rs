//! Zobrist hashing for chess positions.
//!
//! Position keys cover piece placement, side to move, the six monotonic
//! moved flags, and the en-passant target square, so key equality matches
//! the repetition rule's notion of "same position".

use rand::prelude::*;

pub(crate) struct ZobristKeys {
    // piece_keys[piece_type][color][square_index]
    pub(crate) piece_keys: [[[u64; 64]; 2]; 6],
    pub(crate) black_to_move_key: u64,
    // moved_flag_keys[color][slot]: 0 = king, 1 = kingside rook, 2 = queenside rook
    pub(crate) moved_flag_keys: [[u64; 3]; 2],
    // Keyed by the full target square: a stale target left behind by castling
    // can differ from a fresh one only by row.
    pub(crate) en_passant_keys: [u64; 64],
}

impl ZobristKeys {
    fn new() -> Self {
        let mut rng = StdRng::seed_from_u64(1234567890_u64); // Use a fixed seed for reproducibility
        let mut piece_keys = [[[0; 64]; 2]; 6];
        let mut moved_flag_keys = [[0; 3]; 2];
        let mut en_passant_keys = [0; 64];

        for piece in &mut piece_keys {
            for color in piece.iter_mut() {
                for key in color.iter_mut() {
                    *key = rng.gen();
                }
            }
        }

        let black_to_move_key = rng.gen();

        for color in &mut moved_flag_keys {
            for key in color.iter_mut() {
                *key = rng.gen();
            }
        }

        for key in &mut en_passant_keys {
            *key = rng.gen();
        }

        ZobristKeys {
            piece_keys,
            black_to_move_key,
            moved_flag_keys,
            en_passant_keys,
        }
    }
}

// Initialize Zobrist keys lazily and globally
pub(crate) static ZOBRIST: std::sync::LazyLock<ZobristKeys> = std::sync::LazyLock::new(ZobristKeys::new);
