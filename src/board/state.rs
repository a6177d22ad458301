use std::fmt;

use crate::zobrist::ZOBRIST;

use super::{
    bit_for_square, king_moved_bit, rook_moved_bit, square_index, Bitboard, Color, Piece, Square,
};

/// The mutable game position.
///
/// One board is created per game and mutated destructively by
/// [`Board::apply_move`]; the search operates on disposable clones. The
/// legality filter saves and restores the fixed-size state through a
/// compact snapshot instead of cloning the whole board.
#[derive(Clone, Debug)]
pub struct Board {
    pub(crate) pieces: [[Bitboard; 6]; 2],
    pub(crate) occupied: [Bitboard; 2],
    pub(crate) all_occupied: Bitboard,
    pub(crate) side_to_move: Color,
    pub(crate) en_passant_target: Option<Square>,
    pub(crate) moved_flags: u8,
    pub(crate) halfmove_clock: u32,
    // Append-only position keys for the whole game. The starting position is
    // not recorded; keys are appended only by apply_move.
    pub(crate) position_history: Vec<u64>,
}

/// Saved fixed-size board state for the make-test-restore legality filter.
#[derive(Clone)]
pub(crate) struct Snapshot {
    pieces: [[Bitboard; 6]; 2],
    occupied: [Bitboard; 2],
    all_occupied: Bitboard,
    side_to_move: Color,
    en_passant_target: Option<Square>,
    moved_flags: u8,
    halfmove_clock: u32,
    history_len: usize,
}

impl Board {
    /// Create a board with the standard chess starting position.
    #[must_use]
    pub fn new() -> Self {
        let mut board = Board::empty();
        let back_rank = [
            Piece::Rook,
            Piece::Knight,
            Piece::Bishop,
            Piece::Queen,
            Piece::King,
            Piece::Bishop,
            Piece::Knight,
            Piece::Rook,
        ];
        for (col, piece) in back_rank.iter().enumerate() {
            board.set_piece(Square(0, col), Color::Black, *piece);
            board.set_piece(Square(1, col), Color::Black, Piece::Pawn);
            board.set_piece(Square(6, col), Color::White, Piece::Pawn);
            board.set_piece(Square(7, col), Color::White, *piece);
        }
        board
    }

    pub(crate) fn empty() -> Self {
        Board {
            pieces: [[Bitboard(0); 6]; 2],
            occupied: [Bitboard(0); 2],
            all_occupied: Bitboard(0),
            side_to_move: Color::White,
            en_passant_target: None,
            moved_flags: 0,
            halfmove_clock: 0,
            position_history: Vec::new(),
        }
    }

    /// The side whose turn it is.
    #[must_use]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// The square a pawn may capture onto en passant, if the last move was a
    /// double push.
    #[must_use]
    pub fn en_passant_target(&self) -> Option<Square> {
        self.en_passant_target
    }

    /// Plies since the last capture or pawn move.
    #[must_use]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    pub(crate) fn has_moved(&self, bit: u8) -> bool {
        self.moved_flags & bit != 0
    }

    pub(crate) fn set_piece(&mut self, sq: Square, color: Color, piece: Piece) {
        let bit = bit_for_square(sq);
        let c_idx = color.index();
        let p_idx = piece.index();
        self.pieces[c_idx][p_idx].0 |= bit;
        self.occupied[c_idx].0 |= bit;
        self.all_occupied.0 |= bit;
    }

    pub(crate) fn remove_piece(&mut self, sq: Square, color: Color, piece: Piece) {
        let bit = bit_for_square(sq);
        let c_idx = color.index();
        let p_idx = piece.index();
        self.pieces[c_idx][p_idx].0 &= !bit;
        self.occupied[c_idx].0 &= !bit;
        self.all_occupied.0 &= !bit;
    }

    pub(crate) fn piece_at(&self, sq: Square) -> Option<(Color, Piece)> {
        let bit = bit_for_square(sq);
        if self.all_occupied.0 & bit == 0 {
            return None;
        }

        let color = if self.occupied[0].0 & bit != 0 {
            Color::White
        } else {
            Color::Black
        };
        let c_idx = color.index();
        for piece in Piece::ALL {
            if self.pieces[c_idx][piece.index()].0 & bit != 0 {
                return Some((color, piece));
            }
        }

        None
    }

    pub(crate) fn is_empty(&self, sq: Square) -> bool {
        self.all_occupied.0 & bit_for_square(sq) == 0
    }

    /// Get just the piece type on a square (without color)
    #[must_use]
    pub fn piece_on(&self, sq: Square) -> Option<Piece> {
        self.piece_at(sq).map(|(_, piece)| piece)
    }

    /// Get just the color of the piece on a square
    #[must_use]
    pub fn color_on(&self, sq: Square) -> Option<Color> {
        self.piece_at(sq).map(|(color, _)| color)
    }

    pub(crate) fn snapshot(&self) -> Snapshot {
        Snapshot {
            pieces: self.pieces,
            occupied: self.occupied,
            all_occupied: self.all_occupied,
            side_to_move: self.side_to_move,
            en_passant_target: self.en_passant_target,
            moved_flags: self.moved_flags,
            halfmove_clock: self.halfmove_clock,
            history_len: self.position_history.len(),
        }
    }

    pub(crate) fn restore(&mut self, snap: &Snapshot) {
        self.pieces = snap.pieces;
        self.occupied = snap.occupied;
        self.all_occupied = snap.all_occupied;
        self.side_to_move = snap.side_to_move;
        self.en_passant_target = snap.en_passant_target;
        self.moved_flags = snap.moved_flags;
        self.halfmove_clock = snap.halfmove_clock;
        self.position_history.truncate(snap.history_len);
    }

    /// Zobrist key of the current position.
    ///
    /// Covers piece placement, side to move, the six moved flags and the
    /// en-passant target square; positions compare equal for the repetition
    /// rule exactly when their keys match.
    #[must_use]
    pub fn position_key(&self) -> u64 {
        let mut hash: u64 = 0;

        for row in 0..8 {
            for col in 0..8 {
                let sq = Square(row, col);
                if let Some((color, piece)) = self.piece_at(sq) {
                    hash ^= ZOBRIST.piece_keys[piece.index()][color.index()][square_index(sq)];
                }
            }
        }

        if self.side_to_move == Color::Black {
            hash ^= ZOBRIST.black_to_move_key;
        }

        for color in Color::BOTH {
            let c_idx = color.index();
            if self.has_moved(king_moved_bit(color)) {
                hash ^= ZOBRIST.moved_flag_keys[c_idx][0];
            }
            if self.has_moved(rook_moved_bit(color, 'K')) {
                hash ^= ZOBRIST.moved_flag_keys[c_idx][1];
            }
            if self.has_moved(rook_moved_bit(color, 'Q')) {
                hash ^= ZOBRIST.moved_flag_keys[c_idx][2];
            }
        }

        if let Some(ep) = self.en_passant_target {
            hash ^= ZOBRIST.en_passant_keys[square_index(ep)];
        }

        hash
    }

    /// Fifty-move rule: 100 plies without a capture or pawn move.
    #[must_use]
    pub fn is_fifty_move_rule(&self) -> bool {
        self.halfmove_clock >= 100
    }

    /// Threefold repetition over the whole game's position history.
    ///
    /// A third occurrence is combinatorially impossible before 9 recorded
    /// plies, so shorter histories short-circuit to false.
    #[must_use]
    pub fn is_threefold_repetition(&self) -> bool {
        if self.position_history.len() < 9 {
            return false;
        }

        let current = self.position_key();
        let mut count = 0;
        for key in &self.position_history {
            if *key == current {
                count += 1;
                if count >= 3 {
                    return true;
                }
            }
        }

        false
    }

    /// True if either draw condition holds.
    #[must_use]
    pub fn is_draw(&self) -> bool {
        self.is_fifty_move_rule() || self.is_threefold_repetition()
    }

    /// Material balance in centipawns, positive for White.
    #[must_use]
    pub fn material_balance(&self) -> i32 {
        let mut material = 0;
        for color in Color::BOTH {
            for piece in Piece::ALL {
                let count = self.pieces[color.index()][piece.index()].0.count_ones() as i32;
                material += count * piece.value() * color.sign();
            }
        }
        material
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..8 {
            write!(f, "{} ", 8 - row)?;
            for col in 0..8 {
                let ch = match self.piece_at(Square(row, col)) {
                    Some((color, piece)) => piece.to_fen_char(color),
                    None => '.',
                };
                write!(f, "{ch} ")?;
            }
            writeln!(f)?;
        }
        write!(f, "  a b c d e f g h")
    }
}
