use std::str::FromStr;

use super::error::FenError;
use super::{
    king_moved_bit, rook_moved_bit, Board, Color, Piece, Square, BLACK_ROOK_KINGSIDE_MOVED,
    BLACK_ROOK_QUEENSIDE_MOVED, WHITE_ROOK_KINGSIDE_MOVED, WHITE_ROOK_QUEENSIDE_MOVED,
};

impl Board {
    /// Parse a board position from FEN notation.
    ///
    /// Returns an error if the FEN string is invalid. The castling field is
    /// translated into moved flags: a missing right marks that rook as
    /// moved, and a color with no rights at all marks its king as moved.
    pub fn try_from_fen(fen: &str) -> Result<Self, FenError> {
        let mut board = Board::empty();
        let parts: Vec<&str> = fen.split_whitespace().collect();

        if parts.len() < 4 {
            return Err(FenError::TooFewParts { found: parts.len() });
        }

        // Parse piece placement; FEN rank 8 comes first and is row 0.
        for (row, rank_str) in parts[0].split('/').enumerate() {
            if row >= 8 {
                return Err(FenError::InvalidRank { rank: row });
            }
            let mut col = 0;
            for c in rank_str.chars() {
                if c.is_ascii_digit() {
                    col += c.to_digit(10).unwrap() as usize;
                } else {
                    let color = if c.is_uppercase() {
                        Color::White
                    } else {
                        Color::Black
                    };
                    let piece = Piece::from_char(c).ok_or(FenError::InvalidPiece { char: c })?;
                    if col >= 8 {
                        return Err(FenError::TooManyFiles {
                            rank: row,
                            files: col + 1,
                        });
                    }
                    board.set_piece(Square(row, col), color, piece);
                    col += 1;
                }
            }
        }

        // Parse side to move
        match parts[1] {
            "w" => board.side_to_move = Color::White,
            "b" => board.side_to_move = Color::Black,
            other => {
                return Err(FenError::InvalidSideToMove {
                    found: other.to_string(),
                })
            }
        }

        // Parse castling rights into moved flags
        let mut flags = WHITE_ROOK_KINGSIDE_MOVED
            | WHITE_ROOK_QUEENSIDE_MOVED
            | BLACK_ROOK_KINGSIDE_MOVED
            | BLACK_ROOK_QUEENSIDE_MOVED;
        for c in parts[2].chars() {
            match c {
                'K' => flags &= !WHITE_ROOK_KINGSIDE_MOVED,
                'Q' => flags &= !WHITE_ROOK_QUEENSIDE_MOVED,
                'k' => flags &= !BLACK_ROOK_KINGSIDE_MOVED,
                'q' => flags &= !BLACK_ROOK_QUEENSIDE_MOVED,
                '-' => {}
                _ => return Err(FenError::InvalidCastling { char: c }),
            }
        }
        for color in Color::BOTH {
            let rook_flags = rook_moved_bit(color, 'K') | rook_moved_bit(color, 'Q');
            if flags & rook_flags == rook_flags {
                flags |= king_moved_bit(color);
            }
        }
        board.moved_flags = flags;

        // Parse en passant target
        board.en_passant_target = if parts[3] == "-" {
            None
        } else {
            Some(
                Square::from_str(parts[3]).map_err(|_| FenError::InvalidEnPassant {
                    found: parts[3].to_string(),
                })?,
            )
        };

        // Parse halfmove clock (optional)
        if parts.len() >= 5 {
            board.halfmove_clock = parts[4].parse().unwrap_or(0);
        }

        Ok(board)
    }

    /// Parse a board position from FEN notation.
    ///
    /// # Panics
    /// Panics if the FEN string is invalid. Use `try_from_fen` for fallible parsing.
    #[must_use]
    pub fn from_fen(fen: &str) -> Self {
        Self::try_from_fen(fen).expect("Invalid FEN string")
    }

    /// Convert the board position to FEN notation.
    #[must_use]
    pub fn to_fen(&self) -> String {
        let mut rows: Vec<String> = Vec::new();
        for row in 0..8 {
            let mut rank_str = String::new();
            let mut empty = 0;
            for col in 0..8 {
                let sq = Square(row, col);
                if let Some((color, piece)) = self.piece_at(sq) {
                    if empty > 0 {
                        rank_str.push_str(&empty.to_string());
                        empty = 0;
                    }
                    rank_str.push(piece.to_fen_char(color));
                } else {
                    empty += 1;
                }
            }
            if empty > 0 {
                rank_str.push_str(&empty.to_string());
            }
            rows.push(rank_str);
        }

        let active = if self.side_to_move == Color::White {
            "w"
        } else {
            "b"
        };

        let mut castling = String::new();
        for (color, kingside, queenside) in [
            (Color::White, 'K', 'Q'),
            (Color::Black, 'k', 'q'),
        ] {
            if !self.has_moved(king_moved_bit(color)) {
                if !self.has_moved(rook_moved_bit(color, 'K')) {
                    castling.push(kingside);
                }
                if !self.has_moved(rook_moved_bit(color, 'Q')) {
                    castling.push(queenside);
                }
            }
        }
        if castling.is_empty() {
            castling.push('-');
        }

        let ep = match self.en_passant_target {
            Some(sq) => sq.to_string(),
            None => "-".to_string(),
        };

        format!(
            "{} {} {} {} {} 1",
            rows.join("/"),
            active,
            castling,
            ep,
            self.halfmove_clock
        )
    }
}
