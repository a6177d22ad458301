use super::{king_moved_bit, rook_moved_bit, Board, MoveError, Piece, Square};

impl Board {
    /// Apply a pre-validated move, mutating the board in place.
    ///
    /// The caller is the legality boundary: the move must come from
    /// [`Board::legal_moves_from`] (or be pseudo-legal for the mover during
    /// legality filtering). Use [`Board::try_move`] for unvalidated input.
    ///
    /// Castling (a king travelling two files) relocates the rook in the same
    /// call and returns early: that path skips the halfmove clock, leaves the
    /// en-passant target untouched, and does not record the position in the
    /// repetition history.
    pub fn apply_move(&mut self, from: Square, to: Square) {
        let (color, piece) = self
            .piece_at(from)
            .expect("apply_move called with an empty source square");
        let captured = self.piece_at(to);
        let is_pawn = piece == Piece::Pawn;

        // A pawn sliding diagonally onto an empty square can only be an
        // en-passant capture; the captured pawn sits on the mover's start
        // row at the destination file.
        if is_pawn && from.1 != to.1 && captured.is_none() {
            let bypassed = Square(from.0, to.1);
            if let Some((bc, bp)) = self.piece_at(bypassed) {
                self.remove_piece(bypassed, bc, bp);
            }
        }

        if piece == Piece::King && from.0 == to.0 && from.1.abs_diff(to.1) == 2 {
            self.remove_piece(from, color, piece);
            self.set_piece(to, color, piece);

            let (rook_from_col, rook_to_col, side) = if to.1 == 6 { (7, 5, 'K') } else { (0, 3, 'Q') };
            let rook_from = Square(from.0, rook_from_col);
            if let Some((rc, rp)) = self.piece_at(rook_from) {
                self.remove_piece(rook_from, rc, rp);
                self.set_piece(Square(from.0, rook_to_col), rc, rp);
            }

            self.moved_flags |= king_moved_bit(color);
            self.moved_flags |= rook_moved_bit(color, side);
            self.side_to_move = self.side_to_move.opponent();
            return;
        }

        // En passant via the stored target square; the bypassed pawn sits one
        // row behind the destination.
        if is_pawn && self.en_passant_target == Some(to) {
            let behind_row = (to.0 as isize - color.pawn_direction()) as usize;
            let behind = Square(behind_row, to.1);
            if let Some((bc, bp)) = self.piece_at(behind) {
                self.remove_piece(behind, bc, bp);
            }
        }

        if let Some((cc, cp)) = captured {
            self.remove_piece(to, cc, cp);
        }
        self.remove_piece(from, color, piece);
        self.set_piece(to, color, piece);

        if piece == Piece::King {
            self.moved_flags |= king_moved_bit(color);
        } else if piece == Piece::Rook {
            let home = color.back_rank();
            if from == Square(home, 7) {
                self.moved_flags |= rook_moved_bit(color, 'K');
            } else if from == Square(home, 0) {
                self.moved_flags |= rook_moved_bit(color, 'Q');
            }
        }

        // A double push leaves a fresh en-passant target on the bypassed
        // square; every other move clears it.
        if is_pawn && from.0.abs_diff(to.0) == 2 {
            self.en_passant_target = Some(Square((from.0 + to.0) / 2, to.1));
        } else {
            self.en_passant_target = None;
        }

        // Forced queen promotion; no under-promotion exists.
        if is_pawn && to.0 == color.pawn_promotion_rank() {
            self.remove_piece(to, color, Piece::Pawn);
            self.set_piece(to, color, Piece::Queen);
        }

        if captured.is_some() || is_pawn {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock = self.halfmove_clock.saturating_add(1);
        }

        self.side_to_move = self.side_to_move.opponent();
        let key = self.position_key();
        self.position_history.push(key);
    }

    /// Validate and apply a move; the explicit legality boundary for callers
    /// holding unvalidated input.
    pub fn try_move(&mut self, from: Square, to: Square) -> Result<(), MoveError> {
        for sq in [from, to] {
            if !sq.in_bounds() {
                return Err(MoveError::OffBoard { row: sq.0, col: sq.1 });
            }
        }
        match self.piece_at(from) {
            None => return Err(MoveError::EmptySquare { square: from }),
            Some((color, _)) if color != self.side_to_move => {
                return Err(MoveError::WrongSide { square: from })
            }
            Some(_) => {}
        }
        if !self.legal_moves_from(from).contains(&to) {
            return Err(MoveError::IllegalMove { from, to });
        }
        self.apply_move(from, to);
        Ok(())
    }
}
