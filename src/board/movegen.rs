use super::attack_tables::{slider_attacks, KING_ATTACKS, KNIGHT_ATTACKS, PAWN_ATTACKS};
use super::{
    king_moved_bit, rook_moved_bit, square_from_index, square_index, Board, Color, Move, MoveList,
    Piece, Square,
};

// Fixed generation orders. The order in which destinations are produced is
// observable: the search keeps the first move at a tied score, so ties break
// by this enumeration.
const KNIGHT_OFFSETS: [(isize, isize); 8] = [
    (1, 2),
    (1, -2),
    (-1, 2),
    (-1, -2),
    (2, 1),
    (2, -1),
    (-2, 1),
    (-2, -1),
];
const ROOK_DIRS: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
const BISHOP_DIRS: [(isize, isize); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];
const KING_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

fn on_board(row: isize, col: isize) -> bool {
    (0..8).contains(&row) && (0..8).contains(&col)
}

impl Board {
    /// Destinations reachable by the piece on `from` under movement and
    /// blocking rules alone, ignoring whether the mover's king is left in
    /// check. Castling destinations are appended here because their
    /// conditions need attack information the per-piece rules do not have.
    pub(crate) fn pseudo_legal_from(&self, from: Square) -> Vec<Square> {
        let Some((color, piece)) = self.piece_at(from) else {
            return Vec::new();
        };

        let mut dests = Vec::new();
        match piece {
            Piece::Pawn => self.pawn_dests(from, color, &mut dests),
            Piece::Knight => self.offset_dests(from, color, &KNIGHT_OFFSETS, &mut dests),
            Piece::Bishop => self.ray_dests(from, color, &BISHOP_DIRS, &mut dests),
            Piece::Rook => self.ray_dests(from, color, &ROOK_DIRS, &mut dests),
            Piece::Queen => {
                self.ray_dests(from, color, &ROOK_DIRS, &mut dests);
                self.ray_dests(from, color, &BISHOP_DIRS, &mut dests);
            }
            Piece::King => {
                self.offset_dests(from, color, &KING_OFFSETS, &mut dests);
                self.castling_dests(from, color, &mut dests);
            }
        }
        dests
    }

    fn pawn_dests(&self, from: Square, color: Color, dests: &mut Vec<Square>) {
        let dir = color.pawn_direction();
        let (r, c) = (from.0 as isize, from.1 as isize);

        let forward_r = r + dir;
        if on_board(forward_r, c) && self.is_empty(Square(forward_r as usize, c as usize)) {
            dests.push(Square(forward_r as usize, c as usize));

            let double_r = r + 2 * dir;
            if from.0 == color.pawn_start_rank()
                && on_board(double_r, c)
                && self.is_empty(Square(double_r as usize, c as usize))
            {
                dests.push(Square(double_r as usize, c as usize));
            }
        }

        for dc in [-1, 1] {
            let (cr, cc) = (r + dir, c + dc);
            if !on_board(cr, cc) {
                continue;
            }
            let target = Square(cr as usize, cc as usize);
            match self.piece_at(target) {
                Some((target_color, _)) if target_color != color => dests.push(target),
                // The target square is empty on an en-passant capture.
                None if self.en_passant_target == Some(target) => dests.push(target),
                _ => {}
            }
        }
    }

    fn offset_dests(
        &self,
        from: Square,
        color: Color,
        offsets: &[(isize, isize)],
        dests: &mut Vec<Square>,
    ) {
        let (r, c) = (from.0 as isize, from.1 as isize);
        for &(dr, dc) in offsets {
            let (nr, nc) = (r + dr, c + dc);
            if !on_board(nr, nc) {
                continue;
            }
            let target = Square(nr as usize, nc as usize);
            match self.piece_at(target) {
                Some((target_color, _)) if target_color == color => {}
                _ => dests.push(target),
            }
        }
    }

    fn ray_dests(
        &self,
        from: Square,
        color: Color,
        dirs: &[(isize, isize)],
        dests: &mut Vec<Square>,
    ) {
        let (r, c) = (from.0 as isize, from.1 as isize);
        for &(dr, dc) in dirs {
            let (mut nr, mut nc) = (r + dr, c + dc);
            while on_board(nr, nc) {
                let target = Square(nr as usize, nc as usize);
                match self.piece_at(target) {
                    None => {
                        dests.push(target);
                        nr += dr;
                        nc += dc;
                    }
                    Some((target_color, _)) => {
                        if target_color != color {
                            dests.push(target);
                        }
                        break;
                    }
                }
            }
        }
    }

    fn castling_dests(&self, from: Square, color: Color, dests: &mut Vec<Square>) {
        let home = color.back_rank();
        if from != Square(home, 4)
            || self.has_moved(king_moved_bit(color))
            || self.is_in_check(color)
        {
            return;
        }
        let enemy = color.opponent();

        if self.piece_at(Square(home, 7)) == Some((color, Piece::Rook))
            && !self.has_moved(rook_moved_bit(color, 'K'))
            && self.is_empty(Square(home, 5))
            && self.is_empty(Square(home, 6))
            && !self.is_square_attacked(Square(home, 5), enemy)
            && !self.is_square_attacked(Square(home, 6), enemy)
        {
            dests.push(Square(home, 6));
        }

        if self.piece_at(Square(home, 0)) == Some((color, Piece::Rook))
            && !self.has_moved(rook_moved_bit(color, 'Q'))
            && self.is_empty(Square(home, 1))
            && self.is_empty(Square(home, 2))
            && self.is_empty(Square(home, 3))
            && !self.is_square_attacked(Square(home, 3), enemy)
            && !self.is_square_attacked(Square(home, 2), enemy)
        {
            dests.push(Square(home, 2));
        }
    }

    /// True if any piece of `attacker_color` attacks `square`.
    #[must_use]
    pub fn is_square_attacked(&self, square: Square, attacker_color: Color) -> bool {
        let target_idx = square_index(square);
        let c_idx = attacker_color.index();

        // A pawn of attacker_color attacks `square` from exactly the squares
        // that a pawn of the opposite color standing on `square` would attack.
        let pawn_sources = PAWN_ATTACKS[attacker_color.opponent().index()][target_idx];
        if self.pieces[c_idx][Piece::Pawn.index()].0 & pawn_sources != 0 {
            return true;
        }

        if self.pieces[c_idx][Piece::Knight.index()].0 & KNIGHT_ATTACKS[target_idx] != 0 {
            return true;
        }

        if self.pieces[c_idx][Piece::King.index()].0 & KING_ATTACKS[target_idx] != 0 {
            return true;
        }

        let rook_like = self.pieces[c_idx][Piece::Rook.index()].0
            | self.pieces[c_idx][Piece::Queen.index()].0;
        let bishop_like = self.pieces[c_idx][Piece::Bishop.index()].0
            | self.pieces[c_idx][Piece::Queen.index()].0;

        if slider_attacks(target_idx, self.all_occupied.0, false) & rook_like != 0 {
            return true;
        }
        if slider_attacks(target_idx, self.all_occupied.0, true) & bishop_like != 0 {
            return true;
        }

        false
    }

    pub(crate) fn find_king(&self, color: Color) -> Option<Square> {
        let kings = self.pieces[color.index()][Piece::King.index()].0;
        if kings == 0 {
            None
        } else {
            Some(square_from_index(kings.trailing_zeros() as usize))
        }
    }

    /// True if `color`'s king is attacked by the opponent.
    #[must_use]
    pub fn is_in_check(&self, color: Color) -> bool {
        if let Some(king_sq) = self.find_king(color) {
            self.is_square_attacked(king_sq, color.opponent())
        } else {
            false
        }
    }

    /// Legal destinations for the piece on `from`, in generation order.
    ///
    /// Empty for an empty square, a piece of the side not to move, or
    /// out-of-range coordinates. Each candidate is simulated and rejected if
    /// it leaves the mover's own king in check.
    pub fn legal_moves_from(&mut self, from: Square) -> Vec<Square> {
        if !from.in_bounds() {
            return Vec::new();
        }
        match self.piece_at(from) {
            Some((color, _)) if color == self.side_to_move => {}
            _ => return Vec::new(),
        }

        let mover = self.side_to_move;
        let candidates = self.pseudo_legal_from(from);
        let mut legal = Vec::with_capacity(candidates.len());
        for to in candidates {
            let snap = self.snapshot();
            self.apply_move(from, to);
            if !self.is_in_check(mover) {
                legal.push(to);
            }
            self.restore(&snap);
        }
        legal
    }

    /// All legal moves of the side to move, scanning squares in row-major
    /// order.
    pub fn legal_moves(&mut self) -> MoveList {
        let mut moves = MoveList::new();
        for row in 0..8 {
            for col in 0..8 {
                let from = Square(row, col);
                for to in self.legal_moves_from(from) {
                    moves.push(Move { from, to });
                }
            }
        }
        moves
    }

    /// True if `color` has at least one legal move, short-circuiting on the
    /// first square that yields one.
    pub fn has_any_legal_moves(&mut self, color: Color) -> bool {
        let saved_side = self.side_to_move;
        self.side_to_move = color;
        let mut found = false;
        'scan: for row in 0..8 {
            for col in 0..8 {
                if !self.legal_moves_from(Square(row, col)).is_empty() {
                    found = true;
                    break 'scan;
                }
            }
        }
        self.side_to_move = saved_side;
        found
    }

    /// The side to move has no legal moves and is in check.
    pub fn is_checkmate(&mut self) -> bool {
        let color = self.side_to_move;
        self.is_in_check(color) && !self.has_any_legal_moves(color)
    }

    /// The side to move has no legal moves and is not in check.
    pub fn is_stalemate(&mut self) -> bool {
        let color = self.side_to_move;
        !self.is_in_check(color) && !self.has_any_legal_moves(color)
    }

    /// Count leaf nodes of the legal move tree to `depth`.
    #[allow(dead_code)]
    pub fn perft(&mut self, depth: usize) -> u64 {
        if depth == 0 {
            return 1;
        }

        let moves = self.legal_moves();
        if depth == 1 {
            return moves.len() as u64;
        }

        let mut nodes = 0;
        for m in moves.iter() {
            let snap = self.snapshot();
            self.apply_move(m.from, m.to);
            nodes += self.perft(depth - 1);
            self.restore(&snap);
        }

        nodes
    }
}
