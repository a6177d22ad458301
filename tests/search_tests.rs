use rand::rngs::StdRng;
use rand::SeedableRng;

use chessbot::board::{Board, Color, Square};
use chessbot::search::{choose_move, choose_random_move, evaluate, search};

fn sq(s: &str) -> Square {
    s.parse().expect("bad square literal")
}

/// Exhaustive minimax without pruning, used as the reference value for the
/// alpha-beta equivalence tests.
fn minimax(board: &mut Board, depth: u32, engine_color: Color) -> i32 {
    if depth == 0 {
        return evaluate(board, engine_color);
    }
    let moves = board.legal_moves();
    if moves.is_empty() {
        return evaluate(board, engine_color);
    }

    let maximizing = board.side_to_move() == engine_color;
    let mut best = if maximizing { i32::MIN } else { i32::MAX };
    for m in moves.iter() {
        let mut child = board.clone();
        child.apply_move(m.from, m.to);
        let score = minimax(&mut child, depth - 1, engine_color);
        best = if maximizing {
            best.max(score)
        } else {
            best.min(score)
        };
    }
    best
}

#[test]
fn alpha_beta_score_equals_unpruned_minimax() {
    let cases: &[(&str, u32)] = &[
        ("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1", 2),
        ("r1bqkbnr/pppp1ppp/2n5/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 0 1", 2),
        ("k7/8/8/3q4/8/8/3R4/K7 w - - 0 1", 2),
        ("8/8/8/4k3/8/8/4P3/4K3 w - - 0 1", 3),
    ];

    for &(fen, depth) in cases {
        let board = Board::from_fen(fen);
        let engine_color = board.side_to_move();

        let outcome = search(&board, engine_color, depth);
        let mut reference = board.clone();
        let expected = minimax(&mut reference, depth, engine_color);

        assert_eq!(
            outcome.score, expected,
            "pruned and unpruned scores differ for {fen} at depth {depth}"
        );
    }
}

#[test]
fn search_finds_back_rank_mate() {
    let board = Board::from_fen("6k1/5ppp/8/8/8/8/8/4R1K1 w - - 0 1");
    let outcome = search(&board, Color::White, 3);
    assert_eq!(outcome.best_move.map(|m| (m.from, m.to)), Some((sq("e1"), sq("e8"))));
    assert_eq!(outcome.score, 20000);

    let mut after = board.clone();
    let mv = outcome.best_move.unwrap();
    after.apply_move(mv.from, mv.to);
    assert!(after.is_checkmate());
}

#[test]
fn search_prefers_winning_capture() {
    let board = Board::from_fen("k7/8/8/3q4/8/8/3R4/K7 w - - 0 1");
    let mv = choose_move(&board, Color::White, 2).expect("white has moves");
    assert_eq!((mv.from, mv.to), (sq("d2"), sq("d5")));
}

#[test]
fn search_returns_none_without_legal_moves() {
    // Stalemate: black to move, no legal moves, not in check.
    let board = Board::from_fen("7k/8/6QK/8/8/8/8/8 b - - 0 1");
    let outcome = search(&board, Color::Black, 3);
    assert_eq!(outcome.best_move, None);
    assert_eq!(outcome.score, 0);
    assert_eq!(choose_move(&board, Color::Black, 3), None);
}

#[test]
fn mated_engine_scores_negative_king_value() {
    // White is already checkmated; evaluating for white reports the loss.
    let mut board = Board::new();
    for (from, to) in [("f2", "f3"), ("e7", "e5"), ("g2", "g4"), ("d8", "h4")] {
        board.try_move(sq(from), sq(to)).unwrap();
    }
    assert_eq!(evaluate(&mut board, Color::White), -20000);
    assert_eq!(evaluate(&mut board, Color::Black), 20000);
}

#[test]
fn depth_one_search_takes_hanging_queen() {
    let board = Board::from_fen("k2q4/8/8/8/8/8/8/K2R4 w - - 0 1");
    let mv = choose_move(&board, Color::White, 1).expect("white has moves");
    assert_eq!((mv.from, mv.to), (sq("d1"), sq("d8")));
}

#[test]
fn random_bot_plays_only_legal_moves() {
    let board = Board::new();
    let mut rng = StdRng::seed_from_u64(42);

    let mv = choose_random_move(&board, Color::White, &mut rng).expect("white has moves");
    let mut scratch = board.clone();
    assert!(scratch.legal_moves_from(mv.from).contains(&mv.to));

    // Not black's turn.
    assert_eq!(choose_random_move(&board, Color::Black, &mut rng), None);
}

#[test]
fn random_bot_returns_none_when_stalemated() {
    let board = Board::from_fen("7k/8/6QK/8/8/8/8/8 b - - 0 1");
    let mut rng = StdRng::seed_from_u64(7);
    assert_eq!(choose_random_move(&board, Color::Black, &mut rng), None);
}
