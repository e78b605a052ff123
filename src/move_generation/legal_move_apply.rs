//! In-place move application and exact reversal.
//!
//! `apply_move` pushes an undo record and mutates the board; `undo_move` pops
//! it and restores every field. Search and the legality filter pair the two
//! through `with_move`, so every apply has its undo on every exit path.

use crate::game_state::{chess_types::*, game_state::GameState, undo_state::UndoState};
use crate::moves::move_descriptions::Move;

/// Apply a move produced by the generator for this position.
///
/// Moves not drawn from `generate_legal_moves` for the same position are out
/// of contract.
pub fn apply_move(game_state: &mut GameState, mv: Move) {
    let moving_color = mv.piece.color;
    let capture_square = if mv.is_en_passant {
        en_passant_victim_square(mv)
    } else {
        mv.to
    };
    let captured_piece = game_state.piece_at(capture_square);

    game_state.undo_stack.push(UndoState {
        mv,
        captured_piece,
        prev_castling_rights: game_state.castling_rights,
        prev_en_passant_square: game_state.en_passant_square,
        prev_halfmove_clock: game_state.halfmove_clock,
        prev_fullmove_number: game_state.fullmove_number,
    });

    // Update clocks.
    if captured_piece.is_some() || mv.piece.kind == PieceKind::Pawn {
        game_state.halfmove_clock = 0;
    } else {
        game_state.halfmove_clock = game_state.halfmove_clock.saturating_add(1);
    }
    if moving_color == Color::Black {
        game_state.fullmove_number = game_state.fullmove_number.saturating_add(1);
    }

    game_state.set_piece(mv.from, None);
    if mv.is_en_passant {
        game_state.set_piece(capture_square, None);
    }

    let placed_kind = if mv.is_promotion {
        PieceKind::Queen
    } else {
        mv.piece.kind
    };
    game_state.set_piece(mv.to, Some(Piece::new(placed_kind, moving_color)));

    // Castling rook move.
    if let Some(castle_side) = mv.castle {
        let (rook_from, rook_to) = castle_rook_squares(castle_side, moving_color);
        let rook = game_state.piece_at(rook_from);
        game_state.set_piece(rook_from, None);
        game_state.set_piece(rook_to, rook);
    }

    update_castling_rights(game_state, mv, captured_piece);

    game_state.en_passant_square = if mv.is_double_pawn_push {
        Some((mv.from + mv.to) / 2)
    } else {
        None
    };

    game_state.side_to_move = game_state.side_to_move.opposite();
}

/// Reverse the most recent `apply_move`. Returns the undone move, or `None`
/// (leaving the state untouched) when there is no history.
pub fn undo_move(game_state: &mut GameState) -> Option<Move> {
    let undo = game_state.undo_stack.pop()?;
    let mv = undo.mv;

    game_state.castling_rights = undo.prev_castling_rights;
    game_state.en_passant_square = undo.prev_en_passant_square;
    game_state.halfmove_clock = undo.prev_halfmove_clock;
    game_state.fullmove_number = undo.prev_fullmove_number;

    // Restores the pawn for promotions.
    game_state.set_piece(mv.from, Some(mv.piece));

    if let Some(castle_side) = mv.castle {
        let (rook_from, rook_to) = castle_rook_squares(castle_side, mv.piece.color);
        let rook = game_state.piece_at(rook_to);
        game_state.set_piece(rook_to, None);
        game_state.set_piece(rook_from, rook);
        game_state.set_piece(mv.to, None);
    } else if mv.is_en_passant {
        game_state.set_piece(mv.to, None);
        game_state.set_piece(en_passant_victim_square(mv), undo.captured_piece);
    } else {
        game_state.set_piece(mv.to, undo.captured_piece);
    }

    game_state.side_to_move = game_state.side_to_move.opposite();
    Some(mv)
}

/// Apply `mv`, run `f` on the resulting position, then undo.
#[inline]
pub fn with_move<R>(game_state: &mut GameState, mv: Move, f: impl FnOnce(&mut GameState) -> R) -> R {
    apply_move(game_state, mv);
    let out = f(game_state);
    undo_move(game_state);
    out
}

#[inline]
fn en_passant_victim_square(mv: Move) -> Square {
    square_at(rank_of(mv.from), file_of(mv.to))
}

#[inline]
fn castle_rook_squares(castle_side: CastleSide, color: Color) -> (Square, Square) {
    let (from_file, to_file) = castle_side.rook_files();
    let rank = color.home_rank();
    (square_at(rank, from_file), square_at(rank, to_file))
}

fn update_castling_rights(game_state: &mut GameState, mv: Move, captured_piece: Option<Piece>) {
    if mv.piece.kind == PieceKind::King {
        game_state.castling_rights &= !(CastleSide::Kingside.right(mv.piece.color)
            | CastleSide::Queenside.right(mv.piece.color));
    }

    if mv.piece.kind == PieceKind::Rook {
        game_state.castling_rights &= !corner_right(mv.from);
    }

    // Capturing a rook on its home corner also removes the right.
    if matches!(captured_piece, Some(p) if p.kind == PieceKind::Rook) {
        game_state.castling_rights &= !corner_right(mv.to);
    }
}

#[inline]
fn corner_right(square: Square) -> CastlingRights {
    match square {
        0 => CASTLE_WHITE_QUEENSIDE,
        7 => CASTLE_WHITE_KINGSIDE,
        56 => CASTLE_BLACK_QUEENSIDE,
        63 => CASTLE_BLACK_KINGSIDE,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::move_generation::legal_move_generator::generate_legal_moves;
    use crate::utils::long_algebraic::parse_long_algebraic;

    fn play(game: &mut GameState, lan: &str) -> Move {
        let mv = parse_long_algebraic(lan, game).expect("move should be legal");
        apply_move(game, mv);
        mv
    }

    #[test]
    fn every_start_move_round_trips() {
        let mut game = GameState::new_game();
        let before = game.clone();
        for mv in generate_legal_moves(&mut game) {
            apply_move(&mut game, mv);
            assert_ne!(game, before);
            assert_eq!(undo_move(&mut game), Some(mv));
            assert_eq!(game, before);
        }
    }

    #[test]
    fn undo_on_empty_history_is_noop() {
        let mut game = GameState::new_game();
        assert_eq!(undo_move(&mut game), None);
        assert_eq!(game, GameState::new_game());
    }

    #[test]
    fn en_passant_removes_adjacent_pawn_and_restores_it() {
        let mut game = GameState::from_fen("4k3/3p4/8/4P3/8/8/8/4K3 b - - 0 1").expect("FEN should parse");
        play(&mut game, "d7d5");
        assert_eq!(game.en_passant_square, Some(square_at(5, 3)));

        let before = game.clone();
        let ep = play(&mut game, "e5d6");
        assert!(ep.is_en_passant);
        assert_eq!(game.piece_at(square_at(4, 3)), None, "d5 pawn should be gone");
        assert_eq!(
            game.piece_at(square_at(5, 3)),
            Some(Piece::new(PieceKind::Pawn, Color::White))
        );
        assert_eq!(game.en_passant_square, None);

        undo_move(&mut game);
        assert_eq!(game, before);
    }

    #[test]
    fn en_passant_target_cleared_by_any_following_move() {
        let mut game = GameState::new_game();
        play(&mut game, "e2e4");
        assert_eq!(game.en_passant_square, Some(square_at(2, 4)));
        play(&mut game, "g8f6");
        assert_eq!(game.en_passant_square, None);
    }

    #[test]
    fn castling_moves_rook_and_undo_restores_it() {
        let mut game =
            GameState::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 3 10").expect("FEN should parse");
        let before = game.clone();
        play(&mut game, "e1g1");
        assert_eq!(game.get_fen(), "r3k2r/8/8/8/8/8/8/R4RK1 b kq - 4 10");

        undo_move(&mut game);
        assert_eq!(game, before);

        play(&mut game, "e1c1");
        assert_eq!(game.get_fen(), "r3k2r/8/8/8/8/8/8/2KR3R b kq - 4 10");
    }

    #[test]
    fn rook_move_revokes_right_permanently() {
        let mut game =
            GameState::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").expect("FEN should parse");
        play(&mut game, "h1h2");
        play(&mut game, "a8a7");
        play(&mut game, "h2h1");
        play(&mut game, "a7a8");
        assert_eq!(game.castling_rights, CASTLE_WHITE_QUEENSIDE | CASTLE_BLACK_KINGSIDE);
    }

    #[test]
    fn capturing_rook_on_home_square_revokes_right() {
        let mut game =
            GameState::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").expect("FEN should parse");
        play(&mut game, "a1a8");
        assert_eq!(game.castling_rights, CASTLE_WHITE_KINGSIDE | CASTLE_BLACK_KINGSIDE);
    }

    #[test]
    fn promotion_becomes_queen_and_undo_restores_pawn() {
        let mut game = GameState::from_fen("4k3/1P6/8/8/8/8/8/4K3 w - - 7 30").expect("FEN should parse");
        let before = game.clone();
        play(&mut game, "b7b8");
        assert_eq!(
            game.piece_at(square_at(7, 1)),
            Some(Piece::new(PieceKind::Queen, Color::White))
        );
        assert_eq!(game.halfmove_clock, 0);
        undo_move(&mut game);
        assert_eq!(game, before);
    }

    #[test]
    fn clocks_follow_captures_pawn_moves_and_black_turns() {
        let mut game = GameState::new_game();
        play(&mut game, "g1f3");
        assert_eq!((game.halfmove_clock, game.fullmove_number), (1, 1));
        play(&mut game, "g8f6");
        assert_eq!((game.halfmove_clock, game.fullmove_number), (2, 2));
        play(&mut game, "e2e4");
        assert_eq!((game.halfmove_clock, game.fullmove_number), (0, 2));
        assert_eq!(game.history_len(), 3);
    }
}
