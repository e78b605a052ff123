//! Full legal move generation pipeline.
//!
//! Scans the board in square order, dispatches on piece kind for pseudo-legal
//! generation, then applies each candidate and drops those that leave the
//! mover's own king attacked.

use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_apply::with_move;
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::legal_moves_king::generate_king_moves;
use crate::move_generation::legal_moves_knight::generate_knight_moves;
use crate::move_generation::legal_moves_pawn::generate_pawn_moves;
use crate::move_generation::legal_moves_sliding::generate_sliding_moves;
use crate::moves::move_descriptions::Move;
use crate::moves::piece_offsets::{BISHOP_DIRECTIONS, QUEEN_DIRECTIONS, ROOK_DIRECTIONS};

/// Seam between the search and the rules engine.
pub trait MoveGenerator: Send + Sync {
    /// Legal moves for the side to move. The state is borrowed mutably for
    /// apply/test/undo and is returned unchanged.
    fn generate_legal_moves(&self, game_state: &mut GameState) -> Vec<Move>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LegalMoveGenerator;

impl MoveGenerator for LegalMoveGenerator {
    fn generate_legal_moves(&self, game_state: &mut GameState) -> Vec<Move> {
        generate_legal_moves(game_state)
    }
}

#[inline]
pub fn generate_legal_moves(game_state: &mut GameState) -> Vec<Move> {
    let side = game_state.side_to_move;
    generate_legal_moves_for(game_state, side)
}

/// Legal moves for `color`, which need not be the side to move.
pub fn generate_legal_moves_for(game_state: &mut GameState, color: Color) -> Vec<Move> {
    let pseudo = generate_pseudo_legal_moves(game_state, color);
    let mut legal = Vec::with_capacity(pseudo.len());

    for mv in pseudo {
        // Illegal if own king is in check after move.
        let leaves_king_attacked = with_move(game_state, mv, |next| is_king_in_check(next, color));
        if !leaves_king_attacked {
            legal.push(mv);
        }
    }

    legal
}

/// Legal moves without needing mutable access; works on a scratch copy.
pub fn legal_moves(game_state: &GameState) -> Vec<Move> {
    let mut scratch = game_state.clone();
    generate_legal_moves(&mut scratch)
}

pub fn generate_pseudo_legal_moves(game_state: &GameState, color: Color) -> Vec<Move> {
    let mut pseudo = Vec::<Move>::with_capacity(64);

    for (from, piece) in game_state.occupied_squares() {
        if piece.color != color {
            continue;
        }
        match piece.kind {
            PieceKind::Pawn => generate_pawn_moves(game_state, from, piece, &mut pseudo),
            PieceKind::Knight => generate_knight_moves(game_state, from, piece, &mut pseudo),
            PieceKind::Bishop => {
                generate_sliding_moves(game_state, from, piece, &BISHOP_DIRECTIONS, &mut pseudo)
            }
            PieceKind::Rook => {
                generate_sliding_moves(game_state, from, piece, &ROOK_DIRECTIONS, &mut pseudo)
            }
            PieceKind::Queen => {
                generate_sliding_moves(game_state, from, piece, &QUEEN_DIRECTIONS, &mut pseudo)
            }
            PieceKind::King => generate_king_moves(game_state, from, piece, &mut pseudo),
        }
    }

    pseudo
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::seq::IndexedRandom;
    use rand::SeedableRng;

    use super::*;
    use crate::move_generation::legal_move_apply::{apply_move, undo_move};
    use crate::move_generation::legal_move_checks::is_king_in_check;

    #[test]
    fn startpos_has_twenty_moves() {
        let mut game = GameState::new_game();
        assert_eq!(generate_legal_moves(&mut game).len(), 20);
        assert_eq!(LegalMoveGenerator.generate_legal_moves(&mut game).len(), 20);
        assert_eq!(legal_moves(&game).len(), 20);
    }

    #[test]
    fn generation_order_follows_board_scan() {
        let mut game = GameState::new_game();
        let lan: Vec<String> = generate_legal_moves(&mut game)
            .iter()
            .map(Move::to_long_algebraic)
            .collect();
        assert_eq!(&lan[..4], ["b1c3", "b1a3", "g1h3", "g1f3"]);
        assert_eq!(&lan[4..6], ["a2a3", "a2a4"]);
    }

    #[test]
    fn pinned_piece_cannot_leave_the_line() {
        let mut game =
            GameState::from_fen("4r1k1/8/8/8/8/8/4B3/4K3 w - - 0 1").expect("FEN should parse");
        let moves = generate_legal_moves(&mut game);
        assert!(moves.iter().all(|m| m.piece.kind != PieceKind::Bishop));
    }

    #[test]
    fn can_generate_for_side_not_to_move() {
        let mut game = GameState::new_game();
        let black = generate_legal_moves_for(&mut game, Color::Black);
        assert_eq!(black.len(), 20);
        assert!(black.iter().all(|m| m.color() == Color::Black));
        assert_eq!(game, GameState::new_game());
    }

    #[test]
    fn random_playouts_keep_legality_and_round_trip() {
        let mut rng = StdRng::seed_from_u64(0x5ab1e);
        for _ in 0..20 {
            let mut game = GameState::new_game();
            let mut snapshots = Vec::new();

            for _ in 0..60 {
                let moves = generate_legal_moves(&mut game);
                let Some(&mv) = moves.choose(&mut rng) else {
                    break;
                };
                for candidate in &moves {
                    apply_move(&mut game, *candidate);
                    assert!(!is_king_in_check(&game, candidate.color()));
                    undo_move(&mut game);
                }
                snapshots.push(game.clone());
                apply_move(&mut game, mv);
            }

            while let Some(expected) = snapshots.pop() {
                undo_move(&mut game);
                assert_eq!(game, expected);
            }
            assert_eq!(game, GameState::new_game());
        }
    }
}
