use crate::game_state::{chess_types::*, game_state::GameState};
use crate::moves::move_descriptions::Move;
use crate::moves::piece_offsets::offset_square;

/// Pseudo-legal pawn moves from `from`: push, double push, captures, en passant.
pub fn generate_pawn_moves(game_state: &GameState, from: Square, pawn: Piece, out: &mut Vec<Move>) {
    let side = pawn.color;
    let dir = side.pawn_direction();
    let start_rank = if side == Color::White { 1 } else { 6 };
    let promotion_rank = if side == Color::White { 7 } else { 0 };

    if let Some(one_step) = offset_square(from, dir, 0) {
        if game_state.piece_at(one_step).is_none() {
            let mut push = Move::quiet(from, one_step, pawn);
            push.is_promotion = rank_of(one_step) == promotion_rank;
            out.push(push);

            if rank_of(from) == start_rank {
                if let Some(two_step) = offset_square(from, dir * 2, 0) {
                    if game_state.piece_at(two_step).is_none() {
                        let mut double = Move::quiet(from, two_step, pawn);
                        double.is_double_pawn_push = true;
                        out.push(double);
                    }
                }
            }
        }
    }

    // captures and en-passant
    for file_delta in [-1i8, 1i8] {
        let Some(to) = offset_square(from, dir, file_delta) else {
            continue;
        };

        match game_state.piece_at(to) {
            Some(target) if target.color != side => {
                let mut capture = Move::to_target(from, to, pawn, Some(target));
                capture.is_promotion = rank_of(to) == promotion_rank;
                out.push(capture);
            }
            Some(_) => {}
            None if game_state.en_passant_square == Some(to) => {
                // The captured pawn sits beside the mover, not on the target square.
                let mut en_passant =
                    Move::to_target(from, to, pawn, Some(Piece::new(PieceKind::Pawn, side.opposite())));
                en_passant.is_en_passant = true;
                out.push(en_passant);
            }
            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::generate_pawn_moves;
    use crate::game_state::{chess_types::*, game_state::GameState};
    use crate::moves::move_descriptions::Move;
    use crate::utils::algebraic::algebraic_to_square;

    fn pawn_moves(fen: &str, from: &str) -> Vec<Move> {
        let game = GameState::from_fen(fen).expect("FEN should parse");
        let from = algebraic_to_square(from).expect("square should parse");
        let pawn = game.piece_at(from).expect("pawn should be on from-square");
        let mut out = Vec::new();
        generate_pawn_moves(&game, from, pawn, &mut out);
        out
    }

    #[test]
    fn start_rank_pawn_has_single_and_double_push() {
        let moves = pawn_moves("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1", "e2");
        let lan: Vec<String> = moves.iter().map(Move::to_long_algebraic).collect();
        assert_eq!(lan, vec!["e2e3", "e2e4"]);
        assert!(moves[1].is_double_pawn_push);
    }

    #[test]
    fn blocked_pawn_cannot_jump() {
        let moves = pawn_moves("4k3/8/8/8/8/4n3/4P3/4K3 w - - 0 1", "e2");
        assert!(moves.is_empty());
    }

    #[test]
    fn capture_to_last_rank_is_flagged_promotion() {
        let moves = pawn_moves("3rk3/4P3/8/8/8/8/8/4K3 w - - 0 1", "e7");
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].to_long_algebraic(), "e7d8q");
        assert!(moves[0].is_promotion);
        assert_eq!(moves[0].captured.map(|p| p.kind), Some(PieceKind::Rook));
    }

    #[test]
    fn en_passant_synthesizes_adjacent_captured_pawn() {
        let moves = pawn_moves("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1", "e5");
        let ep = moves
            .iter()
            .find(|m| m.is_en_passant)
            .expect("en-passant capture should be generated");
        assert_eq!(ep.to_long_algebraic(), "e5d6");
        assert_eq!(ep.captured, Some(Piece::new(PieceKind::Pawn, Color::Black)));
    }
}
