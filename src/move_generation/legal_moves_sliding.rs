use crate::game_state::{chess_types::*, game_state::GameState};
use crate::moves::move_descriptions::Move;
use crate::moves::piece_offsets::offset_square;

/// Walk each ray until the edge, an own piece (stop), or an enemy piece
/// (capture, then stop).
pub fn generate_sliding_moves(
    game_state: &GameState,
    from: Square,
    piece: Piece,
    directions: &[(i8, i8)],
    out: &mut Vec<Move>,
) {
    for &(dr, df) in directions {
        let mut current = offset_square(from, dr, df);
        while let Some(to) = current {
            match game_state.piece_at(to) {
                None => out.push(Move::quiet(from, to, piece)),
                Some(target) => {
                    if target.color != piece.color {
                        out.push(Move::to_target(from, to, piece, Some(target)));
                    }
                    break;
                }
            }
            current = offset_square(to, dr, df);
        }
    }
}
