use crate::game_state::{chess_types::*, game_state::GameState};
use crate::moves::move_descriptions::Move;
use crate::moves::piece_offsets::{offset_square, KNIGHT_OFFSETS};

pub fn generate_knight_moves(game_state: &GameState, from: Square, knight: Piece, out: &mut Vec<Move>) {
    for (dr, df) in KNIGHT_OFFSETS {
        let Some(to) = offset_square(from, dr, df) else {
            continue;
        };
        match game_state.piece_at(to) {
            Some(target) if target.color == knight.color => {}
            target => out.push(Move::to_target(from, to, knight, target)),
        }
    }
}
