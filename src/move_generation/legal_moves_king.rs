use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_checks::is_square_attacked;
use crate::moves::move_descriptions::Move;
use crate::moves::piece_offsets::{offset_square, KING_OFFSETS};

const KING_HOME_FILE: u8 = 4;

pub fn generate_king_moves(game_state: &GameState, from: Square, king: Piece, out: &mut Vec<Move>) {
    for (dr, df) in KING_OFFSETS {
        let Some(to) = offset_square(from, dr, df) else {
            continue;
        };
        match game_state.piece_at(to) {
            Some(target) if target.color == king.color => {}
            target => out.push(Move::to_target(from, to, king, target)),
        }
    }

    generate_castling_moves(game_state, from, king, out);
}

fn generate_castling_moves(game_state: &GameState, king_from: Square, king: Piece, out: &mut Vec<Move>) {
    let side = king.color;
    let enemy = side.opposite();
    let home_rank = side.home_rank();

    if king_from != square_at(home_rank, KING_HOME_FILE) {
        return;
    }

    // Cannot castle out of check.
    if is_square_attacked(game_state, king_from, enemy) {
        return;
    }

    for castle_side in [CastleSide::Kingside, CastleSide::Queenside] {
        if !game_state.has_castling_right(castle_side.right(side)) {
            continue;
        }

        let (rook_file, _) = castle_side.rook_files();
        let rook_square = square_at(home_rank, rook_file);
        if game_state.piece_at(rook_square) != Some(Piece::new(PieceKind::Rook, side)) {
            continue;
        }

        // Every square strictly between king and rook must be empty.
        let (low, high) = if rook_file < KING_HOME_FILE {
            (rook_file + 1, KING_HOME_FILE)
        } else {
            (KING_HOME_FILE + 1, rook_file)
        };
        if (low..high).any(|file| game_state.piece_at(square_at(home_rank, file)).is_some()) {
            continue;
        }

        // Transit and destination squares must be safe.
        let (transit_file, dest_file) = match castle_side {
            CastleSide::Kingside => (KING_HOME_FILE + 1, KING_HOME_FILE + 2),
            CastleSide::Queenside => (KING_HOME_FILE - 1, KING_HOME_FILE - 2),
        };
        let transit = square_at(home_rank, transit_file);
        let dest = square_at(home_rank, dest_file);
        if is_square_attacked(game_state, transit, enemy) || is_square_attacked(game_state, dest, enemy) {
            continue;
        }

        let mut castle = Move::quiet(king_from, dest, king);
        castle.castle = Some(castle_side);
        out.push(castle);
    }
}

#[cfg(test)]
mod tests {
    use super::generate_king_moves;
    use crate::game_state::{chess_types::*, game_state::GameState};
    use crate::moves::move_descriptions::Move;
    use crate::move_generation::legal_move_checks::king_square;

    fn castles(fen: &str, color: Color) -> Vec<String> {
        let game = GameState::from_fen(fen).expect("FEN should parse");
        let from = king_square(&game, color).expect("king should exist");
        let king = game.piece_at(from).expect("king should be on its square");
        let mut out = Vec::new();
        generate_king_moves(&game, from, king, &mut out);
        out.iter()
            .filter(|m| m.castle.is_some())
            .map(Move::to_long_algebraic)
            .collect()
    }

    #[test]
    fn both_sides_available_on_open_back_rank() {
        assert_eq!(
            castles("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1", Color::White),
            vec!["e1g1", "e1c1"]
        );
        assert_eq!(
            castles("r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1", Color::Black),
            vec!["e8g8", "e8c8"]
        );
    }

    #[test]
    fn no_castling_out_of_check() {
        assert!(castles("r3k2r/8/8/8/8/8/8/R3K2r w KQ - 0 1", Color::White).is_empty());
        assert!(castles("4r1k1/8/8/8/8/8/8/R3K2R w KQ - 0 1", Color::White).is_empty());
    }

    #[test]
    fn no_castling_through_attacked_transit_square() {
        // Black rook on f8 covers f1; queenside is still fine.
        assert_eq!(
            castles("5rk1/8/8/8/8/8/8/R3K2R w KQ - 0 1", Color::White),
            vec!["e1c1"]
        );
    }

    #[test]
    fn queenside_needs_b_file_empty_but_not_safe() {
        // b1 attacked by the black rook on b8 does not matter.
        assert_eq!(
            castles("1r2k3/8/8/8/8/8/8/R3K3 w Q - 0 1", Color::White),
            vec!["e1c1"]
        );
        assert!(castles("4k3/8/8/8/8/8/8/RN2K3 w Q - 0 1", Color::White).is_empty());
    }

    #[test]
    fn missing_right_blocks_castling() {
        assert!(castles("4k3/8/8/8/8/8/8/R3K2R w - - 0 1", Color::White).is_empty());
    }
}
