use crate::game_state::{chess_types::*, game_state::GameState};
use crate::moves::piece_offsets::{
    offset_square, BISHOP_DIRECTIONS, KING_OFFSETS, KNIGHT_OFFSETS, ROOK_DIRECTIONS,
};

#[inline]
pub fn king_square(game_state: &GameState, color: Color) -> Option<Square> {
    game_state
        .occupied_squares()
        .find(|(_, piece)| piece.kind == PieceKind::King && piece.color == color)
        .map(|(sq, _)| sq)
}

#[inline]
pub fn is_king_in_check(game_state: &GameState, color: Color) -> bool {
    let Some(king_sq) = king_square(game_state, color) else {
        return false;
    };
    is_square_attacked(game_state, king_sq, color.opposite())
}

/// True if any `attacker_color` piece pseudo-attacks `square`.
///
/// Occupancy of `square` itself is ignored, so empty transit squares and
/// squares holding either color are treated alike.
pub fn is_square_attacked(game_state: &GameState, square: Square, attacker_color: Color) -> bool {
    let is_attacker = |sq: Square, kinds: &[PieceKind]| {
        matches!(
            game_state.piece_at(sq),
            Some(piece) if piece.color == attacker_color && kinds.contains(&piece.kind)
        )
    };

    // A pawn attacks diagonally forward, so look one step backward from the target.
    let back = -attacker_color.pawn_direction();
    for file_delta in [-1, 1] {
        if let Some(sq) = offset_square(square, back, file_delta) {
            if is_attacker(sq, &[PieceKind::Pawn]) {
                return true;
            }
        }
    }

    for (dr, df) in KNIGHT_OFFSETS {
        if let Some(sq) = offset_square(square, dr, df) {
            if is_attacker(sq, &[PieceKind::Knight]) {
                return true;
            }
        }
    }

    for (dr, df) in KING_OFFSETS {
        if let Some(sq) = offset_square(square, dr, df) {
            if is_attacker(sq, &[PieceKind::King]) {
                return true;
            }
        }
    }

    let line_attackers = [
        (&ROOK_DIRECTIONS, [PieceKind::Rook, PieceKind::Queen]),
        (&BISHOP_DIRECTIONS, [PieceKind::Bishop, PieceKind::Queen]),
    ];
    for (directions, kinds) in line_attackers {
        for &(dr, df) in directions {
            if let Some(blocker) = first_piece_along(game_state, square, dr, df) {
                if is_attacker(blocker, &kinds) {
                    return true;
                }
            }
        }
    }

    false
}

fn first_piece_along(game_state: &GameState, from: Square, dr: i8, df: i8) -> Option<Square> {
    let mut current = offset_square(from, dr, df);
    while let Some(sq) = current {
        if game_state.piece_at(sq).is_some() {
            return Some(sq);
        }
        current = offset_square(sq, dr, df);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::algebraic::algebraic_to_square;

    fn sq(name: &str) -> Square {
        algebraic_to_square(name).expect("square should parse")
    }

    #[test]
    fn pawn_attacks_only_diagonally_forward() {
        let game = GameState::from_fen("4k3/8/8/8/8/3P4/8/4K3 w - - 0 1").expect("FEN should parse");
        assert!(is_square_attacked(&game, sq("c4"), Color::White));
        assert!(is_square_attacked(&game, sq("e4"), Color::White));
        assert!(!is_square_attacked(&game, sq("d4"), Color::White));
        assert!(!is_square_attacked(&game, sq("c2"), Color::White));
    }

    #[test]
    fn sliders_are_blocked_by_any_piece() {
        let game =
            GameState::from_fen("4k3/8/8/8/R2p3q/8/8/4K3 w - - 0 1").expect("FEN should parse");
        assert!(is_square_attacked(&game, sq("c4"), Color::White));
        assert!(is_square_attacked(&game, sq("d4"), Color::White));
        assert!(!is_square_attacked(&game, sq("e4"), Color::White));
        // The black queen sees e1 along the diagonal.
        assert!(is_square_attacked(&game, sq("e1"), Color::Black));
        assert!(is_king_in_check(&game, Color::White));
    }

    #[test]
    fn missing_king_is_never_in_check() {
        let game = GameState::from_fen("8/8/8/8/8/8/8/q7 w - - 0 1").expect("FEN should parse");
        assert_eq!(king_square(&game, Color::White), None);
        assert!(!is_king_in_check(&game, Color::White));
    }
}
