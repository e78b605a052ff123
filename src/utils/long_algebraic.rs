//! Coordinate move text (`e2e4`, `e7e8q`) for the move-input layer.
//!
//! Text is resolved against the legal moves of the position, so the result is
//! always a generator-produced move that is safe to hand to `apply_move`.

use crate::errors::{ChessError, ChessResult};
use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_apply::apply_move;
use crate::move_generation::legal_move_generator::legal_moves;
use crate::moves::move_descriptions::Move;
use crate::utils::algebraic::algebraic_to_square;

/// Resolve coordinate text to the matching legal move.
///
/// The promotion suffix is optional; every promotion resolves to a queen.
pub fn parse_long_algebraic(long_algebraic: &str, game_state: &GameState) -> ChessResult<Move> {
    let text = long_algebraic.trim();
    if !text.is_ascii() || (text.len() != 4 && text.len() != 5) {
        return Err(ChessError::InvalidMoveText(long_algebraic.to_owned()));
    }

    let from = algebraic_to_square(&text[0..2])
        .map_err(|_| ChessError::InvalidMoveText(long_algebraic.to_owned()))?;
    let to = algebraic_to_square(&text[2..4])
        .map_err(|_| ChessError::InvalidMoveText(long_algebraic.to_owned()))?;

    let has_promotion_suffix = match text.as_bytes().get(4) {
        None => false,
        Some(b'q' | b'r' | b'b' | b'n' | b'Q' | b'R' | b'B' | b'N') => true,
        Some(_) => return Err(ChessError::InvalidMoveText(long_algebraic.to_owned())),
    };

    legal_moves(game_state)
        .into_iter()
        .find(|mv| mv.from == from && mv.to == to && (!has_promotion_suffix || mv.is_promotion))
        .ok_or_else(|| ChessError::IllegalMove(long_algebraic.to_owned()))
}

/// Play a whitespace-separated list of coordinate moves on `game_state`.
pub fn play_long_algebraic_moves(game_state: &mut GameState, moves: &str) -> ChessResult<()> {
    for lan in moves.split_whitespace() {
        let mv = parse_long_algebraic(lan, game_state)?;
        apply_move(game_state, mv);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{parse_long_algebraic, play_long_algebraic_moves};
    use crate::errors::ChessError;
    use crate::game_state::chess_types::*;
    use crate::game_state::game_state::GameState;

    #[test]
    fn resolves_flags_from_the_position() {
        let game = GameState::from_fen("8/8/8/8/8/8/4P3/4K2k w - - 0 1").expect("FEN should parse");
        let mv = parse_long_algebraic("e2e4", &game).expect("move should parse");
        assert!(mv.is_double_pawn_push);
        assert_eq!(mv.to_long_algebraic(), "e2e4");

        let castle_state =
            GameState::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").expect("FEN should parse");
        let castle = parse_long_algebraic("e1c1", &castle_state).expect("castle should parse");
        assert_eq!(castle.castle, Some(CastleSide::Queenside));
    }

    #[test]
    fn promotion_suffix_is_optional_and_always_queen() {
        let game = GameState::from_fen("k7/4P3/8/8/8/8/8/K7 w - - 0 1").expect("FEN should parse");
        let plain = parse_long_algebraic("e7e8", &game).expect("promotion should parse");
        let knight = parse_long_algebraic("e7e8n", &game).expect("suffix should be accepted");
        assert!(plain.is_promotion);
        assert_eq!(plain, knight);
        assert_eq!(plain.to_long_algebraic(), "e7e8q");
    }

    #[test]
    fn rejects_malformed_and_illegal_text() {
        let game = GameState::new_game();
        assert!(matches!(
            parse_long_algebraic("e2", &game),
            Err(ChessError::InvalidMoveText(_))
        ));
        assert!(matches!(
            parse_long_algebraic("e2e4x", &game),
            Err(ChessError::InvalidMoveText(_))
        ));
        assert_eq!(
            parse_long_algebraic("e2e5", &game),
            Err(ChessError::IllegalMove("e2e5".to_owned()))
        );
    }

    #[test]
    fn plays_move_lists_and_stops_on_first_error() {
        let mut game = GameState::new_game();
        play_long_algebraic_moves(&mut game, "e2e4 e7e5 g1f3").expect("moves should play");
        assert_eq!(game.side_to_move, Color::Black);
        assert_eq!(game.history_len(), 3);

        let err = play_long_algebraic_moves(&mut game, "b8c6 a1a8").expect_err("rook is blocked");
        assert_eq!(err, ChessError::IllegalMove("a1a8".to_owned()));
        assert_eq!(game.history_len(), 4);
    }
}
