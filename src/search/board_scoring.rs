//! Pluggable board evaluation.
//!
//! Search delegates static scoring to this trait so richer heuristics can be
//! swapped in without touching the search code. Scores are absolute: positive
//! favours White, negative favours Black.

use crate::game_state::chess_rules::piece_value;
use crate::game_state::{chess_types::*, game_state::GameState};

pub trait BoardScorer: Send + Sync {
    /// Static score in centipawns from White's point of view.
    fn score(&self, game_state: &GameState) -> i32;
}

/// Material-only evaluation with no positional terms.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaterialScorer;

impl BoardScorer for MaterialScorer {
    fn score(&self, game_state: &GameState) -> i32 {
        game_state
            .occupied_squares()
            .map(|(_, piece)| match piece.color {
                Color::White => piece_value(piece.kind),
                Color::Black => -piece_value(piece.kind),
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::{BoardScorer, MaterialScorer};
    use crate::game_state::game_state::GameState;

    #[test]
    fn starting_position_is_balanced() {
        assert_eq!(MaterialScorer.score(&GameState::new_game()), 0);
    }

    #[test]
    fn material_is_signed_by_color() {
        let white_up_rook =
            GameState::from_fen("4k3/8/8/8/8/8/8/R3K3 b - - 0 1").expect("FEN should parse");
        assert_eq!(MaterialScorer.score(&white_up_rook), 500);

        let black_up_knight_and_pawn =
            GameState::from_fen("4k3/4p3/2n5/8/8/8/8/4K3 w - - 0 1").expect("FEN should parse");
        assert_eq!(MaterialScorer.score(&black_up_knight_and_pawn), -420);
    }
}
