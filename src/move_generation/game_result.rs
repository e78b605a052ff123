//! Terminal position detection: checkmate, stalemate, and the fifty-move rule.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::game_state::chess_rules::FIFTY_MOVE_RULE_HALFMOVES;
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::legal_move_generator::generate_legal_moves;
use crate::moves::move_descriptions::Move;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameResult {
    WhiteWins,
    BlackWins,
    Draw,
}

impl GameResult {
    #[inline]
    pub const fn win_for(color: Color) -> Self {
        match color {
            Color::White => GameResult::WhiteWins,
            Color::Black => GameResult::BlackWins,
        }
    }
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameResult::WhiteWins => write!(f, "White wins"),
            GameResult::BlackWins => write!(f, "Black wins"),
            GameResult::Draw => write!(f, "Draw"),
        }
    }
}

pub fn game_result(game_state: &mut GameState) -> Option<GameResult> {
    let moves = generate_legal_moves(game_state);
    game_result_from_moves(game_state, &moves)
}

/// Result given the already generated legal moves for the side to move.
///
/// A side with no legal moves is mated if in check and stalemated otherwise;
/// mate takes precedence over the fifty-move draw.
pub fn game_result_from_moves(game_state: &GameState, legal_moves: &[Move]) -> Option<GameResult> {
    let side = game_state.side_to_move;
    if legal_moves.is_empty() {
        if is_king_in_check(game_state, side) {
            return Some(GameResult::win_for(side.opposite()));
        }
        return Some(GameResult::Draw);
    }
    if game_state.halfmove_clock >= FIFTY_MOVE_RULE_HALFMOVES {
        return Some(GameResult::Draw);
    }
    None
}

/// One-line status for the rendering layer.
pub fn status_line(game_state: &mut GameState) -> String {
    match game_result(game_state) {
        Some(result) => result.to_string(),
        None => format!("Turn: {}", game_state.side_to_move),
    }
}
