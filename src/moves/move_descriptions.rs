//! Move value produced by the generator and consumed by apply/undo.
//!
//! A move carries everything needed to apply and reverse it without looking
//! at the board again: the moving piece, any captured piece, and the special
//! move flags. Moves are transient; only the undo stack keeps them around.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::game_state::chess_types::*;
use crate::utils::algebraic::{serde_square, square_to_algebraic};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Move {
    #[serde(with = "serde_square")]
    pub from: Square,
    #[serde(with = "serde_square")]
    pub to: Square,
    pub piece: Piece,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub captured: Option<Piece>,
    #[serde(default)]
    pub is_double_pawn_push: bool,
    #[serde(default)]
    pub is_en_passant: bool,
    /// Promotion always resolves to a queen.
    #[serde(default)]
    pub is_promotion: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub castle: Option<CastleSide>,
}

impl Move {
    /// Plain move of `piece` with no capture or special flags.
    #[inline]
    pub const fn quiet(from: Square, to: Square, piece: Piece) -> Self {
        Self {
            from,
            to,
            piece,
            captured: None,
            is_double_pawn_push: false,
            is_en_passant: false,
            is_promotion: false,
            castle: None,
        }
    }

    /// Normal move or capture depending on what sits on the destination.
    #[inline]
    pub const fn to_target(from: Square, to: Square, piece: Piece, target: Option<Piece>) -> Self {
        Self {
            captured: target,
            ..Self::quiet(from, to, piece)
        }
    }

    #[inline]
    pub const fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    #[inline]
    pub const fn color(&self) -> Color {
        self.piece.color
    }

    /// Coordinate notation used by the move-input layer (`e2e4`, `e7e8q`).
    pub fn to_long_algebraic(&self) -> String {
        let mut out = square_to_algebraic(self.from);
        out.push_str(&square_to_algebraic(self.to));
        if self.is_promotion {
            out.push('q');
        }
        out
    }

    /// Display notation used for principal variations (`e2-e4`, `e7-e8=Q`).
    pub fn to_display_notation(&self) -> String {
        format!(
            "{}-{}{}",
            square_to_algebraic(self.from),
            square_to_algebraic(self.to),
            if self.is_promotion { "=Q" } else { "" }
        )
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_long_algebraic())
    }
}
