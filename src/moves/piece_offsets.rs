//! Fixed step and ray tables for the mailbox board.
//!
//! Offsets are `(rank_delta, file_delta)` pairs. Their order fixes the
//! per-piece move order emitted by the generators, which keeps search output
//! reproducible.

use crate::game_state::chess_types::{file_of, rank_of, square_at, Square};

pub const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (2, 1),
    (2, -1),
    (-2, 1),
    (-2, -1),
    (1, 2),
    (1, -2),
    (-1, 2),
    (-1, -2),
];

pub const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

pub const ROOK_DIRECTIONS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

pub const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

pub const QUEEN_DIRECTIONS: [(i8, i8); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

/// Square reached by stepping `(rank_delta, file_delta)`, if still on the board.
#[inline]
pub const fn offset_square(square: Square, rank_delta: i8, file_delta: i8) -> Option<Square> {
    let rank = rank_of(square) as i8 + rank_delta;
    let file = file_of(square) as i8 + file_delta;
    if rank < 0 || rank > 7 || file < 0 || file > 7 {
        return None;
    }
    Some(square_at(rank as u8, file as u8))
}
