//! Core mutable board state representation.
//!
//! `GameState` is the central model for the engine. It stores a mailbox board,
//! turn/state flags, clocks, and the undo stack used by apply/undo style
//! workflows in both live play and search.

use crate::errors::ChessResult;
use crate::game_state::chess_types::*;
use crate::utils::fen_generator::generate_fen;
use crate::utils::fen_parser::parse_fen;

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// Full game state, mutated in place by `apply_move` / `undo_move`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    // --- Mailbox board, indexed by square (a1 == 0) ---
    pub board: [Option<Piece>; 64],

    // --- Side and state flags ---
    pub side_to_move: Color,
    pub castling_rights: CastlingRights,
    pub en_passant_square: Option<Square>,

    // --- Clocks / move counters ---
    pub halfmove_clock: u16,
    pub fullmove_number: u16,

    // --- Apply/undo stack ---
    pub undo_stack: Vec<UndoState>,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            board: [None; 64],

            side_to_move: Color::White,
            castling_rights: 0,
            en_passant_square: None,

            halfmove_clock: 0,
            fullmove_number: 1,

            undo_stack: Vec::new(),
        }
    }
}

impl GameState {
    #[inline]
    pub fn new_empty() -> Self {
        Self::default()
    }

    /// Standard starting position.
    pub fn new_game() -> Self {
        let mut game_state = Self::new_empty();
        for (file, kind) in BACK_RANK.iter().copied().enumerate() {
            let file = file as u8;
            game_state.set_piece(square_at(0, file), Some(Piece::new(kind, Color::White)));
            game_state.set_piece(square_at(1, file), Some(Piece::new(PieceKind::Pawn, Color::White)));
            game_state.set_piece(square_at(6, file), Some(Piece::new(PieceKind::Pawn, Color::Black)));
            game_state.set_piece(square_at(7, file), Some(Piece::new(kind, Color::Black)));
        }
        game_state.castling_rights = CASTLE_ALL;
        game_state
    }

    /// Back to the standard starting position, dropping all history.
    pub fn reset(&mut self) {
        *self = Self::new_game();
    }

    #[inline]
    pub fn from_fen(fen: &str) -> ChessResult<Self> {
        parse_fen(fen)
    }

    #[inline]
    pub fn get_fen(&self) -> String {
        generate_fen(self)
    }

    #[inline]
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.board[square as usize]
    }

    #[inline]
    pub fn set_piece(&mut self, square: Square, piece: Option<Piece>) {
        self.board[square as usize] = piece;
    }

    /// Number of applied-but-not-undone moves.
    #[inline]
    pub fn history_len(&self) -> usize {
        self.undo_stack.len()
    }

    #[inline]
    pub fn has_castling_right(&self, right: CastlingRights) -> bool {
        self.castling_rights & right != 0
    }

    /// Iterate occupied squares in board scan order.
    pub fn occupied_squares(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.board
            .iter()
            .enumerate()
            .filter_map(|(sq, piece)| piece.map(|p| (sq as Square, p)))
    }
}
