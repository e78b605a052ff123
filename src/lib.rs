//! Crate root module declarations for the Sable Chess engine.
//!
//! Exposes the position engine (game state, move generation, terminal
//! detection), the search layer (scoring, iterative deepening, worker
//! coordinator), and text utilities so the worker binary, tests, and benches
//! share stable module paths.

pub mod errors;

pub mod game_state {
    pub mod chess_rules;
    pub mod chess_types;
    pub mod game_state;
    pub mod undo_state;
}

pub mod moves {
    pub mod move_descriptions;
    pub mod piece_offsets;
}

pub mod move_generation {
    pub mod game_result;
    pub mod legal_move_apply;
    pub mod legal_move_checks;
    pub mod legal_move_generator;
    pub mod legal_moves_king;
    pub mod legal_moves_knight;
    pub mod legal_moves_pawn;
    pub mod legal_moves_sliding;
    pub mod perft;
}

pub mod search {
    pub mod board_scoring;
    pub mod coordinator;
    pub mod iterative_deepening;
    pub mod threading;
}

pub mod utils {
    pub mod algebraic;
    pub mod fen_generator;
    pub mod fen_parser;
    pub mod long_algebraic;
    pub mod principal_variation;
    pub mod render_game_state;
}
