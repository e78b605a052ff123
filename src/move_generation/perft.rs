use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_apply::with_move;
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::legal_move_generator::{LegalMoveGenerator, MoveGenerator};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerftCounts {
    pub nodes: usize,
    pub captures: usize,
    pub en_passant: usize,
    pub castles: usize,
    pub promotions: usize,
    pub checks: usize,
    pub checkmates: usize,
}

impl PerftCounts {
    fn merge(&mut self, rhs: PerftCounts) {
        self.nodes += rhs.nodes;
        self.captures += rhs.captures;
        self.en_passant += rhs.en_passant;
        self.castles += rhs.castles;
        self.promotions += rhs.promotions;
        self.checks += rhs.checks;
        self.checkmates += rhs.checkmates;
    }
}

#[inline]
pub fn perft_legal(game_state: &mut GameState, depth: u8) -> PerftCounts {
    perft(&LegalMoveGenerator, game_state, depth)
}

pub fn perft<G: MoveGenerator>(generator: &G, game_state: &mut GameState, depth: u8) -> PerftCounts {
    if depth == 0 {
        return PerftCounts {
            nodes: 1,
            ..PerftCounts::default()
        };
    }

    let moves = generator.generate_legal_moves(game_state);
    let mut total = PerftCounts::default();

    for mv in moves {
        let child = with_move(game_state, mv, |next| {
            if depth > 1 {
                return perft(generator, next, depth - 1);
            }

            let mut leaf = PerftCounts {
                nodes: 1,
                captures: usize::from(mv.is_capture()),
                en_passant: usize::from(mv.is_en_passant),
                castles: usize::from(mv.castle.is_some()),
                promotions: usize::from(mv.is_promotion),
                ..PerftCounts::default()
            };
            if is_king_in_check(next, next.side_to_move) {
                leaf.checks = 1;
                if generator.generate_legal_moves(next).is_empty() {
                    leaf.checkmates = 1;
                }
            }
            leaf
        });
        total.merge(child);
    }

    total
}

#[cfg(test)]
mod tests {
    use super::*;

    const KIWIPETE_FEN: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 0";

    #[test]
    fn perft_depth_zero_counts_single_node() {
        let mut game = GameState::new_game();
        assert_eq!(
            perft_legal(&mut game, 0),
            PerftCounts {
                nodes: 1,
                ..PerftCounts::default()
            }
        );
    }

    #[test]
    fn startpos_reference_counts() {
        let mut game = GameState::new_game();
        assert_eq!(perft_legal(&mut game, 1).nodes, 20);
        assert_eq!(perft_legal(&mut game, 2).nodes, 400);

        let depth3 = perft_legal(&mut game, 3);
        assert_eq!(depth3.nodes, 8902);
        assert_eq!(depth3.captures, 34);
        assert_eq!(depth3.checks, 12);
        assert_eq!(depth3.checkmates, 0);
        assert_eq!(game, GameState::new_game());
    }

    #[test]
    fn kiwipete_exercises_castling_and_en_passant() {
        let mut game = GameState::from_fen(KIWIPETE_FEN).expect("FEN should parse");
        let depth1 = perft_legal(&mut game, 1);
        assert_eq!(depth1.nodes, 48);
        assert_eq!(depth1.captures, 8);
        assert_eq!(depth1.castles, 2);

        let depth2 = perft_legal(&mut game, 2);
        assert_eq!(
            depth2,
            PerftCounts {
                nodes: 2039,
                captures: 351,
                en_passant: 1,
                castles: 91,
                promotions: 0,
                checks: 3,
                checkmates: 0,
            }
        );
    }

    #[test]
    fn rook_endgame_reference_counts() {
        let mut game =
            GameState::from_fen("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1").expect("FEN should parse");
        let depth3 = perft_legal(&mut game, 3);
        assert_eq!(depth3.nodes, 2812);
        assert_eq!(depth3.captures, 209);
        assert_eq!(depth3.en_passant, 2);
        assert_eq!(depth3.checks, 267);
    }
}
