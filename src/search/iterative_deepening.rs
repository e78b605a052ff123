//! Iterative deepening search with minimax alpha-beta pruning.
//!
//! The search owns its own copy of the position and mutates it in place with
//! apply/undo. Each depth is exposed lazily through [`IterativeDeepening`],
//! which yields only iterations whose root search ran to completion.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::game_state::{chess_types::Color, game_state::GameState};
use crate::move_generation::game_result::{game_result_from_moves, GameResult};
use crate::move_generation::legal_move_apply::with_move;
use crate::move_generation::legal_move_generator::{legal_moves, LegalMoveGenerator, MoveGenerator};
use crate::moves::move_descriptions::Move;
use crate::search::board_scoring::{BoardScorer, MaterialScorer};
use crate::search::threading::{SearchCancellation, SearchLimits};

/// Stand-in for an infinite score: forced mates and timeout sentinels.
pub const INFINITE_SCORE: i32 = 1_000_000;

pub const MIN_TIME_BUDGET_MS: u64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    pub time_budget_ms: u64,
    pub max_depth: u32,
    pub max_lines: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            time_budget_ms: 1500,
            max_depth: 64,
            max_lines: 5,
        }
    }
}

impl SearchConfig {
    /// Budget for a request, falling back to the configured default and
    /// clamping up to [`MIN_TIME_BUDGET_MS`].
    pub fn normalized_time_budget(&self, requested_ms: Option<u64>) -> Duration {
        let ms = requested_ms.unwrap_or(self.time_budget_ms).max(MIN_TIME_BUDGET_MS);
        Duration::from_millis(ms)
    }
}

/// One ranked root move and the principal variation behind it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredLine {
    /// Absolute score, positive favours White.
    pub score: i32,
    /// Score from the maximizing side's point of view; lines sort on this.
    pub display_score: i32,
    pub line: Vec<Move>,
}

impl ScoredLine {
    #[inline]
    pub fn first_move(&self) -> Option<Move> {
        self.line.first().copied()
    }
}

/// A fully completed iteration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepthResult {
    pub depth: u32,
    pub lines: Vec<ScoredLine>,
}

/// Root search output. `timed_out` means the lines are partial and must not
/// be reported as a completed depth.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RootSearchResult {
    pub lines: Vec<ScoredLine>,
    pub timed_out: bool,
}

struct NodeResult {
    score: i32,
    line: Vec<Move>,
    timed_out: bool,
}

impl NodeResult {
    #[inline]
    fn exact(score: i32) -> Self {
        Self {
            score,
            line: Vec::new(),
            timed_out: false,
        }
    }

    #[inline]
    fn timeout(score: i32, line: Vec<Move>) -> Self {
        Self {
            score,
            line,
            timed_out: true,
        }
    }
}

#[inline]
const fn terminal_score(result: GameResult) -> i32 {
    match result {
        GameResult::WhiteWins => INFINITE_SCORE,
        GameResult::BlackWins => -INFINITE_SCORE,
        GameResult::Draw => 0,
    }
}

#[inline]
const fn worst_score(maximizing: bool) -> i32 {
    if maximizing {
        -INFINITE_SCORE
    } else {
        INFINITE_SCORE
    }
}

/// Borrowed pieces one search needs at every node.
pub struct SearchContext<'a, G: MoveGenerator, S: BoardScorer> {
    generator: &'a G,
    scorer: &'a S,
    limits: &'a SearchLimits,
    nodes: u64,
}

impl<'a, G: MoveGenerator, S: BoardScorer> SearchContext<'a, G, S> {
    pub fn new(generator: &'a G, scorer: &'a S, limits: &'a SearchLimits) -> Self {
        Self {
            generator,
            scorer,
            limits,
            nodes: 0,
        }
    }

    #[inline]
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    /// Rank every legal root move at `depth` (at least 1).
    ///
    /// All children are kept, but alpha/beta still narrow as the root
    /// progresses so later subtrees prune against earlier results. Lines come
    /// back sorted by `display_score`, ties in generation order.
    pub fn root_search(
        &mut self,
        game_state: &mut GameState,
        depth: u32,
        maximizing: bool,
    ) -> RootSearchResult {
        let moves = self.generator.generate_legal_moves(game_state);
        let mut alpha = -INFINITE_SCORE;
        let mut beta = INFINITE_SCORE;
        let mut lines = Vec::with_capacity(moves.len());

        for mv in moves {
            if self.limits.is_cancelled() {
                return RootSearchResult {
                    lines,
                    timed_out: true,
                };
            }

            let child = with_move(game_state, mv, |next| {
                self.minimax(next, depth.saturating_sub(1), alpha, beta, !maximizing)
            });
            if child.timed_out {
                return RootSearchResult {
                    lines,
                    timed_out: true,
                };
            }

            let mut line = Vec::with_capacity(child.line.len() + 1);
            line.push(mv);
            line.extend(child.line);
            lines.push(ScoredLine {
                score: child.score,
                display_score: if maximizing { child.score } else { -child.score },
                line,
            });

            if maximizing {
                alpha = alpha.max(child.score);
            } else {
                beta = beta.min(child.score);
            }
        }

        lines.sort_by(|a, b| b.display_score.cmp(&a.display_score));
        RootSearchResult {
            lines,
            timed_out: false,
        }
    }

    fn minimax(
        &mut self,
        game_state: &mut GameState,
        depth: u32,
        mut alpha: i32,
        mut beta: i32,
        maximizing: bool,
    ) -> NodeResult {
        if self.limits.should_stop() {
            return NodeResult::timeout(worst_score(maximizing), Vec::new());
        }
        self.nodes += 1;

        let moves = self.generator.generate_legal_moves(game_state);
        if let Some(result) = game_result_from_moves(game_state, &moves) {
            return NodeResult::exact(terminal_score(result));
        }
        if depth == 0 || moves.is_empty() {
            return NodeResult::exact(self.scorer.score(game_state));
        }

        let mut best = worst_score(maximizing);
        let mut best_line: Vec<Move> = Vec::new();

        for mv in moves {
            if self.limits.is_cancelled() {
                return NodeResult::timeout(best, best_line);
            }

            let child = with_move(game_state, mv, |next| {
                self.minimax(next, depth - 1, alpha, beta, !maximizing)
            });
            if child.timed_out {
                return NodeResult::timeout(best, best_line);
            }

            let improves = if maximizing {
                child.score > best
            } else {
                child.score < best
            };
            // The first child always seeds the line so forced losses still
            // carry a variation.
            if improves || best_line.is_empty() {
                best = child.score;
                best_line.clear();
                best_line.push(mv);
                best_line.extend(child.line);
            }

            if maximizing {
                alpha = alpha.max(best);
            } else {
                beta = beta.min(best);
            }
            if beta <= alpha {
                break;
            }
        }

        NodeResult {
            score: best,
            line: best_line,
            timed_out: false,
        }
    }
}

/// Lazy sequence of completed depths for one search session.
///
/// Iteration ends when the time budget runs out, cancellation is observed,
/// the depth cap is reached, or the root has no legal moves. Afterwards
/// [`IterativeDeepening::completed_depth`] and
/// [`IterativeDeepening::best_lines`] describe the final `done` report.
pub struct IterativeDeepening<G: MoveGenerator = LegalMoveGenerator, S: BoardScorer = MaterialScorer>
{
    game_state: GameState,
    generator: G,
    scorer: S,
    limits: SearchLimits,
    maximizing: bool,
    max_depth: u32,
    max_lines: usize,
    next_depth: u32,
    completed_depth: u32,
    best_lines: Vec<ScoredLine>,
    nodes: u64,
    finished: bool,
}

impl IterativeDeepening {
    pub fn new(
        game_state: GameState,
        side_to_maximize: Color,
        limits: SearchLimits,
        config: &SearchConfig,
    ) -> Self {
        Self::with_components(
            game_state,
            side_to_maximize,
            limits,
            config,
            LegalMoveGenerator,
            MaterialScorer,
        )
    }
}

impl<G: MoveGenerator, S: BoardScorer> IterativeDeepening<G, S> {
    pub fn with_components(
        game_state: GameState,
        side_to_maximize: Color,
        limits: SearchLimits,
        config: &SearchConfig,
        generator: G,
        scorer: S,
    ) -> Self {
        Self {
            game_state,
            generator,
            scorer,
            limits,
            maximizing: side_to_maximize == Color::White,
            max_depth: config.max_depth,
            max_lines: config.max_lines,
            next_depth: 1,
            completed_depth: 0,
            best_lines: Vec::new(),
            nodes: 0,
            finished: false,
        }
    }

    /// Last fully completed depth, 0 if none.
    #[inline]
    pub fn completed_depth(&self) -> u32 {
        self.completed_depth
    }

    /// Lines from the last fully completed depth.
    #[inline]
    pub fn best_lines(&self) -> &[ScoredLine] {
        &self.best_lines
    }

    #[inline]
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.limits.is_cancelled()
    }

    /// Drive the search to the end and return the final report.
    pub fn run_to_completion(mut self) -> DepthResult {
        while self.next().is_some() {}
        DepthResult {
            depth: self.completed_depth,
            lines: self.best_lines,
        }
    }
}

impl<G: MoveGenerator, S: BoardScorer> Iterator for IterativeDeepening<G, S> {
    type Item = DepthResult;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished || self.next_depth > self.max_depth || self.limits.should_stop() {
            self.finished = true;
            return None;
        }

        let depth = self.next_depth;
        let mut ctx = SearchContext::new(&self.generator, &self.scorer, &self.limits);
        let result = ctx.root_search(&mut self.game_state, depth, self.maximizing);
        self.nodes += ctx.nodes();

        if result.timed_out || self.limits.is_cancelled() {
            self.finished = true;
            return None;
        }

        if result.lines.is_empty() {
            // Terminal root: report the attempted depth with no lines.
            self.completed_depth = depth;
            self.best_lines.clear();
            self.finished = true;
            return None;
        }

        let mut lines = result.lines;
        lines.truncate(self.max_lines);
        self.completed_depth = depth;
        self.best_lines = lines.clone();
        self.next_depth += 1;

        log::debug!(
            "depth {depth} complete: {} nodes, best {}",
            self.nodes,
            lines
                .first()
                .and_then(ScoredLine::first_move)
                .map(|mv| mv.to_long_algebraic())
                .unwrap_or_default()
        );

        Some(DepthResult { depth, lines })
    }
}

/// Start a search over a private copy of `game_state`.
pub fn search(
    game_state: &GameState,
    side_to_maximize: Color,
    time_budget: Duration,
    cancellation: SearchCancellation,
    config: &SearchConfig,
) -> IterativeDeepening {
    let limits = SearchLimits::new(time_budget, cancellation);
    IterativeDeepening::new(game_state.clone(), side_to_maximize, limits, config)
}

/// First move of the top line, or the first legal move when the search
/// produced nothing.
pub fn best_move_or_fallback(lines: &[ScoredLine], game_state: &GameState) -> Option<Move> {
    lines
        .first()
        .and_then(ScoredLine::first_move)
        .or_else(|| legal_moves(game_state).first().copied())
}
