//! Search coordinator: runs iterative deepening on a dedicated worker thread.
//!
//! Callers talk to the worker with tagged request/response messages. Every
//! search gets a fresh generation from the shared counter, so starting a new
//! search cancels the old one, and responses from superseded generations are
//! dropped on the receiving side before the caller ever sees them.

use std::fmt;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::errors::{ChessError, ChessResult};
use crate::game_state::{chess_types::Color, game_state::GameState};
use crate::search::iterative_deepening::{search, DepthResult, ScoredLine, SearchConfig};
use crate::search::threading::{SearchCancellation, SharedSearchState};

/// Caller-chosen identifier for one search request, echoed back unchanged.
///
/// Opaque to the coordinator: JSON numbers and strings are both accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SearchToken {
    Number(u64),
    Text(String),
}

impl fmt::Display for SearchToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchToken::Number(n) => write!(f, "{n}"),
            SearchToken::Text(text) => write!(f, "{text:?}"),
        }
    }
}

impl From<u64> for SearchToken {
    fn from(n: u64) -> Self {
        SearchToken::Number(n)
    }
}

impl From<&str> for SearchToken {
    fn from(text: &str) -> Self {
        SearchToken::Text(text.to_owned())
    }
}

impl From<String> for SearchToken {
    fn from(text: String) -> Self {
        SearchToken::Text(text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SearchRequest {
    #[serde(rename_all = "camelCase")]
    Search {
        token: SearchToken,
        /// FEN of the position to search.
        position: String,
        #[serde(default)]
        time_budget_ms: Option<u64>,
        side_to_maximize: Color,
    },
    Cancel {
        token: SearchToken,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SearchResponse {
    /// A depth finished; lines are ranked best first.
    Progress {
        token: SearchToken,
        depth: u32,
        lines: Vec<ScoredLine>,
    },
    /// Final report: the last completed depth (0 if none) and its lines.
    Done {
        token: SearchToken,
        depth: u32,
        lines: Vec<ScoredLine>,
    },
    Error {
        token: SearchToken,
        message: String,
    },
}

impl SearchResponse {
    #[inline]
    pub fn token(&self) -> &SearchToken {
        match self {
            SearchResponse::Progress { token, .. }
            | SearchResponse::Done { token, .. }
            | SearchResponse::Error { token, .. } => token,
        }
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SearchResponse::Progress { .. })
    }
}

/// Live state of the coordinator.
///
/// A search leaves `Searching` straight for `Idle`; how it ended is kept
/// separately as [`SearchCoordinator::last_outcome`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoordinatorState {
    Idle,
    /// `depth` is the depth currently being searched.
    Searching { token: SearchToken, depth: u32 },
}

/// How the most recent search left `Searching`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// `done` was delivered with this final depth.
    Done { token: SearchToken, depth: u32 },
    /// Cancelled explicitly or superseded by a newer search.
    Cancelled { token: SearchToken },
    /// The worker answered with an `error`.
    Failed { token: SearchToken },
}

struct SearchJob {
    token: SearchToken,
    generation: u64,
    position: String,
    side_to_maximize: Color,
    time_budget: Duration,
}

struct WorkerEvent {
    generation: u64,
    response: SearchResponse,
}

#[derive(Debug, Clone)]
struct ActiveSearch {
    token: SearchToken,
    generation: u64,
    depth: u32,
}

pub struct SearchCoordinator {
    config: SearchConfig,
    shared: Arc<SharedSearchState>,
    jobs: Option<Sender<SearchJob>>,
    events: Receiver<WorkerEvent>,
    worker: Option<JoinHandle<()>>,
    active: Option<ActiveSearch>,
    last_outcome: Option<SearchOutcome>,
}

impl SearchCoordinator {
    pub fn new(config: SearchConfig) -> ChessResult<Self> {
        let shared = SharedSearchState::new();
        let (job_tx, job_rx) = mpsc::channel::<SearchJob>();
        let (event_tx, event_rx) = mpsc::channel::<WorkerEvent>();

        let worker_shared = Arc::clone(&shared);
        let worker = thread::Builder::new()
            .name("search-worker".to_owned())
            .spawn(move || worker_loop(job_rx, event_tx, worker_shared, config))
            .map_err(|err| ChessError::WorkerSpawn(err.to_string()))?;

        Ok(Self {
            config,
            shared,
            jobs: Some(job_tx),
            events: event_rx,
            worker: Some(worker),
            active: None,
            last_outcome: None,
        })
    }

    #[inline]
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn state(&self) -> CoordinatorState {
        match &self.active {
            Some(active) => CoordinatorState::Searching {
                token: active.token.clone(),
                depth: active.depth,
            },
            None => CoordinatorState::Idle,
        }
    }

    /// Terminal outcome of the last search to leave `Searching`, if any.
    #[inline]
    pub fn last_outcome(&self) -> Option<&SearchOutcome> {
        self.last_outcome.as_ref()
    }

    /// Queue a search of the FEN `position`, cancelling any search in flight.
    ///
    /// A position that fails to parse is reported asynchronously as an
    /// [`SearchResponse::Error`] for `token`.
    pub fn start_search(
        &mut self,
        token: impl Into<SearchToken>,
        position: &str,
        side_to_maximize: Color,
        time_budget_ms: Option<u64>,
    ) -> ChessResult<()> {
        let token = token.into();
        if let Some(previous) = self.active.take() {
            log::info!("search {} superseded by {}", previous.token, token);
            self.last_outcome = Some(SearchOutcome::Cancelled {
                token: previous.token,
            });
        }
        let generation = self.shared.begin_generation();
        let time_budget = self.config.normalized_time_budget(time_budget_ms);

        let job = SearchJob {
            token: token.clone(),
            generation,
            position: position.to_owned(),
            side_to_maximize,
            time_budget,
        };
        self.jobs
            .as_ref()
            .ok_or(ChessError::WorkerDisconnected)?
            .send(job)
            .map_err(|_| ChessError::WorkerDisconnected)?;

        self.active = Some(ActiveSearch {
            token,
            generation,
            depth: 1,
        });
        Ok(())
    }

    /// Convenience wrapper that serializes `game_state` first.
    pub fn start_search_from(
        &mut self,
        token: impl Into<SearchToken>,
        game_state: &GameState,
        side_to_maximize: Color,
        time_budget_ms: Option<u64>,
    ) -> ChessResult<()> {
        self.start_search(token, &game_state.get_fen(), side_to_maximize, time_budget_ms)
    }

    /// Cancel the active search if it carries `token`. Returns whether
    /// anything was cancelled; other tokens are ignored.
    pub fn cancel(&mut self, token: impl Into<SearchToken>) -> bool {
        let token = token.into();
        match self.active.take() {
            Some(active) if active.token == token => {
                self.shared.cancel_generation(active.generation);
                log::info!("search {token} cancelled");
                self.last_outcome = Some(SearchOutcome::Cancelled { token });
                true
            }
            Some(active) => {
                self.active = Some(active);
                log::trace!("ignoring cancel for inactive token {token}");
                false
            }
            None => {
                log::trace!("ignoring cancel for inactive token {token}");
                false
            }
        }
    }

    pub fn handle_request(&mut self, request: SearchRequest) -> ChessResult<()> {
        match request {
            SearchRequest::Search {
                token,
                position,
                time_budget_ms,
                side_to_maximize,
            } => self.start_search(token, &position, side_to_maximize, time_budget_ms),
            SearchRequest::Cancel { token } => {
                self.cancel(token);
                Ok(())
            }
        }
    }

    /// Next response for the active search, waiting at most `timeout`.
    pub fn recv_timeout(&mut self, timeout: Duration) -> ChessResult<Option<SearchResponse>> {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.events.recv_timeout(remaining) {
                Ok(event) => {
                    if let Some(response) = self.accept(event) {
                        return Ok(Some(response));
                    }
                }
                Err(RecvTimeoutError::Timeout) => return Ok(None),
                Err(RecvTimeoutError::Disconnected) => return Err(ChessError::WorkerDisconnected),
            }
        }
    }

    pub fn try_recv(&mut self) -> ChessResult<Option<SearchResponse>> {
        loop {
            match self.events.try_recv() {
                Ok(event) => {
                    if let Some(response) = self.accept(event) {
                        return Ok(Some(response));
                    }
                }
                Err(TryRecvError::Empty) => return Ok(None),
                Err(TryRecvError::Disconnected) => return Err(ChessError::WorkerDisconnected),
            }
        }
    }

    fn accept(&mut self, event: WorkerEvent) -> Option<SearchResponse> {
        let active = match self.active.as_mut() {
            Some(active) if active.generation == event.generation => active,
            _ => {
                log::trace!(
                    "dropping stale response for token {}",
                    event.response.token()
                );
                return None;
            }
        };

        match &event.response {
            SearchResponse::Progress { depth, .. } => active.depth = depth + 1,
            SearchResponse::Done { token, depth, .. } => {
                self.last_outcome = Some(SearchOutcome::Done {
                    token: token.clone(),
                    depth: *depth,
                });
                self.active = None;
            }
            SearchResponse::Error { token, .. } => {
                self.last_outcome = Some(SearchOutcome::Failed {
                    token: token.clone(),
                });
                self.active = None;
            }
        }
        Some(event.response)
    }
}

impl Drop for SearchCoordinator {
    fn drop(&mut self) {
        if let Some(active) = self.active.take() {
            self.shared.cancel_generation(active.generation);
        }
        // Closing the job channel ends the worker loop.
        self.jobs.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::warn!("search worker panicked");
            }
        }
    }
}

fn worker_loop(
    jobs: Receiver<SearchJob>,
    events: Sender<WorkerEvent>,
    shared: Arc<SharedSearchState>,
    config: SearchConfig,
) {
    for job in jobs {
        if job.generation != shared.current_generation() {
            log::trace!("skipping superseded search {}", job.token);
            continue;
        }
        if run_job(&job, &events, &shared, &config).is_err() {
            break;
        }
    }
    log::debug!("search worker exiting");
}

fn run_job(
    job: &SearchJob,
    events: &Sender<WorkerEvent>,
    shared: &Arc<SharedSearchState>,
    config: &SearchConfig,
) -> Result<(), mpsc::SendError<WorkerEvent>> {
    let send = |response: SearchResponse| {
        events.send(WorkerEvent {
            generation: job.generation,
            response,
        })
    };

    let game_state = match GameState::from_fen(&job.position) {
        Ok(game_state) => game_state,
        Err(err) => {
            log::warn!("rejecting search {}: {err}", job.token);
            return send(SearchResponse::Error {
                token: job.token.clone(),
                message: err.to_string(),
            });
        }
    };

    log::info!(
        "search {} started: {} to maximize, budget {} ms",
        job.token,
        job.side_to_maximize,
        job.time_budget.as_millis()
    );

    let cancellation = SearchCancellation::for_generation(Arc::clone(shared), job.generation);
    let mut session = search(
        &game_state,
        job.side_to_maximize,
        job.time_budget,
        cancellation,
        config,
    );

    for DepthResult { depth, lines } in session.by_ref() {
        send(SearchResponse::Progress {
            token: job.token.clone(),
            depth,
            lines,
        })?;
    }

    if session.is_cancelled() {
        log::debug!(
            "search {} stopped after depth {}",
            job.token,
            session.completed_depth()
        );
        return Ok(());
    }

    log::info!(
        "search {} finished: depth {}, {} nodes",
        job.token,
        session.completed_depth(),
        session.nodes()
    );
    send(SearchResponse::Done {
        token: job.token.clone(),
        depth: session.completed_depth(),
        lines: session.best_lines().to_vec(),
    })
}
