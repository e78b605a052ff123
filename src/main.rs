//! JSON-lines search worker.
//!
//! Reads one request per stdin line (`{"type":"search",...}` or
//! `{"type":"cancel","token":..}`) and writes one response per stdout line.
//! Logs go to stderr so stdout stays a clean protocol stream.

use std::error::Error;
use std::io::{self, BufRead, Write};
use std::sync::mpsc::{channel, TryRecvError};
use std::thread;
use std::time::Duration;

use clap::Parser;

use sable_chess::search::coordinator::{
    CoordinatorState, SearchCoordinator, SearchRequest, SearchResponse,
};
use sable_chess::search::iterative_deepening::SearchConfig;

const RESPONSE_POLL: Duration = Duration::from_millis(10);

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Time budget used when a request omits `timeBudgetMs`
    #[arg(long, default_value_t = 1500)]
    default_time_ms: u64,

    /// Upper bound on iterative deepening depth
    #[arg(long, default_value_t = 64)]
    max_depth: u32,

    /// Log filter when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() {
    let args = Args::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, &args.log_level),
    )
    .format(|buf, record| writeln!(buf, "[{}] {}: {}", record.level(), record.target(), record.args()))
    .write_style(env_logger::WriteStyle::Never)
    .target(env_logger::Target::Stderr)
    .init();

    let config = SearchConfig {
        time_budget_ms: args.default_time_ms,
        max_depth: args.max_depth,
        ..SearchConfig::default()
    };

    if let Err(err) = run(config) {
        log::error!("fatal error: {err}");
        std::process::exit(1);
    }
}

fn run(config: SearchConfig) -> Result<(), Box<dyn Error>> {
    let mut coordinator = SearchCoordinator::new(config)?;
    log::info!(
        "search worker ready: default budget {} ms, depth cap {}",
        coordinator.config().time_budget_ms,
        coordinator.config().max_depth
    );
    let (line_tx, line_rx) = channel::<String>();

    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if line_tx.send(line).is_err() {
                break;
            }
        }
    });

    let mut stdout = io::stdout();
    let mut input_closed = false;

    loop {
        loop {
            match line_rx.try_recv() {
                Ok(line) => handle_line(&mut coordinator, &line)?,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    input_closed = true;
                    break;
                }
            }
        }

        if let Some(response) = coordinator.recv_timeout(RESPONSE_POLL)? {
            write_response(&mut stdout, &response)?;
        }

        if input_closed && coordinator.state() == CoordinatorState::Idle {
            break;
        }
    }

    Ok(())
}

fn handle_line(coordinator: &mut SearchCoordinator, line: &str) -> Result<(), Box<dyn Error>> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(());
    }

    match serde_json::from_str::<SearchRequest>(trimmed) {
        Ok(request) => coordinator.handle_request(request)?,
        Err(err) => log::warn!("ignoring malformed request: {err}"),
    }
    Ok(())
}

fn write_response(out: &mut impl Write, response: &SearchResponse) -> io::Result<()> {
    serde_json::to_writer(&mut *out, response)?;
    out.write_all(b"\n")?;
    out.flush()
}
