use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bus_board::config::{ConfigError, ConfigStore, DEFAULT_LOCATION, edinburgh};
use bus_board::domain::CuratedEntry;
use bus_board::engine::{BoardError, Clock, DepartureBoard, EngineConfig, SystemClock};
use bus_board::ingest::{self, IngestConfig, Ingestor};
use bus_board::source::DepartureSource;
use bus_board::store::{DepartureStore, StoreConfig};
use bus_board::tfe::{TfeClient, TfeConfig};

#[derive(Parser, Debug)]
#[command(
    name = "bus-board",
    version,
    about = "Curated bus departures for a handful of Edinburgh stops"
)]
struct Args {
    /// Location to show
    #[arg(default_value = DEFAULT_LOCATION)]
    location: String,

    /// Show every configured location
    #[arg(long)]
    all: bool,

    /// Print JSON instead of a text board
    #[arg(long)]
    json: bool,

    /// Keep running, ingesting in the background and reprinting every refresh
    #[arg(long)]
    watch: bool,

    /// With --watch, query TfE on every reprint instead of the ingested store
    #[arg(long, requires = "watch")]
    live: bool,

    /// JSON tables file replacing the built-in locations and rules
    #[arg(long, env = "BUS_BOARD_CONFIG")]
    config: Option<PathBuf>,

    /// Override the TfE API base URL
    #[arg(long, env = "TFE_BASE_URL")]
    tfe_base_url: Option<String>,
}

/// One location's curated board.
#[derive(serde::Serialize)]
struct Board {
    location: String,
    departures: Vec<CuratedEntry>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Logs go to stderr so stdout carries only the board
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = match load_config(args.config.as_ref()) {
        Ok(config) => Arc::new(config),
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut tfe_config = TfeConfig::default();
    if let Some(url) = &args.tfe_base_url {
        tfe_config = tfe_config.with_base_url(url);
    }
    let tfe = match TfeClient::new(tfe_config) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error: failed to create TfE client: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let settings = EngineConfig::default();

    if !args.watch {
        let board = DepartureBoard::new(&config, &tfe, &SystemClock, &settings);
        let boards = match build_boards(&board, &config, &args).await {
            Ok(boards) => boards,
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::FAILURE;
            }
        };
        return match print_boards(&boards, args.json) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("Error: failed to encode board: {}", e);
                ExitCode::FAILURE
            }
        };
    }

    // Fail on a bad location before starting anything in the background
    if !args.all && config.resolve_location(&args.location).is_none() {
        eprintln!("Error: {}", BoardError::UnknownLocation(args.location.clone()));
        return ExitCode::FAILURE;
    }

    let ingest_config = IngestConfig::default();

    if args.live {
        watch(&config, &tfe, &settings, &args, ingest_config.times_interval).await
    } else {
        let store = DepartureStore::new(&StoreConfig::default());
        let ingestor = Arc::new(Ingestor::new(tfe, store.clone(), config.stop_ids()));

        info!(stops = ingestor.stops().len(), "Priming departure store...");
        let (times, meta) = ingestor.refresh_all().await;
        info!(
            times = times.refreshed,
            colours = meta.refreshed,
            failed = times.failed + meta.failed,
            stored = store.departures_count().await,
            "Departure store primed"
        );

        let handles = ingest::spawn(Arc::clone(&ingestor), &ingest_config);
        let code = watch(&config, &store, &settings, &args, ingest_config.times_interval).await;
        handles.abort();
        code
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<ConfigStore, ConfigError> {
    match path {
        Some(path) => {
            info!(path = %path.display(), "Loading tables");
            ConfigStore::load(path)
        }
        None => ConfigStore::new(edinburgh()),
    }
}

/// Curate the requested location, or every location with `--all`.
///
/// With `--all` the valid service set is computed once and shared.
async fn build_boards<S: DepartureSource, C: Clock>(
    board: &DepartureBoard<'_, S, C>,
    config: &ConfigStore,
    args: &Args,
) -> Result<Vec<Board>, BoardError> {
    if !args.all {
        let departures = board.board(&args.location).await?;
        return Ok(vec![Board {
            location: args.location.clone(),
            departures,
        }]);
    }

    let valid = board.valid_services().await;
    let mut boards = Vec::with_capacity(config.locations().len());
    for location in config.locations() {
        let departures = board.curate(&location.name, &valid).await?;
        boards.push(Board {
            location: location.name.clone(),
            departures,
        });
    }
    Ok(boards)
}

/// A single board prints as a bare JSON array; several print as a list of
/// `{location, departures}` objects.
fn print_boards(boards: &[Board], json: bool) -> Result<(), serde_json::Error> {
    if json {
        let text = match boards {
            [single] => serde_json::to_string_pretty(&single.departures)?,
            _ => serde_json::to_string_pretty(boards)?,
        };
        println!("{}", text);
        return Ok(());
    }

    for board in boards {
        if boards.len() > 1 {
            println!("== {} ==", board.location);
        }
        if board.departures.is_empty() {
            println!("No departures");
        }
        for entry in &board.departures {
            println!("{}", entry);
        }
        if boards.len() > 1 {
            println!();
        }
    }
    Ok(())
}

/// Reprint the board every `period` until interrupted.
async fn watch<S: DepartureSource>(
    config: &ConfigStore,
    source: &S,
    settings: &EngineConfig,
    args: &Args,
    period: Duration,
) -> ExitCode {
    let board = DepartureBoard::new(config, source, &SystemClock, settings);
    let mut interval = tokio::time::interval(period);
    // Shared across iterations; a Ctrl-C during a redraw still ends the loop
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = interval.tick() => {}
            _ = &mut ctrl_c => {
                info!("Interrupted, stopping");
                return ExitCode::SUCCESS;
            }
        }

        match build_boards(&board, config, args).await {
            Ok(boards) => {
                if !args.json {
                    println!("Updated {}", chrono::Local::now().format("%H:%M:%S"));
                }
                if let Err(e) = print_boards(&boards, args.json) {
                    eprintln!("Error: failed to encode board: {}", e);
                    return ExitCode::FAILURE;
                }
            }
            Err(e) => {
                // Only reachable if the tables change underneath us
                warn!(error = %e, "Board unavailable");
            }
        }
    }
}
