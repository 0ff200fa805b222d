// issue-lifespan command line entry point.
// Reads the repository list, runs the aggregation and prints one line per repository.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use issue_lifespan::cache::{self, DEFAULT_CACHE_ROOT};
use issue_lifespan::config::Config;
use issue_lifespan::error::Result;
use issue_lifespan::github::ApiClient;
use issue_lifespan::lifespan::{Aggregator, parse_repo_list};

#[derive(Parser)]
#[command(name = "issue-lifespan")]
#[command(about = "Average time-to-close of GitHub issues per repository")]
struct Cli {
    /// Repositories (owner/name) or organizations (owner/) to report on
    repos: Vec<String>,

    /// File with one identifier per line; read before positional identifiers
    #[arg(long, short = 'f')]
    repos_file: Option<PathBuf>,

    /// Cache root directory
    #[arg(long, default_value = DEFAULT_CACHE_ROOT)]
    cache_dir: PathBuf,

    /// Bypass the response cache entirely
    #[arg(long)]
    no_cache: bool,

    /// Remove the cache directory before running
    #[arg(long)]
    clear_cache: bool,

    /// Increase verbosity (-v debug, -vv trace). Default is info.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

/// Initialize tracing on stderr with the given verbosity level.
///
/// - 0: info (default)
/// - 1: debug (-v)
/// - 2+: trace (-vv)
fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    // Allow RUST_LOG to override if set
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level.to_string()));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn load_ids(cli: &Cli) -> Result<Vec<String>> {
    let mut ids = match &cli.repos_file {
        Some(path) => parse_repo_list(&std::fs::read_to_string(path)?),
        None => Vec::new(),
    };
    ids.extend(cli.repos.iter().cloned());
    Ok(ids)
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::from_env()?;
    tracing::debug!(?config, "loaded configuration");

    let ids = load_ids(&cli)?;
    if ids.is_empty() {
        tracing::warn!("no repositories given, nothing to do");
        return Ok(());
    }

    if cli.clear_cache {
        tracing::info!(path = %cli.cache_dir.display(), "clearing cache");
        cache::delete_dir(&cli.cache_dir)?;
    }

    let client = ApiClient::new(config, &cli.cache_dir)?;
    Aggregator::new(&client)
        .caching(!cli.no_cache)
        .expand_and_process_with(&ids, |report| println!("{}", report))
        .await;

    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{}", err);
            ExitCode::FAILURE
        }
    }
}
