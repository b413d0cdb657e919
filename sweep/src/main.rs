//! sweep - delete your posts using a Twitter/X archive
//!
//! Reads the tweet data files of an extracted archive, shows the posts that
//! would be deleted, and after confirmation deletes them through the API,
//! pausing to stay under the write rate limit.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use libsweep::api::twitter::TwitterClient;
use libsweep::api::PostApi;
use libsweep::logging::{LogFormat, LoggingConfig};
use libsweep::rate_limiter::TokioPacer;
use libsweep::selector::Selection;
use libsweep::service::{DeleteRequest, DeleteService, RunOutcome};
use libsweep::{Config, Credentials, SortOrder, SweepError};
use std::path::PathBuf;
use tracing::debug;

/// Exit status when a pause was interrupted with Ctrl-C
const EXIT_INTERRUPTED: i32 = 130;

#[derive(Parser, Debug)]
#[command(name = "sweep")]
#[command(version, about = "Delete tweets listed in a Twitter/X archive", long_about = r#"Delete tweets listed in a Twitter/X archive.

EXAMPLES:
    # Preview the 20 oldest tweets without deleting anything
    sweep delete --archive ~/twitter-archive --sort oldest --limit 20 --dry-run

    # Delete the next 100 newest tweets after the first 100
    sweep delete --archive ~/twitter-archive --offset 100

CREDENTIALS:
    All four OAuth 1.0a values are required, as flags or environment
    variables (SWEEP_CONSUMER_KEY, SWEEP_CONSUMER_SECRET, SWEEP_ACCESS_TOKEN,
    SWEEP_ACCESS_TOKEN_SECRET).

EXIT CODES:
    0   - Success (including dry run and cancelled runs)
    1   - Archive, configuration or runtime error
    2   - Missing credentials or invalid usage
    3   - Invalid selection (limit, offset)
    130 - Interrupted during a rate limit pause
"#)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// API consumer key
    #[arg(long, global = true, env = "SWEEP_CONSUMER_KEY", hide_env_values = true)]
    consumer_key: Option<String>,

    /// API consumer secret
    #[arg(long, global = true, env = "SWEEP_CONSUMER_SECRET", hide_env_values = true)]
    consumer_secret: Option<String>,

    /// Access token
    #[arg(long, global = true, env = "SWEEP_ACCESS_TOKEN", hide_env_values = true)]
    access_token: Option<String>,

    /// Access token secret
    #[arg(long, global = true, env = "SWEEP_ACCESS_TOKEN_SECRET", hide_env_values = true)]
    access_token_secret: Option<String>,

    /// Number of tweets to process at once (maximum 100)
    #[arg(long, global = true, default_value_t = 100, value_name = "N")]
    limit: usize,

    /// Configuration file (default: ~/.config/sweep/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log format: text, json or pretty
    #[arg(long, global = true, value_name = "FORMAT")]
    log_format: Option<LogFormat>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Delete tweets based on IDs extracted from the archive
    Delete {
        /// Path to the extracted archive directory
        #[arg(long, value_name = "DIR")]
        archive: PathBuf,

        /// Sort order: newest, oldest or original
        #[arg(long, default_value = "newest", value_name = "ORDER")]
        sort: SortOrder,

        /// Number of tweets to skip after sorting
        #[arg(long, default_value_t = 0, value_name = "N")]
        offset: usize,

        /// Only show tweets that would be deleted
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    LoggingConfig::from_env(cli.log_format, cli.verbose).init();
    debug!("sweep started with command: {:?}", cli.command);

    match run(cli).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            debug!("run failed: {:?}", e);
            eprintln!("Error: {:#}", e);
            let code = e
                .downcast_ref::<SweepError>()
                .map(SweepError::exit_code)
                .unwrap_or(1);
            std::process::exit(code);
        }
    }
}

async fn run(cli: Cli) -> Result<i32> {
    let credentials = Credentials::from_options(
        cli.consumer_key,
        cli.consumer_secret,
        cli.access_token,
        cli.access_token_secret,
    )?;

    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command {
        Commands::Delete {
            archive,
            sort,
            offset,
            dry_run,
        } => {
            let request = DeleteRequest {
                archive,
                selection: Selection::new(sort, offset, cli.limit)?,
                dry_run,
            };
            delete(request, credentials, &config).await
        }
    }
}

async fn delete(request: DeleteRequest, credentials: Credentials, config: &Config) -> Result<i32> {
    let service = DeleteService::new(config.pacing.policy());
    let mut input = std::io::stdin().lock();
    let mut out = std::io::stdout();

    let outcome = service
        .run(&request, &mut input, &mut out, &TokioPacer, || {
            let client = TwitterClient::new(credentials, &config.api)?;
            Ok(Box::new(client) as Box<dyn PostApi>)
        })
        .await?;

    match outcome {
        RunOutcome::Completed(summary) if summary.interrupted => Ok(EXIT_INTERRUPTED),
        _ => Ok(0),
    }
}
