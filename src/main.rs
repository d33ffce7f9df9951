//! Sitegraph main entry point
//!
//! This is the command-line interface for the sitegraph site mapper.

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use sitegraph::output::CrawlReport;
use sitegraph::{Crawler, HttpFetcher, DEFAULT_CONCURRENCY};
use std::process::ExitCode;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;
use url::Url;

/// Sitegraph: a single-host site mapper
///
/// Sitegraph fetches every page reachable from a start URL without leaving
/// the start URL's host, then prints which pages were visited and what each
/// one links to.
#[derive(Parser, Debug)]
#[command(name = "sitegraph")]
#[command(version)]
#[command(about = "Map every page of a single host", long_about = None)]
struct Cli {
    /// URL to start crawling from (must include a scheme)
    #[arg(value_name = "START_URL")]
    start_url: String,

    /// Maximum number of pages fetched at the same time
    #[arg(
        long,
        value_name = "N",
        default_value_t = DEFAULT_CONCURRENCY,
        value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..)
    )]
    concurrency: usize,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS", default_value_t = 30)]
    timeout: u64,

    /// Print the report as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress progress and non-error log output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Help and version are not failures; everything else is.
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            };
            let _ = e.print();
            return code;
        }
    };

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let start = match parse_start_url(&cli.start_url) {
        Ok(url) => url,
        Err(message) => {
            eprintln!("{}", message);
            print_usage();
            return ExitCode::FAILURE;
        }
    };

    match run(&cli, start).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("An unexpected error occurred: {:#}", e);
            print_usage();
            ExitCode::FAILURE
        }
    }
}

/// Runs the crawl described by the command line and prints the report
async fn run(cli: &Cli, start: Url) -> anyhow::Result<()> {
    if !cli.quiet {
        println!("Starting to crawl {}, please wait", start);
    }

    let fetcher = HttpFetcher::with_timeout(Duration::from_secs(cli.timeout))?;
    let crawler = Crawler::with_concurrency(fetcher, cli.concurrency);

    let started = Instant::now();
    let result = crawler.crawl(start).await?;
    let report = CrawlReport::new(&result, started.elapsed());

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report);
    }

    Ok(())
}

/// Validates the start URL, mapping parse failures to user-facing messages
fn parse_start_url(raw: &str) -> Result<Url, String> {
    match Url::parse(raw) {
        Ok(url) => Ok(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            Err(format!("'{}' must contain a scheme", raw))
        }
        Err(_) => Err(format!("'{}' is not a valid uri", raw)),
    }
}

fn print_usage() {
    eprintln!("{}", Cli::command().render_usage());
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// An explicit `RUST_LOG` wins over the verbosity flags.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        let default = match verbose {
            0 => "sitegraph=info,warn",
            1 => "sitegraph=debug,info",
            2 => "sitegraph=trace,debug",
            _ => "trace",
        };
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
