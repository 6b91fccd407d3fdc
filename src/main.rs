//! CLI entry point: one full harvest run ending in a CSV file.
//!
//! Exit codes: 0 on normal completion, including runs with partial page
//! failures; 1 when the discovery request fails or page 1 carries no data.

use clap::Parser;
use devpost_harvest::{FetchConfig, FetchSession, write_csv};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "devpost-harvest",
    version,
    about = "Harvest the Devpost hackathon listing into a CSV file"
)]
struct Cli {
    /// Output CSV path
    #[arg(long, default_value = "devpost_hackathons.csv")]
    output: PathBuf,

    /// Override the listing API base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Override the concurrency ceiling for page requests
    #[arg(long)]
    concurrency: Option<usize>,

    /// Override the total attempt budget per page
    #[arg(long)]
    max_attempts: Option<u32>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();

    let cli = Cli::parse();

    let mut config = FetchConfig::default();
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }
    if let Some(concurrency) = cli.concurrency {
        config.max_concurrent = concurrency;
    }
    if let Some(max_attempts) = cli.max_attempts {
        config.max_attempts = max_attempts;
    }

    let session = match FetchSession::new(config) {
        Ok(session) => session,
        Err(error) => {
            eprintln!("failed to initialize fetch session: {error}");
            return ExitCode::FAILURE;
        }
    };

    let discovery = match session.discover().await {
        Ok(discovery) => discovery,
        Err(error) => {
            eprintln!("failed to fetch page 1, exiting: {error}");
            return ExitCode::FAILURE;
        }
    };

    println!("Total hackathons: {}", discovery.total_count);
    println!("Per page: {}", discovery.per_page);
    println!("Total pages: {}", discovery.total_pages);

    if discovery.first_page.is_empty() {
        eprintln!("page 1 returned no records, exiting");
        return ExitCode::FAILURE;
    }

    let report = session.fetch_all(discovery).await;

    println!("Fetched {} hackathons total", report.records.len());
    if !report.failed_pages.is_empty() {
        let first_twenty: Vec<u32> = report.failed_pages.iter().take(20).copied().collect();
        eprintln!(
            "Warning: {} pages failed to fetch (first 20: {:?})",
            report.failed_pages.len(),
            first_twenty
        );
    }

    // A run with partial page failures still writes whatever was collected
    match write_csv(&cli.output, &report.records) {
        Ok(rows) => {
            println!("Saved {} hackathons to {}", rows, cli.output.display());
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("failed to write {}: {error}", cli.output.display());
            ExitCode::FAILURE
        }
    }
}
