//! Seed-data loader for the ECR Viewer development environment.
//!
//! Zips every record folder below `baseECR/<subfolder>/` in memory and posts
//! each archive to the viewer's process-zip endpoint, at most eight at a time.
//! Exits with status 1 if any upload failed.

mod app;
mod config;
mod error;
mod upload;
mod utils;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use app::SeedLoader;
use config::{parse_subfolders, LoaderConfig, DEFAULT_MAX_IN_FLIGHT, DEFAULT_UPLOAD_URL};

#[derive(Parser, Debug)]
#[command(name = "seed-loader")]
#[command(about = "Zip subfolders and upload them to the ECR Viewer API.")]
struct Args {
    /// Directory containing `baseECR/`
    #[arg(long, env = "SEED_DATA_BASE_DIR", default_value = ".")]
    base_dir: PathBuf,

    /// Comma-separated subfolder names under `baseECR/`
    #[arg(long, env = "SEED_DATA_DIRECTORIES")]
    directories: Option<String>,

    /// Process-zip endpoint
    #[arg(long, env = "SEED_DATA_UPLOAD_URL", default_value = DEFAULT_UPLOAD_URL)]
    url: String,

    /// Maximum uploads in flight at once
    #[arg(long, default_value_t = DEFAULT_MAX_IN_FLIGHT)]
    max_in_flight: usize,

    /// Per-request timeout; unset keeps the HTTP client defaults
    #[arg(long)]
    request_timeout_secs: Option<u64>,

    /// Prefix each result with "Received response n of N"
    #[arg(
        long,
        env = "SEED_DATA_SHOW_PROGRESS",
        value_parser = clap::builder::BoolishValueParser::new()
    )]
    progress: bool,

    /// Log level (overridden by RUST_LOG)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Also print the final summary as JSON
    #[arg(long)]
    json: bool,
}

impl Args {
    fn into_config(self) -> LoaderConfig {
        LoaderConfig::new(
            self.base_dir,
            parse_subfolders(self.directories.as_deref()),
            self.url,
        )
        .with_max_in_flight(self.max_in_flight)
        .with_request_timeout(self.request_timeout_secs.map(Duration::from_secs))
        .with_progress(self.progress)
    }
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_tracing(&args.log_level);

    let json = args.json;
    let config = args.into_config();
    config.validate()?;
    let show_progress = config.show_progress;

    let summary = SeedLoader::new(config)
        .run()
        .await
        .context("failed to prepare seed uploads")?;

    println!("{}", summary.completion_message(show_progress));
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }

    Ok(ExitCode::from(summary.exit_code()))
}
