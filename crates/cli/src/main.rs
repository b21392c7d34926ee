//! `repo-facets` entry point.
//!
//! This binary is the composition root. Responsibilities:
//!
//! 1. **Parse configuration** from flags and environment variables ([`config`]).
//! 2. **Wire observability**: `tracing-subscriber` with a pretty or JSON layer
//!    on stderr, plus an OpenTelemetry OTLP exporter when an endpoint is set
//!    ([`observability`]).
//! 3. **Construct infrastructure**: the [`github::GitHubClient`] and the
//!    process-wide [`aggregator::AggregationQueue`], injected into
//!    [`aggregator::RepositoryQueries`].
//! 4. **Dispatch** the subcommand ([`commands`]) and shut the queue down.

mod commands;
mod config;
mod observability;

use std::process::ExitCode;
use std::sync::Arc;

use aggregator::{AggregationQueue, RepositoryQueries};
use anyhow::Context;
use clap::Parser;
use github::GitHubClient;
use tracing::{error, info};

use crate::config::{Cli, Command};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let telemetry = match observability::init(&cli.logging) {
        Ok(telemetry) => telemetry,
        Err(err) => {
            eprintln!("error: {err:#}");
            return ExitCode::FAILURE;
        }
    };

    let code = match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            error!(error = %format!("{err:#}"), "repo-facets failed");
            ExitCode::FAILURE
        }
    };

    telemetry.shutdown();
    code
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let engine = cli.engine_config();
    engine.validate().context("invalid engine configuration")?;

    let client = GitHubClient::new(&cli.client_config())?;
    info!(
        api_url = %client.api_url(),
        concurrency = engine.max_concurrent_jobs,
        page_size = engine.page_size,
        "Starting repo-facets"
    );

    let queue = Arc::new(
        AggregationQueue::start(engine.max_concurrent_jobs)
            .context("failed to start aggregation queue")?,
    );
    let queries = RepositoryQueries::new(Arc::new(client), Arc::clone(&queue), engine);

    let result = match cli.command {
        Command::List => commands::list(&queries, &cli.token).await,
        Command::Details { names } => commands::details(&queries, &cli.token, names).await,
    };

    queue.shutdown().await;
    result
}
