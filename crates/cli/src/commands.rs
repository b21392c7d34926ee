//! Subcommand handlers. Results go to stdout as JSON; diagnostics go to the
//! `tracing` subscriber on stderr.

use std::io::Write;
use std::process::ExitCode;

use aggregator::RepositoryQueries;
use anyhow::Context;
use domain::RepositoryDetail;
use serde::Serialize;
use tracing::error;

pub async fn list(queries: &RepositoryQueries, token: &str) -> anyhow::Result<ExitCode> {
    let repositories = queries
        .list_repositories(token)
        .await
        .context("failed to list repositories")?;
    print_json(&repositories)?;
    Ok(ExitCode::SUCCESS)
}

/// Aggregates every name concurrently through the shared queue. Successful
/// records are printed in argument order even when some requests fail.
pub async fn details(
    queries: &RepositoryQueries,
    token: &str,
    names: Vec<String>,
) -> anyhow::Result<ExitCode> {
    let requests: Vec<_> = names
        .into_iter()
        .map(|name| {
            let queries = queries.clone();
            let token = token.to_string();
            let task_name = name.clone();
            let handle =
                tokio::spawn(async move { queries.repository_details(&token, &task_name).await });
            (name, handle)
        })
        .collect();

    let mut records: Vec<RepositoryDetail> = Vec::new();
    let mut failed = 0usize;
    for (name, handle) in requests {
        match handle.await {
            Ok(Ok(detail)) => records.push(detail),
            Ok(Err(err)) => {
                error!(repository = %name, error = %err, "Repository details failed");
                failed += 1;
            }
            Err(err) => {
                error!(repository = %name, error = %err, "Repository details task aborted");
                failed += 1;
            }
        }
    }

    print_json(&records)?;
    if failed > 0 {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value).context("failed to write JSON output")?;
    writeln!(stdout).context("failed to write JSON output")?;
    Ok(())
}
