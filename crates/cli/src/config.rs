//! Command line and environment configuration.

use std::time::Duration;

use aggregator::config::{DEFAULT_CI_CONFIG_PATH, DEFAULT_MAX_CONCURRENT_JOBS, DEFAULT_PAGE_SIZE};
use aggregator::EngineConfig;
use clap::{Parser, Subcommand, ValueEnum};
use github::{GitHubClientConfig, DEFAULT_API_URL, DEFAULT_TIMEOUT};

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

/// Aggregate repository metadata from the GitHub REST API.
#[derive(Debug, Parser)]
#[command(name = "repo-facets", version, about)]
pub struct Cli {
    /// GitHub token used as the bearer credential.
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true, default_value = "")]
    pub token: String,

    /// GitHub API base URL.
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Maximum number of repositories aggregated at once.
    #[arg(long, env = "REPO_FACETS_CONCURRENCY", default_value_t = DEFAULT_MAX_CONCURRENT_JOBS)]
    pub concurrency: usize,

    /// Entries requested per listing page.
    #[arg(long, env = "REPO_FACETS_PAGE_SIZE", default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: u32,

    /// Per-request timeout in seconds.
    #[arg(long, env = "REPO_FACETS_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT.as_secs())]
    pub timeout_secs: u64,

    #[command(flatten)]
    pub logging: LoggingArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the repositories of the authenticated user.
    List,

    /// Aggregate the detail record of one or more of the user's repositories.
    Details {
        /// Repository names, owned by the authenticated user.
        #[arg(required = true)]
        names: Vec<String>,
    },
}

/// Log output settings.
#[derive(Debug, Clone, clap::Args)]
pub struct LoggingArgs {
    /// Log output format.
    #[arg(long, value_enum, env = "REPO_FACETS_LOG_FORMAT", default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    /// OTLP gRPC endpoint for trace export; tracing stays local when unset.
    #[arg(long, env = "OTEL_EXPORTER_OTLP_ENDPOINT")]
    pub otlp_endpoint: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines.
    Pretty,
    /// One JSON object per event.
    Json,
}

impl Cli {
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            max_concurrent_jobs: self.concurrency,
            page_size: self.page_size,
            ci_config_path: DEFAULT_CI_CONFIG_PATH.to_string(),
        }
    }

    pub fn client_config(&self) -> GitHubClientConfig {
        GitHubClientConfig {
            api_url: self.api_url.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}
