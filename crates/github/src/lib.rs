//! GitHub REST API adapter.
//!
//! Implements the [`domain::RepositoryHost`] port over `reqwest`. The engine in
//! the `aggregator` crate never sees URLs, headers, or status codes; this crate
//! maps them onto [`domain::HostError`].
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** This crate must not contain aggregation rules: paging
//! decisions, defaults, and failure policy all live in `aggregator`.
//!
//! ## Endpoints
//!
//! | Port method | Request |
//! |-------------|---------|
//! | `list_user_repositories` | `GET /user/repos?per_page&page` |
//! | `authenticated_login` | `GET /user` |
//! | `get_repository` | `GET /repos/{owner}/{repo}` |
//! | `list_directory` | `GET /repos/{owner}/{repo}/contents/{path}?per_page&page` |
//! | `fetch_raw_content` | `GET {download_url}` (unauthenticated) |
//! | `list_webhook_urls` | `GET /repos/{owner}/{repo}/hooks` |

mod client;
mod error;
mod wire;

pub use client::{GitHubClient, GitHubClientConfig, DEFAULT_API_URL, DEFAULT_TIMEOUT};
pub use error::GitHubClientError;
