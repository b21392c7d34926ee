//! Repository facet aggregation engine.
//!
//! This crate turns a repository name into a complete [`domain::RepositoryDetail`]
//! by fanning out four independent facet fetches against a
//! [`domain::RepositoryHost`], under a process-wide bound on concurrent jobs.
//!
//! ## Architectural Layer
//!
//! **Orchestration layer.** Modules sequence calls to the host port and apply
//! the failure policy; they contain no transport details.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`queue`] | [`AggregationQueue`]: bounded FIFO admission of jobs |
//! | [`fanout`] | Concurrent facet fetch and merge for one job |
//! | [`facets`] | The four facets and their mandatory/optional policy table |
//! | [`walker`] | Paginated, worklist-based file count |
//! | [`queries`] | [`RepositoryQueries`]: the caller-facing operations |
//! | [`config`] | [`EngineConfig`] |

pub mod config;
pub mod facets;
pub mod fanout;
pub mod queries;
pub mod queue;
pub mod walker;

#[cfg(test)]
mod test_utils;

pub use config::EngineConfig;
pub use facets::{DefaultCause, Facet, FacetFetcher, FacetOutcome, FacetPolicy};
pub use fanout::aggregate_repository;
pub use queries::RepositoryQueries;
pub use queue::{AggregationQueue, JobTicket, QueueClosed};
pub use walker::DirectoryWalker;
