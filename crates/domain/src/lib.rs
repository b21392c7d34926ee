//! Core domain for repository facet aggregation.
//!
//! This crate contains every record type, newtype identifier, and error type
//! shared by the aggregation engine, plus the [`RepositoryHost`] port through
//! which the engine reaches the remote repository-hosting API. Infrastructure
//! crates implement the port; they never add domain rules.
//!
//! ## Architectural Layer
//!
//! **Business types + port definitions.** This crate has no I/O dependencies.
//! It defines *what* the engine needs from a host; the `github` crate defines
//! *how* that is supplied over HTTP.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`RepositoryName`, `JobId`, `Credential`, etc.) |
//! | [`types`] | Records (`RepositorySummary`, `RepositoryDetail`, `DirectoryEntry`, etc.) |
//! | [`errors`] | Host-level and request-level error types |
//! | [`ports`] | The [`RepositoryHost`] trait |

pub mod errors;
pub mod identifiers;
pub mod ports;
pub mod types;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use errors::{AggregationError, HostError};
pub use identifiers::{Credential, JobId, RepositoryName, RepositoryOwner, RepositoryRef, UserLogin};
pub use ports::RepositoryHost;
pub use types::{
    DirectoryEntry, EntryKind, RepositoryBasics, RepositoryDetail, RepositorySummary, Webhook,
    NO_CI_CONFIG,
};
