//! Record types for repository facet aggregation.
//!
//! [`RepositorySummary`] is produced by the repository listing.
//! [`RepositoryDetail`] is assembled once per detail request from the four
//! facets and is never mutated afterwards. [`DirectoryEntry`] is ephemeral: it
//! lives only while a directory page is being counted.

use serde::{Deserialize, Serialize};

use crate::{RepositoryName, RepositoryOwner};

#[cfg(test)]
#[path = "types_tests.rs"]
mod tests;

/// Placeholder stored in [`RepositoryDetail::ci_config_content`] when no CI
/// workflow file could be read.
pub const NO_CI_CONFIG: &str = "No YML file found";

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

/// One repository as reported by the authenticated user's repository listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositorySummary {
    /// Repository name.
    pub name: RepositoryName,
    /// Repository size in kilobytes, as reported by the host.
    pub size: u64,
    /// Login of the owning account.
    pub owner: RepositoryOwner,
}

// ---------------------------------------------------------------------------
// Detail facets
// ---------------------------------------------------------------------------

/// The basic-details facet: the canonical source of name, size, owner and
/// visibility for a [`RepositoryDetail`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryBasics {
    pub name: RepositoryName,
    pub size: u64,
    pub owner: RepositoryOwner,
    pub is_private: bool,
}

/// A webhook registered on a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Webhook {
    /// Position of the hook in the host's listing (0-based).
    ///
    /// This is not the host's own hook identifier.
    pub id: u64,
    /// Delivery URL of the hook.
    pub url: String,
    /// Always `true`: the listing does not report activity, so it is assumed.
    pub active: bool,
}

impl Webhook {
    /// Builds webhooks from hook URLs, numbering them by position and keeping
    /// the host's ordering.
    pub fn from_urls(urls: impl IntoIterator<Item = String>) -> Vec<Self> {
        urls.into_iter()
            .enumerate()
            .map(|(index, url)| Self {
                id: index as u64,
                url,
                active: true,
            })
            .collect()
    }
}

/// The complete aggregated record for one repository.
///
/// Built exactly once per detail request from the four facets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryDetail {
    pub name: RepositoryName,
    pub size: u64,
    pub owner: RepositoryOwner,
    pub is_private: bool,
    /// Number of file entries in the whole repository tree.
    pub file_count: u64,
    /// Verbatim content of the first CI workflow file, or [`NO_CI_CONFIG`].
    pub ci_config_content: String,
    pub webhooks: Vec<Webhook>,
}

impl RepositoryDetail {
    /// Assembles a detail record.
    ///
    /// Identity and visibility fields come only from `basics`.
    pub fn assemble(
        basics: RepositoryBasics,
        file_count: u64,
        ci_config_content: String,
        webhook_urls: Vec<String>,
    ) -> Self {
        let RepositoryBasics {
            name,
            size,
            owner,
            is_private,
        } = basics;
        Self {
            name,
            size,
            owner,
            is_private,
            file_count,
            ci_config_content,
            webhooks: Webhook::from_urls(webhook_urls),
        }
    }
}

// ---------------------------------------------------------------------------
// Directory listing
// ---------------------------------------------------------------------------

/// Type of an entry in a repository directory listing.
///
/// Maps to the `type` field of the host's contents listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Regular file; counted by the directory walker.
    File,
    /// Directory; descended into by the directory walker.
    Dir,
    /// Symbolic link; neither counted nor descended into.
    Symlink,
    /// Git submodule reference; neither counted nor descended into.
    Submodule,
}

/// A single entry of one page of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    /// Full path within the repository (e.g. `"src/lib.rs"`).
    pub path: String,
    /// Entry type.
    pub kind: EntryKind,
    /// Raw download URL; only present for files.
    pub download_url: Option<String>,
}

impl DirectoryEntry {
    /// Creates a file entry without a download URL.
    pub fn file(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::File,
            download_url: None,
        }
    }

    /// Creates a directory entry.
    pub fn dir(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::Dir,
            download_url: None,
        }
    }

    /// Attaches a download URL.
    pub fn with_download_url(mut self, url: impl Into<String>) -> Self {
        self.download_url = Some(url.into());
        self
    }
}
