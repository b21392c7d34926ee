//! Paginated directory walker.
//!
//! Counts the file entries of a repository subtree by listing every directory
//! one page at a time. Directories are not descended into by native recursion:
//! pending paths are kept on an explicit worklist, so traversal depth costs
//! heap, not stack.
//!
//! ## Pagination
//!
//! Each path is listed in pages of `page_size` entries. Only an exactly full
//! page triggers one more request. A shorter page (including an empty one) is
//! the last for that path, and so is a longer one: hosts that ignore paging
//! return the whole directory on every request.

use domain::{Credential, EntryKind, HostError, RepositoryHost, RepositoryRef};
use tracing::{debug, instrument};

#[cfg(test)]
#[path = "walker_tests.rs"]
mod tests;

/// Walks one repository's directory tree through a [`RepositoryHost`].
pub struct DirectoryWalker<'a> {
    host: &'a dyn RepositoryHost,
    credential: &'a Credential,
    repository: &'a RepositoryRef,
    page_size: u32,
}

impl<'a> DirectoryWalker<'a> {
    /// Creates a walker. A `page_size` of zero is treated as one.
    pub fn new(
        host: &'a dyn RepositoryHost,
        credential: &'a Credential,
        repository: &'a RepositoryRef,
        page_size: u32,
    ) -> Self {
        Self {
            host,
            credential,
            repository,
            page_size: page_size.max(1),
        }
    }

    /// Returns the number of file entries under `root` (empty for the
    /// repository root), at any depth.
    ///
    /// Any listing failure fails the whole count.
    #[instrument(
        level = "debug",
        skip(self),
        fields(repository = %self.repository, page_size = self.page_size)
    )]
    pub async fn count_files(&self, root: &str) -> Result<u64, HostError> {
        let mut pending = vec![root.to_string()];
        let mut files: u64 = 0;
        let mut directories: u64 = 0;

        while let Some(path) = pending.pop() {
            directories += 1;
            let mut page = 1;
            loop {
                let entries = self
                    .host
                    .list_directory(self.credential, self.repository, &path, page, self.page_size)
                    .await?;
                let fetched = entries.len();

                for entry in entries {
                    match entry.kind {
                        EntryKind::File => files += 1,
                        EntryKind::Dir => pending.push(entry.path),
                        EntryKind::Symlink | EntryKind::Submodule => {}
                    }
                }

                debug!(path = %path, page, fetched, "Listed directory page");

                if fetched != self.page_size as usize {
                    break;
                }
                page += 1;
            }
        }

        debug!(files, directories, "Directory walk complete");
        Ok(files)
    }
}
