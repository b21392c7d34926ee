use std::collections::BTreeSet;

use proptest::prelude::*;

use super::*;
use crate::test_utils::{credential, repo, FakeHost, Op};

fn host_with_files(paths: &[&str]) -> FakeHost {
    FakeHost::new()
        .with_repository("octocat", "hello", 1, false)
        .with_files(paths.iter().copied())
}

async fn count(host: &FakeHost, page_size: u32) -> Result<u64, HostError> {
    let credential = credential();
    let repository = repo("octocat", "hello");
    DirectoryWalker::new(host, &credential, &repository, page_size)
        .count_files("")
        .await
}

#[tokio::test]
async fn counts_root_files_and_one_subdirectory() {
    let host = host_with_files(&["a.txt", "b.txt", "c.txt", "sub/d.txt", "sub/e.txt"]);

    assert_eq!(count(&host, 100).await.unwrap(), 5);
}

#[tokio::test]
async fn empty_repository_counts_zero() {
    let host = FakeHost::new().with_repository("octocat", "hello", 0, false);

    assert_eq!(count(&host, 100).await.unwrap(), 0);
    assert_eq!(host.directory_requests(), vec![(String::new(), 1)]);
}

#[tokio::test]
async fn empty_directories_contribute_nothing() {
    let host = host_with_files(&["a.txt"]).with_empty_dir("docs/empty");

    assert_eq!(count(&host, 100).await.unwrap(), 1);
}

#[tokio::test]
async fn deep_nesting_is_fully_counted() {
    let host = host_with_files(&["a/b/c/d/e/f/g/h.txt", "a/b/c/x.txt", "a/y.txt"]);

    assert_eq!(count(&host, 100).await.unwrap(), 3);
}

#[tokio::test]
async fn full_page_triggers_another_request() {
    // Exactly one full page: the second request returns an empty page.
    let host = host_with_files(&["a", "b", "c"]);

    assert_eq!(count(&host, 3).await.unwrap(), 3);
    assert_eq!(
        host.directory_requests(),
        vec![(String::new(), 1), (String::new(), 2)]
    );
}

#[tokio::test]
async fn short_page_ends_pagination() {
    let host = host_with_files(&["a", "b", "c", "d", "e"]);

    assert_eq!(count(&host, 3).await.unwrap(), 5);
    assert_eq!(
        host.directory_requests(),
        vec![(String::new(), 1), (String::new(), 2)]
    );
}

#[tokio::test]
async fn listing_failure_fails_the_count() {
    let host = host_with_files(&["a.txt"]).failing(Op::Directory);

    let err = count(&host, 100).await.unwrap_err();
    assert!(matches!(err, HostError::Transport { status: Some(502), .. }));
}

#[tokio::test]
async fn symlinks_and_submodules_are_skipped() {
    use domain::{DirectoryEntry, EntryKind, RepositoryBasics};

    struct Mixed;

    #[async_trait::async_trait]
    impl RepositoryHost for Mixed {
        async fn list_user_repositories(
            &self,
            _: &Credential,
            _: u32,
            _: u32,
        ) -> Result<Vec<domain::RepositorySummary>, HostError> {
            Ok(Vec::new())
        }
        async fn authenticated_login(&self, _: &Credential) -> Result<domain::UserLogin, HostError> {
            Err(HostError::transport("unused"))
        }
        async fn get_repository(
            &self,
            _: &Credential,
            _: &RepositoryRef,
        ) -> Result<RepositoryBasics, HostError> {
            Err(HostError::transport("unused"))
        }
        async fn list_directory(
            &self,
            _: &Credential,
            _: &RepositoryRef,
            path: &str,
            _: u32,
            _: u32,
        ) -> Result<Vec<DirectoryEntry>, HostError> {
            assert_eq!(path, "", "symlinks and submodules must not be listed");
            Ok(vec![
                DirectoryEntry::file("README.md"),
                DirectoryEntry {
                    path: "link".to_string(),
                    kind: EntryKind::Symlink,
                    download_url: None,
                },
                DirectoryEntry {
                    path: "vendor/lib".to_string(),
                    kind: EntryKind::Submodule,
                    download_url: None,
                },
            ])
        }
        async fn fetch_raw_content(&self, _: &str) -> Result<String, HostError> {
            Err(HostError::transport("unused"))
        }
        async fn list_webhook_urls(
            &self,
            _: &Credential,
            _: &RepositoryRef,
        ) -> Result<Vec<String>, HostError> {
            Ok(Vec::new())
        }
    }

    let credential = credential();
    let repository = repo("octocat", "hello");
    let files = DirectoryWalker::new(&Mixed, &credential, &repository, 100)
        .count_files("")
        .await
        .unwrap();
    assert_eq!(files, 1);
}

#[tokio::test]
async fn oversized_page_ends_pagination() {
    use std::sync::atomic::{AtomicU32, Ordering};

    use domain::{DirectoryEntry, RepositoryBasics};

    /// Ignores `page`/`per_page` and returns the whole directory every time.
    struct Unpaged {
        calls: AtomicU32,
    }

    #[async_trait::async_trait]
    impl RepositoryHost for Unpaged {
        async fn list_user_repositories(
            &self,
            _: &Credential,
            _: u32,
            _: u32,
        ) -> Result<Vec<domain::RepositorySummary>, HostError> {
            Ok(Vec::new())
        }
        async fn authenticated_login(&self, _: &Credential) -> Result<domain::UserLogin, HostError> {
            Err(HostError::transport("unused"))
        }
        async fn get_repository(
            &self,
            _: &Credential,
            _: &RepositoryRef,
        ) -> Result<RepositoryBasics, HostError> {
            Err(HostError::transport("unused"))
        }
        async fn list_directory(
            &self,
            _: &Credential,
            _: &RepositoryRef,
            _: &str,
            _: u32,
            _: u32,
        ) -> Result<Vec<DirectoryEntry>, HostError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) >= 5 {
                return Err(HostError::transport("listed the same directory repeatedly"));
            }
            Ok((0..150)
                .map(|i| DirectoryEntry::file(format!("f{i}")))
                .collect())
        }
        async fn fetch_raw_content(&self, _: &str) -> Result<String, HostError> {
            Err(HostError::transport("unused"))
        }
        async fn list_webhook_urls(
            &self,
            _: &Credential,
            _: &RepositoryRef,
        ) -> Result<Vec<String>, HostError> {
            Ok(Vec::new())
        }
    }

    let host = Unpaged {
        calls: AtomicU32::new(0),
    };
    let credential = credential();
    let repository = repo("octocat", "hello");
    let files = DirectoryWalker::new(&host, &credential, &repository, 100)
        .count_files("")
        .await
        .unwrap();

    assert_eq!(files, 150);
    assert_eq!(host.calls.load(Ordering::SeqCst), 1);
}

/// Paths like `d1/d0/f2`: directories and files never share a name.
fn tree_paths() -> impl Strategy<Value = BTreeSet<String>> {
    let segment = prop::collection::vec(0u8..3, 0..4);
    prop::collection::btree_set(
        (segment, 0u8..6).prop_map(|(dirs, file)| {
            let mut parts: Vec<String> = dirs.iter().map(|d| format!("d{d}")).collect();
            parts.push(format!("f{file}"));
            parts.join("/")
        }),
        0..40,
    )
}

proptest! {
    #[test]
    fn file_count_is_independent_of_page_size(paths in tree_paths(), page_size in 1u32..8) {
        let host = FakeHost::new()
            .with_repository("octocat", "hello", 1, false)
            .with_files(paths.iter());
        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();

        let paged = runtime.block_on(count(&host, page_size)).unwrap();
        let unpaged = runtime.block_on(count(&host, 100)).unwrap();

        prop_assert_eq!(paged, paths.len() as u64);
        prop_assert_eq!(unpaged, paged);
    }
}
