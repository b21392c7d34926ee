//! In-memory [`RepositoryHost`] for engine tests.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use domain::{
    Credential, DirectoryEntry, HostError, RepositoryBasics, RepositoryHost, RepositoryName,
    RepositoryOwner, RepositoryRef, RepositorySummary, UserLogin,
};

/// Base URL of the raw downloads served by [`FakeHost`].
pub const RAW_BASE: &str = "https://raw.test";

/// Host operations that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Listing,
    Login,
    Repository,
    Directory,
    RawContent,
    Webhooks,
}

/// A repository host backed by maps, with failure injection and a request log.
#[derive(Default)]
pub struct FakeHost {
    login: Option<String>,
    repositories: HashMap<String, RepositoryBasics>,
    listing: Vec<RepositorySummary>,
    /// Parent path → (child path → entry). The root is `""`.
    tree: BTreeMap<String, BTreeMap<String, DirectoryEntry>>,
    raw: HashMap<String, String>,
    hooks: Vec<String>,
    failing: HashSet<Op>,
    directory_requests: Mutex<Vec<(String, u32)>>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_login(mut self, login: &str) -> Self {
        self.login = Some(login.to_string());
        self
    }

    /// Registers a repository owned by `owner`, with an empty root directory.
    pub fn with_repository(mut self, owner: &str, name: &str, size: u64, is_private: bool) -> Self {
        let basics = RepositoryBasics {
            name: RepositoryName::new(name).unwrap(),
            size,
            owner: RepositoryOwner::new(owner).unwrap(),
            is_private,
        };
        self.repositories.insert(format!("{owner}/{name}"), basics);
        self.tree.entry(String::new()).or_default();
        self
    }

    /// Adds files (and their parent directories) to the tree.
    pub fn with_files<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for path in paths {
            self.insert_file(path.as_ref(), None);
        }
        self
    }

    /// Adds a file with downloadable content.
    pub fn with_content(mut self, path: &str, content: &str) -> Self {
        let url = format!("{RAW_BASE}/{path}");
        self.insert_file(path, Some(url.clone()));
        self.raw.insert(url, content.to_string());
        self
    }

    /// Adds an empty directory.
    pub fn with_empty_dir(mut self, path: &str) -> Self {
        self.insert_dir_chain(path);
        self
    }

    pub fn with_hooks(mut self, urls: &[&str]) -> Self {
        self.hooks = urls.iter().map(|u| u.to_string()).collect();
        self
    }

    pub fn with_listing(mut self, owner: &str, names: &[&str]) -> Self {
        self.listing.extend(names.iter().map(|name| RepositorySummary {
            name: RepositoryName::new(*name).unwrap(),
            size: 1,
            owner: RepositoryOwner::new(owner).unwrap(),
        }));
        self
    }

    pub fn failing(mut self, op: Op) -> Self {
        self.failing.insert(op);
        self
    }

    /// Every `(path, page)` pair requested through `list_directory`, in order.
    pub fn directory_requests(&self) -> Vec<(String, u32)> {
        self.directory_requests.lock().unwrap().clone()
    }

    fn insert_file(&mut self, path: &str, download_url: Option<String>) {
        let parent = parent_of(path);
        self.insert_dir_chain(&parent);
        let entry = match download_url {
            Some(url) => DirectoryEntry::file(path).with_download_url(url),
            None => DirectoryEntry::file(path),
        };
        self.tree
            .entry(parent)
            .or_default()
            .insert(path.to_string(), entry);
    }

    fn insert_dir_chain(&mut self, dir: &str) {
        self.tree.entry(String::new()).or_default();
        if dir.is_empty() {
            return;
        }
        let parent = parent_of(dir);
        self.insert_dir_chain(&parent);
        self.tree
            .entry(parent)
            .or_default()
            .insert(dir.to_string(), DirectoryEntry::dir(dir));
        self.tree.entry(dir.to_string()).or_default();
    }

    fn check(&self, op: Op) -> Result<(), HostError> {
        if self.failing.contains(&op) {
            Err(HostError::http_status(502, format!("{op:?} unavailable")))
        } else {
            Ok(())
        }
    }
}

fn parent_of(path: &str) -> String {
    match path.rfind('/') {
        Some(idx) => path[..idx].to_string(),
        None => String::new(),
    }
}

fn page_of<T: Clone>(items: &[T], page: u32, per_page: u32) -> Vec<T> {
    let start = (page.saturating_sub(1) as usize) * per_page as usize;
    items
        .iter()
        .skip(start)
        .take(per_page as usize)
        .cloned()
        .collect()
}

#[async_trait]
impl RepositoryHost for FakeHost {
    async fn list_user_repositories(
        &self,
        _credential: &Credential,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<RepositorySummary>, HostError> {
        self.check(Op::Listing)?;
        Ok(page_of(&self.listing, page, per_page))
    }

    async fn authenticated_login(&self, _credential: &Credential) -> Result<UserLogin, HostError> {
        self.check(Op::Login)?;
        self.login
            .as_deref()
            .and_then(UserLogin::new)
            .ok_or_else(|| HostError::http_status(401, "Bad credentials"))
    }

    async fn get_repository(
        &self,
        _credential: &Credential,
        repository: &RepositoryRef,
    ) -> Result<RepositoryBasics, HostError> {
        self.check(Op::Repository)?;
        self.repositories
            .get(&repository.to_string())
            .cloned()
            .ok_or_else(|| HostError::not_found(format!("repository {repository}")))
    }

    async fn list_directory(
        &self,
        _credential: &Credential,
        _repository: &RepositoryRef,
        path: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<DirectoryEntry>, HostError> {
        self.directory_requests
            .lock()
            .unwrap()
            .push((path.to_string(), page));
        self.check(Op::Directory)?;
        let entries: Vec<DirectoryEntry> = self
            .tree
            .get(path)
            .ok_or_else(|| HostError::not_found(format!("path '{path}'")))?
            .values()
            .cloned()
            .collect();
        Ok(page_of(&entries, page, per_page))
    }

    async fn fetch_raw_content(&self, url: &str) -> Result<String, HostError> {
        self.check(Op::RawContent)?;
        self.raw
            .get(url)
            .cloned()
            .ok_or_else(|| HostError::not_found(url.to_string()))
    }

    async fn list_webhook_urls(
        &self,
        _credential: &Credential,
        _repository: &RepositoryRef,
    ) -> Result<Vec<String>, HostError> {
        self.check(Op::Webhooks)?;
        Ok(self.hooks.clone())
    }
}

pub fn credential() -> Credential {
    Credential::new("test-token").unwrap()
}

pub fn repo(owner: &str, name: &str) -> RepositoryRef {
    RepositoryRef::new(
        RepositoryOwner::new(owner).unwrap(),
        RepositoryName::new(name).unwrap(),
    )
}
