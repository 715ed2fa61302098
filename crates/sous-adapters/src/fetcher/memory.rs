//! In-memory fetcher adapter for testing.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use sous_core::application::ApplicationError;
use sous_core::application::ports::SourceFetcher;
use sous_core::error::SousResult;

/// Maps `(repo, reference)` pairs to pre-arranged checkout directories.
///
/// Unknown pairs fail with `FetchFailed`, like an unreachable remote.
#[derive(Debug, Clone, Default)]
pub struct MemoryFetcher {
    checkouts: Arc<Mutex<HashMap<(String, String), PathBuf>>>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a checkout directory for a repo/ref pair.
    pub fn insert(&self, repo: &str, reference: &str, checkout: impl Into<PathBuf>) {
        self.checkouts
            .lock()
            .unwrap()
            .insert((repo.to_string(), reference.to_string()), checkout.into());
    }
}

impl SourceFetcher for MemoryFetcher {
    fn fetch(&self, repo: &str, reference: &str) -> SousResult<PathBuf> {
        self.checkouts
            .lock()
            .unwrap()
            .get(&(repo.to_string(), reference.to_string()))
            .cloned()
            .ok_or_else(|| {
                ApplicationError::FetchFailed {
                    repo: repo.to_string(),
                    reason: format!("no checkout registered for ref '{reference}'"),
                }
                .into()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registered_pair_resolves() {
        let fetcher = MemoryFetcher::new();
        fetcher.insert("repo", "main", "/checkouts/repo");
        assert_eq!(
            fetcher.fetch("repo", "main").unwrap(),
            PathBuf::from("/checkouts/repo")
        );
    }

    #[test]
    fn unknown_pair_fails() {
        let fetcher = MemoryFetcher::new();
        assert!(fetcher.fetch("repo", "main").is_err());
    }
}
