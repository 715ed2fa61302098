//! Git CLI fetcher.
//!
//! Materializes remote recipe sources by shelling out to the system `git`
//! binary, synchronously. Checkouts live under a shared cache directory
//! keyed by a hash of the repository URL:
//!
//! ```text
//! <cache_root>/
//! ├── 3f2a.../          ← sha256(https://github.com/acme/recipes)
//! └── 91cc.../          ← sha256(https://github.com/sous-recipes/registry)
//! ```
//!
//! A cached checkout is updated with a shallow fetch of the target ref; a
//! missing one is created with a shallow clone restricted to that ref.
//!
//! The cache is shared and unsynchronized: two processes fetching the same
//! repository can race on clone/fetch. Callers who need isolation should
//! take an advisory lock per cache key.

use std::path::{Path, PathBuf};
use std::process::Command;

use sha2::{Digest, Sha256};
use tracing::{debug, instrument};

use sous_core::application::ApplicationError;
use sous_core::application::ports::SourceFetcher;
use sous_core::error::SousResult;

/// Cache subdirectory name for a repository URL: lowercase hex SHA-256.
pub fn cache_key(repo: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(repo.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Fetches recipe sources with the system `git` binary.
pub struct GitFetcher {
    cache_root: PathBuf,
}

impl GitFetcher {
    pub fn new(cache_root: impl Into<PathBuf>) -> Self {
        Self {
            cache_root: cache_root.into(),
        }
    }

    fn git(&self, args: &[&str], cwd: Option<&Path>, repo: &str) -> SousResult<()> {
        let mut command = Command::new("git");
        command.args(args);
        if let Some(dir) = cwd {
            command.current_dir(dir);
        }

        let output = command.output().map_err(|e| ApplicationError::FetchFailed {
            repo: repo.to_string(),
            reason: format!("failed to run git: {e}"),
        })?;

        if !output.status.success() {
            return Err(ApplicationError::FetchFailed {
                repo: repo.to_string(),
                reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into());
        }
        Ok(())
    }
}

impl SourceFetcher for GitFetcher {
    #[instrument(skip(self), fields(cache = %self.cache_root.display()))]
    fn fetch(&self, repo: &str, reference: &str) -> SousResult<PathBuf> {
        let checkout = self.cache_root.join(cache_key(repo));

        if checkout.exists() {
            debug!(repo, reference, "updating cached checkout");
            self.git(
                &["fetch", "--depth", "1", "origin", reference],
                Some(&checkout),
                repo,
            )?;
            self.git(
                &["checkout", "--force", "FETCH_HEAD"],
                Some(&checkout),
                repo,
            )?;
        } else {
            debug!(repo, reference, "shallow cloning");
            std::fs::create_dir_all(&self.cache_root).map_err(|e| {
                ApplicationError::FetchFailed {
                    repo: repo.to_string(),
                    reason: format!("cannot create cache directory: {e}"),
                }
            })?;
            let target = checkout.to_string_lossy().into_owned();
            self.git(
                &[
                    "clone", "--depth", "1", "--branch", reference, repo, &target,
                ],
                None,
                repo,
            )?;
        }

        Ok(checkout)
    }
}
