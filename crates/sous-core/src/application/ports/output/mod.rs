//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `sous-adapters` crate provides implementations. They exist so the
//! resolution/generation core is unit-testable without real git binaries,
//! shells, or a writable disk.

use std::path::{Path, PathBuf};

use crate::domain::{ManifestDoc, WorkspaceConfig, WorkspaceLock};
use crate::error::SousResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `sous_adapters::filesystem::LocalFilesystem` (production)
/// - `sous_adapters::filesystem::MemoryFilesystem` (testing)
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> SousResult<()>;

    /// Write content to a file, replacing anything already there.
    fn write_file(&self, path: &Path, content: &str) -> SousResult<()>;

    /// Read a file into a string.
    fn read_to_string(&self, path: &Path) -> SousResult<String>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;
}

/// Port for parsing manifest text into domain objects.
///
/// Implemented by `sous_adapters::manifest::TomlManifestParser`.
///
/// A manifest that parses but is missing required fields (name, version)
/// must fail with `DomainError::ManifestInvalid`.
pub trait ManifestParser: Send + Sync {
    fn parse(&self, raw: &str) -> SousResult<ManifestDoc>;
}

/// Port for materializing remote recipe sources on disk.
///
/// Implemented by:
/// - `sous_adapters::fetcher::GitFetcher` (shells out to `git`)
/// - `sous_adapters::fetcher::MemoryFetcher` (testing)
///
/// ## Design Notes
///
/// The on-disk cache behind `fetch` is shared and unsynchronized; concurrent
/// invocations against the same repository may race. Production
/// implementations should take an advisory file lock per cache key.
pub trait SourceFetcher: Send + Sync {
    /// Clone-or-update `repo` at `reference`, returning the checkout
    /// directory. Failures surface as `ApplicationError::FetchFailed`.
    fn fetch(&self, repo: &str, reference: &str) -> SousResult<PathBuf>;
}

/// Captured result of one subprocess invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    /// Process exit code (-1 when terminated by a signal).
    pub status: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutcome {
    pub fn success(&self) -> bool {
        self.status == 0
    }
}

/// Port for running hook and recipe commands.
///
/// Implemented by:
/// - `sous_adapters::process::ShellRunner` (production, `sh -c`)
/// - `sous_adapters::process::RecordingRunner` (testing)
///
/// Commands run synchronously with no timeout; a hanging command blocks the
/// caller. Callers needing cancellation must wrap the engine's entry points.
pub trait ProcessRunner: Send + Sync {
    fn run(&self, command: &str, cwd: &Path) -> SousResult<CommandOutcome>;
}

/// Port for persisting workspace state.
///
/// Implemented by `sous_adapters::state::TomlStateStore`.
pub trait StateStore: Send + Sync {
    /// Load the workspace config, or `None` when the workspace is not
    /// initialized.
    fn load_config(&self, root: &Path) -> SousResult<Option<WorkspaceConfig>>;

    /// Persist the workspace config.
    fn save_config(&self, root: &Path, config: &WorkspaceConfig) -> SousResult<()>;

    /// Overwrite the lock snapshot wholesale.
    fn write_lock(&self, root: &Path, lock: &WorkspaceLock) -> SousResult<()>;

    /// Load the last lock snapshot, if any.
    fn load_lock(&self, root: &Path) -> SousResult<Option<WorkspaceLock>>;
}
