//! In-memory port implementations shared by the service unit tests.
//!
//! These are deliberately tiny: just enough behavior to drive the services
//! without a real disk, parser, git binary, or shell.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde_json::Value;

use crate::application::error::ApplicationError;
use crate::application::ports::{
    CommandOutcome, Filesystem, ManifestParser, ProcessRunner, SourceFetcher, StateStore,
};
use crate::domain::{DomainError, ManifestDoc, Recipe, Stack, WorkspaceConfig, WorkspaceLock};
use crate::error::SousResult;

// ── Filesystem ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct MemoryFs {
    inner: Arc<Mutex<MemoryFsInner>>,
}

#[derive(Debug, Default)]
struct MemoryFsInner {
    files: HashMap<PathBuf, String>,
    directories: HashSet<PathBuf>,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file, registering its ancestors as directories.
    pub fn put(&self, path: impl Into<PathBuf>, content: &str) {
        let path = path.into();
        let mut inner = self.inner.lock().unwrap();
        let mut current = PathBuf::new();
        for component in path.parent().unwrap_or(Path::new("")).components() {
            current.push(component);
            inner.directories.insert(current.clone());
        }
        inner.files.insert(path, content.to_string());
    }

    pub fn get(&self, path: impl AsRef<Path>) -> Option<String> {
        self.inner.lock().unwrap().files.get(path.as_ref()).cloned()
    }
}

impl Filesystem for MemoryFs {
    fn create_dir_all(&self, path: &Path) -> SousResult<()> {
        let mut inner = self.inner.lock().unwrap();
        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            inner.directories.insert(current.clone());
        }
        Ok(())
    }

    fn write_file(&self, path: &Path, content: &str) -> SousResult<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.files.insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn read_to_string(&self, path: &Path) -> SousResult<String> {
        self.inner
            .lock()
            .unwrap()
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| {
                ApplicationError::Filesystem {
                    path: path.to_path_buf(),
                    reason: "file not found".into(),
                }
                .into()
            })
    }

    fn exists(&self, path: &Path) -> bool {
        let inner = self.inner.lock().unwrap();
        inner.files.contains_key(path) || inner.directories.contains(path)
    }
}

// ── Manifest parser ───────────────────────────────────────────────────────────

/// Parses manifests from JSON instead of TOML - the schema is identical and
/// serde_json is already a core dependency.
#[derive(Debug, Clone, Copy)]
pub struct JsonManifestParser;

impl ManifestParser for JsonManifestParser {
    fn parse(&self, raw: &str) -> SousResult<ManifestDoc> {
        let value: Value = serde_json::from_str(raw).map_err(|e| DomainError::ManifestInvalid {
            reason: e.to_string(),
        })?;

        let has = |field: &str| value.get(field).and_then(Value::as_str).is_some();
        if !has("name") || !has("version") {
            return Err(DomainError::ManifestInvalid {
                reason: "missing required fields: name, version".into(),
            }
            .into());
        }

        if value.get("includes").is_some() {
            let stack: Stack =
                serde_json::from_value(value).map_err(|e| DomainError::ManifestInvalid {
                    reason: e.to_string(),
                })?;
            Ok(ManifestDoc::Stack(stack))
        } else {
            let recipe: Recipe =
                serde_json::from_value(value).map_err(|e| DomainError::ManifestInvalid {
                    reason: e.to_string(),
                })?;
            Ok(ManifestDoc::Recipe(recipe))
        }
    }
}

/// Minimal recipe manifest as JSON text.
pub fn recipe_json(name: &str, requires: &[&str]) -> String {
    let requires: Vec<Value> = requires.iter().map(|r| Value::String(r.to_string())).collect();
    serde_json::json!({
        "name": name,
        "version": "1.0.0",
        "requires": requires,
    })
    .to_string()
}

/// Recipe manifest with declared conflicts.
pub fn recipe_json_conflicting(name: &str, conflicts: &[&str]) -> String {
    serde_json::json!({
        "name": name,
        "version": "1.0.0",
        "conflicts": conflicts,
    })
    .to_string()
}

// ── Fetchers ──────────────────────────────────────────────────────────────────

/// Always "checks out" the same directory.
#[derive(Debug, Clone)]
pub struct StaticFetcher {
    checkout: PathBuf,
}

impl StaticFetcher {
    pub fn new(checkout: impl Into<PathBuf>) -> Self {
        Self {
            checkout: checkout.into(),
        }
    }
}

impl SourceFetcher for StaticFetcher {
    fn fetch(&self, _repo: &str, _reference: &str) -> SousResult<PathBuf> {
        Ok(self.checkout.clone())
    }
}

/// Always fails, as an unreachable remote would.
#[derive(Debug, Clone, Copy)]
pub struct FailingFetcher;

impl SourceFetcher for FailingFetcher {
    fn fetch(&self, repo: &str, _reference: &str) -> SousResult<PathBuf> {
        Err(ApplicationError::FetchFailed {
            repo: repo.to_string(),
            reason: "network unreachable".into(),
        }
        .into())
    }
}

// ── Process runner ────────────────────────────────────────────────────────────

/// Records every invocation; commands listed in `fail_on` exit non-zero.
#[derive(Debug, Clone, Default)]
pub struct RecordingRunner {
    inner: Arc<Mutex<RecordingRunnerInner>>,
}

#[derive(Debug, Default)]
struct RecordingRunnerInner {
    calls: Vec<(String, PathBuf)>,
    fail_on: HashSet<String>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_on(&self, command: &str) {
        self.inner.lock().unwrap().fail_on.insert(command.to_string());
    }

    pub fn calls(&self) -> Vec<(String, PathBuf)> {
        self.inner.lock().unwrap().calls.clone()
    }
}

impl ProcessRunner for RecordingRunner {
    fn run(&self, command: &str, cwd: &Path) -> SousResult<CommandOutcome> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push((command.to_string(), cwd.to_path_buf()));
        let status = if inner.fail_on.contains(command) { 1 } else { 0 };
        Ok(CommandOutcome {
            status,
            stdout: String::new(),
            stderr: String::new(),
        })
    }
}

// ── State store ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct MemoryStateStore {
    inner: Arc<Mutex<MemoryStateInner>>,
}

#[derive(Debug, Default)]
struct MemoryStateInner {
    configs: BTreeMap<PathBuf, WorkspaceConfig>,
    locks: BTreeMap<PathBuf, WorkspaceLock>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lock_for(&self, root: impl AsRef<Path>) -> Option<WorkspaceLock> {
        self.inner.lock().unwrap().locks.get(root.as_ref()).cloned()
    }
}

impl StateStore for MemoryStateStore {
    fn load_config(&self, root: &Path) -> SousResult<Option<WorkspaceConfig>> {
        Ok(self.inner.lock().unwrap().configs.get(root).cloned())
    }

    fn save_config(&self, root: &Path, config: &WorkspaceConfig) -> SousResult<()> {
        self.inner
            .lock()
            .unwrap()
            .configs
            .insert(root.to_path_buf(), config.clone());
        Ok(())
    }

    fn write_lock(&self, root: &Path, lock: &WorkspaceLock) -> SousResult<()> {
        self.inner
            .lock()
            .unwrap()
            .locks
            .insert(root.to_path_buf(), lock.clone());
        Ok(())
    }

    fn load_lock(&self, root: &Path) -> SousResult<Option<WorkspaceLock>> {
        Ok(self.inner.lock().unwrap().locks.get(root).cloned())
    }
}
