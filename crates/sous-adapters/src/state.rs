//! TOML workspace state store.
//!
//! Persists [`WorkspaceConfig`] and [`WorkspaceLock`] under the workspace
//! state directory:
//!
//! ```text
//! <root>/.sous/
//! ├── config.toml    ← mutable desired/installed state
//! ├── lock.toml      ← audit snapshot, rewritten wholesale on apply
//! └── recipes/       ← workspace-local recipes (read by the loader)
//! ```

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use sous_core::application::ApplicationError;
use sous_core::application::ports::StateStore;
use sous_core::application::services::loader::STATE_DIR;
use sous_core::domain::{WorkspaceConfig, WorkspaceLock};
use sous_core::error::SousResult;

const CONFIG_FILE: &str = "config.toml";
const LOCK_FILE: &str = "lock.toml";

/// Reads and writes workspace state as TOML files.
#[derive(Debug, Clone, Copy, Default)]
pub struct TomlStateStore;

impl TomlStateStore {
    pub fn new() -> Self {
        Self
    }

    /// Path of the config file for a workspace root.
    pub fn config_path(root: &Path) -> PathBuf {
        root.join(STATE_DIR).join(CONFIG_FILE)
    }

    /// Path of the lock file for a workspace root.
    pub fn lock_path(root: &Path) -> PathBuf {
        root.join(STATE_DIR).join(LOCK_FILE)
    }

    fn read<T: DeserializeOwned>(path: &Path) -> SousResult<Option<T>> {
        if !path.exists() {
            return Ok(None);
        }
        let raw = std::fs::read_to_string(path).map_err(|e| ApplicationError::StateStore {
            reason: format!("cannot read '{}': {e}", path.display()),
        })?;
        let value = toml::from_str(&raw).map_err(|e| ApplicationError::StateStore {
            reason: format!("cannot parse '{}': {e}", path.display()),
        })?;
        Ok(Some(value))
    }

    fn write<T: Serialize>(path: &Path, value: &T) -> SousResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ApplicationError::StateStore {
                reason: format!("cannot create '{}': {e}", parent.display()),
            })?;
        }
        let raw = toml::to_string_pretty(value).map_err(|e| ApplicationError::StateStore {
            reason: format!("cannot serialize '{}': {e}", path.display()),
        })?;
        std::fs::write(path, raw).map_err(|e| ApplicationError::StateStore {
            reason: format!("cannot write '{}': {e}", path.display()),
        })?;
        debug!(path = %path.display(), "state written");
        Ok(())
    }
}

impl StateStore for TomlStateStore {
    fn load_config(&self, root: &Path) -> SousResult<Option<WorkspaceConfig>> {
        Self::read(&Self::config_path(root))
    }

    fn save_config(&self, root: &Path, config: &WorkspaceConfig) -> SousResult<()> {
        Self::write(&Self::config_path(root), config)
    }

    fn write_lock(&self, root: &Path, lock: &WorkspaceLock) -> SousResult<()> {
        Self::write(&Self::lock_path(root), lock)
    }

    fn load_lock(&self, root: &Path) -> SousResult<Option<WorkspaceLock>> {
        Self::read(&Self::lock_path(root))
    }
}
