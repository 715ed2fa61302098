//! In-memory filesystem adapter for testing.

use std::{
    collections::{HashMap, HashSet},
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use sous_core::application::ports::Filesystem;

/// In-memory filesystem for testing.
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: HashMap<PathBuf, String>,
    directories: HashSet<PathBuf>,
}

impl MemoryFilesystem {
    /// Create a new empty memory filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file, creating parent directories (testing helper).
    pub fn seed(&self, path: impl Into<PathBuf>, content: &str) {
        let path = path.into();
        let mut inner = self.inner.write().unwrap();
        let mut current = PathBuf::new();
        for component in path.parent().unwrap_or(Path::new("")).components() {
            current.push(component);
            inner.directories.insert(current.clone());
        }
        inner.files.insert(path, content.to_string());
    }

    /// Read a file's content (testing helper).
    pub fn read_file(&self, path: &Path) -> Option<String> {
        let inner = self.inner.read().ok()?;
        inner.files.get(path).cloned()
    }

    /// List all files.
    pub fn list_files(&self) -> Vec<PathBuf> {
        let inner = self.inner.read().unwrap();
        inner.files.keys().cloned().collect()
    }

    /// Clear all contents.
    pub fn clear(&self) {
        let mut inner = self.inner.write().unwrap();
        inner.files.clear();
        inner.directories.clear();
    }
}

impl Filesystem for MemoryFilesystem {
    fn create_dir_all(&self, path: &Path) -> sous_core::error::SousResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| lock_error(path, "create directory"))?;

        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            inner.directories.insert(current.clone());
        }

        Ok(())
    }

    fn write_file(&self, path: &Path, content: &str) -> sous_core::error::SousResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| lock_error(path, "write file"))?;

        inner.files.insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn read_to_string(&self, path: &Path) -> sous_core::error::SousResult<String> {
        let inner = self
            .inner
            .read()
            .map_err(|_| lock_error(path, "read file"))?;

        inner.files.get(path).cloned().ok_or_else(|| {
            sous_core::application::ApplicationError::Filesystem {
                path: path.to_path_buf(),
                reason: "file not found".into(),
            }
            .into()
        })
    }

    fn exists(&self, path: &Path) -> bool {
        let inner = self.inner.read().unwrap();
        inner.files.contains_key(path) || inner.directories.contains(path)
    }
}

fn lock_error(path: &Path, operation: &str) -> sous_core::error::SousError {
    sous_core::application::ApplicationError::Filesystem {
        path: path.to_path_buf(),
        reason: format!("Failed to {}: filesystem lock poisoned", operation),
    }
    .into()
}
