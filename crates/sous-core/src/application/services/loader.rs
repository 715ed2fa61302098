//! Recipe Manifest Loader.
//!
//! Given a recipe reference and workspace context, resolves and parses the
//! manifest, trying locations in a fixed order:
//!
//! 1. a local source's own path (for `./`, `../`, `/` references)
//! 2. `<workspace>/.sous/recipes/<name>/recipe.toml`
//! 3. the built-in recipes directory
//! 4. the fetched checkout of a git source (plus optional subpath)
//!
//! Locations that do not exist are silently skipped; exhausting them all is
//! a non-fatal NotFound signal (`Ok(None)`), not an error. A manifest that
//! is *found* but invalid fails immediately - see
//! [`DomainError::ManifestInvalid`](crate::domain::DomainError).

use std::path::{Path, PathBuf};
use std::sync::Arc;

use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::application::ports::{Filesystem, ManifestParser, SourceFetcher};
use crate::domain::{DomainError, ManifestDoc, Recipe, RecipeSource, parse_reference};
use crate::error::SousResult;

/// Manifest file name inside a recipe directory.
pub const MANIFEST_FILE: &str = "recipe.toml";

/// Workspace state directory at the workspace root.
pub const STATE_DIR: &str = ".sous";

/// A parsed manifest together with where it was found.
#[derive(Debug, Clone)]
pub struct LoadedManifest {
    pub doc: ManifestDoc,
    /// Directory containing the manifest; templates resolve relative to it.
    pub dir: PathBuf,
    /// SHA-256 of the raw manifest text.
    pub checksum: String,
}

/// A loaded recipe (the common case of [`LoadedManifest`]).
#[derive(Debug, Clone)]
pub struct LoadedRecipe {
    pub recipe: Recipe,
    pub dir: PathBuf,
    pub checksum: String,
}

/// Loads recipe manifests from workspace, built-in, and remote locations.
pub struct ManifestLoader {
    filesystem: Arc<dyn Filesystem>,
    parser: Arc<dyn ManifestParser>,
    fetcher: Arc<dyn SourceFetcher>,
    /// Location of the recipes shipped with the tool, when present.
    builtin_dir: Option<PathBuf>,
}

impl ManifestLoader {
    pub fn new(
        filesystem: Arc<dyn Filesystem>,
        parser: Arc<dyn ManifestParser>,
        fetcher: Arc<dyn SourceFetcher>,
        builtin_dir: Option<PathBuf>,
    ) -> Self {
        Self {
            filesystem,
            parser,
            fetcher,
            builtin_dir,
        }
    }

    /// Load the recipe a reference resolves to.
    ///
    /// Returns `Ok(None)` when every location was exhausted. A stack
    /// manifest in a recipe position is `ManifestInvalid` - stacks expand
    /// only at add time.
    pub fn load(
        &self,
        reference: &str,
        workspace_root: Option<&Path>,
    ) -> SousResult<Option<LoadedRecipe>> {
        match self.load_document(reference, workspace_root)? {
            None => Ok(None),
            Some(found) => match found.doc {
                ManifestDoc::Recipe(recipe) => Ok(Some(LoadedRecipe {
                    recipe,
                    dir: found.dir,
                    checksum: found.checksum,
                })),
                ManifestDoc::Stack(stack) => Err(DomainError::ManifestInvalid {
                    reason: format!(
                        "expected a recipe manifest, found stack '{}'",
                        stack.name
                    ),
                }
                .into()),
            },
        }
    }

    /// Load whatever manifest a reference resolves to - recipe or stack.
    pub fn load_document(
        &self,
        reference: &str,
        workspace_root: Option<&Path>,
    ) -> SousResult<Option<LoadedManifest>> {
        let source = parse_reference(reference)?;

        // (a) Local sources load directly from their path.
        if let RecipeSource::Local { path, .. } = &source {
            if let Some(found) = self.try_dir(path)? {
                return Ok(Some(found));
            }
        }

        let name = source.name();

        // (b) Workspace-local recipes shadow everything remote.
        if let Some(root) = workspace_root {
            let dir = root.join(STATE_DIR).join("recipes").join(name);
            if let Some(found) = self.try_dir(&dir)? {
                return Ok(Some(found));
            }
        }

        // (c) Built-in recipes shipped with the tool.
        if let Some(builtin) = &self.builtin_dir {
            if let Some(found) = self.try_dir(&builtin.join(name))? {
                return Ok(Some(found));
            }
        }

        // (d) Remote git sources, via the shared on-disk cache.
        if let RecipeSource::Git {
            repo,
            reference: git_ref,
            subpath,
            ..
        } = &source
        {
            match self.fetcher.fetch(repo, git_ref) {
                Ok(checkout) => {
                    let dir = match subpath {
                        Some(sub) => checkout.join(sub),
                        None => checkout,
                    };
                    if let Some(found) = self.try_dir(&dir)? {
                        return Ok(Some(found));
                    }
                }
                Err(e) => {
                    // A dead remote exhausts this location rather than
                    // aborting a resolution that may not need it.
                    warn!(repo = %repo, error = %e, "remote fetch failed, treating location as exhausted");
                }
            }
        }

        debug!(reference, "all manifest locations exhausted");
        Ok(None)
    }

    /// Try one candidate directory.
    ///
    /// A missing manifest is `Ok(None)`; a present-but-invalid one is an
    /// immediate error regardless of remaining fallback locations.
    fn try_dir(&self, dir: &Path) -> SousResult<Option<LoadedManifest>> {
        let manifest_path = dir.join(MANIFEST_FILE);
        if !self.filesystem.exists(&manifest_path) {
            return Ok(None);
        }

        let raw = self.filesystem.read_to_string(&manifest_path)?;
        let doc = self.parser.parse(&raw)?;
        debug!(name = doc.name(), dir = %dir.display(), "loaded manifest");

        Ok(Some(LoadedManifest {
            doc,
            dir: dir.to_path_buf(),
            checksum: manifest_digest(&raw),
        }))
    }
}

/// Hex SHA-256 of a manifest's raw text.
pub fn manifest_digest(raw: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw.as_bytes());
    format!("{:x}", hasher.finalize())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
