//! Apply Service - main application orchestrator.
//!
//! This service coordinates the full recipe workflow:
//! 1. `init` creates the workspace config
//! 2. `add` queues recipes (expanding stacks) into `pending`
//! 3. `apply` resolves `pending`, screens conflicts, generates each recipe
//!    in dependency order, then persists Config and rewrites the Lock
//!
//! Persistence is deferred to the end of the whole batch: a mid-batch
//! failure leaves Config/Lock unwritten even though earlier recipes'
//! filesystem effects remain. Recovery is manual - fix the cause and re-run
//! apply; rule semantics are idempotent.

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, instrument, warn};

use crate::application::error::ApplicationError;
use crate::application::ports::{CommandOutcome, StateStore};
use crate::application::services::engine::GenerationEngine;
use crate::application::services::loader::ManifestLoader;
use crate::application::services::resolver::DependencyResolver;
use crate::application::services::variables::{effective_variables, merge_stack_defaults};
use crate::domain::{InstalledRecipe, ManifestDoc, RecipeScope, WorkspaceConfig, WorkspaceLock};
use crate::error::{SousError, SousResult};

/// What `add` did: names newly queued, names already present, and advisory
/// suggestions collected from the added recipes.
#[derive(Debug, Clone, Default)]
pub struct AddOutcome {
    pub queued: Vec<String>,
    pub already_present: Vec<String>,
    pub suggested: Vec<String>,
}

/// What `apply` did.
#[derive(Debug, Clone, Default)]
pub struct ApplyReport {
    /// Recipes materialized by this batch, in application order.
    pub applied: Vec<InstalledRecipe>,
    /// Resolved names skipped because they were already installed.
    pub skipped: Vec<String>,
}

impl ApplyReport {
    pub fn is_noop(&self) -> bool {
        self.applied.is_empty() && self.skipped.is_empty()
    }
}

/// Main orchestration service over the loader, engine, and state store.
pub struct ApplyService {
    loader: ManifestLoader,
    engine: GenerationEngine,
    store: Arc<dyn StateStore>,
}

impl ApplyService {
    pub fn new(loader: ManifestLoader, engine: GenerationEngine, store: Arc<dyn StateStore>) -> Self {
        Self {
            loader,
            engine,
            store,
        }
    }

    /// Initialize a workspace at `root`.
    #[instrument(skip(self), fields(root = %root.display()))]
    pub fn init(&self, root: &Path, name: &str) -> SousResult<WorkspaceConfig> {
        if self.store.load_config(root)?.is_some() {
            return Err(ApplicationError::WorkspaceExists {
                root: root.to_path_buf(),
            }
            .into());
        }
        let config = WorkspaceConfig::new(name, now());
        self.store.save_config(root, &config)?;
        info!(workspace = name, "workspace initialized");
        Ok(config)
    }

    /// Load the workspace config, if the workspace is initialized.
    pub fn config(&self, root: &Path) -> SousResult<Option<WorkspaceConfig>> {
        self.store.load_config(root)
    }

    /// Queue recipes (or stacks) for the next apply.
    ///
    /// A stack is not itself queued: it expands to its included recipe
    /// names, and its `defaults` seed the workspace override map.
    #[instrument(skip(self, root), fields(refs = references.len()))]
    pub fn add(&self, root: &Path, references: &[String]) -> SousResult<AddOutcome> {
        let mut config = self.require_config(root)?;
        let mut outcome = AddOutcome::default();

        for reference in references {
            let found = self
                .loader
                .load_document(reference, Some(root))?
                .ok_or_else(|| ApplicationError::RecipeNotFound {
                    name: reference.clone(),
                })?;

            match found.doc {
                ManifestDoc::Recipe(recipe) => {
                    outcome.suggested.extend(recipe.suggests.iter().cloned());
                    queue(&mut config, &recipe.name, &mut outcome);
                }
                ManifestDoc::Stack(stack) => {
                    debug!(stack = %stack.name, includes = stack.includes.len(), "expanding stack");
                    for included in &stack.includes {
                        queue(&mut config, included, &mut outcome);
                    }
                    merge_stack_defaults(&mut config.variables, &stack);
                }
            }
        }

        self.store.save_config(root, &config)?;
        Ok(outcome)
    }

    /// Apply every pending recipe.
    ///
    /// Recipes are processed strictly one at a time in resolved dependency
    /// order - later recipes' rules (especially merge) may depend on files
    /// produced by earlier ones. `worktree` receives worktree-scoped
    /// generation; workspace-scoped recipes target `root` itself.
    #[instrument(skip_all, fields(root = %root.display(), project = project_name))]
    pub fn apply(
        &self,
        root: &Path,
        worktree: &Path,
        project_name: &str,
    ) -> SousResult<ApplyReport> {
        let mut config = self.require_config(root)?;

        if config.pending.is_empty() {
            debug!("nothing pending, apply is a no-op");
            return Ok(ApplyReport::default());
        }

        let resolver = DependencyResolver::new(&self.loader);
        let order = resolver.resolve(&config.pending, Some(root))?;

        // Screen the full candidate set: installed ∪ resolved batch.
        let mut candidates: Vec<String> =
            config.recipes.iter().map(|r| r.name.clone()).collect();
        for name in &order {
            if !candidates.contains(name) {
                candidates.push(name.clone());
            }
        }
        let conflicts = resolver.screen_conflicts(&candidates, Some(root))?;
        if !conflicts.is_empty() {
            warn!(count = conflicts.len(), "aborting apply: conflicting recipes");
            return Err(ApplicationError::ConflictDetected { conflicts }.into());
        }

        let mut applied: Vec<InstalledRecipe> = Vec::new();
        let mut skipped: Vec<String> = Vec::new();

        for name in &order {
            if config.is_installed(name) {
                skipped.push(name.clone());
                continue;
            }

            let loaded = self.loader.load(name, Some(root))?.ok_or_else(|| {
                ApplicationError::RecipeNotFound { name: name.clone() }
            })?;
            let variables = effective_variables(&loaded.recipe, config.variables.get(name));
            let target = match loaded.recipe.scope {
                RecipeScope::Workspace => root,
                RecipeScope::Worktree => worktree,
            };

            self.engine
                .apply(&loaded, target, &variables, project_name)?;

            applied.push(InstalledRecipe {
                name: loaded.recipe.name.clone(),
                version: loaded.recipe.version.clone(),
                applied_at: now(),
                checksum: Some(loaded.checksum.clone()),
            });
        }

        // Persist only after the whole batch succeeded.
        config.mark_applied(applied.clone());
        self.store.save_config(root, &config)?;
        let lock = WorkspaceLock::snapshot(&config, now());
        self.store.write_lock(root, &lock)?;

        info!(applied = applied.len(), skipped = skipped.len(), "apply complete");
        Ok(ApplyReport { applied, skipped })
    }

    /// Run a named command from a recipe's `commands` map in `cwd`.
    pub fn run_command(
        &self,
        root: &Path,
        cwd: &Path,
        recipe_name: &str,
        command_name: &str,
    ) -> SousResult<CommandOutcome> {
        let loaded = self.loader.load(recipe_name, Some(root))?.ok_or_else(|| {
            ApplicationError::RecipeNotFound {
                name: recipe_name.to_string(),
            }
        })?;
        let spec = loaded
            .recipe
            .commands
            .get(command_name)
            .ok_or_else(|| ApplicationError::UnknownCommand {
                recipe: recipe_name.to_string(),
                command: command_name.to_string(),
            })?;
        self.engine.run_shell(&spec.run, cwd)
    }

    pub fn loader(&self) -> &ManifestLoader {
        &self.loader
    }

    fn require_config(&self, root: &Path) -> SousResult<WorkspaceConfig> {
        self.store
            .load_config(root)?
            .ok_or_else(|| -> SousError {
                ApplicationError::WorkspaceNotInitialized {
                    root: root.to_path_buf(),
                }
                .into()
            })
    }
}

fn queue(config: &mut WorkspaceConfig, name: &str, outcome: &mut AddOutcome) {
    if config.queue(name) {
        outcome.queued.push(name.to_string());
    } else {
        outcome.already_present.push(name.to_string());
    }
}

fn now() -> String {
    Utc::now().to_rfc3339()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
