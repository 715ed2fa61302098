//! Application layer errors.
//!
//! These errors represent failures in orchestration, not business logic.
//! Business logic errors are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::application::services::resolver::Conflict;
use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// Every resolution location was exhausted without finding a manifest.
    #[error("Recipe not found: {name}")]
    RecipeNotFound { name: String },

    /// A remote clone or update failed.
    #[error("Failed to fetch '{repo}': {reason}")]
    FetchFailed { repo: String, reason: String },

    /// The requirement graph contains a cycle through this recipe.
    #[error("Circular dependency detected at '{name}'")]
    CircularDependency { name: String },

    /// No candidate of a requirement could be loaded.
    #[error("Cannot satisfy requirement '{requirement}' of '{required_by}'")]
    UnsatisfiedDependency {
        requirement: String,
        required_by: String,
    },

    /// Mutually exclusive recipes ended up in the same application set.
    #[error("Conflicting recipes selected: {}", format_conflicts(.conflicts))]
    ConflictDetected { conflicts: Vec<Conflict> },

    /// A template rule names a file the recipe directory does not contain.
    #[error("Recipe '{recipe}' references missing template '{template}'")]
    MissingTemplate { recipe: String, template: String },

    /// A pre/post hook exited non-zero.
    #[error("Hook '{hook}' of recipe '{recipe}' failed with status {status}: {command}")]
    HookFailed {
        recipe: String,
        hook: &'static str,
        command: String,
        status: i32,
    },

    /// A merge rule's target is not a parseable structured document.
    #[error("Cannot merge into {path}: {reason}")]
    InvalidMergeTarget { path: PathBuf, reason: String },

    /// Filesystem operation failed during generation.
    #[error("Filesystem error at {path}: {reason}")]
    Filesystem { path: PathBuf, reason: String },

    /// A subprocess could not be spawned at all (as opposed to exiting
    /// non-zero, which is `HookFailed`).
    #[error("Failed to run command '{command}': {reason}")]
    CommandFailed { command: String, reason: String },

    /// A recipe's `commands` map has no entry by this name.
    #[error("Recipe '{recipe}' defines no command '{command}'")]
    UnknownCommand { recipe: String, command: String },

    /// Reading or writing workspace state failed.
    #[error("Workspace state error: {reason}")]
    StateStore { reason: String },

    /// `init` on an already-initialized workspace.
    #[error("Workspace already initialized at {root}")]
    WorkspaceExists { root: PathBuf },

    /// An operation that needs a workspace found none.
    #[error("No workspace found at {root}")]
    WorkspaceNotInitialized { root: PathBuf },
}

fn format_conflicts(conflicts: &[Conflict]) -> String {
    conflicts
        .iter()
        .map(|c| format!("{} ↯ {}", c.recipe, c.conflicts_with))
        .collect::<Vec<_>>()
        .join(", ")
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::RecipeNotFound { name } => vec![
                format!("No manifest found for '{}'", name),
                "Check the name, or add the recipe under .sous/recipes/".into(),
                "Remote recipes need a reachable repository".into(),
            ],
            Self::FetchFailed { repo, .. } => vec![
                format!("Could not clone or update: {}", repo),
                "Check your network connection and repository access".into(),
            ],
            Self::CircularDependency { name } => vec![
                format!("'{}' ends up requiring itself", name),
                "Break the cycle by removing one of the requires entries".into(),
            ],
            Self::UnsatisfiedDependency {
                requirement,
                required_by,
            } => vec![
                format!("'{}' requires '{}'", required_by, requirement),
                "None of the alternatives could be loaded".into(),
                "Add one of them locally or fix the reference".into(),
            ],
            Self::ConflictDetected { conflicts } => {
                let mut out = vec!["These recipes cannot be applied together:".into()];
                for c in conflicts {
                    out.push(format!("  • {} conflicts with {}", c.recipe, c.conflicts_with));
                }
                out
            }
            Self::MissingTemplate { recipe, template } => vec![
                format!("'{}' should ship a '{}' file next to its manifest", recipe, template),
                "The recipe is broken; report it to its author".into(),
            ],
            Self::HookFailed { command, .. } => vec![
                format!("Hook command failed: {}", command),
                "Rules applied before the failure remain applied".into(),
                "Fix the hook and re-run apply; rules are idempotent".into(),
            ],
            Self::InvalidMergeTarget { path, .. } => vec![
                format!("'{}' must be valid JSON for merge rules", path.display()),
                "Fix or remove the file and re-run apply".into(),
            ],
            Self::WorkspaceNotInitialized { .. } => vec![
                "Run 'sous init' first".into(),
            ],
            Self::WorkspaceExists { root } => vec![
                format!("'{}' already contains a .sous directory", root.display()),
            ],
            _ => vec!["Check the error details above".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::RecipeNotFound { .. } => ErrorCategory::NotFound,
            Self::FetchFailed { .. } => ErrorCategory::Internal,
            Self::CircularDependency { .. } | Self::UnsatisfiedDependency { .. } => {
                ErrorCategory::Validation
            }
            Self::ConflictDetected { .. } => ErrorCategory::Conflict,
            Self::MissingTemplate { .. } | Self::UnknownCommand { .. } => ErrorCategory::NotFound,
            Self::HookFailed { .. } | Self::CommandFailed { .. } => ErrorCategory::Internal,
            Self::InvalidMergeTarget { .. } => ErrorCategory::Validation,
            Self::Filesystem { .. } | Self::StateStore { .. } => ErrorCategory::Internal,
            Self::WorkspaceExists { .. } | Self::WorkspaceNotInitialized { .. } => {
                ErrorCategory::Configuration
            }
        }
    }
}
