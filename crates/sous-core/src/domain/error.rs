//! Domain-layer errors.

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (for retry logic)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// A recipe reference string that does not parse.
    ///
    /// The reference grammar is total apart from the registry shorthand:
    /// only a shorthand missing its required parts produces this error.
    #[error("Malformed recipe reference '{reference}': {reason}")]
    MalformedReference { reference: String, reason: String },

    /// A manifest was found but is not a valid recipe or stack.
    ///
    /// Unlike a missing manifest (a non-fatal NotFound signal), an invalid
    /// one fails loading immediately - falling through to another location
    /// would silently mask a typo in the manifest the user meant.
    #[error("Invalid manifest: {reason}")]
    ManifestInvalid { reason: String },

    /// A generation rule whose shape violates the schema (e.g. no action,
    /// or more than one of template/content/append/merge).
    #[error("Invalid generate rule for '{path}': {reason}")]
    InvalidRule { path: String, reason: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::MalformedReference { reference, .. } => vec![
                format!("Could not parse '{}'", reference),
                "Valid forms: ./path, github:owner/repo[/path], git@host:repo.git,".into(),
                "  https://host/owner/repo, or a bare recipe name".into(),
            ],
            Self::ManifestInvalid { reason } => vec![
                format!("Manifest problem: {}", reason),
                "Every recipe.toml needs at least 'name' and 'version'".into(),
            ],
            Self::InvalidRule { path, .. } => vec![
                format!("Check the [[generates]] entry for '{}'", path),
                "Each rule needs exactly one of: template, content, append, merge".into(),
            ],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MalformedReference { .. } => ErrorCategory::Validation,
            Self::ManifestInvalid { .. } | Self::InvalidRule { .. } => ErrorCategory::Validation,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Internal,
}
