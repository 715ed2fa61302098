//! Core domain layer for Sous.
//!
//! This module contains pure business logic with ZERO I/O:
//! the recipe data model, the reference grammar, the workspace state
//! machine, and the minimal template language. All filesystem, network,
//! and subprocess concerns are handled via ports (traits) defined in the
//! application layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: No filesystem, network, or external calls
//! - **Immutable entities**: All domain objects are Clone + PartialEq
//! - **Rich domain model**: Behavior lives in entities, not services

// Public API - what the world sees
pub mod error;
pub mod recipe;
pub mod render;
pub mod source;
pub mod workspace;

// Re-exports for convenience
pub use error::{DomainError, ErrorCategory};
pub use recipe::{
    CheckRule, CommandSpec, GenerateAction, GenerateRule, Hooks, ManifestDoc, Recipe, RecipeScope,
    Requirement, Stack, VariableSpec, VariableType, WhenClause,
};
pub use render::{RenderContext, value_to_display};
pub use source::{DEFAULT_BRANCH, DEFAULT_REGISTRY, RecipeSource, parse_reference};
pub use workspace::{InstalledRecipe, WorkspaceConfig, WorkspaceLock};
