//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "apply the pending recipes" or "resolve an
//! application order".

pub mod apply_service;
pub mod engine;
pub mod loader;
pub mod resolver;
pub mod validate_service;
pub mod variables;

#[cfg(test)]
pub(crate) mod testutil;

pub use apply_service::{AddOutcome, ApplyReport, ApplyService};
pub use engine::GenerationEngine;
pub use loader::{LoadedManifest, LoadedRecipe, ManifestLoader};
pub use resolver::{Conflict, DependencyResolver};
pub use validate_service::{CheckReport, CheckResult, ValidationService};
pub use variables::{effective_variables, merge_stack_defaults};
