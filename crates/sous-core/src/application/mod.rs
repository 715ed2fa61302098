//! Application layer for Sous.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (ManifestLoader, DependencyResolver,
//!   GenerationEngine, ApplyService, ValidationService)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! business logic itself. All business rules live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{
    AddOutcome, ApplyReport, ApplyService, CheckReport, Conflict, DependencyResolver,
    GenerationEngine, LoadedRecipe, ManifestLoader, ValidationService,
};

// Re-export port traits (for adapter implementation)
pub use ports::{
    CommandOutcome, Filesystem, ManifestParser, ProcessRunner, SourceFetcher, StateStore,
};

pub use error::ApplicationError;
