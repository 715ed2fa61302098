//! Sous Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the Sous
//! recipe engine, following hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            sous-cli (CLI)               │
//! │      (Implements Driving Ports)         │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │  (ApplyService, ManifestLoader,         │
//! │   DependencyResolver, GenerationEngine) │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │       Application Ports (Traits)        │
//! │  (Filesystem, SourceFetcher, Runner,    │
//! │   ManifestParser, StateStore)           │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │     sous-adapters (Infrastructure)      │
//! │ (LocalFilesystem, GitFetcher, etc.)     │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │        Domain Layer (Pure Logic)        │
//! │  (Recipe, Stack, RecipeSource,          │
//! │   WorkspaceConfig, RenderContext)       │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sous_core::{
//!     application::ApplyService,
//!     domain::parse_reference,
//! };
//!
//! // 1. Parse a recipe reference
//! let source = parse_reference("github:acme/recipes/rust-ci").unwrap();
//!
//! // 2. Use the apply service (with injected adapters)
//! let service = ApplyService::new(loader, engine, store);
//! service.apply(workspace_root, worktree, "my-project").unwrap();
//! ```

// Re-export domain layer (stable, well-defined API)
pub mod domain;

// Re-export application layer (orchestration logic)
pub mod application;

// Re-export error types
pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        ApplyService, DependencyResolver, GenerationEngine, ManifestLoader, ValidationService,
        ports::{Filesystem, ManifestParser, ProcessRunner, SourceFetcher, StateStore},
    };
    pub use crate::domain::{
        GenerateRule, Recipe, RecipeScope, RecipeSource, RenderContext, Requirement, Stack,
        WorkspaceConfig, WorkspaceLock, parse_reference,
    };
    pub use crate::error::{SousError, SousResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
