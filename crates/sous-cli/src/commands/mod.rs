//! Command handlers.
//!
//! Each submodule owns one subcommand: it translates CLI arguments into
//! core service calls and displays results. No business logic lives here.

use std::sync::Arc;

use sous_adapters::{
    GitFetcher, LocalFilesystem, ShellRunner, TomlManifestParser, TomlStateStore,
};
use sous_core::application::{ApplyService, GenerationEngine, ManifestLoader, ValidationService};

use crate::config::AppConfig;

pub mod add;
pub mod apply;
pub mod completions;
pub mod config;
pub mod init;
pub mod list;
pub mod run;
pub mod validate;

/// Wire the production adapters into an [`ApplyService`].
pub(crate) fn build_service(config: &AppConfig) -> ApplyService {
    let filesystem = Arc::new(LocalFilesystem::new());
    let loader = ManifestLoader::new(
        filesystem.clone(),
        Arc::new(TomlManifestParser::new()),
        Arc::new(GitFetcher::new(config.cache_dir())),
        config.recipes.builtin_dir.clone(),
    );
    let engine = GenerationEngine::new(filesystem, Arc::new(ShellRunner::new()));
    ApplyService::new(loader, engine, Arc::new(TomlStateStore::new()))
}

/// Wire the production adapters into a [`ValidationService`].
pub(crate) fn build_validator() -> ValidationService {
    ValidationService::new(Arc::new(LocalFilesystem::new()), Arc::new(ShellRunner::new()))
}
