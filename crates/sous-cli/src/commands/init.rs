//! `sous init` — initialise a workspace.

use tracing::instrument;

use sous_core::application::services::loader::STATE_DIR;

use crate::{
    cli::{GlobalArgs, InitArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Create the workspace state directory and config.
#[instrument(skip_all)]
pub fn execute(
    args: InitArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let root = global.workspace_root();

    // Workspace name defaults to the directory's name.
    let name = match args.name {
        Some(name) => name,
        None => root
            .canonicalize()
            .ok()
            .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            .unwrap_or_else(|| "workspace".to_string()),
    };

    let service = super::build_service(&config);
    service.init(&root, &name).map_err(CliError::Core)?;

    // Pre-create the local recipes directory so users see where to put
    // their own recipes.
    std::fs::create_dir_all(root.join(STATE_DIR).join("recipes")).map_err(|e| {
        CliError::IoError {
            message: format!("Failed to create recipes directory under {}", root.display()),
            source: e,
        }
    })?;

    output.success(&format!("Workspace '{name}' initialised"))?;
    output.print(&format!("  State:   {}/{STATE_DIR}/config.toml", root.display()))?;
    output.print(&format!("  Recipes: {}/{STATE_DIR}/recipes/", root.display()))?;
    Ok(())
}
