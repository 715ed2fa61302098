//! `sous apply` — apply every pending recipe.
//!
//! Dispatch sequence:
//! 1. Resolve the workspace root and worktree target
//! 2. Determine the project name (flag, else workspace name)
//! 3. Call the core apply orchestration
//! 4. Report what was applied and skipped

use tracing::{info, instrument};

use crate::{
    cli::{ApplyArgs, GlobalArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Execute the `sous apply` command.
#[instrument(skip_all)]
pub fn execute(
    args: ApplyArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let root = global.workspace_root();
    let worktree = args.target.unwrap_or_else(|| root.clone());
    let service = super::build_service(&config);

    // Project name: explicit flag wins, else the workspace's own name.
    let project_name = match args.project {
        Some(name) => name,
        None => service
            .config(&root)
            .map_err(CliError::Core)?
            .map(|c| c.name)
            .unwrap_or_else(|| "project".to_string()),
    };

    info!(
        root = %root.display(),
        worktree = %worktree.display(),
        project = %project_name,
        "apply started"
    );

    let report = service
        .apply(&root, &worktree, &project_name)
        .map_err(CliError::Core)?;

    if report.is_noop() {
        output.info("Nothing pending; workspace is up to date.")?;
        return Ok(());
    }

    for recipe in &report.applied {
        output.success(&format!("Applied {} @ {}", recipe.name, recipe.version))?;
    }
    for name in &report.skipped {
        output.print(&format!("  {name} already installed, skipped"))?;
    }

    output.print("")?;
    output.success(&format!(
        "{} recipe(s) applied to {}",
        report.applied.len(),
        worktree.display()
    ))?;

    Ok(())
}
