//! `sous list` — show installed and pending recipes.

use serde_json::json;

use crate::{
    cli::{GlobalArgs, ListArgs, ListFormat},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

pub fn execute(
    args: ListArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let root = global.workspace_root();
    let service = super::build_service(&config);

    let workspace = service.config(&root).map_err(CliError::Core)?.ok_or_else(|| {
        CliError::Core(
            sous_core::application::ApplicationError::WorkspaceNotInitialized { root: root.clone() }
                .into(),
        )
    })?;

    match args.format {
        ListFormat::Table => {
            output.header(&format!("Workspace '{}'", workspace.name))?;
            if workspace.recipes.is_empty() && workspace.pending.is_empty() {
                output.print("  (no recipes)")?;
                return Ok(());
            }
            for recipe in &workspace.recipes {
                output.print(&format!(
                    "  {} @ {}  installed {}",
                    recipe.name, recipe.version, recipe.applied_at
                ))?;
            }
            for name in &workspace.pending {
                output.print(&format!("  {name}  (pending)"))?;
            }
        }

        ListFormat::List => {
            for recipe in &workspace.recipes {
                println!("{}", recipe.name);
            }
            for name in &workspace.pending {
                println!("{name}");
            }
        }

        ListFormat::Json => {
            // Serialise to stdout directly (bypasses OutputManager because
            // JSON output must be parseable even in non-TTY pipes).
            let doc = json!({
                "workspace": workspace.name,
                "installed": workspace.recipes,
                "pending": workspace.pending,
            });
            let rendered = serde_json::to_string_pretty(&doc).map_err(|e| {
                CliError::InvalidInput {
                    message: format!("cannot serialise workspace state: {e}"),
                }
            })?;
            println!("{rendered}");
        }
    }

    Ok(())
}
