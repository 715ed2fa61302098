//! `sous add` — queue recipes for the next apply.

use tracing::{info, instrument};

use crate::{
    cli::{AddArgs, GlobalArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Resolve each reference, expand stacks, and queue the recipe names.
#[instrument(skip_all, fields(refs = args.recipes.len()))]
pub fn execute(
    args: AddArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let root = global.workspace_root();
    let service = super::build_service(&config);

    let outcome = service.add(&root, &args.recipes).map_err(CliError::Core)?;
    info!(queued = outcome.queued.len(), "recipes queued");

    for name in &outcome.queued {
        output.success(&format!("Queued '{name}'"))?;
    }
    for name in &outcome.already_present {
        output.warning(&format!("'{name}' is already pending or installed"))?;
    }
    for name in &outcome.suggested {
        output.info(&format!("Suggested companion recipe: '{name}'"))?;
    }

    if !outcome.queued.is_empty() {
        output.print("")?;
        output.print("Run 'sous apply' to apply pending recipes.")?;
    }

    Ok(())
}
