//! `sous validate` — run recipe validation checks.

use tracing::instrument;

use sous_core::application::ApplicationError;

use crate::{
    cli::{GlobalArgs, ValidateArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Validate one recipe, or every installed recipe.
#[instrument(skip_all)]
pub fn execute(
    args: ValidateArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let root = global.workspace_root();
    let target = args.target.unwrap_or_else(|| root.clone());
    let service = super::build_service(&config);
    let validator = super::build_validator();

    let names: Vec<String> = match args.recipe {
        Some(name) => vec![name],
        None => {
            let workspace = service.config(&root).map_err(CliError::Core)?.ok_or_else(|| {
                CliError::Core(
                    ApplicationError::WorkspaceNotInitialized { root: root.clone() }.into(),
                )
            })?;
            workspace.recipes.iter().map(|r| r.name.clone()).collect()
        }
    };

    if names.is_empty() {
        output.info("No installed recipes to validate.")?;
        return Ok(());
    }

    let mut failed = 0usize;
    for name in &names {
        let loaded = service
            .loader()
            .load(name, Some(root.as_path()))
            .map_err(CliError::Core)?
            .ok_or_else(|| {
                CliError::Core(ApplicationError::RecipeNotFound { name: name.clone() }.into())
            })?;

        let report = validator.validate(&loaded, &target).map_err(CliError::Core)?;

        if report.results.is_empty() {
            output.print(&format!("{name}: no checks declared"))?;
            continue;
        }

        output.header(&format!("{name}:"))?;
        for result in &report.results {
            if result.passed {
                output.success(&format!("  {}", result.description))?;
            } else {
                failed += 1;
                let detail = result
                    .detail
                    .as_deref()
                    .map(|d| format!(" ({d})"))
                    .unwrap_or_default();
                output.error(&format!("  {}{detail}", result.description))?;
            }
        }
    }

    if failed > 0 {
        return Err(CliError::ChecksFailed { failed });
    }
    output.print("")?;
    output.success("All checks passed")?;
    Ok(())
}
