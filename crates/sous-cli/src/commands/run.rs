//! `sous run` — execute a recipe-defined command.

use std::io::Write as _;

use tracing::instrument;

use crate::{
    cli::{GlobalArgs, RunArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Run a named entry from a recipe's `[commands]` table.
#[instrument(skip_all, fields(recipe = %args.recipe, command = %args.command))]
pub fn execute(
    args: RunArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let root = global.workspace_root();
    let cwd = args.target.unwrap_or_else(|| root.clone());
    let service = super::build_service(&config);

    let outcome = service
        .run_command(&root, &cwd, &args.recipe, &args.command)
        .map_err(CliError::Core)?;

    // Pass the command's own output through untouched.
    print!("{}", outcome.stdout);
    let _ = std::io::stderr().write_all(outcome.stderr.as_bytes());

    if !outcome.success() {
        return Err(CliError::CommandExited {
            command: format!("{} {}", args.recipe, args.command),
            status: outcome.status,
        });
    }

    output.success(&format!("'{}' completed", args.command))?;
    Ok(())
}
