//! Shell process runner using `sh -c`.

use std::path::Path;
use std::process::Command;

use tracing::debug;

use sous_core::application::ApplicationError;
use sous_core::application::ports::{CommandOutcome, ProcessRunner};
use sous_core::error::SousResult;

/// Production runner: executes commands through `sh -c` in the given
/// working directory, blocking until they exit. No timeout is applied.
#[derive(Debug, Clone, Copy)]
pub struct ShellRunner;

impl ShellRunner {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ShellRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessRunner for ShellRunner {
    fn run(&self, command: &str, cwd: &Path) -> SousResult<CommandOutcome> {
        debug!(command, cwd = %cwd.display(), "running shell command");

        let output = Command::new("sh")
            .arg("-c")
            .arg(command)
            .current_dir(cwd)
            .output()
            .map_err(|e| ApplicationError::CommandFailed {
                command: command.to_string(),
                reason: e.to_string(),
            })?;

        Ok(CommandOutcome {
            // A None code means the process died to a signal.
            status: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn captures_stdout_and_zero_status() {
        let temp = TempDir::new().unwrap();
        let outcome = ShellRunner::new().run("echo hello", temp.path()).unwrap();
        assert!(outcome.success());
        assert_eq!(outcome.stdout.trim(), "hello");
    }

    #[test]
    fn reports_nonzero_exit_status() {
        let temp = TempDir::new().unwrap();
        let outcome = ShellRunner::new().run("exit 3", temp.path()).unwrap();
        assert!(!outcome.success());
        assert_eq!(outcome.status, 3);
    }

    #[test]
    fn runs_in_the_given_directory() {
        let temp = TempDir::new().unwrap();
        let outcome = ShellRunner::new().run("pwd", temp.path()).unwrap();
        // Canonical paths may differ by symlinks (e.g. /tmp vs /private/tmp);
        // compare file names instead.
        let reported = outcome.stdout.trim().to_string();
        assert!(
            reported.ends_with(
                temp.path()
                    .file_name()
                    .unwrap()
                    .to_string_lossy()
                    .as_ref()
            ),
            "pwd reported {reported}"
        );
    }

    #[test]
    fn missing_directory_is_command_failed() {
        let err = ShellRunner::new()
            .run("true", Path::new("/no/such/dir"))
            .unwrap_err();
        assert!(matches!(
            err,
            sous_core::error::SousError::Application(ApplicationError::CommandFailed { .. })
        ));
    }
}
