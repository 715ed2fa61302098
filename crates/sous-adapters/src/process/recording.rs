//! Recording process runner for testing.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use sous_core::application::ports::{CommandOutcome, ProcessRunner};
use sous_core::error::SousResult;

/// Records every invocation without spawning anything.
///
/// Commands registered via [`fail_on`](Self::fail_on) report exit status 1;
/// everything else succeeds with empty output.
#[derive(Debug, Clone, Default)]
pub struct RecordingRunner {
    inner: Arc<Mutex<RecordingRunnerInner>>,
}

#[derive(Debug, Default)]
struct RecordingRunnerInner {
    calls: Vec<(String, PathBuf)>,
    fail_on: HashSet<String>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `command` exit non-zero from now on.
    pub fn fail_on(&self, command: &str) {
        self.inner
            .lock()
            .unwrap()
            .fail_on
            .insert(command.to_string());
    }

    /// Every `(command, cwd)` pair run so far, in order.
    pub fn calls(&self) -> Vec<(String, PathBuf)> {
        self.inner.lock().unwrap().calls.clone()
    }
}

impl ProcessRunner for RecordingRunner {
    fn run(&self, command: &str, cwd: &Path) -> SousResult<CommandOutcome> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push((command.to_string(), cwd.to_path_buf()));
        let status = if inner.fail_on.contains(command) { 1 } else { 0 };
        Ok(CommandOutcome {
            status,
            stdout: String::new(),
            stderr: String::new(),
        })
    }
}
