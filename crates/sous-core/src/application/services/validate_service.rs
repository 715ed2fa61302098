//! Validation Service - post-apply checks.
//!
//! Runs a recipe's `pre_validate` hooks and its typed `validates` checks
//! against a target directory. Checks never mutate the target; each one
//! resolves to pass/fail with an optional detail message.

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::application::error::ApplicationError;
use crate::application::ports::{Filesystem, ProcessRunner};
use crate::application::services::loader::LoadedRecipe;
use crate::domain::CheckRule;
use crate::error::SousResult;

/// Outcome of one check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    pub description: String,
    pub passed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// All check outcomes for one recipe.
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub recipe: String,
    pub results: Vec<CheckResult>,
}

impl CheckReport {
    pub fn passed(&self) -> bool {
        self.results.iter().all(|r| r.passed)
    }
}

/// Evaluates validation checks through the same ports the engine uses.
pub struct ValidationService {
    filesystem: Arc<dyn Filesystem>,
    runner: Arc<dyn ProcessRunner>,
}

impl ValidationService {
    pub fn new(filesystem: Arc<dyn Filesystem>, runner: Arc<dyn ProcessRunner>) -> Self {
        Self { filesystem, runner }
    }

    /// Run `pre_validate` hooks, then every declared check.
    ///
    /// A failing hook aborts with `HookFailed`; failing checks do not - they
    /// are data in the report.
    #[instrument(skip_all, fields(recipe = %loaded.recipe.name))]
    pub fn validate(&self, loaded: &LoadedRecipe, target: &Path) -> SousResult<CheckReport> {
        let recipe = &loaded.recipe;

        for command in &recipe.hooks.pre_validate {
            let outcome = self.runner.run(command, target)?;
            if !outcome.success() {
                return Err(ApplicationError::HookFailed {
                    recipe: recipe.name.clone(),
                    hook: "pre_validate",
                    command: command.clone(),
                    status: outcome.status,
                }
                .into());
            }
        }

        let mut results = Vec::with_capacity(recipe.validates.len());
        for check in &recipe.validates {
            let result = self.evaluate(check, target)?;
            debug!(description = %result.description, passed = result.passed, "check evaluated");
            results.push(result);
        }

        Ok(CheckReport {
            recipe: recipe.name.clone(),
            results,
        })
    }

    fn evaluate(&self, check: &CheckRule, target: &Path) -> SousResult<CheckResult> {
        let result = match check {
            CheckRule::FileExists { path } => CheckResult {
                description: format!("file exists: {path}"),
                passed: self.filesystem.exists(&target.join(path)),
                detail: None,
            },
            CheckRule::FileContains { path, needle } => {
                let full = target.join(path);
                if !self.filesystem.exists(&full) {
                    CheckResult {
                        description: format!("{path} contains '{needle}'"),
                        passed: false,
                        detail: Some("file does not exist".into()),
                    }
                } else {
                    let content = self.filesystem.read_to_string(&full)?;
                    CheckResult {
                        description: format!("{path} contains '{needle}'"),
                        passed: content.contains(needle),
                        detail: None,
                    }
                }
            }
            CheckRule::CommandSucceeds { run } => {
                let outcome = self.runner.run(run, target)?;
                CheckResult {
                    description: format!("command succeeds: {run}"),
                    passed: outcome.success(),
                    detail: (!outcome.success()).then(|| format!("exit status {}", outcome.status)),
                }
            }
            CheckRule::JsonField {
                path,
                pointer,
                equals,
            } => self.evaluate_json_field(target, path, pointer, equals.as_ref())?,
        };
        Ok(result)
    }

    fn evaluate_json_field(
        &self,
        target: &Path,
        path: &str,
        pointer: &str,
        equals: Option<&Value>,
    ) -> SousResult<CheckResult> {
        let description = match equals {
            Some(expected) => format!("{path}: {pointer} == {expected}"),
            None => format!("{path}: {pointer} present"),
        };
        let full = target.join(path);
        if !self.filesystem.exists(&full) {
            return Ok(CheckResult {
                description,
                passed: false,
                detail: Some("file does not exist".into()),
            });
        }

        let raw = self.filesystem.read_to_string(&full)?;
        let document: Value = match serde_json::from_str(&raw) {
            Ok(v) => v,
            Err(e) => {
                return Ok(CheckResult {
                    description,
                    passed: false,
                    detail: Some(format!("not valid JSON: {e}")),
                });
            }
        };

        let (passed, detail) = match (document.pointer(pointer), equals) {
            (None, _) => (false, Some("field missing".into())),
            (Some(_), None) => (true, None),
            (Some(actual), Some(expected)) if actual == expected => (true, None),
            (Some(actual), Some(_)) => (false, Some(format!("found {actual}"))),
        };
        Ok(CheckResult {
            description,
            passed,
            detail,
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::testutil::{MemoryFs, RecordingRunner};
    use crate::domain::{Hooks, Recipe};
    use crate::error::SousError;
    use std::collections::BTreeMap;

    fn recipe_with_checks(checks: Vec<CheckRule>) -> LoadedRecipe {
        LoadedRecipe {
            recipe: Recipe {
                name: "checked".into(),
                version: "1.0.0".into(),
                description: String::new(),
                scope: Default::default(),
                requires: vec![],
                conflicts: vec![],
                suggests: vec![],
                variables: BTreeMap::new(),
                generates: vec![],
                commands: BTreeMap::new(),
                validates: checks,
                hooks: Hooks::default(),
            },
            dir: "/recipes/checked".into(),
            checksum: "0".into(),
        }
    }

    fn service(fs: &MemoryFs, runner: &RecordingRunner) -> ValidationService {
        ValidationService::new(Arc::new(fs.clone()), Arc::new(runner.clone()))
    }

    #[test]
    fn file_exists_check_passes_and_fails() {
        let fs = MemoryFs::new();
        fs.put("/t/present.txt", "x");
        let runner = RecordingRunner::new();
        let loaded = recipe_with_checks(vec![
            CheckRule::FileExists {
                path: "present.txt".into(),
            },
            CheckRule::FileExists {
                path: "absent.txt".into(),
            },
        ]);

        let report = service(&fs, &runner)
            .validate(&loaded, Path::new("/t"))
            .unwrap();
        assert!(report.results[0].passed);
        assert!(!report.results[1].passed);
        assert!(!report.passed());
    }

    #[test]
    fn file_contains_check() {
        let fs = MemoryFs::new();
        fs.put("/t/Makefile", "test:\n\tcargo test\n");
        let runner = RecordingRunner::new();
        let loaded = recipe_with_checks(vec![CheckRule::FileContains {
            path: "Makefile".into(),
            needle: "cargo test".into(),
        }]);

        let report = service(&fs, &runner)
            .validate(&loaded, Path::new("/t"))
            .unwrap();
        assert!(report.passed());
    }

    #[test]
    fn command_check_uses_runner() {
        let fs = MemoryFs::new();
        let runner = RecordingRunner::new();
        runner.fail_on("false");
        let loaded = recipe_with_checks(vec![
            CheckRule::CommandSucceeds { run: "true".into() },
            CheckRule::CommandSucceeds {
                run: "false".into(),
            },
        ]);

        let report = service(&fs, &runner)
            .validate(&loaded, Path::new("/t"))
            .unwrap();
        assert!(report.results[0].passed);
        assert!(!report.results[1].passed);
    }

    #[test]
    fn json_field_presence_and_equality() {
        let fs = MemoryFs::new();
        fs.put("/t/package.json", r#"{"scripts": {"test": "jest"}}"#);
        let runner = RecordingRunner::new();
        let loaded = recipe_with_checks(vec![
            CheckRule::JsonField {
                path: "package.json".into(),
                pointer: "/scripts/test".into(),
                equals: None,
            },
            CheckRule::JsonField {
                path: "package.json".into(),
                pointer: "/scripts/test".into(),
                equals: Some(serde_json::json!("jest")),
            },
            CheckRule::JsonField {
                path: "package.json".into(),
                pointer: "/scripts/test".into(),
                equals: Some(serde_json::json!("mocha")),
            },
            CheckRule::JsonField {
                path: "package.json".into(),
                pointer: "/scripts/lint".into(),
                equals: None,
            },
        ]);

        let report = service(&fs, &runner)
            .validate(&loaded, Path::new("/t"))
            .unwrap();
        let passed: Vec<bool> = report.results.iter().map(|r| r.passed).collect();
        assert_eq!(passed, vec![true, true, false, false]);
    }

    #[test]
    fn failing_pre_validate_hook_aborts() {
        let fs = MemoryFs::new();
        let runner = RecordingRunner::new();
        runner.fail_on("setup-check");
        let mut loaded = recipe_with_checks(vec![]);
        loaded.recipe.hooks.pre_validate.push("setup-check".into());

        let err = service(&fs, &runner)
            .validate(&loaded, Path::new("/t"))
            .unwrap_err();
        assert!(matches!(
            err,
            SousError::Application(ApplicationError::HookFailed {
                hook: "pre_validate",
                ..
            })
        ));
    }
}
