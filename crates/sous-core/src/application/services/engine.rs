//! Generation Engine.
//!
//! Applies one recipe's ordered generation rules to a target directory,
//! honoring conditional gates and the overwrite policy, and runs the
//! pre/post apply hooks around them.
//!
//! Rule semantics are deliberately idempotent so a failed apply can simply
//! be re-run: template/content/merge rewrite deterministically, and append
//! guards against duplicating text it already added. There is no rollback -
//! rules applied before a failure remain applied.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::application::error::ApplicationError;
use crate::application::ports::{CommandOutcome, Filesystem, ProcessRunner};
use crate::application::services::loader::LoadedRecipe;
use crate::domain::{GenerateAction, GenerateRule, Recipe, RenderContext};
use crate::error::SousResult;

/// Applies generation rules and hooks through the injected ports.
pub struct GenerationEngine {
    filesystem: Arc<dyn Filesystem>,
    runner: Arc<dyn ProcessRunner>,
}

impl GenerationEngine {
    pub fn new(filesystem: Arc<dyn Filesystem>, runner: Arc<dyn ProcessRunner>) -> Self {
        Self { filesystem, runner }
    }

    /// Apply `recipe`'s rules to `target`.
    ///
    /// Hooks run with `target` as working directory; any hook exiting
    /// non-zero aborts with `HookFailed` and halts further processing for
    /// this recipe.
    #[instrument(skip_all, fields(recipe = %loaded.recipe.name, target = %target.display()))]
    pub fn apply(
        &self,
        loaded: &LoadedRecipe,
        target: &Path,
        variables: &BTreeMap<String, Value>,
        project_name: &str,
    ) -> SousResult<()> {
        let recipe = &loaded.recipe;

        self.run_hooks(recipe, "pre_apply", &recipe.hooks.pre_apply, target)?;

        for rule in &recipe.generates {
            self.apply_rule(loaded, rule, target, variables, project_name)?;
        }

        self.run_hooks(recipe, "post_apply", &recipe.hooks.post_apply, target)?;

        info!(rules = recipe.generates.len(), "recipe applied");
        Ok(())
    }

    /// Run one hook command list, failing on the first non-zero exit.
    pub fn run_hooks(
        &self,
        recipe: &Recipe,
        hook: &'static str,
        commands: &[String],
        cwd: &Path,
    ) -> SousResult<()> {
        for command in commands {
            debug!(hook, command = %command, "running hook");
            let outcome = self.runner.run(command, cwd)?;
            if !outcome.success() {
                return Err(ApplicationError::HookFailed {
                    recipe: recipe.name.clone(),
                    hook,
                    command: command.clone(),
                    status: outcome.status,
                }
                .into());
            }
        }
        Ok(())
    }

    /// Run an arbitrary shell command in `cwd` (recipe `commands` entries).
    pub fn run_shell(&self, command: &str, cwd: &Path) -> SousResult<CommandOutcome> {
        self.runner.run(command, cwd)
    }

    fn apply_rule(
        &self,
        loaded: &LoadedRecipe,
        rule: &GenerateRule,
        target: &Path,
        variables: &BTreeMap<String, Value>,
        project_name: &str,
    ) -> SousResult<()> {
        // 1. Conditional gates, both relative to the target directory.
        if let Some(when) = &rule.when {
            if let Some(gate) = &when.file_exists {
                if !self.filesystem.exists(&target.join(gate)) {
                    debug!(path = %rule.path, gate, "skipped: gate file missing");
                    return Ok(());
                }
            }
            if let Some(gate) = &when.file_not_exists {
                if self.filesystem.exists(&target.join(gate)) {
                    debug!(path = %rule.path, gate, "skipped: gate file present");
                    return Ok(());
                }
            }
        }

        let dest = target.join(&rule.path);
        let exists = self.filesystem.exists(&dest);

        // 2. Overwrite policy. Append and merge modify in place and are
        //    exempt.
        let modifies_in_place = matches!(
            rule.action,
            GenerateAction::Append(_) | GenerateAction::Merge(_)
        );
        if exists && !rule.overwrite && !modifies_in_place {
            debug!(path = %rule.path, "skipped: target exists and overwrite = false");
            return Ok(());
        }

        // 3. Ensure the parent directory exists.
        if let Some(parent) = dest.parent() {
            if !parent.as_os_str().is_empty() {
                self.filesystem.create_dir_all(parent)?;
            }
        }

        // 4. Dispatch by rule kind.
        match &rule.action {
            GenerateAction::Template(template) => {
                let template_path = loaded.dir.join(template);
                if !self.filesystem.exists(&template_path) {
                    return Err(ApplicationError::MissingTemplate {
                        recipe: loaded.recipe.name.clone(),
                        template: template.clone(),
                    }
                    .into());
                }
                let raw = self.filesystem.read_to_string(&template_path)?;
                let ctx = template_context(&loaded.recipe, variables, project_name);
                self.filesystem.write_file(&dest, &ctx.render(&raw))?;
            }
            GenerateAction::Content(content) => {
                let ctx = content_context(&loaded.recipe, variables, project_name);
                self.filesystem.write_file(&dest, &ctx.render(content))?;
            }
            GenerateAction::Append(text) => {
                let ctx = content_context(&loaded.recipe, variables, project_name);
                let rendered = ctx.render(text);
                let existing = if exists {
                    self.filesystem.read_to_string(&dest)?
                } else {
                    String::new()
                };
                // Idempotence guard: text already present means no-op.
                if existing.contains(rendered.trim()) {
                    debug!(path = %rule.path, "skipped: append text already present");
                } else {
                    self.filesystem
                        .write_file(&dest, &format!("{existing}{rendered}"))?;
                }
            }
            GenerateAction::Merge(payload) => {
                let existing = if exists {
                    let raw = self.filesystem.read_to_string(&dest)?;
                    serde_json::from_str::<Value>(&raw).map_err(|e| {
                        ApplicationError::InvalidMergeTarget {
                            path: dest.clone(),
                            reason: e.to_string(),
                        }
                    })?
                } else {
                    // A missing target merges against an empty document.
                    Value::Object(serde_json::Map::new())
                };
                let merged = deep_merge(existing, payload.clone());
                let mut text =
                    serde_json::to_string_pretty(&merged).map_err(|e| {
                        ApplicationError::InvalidMergeTarget {
                            path: dest.clone(),
                            reason: e.to_string(),
                        }
                    })?;
                text.push('\n');
                self.filesystem.write_file(&dest, &text)?;
            }
        }

        debug!(path = %rule.path, kind = rule.action.kind(), "rule applied");
        Ok(())
    }
}

/// Context for template rules: variables plus project/recipe identity and a
/// generation timestamp.
fn template_context(
    recipe: &Recipe,
    variables: &BTreeMap<String, Value>,
    project_name: &str,
) -> RenderContext {
    let mut ctx = content_context(recipe, variables, project_name);
    ctx.insert("recipe_version", recipe.version.as_str());
    ctx.insert("generation_timestamp", Utc::now().to_rfc3339());
    ctx
}

/// Context for content and append rules: variables plus project/recipe
/// identity. No timestamp - appended text must be stable across re-applies
/// for the idempotence guard to hold.
fn content_context(
    recipe: &Recipe,
    variables: &BTreeMap<String, Value>,
    project_name: &str,
) -> RenderContext {
    let mut ctx = RenderContext::from_variables(variables);
    ctx.insert("project_name", project_name);
    ctx.insert("recipe_name", recipe.name.as_str());
    ctx
}

/// Recursively deep-merge `patch` into `base`.
///
/// Keys whose values are objects on both sides merge recursively; any other
/// collision (including arrays) is replaced by the patch value.
fn deep_merge(base: Value, patch: Value) -> Value {
    match (base, patch) {
        (Value::Object(mut base_map), Value::Object(patch_map)) => {
            for (key, patch_value) in patch_map {
                let merged = match base_map.remove(&key) {
                    Some(existing) => deep_merge(existing, patch_value),
                    None => patch_value,
                };
                base_map.insert(key, merged);
            }
            Value::Object(base_map)
        }
        (_, patch) => patch,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
