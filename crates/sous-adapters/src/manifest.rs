//! TOML manifest parser.
//!
//! Parses `recipe.toml` text into domain [`Recipe`] / [`Stack`] objects
//! ready for the loader and resolver.
//!
//! # Recipe manifest format
//!
//! ```toml
//! name        = "rust-ci"            # required
//! version     = "1.0.0"              # required
//! description = "CI workflow setup"
//! scope       = "worktree"           # worktree (default) | workspace
//! requires    = ["base", "npm|pnpm"] # entries may be a|b|c alternations
//! conflicts   = ["legacy-ci"]
//! suggests    = ["rust-lint"]
//!
//! [variables.line_width]
//! type        = "number"             # string | number | boolean (advisory)
//! default     = 80
//! description = "Maximum line width"
//! options     = [80, 100, 120]
//!
//! [[generates]]
//! path     = ".github/workflows/ci.yml"
//! template = "ci.yml.tmpl"           # exactly one of: template, content,
//! overwrite = true                   #   append, merge
//!
//! [[generates]]
//! path   = "package.json"
//! merge  = { scripts = { test = "cargo test" } }
//! [generates.when]
//! file_exists = "package.json"
//!
//! [commands.check]
//! run         = "cargo test"
//! description = "Run the test suite"
//!
//! [[validates]]
//! check = "file_exists"              # file_exists | file_contains |
//! path  = ".github/workflows/ci.yml" #   command_succeeds | json_field
//!
//! [hooks]
//! pre_apply  = ["echo starting"]
//! post_apply = ["git add -A"]
//! ```
//!
//! # Stack manifest format
//!
//! ```toml
//! name     = "web-stack"
//! version  = "1.0.0"
//! type     = "stack"
//! includes = ["rust-ci", "rust-lint"]
//!
//! [defaults.rust-lint]
//! line_width = 100
//! ```

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use sous_core::application::ports::ManifestParser;
use sous_core::domain::{
    CheckRule, CommandSpec, DomainError, GenerateAction, GenerateRule, Hooks, ManifestDoc, Recipe,
    RecipeScope, Requirement, Stack, VariableSpec, WhenClause,
};
use sous_core::error::SousResult;

// ── Manifest types ────────────────────────────────────────────────────────────

/// Deserialised representation of a `recipe.toml` file.
///
/// Most fields reuse the domain types directly; generation rules need an
/// intermediate shape because the manifest spells the action as one of four
/// mutually exclusive keys rather than a tagged enum.
#[derive(Debug, Deserialize)]
struct RawManifest {
    name: Option<String>,
    version: Option<String>,
    #[serde(default)]
    description: String,
    /// `"stack"` marks a stack manifest; anything else (or absence) is a
    /// recipe.
    #[serde(rename = "type")]
    manifest_type: Option<String>,
    #[serde(default)]
    scope: RecipeScope,
    #[serde(default)]
    requires: Vec<Requirement>,
    #[serde(default)]
    conflicts: Vec<String>,
    #[serde(default)]
    suggests: Vec<String>,
    #[serde(default)]
    variables: BTreeMap<String, VariableSpec>,
    #[serde(default)]
    generates: Vec<RawRule>,
    #[serde(default)]
    commands: BTreeMap<String, CommandSpec>,
    #[serde(default)]
    validates: Vec<CheckRule>,
    #[serde(default)]
    hooks: Hooks,
    // Stack-only fields.
    includes: Option<Vec<String>>,
    #[serde(default)]
    defaults: BTreeMap<String, BTreeMap<String, Value>>,
}

impl RawManifest {
    fn is_stack(&self) -> bool {
        self.manifest_type.as_deref() == Some("stack") || self.includes.is_some()
    }
}

/// One `[[generates]]` entry before action validation.
#[derive(Debug, Deserialize)]
struct RawRule {
    path: String,
    template: Option<String>,
    content: Option<String>,
    append: Option<String>,
    merge: Option<Value>,
    #[serde(default = "default_overwrite")]
    overwrite: bool,
    when: Option<WhenClause>,
}

fn default_overwrite() -> bool {
    true
}

impl RawRule {
    /// Convert to a domain rule, enforcing the exactly-one-action shape.
    fn into_rule(self) -> Result<GenerateRule, DomainError> {
        let mut actions: Vec<GenerateAction> = Vec::new();
        if let Some(t) = self.template {
            actions.push(GenerateAction::Template(t));
        }
        if let Some(c) = self.content {
            actions.push(GenerateAction::Content(c));
        }
        if let Some(a) = self.append {
            actions.push(GenerateAction::Append(a));
        }
        if let Some(m) = self.merge {
            actions.push(GenerateAction::Merge(m));
        }

        let action = match actions.len() {
            1 => actions.remove(0),
            0 => {
                return Err(DomainError::InvalidRule {
                    path: self.path,
                    reason: "no action given".into(),
                });
            }
            n => {
                return Err(DomainError::InvalidRule {
                    path: self.path,
                    reason: format!("{n} actions given, expected exactly one"),
                });
            }
        };

        Ok(GenerateRule {
            path: self.path,
            action,
            overwrite: self.overwrite,
            when: self.when,
        })
    }
}

// ── Parser ────────────────────────────────────────────────────────────────────

/// Parses TOML manifests into [`ManifestDoc`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct TomlManifestParser;

impl TomlManifestParser {
    pub fn new() -> Self {
        Self
    }
}

impl ManifestParser for TomlManifestParser {
    fn parse(&self, raw: &str) -> SousResult<ManifestDoc> {
        let manifest: RawManifest = toml::from_str(raw).map_err(|e| {
            DomainError::ManifestInvalid {
                reason: format!("TOML parse error: {e}"),
            }
        })?;

        let name = match manifest.name.as_deref() {
            Some(n) if !n.is_empty() => n.to_string(),
            _ => {
                return Err(DomainError::ManifestInvalid {
                    reason: "missing required field: name".into(),
                }
                .into());
            }
        };
        let version = match manifest.version.as_deref() {
            Some(v) if !v.is_empty() => v.to_string(),
            _ => {
                return Err(DomainError::ManifestInvalid {
                    reason: "missing required field: version".into(),
                }
                .into());
            }
        };

        if manifest.is_stack() {
            debug!(name = %name, "parsed stack manifest");
            return Ok(ManifestDoc::Stack(Stack {
                name,
                version,
                description: manifest.description,
                includes: manifest.includes.unwrap_or_default(),
                defaults: manifest.defaults,
            }));
        }

        let generates = manifest
            .generates
            .into_iter()
            .map(RawRule::into_rule)
            .collect::<Result<Vec<_>, _>>()?;

        debug!(name = %name, rules = generates.len(), "parsed recipe manifest");
        Ok(ManifestDoc::Recipe(Recipe {
            name,
            version,
            description: manifest.description,
            scope: manifest.scope,
            requires: manifest.requires,
            conflicts: manifest.conflicts,
            suggests: manifest.suggests,
            variables: manifest.variables,
            generates,
            commands: manifest.commands,
            validates: manifest.validates,
            hooks: manifest.hooks,
        }))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
