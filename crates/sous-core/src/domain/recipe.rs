//! Recipe and stack entities.
//!
//! A [`Recipe`] is a named, versioned manifest describing requirements,
//! variables, file-generation rules, commands, validation checks, and hooks.
//! A [`Stack`] is a bundle that expands to an ordered list of recipes plus
//! default variable overrides at add time; stacks are never applied
//! themselves.
//!
//! These types are the parsed, validated form of `recipe.toml` manifests.
//! The adapters crate owns the serde/TOML schema and converts into them.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Whether a recipe's generation targets the workspace root or the active
/// worktree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecipeScope {
    /// Generate into the worktree the caller is operating on (default).
    #[default]
    Worktree,
    /// Generate into the workspace root itself.
    Workspace,
}

impl fmt::Display for RecipeScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Worktree => write!(f, "worktree"),
            Self::Workspace => write!(f, "workspace"),
        }
    }
}

/// One dependency requirement: a bare name, or an ordered alternation of
/// candidate names (`"runtimeA|runtimeB"`), satisfied by the first candidate
/// that loads.
///
/// Serialized as its spec string (`"a|b|c"`), matching the manifest schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    pub alternatives: Vec<String>,
}

impl Serialize for Requirement {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Requirement {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let spec = String::deserialize(deserializer)?;
        Ok(Requirement::parse(&spec))
    }
}

impl Requirement {
    /// Parse a requirement spec string, splitting alternation on `|`.
    pub fn parse(spec: &str) -> Self {
        Self {
            alternatives: spec
                .split('|')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    pub fn is_alternation(&self) -> bool {
        self.alternatives.len() > 1
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.alternatives.join("|"))
    }
}

/// Declared variable metadata.
///
/// `var_type` and `options` are descriptive only - resolution does not
/// enforce them (declared types are advisory).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableSpec {
    #[serde(rename = "type", default)]
    pub var_type: VariableType,
    pub default: Value,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub options: Option<Vec<Value>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableType {
    #[default]
    String,
    Number,
    Boolean,
}

/// Conditional gates on a generation rule, both relative to the target
/// directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhenClause {
    /// Apply the rule only if this path exists.
    #[serde(default)]
    pub file_exists: Option<String>,
    /// Apply the rule only if this path does not exist.
    #[serde(default)]
    pub file_not_exists: Option<String>,
}

/// The one action a generation rule performs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerateAction {
    /// Render a template file (named relative to the recipe's directory)
    /// and write the result.
    Template(String),
    /// Render an inline string and write the result.
    Content(String),
    /// Render a string and append it, guarding against duplication.
    Append(String),
    /// Deep-merge a structured payload into an existing JSON document.
    Merge(Value),
}

impl GenerateAction {
    /// Short kind label used in logs and error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Template(_) => "template",
            Self::Content(_) => "content",
            Self::Append(_) => "append",
            Self::Merge(_) => "merge",
        }
    }
}

/// One instruction to produce or modify a file at apply time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateRule {
    /// Target path, relative to the directory the recipe applies to.
    pub path: String,
    pub action: GenerateAction,
    /// When false, an existing target is left untouched (append and merge
    /// rules modify in place and ignore this flag).
    #[serde(default = "default_true")]
    pub overwrite: bool,
    #[serde(default)]
    pub when: Option<WhenClause>,
}

fn default_true() -> bool {
    true
}

/// A named command a recipe exposes (`sous run <recipe> <command>`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSpec {
    pub run: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// One post-apply validation check, tagged by kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "check", rename_all = "snake_case")]
pub enum CheckRule {
    /// The path must exist in the target.
    FileExists { path: String },
    /// The file at `path` must contain `needle`.
    FileContains { path: String, needle: String },
    /// The command must exit zero when run in the target.
    CommandSucceeds { run: String },
    /// The JSON document at `path` must have the field at `pointer`
    /// (RFC 6901), optionally equal to `equals`.
    JsonField {
        path: String,
        pointer: String,
        #[serde(default)]
        equals: Option<Value>,
    },
}

/// Ordered shell command lists run around apply and validate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hooks {
    #[serde(default)]
    pub pre_apply: Vec<String>,
    #[serde(default)]
    pub post_apply: Vec<String>,
    #[serde(default)]
    pub pre_validate: Vec<String>,
}

impl Hooks {
    pub fn is_empty(&self) -> bool {
        self.pre_apply.is_empty() && self.post_apply.is_empty() && self.pre_validate.is_empty()
    }
}

/// A fully parsed recipe manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub scope: RecipeScope,
    #[serde(default)]
    pub requires: Vec<Requirement>,
    #[serde(default)]
    pub conflicts: Vec<String>,
    /// Advisory companions; surfaced to the user, never resolved.
    #[serde(default)]
    pub suggests: Vec<String>,
    #[serde(default)]
    pub variables: BTreeMap<String, VariableSpec>,
    #[serde(default)]
    pub generates: Vec<GenerateRule>,
    #[serde(default)]
    pub commands: BTreeMap<String, CommandSpec>,
    #[serde(default)]
    pub validates: Vec<CheckRule>,
    #[serde(default)]
    pub hooks: Hooks,
}

/// A stack manifest: a bundle of recipe names plus default overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stack {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub description: String,
    /// Recipe names this stack expands to, in order.
    #[serde(default)]
    pub includes: Vec<String>,
    /// Per-recipe variable overrides seeded into the workspace at add time.
    #[serde(default)]
    pub defaults: BTreeMap<String, BTreeMap<String, Value>>,
}

/// What a manifest file parses to: either a recipe or a stack.
#[derive(Debug, Clone, PartialEq)]
pub enum ManifestDoc {
    Recipe(Recipe),
    Stack(Stack),
}

impl ManifestDoc {
    pub fn name(&self) -> &str {
        match self {
            Self::Recipe(r) => &r.name,
            Self::Stack(s) => &s.name,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
