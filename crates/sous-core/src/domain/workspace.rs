//! Persisted workspace state.
//!
//! [`WorkspaceConfig`] is the mutable record of desired and installed
//! recipes; [`WorkspaceLock`] is the audit snapshot rewritten wholesale on
//! every successful apply. Both are plain data - serialization lives in the
//! state-store adapter.
//!
//! State machine per recipe name:
//!
//! ```text
//! absent ──add──▶ pending ──apply──▶ installed
//! ```
//!
//! There is no transition back to absent; the core provides no unqueue
//! operation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Record of one recipe that was actually materialized onto disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstalledRecipe {
    pub name: String,
    pub version: String,
    /// RFC 3339 timestamp of the apply that installed it.
    pub applied_at: String,
    /// SHA-256 of the manifest text, captured at load time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
}

/// The mutable, persisted workspace configuration.
///
/// Created once at workspace initialization; mutated by add and apply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    pub name: String,
    pub created_at: String,
    /// Recipe names queued by `add`, awaiting `apply`.
    #[serde(default)]
    pub pending: Vec<String>,
    /// Recipes actually applied, in application order.
    #[serde(default)]
    pub recipes: Vec<InstalledRecipe>,
    /// Per-recipe variable overrides (recipe name → key → value).
    #[serde(default)]
    pub variables: BTreeMap<String, BTreeMap<String, Value>>,
}

impl WorkspaceConfig {
    pub fn new(name: impl Into<String>, created_at: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            created_at: created_at.into(),
            pending: Vec::new(),
            recipes: Vec::new(),
            variables: BTreeMap::new(),
        }
    }

    /// Whether `name` has already been applied.
    pub fn is_installed(&self, name: &str) -> bool {
        self.recipes.iter().any(|r| r.name == name)
    }

    /// Whether `name` is queued for the next apply.
    pub fn is_pending(&self, name: &str) -> bool {
        self.pending.iter().any(|p| p == name)
    }

    /// Queue a recipe for application.
    ///
    /// Returns `false` (and leaves state untouched) when the recipe is
    /// already pending or installed - `pending` and `recipes` stay disjoint.
    pub fn queue(&mut self, name: &str) -> bool {
        if self.is_pending(name) || self.is_installed(name) {
            return false;
        }
        self.pending.push(name.to_string());
        true
    }

    /// Record a batch of freshly applied recipes and clear the queue.
    pub fn mark_applied(&mut self, applied: Vec<InstalledRecipe>) {
        self.pending.clear();
        self.recipes.extend(applied);
    }
}

/// The audit snapshot of exactly what was applied.
///
/// Rewritten wholesale on every successful apply; never partially updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceLock {
    pub applied_at: String,
    #[serde(default)]
    pub recipes: Vec<InstalledRecipe>,
    #[serde(default)]
    pub variables: BTreeMap<String, BTreeMap<String, Value>>,
}

impl WorkspaceLock {
    /// Snapshot the current config state.
    pub fn snapshot(config: &WorkspaceConfig, applied_at: impl Into<String>) -> Self {
        Self {
            applied_at: applied_at.into(),
            recipes: config.recipes.clone(),
            variables: config.variables.clone(),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
