//! Variable Resolution.
//!
//! The effective variable set for a recipe is computed per declared key:
//! the workspace's stored override for that recipe wins, else the recipe's
//! declared default. Declared `type` and `options` are descriptive metadata
//! only - nothing here enforces them.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::domain::{Recipe, Stack};

/// Compute the concrete variable set for one recipe.
///
/// Keys the recipe never declared are ignored even when an override exists
/// for them - a recipe's variable surface is exactly what it declares.
pub fn effective_variables(
    recipe: &Recipe,
    overrides: Option<&BTreeMap<String, Value>>,
) -> BTreeMap<String, Value> {
    let mut resolved = BTreeMap::new();
    for (key, spec) in &recipe.variables {
        let value = overrides
            .and_then(|o| o.get(key))
            .cloned()
            .unwrap_or_else(|| spec.default.clone());
        resolved.insert(key.clone(), value);
    }
    resolved
}

/// Merge a stack's `defaults` into the workspace override map at add time.
///
/// Stack defaults act as initial overrides: an explicit per-recipe override
/// already present is never clobbered.
pub fn merge_stack_defaults(
    variables: &mut BTreeMap<String, BTreeMap<String, Value>>,
    stack: &Stack,
) {
    for (recipe_name, defaults) in &stack.defaults {
        let slot = variables.entry(recipe_name.clone()).or_default();
        for (key, value) in defaults {
            slot.entry(key.clone()).or_insert_with(|| value.clone());
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
