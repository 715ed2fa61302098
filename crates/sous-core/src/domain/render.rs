//! Minimal template language: `{{ name }}` interpolation.
//!
//! This is deliberately not a full template engine - no conditionals, no
//! loops, no filters. A reference to an undefined name renders as the empty
//! string, and malformed syntax (an unclosed `{{`) is passed through
//! literally, so rendering is total and never fails an apply.

use std::collections::BTreeMap;

use serde_json::Value;

/// Substitution context for rendering templates and inline content.
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    values: BTreeMap<String, String>,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a context from a resolved variable map.
    pub fn from_variables(variables: &BTreeMap<String, Value>) -> Self {
        let mut ctx = Self::new();
        for (key, value) in variables {
            ctx.values.insert(key.clone(), value_to_display(value));
        }
        ctx
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Substitute every `{{ name }}` occurrence in `input`.
    pub fn render(&self, input: &str) -> String {
        let mut out = String::with_capacity(input.len());
        let mut rest = input;

        while let Some(open) = rest.find("{{") {
            out.push_str(&rest[..open]);
            let after_open = &rest[open + 2..];
            match after_open.find("}}") {
                Some(close) => {
                    let key = after_open[..close].trim();
                    if let Some(value) = self.values.get(key) {
                        out.push_str(value);
                    }
                    // Undefined references render as empty.
                    rest = &after_open[close + 2..];
                }
                None => {
                    // Unclosed marker: emit the remainder verbatim.
                    out.push_str(&rest[open..]);
                    rest = "";
                }
            }
        }

        out.push_str(rest);
        out
    }
}

/// Render a JSON value the way it should appear inside generated text:
/// strings unquoted, scalars via Display, null empty.
pub fn value_to_display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(pairs: &[(&str, &str)]) -> RenderContext {
        let mut ctx = RenderContext::new();
        for (k, v) in pairs {
            ctx.insert(*k, *v);
        }
        ctx
    }

    #[test]
    fn substitutes_single_variable() {
        let c = ctx(&[("project_name", "demo")]);
        assert_eq!(c.render("{{ project_name }}"), "demo");
    }

    #[test]
    fn substitutes_multiple_occurrences() {
        let c = ctx(&[("name", "x")]);
        assert_eq!(c.render("{{ name }}-{{ name }}"), "x-x");
    }

    #[test]
    fn whitespace_inside_braces_is_ignored() {
        let c = ctx(&[("key", "v")]);
        assert_eq!(c.render("{{key}} {{  key  }}"), "v v");
    }

    #[test]
    fn undefined_reference_renders_empty() {
        let c = ctx(&[]);
        assert_eq!(c.render("a{{ missing }}b"), "ab");
    }

    #[test]
    fn text_without_markers_is_unchanged() {
        let c = ctx(&[("k", "v")]);
        assert_eq!(c.render("plain text"), "plain text");
    }

    #[test]
    fn unclosed_marker_passes_through() {
        let c = ctx(&[("k", "v")]);
        assert_eq!(c.render("a {{ k"), "a {{ k");
    }

    #[test]
    fn from_variables_converts_values() {
        let mut vars = BTreeMap::new();
        vars.insert("port".to_string(), serde_json::json!(8080));
        vars.insert("strict".to_string(), serde_json::json!(true));
        vars.insert("label".to_string(), serde_json::json!("dev"));
        let c = RenderContext::from_variables(&vars);
        assert_eq!(c.render("{{ port }} {{ strict }} {{ label }}"), "8080 true dev");
    }

    #[test]
    fn value_display_null_is_empty() {
        assert_eq!(value_to_display(&Value::Null), "");
    }
}
