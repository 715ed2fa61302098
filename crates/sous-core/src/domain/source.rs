//! Recipe reference grammar.
//!
//! A recipe reference is the string a user hands to `sous add`. Parsing is
//! pure and total: every input maps to exactly one [`RecipeSource`], except
//! a registry shorthand missing its required parts, which fails with
//! [`DomainError::MalformedReference`].
//!
//! Grammar, in priority order:
//!
//! | Form                                    | Source                          |
//! |-----------------------------------------|---------------------------------|
//! | `./p`, `../p`, `/p`                     | local path                      |
//! | `github:<owner>/<repo>[/<subpath...>]`  | git, GitHub shorthand           |
//! | `git@host:owner/repo.git`               | git, SSH URL                    |
//! | `https://...` (incl. `tree/<ref>/<p>`)  | git, HTTPS URL                  |
//! | anything else                           | git, bare name vs. the registry |

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

/// Branch checked out when a reference does not name one.
pub const DEFAULT_BRANCH: &str = "main";

/// Repository searched when a bare recipe name is requested.
pub const DEFAULT_REGISTRY: &str = "https://github.com/sous-recipes/registry";

/// A parsed recipe reference: where a recipe's manifest lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecipeSource {
    /// A directory on the local filesystem.
    Local { name: String, path: PathBuf },

    /// A git repository, optionally narrowed to a subdirectory.
    Git {
        name: String,
        repo: String,
        reference: String,
        subpath: Option<String>,
    },
}

impl RecipeSource {
    /// The recipe name this source resolves to.
    pub fn name(&self) -> &str {
        match self {
            Self::Local { name, .. } => name,
            Self::Git { name, .. } => name,
        }
    }
}

/// Parse a reference string into a typed [`RecipeSource`].
///
/// # Errors
///
/// Only a `github:` shorthand missing its `<owner>/<repo>` parts fails;
/// every other input maps to exactly one source.
pub fn parse_reference(reference: &str) -> Result<RecipeSource, DomainError> {
    if reference.starts_with("./") || reference.starts_with("../") || reference.starts_with('/') {
        return Ok(parse_local(reference));
    }
    if let Some(rest) = reference.strip_prefix("github:") {
        return parse_shorthand(reference, rest);
    }
    if reference.starts_with("git@") {
        return Ok(parse_ssh(reference));
    }
    if reference.starts_with("https://") || reference.starts_with("http://") {
        return Ok(parse_https(reference));
    }

    // Bare name: resolved against the default registry.
    Ok(RecipeSource::Git {
        name: reference.to_string(),
        repo: DEFAULT_REGISTRY.to_string(),
        reference: DEFAULT_BRANCH.to_string(),
        subpath: Some(reference.to_string()),
    })
}

fn parse_local(reference: &str) -> RecipeSource {
    let path = PathBuf::from(reference);
    let name = Path::new(reference)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| reference.to_string());
    RecipeSource::Local { name, path }
}

fn parse_shorthand(reference: &str, rest: &str) -> Result<RecipeSource, DomainError> {
    let parts: Vec<&str> = rest.split('/').collect();
    if parts.len() < 2 || parts[0].is_empty() || parts[1].is_empty() {
        return Err(DomainError::MalformedReference {
            reference: reference.to_string(),
            reason: "expected github:<owner>/<repo>[/<subpath>]".into(),
        });
    }

    let (owner, repo) = (parts[0], parts[1]);
    let subpath = if parts.len() > 2 {
        Some(parts[2..].join("/"))
    } else {
        None
    };
    let name = parts.last().map(|s| s.to_string()).unwrap_or_default();

    Ok(RecipeSource::Git {
        name,
        repo: format!("https://github.com/{owner}/{repo}"),
        reference: DEFAULT_BRANCH.to_string(),
        subpath,
    })
}

fn parse_ssh(reference: &str) -> RecipeSource {
    RecipeSource::Git {
        name: repo_basename(reference),
        repo: reference.to_string(),
        reference: DEFAULT_BRANCH.to_string(),
        subpath: None,
    }
}

fn parse_https(reference: &str) -> RecipeSource {
    // GitHub-style browse URLs embed the branch and subpath after /tree/.
    if let Some((repo, rest)) = reference.split_once("/tree/") {
        let (branch, subpath) = match rest.split_once('/') {
            Some((branch, path)) if !path.is_empty() => (branch, Some(path.to_string())),
            Some((branch, _)) => (branch, None),
            None => (rest, None),
        };
        let name = subpath
            .as_deref()
            .and_then(|p| p.rsplit('/').next())
            .map(str::to_string)
            .unwrap_or_else(|| repo_basename(repo));
        return RecipeSource::Git {
            name,
            repo: repo.to_string(),
            reference: branch.to_string(),
            subpath,
        };
    }

    RecipeSource::Git {
        name: repo_basename(reference),
        repo: reference.to_string(),
        reference: DEFAULT_BRANCH.to_string(),
        subpath: None,
    }
}

/// Last path segment of a repository URL, without any `.git` suffix.
fn repo_basename(url: &str) -> String {
    url.trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(url)
        .trim_end_matches(".git")
        // SSH URLs separate the path with ':' rather than '/'.
        .rsplit(':')
        .next()
        .unwrap_or(url)
        .to_string()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
