//! Dependency Resolver.
//!
//! Builds a topological application order from requested recipe names and,
//! in a separate pass, screens a candidate set for pairwise declared
//! conflicts.
//!
//! The traversal is depth-first with an explicit frame stack and two sets:
//! `visiting` (ancestors on the current path) and `seen` (fully resolved).
//! Recursion depth is therefore bounded by heap, and cycle detection is
//! independently unit-testable.
//!
//! Guarantees:
//! - every name in the output appears after everything it transitively
//!   requires;
//! - traversal among independent requested names preserves input order;
//! - alternation resolution is deterministic: the first candidate (in
//!   declared order) that loads wins - there is no preference ranking.

use std::collections::HashSet;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, instrument};

use crate::application::error::ApplicationError;
use crate::application::services::loader::{LoadedRecipe, ManifestLoader};
use crate::domain::Requirement;
use crate::error::SousResult;

/// One detected conflict pair: `recipe` declares `conflicts_with`, and both
/// are members of the candidate set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conflict {
    pub recipe: String,
    pub conflicts_with: String,
}

/// One in-progress node of the depth-first traversal.
struct Frame {
    name: String,
    requires: Vec<Requirement>,
    next: usize,
}

impl Frame {
    fn new(name: String, loaded: &LoadedRecipe) -> Self {
        Self {
            name,
            requires: loaded.recipe.requires.clone(),
            next: 0,
        }
    }
}

/// Resolves requested recipe names into a dependency-ordered application
/// list.
pub struct DependencyResolver<'a> {
    loader: &'a ManifestLoader,
}

impl<'a> DependencyResolver<'a> {
    pub fn new(loader: &'a ManifestLoader) -> Self {
        Self { loader }
    }

    /// Resolve `names` into an order where dependencies always occur
    /// earlier.
    ///
    /// # Errors
    ///
    /// - `RecipeNotFound` when a requested name loads from nowhere
    /// - `CircularDependency` when the requirement graph has a cycle
    /// - `UnsatisfiedDependency` when no alternative of a requirement loads
    #[instrument(skip(self, workspace_root), fields(requested = names.len()))]
    pub fn resolve(
        &self,
        names: &[String],
        workspace_root: Option<&Path>,
    ) -> SousResult<Vec<String>> {
        let mut visiting: HashSet<String> = HashSet::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut order: Vec<String> = Vec::new();
        let mut stack: Vec<Frame> = Vec::new();

        for requested in names {
            if seen.contains(requested) {
                continue;
            }

            let loaded = self
                .loader
                .load(requested, workspace_root)?
                .ok_or_else(|| ApplicationError::RecipeNotFound {
                    name: requested.clone(),
                })?;
            visiting.insert(requested.clone());
            stack.push(Frame::new(requested.clone(), &loaded));

            while let Some(frame) = stack.last_mut() {
                if frame.next >= frame.requires.len() {
                    // Every requirement satisfied: commit this node.
                    let done = frame.name.clone();
                    stack.pop();
                    visiting.remove(&done);
                    seen.insert(done.clone());
                    order.push(done);
                    continue;
                }

                let requirement = frame.requires[frame.next].clone();
                frame.next += 1;
                let required_by = frame.name.clone();

                self.descend(
                    &requirement,
                    &required_by,
                    workspace_root,
                    &mut visiting,
                    &seen,
                    &mut stack,
                )?;
            }
        }

        debug!(order = ?order, "resolution complete");
        Ok(order)
    }

    /// Resolve one requirement: pick the first loadable alternative and push
    /// it onto the traversal, or fail.
    fn descend(
        &self,
        requirement: &Requirement,
        required_by: &str,
        workspace_root: Option<&Path>,
        visiting: &mut HashSet<String>,
        seen: &HashSet<String>,
        stack: &mut Vec<Frame>,
    ) -> SousResult<()> {
        for candidate in &requirement.alternatives {
            // Already fully resolved earlier: the requirement is satisfied.
            if seen.contains(candidate) {
                return Ok(());
            }
            // An ancestor on the current path: the graph is cyclic.
            if visiting.contains(candidate) {
                return Err(ApplicationError::CircularDependency {
                    name: candidate.clone(),
                }
                .into());
            }
            if let Some(loaded) = self.loader.load(candidate, workspace_root)? {
                visiting.insert(candidate.clone());
                stack.push(Frame::new(candidate.clone(), &loaded));
                return Ok(());
            }
        }

        Err(ApplicationError::UnsatisfiedDependency {
            requirement: requirement.to_string(),
            required_by: required_by.to_string(),
        }
        .into())
    }

    /// Screen a candidate set for pairwise declared conflicts.
    ///
    /// Non-recursive and non-halting: returns the full (possibly empty)
    /// list; deciding whether to abort belongs to the caller. Candidates
    /// that cannot be loaded are skipped.
    pub fn screen_conflicts(
        &self,
        candidates: &[String],
        workspace_root: Option<&Path>,
    ) -> SousResult<Vec<Conflict>> {
        let members: HashSet<&str> = candidates.iter().map(String::as_str).collect();
        let mut conflicts = Vec::new();

        for name in candidates {
            let Some(loaded) = self.loader.load(name, workspace_root)? else {
                continue;
            };
            for declared in &loaded.recipe.conflicts {
                if declared != name && members.contains(declared.as_str()) {
                    conflicts.push(Conflict {
                        recipe: name.clone(),
                        conflicts_with: declared.clone(),
                    });
                }
            }
        }

        Ok(conflicts)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
