//! Optional structural checks for a project before it is generated.
//!
//! The serializer writes whatever it is given; `tj3` is the authority on
//! semantic validity. This pass catches the structural mistakes that are
//! cheap to find locally:
//! - Empty project id or name
//! - Empty working-hours list
//! - Duplicate resource IDs (including sub-resources) and duplicate task
//!   IDs within one parent, compared after identifier normalization
//! - Allocations of unknown resources
//! - `depends` / `precedes` on unknown tasks
//! - Circular task relations (DAG validation)
//!
//! Relation keys are resolved as absolute dotted paths (`phase1.design`),
//! or relative to the owning task's parent when prefixed with `!`.
//!
//! # Reference
//! Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.4 (Topological Sort)

use crate::models::{Project, Task};
use crate::tjp::{identifier, reference};
use std::collections::{HashMap, HashSet};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Project id or name is empty.
    MissingIdentity,
    /// Project has no working-hours rules.
    NoWorkingHours,
    /// Two entities share the same ID.
    DuplicateId,
    /// A task allocates a resource that doesn't exist.
    InvalidResourceReference,
    /// A task depends on or precedes a task that doesn't exist.
    InvalidTaskReference,
    /// Task relations contain a cycle.
    CyclicDependency,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates the structure of a project.
///
/// Checks:
/// 1. Project id and name are non-empty
/// 2. At least one working-hours rule
/// 3. No duplicate resource IDs, no duplicate task IDs among siblings
/// 4. All allocations point to existing resources
/// 5. All `depends` / `precedes` keys point to existing tasks
/// 6. No cycles across `depends` and `precedes`
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_project(project: &Project) -> ValidationResult {
    let mut errors = Vec::new();

    if project.id.trim().is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::MissingIdentity,
            "Project id is empty",
        ));
    }
    if project.name.trim().is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::MissingIdentity,
            "Project name is empty",
        ));
    }
    if project.working_hours.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::NoWorkingHours,
            "Project has no working-hours rules",
        ));
    }

    // Resource IDs are global and compared as declared in the document
    let mut resource_ids = HashSet::new();
    for r in project.resources.iter().flat_map(|r| r.walk()) {
        let declared = identifier(&r.id);
        if !resource_ids.insert(declared.clone()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate resource ID: {} (declared as {declared})", r.id),
            ));
        }
    }

    // Task paths are unique per sibling scope; a repeated path is a duplicate
    let tasks: Vec<(String, &Task)> = project.tasks.values().flat_map(|t| t.walk()).collect();
    let mut task_paths = HashSet::new();
    for (path, task) in &tasks {
        if !task_paths.insert(path.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate task ID: {} (declared as {path})", task.id),
            ));
        }
    }

    for (path, task) in &tasks {
        for resource in task.allocations.keys() {
            if !resource_ids.contains(&identifier(resource)) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidResourceReference,
                    format!("Task '{path}' allocates unknown resource '{resource}'"),
                ));
            }
        }
    }

    // Check task references; edges point from predecessor to successor
    let mut adj: HashMap<String, Vec<String>> = HashMap::new();
    for (path, task) in &tasks {
        for key in task.depends.keys() {
            match resolve(path, key, &task_paths) {
                Some(target) => adj.entry(target).or_default().push(path.clone()),
                None => errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidTaskReference,
                    format!("Task '{path}' depends on unknown task '{key}'"),
                )),
            }
        }
        for key in task.precedes.keys() {
            match resolve(path, key, &task_paths) {
                Some(target) => adj.entry(path.clone()).or_default().push(target),
                None => errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidTaskReference,
                    format!("Task '{path}' precedes unknown task '{key}'"),
                )),
            }
        }
    }

    // Check for cycles in the relation graph (DFS-based)
    if let Some(cycle_err) = detect_cycles(tasks.iter().map(|(path, _)| path.as_str()), &adj) {
        errors.push(cycle_err);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Resolves a relation key to an absolute task path.
///
/// Each leading `!` moves one level up from the owning task's parent scope.
fn resolve(owner: &str, key: &str, paths: &HashSet<&str>) -> Option<String> {
    let bare = key.trim_start_matches('!');
    let ups = key.len() - bare.len();
    let rest = reference(bare);

    let candidate = if ups == 0 {
        rest
    } else {
        let mut scope: Vec<&str> = owner.split('.').collect();
        // `!` is the owner's own parent scope, so the first bang drops the owner.
        for _ in 0..ups {
            scope.pop()?;
        }
        scope.push(&rest);
        scope.join(".")
    };

    paths.contains(candidate.as_str()).then_some(candidate)
}

/// Detects cycles in the relation graph using DFS.
///
/// # Algorithm
/// Topological sort via DFS. If a back-edge is found (visiting a node
/// currently in the recursion stack), a cycle exists.
///
/// # Reference
/// Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.4
fn detect_cycles<'a>(
    nodes: impl Iterator<Item = &'a str>,
    adj: &'a HashMap<String, Vec<String>>,
) -> Option<ValidationError> {
    let mut visited = HashSet::new();
    let mut in_stack = HashSet::new();

    for node in nodes {
        if !visited.contains(node) && has_cycle_dfs(node, adj, &mut visited, &mut in_stack) {
            return Some(ValidationError::new(
                ValidationErrorKind::CyclicDependency,
                format!("Circular dependency detected involving task '{node}'"),
            ));
        }
    }

    None
}

fn has_cycle_dfs<'a>(
    node: &'a str,
    adj: &'a HashMap<String, Vec<String>>,
    visited: &mut HashSet<&'a str>,
    in_stack: &mut HashSet<&'a str>,
) -> bool {
    visited.insert(node);
    in_stack.insert(node);

    if let Some(neighbors) = adj.get(node) {
        for next in neighbors {
            let next = next.as_str();
            if in_stack.contains(next) {
                return true; // Back edge → cycle
            }
            if !visited.contains(next) && has_cycle_dfs(next, adj, visited, in_stack) {
                return true;
            }
        }
    }

    in_stack.remove(node);
    false
}
