//! Task model.
//!
//! A task is a unit of work with optional scheduling attributes, resource
//! allocations, relations to other tasks, and nested child tasks.
//!
//! # Identity
//! `uid` is generated at construction and internal to this crate. `id` is
//! the user-facing identifier written to the document. Neither is reassigned.
//!
//! # Relations
//! `depends` and `precedes` are independent maps keyed by task id. No cycle
//! detection happens here; see `validation::validate_project`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{
    Allocation, Dependency, Entity, FlagCapable, JournalCapable, JournalEntry, LimitCapable,
};
use crate::id::new_id;
use crate::tjp::identifier;

/// Priority assigned to tasks that do not set one.
pub const DEFAULT_PRIORITY: i32 = 500;

/// A task to be scheduled.
///
/// Scalar attributes are opaque text handed to the scheduling engine
/// unchanged (`"5d"`, `"2024-01-08"`, `"asap"`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Internal unique id.
    pub uid: String,
    /// User-facing task id.
    pub id: String,
    pub name: String,

    pub adopt: Option<String>,
    pub booking: Option<String>,
    pub charge: Option<String>,
    pub chargeset: Option<String>,
    /// Completion percentage.
    pub complete: Option<String>,
    pub duration: Option<String>,
    pub effort: Option<String>,
    pub effort_done: Option<String>,
    pub effort_left: Option<String>,
    pub end: Option<String>,
    pub fail: Option<String>,
    pub length: Option<String>,
    pub max_end: Option<String>,
    pub max_start: Option<String>,
    pub milestone: bool,
    pub min_end: Option<String>,
    pub min_start: Option<String>,
    pub note: Option<String>,
    pub period: Option<String>,
    pub priority: i32,
    pub project_id: Option<String>,
    pub purge: Option<String>,
    pub responsible: Option<String>,
    pub scheduled: Option<String>,
    /// `asap` or `alap`.
    pub scheduling: Option<String>,
    pub scheduling_mode: Option<String>,
    pub shifts: Option<String>,
    pub start: Option<String>,
    pub supplement: Option<String>,
    pub warn: Option<String>,

    /// Allocations keyed by resource id.
    pub allocations: BTreeMap<String, Allocation>,
    /// Predecessors keyed by task id.
    pub depends: BTreeMap<String, Dependency>,
    /// Successors keyed by task id.
    pub precedes: BTreeMap<String, Dependency>,
    /// Child tasks keyed by id.
    pub tasks: BTreeMap<String, Task>,
    pub flags: Vec<String>,
    pub limits: Vec<String>,
    pub journal: BTreeMap<String, JournalEntry>,
}

impl Task {
    /// Creates a task with default priority and no attributes.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            uid: new_id(),
            id: id.into(),
            name: name.into(),
            adopt: None,
            booking: None,
            charge: None,
            chargeset: None,
            complete: None,
            duration: None,
            effort: None,
            effort_done: None,
            effort_left: None,
            end: None,
            fail: None,
            length: None,
            max_end: None,
            max_start: None,
            milestone: false,
            min_end: None,
            min_start: None,
            note: None,
            period: None,
            priority: DEFAULT_PRIORITY,
            project_id: None,
            purge: None,
            responsible: None,
            scheduled: None,
            scheduling: None,
            scheduling_mode: None,
            shifts: None,
            start: None,
            supplement: None,
            warn: None,
            allocations: BTreeMap::new(),
            depends: BTreeMap::new(),
            precedes: BTreeMap::new(),
            tasks: BTreeMap::new(),
            flags: Vec::new(),
            limits: Vec::new(),
            journal: BTreeMap::new(),
        }
    }

    pub fn with_start(mut self, start: impl Into<String>) -> Self {
        self.start = Some(start.into());
        self
    }

    pub fn with_end(mut self, end: impl Into<String>) -> Self {
        self.end = Some(end.into());
        self
    }

    pub fn with_duration(mut self, duration: impl Into<String>) -> Self {
        self.duration = Some(duration.into());
        self
    }

    pub fn with_effort(mut self, effort: impl Into<String>) -> Self {
        self.effort = Some(effort.into());
        self
    }

    pub fn with_length(mut self, length: impl Into<String>) -> Self {
        self.length = Some(length.into());
        self
    }

    pub fn with_complete(mut self, complete: impl Into<String>) -> Self {
        self.complete = Some(complete.into());
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Marks the task as a milestone.
    pub fn milestone(mut self) -> Self {
        self.milestone = true;
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn with_responsible(mut self, responsible: impl Into<String>) -> Self {
        self.responsible = Some(responsible.into());
        self
    }

    pub fn with_scheduling(mut self, scheduling: impl Into<String>) -> Self {
        self.scheduling = Some(scheduling.into());
        self
    }

    /// Adds a nested child task.
    pub fn with_sub_task(mut self, task: Task) -> Self {
        self.add_sub_task(task);
        self
    }

    /// Inserts a child task, replacing any child with the same id.
    pub fn add_sub_task(&mut self, task: Task) {
        self.tasks.insert(task.id.clone(), task);
    }

    /// Inserts or overwrites the allocation for `allocation.resource`.
    pub fn set_allocate(&mut self, allocation: Allocation) {
        self.allocations
            .insert(allocation.resource.clone(), allocation);
    }

    /// Inserts or overwrites the predecessor relation to `task_id`.
    pub fn set_depends(&mut self, task_id: impl Into<String>, dependency: Dependency) {
        self.depends.insert(task_id.into(), dependency);
    }

    /// Inserts or overwrites the successor relation to `task_id`.
    pub fn set_precedes(&mut self, task_id: impl Into<String>, dependency: Dependency) {
        self.precedes.insert(task_id.into(), dependency);
    }

    /// This task and all descendants in depth-first order, paired with their
    /// dotted path (`parent.child`) as declared in the document.
    ///
    /// Path segments are the normalized identifiers, so two tasks whose ids
    /// normalize alike share a path.
    pub fn walk(&self) -> Vec<(String, &Task)> {
        let mut out = Vec::new();
        self.walk_into(String::new(), &mut out);
        out
    }

    fn walk_into<'a>(&'a self, prefix: String, out: &mut Vec<(String, &'a Task)>) {
        let id = identifier(&self.id);
        let path = if prefix.is_empty() {
            id
        } else {
            format!("{prefix}.{id}")
        };
        out.push((path.clone(), self));
        for child in self.tasks.values() {
            child.walk_into(path.clone(), out);
        }
    }
}

impl Entity for Task {
    fn id(&self) -> &str {
        &self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
}

impl FlagCapable for Task {
    fn flags(&self) -> &[String] {
        &self.flags
    }
    fn flags_mut(&mut self) -> &mut Vec<String> {
        &mut self.flags
    }
}

impl LimitCapable for Task {
    fn limits(&self) -> &[String] {
        &self.limits
    }
    fn limits_mut(&mut self) -> &mut Vec<String> {
        &mut self.limits
    }
}

impl JournalCapable for Task {
    fn journal(&self) -> &BTreeMap<String, JournalEntry> {
        &self.journal
    }
    fn journal_mut(&mut self) -> &mut BTreeMap<String, JournalEntry> {
        &mut self.journal
    }
}
