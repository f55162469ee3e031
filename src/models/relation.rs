//! Task sub-records: resource allocations and task-to-task relations.
//!
//! Both are keyed by reference (resource id or task id) inside their owning
//! task; neither holds a pointer to the referenced entity.

use serde::{Deserialize, Serialize};

/// A task's claim on a resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    /// Allocated resource id.
    pub resource: String,
    /// Resource that may be used instead.
    pub alternative: Option<String>,
    /// All listed resources must be available together.
    pub mandatory: Option<bool>,
    /// Keep the same resource once picked.
    pub persistent: Option<bool>,
    /// Selection policy among alternatives (`minloaded`, `order`, ...).
    pub select: Option<String>,
    /// Shift reference limiting the allocation.
    pub shifts: Option<String>,
}

impl Allocation {
    pub fn new(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            ..Default::default()
        }
    }

    pub fn with_alternative(mut self, alternative: impl Into<String>) -> Self {
        self.alternative = Some(alternative.into());
        self
    }

    pub fn with_mandatory(mut self, mandatory: bool) -> Self {
        self.mandatory = Some(mandatory);
        self
    }

    pub fn with_persistent(mut self, persistent: bool) -> Self {
        self.persistent = Some(persistent);
        self
    }

    pub fn with_select(mut self, select: impl Into<String>) -> Self {
        self.select = Some(select.into());
        self
    }

    pub fn with_shifts(mut self, shifts: impl Into<String>) -> Self {
        self.shifts = Some(shifts.into());
        self
    }
}

/// A `depends` or `precedes` relation to another task, with optional gap.
///
/// The target task id is the key in the owning map and is not repeated here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    /// Minimum gap in calendar time (e.g. `2d`).
    pub gap_duration: Option<String>,
    /// Minimum gap in working time.
    pub gap_length: Option<String>,
    /// Anchor on the other task's end.
    pub on_end: bool,
    /// Anchor on the other task's start.
    pub on_start: bool,
}

impl Dependency {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_gap_duration(mut self, gap: impl Into<String>) -> Self {
        self.gap_duration = Some(gap.into());
        self
    }

    pub fn with_gap_length(mut self, gap: impl Into<String>) -> Self {
        self.gap_length = Some(gap.into());
        self
    }

    pub fn on_end(mut self) -> Self {
        self.on_end = true;
        self
    }

    pub fn on_start(mut self) -> Self {
        self.on_start = true;
        self
    }
}
