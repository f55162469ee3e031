//! Resource model.
//!
//! Resources are the people and equipment tasks are allocated to. Each
//! resource gets a generated id at construction; `with_id` replaces it for
//! callers that want a readable key in the document.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{Entity, FlagCapable, JournalCapable, JournalEntry, LimitCapable};
use crate::id::new_id;

/// A resource that tasks can allocate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub id: String,
    pub name: String,
    pub booking: Option<String>,
    pub chargeset: Option<String>,
    /// Work rate multiplier (`1.0` = normal).
    pub efficiency: Option<String>,
    pub email: Option<String>,
    pub fail: Option<String>,
    pub purge: Option<String>,
    /// Cost per day.
    pub rate: Option<String>,
    pub working_hours: Option<String>,
    pub leave_allowances: Vec<String>,
    pub leaves: Vec<String>,
    /// Manager resource ids.
    pub managers: Vec<String>,
    pub flags: Vec<String>,
    pub limits: Vec<String>,
    /// Shift id by period.
    pub shifts: BTreeMap<String, String>,
    /// Vacation label by period.
    pub vacation: BTreeMap<String, String>,
    pub journal: BTreeMap<String, JournalEntry>,
    /// Nested sub-resources (resource groups).
    pub resources: Vec<Resource>,
}

impl Resource {
    /// Creates a resource with a generated id.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            booking: None,
            chargeset: None,
            efficiency: None,
            email: None,
            fail: None,
            purge: None,
            rate: None,
            working_hours: None,
            leave_allowances: Vec::new(),
            leaves: Vec::new(),
            managers: Vec::new(),
            flags: Vec::new(),
            limits: Vec::new(),
            shifts: BTreeMap::new(),
            vacation: BTreeMap::new(),
            journal: BTreeMap::new(),
            resources: Vec::new(),
        }
    }

    /// Replaces the generated id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_efficiency(mut self, efficiency: impl Into<String>) -> Self {
        self.efficiency = Some(efficiency.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_rate(mut self, rate: impl Into<String>) -> Self {
        self.rate = Some(rate.into());
        self
    }

    pub fn with_working_hours(mut self, hours: impl Into<String>) -> Self {
        self.working_hours = Some(hours.into());
        self
    }

    pub fn add_leave(&mut self, leave: impl Into<String>) {
        self.leaves.push(leave.into());
    }

    pub fn add_leave_allowance(&mut self, allowance: impl Into<String>) {
        self.leave_allowances.push(allowance.into());
    }

    pub fn add_manager(&mut self, manager: impl Into<String>) {
        self.managers.push(manager.into());
    }

    /// Assigns `shift` for `period`, replacing any shift already set for it.
    pub fn set_shift(&mut self, period: impl Into<String>, shift: impl Into<String>) {
        self.shifts.insert(period.into(), shift.into());
    }

    pub fn set_vacation(&mut self, period: impl Into<String>, label: impl Into<String>) {
        self.vacation.insert(period.into(), label.into());
    }

    /// Adds a nested sub-resource, turning this resource into a group.
    pub fn add_sub_resource(&mut self, resource: Resource) {
        self.resources.push(resource);
    }

    /// This resource and all nested sub-resources, depth-first.
    pub fn walk(&self) -> Vec<&Resource> {
        let mut out = vec![self];
        for child in &self.resources {
            out.extend(child.walk());
        }
        out
    }
}

impl Entity for Resource {
    fn id(&self) -> &str {
        &self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
}

impl FlagCapable for Resource {
    fn flags(&self) -> &[String] {
        &self.flags
    }
    fn flags_mut(&mut self) -> &mut Vec<String> {
        &mut self.flags
    }
}

impl LimitCapable for Resource {
    fn limits(&self) -> &[String] {
        &self.limits
    }
    fn limits_mut(&mut self) -> &mut Vec<String> {
        &mut self.limits
    }
}

impl JournalCapable for Resource {
    fn journal(&self) -> &BTreeMap<String, JournalEntry> {
        &self.journal
    }
    fn journal_mut(&mut self) -> &mut BTreeMap<String, JournalEntry> {
        &mut self.journal
    }
}
