//! Project model.
//!
//! The project is the root entity of a document. It carries the global
//! scheduling settings written into the `project` header, owns all tasks
//! and resources, and records attribute groups that are accepted but not
//! yet translated into the document (accounts, macros, shifts, ...).
//!
//! # Invariants
//! - `id` and `name` should be non-empty (checked by validation, not here).
//! - `working_hours` defaults to Mon–Fri with Sat/Sun off.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{
    Entity, FlagCapable, JournalCapable, JournalEntry, LimitCapable, ProjectIdCapable, Resource,
    Task,
};
use crate::id::new_id;

/// First day of the week used for week-based reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeekStart {
    #[default]
    Monday,
    Sunday,
}

impl WeekStart {
    /// The project attribute keyword.
    pub fn keyword(self) -> &'static str {
        match self {
            WeekStart::Monday => "weekstartsmonday",
            WeekStart::Sunday => "weekstartssunday",
        }
    }
}

/// Root entity of a project document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub version: String,
    /// Scheduling interval, e.g. `2017-07-01 - 2024-06-30`.
    pub interval: String,
    pub timing_resolution: String,
    pub timezone: String,
    pub daily_working_hours: String,
    pub yearly_working_days: String,
    pub time_format: String,
    pub short_time_format: String,
    pub currency: String,
    pub currency_format: String,
    pub week_start: WeekStart,
    /// One rule per weekday group, e.g. `sat, sun off`.
    pub working_hours: Vec<String>,
    pub aux_dir: Option<String>,
    pub balance: Option<String>,
    pub copyright: Option<String>,
    pub rate: Option<String>,
    /// Output directory of the current generate cycle. Empty until allocated.
    pub output_dir: String,

    pub resources: Vec<Resource>,
    /// Top-level tasks keyed by id.
    pub tasks: BTreeMap<String, Task>,
    pub reports: BTreeMap<String, String>,
    pub journal: BTreeMap<String, JournalEntry>,
    pub flags: Vec<String>,
    pub limits: Vec<String>,
    pub project_ids: Vec<String>,

    // Recorded but not yet translated into the document.
    pub accounts: BTreeMap<String, String>,
    pub exports: BTreeMap<String, String>,
    pub includes: BTreeMap<String, String>,
    pub leaves: Vec<String>,
    pub macros: BTreeMap<String, String>,
    pub navigators: BTreeMap<String, String>,
    pub shifts: BTreeMap<String, String>,
    pub statussheets: BTreeMap<String, String>,
    pub supplements: BTreeMap<String, String>,
    pub timesheets: BTreeMap<String, String>,
}

/// Standard week: two four-hour blocks Monday to Friday.
pub fn default_working_hours() -> Vec<String> {
    vec![
        "mon - fri 8:00 - 12:00, 13:00 - 17:00".to_string(),
        "sat, sun off".to_string(),
    ]
}

impl Default for Project {
    /// A project with a generated id, named `default`.
    fn default() -> Self {
        Self::new(new_id(), "default")
    }
}

impl Project {
    /// Creates a project with the standard settings.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            version: "1.0".to_string(),
            interval: "2017-07-01 - 2024-06-30".to_string(),
            timing_resolution: "60min".to_string(),
            timezone: "America/Denver".to_string(),
            daily_working_hours: "8".to_string(),
            yearly_working_days: "260".to_string(),
            time_format: "%Y-%m-%d %H:%M".to_string(),
            short_time_format: "%H:%M".to_string(),
            currency: "USD".to_string(),
            currency_format: r#"(" ")" "," "." 0"#.to_string(),
            week_start: WeekStart::Monday,
            working_hours: default_working_hours(),
            aux_dir: None,
            balance: None,
            copyright: None,
            rate: None,
            output_dir: String::new(),
            resources: Vec::new(),
            tasks: BTreeMap::new(),
            reports: BTreeMap::new(),
            journal: BTreeMap::new(),
            flags: Vec::new(),
            limits: Vec::new(),
            project_ids: Vec::new(),
            accounts: BTreeMap::new(),
            exports: BTreeMap::new(),
            includes: BTreeMap::new(),
            leaves: Vec::new(),
            macros: BTreeMap::new(),
            navigators: BTreeMap::new(),
            shifts: BTreeMap::new(),
            statussheets: BTreeMap::new(),
            supplements: BTreeMap::new(),
            timesheets: BTreeMap::new(),
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn with_interval(mut self, interval: impl Into<String>) -> Self {
        self.interval = interval.into();
        self
    }

    pub fn with_timing_resolution(mut self, resolution: impl Into<String>) -> Self {
        self.timing_resolution = resolution.into();
        self
    }

    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = timezone.into();
        self
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    pub fn with_week_start(mut self, week_start: WeekStart) -> Self {
        self.week_start = week_start;
        self
    }

    /// Replaces the working-hours rules. An empty list keeps the defaults.
    pub fn with_working_hours(mut self, rules: Vec<String>) -> Self {
        if !rules.is_empty() {
            self.working_hours = rules;
        }
        self
    }

    pub fn with_copyright(mut self, copyright: impl Into<String>) -> Self {
        self.copyright = Some(copyright.into());
        self
    }

    pub fn with_rate(mut self, rate: impl Into<String>) -> Self {
        self.rate = Some(rate.into());
        self
    }

    pub fn with_balance(mut self, balance: impl Into<String>) -> Self {
        self.balance = Some(balance.into());
        self
    }

    pub fn with_aux_dir(mut self, aux_dir: impl Into<String>) -> Self {
        self.aux_dir = Some(aux_dir.into());
        self
    }

    /// Inserts a top-level task, replacing any task with the same id.
    pub fn add_task(&mut self, task: Task) {
        self.tasks.insert(task.id.clone(), task);
    }

    pub fn add_resource(&mut self, resource: Resource) {
        self.resources.push(resource);
    }

    pub fn add_report(&mut self, id: impl Into<String>, config: impl Into<String>) {
        self.reports.insert(id.into(), config.into());
    }

    /// Sets the output directory for the current generate cycle.
    pub fn set_output_dir(&mut self, dir: impl Into<String>) {
        self.output_dir = dir.into();
    }

    /// Looks up a task by dotted path (`phase1.design`).
    pub fn find_task(&self, path: &str) -> Option<&Task> {
        let mut parts = path.split('.');
        let mut current = self.tasks.get(parts.next()?)?;
        for part in parts {
            current = current.tasks.get(part)?;
        }
        Some(current)
    }

    /// Looks up a resource by id, including nested sub-resources.
    pub fn find_resource(&self, id: &str) -> Option<&Resource> {
        self.resources
            .iter()
            .flat_map(|r| r.walk())
            .find(|r| r.id == id)
    }
}

impl Entity for Project {
    fn id(&self) -> &str {
        &self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
}

impl FlagCapable for Project {
    fn flags(&self) -> &[String] {
        &self.flags
    }
    fn flags_mut(&mut self) -> &mut Vec<String> {
        &mut self.flags
    }
}

impl LimitCapable for Project {
    fn limits(&self) -> &[String] {
        &self.limits
    }
    fn limits_mut(&mut self) -> &mut Vec<String> {
        &mut self.limits
    }
}

impl JournalCapable for Project {
    fn journal(&self) -> &BTreeMap<String, JournalEntry> {
        &self.journal
    }
    fn journal_mut(&mut self) -> &mut BTreeMap<String, JournalEntry> {
        &mut self.journal
    }
}

impl ProjectIdCapable for Project {
    fn project_ids(&self) -> &[String] {
        &self.project_ids
    }
    fn project_ids_mut(&mut self) -> &mut Vec<String> {
        &mut self.project_ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_defaults() {
        let p = Project::new("p1", "Demo");

        assert_eq!(p.id, "p1");
        assert_eq!(p.name, "Demo");
        assert_eq!(p.interval, "2017-07-01 - 2024-06-30");
        assert_eq!(p.timing_resolution, "60min");
        assert_eq!(p.timezone, "America/Denver");
        assert_eq!(p.week_start.keyword(), "weekstartsmonday");
        assert_eq!(p.working_hours, default_working_hours());
        assert!(p.output_dir.is_empty());
        assert!(p.copyright.is_none());
    }

    #[test]
    fn test_default_project_has_generated_id() {
        let a = Project::default();
        let b = Project::default();
        assert_eq!(a.name, "default");
        assert!(!a.id.is_empty());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_empty_working_hours_keeps_defaults() {
        let p = Project::new("p1", "Demo").with_working_hours(Vec::new());
        assert_eq!(p.working_hours.len(), 2);

        let p = Project::new("p1", "Demo").with_working_hours(vec!["mon - sun off".into()]);
        assert_eq!(p.working_hours, vec!["mon - sun off"]);
    }

    #[test]
    fn test_instances_do_not_share_collections() {
        let mut a = Project::new("a", "A");
        let b = Project::new("b", "B");
        a.add_flag("x");
        a.add_limit("dailymax 8h");
        a.add_project_id("other");
        a.working_hours.push("sat 9:00 - 12:00".into());

        assert!(b.flags.is_empty());
        assert!(b.limits.is_empty());
        assert!(b.project_ids.is_empty());
        assert_eq!(b.working_hours.len(), 2);
    }

    #[test]
    fn test_find_task_by_path() {
        let mut p = Project::new("p1", "Demo");
        p.add_task(
            Task::new("phase1", "Phase 1").with_sub_task(Task::new("design", "Design")),
        );

        assert_eq!(p.find_task("phase1").map(|t| t.name.as_str()), Some("Phase 1"));
        assert_eq!(
            p.find_task("phase1.design").map(|t| t.name.as_str()),
            Some("Design")
        );
        assert!(p.find_task("phase1.missing").is_none());
        assert!(p.find_task("").is_none());
    }

    #[test]
    fn test_find_nested_resource() {
        let mut p = Project::new("p1", "Demo");
        let mut team = Resource::new("Team").with_id("team");
        team.add_sub_resource(Resource::new("Dev").with_id("dev"));
        p.add_resource(team);

        assert!(p.find_resource("team").is_some());
        assert!(p.find_resource("dev").is_some());
        assert!(p.find_resource("nobody").is_none());
    }

    #[test]
    fn test_project_serde() {
        let mut p = Project::new("p1", "Demo").with_copyright("ACME");
        p.add_task(Task::new("t1", "Task 1"));

        let json = serde_json::to_string(&p).unwrap();
        assert!(json.contains("\"week_start\":\"monday\""));
        let back: Project = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }
}
