//! Nested `task`, `resource` and `journalentry` blocks.

use tracing::debug;

use super::syntax::{identifier, quote, reference, Lines};
use crate::models::{
    Allocation, Dependency, FlagCapable, JournalCapable, JournalEntry, LimitCapable, Resource,
    Task, DEFAULT_PRIORITY,
};

/// Renders a task and its descendants as a `task` block.
pub fn render_task(task: &Task) -> String {
    let mut out = Lines::new();
    write_task(&mut out, task);
    out.join()
}

/// Renders a resource and its sub-resources as a `resource` block.
pub fn render_resource(resource: &Resource) -> String {
    let mut out = Lines::new();
    write_resource(&mut out, resource);
    out.join()
}

/// Renders one journal entry, or `None` when it has no date.
pub fn render_journal_entry(entry: &JournalEntry) -> Option<String> {
    let mut out = Lines::new();
    write_journal_entry(&mut out, entry).then(|| out.join())
}

pub(crate) fn write_task(out: &mut Lines, task: &Task) {
    let mut body = Lines::new();

    body.attr("start", task.start.as_ref());
    body.attr("end", task.end.as_ref());
    body.attr("duration", task.duration.as_ref());
    body.attr("effort", task.effort.as_ref());
    body.attr("length", task.length.as_ref());
    if task.milestone {
        body.push("milestone");
    }
    if task.priority != DEFAULT_PRIORITY {
        body.push(format!("priority {}", task.priority));
    }
    body.attr("complete", task.complete.as_ref());
    body.attr("minstart", task.min_start.as_ref());
    body.attr("maxstart", task.max_start.as_ref());
    body.attr("minend", task.min_end.as_ref());
    body.attr("maxend", task.max_end.as_ref());
    body.attr("scheduling", task.scheduling.as_ref());
    body.attr("schedulingmode", task.scheduling_mode.as_ref());
    body.attr("responsible", task.responsible.as_ref());
    body.attr("booking", task.booking.as_ref());
    body.attr("charge", task.charge.as_ref());
    body.attr("chargeset", task.chargeset.as_ref());
    body.attr("effortdone", task.effort_done.as_ref());
    body.attr("effortleft", task.effort_left.as_ref());
    body.attr("fail", task.fail.as_ref());
    body.attr("warn", task.warn.as_ref());
    body.attr("period", task.period.as_ref());
    body.attr("projectid", task.project_id.as_ref());
    body.attr("purge", task.purge.as_ref());
    body.attr("scheduled", task.scheduled.as_ref());
    body.attr("shifts", task.shifts.as_ref());
    body.attr("adopt", task.adopt.as_ref());
    body.attr("supplement", task.supplement.as_ref());
    body.quoted_attr("note", task.note.as_ref());

    for allocation in task.allocations.values() {
        write_allocation(&mut body, allocation);
    }
    for (target, dependency) in &task.depends {
        write_dependency(&mut body, "depends", target, dependency);
    }
    for (target, dependency) in &task.precedes {
        write_dependency(&mut body, "precedes", target, dependency);
    }
    body.push_opt(task.render_flags());
    write_limits(&mut body, task);
    write_journal(&mut body, task);

    for child in task.tasks.values() {
        write_task(&mut body, child);
    }

    out.block(
        format!("task {} {}", identifier(&task.id), quote(&task.name)),
        body,
    );
}

fn write_allocation(out: &mut Lines, allocation: &Allocation) {
    let mut body = Lines::new();
    if let Some(alternative) = &allocation.alternative {
        body.push(format!("alternative {}", reference(alternative)));
    }
    body.attr("select", allocation.select.as_ref());
    if allocation.mandatory == Some(true) {
        body.push("mandatory");
    }
    if allocation.persistent == Some(true) {
        body.push("persistent");
    }
    body.attr("shifts", allocation.shifts.as_ref());

    out.block(format!("allocate {}", reference(&allocation.resource)), body);
}

fn write_dependency(out: &mut Lines, keyword: &str, target: &str, dependency: &Dependency) {
    let mut body = Lines::new();
    body.attr("gapduration", dependency.gap_duration.as_ref());
    body.attr("gaplength", dependency.gap_length.as_ref());
    if dependency.on_end {
        body.push("onend");
    }
    if dependency.on_start {
        body.push("onstart");
    }

    out.block(format!("{keyword} {}", reference(target)), body);
}

pub(crate) fn write_resource(out: &mut Lines, resource: &Resource) {
    let mut body = Lines::new();

    body.quoted_attr("email", resource.email.as_ref());
    body.attr("efficiency", resource.efficiency.as_ref());
    body.attr("rate", resource.rate.as_ref());
    body.attr("workinghours", resource.working_hours.as_ref());
    body.attr("booking", resource.booking.as_ref());
    body.attr("chargeset", resource.chargeset.as_ref());
    body.attr("fail", resource.fail.as_ref());
    body.attr("purge", resource.purge.as_ref());
    for leave in &resource.leaves {
        body.push(format!("leaves {leave}"));
    }
    for allowance in &resource.leave_allowances {
        body.push(format!("leaveallowance {allowance}"));
    }
    if !resource.managers.is_empty() {
        let managers: Vec<String> = resource.managers.iter().map(|m| reference(m)).collect();
        body.push(format!("managers {}", managers.join(", ")));
    }
    for (period, shift) in &resource.shifts {
        body.push(format!("shifts {} {period}", reference(shift)));
    }
    for (period, label) in &resource.vacation {
        body.push(format!("vacation {} {period}", quote(label)));
    }
    body.push_opt(resource.render_flags());
    write_limits(&mut body, resource);
    write_journal(&mut body, resource);

    for child in &resource.resources {
        write_resource(&mut body, child);
    }

    out.block(
        format!("resource {} {}", identifier(&resource.id), quote(&resource.name)),
        body,
    );
}

/// Writes a `limits` block, one expression per line.
pub(crate) fn write_limits<L: LimitCapable>(out: &mut Lines, owner: &L) {
    if owner.limits().is_empty() {
        return;
    }
    let mut body = Lines::new();
    for limit in owner.limits() {
        body.push(limit.as_str());
    }
    out.block("limits", body);
}

/// Writes every dated entry of `owner` in date order.
pub(crate) fn write_journal<J: JournalCapable>(out: &mut Lines, owner: &J) {
    for (key, entry) in owner.journal_in_order() {
        if !write_journal_entry(out, entry) {
            debug!(key = %key, headline = %entry.headline, "skipping undated journal entry");
        }
    }
}

fn write_journal_entry(out: &mut Lines, entry: &JournalEntry) -> bool {
    let Some(date) = &entry.date else {
        return false;
    };

    let mut body = Lines::new();
    body.attr("alert", entry.alert.as_ref());
    if let Some(author) = &entry.author {
        body.push(format!("author {}", reference(author)));
    }
    body.quoted_attr("summary", entry.summary.as_ref());
    body.quoted_attr("details", entry.details.as_ref());
    if !entry.flags.is_empty() {
        body.push(format!("flags {}", entry.flags.join(", ")));
    }

    out.block(
        format!("journalentry {date} {}", quote(&entry.headline)),
        body,
    );
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_task() {
        let task = Task::new("t1", "Task 1");
        assert_eq!(render_task(&task), "task t1 \"Task 1\"");
    }

    #[test]
    fn test_task_attributes_in_order() {
        let task = Task::new("t1", "Task 1")
            .with_effort("5d")
            .with_start("2024-01-08")
            .with_priority(700)
            .with_note("Check \"scope\"")
            .milestone();

        assert_eq!(
            render_task(&task),
            "task t1 \"Task 1\" {\n\
             \tstart 2024-01-08\n\
             \teffort 5d\n\
             \tmilestone\n\
             \tpriority 700\n\
             \tnote \"Check \\\"scope\\\"\"\n\
             }"
        );
    }

    #[test]
    fn test_allocations_and_relations() {
        let mut task = Task::new("build", "Build");
        task.set_allocate(Allocation::new("dev1"));
        task.set_allocate(
            Allocation::new("dev2")
                .with_alternative("dev3")
                .with_persistent(true),
        );
        task.set_depends("design", Dependency::new().with_gap_length("2d"));
        task.set_precedes("!test", Dependency::new().on_start());

        let text = render_task(&task);
        assert!(text.contains("\tallocate dev1\n"));
        assert!(text.contains("\tallocate dev2 {\n\t\talternative dev3\n\t\tpersistent\n\t}"));
        assert!(text.contains("\tdepends design {\n\t\tgaplength 2d\n\t}"));
        assert!(text.contains("\tprecedes !test {\n\t\tonstart\n\t}"));
    }

    #[test]
    fn test_nested_tasks_indent() {
        let task = Task::new("phase1", "Phase 1")
            .with_sub_task(Task::new("design", "Design").with_effort("3d"));

        assert_eq!(
            render_task(&task),
            "task phase1 \"Phase 1\" {\n\ttask design \"Design\" {\n\t\teffort 3d\n\t}\n}"
        );
    }

    #[test]
    fn test_task_flags_limits_and_journal() {
        let mut task = Task::new("t1", "Task 1");
        task.add_flag("critical");
        task.add_limit("dailymax 6h");
        task.record_journal_entry(
            JournalEntry::new("Blocked")
                .with_date("2024-02-01")
                .with_alert("red")
                .with_author("alice"),
        );

        let text = render_task(&task);
        assert!(text.contains("\tflags critical\n"));
        assert!(text.contains("\tlimits {\n\t\tdailymax 6h\n\t}"));
        assert!(text.contains(
            "\tjournalentry 2024-02-01 \"Blocked\" {\n\t\talert red\n\t\tauthor alice\n\t}"
        ));
    }

    #[test]
    fn test_multi_line_text_survives_nesting() {
        let mut leaf = Task::new("t1", "Task 1").with_note("line one\nline two");
        leaf.record_journal_entry(
            JournalEntry::new("Status")
                .with_date("2024-02-01")
                .with_details("para one\r\npara two"),
        );
        let task = Task::new("phase1", "Phase 1").with_sub_task(leaf);

        let text = render_task(&task);
        assert!(text.contains("\t\tnote \"line one\nline two\"\n"));
        assert!(text.contains("\t\t\tdetails \"para one\r\npara two\"\n"));
        assert!(!text.contains("line one\n\t"));
        assert!(!text.contains("para one\n"));
    }

    #[test]
    fn test_undated_journal_entry_is_skipped() {
        let entry = JournalEntry::new("No date");
        assert_eq!(render_journal_entry(&entry), None);

        let mut task = Task::new("t1", "Task 1");
        task.record_journal_entry(entry);
        assert_eq!(render_task(&task), "task t1 \"Task 1\"");
    }

    #[test]
    fn test_journal_entry_full() {
        let entry = JournalEntry::new("Review")
            .with_date("2024-03-01")
            .with_summary("Went fine")
            .with_details("Minor remarks")
            .with_flag("review")
            .with_flag("q1");

        assert_eq!(
            render_journal_entry(&entry).as_deref(),
            Some(
                "journalentry 2024-03-01 \"Review\" {\n\
                 \tsummary \"Went fine\"\n\
                 \tdetails \"Minor remarks\"\n\
                 \tflags review, q1\n\
                 }"
            )
        );
    }

    #[test]
    fn test_resource_block() {
        let mut r = Resource::new("Alice")
            .with_id("alice")
            .with_email("alice@example.com")
            .with_rate("400");
        r.add_manager("bob");
        r.set_vacation("2024-12-24 - 2024-12-27", "Holidays");
        r.add_limit("weeklymax 30h");

        assert_eq!(
            render_resource(&r),
            "resource alice \"Alice\" {\n\
             \temail \"alice@example.com\"\n\
             \trate 400\n\
             \tmanagers bob\n\
             \tvacation \"Holidays\" 2024-12-24 - 2024-12-27\n\
             \tlimits {\n\
             \t\tweeklymax 30h\n\
             \t}\n\
             }"
        );
    }

    #[test]
    fn test_resource_calendar_clauses() {
        let mut r = Resource::new("Bob")
            .with_id("bob")
            .with_efficiency("0.8")
            .with_working_hours("mon - thu 9:00 - 17:00");
        r.add_leave("sick 2024-03-04 +2d");
        r.add_leave_allowance("annual 2024-01-01 20d");
        r.set_shift("2024-06-01 - 2024-06-30", "summer");

        assert_eq!(
            render_resource(&r),
            "resource bob \"Bob\" {\n\
             \tefficiency 0.8\n\
             \tworkinghours mon - thu 9:00 - 17:00\n\
             \tleaves sick 2024-03-04 +2d\n\
             \tleaveallowance annual 2024-01-01 20d\n\
             \tshifts summer 2024-06-01 - 2024-06-30\n\
             }"
        );
    }

    #[test]
    fn test_generated_resource_id_is_valid_identifier() {
        let r = Resource::new("Anon");
        let text = render_resource(&r);
        let id = text
            .strip_prefix("resource ")
            .and_then(|s| s.split(' ').next())
            .unwrap();
        assert!(!id.contains('-'));
        assert!(id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'));
    }

    #[test]
    fn test_sub_resources_nest() {
        let mut team = Resource::new("Team").with_id("team");
        team.add_sub_resource(Resource::new("Dev").with_id("dev"));

        assert_eq!(
            render_resource(&team),
            "resource team \"Team\" {\n\tresource dev \"Dev\"\n}"
        );
    }
}
