//! Project document writer.
//!
//! # Layout
//! 1. `project` header block with the global settings, ending in `outputdir`.
//! 2. A blank line.
//! 3. Optional clauses, each emitted only when its value is set, in this
//!    order: flags, limits, projectids, copyright, rate, journal entries,
//!    then one line per attribute group (macros, leaves, accounts, shifts,
//!    resources, tasks, balance, auxdir, includes, navigators, reports,
//!    exports, statussheets, supplements, timesheets).
//!
//! Attribute groups that have no translation yet produce a `#... support
//! still needs to be implemented` comment. In [`RenderMode::Full`],
//! resources and tasks are written as nested blocks instead.
//!
//! Every line of the document ends with `\n`. Rendering is pure: the
//! output directory must already be set on the project.

use serde::{Deserialize, Serialize};

use super::entities::{write_journal, write_limits, write_resource, write_task};
use super::syntax::{identifier, quote, single_quote, Lines};
use crate::models::{FlagCapable, Project, ProjectIdCapable};

/// How resources and tasks are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// One pending-support comment per non-empty group.
    #[default]
    Placeholder,
    /// Full `resource` / `task` blocks and project journal entries.
    Full,
}

/// Comment line for an attribute group that is set but not translated.
fn pending(out: &mut Lines, present: bool, group: &str) {
    if present {
        out.push(format!("#{group} support still needs to be implemented"));
    }
}

/// Renders the `project` header block, terminated by `}\n`.
pub fn render_header(project: &Project) -> String {
    let working_hours: Vec<String> = project
        .working_hours
        .iter()
        .map(|rule| format!("workinghours {rule}"))
        .collect();

    format!(
        "project {id} {name} {interval} {{\n\
         \ttimingresolution {resolution}\n\
         \ttimezone {timezone}\n\
         \tdailyworkinghours {daily}\n\
         \tyearlyworkingdays {yearly}\n\
         \ttimeformat {time_format}\n\
         \tshorttimeformat {short_format}\n\
         \tcurrencyformat {currency_format}\n\
         \t{week_start}\n\
         \t{working_hours}\n\
         \toutputdir {output_dir}\n\
         }}\n",
        id = identifier(&project.id),
        name = quote(&project.name),
        interval = project.interval,
        resolution = project.timing_resolution,
        timezone = quote(&project.timezone),
        daily = project.daily_working_hours,
        yearly = project.yearly_working_days,
        time_format = quote(&project.time_format),
        short_format = quote(&project.short_time_format),
        currency_format = single_quote(&project.currency_format),
        week_start = project.week_start.keyword(),
        working_hours = working_hours.join("\n\t"),
        output_dir = quote(&project.output_dir),
    )
}

/// Renders the full document for `project`.
pub fn render_project(project: &Project, mode: RenderMode) -> String {
    let mut doc = render_header(project);
    doc.push('\n');

    let mut body = Lines::new();
    body.push_opt(project.render_flags());
    write_limits(&mut body, project);
    body.push_opt(project.render_project_ids());
    body.quoted_attr("copyright", project.copyright.as_ref());
    body.attr("rate", project.rate.as_ref());
    if mode == RenderMode::Full {
        write_journal(&mut body, project);
    }

    pending(&mut body, !project.macros.is_empty(), "Macros");
    pending(&mut body, !project.leaves.is_empty(), "Leaves");
    pending(&mut body, !project.accounts.is_empty(), "Account");
    pending(&mut body, !project.shifts.is_empty(), "Shifts");

    match mode {
        RenderMode::Placeholder => {
            pending(&mut body, !project.resources.is_empty(), "Resources");
            pending(&mut body, !project.tasks.is_empty(), "Tasks");
        }
        RenderMode::Full => {
            for resource in &project.resources {
                write_resource(&mut body, resource);
            }
            for task in project.tasks.values() {
                write_task(&mut body, task);
            }
        }
    }

    pending(&mut body, project.balance.is_some(), "Balance");
    pending(&mut body, project.aux_dir.is_some(), "Auxdir");
    pending(&mut body, !project.includes.is_empty(), "Include");
    pending(&mut body, !project.navigators.is_empty(), "Navigators");
    pending(&mut body, !project.reports.is_empty(), "Report");
    pending(&mut body, !project.exports.is_empty(), "Export");
    pending(&mut body, !project.statussheets.is_empty(), "Statussheets");
    pending(&mut body, !project.supplements.is_empty(), "Supplements");
    pending(&mut body, !project.timesheets.is_empty(), "Timesheets");

    if !body.is_empty() {
        doc.push_str(&body.join());
        doc.push('\n');
    }
    doc
}
