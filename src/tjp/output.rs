//! Output location naming.

use chrono::{DateTime, TimeZone};

/// Prefix of every generated output directory.
pub const OUTPUT_DIR_PREFIX: &str = "reports_";

/// File name of the generated document inside the output directory.
pub const DOCUMENT_NAME: &str = "report.tjp";

/// Directory name for a generate cycle started at `at`.
///
/// ISO-8601 with microseconds, colons replaced by `_` so the name is valid
/// on every filesystem: `reports_2024-01-02T03_04_05.000006`.
pub fn output_dir_name<Tz>(at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let stamp = at.format("%Y-%m-%dT%H:%M:%S%.6f").to_string();
    format!("{OUTPUT_DIR_PREFIX}{}", stamp.replace(':', "_"))
}
