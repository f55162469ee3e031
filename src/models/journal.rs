//! Journal entry record.
//!
//! A journal entry is a dated status annotation attached to a project,
//! task or resource. Only the headline is required.

use serde::{Deserialize, Serialize};

/// A dated annotation recorded against an entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Entry date, kept as opaque text (e.g. `2024-03-01`).
    pub date: Option<String>,
    /// One-line title.
    pub headline: String,
    /// Alert level (`green`, `yellow`, `red`).
    pub alert: Option<String>,
    /// Author resource id.
    pub author: Option<String>,
    /// Free-text body.
    pub details: Option<String>,
    pub flags: Vec<String>,
    /// Short summary shown in reports.
    pub summary: Option<String>,
}

impl JournalEntry {
    /// Creates an undated entry with the given headline.
    pub fn new(headline: impl Into<String>) -> Self {
        Self {
            headline: headline.into(),
            ..Default::default()
        }
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn with_alert(mut self, alert: impl Into<String>) -> Self {
        self.alert = Some(alert.into());
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_flag(mut self, flag: impl Into<String>) -> Self {
        self.flags.push(flag.into());
        self
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }
}
