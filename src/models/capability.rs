//! Capabilities shared across entity kinds.
//!
//! Project, Task and Resource each carry flags, limits and journal entries.
//! Rather than duplicating the accumulation and rendering logic, each entity
//! exposes its storage through a small accessor trait and inherits the
//! behavior from default methods.
//!
//! | Capability | Project | Task | Resource |
//! |------------|---------|------|----------|
//! | `FlagCapable` | yes | yes | yes |
//! | `LimitCapable` | yes | yes | yes |
//! | `JournalCapable` | yes | yes | yes |
//! | `ProjectIdCapable` | yes | | |
//!
//! Render helpers return `None` for empty collections. Whether an empty
//! collection is skipped is the serializer's decision.

use std::collections::BTreeMap;

use super::JournalEntry;
use crate::id::new_id;

/// Identity shared by every entity.
pub trait Entity {
    /// Identifier used in the generated document.
    fn id(&self) -> &str;
    /// Human-readable name.
    fn name(&self) -> &str;
}

/// Accumulates free-form flag labels.
pub trait FlagCapable {
    fn flags(&self) -> &[String];
    fn flags_mut(&mut self) -> &mut Vec<String>;

    /// Appends a flag. Duplicates are kept.
    fn add_flag(&mut self, flag: impl Into<String>)
    where
        Self: Sized,
    {
        self.flags_mut().push(flag.into());
    }

    /// `flags a, b, c` in insertion order.
    fn render_flags(&self) -> Option<String> {
        let flags = self.flags();
        if flags.is_empty() {
            return None;
        }
        Some(format!("flags {}", flags.join(", ")))
    }
}

/// Accumulates constraint expressions such as `dailymax 8h`.
pub trait LimitCapable {
    fn limits(&self) -> &[String];
    fn limits_mut(&mut self) -> &mut Vec<String>;

    /// Appends a limit expression. Values are not interpreted.
    fn add_limit(&mut self, limit: impl Into<String>)
    where
        Self: Sized,
    {
        self.limits_mut().push(limit.into());
    }

    /// A `limits { ... }` block, one expression per tab-indented line.
    fn render_limits(&self) -> Option<String> {
        let limits = self.limits();
        if limits.is_empty() {
            return None;
        }
        Some(format!("limits {{\n\t{}\n}}", limits.join("\n\t")))
    }
}

/// Records dated annotations under generated keys.
pub trait JournalCapable {
    fn journal(&self) -> &BTreeMap<String, JournalEntry>;
    fn journal_mut(&mut self) -> &mut BTreeMap<String, JournalEntry>;

    /// Stores `entry` under a fresh key and returns that key.
    ///
    /// Keys are unique even when identical entries are recorded repeatedly.
    fn record_journal_entry(&mut self, entry: JournalEntry) -> String {
        let key = new_id();
        self.journal_mut().insert(key.clone(), entry);
        key
    }

    /// Entries ordered by date, then key. Undated entries come first.
    fn journal_in_order(&self) -> Vec<(&str, &JournalEntry)> {
        let mut entries: Vec<_> = self
            .journal()
            .iter()
            .map(|(k, e)| (k.as_str(), e))
            .collect();
        entries.sort_by(|a, b| a.1.date.cmp(&b.1.date).then_with(|| a.0.cmp(b.0)));
        entries
    }
}

/// Project ids for multi-project files.
pub trait ProjectIdCapable {
    fn project_ids(&self) -> &[String];
    fn project_ids_mut(&mut self) -> &mut Vec<String>;

    fn add_project_id(&mut self, id: impl Into<String>)
    where
        Self: Sized,
    {
        self.project_ids_mut().push(id.into());
    }

    /// `projectids a, b` in insertion order.
    fn render_project_ids(&self) -> Option<String> {
        let ids = self.project_ids();
        if ids.is_empty() {
            return None;
        }
        Some(format!("projectids {}", ids.join(", ")))
    }
}
