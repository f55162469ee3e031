//! Project, task and resource models.
//!
//! Entities are attribute bags built once with defaults and then mutated
//! through setters that insert into or append to their collections. There
//! are no removal operations. Cross-entity references (allocations,
//! `depends`, `precedes`) are by key, never by pointer.
//!
//! # Ownership
//!
//! | Owner | Owns |
//! |-------|------|
//! | Project | Tasks (by id), Resources (ordered) |
//! | Task | child Tasks, Allocations, Dependencies |
//! | Resource | sub-Resources |

mod capability;
mod journal;
mod project;
mod relation;
mod resource;
mod task;

pub use capability::{Entity, FlagCapable, JournalCapable, LimitCapable, ProjectIdCapable};
pub use journal::JournalEntry;
pub use project::{default_working_hours, Project, WeekStart};
pub use relation::{Allocation, Dependency};
pub use resource::Resource;
pub use task::{Task, DEFAULT_PRIORITY};
