//! Project-file serializer.
//!
//! Translates a [`Project`](crate::models::Project) and everything it owns
//! into the textual project-definition language read by `tj3`.
//!
//! # Modules
//!
//! - **`writer`**: document layout (header, optional clauses, pending markers)
//! - **`entities`**: nested `task`, `resource` and `journalentry` blocks
//! - **`syntax`**: quoting, identifiers and indentation
//! - **`output`**: timestamp-derived output directory names
//!
//! Attribute values are written as given. Whether they are legal is up to
//! `tj3`.

mod entities;
mod output;
mod syntax;
mod writer;

pub use entities::{render_journal_entry, render_resource, render_task};
pub use output::{output_dir_name, DOCUMENT_NAME, OUTPUT_DIR_PREFIX};
pub use syntax::{identifier, quote, reference};
pub use writer::{render_header, render_project, RenderMode};
