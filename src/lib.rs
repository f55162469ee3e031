//! TaskJuggler project files from typed Rust models.
//!
//! Builds project, task and resource models in memory, serializes them into
//! the TaskJuggler project-definition language, and runs `tj3` on the
//! result inside a container. Scheduling itself (critical path, leveling,
//! calendars) is left entirely to `tj3`.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Project`, `Task`, `Resource`, `Allocation`,
//!   `Dependency`, `JournalEntry`, and the shared capability traits
//! - **`tjp`**: Serializer: project header, optional clauses, nested blocks
//! - **`validation`**: Optional structural checks (identity, references, cycles)
//! - **`runner`**: Execution adapter: containerized `tj3` invocation
//! - **`generator`**: Generate cycle: output location, document, execution
//! - **`config`**: Generator settings and `TJP_*` environment overrides
//!
//! # Example
//!
//! ```no_run
//! use tjp_model::models::{Allocation, Project, Resource, Task};
//! use tjp_model::{Generator, GeneratorConfig};
//!
//! let mut project = Project::new("acso", "Accounting Software");
//! project.add_resource(Resource::new("Paul Smith").with_id("paul"));
//!
//! let mut spec = Task::new("spec", "Specification").with_effort("20d");
//! spec.set_allocate(Allocation::new("paul"));
//! project.add_task(spec);
//!
//! let generator = Generator::new(GeneratorConfig::from_env());
//! let outcome = generator.generate(&mut project).unwrap();
//! println!("wrote {}", outcome.document_path.display());
//! ```

pub mod config;
pub mod error;
pub mod generator;
pub mod id;
pub mod models;
pub mod runner;
pub mod tjp;
pub mod validation;

pub use config::GeneratorConfig;
pub use error::{ExecutionError, Result, TjpError};
pub use generator::{ExecutionStatus, GenerateOutcome, Generator};
pub use runner::{ContainerExecutor, ExecutionResult, Executor};
pub use tjp::RenderMode;
