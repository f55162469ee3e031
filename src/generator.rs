//! The generate cycle: allocate an output location, write the document,
//! then hand it to the scheduling engine.
//!
//! Writing and execution are decoupled. A failed write is an error; a failed
//! execution is logged as a warning and reported in the outcome, so the
//! caller always gets the document when the engine is unavailable.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::{info, warn};

use crate::config::GeneratorConfig;
use crate::error::{Result, TjpError};
use crate::models::Project;
use crate::runner::{ContainerExecutor, ExecutionResult, Executor};
use crate::tjp::{output_dir_name, render_project};

/// What happened to the external run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionStatus {
    /// `tj3` ran and exited successfully.
    Succeeded(ExecutionResult),
    /// `tj3` could not be run or failed; holds the error descriptor.
    Failed(String),
    /// Execution is disabled in the configuration.
    Skipped,
}

impl ExecutionStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, ExecutionStatus::Succeeded(_))
    }
}

/// Result of one generate cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateOutcome {
    /// Path of the written document.
    pub document_path: PathBuf,
    pub execution: ExecutionStatus,
}

/// Writes project documents and runs them through an [`Executor`].
pub struct Generator {
    config: GeneratorConfig,
    executor: Box<dyn Executor>,
}

impl std::fmt::Debug for Generator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Generator")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Generator {
    /// Creates a generator running `tj3` in a container.
    pub fn new(config: GeneratorConfig) -> Self {
        let executor = ContainerExecutor::from_config(&config);
        Self::with_executor(config, executor)
    }

    /// Creates a generator with a custom executor.
    pub fn with_executor(config: GeneratorConfig, executor: impl Executor + 'static) -> Self {
        Self {
            config,
            executor: Box::new(executor),
        }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Assigns a fresh timestamp-derived output directory to `project`.
    ///
    /// Called once per generate cycle; rendering only reads the value.
    pub fn allocate_output_dir(project: &mut Project) -> &str {
        project.set_output_dir(output_dir_name(&Local::now()));
        &project.output_dir
    }

    /// Renders `project` into a new output directory and runs `tj3` on it.
    ///
    /// # Errors
    ///
    /// Returns `TjpError::WriteFailure` if the directory or document cannot
    /// be written. Execution failures never produce an error; they are
    /// reported as `ExecutionStatus::Failed`.
    pub fn generate(&self, project: &mut Project) -> Result<GenerateOutcome> {
        let relative = Path::new(Self::allocate_output_dir(project)).join(&self.config.document_name);
        let document = render_project(project, self.config.render_mode);
        let document_path = self.write(&relative, &document)?;
        info!(path = %document_path.display(), project = %project.id, "project document written");

        let execution = if self.config.execute {
            match self.executor.execute(&relative) {
                Ok(result) => ExecutionStatus::Succeeded(result),
                Err(e) => {
                    warn!(error = %e, path = %document_path.display(), "tj3 execution failed");
                    ExecutionStatus::Failed(e.to_string())
                }
            }
        } else {
            ExecutionStatus::Skipped
        };

        Ok(GenerateOutcome {
            document_path,
            execution,
        })
    }

    fn write(&self, relative: &Path, document: &str) -> Result<PathBuf> {
        let path = self.config.output_root.join(relative);
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|source| TjpError::WriteFailure {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        fs::write(&path, document).map_err(|source| TjpError::WriteFailure {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExecutionError;
    use crate::tjp::OUTPUT_DIR_PREFIX;

    struct Unavailable;

    impl Executor for Unavailable {
        fn execute(&self, _document: &Path) -> std::result::Result<ExecutionResult, ExecutionError> {
            Err(ExecutionError::RuntimeNotFound("docker, podman".into()))
        }
    }

    #[test]
    fn test_allocate_output_dir() {
        let mut p = Project::new("p1", "Demo");
        let dir = Generator::allocate_output_dir(&mut p).to_string();
        assert!(dir.starts_with(OUTPUT_DIR_PREFIX));
        assert_eq!(p.output_dir, dir);
    }

    #[test]
    fn test_execution_failure_is_reported_not_raised() {
        let root = tempfile::tempdir().unwrap();
        let config = GeneratorConfig::default().with_output_root(root.path());
        let generator = Generator::with_executor(config, Unavailable);

        let mut p = Project::new("p1", "Demo");
        let outcome = generator.generate(&mut p).unwrap();

        assert!(outcome.document_path.exists());
        assert!(matches!(outcome.execution, ExecutionStatus::Failed(ref e)
            if e.contains("container runtime not found")));
        assert!(!outcome.execution.is_success());
    }

    #[test]
    fn test_execution_skipped() {
        let root = tempfile::tempdir().unwrap();
        let config = GeneratorConfig::default()
            .with_output_root(root.path())
            .with_execute(false);
        let generator = Generator::with_executor(config, Unavailable);

        let outcome = generator.generate(&mut Project::new("p1", "Demo")).unwrap();
        assert_eq!(outcome.execution, ExecutionStatus::Skipped);
    }

    #[test]
    fn test_write_failure() {
        let root = tempfile::tempdir().unwrap();
        // A regular file where the output root directory should be.
        let blocker = root.path().join("blocker");
        fs::write(&blocker, "x").unwrap();

        let config = GeneratorConfig::default()
            .with_output_root(&blocker)
            .with_execute(false);
        let generator = Generator::with_executor(config, Unavailable);

        let err = generator
            .generate(&mut Project::new("p1", "Demo"))
            .unwrap_err();
        assert!(matches!(err, TjpError::WriteFailure { .. }));
    }
}
