//! Error types for document generation and tj3 execution.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Errors surfaced by the generate cycle.
#[derive(Error, Debug)]
pub enum TjpError {
    /// Output directory or document could not be created or written.
    #[error("failed to write {}: {source}", path.display())]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised while running the external scheduling engine.
///
/// These never escape `Generator::generate`; they are reported inside its
/// outcome instead.
#[derive(Error, Debug)]
pub enum ExecutionError {
    /// No container runtime found in PATH.
    #[error("container runtime not found (tried: {0})")]
    RuntimeNotFound(String),

    /// The runtime process could not be started.
    #[error("failed to spawn '{runtime}': {source}")]
    Spawn {
        runtime: String,
        #[source]
        source: std::io::Error,
    },

    /// tj3 (or the runtime) exited unsuccessfully.
    #[error("process exited with status {code:?}: {stderr}")]
    NonZeroExit { code: Option<i32>, stderr: String },

    /// The process ran past the configured timeout and was killed.
    #[error("process timed out after {timeout:?}")]
    TimedOut { timeout: Duration },

    /// I/O error while waiting on or reading from the process.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for generate operations.
pub type Result<T> = std::result::Result<T, TjpError>;
