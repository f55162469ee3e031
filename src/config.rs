//! Generator configuration.
//!
//! # Environment Variables
//!
//! - `TJP_OUTPUT_ROOT`: base directory for output directories
//! - `TJP_RUNTIME`: container runtime binary (`docker`, `podman`, or a path)
//! - `TJP_IMAGE`: container image providing `tj3`
//! - `TJP_TIMEOUT_SECS`: kill `tj3` after this many seconds
//! - `TJP_EXECUTE`: `0`/`false` to only write the document
//! - `TJP_RENDER_MODE`: `placeholder` or `full`

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use tracing::warn;

use crate::tjp::{RenderMode, DOCUMENT_NAME};

/// Environment variable for the output root.
pub const OUTPUT_ROOT_ENV: &str = "TJP_OUTPUT_ROOT";

/// Environment variable for the container runtime.
pub const RUNTIME_ENV: &str = "TJP_RUNTIME";

/// Environment variable for the container image.
pub const IMAGE_ENV: &str = "TJP_IMAGE";

/// Environment variable for the execution timeout.
pub const TIMEOUT_ENV: &str = "TJP_TIMEOUT_SECS";

/// Environment variable toggling execution.
pub const EXECUTE_ENV: &str = "TJP_EXECUTE";

/// Environment variable for the render mode.
pub const RENDER_MODE_ENV: &str = "TJP_RENDER_MODE";

/// Image used when none is configured.
pub const DEFAULT_IMAGE: &str = "treibholz/tj3:latest";

/// Where the working directory is mounted inside the container.
pub const DEFAULT_MOUNT_POINT: &str = "/tj3";

/// Runtimes probed in PATH, in order, when none is configured.
pub const RUNTIME_CANDIDATES: &[&str] = &["docker", "podman"];

/// Settings for one [`Generator`](crate::Generator).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Directory under which each cycle's output directory is created.
    pub output_root: PathBuf,
    /// File name of the document inside the output directory.
    pub document_name: String,
    pub render_mode: RenderMode,
    /// Container runtime. `None` probes [`RUNTIME_CANDIDATES`].
    pub runtime: Option<String>,
    pub image: String,
    pub mount_point: String,
    /// `None` waits indefinitely.
    pub timeout_secs: Option<u64>,
    /// Run `tj3` after writing the document.
    pub execute: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            output_root: PathBuf::from("."),
            document_name: DOCUMENT_NAME.to_string(),
            render_mode: RenderMode::Placeholder,
            runtime: None,
            image: DEFAULT_IMAGE.to_string(),
            mount_point: DEFAULT_MOUNT_POINT.to_string(),
            timeout_secs: None,
            execute: true,
        }
    }
}

impl GeneratorConfig {
    /// Defaults overlaid with the `TJP_*` environment variables.
    ///
    /// Unparseable values are logged and ignored.
    pub fn from_env() -> Self {
        Self::default().overlay(|key| std::env::var(key).ok())
    }

    /// Applies overrides looked up by `get`.
    fn overlay(mut self, get: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(root) = get(OUTPUT_ROOT_ENV) {
            self.output_root = PathBuf::from(root);
        }
        if let Some(runtime) = get(RUNTIME_ENV).filter(|s| !s.trim().is_empty()) {
            self.runtime = Some(runtime);
        }
        if let Some(image) = get(IMAGE_ENV).filter(|s| !s.trim().is_empty()) {
            self.image = image;
        }
        if let Some(raw) = get(TIMEOUT_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(secs) => self.timeout_secs = Some(secs),
                Err(e) => warn!(var = TIMEOUT_ENV, value = %raw, error = %e, "ignoring invalid timeout"),
            }
        }
        if let Some(raw) = get(EXECUTE_ENV) {
            match parse_bool(&raw) {
                Some(execute) => self.execute = execute,
                None => warn!(var = EXECUTE_ENV, value = %raw, "ignoring invalid flag"),
            }
        }
        if let Some(raw) = get(RENDER_MODE_ENV) {
            match raw.trim().to_ascii_lowercase().as_str() {
                "placeholder" => self.render_mode = RenderMode::Placeholder,
                "full" => self.render_mode = RenderMode::Full,
                _ => warn!(var = RENDER_MODE_ENV, value = %raw, "ignoring unknown render mode"),
            }
        }
        self
    }

    pub fn with_output_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.output_root = root.into();
        self
    }

    pub fn with_render_mode(mut self, mode: RenderMode) -> Self {
        self.render_mode = mode;
        self
    }

    pub fn with_runtime(mut self, runtime: impl Into<String>) -> Self {
        self.runtime = Some(runtime.into());
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    pub fn with_execute(mut self, execute: bool) -> Self {
        self.execute = execute;
        self
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
