//! Execution adapter for the external scheduling engine.
//!
//! `tj3` runs in a throwaway container: the working directory is bind-mounted
//! read-write at a fixed path, the document is passed as the only argument,
//! and the container is removed when the process exits.
//!
//! Every run gets a unique container name. Killing the runtime client does
//! not stop the container, so a timed-out run is force-removed by name.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, trace, warn};

use crate::config::{GeneratorConfig, RUNTIME_CANDIDATES};
use crate::error::ExecutionError;
use crate::id::new_id;

/// Argument passed to `tj3` when no document is given.
pub const HELP_ARG: &str = "--help";

/// Prefix of generated container names.
pub const CONTAINER_PREFIX: &str = "tjp-";

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Captured result of a finished `tj3` run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionResult {
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

/// Runs the scheduling engine on a written document.
pub trait Executor {
    /// Runs `tj3` on `document`, given relative to the working directory.
    fn execute(&self, document: &Path) -> Result<ExecutionResult, ExecutionError>;
}

/// Runs `tj3` inside a container.
#[derive(Debug, Clone)]
pub struct ContainerExecutor {
    runtime: Option<String>,
    image: String,
    mount_point: String,
    workdir: PathBuf,
    timeout: Option<Duration>,
}

impl ContainerExecutor {
    /// Creates an executor mounting `workdir` with the default image.
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self::from_config(&GeneratorConfig::default().with_output_root(workdir))
    }

    /// Creates an executor from generator settings, mounting `output_root`.
    pub fn from_config(config: &GeneratorConfig) -> Self {
        Self {
            runtime: config.runtime.clone(),
            image: config.image.clone(),
            mount_point: config.mount_point.clone(),
            workdir: config.output_root.clone(),
            timeout: config.timeout_secs.map(Duration::from_secs),
        }
    }

    pub fn with_runtime(mut self, runtime: impl Into<String>) -> Self {
        self.runtime = Some(runtime.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Runs `tj3 --help`.
    pub fn help(&self) -> Result<ExecutionResult, ExecutionError> {
        self.run(HELP_ARG)
    }

    /// Locates the container runtime binary.
    ///
    /// # Errors
    ///
    /// Returns `ExecutionError::RuntimeNotFound` if neither the configured
    /// runtime nor any of the default candidates is in PATH.
    pub fn resolve_runtime(&self) -> Result<PathBuf, ExecutionError> {
        let candidates: Vec<&str> = match &self.runtime {
            Some(runtime) => vec![runtime.as_str()],
            None => RUNTIME_CANDIDATES.to_vec(),
        };
        candidates
            .iter()
            .find_map(|name| which::which(name).ok())
            .ok_or_else(|| ExecutionError::RuntimeNotFound(candidates.join(", ")))
    }

    /// Path of `document` as seen from inside the container.
    pub fn container_path(&self, document: &Path) -> String {
        let relative = document.to_string_lossy().replace('\\', "/");
        format!(
            "{}/{}",
            self.mount_point.trim_end_matches('/'),
            relative.trim_start_matches("./")
        )
    }

    /// Runtime arguments for running `tj3 <argument>` in container `name`.
    pub fn command_args(&self, workdir: &Path, name: &str, argument: &str) -> Vec<String> {
        vec![
            "run".to_string(),
            "--rm".to_string(),
            "--name".to_string(),
            name.to_string(),
            "-v".to_string(),
            format!("{}:{}:rw", workdir.display(), self.mount_point),
            "-w".to_string(),
            self.mount_point.clone(),
            self.image.clone(),
            "tj3".to_string(),
            argument.to_string(),
        ]
    }

    fn absolute_workdir(&self) -> Result<PathBuf, ExecutionError> {
        if self.workdir.is_absolute() {
            Ok(self.workdir.clone())
        } else {
            Ok(std::env::current_dir()?.join(&self.workdir))
        }
    }

    fn run(&self, argument: &str) -> Result<ExecutionResult, ExecutionError> {
        let runtime = self.resolve_runtime()?;
        let name = format!("{CONTAINER_PREFIX}{}", new_id());
        let args = self.command_args(&self.absolute_workdir()?, &name, argument);
        debug!(runtime = %runtime.display(), image = %self.image, container = %name, argument, "running tj3");
        trace!(args = ?args, "container command");

        let mut command = Command::new(&runtime);
        command.args(&args);
        let result = match run_captured(command, self.timeout) {
            Err(err @ ExecutionError::TimedOut { .. }) => {
                remove_container(&runtime, &name);
                return Err(err);
            }
            other => other?,
        };

        trace!(
            exit_code = ?result.exit_code,
            stdout_len = result.stdout.len(),
            stderr_len = result.stderr.len(),
            "tj3 completed"
        );

        if result.exit_code == Some(0) {
            Ok(result)
        } else {
            Err(ExecutionError::NonZeroExit {
                code: result.exit_code,
                stderr: result.stderr,
            })
        }
    }
}

impl Executor for ContainerExecutor {
    fn execute(&self, document: &Path) -> Result<ExecutionResult, ExecutionError> {
        self.run(&self.container_path(document))
    }
}

/// Force-removes container `name`, stopping it if still running.
fn remove_container(runtime: &Path, name: &str) {
    let status = Command::new(runtime)
        .args(["rm", "-f", name])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();
    match status {
        Ok(status) if status.success() => debug!(container = name, "removed timed-out container"),
        Ok(status) => warn!(container = name, code = ?status.code(), "failed to remove timed-out container"),
        Err(e) => warn!(container = name, error = %e, "failed to remove timed-out container"),
    }
}

/// Spawns `command`, capturing stdout and stderr, and waits for it.
fn run_captured(
    mut command: Command,
    timeout: Option<Duration>,
) -> Result<ExecutionResult, ExecutionError> {
    let program = command.get_program().to_string_lossy().into_owned();
    let mut child = command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| ExecutionError::Spawn {
            runtime: program,
            source,
        })?;

    // Drain both pipes concurrently so a chatty child cannot block on a full pipe.
    let stdout = child.stdout.take().map(spawn_reader);
    let stderr = child.stderr.take().map(spawn_reader);

    let status = wait(&mut child, timeout)?;

    Ok(ExecutionResult {
        exit_code: status.code(),
        stdout: join_reader(stdout),
        stderr: join_reader(stderr),
    })
}

fn spawn_reader<R: Read + Send + 'static>(mut pipe: R) -> JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = pipe.read_to_end(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    })
}

fn join_reader(handle: Option<JoinHandle<String>>) -> String {
    handle
        .and_then(|h| h.join().ok())
        .unwrap_or_default()
}

/// Waits for `child`, killing it once `timeout` has elapsed.
fn wait(child: &mut Child, timeout: Option<Duration>) -> Result<ExitStatus, ExecutionError> {
    let Some(timeout) = timeout else {
        return Ok(child.wait()?);
    };

    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(status);
        }
        if Instant::now() >= deadline {
            // The child may exit between the poll and the kill.
            let _ = child.kill();
            let _ = child.wait();
            return Err(ExecutionError::TimedOut { timeout });
        }
        thread::sleep(POLL_INTERVAL);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_args() {
        let executor = ContainerExecutor::new("/work");
        let args = executor.command_args(
            Path::new("/work"),
            "tjp-0000",
            "/tj3/reports_x/report.tjp",
        );

        assert_eq!(
            args,
            vec![
                "run",
                "--rm",
                "--name",
                "tjp-0000",
                "-v",
                "/work:/tj3:rw",
                "-w",
                "/tj3",
                "treibholz/tj3:latest",
                "tj3",
                "/tj3/reports_x/report.tjp",
            ]
        );
    }

    #[test]
    fn test_container_path() {
        let executor = ContainerExecutor::new("/work");
        assert_eq!(
            executor.container_path(Path::new("reports_x/report.tjp")),
            "/tj3/reports_x/report.tjp"
        );
        assert_eq!(
            executor.container_path(Path::new("./report.tjp")),
            "/tj3/report.tjp"
        );
    }

    #[test]
    fn test_missing_runtime() {
        let executor =
            ContainerExecutor::new("/work").with_runtime("definitely-not-a-container-runtime");
        let err = executor.resolve_runtime().unwrap_err();
        assert!(matches!(err, ExecutionError::RuntimeNotFound(ref tried)
            if tried == "definitely-not-a-container-runtime"));

        let err = executor.execute(Path::new("report.tjp")).unwrap_err();
        assert!(matches!(err, ExecutionError::RuntimeNotFound(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_successful_run() {
        // `true` ignores its arguments and exits 0.
        let executor = ContainerExecutor::new("/work").with_runtime("true");
        let result = executor.execute(Path::new("report.tjp")).unwrap();
        assert_eq!(result.exit_code, Some(0));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_zero_exit() {
        let executor = ContainerExecutor::new("/work").with_runtime("false");
        let err = executor.help().unwrap_err();
        assert!(matches!(err, ExecutionError::NonZeroExit { code: Some(1), .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_captures_output() {
        let mut command = Command::new("sh");
        command.args(["-c", "echo out; echo err >&2"]);
        let result = run_captured(command, None).unwrap();

        assert_eq!(result.exit_code, Some(0));
        assert_eq!(result.stdout, "out\n");
        assert_eq!(result.stderr, "err\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_timeout_kills_child() {
        let mut command = Command::new("sleep");
        command.arg("5");
        let started = Instant::now();
        let err = run_captured(command, Some(Duration::from_millis(100))).unwrap_err();

        assert!(matches!(err, ExecutionError::TimedOut { timeout }
            if timeout == Duration::from_millis(100)));
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[cfg(unix)]
    #[test]
    fn test_timeout_removes_container() {
        use std::os::unix::fs::PermissionsExt;

        // Stands in for the runtime: logs its arguments, hangs on `run`.
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("calls.log");
        let runtime = dir.path().join("fake-runtime");
        std::fs::write(
            &runtime,
            format!(
                "#!/bin/sh\necho \"$@\" >> '{}'\n[ \"$1\" = run ] && exec sleep 5\nexit 0\n",
                log.display()
            ),
        )
        .unwrap();
        std::fs::set_permissions(&runtime, std::fs::Permissions::from_mode(0o755)).unwrap();

        let executor = ContainerExecutor::new("/work")
            .with_runtime(runtime.to_string_lossy())
            .with_timeout(Duration::from_millis(300));
        let err = executor.execute(Path::new("report.tjp")).unwrap_err();
        assert!(matches!(err, ExecutionError::TimedOut { .. }));

        let calls = std::fs::read_to_string(&log).unwrap();
        let calls: Vec<&str> = calls.lines().collect();
        assert_eq!(calls.len(), 2);
        let name = calls[0]
            .split(' ')
            .skip_while(|arg| *arg != "--name")
            .nth(1)
            .unwrap();
        assert!(name.starts_with(CONTAINER_PREFIX));
        assert_eq!(calls[1], format!("rm -f {name}"));
    }
}
