//! Command execution module.
//!
//! Every subprocess shipcheck spawns goes through [`CommandRunner`], so the
//! verification hooks and the git plumbing can be driven by a scripted runner
//! in tests instead of a real shell.

use std::path::Path;
use std::process::Stdio;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command as ProcessCommand;

/// Output of a command that ran to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutput {
    /// Exit code (-1 when the process was terminated by a signal)
    pub exit_code: i32,

    /// Standard output followed by standard error, trimmed
    pub output: String,
}

impl RunOutput {
    /// Create a new run output.
    pub fn new(exit_code: i32, output: impl Into<String>) -> Self {
        Self { exit_code, output: output.into() }
    }

    /// Check if the command succeeded (exit code 0).
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Errors that prevent a command from producing a [`RunOutput`].
#[derive(Debug, Error)]
pub enum RunError {
    /// The process could not be started or waited on.
    #[error("Failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The process exceeded its time budget and was killed.
    #[error("Command timed out after {0}ms")]
    Timeout(u64),
}

/// Capability to run a shell command string and capture its outcome.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `command` in `cwd` with extra environment variables, bounded by `timeout`.
    async fn run(
        &self,
        command: &str,
        cwd: &Path,
        env: &[(&str, &str)],
        timeout: Duration,
    ) -> Result<RunOutput, RunError>;
}

/// Runs commands through the platform shell.
///
/// The child inherits the parent environment (plus any extra variables) and is
/// spawned with kill-on-drop, so a timed-out command is terminated as soon as
/// its wait future is abandoned.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellRunner;

impl ShellRunner {
    /// Create a new shell runner.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandRunner for ShellRunner {
    async fn run(
        &self,
        command: &str,
        cwd: &Path,
        env: &[(&str, &str)],
        timeout: Duration,
    ) -> Result<RunOutput, RunError> {
        let (shell, shell_arg) = get_shell();

        let mut cmd = ProcessCommand::new(shell);
        cmd.arg(shell_arg)
            .arg(command)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        for (key, value) in env {
            cmd.env(key, value);
        }

        let start = Instant::now();
        let child = cmd
            .spawn()
            .map_err(|source| RunError::Spawn { command: command.to_string(), source })?;

        tracing::debug!(command, pid = ?child.id(), cwd = %cwd.display(), "Spawned command");

        match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => {
                let exit_code = output.status.code().unwrap_or(-1);
                tracing::debug!(
                    command,
                    exit_code,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Command finished"
                );
                Ok(RunOutput::new(exit_code, combine_output(&output.stdout, &output.stderr)))
            }
            Ok(Err(source)) => Err(RunError::Spawn { command: command.to_string(), source }),
            Err(_) => {
                let timeout_ms = timeout.as_millis() as u64;
                tracing::warn!(command, timeout_ms, "Command timed out, killing");
                Err(RunError::Timeout(timeout_ms))
            }
        }
    }
}

/// Join stdout and stderr into one trimmed string.
fn combine_output(stdout: &[u8], stderr: &[u8]) -> String {
    let stdout = String::from_utf8_lossy(stdout);
    let stderr = String::from_utf8_lossy(stderr);

    let combined = if stderr.trim().is_empty() {
        stdout.to_string()
    } else if stdout.trim().is_empty() {
        stderr.to_string()
    } else {
        format!("{}\n{}", stdout.trim_end(), stderr)
    };

    combined.trim().to_string()
}

/// Get the shell and argument for the current platform.
fn get_shell() -> (&'static str, &'static str) {
    if cfg!(target_os = "windows") {
        ("cmd", "/C")
    } else {
        ("sh", "-c")
    }
}

/// Scripted runner for unit tests.
#[cfg(test)]
pub(crate) mod testing {
    use std::collections::VecDeque;
    use std::path::PathBuf;
    use std::sync::Mutex;

    use super::*;

    /// A command the scripted runner was asked to run.
    #[derive(Debug, Clone)]
    pub struct Call {
        pub command: String,
        pub cwd: PathBuf,
        pub env: Vec<(String, String)>,
        pub timeout: Duration,
    }

    /// Replays queued responses in order and records every call.
    ///
    /// Once the queue is drained, commands succeed with empty output.
    #[derive(Debug, Default)]
    pub struct ScriptedRunner {
        responses: Mutex<VecDeque<Result<RunOutput, RunError>>>,
        calls: Mutex<Vec<Call>>,
    }

    impl ScriptedRunner {
        pub fn new() -> Self {
            Self::default()
        }

        /// Queue a completed run.
        pub fn respond(self, exit_code: i32, output: &str) -> Self {
            self.responses.lock().unwrap().push_back(Ok(RunOutput::new(exit_code, output)));
            self
        }

        /// Queue a run that fails to produce output.
        pub fn fail(self, error: RunError) -> Self {
            self.responses.lock().unwrap().push_back(Err(error));
            self
        }

        pub fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        pub fn commands(&self) -> Vec<String> {
            self.calls().into_iter().map(|c| c.command).collect()
        }
    }

    #[async_trait]
    impl CommandRunner for ScriptedRunner {
        async fn run(
            &self,
            command: &str,
            cwd: &Path,
            env: &[(&str, &str)],
            timeout: Duration,
        ) -> Result<RunOutput, RunError> {
            self.calls.lock().unwrap().push(Call {
                command: command.to_string(),
                cwd: cwd.to_path_buf(),
                env: env.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect(),
                timeout,
            });
            self.responses.lock().unwrap().pop_front().unwrap_or_else(|| Ok(RunOutput::new(0, "")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECOND: Duration = Duration::from_secs(1);

    #[test]
    fn test_combine_output() {
        assert_eq!(combine_output(b"out\n", b""), "out");
        assert_eq!(combine_output(b"", b"  err\n"), "err");
        assert_eq!(combine_output(b"out\n", b"err\n"), "out\nerr");
        assert_eq!(combine_output(b"", b""), "");
    }

    #[test]
    fn test_run_output_success() {
        assert!(RunOutput::new(0, "").success());
        assert!(!RunOutput::new(2, "boom").success());
    }

    #[tokio::test]
    async fn test_run_simple_command() {
        let runner = ShellRunner::new();
        let result = runner.run("echo hello", Path::new("."), &[], 10 * SECOND).await.unwrap();

        assert!(result.success());
        assert_eq!(result.output, "hello");
    }

    #[tokio::test]
    async fn test_run_captures_exit_code_and_stderr() {
        let runner = ShellRunner::new();
        let result =
            runner.run("echo oops >&2; exit 3", Path::new("."), &[], 10 * SECOND).await.unwrap();

        assert_eq!(result.exit_code, 3);
        assert_eq!(result.output, "oops");
    }

    #[tokio::test]
    async fn test_run_passes_environment() {
        let runner = ShellRunner::new();
        let result = runner
            .run("echo $SHIPCHECK_PROBE", Path::new("."), &[("SHIPCHECK_PROBE", "42")], 10 * SECOND)
            .await
            .unwrap();

        assert_eq!(result.output, "42");
    }

    #[tokio::test]
    async fn test_run_with_working_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("marker.txt"), "").unwrap();

        let runner = ShellRunner::new();
        let result = runner.run("ls", dir.path(), &[], 10 * SECOND).await.unwrap();

        assert!(result.output.contains("marker.txt"));
    }

    #[tokio::test]
    async fn test_run_times_out() {
        let runner = ShellRunner::new();
        let start = Instant::now();
        let result = runner.run("sleep 10", Path::new("."), &[], Duration::from_millis(100)).await;

        assert!(matches!(result, Err(RunError::Timeout(100))));
        assert!(start.elapsed() < 5 * SECOND);
    }

    #[tokio::test]
    async fn test_run_missing_working_dir_is_spawn_error() {
        let runner = ShellRunner::new();
        let result =
            runner.run("true", Path::new("/definitely/not/a/dir"), &[], 10 * SECOND).await;

        assert!(matches!(result, Err(RunError::Spawn { .. })));
    }
}
