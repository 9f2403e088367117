//! Git integration module.
//!
//! Repository checks and checkpoint commits, driven through the `git` command
//! line so the exact invocations are visible in logs and replayable by hand.
//! Every query degrades to a safe default instead of failing.

mod scheduler;

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

use crate::core::{CommandRunner, RunError, ShellRunner};

pub use scheduler::{CommitScheduler, CommitStrategy};

/// Default timeout for a single git invocation (30 seconds).
pub const DEFAULT_GIT_TIMEOUT_MS: u64 = 30_000;

/// Errors from git plumbing.
#[derive(Debug, Error)]
pub enum GitError {
    #[error(transparent)]
    Run(#[from] RunError),

    #[error("`{command}` exited with code {exit_code}: {output}")]
    Failed { command: String, exit_code: i32, output: String },
}

/// What to commit and how to describe it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitOptions {
    /// Completed task descriptions, one bullet each
    pub tasks: Vec<String>,

    /// Phase the tasks belong to
    pub phase: Option<String>,

    /// Project the tasks belong to
    pub project_name: Option<String>,
}

impl CommitOptions {
    pub fn new(tasks: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self { tasks: tasks.into_iter().map(Into::into).collect(), ..Self::default() }
    }

    #[must_use]
    pub fn with_phase(mut self, phase: impl Into<String>) -> Self {
        self.phase = Some(phase.into());
        self
    }

    #[must_use]
    pub fn with_project_name(mut self, name: impl Into<String>) -> Self {
        self.project_name = Some(name.into());
        self
    }

    /// Build the commit message.
    ///
    /// ```text
    /// Complete 2 tasks
    ///
    /// Project: My Project
    /// Phase: Phase 1: Setup
    ///
    /// - Implement feature X
    /// - Fix bug Y
    /// ```
    pub fn message(&self) -> String {
        let count = self.tasks.len();
        let mut message = format!("Complete {count} task{}", if count == 1 { "" } else { "s" });

        let context: Vec<String> = [("Project", &self.project_name), ("Phase", &self.phase)]
            .into_iter()
            .filter_map(|(label, value)| value.as_ref().map(|v| format!("{label}: {v}")))
            .collect();
        if !context.is_empty() {
            message.push_str("\n\n");
            message.push_str(&context.join("\n"));
        }

        if !self.tasks.is_empty() {
            message.push_str("\n\n");
            let bullets: Vec<String> = self.tasks.iter().map(|t| format!("- {t}")).collect();
            message.push_str(&bullets.join("\n"));
        }

        message
    }
}

/// Snapshot of the repository state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GitSetup {
    pub is_repo: bool,
    pub has_changes: bool,

    /// Empty when not a repository
    pub current_branch: String,
}

/// Runs git commands in a working directory.
pub struct GitManager<R = ShellRunner> {
    cwd: PathBuf,
    runner: R,
    timeout: Duration,
}

impl GitManager {
    /// Create a manager for a directory, running git through the platform shell.
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self::with_runner(cwd, ShellRunner::new())
    }
}

impl<R: CommandRunner> GitManager<R> {
    /// Create a manager that runs git through a custom runner.
    pub fn with_runner(cwd: impl Into<PathBuf>, runner: R) -> Self {
        Self {
            cwd: cwd.into(),
            runner,
            timeout: Duration::from_millis(DEFAULT_GIT_TIMEOUT_MS),
        }
    }

    /// Set the timeout for each git invocation.
    #[must_use]
    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout = Duration::from_millis(timeout_ms);
        self
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Run `git <args>` and return its trimmed output; non-zero exit is an error.
    async fn git(&self, args: &str) -> Result<String, GitError> {
        let command = format!("git {args}");
        let output = self.runner.run(&command, &self.cwd, &[], self.timeout).await?;

        if !output.success() {
            return Err(GitError::Failed {
                command,
                exit_code: output.exit_code,
                output: output.output,
            });
        }

        Ok(output.output.trim().to_string())
    }

    /// Check if the working directory is inside a git repository.
    pub async fn is_git_repository(&self) -> bool {
        self.git("rev-parse --git-dir").await.is_ok()
    }

    /// Check for staged, unstaged or untracked changes. Errors count as none.
    pub async fn has_uncommitted_changes(&self) -> bool {
        match self.git("status --porcelain").await {
            Ok(status) => !status.is_empty(),
            Err(e) => {
                tracing::warn!(error = %e, "Could not read git status");
                false
            }
        }
    }

    /// Inverse of [`has_uncommitted_changes`](Self::has_uncommitted_changes).
    pub async fn is_working_directory_clean(&self) -> bool {
        !self.has_uncommitted_changes().await
    }

    /// Current branch name, or `"unknown"` if it cannot be determined.
    pub async fn current_branch(&self) -> String {
        match self.git("rev-parse --abbrev-ref HEAD").await {
            Ok(branch) => branch,
            Err(e) => {
                tracing::warn!(error = %e, "Could not determine current branch");
                "unknown".to_string()
            }
        }
    }

    /// Short status listing, or a placeholder message on failure.
    pub async fn status(&self) -> String {
        match self.git("status --short").await {
            Ok(status) => status,
            Err(e) => {
                tracing::warn!(error = %e, "Could not read git status");
                "Unable to get git status".to_string()
            }
        }
    }

    /// Stage everything and commit it. Returns whether a commit was created.
    ///
    /// Nothing is staged when the tree is clean. Failures are logged, not returned.
    pub async fn create_commit(&self, options: &CommitOptions) -> bool {
        if !self.has_uncommitted_changes().await {
            tracing::debug!("No changes to commit");
            return false;
        }

        match self.stage_and_commit(options).await {
            Ok(()) => {
                tracing::info!(
                    tasks = options.tasks.len(),
                    phase = options.phase.as_deref(),
                    "Created commit"
                );
                true
            }
            Err(e) => {
                tracing::error!(error = %e, "Git commit failed");
                false
            }
        }
    }

    async fn stage_and_commit(&self, options: &CommitOptions) -> Result<(), GitError> {
        self.git("add .").await?;
        self.git(&commit_args(&options.message())).await?;
        Ok(())
    }

    /// Check repository state in one go.
    ///
    /// Outside a repository only the repository check runs.
    pub async fn validate_git_setup(&self) -> GitSetup {
        if !self.is_git_repository().await {
            return GitSetup::default();
        }

        let has_changes = self.has_uncommitted_changes().await;
        let current_branch = self.current_branch().await;
        GitSetup { is_repo: true, has_changes, current_branch }
    }
}

/// `commit` arguments carrying the message, quoted for the platform shell.
fn commit_args(message: &str) -> String {
    if cfg!(target_os = "windows") {
        cmd_commit_args(message)
    } else {
        format!("commit -m \"{}\"", escape_double_quoted(message))
    }
}

/// `cmd /C` cannot carry a newline inside an argument, so every non-empty
/// line becomes its own `-m` paragraph. A doubled quote keeps cmd's quoting
/// state balanced and reaches git as one literal quote.
fn cmd_commit_args(message: &str) -> String {
    let mut args = String::from("commit");
    for line in message.lines().filter(|line| !line.trim().is_empty()) {
        args.push_str(" -m \"");
        args.push_str(&line.replace('"', "\"\""));
        args.push('"');
    }
    args
}

/// Escape text for use inside a double-quoted `sh` argument.
fn escape_double_quoted(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '"' | '$' | '`') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
