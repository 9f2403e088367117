//! Commit cadence.
//!
//! [`CommitScheduler`] only decides *when* a commit is due; committing itself
//! is left to [`GitManager`](super::GitManager).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// When completed work should be committed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CommitStrategy {
    /// After every task
    PerTask,

    /// After every fifth task
    #[serde(rename = "per-5-tasks")]
    PerFiveTasks,

    /// When a phase is completed
    #[default]
    PerPhase,

    /// Never
    None,
}

impl CommitStrategy {
    pub const ALL: [Self; 4] = [Self::PerTask, Self::PerFiveTasks, Self::PerPhase, Self::None];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PerTask => "per-task",
            Self::PerFiveTasks => "per-5-tasks",
            Self::PerPhase => "per-phase",
            Self::None => "none",
        }
    }
}

impl fmt::Display for CommitStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommitStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.as_str() == label)
            .ok_or_else(|| format!("Unknown commit strategy: {s}"))
    }
}

/// Tracks completed tasks and reports when a commit is due.
#[derive(Debug, Clone, Default)]
pub struct CommitScheduler {
    strategy: CommitStrategy,
    tasks_since_commit: usize,
    current_phase: Option<String>,
}

impl CommitScheduler {
    /// Create a scheduler for a strategy.
    pub fn new(strategy: CommitStrategy) -> Self {
        Self { strategy, tasks_since_commit: 0, current_phase: None }
    }

    /// Record a completed task. Returns `true` when a commit is due now.
    ///
    /// The counter grows until [`reset_commit_counter`](Self::reset_commit_counter)
    /// is called, whatever the strategy.
    pub fn task_completed(&mut self, phase: &str) -> bool {
        self.tasks_since_commit += 1;
        if self.current_phase.as_deref() != Some(phase) {
            tracing::debug!(phase, "Entered phase");
            self.current_phase = Some(phase.to_string());
        }

        match self.strategy {
            CommitStrategy::PerTask => true,
            CommitStrategy::PerFiveTasks => self.tasks_since_commit % 5 == 0,
            CommitStrategy::PerPhase | CommitStrategy::None => false,
        }
    }

    /// Whether completing a phase should trigger a commit.
    pub fn phase_completed(&self) -> bool {
        self.strategy == CommitStrategy::PerPhase
    }

    /// Zero the task counter after a commit.
    pub fn reset_commit_counter(&mut self) {
        self.tasks_since_commit = 0;
    }

    pub fn task_count_since_last_commit(&self) -> usize {
        self.tasks_since_commit
    }

    /// Phase label of the most recently completed task.
    pub fn current_phase(&self) -> Option<&str> {
        self.current_phase.as_deref()
    }

    pub fn strategy(&self) -> CommitStrategy {
        self.strategy
    }
}
