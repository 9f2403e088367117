//! Verification hooks.
//!
//! Detects the test, build, lint and type-check commands a project exposes
//! through its `package.json`, runs them, and classifies each outcome with a
//! success flag and a confidence level.

mod definitions;
mod hooks;
mod manifest;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use definitions::{definition, HookDefinition};
pub use hooks::VerificationHooks;
pub use manifest::{detect_package_manager, PackageJson, MANIFEST_FILE};

/// Default timeout for a hook (60 seconds).
pub const DEFAULT_HOOK_TIMEOUT_MS: u64 = 60_000;

/// Kind of verification hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HookKind {
    Test,
    Build,
    Lint,
    Typecheck,
    Custom,
}

impl HookKind {
    /// Kinds that detection can produce, in detection order.
    pub const DETECTABLE: [Self; 4] = [Self::Test, Self::Build, Self::Lint, Self::Typecheck];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Test => "test",
            Self::Build => "build",
            Self::Lint => "lint",
            Self::Typecheck => "typecheck",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HookKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "test" => Ok(Self::Test),
            "build" => Ok(Self::Build),
            "lint" => Ok(Self::Lint),
            "typecheck" | "type-check" => Ok(Self::Typecheck),
            "custom" => Ok(Self::Custom),
            _ => Err(format!("Unknown hook kind: {s}")),
        }
    }
}

/// A runnable verification command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationHook {
    /// Hook kind
    pub kind: HookKind,

    /// Human-readable name (e.g. "Type Check")
    pub display_name: String,

    /// Shell command line
    pub command: String,

    /// Source of the kind's primary success pattern
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success_pattern: Option<String>,

    /// Source of the kind's primary failure pattern
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_pattern: Option<String>,

    /// Time budget in milliseconds
    pub timeout_ms: u64,
}

/// How much a hook result can be trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of running one hook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HookResult {
    /// The hook that ran
    pub hook: VerificationHook,

    /// Whether verification passed
    pub success: bool,

    /// Process exit code (-1 when the process never completed)
    pub exit_code: i32,

    /// Combined stdout and stderr, trimmed
    pub output: String,

    /// Confidence in `success`
    pub confidence: Confidence,

    /// Wall-clock run time
    pub execution_time_ms: u64,

    /// Why the process never completed (timeout or spawn failure)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Package manager inferred from lock files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    Npm,
    Yarn,
    Pnpm,
    Unknown,
}

impl PackageManager {
    /// Command prefix. `unknown` is used verbatim when no lock file exists.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Npm => "npm",
            Self::Yarn => "yarn",
            Self::Pnpm => "pnpm",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of hook detection for one project directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetectedHooks {
    /// Hooks in detection order
    pub hooks: Vec<VerificationHook>,

    /// Package manager used as the command prefix
    pub package_manager: PackageManager,

    /// Whether a `package.json` exists
    pub has_manifest: bool,
}

/// Detectable kinds split by availability.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HookSummary {
    pub available: Vec<HookKind>,
    pub unavailable: Vec<HookKind>,
}
