//! Hook detection and execution.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use once_cell::sync::OnceCell;

use super::definitions::definition;
use super::manifest::{detect_package_manager, PackageJson, MANIFEST_FILE};
use super::{
    Confidence, DetectedHooks, HookKind, HookResult, HookSummary, PackageManager,
    VerificationHook, DEFAULT_HOOK_TIMEOUT_MS,
};
use crate::core::{CommandRunner, RunOutput, ShellRunner};

/// Extra environment for hook processes: CI mode, no colors.
const HOOK_ENV: &[(&str, &str)] = &[("CI", "true"), ("FORCE_COLOR", "0"), ("NO_COLOR", "1")];

/// Detects and runs the verification hooks of one project directory.
///
/// Detection happens once per instance, on first use; later changes to the
/// project files are not picked up.
pub struct VerificationHooks<R = ShellRunner> {
    cwd: PathBuf,
    runner: R,
    timeout_ms: u64,
    detected: OnceCell<DetectedHooks>,
}

impl VerificationHooks {
    /// Create hooks for a project directory, run through the platform shell.
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self::with_runner(cwd, ShellRunner::new())
    }
}

impl<R: CommandRunner> VerificationHooks<R> {
    /// Create hooks that run commands through a custom runner.
    pub fn with_runner(cwd: impl Into<PathBuf>, runner: R) -> Self {
        Self {
            cwd: cwd.into(),
            runner,
            timeout_ms: DEFAULT_HOOK_TIMEOUT_MS,
            detected: OnceCell::new(),
        }
    }

    /// Set the timeout stamped on every detected hook.
    #[must_use]
    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self.detected = OnceCell::new();
        self
    }

    /// Project directory hooks run in.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Detect available hooks. The result is computed once and cached.
    pub fn detect_hooks(&self) -> &DetectedHooks {
        self.detected.get_or_init(|| self.detect())
    }

    fn detect(&self) -> DetectedHooks {
        let manifest_path = self.cwd.join(MANIFEST_FILE);
        let has_manifest = manifest_path.exists();
        let package_manager = detect_package_manager(&self.cwd);

        let hooks = if has_manifest {
            match PackageJson::from_path(&manifest_path) {
                Ok(package) => self.hooks_from_manifest(&package, package_manager),
                Err(e) => {
                    tracing::warn!(
                        path = %manifest_path.display(),
                        error = %e,
                        "Ignoring unreadable package.json"
                    );
                    Vec::new()
                }
            }
        } else {
            Vec::new()
        };

        tracing::debug!(
            cwd = %self.cwd.display(),
            package_manager = %package_manager,
            hooks = hooks.len(),
            "Detected verification hooks"
        );

        DetectedHooks { hooks, package_manager, has_manifest }
    }

    fn hooks_from_manifest(
        &self,
        package: &PackageJson,
        package_manager: PackageManager,
    ) -> Vec<VerificationHook> {
        let pm = package_manager.as_str();
        let mut hooks = Vec::new();

        if package.has_script("test") {
            hooks.push(self.create_hook(HookKind::Test, format!("{pm} test")));
        }
        if package.has_script("build") {
            hooks.push(self.create_hook(HookKind::Build, format!("{pm} run build")));
        }
        if package.has_script("lint") {
            hooks.push(self.create_hook(HookKind::Lint, format!("{pm} run lint")));
        }

        if package.has_script("typecheck") {
            hooks.push(self.create_hook(HookKind::Typecheck, format!("{pm} run typecheck")));
        } else if package.has_script("type-check") {
            hooks.push(self.create_hook(HookKind::Typecheck, format!("{pm} run type-check")));
        } else if self.cwd.join("tsconfig.json").exists() {
            hooks.push(self.create_hook(HookKind::Typecheck, "npx tsc --noEmit".to_string()));
        }

        hooks
    }

    fn create_hook(&self, kind: HookKind, command: String) -> VerificationHook {
        let def = definition(kind);
        VerificationHook {
            kind,
            display_name: def.display_name.to_string(),
            command,
            success_pattern: def.success_patterns().first().map(|p| p.source().to_string()),
            failure_pattern: def.failure_patterns().first().map(|p| p.source().to_string()),
            timeout_ms: self.timeout_ms,
        }
    }

    /// Run a single hook and classify its outcome.
    ///
    /// Never fails: a timeout or spawn error is reported as an unsuccessful,
    /// low-confidence result with `error` set.
    pub async fn run_hook(&self, hook: &VerificationHook) -> HookResult {
        let start = Instant::now();
        let timeout = Duration::from_millis(hook.timeout_ms);
        let outcome = self.runner.run(&hook.command, &self.cwd, HOOK_ENV, timeout).await;
        let execution_time_ms = start.elapsed().as_millis() as u64;

        match outcome {
            Ok(RunOutput { exit_code, output }) => {
                let success = determine_success(hook.kind, exit_code, &output);
                let confidence = determine_confidence(hook.kind, exit_code, &output, success);
                tracing::debug!(
                    hook = %hook.kind,
                    exit_code,
                    success,
                    confidence = %confidence,
                    execution_time_ms,
                    "Hook finished"
                );
                HookResult {
                    hook: hook.clone(),
                    success,
                    exit_code,
                    output,
                    confidence,
                    execution_time_ms,
                    error: None,
                }
            }
            Err(e) => {
                tracing::warn!(
                    hook = %hook.kind,
                    command = %hook.command,
                    error = %e,
                    "Hook did not complete"
                );
                HookResult {
                    hook: hook.clone(),
                    success: false,
                    exit_code: -1,
                    output: String::new(),
                    confidence: Confidence::Low,
                    execution_time_ms,
                    error: Some(e.to_string()),
                }
            }
        }
    }

    /// Run every detected hook in order, collecting all results.
    pub async fn run_all_hooks(&self) -> Vec<HookResult> {
        let mut results = Vec::new();
        for hook in &self.detect_hooks().hooks {
            results.push(self.run_hook(hook).await);
        }
        results
    }

    /// Run the detected hook of a kind, if there is one.
    pub async fn run_hook_by_type(&self, kind: HookKind) -> Option<HookResult> {
        let hook = self.get_hook(kind)?;
        Some(self.run_hook(hook).await)
    }

    /// Get the detected hook of a kind.
    pub fn get_hook(&self, kind: HookKind) -> Option<&VerificationHook> {
        self.detect_hooks().hooks.iter().find(|h| h.kind == kind)
    }

    /// Check whether a hook of this kind was detected.
    pub fn has_hook(&self, kind: HookKind) -> bool {
        self.get_hook(kind).is_some()
    }

    /// Split the detectable kinds into available and unavailable.
    pub fn hook_summary(&self) -> HookSummary {
        let available: Vec<HookKind> = self.detect_hooks().hooks.iter().map(|h| h.kind).collect();
        let unavailable =
            HookKind::DETECTABLE.into_iter().filter(|k| !available.contains(k)).collect();
        HookSummary { available, unavailable }
    }
}

/// A non-zero exit always fails; otherwise the output decides.
fn determine_success(kind: HookKind, exit_code: i32, output: &str) -> bool {
    exit_code == 0 && !definition(kind).output_indicates_failure(output)
}

fn determine_confidence(kind: HookKind, exit_code: i32, output: &str, success: bool) -> Confidence {
    let def = definition(kind);
    let corroborated = if exit_code == 0 && success {
        def.output_indicates_success(output)
    } else {
        def.output_mentions_failure(output)
    };

    if corroborated {
        Confidence::High
    } else {
        Confidence::Medium
    }
}
