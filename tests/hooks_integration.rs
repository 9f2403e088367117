//! Verification hook integration tests.
//!
//! Runs hooks through a real shell in temporary project directories.

use std::path::Path;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use shipcheck::{
    CommandRunner, Confidence, HookKind, RunError, RunOutput, VerificationHook, VerificationHooks,
};
use tempfile::TempDir;

fn hook(kind: HookKind, command: &str, timeout_ms: u64) -> VerificationHook {
    VerificationHook {
        kind,
        display_name: kind.to_string(),
        command: command.to_string(),
        success_pattern: None,
        failure_pattern: None,
        timeout_ms,
    }
}

#[tokio::test]
async fn test_lint_zero_errors_is_success() {
    let temp = TempDir::new().unwrap();
    let hooks = VerificationHooks::new(temp.path());

    let result =
        hooks.run_hook(&hook(HookKind::Lint, "echo '✔ 0 errors, 2 warnings'", 10_000)).await;

    assert!(result.success);
    assert_eq!(result.exit_code, 0);
    assert_eq!(result.confidence, Confidence::High);
    assert_eq!(result.output, "✔ 0 errors, 2 warnings");
}

#[tokio::test]
async fn test_failing_command() {
    let temp = TempDir::new().unwrap();
    let hooks = VerificationHooks::new(temp.path());

    let command = "echo '3 passing'; echo '1 failed' >&2; exit 1";
    let result = hooks.run_hook(&hook(HookKind::Test, command, 10_000)).await;

    assert!(!result.success);
    assert_eq!(result.exit_code, 1);
    assert_eq!(result.output, "3 passing\n1 failed");
    assert_eq!(result.confidence, Confidence::High);
    assert!(result.error.is_none());
}

#[tokio::test]
async fn test_timeout_kills_hook() {
    let temp = TempDir::new().unwrap();
    let hooks = VerificationHooks::new(temp.path());

    let start = Instant::now();
    let result = hooks.run_hook(&hook(HookKind::Build, "sleep 10", 200)).await;

    assert!(start.elapsed() < Duration::from_secs(5));
    assert!(!result.success);
    assert_eq!(result.exit_code, -1);
    assert_eq!(result.confidence, Confidence::Low);
    assert!(result.error.unwrap().contains("timed out after 200ms"));
    assert!(result.execution_time_ms >= 200);
}

#[tokio::test]
async fn test_hook_environment() {
    let temp = TempDir::new().unwrap();
    let hooks = VerificationHooks::new(temp.path());

    let result = hooks
        .run_hook(&hook(HookKind::Custom, "echo \"$CI $FORCE_COLOR $NO_COLOR\"", 10_000))
        .await;

    assert!(result.success);
    assert_eq!(result.output, "true 0 1");
    assert_eq!(result.confidence, Confidence::Medium);
}

#[tokio::test]
async fn test_hook_runs_in_project_dir() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("package.json"), "{}").unwrap();
    let hooks = VerificationHooks::new(temp.path());

    let result = hooks.run_hook(&hook(HookKind::Custom, "ls", 10_000)).await;
    assert!(result.output.contains("package.json"));
}

#[tokio::test]
async fn test_typecheck_silence_is_high_confidence() {
    let temp = TempDir::new().unwrap();
    let hooks = VerificationHooks::new(temp.path());

    let result = hooks.run_hook(&hook(HookKind::Typecheck, "true", 10_000)).await;
    assert!(result.success);
    assert_eq!(result.confidence, Confidence::High);
}

/// Maps detected commands onto canned shell snippets, so detection and
/// execution can be exercised together without a package manager installed.
struct AliasRunner {
    aliases: Vec<(&'static str, &'static str)>,
}

#[async_trait]
impl CommandRunner for AliasRunner {
    async fn run(
        &self,
        command: &str,
        cwd: &Path,
        env: &[(&str, &str)],
        timeout: Duration,
    ) -> Result<RunOutput, RunError> {
        let script = self
            .aliases
            .iter()
            .find(|(alias, _)| *alias == command)
            .map_or("exit 127", |(_, script)| *script);
        shipcheck::ShellRunner::new().run(script, cwd, env, timeout).await
    }
}

#[tokio::test]
async fn test_run_all_hooks_continues_past_failures() {
    let temp = TempDir::new().unwrap();
    std::fs::write(
        temp.path().join("package.json"),
        r#"{"scripts": {"test": "jest", "build": "tsc", "lint": "eslint ."}}"#,
    )
    .unwrap();
    std::fs::write(temp.path().join("package-lock.json"), "{}").unwrap();

    let runner = AliasRunner {
        aliases: vec![
            ("npm test", "echo 'Tests: 2 failed, 8 passed'; exit 1"),
            ("npm run build", "sleep 10"),
            ("npm run lint", "echo 'All files pass linting'"),
        ],
    };
    let hooks = VerificationHooks::with_runner(temp.path(), runner).with_timeout(300);

    let results = hooks.run_all_hooks().await;

    assert_eq!(results.len(), 3);
    assert!(!results[0].success);
    assert_eq!(results[1].confidence, Confidence::Low);
    assert!(results[2].success);
    assert_eq!(results[2].confidence, Confidence::High);
}
