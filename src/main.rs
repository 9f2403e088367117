//! Shipcheck - verification checklists and checkpoint commits.
//!
//! Reads the checklist out of a prompt artifact, runs the project's
//! verification hooks, and commits completed work.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use shipcheck::checklist::ChecklistSummary;
use shipcheck::{
    BasicChecklistGenerator, ChecklistParser, CommitOptions, Config, GitManager, HookKind,
    HookResult, ParsedChecklist, VerificationHooks,
};

/// Verification checklists, project hooks and checkpoint commits
#[derive(Parser)]
#[command(name = "shipcheck")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use this config file instead of the default lookup
    #[arg(long, global = true, env = "SHIPCHECK_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the verification checklist of a prompt file
    Checklist {
        /// Markdown prompt file
        file: PathBuf,

        /// Prompt intent, used when the file has no checklist of its own
        #[arg(short, long)]
        intent: Option<String>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// List the intents with a built-in checklist
    Intents,

    /// Show the verification hooks detected in a project
    Hooks {
        /// Project directory
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Run verification hooks
    Verify {
        /// Project directory
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Only run the hook of this kind (test, build, lint, typecheck)
        #[arg(short, long)]
        kind: Option<HookKind>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Show repository state
    Git {
        /// Repository directory
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },

    /// Commit completed tasks
    Commit {
        /// Completed task description (repeatable)
        #[arg(short, long = "task", required = true)]
        tasks: Vec<String>,

        /// Phase the tasks belong to
        #[arg(long)]
        phase: Option<String>,

        /// Project name for the commit message
        #[arg(long)]
        project: Option<String>,

        /// Repository directory
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },

    /// Show configuration
    Config {
        /// Show config directory path
        #[arg(long)]
        path: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose { EnvFilter::new("debug") } else { EnvFilter::new("warn") };

    tracing_subscriber::registry().with(fmt::layer().with_target(false)).with(filter).init();

    let config = match &cli.config {
        Some(path) => Config::load_from_file(path)?,
        None => Config::load()?,
    };

    match cli.command {
        Commands::Checklist { file, intent, format } => {
            cmd_checklist(&file, intent.as_deref(), &format)?;
        }
        Commands::Intents => cmd_intents(),
        Commands::Hooks { dir, format } => {
            cmd_hooks(&config, dir, &format)?;
        }
        Commands::Verify { dir, kind, format } => {
            let passed = cmd_verify(&config, dir, kind, &format)?;
            if !passed {
                std::process::exit(1);
            }
        }
        Commands::Git { dir } => {
            cmd_git(&config, dir)?;
        }
        Commands::Commit { tasks, phase, project, dir } => {
            cmd_commit(&config, tasks, phase, project, dir)?;
        }
        Commands::Config { path } => {
            cmd_config(&config, path)?;
        }
    }

    Ok(())
}

/// Resolve the project directory: flag, then config, then current directory.
fn project_dir(config: &Config, dir: Option<PathBuf>) -> PathBuf {
    dir.or_else(|| config.verification.working_dir.clone()).unwrap_or_else(|| PathBuf::from("."))
}

/// Print the checklist of a prompt file, generating one when it has none.
fn cmd_checklist(file: &Path, intent: Option<&str>, format: &str) -> Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let parser = ChecklistParser::new();
    let mut checklist = parser.parse(&content);
    let generated = !checklist.has_checklist;
    if generated {
        let intent = intent.unwrap_or_default();
        checklist = BasicChecklistGenerator::new().generate_from_prompt(&content, intent);
    }

    match format {
        "json" => {
            let json = serde_json::to_string_pretty(&checklist)?;
            println!("{json}");
        }
        _ => {
            if generated {
                println!("No checklist found, generated one from the prompt.\n");
            }
            print_checklist(&checklist, &parser.summary(&checklist));
        }
    }

    Ok(())
}

fn print_checklist(checklist: &ParsedChecklist, summary: &ChecklistSummary) {
    let sections = [
        ("Validation", &checklist.validation_items),
        ("Edge Cases", &checklist.edge_cases),
        ("Risks", &checklist.risks),
    ];

    for (title, items) in sections {
        if items.is_empty() {
            continue;
        }
        println!("{title}:");
        for item in items {
            let group = item.group.as_deref().map(|g| format!(" ({g})")).unwrap_or_default();
            println!("  [{}] {}{group} - {}", item.verification_type, item.content, item.id);
        }
        println!();
    }

    println!("Total: {} items ({summary})", checklist.total_items);
}

/// List intents and the size of their templates.
fn cmd_intents() {
    let generator = BasicChecklistGenerator::new();
    for intent in generator.available_intents() {
        let checklist = generator.generate(intent.as_str());
        println!("{:<16} {} items", intent.as_str(), checklist.total_items);
    }
}

/// Show detected hooks.
fn cmd_hooks(config: &Config, dir: Option<PathBuf>, format: &str) -> Result<()> {
    let hooks = VerificationHooks::new(project_dir(config, dir))
        .with_timeout(config.verification.timeout_ms);
    let detected = hooks.detect_hooks();

    match format {
        "json" => {
            let json = serde_json::to_string_pretty(detected)?;
            println!("{json}");
        }
        _ => {
            if !detected.has_manifest {
                println!("No package.json found in {}", hooks.cwd().display());
                return Ok(());
            }

            println!("Package manager: {}\n", detected.package_manager);
            for hook in &detected.hooks {
                println!("  {:<12} {}", hook.display_name, hook.command);
            }

            let summary = hooks.hook_summary();
            if !summary.unavailable.is_empty() {
                let missing: Vec<&str> = summary.unavailable.iter().map(HookKind::as_str).collect();
                println!("\nUnavailable: {}", missing.join(", "));
            }
        }
    }

    Ok(())
}

/// Run hooks. Returns whether every hook that ran succeeded.
fn cmd_verify(
    config: &Config,
    dir: Option<PathBuf>,
    kind: Option<HookKind>,
    format: &str,
) -> Result<bool> {
    let hooks = VerificationHooks::new(project_dir(config, dir))
        .with_timeout(config.verification.timeout_ms);

    let rt = tokio::runtime::Runtime::new()?;
    let results: Vec<HookResult> = rt.block_on(async {
        match kind {
            Some(kind) => hooks.run_hook_by_type(kind).await.into_iter().collect(),
            None => hooks.run_all_hooks().await,
        }
    });

    if let Some(kind) = kind.filter(|_| results.is_empty()) {
        anyhow::bail!("No {kind} hook detected in {}", hooks.cwd().display());
    }

    match format {
        "json" => {
            let json = serde_json::to_string_pretty(&results)?;
            println!("{json}");
        }
        _ => {
            if results.is_empty() {
                println!("No verification hooks detected in {}", hooks.cwd().display());
            }
            for result in &results {
                let mark = if result.success { "✓" } else { "✗" };
                println!(
                    "{mark} {:<12} exit {:<3} {:>6}ms  confidence: {}",
                    result.hook.display_name,
                    result.exit_code,
                    result.execution_time_ms,
                    result.confidence
                );
                if let Some(error) = &result.error {
                    println!("    {error}");
                } else if !result.success && !result.output.is_empty() {
                    let lines: Vec<&str> = result.output.lines().collect();
                    for line in &lines[lines.len().saturating_sub(5)..] {
                        println!("    {line}");
                    }
                }
            }
        }
    }

    Ok(results.iter().all(|r| r.success))
}

/// Show repository state.
fn cmd_git(config: &Config, dir: Option<PathBuf>) -> Result<()> {
    let git =
        GitManager::new(project_dir(config, dir)).with_timeout(config.git.command_timeout_ms);

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let setup = git.validate_git_setup().await;
        if !setup.is_repo {
            println!("Not a git repository: {}", git.cwd().display());
            return;
        }

        println!("Branch: {}", setup.current_branch);
        println!("Commit strategy: {}", config.git.commit_strategy);
        if setup.has_changes {
            println!("\n{}", git.status().await);
        } else {
            println!("Working tree clean");
        }
    });

    Ok(())
}

/// Commit completed tasks.
fn cmd_commit(
    config: &Config,
    tasks: Vec<String>,
    phase: Option<String>,
    project: Option<String>,
    dir: Option<PathBuf>,
) -> Result<()> {
    let git =
        GitManager::new(project_dir(config, dir)).with_timeout(config.git.command_timeout_ms);

    let options = CommitOptions {
        tasks,
        phase,
        project_name: project.or_else(|| config.git.project_name.clone()),
    };

    let rt = tokio::runtime::Runtime::new()?;
    let committed = rt.block_on(async {
        if !git.is_git_repository().await {
            anyhow::bail!("Not a git repository: {}", git.cwd().display());
        }
        Ok::<_, anyhow::Error>(git.create_commit(&options).await)
    })?;

    if committed {
        println!("Committed {} task(s)", options.tasks.len());
    } else {
        println!("Nothing committed");
    }

    Ok(())
}

/// Show configuration.
fn cmd_config(config: &Config, show_path: bool) -> Result<()> {
    if show_path {
        if let Some(path) = Config::config_dir() {
            println!("{}", path.display());
        }
        return Ok(());
    }

    let toml = toml::to_string_pretty(config)?;
    println!("{toml}");

    Ok(())
}
