//! # Shipcheck
//!
//! Verification checklists, project hooks and checkpoint commits for
//! AI-assisted implementation workflows.
//!
//! Shipcheck turns the "did it actually work?" step of an AI-driven task into
//! something you can run: it extracts the checklist a model wrote into its
//! prompt, runs the project's own test, build, lint and type-check scripts, and
//! commits finished work at a configurable cadence.
//!
//! ## Features
//!
//! - **Checklist Parsing**: Validation items, edge cases and risks from markdown
//! - **Fallback Checklists**: Intent templates plus keyword-triggered items
//! - **Verification Hooks**: Auto-detects npm, yarn and pnpm scripts
//! - **Checkpoint Commits**: Per task, every five tasks, or per phase
//!
//! ## Quick Start
//!
//! ```bash
//! # Show the checklist embedded in a prompt file
//! shipcheck checklist prompt.md
//!
//! # Run every detected hook
//! shipcheck verify
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
// Allow common patterns that are intentional in this codebase
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::trivially_copy_pass_by_ref)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::redundant_pub_crate)]

pub mod checklist;
pub mod core;
pub mod git;
pub mod verification;

// Re-export commonly used types
pub use checklist::{
    BasicChecklistGenerator, ChecklistItem, ChecklistParser, ItemCategory, ParsedChecklist,
    PromptIntent, VerificationType,
};
pub use crate::core::{CommandRunner, Config, RunError, RunOutput, ShellRunner};
pub use git::{CommitOptions, CommitScheduler, CommitStrategy, GitError, GitManager, GitSetup};
pub use verification::{
    Confidence, DetectedHooks, HookKind, HookResult, HookSummary, PackageManager,
    VerificationHook, VerificationHooks,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "shipcheck";
