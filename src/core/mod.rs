//! Core building blocks for shipcheck.
//!
//! Configuration loading and the command runner every subprocess goes through.

mod config;
mod executor;

#[cfg(test)]
pub(crate) use executor::testing;

pub use config::{Config, GitConfig, VerificationConfig, LOCAL_CONFIG_FILE};
pub use executor::{CommandRunner, RunError, RunOutput, ShellRunner};
