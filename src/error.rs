//! Fatal pre-spawn errors

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort the supervisor before any service is spawned.
///
/// All of these are fatal: they are printed to stderr and the process
/// exits with status 1. Errors during shutdown (a process that already
/// exited, a log handle already closed) are swallowed instead and never
/// surface through this type.
#[derive(Debug, Error)]
pub enum SupervisorError {
    #[error("project not found at {}", .path.display())]
    MissingProject { path: PathBuf },

    #[error("{tool} not found. {hint}")]
    MissingTool { tool: String, hint: String },

    #[error("setup command `{command}` failed: {status}")]
    SetupCommand { command: String, status: String },
}
