//! Checks that run before anything is spawned

use crate::config::Config;
use crate::error::SupervisorError;
use std::path::PathBuf;

/// Marker file identifying the backend project.
pub const BACKEND_PROJECT_MARKER: &str = "Backend.csproj";
/// Marker file identifying the frontend project.
pub const FRONTEND_PROJECT_MARKER: &str = "package.json";

/// Verify both project directories contain their marker files.
pub fn check_projects(config: &Config) -> Result<(), SupervisorError> {
    let backend = config.backend_path();
    if !backend.join(BACKEND_PROJECT_MARKER).exists() {
        return Err(SupervisorError::MissingProject { path: backend });
    }

    let frontend = config.frontend_path();
    if !frontend.join(FRONTEND_PROJECT_MARKER).exists() {
        return Err(SupervisorError::MissingProject { path: frontend });
    }

    Ok(())
}

/// Verify the required external tools are resolvable on PATH.
pub fn check_tools() -> Result<(), SupervisorError> {
    resolve_tool("dotnet", "Install .NET SDK 9.0+.")?;
    resolve_tool("npm", "Install Node.js >= 18.")?;
    Ok(())
}

/// Resolve a single tool on PATH, with an install hint on failure.
pub fn resolve_tool(tool: &str, hint: &str) -> Result<PathBuf, SupervisorError> {
    which::which(tool).map_err(|_| SupervisorError::MissingTool {
        tool: tool.to_string(),
        hint: hint.to_string(),
    })
}
