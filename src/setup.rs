//! One-time setup commands run synchronously before the services start

use crate::config::Config;
use crate::error::SupervisorError;
use std::path::Path;
use std::process::Command;
use tracing::{info, warn};

/// Restore backend dependencies (`dotnet restore`).
pub fn restore_backend(config: &Config) -> Result<(), SupervisorError> {
    info!("Restoring Backend...");
    run_checked("dotnet", &["restore"], &config.backend_path())
}

/// Install frontend dependencies if `node_modules` is absent.
///
/// Tries `npm ci` first for a lockfile-exact install, falling back to
/// `npm install` if that fails. The fallback trades determinism for
/// convenience; the downgrade is logged at warn level.
pub fn install_frontend(config: &Config) -> Result<(), SupervisorError> {
    let frontend = config.frontend_path();
    if frontend.join("node_modules").exists() {
        return Ok(());
    }

    info!("Installing Frontend deps (npm ci)...");
    match run_checked("npm", &["ci"], &frontend) {
        Ok(()) => Ok(()),
        Err(err) => {
            warn!("npm ci failed ({err}), falling back to npm install");
            run_checked("npm", &["install"], &frontend)
        }
    }
}

/// Run a setup command to completion, inheriting stdio.
///
/// A non-zero exit, a killing signal, or a failure to launch all surface
/// as [`SupervisorError::SetupCommand`].
pub fn run_checked(program: &str, args: &[&str], cwd: &Path) -> Result<(), SupervisorError> {
    let command = format!("{} {}", program, args.join(" "));

    let status = Command::new(program)
        .args(args)
        .current_dir(cwd)
        .status()
        .map_err(|err| SupervisorError::SetupCommand {
            command: command.clone(),
            status: err.to_string(),
        })?;

    if !status.success() {
        return Err(SupervisorError::SetupCommand {
            command,
            status: status.to_string(),
        });
    }

    Ok(())
}
