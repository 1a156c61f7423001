//! Service definitions and child process spawning

use crate::config::Config;
use crate::process::registry::ManagedProcess;
use anyhow::{Context, Result};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::debug;

/// Log file for the backend service.
pub const BACKEND_LOG: &str = "backend.log";
/// Log file for the frontend service.
pub const FRONTEND_LOG: &str = "frontend.log";

/// Everything needed to launch one supervised service.
#[derive(Debug, Clone)]
pub struct ServiceSpec {
    pub name: String,
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
    /// Overrides applied on top of the inherited parent environment
    pub env: Vec<(String, String)>,
    pub log_name: String,
}

impl ServiceSpec {
    /// The backend service: `dotnet watch run` with the listen URL and
    /// environment tag exported for ASP.NET Core.
    pub fn backend(config: &Config) -> Self {
        Self {
            name: "backend".to_string(),
            program: "dotnet".to_string(),
            args: vec!["watch".to_string(), "run".to_string()],
            cwd: config.backend_path(),
            env: vec![
                ("ASPNETCORE_URLS".to_string(), config.backend_url.clone()),
                (
                    "ASPNETCORE_ENVIRONMENT".to_string(),
                    config.environment.clone(),
                ),
            ],
            log_name: BACKEND_LOG.to_string(),
        }
    }

    /// The frontend service: `npm run dev`, with the backend URL exported
    /// under the name the Vite build expects.
    pub fn frontend(config: &Config) -> Self {
        Self {
            name: "frontend".to_string(),
            program: "npm".to_string(),
            args: vec!["run".to_string(), "dev".to_string()],
            cwd: config.frontend_path(),
            env: vec![("VITE_API_URL".to_string(), config.backend_url.clone())],
            log_name: FRONTEND_LOG.to_string(),
        }
    }
}

/// Spawn a service with stdout and stderr captured to its log file.
///
/// Creates the log directory if needed and truncates any previous log
/// content. The child inherits the full parent environment plus the
/// spec's overrides.
pub fn spawn(spec: &ServiceSpec, log_dir: &Path) -> Result<ManagedProcess> {
    fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

    let log_path = log_dir.join(&spec.log_name);
    let log = File::create(&log_path)
        .with_context(|| format!("Failed to open log file {}", log_path.display()))?;
    let stdout = log.try_clone()?;
    let stderr = log.try_clone()?;

    let mut cmd = Command::new(&spec.program);
    cmd.args(&spec.args)
        .current_dir(&spec.cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::from(stdout))
        .stderr(Stdio::from(stderr));
    for (key, value) in &spec.env {
        cmd.env(key, value);
    }

    debug!("spawning {}: {} {}", spec.name, spec.program, spec.args.join(" "));
    let child = cmd
        .spawn()
        .with_context(|| format!("Failed to spawn {}", spec.name))?;

    Ok(ManagedProcess::new(
        spec.name.clone(),
        child,
        log_path,
        log,
    ))
}
