//! The supervisor - orchestrates preflight, setup, spawn, tail, shutdown

use crate::config::Config;
use crate::process::{spawn, ProcessRegistry, ServiceSpec, GRACE_TIMEOUT};
use crate::tail::{self, LogTail};
use crate::{preflight, setup};
use anyhow::Result;
use tracing::info;

/// Owns the registry of managed processes and drives a full run.
pub struct Supervisor {
    config: Config,
    registry: ProcessRegistry,
}

impl Supervisor {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            registry: ProcessRegistry::new(),
        }
    }

    /// Run until interrupted.
    ///
    /// Preflight and setup failures propagate before anything is spawned.
    /// Once children exist, shutdown always runs, whether the tail loop
    /// ended via signal or error.
    pub async fn run(&mut self) -> Result<()> {
        preflight::check_projects(&self.config)?;
        preflight::check_tools()?;

        setup::restore_backend(&self.config)?;
        setup::install_frontend(&self.config)?;

        let result = self.launch_and_tail().await;

        info!("Shutting down...");
        self.registry.shutdown(GRACE_TIMEOUT);

        result
    }

    async fn launch_and_tail(&mut self) -> Result<()> {
        let log_dir = self.config.log_path();

        info!("Starting Backend (hot reload)...");
        let backend = spawn(&ServiceSpec::backend(&self.config), &log_dir)?;
        info!("Backend PID: {}", backend.pid());
        let backend_log = backend.log_path().to_path_buf();
        self.registry.register(backend);

        info!("Starting Frontend (Vite)...");
        let frontend = spawn(&ServiceSpec::frontend(&self.config), &log_dir)?;
        info!("Frontend PID: {}", frontend.pid());
        let frontend_log = frontend.log_path().to_path_buf();
        self.registry.register(frontend);

        let mut tails = vec![
            LogTail::open_end(&backend_log, "backend")?,
            LogTail::open_end(&frontend_log, "frontend")?,
        ];

        info!("Running. Press Ctrl+C to stop. Tailing logs below...");
        tail::tail_loop(&mut tails).await
    }
}
