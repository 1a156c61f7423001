use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable overriding the backend listen URL.
pub const BACKEND_URL_VAR: &str = "BACKEND_URL";
/// Environment variable selecting the backend runtime environment tag.
pub const ENVIRONMENT_VAR: &str = "ASPNETCORE_ENVIRONMENT";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend project directory, relative to the root
    pub backend_dir: String,
    /// Frontend project directory, relative to the root
    pub frontend_dir: String,
    /// Directory the service logs are written to
    pub log_dir: String,
    /// URL the backend listens on, forwarded to the frontend as its API base
    pub backend_url: String,
    /// Runtime environment tag for the backend
    pub environment: String,

    #[serde(skip)]
    root: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_dir: "Backend".to_string(),
            frontend_dir: "frontend".to_string(),
            log_dir: "untitled".to_string(),
            backend_url: "http://localhost:5152".to_string(),
            environment: "Development".to_string(),
            root: PathBuf::new(),
        }
    }
}

impl Config {
    /// Default configuration anchored at `root`, without touching the
    /// filesystem or the environment.
    pub fn for_root(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            ..Self::default()
        }
    }

    /// Load configuration for a project root.
    ///
    /// Reads `devup.toml` at the root if present, then applies environment
    /// overrides (`BACKEND_URL`, `ASPNETCORE_ENVIRONMENT`). An unreadable or
    /// malformed file falls back to defaults.
    pub fn load(root: &Path) -> Self {
        let mut config = Self::for_root(root);

        let path = root.join("devup.toml");
        if path.exists() {
            if let Ok(content) = std::fs::read_to_string(&path) {
                if let Ok(parsed) = toml::from_str::<Config>(&content) {
                    config = Config {
                        root: root.to_path_buf(),
                        ..parsed
                    };
                }
            }
        }

        if let Ok(url) = std::env::var(BACKEND_URL_VAR) {
            config.backend_url = url;
        }
        if let Ok(env) = std::env::var(ENVIRONMENT_VAR) {
            config.environment = env;
        }

        config
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn backend_path(&self) -> PathBuf {
        self.root.join(&self.backend_dir)
    }

    pub fn frontend_path(&self) -> PathBuf {
        self.root.join(&self.frontend_dir)
    }

    pub fn log_path(&self) -> PathBuf {
        self.root.join(&self.log_dir)
    }
}
