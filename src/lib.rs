//! Devup library - supervises the backend and frontend dev servers

pub mod config;
pub mod error;
pub mod preflight;
pub mod process;
pub mod setup;
pub mod supervisor;
pub mod tail;

// Re-export commonly used types
pub use config::Config;
pub use error::SupervisorError;
pub use process::{spawn, ManagedProcess, ProcessRegistry, ProcessState, ServiceSpec};
pub use supervisor::Supervisor;
pub use tail::LogTail;
