//! Process management for the supervised dev services

pub mod registry;
pub mod spawn;

pub use registry::{ManagedProcess, ProcessRegistry, ProcessState, GRACE_TIMEOUT};
pub use spawn::{spawn, ServiceSpec};
