//! Process registry - tracks the supervised child processes

use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::Child;
use std::time::{Duration, Instant};
use tracing::debug;

/// How long a child gets to exit after SIGTERM before it is SIGKILLed.
pub const GRACE_TIMEOUT: Duration = Duration::from_secs(5);

/// Poll step while waiting for a terminated child to exit.
const REAP_POLL: Duration = Duration::from_millis(100);

/// Lifecycle of a managed process. No transition goes back; once a
/// process is observed exited it is never restarted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    Running,
    /// Exited after a graceful termination request, and was reaped
    Terminated,
    /// Did not exit within the grace period and was force-killed
    Killed,
}

/// A child process managed by the supervisor
#[derive(Debug)]
pub struct ManagedProcess {
    name: String,
    child: Child,
    log_path: PathBuf,
    log: Option<File>,
    state: ProcessState,
}

impl ManagedProcess {
    pub fn new(name: String, child: Child, log_path: PathBuf, log: File) -> Self {
        Self {
            name,
            child,
            log_path,
            log: Some(log),
            state: ProcessState::Running,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pid(&self) -> u32 {
        self.child.id()
    }

    pub fn state(&self) -> ProcessState {
        self.state
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Whether the log file handle is still open.
    pub fn has_open_log(&self) -> bool {
        self.log.is_some()
    }

    /// Request graceful termination (SIGTERM), without waiting.
    ///
    /// Delivery failure (process already gone) is swallowed; shutdown is
    /// best-effort.
    pub fn terminate(&mut self) {
        if self.state != ProcessState::Running {
            return;
        }
        let _ = kill(Pid::from_raw(self.child.id() as i32), Signal::SIGTERM);
    }

    /// Wait up to `grace` for the child to exit, then force-kill it.
    pub fn wait_or_kill(&mut self, grace: Duration) {
        if self.state != ProcessState::Running {
            return;
        }

        let deadline = Instant::now() + grace;
        loop {
            match self.child.try_wait() {
                Ok(Some(_)) => {
                    self.state = ProcessState::Terminated;
                    return;
                }
                Ok(None) if Instant::now() < deadline => {
                    std::thread::sleep(REAP_POLL);
                }
                _ => break,
            }
        }

        debug!("{} did not exit within grace period, killing", self.name);
        let _ = self.child.kill();
        let _ = self.child.wait();
        self.state = ProcessState::Killed;
    }

    /// Close the log file handle. Safe to call more than once.
    pub fn close_log(&mut self) {
        self.log.take();
    }
}

/// Ordered collection of managed processes, owned by the supervisor.
///
/// Insertion order is significant: shutdown iterates the registry in
/// order once to terminate, again to reap, and a final time to close
/// log handles.
#[derive(Debug, Default)]
pub struct ProcessRegistry {
    procs: Vec<ManagedProcess>,
    shut_down: bool,
}

impl ProcessRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, proc: ManagedProcess) {
        self.procs.push(proc);
    }

    pub fn processes(&self) -> &[ManagedProcess] {
        &self.procs
    }

    pub fn is_empty(&self) -> bool {
        self.procs.is_empty()
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    /// Terminate, reap, and close everything. Idempotent: the second and
    /// later calls are no-ops.
    ///
    /// The three passes are independent; a process that already exited or
    /// a handle already closed never aborts the pass for the rest.
    pub fn shutdown(&mut self, grace: Duration) {
        if self.shut_down {
            return;
        }
        self.shut_down = true;

        for proc in &mut self.procs {
            proc.terminate();
        }
        for proc in &mut self.procs {
            proc.wait_or_kill(grace);
        }
        for proc in &mut self.procs {
            proc.close_log();
        }
    }
}
