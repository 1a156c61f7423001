//! Tests for spawning, the registry, and shutdown escalation

use devup::config::Config;
use devup::process::{spawn, ProcessRegistry, ProcessState, ServiceSpec};
use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};
use tempfile::TempDir;

/// A ServiceSpec running an inline shell script, for test children.
fn shell_spec(name: &str, script: &str, log_name: &str, cwd: &Path) -> ServiceSpec {
    ServiceSpec {
        name: name.to_string(),
        program: "sh".to_string(),
        args: vec!["-c".to_string(), script.to_string()],
        cwd: cwd.to_path_buf(),
        env: vec![],
        log_name: log_name.to_string(),
    }
}

/// Poll a log file until it contains `needle` or the timeout elapses.
fn wait_for_log(path: &Path, needle: &str) -> String {
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        let content = fs::read_to_string(path).unwrap_or_default();
        if content.contains(needle) {
            return content;
        }
        if Instant::now() > deadline {
            panic!("Timed out waiting for {needle:?} in {}", path.display());
        }
        std::thread::sleep(Duration::from_millis(50));
    }
}

#[cfg(test)]
mod spawn_tests {
    use super::*;

    #[test]
    fn test_spawn_captures_stdout_and_stderr() {
        let temp_dir = TempDir::new().unwrap();
        let spec = shell_spec(
            "backend",
            "echo out-line; echo err-line >&2",
            "backend.log",
            temp_dir.path(),
        );

        let proc = spawn(&spec, temp_dir.path()).unwrap();
        let content = wait_for_log(proc.log_path(), "err-line");
        assert!(content.contains("out-line"), "stdout should reach the log");
        assert!(content.contains("err-line"), "stderr should reach the log");

        let mut registry = ProcessRegistry::new();
        registry.register(proc);
        registry.shutdown(Duration::from_secs(5));
    }

    #[test]
    fn test_spawn_truncates_previous_log() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("backend.log");
        fs::write(&log_path, "stale content from a previous run\n").unwrap();

        let spec = shell_spec("backend", "echo fresh", "backend.log", temp_dir.path());
        let proc = spawn(&spec, temp_dir.path()).unwrap();

        let content = wait_for_log(proc.log_path(), "fresh");
        assert!(
            !content.contains("stale content"),
            "Log must be truncated on spawn"
        );

        let mut registry = ProcessRegistry::new();
        registry.register(proc);
        registry.shutdown(Duration::from_secs(5));
    }

    #[test]
    fn test_spawn_creates_log_directory() {
        let temp_dir = TempDir::new().unwrap();
        let log_dir = temp_dir.path().join("untitled");
        assert!(!log_dir.exists());

        let spec = shell_spec("backend", "true", "backend.log", temp_dir.path());
        let proc = spawn(&spec, &log_dir).unwrap();

        assert!(log_dir.exists(), "Log directory should be created");
        assert!(proc.log_path().exists());

        let mut registry = ProcessRegistry::new();
        registry.register(proc);
        registry.shutdown(Duration::from_secs(5));
    }

    #[test]
    fn test_env_overrides_reach_child() {
        let temp_dir = TempDir::new().unwrap();
        let mut spec = shell_spec(
            "backend",
            "printf '%s\\n' \"$DEVUP_TEST_VALUE\"",
            "backend.log",
            temp_dir.path(),
        );
        spec.env
            .push(("DEVUP_TEST_VALUE".to_string(), "injected-value".to_string()));

        let proc = spawn(&spec, temp_dir.path()).unwrap();
        wait_for_log(proc.log_path(), "injected-value");

        let mut registry = ProcessRegistry::new();
        registry.register(proc);
        registry.shutdown(Duration::from_secs(5));
    }

    #[test]
    fn test_spawn_unlaunchable_program_errors() {
        let temp_dir = TempDir::new().unwrap();
        let mut spec = shell_spec("backend", "true", "backend.log", temp_dir.path());
        spec.program = "devup-no-such-tool-xyz".to_string();

        assert!(spawn(&spec, temp_dir.path()).is_err());
    }
}

#[cfg(test)]
mod service_spec_tests {
    use super::*;

    #[test]
    fn test_backend_spec_command_and_env() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::for_root(temp_dir.path());

        let spec = ServiceSpec::backend(&config);
        assert_eq!(spec.name, "backend");
        assert_eq!(spec.program, "dotnet");
        assert_eq!(spec.args, vec!["watch", "run"]);
        assert_eq!(spec.cwd, config.backend_path());
        assert_eq!(spec.log_name, "backend.log");
        assert!(spec.env.contains(&(
            "ASPNETCORE_URLS".to_string(),
            "http://localhost:5152".to_string()
        )));
        assert!(spec.env.contains(&(
            "ASPNETCORE_ENVIRONMENT".to_string(),
            "Development".to_string()
        )));
    }

    #[test]
    fn test_frontend_spec_gets_backend_url_as_api_url() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = Config::for_root(temp_dir.path());
        config.backend_url = "http://localhost:4242".to_string();

        let spec = ServiceSpec::frontend(&config);
        assert_eq!(spec.name, "frontend");
        assert_eq!(spec.program, "npm");
        assert_eq!(spec.args, vec!["run", "dev"]);
        assert_eq!(spec.log_name, "frontend.log");
        assert_eq!(
            spec.env,
            vec![(
                "VITE_API_URL".to_string(),
                "http://localhost:4242".to_string()
            )],
            "Frontend consumes the backend URL under the Vite variable name"
        );
    }
}

#[cfg(test)]
mod shutdown_tests {
    use super::*;

    #[test]
    fn test_shutdown_terminates_cooperative_child() {
        let temp_dir = TempDir::new().unwrap();
        let spec = shell_spec("backend", "sleep 30", "backend.log", temp_dir.path());

        let mut registry = ProcessRegistry::new();
        registry.register(spawn(&spec, temp_dir.path()).unwrap());

        let start = Instant::now();
        registry.shutdown(Duration::from_secs(5));

        assert!(
            start.elapsed() < Duration::from_secs(5),
            "A cooperative child should exit well before the grace timeout"
        );
        assert_eq!(
            registry.processes()[0].state(),
            ProcessState::Terminated,
            "SIGTERM should have been enough"
        );
        assert!(
            !registry.processes()[0].has_open_log(),
            "Log handle must be closed after shutdown"
        );
        assert!(registry.is_shut_down());
    }

    #[test]
    fn test_stubborn_child_is_force_killed() {
        let temp_dir = TempDir::new().unwrap();
        // The trap makes the shell ignore SIGTERM; the extra commands stop
        // the shell from exec-ing sleep directly. The ready marker keeps
        // shutdown from firing before the trap is installed.
        let spec = shell_spec(
            "backend",
            "trap '' TERM; echo ready; sleep 30; exit 0",
            "backend.log",
            temp_dir.path(),
        );

        let mut registry = ProcessRegistry::new();
        let proc = spawn(&spec, temp_dir.path()).unwrap();
        let log_path = proc.log_path().to_path_buf();
        registry.register(proc);
        wait_for_log(&log_path, "ready");

        registry.shutdown(Duration::from_millis(500));

        assert_eq!(
            registry.processes()[0].state(),
            ProcessState::Killed,
            "A child ignoring SIGTERM must be escalated to SIGKILL"
        );
        assert!(!registry.processes()[0].has_open_log());
    }

    #[test]
    fn test_shutdown_twice_is_noop() {
        let temp_dir = TempDir::new().unwrap();
        let spec = shell_spec("backend", "sleep 30", "backend.log", temp_dir.path());

        let mut registry = ProcessRegistry::new();
        registry.register(spawn(&spec, temp_dir.path()).unwrap());

        registry.shutdown(Duration::from_secs(5));
        let state = registry.processes()[0].state();

        // Second invocation must not panic or change anything
        registry.shutdown(Duration::from_secs(5));
        assert_eq!(registry.processes()[0].state(), state);
    }

    #[test]
    fn test_shutdown_with_already_exited_child() {
        let temp_dir = TempDir::new().unwrap();
        let spec = shell_spec("backend", "true", "backend.log", temp_dir.path());

        let mut registry = ProcessRegistry::new();
        registry.register(spawn(&spec, temp_dir.path()).unwrap());

        // Give the child time to exit on its own before shutdown runs
        std::thread::sleep(Duration::from_millis(300));

        registry.shutdown(Duration::from_secs(5));
        assert_eq!(registry.processes()[0].state(), ProcessState::Terminated);
    }

    #[test]
    fn test_shutdown_on_empty_registry() {
        let mut registry = ProcessRegistry::new();
        registry.shutdown(Duration::from_secs(5));
        assert!(registry.is_shut_down());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_registry_preserves_insertion_order() {
        let temp_dir = TempDir::new().unwrap();
        let backend = shell_spec("backend", "sleep 30", "backend.log", temp_dir.path());
        let frontend = shell_spec("frontend", "sleep 30", "frontend.log", temp_dir.path());

        let mut registry = ProcessRegistry::new();
        registry.register(spawn(&backend, temp_dir.path()).unwrap());
        registry.register(spawn(&frontend, temp_dir.path()).unwrap());

        let names: Vec<&str> = registry.processes().iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["backend", "frontend"]);

        registry.shutdown(Duration::from_secs(5));
    }
}
