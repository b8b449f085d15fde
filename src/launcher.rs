//! [`Launcher`] implementation that hands commands to the system shell.
//!
//! Each command runs as `sh -c <command>` (`cmd /C <command>` on Windows)
//! with stdin detached and stdout/stderr inherited.  The caller returns as
//! soon as the child has been spawned; a short-lived background thread
//! waits on the child so it does not linger as a zombie, and logs how it
//! exited.

use crate::traits::Launcher;
use log::{debug, info, warn};
use std::process::{Command, Stdio};

/// Fire-and-forget shell launcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellLauncher {
    program: String,
    flag: String,
}

/// The shell could not be started.
#[derive(Debug, thiserror::Error)]
#[error("failed to run {command:?}: {source}")]
pub struct ShellLauncherError {
    command: String,
    #[source]
    source: std::io::Error,
}

impl Default for ShellLauncher {
    fn default() -> Self {
        if cfg!(windows) {
            Self::with_shell("cmd", "/C")
        } else {
            Self::with_shell("sh", "-c")
        }
    }
}

impl ShellLauncher {
    /// The platform shell.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `program flag <command>` instead of the platform shell.
    pub fn with_shell(program: impl Into<String>, flag: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            flag: flag.into(),
        }
    }

    fn build(&self, command: &str) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg(&self.flag).arg(command).stdin(Stdio::null());
        cmd
    }
}

impl Launcher for ShellLauncher {
    type Error = ShellLauncherError;

    fn launch(&self, command: &str) -> Result<(), Self::Error> {
        let mut child = self
            .build(command)
            .spawn()
            .map_err(|source| ShellLauncherError {
                command: command.to_string(),
                source,
            })?;
        let pid = child.id();
        info!("executed command: {} (pid {})", command, pid);

        let command = command.to_string();
        let reaper = std::thread::Builder::new()
            .name(format!("reap-{}", pid))
            .spawn(move || match child.wait() {
                Ok(status) if status.success() => debug!("{:?} (pid {}) finished", command, pid),
                Ok(status) => warn!("{:?} (pid {}) exited with {}", command, pid, status),
                Err(e) => warn!("failed to wait for {:?} (pid {}): {}", command, pid, e),
            });
        if let Err(e) = reaper {
            warn!("could not start reaper thread for pid {}: {}", pid, e);
        }
        Ok(())
    }
}

//  Tests

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::{Duration, Instant};

    static TEST_ID: AtomicU32 = AtomicU32::new(0);

    fn tmp_path() -> PathBuf {
        let id = TEST_ID.fetch_add(1, Ordering::SeqCst);
        std::env::temp_dir().join(format!("vulcanboard-launch-{}-{}", std::process::id(), id))
    }

    #[test]
    fn runs_command_through_shell() {
        let path = tmp_path();
        let cmd = format!("echo launched > '{}'", path.display());
        ShellLauncher::new().launch(&cmd).unwrap();

        let deadline = Instant::now() + Duration::from_secs(5);
        let mut contents = String::new();
        while Instant::now() < deadline {
            if let Ok(text) = std::fs::read_to_string(&path) {
                if text.ends_with('\n') {
                    contents = text;
                    break;
                }
            }
            std::thread::sleep(Duration::from_millis(20));
        }
        assert_eq!(contents, "launched\n");
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn returns_without_waiting() {
        let start = Instant::now();
        ShellLauncher::new().launch("sleep 3").unwrap();
        assert!(start.elapsed() < Duration::from_secs(2));
    }

    #[test]
    fn failing_command_is_not_an_error() {
        ShellLauncher::new().launch("exit 3").unwrap();
    }

    #[test]
    fn missing_shell_is_an_error() {
        let launcher = ShellLauncher::with_shell("/nonexistent/vulcanboard-shell", "-c");
        let err = launcher.launch("true").unwrap_err();
        assert!(err.to_string().contains("\"true\""), "{}", err);
    }
}
