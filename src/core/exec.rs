use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Duration;

use super::config::RetryPolicy;
use super::error::{FailureKind, NoodleError};

/// Runs one shell command line against the kernel interface
pub trait Executor {
    fn execute(&self, command: &str) -> Result<(), NoodleError>;
}

/// Simple cleanup guard for the diagnostic side file
struct SideFileCleanup {
    path: PathBuf,
}

impl Drop for SideFileCleanup {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

/// Executes commands through `sh -c`, pulling the kernel log tail on failure
#[derive(Debug, Clone)]
pub struct ShellExecutor {
    scratch: PathBuf,
    diagnostic_command: String,
}

impl ShellExecutor {
    /// `scratch` must be a directory private to this invocation
    pub fn new(scratch: impl Into<PathBuf>, diagnostic_command: impl Into<String>) -> Self {
        Self {
            scratch: scratch.into(),
            diagnostic_command: diagnostic_command.into(),
        }
    }

    fn run(command: &str) -> Result<bool, NoodleError> {
        let status = Command::new("sh")
            .arg("-c")
            .arg(command)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| NoodleError::io(format!("failed to spawn shell for `{}`", command), e))?;

        // killed by a signal counts as failure
        Ok(status.code() == Some(0))
    }

    fn capture_diagnostic(&self) -> Result<String, NoodleError> {
        let side_file = self.scratch.join("diagnostic.err");
        let _cleanup = SideFileCleanup {
            path: side_file.clone(),
        };

        let capture = format!(
            "{} > {}",
            self.diagnostic_command,
            shell_quote(&side_file.to_string_lossy())
        );
        // the tail is read even when the capture pipeline itself reports failure
        let _ = Self::run(&capture)?;

        std::fs::read_to_string(&side_file).map_err(|e| {
            NoodleError::io(
                format!("failed to read diagnostic from {}", side_file.display()),
                e,
            )
        })
    }
}

impl Executor for ShellExecutor {
    fn execute(&self, command: &str) -> Result<(), NoodleError> {
        log::debug!("Executing `{}`", command);
        if Self::run(command)? {
            return Ok(());
        }

        let diagnostic = self.capture_diagnostic()?;
        log::debug!("Command `{}` failed with diagnostic '{}'", command, diagnostic.trim_end());
        Err(NoodleError::ExternalCommand {
            command: command.to_string(),
            diagnostic,
        })
    }
}

/// Run `command`, retrying while the kernel reports mutex contention
pub fn execute_with_retry<E>(executor: &E, command: &str, policy: RetryPolicy) -> Result<(), NoodleError>
where
    E: Executor + ?Sized,
{
    execute_with_retry_using(executor, command, policy, std::thread::sleep)
}

/// Same as [`execute_with_retry`] with the inter-attempt sleep supplied by the caller
pub fn execute_with_retry_using<E, S>(
    executor: &E,
    command: &str,
    policy: RetryPolicy,
    mut sleep: S,
) -> Result<(), NoodleError>
where
    E: Executor + ?Sized,
    S: FnMut(Duration),
{
    let max_attempts = policy.max_attempts();
    let mut attempt = 1;

    loop {
        let err = match executor.execute(command) {
            Ok(()) => {
                if attempt > 1 {
                    log::debug!("Command `{}` succeeded on attempt {}", command, attempt);
                }
                return Ok(());
            }
            Err(err) => err,
        };

        if err.failure_kind() == FailureKind::Fatal {
            return Err(err);
        }

        let diagnostic = err.diagnostic().unwrap_or_default().to_string();
        if attempt >= max_attempts {
            log::error!(
                "Command `{}` still contended after {} attempts",
                command,
                max_attempts
            );
            return Err(NoodleError::RetryExhausted {
                attempts: max_attempts,
                diagnostic,
            });
        }

        log::warn!(
            "Kernel mutex busy for `{}` attempt={} wait_ms={}",
            command,
            attempt,
            policy.wait().as_millis()
        );
        sleep(policy.wait());
        attempt += 1;
    }
}

/// Quote `value` for a POSIX shell
pub fn shell_quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for c in value.chars() {
        if c == '\'' {
            quoted.push_str("'\\''");
        } else {
            quoted.push(c);
        }
    }
    quoted.push('\'');
    quoted
}

/// Command writing `selector` to `control` without a trailing newline
pub fn select_command(selector: &str, control: &Path) -> String {
    format!(
        "printf '%s' {} > {}",
        shell_quote(selector),
        shell_quote(&control.to_string_lossy())
    )
}

/// Command copying the prepared record from `result` into `dest`
pub fn copy_command(result: &Path, dest: &Path) -> String {
    format!(
        "cat {} > {}",
        shell_quote(&result.to_string_lossy()),
        shell_quote(&dest.to_string_lossy())
    )
}
