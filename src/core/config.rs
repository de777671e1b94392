use std::path::PathBuf;
use std::time::Duration;

use super::error::NoodleError;

pub const INODE_CONTROL_PATH: &str = "/proc/nq_noodle_inode";
pub const VM_AREA_CONTROL_PATH: &str = "/proc/nq_noodle_vm_area";
pub const DEFAULT_DIAGNOSTIC_COMMAND: &str = "dmesg | tail -1";

/// Fixed-delay retry budget for a selector write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    wait: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, wait: Duration) -> Result<Self, NoodleError> {
        if max_attempts == 0 {
            return Err(NoodleError::InvalidRetryPolicy(
                "max_attempts must be at least 1".to_string(),
            ));
        }
        Ok(Self { max_attempts, wait })
    }

    /// Build a policy from a wait expressed in seconds
    pub fn from_secs_f64(max_attempts: u32, wait_seconds: f64) -> Result<Self, NoodleError> {
        if !wait_seconds.is_finite() || wait_seconds < 0.0 {
            return Err(NoodleError::InvalidRetryPolicy(format!(
                "wait must be a non-negative number of seconds, got {}",
                wait_seconds
            )));
        }
        let wait = Duration::try_from_secs_f64(wait_seconds).map_err(|e| {
            NoodleError::InvalidRetryPolicy(format!("wait of {} seconds is unusable: {}", wait_seconds, e))
        })?;
        Self::new(max_attempts, wait)
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn wait(&self) -> Duration {
        self.wait
    }
}

/// One control/result pseudo-file and the retry budget used when selecting through it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeTarget {
    pub control: PathBuf,
    pub retry: RetryPolicy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoodleConfig {
    pub inode: ProbeTarget,
    pub vm_area: ProbeTarget,
    /// Shell snippet whose stdout is the latest kernel diagnostic
    pub diagnostic_command: String,
}

impl Default for NoodleConfig {
    fn default() -> Self {
        Self {
            inode: ProbeTarget {
                control: PathBuf::from(INODE_CONTROL_PATH),
                retry: RetryPolicy {
                    max_attempts: 10,
                    wait: Duration::from_millis(200),
                },
            },
            vm_area: ProbeTarget {
                control: PathBuf::from(VM_AREA_CONTROL_PATH),
                retry: RetryPolicy {
                    max_attempts: 10,
                    wait: Duration::from_millis(100),
                },
            },
            diagnostic_command: DEFAULT_DIAGNOSTIC_COMMAND.to_string(),
        }
    }
}

impl NoodleConfig {
    pub fn with_inode_control(mut self, control: impl Into<PathBuf>) -> Self {
        self.inode.control = control.into();
        self
    }

    pub fn with_vm_area_control(mut self, control: impl Into<PathBuf>) -> Self {
        self.vm_area.control = control.into();
        self
    }

    pub fn with_diagnostic_command(mut self, command: impl Into<String>) -> Self {
        self.diagnostic_command = command.into();
        self
    }
}
