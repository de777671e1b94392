use std::path::PathBuf;
use thiserror::Error;

/// Substring the kernel module logs when another caller holds its mutex.
pub const MUTEX_BUSY_MARKER: &str = "Error: can't acquire mutex";

/// Errors raised while talking to the noodle pseudo-files
#[derive(Error, Debug)]
pub enum NoodleError {
    #[error("Error occurred: {}", .diagnostic.trim_end())]
    ExternalCommand { command: String, diagnostic: String },

    #[error("gave up after {attempts} attempts: {}", .diagnostic.trim_end())]
    RetryExhausted { attempts: u32, diagnostic: String },

    #[error("malformed {kind} record in {path}: {reason}")]
    MalformedRecord {
        kind: &'static str,
        path: PathBuf,
        reason: String,
    },

    #[error("invalid retry policy: {0}")]
    InvalidRetryPolicy(String),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl NoodleError {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    pub fn malformed(kind: &'static str, path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            kind,
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Kernel diagnostic carried by this error, if any
    pub fn diagnostic(&self) -> Option<&str> {
        match self {
            Self::ExternalCommand { diagnostic, .. } | Self::RetryExhausted { diagnostic, .. } => {
                Some(diagnostic)
            }
            _ => None,
        }
    }

    /// Decide whether the failed step may be attempted again
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            Self::ExternalCommand { diagnostic, .. } => FailureKind::classify(diagnostic),
            _ => FailureKind::Fatal,
        }
    }

    /// Recognised kernel alert behind this error
    pub fn alert(&self) -> Option<KernelAlert> {
        self.diagnostic().map(KernelAlert::recognize)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Retryable,
    Fatal,
}

impl FailureKind {
    pub fn classify(diagnostic: &str) -> Self {
        if diagnostic.contains(MUTEX_BUSY_MARKER) {
            FailureKind::Retryable
        } else {
            FailureKind::Fatal
        }
    }
}

/// Alert lines the noodle module writes to the kernel log before failing a call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelAlert {
    MutexBusy,
    ProcessNotFound,
    BadArgument,
    WrongArgumentCount,
    PathLookup,
    NothingFetched,
    BufferTooSmall,
    CopyFailed,
    Other,
}

impl KernelAlert {
    pub fn recognize(diagnostic: &str) -> Self {
        let line = diagnostic.trim();
        if line.contains(MUTEX_BUSY_MARKER) {
            KernelAlert::MutexBusy
        } else if line.contains("Error: process not found") {
            KernelAlert::ProcessNotFound
        } else if line.contains("Error: bad argument") {
            KernelAlert::BadArgument
        } else if line.contains("Error: wrong amount of arguments") {
            KernelAlert::WrongArgumentCount
        } else if line.contains("parsing path") {
            KernelAlert::PathLookup
        } else if line.contains("No inode fetched") || line.contains("No vm_area_struct fetched") {
            KernelAlert::NothingFetched
        } else if line.contains("Buffer size too small") {
            KernelAlert::BufferTooSmall
        } else if line.contains("Error copying data") {
            KernelAlert::CopyFailed
        } else {
            KernelAlert::Other
        }
    }

    pub fn hint(&self) -> Option<&'static str> {
        match self {
            KernelAlert::MutexBusy => Some("another reader holds the kernel mutex"),
            KernelAlert::ProcessNotFound => Some("no process with that pid"),
            KernelAlert::BadArgument => Some("pid must be nonzero"),
            KernelAlert::WrongArgumentCount => Some("selector was not a decimal pid"),
            KernelAlert::PathLookup => Some("the kernel could not resolve that path"),
            KernelAlert::NothingFetched => Some("no selector was written before reading"),
            KernelAlert::BufferTooSmall => Some("result was read with a short buffer"),
            KernelAlert::CopyFailed => Some("copy between kernel and user space failed"),
            KernelAlert::Other => None,
        }
    }
}
