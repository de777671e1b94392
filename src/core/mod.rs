pub mod config;
pub mod error;
pub mod exec;

pub use config::{NoodleConfig, ProbeTarget, RetryPolicy};
pub use error::{FailureKind, KernelAlert, NoodleError};
pub use exec::{Executor, ShellExecutor, execute_with_retry};

use std::io::Write;
use std::path::{Path, PathBuf};

/// Name of the copied record inside the per-invocation scratch directory
pub const DATA_FILE_NAME: &str = "record.json";

/// One kernel pseudo-file pair and the record it yields
pub trait Handle {
    type Record;

    /// Record name used in messages
    fn kind(&self) -> &'static str;

    fn target<'a>(&self, config: &'a NoodleConfig) -> &'a ProbeTarget;

    /// Text written to the control path
    fn selector(&self) -> String;

    fn parse(&self, path: &Path) -> Result<Self::Record, NoodleError>;

    fn render(&self, record: &Self::Record) -> Vec<String>;
}

/// Removes a scratch file when dropped
pub(crate) struct ScratchFile {
    path: PathBuf,
}

impl ScratchFile {
    pub(crate) fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

/// Select, copy, parse and print one record
///
/// The copied data file is removed as soon as parsing finishes, before any
/// report line is written. Nothing reaches `out` unless every step succeeded.
pub fn dispatch<H, E>(
    handle: &H,
    config: &NoodleConfig,
    executor: &E,
    scratch: &Path,
    out: &mut dyn Write,
) -> Result<(), NoodleError>
where
    H: Handle,
    E: Executor + ?Sized,
{
    let target = handle.target(config);
    let select = exec::select_command(&handle.selector(), &target.control);
    execute_with_retry(executor, &select, target.retry)?;

    let data_path = scratch.join(DATA_FILE_NAME);
    let data_file = ScratchFile::new(&data_path);
    executor.execute(&exec::copy_command(&target.control, &data_path))?;
    let record = handle.parse(&data_path);
    drop(data_file);
    let record = record?;

    log::debug!("Parsed {} record from {}", handle.kind(), target.control.display());

    let lines = handle.render(&record);
    for line in &lines {
        writeln!(out, "{}", line).map_err(|e| NoodleError::io("failed to write report", e))?;
    }
    Ok(())
}

/// Run `handle` against the live kernel interface
pub fn run<H: Handle>(handle: &H, config: &NoodleConfig, out: &mut dyn Write) -> Result<(), NoodleError> {
    let scratch = tempfile::Builder::new()
        .prefix("noodle-")
        .tempdir()
        .map_err(|e| NoodleError::io("failed to create scratch directory", e))?;
    let executor = ShellExecutor::new(scratch.path(), config.diagnostic_command.clone());

    dispatch(handle, config, &executor, scratch.path(), out)
}
